//! eQADC driver core.
//!
//! The converter units are only reachable through command FIFOs. Bring-up
//! runs over CFIFO0:
//!
//! 1. enable CFIFO0 (software trigger, single-scan enable)
//! 2. enable ADC0, then ADC1
//! 3. calibrate each configured unit and program its alternate
//!    configurations for 10 and 8 bit results
//! 4. disable ADC0, then ADC1
//! 5. disable and invalidate CFIFO0
//!
//! The units stay calibrated but powered down until a driver is started.

pub mod calibration;
pub mod cfifo;
pub mod command;
mod driver;
pub mod power;
mod shared;
#[cfg(test)]
pub(crate) mod sim;

pub use calibration::{CalibrationConstants, SamplePair};
pub use cfifo::CommandFifo;
pub use command::{AdcRegister, CommandWord, Resolution};
pub use driver::{AdcDriver, Eqadc, HookStatus, LowLevelDriver};
pub use types::{Config, Error, Fifo, Unit, Units};

mod types {
    use core::fmt;

    use super::shared::{
        DEFAULT_CLOCK_PRESCALER, DEFAULT_MAX_POLLS, FIFO_COUNT, MAX_CLOCK_PRESCALER,
    };

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Error {
        /// A CFIFO did not report idle while being disabled.
        QueueIdleTimeout,
        /// A CFIFO stayed full while pushing a command.
        QueuePushTimeout,
        /// An RFIFO did not collect the expected number of results.
        ResponseTimeout,
        /// The 75 % sample was not above the 25 % sample.
        DegenerateCalibration { res25: u16, res75: u16 },
        /// The computed gain does not fit the 16-bit correction register.
        GainOutOfRange { gain: u32 },
        InvalidConfiguration,
    }

    impl Error {
        /// `true` for the three bounded queue waits.
        pub const fn is_timeout(&self) -> bool {
            matches!(
                self,
                Self::QueueIdleTimeout | Self::QueuePushTimeout | Self::ResponseTimeout
            )
        }
    }

    impl fmt::Display for Error {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::QueueIdleTimeout => f.write_str("CFIFO did not become idle"),
                Self::QueuePushTimeout => f.write_str("CFIFO stayed full"),
                Self::ResponseTimeout => f.write_str("RFIFO results did not arrive"),
                Self::DegenerateCalibration { res25, res75 } => write!(
                    f,
                    "degenerate calibration samples (25%: {res25}, 75%: {res75})"
                ),
                Self::GainOutOfRange { gain } => {
                    write!(f, "calibration gain {gain:#x} exceeds 16 bits")
                }
                Self::InvalidConfiguration => f.write_str("invalid eQADC configuration"),
            }
        }
    }

    /// Command FIFO / result FIFO pair.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Fifo {
        Fifo0,
        Fifo1,
        Fifo2,
        Fifo3,
        Fifo4,
        Fifo5,
    }

    impl Fifo {
        pub const ALL: [Self; FIFO_COUNT] = [
            Self::Fifo0,
            Self::Fifo1,
            Self::Fifo2,
            Self::Fifo3,
            Self::Fifo4,
            Self::Fifo5,
        ];

        pub const fn index(self) -> usize {
            self as usize
        }
    }

    /// Converter unit of the eQADC pair.
    #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Unit {
        Adc0,
        Adc1,
    }

    impl Unit {
        /// Power sequencing order. ADC0 always goes first.
        pub const PAIR: [Self; 2] = [Self::Adc0, Self::Adc1];

        pub const fn index(self) -> usize {
            self as usize
        }
    }

    /// Set of converter units, iterated ADC0 first.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Units {
        pub adc0: bool,
        pub adc1: bool,
    }

    impl Units {
        pub const NONE: Self = Self {
            adc0: false,
            adc1: false,
        };
        pub const BOTH: Self = Self {
            adc0: true,
            adc1: true,
        };

        pub const fn only(unit: Unit) -> Self {
            match unit {
                Unit::Adc0 => Self {
                    adc0: true,
                    adc1: false,
                },
                Unit::Adc1 => Self {
                    adc0: false,
                    adc1: true,
                },
            }
        }

        pub const fn contains(&self, unit: Unit) -> bool {
            match unit {
                Unit::Adc0 => self.adc0,
                Unit::Adc1 => self.adc1,
            }
        }

        pub fn iter(self) -> impl Iterator<Item = Unit> {
            Unit::PAIR.into_iter().filter(move |u| self.contains(*u))
        }
    }

    /// Bring-up configuration, resolved once by [`super::Eqadc::new`].
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct Config {
        /// Units calibrated at bring-up.
        pub units: Units,
        /// Driver per CFIFO and the unit it serves. `None` leaves the FIFO unused.
        pub queues: [Option<Unit>; FIFO_COUNT],
        /// `CR.CLK_PS` value programmed into both units.
        pub clock_prescaler: u8,
        /// Poll budget for every wait on the hardware.
        pub max_polls: u32,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                units: Units::BOTH,
                queues: [Some(Unit::Adc0), None, None, None, None, None],
                clock_prescaler: DEFAULT_CLOCK_PRESCALER,
                max_polls: DEFAULT_MAX_POLLS,
            }
        }
    }

    impl Config {
        /// Queues 0-2 on ADC0 and 3-5 on ADC1, both units calibrated.
        pub fn all_queues() -> Self {
            let mut queues = [None; FIFO_COUNT];
            for fifo in Fifo::ALL {
                queues[fifo.index()] = Some(if fifo.index() < 3 {
                    Unit::Adc0
                } else {
                    Unit::Adc1
                });
            }
            Self {
                queues,
                ..Self::default()
            }
        }

        pub fn validate(&self) -> Result<(), Error> {
            if self.clock_prescaler > MAX_CLOCK_PRESCALER || self.max_polls == 0 {
                return Err(Error::InvalidConfiguration);
            }
            let unassigned = self
                .queues
                .iter()
                .flatten()
                .any(|unit| !self.units.contains(*unit));
            if unassigned {
                return Err(Error::InvalidConfiguration);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_contract() {
        let cfg = Config::default();
        assert_eq!(cfg.units, Units::BOTH);
        assert_eq!(cfg.queues[0], Some(Unit::Adc0));
        assert!(cfg.queues[1..].iter().all(Option::is_none));
        assert_eq!(cfg.clock_prescaler, 5);
        assert_eq!(cfg.max_polls, 2_000_000);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn all_queues_splits_fifos_between_units() {
        let cfg = Config::all_queues();
        assert_eq!(cfg.queues[2], Some(Unit::Adc0));
        assert_eq!(cfg.queues[3], Some(Unit::Adc1));
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_invalid_config_values() {
        let mut zero_polls = Config::default();
        zero_polls.max_polls = 0;
        assert_eq!(zero_polls.validate(), Err(Error::InvalidConfiguration));

        let mut prescaler = Config::default();
        prescaler.clock_prescaler = 32;
        assert_eq!(prescaler.validate(), Err(Error::InvalidConfiguration));

        let mut orphan_queue = Config::default();
        orphan_queue.units = Units::only(Unit::Adc1);
        assert_eq!(orphan_queue.validate(), Err(Error::InvalidConfiguration));
    }

    #[test]
    fn units_iterate_adc0_first() {
        let mut it = Units::BOTH.iter();
        assert_eq!(it.next(), Some(Unit::Adc0));
        assert_eq!(it.next(), Some(Unit::Adc1));
        assert_eq!(it.next(), None);
        assert_eq!(Units::NONE.iter().count(), 0);
        assert_eq!(Units::only(Unit::Adc1).iter().next(), Some(Unit::Adc1));
    }

    #[test]
    fn timeouts_are_grouped() {
        assert!(Error::QueueIdleTimeout.is_timeout());
        assert!(Error::QueuePushTimeout.is_timeout());
        assert!(Error::ResponseTimeout.is_timeout());
        assert!(!Error::DegenerateCalibration { res25: 1, res75: 1 }.is_timeout());
    }
}
