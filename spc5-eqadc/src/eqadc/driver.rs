use super::calibration::{self, CalibrationConstants};
use super::cfifo::CommandFifo;
use super::command::{AdcRegister, Resolution};
use super::power;
use super::types::{Config, Error, Fifo, Unit};
use crate::regs::{cfcr, RegisterBlock};

/// FIFO used for bring-up, calibration and register read-back.
const SETUP_FIFO: Fifo = Fifo::Fifo0;
const SETUP_CFCR: u16 = cfcr::SSE | cfcr::MODE_SWCS;

/// Whether a lifecycle hook has a defined register sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HookStatus {
    /// The hook runs a defined sequence.
    Implemented,
    /// The hook is accepted but touches no hardware yet.
    Unspecified,
}

/// Hooks the surrounding ADC framework calls on a low level driver.
///
/// `start` is entered from the stopped state, `stop` from ready.
pub trait LowLevelDriver {
    fn hook_status(&self) -> HookStatus;
    fn start(&mut self) -> Result<(), Error>;
    fn stop(&mut self) -> Result<(), Error>;
    fn start_conversion(&mut self) -> Result<(), Error>;
    fn stop_conversion(&mut self) -> Result<(), Error>;
}

/// Driver object bound to one CFIFO and the unit it converts on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcDriver {
    fifo: Fifo,
    unit: Unit,
}

impl AdcDriver {
    pub fn fifo(&self) -> Fifo {
        self.fifo
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }
}

// The operating register sequence for these hooks is not defined yet, so they
// succeed without touching the converter.
impl LowLevelDriver for AdcDriver {
    fn hook_status(&self) -> HookStatus {
        HookStatus::Unspecified
    }

    fn start(&mut self) -> Result<(), Error> {
        trace!("adc{}: start", self.fifo.index());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Error> {
        trace!("adc{}: stop", self.fifo.index());
        Ok(())
    }

    fn start_conversion(&mut self) -> Result<(), Error> {
        Ok(())
    }

    fn stop_conversion(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

/// eQADC module: calibrated converter pair plus its configured drivers.
pub struct Eqadc<R: RegisterBlock> {
    regs: R,
    config: Config,
    calibration: [Option<CalibrationConstants>; 2],
}

impl<R: RegisterBlock> Eqadc<R> {
    /// Validates `config` and runs the bring-up sequence.
    pub fn new(regs: R, config: Config) -> Result<Self, Error> {
        config.validate()?;
        let mut this = Self {
            regs,
            config,
            calibration: [None; 2],
        };
        this.bring_up()?;
        Ok(this)
    }

    /// Enables CFIFO0 and both units, calibrates the configured units, then
    /// powers everything down again.
    ///
    /// Safe to repeat. On failure the units and the FIFO are still shut down
    /// and the first error is returned.
    pub fn bring_up(&mut self) -> Result<(), Error> {
        let Config {
            units,
            clock_prescaler,
            max_polls,
            ..
        } = self.config;
        let programmed = &mut self.calibration;
        let mut cfifo = CommandFifo::new(&mut self.regs, SETUP_FIFO, max_polls);

        debug!("eqadc: bring-up on cfifo{}", SETUP_FIFO.index());
        cfifo.enable(SETUP_CFCR, 0);

        let calibrated = power::enable_both(&mut cfifo, clock_prescaler).and_then(|()| {
            for unit in units.iter() {
                programmed[unit.index()] = None;
                let constants = calibration::calibrate(&mut cfifo, unit)?;
                programmed[unit.index()] = Some(constants);
                cfifo.write_register(unit, AdcRegister::Ac1cr, Resolution::Bits10.ressel())?;
                cfifo.write_register(unit, AdcRegister::Ac2cr, Resolution::Bits8.ressel())?;
            }
            Ok(())
        });

        let powered_down = power::disable_both(&mut cfifo, clock_prescaler);
        let disabled = cfifo.disable();

        if let Err(e) = calibrated {
            error!("eqadc: bring-up failed: {}", e);
        }
        calibrated.and(powered_down).and(disabled)
    }

    /// Reads an internal ADC register back, enabling CFIFO0 for the duration
    /// of the access.
    pub fn read_register(&mut self, unit: Unit, reg: AdcRegister) -> Result<u16, Error> {
        let mut cfifo = CommandFifo::new(&mut self.regs, SETUP_FIFO, self.config.max_polls);
        cfifo.enable(SETUP_CFCR, 0);
        let value = cfifo.read_register(unit, reg);
        let disabled = cfifo.disable();
        let value = value?;
        disabled.map(|()| value)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Constants programmed into `unit` by the last bring-up.
    pub fn calibration(&self, unit: Unit) -> Option<CalibrationConstants> {
        self.calibration[unit.index()]
    }

    pub fn driver(&self, fifo: Fifo) -> Option<AdcDriver> {
        self.config.queues[fifo.index()].map(|unit| AdcDriver { fifo, unit })
    }

    pub fn drivers(&self) -> impl Iterator<Item = AdcDriver> + '_ {
        Fifo::ALL.into_iter().filter_map(move |fifo| self.driver(fifo))
    }

    pub fn release(self) -> R {
        self.regs
    }
}
