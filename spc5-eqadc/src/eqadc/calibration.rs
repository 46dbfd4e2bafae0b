//! ADC self-calibration.
//!
//! Each unit converts its internal 25 % and 75 % (VRH - VRL) reference
//! channels. The two raw codes give a Q14 gain and an offset correction,
//! loaded into the default (12 bit) configuration and both alternate
//! configurations (10 and 8 bit).

use super::cfifo::CommandFifo;
use super::command::{AdcRegister, CommandWord, CHANNEL_VREF_25, CHANNEL_VREF_75};
use super::shared::{GAIN_NUMERATOR, IDEAL_RES75_MINUS_2};
use super::types::{Error, Unit};
use crate::regs::RegisterBlock;

/// Gain/offset register pairs, default configuration first.
const CORRECTION_REGISTERS: [(AdcRegister, AdcRegister); 3] = [
    (AdcRegister::Gccr, AdcRegister::Occr),
    (AdcRegister::Ac1gccr, AdcRegister::Ac1occr),
    (AdcRegister::Ac2gccr, AdcRegister::Ac2occr),
];

/// Raw codes of the two reference conversions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SamplePair {
    pub res25: u16,
    pub res75: u16,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationConstants {
    /// `GCC`, Q14 (0x4000 is unity gain).
    pub gain: u16,
    /// `OCC`, two's complement, truncated to 16 bits.
    pub offset: u16,
}

impl CalibrationConstants {
    pub fn from_samples(samples: SamplePair) -> Result<Self, Error> {
        let SamplePair { res25, res75 } = samples;
        if res75 <= res25 {
            return Err(Error::DegenerateCalibration { res25, res75 });
        }

        let gain = GAIN_NUMERATOR / (res75 - res25) as u32;
        let gain = u16::try_from(gain).map_err(|_| Error::GainOutOfRange { gain })?;
        let scaled = (gain as u32 * res75 as u32) >> 14;
        let offset = IDEAL_RES75_MINUS_2.wrapping_sub(scaled) as u16;

        Ok(Self { gain, offset })
    }
}

/// Converts the two reference channels of `unit` and returns the raw codes
/// in push order.
pub fn sample_references<R: RegisterBlock>(
    cfifo: &mut CommandFifo<'_, R>,
    unit: Unit,
) -> Result<SamplePair, Error> {
    let fifo = cfifo.fifo();
    cfifo.push_command(CommandWord::convert(unit, CHANNEL_VREF_25, fifo))?;
    cfifo.push_command(CommandWord::convert(unit, CHANNEL_VREF_75, fifo))?;
    cfifo.wait_for_responses(2)?;

    // The RFIFO is the only link between request and result.
    let res25 = cfifo.read_response();
    let res75 = cfifo.read_response();
    Ok(SamplePair { res25, res75 })
}

/// Calibrates `unit` and programs all three correction register pairs.
///
/// Nothing is written when the samples are unusable.
pub fn calibrate<R: RegisterBlock>(
    cfifo: &mut CommandFifo<'_, R>,
    unit: Unit,
) -> Result<CalibrationConstants, Error> {
    let samples = sample_references(cfifo, unit)?;
    let constants = CalibrationConstants::from_samples(samples).map_err(|e| {
        error!("eqadc: {:?} calibration rejected: {}", unit, e);
        e
    })?;
    info!(
        "eqadc: {:?} res25={} res75={} gcc={:#x} occ={:#x}",
        unit, samples.res25, samples.res75, constants.gain, constants.offset
    );

    for (gain_reg, offset_reg) in CORRECTION_REGISTERS {
        cfifo.write_register(unit, gain_reg, constants.gain)?;
        cfifo.write_register(unit, offset_reg, constants.offset)?;
    }
    Ok(constants)
}
