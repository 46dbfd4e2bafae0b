//! ADC pair power sequencing.
//!
//! Both ADC0 and ADC1 of a pair must be enabled before calibrating or using
//! either of them, otherwise conversions can be inaccurate. ADC0 is always
//! addressed first.

use super::cfifo::CommandFifo;
use super::command::{cr, AdcRegister};
use super::types::{Error, Unit};
use crate::regs::RegisterBlock;

/// Enables both units with the given `CR.CLK_PS` value.
pub fn enable_both<R: RegisterBlock>(
    cfifo: &mut CommandFifo<'_, R>,
    clock_prescaler: u8,
) -> Result<(), Error> {
    debug!("eqadc: enabling ADC0 and ADC1");
    write_cr_pair(cfifo, cr::clk_ps(clock_prescaler) | cr::EN)
}

/// Disables both units, keeping the prescaler programmed.
pub fn disable_both<R: RegisterBlock>(
    cfifo: &mut CommandFifo<'_, R>,
    clock_prescaler: u8,
) -> Result<(), Error> {
    debug!("eqadc: disabling ADC0 and ADC1");
    write_cr_pair(cfifo, cr::clk_ps(clock_prescaler))
}

fn write_cr_pair<R: RegisterBlock>(cfifo: &mut CommandFifo<'_, R>, value: u16) -> Result<(), Error> {
    for unit in Unit::PAIR {
        cfifo.write_register(unit, AdcRegister::Cr, value)?;
    }
    Ok(())
}
