#![cfg_attr(not(test), no_std)]
#![doc = "Driver core for the SPC5xx enhanced queued ADC (eQADC)."]
#![doc = ""]
#![doc = "Drives the converter pair through command FIFO 0, runs the"]
#![doc = "25 %/75 % reference self-calibration and leaves both units"]
#![doc = "programmed but powered down."]
#![doc = ""]
#![doc = "## Feature flags"]
#![doc = document_features::document_features!()]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod eqadc;
pub mod regs;

pub use eqadc::{Config, Eqadc, Error, Fifo, Unit, Units};
