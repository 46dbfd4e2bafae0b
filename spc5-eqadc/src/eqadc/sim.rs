//! Host-side model of the eQADC register block.
//!
//! Commands sit in their CFIFO until the FIFO's `FISR` or the `CFSR` is
//! read, which executes the oldest one. That keeps `CFCTR` bounded the way
//! the hardware does while the driver polls, and a FIFO reports busy in
//! `CFSR` until it drained. Every access is logged in order.

use std::collections::VecDeque;
use std::vec::Vec;

use super::command::{AdcRegister, CommandWord, CHANNEL_VREF_25, CHANNEL_VREF_75};
use super::shared::{CFIFO_DEPTH, FIFO_COUNT};
use super::types::{Fifo, Unit};
use crate::regs::{fisr, RegisterBlock};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Access {
    Cfcr(Fifo, u16),
    Idcr(Fifo, u16),
    Fisr(Fifo, u32),
    Cftcr(Fifo, u16),
    Cfpr(Fifo, u32),
    FisrRead(Fifo),
    RfprRead(Fifo),
    CfsrRead,
}

impl Access {
    fn is_write(&self) -> bool {
        !matches!(self, Self::FisrRead(_) | Self::RfprRead(_) | Self::CfsrRead)
    }
}

pub(crate) struct SimEqadc {
    pub log: Vec<Access>,
    /// Commands stay queued, `CFCTR` never drops.
    pub stalled: bool,
    /// `CFSR` reads reporting busy before the FIFO turns idle.
    pub busy_polls: [u32; FIFO_COUNT],
    pub flags: [u32; FIFO_COUNT],
    /// Raw codes returned for the 25 % and 75 % reference channels.
    pub vref_codes: [(u16, u16); 2],
    pub max_pending: u32,
    pub cfsr_reads: u32,
    pending: [VecDeque<u32>; FIFO_COUNT],
    results: [VecDeque<u32>; FIFO_COUNT],
    adc_regs: [[u16; 0x40]; 2],
}

impl SimEqadc {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            stalled: false,
            busy_polls: [0; FIFO_COUNT],
            flags: [0; FIFO_COUNT],
            vref_codes: [(4096, 12288); 2],
            max_pending: 0,
            cfsr_reads: 0,
            pending: Default::default(),
            results: Default::default(),
            adc_regs: [[0; 0x40]; 2],
        }
    }

    pub fn with_codes(unit: Unit, res25: u16, res75: u16) -> Self {
        let mut sim = Self::new();
        sim.vref_codes[unit.index()] = (res25, res75);
        sim
    }

    pub fn writes(&self) -> Vec<Access> {
        self.log.iter().copied().filter(Access::is_write).collect()
    }

    pub fn pushed(&self, fifo: Fifo) -> Vec<u32> {
        self.log
            .iter()
            .filter_map(|a| match a {
                Access::Cfpr(f, cmd) if *f == fifo => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    pub fn responses_available(&self, fifo: Fifo) -> usize {
        self.results[fifo.index()].len()
    }

    /// Value of an internal ADC register once every queued command ran.
    pub fn adc_register(&mut self, unit: Unit, reg: AdcRegister) -> u16 {
        for fifo in Fifo::ALL {
            while self.execute_one(fifo) {}
        }
        self.adc_regs[unit.index()][reg.addr() as usize]
    }

    fn execute_one(&mut self, fifo: Fifo) -> bool {
        let Some(raw) = self.pending[fifo.index()].pop_front() else {
            return false;
        };
        let cmd = CommandWord::from_raw(raw);
        let unit = cmd.unit().index();
        let addr = (raw & 0xFF) as usize;
        let tag = ((raw >> 20) & 0xF) as usize;

        if addr == 0 {
            let channel = ((raw >> 8) & 0xFF) as u8;
            let (res25, res75) = self.vref_codes[unit];
            let code = match channel {
                CHANNEL_VREF_25 => res25,
                CHANNEL_VREF_75 => res75,
                _ => 0,
            };
            self.push_result(tag, code);
        } else if cmd.is_read() {
            let value = self.adc_regs[unit][addr];
            self.push_result(tag, value);
        } else {
            self.adc_regs[unit][addr] = ((raw >> 8) & 0xFFFF) as u16;
        }
        true
    }

    fn push_result(&mut self, tag: usize, value: u16) {
        self.results[tag].push_back(value as u32);
        self.flags[tag] |= fisr::RFDF;
    }
}

impl RegisterBlock for SimEqadc {
    fn write_cfcr(&mut self, fifo: Fifo, value: u16) {
        self.log.push(Access::Cfcr(fifo, value));
    }

    fn write_idcr(&mut self, fifo: Fifo, value: u16) {
        self.log.push(Access::Idcr(fifo, value));
    }

    fn read_fisr(&mut self, fifo: Fifo) -> u32 {
        self.log.push(Access::FisrRead(fifo));
        if !self.stalled {
            self.execute_one(fifo);
        }
        let i = fifo.index();
        let cfctr = self.pending[i].len() as u32;
        let rfctr = self.results[i].len() as u32;
        self.flags[i] | (cfctr << 12) | (rfctr << 4)
    }

    fn write_fisr(&mut self, fifo: Fifo, value: u32) {
        self.log.push(Access::Fisr(fifo, value));
        self.flags[fifo.index()] &= !(value & fisr::CLEAR_MASK);
    }

    fn write_cftcr(&mut self, fifo: Fifo, value: u16) {
        self.log.push(Access::Cftcr(fifo, value));
    }

    fn write_cfpr(&mut self, fifo: Fifo, command: u32) {
        let queue = &mut self.pending[fifo.index()];
        assert!(
            (queue.len() as u32) < CFIFO_DEPTH,
            "push into a full CFIFO{}",
            fifo.index()
        );
        queue.push_back(command);
        self.max_pending = self.max_pending.max(queue.len() as u32);
        self.log.push(Access::Cfpr(fifo, command));
    }

    fn read_rfpr(&mut self, fifo: Fifo) -> u32 {
        self.log.push(Access::RfprRead(fifo));
        self.results[fifo.index()].pop_front().unwrap_or(0)
    }

    fn read_cfsr(&mut self) -> u32 {
        self.log.push(Access::CfsrRead);
        self.cfsr_reads += 1;
        let mut status = 0;
        for fifo in Fifo::ALL {
            if !self.stalled {
                self.execute_one(fifo);
            }
            let i = fifo.index();
            let draining = !self.pending[i].is_empty();
            if self.busy_polls[i] > 0 || draining {
                self.busy_polls[i] = self.busy_polls[i].saturating_sub(1);
                status |= crate::regs::cfsr::status_mask(fifo);
            }
        }
        status
    }
}
