//! Command FIFO controller.
//!
//! Every wait is bounded by the configured poll budget. The RFIFO side is
//! only touched through [`CommandFifo::wait_for_responses`] and
//! [`CommandFifo::read_response`].

use super::command::{AdcRegister, CommandWord};
use super::shared::{poll_until, CFIFO_DEPTH};
use super::types::{Error, Fifo, Unit};
use crate::regs::{cfcr, cfsr, fisr, RegisterBlock};

pub struct CommandFifo<'a, R: RegisterBlock> {
    regs: &'a mut R,
    fifo: Fifo,
    max_polls: u32,
}

impl<'a, R: RegisterBlock> CommandFifo<'a, R> {
    pub fn new(regs: &'a mut R, fifo: Fifo, max_polls: u32) -> Self {
        Self {
            regs,
            fifo,
            max_polls,
        }
    }

    pub fn fifo(&self) -> Fifo {
        self.fifo
    }

    /// Programs `CFCR` and `IDCR`.
    pub fn enable(&mut self, cfcr: u16, idcr: u16) {
        trace!("cfifo{}: enable cfcr={:#x} idcr={:#x}", self.fifo.index(), cfcr, idcr);
        self.regs.write_cfcr(self.fifo, cfcr);
        self.regs.write_idcr(self.fifo, idcr);
    }

    /// Disables the FIFO and the resources tied to it.
    ///
    /// Runs the full sequence even if the FIFO is already disabled. On an
    /// idle timeout the FIFO is left disabled but not invalidated.
    pub fn disable(&mut self) -> Result<(), Error> {
        let fifo = self.fifo;
        trace!("cfifo{}: disable", fifo.index());

        self.regs.write_cfcr(fifo, cfcr::MODE_DISABLED);
        self.regs.write_idcr(fifo, 0);

        let mask = cfsr::status_mask(fifo);
        let regs = &mut *self.regs;
        if !poll_until(self.max_polls, || regs.read_cfsr() & mask == 0) {
            warn!("cfifo{}: not idle after {} polls", fifo.index(), self.max_polls);
            return Err(Error::QueueIdleTimeout);
        }

        self.regs.write_cfcr(fifo, cfcr::CFINV | cfcr::MODE_DISABLED);
        self.regs.write_fisr(fifo, fisr::CLEAR_MASK);
        self.regs.write_cftcr(fifo, 0);
        Ok(())
    }

    /// Pushes `cmd`, waiting while the FIFO already holds its full depth.
    pub fn push_command(&mut self, cmd: CommandWord) -> Result<(), Error> {
        let fifo = self.fifo;
        let regs = &mut *self.regs;
        if !poll_until(self.max_polls, || fisr::cfctr(regs.read_fisr(fifo)) < CFIFO_DEPTH) {
            warn!("cfifo{}: full for {} polls", fifo.index(), self.max_polls);
            return Err(Error::QueuePushTimeout);
        }
        self.regs.write_cfpr(fifo, cmd.raw());
        Ok(())
    }

    /// Waits until the RFIFO holds at least `n` results, then clears every
    /// flag of the FIFO.
    ///
    /// The clear is not limited to the drain flag: a FIFO shared with an
    /// unrelated user loses that user's flags too.
    pub fn wait_for_responses(&mut self, n: u32) -> Result<(), Error> {
        let fifo = self.fifo;
        let regs = &mut *self.regs;
        if !poll_until(self.max_polls, || fisr::rfctr(regs.read_fisr(fifo)) >= n) {
            warn!("rfifo{}: {} results not collected", fifo.index(), n);
            return Err(Error::ResponseTimeout);
        }
        self.regs.write_fisr(fifo, fisr::CLEAR_MASK);
        Ok(())
    }

    /// Pops one result. Only valid after [`Self::wait_for_responses`]
    /// accounted for it.
    pub fn read_response(&mut self) -> u16 {
        self.regs.read_rfpr(self.fifo) as u16
    }

    /// Queues a write of `value` into `reg` of `unit`. Not acknowledged.
    pub fn write_register(&mut self, unit: Unit, reg: AdcRegister, value: u16) -> Result<(), Error> {
        self.push_command(CommandWord::write(unit, reg, value))
    }

    /// Reads `reg` of `unit` back through this FIFO's RFIFO.
    pub fn read_register(&mut self, unit: Unit, reg: AdcRegister) -> Result<u16, Error> {
        self.push_command(CommandWord::read(unit, reg, self.fifo))?;
        self.wait_for_responses(1)?;
        Ok(self.read_response())
    }
}
