//! eQADC register block access.
//!
//! [`RegisterBlock`] is the only path from the driver to the hardware. The
//! driver never computes addresses itself; [`Mmio`] owns the register map.

use core::ptr;

use crate::eqadc::Fifo;

/// Base address of the eQADC module on SPC5xx / MPC55xx parts.
pub const EQADC_BASE: usize = 0xFFF8_0000;

const CFPR_OFFSET: usize = 0x010;
const RFPR_OFFSET: usize = 0x030;
const CFCR_OFFSET: usize = 0x050;
const IDCR_OFFSET: usize = 0x060;
const FISR_OFFSET: usize = 0x070;
const CFTCR_OFFSET: usize = 0x090;
const CFSR_OFFSET: usize = 0x0AC;

/// CFIFO control register (`CFCR`) fields.
pub mod cfcr {
    /// Continuous-scan end-of-queue interrupt enable.
    pub const CFEEE0: u16 = 1 << 12;
    /// Streaming mode enable.
    pub const STRME0: u16 = 1 << 11;
    /// Single-scan enable.
    pub const SSE: u16 = 1 << 10;
    /// CFIFO invalidate. Self-clearing.
    pub const CFINV: u16 = 1 << 9;

    pub const fn mode(mode: u16) -> u16 {
        (mode & 0xF) << 4
    }

    pub const MODE_MASK: u16 = mode(0xF);
    pub const MODE_DISABLED: u16 = mode(0);
    /// Software trigger, single scan.
    pub const MODE_SWSS: u16 = mode(1);
    /// Software trigger, continuous scan.
    pub const MODE_SWCS: u16 = mode(9);
}

/// FIFO and interrupt status register (`FISR`) fields.
pub mod fisr {
    /// Non-coherency flag.
    pub const NCF: u32 = 1 << 31;
    /// Trigger overrun flag.
    pub const TORF: u32 = 1 << 30;
    /// Pause flag.
    pub const PF: u32 = 1 << 29;
    /// End-of-queue flag.
    pub const EOQF: u32 = 1 << 28;
    /// CFIFO underflow flag.
    pub const CFUF: u32 = 1 << 27;
    /// Single-scan status, read only.
    pub const SSS: u32 = 1 << 26;
    /// CFIFO fill flag.
    pub const CFFF: u32 = 1 << 25;
    /// RFIFO overflow flag.
    pub const RFOF: u32 = 1 << 19;
    /// RFIFO drain flag.
    pub const RFDF: u32 = 1 << 17;

    /// Every write-one-to-clear flag of the register.
    pub const CLEAR_MASK: u32 = NCF | TORF | PF | EOQF | CFUF | RFOF | RFDF;

    /// Commands waiting in the CFIFO.
    pub const fn cfctr(fisr: u32) -> u32 {
        (fisr >> 12) & 0xF
    }

    /// Results waiting in the RFIFO.
    pub const fn rfctr(fisr: u32) -> u32 {
        (fisr >> 4) & 0xF
    }
}

/// CFIFO status register (`CFSR`) fields.
pub mod cfsr {
    use crate::eqadc::Fifo;

    /// Two status bits per CFIFO, FIFO 0 in the top bits. Zero means idle.
    pub const fn status_mask(fifo: Fifo) -> u32 {
        0xC000_0000 >> (fifo.index() * 2)
    }
}

/// Typed access to the eQADC registers used by the driver core.
///
/// Reads take `&mut self`: popping `RFPR` has a side effect on the hardware.
pub trait RegisterBlock {
    fn write_cfcr(&mut self, fifo: Fifo, value: u16);
    fn write_idcr(&mut self, fifo: Fifo, value: u16);
    fn read_fisr(&mut self, fifo: Fifo) -> u32;
    fn write_fisr(&mut self, fifo: Fifo, value: u32);
    fn write_cftcr(&mut self, fifo: Fifo, value: u16);
    fn write_cfpr(&mut self, fifo: Fifo, command: u32);
    fn read_rfpr(&mut self, fifo: Fifo) -> u32;
    fn read_cfsr(&mut self) -> u32;
}

impl<R: RegisterBlock + ?Sized> RegisterBlock for &mut R {
    fn write_cfcr(&mut self, fifo: Fifo, value: u16) {
        (**self).write_cfcr(fifo, value)
    }

    fn write_idcr(&mut self, fifo: Fifo, value: u16) {
        (**self).write_idcr(fifo, value)
    }

    fn read_fisr(&mut self, fifo: Fifo) -> u32 {
        (**self).read_fisr(fifo)
    }

    fn write_fisr(&mut self, fifo: Fifo, value: u32) {
        (**self).write_fisr(fifo, value)
    }

    fn write_cftcr(&mut self, fifo: Fifo, value: u16) {
        (**self).write_cftcr(fifo, value)
    }

    fn write_cfpr(&mut self, fifo: Fifo, command: u32) {
        (**self).write_cfpr(fifo, command)
    }

    fn read_rfpr(&mut self, fifo: Fifo) -> u32 {
        (**self).read_rfpr(fifo)
    }

    fn read_cfsr(&mut self) -> u32 {
        (**self).read_cfsr()
    }
}

/// Memory-mapped eQADC register block.
pub struct Mmio {
    base: usize,
}

// SAFETY: the block is a fixed hardware resource; `&mut self` on every access
// serializes users of one `Mmio` value.
unsafe impl Send for Mmio {}

impl Mmio {
    /// Creates an accessor for the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must be the address of an eQADC module and the caller must not
    /// create a second accessor for the same module while this one is alive.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Accessor for the on-chip module at [`EQADC_BASE`].
    ///
    /// # Safety
    ///
    /// Same contract as [`Mmio::new`].
    pub const unsafe fn steal() -> Self {
        Self::new(EQADC_BASE)
    }

    #[inline(always)]
    fn reg32(&self, offset: usize, fifo: Fifo) -> *mut u32 {
        (self.base + offset + fifo.index() * 4) as *mut u32
    }

    #[inline(always)]
    fn reg16(&self, offset: usize, fifo: Fifo) -> *mut u16 {
        (self.base + offset + fifo.index() * 2) as *mut u16
    }
}

impl RegisterBlock for Mmio {
    fn write_cfcr(&mut self, fifo: Fifo, value: u16) {
        // SAFETY: address inside the module, see `Mmio::new`.
        unsafe { ptr::write_volatile(self.reg16(CFCR_OFFSET, fifo), value) }
    }

    fn write_idcr(&mut self, fifo: Fifo, value: u16) {
        unsafe { ptr::write_volatile(self.reg16(IDCR_OFFSET, fifo), value) }
    }

    fn read_fisr(&mut self, fifo: Fifo) -> u32 {
        unsafe { ptr::read_volatile(self.reg32(FISR_OFFSET, fifo)) }
    }

    fn write_fisr(&mut self, fifo: Fifo, value: u32) {
        unsafe { ptr::write_volatile(self.reg32(FISR_OFFSET, fifo), value) }
    }

    fn write_cftcr(&mut self, fifo: Fifo, value: u16) {
        unsafe { ptr::write_volatile(self.reg16(CFTCR_OFFSET, fifo), value) }
    }

    fn write_cfpr(&mut self, fifo: Fifo, command: u32) {
        unsafe { ptr::write_volatile(self.reg32(CFPR_OFFSET, fifo), command) }
    }

    fn read_rfpr(&mut self, fifo: Fifo) -> u32 {
        unsafe { ptr::read_volatile(self.reg32(RFPR_OFFSET, fifo)) }
    }

    fn read_cfsr(&mut self) -> u32 {
        unsafe { ptr::read_volatile((self.base + CFSR_OFFSET) as *const u32) }
    }
}
