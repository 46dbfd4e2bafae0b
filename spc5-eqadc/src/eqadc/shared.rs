use core::hint::spin_loop;

/// Commands a CFIFO can hold before the pusher has to wait.
pub(super) const CFIFO_DEPTH: u32 = 4;
pub(super) const FIFO_COUNT: usize = 6;
pub(super) const DEFAULT_MAX_POLLS: u32 = 2_000_000;

pub(super) const DEFAULT_CLOCK_PRESCALER: u8 = 5;
pub(super) const MAX_CLOCK_PRESCALER: u8 = 0x1F;

/// Ideal conversion result for 75 % (VRH - VRL), minus 2.
pub(super) const IDEAL_RES75_MINUS_2: u32 = 12286;
/// Q14 gain numerator: `GCC = GAIN_NUMERATOR / (res75 - res25)`.
pub(super) const GAIN_NUMERATOR: u32 = 0x0800_0000;

/// Polls `done` up to `max_polls` times. Returns `false` if it never held.
#[inline]
pub(super) fn poll_until(max_polls: u32, mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..max_polls {
        if done() {
            return true;
        }
        spin_loop();
    }
    false
}
