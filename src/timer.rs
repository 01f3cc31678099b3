//! System tick — uptime bookkeeping for the task table
//!
//! Counts ticks of the board's periodic timer (SysTick, programmed for
//! `TICK_HZ`) and converts between milliseconds and ticks.
//!
//! Author: Moroya Sakamoto

use crate::config::TICK_HZ;

const _: () = assert!(TICK_HZ <= 1000 && 1000 % TICK_HZ == 0, "TICK_HZ must divide 1000");

const MS_PER_TICK: u32 = 1000 / TICK_HZ;

/// Tick counter
pub struct SysTick {
    /// Ticks since boot
    ticks: u64,
}

impl SysTick {
    /// Counter at zero
    pub const fn new() -> Self {
        Self { ticks: 0 }
    }

    /// Advance by `n` ticks
    pub fn advance(&mut self, n: u64) {
        self.ticks = self.ticks.wrapping_add(n);
    }

    /// Ticks since boot
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Uptime in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.ticks * MS_PER_TICK as u64
    }

    /// Back to zero
    pub fn reset(&mut self) {
        self.ticks = 0;
    }
}

impl Default for SysTick {
    fn default() -> Self {
        Self::new()
    }
}

/// Milliseconds to ticks, rounded up so a period is never shorter than asked
pub fn ms_to_ticks(ms: u32) -> u32 {
    ms.div_ceil(MS_PER_TICK)
}

/// Ticks to milliseconds (saturating)
pub fn ticks_to_ms(ticks: u32) -> u32 {
    ticks.saturating_mul(MS_PER_TICK)
}
