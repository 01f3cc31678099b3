//! Compile-time configuration
//!
//! All limits are fixed at build time. The task table is a static array,
//! so changing these changes the RAM footprint of the scheduler.
//!
//! Author: Moroya Sakamoto

/// Maximum tasks the table can hold (slot ids are `0..MAX_TASKS`)
pub const MAX_TASKS: usize = 16;

/// Parameter block capacity in words, including the leading count word
pub const MAX_PARAMS: usize = 8;

/// Tick source frequency in Hz. One tick is the unit of `time_period`.
///
/// The board's SysTick is programmed for 1 ms.
pub const TICK_HZ: u32 = 1000;

/// Parameter word, the native register width of the target
pub type Word = u32;
