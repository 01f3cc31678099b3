//! bsp-tasks — cooperative task table for retro-computing board support
//!
//! Tick-driven, fixed-slot scheduler for the board's housekeeping work
//! (LED blinking, serial polling, terminal refresh):
//! - Static slot table (no heap, no allocation)
//! - Periodic and finite-cycle tasks with count-prefixed parameter blocks
//! - `tick()` only flags due slots, so it is safe in the SysTick handler
//! - `run()` invokes due callbacks from the main loop, in slot order
//!
//! Author: Moroya Sakamoto

#![no_std]

pub mod config;
pub mod error;
pub mod task;
pub mod scheduler;
pub mod sync;
pub mod timer;
pub mod kernel;

pub use config::{Word, MAX_PARAMS, MAX_TASKS, TICK_HZ};
pub use error::{Error, ErrorKind, Result};
pub use task::{Params, Slot, SlotState, TaskFn};
pub use scheduler::Scheduler;
pub use sync::SharedScheduler;
pub use timer::SysTick;
pub use kernel::{Kernel, KernelStats};
