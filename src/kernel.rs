//! Kernel — top-level board runtime
//!
//! Combines the shared task table with the uptime counter. The board wires
//! `systick()` to its 1 ms timer interrupt and calls `poll()` from the main
//! loop.
//!
//! ```ignore
//! static KERNEL: Kernel = Kernel::new();
//!
//! #[exception]
//! fn SysTick() {
//!     KERNEL.systick();
//! }
//!
//! fn main() -> ! {
//!     KERNEL.every_ms(blink_led, None, 500).unwrap();
//!     loop {
//!         KERNEL.poll();
//!     }
//! }
//! ```
//!
//! Author: Moroya Sakamoto

use core::cell::RefCell;

use critical_section::Mutex;
use log::debug;

use crate::config::Word;
use crate::error::Result;
use crate::sync::SharedScheduler;
use crate::task::TaskFn;
use crate::timer::{ms_to_ticks, SysTick};

/// Board kernel
///
/// Total memory footprint: the slot table plus an 8-byte tick counter.
pub struct Kernel {
    /// Task table
    pub scheduler: SharedScheduler,
    /// Uptime counter
    timer: Mutex<RefCell<SysTick>>,
}

impl Kernel {
    pub const fn new() -> Self {
        Self {
            scheduler: SharedScheduler::new(),
            timer: Mutex::new(RefCell::new(SysTick::new())),
        }
    }

    /// Clear every task and reset uptime
    pub fn init(&self) {
        self.scheduler.init();
        critical_section::with(|cs| self.timer.borrow_ref_mut(cs).reset());
        debug!("kernel initialised");
    }

    /// Timer interrupt entry point
    ///
    /// Returns the number of slots that became due.
    pub fn systick(&self) -> usize {
        critical_section::with(|cs| self.timer.borrow_ref_mut(cs).advance(1));
        self.scheduler.tick()
    }

    /// Main-loop pass: run every due task
    pub fn poll(&self) -> usize {
        self.scheduler.run()
    }

    /// Arm a task that runs forever every `period_ms`
    pub fn every_ms(&self, function: TaskFn, parameters: Option<&[Word]>, period_ms: u32) -> Result<usize> {
        let ticks = ms_to_ticks(period_ms).max(1);
        self.scheduler.spawn(function, parameters, 0, ticks)
    }

    /// Arm a one-shot task that runs once after `delay_ms`
    pub fn after_ms(&self, function: TaskFn, parameters: Option<&[Word]>, delay_ms: u32) -> Result<usize> {
        let ticks = ms_to_ticks(delay_ms).max(1);
        self.scheduler.spawn(function, parameters, 1, ticks)
    }

    /// Ticks since `init`
    pub fn uptime_ticks(&self) -> u64 {
        critical_section::with(|cs| self.timer.borrow_ref(cs).ticks())
    }

    /// Milliseconds since `init`
    pub fn uptime_ms(&self) -> u64 {
        critical_section::with(|cs| self.timer.borrow_ref(cs).now_ms())
    }

    /// Simulate `ticks` timer interrupts, polling after each (hosted testing)
    pub fn run_for(&self, ticks: u64) -> KernelStats {
        let mut invocations = 0u64;
        let mut peak_pending = 0usize;

        for _ in 0..ticks {
            self.systick();
            peak_pending = peak_pending.max(self.scheduler.pending_count());
            invocations += self.poll() as u64;
        }

        KernelStats {
            ticks,
            uptime_ticks: self.uptime_ticks(),
            invocations,
            peak_pending,
            active_tasks: self.scheduler.active_count(),
        }
    }

    /// Memory footprint estimate
    pub fn memory_footprint(&self) -> usize {
        core::mem::size_of::<Self>()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

/// Kernel execution statistics
#[derive(Debug, Clone)]
pub struct KernelStats {
    /// Ticks simulated in this run
    pub ticks: u64,
    /// Uptime after the run
    pub uptime_ticks: u64,
    /// Callbacks invoked
    pub invocations: u64,
    /// Most slots due at once
    pub peak_pending: usize,
    /// Slots still active at the end
    pub active_tasks: usize,
}
