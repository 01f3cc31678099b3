//! Shared task table — interrupt-safe wrapper
//!
//! The SysTick handler and the main loop both touch the task table. Every
//! access goes through a `critical_section::Mutex`, and each operation holds
//! the critical section only for its own slot work. Logging and callbacks
//! happen after the section ends, with interrupts enabled; callbacks may
//! call back into the table.
//!
//! Author: Moroya Sakamoto

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::{Word, MAX_TASKS};
use crate::error::Result;
use crate::scheduler::{invoke, log_armed, log_spawned, log_unset, Scheduler};
use crate::task::{Params, Slot, TaskFn};

/// Task table shared between the tick interrupt and the main loop
///
/// Const-constructible, so it can live in a `static`.
pub struct SharedScheduler {
    inner: Mutex<RefCell<Scheduler>>,
}

impl SharedScheduler {
    /// Create a table with every slot empty
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Scheduler::new())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Scheduler) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Clear every slot
    pub fn init(&self) {
        self.with(|s| s.init());
    }

    /// Arm slot `id` from a raw count-prefixed parameter block
    pub fn set(
        &self,
        id: usize,
        function: TaskFn,
        parameters: Option<&[Word]>,
        cycles: u32,
        time_period: u32,
    ) -> Result<()> {
        let result = self.with(|s| s.arm_block(id, function, parameters, cycles, time_period));
        log_armed(id, cycles, time_period, &result);
        result
    }

    /// Arm slot `id` with an already built parameter block
    pub fn set_params(
        &self,
        id: usize,
        function: TaskFn,
        params: Params,
        cycles: u32,
        time_period: u32,
    ) -> Result<()> {
        let result = self.with(|s| s.arm(id, function, params, cycles, time_period));
        log_armed(id, cycles, time_period, &result);
        result
    }

    /// Arm the lowest empty slot, returns its id
    pub fn spawn(
        &self,
        function: TaskFn,
        parameters: Option<&[Word]>,
        cycles: u32,
        time_period: u32,
    ) -> Result<usize> {
        let result = self.with(|s| s.arm_free(function, parameters, cycles, time_period));
        log_spawned(cycles, time_period, &result);
        result
    }

    /// Clear slot `id`, dropping any pending firing
    pub fn unset(&self, id: usize) -> Result<()> {
        let result = self.with(|s| s.clear(id));
        log_unset(id, &result);
        result.map(|_| ())
    }

    /// Tick-context entry point
    pub fn tick(&self) -> usize {
        self.with(|s| s.tick())
    }

    /// Main-loop dispatch
    ///
    /// Each due slot is captured and cleared in its own critical section;
    /// the callback is invoked after the section ends.
    pub fn run(&self) -> usize {
        let mut invoked = 0;
        for id in 0..MAX_TASKS {
            if let Some(due) = self.with(|s| s.take_due(id)) {
                invoke(id, due);
                invoked += 1;
            }
        }
        invoked
    }

    /// Is slot `id` active?
    pub fn is_running(&self, id: usize) -> Result<bool> {
        self.with(|s| s.is_running(id))
    }

    /// Freeze the countdown of slot `id`
    pub fn suspend(&self, id: usize) -> Result<()> {
        self.with(|s| s.suspend(id))
    }

    /// Resume a suspended slot where its countdown stopped
    pub fn resume(&self, id: usize) -> Result<()> {
        self.with(|s| s.resume(id))
    }

    /// Snapshot of slot `id`
    pub fn slot(&self, id: usize) -> Result<Slot> {
        self.with(|s| s.slot(id).copied())
    }

    /// Number of active slots
    pub fn active_count(&self) -> usize {
        self.with(|s| s.active_count())
    }

    /// Number of slots waiting for `run()`
    pub fn pending_count(&self) -> usize {
        self.with(|s| s.pending_count())
    }
}

impl Default for SharedScheduler {
    fn default() -> Self {
        Self::new()
    }
}
