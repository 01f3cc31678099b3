//! Cooperative task table
//!
//! Fixed slot table driven by a periodic tick. `tick()` only counts down and
//! flags due slots, so it is cheap enough for the SysTick handler; `run()`
//! invokes the flagged callbacks from the main loop.
//!
//! Author: Moroya Sakamoto

use log::{debug, trace, warn};

use crate::config::{Word, MAX_TASKS};
use crate::error::{check_id, Error, Result};
use crate::task::{Params, Slot, TaskFn};

/// A due slot captured for invocation
pub(crate) struct Due {
    func: TaskFn,
    params: Params,
    /// The slot was cleared because this was its last cycle
    finished: bool,
}

/// Task table
///
/// Static slot array, no dynamic allocation. Slots are addressed by id
/// `0..MAX_TASKS`; the caller picks the id (`set`) or lets the table pick the
/// lowest free one (`spawn`).
///
/// The public mutators log their outcome. The `pub(crate)` ones below them do
/// not, so `SharedScheduler` can log after leaving its critical section.
pub struct Scheduler {
    /// Static slot table
    slots: [Slot; MAX_TASKS],
}

impl Scheduler {
    /// Create a table with every slot empty
    pub const fn new() -> Self {
        Self {
            slots: [Slot::empty(); MAX_TASKS],
        }
    }

    /// Clear every slot
    pub fn init(&mut self) {
        self.slots = [Slot::empty(); MAX_TASKS];
    }

    /// Arm slot `id` from a raw count-prefixed parameter block
    ///
    /// Re-arming an active slot discards its progress and any pending firing.
    /// `parameters: None` leaves the callback with an empty block.
    pub fn set(
        &mut self,
        id: usize,
        function: TaskFn,
        parameters: Option<&[Word]>,
        cycles: u32,
        time_period: u32,
    ) -> Result<()> {
        let result = self.arm_block(id, function, parameters, cycles, time_period);
        log_armed(id, cycles, time_period, &result);
        result
    }

    /// Arm slot `id` with an already built parameter block
    pub fn set_params(
        &mut self,
        id: usize,
        function: TaskFn,
        params: Params,
        cycles: u32,
        time_period: u32,
    ) -> Result<()> {
        let result = self.arm(id, function, params, cycles, time_period);
        log_armed(id, cycles, time_period, &result);
        result
    }

    /// Arm the lowest empty slot, returns its id
    pub fn spawn(
        &mut self,
        function: TaskFn,
        parameters: Option<&[Word]>,
        cycles: u32,
        time_period: u32,
    ) -> Result<usize> {
        let result = self.arm_free(function, parameters, cycles, time_period);
        log_spawned(cycles, time_period, &result);
        result
    }

    /// Clear slot `id`, dropping any pending firing
    pub fn unset(&mut self, id: usize) -> Result<()> {
        let result = self.clear(id);
        log_unset(id, &result);
        result.map(|_| ())
    }

    /// Advance every armed slot by one tick
    ///
    /// Never invokes a callback and never logs; safe for interrupt context.
    /// Returns the number of slots that became due.
    pub fn tick(&mut self) -> usize {
        let mut due = 0;
        for slot in self.slots.iter_mut() {
            if slot.countdown() {
                due += 1;
            }
        }
        due
    }

    /// Invoke every due callback in ascending slot order
    ///
    /// Returns the number of callbacks invoked.
    pub fn run(&mut self) -> usize {
        let mut invoked = 0;
        for id in 0..MAX_TASKS {
            if let Some(due) = self.take_due(id) {
                invoke(id, due);
                invoked += 1;
            }
        }
        invoked
    }

    pub(crate) fn arm(
        &mut self,
        id: usize,
        function: TaskFn,
        params: Params,
        cycles: u32,
        time_period: u32,
    ) -> Result<()> {
        let id = check_id(id)?;
        if time_period == 0 {
            return Err(Error::ZeroPeriod);
        }
        self.slots[id] = Slot::armed(function, params, cycles, time_period);
        Ok(())
    }

    pub(crate) fn arm_block(
        &mut self,
        id: usize,
        function: TaskFn,
        parameters: Option<&[Word]>,
        cycles: u32,
        time_period: u32,
    ) -> Result<()> {
        let id = check_id(id)?;
        let params = match parameters {
            Some(block) => Params::from_block(block)?,
            None => Params::empty(),
        };
        self.arm(id, function, params, cycles, time_period)
    }

    pub(crate) fn arm_free(
        &mut self,
        function: TaskFn,
        parameters: Option<&[Word]>,
        cycles: u32,
        time_period: u32,
    ) -> Result<usize> {
        let id = self
            .slots
            .iter()
            .position(|s| !s.is_active())
            .ok_or(Error::TableFull)?;
        self.arm_block(id, function, parameters, cycles, time_period)?;
        Ok(id)
    }

    /// Empty slot `id`; returns whether it was active
    pub(crate) fn clear(&mut self, id: usize) -> Result<bool> {
        let id = check_id(id)?;
        let was_active = self.slots[id].is_active();
        self.slots[id] = Slot::empty();
        Ok(was_active)
    }

    /// Capture a due slot's callback and clear its due flag
    pub(crate) fn take_due(&mut self, id: usize) -> Option<Due> {
        let slot = self.slots.get_mut(id)?;
        let (func, params) = slot.take_due()?;
        Some(Due {
            func,
            params,
            finished: !slot.is_active(),
        })
    }

    /// Is slot `id` active?
    pub fn is_running(&self, id: usize) -> Result<bool> {
        Ok(self.slots[check_id(id)?].is_active())
    }

    /// Freeze the countdown of slot `id`
    ///
    /// A firing that is already due still runs.
    pub fn suspend(&mut self, id: usize) -> Result<()> {
        let slot = &mut self.slots[check_id(id)?];
        if slot.is_active() {
            slot.suspended = true;
        }
        Ok(())
    }

    /// Resume a suspended slot where its countdown stopped
    pub fn resume(&mut self, id: usize) -> Result<()> {
        self.slots[check_id(id)?].suspended = false;
        Ok(())
    }

    /// Get slot by id
    pub fn slot(&self, id: usize) -> Result<&Slot> {
        Ok(&self.slots[check_id(id)?])
    }

    /// Number of active slots
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// Number of slots waiting for `run()`
    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_due()).count()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Call a captured task
pub(crate) fn invoke(id: usize, due: Due) {
    trace!("task {id} run");
    (due.func)(&due.params);
    if due.finished {
        debug!("task {id} finished its cycles");
    }
}

pub(crate) fn log_armed(id: usize, cycles: u32, time_period: u32, result: &Result<()>) {
    match result {
        Ok(()) => debug!("task {id} armed: period {time_period} ticks, cycles {cycles}"),
        Err(e) => warn!("set rejected: {e}"),
    }
}

pub(crate) fn log_spawned(cycles: u32, time_period: u32, result: &Result<usize>) {
    match result {
        Ok(id) => debug!("task {id} spawned: period {time_period} ticks, cycles {cycles}"),
        Err(e) => warn!("spawn rejected: {e}"),
    }
}

pub(crate) fn log_unset(id: usize, result: &Result<bool>) {
    match result {
        Ok(true) => debug!("task {id} unset"),
        Ok(false) => {}
        Err(e) => warn!("unset rejected: {e}"),
    }
}
