//! Task slot — static, no-alloc task descriptors
//!
//! Each slot holds a callback, its parameter block, and the countdown
//! that decides when the callback is next due.
//!
//! Author: Moroya Sakamoto

use crate::config::{Word, MAX_PARAMS};
use crate::error::{Error, Result};

/// Task function pointer — called from the main loop each time the slot is due
pub type TaskFn = fn(&Params);

/// Count-prefixed parameter block
///
/// Word 0 holds the number of argument words that follow it. The block is
/// copied into the slot, so callers may reuse their buffer after `set`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Params {
    words: [Word; MAX_PARAMS],
    /// Words in use, count word included (0 for an empty block)
    len: usize,
}

impl Params {
    /// Block with no arguments
    pub const fn empty() -> Self {
        Self {
            words: [0; MAX_PARAMS],
            len: 0,
        }
    }

    /// Build a block from arguments, prepending the count word
    pub fn new(args: &[Word]) -> Result<Self> {
        if args.len() + 1 > MAX_PARAMS {
            return Err(Error::MalformedParams {
                declared: args.len(),
                available: MAX_PARAMS - 1,
            });
        }
        let mut words = [0; MAX_PARAMS];
        words[0] = args.len() as Word;
        words[1..=args.len()].copy_from_slice(args);
        Ok(Self {
            words,
            len: args.len() + 1,
        })
    }

    /// Parse a raw count-prefixed block
    ///
    /// `block[0]` is the argument count; words `0..=count` are copied.
    pub fn from_block(block: &[Word]) -> Result<Self> {
        let Some(&count) = block.first() else {
            return Err(Error::MalformedParams {
                declared: 0,
                available: 0,
            });
        };
        let count = count as usize;
        let available = block.len() - 1;
        if count > available || count + 1 > MAX_PARAMS {
            return Err(Error::MalformedParams {
                declared: count,
                available: available.min(MAX_PARAMS - 1),
            });
        }
        let mut words = [0; MAX_PARAMS];
        words[..=count].copy_from_slice(&block[..=count]);
        Ok(Self {
            words,
            len: count + 1,
        })
    }

    /// Number of argument words
    pub fn count(&self) -> usize {
        self.len.saturating_sub(1)
    }

    /// No argument words?
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Argument words, without the count prefix
    pub fn args(&self) -> &[Word] {
        if self.len == 0 {
            &[]
        } else {
            &self.words[1..self.len]
        }
    }

    /// The block as stored, count word first
    pub fn as_block(&self) -> &[Word] {
        &self.words[..self.len]
    }

    /// Argument `i` (zero-based, after the count word)
    pub fn get(&self, i: usize) -> Option<Word> {
        self.args().get(i).copied()
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::empty()
    }
}

impl core::fmt::Debug for Params {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.args()).finish()
    }
}

/// Slot lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Slot is unused
    Empty,
    /// Counting down towards the next firing
    Armed,
    /// Countdown reached zero, waiting for `run()`
    Due,
    /// Active, but the countdown is frozen
    Suspended,
}

/// Static task slot, no heap
#[derive(Clone, Copy)]
pub struct Slot {
    /// Callback (`None` = empty slot)
    pub(crate) func: Option<TaskFn>,
    /// Parameter block handed to the callback
    pub(crate) params: Params,
    /// Total firings, 0 = forever
    pub(crate) cycles: u32,
    /// Firings counted so far
    pub(crate) current_cycle: u32,
    /// Countdown reload value (ticks)
    pub(crate) time_period: u32,
    /// Live countdown (ticks)
    pub(crate) time_current: u32,
    /// Due flag, set by `tick()`, cleared by `run()`
    pub(crate) execute: bool,
    pub(crate) suspended: bool,
}

impl Slot {
    /// Empty slot
    pub const fn empty() -> Self {
        Self {
            func: None,
            params: Params::empty(),
            cycles: 0,
            current_cycle: 0,
            time_period: 0,
            time_current: 0,
            execute: false,
            suspended: false,
        }
    }

    /// Freshly armed slot; the first firing is `time_period` ticks away
    pub(crate) fn armed(func: TaskFn, params: Params, cycles: u32, time_period: u32) -> Self {
        Self {
            func: Some(func),
            params,
            cycles,
            current_cycle: 0,
            time_period,
            time_current: time_period,
            execute: false,
            suspended: false,
        }
    }

    /// One tick of countdown. Returns true when the slot became due.
    #[inline]
    pub(crate) fn countdown(&mut self) -> bool {
        if self.func.is_none() || self.execute || self.suspended {
            return false;
        }
        self.time_current -= 1;
        if self.time_current != 0 {
            return false;
        }
        self.execute = true;
        self.time_current = self.time_period;
        if self.cycles != 0 {
            self.current_cycle += 1;
        }
        true
    }

    /// Capture the callback of a due slot and clear its due flag
    ///
    /// A finite task whose last cycle was just counted is cleared here, after
    /// its callback has been captured, so the final firing still runs.
    pub(crate) fn take_due(&mut self) -> Option<(TaskFn, Params)> {
        if !self.execute {
            return None;
        }
        self.execute = false;
        let func = self.func?;
        let params = self.params;
        if self.is_exhausted() {
            *self = Self::empty();
        }
        Some((func, params))
    }

    /// Is this slot active?
    pub fn is_active(&self) -> bool {
        self.func.is_some()
    }

    /// Is the callback waiting for `run()`?
    pub fn is_due(&self) -> bool {
        self.execute
    }

    /// Lifecycle state derived from the callback and flags
    pub fn state(&self) -> SlotState {
        if self.func.is_none() {
            SlotState::Empty
        } else if self.execute {
            SlotState::Due
        } else if self.suspended {
            SlotState::Suspended
        } else {
            SlotState::Armed
        }
    }

    /// Parameter block handed to the callback
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Total firings (0 = run forever)
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Firings counted so far
    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    /// Firings left, `None` for a task that runs forever
    pub fn remaining_cycles(&self) -> Option<u32> {
        if self.cycles == 0 {
            None
        } else {
            Some(self.cycles - self.current_cycle)
        }
    }

    /// Countdown reload value (ticks)
    pub fn time_period(&self) -> u32 {
        self.time_period
    }

    /// Ticks until the next firing
    pub fn time_current(&self) -> u32 {
        self.time_current
    }

    fn is_exhausted(&self) -> bool {
        self.cycles != 0 && self.current_cycle >= self.cycles
    }
}

impl core::fmt::Debug for Slot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Slot")
            .field("state", &self.state())
            .field("params", &self.params)
            .field("cycles", &self.cycles)
            .field("current_cycle", &self.current_cycle)
            .field("time_period", &self.time_period)
            .field("time_current", &self.time_current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_task(_params: &Params) {}

    #[test]
    fn test_empty_slot() {
        let slot = Slot::empty();
        assert!(!slot.is_active());
        assert_eq!(slot.state(), SlotState::Empty);
    }

    #[test]
    fn test_armed_slot() {
        let slot = Slot::armed(dummy_task, Params::empty(), 0, 10);
        assert!(slot.is_active());
        assert_eq!(slot.state(), SlotState::Armed);
        assert_eq!(slot.time_current(), 10);
        assert_eq!(slot.remaining_cycles(), None);
    }

    #[test]
    fn test_countdown_reloads() {
        let mut slot = Slot::armed(dummy_task, Params::empty(), 0, 2);
        assert!(!slot.countdown());
        assert!(slot.countdown());
        assert_eq!(slot.state(), SlotState::Due);
        assert_eq!(slot.time_current(), 2);

        // Frozen while due
        assert!(!slot.countdown());
        assert_eq!(slot.time_current(), 2);
    }

    #[test]
    fn test_take_due_keeps_final_firing() {
        let mut slot = Slot::armed(dummy_task, Params::new(&[7]).unwrap(), 1, 1);
        assert!(slot.countdown());
        assert!(slot.is_active());

        let (_, params) = slot.take_due().unwrap();
        assert_eq!(params.args(), &[7]);
        assert!(!slot.is_active());
        assert!(slot.take_due().is_none());
    }

    #[test]
    fn test_params_from_block() {
        let p = Params::from_block(&[2, 10, 20, 99]).unwrap();
        assert_eq!(p.count(), 2);
        assert_eq!(p.as_block(), &[2, 10, 20]);
        assert_eq!(p.args(), &[10, 20]);
        assert_eq!(p.get(1), Some(20));
        assert_eq!(p.get(2), None);
    }

    #[test]
    fn test_params_from_block_rejects_short_buffer() {
        assert_eq!(
            Params::from_block(&[3, 1]),
            Err(Error::MalformedParams { declared: 3, available: 1 })
        );
        assert!(Params::from_block(&[]).is_err());
    }

    #[test]
    fn test_params_from_block_rejects_oversize() {
        let block = [MAX_PARAMS as Word; MAX_PARAMS + 1];
        assert!(Params::from_block(&block).is_err());
    }

    #[test]
    fn test_params_new() {
        let p = Params::new(&[5, 6]).unwrap();
        assert_eq!(p.as_block(), &[2, 5, 6]);
        assert!(Params::new(&[0; MAX_PARAMS]).is_err());
        assert!(Params::empty().is_empty());
        assert_eq!(Params::empty().args(), &[] as &[Word]);
    }
}
