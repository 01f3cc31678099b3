//! Error taxonomy
//!
//! Misuse of the task table fails loudly through `Result` instead of
//! indexing past the slot array.
//!
//! Author: Moroya Sakamoto

use core::fmt;

use crate::config::{MAX_PARAMS, MAX_TASKS};

/// Broad failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller passed an id, period or parameter block the table cannot accept
    InvalidArgument,
    /// No free slot left
    ResourceExhausted,
}

/// Scheduler error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Slot id outside `0..MAX_TASKS`
    InvalidId { id: usize },
    /// Parameter block is empty, or its count word claims more words than
    /// were supplied or than a slot can hold
    MalformedParams { declared: usize, available: usize },
    /// `time_period` of zero ticks
    ZeroPeriod,
    /// Every slot is in use
    TableFull,
}

impl Error {
    /// Failure class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidId { .. } | Error::MalformedParams { .. } | Error::ZeroPeriod => {
                ErrorKind::InvalidArgument
            }
            Error::TableFull => ErrorKind::ResourceExhausted,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidId { id } => {
                write!(f, "task id {id} out of range (max {})", MAX_TASKS - 1)
            }
            Error::MalformedParams { declared, available } => write!(
                f,
                "parameter block declares {declared} words, {available} available (capacity {MAX_PARAMS})"
            ),
            Error::ZeroPeriod => f.write_str("task period must be at least one tick"),
            Error::TableFull => write!(f, "all {MAX_TASKS} task slots are in use"),
        }
    }
}

/// Scheduler result
pub type Result<T> = core::result::Result<T, Error>;

/// Validate a slot id
pub(crate) fn check_id(id: usize) -> Result<usize> {
    if id < MAX_TASKS {
        Ok(id)
    } else {
        Err(Error::InvalidId { id })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::string::ToString;

    #[test]
    fn test_kinds() {
        assert_eq!(Error::InvalidId { id: 99 }.kind(), ErrorKind::InvalidArgument);
        assert_eq!(Error::ZeroPeriod.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            Error::MalformedParams { declared: 9, available: 2 }.kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(Error::TableFull.kind(), ErrorKind::ResourceExhausted);
    }

    #[test]
    fn test_check_id_bounds() {
        assert_eq!(check_id(0), Ok(0));
        assert_eq!(check_id(MAX_TASKS - 1), Ok(MAX_TASKS - 1));
        assert_eq!(check_id(MAX_TASKS), Err(Error::InvalidId { id: MAX_TASKS }));
    }

    #[test]
    fn test_display() {
        let msg = Error::InvalidId { id: 42 }.to_string();
        assert!(msg.contains("42"));
        assert_eq!(Error::ZeroPeriod.to_string(), "task period must be at least one tick");
    }
}
