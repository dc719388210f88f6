//! Errors raised while building program tapes.

use thiserror::Error;

/// Errors that occur when a [`ProgramBuilder`](crate::ProgramBuilder) is finished.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgramError {
    /// The same label was declared twice.
    #[error("duplicate label '{label}' at instruction {second} (first declared at {first})")]
    DuplicateLabel {
        label: String,
        first: usize,
        second: usize,
    },

    /// A label with an empty name.
    #[error("empty label at instruction {at}")]
    EmptyLabel { at: usize },
}
