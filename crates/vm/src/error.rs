//! Fatal script errors.
//!
//! None of these crash the simulation. A script that hits one is marked
//! finished, the error is kept on its cursor for inspection, and the
//! owning actor simply stops being driven. Every variant carries the
//! instruction index (`at`) where it happened.

use thiserror::Error;

/// Conditions that end a script early.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// `Call` to a label the program never declared.
    #[error("unknown subroutine '{label}' at instruction {at}")]
    UnknownSubroutine { at: usize, label: String },

    /// `Return` with an empty call stack.
    #[error("return without call at instruction {at}")]
    ReturnWithoutCall { at: usize },

    /// The same instruction was revisited too often within one update.
    #[error("runaway dispatch: instruction {at} visited {visits} times in one tick")]
    RunawayDispatch { at: usize, visits: u32 },

    /// Nested calls exceeded the call-depth limit.
    #[error("call stack overflow (depth {depth}) at instruction {at}")]
    CallStackOverflow { at: usize, depth: usize },

    /// Nested loops exceeded the loop-depth limit.
    #[error("loop stack overflow (depth {depth}) at instruction {at}")]
    LoopStackOverflow { at: usize, depth: usize },
}

impl ScriptError {
    /// Instruction index the error occurred at.
    pub fn at(&self) -> usize {
        match self {
            ScriptError::UnknownSubroutine { at, .. }
            | ScriptError::ReturnWithoutCall { at }
            | ScriptError::RunawayDispatch { at, .. }
            | ScriptError::CallStackOverflow { at, .. }
            | ScriptError::LoopStackOverflow { at, .. } => *at,
        }
    }
}
