//! Execution cursor: the mutable per-actor state over a shared program.
//!
//! A cursor is the saved continuation of a script between ticks. `ip`,
//! `frame` and the per-address scratch map together say exactly where
//! the next update resumes; nothing else survives a tick.

use std::collections::HashMap;
use std::sync::Arc;

use danmaku_common::{OpKind, Program};
use glam::Vec2;
use tracing::warn;

use crate::error::ScriptError;

/// One open loop: where its `LoopStart` sits and how many passes remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopFrame {
    /// Index of the `LoopStart` instruction.
    pub return_ip: usize,
    /// Passes left, counting the one in progress.
    pub remaining: i32,
}

/// Instruction-local state kept across the ticks of one timed instruction.
///
/// Keyed by instruction address and dropped when that instruction's span
/// completes, so revisiting the address (e.g. in a loop) starts fresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scratch {
    /// A captured starting scalar (speed, heading, base angle).
    Start(f32),
    /// A captured starting position.
    Origin(Vec2),
    /// The wave offset currently applied on top of the heading.
    Wave { applied: f32 },
    /// A random sub-target and the local timer for reaching it.
    Leg {
        origin: Vec2,
        from: Vec2,
        target: Vec2,
        timer: i32,
        span: i32,
    },
    /// A yielded instruction that already raised its signal.
    Raised,
}

/// Mutable interpreter state bound to one immutable program.
#[derive(Debug)]
pub struct Cursor<K> {
    program: Arc<Program<K>>,
    pub(crate) ip: usize,
    pub(crate) frame: i32,
    pub(crate) loop_stack: Vec<LoopFrame>,
    pub(crate) call_stack: Vec<usize>,
    pub(crate) scratch: HashMap<usize, Scratch>,
    pub(crate) finished: bool,
    pub(crate) fault: Option<ScriptError>,
    /// Per-address visit counts for the current update only.
    pub(crate) visits: Vec<u32>,
}

impl<K: OpKind> Cursor<K> {
    /// Create a cursor at the start of `program`.
    pub fn new(program: Arc<Program<K>>) -> Self {
        Self {
            program,
            ip: 0,
            frame: 0,
            loop_stack: Vec::new(),
            call_stack: Vec::new(),
            scratch: HashMap::new(),
            finished: false,
            fault: None,
            visits: Vec::new(),
        }
    }

    /// A brand-new cursor over the same program.
    ///
    /// Progress is never copied: the result always starts at `ip = 0`
    /// with empty stacks and scratch, whatever state `self` is in.
    pub fn clone_fresh(&self) -> Self {
        Self::new(Arc::clone(&self.program))
    }

    pub fn program(&self) -> &Arc<Program<K>> {
        &self.program
    }

    /// Index of the next instruction to run.
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Ticks already spent in the current timed instruction.
    pub fn frame(&self) -> i32 {
        self.frame
    }

    pub fn loop_stack(&self) -> &[LoopFrame] {
        &self.loop_stack
    }

    /// Return addresses of the active subroutine calls, innermost last.
    pub fn call_stack(&self) -> &[usize] {
        &self.call_stack
    }

    /// Scratch held for the instruction at `ip`.
    pub fn scratch(&self, ip: usize) -> Option<&Scratch> {
        self.scratch.get(&ip)
    }

    /// Number of instruction addresses currently holding scratch.
    pub fn scratch_len(&self) -> usize {
        self.scratch.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The error that aborted this script, if any.
    pub fn fault(&self) -> Option<&ScriptError> {
        self.fault.as_ref()
    }

    /// Finish the instruction at `ip` and move past it.
    pub(crate) fn advance(&mut self) {
        self.scratch.remove(&self.ip);
        self.frame = 0;
        self.ip += 1;
    }

    /// End the script because of `err`.
    pub(crate) fn abort(&mut self, err: ScriptError) {
        warn!(
            vocabulary = %K::VOCABULARY,
            error = %err,
            "script aborted"
        );
        self.fault = Some(err);
        self.finished = true;
    }

    /// Zero the visit counters for a new update.
    pub(crate) fn reset_visits(&mut self) {
        self.visits.clear();
        self.visits.resize(self.program.len(), 0);
    }
}
