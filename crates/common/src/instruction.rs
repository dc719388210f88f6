//! The instruction record shared by all three vocabularies.
//!
//! An instruction is a flat record: one kind plus a fixed set of operand
//! fields. Only the fields relevant to `kind` are meaningful; the rest keep
//! their defaults. Instructions are authoring-time data and are never
//! mutated once a program is built.
//!
//! ```text
//! kind       which opcode (per vocabulary)
//! scalar_a   primary float operand (speed, angle, amount)
//! scalar_b   secondary float operand
//! duration   tick span for timed kinds
//! count      repeat/bullet count, or a secondary integer id
//! vector     Vec2 operand (position, offset, velocity)
//! label      subroutine label or referenced program name
//! extra_int  slot, template, path or item id
//! sound_id   sound name for PlaySound kinds
//! volume     playback volume for PlaySound kinds
//! ```

use glam::Vec2;

use crate::vocab::{Flow, OpKind};

/// A single pattern-script instruction of vocabulary `K`.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction<K> {
    /// The operation to perform.
    pub kind: K,
    pub scalar_a: f32,
    pub scalar_b: f32,
    /// Number of ticks a timed instruction spans.
    pub duration: i32,
    pub count: i32,
    pub vector: Vec2,
    pub label: String,
    pub extra_int: i32,
    pub sound_id: String,
    pub volume: f32,
}

impl<K: OpKind> Instruction<K> {
    /// Create an instruction with every operand at its default.
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            scalar_a: 0.0,
            scalar_b: 0.0,
            duration: 0,
            count: 0,
            vector: Vec2::ZERO,
            label: String::new(),
            extra_int: 0,
            sound_id: String::new(),
            volume: 1.0,
        }
    }

    pub fn with_scalars(mut self, a: f32, b: f32) -> Self {
        self.scalar_a = a;
        self.scalar_b = b;
        self
    }

    pub fn with_scalar(mut self, a: f32) -> Self {
        self.scalar_a = a;
        self
    }

    pub fn with_duration(mut self, duration: i32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_count(mut self, count: i32) -> Self {
        self.count = count;
        self
    }

    pub fn with_vector(mut self, vector: Vec2) -> Self {
        self.vector = vector;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_extra(mut self, extra: i32) -> Self {
        self.extra_int = extra;
        self
    }

    pub fn with_sound(mut self, sound_id: impl Into<String>, volume: f32) -> Self {
        self.sound_id = sound_id.into();
        self.volume = volume;
        self
    }

    /// Scheduling class of this instruction's kind.
    pub fn flow(&self) -> Flow {
        self.kind.flow()
    }

    // --- Structured control, identical across vocabularies ---

    /// Hold the script for `ticks` ticks.
    pub fn wait(ticks: i32) -> Self {
        Self::new(K::WAIT).with_duration(ticks)
    }

    /// Open a loop running its body `count` times. `count <= 0` skips it.
    pub fn loop_start(count: i32) -> Self {
        Self::new(K::LOOP_START).with_count(count)
    }

    pub fn loop_end() -> Self {
        Self::new(K::LOOP_END)
    }

    /// Jump to the subroutine at `label`, returning to the next instruction.
    pub fn call(label: impl Into<String>) -> Self {
        Self::new(K::CALL).with_label(label)
    }

    pub fn ret() -> Self {
        Self::new(K::RETURN)
    }

    pub fn end() -> Self {
        Self::new(K::END)
    }
}
