//! Program tapes: immutable, index-addressable instruction sequences.
//!
//! Labels are resolved while the tape is being authored: the builder
//! records `label -> index of the next instruction` as instructions are
//! appended. Matching `LoopEnd`s are found once at build time so a
//! skipped loop is a single jump at run time.

use std::collections::HashMap;

use crate::error::ProgramError;
use crate::instruction::Instruction;
use crate::vocab::{Flow, OpKind};

/// A pattern-script program: an ordered sequence of instructions.
///
/// Indices are stable for the program's lifetime. Empty programs are
/// legal and finish on their first update.
#[derive(Debug, Clone, PartialEq)]
pub struct Program<K> {
    instructions: Vec<Instruction<K>>,
    labels: HashMap<String, usize>,
    /// For each `LoopStart`, the index just past its matching `LoopEnd`.
    loop_exits: Vec<Option<usize>>,
}

impl<K: OpKind> Program<K> {
    /// Create a program without labels.
    pub fn new(instructions: Vec<Instruction<K>>) -> Self {
        Self::assemble(instructions, HashMap::new())
    }

    /// Start authoring a program that may declare labels.
    pub fn builder() -> ProgramBuilder<K> {
        ProgramBuilder::new()
    }

    fn assemble(instructions: Vec<Instruction<K>>, labels: HashMap<String, usize>) -> Self {
        let loop_exits = match_loops(&instructions);
        Self {
            instructions,
            labels,
            loop_exits,
        }
    }

    /// Number of instructions in the program.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the program has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The instruction at `ip`, if any.
    pub fn get(&self, ip: usize) -> Option<&Instruction<K>> {
        self.instructions.get(ip)
    }

    pub fn instructions(&self) -> &[Instruction<K>] {
        &self.instructions
    }

    /// Resolve a label to the index it marks.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// All declared labels, sorted by index.
    pub fn labels(&self) -> Vec<(&str, usize)> {
        let mut labels: Vec<_> = self
            .labels
            .iter()
            .map(|(name, &at)| (name.as_str(), at))
            .collect();
        labels.sort_by_key(|&(name, at)| (at, name));
        labels
    }

    /// Index just past the `LoopEnd` matching the `LoopStart` at `ip`.
    ///
    /// Returns `None` when `ip` is not a `LoopStart` or the loop is never
    /// closed.
    pub fn loop_exit(&self, ip: usize) -> Option<usize> {
        self.loop_exits.get(ip).copied().flatten()
    }
}

/// Pair every `LoopStart` with its `LoopEnd`, innermost first.
fn match_loops<K: OpKind>(instructions: &[Instruction<K>]) -> Vec<Option<usize>> {
    let mut exits = vec![None; instructions.len()];
    let mut open = Vec::new();

    for (i, instr) in instructions.iter().enumerate() {
        match instr.flow() {
            Flow::LoopStart => open.push(i),
            Flow::LoopEnd => {
                if let Some(start) = open.pop() {
                    exits[start] = Some(i + 1);
                }
            }
            _ => {}
        }
    }

    exits
}

/// Appends instructions and records labels for a [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramBuilder<K> {
    instructions: Vec<Instruction<K>>,
    labels: HashMap<String, usize>,
    error: Option<ProgramError>,
}

impl<K: OpKind> ProgramBuilder<K> {
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
            labels: HashMap::new(),
            error: None,
        }
    }

    /// Append one instruction.
    pub fn op(mut self, instr: Instruction<K>) -> Self {
        self.instructions.push(instr);
        self
    }

    /// Append several instructions in order.
    pub fn ops(mut self, instrs: impl IntoIterator<Item = Instruction<K>>) -> Self {
        self.instructions.extend(instrs);
        self
    }

    /// Mark the next appended instruction with `name`.
    ///
    /// The first error is kept and reported by [`build`](Self::build).
    pub fn label(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let at = self.instructions.len();
        if self.error.is_some() {
            return self;
        }
        if name.is_empty() {
            self.error = Some(ProgramError::EmptyLabel { at });
        } else if let Some(&first) = self.labels.get(&name) {
            self.error = Some(ProgramError::DuplicateLabel {
                label: name,
                first,
                second: at,
            });
        } else {
            self.labels.insert(name, at);
        }
        self
    }

    /// Finish the tape.
    pub fn build(self) -> Result<Program<K>, ProgramError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Program::assemble(self.instructions, self.labels)),
        }
    }
}

impl<K: OpKind> Default for ProgramBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
