//! Static checks over a program tape.
//!
//! Nothing found here stops a program from being registered: the
//! interpreters recover from or abort on these conditions at run time.
//! The check exists so authors see the problem at startup instead of as
//! a pattern that silently stops.

use thiserror::Error;

use crate::instruction::Instruction;
use crate::program::Program;
use crate::vocab::{Flow, OpKind};

/// A suspicious construct found in a program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Finding {
    /// `LoopEnd` with no open `LoopStart` before it.
    #[error("LOOP_END without LOOP_START at instruction {at}")]
    UnmatchedLoopEnd { at: usize },

    /// `LoopStart` never closed.
    #[error("LOOP_START at instruction {at} is never closed")]
    UnclosedLoop { at: usize },

    /// `Call` to a label the program does not declare.
    #[error("CALL to unknown label '{label}' at instruction {at}")]
    UnknownLabel { at: usize, label: String },

    /// `Call` with an empty label.
    #[error("CALL without a label at instruction {at}")]
    MissingLabel { at: usize },

    /// A volley with a negative bullet count.
    #[error("negative bullet count {count} at instruction {at}")]
    NegativeCount { at: usize, count: i32 },
}

/// Run every check and return all findings, in tape order per pass.
pub fn check<K: OpKind>(program: &Program<K>) -> Vec<Finding> {
    let instrs = program.instructions();
    let mut findings = check_loops(instrs);
    findings.extend(check_calls(program));
    findings.extend(check_counts(instrs));
    findings
}

fn check_loops<K: OpKind>(instrs: &[Instruction<K>]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut open = Vec::new();

    for (at, instr) in instrs.iter().enumerate() {
        match instr.flow() {
            Flow::LoopStart => open.push(at),
            Flow::LoopEnd => {
                if open.pop().is_none() {
                    findings.push(Finding::UnmatchedLoopEnd { at });
                }
            }
            _ => {}
        }
    }

    findings.extend(open.into_iter().map(|at| Finding::UnclosedLoop { at }));
    findings
}

fn check_calls<K: OpKind>(program: &Program<K>) -> Vec<Finding> {
    program
        .instructions()
        .iter()
        .enumerate()
        .filter(|(_, instr)| instr.flow() == Flow::Call)
        .filter_map(|(at, instr)| {
            if instr.label.is_empty() {
                Some(Finding::MissingLabel { at })
            } else if program.label(&instr.label).is_none() {
                Some(Finding::UnknownLabel {
                    at,
                    label: instr.label.clone(),
                })
            } else {
                None
            }
        })
        .collect()
}

fn check_counts<K: OpKind>(instrs: &[Instruction<K>]) -> Vec<Finding> {
    instrs
        .iter()
        .enumerate()
        .filter(|(_, instr)| instr.kind.fires_volley() && instr.count < 0)
        .map(|(at, instr)| Finding::NegativeCount {
            at,
            count: instr.count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::bullet::{self, BulletOp};
    use crate::vocab::shot;

    #[test]
    fn clean_program_has_no_findings() {
        let program = Program::builder()
            .op(Instruction::<BulletOp>::loop_start(3))
            .op(Instruction::call("turn"))
            .op(Instruction::loop_end())
            .op(Instruction::end())
            .label("turn")
            .op(bullet::rotate(2.0, 10))
            .op(Instruction::ret())
            .build()
            .unwrap();
        assert!(check(&program).is_empty());
    }

    #[test]
    fn unmatched_and_unclosed_loops() {
        let program = Program::new(vec![
            Instruction::<BulletOp>::loop_end(),
            Instruction::loop_start(2),
            bullet::add_angle(5.0),
        ]);
        let findings = check(&program);
        assert_eq!(
            findings,
            vec![
                Finding::UnmatchedLoopEnd { at: 0 },
                Finding::UnclosedLoop { at: 1 },
            ]
        );
    }

    #[test]
    fn unknown_and_missing_labels() {
        let program = Program::new(vec![
            Instruction::<BulletOp>::call("nowhere"),
            Instruction::call(""),
        ]);
        let findings = check(&program);
        assert!(findings.contains(&Finding::UnknownLabel {
            at: 0,
            label: "nowhere".into()
        }));
        assert!(findings.contains(&Finding::MissingLabel { at: 1 }));
    }

    #[test]
    fn negative_volley_count() {
        let program = Program::new(vec![
            shot::fire_ring(-4, 2.0),
            shot::fire_spread(6, 0.0, 90.0, 3.0),
        ]);
        assert_eq!(
            check(&program),
            vec![Finding::NegativeCount { at: 0, count: -4 }]
        );
    }

    #[test]
    fn counts_outside_shot_vocabulary_are_not_volleys() {
        // ZigZag stores its interval in `count`; a negative one is not a volley.
        let program = Program::new(vec![bullet::zigzag(10.0, -1, 30)]);
        assert!(check(&program).is_empty());
    }

    #[test]
    fn display_finding() {
        assert_eq!(
            Finding::UnclosedLoop { at: 4 }.to_string(),
            "LOOP_START at instruction 4 is never closed"
        );
    }
}
