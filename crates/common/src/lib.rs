//! Danmaku pattern-script common types.
//!
//! This crate holds the authoring-time side of the pattern interpreters:
//!
//! - [`Instruction`]: one opcode-plus-operands record, generic over a vocabulary
//! - [`BulletOp`], [`EnemyOp`], [`ShotOp`]: the three closed vocabularies
//! - [`Flow`]: how the dispatch loop schedules each kind
//! - [`Program`] / [`ProgramBuilder`]: immutable tapes with resolved labels
//! - [`check()`]: static findings reported at registration time
//!
//! Everything here is immutable once built. The runtime lives in
//! `danmaku-vm`.

pub mod check;
pub mod error;
pub mod instruction;
pub mod program;
pub mod vocab;

// Re-export commonly used types at the crate root.
pub use check::{check, Finding};
pub use error::ProgramError;
pub use instruction::Instruction;
pub use program::{Program, ProgramBuilder};
pub use vocab::{BulletOp, EnemyOp, Flow, OpKind, ShotOp, Vocabulary};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// A flat tape of loop brackets and filler, possibly unbalanced.
    fn arb_tape() -> impl Strategy<Value = Vec<Instruction<BulletOp>>> {
        let instr = prop_oneof![
            (-2i32..4).prop_map(Instruction::loop_start),
            Just(Instruction::loop_end()),
            (0i32..5).prop_map(Instruction::wait),
            (-90.0f32..90.0).prop_map(vocab::bullet::add_angle),
        ];
        prop::collection::vec(instr, 0..40)
    }

    proptest! {
        /// Every resolved loop exit lies past its LoopStart and right after a LoopEnd.
        #[test]
        fn loop_exits_land_after_loop_end(tape in arb_tape()) {
            let program = Program::new(tape);
            for ip in 0..program.len() {
                if let Some(exit) = program.loop_exit(ip) {
                    prop_assert!(exit > ip + 1);
                    prop_assert!(exit <= program.len());
                    prop_assert_eq!(program.get(exit - 1).map(|i| i.flow()), Some(Flow::LoopEnd));
                    prop_assert_eq!(program.get(ip).map(|i| i.flow()), Some(Flow::LoopStart));
                }
            }
        }

        /// A balanced tape produces no loop findings.
        #[test]
        fn balanced_loops_have_no_findings(depth in 0usize..6, body in 0usize..4) {
            let mut tape = Vec::new();
            tape.extend((0..depth).map(|_| Instruction::<BulletOp>::loop_start(2)));
            tape.extend((0..body).map(|_| vocab::bullet::add_angle(1.0)));
            tape.extend((0..depth).map(|_| Instruction::loop_end()));
            let program = Program::new(tape);
            prop_assert!(check(&program).is_empty());
        }

        /// Labels resolve to the number of instructions appended before them.
        #[test]
        fn labels_resolve_to_append_position(before in 0usize..20, after in 0usize..20) {
            let program = Program::builder()
                .ops((0..before).map(|_| Instruction::<ShotOp>::wait(1)))
                .label("here")
                .ops((0..after).map(|_| Instruction::wait(1)))
                .build()
                .unwrap();
            prop_assert_eq!(program.label("here"), Some(before));
        }
    }
}
