//! The dispatch loop shared by every interpreter.
//!
//! [`update`] runs one simulation tick of a script. Instant instructions
//! run back to back within the tick; the first timed instruction that
//! still has ticks left suspends the script until the next call. Loops
//! and subroutine calls are handled here, so the interpreters only ever
//! see their own vocabulary's effects.

use std::sync::Arc;

use danmaku_common::{Flow, Instruction, OpKind, Program};
use tracing::{trace, warn};

use crate::cursor::{Cursor, LoopFrame, Scratch};
use crate::error::ScriptError;
use crate::limits::{revisit_limit, MAX_CALL_DEPTH, MAX_LOOP_DEPTH};

/// What an instant instruction asks of the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Move on to the next instruction in the same tick.
    Continue,
    /// Stop the script for good.
    Halt,
}

/// Where a timed instruction is within its span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// A tick inside the span. `t = frame / duration`, clamped to [0, 1].
    Run { frame: i32, duration: i32, t: f32 },
    /// The span is over: snap to the exact end value.
    Finish,
}

/// What a timed handler asks of the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Keep the script on this instruction until the next tick.
    Pending,
    /// Complete the instruction now and keep dispatching.
    Release,
}

/// A vocabulary's effects on its actor context.
pub trait Interpret<K: OpKind> {
    /// Apply an instant instruction.
    fn instant(&mut self, instr: &Instruction<K>) -> Signal;

    /// Apply one tick of a timed or yielding instruction.
    ///
    /// `scratch` is `None` on the first tick of a fresh span; whatever the
    /// handler leaves in it is kept until the span completes.
    fn timed(&mut self, instr: &Instruction<K>, phase: Phase, scratch: &mut Option<Scratch>)
        -> Hold;
}

/// Run one tick of `cursor`'s script against `interp`.
///
/// Returns `true` while the script is still running.
pub fn update<K: OpKind, I: Interpret<K>>(cursor: &mut Cursor<K>, interp: &mut I) -> bool {
    if cursor.finished {
        return false;
    }

    let program = Arc::clone(cursor.program());
    if cursor.ip >= program.len() {
        cursor.finished = true;
        return false;
    }

    cursor.reset_visits();
    let limit = revisit_limit(program.len());

    while let Some(instr) = program.get(cursor.ip) {
        let at = cursor.ip;
        cursor.visits[at] += 1;
        let visits = cursor.visits[at];
        if visits > limit {
            cursor.abort(ScriptError::RunawayDispatch { at, visits });
            return false;
        }

        trace!(vocabulary = %K::VOCABULARY, ip = at, op = instr.kind.mnemonic(), "dispatch");

        let outcome = match instr.flow() {
            Flow::Instant => match interp.instant(instr) {
                Signal::Continue => {
                    cursor.ip += 1;
                    Ok(Step::Next)
                }
                Signal::Halt => Ok(Step::Stop),
            },
            Flow::Timed => Ok(step_timed(cursor, instr, interp)),
            Flow::Yield => Ok(step_yield(cursor, instr, interp)),
            Flow::LoopStart => exec_loop_start(cursor, &program, instr).map(|()| Step::Next),
            Flow::LoopEnd => {
                exec_loop_end(cursor);
                Ok(Step::Next)
            }
            Flow::Call => exec_call(cursor, &program, instr).map(|()| Step::Next),
            Flow::Return => exec_return(cursor).map(|()| Step::Next),
            Flow::End => Ok(Step::Stop),
        };

        match outcome {
            Ok(Step::Next) => {}
            Ok(Step::Suspend) => return true,
            Ok(Step::Stop) => {
                cursor.finished = true;
                return false;
            }
            Err(err) => {
                cursor.abort(err);
                return false;
            }
        }
    }

    cursor.finished = true;
    false
}

/// Result of executing one instruction inside the dispatch loop.
enum Step {
    Next,
    Suspend,
    Stop,
}

fn progress(frame: i32, duration: i32) -> f32 {
    if duration <= 0 {
        1.0
    } else {
        (frame as f32 / duration as f32).clamp(0.0, 1.0)
    }
}

fn step_timed<K: OpKind, I: Interpret<K>>(
    cursor: &mut Cursor<K>,
    instr: &Instruction<K>,
    interp: &mut I,
) -> Step {
    let at = cursor.ip;
    let mut scratch = cursor.scratch.remove(&at);

    if cursor.frame >= instr.duration {
        interp.timed(instr, Phase::Finish, &mut scratch);
        cursor.advance();
        // A completed temporal instruction is progress.
        cursor.reset_visits();
        return Step::Next;
    }

    let phase = Phase::Run {
        frame: cursor.frame,
        duration: instr.duration,
        t: progress(cursor.frame, instr.duration),
    };
    hold_or_release(cursor, at, interp.timed(instr, phase, &mut scratch), scratch)
}

fn step_yield<K: OpKind, I: Interpret<K>>(
    cursor: &mut Cursor<K>,
    instr: &Instruction<K>,
    interp: &mut I,
) -> Step {
    let at = cursor.ip;
    let mut scratch = cursor.scratch.remove(&at);
    let phase = Phase::Run {
        frame: cursor.frame,
        duration: instr.duration,
        t: 0.0,
    };
    hold_or_release(cursor, at, interp.timed(instr, phase, &mut scratch), scratch)
}

fn hold_or_release<K: OpKind>(
    cursor: &mut Cursor<K>,
    at: usize,
    hold: Hold,
    scratch: Option<Scratch>,
) -> Step {
    match hold {
        Hold::Pending => {
            cursor.frame = cursor.frame.saturating_add(1);
            if let Some(scratch) = scratch {
                cursor.scratch.insert(at, scratch);
            }
            Step::Suspend
        }
        Hold::Release => {
            cursor.advance();
            cursor.reset_visits();
            Step::Next
        }
    }
}

fn exec_loop_start<K: OpKind>(
    cursor: &mut Cursor<K>,
    program: &Program<K>,
    instr: &Instruction<K>,
) -> Result<(), ScriptError> {
    let at = cursor.ip;

    if instr.count <= 0 {
        // Skip the body; an unclosed loop skips the rest of the tape.
        cursor.ip = program.loop_exit(at).unwrap_or(program.len());
        return Ok(());
    }

    if cursor.loop_stack.len() >= MAX_LOOP_DEPTH {
        return Err(ScriptError::LoopStackOverflow {
            at,
            depth: cursor.loop_stack.len(),
        });
    }

    cursor.loop_stack.push(LoopFrame {
        return_ip: at,
        remaining: instr.count,
    });
    cursor.ip += 1;
    Ok(())
}

fn exec_loop_end<K: OpKind>(cursor: &mut Cursor<K>) {
    let Some(top) = cursor.loop_stack.last_mut() else {
        warn!(vocabulary = %K::VOCABULARY, at = cursor.ip, "LOOP_END without open loop");
        cursor.ip += 1;
        return;
    };

    top.remaining -= 1;
    if top.remaining > 0 {
        cursor.ip = top.return_ip + 1;
    } else {
        cursor.loop_stack.pop();
        cursor.ip += 1;
    }
}

fn exec_call<K: OpKind>(
    cursor: &mut Cursor<K>,
    program: &Program<K>,
    instr: &Instruction<K>,
) -> Result<(), ScriptError> {
    let at = cursor.ip;

    let target = program
        .label(&instr.label)
        .ok_or_else(|| ScriptError::UnknownSubroutine {
            at,
            label: instr.label.clone(),
        })?;

    if cursor.call_stack.len() >= MAX_CALL_DEPTH {
        return Err(ScriptError::CallStackOverflow {
            at,
            depth: cursor.call_stack.len(),
        });
    }

    cursor.call_stack.push(at + 1);
    cursor.ip = target;
    Ok(())
}

fn exec_return<K: OpKind>(cursor: &mut Cursor<K>) -> Result<(), ScriptError> {
    let at = cursor.ip;
    cursor.ip = cursor
        .call_stack
        .pop()
        .ok_or(ScriptError::ReturnWithoutCall { at })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use danmaku_common::vocab::bullet;
    use danmaku_common::BulletOp;

    /// Counts effects instead of applying them.
    #[derive(Default)]
    struct Tally {
        instants: usize,
        runs: Vec<(i32, f32)>,
        finishes: usize,
        release_yield: bool,
    }

    impl Interpret<BulletOp> for Tally {
        fn instant(&mut self, _instr: &Instruction<BulletOp>) -> Signal {
            self.instants += 1;
            Signal::Continue
        }

        fn timed(
            &mut self,
            _instr: &Instruction<BulletOp>,
            phase: Phase,
            scratch: &mut Option<Scratch>,
        ) -> Hold {
            match phase {
                Phase::Run { frame, t, .. } => {
                    self.runs.push((frame, t));
                    scratch.get_or_insert(Scratch::Start(frame as f32));
                    if self.release_yield {
                        Hold::Release
                    } else {
                        Hold::Pending
                    }
                }
                Phase::Finish => {
                    self.finishes += 1;
                    Hold::Release
                }
            }
        }
    }

    fn cursor(instrs: Vec<Instruction<BulletOp>>) -> Cursor<BulletOp> {
        Cursor::new(Arc::new(Program::new(instrs)))
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(0, 4), 0.0);
        assert_eq!(progress(2, 4), 0.5);
        assert_eq!(progress(9, 4), 1.0);
        assert_eq!(progress(0, 0), 1.0);
    }

    #[test]
    fn timed_span_reports_fractions_then_finishes() {
        let mut c = cursor(vec![bullet::rotate(1.0, 4)]);
        let mut tally = Tally::default();
        for _ in 0..4 {
            assert!(update(&mut c, &mut tally));
        }
        assert_eq!(
            tally.runs,
            vec![(0, 0.0), (1, 0.25), (2, 0.5), (3, 0.75)]
        );
        assert_eq!(c.scratch_len(), 1);
        assert!(!update(&mut c, &mut tally));
        assert_eq!(tally.finishes, 1);
        assert_eq!(c.scratch_len(), 0);
    }

    #[test]
    fn zero_duration_completes_in_same_tick() {
        let mut c = cursor(vec![Instruction::wait(0), bullet::set_speed(1.0), Instruction::wait(2)]);
        let mut tally = Tally::default();
        assert!(update(&mut c, &mut tally));
        assert_eq!(tally.finishes, 1);
        assert_eq!(tally.instants, 1);
        assert_eq!(c.ip(), 2);
    }

    #[test]
    fn yield_holds_until_released() {
        let mut c = cursor(vec![bullet::refire(), bullet::set_speed(2.0)]);
        let mut tally = Tally::default();
        assert!(update(&mut c, &mut tally));
        assert!(update(&mut c, &mut tally));
        assert_eq!(c.ip(), 0);
        assert_eq!(c.frame(), 2);

        tally.release_yield = true;
        assert!(!update(&mut c, &mut tally));
        assert_eq!(tally.instants, 1);
        assert_eq!(tally.finishes, 0);
    }

    #[test]
    fn nested_loops_multiply() {
        let mut c = cursor(vec![
            Instruction::loop_start(2),
            Instruction::loop_start(2),
            bullet::add_angle(1.0),
            Instruction::loop_end(),
            Instruction::loop_end(),
        ]);
        let mut tally = Tally::default();
        assert!(!update(&mut c, &mut tally));
        assert_eq!(tally.instants, 4);
        assert!(c.loop_stack().is_empty());
    }

    #[test]
    fn unclosed_skipped_loop_ends_script() {
        let mut c = cursor(vec![Instruction::loop_start(0), bullet::add_angle(1.0)]);
        let mut tally = Tally::default();
        assert!(!update(&mut c, &mut tally));
        assert_eq!(tally.instants, 0);
        assert!(c.fault().is_none());
    }

    #[test]
    fn stray_loop_end_is_skipped() {
        let mut c = cursor(vec![Instruction::loop_end(), bullet::add_angle(1.0)]);
        let mut tally = Tally::default();
        assert!(!update(&mut c, &mut tally));
        assert_eq!(tally.instants, 1);
        assert!(c.fault().is_none());
    }

    #[test]
    fn return_without_call_is_fatal() {
        let mut c = cursor(vec![Instruction::ret(), bullet::add_angle(1.0)]);
        let mut tally = Tally::default();
        assert!(!update(&mut c, &mut tally));
        assert_eq!(c.fault(), Some(&ScriptError::ReturnWithoutCall { at: 0 }));
        assert_eq!(tally.instants, 0);
    }

    #[test]
    fn runaway_instant_loop_is_aborted() {
        // A body revisited more than len + 1 times in one tick trips the guard.
        let mut c = cursor(vec![
            Instruction::loop_start(100),
            bullet::add_angle(1.0),
            Instruction::loop_end(),
        ]);
        let mut tally = Tally::default();
        assert!(!update(&mut c, &mut tally));
        assert!(matches!(
            c.fault(),
            Some(ScriptError::RunawayDispatch { at: 1, visits: 5 })
        ));
        assert_eq!(tally.instants, 4);
    }

    #[test]
    fn recursive_call_overflows() {
        let program = Program::builder()
            .label("again")
            .op(Instruction::<BulletOp>::wait(1))
            .op(Instruction::call("again"))
            .build()
            .unwrap();
        let mut c = Cursor::new(Arc::new(program));
        let mut tally = Tally::default();
        let mut ticks = 0;
        while update(&mut c, &mut tally) {
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert!(matches!(
            c.fault(),
            Some(ScriptError::CallStackOverflow { depth: MAX_CALL_DEPTH, .. })
        ));
    }
}
