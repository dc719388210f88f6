//! The three instruction vocabularies and their shared classification.
//!
//! Every vocabulary is a closed, fieldless enum. Kinds never cross
//! vocabularies: a bullet tape only ever holds [`BulletOp`]s. How the
//! dispatch loop treats a kind is decided by [`OpKind::flow`], a lookup
//! table per vocabulary rather than per-case control flow in the
//! interpreters.

pub mod bullet;
pub mod enemy;
pub mod shot;

use std::fmt;
use std::hash::Hash;

pub use bullet::BulletOp;
pub use enemy::EnemyOp;
pub use shot::ShotOp;

/// How the dispatch loop schedules an instruction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Mutates the context, advances `ip`, costs no tick.
    Instant,
    /// Spans `duration` ticks tracked through `frame` and scratch.
    Timed,
    /// Holds the cursor until the handler releases it. No duration bound.
    Yield,
    /// `LoopStart(count)`.
    LoopStart,
    /// `LoopEnd`.
    LoopEnd,
    /// `Call(label)`.
    Call,
    /// Return from the innermost call.
    Return,
    /// Terminates the script.
    End,
}

impl Flow {
    /// Control kinds move `ip` by jumping instead of plain increment.
    pub fn is_control(self) -> bool {
        matches!(
            self,
            Flow::LoopStart | Flow::LoopEnd | Flow::Call | Flow::Return | Flow::End
        )
    }
}

/// Names a vocabulary, mostly for log fields and registry listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vocabulary {
    BulletMotion,
    EnemyBehavior,
    ShotEmission,
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vocabulary::BulletMotion => "bullet",
            Vocabulary::EnemyBehavior => "enemy",
            Vocabulary::ShotEmission => "shot",
        };
        f.write_str(name)
    }
}

/// An instruction kind belonging to one vocabulary.
///
/// The associated constants name the structured-control kinds every
/// vocabulary carries, so control constructors on
/// [`Instruction`](crate::Instruction) can be written once.
pub trait OpKind: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Which vocabulary this kind set is.
    const VOCABULARY: Vocabulary;
    const WAIT: Self;
    const LOOP_START: Self;
    const LOOP_END: Self;
    const CALL: Self;
    const RETURN: Self;
    const END: Self;

    /// Scheduling class of this kind.
    fn flow(self) -> Flow;

    /// Upper-case mnemonic used in listings and log lines.
    fn mnemonic(self) -> &'static str;

    /// Whether `count` is a number of bullets for this kind.
    fn fires_volley(self) -> bool {
        false
    }
}

/// Shorthand for implementing `fmt::Display` through `OpKind::mnemonic`.
macro_rules! display_mnemonic {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::vocab::OpKind::mnemonic(*self))
            }
        }
    };
}

pub(crate) use display_mnemonic;
