//! Danmaku pattern-script interpreters.
//!
//! Three frame-stepped interpreters share one dispatch loop:
//! - [`BulletScript`] steers a bullet's speed and heading
//! - [`EnemyScript`] drives a whole enemy and fires shot programs
//! - [`ShotScript`] turns firing geometry into bullet spawns
//!
//! Each owns a [`Cursor`] over a shared, immutable program and is advanced
//! exactly once per simulation tick. Timed instructions suspend the script
//! by returning from `update`; the cursor's `ip`, `frame` and scratch say
//! where the next tick resumes.
//!
//! # Usage
//!
//! ```
//! use danmaku_common::{vocab::bullet, Instruction, Program};
//! use danmaku_vm::Library;
//!
//! let mut library = Library::new();
//! library.bullets.register(
//!     "curve",
//!     Program::new(vec![bullet::rotate(2.0, 30), Instruction::end()]),
//! );
//!
//! let cursor = library.bullets.clone_cursor("curve").unwrap();
//! assert_eq!(cursor.ip(), 0);
//! assert!(library.bullets.clone_cursor("missing").is_none());
//! ```

pub mod angle;
pub mod bullet;
pub mod collab;
pub mod cursor;
pub mod dispatch;
pub mod enemy;
pub mod error;
pub mod limits;
pub mod registry;
pub mod shot;
pub mod spread;

pub use bullet::{BulletMotion, BulletScript};
pub use collab::{
    Audio, BulletCatalog, BulletSprite, CubicBezier, Curve, Entities, EntityHandle, FixedPlayer,
    Host, LinePath, NoPaths, NoPlayer, PathOracle, PlayerOracle, RandomSource, SeededRng, Silence,
};
pub use cursor::{Cursor, LoopFrame, Scratch};
pub use dispatch::{update, Hold, Interpret, Phase, Signal};
pub use enemy::{ActiveShot, Enemy, EnemyScript, ItemDrop};
pub use error::ScriptError;
pub use registry::{Library, Registry};
pub use shot::{BulletSpawn, Emitter, ShotScript, Slot};
