//! Collaborator interfaces the interpreters consume.
//!
//! Entity storage, sprite catalogs, audio, the player, paths and random
//! numbers all live outside the interpreters. Each is reached through a
//! narrow trait, and a [`Host`] bundles borrowed trait objects for one
//! tick so cursors stay pure functions of (program, context, host).

use std::collections::HashMap;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::registry::Library;
use crate::shot::BulletSpawn;

/// Opaque handle to an entity owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityHandle(pub u32);

/// Entity and transform storage.
pub trait Entities {
    /// Spawn a prefab by name.
    fn spawn(&mut self, prefab: &str) -> Option<EntityHandle>;
    /// Spawn a bullet actor. `None` if the host refused it.
    fn spawn_bullet(&mut self, bullet: BulletSpawn) -> Option<EntityHandle>;
    fn position(&self, handle: EntityHandle) -> Option<Vec2>;
    fn set_position(&mut self, handle: EntityHandle, position: Vec2);
    fn rotation(&self, handle: EntityHandle) -> Option<f32>;
    fn set_rotation(&mut self, handle: EntityHandle, degrees: f32);
    fn set_velocity(&mut self, handle: EntityHandle, velocity: Vec2);
    fn destroy(&mut self, handle: EntityHandle);
}

/// What a bullet looks like and how big it is.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletSprite {
    pub image: String,
    pub hitbox_radius: f32,
}

/// Resolves (template, color) pairs to sprites.
pub trait BulletCatalog {
    fn resolve(&self, template: i32, color: i32) -> Option<BulletSprite>;
}

impl BulletCatalog for HashMap<(i32, i32), BulletSprite> {
    fn resolve(&self, template: i32, color: i32) -> Option<BulletSprite> {
        self.get(&(template, color)).cloned()
    }
}

/// Fire-and-forget sound playback.
pub trait Audio {
    fn play(&mut self, sound_id: &str, volume: f32);
}

/// Audio sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silence;

impl Audio for Silence {
    fn play(&mut self, _sound_id: &str, _volume: f32) {}
}

/// Records every request instead of playing it.
impl Audio for Vec<(String, f32)> {
    fn play(&mut self, sound_id: &str, volume: f32) {
        self.push((sound_id.to_string(), volume));
    }
}

/// Where the player is. `None` before the player exists.
pub trait PlayerOracle {
    fn player_position(&self) -> Option<Vec2>;
}

impl PlayerOracle for Option<Vec2> {
    fn player_position(&self) -> Option<Vec2> {
        *self
    }
}

/// No player on the field.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPlayer;

impl PlayerOracle for NoPlayer {
    fn player_position(&self) -> Option<Vec2> {
        None
    }
}

/// A player that never moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPlayer(pub Vec2);

impl PlayerOracle for FixedPlayer {
    fn player_position(&self) -> Option<Vec2> {
        Some(self.0)
    }
}

/// A parametric curve over t in [0, 1].
pub trait Curve {
    fn position_at(&self, t: f32) -> Vec2;
}

/// Straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePath {
    pub from: Vec2,
    pub to: Vec2,
}

impl Curve for LinePath {
    fn position_at(&self, t: f32) -> Vec2 {
        self.from.lerp(self.to, t.clamp(0.0, 1.0))
    }
}

/// Cubic Bezier curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
}

impl Curve for CubicBezier {
    fn position_at(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.p1 * (3.0 * u * u * t)
            + self.p2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }
}

/// Looks up paths by id.
pub trait PathOracle {
    fn path(&self, id: i32) -> Option<&dyn Curve>;
}

impl PathOracle for HashMap<i32, Box<dyn Curve>> {
    fn path(&self, id: i32) -> Option<&dyn Curve> {
        self.get(&id).map(|curve| curve.as_ref())
    }
}

/// A path table with no paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPaths;

impl PathOracle for NoPaths {
    fn path(&self, _id: i32) -> Option<&dyn Curve> {
        None
    }
}

/// Source of randomness for jitter, wander targets and shuffles.
pub trait RandomSource {
    /// Uniform float in [min, max].
    fn uniform(&mut self, min: f32, max: f32) -> f32;
    /// Uniform integer in [min, max].
    fn uniform_int(&mut self, min: i32, max: i32) -> i32;
    fn shuffle(&mut self, items: &mut [usize]);
}

/// Deterministic [`RandomSource`] backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng(StdRng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRng {
    fn uniform(&mut self, min: f32, max: f32) -> f32 {
        if !(min.is_finite() && max.is_finite()) || min == max {
            return min;
        }
        let (lo, hi) = if min < max { (min, max) } else { (max, min) };
        if (hi - lo).is_finite() {
            self.0.gen_range(lo..=hi)
        } else {
            // Span overflows f32; blend the endpoints instead.
            let u: f32 = self.0.gen_range(0.0..=1.0);
            lo * (1.0 - u) + hi * u
        }
    }

    fn uniform_int(&mut self, min: i32, max: i32) -> i32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.0.gen_range(lo..=hi)
    }

    fn shuffle(&mut self, items: &mut [usize]) {
        items.shuffle(&mut self.0);
    }
}

/// Everything an interpreter may touch besides its own actor, for one tick.
pub struct Host<'a> {
    pub library: &'a Library,
    pub entities: &'a mut dyn Entities,
    pub catalog: &'a dyn BulletCatalog,
    pub audio: &'a mut dyn Audio,
    pub player: &'a dyn PlayerOracle,
    pub paths: &'a dyn PathOracle,
    pub rng: &'a mut dyn RandomSource,
}
