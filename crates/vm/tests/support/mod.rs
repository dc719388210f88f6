//! A recording host shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use danmaku_common::{BulletOp, EnemyOp, Program, ShotOp};
use danmaku_vm::{
    BulletScript, BulletSpawn, BulletSprite, Cursor, Curve, Entities, EnemyScript, EntityHandle,
    Host, Library, SeededRng, ShotScript,
};
use glam::Vec2;

/// Entity store that remembers everything asked of it.
#[derive(Default)]
pub struct Recorder {
    next: u32,
    pub spawned: Vec<(EntityHandle, String)>,
    pub bullets: Vec<BulletSpawn>,
    pub positions: HashMap<EntityHandle, Vec2>,
    pub rotations: HashMap<EntityHandle, f32>,
    pub velocities: HashMap<EntityHandle, Vec2>,
    pub destroyed: Vec<EntityHandle>,
    /// Refuse every bullet spawn.
    pub full: bool,
}

impl Recorder {
    fn allocate(&mut self) -> EntityHandle {
        self.next += 1;
        EntityHandle(self.next)
    }
}

impl Entities for Recorder {
    fn spawn(&mut self, prefab: &str) -> Option<EntityHandle> {
        let handle = self.allocate();
        self.spawned.push((handle, prefab.to_string()));
        Some(handle)
    }

    fn spawn_bullet(&mut self, bullet: BulletSpawn) -> Option<EntityHandle> {
        if self.full {
            return None;
        }
        let handle = self.allocate();
        self.positions.insert(handle, bullet.position);
        self.bullets.push(bullet);
        Some(handle)
    }

    fn position(&self, handle: EntityHandle) -> Option<Vec2> {
        self.positions.get(&handle).copied()
    }

    fn set_position(&mut self, handle: EntityHandle, position: Vec2) {
        self.positions.insert(handle, position);
    }

    fn rotation(&self, handle: EntityHandle) -> Option<f32> {
        self.rotations.get(&handle).copied()
    }

    fn set_rotation(&mut self, handle: EntityHandle, degrees: f32) {
        self.rotations.insert(handle, degrees);
    }

    fn set_velocity(&mut self, handle: EntityHandle, velocity: Vec2) {
        self.velocities.insert(handle, velocity);
    }

    fn destroy(&mut self, handle: EntityHandle) {
        self.destroyed.push(handle);
    }
}

/// Everything a [`Host`] borrows, owned in one place.
pub struct World {
    pub library: Library,
    pub entities: Recorder,
    pub catalog: HashMap<(i32, i32), BulletSprite>,
    pub sounds: Vec<(String, f32)>,
    pub player: Option<Vec2>,
    pub paths: HashMap<i32, Box<dyn Curve>>,
    pub rng: SeededRng,
}

impl World {
    /// Templates 0..4 in colors 0..8 resolve; the player sits at (0, 100).
    pub fn new() -> Self {
        let mut catalog = HashMap::new();
        for template in 0..4 {
            for color in 0..8 {
                catalog.insert(
                    (template, color),
                    BulletSprite {
                        image: format!("bullet_{template}_{color}"),
                        hitbox_radius: 2.0 + template as f32,
                    },
                );
            }
        }
        Self {
            library: Library::new(),
            entities: Recorder::default(),
            catalog,
            sounds: Vec::new(),
            player: Some(Vec2::new(0.0, 100.0)),
            paths: HashMap::new(),
            rng: SeededRng::new(42),
        }
    }

    pub fn host(&mut self) -> Host<'_> {
        Host {
            library: &self.library,
            entities: &mut self.entities,
            catalog: &self.catalog,
            audio: &mut self.sounds,
            player: &self.player,
            paths: &self.paths,
            rng: &mut self.rng,
        }
    }

    /// Headings of every bullet spawned so far, in spawn order.
    pub fn headings(&self) -> Vec<f32> {
        self.entities.bullets.iter().map(|b| b.heading).collect()
    }

    pub fn speeds(&self) -> Vec<f32> {
        self.entities.bullets.iter().map(|b| b.speed).collect()
    }
}

pub fn bullet_script(program: Program<BulletOp>) -> BulletScript {
    BulletScript::new(Cursor::new(Arc::new(program)))
}

pub fn shot_script(program: Program<ShotOp>) -> ShotScript {
    ShotScript::new(Cursor::new(Arc::new(program)))
}

pub fn enemy_script(program: Program<EnemyOp>) -> EnemyScript {
    EnemyScript::new(Cursor::new(Arc::new(program)))
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

pub fn assert_angles(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-3, "{actual:?} vs {expected:?}");
    }
}
