//! Headless stage: hosts the collaborators and steps one enemy encounter.
//!
//! Coordinates are screen space on a 384x448 field, y pointing down, so a
//! heading of 90 degrees travels towards the bottom of the screen.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use danmaku_vm::{
    BulletCatalog, BulletMotion, BulletScript, BulletSpawn, BulletSprite, Curve, Enemy, EnemyScript, Entities,
    EntityHandle, Host, Library, SeededRng,
};
use glam::Vec2;
use tracing::{debug, info, warn};

use crate::catalog;

/// Playfield size.
pub const FIELD: Vec2 = Vec2::new(384.0, 448.0);
/// Where enemies enter.
pub const SPAWN: Vec2 = Vec2::new(192.0, 32.0);
/// Where the (stationary) player stands.
pub const PLAYER: Vec2 = Vec2::new(192.0, 400.0);
/// How far outside the field an actor may stray before it is removed.
const MARGIN: f32 = 32.0;

/// Settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
    pub ticks: u32,
    pub seed: u64,
    pub trace: Option<PathBuf>,
    pub player: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            seed: 0,
            trace: None,
            player: true,
        }
    }
}

/// What became of the enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Alive,
    Died(u32),
    Left(u32),
    Finished(u32),
}

impl fmt::Display for Fate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fate::Alive => write!(f, "alive"),
            Fate::Died(tick) => write!(f, "died at tick {tick}"),
            Fate::Left(tick) => write!(f, "left the field at tick {tick}"),
            Fate::Finished(tick) => write!(f, "finished at tick {tick}"),
        }
    }
}

/// Totals reported after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub ticks: u32,
    pub fired: usize,
    pub refired: usize,
    pub peak: usize,
    pub culled: usize,
    pub sounds: usize,
    pub drops: usize,
    pub fate: Fate,
}

impl Summary {
    fn new() -> Self {
        Self {
            ticks: 0,
            fired: 0,
            refired: 0,
            peak: 0,
            culled: 0,
            sounds: 0,
            drops: 0,
            fate: Fate::Alive,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Transform {
    position: Vec2,
    rotation: f32,
}

/// Entity storage. Bullet spawns are queued and picked up by the stage
/// at a fixed point in the tick.
#[derive(Default)]
pub struct EntityStore {
    next: u32,
    transforms: HashMap<EntityHandle, Transform>,
    queued: Vec<(EntityHandle, BulletSpawn)>,
}

impl EntityStore {
    fn allocate(&mut self) -> EntityHandle {
        self.next += 1;
        EntityHandle(self.next)
    }

    fn take_queued(&mut self) -> Vec<(EntityHandle, BulletSpawn)> {
        std::mem::take(&mut self.queued)
    }
}

impl Entities for EntityStore {
    fn spawn(&mut self, prefab: &str) -> Option<EntityHandle> {
        let handle = self.allocate();
        self.transforms.insert(handle, Transform::default());
        debug!(prefab, handle = handle.0, "spawned");
        Some(handle)
    }

    fn spawn_bullet(&mut self, bullet: BulletSpawn) -> Option<EntityHandle> {
        let handle = self.allocate();
        self.transforms.insert(
            handle,
            Transform {
                position: bullet.position,
                rotation: bullet.heading,
            },
        );
        self.queued.push((handle, bullet));
        Some(handle)
    }

    fn position(&self, handle: EntityHandle) -> Option<Vec2> {
        self.transforms.get(&handle).map(|t| t.position)
    }

    fn set_position(&mut self, handle: EntityHandle, position: Vec2) {
        if let Some(t) = self.transforms.get_mut(&handle) {
            t.position = position;
        }
    }

    fn rotation(&self, handle: EntityHandle) -> Option<f32> {
        self.transforms.get(&handle).map(|t| t.rotation)
    }

    fn set_rotation(&mut self, handle: EntityHandle, degrees: f32) {
        if let Some(t) = self.transforms.get_mut(&handle) {
            t.rotation = degrees;
        }
    }

    // The stage integrates bullets from their own motion state.
    fn set_velocity(&mut self, _handle: EntityHandle, _velocity: Vec2) {}

    fn destroy(&mut self, handle: EntityHandle) {
        self.transforms.remove(&handle);
    }
}

/// The collaborators, owned apart from the actors so both can be
/// borrowed at once.
struct World {
    library: Library,
    store: EntityStore,
    sprites: HashMap<(i32, i32), BulletSprite>,
    sounds: Vec<(String, f32)>,
    player: Option<Vec2>,
    paths: HashMap<i32, Box<dyn Curve>>,
    rng: SeededRng,
}

impl World {
    fn host(&mut self) -> Host<'_> {
        Host {
            library: &self.library,
            entities: &mut self.store,
            catalog: &self.sprites,
            audio: &mut self.sounds,
            player: &self.player,
            paths: &self.paths,
            rng: &mut self.rng,
        }
    }
}

struct LiveBullet {
    motion: BulletMotion,
    script: Option<BulletScript>,
    sprite: BulletSprite,
    /// Template and color `sprite` was resolved for.
    appearance: (i32, i32),
}

impl LiveBullet {
    fn new(motion: BulletMotion, script: Option<BulletScript>, sprite: BulletSprite) -> Self {
        let appearance = (motion.template, motion.color);
        Self {
            motion,
            script,
            sprite,
            appearance,
        }
    }

    /// Re-resolve the sprite after a script changed the bullet's appearance.
    /// An unresolved pair keeps the previous sprite.
    fn refresh_sprite(&mut self, catalog: &dyn BulletCatalog) {
        let wanted = (self.motion.template, self.motion.color);
        if wanted == self.appearance {
            return;
        }
        self.appearance = wanted;
        match catalog.resolve(wanted.0, wanted.1) {
            Some(sprite) => self.sprite = sprite,
            None => warn!(
                template = wanted.0,
                color = wanted.1,
                "unresolved bullet sprite, keeping the old one"
            ),
        }
    }
}

/// One enemy encounter.
pub struct Stage {
    world: World,
    enemy: Option<Enemy>,
    script: EnemyScript,
    bullets: Vec<LiveBullet>,
    summary: Summary,
    trace: Option<Box<dyn Write>>,
    tick: u32,
}

fn outside(position: Vec2) -> bool {
    position.x < -MARGIN
        || position.y < -MARGIN
        || position.x > FIELD.x + MARGIN
        || position.y > FIELD.y + MARGIN
}

impl Stage {
    /// Set up `enemy` at the spawn point. `None` if no such enemy pattern
    /// is registered.
    pub fn new(
        library: Library,
        enemy: &str,
        config: &StageConfig,
        trace: Option<Box<dyn Write>>,
    ) -> Option<Self> {
        let cursor = library.enemies.clone_cursor(enemy)?;

        let mut world = World {
            library,
            store: EntityStore::default(),
            sprites: catalog::sprites(),
            sounds: Vec::new(),
            player: config.player.then_some(PLAYER),
            paths: catalog::paths(),
            rng: SeededRng::new(config.seed),
        };

        let mut body = Enemy::new(SPAWN);
        body.handle = world.store.spawn(&format!("enemy:{enemy}"));
        if let Some(handle) = body.handle {
            world.store.set_position(handle, SPAWN);
        }

        Some(Self {
            world,
            enemy: Some(body),
            script: EnemyScript::new(cursor),
            bullets: Vec::new(),
            summary: Summary::new(),
            trace,
            tick: 0,
        })
    }

    /// Advance one tick. Returns `false` once nothing is left on the field.
    pub fn step(&mut self) -> io::Result<bool> {
        self.tick += 1;
        let tick = self.tick;

        self.step_enemy(tick);
        self.collect_spawns();
        self.step_bullets();
        self.summary.peak = self.summary.peak.max(self.bullets.len());

        if let Some(out) = self.trace.as_mut() {
            let enemy = match self.enemy.as_ref().and_then(|e| e.handle) {
                Some(handle) => {
                    let p = self.world.store.position(handle).unwrap_or(Vec2::NAN);
                    let r = self.world.store.rotation(handle).unwrap_or(0.0);
                    format!("{:.1},{:.1} facing={r:.1}", p.x, p.y)
                }
                None => "-".to_string(),
            };
            let shots = self.enemy.as_ref().map_or(0, |e| e.shots.len());
            writeln!(
                out,
                "tick={tick} enemy={enemy} shots={shots} bullets={}",
                self.bullets.len()
            )?;
        }

        Ok(self.enemy.is_some() || !self.bullets.is_empty() || !self.world.store.queued.is_empty())
    }

    /// Step up to `ticks` ticks, stopping early once the field is empty.
    pub fn run(mut self, ticks: u32) -> io::Result<Summary> {
        while self.tick < ticks {
            if !self.step()? {
                break;
            }
        }
        if let Some(out) = self.trace.as_mut() {
            out.flush()?;
        }
        self.summary.ticks = self.tick;
        self.summary.sounds = self.world.sounds.len();
        Ok(self.summary)
    }

    fn step_enemy(&mut self, tick: u32) {
        let Some(enemy) = self.enemy.as_mut() else {
            return;
        };
        let mut host = self.world.host();

        let running = self.script.update(enemy, &mut host);

        let fate = if enemy.dead {
            for drop in &enemy.drops {
                for _ in 0..drop.count.max(0) {
                    host.entities.spawn(&format!("item:{}", drop.item));
                    self.summary.drops += 1;
                }
            }
            Some(Fate::Died(tick))
        } else {
            enemy.integrate();
            if let Some(handle) = enemy.handle {
                host.entities.set_position(handle, enemy.position);
            }
            let shots = enemy.tick_shots(&mut host);
            let idle = enemy.velocity == Vec2::ZERO && enemy.acceleration == Vec2::ZERO;
            if outside(enemy.position) {
                Some(Fate::Left(tick))
            } else if !running && shots == 0 && idle {
                Some(Fate::Finished(tick))
            } else {
                None
            }
        };

        if let Some(fate) = fate {
            if let Some(handle) = enemy.handle.take() {
                host.entities.destroy(handle);
            }
            info!(%fate, hp = enemy.hp, "enemy removed");
            self.summary.fate = fate;
            self.enemy = None;
        }
    }

    fn collect_spawns(&mut self) {
        let queued = self.world.store.take_queued();
        self.summary.fired += queued.len();
        for (handle, spawn) in queued {
            let sprite = spawn.sprite.clone();
            let (motion, script) = spawn.into_parts(Some(handle));
            self.bullets.push(LiveBullet::new(motion, script, sprite));
        }
    }

    fn step_bullets(&mut self) {
        let mut host = self.world.host();
        let mut refires = Vec::new();

        for bullet in &mut self.bullets {
            if let Some(script) = bullet.script.as_mut() {
                if !script.update(&mut bullet.motion, &mut host) {
                    bullet.script = None;
                }
            }
            bullet.refresh_sprite(host.catalog);

            let m = &mut bullet.motion;
            if m.refire_pending {
                m.refire_pending = false;
                refires.push(BulletSpawn {
                    position: m.position,
                    heading: m.heading,
                    speed: m.speed,
                    template: m.template,
                    color: m.color,
                    sprite: bullet.sprite.clone(),
                    angular_velocity: 0.0,
                    acceleration: 0.0,
                    motion: None,
                });
            }

            m.integrate();
            if let Some(handle) = m.handle {
                host.entities.set_position(handle, m.position);
            }
        }

        for spawn in refires {
            if host.entities.spawn_bullet(spawn).is_some() {
                self.summary.refired += 1;
            }
        }

        let before = self.bullets.len();
        self.bullets.retain(|b| {
            let keep = !outside(b.motion.position);
            if !keep {
                if let Some(handle) = b.motion.handle {
                    host.entities.destroy(handle);
                }
            }
            keep
        });
        self.summary.culled += before - self.bullets.len();
    }
}
