//! Shot-emission interpreter.
//!
//! An [`Emitter`] owns the firing geometry: a base angle, default bullet
//! appearance, registered slots and a one-shot jitter. Fire instructions
//! turn that geometry into [`BulletSpawn`] requests handed to the host.
//! Every fire angle is `base_angle + authored angle + pending jitter`.

use std::collections::BTreeMap;

use danmaku_common::{Instruction, ShotOp};
use glam::Vec2;
use tracing::{debug, warn};

use crate::angle;
use crate::bullet::{BulletMotion, BulletScript};
use crate::collab::{BulletSprite, EntityHandle, Host};
use crate::cursor::{Cursor, Scratch};
use crate::dispatch::{self, Hold, Interpret, Phase, Signal};
use crate::spread;

/// A registered bullet configuration, fired by slot number.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// Degrees, relative to the emitter's base angle.
    pub angle: f32,
    pub speed: f32,
    pub template: i32,
    pub color: i32,
    pub offset: Vec2,
    pub angular_velocity: f32,
    pub acceleration: f32,
}

impl Slot {
    fn new(template: i32, color: i32) -> Self {
        Self {
            angle: 0.0,
            speed: 0.0,
            template,
            color,
            offset: Vec2::ZERO,
            angular_velocity: 0.0,
            acceleration: 0.0,
        }
    }
}

/// The state a shot-emission script mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    /// Where the owner currently is. Bullets leave from `origin + offset`.
    pub origin: Vec2,
    pub offset: Vec2,
    /// Degrees.
    pub base_angle: f32,
    pub template: i32,
    pub color: i32,
    pub slots: BTreeMap<i32, Slot>,
    /// Jitter range for the next fire instruction. Zero when none is pending.
    pub jitter: f32,
    /// Bullet-motion program attached to every bullet fired.
    pub motion: Option<String>,
    /// Bullets the host accepted.
    pub fired: usize,
}

impl Emitter {
    pub fn new(origin: Vec2) -> Self {
        Self {
            origin,
            offset: Vec2::ZERO,
            base_angle: 0.0,
            template: 0,
            color: 0,
            slots: BTreeMap::new(),
            jitter: 0.0,
            motion: None,
            fired: 0,
        }
    }

    pub fn muzzle(&self) -> Vec2 {
        self.origin + self.offset
    }
}

/// A bullet the shot interpreter asks the host to create.
#[derive(Debug)]
pub struct BulletSpawn {
    pub position: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub template: i32,
    pub color: i32,
    pub sprite: BulletSprite,
    pub angular_velocity: f32,
    pub acceleration: f32,
    /// A fresh cursor over the emitter's attached motion program.
    pub motion: Option<BulletScript>,
}

impl BulletSpawn {
    /// Split into the bullet's motion context and its script.
    pub fn into_parts(self, handle: Option<EntityHandle>) -> (BulletMotion, Option<BulletScript>) {
        let motion = BulletMotion {
            speed: self.speed,
            heading: self.heading,
            position: self.position,
            angular_velocity: self.angular_velocity,
            acceleration: self.acceleration,
            template: self.template,
            color: self.color,
            handle,
            refire_pending: false,
        };
        (motion, self.motion)
    }
}

/// A shot's script: a cursor over a shot-emission program.
#[derive(Debug)]
pub struct ShotScript {
    cursor: Cursor<ShotOp>,
}

impl ShotScript {
    pub fn new(cursor: Cursor<ShotOp>) -> Self {
        Self { cursor }
    }

    pub fn cursor(&self) -> &Cursor<ShotOp> {
        &self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    /// Run one tick. Returns `true` while the script is still running.
    pub fn update(&mut self, emitter: &mut Emitter, host: &mut Host<'_>) -> bool {
        dispatch::update(&mut self.cursor, &mut ShotExec { emitter, host })
    }
}

/// One bullet of a volley, relative to the emitter.
struct Shot {
    angle: f32,
    speed: f32,
    template: i32,
    color: i32,
    offset: Vec2,
    angular_velocity: f32,
    acceleration: f32,
}

struct ShotExec<'e, 'h, 'a> {
    emitter: &'e mut Emitter,
    host: &'h mut Host<'a>,
}

impl ShotExec<'_, '_, '_> {
    fn plain(&self, angle: f32, speed: f32) -> Shot {
        Shot {
            angle,
            speed,
            template: self.emitter.template,
            color: self.emitter.color,
            offset: Vec2::ZERO,
            angular_velocity: 0.0,
            acceleration: 0.0,
        }
    }

    fn slot_shot(slot: &Slot) -> Shot {
        Shot {
            angle: slot.angle,
            speed: slot.speed,
            template: slot.template,
            color: slot.color,
            offset: slot.offset,
            angular_velocity: slot.angular_velocity,
            acceleration: slot.acceleration,
        }
    }

    fn slot_mut(&mut self, slot: i32) -> &mut Slot {
        let (template, color) = (self.emitter.template, self.emitter.color);
        self.emitter
            .slots
            .entry(slot)
            .or_insert_with(|| Slot::new(template, color))
    }

    /// Build the volley an instruction describes. `None` for kinds that
    /// do not fire.
    fn volley(&mut self, instr: &Instruction<ShotOp>) -> Option<Vec<Shot>> {
        let speed = instr.scalar_a;
        let (start, arc) = (instr.vector.x, instr.vector.y);
        let shots = match instr.kind {
            ShotOp::Fire => vec![self.plain(0.0, speed)],
            ShotOp::FireAt => vec![self.plain(instr.scalar_a, instr.scalar_b)],
            ShotOp::FireSpeeds => spread::fan_speeds(instr.count, instr.scalar_a, instr.scalar_b)
                .into_iter()
                .map(|s| self.plain(0.0, s))
                .collect(),
            ShotOp::FireSpread => self.at_angles(spread::spread_angles(instr.count, start, arc), speed),
            ShotOp::FireSpreadCentered => {
                self.at_angles(spread::centered_angles(instr.count, start, arc), speed)
            }
            ShotOp::FireSpreadShuffled => {
                let angles = spread::spread_angles(instr.count, start, arc);
                let mut order: Vec<usize> = (0..angles.len()).collect();
                self.host.rng.shuffle(&mut order);
                self.at_angles(order.into_iter().map(|i| angles[i]).collect(), speed)
            }
            ShotOp::FireSpreadRandom => {
                let angles = spread::random_angles(instr.count, start, arc, &mut *self.host.rng);
                self.at_angles(angles, speed)
            }
            ShotOp::FireRing => self.at_angles(spread::ring_angles(instr.count, 0.0), speed),
            ShotOp::FireSlot => match self.emitter.slots.get(&instr.extra_int) {
                Some(slot) => vec![Self::slot_shot(slot)],
                None => {
                    debug!(slot = instr.extra_int, "fire of unregistered slot");
                    Vec::new()
                }
            },
            ShotOp::FireAllSlots => self.emitter.slots.values().map(Self::slot_shot).collect(),
            _ => return None,
        };
        Some(shots)
    }

    fn at_angles(&self, angles: Vec<f32>, speed: f32) -> Vec<Shot> {
        angles.into_iter().map(|a| self.plain(a, speed)).collect()
    }

    fn fire(&mut self, shots: Vec<Shot>) {
        let jitter = std::mem::take(&mut self.emitter.jitter);
        let jitter = if jitter == 0.0 {
            0.0
        } else {
            self.host.rng.uniform(-jitter, jitter)
        };

        for shot in shots {
            let heading = self.emitter.base_angle + shot.angle + jitter;
            self.spawn(shot, heading);
        }
    }

    fn spawn(&mut self, shot: Shot, heading: f32) {
        let Some(sprite) = self.host.catalog.resolve(shot.template, shot.color) else {
            warn!(
                template = shot.template,
                color = shot.color,
                "unresolved bullet sprite, nothing spawned"
            );
            return;
        };

        let motion = self.emitter.motion.as_deref().and_then(|name| {
            let cursor = self.host.library.bullets.clone_cursor(name);
            if cursor.is_none() {
                warn!(program = name, "unknown bullet-motion program, bullet flies straight");
            }
            cursor.map(BulletScript::new)
        });

        let spawn = BulletSpawn {
            position: self.emitter.muzzle() + shot.offset,
            heading,
            speed: shot.speed,
            template: shot.template,
            color: shot.color,
            sprite,
            angular_velocity: shot.angular_velocity,
            acceleration: shot.acceleration,
            motion,
        };
        if self.host.entities.spawn_bullet(spawn).is_some() {
            self.emitter.fired += 1;
        }
    }
}

impl Interpret<ShotOp> for ShotExec<'_, '_, '_> {
    fn instant(&mut self, instr: &Instruction<ShotOp>) -> Signal {
        if let Some(shots) = self.volley(instr) {
            self.fire(shots);
            return Signal::Continue;
        }

        match instr.kind {
            ShotOp::SetBulletType => {
                self.emitter.template = instr.extra_int;
                self.emitter.color = instr.count;
            }
            ShotOp::SetSlotBulletType => {
                let slot = self.slot_mut(instr.extra_int);
                slot.template = instr.count;
                slot.color = instr.scalar_a as i32;
            }
            ShotOp::SetAngle => self.emitter.base_angle = instr.scalar_a,
            ShotOp::AddAngle => self.emitter.base_angle += instr.scalar_a,
            ShotOp::AimAtPlayer => {
                if let Some(player) = self.host.player.player_position() {
                    self.emitter.base_angle =
                        angle::angle_towards(self.emitter.muzzle(), player) + instr.scalar_a;
                }
            }
            ShotOp::RandomizeNext => self.emitter.jitter = instr.scalar_a.abs(),
            ShotOp::RegisterBullet => {
                let slot = self.slot_mut(instr.extra_int);
                slot.angle = instr.scalar_a;
                slot.speed = instr.scalar_b;
                slot.offset = instr.vector;
            }
            ShotOp::SetSlotSpeed => self.slot_mut(instr.extra_int).speed = instr.scalar_a,
            ShotOp::SetSlotSpin => self.slot_mut(instr.extra_int).angular_velocity = instr.scalar_a,
            ShotOp::SetSlotAcceleration => {
                self.slot_mut(instr.extra_int).acceleration = instr.scalar_a
            }
            ShotOp::SetSlotOffset => self.slot_mut(instr.extra_int).offset = instr.vector,
            ShotOp::ClearSlots => self.emitter.slots.clear(),
            ShotOp::AttachMotion => self.emitter.motion = Some(instr.label.clone()),
            ShotOp::DetachMotion => self.emitter.motion = None,
            ShotOp::SetOffset => self.emitter.offset = instr.vector,
            ShotOp::PlaySound => self.host.audio.play(&instr.sound_id, instr.volume),
            _ => {}
        }
        Signal::Continue
    }

    fn timed(
        &mut self,
        instr: &Instruction<ShotOp>,
        phase: Phase,
        _scratch: &mut Option<Scratch>,
    ) -> Hold {
        match phase {
            Phase::Run { .. } => {
                if instr.kind == ShotOp::RotateBase {
                    self.emitter.base_angle += instr.scalar_a;
                }
                Hold::Pending
            }
            Phase::Finish => Hold::Release,
        }
    }
}
