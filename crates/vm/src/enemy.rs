//! Enemy-behavior interpreter.
//!
//! Drives a whole enemy: stats, drop table, movement and the shot
//! programs it fires. Fired shots run alongside the behavior script and
//! never block it; [`Enemy::tick_shots`] advances them.

use std::collections::BTreeMap;
use std::f32::consts::TAU;

use danmaku_common::{EnemyOp, Instruction};
use glam::Vec2;
use tracing::{debug, warn};

use crate::angle;
use crate::collab::{EntityHandle, Host, RandomSource};
use crate::cursor::{Cursor, Scratch};
use crate::dispatch::{self, Hold, Interpret, Phase, Signal};
use crate::shot::{Emitter, ShotScript};

/// One drop-table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemDrop {
    pub item: i32,
    pub count: i32,
}

/// A shot program the enemy has fired and is still running.
#[derive(Debug)]
pub struct ActiveShot {
    pub name: String,
    /// Fire slot the shot leaves from.
    pub slot: i32,
    pub emitter: Emitter,
    pub script: ShotScript,
}

/// The state an enemy-behavior script mutates.
#[derive(Debug)]
pub struct Enemy {
    pub hp: i32,
    pub hitbox: f32,
    pub position: Vec2,
    /// Units per tick.
    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Facing, degrees.
    pub angle: f32,
    pub drops: Vec<ItemDrop>,
    pub update_hook: Option<i32>,
    /// Effect slot -> effect id.
    pub effects: BTreeMap<i32, i32>,
    /// Fire slot -> offset from `position`.
    pub fire_offsets: BTreeMap<i32, Vec2>,
    pub dead: bool,
    pub handle: Option<EntityHandle>,
    pub shots: Vec<ActiveShot>,
}

impl Enemy {
    pub fn new(position: Vec2) -> Self {
        Self {
            hp: 1,
            hitbox: 0.0,
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            angle: 0.0,
            drops: Vec::new(),
            update_hook: None,
            effects: BTreeMap::new(),
            fire_offsets: BTreeMap::new(),
            dead: false,
            handle: None,
            shots: Vec::new(),
        }
    }

    /// Where fire slot `slot` currently is.
    pub fn fire_origin(&self, slot: i32) -> Vec2 {
        self.position + self.fire_offsets.get(&slot).copied().unwrap_or(Vec2::ZERO)
    }

    /// Apply acceleration then velocity for one tick.
    pub fn integrate(&mut self) {
        self.velocity += self.acceleration;
        self.position += self.velocity;
    }

    /// Advance every active shot one tick, dropping the finished ones.
    /// Returns how many are still running.
    pub fn tick_shots(&mut self, host: &mut Host<'_>) -> usize {
        let mut shots = std::mem::take(&mut self.shots);
        shots.retain_mut(|shot| {
            shot.emitter.origin = self.fire_origin(shot.slot);
            let running = shot.script.update(&mut shot.emitter, host);
            if !running {
                debug!(shot = %shot.name, fired = shot.emitter.fired, "shot finished");
            }
            running
        });
        self.shots = shots;
        self.shots.len()
    }
}

/// An enemy's behavior script.
#[derive(Debug)]
pub struct EnemyScript {
    cursor: Cursor<EnemyOp>,
}

impl EnemyScript {
    pub fn new(cursor: Cursor<EnemyOp>) -> Self {
        Self { cursor }
    }

    pub fn cursor(&self) -> &Cursor<EnemyOp> {
        &self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    /// Run one tick. Returns `true` while the script is still running.
    ///
    /// The enemy's position and facing are pushed to its entity afterwards
    /// unless it died this tick.
    pub fn update(&mut self, enemy: &mut Enemy, host: &mut Host<'_>) -> bool {
        if self.cursor.is_finished() {
            return false;
        }

        let running = dispatch::update(&mut self.cursor, &mut EnemyExec { enemy, host });

        if let Some(handle) = enemy.handle {
            host.entities.set_position(handle, enemy.position);
            host.entities.set_rotation(handle, enemy.angle);
        }
        running
    }
}

struct EnemyExec<'e, 'h, 'a> {
    enemy: &'e mut Enemy,
    host: &'h mut Host<'a>,
}

impl Interpret<EnemyOp> for EnemyExec<'_, '_, '_> {
    fn instant(&mut self, instr: &Instruction<EnemyOp>) -> Signal {
        let e = &mut *self.enemy;
        match instr.kind {
            EnemyOp::SetHp => e.hp = instr.extra_int,
            EnemyOp::SetHitbox => e.hitbox = instr.scalar_a,
            EnemyOp::AddDrop => e.drops.push(ItemDrop {
                item: instr.extra_int,
                count: instr.count,
            }),
            EnemyOp::ClearDrops => e.drops.clear(),
            EnemyOp::SetAngle => e.angle = instr.scalar_a,
            EnemyOp::Die => {
                e.dead = true;
                e.shots.clear();
                if let Some(handle) = e.handle.take() {
                    self.host.entities.destroy(handle);
                }
                return Signal::Halt;
            }
            EnemyOp::Teleport => e.position = instr.vector,
            EnemyOp::SetVelocity => e.velocity = instr.vector,
            EnemyOp::SetAcceleration => e.acceleration = instr.vector,
            EnemyOp::Stop => {
                e.velocity = Vec2::ZERO;
                e.acceleration = Vec2::ZERO;
            }
            EnemyOp::Fire => self.fire(&instr.label, instr.extra_int),
            EnemyOp::SetUpdateHook => e.update_hook = Some(instr.extra_int),
            EnemyOp::SetEffect => {
                e.effects.insert(instr.extra_int, instr.count);
            }
            EnemyOp::SetFireOffset => {
                e.fire_offsets.insert(instr.extra_int, instr.vector);
            }
            EnemyOp::PlaySound => self.host.audio.play(&instr.sound_id, instr.volume),
            _ => {}
        }
        Signal::Continue
    }

    fn timed(
        &mut self,
        instr: &Instruction<EnemyOp>,
        phase: Phase,
        scratch: &mut Option<Scratch>,
    ) -> Hold {
        match phase {
            Phase::Run { frame, t, .. } => {
                self.run(instr, frame, t, scratch);
                Hold::Pending
            }
            Phase::Finish => {
                self.finish(instr, scratch);
                Hold::Release
            }
        }
    }
}

impl EnemyExec<'_, '_, '_> {
    fn fire(&mut self, name: &str, slot: i32) {
        let Some(cursor) = self.host.library.shots.clone_cursor(name) else {
            warn!(shot = name, "unknown shot program, nothing fired");
            return;
        };
        let emitter = Emitter::new(self.enemy.fire_origin(slot));
        self.enemy.shots.push(ActiveShot {
            name: name.to_string(),
            slot,
            emitter,
            script: ShotScript::new(cursor),
        });
    }

    fn run(
        &mut self,
        instr: &Instruction<EnemyOp>,
        frame: i32,
        t: f32,
        scratch: &mut Option<Scratch>,
    ) {
        match instr.kind {
            EnemyOp::MoveTo => {
                let start = origin(scratch, self.enemy.position);
                self.enemy.position = start.lerp(instr.vector, t);
            }
            EnemyOp::MoveBy => {
                let start = origin(scratch, self.enemy.position);
                self.enemy.position = start + instr.vector * t;
            }
            EnemyOp::Rotate => self.enemy.angle += instr.scalar_a,
            EnemyOp::Oscillate => {
                let start = origin(scratch, self.enemy.position);
                self.enemy.position = start + instr.vector * swing(instr.scalar_a, frame);
            }
            EnemyOp::Home => {
                if let Some(player) = self.host.player.player_position() {
                    let target = angle::angle_towards(self.enemy.position, player);
                    self.enemy.angle = angle::turn_towards(self.enemy.angle, target, instr.scalar_b);
                }
                self.enemy.position += angle::velocity(instr.scalar_a, self.enemy.angle);
            }
            EnemyOp::FollowPath => match self.host.paths.path(instr.extra_int) {
                Some(curve) => self.enemy.position = curve.position_at(t),
                None if frame == 0 => {
                    warn!(path = instr.extra_int, "unknown path, holding position");
                }
                None => {}
            },
            EnemyOp::Wander => {
                let radius = instr.scalar_a.abs();
                let span = instr.count.max(1);
                self.walk(scratch, |rng, origin, _from| {
                    let target = origin
                        + angle::direction(rng.uniform(0.0, 360.0)) * rng.uniform(0.0, radius);
                    (target, span)
                });
            }
            EnemyOp::Patrol => {
                let half = instr.vector.abs();
                let speed = instr.scalar_a.abs();
                self.walk(scratch, |rng, origin, from| {
                    let target = origin
                        + Vec2::new(rng.uniform(-half.x, half.x), rng.uniform(-half.y, half.y));
                    (target, leg_ticks(from.distance(target), speed))
                });
            }
            _ => {}
        }
    }

    fn finish(&mut self, instr: &Instruction<EnemyOp>, scratch: &mut Option<Scratch>) {
        let start = match scratch {
            Some(Scratch::Origin(start)) => *start,
            _ => self.enemy.position,
        };
        match instr.kind {
            EnemyOp::MoveTo => self.enemy.position = instr.vector,
            EnemyOp::MoveBy => self.enemy.position = start + instr.vector,
            EnemyOp::Oscillate => {
                self.enemy.position = start + instr.vector * swing(instr.scalar_a, instr.duration);
            }
            EnemyOp::FollowPath => {
                if let Some(curve) = self.host.paths.path(instr.extra_int) {
                    self.enemy.position = curve.position_at(1.0);
                }
            }
            _ => {}
        }
    }

    /// Step along random legs. `pick` chooses the next target and how many
    /// ticks to spend reaching it, given the anchor and the leg's start.
    fn walk(
        &mut self,
        scratch: &mut Option<Scratch>,
        mut pick: impl FnMut(&mut dyn RandomSource, Vec2, Vec2) -> (Vec2, i32),
    ) {
        let (origin, from, target, timer, span) = match *scratch {
            Some(Scratch::Leg {
                origin,
                from,
                target,
                timer,
                span,
            }) => (origin, from, target, timer, span),
            _ => {
                let here = self.enemy.position;
                let (target, span) = pick(&mut *self.host.rng, here, here);
                (here, here, target, 0, span)
            }
        };

        let timer = timer + 1;
        self.enemy.position = from.lerp(target, (timer as f32 / span as f32).min(1.0));

        *scratch = Some(if timer >= span {
            let (next, next_span) = pick(&mut *self.host.rng, origin, target);
            Scratch::Leg {
                origin,
                from: target,
                target: next,
                timer: 0,
                span: next_span,
            }
        } else {
            Scratch::Leg {
                origin,
                from,
                target,
                timer,
                span,
            }
        });
    }
}

fn origin(scratch: &mut Option<Scratch>, current: Vec2) -> Vec2 {
    match scratch {
        Some(Scratch::Origin(start)) => *start,
        _ => {
            *scratch = Some(Scratch::Origin(current));
            current
        }
    }
}

/// sin(2pi * frame / period), or 0 for a non-positive period.
fn swing(period: f32, frame: i32) -> f32 {
    if period <= 0.0 {
        0.0
    } else {
        (TAU * frame as f32 / period).sin()
    }
}

fn leg_ticks(distance: f32, speed: f32) -> i32 {
    if speed <= 0.0 {
        return 1;
    }
    ((distance / speed).ceil() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integrate_applies_acceleration_first() {
        let mut enemy = Enemy::new(Vec2::ZERO);
        enemy.velocity = Vec2::new(1.0, 0.0);
        enemy.acceleration = Vec2::new(0.0, 1.0);
        enemy.integrate();
        assert_eq!(enemy.velocity, Vec2::new(1.0, 1.0));
        assert_eq!(enemy.position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn fire_origin_uses_slot_offset() {
        let mut enemy = Enemy::new(Vec2::new(100.0, 50.0));
        enemy.fire_offsets.insert(2, Vec2::new(-8.0, 4.0));
        assert_eq!(enemy.fire_origin(2), Vec2::new(92.0, 54.0));
        assert_eq!(enemy.fire_origin(0), Vec2::new(100.0, 50.0));
    }

    #[test]
    fn leg_ticks_rounds_up() {
        assert_eq!(leg_ticks(10.0, 3.0), 4);
        assert_eq!(leg_ticks(0.0, 3.0), 1);
        assert_eq!(leg_ticks(10.0, 0.0), 1);
    }

    #[test]
    fn swing_period() {
        assert!((swing(4.0, 1) - 1.0).abs() < 1e-5);
        assert_eq!(swing(0.0, 1), 0.0);
    }
}
