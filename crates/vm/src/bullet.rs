//! Bullet-motion interpreter.
//!
//! Steers one bullet's `(speed, heading)`. The owner integrates position
//! from those every tick and reads the appearance and re-fire fields back
//! off the [`BulletMotion`] context.

use std::f32::consts::TAU;

use danmaku_common::{BulletOp, Instruction};
use glam::Vec2;

use crate::angle;
use crate::collab::{EntityHandle, Host};
use crate::cursor::{Cursor, Scratch};
use crate::dispatch::{self, Hold, Interpret, Phase, Signal};

/// The state a bullet-motion script mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletMotion {
    pub speed: f32,
    /// Degrees.
    pub heading: f32,
    pub position: Vec2,
    /// Degrees per tick added to `heading` by [`BulletMotion::integrate`].
    pub angular_velocity: f32,
    /// Added to `speed` by [`BulletMotion::integrate`].
    pub acceleration: f32,
    pub template: i32,
    pub color: i32,
    pub handle: Option<EntityHandle>,
    /// Raised by `Refire`; the owner fires again and clears it.
    pub refire_pending: bool,
}

impl BulletMotion {
    pub fn new(position: Vec2, speed: f32, heading: f32) -> Self {
        Self {
            speed,
            heading,
            position,
            angular_velocity: 0.0,
            acceleration: 0.0,
            template: 0,
            color: 0,
            handle: None,
            refire_pending: false,
        }
    }

    pub fn velocity(&self) -> Vec2 {
        angle::velocity(self.speed, self.heading)
    }

    /// Advance one tick of free flight.
    pub fn integrate(&mut self) {
        self.speed += self.acceleration;
        self.heading += self.angular_velocity;
        self.position += self.velocity();
    }
}

/// A bullet's script: a cursor over a bullet-motion program.
#[derive(Debug)]
pub struct BulletScript {
    cursor: Cursor<BulletOp>,
}

impl BulletScript {
    pub fn new(cursor: Cursor<BulletOp>) -> Self {
        Self { cursor }
    }

    pub fn cursor(&self) -> &Cursor<BulletOp> {
        &self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    /// Run one tick. Returns `true` while the script is still running.
    ///
    /// On the tick the script stops, the final speed and heading are
    /// written back to the bullet's entity.
    pub fn update(&mut self, motion: &mut BulletMotion, host: &mut Host<'_>) -> bool {
        if self.cursor.is_finished() {
            return false;
        }

        let running = dispatch::update(&mut self.cursor, &mut BulletExec { motion, host });

        if !running {
            if let Some(handle) = motion.handle {
                host.entities.set_velocity(handle, motion.velocity());
                host.entities.set_rotation(handle, motion.heading);
            }
        }
        running
    }
}

struct BulletExec<'m, 'h, 'a> {
    motion: &'m mut BulletMotion,
    host: &'h mut Host<'a>,
}

impl BulletExec<'_, '_, '_> {
    fn player_heading(&self) -> Option<f32> {
        self.host
            .player
            .player_position()
            .map(|p| angle::angle_towards(self.motion.position, p))
    }
}

impl Interpret<BulletOp> for BulletExec<'_, '_, '_> {
    fn instant(&mut self, instr: &Instruction<BulletOp>) -> Signal {
        let m = &mut *self.motion;
        match instr.kind {
            BulletOp::SetVelocity => {
                m.speed = instr.scalar_a;
                m.heading = instr.scalar_b;
            }
            BulletOp::SetSpeed => m.speed = instr.scalar_a,
            BulletOp::SetAngle => m.heading = instr.scalar_a,
            BulletOp::AddAngle => m.heading += instr.scalar_a,
            BulletOp::AimAtPlayer => {
                if let Some(target) = self.player_heading() {
                    self.motion.heading = target + instr.scalar_a;
                }
            }
            BulletOp::Jitter => {
                let range = instr.scalar_a.abs();
                m.heading += self.host.rng.uniform(-range, range);
            }
            BulletOp::SetAppearance => {
                m.template = instr.extra_int;
                m.color = instr.count;
            }
            BulletOp::PlaySound => self.host.audio.play(&instr.sound_id, instr.volume),
            _ => {}
        }
        Signal::Continue
    }

    fn timed(
        &mut self,
        instr: &Instruction<BulletOp>,
        phase: Phase,
        scratch: &mut Option<Scratch>,
    ) -> Hold {
        match phase {
            Phase::Run { frame, t, .. } => self.run(instr, frame, t, scratch),
            Phase::Finish => {
                self.finish(instr, scratch);
                Hold::Release
            }
        }
    }
}

impl BulletExec<'_, '_, '_> {
    fn run(
        &mut self,
        instr: &Instruction<BulletOp>,
        frame: i32,
        t: f32,
        scratch: &mut Option<Scratch>,
    ) -> Hold {
        match instr.kind {
            BulletOp::Accelerate => self.motion.speed += instr.scalar_a,
            BulletOp::Rotate => self.motion.heading += instr.scalar_a,
            BulletOp::LerpSpeed => {
                let start = start_value(scratch, self.motion.speed);
                self.motion.speed = lerp(start, instr.scalar_a, t);
            }
            BulletOp::LerpAngle => {
                let start = start_value(scratch, self.motion.heading);
                self.motion.heading = lerp(start, instr.scalar_a, t);
            }
            BulletOp::Home => {
                if let Some(target) = self.player_heading() {
                    self.motion.heading =
                        angle::turn_towards(self.motion.heading, target, instr.scalar_a);
                }
            }
            BulletOp::Wave => {
                let applied = match scratch {
                    Some(Scratch::Wave { applied }) => *applied,
                    _ => 0.0,
                };
                let offset = wave_offset(instr.scalar_a, instr.scalar_b, frame + 1);
                self.motion.heading += offset - applied;
                *scratch = Some(Scratch::Wave { applied: offset });
            }
            BulletOp::ZigZag => {
                let base = start_value(scratch, self.motion.heading);
                let interval = instr.count.max(1);
                let side = if (frame / interval) % 2 == 0 { 1.0 } else { -1.0 };
                self.motion.heading = base + side * instr.scalar_a;
            }
            BulletOp::Refire => return self.refire(scratch),
            _ => {}
        }
        Hold::Pending
    }

    fn finish(&mut self, instr: &Instruction<BulletOp>, scratch: &mut Option<Scratch>) {
        match (instr.kind, *scratch) {
            (BulletOp::LerpSpeed, _) => self.motion.speed = instr.scalar_a,
            (BulletOp::LerpAngle, _) => self.motion.heading = instr.scalar_a,
            (BulletOp::Wave, Some(Scratch::Wave { applied })) => self.motion.heading -= applied,
            (BulletOp::ZigZag, Some(Scratch::Start(base))) => self.motion.heading = base,
            _ => {}
        }
    }

    fn refire(&mut self, scratch: &mut Option<Scratch>) -> Hold {
        if scratch.is_none() {
            self.motion.refire_pending = true;
            *scratch = Some(Scratch::Raised);
            return Hold::Pending;
        }
        if self.motion.refire_pending {
            Hold::Pending
        } else {
            Hold::Release
        }
    }
}

/// The value captured on the first tick of a span, capturing `current` if
/// nothing was captured yet.
pub(crate) fn start_value(scratch: &mut Option<Scratch>, current: f32) -> f32 {
    match scratch {
        Some(Scratch::Start(start)) => *start,
        _ => {
            *scratch = Some(Scratch::Start(current));
            current
        }
    }
}

pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

fn wave_offset(amplitude: f32, period: f32, frame: i32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    amplitude * (TAU * frame as f32 / period).sin()
}
