//! Enemy-behavior vocabulary: moves, arms and configures one enemy.

use glam::Vec2;

use super::{display_mnemonic, Flow, OpKind, Vocabulary};
use crate::instruction::Instruction;

/// An enemy-behavior instruction kind.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyOp {
    // Setup
    /// hp = `extra_int`.
    SetHp = 0x01,
    /// Hitbox radius = `scalar_a`.
    SetHitbox = 0x02,
    /// Append `count` of item `extra_int` to the drop table.
    AddDrop = 0x03,
    ClearDrops = 0x04,
    /// Facing angle = `scalar_a`.
    SetAngle = 0x05,
    /// Kill the enemy immediately and stop the script.
    Die = 0x06,

    // Movement
    /// Linear move from the current position to `vector`.
    MoveTo = 0x10,
    /// Linear move by `vector` relative to the starting position.
    MoveBy = 0x11,
    /// position = `vector`.
    Teleport = 0x12,
    /// velocity = `vector` (units per tick).
    SetVelocity = 0x13,
    /// acceleration = `vector` (units per tick squared).
    SetAcceleration = 0x14,
    /// Zero velocity and acceleration.
    Stop = 0x15,
    /// Facing angle += `scalar_a` every tick.
    Rotate = 0x16,
    /// position = start + `vector` * sin(2pi * frame / `scalar_a`).
    Oscillate = 0x17,
    /// Fly at speed `scalar_a`, turning towards the player by at most
    /// `scalar_b` degrees per tick.
    Home = 0x18,
    /// Follow path `extra_int`, sampling it at t = frame / duration.
    FollowPath = 0x19,
    /// Drift between random points within `scalar_a` of the start,
    /// spending `count` ticks on each leg.
    Wander = 0x1A,
    /// Patrol random points inside the box of half extents `vector`
    /// around the start, travelling at `scalar_a` units per tick.
    Patrol = 0x1B,
    Wait = 0x1C,

    // Weapons and cosmetics
    /// Start the shot program named `label` from fire slot `extra_int`.
    Fire = 0x20,
    /// Custom per-tick hook id = `extra_int`.
    SetUpdateHook = 0x21,
    /// Effect slot `extra_int` emits effect `count`.
    SetEffect = 0x22,
    /// Fire slot `extra_int` sits at `vector` from the enemy.
    SetFireOffset = 0x23,
    PlaySound = 0x24,

    LoopStart = 0x30,
    LoopEnd = 0x31,
    Call = 0x32,
    Return = 0x33,
    End = 0x34,
}

/// All enemy-behavior kinds, in definition order.
pub const ALL_ENEMY_OPS: [EnemyOp; 29] = [
    EnemyOp::SetHp,
    EnemyOp::SetHitbox,
    EnemyOp::AddDrop,
    EnemyOp::ClearDrops,
    EnemyOp::SetAngle,
    EnemyOp::Die,
    EnemyOp::MoveTo,
    EnemyOp::MoveBy,
    EnemyOp::Teleport,
    EnemyOp::SetVelocity,
    EnemyOp::SetAcceleration,
    EnemyOp::Stop,
    EnemyOp::Rotate,
    EnemyOp::Oscillate,
    EnemyOp::Home,
    EnemyOp::FollowPath,
    EnemyOp::Wander,
    EnemyOp::Patrol,
    EnemyOp::Wait,
    EnemyOp::Fire,
    EnemyOp::SetUpdateHook,
    EnemyOp::SetEffect,
    EnemyOp::SetFireOffset,
    EnemyOp::PlaySound,
    EnemyOp::LoopStart,
    EnemyOp::LoopEnd,
    EnemyOp::Call,
    EnemyOp::Return,
    EnemyOp::End,
];

impl OpKind for EnemyOp {
    const VOCABULARY: Vocabulary = Vocabulary::EnemyBehavior;
    const WAIT: Self = EnemyOp::Wait;
    const LOOP_START: Self = EnemyOp::LoopStart;
    const LOOP_END: Self = EnemyOp::LoopEnd;
    const CALL: Self = EnemyOp::Call;
    const RETURN: Self = EnemyOp::Return;
    const END: Self = EnemyOp::End;

    fn flow(self) -> Flow {
        match self {
            EnemyOp::SetHp
            | EnemyOp::SetHitbox
            | EnemyOp::AddDrop
            | EnemyOp::ClearDrops
            | EnemyOp::SetAngle
            | EnemyOp::Die
            | EnemyOp::Teleport
            | EnemyOp::SetVelocity
            | EnemyOp::SetAcceleration
            | EnemyOp::Stop
            | EnemyOp::Fire
            | EnemyOp::SetUpdateHook
            | EnemyOp::SetEffect
            | EnemyOp::SetFireOffset
            | EnemyOp::PlaySound => Flow::Instant,
            EnemyOp::MoveTo
            | EnemyOp::MoveBy
            | EnemyOp::Rotate
            | EnemyOp::Oscillate
            | EnemyOp::Home
            | EnemyOp::FollowPath
            | EnemyOp::Wander
            | EnemyOp::Patrol
            | EnemyOp::Wait => Flow::Timed,
            EnemyOp::LoopStart => Flow::LoopStart,
            EnemyOp::LoopEnd => Flow::LoopEnd,
            EnemyOp::Call => Flow::Call,
            EnemyOp::Return => Flow::Return,
            EnemyOp::End => Flow::End,
        }
    }

    fn mnemonic(self) -> &'static str {
        match self {
            EnemyOp::SetHp => "SET_HP",
            EnemyOp::SetHitbox => "SET_HITBOX",
            EnemyOp::AddDrop => "ADD_DROP",
            EnemyOp::ClearDrops => "CLEAR_DROPS",
            EnemyOp::SetAngle => "SET_ANGLE",
            EnemyOp::Die => "DIE",
            EnemyOp::MoveTo => "MOVE_TO",
            EnemyOp::MoveBy => "MOVE_BY",
            EnemyOp::Teleport => "TELEPORT",
            EnemyOp::SetVelocity => "SET_VELOCITY",
            EnemyOp::SetAcceleration => "SET_ACCELERATION",
            EnemyOp::Stop => "STOP",
            EnemyOp::Rotate => "ROTATE",
            EnemyOp::Oscillate => "OSCILLATE",
            EnemyOp::Home => "HOME",
            EnemyOp::FollowPath => "FOLLOW_PATH",
            EnemyOp::Wander => "WANDER",
            EnemyOp::Patrol => "PATROL",
            EnemyOp::Wait => "WAIT",
            EnemyOp::Fire => "FIRE",
            EnemyOp::SetUpdateHook => "SET_UPDATE_HOOK",
            EnemyOp::SetEffect => "SET_EFFECT",
            EnemyOp::SetFireOffset => "SET_FIRE_OFFSET",
            EnemyOp::PlaySound => "PLAY_SOUND",
            EnemyOp::LoopStart => "LOOP_START",
            EnemyOp::LoopEnd => "LOOP_END",
            EnemyOp::Call => "CALL",
            EnemyOp::Return => "RETURN",
            EnemyOp::End => "END",
        }
    }
}

display_mnemonic!(EnemyOp);

type Instr = Instruction<EnemyOp>;

pub fn set_hp(hp: i32) -> Instr {
    Instr::new(EnemyOp::SetHp).with_extra(hp)
}

pub fn set_hitbox(radius: f32) -> Instr {
    Instr::new(EnemyOp::SetHitbox).with_scalar(radius)
}

pub fn add_drop(item: i32, count: i32) -> Instr {
    Instr::new(EnemyOp::AddDrop).with_extra(item).with_count(count)
}

pub fn clear_drops() -> Instr {
    Instr::new(EnemyOp::ClearDrops)
}

pub fn set_angle(angle: f32) -> Instr {
    Instr::new(EnemyOp::SetAngle).with_scalar(angle)
}

pub fn die() -> Instr {
    Instr::new(EnemyOp::Die)
}

pub fn move_to(target: Vec2, ticks: i32) -> Instr {
    Instr::new(EnemyOp::MoveTo)
        .with_vector(target)
        .with_duration(ticks)
}

pub fn move_by(delta: Vec2, ticks: i32) -> Instr {
    Instr::new(EnemyOp::MoveBy)
        .with_vector(delta)
        .with_duration(ticks)
}

pub fn teleport(position: Vec2) -> Instr {
    Instr::new(EnemyOp::Teleport).with_vector(position)
}

pub fn set_velocity(velocity: Vec2) -> Instr {
    Instr::new(EnemyOp::SetVelocity).with_vector(velocity)
}

pub fn set_acceleration(acceleration: Vec2) -> Instr {
    Instr::new(EnemyOp::SetAcceleration).with_vector(acceleration)
}

pub fn stop() -> Instr {
    Instr::new(EnemyOp::Stop)
}

pub fn rotate(degrees_per_tick: f32, ticks: i32) -> Instr {
    Instr::new(EnemyOp::Rotate)
        .with_scalar(degrees_per_tick)
        .with_duration(ticks)
}

pub fn oscillate(amplitude: Vec2, period: f32, ticks: i32) -> Instr {
    Instr::new(EnemyOp::Oscillate)
        .with_vector(amplitude)
        .with_scalar(period)
        .with_duration(ticks)
}

pub fn home(speed: f32, max_turn: f32, ticks: i32) -> Instr {
    Instr::new(EnemyOp::Home)
        .with_scalars(speed, max_turn)
        .with_duration(ticks)
}

pub fn follow_path(path: i32, ticks: i32) -> Instr {
    Instr::new(EnemyOp::FollowPath)
        .with_extra(path)
        .with_duration(ticks)
}

pub fn wander(radius: f32, leg_ticks: i32, ticks: i32) -> Instr {
    Instr::new(EnemyOp::Wander)
        .with_scalar(radius)
        .with_count(leg_ticks)
        .with_duration(ticks)
}

pub fn patrol(half_extents: Vec2, speed: f32, ticks: i32) -> Instr {
    Instr::new(EnemyOp::Patrol)
        .with_vector(half_extents)
        .with_scalar(speed)
        .with_duration(ticks)
}

pub fn fire(shot: &str, slot: i32) -> Instr {
    Instr::new(EnemyOp::Fire).with_label(shot).with_extra(slot)
}

pub fn set_update_hook(hook: i32) -> Instr {
    Instr::new(EnemyOp::SetUpdateHook).with_extra(hook)
}

pub fn set_effect(slot: i32, effect: i32) -> Instr {
    Instr::new(EnemyOp::SetEffect).with_extra(slot).with_count(effect)
}

pub fn set_fire_offset(slot: i32, offset: Vec2) -> Instr {
    Instr::new(EnemyOp::SetFireOffset)
        .with_extra(slot)
        .with_vector(offset)
}

pub fn play_sound(sound_id: &str, volume: f32) -> Instr {
    Instr::new(EnemyOp::PlaySound).with_sound(sound_id, volume)
}
