//! Shot-emission vocabulary: aims an emitter and spawns bullets.
//!
//! Every fire angle is relative to the emitter's base angle. Spread kinds
//! carry their angular range in `vector` as `(start or centre, arc)` and
//! their speed in `scalar_a`.

use glam::Vec2;

use super::{display_mnemonic, Flow, OpKind, Vocabulary};
use crate::instruction::Instruction;

/// A shot-emission instruction kind.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotOp {
    // Appearance
    /// Default bullet template `extra_int`, color `count`.
    SetBulletType = 0x01,
    /// Slot `extra_int` uses template `count`, color `scalar_a` (integral).
    SetSlotBulletType = 0x02,

    // Aim
    /// base angle = `scalar_a`.
    SetAngle = 0x10,
    /// base angle += `scalar_a`.
    AddAngle = 0x11,
    /// base angle = angle towards the player + `scalar_a`.
    AimAtPlayer = 0x12,
    /// Jitter the next fire instruction by uniform(-`scalar_a`, `scalar_a`).
    RandomizeNext = 0x13,

    // Fire
    /// One bullet at the base angle, speed `scalar_a`.
    Fire = 0x20,
    /// One bullet at base + `scalar_a`, speed `scalar_b`.
    FireAt = 0x21,
    /// `count` bullets on the base angle, speeds spread over
    /// [`scalar_a`, `scalar_b`].
    FireSpeeds = 0x22,
    /// `count` bullets evenly spread from `vector.x` over `vector.y` degrees.
    FireSpread = 0x23,
    /// `count` bullets evenly spread over `vector.y` degrees centred on `vector.x`.
    FireSpreadCentered = 0x24,
    /// `FireSpread` angles emitted in shuffled order.
    FireSpreadShuffled = 0x25,
    /// `count` bullets at random angles inside the centred arc.
    FireSpreadRandom = 0x26,
    /// `count` bullets around the full circle, speed `scalar_a`.
    FireRing = 0x27,

    // Slots
    /// Slot `extra_int` = angle `scalar_a`, speed `scalar_b`, offset `vector`.
    RegisterBullet = 0x30,
    /// Slot `extra_int` speed = `scalar_a`.
    SetSlotSpeed = 0x31,
    /// Slot `extra_int` angular velocity = `scalar_a` degrees per tick.
    SetSlotSpin = 0x32,
    /// Slot `extra_int` acceleration = `scalar_a` per tick.
    SetSlotAcceleration = 0x33,
    /// Slot `extra_int` offset = `vector`.
    SetSlotOffset = 0x34,
    /// Fire the bullet registered under slot `extra_int`.
    FireSlot = 0x35,
    /// Fire every registered slot in ascending slot order.
    FireAllSlots = 0x36,
    ClearSlots = 0x37,

    // Emitter
    /// Attach bullet-motion program `label` to every bullet fired.
    AttachMotion = 0x40,
    DetachMotion = 0x41,
    /// Emitter offset from its owner = `vector`.
    SetOffset = 0x42,
    /// base angle += `scalar_a` every tick for `duration` ticks.
    RotateBase = 0x43,
    PlaySound = 0x44,

    Wait = 0x50,
    LoopStart = 0x51,
    LoopEnd = 0x52,
    Call = 0x53,
    Return = 0x54,
    End = 0x55,
}

/// All shot-emission kinds, in definition order.
pub const ALL_SHOT_OPS: [ShotOp; 33] = [
    ShotOp::SetBulletType,
    ShotOp::SetSlotBulletType,
    ShotOp::SetAngle,
    ShotOp::AddAngle,
    ShotOp::AimAtPlayer,
    ShotOp::RandomizeNext,
    ShotOp::Fire,
    ShotOp::FireAt,
    ShotOp::FireSpeeds,
    ShotOp::FireSpread,
    ShotOp::FireSpreadCentered,
    ShotOp::FireSpreadShuffled,
    ShotOp::FireSpreadRandom,
    ShotOp::FireRing,
    ShotOp::RegisterBullet,
    ShotOp::SetSlotSpeed,
    ShotOp::SetSlotSpin,
    ShotOp::SetSlotAcceleration,
    ShotOp::SetSlotOffset,
    ShotOp::FireSlot,
    ShotOp::FireAllSlots,
    ShotOp::ClearSlots,
    ShotOp::AttachMotion,
    ShotOp::DetachMotion,
    ShotOp::SetOffset,
    ShotOp::RotateBase,
    ShotOp::PlaySound,
    ShotOp::Wait,
    ShotOp::LoopStart,
    ShotOp::LoopEnd,
    ShotOp::Call,
    ShotOp::Return,
    ShotOp::End,
];

impl OpKind for ShotOp {
    const VOCABULARY: Vocabulary = Vocabulary::ShotEmission;
    const WAIT: Self = ShotOp::Wait;
    const LOOP_START: Self = ShotOp::LoopStart;
    const LOOP_END: Self = ShotOp::LoopEnd;
    const CALL: Self = ShotOp::Call;
    const RETURN: Self = ShotOp::Return;
    const END: Self = ShotOp::End;

    fn flow(self) -> Flow {
        match self {
            ShotOp::RotateBase | ShotOp::Wait => Flow::Timed,
            ShotOp::LoopStart => Flow::LoopStart,
            ShotOp::LoopEnd => Flow::LoopEnd,
            ShotOp::Call => Flow::Call,
            ShotOp::Return => Flow::Return,
            ShotOp::End => Flow::End,
            _ => Flow::Instant,
        }
    }

    fn mnemonic(self) -> &'static str {
        match self {
            ShotOp::SetBulletType => "SET_BULLET_TYPE",
            ShotOp::SetSlotBulletType => "SET_SLOT_BULLET_TYPE",
            ShotOp::SetAngle => "SET_ANGLE",
            ShotOp::AddAngle => "ADD_ANGLE",
            ShotOp::AimAtPlayer => "AIM_AT_PLAYER",
            ShotOp::RandomizeNext => "RANDOMIZE_NEXT",
            ShotOp::Fire => "FIRE",
            ShotOp::FireAt => "FIRE_AT",
            ShotOp::FireSpeeds => "FIRE_SPEEDS",
            ShotOp::FireSpread => "FIRE_SPREAD",
            ShotOp::FireSpreadCentered => "FIRE_SPREAD_CENTERED",
            ShotOp::FireSpreadShuffled => "FIRE_SPREAD_SHUFFLED",
            ShotOp::FireSpreadRandom => "FIRE_SPREAD_RANDOM",
            ShotOp::FireRing => "FIRE_RING",
            ShotOp::RegisterBullet => "REGISTER_BULLET",
            ShotOp::SetSlotSpeed => "SET_SLOT_SPEED",
            ShotOp::SetSlotSpin => "SET_SLOT_SPIN",
            ShotOp::SetSlotAcceleration => "SET_SLOT_ACCELERATION",
            ShotOp::SetSlotOffset => "SET_SLOT_OFFSET",
            ShotOp::FireSlot => "FIRE_SLOT",
            ShotOp::FireAllSlots => "FIRE_ALL_SLOTS",
            ShotOp::ClearSlots => "CLEAR_SLOTS",
            ShotOp::AttachMotion => "ATTACH_MOTION",
            ShotOp::DetachMotion => "DETACH_MOTION",
            ShotOp::SetOffset => "SET_OFFSET",
            ShotOp::RotateBase => "ROTATE_BASE",
            ShotOp::PlaySound => "PLAY_SOUND",
            ShotOp::Wait => "WAIT",
            ShotOp::LoopStart => "LOOP_START",
            ShotOp::LoopEnd => "LOOP_END",
            ShotOp::Call => "CALL",
            ShotOp::Return => "RETURN",
            ShotOp::End => "END",
        }
    }

    fn fires_volley(self) -> bool {
        matches!(
            self,
            ShotOp::FireSpeeds
                | ShotOp::FireSpread
                | ShotOp::FireSpreadCentered
                | ShotOp::FireSpreadShuffled
                | ShotOp::FireSpreadRandom
                | ShotOp::FireRing
        )
    }
}

display_mnemonic!(ShotOp);

type Instr = Instruction<ShotOp>;

pub fn set_bullet_type(template: i32, color: i32) -> Instr {
    Instr::new(ShotOp::SetBulletType)
        .with_extra(template)
        .with_count(color)
}

pub fn set_slot_bullet_type(slot: i32, template: i32, color: i32) -> Instr {
    Instr::new(ShotOp::SetSlotBulletType)
        .with_extra(slot)
        .with_count(template)
        .with_scalar(color as f32)
}

pub fn set_angle(angle: f32) -> Instr {
    Instr::new(ShotOp::SetAngle).with_scalar(angle)
}

pub fn add_angle(delta: f32) -> Instr {
    Instr::new(ShotOp::AddAngle).with_scalar(delta)
}

pub fn aim_at_player(offset: f32) -> Instr {
    Instr::new(ShotOp::AimAtPlayer).with_scalar(offset)
}

pub fn randomize_next(range: f32) -> Instr {
    Instr::new(ShotOp::RandomizeNext).with_scalar(range)
}

pub fn fire(speed: f32) -> Instr {
    Instr::new(ShotOp::Fire).with_scalar(speed)
}

pub fn fire_at(angle: f32, speed: f32) -> Instr {
    Instr::new(ShotOp::FireAt).with_scalars(angle, speed)
}

pub fn fire_speeds(count: i32, min_speed: f32, max_speed: f32) -> Instr {
    Instr::new(ShotOp::FireSpeeds)
        .with_count(count)
        .with_scalars(min_speed, max_speed)
}

fn spread(kind: ShotOp, count: i32, angle: f32, arc: f32, speed: f32) -> Instr {
    Instr::new(kind)
        .with_count(count)
        .with_vector(Vec2::new(angle, arc))
        .with_scalar(speed)
}

pub fn fire_spread(count: i32, start: f32, arc: f32, speed: f32) -> Instr {
    spread(ShotOp::FireSpread, count, start, arc, speed)
}

pub fn fire_spread_centered(count: i32, center: f32, arc: f32, speed: f32) -> Instr {
    spread(ShotOp::FireSpreadCentered, count, center, arc, speed)
}

pub fn fire_spread_shuffled(count: i32, start: f32, arc: f32, speed: f32) -> Instr {
    spread(ShotOp::FireSpreadShuffled, count, start, arc, speed)
}

pub fn fire_spread_random(count: i32, center: f32, arc: f32, speed: f32) -> Instr {
    spread(ShotOp::FireSpreadRandom, count, center, arc, speed)
}

pub fn fire_ring(count: i32, speed: f32) -> Instr {
    Instr::new(ShotOp::FireRing)
        .with_count(count)
        .with_scalar(speed)
}

pub fn register_bullet(slot: i32, angle: f32, speed: f32, offset: Vec2) -> Instr {
    Instr::new(ShotOp::RegisterBullet)
        .with_extra(slot)
        .with_scalars(angle, speed)
        .with_vector(offset)
}

pub fn set_slot_speed(slot: i32, speed: f32) -> Instr {
    Instr::new(ShotOp::SetSlotSpeed)
        .with_extra(slot)
        .with_scalar(speed)
}

pub fn set_slot_spin(slot: i32, degrees_per_tick: f32) -> Instr {
    Instr::new(ShotOp::SetSlotSpin)
        .with_extra(slot)
        .with_scalar(degrees_per_tick)
}

pub fn set_slot_acceleration(slot: i32, per_tick: f32) -> Instr {
    Instr::new(ShotOp::SetSlotAcceleration)
        .with_extra(slot)
        .with_scalar(per_tick)
}

pub fn set_slot_offset(slot: i32, offset: Vec2) -> Instr {
    Instr::new(ShotOp::SetSlotOffset)
        .with_extra(slot)
        .with_vector(offset)
}

pub fn fire_slot(slot: i32) -> Instr {
    Instr::new(ShotOp::FireSlot).with_extra(slot)
}

pub fn fire_all_slots() -> Instr {
    Instr::new(ShotOp::FireAllSlots)
}

pub fn clear_slots() -> Instr {
    Instr::new(ShotOp::ClearSlots)
}

pub fn attach_motion(program: &str) -> Instr {
    Instr::new(ShotOp::AttachMotion).with_label(program)
}

pub fn detach_motion() -> Instr {
    Instr::new(ShotOp::DetachMotion)
}

pub fn set_offset(offset: Vec2) -> Instr {
    Instr::new(ShotOp::SetOffset).with_vector(offset)
}

pub fn rotate_base(degrees_per_tick: f32, ticks: i32) -> Instr {
    Instr::new(ShotOp::RotateBase)
        .with_scalar(degrees_per_tick)
        .with_duration(ticks)
}

pub fn play_sound(sound_id: &str, volume: f32) -> Instr {
    Instr::new(ShotOp::PlaySound).with_sound(sound_id, volume)
}
