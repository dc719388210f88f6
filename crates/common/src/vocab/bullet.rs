//! Bullet-motion vocabulary: steers one bullet's speed and heading.
//!
//! Headings are degrees, 0 pointing along +x, growing counter-clockwise.

use super::{display_mnemonic, Flow, OpKind, Vocabulary};
use crate::instruction::Instruction;

/// A bullet-motion instruction kind.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulletOp {
    /// speed = `scalar_a`, heading = `scalar_b`.
    SetVelocity = 0x01,
    /// speed = `scalar_a`.
    SetSpeed = 0x02,
    /// heading = `scalar_a`.
    SetAngle = 0x03,
    /// heading += `scalar_a`.
    AddAngle = 0x04,
    /// heading = angle towards the player + `scalar_a`.
    AimAtPlayer = 0x05,
    /// heading += uniform(-`scalar_a`, `scalar_a`), once.
    Jitter = 0x06,

    /// speed += `scalar_a` every tick for `duration` ticks.
    Accelerate = 0x10,
    /// heading += `scalar_a` every tick for `duration` ticks.
    Rotate = 0x11,
    /// Interpolate speed from its current value to `scalar_a`.
    LerpSpeed = 0x12,
    /// Interpolate heading from its current value to `scalar_a`.
    LerpAngle = 0x13,
    /// Turn towards the player by at most `scalar_a` degrees per tick.
    Home = 0x14,
    /// Sinusoidal heading offset: amplitude `scalar_a`, period `scalar_b` ticks.
    Wave = 0x15,
    /// Alternate heading between base +/- `scalar_a` every `count` ticks.
    ZigZag = 0x16,

    /// Swap the visual template (`extra_int`) and color (`count`).
    SetAppearance = 0x20,
    /// Play `sound_id` at `volume` when reached.
    PlaySound = 0x21,
    /// Raise the re-fire signal and hold until the owner acknowledges it.
    Refire = 0x22,

    Wait = 0x30,
    LoopStart = 0x31,
    LoopEnd = 0x32,
    Call = 0x33,
    Return = 0x34,
    End = 0x35,
}

/// All bullet-motion kinds, in definition order.
pub const ALL_BULLET_OPS: [BulletOp; 22] = [
    BulletOp::SetVelocity,
    BulletOp::SetSpeed,
    BulletOp::SetAngle,
    BulletOp::AddAngle,
    BulletOp::AimAtPlayer,
    BulletOp::Jitter,
    BulletOp::Accelerate,
    BulletOp::Rotate,
    BulletOp::LerpSpeed,
    BulletOp::LerpAngle,
    BulletOp::Home,
    BulletOp::Wave,
    BulletOp::ZigZag,
    BulletOp::SetAppearance,
    BulletOp::PlaySound,
    BulletOp::Refire,
    BulletOp::Wait,
    BulletOp::LoopStart,
    BulletOp::LoopEnd,
    BulletOp::Call,
    BulletOp::Return,
    BulletOp::End,
];

impl OpKind for BulletOp {
    const VOCABULARY: Vocabulary = Vocabulary::BulletMotion;
    const WAIT: Self = BulletOp::Wait;
    const LOOP_START: Self = BulletOp::LoopStart;
    const LOOP_END: Self = BulletOp::LoopEnd;
    const CALL: Self = BulletOp::Call;
    const RETURN: Self = BulletOp::Return;
    const END: Self = BulletOp::End;

    fn flow(self) -> Flow {
        match self {
            BulletOp::SetVelocity
            | BulletOp::SetSpeed
            | BulletOp::SetAngle
            | BulletOp::AddAngle
            | BulletOp::AimAtPlayer
            | BulletOp::Jitter
            | BulletOp::SetAppearance
            | BulletOp::PlaySound => Flow::Instant,
            BulletOp::Accelerate
            | BulletOp::Rotate
            | BulletOp::LerpSpeed
            | BulletOp::LerpAngle
            | BulletOp::Home
            | BulletOp::Wave
            | BulletOp::ZigZag
            | BulletOp::Wait => Flow::Timed,
            BulletOp::Refire => Flow::Yield,
            BulletOp::LoopStart => Flow::LoopStart,
            BulletOp::LoopEnd => Flow::LoopEnd,
            BulletOp::Call => Flow::Call,
            BulletOp::Return => Flow::Return,
            BulletOp::End => Flow::End,
        }
    }

    fn mnemonic(self) -> &'static str {
        match self {
            BulletOp::SetVelocity => "SET_VELOCITY",
            BulletOp::SetSpeed => "SET_SPEED",
            BulletOp::SetAngle => "SET_ANGLE",
            BulletOp::AddAngle => "ADD_ANGLE",
            BulletOp::AimAtPlayer => "AIM_AT_PLAYER",
            BulletOp::Jitter => "JITTER",
            BulletOp::Accelerate => "ACCELERATE",
            BulletOp::Rotate => "ROTATE",
            BulletOp::LerpSpeed => "LERP_SPEED",
            BulletOp::LerpAngle => "LERP_ANGLE",
            BulletOp::Home => "HOME",
            BulletOp::Wave => "WAVE",
            BulletOp::ZigZag => "ZIGZAG",
            BulletOp::SetAppearance => "SET_APPEARANCE",
            BulletOp::PlaySound => "PLAY_SOUND",
            BulletOp::Refire => "REFIRE",
            BulletOp::Wait => "WAIT",
            BulletOp::LoopStart => "LOOP_START",
            BulletOp::LoopEnd => "LOOP_END",
            BulletOp::Call => "CALL",
            BulletOp::Return => "RETURN",
            BulletOp::End => "END",
        }
    }
}

display_mnemonic!(BulletOp);

type Instr = Instruction<BulletOp>;

pub fn set_velocity(speed: f32, angle: f32) -> Instr {
    Instr::new(BulletOp::SetVelocity).with_scalars(speed, angle)
}

pub fn set_speed(speed: f32) -> Instr {
    Instr::new(BulletOp::SetSpeed).with_scalar(speed)
}

pub fn set_angle(angle: f32) -> Instr {
    Instr::new(BulletOp::SetAngle).with_scalar(angle)
}

pub fn add_angle(delta: f32) -> Instr {
    Instr::new(BulletOp::AddAngle).with_scalar(delta)
}

pub fn aim_at_player(offset: f32) -> Instr {
    Instr::new(BulletOp::AimAtPlayer).with_scalar(offset)
}

pub fn jitter(range: f32) -> Instr {
    Instr::new(BulletOp::Jitter).with_scalar(range)
}

pub fn accelerate(per_tick: f32, ticks: i32) -> Instr {
    Instr::new(BulletOp::Accelerate)
        .with_scalar(per_tick)
        .with_duration(ticks)
}

pub fn rotate(degrees_per_tick: f32, ticks: i32) -> Instr {
    Instr::new(BulletOp::Rotate)
        .with_scalar(degrees_per_tick)
        .with_duration(ticks)
}

pub fn lerp_speed(target: f32, ticks: i32) -> Instr {
    Instr::new(BulletOp::LerpSpeed)
        .with_scalar(target)
        .with_duration(ticks)
}

pub fn lerp_angle(target: f32, ticks: i32) -> Instr {
    Instr::new(BulletOp::LerpAngle)
        .with_scalar(target)
        .with_duration(ticks)
}

pub fn home(max_turn: f32, ticks: i32) -> Instr {
    Instr::new(BulletOp::Home)
        .with_scalar(max_turn)
        .with_duration(ticks)
}

pub fn wave(amplitude: f32, period: f32, ticks: i32) -> Instr {
    Instr::new(BulletOp::Wave)
        .with_scalars(amplitude, period)
        .with_duration(ticks)
}

pub fn zigzag(amplitude: f32, interval: i32, ticks: i32) -> Instr {
    Instr::new(BulletOp::ZigZag)
        .with_scalar(amplitude)
        .with_count(interval)
        .with_duration(ticks)
}

pub fn set_appearance(template: i32, color: i32) -> Instr {
    Instr::new(BulletOp::SetAppearance)
        .with_extra(template)
        .with_count(color)
}

pub fn play_sound(sound_id: &str, volume: f32) -> Instr {
    Instr::new(BulletOp::PlaySound).with_sound(sound_id, volume)
}

pub fn refire() -> Instr {
    Instr::new(BulletOp::Refire)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn discriminants_are_unique() {
        let codes: HashSet<u8> = ALL_BULLET_OPS.iter().map(|&op| op as u8).collect();
        assert_eq!(codes.len(), ALL_BULLET_OPS.len());
    }

    #[test]
    fn mnemonics_are_unique() {
        let names: HashSet<&str> = ALL_BULLET_OPS.iter().map(|op| op.mnemonic()).collect();
        assert_eq!(names.len(), ALL_BULLET_OPS.len());
    }

    #[test]
    fn refire_is_the_only_yield() {
        let yields: Vec<_> = ALL_BULLET_OPS
            .iter()
            .filter(|op| op.flow() == Flow::Yield)
            .collect();
        assert_eq!(yields, vec![&BulletOp::Refire]);
    }

    #[test]
    fn constructors_fill_operands() {
        let instr = set_velocity(5.0, 90.0);
        assert_eq!((instr.scalar_a, instr.scalar_b), (5.0, 90.0));

        let instr = zigzag(30.0, 8, 64);
        assert_eq!(instr.count, 8);
        assert_eq!(instr.duration, 64);

        let instr = set_appearance(2, 5);
        assert_eq!((instr.extra_int, instr.count), (2, 5));

        let instr = play_sound("graze", 0.5);
        assert_eq!(instr.sound_id, "graze");
        assert_eq!(instr.volume, 0.5);
    }

    #[test]
    fn display_uses_mnemonic() {
        assert_eq!(BulletOp::LerpAngle.to_string(), "LERP_ANGLE");
    }
}
