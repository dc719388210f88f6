//! Bullet-motion patterns: how a bullet flies once fired.

use danmaku_common::vocab::bullet::*;
use danmaku_common::{BulletOp, Instruction, Program, ProgramError};

use super::PatternSpec;

type Instr = Instruction<BulletOp>;

pub fn patterns() -> Result<Vec<PatternSpec<BulletOp>>, ProgramError> {
    Ok(vec![
        PatternSpec::new(
            "curve_left",
            "Bend steadily counter-clockwise for one second",
            Program::new(vec![rotate(1.5, 60), Instr::end()]),
        ),
        PatternSpec::new(
            "curve_right",
            "Bend steadily clockwise for one second",
            Program::new(vec![rotate(-1.5, 60), Instr::end()]),
        ),
        PatternSpec::new(
            "accelerate",
            "Start slow and pick up speed",
            Program::new(vec![set_speed(1.0), accelerate(0.05, 60)]),
        ),
        PatternSpec::new(
            "brake_and_aim",
            "Brake to a crawl, pause, then lunge at the player",
            Program::new(vec![
                lerp_speed(0.5, 30),
                Instr::wait(20),
                aim_at_player(0.0),
                set_appearance(3, 0),
                set_speed(3.5),
            ]),
        ),
        PatternSpec::new(
            "wave",
            "Weave side to side around the firing line",
            Program::new(vec![wave(25.0, 40.0, 240)]),
        ),
        PatternSpec::new(
            "zigzag",
            "Snap between two headings every quarter second",
            Program::new(vec![zigzag(30.0, 15, 180)]),
        ),
        PatternSpec::new(
            "homing",
            "Fly straight briefly, then track the player",
            Program::new(vec![Instr::wait(20), home(2.0, 90)]),
        ),
        PatternSpec::new(
            "split",
            "Fly, split once, then veer off faster",
            Program::new(vec![
                Instr::wait(40),
                play_sound("split", 0.4),
                refire(),
                add_angle(20.0),
                set_speed(2.5),
            ]),
        ),
        PatternSpec::new(
            "scatter",
            "Drift off course by a random amount and speed up",
            Program::new(vec![jitter(15.0), accelerate(0.02, 60)]),
        ),
        PatternSpec::new(
            "swerve",
            "Ease into a new heading and speed",
            Program::new(vec![
                Instr::wait(30),
                lerp_angle(90.0, 45),
                set_velocity(2.0, 90.0),
            ]),
        ),
    ])
}
