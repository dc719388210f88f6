//! Enemy-behavior patterns: how an enemy enters, attacks and leaves.
//!
//! Enemies spawn at the top centre of the field, (192, 32).

use danmaku_common::vocab::enemy::*;
use danmaku_common::{EnemyOp, Instruction, Program, ProgramError};
use glam::Vec2;

use super::{PatternSpec, DIVE, SWOOP};

type Instr = Instruction<EnemyOp>;

pub fn patterns() -> Result<Vec<PatternSpec<EnemyOp>>, ProgramError> {
    Ok(vec![
        PatternSpec::new(
            "fairy_aimed",
            "Drop in, fire three aimed bursts, fly back out the top",
            Program::new(vec![
                set_hp(20),
                set_hitbox(8.0),
                add_drop(1, 2),
                move_to(Vec2::new(192.0, 120.0), 60),
                Instr::loop_start(3),
                fire("aimed_burst", 0),
                Instr::wait(40),
                Instr::loop_end(),
                move_by(Vec2::new(0.0, -220.0), 90),
            ]),
        ),
        PatternSpec::new(
            "sentinel",
            "Hold the centre, alternating rings and spirals, then burst",
            Program::new(vec![
                set_hp(200),
                set_hitbox(16.0),
                add_drop(1, 5),
                add_drop(2, 1),
                set_fire_offset(1, Vec2::new(0.0, 12.0)),
                set_effect(0, 3),
                move_to(Vec2::new(192.0, 150.0), 60),
                Instr::loop_start(4),
                fire("ring", 1),
                Instr::wait(30),
                fire("spiral", 0),
                Instr::wait(90),
                Instr::loop_end(),
                play_sound("explode", 1.0),
                die(),
            ]),
        ),
        PatternSpec::new(
            "wanderer",
            "Drift around a point while raining bullets",
            Program::new(vec![
                set_hp(40),
                move_to(Vec2::new(192.0, 100.0), 40),
                fire("rain", 0),
                wander(40.0, 30, 240),
                fire("flower", 0),
                wander(40.0, 30, 120),
                move_to(Vec2::new(192.0, -64.0), 60),
            ]),
        ),
        Program::builder()
            .op(set_hp(60))
            .op(move_to(Vec2::new(192.0, 90.0), 45))
            .op(Instr::loop_start(3))
            .op(Instr::call("volley"))
            .op(patrol(Vec2::new(120.0, 30.0), 2.0, 100))
            .op(Instr::loop_end())
            .op(stop())
            .op(set_acceleration(Vec2::new(0.0, -0.05)))
            .op(Instr::wait(120))
            .op(Instr::end())
            .label("volley")
            .op(fire("fan", 0))
            .op(Instr::wait(20))
            .op(fire("speed_fan", 0))
            .op(Instr::ret())
            .build()
            .map(|program| {
                PatternSpec::new(
                    "patroller",
                    "Patrol the upper field, pausing for fan volleys",
                    program,
                )
            })?,
        PatternSpec::new(
            "swooper",
            "Swoop across the field on a curve, dropping splitters",
            Program::new(vec![
                set_hp(15),
                teleport(Vec2::new(-16.0, 60.0)),
                fire("splitter", 0),
                follow_path(SWOOP, 180),
                fire("splitter", 0),
                set_velocity(Vec2::new(2.0, -1.0)),
                Instr::wait(120),
            ]),
        ),
        PatternSpec::new(
            "diver",
            "Dive down the left flank, spin and release a wall",
            Program::new(vec![
                set_hp(10),
                set_angle(90.0),
                follow_path(DIVE, 90),
                rotate(8.0, 45),
                fire("shuffle_wall", 0),
                set_velocity(Vec2::new(0.0, 1.5)),
                set_acceleration(Vec2::new(0.0, 0.05)),
                Instr::wait(200),
            ]),
        ),
        PatternSpec::new(
            "oscillator",
            "Sway left and right while blooming flowers",
            Program::new(vec![
                set_hp(80),
                set_update_hook(1),
                move_to(Vec2::new(192.0, 110.0), 50),
                fire("flower", 0),
                oscillate(Vec2::new(80.0, 0.0), 120.0, 240),
                fire("cross", 0),
                oscillate(Vec2::new(0.0, 20.0), 60.0, 120),
                clear_drops(),
                add_drop(3, 1),
                die(),
            ]),
        ),
        PatternSpec::new(
            "hunter",
            "Chase the player slowly while firing walls",
            Program::new(vec![
                set_hp(30),
                set_angle(90.0),
                fire("shuffle_wall", 0),
                home(1.2, 2.0, 150),
                fire("shuffle_wall", 0),
                home(1.2, 2.0, 150),
                set_velocity(Vec2::new(0.0, -3.0)),
                Instr::wait(200),
            ]),
        ),
    ])
}
