//! Shot-emission patterns: what an enemy fires, and in what shape.

use danmaku_common::vocab::shot::*;
use danmaku_common::{Instruction, Program, ProgramError, ShotOp};
use glam::Vec2;

use super::PatternSpec;

type Instr = Instruction<ShotOp>;

pub fn patterns() -> Result<Vec<PatternSpec<ShotOp>>, ProgramError> {
    Ok(vec![
        PatternSpec::new(
            "aimed_burst",
            "Five quick pellets straight at the player",
            Program::new(vec![
                set_bullet_type(0, 0),
                aim_at_player(0.0),
                Instr::loop_start(5),
                fire(4.0),
                play_sound("shot", 0.3),
                Instr::wait(4),
                Instr::loop_end(),
            ]),
        ),
        PatternSpec::new(
            "ring",
            "A single ring of orbs in every direction",
            Program::new(vec![
                set_bullet_type(2, 5),
                fire_ring(24, 2.5),
                play_sound("ring", 0.6),
            ]),
        ),
        PatternSpec::new(
            "spiral",
            "Three rotating arms of rice bullets",
            Program::new(vec![
                set_bullet_type(1, 6),
                Instr::loop_start(60),
                fire_spread(3, 0.0, 360.0, 2.0),
                add_angle(7.0),
                Instr::wait(2),
                Instr::loop_end(),
            ]),
        ),
        PatternSpec::new(
            "fan",
            "A five-way fan centred on the player",
            Program::new(vec![
                set_bullet_type(3, 1),
                aim_at_player(0.0),
                fire_spread_centered(5, 0.0, 60.0, 3.0),
            ]),
        ),
        PatternSpec::new(
            "speed_fan",
            "Six bullets down one line at rising speeds",
            Program::new(vec![
                set_bullet_type(1, 2),
                aim_at_player(0.0),
                fire_speeds(6, 2.0, 5.0),
            ]),
        ),
        PatternSpec::new(
            "rain",
            "Loose downward drizzle with random spread",
            Program::new(vec![
                set_bullet_type(0, 4),
                set_angle(90.0),
                Instr::loop_start(30),
                randomize_next(30.0),
                fire_spread_random(2, 0.0, 40.0, 2.5),
                Instr::wait(3),
                Instr::loop_end(),
            ]),
        ),
        PatternSpec::new(
            "flower",
            "Three spinning petals that curl as they travel",
            Program::new(vec![
                set_bullet_type(1, 3),
                register_bullet(0, 0.0, 2.0, Vec2::ZERO),
                register_bullet(1, 120.0, 2.0, Vec2::ZERO),
                register_bullet(2, 240.0, 2.0, Vec2::ZERO),
                set_slot_spin(0, 0.5),
                set_slot_spin(1, 0.5),
                set_slot_spin(2, 0.5),
                set_slot_bullet_type(2, 2, 7),
                attach_motion("curve_left"),
                Instr::loop_start(20),
                fire_all_slots(),
                rotate_base(6.0, 3),
                Instr::loop_end(),
                clear_slots(),
            ]),
        ),
        PatternSpec::new(
            "shuffle_wall",
            "A wide wall of accelerating bullets released out of order",
            Program::new(vec![
                set_bullet_type(0, 1),
                attach_motion("accelerate"),
                fire_spread_shuffled(12, 30.0, 120.0, 1.0),
            ]),
        ),
        PatternSpec::new(
            "splitter",
            "Three heavy bullets that split in flight",
            Program::new(vec![
                set_bullet_type(2, 0),
                attach_motion("split"),
                aim_at_player(0.0),
                fire_spread_centered(3, 0.0, 30.0, 3.0),
                detach_motion(),
            ]),
        ),
        PatternSpec::new(
            "cross",
            "Paired slots either side of the muzzle, fired twice",
            Program::new(vec![
                set_offset(Vec2::new(0.0, 8.0)),
                set_angle(90.0),
                register_bullet(0, -20.0, 2.5, Vec2::new(-12.0, 0.0)),
                register_bullet(1, 20.0, 2.5, Vec2::new(12.0, 0.0)),
                set_slot_speed(1, 3.0),
                set_slot_acceleration(0, 0.02),
                set_slot_offset(1, Vec2::new(16.0, 0.0)),
                fire_slot(0),
                fire_slot(1),
                Instr::wait(10),
                attach_motion("wave"),
                fire_at(0.0, 2.0),
                fire_all_slots(),
            ]),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use danmaku_common::check;

    #[test]
    fn shot_patterns_pass_check() {
        for spec in patterns().unwrap() {
            assert!(check(&spec.program).is_empty(), "{}", spec.id);
        }
    }
}
