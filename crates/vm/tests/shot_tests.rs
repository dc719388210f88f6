//! Integration tests for the shot-emission interpreter.

mod support;

use danmaku_common::vocab::{bullet, shot};
use danmaku_common::{Instruction, Program, ShotOp};
use danmaku_vm::Emitter;
use glam::Vec2;
use support::{assert_angles, assert_close, shot_script, World};

/// Run a shot program to completion from an emitter at `origin`.
/// Returns the emitter and the number of ticks that kept it alive.
fn fire(world: &mut World, instrs: Vec<Instruction<ShotOp>>) -> (Emitter, usize) {
    fire_from(world, Vec2::ZERO, instrs)
}

fn fire_from(
    world: &mut World,
    origin: Vec2,
    instrs: Vec<Instruction<ShotOp>>,
) -> (Emitter, usize) {
    let mut script = shot_script(Program::new(instrs));
    let mut emitter = Emitter::new(origin);
    let mut ticks = 0;
    while script.update(&mut emitter, &mut world.host()) {
        ticks += 1;
        assert!(ticks < 10_000, "shot never finished");
    }
    (emitter, ticks)
}

// ============================================================
// Spread geometry
// ============================================================

#[test]
fn ring_built_from_a_wait_zero_loop_fires_every_bullet() {
    let mut world = World::new();
    let (emitter, ticks) = fire(
        &mut world,
        vec![
            Instruction::loop_start(12),
            shot::fire(2.0),
            shot::add_angle(30.0),
            Instruction::wait(0),
            Instruction::loop_end(),
        ],
    );
    assert_eq!(ticks, 0);
    assert_eq!(emitter.fired, 12);
    let expected: Vec<f32> = (0..12).map(|i| i as f32 * 30.0).collect();
    assert_angles(&world.headings(), &expected);
}

#[test]
fn centered_spread_is_symmetric() {
    let mut world = World::new();
    fire(&mut world, vec![shot::fire_spread_centered(3, 90.0, 60.0, 5.0)]);
    assert_angles(&world.headings(), &[60.0, 90.0, 120.0]);
    assert_eq!(world.speeds(), vec![5.0; 3]);
}

#[test]
fn full_circle_spread_has_no_seam_bullet() {
    let mut world = World::new();
    fire(&mut world, vec![shot::fire_spread(4, 0.0, 360.0, 2.0)]);
    assert_angles(&world.headings(), &[0.0, 90.0, 180.0, 270.0]);
}

#[test]
fn partial_spread_covers_both_ends() {
    let mut world = World::new();
    fire(&mut world, vec![shot::fire_spread(3, 0.0, 90.0, 2.0)]);
    assert_angles(&world.headings(), &[0.0, 45.0, 90.0]);
}

#[test]
fn single_bullet_spread() {
    let mut world = World::new();
    fire(&mut world, vec![shot::fire_spread_centered(1, 45.0, 90.0, 2.0)]);
    assert_angles(&world.headings(), &[45.0]);
}

#[test]
fn empty_volleys_fire_nothing() {
    let mut world = World::new();
    let (emitter, _) = fire(
        &mut world,
        vec![
            shot::fire_spread(0, 0.0, 90.0, 2.0),
            shot::fire_ring(-1, 2.0),
            shot::fire_speeds(0, 1.0, 2.0),
        ],
    );
    assert!(world.entities.bullets.is_empty());
    assert_eq!(emitter.fired, 0);
}

#[test]
fn ring_and_base_angle() {
    let mut world = World::new();
    fire(&mut world, vec![shot::set_angle(10.0), shot::fire_ring(4, 3.0)]);
    assert_angles(&world.headings(), &[10.0, 100.0, 190.0, 280.0]);
}

#[test]
fn shuffled_spread_keeps_the_angle_set() {
    let mut world = World::new();
    fire(&mut world, vec![shot::fire_spread_shuffled(6, 0.0, 50.0, 1.0)]);
    let mut headings = world.headings();
    headings.sort_by(f32::total_cmp);
    assert_angles(&headings, &[0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
}

#[test]
fn random_spread_stays_inside_arc() {
    let mut world = World::new();
    fire(&mut world, vec![shot::fire_spread_random(12, 90.0, 40.0, 1.0)]);
    let headings = world.headings();
    assert_eq!(headings.len(), 12);
    assert!(headings.iter().all(|h| (70.0..=110.0).contains(h)));
}

#[test]
fn fire_speeds_fans_speed_on_one_angle() {
    let mut world = World::new();
    fire(&mut world, vec![shot::set_angle(30.0), shot::fire_speeds(3, 2.0, 4.0)]);
    assert_eq!(world.speeds(), vec![2.0, 3.0, 4.0]);
    assert_angles(&world.headings(), &[30.0, 30.0, 30.0]);
}

// ============================================================
// Angles and jitter
// ============================================================

#[test]
fn fire_at_is_relative_to_base() {
    let mut world = World::new();
    fire(
        &mut world,
        vec![shot::set_angle(30.0), shot::add_angle(5.0), shot::fire_at(15.0, 2.0)],
    );
    assert_angles(&world.headings(), &[50.0]);
}

#[test]
fn jitter_applies_to_the_next_fire_only() {
    let mut world = World::new();
    let (emitter, _) = fire(
        &mut world,
        vec![
            shot::randomize_next(20.0),
            shot::fire_spread_centered(3, 0.0, 20.0, 1.0),
            shot::fire(1.0),
        ],
    );
    let h = world.headings();
    assert_eq!(h.len(), 4);
    // One sample shared by the whole volley.
    assert_close(h[1] - h[0], 10.0);
    assert_close(h[2] - h[1], 10.0);
    assert!((-30.0..=30.0).contains(&h[0]));
    assert_eq!(h[3], 0.0);
    assert_eq!(emitter.jitter, 0.0);
}

#[test]
fn aim_at_player_sets_base_angle() {
    let mut world = World::new();
    world.player = Some(Vec2::new(0.0, 100.0));
    fire(&mut world, vec![shot::aim_at_player(0.0), shot::fire(1.0)]);
    assert_angles(&world.headings(), &[90.0]);
}

#[test]
fn aim_without_player_keeps_base_angle() {
    let mut world = World::new();
    world.player = None;
    fire(
        &mut world,
        vec![shot::set_angle(15.0), shot::aim_at_player(0.0), shot::fire(1.0)],
    );
    assert_angles(&world.headings(), &[15.0]);
}

#[test]
fn rotate_base_spans_ticks() {
    let mut world = World::new();
    let (emitter, ticks) = fire(
        &mut world,
        vec![shot::rotate_base(5.0, 3), shot::fire(1.0)],
    );
    assert_eq!(ticks, 3);
    assert_close(emitter.base_angle, 15.0);
    assert_angles(&world.headings(), &[15.0]);
}

// ============================================================
// Slots
// ============================================================

#[test]
fn slots_fire_in_ascending_order() {
    let mut world = World::new();
    fire_from(
        &mut world,
        Vec2::new(100.0, 100.0),
        vec![
            shot::register_bullet(2, 10.0, 3.0, Vec2::new(0.0, 5.0)),
            shot::register_bullet(1, -10.0, 4.0, Vec2::ZERO),
            shot::set_slot_spin(1, 2.0),
            shot::set_slot_acceleration(2, 0.1),
            shot::fire_all_slots(),
        ],
    );
    let bullets = &world.entities.bullets;
    assert_eq!(bullets.len(), 2);
    assert_eq!(bullets[0].heading, -10.0);
    assert_eq!(bullets[0].speed, 4.0);
    assert_eq!(bullets[0].angular_velocity, 2.0);
    assert_eq!(bullets[1].heading, 10.0);
    assert_eq!(bullets[1].acceleration, 0.1);
    assert_eq!(bullets[1].position, Vec2::new(100.0, 105.0));
}

#[test]
fn fire_slot_uses_slot_appearance() {
    let mut world = World::new();
    fire(
        &mut world,
        vec![
            shot::set_bullet_type(1, 2),
            shot::register_bullet(0, 0.0, 2.0, Vec2::ZERO),
            shot::set_slot_bullet_type(3, 3, 4),
            shot::set_slot_speed(3, 6.0),
            shot::set_slot_offset(3, Vec2::new(4.0, 0.0)),
            shot::fire_slot(0),
            shot::fire_slot(3),
            shot::fire_slot(9),
        ],
    );
    let bullets = &world.entities.bullets;
    assert_eq!(bullets.len(), 2);
    assert_eq!((bullets[0].template, bullets[0].color), (1, 2));
    assert_eq!((bullets[1].template, bullets[1].color), (3, 4));
    assert_eq!(bullets[1].speed, 6.0);
    assert_eq!(bullets[1].position, Vec2::new(4.0, 0.0));
    assert_eq!(bullets[1].sprite.image, "bullet_3_4");
}

#[test]
fn clear_slots_forgets_registrations() {
    let mut world = World::new();
    let (emitter, _) = fire(
        &mut world,
        vec![
            shot::register_bullet(0, 0.0, 2.0, Vec2::ZERO),
            shot::clear_slots(),
            shot::fire_all_slots(),
        ],
    );
    assert!(emitter.slots.is_empty());
    assert!(world.entities.bullets.is_empty());
}

// ============================================================
// Spawning
// ============================================================

#[test]
fn unresolved_sprite_spawns_nothing() {
    let mut world = World::new();
    let (emitter, _) = fire(
        &mut world,
        vec![shot::set_bullet_type(9, 0), shot::fire(1.0), shot::set_bullet_type(0, 0), shot::fire(1.0)],
    );
    assert_eq!(world.entities.bullets.len(), 1);
    assert_eq!(emitter.fired, 1);
}

#[test]
fn refused_spawn_is_not_counted() {
    let mut world = World::new();
    world.entities.full = true;
    let (emitter, _) = fire(&mut world, vec![shot::fire_ring(8, 1.0)]);
    assert_eq!(emitter.fired, 0);
}

#[test]
fn attached_motion_gives_each_bullet_a_fresh_cursor() {
    let mut world = World::new();
    world.library.bullets.register(
        "curve",
        Program::new(vec![bullet::rotate(2.0, 30), Instruction::end()]),
    );
    fire(
        &mut world,
        vec![
            shot::attach_motion("curve"),
            shot::fire_spread(2, 0.0, 10.0, 1.0),
            shot::detach_motion(),
            shot::fire(1.0),
        ],
    );
    let bullets = &world.entities.bullets;
    assert_eq!(bullets.len(), 3);
    for b in &bullets[..2] {
        let script = b.motion.as_ref().unwrap();
        assert_eq!(script.cursor().ip(), 0);
        assert_eq!(script.cursor().program().len(), 2);
    }
    assert!(bullets[2].motion.is_none());
}

#[test]
fn unknown_motion_program_still_fires() {
    let mut world = World::new();
    fire(&mut world, vec![shot::attach_motion("ghost"), shot::fire(1.0)]);
    assert_eq!(world.entities.bullets.len(), 1);
    assert!(world.entities.bullets[0].motion.is_none());
}

#[test]
fn offset_moves_the_muzzle() {
    let mut world = World::new();
    fire_from(
        &mut world,
        Vec2::new(50.0, 50.0),
        vec![shot::set_offset(Vec2::new(0.0, -10.0)), shot::fire(1.0)],
    );
    assert_eq!(world.entities.bullets[0].position, Vec2::new(50.0, 40.0));
}

#[test]
fn looped_volleys_with_waits() {
    let mut world = World::new();
    let (_, ticks) = fire(
        &mut world,
        vec![
            Instruction::loop_start(3),
            shot::fire_ring(6, 2.0),
            shot::add_angle(10.0),
            shot::play_sound("shot", 0.3),
            Instruction::wait(5),
            Instruction::loop_end(),
        ],
    );
    assert_eq!(world.entities.bullets.len(), 18);
    assert_eq!(world.sounds.len(), 3);
    assert_eq!(ticks, 15);
    assert_angles(&world.headings()[6..7], &[10.0]);
}
