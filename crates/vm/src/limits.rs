//! Runtime limits and fixed simulation constants.

/// Simulation ticks per second. Every `duration` and `frame` counts ticks.
pub const TICK_RATE: u32 = 60;

/// Maximum nesting of subroutine calls before a script is aborted.
pub const MAX_CALL_DEPTH: usize = 64;

/// Maximum nesting of open loops before a script is aborted.
pub const MAX_LOOP_DEPTH: usize = 64;

/// Arcs within this many degrees of 360 count as full circles.
pub const FULL_CIRCLE_EPSILON: f32 = 1e-3;

/// Visits allowed per instruction within one update of a program of
/// `len` instructions.
pub fn revisit_limit(len: usize) -> u32 {
    u32::try_from(len).map_or(u32::MAX, |n| n.saturating_add(1))
}
