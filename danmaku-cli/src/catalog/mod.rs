//! Built-in pattern catalog.
//!
//! Each pattern is a `PatternSpec`: a registry name, a one-line intent and
//! the program itself. Enemy patterns fire shot patterns by name and shot
//! patterns attach bullet patterns by name, so the three lists are
//! installed together.

pub mod bullets;
pub mod enemies;
pub mod shots;

use std::collections::HashMap;

use danmaku_common::{BulletOp, EnemyOp, OpKind, Program, ProgramError, ShotOp};
use danmaku_vm::{BulletSprite, CubicBezier, Curve, Library, LinePath};
use glam::Vec2;

/// A named program with a description of what it draws.
#[derive(Debug, Clone)]
pub struct PatternSpec<K> {
    /// Registry name, e.g. `"spiral"`.
    pub id: &'static str,
    /// What the pattern looks like on screen.
    pub intent: &'static str,
    pub program: Program<K>,
}

impl<K: OpKind> PatternSpec<K> {
    pub fn new(id: &'static str, intent: &'static str, program: Program<K>) -> Self {
        Self {
            id,
            intent,
            program,
        }
    }
}

/// Every built-in pattern, grouped by vocabulary.
pub struct Catalog {
    pub bullets: Vec<PatternSpec<BulletOp>>,
    pub shots: Vec<PatternSpec<ShotOp>>,
    pub enemies: Vec<PatternSpec<EnemyOp>>,
}

impl Catalog {
    pub fn load() -> Result<Self, ProgramError> {
        Ok(Self {
            bullets: bullets::patterns()?,
            shots: shots::patterns()?,
            enemies: enemies::patterns()?,
        })
    }

    pub fn len(&self) -> usize {
        self.bullets.len() + self.shots.len() + self.enemies.len()
    }

    /// Register every pattern into a fresh library.
    pub fn install(&self) -> Library {
        let mut library = Library::new();
        for spec in &self.bullets {
            library.bullets.register(spec.id, spec.program.clone());
        }
        for spec in &self.shots {
            library.shots.register(spec.id, spec.program.clone());
        }
        for spec in &self.enemies {
            library.enemies.register(spec.id, spec.program.clone());
        }
        library
    }
}

/// Bullet templates available on the stage.
pub const TEMPLATES: [(&str, f32); 4] = [("pellet", 2.0), ("rice", 2.5), ("orb", 4.0), ("knife", 3.0)];

/// Colors every template comes in.
pub const COLORS: [&str; 8] = [
    "red", "orange", "yellow", "green", "cyan", "blue", "purple", "white",
];

/// Sprite table: every template in every color.
pub fn sprites() -> HashMap<(i32, i32), BulletSprite> {
    let mut sprites = HashMap::new();
    for (t, (template, radius)) in TEMPLATES.iter().enumerate() {
        for (c, color) in COLORS.iter().enumerate() {
            sprites.insert(
                (t as i32, c as i32),
                BulletSprite {
                    image: format!("{template}_{color}"),
                    hitbox_radius: *radius,
                },
            );
        }
    }
    sprites
}

/// Path id 0: a swoop across the upper field.
pub const SWOOP: i32 = 0;
/// Path id 1: a straight dive down the left side.
pub const DIVE: i32 = 1;

/// Path table for `FollowPath`.
pub fn paths() -> HashMap<i32, Box<dyn Curve>> {
    let mut paths: HashMap<i32, Box<dyn Curve>> = HashMap::new();
    paths.insert(
        SWOOP,
        Box::new(CubicBezier {
            p0: Vec2::new(-16.0, 60.0),
            p1: Vec2::new(96.0, 260.0),
            p2: Vec2::new(288.0, 260.0),
            p3: Vec2::new(400.0, 60.0),
        }),
    );
    paths.insert(
        DIVE,
        Box::new(LinePath {
            from: Vec2::new(64.0, -16.0),
            to: Vec2::new(64.0, 300.0),
        }),
    );
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_loads_and_installs_everything() {
        let catalog = Catalog::load().unwrap();
        let library = catalog.install();
        assert_eq!(library.bullets.len(), catalog.bullets.len());
        assert_eq!(library.shots.len(), catalog.shots.len());
        assert_eq!(library.enemies.len(), catalog.enemies.len());
    }

    #[test]
    fn ids_are_unique() {
        let catalog = Catalog::load().unwrap();
        let mut ids: Vec<&str> = catalog
            .bullets
            .iter()
            .map(|s| s.id)
            .chain(catalog.shots.iter().map(|s| s.id))
            .chain(catalog.enemies.iter().map(|s| s.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn sprite_table_covers_every_pair() {
        let sprites = sprites();
        assert_eq!(sprites.len(), TEMPLATES.len() * COLORS.len());
        assert_eq!(sprites[&(2, 5)].image, "orb_blue");
    }
}
