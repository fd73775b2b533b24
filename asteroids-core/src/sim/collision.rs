use crate::vector::Vec2;

use super::{Asteroid, Bullet, Ship};

/// Anything that collides as a circle.
pub trait Circle {
    fn center(&self) -> Vec2;
    fn radius(&self) -> f64;
}

impl Circle for Ship {
    fn center(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

impl Circle for Bullet {
    fn center(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

impl Circle for Asteroid {
    fn center(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

/// Strict overlap: circles that exactly touch do not collide.
#[inline]
pub fn collides(a: &impl Circle, b: &impl Circle) -> bool {
    a.center().distance(b.center()) < a.radius() + b.radius()
}

/// Outcome of resolving every live bullet against every asteroid for one tick.
#[derive(Debug, Default)]
pub(super) struct HitResolution {
    pub(super) bullets: Vec<Bullet>,
    pub(super) asteroids: Vec<Asteroid>,
    pub(super) hits: u32,
    pub(super) splits: u32,
}

/// Each bullet strikes at most the first unstruck asteroid it overlaps, and each
/// asteroid absorbs at most one bullet. Fragments are appended after the
/// survivors and are not tested against bullets until the next tick.
pub(super) fn resolve_bullet_hits(
    bullets: Vec<Bullet>,
    asteroids: Vec<Asteroid>,
    mut split: impl FnMut(&Asteroid) -> Vec<Asteroid>,
) -> HitResolution {
    let mut struck = vec![false; asteroids.len()];
    let mut surviving_bullets = Vec::with_capacity(bullets.len());
    let mut hits = 0;

    for bullet in bullets {
        let target = asteroids
            .iter()
            .enumerate()
            .position(|(index, asteroid)| !struck[index] && collides(&bullet, asteroid));
        match target {
            Some(index) => {
                struck[index] = true;
                hits += 1;
            }
            None => surviving_bullets.push(bullet),
        }
    }

    if hits == 0 {
        return HitResolution {
            bullets: surviving_bullets,
            asteroids,
            hits,
            splits: 0,
        };
    }

    let mut survivors = Vec::with_capacity(asteroids.len() + hits as usize);
    let mut fragments = Vec::new();
    let mut splits = 0;
    for (asteroid, hit) in asteroids.iter().zip(struck) {
        if !hit {
            survivors.push(*asteroid);
            continue;
        }
        let children = split(asteroid);
        if !children.is_empty() {
            splits += 1;
        }
        fragments.extend(children);
    }
    survivors.extend(fragments);

    HitResolution {
        bullets: surviving_bullets,
        asteroids: survivors,
        hits,
        splits,
    }
}
