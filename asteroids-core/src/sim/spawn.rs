use core::time::Duration;

use crate::config::{GameConfig, Playfield, SpawnTuning};
use crate::constants::ASTEROID_COLOR;
use crate::rng::SeededRng;
use crate::vector::Vec2;

use super::Asteroid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    fn from_index(index: u32) -> Self {
        match index {
            0 => Self::Left,
            1 => Self::Right,
            2 => Self::Top,
            _ => Self::Bottom,
        }
    }
}

/// Random base count plus the escalation bonus for the time survived.
pub fn wave_size(elapsed: Duration, tuning: &SpawnTuning, rng: &mut SeededRng) -> u32 {
    let spread = (rng.next_f64() * f64::from(tuning.base_spread)) as u32;
    tuning.base_min + spread + tuning.escalation_bonus(elapsed)
}

/// A point just outside one randomly chosen edge, uniform along that edge.
pub fn edge_position(playfield: &Playfield, offset: f64, rng: &mut SeededRng) -> (Edge, Vec2) {
    let edge = Edge::from_index((rng.next_f64() * 4.0) as u32);
    let x = rng.next_f64() * playfield.width;
    let y = rng.next_f64() * playfield.height;
    let position = match edge {
        Edge::Left => Vec2::new(-offset, y),
        Edge::Right => Vec2::new(playfield.width + offset, y),
        Edge::Top => Vec2::new(x, -offset),
        Edge::Bottom => Vec2::new(x, playfield.height + offset),
    };
    (edge, position)
}

/// Repopulates an empty field. Returns nothing while any asteroid is alive.
pub fn spawn(
    current_count: usize,
    elapsed: Duration,
    config: &GameConfig,
    rng: &mut SeededRng,
) -> Vec<Asteroid> {
    if current_count != 0 {
        return Vec::new();
    }

    let tuning = &config.spawn;
    let center = config.playfield.center();
    let count = wave_size(elapsed, tuning, rng);

    (0..count)
        .map(|_| {
            let (_, position) = edge_position(&config.playfield, tuning.edge_offset, rng);
            let radius = rng.range_f64(tuning.radius_min, tuning.radius_max);
            let pull = (center - position) * tuning.center_pull;
            let velocity = Vec2::new(
                pull.x + rng.range_f64(-tuning.velocity_jitter, tuning.velocity_jitter),
                pull.y + rng.range_f64(-tuning.velocity_jitter, tuning.velocity_jitter),
            );
            Asteroid::new(
                position,
                velocity,
                radius,
                ASTEROID_COLOR,
                &config.asteroids,
                rng,
            )
        })
        .collect()
}
