use serde::{Deserialize, Serialize};

use crate::config::{AsteroidTuning, Playfield};
use crate::constants::Rgb;
use crate::rng::SeededRng;
use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub color: Rgb,
    /// Cosmetic only; never read by the physics.
    pub rotation: f64,
    pub spin: f64,
}

impl Asteroid {
    /// Draws the cosmetic spin from `rng`, so construction order matters for
    /// reproducibility.
    pub fn new(
        position: Vec2,
        velocity: Vec2,
        radius: f64,
        color: Rgb,
        tuning: &AsteroidTuning,
        rng: &mut SeededRng,
    ) -> Self {
        debug_assert!(radius > 0.0, "asteroid radius must be positive");
        let spin = rng.range_f64(-tuning.spin_max, tuning.spin_max);
        Self {
            position,
            velocity,
            radius,
            color,
            rotation: 0.0,
            spin,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.position += self.velocity;
        self.rotation += self.spin;
    }

    /// True once the asteroid has drifted past the cull margins. The margins are
    /// asymmetric: wider on the left/top edges than on the right/bottom ones.
    pub fn is_out_of_bounds(&self, playfield: &Playfield, tuning: &AsteroidTuning) -> bool {
        let Vec2 { x, y } = self.position;
        x < -tuning.cull_margin_near
            || x > playfield.width + tuning.cull_margin_far
            || y < -tuning.cull_margin_near
            || y > playfield.height + tuning.cull_margin_far
    }

    pub fn can_split(&self, tuning: &AsteroidTuning) -> bool {
        self.radius >= tuning.split_threshold
    }

    /// Fragments produced when a bullet destroys this asteroid.
    ///
    /// Below the split threshold nothing is left. Otherwise two children share the
    /// parent radius in a random ratio from `[split_ratio_min, split_ratio_max)`.
    /// Each child velocity axis is the parent's scaled by an independent factor
    /// from `[child_speed_min, child_speed_max)`, and each child is nudged from the
    /// parent center by up to its own radius on both axes.
    pub fn split_into(&self, tuning: &AsteroidTuning, rng: &mut SeededRng) -> Vec<Asteroid> {
        if !self.can_split(tuning) {
            return Vec::new();
        }

        let ratio = rng.range_f64(tuning.split_ratio_min, tuning.split_ratio_max);
        [ratio, 1.0 - ratio]
            .into_iter()
            .map(|share| {
                let radius = self.radius * share;
                let velocity = Vec2::new(
                    self.velocity.x * rng.range_f64(tuning.child_speed_min, tuning.child_speed_max),
                    self.velocity.y * rng.range_f64(tuning.child_speed_min, tuning.child_speed_max),
                );
                let position = Vec2::new(
                    self.position.x + rng.next_f64() * radius,
                    self.position.y + rng.next_f64() * radius,
                );
                Asteroid::new(position, velocity, radius, self.color, tuning, rng)
            })
            .collect()
    }
}
