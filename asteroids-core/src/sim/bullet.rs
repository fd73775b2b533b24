use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub position: Vec2,
    /// Unit vector fixed at fire time.
    pub direction: Vec2,
    pub velocity: f64,
    pub radius: f64,
}

impl Bullet {
    pub fn new(position: Vec2, direction: Vec2, velocity: f64, radius: f64) -> Self {
        Self {
            position,
            direction,
            velocity,
            radius,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.position += self.direction * self.velocity;
    }
}
