use serde::{Deserialize, Serialize};

use crate::config::{Playfield, ShipTuning};
use crate::input::ControlState;
use crate::vector::Vec2;

use super::Bullet;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub position: Vec2,
    /// Radians, 0 = nose up, growing clockwise. Never normalised.
    pub heading: f64,
    /// `x` is screen-right, `y` is screen-up (opposite to position `y`).
    pub velocity: Vec2,
    pub speed: f64,
    /// Ticks since the last shot, saturating at the configured cooldown.
    pub cooldown: u32,
    pub radius: f64,
    pub bullets: Vec<Bullet>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShipUpdate {
    pub fired: bool,
    /// The ship crossed an edge and was teleported to the opposite one.
    pub wrapped: bool,
    pub bullets_expired: usize,
}

impl Ship {
    /// Parked at the playfield center, nose up, ready to fire.
    pub fn new(tuning: &ShipTuning, playfield: &Playfield) -> Self {
        Self {
            position: playfield.center(),
            heading: 0.0,
            velocity: Vec2::ZERO,
            speed: 0.0,
            cooldown: tuning.bullet_cooldown_ticks,
            radius: tuning.radius,
            bullets: Vec::new(),
        }
    }

    pub fn nose(&self) -> Vec2 {
        self.position + Vec2::from_heading(self.heading) * self.radius
    }

    pub fn can_fire(&self, tuning: &ShipTuning) -> bool {
        self.cooldown >= tuning.bullet_cooldown_ticks
    }

    /// Advances the ship and its bullets by one tick.
    pub fn update(
        &mut self,
        input: ControlState,
        tuning: &ShipTuning,
        playfield: &Playfield,
    ) -> ShipUpdate {
        let (sin, cos) = self.heading.sin_cos();

        if input.forward {
            self.speed = (self.speed + tuning.acceleration).min(tuning.max_speed);
            self.velocity.x += sin * self.speed;
            self.velocity.y += cos * self.speed;
        }

        // Reverse thrust, not braking: speed still grows, only the sign flips.
        if input.backward {
            self.speed = (self.speed + tuning.deceleration).min(tuning.max_speed);
            self.velocity.x -= sin * self.speed;
            self.velocity.y -= cos * self.speed;
        }

        if input.left {
            self.heading -= tuning.rotation_step();
        }
        if input.right {
            self.heading += tuning.rotation_step();
        }

        let fired = input.fire && self.can_fire(tuning);
        if fired {
            self.bullets.push(Bullet::new(
                self.nose(),
                Vec2::from_heading(self.heading),
                tuning.bullet_velocity,
                tuning.bullet_radius,
            ));
            self.cooldown = 0;
        }

        if self.speed.abs() < tuning.speed_epsilon {
            self.speed = 0.0;
        }
        if self.velocity.length() < tuning.speed_epsilon {
            self.velocity = Vec2::ZERO;
        }

        self.position.x += self.velocity.x;
        self.position.y -= self.velocity.y;
        let wrapped = self.wrap(playfield);

        self.velocity = self.velocity * tuning.friction;

        let before = self.bullets.len();
        self.bullets = self
            .bullets
            .iter()
            .map(|bullet| {
                let mut bullet = *bullet;
                bullet.advance();
                bullet
            })
            .filter(|bullet| playfield.contains(bullet.position))
            .collect();
        let bullets_expired = before - self.bullets.len();

        if self.cooldown < tuning.bullet_cooldown_ticks {
            self.cooldown += 1;
        }

        ShipUpdate {
            fired,
            wrapped,
            bullets_expired,
        }
    }

    fn wrap(&mut self, playfield: &Playfield) -> bool {
        let mut wrapped = false;
        if self.position.x < 0.0 {
            self.position.x = playfield.width;
            wrapped = true;
        }
        if self.position.x > playfield.width {
            self.position.x = 0.0;
            wrapped = true;
        }
        if self.position.y < 0.0 {
            self.position.y = playfield.height;
            wrapped = true;
        }
        if self.position.y > playfield.height {
            self.position.y = 0.0;
            wrapped = true;
        }
        wrapped
    }
}
