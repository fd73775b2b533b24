use std::f64::consts::{PI, TAU};

use asteroids_core::sim::Asteroid;
use asteroids_core::{ControlState, InputSource, Vec2, WorldSnapshot};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutopilotTuning {
    /// Radians either side of dead ahead that still counts as aimed.
    pub fire_alignment: f64,
    /// Edge-to-edge gap below which the ship backs away.
    pub threat_distance: f64,
    /// Heading error ignored when turning, so the ship does not jitter.
    pub turn_deadband: f64,
}

impl Default for AutopilotTuning {
    fn default() -> Self {
        Self {
            fire_alignment: 0.08,
            threat_distance: 90.0,
            turn_deadband: 0.01,
        }
    }
}

/// Computer player. Decides the next tick's controls from the world it is
/// shown after each tick.
#[derive(Clone, Debug, Default)]
pub struct Autopilot {
    tuning: AutopilotTuning,
    next: ControlState,
    attached: bool,
}

impl Autopilot {
    pub fn new(tuning: AutopilotTuning) -> Self {
        Self {
            tuning,
            next: ControlState::IDLE,
            attached: false,
        }
    }
}

impl InputSource for Autopilot {
    fn controls(&self) -> ControlState {
        if self.attached {
            self.next
        } else {
            ControlState::IDLE
        }
    }

    fn attach(&mut self) {
        self.next = ControlState::IDLE;
        self.attached = true;
    }

    fn detach(&mut self) {
        self.next = ControlState::IDLE;
        self.attached = false;
    }

    fn observe(&mut self, world: &WorldSnapshot) {
        if self.attached {
            self.next = steer(world, &self.tuning);
        }
    }
}

/// Heading that points the nose along `direction` (screen space, y down).
fn heading_towards(direction: Vec2) -> f64 {
    direction.x.atan2(-direction.y)
}

/// Wraps an angle into `(-PI, PI]`.
fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

fn gap(ship_position: Vec2, ship_radius: f64, asteroid: &Asteroid) -> f64 {
    ship_position.distance(asteroid.position) - ship_radius - asteroid.radius
}

pub fn steer(world: &WorldSnapshot, tuning: &AutopilotTuning) -> ControlState {
    let mut controls = ControlState::IDLE;
    if world.ship_destroyed {
        return controls;
    }

    let ship = &world.ship;
    let nearest = world.asteroids.iter().min_by(|a, b| {
        gap(ship.position, ship.radius, a).total_cmp(&gap(ship.position, ship.radius, b))
    });
    let Some(target) = nearest else {
        return controls;
    };

    let error = normalize_angle(heading_towards(target.position - ship.position) - ship.heading);
    controls.right = error > tuning.turn_deadband;
    controls.left = error < -tuning.turn_deadband;
    controls.fire = error.abs() <= tuning.fire_alignment;

    // Reverse thrust pushes away from whatever the nose points at.
    if gap(ship.position, ship.radius, target) < tuning.threat_distance {
        if error.abs() < PI / 2.0 {
            controls.backward = true;
        } else {
            controls.forward = true;
        }
    }

    controls
}

#[cfg(test)]
mod tests {
    use asteroids_core::constants::ASTEROID_COLOR;
    use asteroids_core::sim::Ship;
    use asteroids_core::{GameConfig, SimulationStats};

    use super::*;

    fn world_with(asteroids: Vec<Asteroid>) -> WorldSnapshot {
        let config = GameConfig::default();
        WorldSnapshot {
            tick: 1,
            elapsed_ms: 0,
            ship: Ship::new(&config.ship, &config.playfield),
            asteroids,
            stats: SimulationStats::default(),
            ship_destroyed: false,
        }
    }

    fn rock_at(x: f64, y: f64) -> Asteroid {
        Asteroid {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: 30.0,
            color: ASTEROID_COLOR,
            rotation: 0.0,
            spin: 0.0,
        }
    }

    #[test]
    fn fires_at_a_rock_dead_ahead() {
        let world = world_with(vec![rock_at(640.0, 100.0)]);
        let controls = steer(&world, &AutopilotTuning::default());
        assert!(controls.fire);
        assert!(!controls.left && !controls.right);
        assert!(!controls.backward);
    }

    #[test]
    fn turns_towards_the_nearest_rock() {
        let world = world_with(vec![rock_at(1_200.0, 360.0), rock_at(300.0, 360.0)]);
        let controls = steer(&world, &AutopilotTuning::default());
        assert!(controls.left);
        assert!(!controls.fire);

        let world = world_with(vec![rock_at(900.0, 360.0)]);
        assert!(steer(&world, &AutopilotTuning::default()).right);
    }

    #[test]
    fn backs_away_from_a_close_rock() {
        let world = world_with(vec![rock_at(640.0, 280.0)]);
        let controls = steer(&world, &AutopilotTuning::default());
        assert!(controls.backward);
        assert!(controls.fire);

        let world = world_with(vec![rock_at(640.0, 440.0)]);
        assert!(steer(&world, &AutopilotTuning::default()).forward);
    }

    #[test]
    fn idle_until_attached() {
        let mut pilot = Autopilot::default();
        let world = world_with(vec![rock_at(640.0, 100.0)]);
        pilot.observe(&world);
        assert_eq!(pilot.controls(), ControlState::IDLE);

        pilot.attach();
        pilot.observe(&world);
        assert!(pilot.controls().fire);

        pilot.detach();
        assert_eq!(pilot.controls(), ControlState::IDLE);
    }

    #[test]
    fn angles_wrap_into_half_turns() {
        assert!((normalize_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((heading_towards(Vec2::new(1.0, 0.0)) - PI / 2.0).abs() < 1e-12);
    }
}
