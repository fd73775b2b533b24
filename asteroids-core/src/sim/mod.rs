use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::TICK_INTERVAL;
use crate::input::{decode_input_byte, ControlState};
use crate::rng::SeededRng;

mod asteroid;
mod bullet;
pub mod collision;
mod ship;
pub mod spawn;

pub use asteroid::Asteroid;
pub use bullet::Bullet;
pub use collision::{collides, Circle};
pub use ship::{Ship, ShipUpdate};

/// What happened during one call to [`Simulation::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub fired: bool,
    pub ship_wrapped: bool,
    pub hits: u32,
    pub splits: u32,
    pub culled: usize,
    pub spawned: usize,
    pub ship_hit: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub bullets_fired: u32,
    pub asteroids_destroyed: u32,
    pub asteroids_split: u32,
    pub waves_spawned: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub stats: SimulationStats,
    pub ship_destroyed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayResult {
    pub ticks: u64,
    pub elapsed_ms: u64,
    pub game_over: bool,
    pub final_rng_state: u32,
    pub stats: SimulationStats,
}

/// One game's worth of world state, stepped a tick at a time.
///
/// Pure with respect to the outside world: it never draws, sleeps, or reads the
/// clock. Callers pass the elapsed session time in so the spawn policy can
/// escalate, which keeps replays reproducible.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: GameConfig,
    ship: Ship,
    asteroids: Vec<Asteroid>,
    rng: SeededRng,
    tick: u64,
    elapsed: Duration,
    stats: SimulationStats,
    ship_destroyed: bool,
}

impl Simulation {
    /// Fresh ship at the center and an opening wave spawned at elapsed time zero.
    pub fn new(config: GameConfig, seed: u32) -> Self {
        let ship = Ship::new(&config.ship, &config.playfield);
        let mut simulation = Self::from_parts(config, seed, ship, Vec::new());
        simulation.spawn_if_empty();
        simulation
    }

    /// Builds a world from explicit entities without spawning anything.
    pub fn from_parts(config: GameConfig, seed: u32, ship: Ship, asteroids: Vec<Asteroid>) -> Self {
        Self {
            config,
            ship,
            asteroids,
            rng: SeededRng::new(seed),
            tick: 0,
            elapsed: Duration::ZERO,
            stats: SimulationStats::default(),
            ship_destroyed: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    #[inline]
    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    #[inline]
    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    #[inline]
    pub fn asteroids_mut(&mut self) -> &mut Vec<Asteroid> {
        &mut self.asteroids
    }

    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    #[inline]
    pub fn is_ship_destroyed(&self) -> bool {
        self.ship_destroyed
    }

    #[inline]
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    /// Advances the world by one tick.
    ///
    /// Order: ship and its bullets, bullet hits and splits, culling of strays,
    /// respawn on an empty field, asteroid motion, then the ship hit test. Once
    /// the ship has been hit the world is frozen and further steps are no-ops.
    pub fn step(&mut self, input: ControlState, elapsed: Duration) -> TickReport {
        if self.ship_destroyed {
            return TickReport {
                tick: self.tick,
                ship_hit: true,
                ..TickReport::default()
            };
        }

        self.tick += 1;
        self.elapsed = elapsed;
        let mut report = TickReport {
            tick: self.tick,
            ..TickReport::default()
        };

        let ship_update = self
            .ship
            .update(input, &self.config.ship, &self.config.playfield);
        report.fired = ship_update.fired;
        report.ship_wrapped = ship_update.wrapped;
        if ship_update.fired {
            self.stats.bullets_fired += 1;
        }

        let (hits, splits) = self.resolve_bullet_hits();
        report.hits = hits;
        report.splits = splits;

        report.culled = self.cull_strays();
        report.spawned = self.spawn_if_empty();

        for asteroid in &mut self.asteroids {
            asteroid.advance();
        }

        report.ship_hit = self
            .asteroids
            .iter()
            .any(|asteroid| collides(asteroid, &self.ship));
        self.ship_destroyed = report.ship_hit;

        tracing::trace!(
            tick = self.tick,
            asteroids = self.asteroids.len(),
            bullets = self.ship.bullets.len(),
            "tick"
        );

        report
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            elapsed_ms: self.elapsed.as_millis() as u64,
            ship: self.ship.clone(),
            asteroids: self.asteroids.clone(),
            stats: self.stats,
            ship_destroyed: self.ship_destroyed,
        }
    }

    fn resolve_bullet_hits(&mut self) -> (u32, u32) {
        if self.ship.bullets.is_empty() || self.asteroids.is_empty() {
            return (0, 0);
        }

        let bullets = core::mem::take(&mut self.ship.bullets);
        let asteroids = core::mem::take(&mut self.asteroids);
        let tuning = self.config.asteroids;
        let rng = &mut self.rng;
        let resolution = collision::resolve_bullet_hits(bullets, asteroids, |asteroid| {
            asteroid.split_into(&tuning, rng)
        });

        self.ship.bullets = resolution.bullets;
        self.asteroids = resolution.asteroids;
        self.stats.asteroids_destroyed += resolution.hits;
        self.stats.asteroids_split += resolution.splits;
        if resolution.hits > 0 {
            tracing::debug!(
                tick = self.tick,
                hits = resolution.hits,
                splits = resolution.splits,
                "asteroids struck"
            );
        }

        (resolution.hits, resolution.splits)
    }

    fn cull_strays(&mut self) -> usize {
        let before = self.asteroids.len();
        let playfield = self.config.playfield;
        let tuning = self.config.asteroids;
        self.asteroids
            .retain(|asteroid| !asteroid.is_out_of_bounds(&playfield, &tuning));
        before - self.asteroids.len()
    }

    fn spawn_if_empty(&mut self) -> usize {
        if !self.asteroids.is_empty() {
            return 0;
        }

        let wave = spawn::spawn(0, self.elapsed, &self.config, &mut self.rng);
        self.stats.waves_spawned += 1;
        tracing::debug!(
            count = wave.len(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            wave = self.stats.waves_spawned,
            "spawned asteroid wave"
        );
        let spawned = wave.len();
        self.asteroids = wave;
        spawned
    }
}

/// Runs a recorded input tape with tick-derived time (`tick * 1/FPS`) and stops
/// at the first ship hit.
pub fn replay(config: &GameConfig, seed: u32, inputs: &[u8]) -> ReplayResult {
    let mut simulation = Simulation::new(config.clone(), seed);

    for input in inputs {
        let elapsed = TICK_INTERVAL * (simulation.tick_count() as u32);
        let report = simulation.step(decode_input_byte(*input), elapsed);
        if report.ship_hit {
            break;
        }
    }

    ReplayResult {
        ticks: simulation.tick_count(),
        elapsed_ms: simulation.elapsed.as_millis() as u64,
        game_over: simulation.is_ship_destroyed(),
        final_rng_state: simulation.rng_state(),
        stats: simulation.stats(),
    }
}
