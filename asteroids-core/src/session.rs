use core::time::Duration;

use crate::config::GameConfig;
use crate::constants::TICK_INTERVAL;
use crate::context::{Entity, GameContext, Renderer};
use crate::error::ConfigError;
use crate::hud::{best_time_value, format_time, BEST_TIME_LABEL, TIME_LABEL};
use crate::rng::SeededRng;
use crate::scheduler::FrameScheduler;
use crate::sim::{Simulation, SimulationStats};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOverSummary {
    pub elapsed: Duration,
    pub best: Option<Duration>,
    pub new_record: bool,
    pub ticks: u64,
    pub stats: SimulationStats,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickStatus {
    /// Not playing; nothing was advanced.
    Idle,
    Continue,
    GameOver(GameOverSummary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    pub ticks: u64,
    pub game_over: Option<GameOverSummary>,
}

/// Menu -> Playing -> GameOver -> Menu, driving one [`Simulation`] per game.
pub struct GameSession {
    context: GameContext,
    config: GameConfig,
    phase: Phase,
    simulation: Option<Simulation>,
    seeds: SeededRng,
    game_seed: u32,
    started_at: Duration,
    elapsed: Duration,
    best_time: Option<Duration>,
}

impl GameSession {
    /// Starts in [`Phase::Menu`] with the menu overlay showing the stored record.
    pub fn new(context: GameContext, config: GameConfig, seed: u32) -> Result<Self, ConfigError> {
        config.validate()?;

        let best_time = context.store.best_time();
        let mut session = Self {
            context,
            config,
            phase: Phase::Menu,
            simulation: None,
            seeds: SeededRng::new(seed),
            game_seed: 0,
            started_at: Duration::ZERO,
            elapsed: Duration::ZERO,
            best_time,
        };

        session.context.renderer.clear_and_redraw_background();
        session.context.renderer.present();
        session.context.overlay.show_menu(best_time);
        Ok(session)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    #[inline]
    pub fn best_time(&self) -> Option<Duration> {
        self.best_time
    }

    /// Seed of the current (or last) game's simulation.
    #[inline]
    pub fn game_seed(&self) -> u32 {
        self.game_seed
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    #[inline]
    pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        self.simulation.as_mut()
    }

    /// Fresh ship, fresh field, clock restarted. Ignored while already playing.
    pub fn new_game(&mut self) -> bool {
        if self.phase == Phase::Playing {
            tracing::warn!("new game requested while a game is running; ignoring");
            return false;
        }

        self.game_seed = self.seeds.next();
        self.simulation = Some(Simulation::new(self.config.clone(), self.game_seed));
        self.started_at = self.context.clock.now();
        self.elapsed = Duration::ZERO;
        self.context.input.attach();
        self.phase = Phase::Playing;

        tracing::info!(seed = self.game_seed, "new game started");
        true
    }

    /// Leaves the game-over screen. The finished world is discarded.
    pub fn show_menu(&mut self) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }

        self.simulation = None;
        self.best_time = self.context.store.best_time().or(self.best_time);
        self.phase = Phase::Menu;
        self.context.overlay.show_menu(self.best_time);
        true
    }

    /// One full state advance plus a frame. Does nothing outside [`Phase::Playing`].
    pub fn tick(&mut self) -> TickStatus {
        if self.phase != Phase::Playing {
            return TickStatus::Idle;
        }

        let elapsed = self.context.clock.now().saturating_sub(self.started_at);
        self.elapsed = elapsed;
        let controls = self.context.input.controls();

        let report = match self.simulation.as_mut() {
            Some(simulation) => simulation.step(controls, elapsed),
            None => return TickStatus::Idle,
        };

        if report.ship_wrapped {
            self.context.renderer.regenerate_background();
        }

        if let Some(simulation) = self.simulation.as_ref() {
            self.context.input.observe(&simulation.snapshot());
        }

        let summary = report.ship_hit.then(|| self.finish_game());

        if let Some(simulation) = self.simulation.as_ref() {
            draw_frame(
                self.context.renderer.as_mut(),
                simulation,
                controls.forward,
                self.elapsed,
                self.best_time,
            );
        }

        match summary {
            Some(summary) => TickStatus::GameOver(summary),
            None => TickStatus::Continue,
        }
    }

    /// Ticks until the game ends, the session is not playing, or `max_ticks`
    /// ticks have run, waiting on `scheduler` between ticks.
    pub fn run(
        &mut self,
        scheduler: &mut dyn FrameScheduler,
        max_ticks: Option<u64>,
    ) -> RunOutcome {
        let mut ticks = 0;
        loop {
            if max_ticks.is_some_and(|max| ticks >= max) {
                return RunOutcome {
                    ticks,
                    game_over: None,
                };
            }

            match self.tick() {
                TickStatus::Idle => {
                    return RunOutcome {
                        ticks,
                        game_over: None,
                    }
                }
                TickStatus::GameOver(summary) => {
                    return RunOutcome {
                        ticks: ticks + 1,
                        game_over: Some(summary),
                    }
                }
                TickStatus::Continue => {
                    ticks += 1;
                    scheduler.wait(TICK_INTERVAL);
                }
            }
        }
    }

    fn finish_game(&mut self) -> GameOverSummary {
        self.context.input.detach();

        // Records are kept at millisecond precision.
        let elapsed = Duration::from_millis(self.elapsed.as_millis() as u64);
        self.elapsed = elapsed;

        // A record only counts once the store has accepted it.
        let previous = self.context.store.best_time();
        let beats_previous = previous.map_or(true, |best| best < elapsed);
        let new_record = beats_previous
            && match self.context.store.set_best_time(elapsed) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!("failed to persist best time: {err}");
                    false
                }
            };
        self.best_time = if new_record { Some(elapsed) } else { previous };

        self.phase = Phase::GameOver;
        self.context.overlay.show_game_over(elapsed, self.best_time);

        let (ticks, stats) = self
            .simulation
            .as_ref()
            .map(|simulation| (simulation.tick_count(), simulation.stats()))
            .unwrap_or_default();

        tracing::info!(
            elapsed = %format_time(elapsed),
            best = %best_time_value(self.best_time),
            new_record,
            ticks,
            "game over"
        );

        GameOverSummary {
            elapsed,
            best: self.best_time,
            new_record,
            ticks,
            stats,
        }
    }
}

fn draw_frame(
    renderer: &mut dyn Renderer,
    simulation: &Simulation,
    thrusting: bool,
    elapsed: Duration,
    best: Option<Duration>,
) {
    renderer.clear_and_redraw_background();
    renderer.draw_time_text(TIME_LABEL, &format_time(elapsed));
    renderer.draw_time_text(BEST_TIME_LABEL, &best_time_value(best));

    let ship = simulation.ship();
    renderer.draw_entity(Entity::Ship { ship, thrusting });
    for bullet in &ship.bullets {
        renderer.draw_entity(Entity::Bullet(bullet));
    }
    for asteroid in simulation.asteroids() {
        renderer.draw_entity(Entity::Asteroid(asteroid));
    }
    renderer.present();
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::context::{BestTimeStore, ManualClock, MemoryStore, NullRenderer, Overlay};
    use crate::error::StoreError;
    use crate::input::{Action, KeyboardInput};
    use crate::scheduler::VirtualScheduler;
    use crate::sim::Asteroid;
    use crate::vector::Vec2;

    type Log = Rc<RefCell<Vec<String>>>;

    struct RecordingOverlay(Log);

    impl Overlay for RecordingOverlay {
        fn show_menu(&mut self, best: Option<Duration>) {
            self.0.borrow_mut().push(format!("menu {best:?}"));
        }

        fn show_game_over(&mut self, elapsed: Duration, best: Option<Duration>) {
            self.0
                .borrow_mut()
                .push(format!("game-over {elapsed:?} {best:?}"));
        }
    }

    struct RecordingRenderer(Log);

    impl Renderer for RecordingRenderer {
        fn clear_and_redraw_background(&mut self) {}

        fn draw_entity(&mut self, _entity: Entity<'_>) {}

        fn regenerate_background(&mut self) {
            self.0.borrow_mut().push("regenerate".to_string());
        }

        fn draw_time_text(&mut self, label: &str, value: &str) {
            self.0.borrow_mut().push(format!("{label}={value}"));
        }
    }

    struct FailingStore;

    impl BestTimeStore for FailingStore {
        fn best_time(&self) -> Option<Duration> {
            None
        }

        fn set_best_time(&mut self, _best: Duration) -> Result<(), StoreError> {
            Err(StoreError::Io("disk full".to_string()))
        }
    }

    struct Harness {
        session: GameSession,
        clock: ManualClock,
        keyboard: KeyboardInput,
        store: MemoryStore,
        overlay_log: Log,
        render_log: Log,
    }

    fn harness(best: Option<Duration>) -> Harness {
        let clock = ManualClock::new();
        let keyboard = KeyboardInput::new();
        let store = MemoryStore::new(best);
        let overlay_log = Log::default();
        let render_log = Log::default();
        let context = GameContext {
            renderer: Box::new(RecordingRenderer(render_log.clone())),
            input: Box::new(keyboard.clone()),
            store: Box::new(store.clone()),
            overlay: Box::new(RecordingOverlay(overlay_log.clone())),
            clock: Box::new(clock.clone()),
        };
        let session = GameSession::new(context, GameConfig::default(), 0x5EED)
            .expect("default config is valid");
        Harness {
            session,
            clock,
            keyboard,
            store,
            overlay_log,
            render_log,
        }
    }

    fn park_asteroid_on_ship(session: &mut GameSession) {
        let simulation = session.simulation_mut().expect("game is running");
        let position = simulation.ship().position;
        *simulation.asteroids_mut() = vec![Asteroid {
            position,
            velocity: Vec2::ZERO,
            radius: 30.0,
            color: crate::constants::ASTEROID_COLOR,
            rotation: 0.0,
            spin: 0.0,
        }];
    }

    #[test]
    fn starts_in_menu_showing_the_stored_record() {
        let h = harness(Some(Duration::from_secs(12)));
        assert_eq!(h.session.phase(), Phase::Menu);
        assert_eq!(h.session.best_time(), Some(Duration::from_secs(12)));
        assert_eq!(h.overlay_log.borrow().as_slice(), ["menu Some(12s)"]);
    }

    #[test]
    fn ticks_outside_play_do_nothing() {
        let mut h = harness(None);
        assert_eq!(h.session.tick(), TickStatus::Idle);
        assert!(h.session.simulation().is_none());
    }

    #[test]
    fn new_game_attaches_input_and_spawns_a_field() {
        let mut h = harness(None);
        assert!(h.session.new_game());
        assert_eq!(h.session.phase(), Phase::Playing);
        assert!(h.keyboard.is_attached());
        assert!(h.session.simulation().expect("running").asteroids().len() >= 5);
        assert!(!h.session.new_game());
    }

    #[test]
    fn collision_ends_the_game_and_records_a_better_time() {
        let mut h = harness(Some(Duration::from_secs(3)));
        h.session.new_game();
        h.clock.advance(Duration::from_millis(5_250));
        park_asteroid_on_ship(&mut h.session);

        let TickStatus::GameOver(summary) = h.session.tick() else {
            panic!("expected game over");
        };

        assert!(summary.new_record);
        assert_eq!(summary.elapsed, Duration::from_millis(5_250));
        assert_eq!(h.session.phase(), Phase::GameOver);
        assert_eq!(h.store.best_time(), Some(Duration::from_millis(5_250)));
        assert_eq!(h.session.best_time(), Some(Duration::from_millis(5_250)));
        assert_eq!(
            h.overlay_log.borrow().last().map(String::as_str),
            Some("game-over 5.25s Some(5.25s)")
        );
        assert!(h
            .render_log
            .borrow()
            .iter()
            .any(|entry| entry == "Best Time=0:5.250"));
    }

    #[test]
    fn collision_keeps_a_better_existing_record() {
        let mut h = harness(Some(Duration::from_secs(60)));
        h.session.new_game();
        h.clock.advance(Duration::from_secs(2));
        park_asteroid_on_ship(&mut h.session);

        let TickStatus::GameOver(summary) = h.session.tick() else {
            panic!("expected game over");
        };

        assert!(!summary.new_record);
        assert_eq!(summary.best, Some(Duration::from_secs(60)));
        assert_eq!(h.store.best_time(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn game_over_detaches_input_and_halts_ticking() {
        let mut h = harness(None);
        h.session.new_game();
        h.keyboard.press(Action::ThrustForward);
        park_asteroid_on_ship(&mut h.session);
        assert!(matches!(h.session.tick(), TickStatus::GameOver(_)));

        assert!(!h.keyboard.is_attached());
        h.keyboard.press(Action::Fire);
        assert_eq!(
            crate::context::InputSource::controls(&h.keyboard),
            crate::input::ControlState::IDLE
        );

        let frozen = h.session.simulation().expect("kept for display").tick_count();
        assert_eq!(h.session.tick(), TickStatus::Idle);
        assert_eq!(h.session.simulation().expect("kept").tick_count(), frozen);
    }

    #[test]
    fn menu_after_game_over_then_restart() {
        let mut h = harness(None);
        h.session.new_game();
        park_asteroid_on_ship(&mut h.session);
        h.session.tick();

        assert!(h.session.show_menu());
        assert_eq!(h.session.phase(), Phase::Menu);
        assert!(h.session.simulation().is_none());
        assert_eq!(h.overlay_log.borrow().last().map(String::as_str), Some("menu Some(0ns)"));

        let first_seed = h.session.game_seed();
        assert!(h.session.new_game());
        assert_ne!(h.session.game_seed(), first_seed);
    }

    #[test]
    fn wrapping_regenerates_the_background() {
        let mut h = harness(None);
        h.session.new_game();
        {
            let simulation = h.session.simulation_mut().expect("running");
            simulation.asteroids_mut().truncate(1);
            simulation.asteroids_mut()[0].position = Vec2::new(-90.0, -90.0);
            simulation.asteroids_mut()[0].velocity = Vec2::ZERO;
            let ship = simulation.ship_mut();
            ship.position = Vec2::new(1_000.0, 0.2);
            ship.velocity = Vec2::new(0.0, 1.0);
        }

        assert_eq!(h.session.tick(), TickStatus::Continue);
        assert_eq!(
            h.render_log
                .borrow()
                .iter()
                .filter(|entry| *entry == "regenerate")
                .count(),
            1
        );
    }

    #[test]
    fn run_ticks_until_the_cap() {
        let mut h = harness(None);
        h.session.new_game();
        {
            let simulation = h.session.simulation_mut().expect("running");
            simulation.asteroids_mut().truncate(1);
            simulation.asteroids_mut()[0].position = Vec2::new(-90.0, -90.0);
            simulation.asteroids_mut()[0].velocity = Vec2::ZERO;
        }
        let mut scheduler = VirtualScheduler::new(h.clock.clone());

        let outcome = h.session.run(&mut scheduler, Some(240));

        assert_eq!(outcome.ticks, 240);
        assert!(outcome.game_over.is_none());
        assert_eq!(scheduler.waits(), 240);
        assert_eq!(h.session.elapsed(), TICK_INTERVAL * 239);
    }

    #[test]
    fn store_failures_do_not_block_game_over() {
        let clock = ManualClock::new();
        let context = GameContext {
            renderer: Box::new(NullRenderer),
            input: Box::new(KeyboardInput::new()),
            store: Box::new(FailingStore),
            overlay: Box::new(crate::context::NullOverlay),
            clock: Box::new(clock.clone()),
        };
        let mut session =
            GameSession::new(context, GameConfig::default(), 1).expect("valid config");
        session.new_game();
        clock.advance(Duration::from_secs(1));
        park_asteroid_on_ship(&mut session);

        let TickStatus::GameOver(summary) = session.tick() else {
            panic!("expected game over");
        };
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!summary.new_record);
        assert_eq!(summary.best, None);
        assert_eq!(session.best_time(), None);
    }

    #[test]
    fn unsaved_record_is_not_announced() {
        let clock = ManualClock::new();
        let overlay_log = Log::default();
        let context = GameContext {
            renderer: Box::new(NullRenderer),
            input: Box::new(KeyboardInput::new()),
            store: Box::new(FailingStore),
            overlay: Box::new(RecordingOverlay(overlay_log.clone())),
            clock: Box::new(clock.clone()),
        };
        let mut session =
            GameSession::new(context, GameConfig::default(), 1).expect("valid config");
        session.new_game();
        clock.advance(Duration::from_secs(2));
        park_asteroid_on_ship(&mut session);

        assert!(matches!(session.tick(), TickStatus::GameOver(_)));
        assert_eq!(
            overlay_log.borrow().last().map(String::as_str),
            Some("game-over 2s None")
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let context = GameContext {
            renderer: Box::new(NullRenderer),
            input: Box::new(KeyboardInput::new()),
            store: Box::new(MemoryStore::default()),
            overlay: Box::new(crate::context::NullOverlay),
            clock: Box::new(ManualClock::new()),
        };
        let config = GameConfig::default().with_playfield(-1.0, 10.0);
        assert!(GameSession::new(context, config, 1).is_err());
    }
}
