use std::time::Duration;

use asteroids_core::constants::ASTEROID_COLOR;
use asteroids_core::sim::Asteroid;
use asteroids_core::{
    BestTimeStore, GameConfig, GameContext, GameSession, InputSource, KeyboardInput,
    ManualClock, MemoryStore, NullOverlay, NullRenderer, Phase, TickStatus, Vec2,
};

struct Rig {
    session: GameSession,
    clock: ManualClock,
    keyboard: KeyboardInput,
    store: MemoryStore,
}

fn rig(best: Option<Duration>) -> Rig {
    let clock = ManualClock::new();
    let keyboard = KeyboardInput::new();
    let store = MemoryStore::new(best);
    let context = GameContext {
        renderer: Box::new(NullRenderer),
        input: Box::new(keyboard.clone()),
        store: Box::new(store.clone()),
        overlay: Box::new(NullOverlay),
        clock: Box::new(clock.clone()),
    };
    let session = GameSession::new(context, GameConfig::default(), 99).expect("valid config");
    Rig {
        session,
        clock,
        keyboard,
        store,
    }
}

/// Replaces the field with a single rock sitting on the ship.
fn doom_ship(session: &mut GameSession) {
    let simulation = session.simulation_mut().expect("game running");
    let position = simulation.ship().position + Vec2::new(10.0, 0.0);
    *simulation.asteroids_mut() = vec![Asteroid {
        position,
        velocity: Vec2::ZERO,
        radius: 40.0,
        color: ASTEROID_COLOR,
        rotation: 0.0,
        spin: 0.0,
    }];
}

fn play_until_hit(rig: &mut Rig, survive: Duration) -> TickStatus {
    rig.session.new_game();
    rig.clock.advance(survive);
    doom_ship(&mut rig.session);
    rig.session.tick()
}

#[test]
fn keyboard_drives_the_ship_while_playing() {
    let mut rig = rig(None);
    rig.keyboard.key_down("ArrowRight");
    assert!(!rig.keyboard.controls().right);

    rig.session.new_game();
    let heading = rig.session.simulation().expect("running").ship().heading;
    rig.keyboard.key_down("ArrowRight");
    rig.session.tick();
    rig.keyboard.key_up("ArrowRight");

    let turned = rig.session.simulation().expect("running").ship().heading;
    assert!(turned > heading);

    rig.session.tick();
    let settled = rig.session.simulation().expect("running").ship().heading;
    assert_eq!(settled, turned);
}

#[test]
fn record_survives_across_games() {
    let mut rig = rig(None);

    let TickStatus::GameOver(first) = play_until_hit(&mut rig, Duration::from_millis(61_042))
    else {
        panic!("first game should end");
    };
    assert!(first.new_record);
    assert_eq!(rig.store.best_time(), Some(Duration::from_millis(61_042)));

    assert!(rig.session.show_menu());
    assert_eq!(rig.session.phase(), Phase::Menu);

    let TickStatus::GameOver(second) = play_until_hit(&mut rig, Duration::from_secs(4)) else {
        panic!("second game should end");
    };
    assert!(!second.new_record);
    assert_eq!(second.best, Some(Duration::from_millis(61_042)));
    assert_eq!(rig.store.best_time(), Some(Duration::from_millis(61_042)));
}

#[test]
fn equal_time_is_not_a_new_record() {
    let mut rig = rig(Some(Duration::from_secs(9)));

    let TickStatus::GameOver(summary) = play_until_hit(&mut rig, Duration::from_secs(9)) else {
        panic!("game should end");
    };

    assert!(!summary.new_record);
    assert_eq!(rig.store.best_time(), Some(Duration::from_secs(9)));
}

#[test]
fn sub_millisecond_time_is_truncated() {
    let mut rig = rig(None);

    let TickStatus::GameOver(summary) =
        play_until_hit(&mut rig, Duration::from_micros(1_234_567))
    else {
        panic!("game should end");
    };

    assert_eq!(summary.elapsed, Duration::from_millis(1_234));
    assert_eq!(rig.session.elapsed(), Duration::from_millis(1_234));
}

#[test]
fn held_keys_do_not_leak_into_the_next_game() {
    let mut rig = rig(None);
    rig.session.new_game();
    rig.keyboard.key_down("ArrowUp");
    doom_ship(&mut rig.session);
    assert!(matches!(rig.session.tick(), TickStatus::GameOver(_)));

    rig.session.show_menu();
    rig.session.new_game();
    assert!(!rig.keyboard.controls().forward);
}
