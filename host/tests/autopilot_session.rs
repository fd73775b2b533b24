use std::fs;

use anyhow::Result;
use asteroids_core::{
    parse_tape, replay, serialize_tape, BestTimeStore, GameConfig, GameContext, GameSession,
    ManualClock, NullOverlay, NullRenderer, VirtualScheduler,
};
use host::{load_config, Autopilot, EnvOverrides, JsonFileStore, RecordingInput};

#[test]
fn recorded_autopilot_game_replays_identically() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let store_path = tmp.path().join("best.json");
    let clock = ManualClock::new();

    let recorder = RecordingInput::new(Autopilot::default());
    let frames = recorder.frames();
    let context = GameContext {
        renderer: Box::new(NullRenderer),
        input: Box::new(recorder),
        store: Box::new(JsonFileStore::new(&store_path)),
        overlay: Box::new(NullOverlay),
        clock: Box::new(clock.clone()),
    };
    let mut session = GameSession::new(context, GameConfig::default(), 0xC0FF_EE11)
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    let mut scheduler = VirtualScheduler::new(clock);

    session.new_game();
    let outcome = session.run(&mut scheduler, Some(6_000));

    let inputs = frames.borrow().clone();
    assert_eq!(inputs.len() as u64, outcome.ticks);

    let tape = serialize_tape(session.game_seed(), &inputs);
    let parsed = parse_tape(&tape).map_err(|err| anyhow::anyhow!("{err}"))?;
    let replayed = replay(&GameConfig::default(), parsed.header.seed, parsed.inputs);

    let simulation = session.simulation().expect("world kept after the run");
    assert_eq!(replayed.ticks, simulation.tick_count());
    assert_eq!(replayed.stats, simulation.stats());
    assert_eq!(replayed.final_rng_state, simulation.rng_state());
    assert_eq!(replayed.game_over, outcome.game_over.is_some());
    assert!(replayed.stats.bullets_fired > 0);

    let store = JsonFileStore::new(&store_path);
    match outcome.game_over {
        Some(summary) => assert_eq!(store.best_time(), Some(summary.elapsed)),
        None => assert!(!store_path.exists()),
    }
    Ok(())
}

#[test]
fn config_file_overrides_defaults() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("game.json");
    fs::write(
        &path,
        r#"{"playfield": {"width": 640, "height": 480}, "ship": {"friction": 0.98}}"#,
    )?;

    let config = load_config(Some(&path), &EnvOverrides::default())?;
    assert_eq!(config.playfield.width, 640.0);
    assert_eq!(config.playfield.height, 480.0);
    assert_eq!(config.ship.friction, 0.98);
    assert_eq!(config.spawn, GameConfig::default().spawn);

    let overrides = EnvOverrides {
        width: Some(1_000.0),
        ..EnvOverrides::default()
    };
    let config = load_config(Some(&path), &overrides)?;
    assert_eq!(config.playfield.width, 1_000.0);
    assert_eq!(config.playfield.height, 480.0);
    Ok(())
}

#[test]
fn invalid_config_file_is_rejected() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("game.json");
    fs::write(&path, r#"{"playfield": {"width": -5, "height": 480}}"#)?;
    assert!(load_config(Some(&path), &EnvOverrides::default()).is_err());

    fs::write(&path, "[]")?;
    assert!(load_config(Some(&path), &EnvOverrides::default()).is_err());
    Ok(())
}

#[test]
fn non_object_config_documents_are_rejected() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("game.json");

    for body in ["[]", "[1, 2]", "7", "null", r#"{"playfield": []}"#, r#"{"ship": 0.5}"#] {
        fs::write(&path, body)?;
        assert!(
            load_config(Some(&path), &EnvOverrides::default()).is_err(),
            "accepted {body}"
        );
    }

    fs::write(&path, "{}")?;
    assert_eq!(
        load_config(Some(&path), &EnvOverrides::default())?,
        GameConfig::default()
    );
    Ok(())
}

#[test]
fn corrupt_store_does_not_announce_a_record() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let store_path = tmp.path().join("best.json");
    fs::write(&store_path, b"{broken")?;
    let clock = ManualClock::new();

    let context = GameContext {
        renderer: Box::new(NullRenderer),
        input: Box::new(Autopilot::default()),
        store: Box::new(JsonFileStore::new(&store_path)),
        overlay: Box::new(NullOverlay),
        clock: Box::new(clock.clone()),
    };
    let mut session = GameSession::new(context, GameConfig::default(), 5)
        .map_err(|err| anyhow::anyhow!("{err}"))?;
    session.new_game();
    clock.advance(std::time::Duration::from_secs(3));

    let simulation = session.simulation_mut().expect("game running");
    let position = simulation.ship().position;
    let mut rock = simulation.asteroids()[0];
    rock.position = position;
    rock.velocity = asteroids_core::Vec2::ZERO;
    *simulation.asteroids_mut() = vec![rock];

    let asteroids_core::TickStatus::GameOver(summary) = session.tick() else {
        panic!("ship should be hit");
    };
    assert!(!summary.new_record);
    assert_eq!(session.best_time(), None);
    assert_eq!(fs::read(&store_path)?, b"{broken");
    Ok(())
}
