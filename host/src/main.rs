use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use asteroids_core::hud::{best_time_text, format_time};
use asteroids_core::{
    parse_tape, replay, serialize_tape, BestTimeStore, FrameScheduler, GameConfig, GameContext,
    GameSession, InputSource, ManualClock, NullRenderer, Renderer, SimulationStats,
    VirtualScheduler,
};
use clap::{Parser, Subcommand};
use host::{
    load_config, parse_seed, seed_to_hex, Autopilot, EnvOverrides, JsonFileStore, LogOverlay,
    MonotonicClock, RealtimeScheduler, RecordingInput, TerminalRenderer,
};
use serde::Serialize;

const DEFAULT_STORE_PATH: &str = ".asteroids/best-time.json";

#[derive(Parser, Debug)]
#[command(name = "asteroids")]
#[command(about = "Endless-survival asteroids, played by the autopilot in a terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play one game with the autopilot at the controls
    Play {
        /// Session seed (decimal or 0x-hex); falls back to ASTEROIDS_SEED, then the clock
        #[arg(long)]
        seed: Option<String>,
        /// Stop after this many ticks even if the ship survives (120 ticks = 1 s)
        #[arg(long, default_value_t = 108_000)]
        max_ticks: u64,
        /// Pace ticks against the wall clock instead of running flat out
        #[arg(long, default_value_t = false)]
        realtime: bool,
        /// Draw every n-th frame to the terminal; 0 disables drawing
        #[arg(long, default_value_t = 0)]
        render_every: u64,
        #[arg(long, default_value_t = 96)]
        columns: usize,
        #[arg(long, default_value_t = 27)]
        rows: usize,
        /// Write the inputs of the game to a replayable tape
        #[arg(long)]
        record: Option<PathBuf>,
        /// Write a JSON summary of the run
        #[arg(long)]
        report_out: Option<PathBuf>,
        #[arg(long)]
        store: Option<PathBuf>,
        /// JSON game config; missing fields keep their defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Re-run a recorded tape headlessly
    Replay {
        #[arg(long)]
        tape: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the replay result as JSON
        #[arg(long)]
        json_out: Option<PathBuf>,
    },
    /// Print or clear the persisted best time
    Best {
        #[arg(long)]
        store: Option<PathBuf>,
        #[arg(long, default_value_t = false)]
        reset: bool,
    },
}

#[derive(Debug, Serialize)]
struct PlayReport {
    seed: u32,
    game_seed: u32,
    ticks: u64,
    elapsed_ms: u64,
    game_over: bool,
    new_record: bool,
    best_ms: Option<u64>,
    stats: SimulationStats,
}

struct PlayOptions {
    seed: Option<String>,
    max_ticks: u64,
    realtime: bool,
    render_every: u64,
    columns: usize,
    rows: usize,
    record: Option<PathBuf>,
    report_out: Option<PathBuf>,
    store: PathBuf,
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Play {
            seed,
            max_ticks,
            realtime,
            render_every,
            columns,
            rows,
            record,
            report_out,
            store,
            config,
        } => play(PlayOptions {
            seed,
            max_ticks,
            realtime,
            render_every,
            columns,
            rows,
            record,
            report_out,
            store: store.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            config,
        }),
        Commands::Replay {
            tape,
            config,
            json_out,
        } => replay_tape(&tape, config.as_deref(), json_out.as_deref()),
        Commands::Best { store, reset } => {
            best(store.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)), reset)
        }
    }
}

fn play(options: PlayOptions) -> Result<()> {
    if options.max_ticks == 0 {
        return Err(anyhow!("--max-ticks must be > 0"));
    }

    let overrides = EnvOverrides::from_env();
    let config = load_config(options.config.as_deref(), &overrides)?;
    let seed = match options.seed.as_deref() {
        Some(seed) => parse_seed(seed)?,
        None => overrides.seed.unwrap_or_else(seed_from_time),
    };

    let recorder = RecordingInput::new(Autopilot::default());
    let frames = recorder.frames();
    let input: Box<dyn InputSource> = Box::new(recorder);
    let renderer = build_renderer(&config, &options, seed);
    let store = JsonFileStore::new(&options.store);

    let (clock, mut scheduler): (Box<dyn asteroids_core::Clock>, Box<dyn FrameScheduler>) =
        if options.realtime {
            (
                Box::new(MonotonicClock::new()),
                Box::new(RealtimeScheduler::new()),
            )
        } else {
            let clock = ManualClock::new();
            (
                Box::new(clock.clone()),
                Box::new(VirtualScheduler::new(clock)),
            )
        };

    let context = GameContext {
        renderer,
        input,
        store: Box::new(store),
        overlay: Box::new(LogOverlay::new(io::stdout())),
        clock,
    };
    let mut session = GameSession::new(context, config, seed)
        .map_err(|err| anyhow!("invalid game config: {err}"))?;

    session.new_game();
    let outcome = session.run(scheduler.as_mut(), Some(options.max_ticks));

    println!("seed={}", seed_to_hex(seed));
    println!("game_seed={}", seed_to_hex(session.game_seed()));
    println!("ticks={}", outcome.ticks);
    println!("time={}", format_time(session.elapsed()));
    match outcome.game_over {
        Some(summary) => {
            println!("game_over=true");
            println!("new_record={}", summary.new_record);
            println!("asteroids_destroyed={}", summary.stats.asteroids_destroyed);
            println!("bullets_fired={}", summary.stats.bullets_fired);
        }
        None => println!("game_over=false"),
    }

    if let Some(path) = options.record {
        let tape = serialize_tape(session.game_seed(), &frames.borrow());
        write_file(&path, &tape)?;
        println!("tape={}", path.display());
    }

    if let Some(path) = options.report_out {
        let report = PlayReport {
            seed,
            game_seed: session.game_seed(),
            ticks: outcome.ticks,
            elapsed_ms: session.elapsed().as_millis() as u64,
            game_over: outcome.game_over.is_some(),
            new_record: outcome.game_over.is_some_and(|summary| summary.new_record),
            best_ms: session.best_time().map(|best| best.as_millis() as u64),
            stats: session
                .simulation()
                .map(|simulation| simulation.stats())
                .unwrap_or_default(),
        };
        let json = serde_json::to_vec_pretty(&report).context("failed to serialize report")?;
        write_file(&path, &json)?;
        println!("report={}", path.display());
    }

    Ok(())
}

fn build_renderer(config: &GameConfig, options: &PlayOptions, seed: u32) -> Box<dyn Renderer> {
    if options.render_every == 0 {
        return Box::new(NullRenderer);
    }
    Box::new(
        TerminalRenderer::new(
            io::stdout(),
            config.playfield,
            options.columns,
            options.rows,
            seed,
        )
        .render_every(options.render_every)
        .clear_screen(options.realtime),
    )
}

fn replay_tape(path: &Path, config: Option<&Path>, json_out: Option<&Path>) -> Result<()> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read tape: {}", path.display()))?;
    let tape = parse_tape(&bytes)
        .map_err(|err| anyhow!("invalid tape {}: {err}", path.display()))?;
    let config = load_config(config, &EnvOverrides::from_env())?;

    let result = replay(&config, tape.header.seed, tape.inputs);

    println!("input={}", path.display());
    println!("seed={}", seed_to_hex(tape.header.seed));
    println!("frame_count={}", tape.header.frame_count);
    println!("ticks={}", result.ticks);
    println!(
        "time={}",
        format_time(std::time::Duration::from_millis(result.elapsed_ms))
    );
    println!("game_over={}", result.game_over);
    println!("asteroids_destroyed={}", result.stats.asteroids_destroyed);
    println!("asteroids_split={}", result.stats.asteroids_split);
    println!("bullets_fired={}", result.stats.bullets_fired);
    println!("final_rng_state={:#010x}", result.final_rng_state);

    if let Some(out) = json_out {
        let json =
            serde_json::to_vec_pretty(&result).context("failed to serialize replay result")?;
        write_file(out, &json)?;
        println!("json={}", out.display());
    }
    Ok(())
}

fn best(path: PathBuf, reset: bool) -> Result<()> {
    let mut store = JsonFileStore::new(path);
    if reset {
        let existed = store
            .reset()
            .with_context(|| format!("failed to reset {}", store.path().display()))?;
        println!("reset={existed}");
    }
    println!("{}", best_time_text(store.best_time()));
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed creating {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("failed writing {}", path.display()))
}

fn seed_from_time() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.subsec_nanos() ^ elapsed.as_secs() as u32)
        .unwrap_or(1)
}
