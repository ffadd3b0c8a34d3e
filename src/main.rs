//! Turf Golf headless demo
//!
//! Plays the first campaign between two bots and prints the results.
//!
//! Usage: `turf-golf [settings.json] [score-dir]`

use std::error::Error;
use std::sync::Arc;

use turf_golf::persistence::{JsonFileStore, MemoryStore, ScoreStore};
use turf_golf::platform::{Bot, HostInput, MatchRunner};
use turf_golf::sim::{Action, TickInput};
use turf_golf::{CourseRegistry, Settings};

/// Twenty minutes of logical time at the default tick rate
const MAX_TICKS: u64 = 30 * 60 * 20;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Turf Golf (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = args.next().map(Settings::load).unwrap_or_default();
    let mut store: Box<dyn ScoreStore> = match args.next() {
        Some(dir) => Box::new(JsonFileStore::new(dir)),
        None => Box::new(MemoryStore::new()),
    };

    let registry = Arc::new(CourseRegistry::builtin()?);
    let mut bots = vec![Bot::new("bot-1", 1), Bot::new("bot-2", 2)];
    let player_ids: Vec<String> = bots.iter().map(|b| b.player_id.clone()).collect();
    let step = settings.tick_ms().round().max(1.0) as u64;

    let mut runner = MatchRunner::setup(registry.clone(), settings, &player_ids);
    runner.load_scores(&*store)?;
    runner.apply(HostInput::Action {
        player_id: player_ids[0].clone(),
        action: Action::SelectLevel { course: 0, hole: None },
        game_time: 0,
    });

    let mut results = None;
    for frame in 1..=MAX_TICKS {
        let now = runner.state().game_time;
        for bot in &mut bots {
            if let Some(action) = bot.decide(runner.state()) {
                runner.apply(HostInput::Action {
                    player_id: bot.player_id.clone(),
                    action,
                    game_time: now,
                });
            }
        }
        runner.apply(HostInput::Tick(TickInput {
            game_time: frame * step,
            live_players: player_ids.clone(),
        }));
        if let Some(done) = runner.take_results() {
            results = Some(done);
            break;
        }
    }

    let state = runner.state();
    match &results {
        Some(results) => {
            println!("\nMatch over after {} ticks", state.frame_count);
            for (player_id, result) in results {
                let total = state.player(player_id).map(|p| p.total_shots).unwrap_or(0);
                println!("  {player_id}: {result:?} ({total} shots, par {})", state.total_par);
            }
        }
        None => println!("\nNo result within {MAX_TICKS} ticks"),
    }

    for (player_id, record) in &state.persisted {
        println!("\n{player_id}: {:+} to par", record.strokes_to_par());
        for (hole, course) in registry.courses().iter().enumerate() {
            if let (Some(score), Some(label)) = (record.best_score(hole), record.label(hole)) {
                println!("  {:<14} {score} ({label})", course.name);
            }
        }
    }

    let saved = runner.flush_scores(&mut *store)?;
    log::info!("Saved {} score records", saved);
    Ok(())
}
