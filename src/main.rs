//! Stride - headless locomotion runner
//!
//! Drops one player into the test arena and plays a scripted input sequence,
//! logging the movement state as it goes.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use stride_game::{Level, PlayerInput, Simulation, SimulationConfig};

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Run a scripted locomotion scenario", long_about = None)]
struct Cli {
    /// TOML simulation config with optional [locomotion] and [body] tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input script to play
    #[arg(short, long, value_enum, default_value_t = Scenario::Walk)]
    scenario: Scenario,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,

    /// Override the configured tick rate
    #[arg(long)]
    tick_rate: Option<u32>,

    /// Log the player every N ticks (0 disables)
    #[arg(long, default_value_t = 30)]
    log_every: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Walk forward across the open floor
    Walk,
    /// Run forward across the open floor
    Run,
    /// Run down the ramp, then crouch into a slide
    Slide,
    /// Crouch, crawl under the slab, try to stand, crawl out
    Crawl,
    /// Hop every second
    Jump,
}

impl Scenario {
    fn spawn(self) -> &'static str {
        match self {
            Scenario::Walk | Scenario::Run | Scenario::Jump => "open",
            Scenario::Slide => "ramp",
            Scenario::Crawl => "crawl",
        }
    }

    /// Input for `tick`, expressed in seconds so scripts hold at any tick rate.
    fn input(self, tick: u32, tick_rate: u32) -> PlayerInput {
        let time = tick as f32 / tick_rate as f32;
        let mut input = PlayerInput {
            frame: tick,
            ..Default::default()
        };

        match self {
            Scenario::Walk => input.movement.forward = true,
            Scenario::Run => {
                input.movement.forward = true;
                input.actions.run = true;
            }
            Scenario::Slide => {
                input.movement.forward = true;
                input.actions.run = true;
                input.actions.crouch = time >= 0.5;
            }
            Scenario::Crawl => {
                input.actions.crouch = time < 4.0;
                input.movement.forward = (1.5..4.0).contains(&time) || time >= 4.5;
            }
            Scenario::Jump => {
                input.movement.forward = true;
                input.actions.jump = tick % tick_rate == 0;
            }
        }

        input
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match SimulationConfig::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };
    if let Some(tick_rate) = cli.tick_rate {
        config.tick_rate = tick_rate;
    }
    if let Err(err) = config.validate() {
        log::error!("{err}");
        return ExitCode::FAILURE;
    }

    let tick_rate = config.tick_rate;
    let mut sim = Simulation::new(config, Level::test_arena());
    let Some(id) = sim.add_player_at("runner", cli.scenario.spawn()) else {
        log::error!("test arena has no '{}' spawn", cli.scenario.spawn());
        return ExitCode::FAILURE;
    };

    log::info!(
        "{:?} scenario: {} ticks at {} Hz",
        cli.scenario,
        cli.ticks,
        tick_rate
    );

    let Some(start) = sim.get_player(id).map(|player| player.position()) else {
        return ExitCode::FAILURE;
    };

    for tick in 0..cli.ticks {
        sim.tick(&[cli.scenario.input(tick, tick_rate)]);

        if cli.log_every > 0 && (tick + 1) % cli.log_every == 0 {
            if let Some(player) = sim.get_player(id) {
                log::info!(
                    "tick {:4}: {:?} pos ({:.0}, {:.0}, {:.0}) speed {:.0} fov {:.1} eye {:.1} half {:.1}",
                    tick + 1,
                    player.state(),
                    player.position().x,
                    player.position().y,
                    player.position().z,
                    player.velocity().length(),
                    player.character().fov(),
                    player.character().eye_height(),
                    player.character().half_height(),
                );
            }
        }
    }

    let Some(player) = sim.get_player(id) else {
        return ExitCode::FAILURE;
    };
    println!("scenario:    {:?}", cli.scenario);
    println!("ticks:       {} ({:.2}s)", sim.frame, sim.frame as f32 / tick_rate as f32);
    println!("state:       {:?}", player.state());
    println!("position:    {:?}", player.position());
    println!("travelled:   {:.1}", (player.position() - start).length());
    println!("speed:       {:.1}", player.velocity().length());
    println!("on ground:   {}", player.on_ground());
    println!("fov:         {:.2}", player.character().fov());
    println!("eye height:  {:.2}", player.character().eye_height());
    println!("half height: {:.2}", player.character().half_height());

    ExitCode::SUCCESS
}
