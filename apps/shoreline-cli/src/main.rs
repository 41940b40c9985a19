use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shoreline_input::{InputEvent, Key};
use shoreline_kernel::{FixedClock, Session, Tuning};
use shoreline_render::{DebugTextRenderer, FrameDriver};
use shoreline_tools::SessionInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shoreline-cli", about = "Headless driver for the beach session")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the tuning as YAML (defaults, or a file merged over them)
    Config {
        /// Tuning file to load first
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run a scripted session with a fixed clock
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        frames: u64,
        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Input script to play
        #[arg(short, long, value_enum, default_value = "walk")]
        script: Script,
        /// Tuning file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Character rig manifest (JSON)
        #[arg(long)]
        rig: Option<PathBuf>,
        /// World seed override
        #[arg(long)]
        seed: Option<u64>,
        /// Print a debug frame every K frames (0 = never)
        #[arg(long, default_value = "0")]
        render_every: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Script {
    /// Hold forward
    Walk,
    /// Hold forward while steering the camera with the pointer
    Circle,
    /// Touch nothing
    Idle,
    /// Hold forward and jump once a second
    Jump,
}

impl Script {
    /// Host events to deliver before frame `n` (zero based).
    fn events(self, n: u64, fps: f32) -> Vec<InputEvent> {
        let second = (fps.round() as u64).max(1);
        match self {
            Script::Idle => Vec::new(),
            Script::Walk => {
                if n == 0 {
                    vec![InputEvent::KeyDown(Key::W)]
                } else {
                    Vec::new()
                }
            }
            Script::Circle => {
                let mut events = Vec::new();
                if n == 0 {
                    events.push(InputEvent::PointerLock(true));
                    events.push(InputEvent::KeyDown(Key::W));
                }
                events.push(InputEvent::MouseMove { dx: 4.0, dy: 0.0 });
                events
            }
            Script::Jump => {
                let mut events = Vec::new();
                if n == 0 {
                    events.push(InputEvent::KeyDown(Key::W));
                }
                match n % second {
                    0 if n > 0 => events.push(InputEvent::KeyDown(Key::Space)),
                    1 if n > 1 => events.push(InputEvent::KeyUp(Key::Space)),
                    _ => {}
                }
                events
            }
        }
    }
}

fn load_tuning(path: Option<&PathBuf>) -> anyhow::Result<Tuning> {
    match path {
        Some(p) => Tuning::load(p).with_context(|| format!("loading tuning from {}", p.display())),
        None => Ok(Tuning::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("shoreline-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("terrain: {}", shoreline_terrain::crate_info());
            println!("camera: {}", shoreline_camera::crate_info());
            println!("scene: {}", shoreline_scene::crate_info());
            println!("assets: {}", shoreline_assets::crate_info());
            println!("kernel: {}", shoreline_kernel::crate_info());
            println!("render: {}", shoreline_render::crate_info());
            println!("tools: {}", shoreline_tools::crate_info());
        }
        Commands::Config { config } => {
            let tuning = load_tuning(config.as_ref())?;
            print!("{}", tuning.to_yaml()?);
        }
        Commands::Run {
            frames,
            fps,
            script,
            config,
            rig,
            seed,
            render_every,
        } => {
            anyhow::ensure!(fps > 0.0, "--fps must be positive");
            let mut tuning = load_tuning(config.as_ref())?;
            if let Some(seed) = seed {
                tuning.world.seed = seed;
            }
            if rig.is_some() {
                tuning.world.rig_manifest = rig;
            }
            println!("Run: script={script:?} frames={frames} fps={fps} seed={}", tuning.world.seed);
            let mut session = Session::build(tuning).context("building session")?;
            let mut driver = FrameDriver::new(FixedClock::from_fps(fps), 16.0 / 9.0);
            let renderer = DebugTextRenderer::new();

            for n in 0..frames {
                for event in script.events(n, fps) {
                    session.handle_input(event);
                }
                let tick = driver.tick(&mut session, &renderer);
                for id in &tick.report.collected {
                    println!("frame {}: collected orb {}", tick.report.frame, id.short());
                }
                if render_every > 0 && tick.report.frame % render_every == 0 {
                    print!("{}", tick.output);
                }
            }

            println!("{}", SessionInspector::summary(&session));
            if let Some(orb) = SessionInspector::nearest_orb(&session) {
                println!("nearest: {orb}");
            }
            let timer = driver.timer();
            println!(
                "frame time: avg={:?} min={:?} max={:?} over {} frames",
                timer.average(),
                timer.min(),
                timer.max(),
                timer.count()
            );
            println!("state hash: {:#018x}", session.state_hash());
        }
    }

    Ok(())
}
