//! neural-backdrop - particle-network backdrop in a native window.
//!
//! ```text
//! neural-backdrop run --seed 7
//! neural-backdrop snapshot out.png --width 1200 --height 800 --frames 120
//! neural-backdrop visit
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `neural_backdrop::web::start`.
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::{Path, PathBuf};
    use std::thread;
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::{Parser, Subcommand};
    use neural_backdrop::page::geo::{resolve_location, HttpLookup};
    use neural_backdrop::page::visits::JsonFileStore;
    use neural_backdrop::page::{MemoryStore, VisitTracker};
    use neural_backdrop::prelude::*;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    #[derive(Parser)]
    #[command(name = "neural-backdrop")]
    #[command(about = "Animated particle-network backdrop")]
    struct Cli {
        /// JSON configuration file (defaults are used when omitted)
        #[arg(short, long, global = true)]
        config: Option<PathBuf>,

        /// Seed for a reproducible particle layout
        #[arg(long, global = true)]
        seed: Option<u64>,

        /// Treat the device as touch capable
        #[arg(long, global = true)]
        touch: bool,

        /// Log a reduced-motion preference
        #[arg(long, global = true)]
        reduced_motion: bool,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Open the backdrop in a window
        Run {
            #[arg(long, default_value = "1280")]
            width: f64,

            #[arg(long, default_value = "720")]
            height: f64,

            /// Visit counter file
            #[arg(long, env = "NEURAL_BACKDROP_VISITS", default_value = "visits.json")]
            visits_file: PathBuf,

            /// Skip the visitor location lookup
            #[arg(long)]
            no_geo: bool,
        },

        /// Render frames headlessly and write the last one as a PNG
        Snapshot {
            /// Output PNG path
            output: PathBuf,

            #[arg(long, default_value = "1200")]
            width: u32,

            #[arg(long, default_value = "800")]
            height: u32,

            /// Frames to simulate before writing
            #[arg(long, default_value = "60")]
            frames: u32,
        },

        /// Record a visit and print the counter and location label
        Visit {
            #[arg(long, env = "NEURAL_BACKDROP_VISITS", default_value = "visits.json")]
            visits_file: PathBuf,

            #[arg(long)]
            no_geo: bool,
        },
    }

    pub fn main() -> Result<()> {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();

        let cli = Cli::parse();

        let mut config = match &cli.config {
            Some(path) => BackdropConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => BackdropConfig::default(),
        };
        config.touch |= cli.touch;
        config.reduced_motion |= cli.reduced_motion;

        match cli.command {
            Commands::Run {
                width,
                height,
                visits_file,
                no_geo,
            } => {
                record_visit(&visits_file);
                if !no_geo {
                    spawn_location_lookup();
                }
                let mut backdrop = Backdrop::new()
                    .with_config(config)
                    .with_size(width, height);
                if let Some(seed) = cli.seed {
                    backdrop = backdrop.with_seed(seed);
                }
                backdrop.run()?;
                Ok(())
            }
            Commands::Snapshot {
                output,
                width,
                height,
                frames,
            } => snapshot(config, cli.seed, &output, width, height, frames),
            Commands::Visit {
                visits_file,
                no_geo,
            } => {
                if let Some(count) = record_visit(&visits_file) {
                    println!("visits: {}", neural_backdrop::page::visits::format_count(count));
                }
                if !no_geo {
                    let lookup = HttpLookup::new()?;
                    let label = resolve_location(&lookup, language().as_deref());
                    println!("location: {label}");
                }
                Ok(())
            }
        }
    }

    fn snapshot(
        config: BackdropConfig,
        seed: Option<u64>,
        output: &Path,
        width: u32,
        height: u32,
        frames: u32,
    ) -> Result<()> {
        config.validate()?;
        let canvas = RasterCanvas::new(width, height).with_background(config.visuals.background);
        let viewport = Viewport::new(width as f32, height as f32);
        let spawn = match seed {
            Some(seed) => SpawnContext::with_seed(&config.simulation, seed),
            None => SpawnContext::new(&config.simulation),
        };

        let mut scheduler = CountingScheduler::default();
        let mut widget = NeuralNetworkWidget::with_spawn(canvas, viewport, config, spawn);
        widget.start(&mut scheduler);
        for _ in 0..frames.max(1) {
            widget.frame(&mut scheduler);
        }

        widget
            .canvas()
            .save_png(output)
            .with_context(|| format!("writing {}", output.display()))?;
        let stats = widget.last_stats();
        tracing::info!(
            path = %output.display(),
            frames = widget.frames(),
            particles = stats.particles,
            connections = stats.connections,
            "snapshot written"
        );
        Ok(())
    }

    /// Count this launch as a page view. The session store lives for one
    /// process, so every launch is a fresh session.
    fn record_visit(path: &Path) -> Option<u64> {
        let mut durable = match JsonFileStore::open(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "visit store unavailable");
                return None;
            }
        };
        let mut session = MemoryStore::new();
        match VisitTracker::record(&mut durable, &mut session, now_ms()) {
            Ok(outcome) => {
                tracing::info!(
                    path = %durable.path().display(),
                    total = outcome.count,
                    counted = outcome.counted,
                    "total unique visits"
                );
                Some(outcome.count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to record visit");
                None
            }
        }
    }

    fn spawn_location_lookup() {
        let spawned = thread::Builder::new()
            .name("geo-lookup".into())
            .spawn(|| match HttpLookup::new() {
                Ok(lookup) => {
                    resolve_location(&lookup, language().as_deref());
                }
                Err(e) => tracing::warn!(error = %e, "location lookup unavailable"),
            });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to start location lookup");
        }
    }

    /// `LANG=en_US.UTF-8` as `en-US`.
    fn language() -> Option<String> {
        let lang = std::env::var("LANG").ok()?;
        let tag = lang.split('.').next()?.replace('_', "-");
        (!tag.is_empty() && tag != "C" && tag != "POSIX").then_some(tag)
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
