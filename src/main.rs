//! stardrift: star field and orbiting satellite viewer.
//!
//! Opens a window by default. `--headless <frames>` renders without a window
//! or GPU and writes the last frame to a PNG instead.

use std::path::{Path, PathBuf};

use clap::Parser;
use stardrift::config::SceneConfig;
use stardrift::error::RunError;
use stardrift::scene::Scene;

#[derive(Parser)]
#[command(
    name = "stardrift",
    about = "Space backdrop, pointer-reactive star field and a scroll-driven orbiting satellite"
)]
struct Args {
    /// Scene configuration (JSON). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render this many frames without a window, then exit.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,

    /// Output image for headless renders.
    #[arg(short, long, default_value = "stardrift.png")]
    out: PathBuf,

    /// Page scroll progress in [0, 1] for headless renders.
    #[arg(long, default_value_t = 0.0)]
    scroll: f32,

    /// RNG seed; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stardrift=info".into()),
        )
        .init();

    if let Err(err) = run(Args::parse()) {
        tracing::error!(error = %err, "stardrift failed");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), RunError> {
    let mut config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => SceneConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    if args.dump_config {
        let json = serde_json::to_string_pretty(&config)
            .map_err(stardrift::error::ConfigError::from)?;
        println!("{}", json);
        return Ok(());
    }

    match args.headless {
        Some(frames) => render_headless(config, frames, args.scroll, &args.out),
        None => stardrift::window::run(config),
    }
}

fn render_headless(
    config: SceneConfig,
    frames: u32,
    scroll: f32,
    out: &Path,
) -> Result<(), RunError> {
    const DT: f32 = 1.0 / 60.0;

    let mut scene = Scene::new(config);
    scene.time_mut().set_fixed_delta(Some(DT));
    let target = scroll.clamp(0.0, 1.0) * scene.page().max_scroll();
    scene.input_mut().scroll(target);

    tracing::info!(frames, scroll, "headless render");
    for _ in 0..frames {
        scene.step(DT);
    }

    scene.canvas().save_png(out)?;
    tracing::info!(path = %out.display(), "frame written");
    Ok(())
}
