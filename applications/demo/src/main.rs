/// Tuneline Demo - scripted audio player sessions in the terminal
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuneline_demo::{render, variants, DemoConfig, Session};
use tuneline_playback::{DisplayMode, PlayerView};

#[derive(Parser)]
#[command(name = "tuneline-demo")]
#[command(about = "Drive a Tuneline audio player against simulated backends", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TUNELINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted playback session and print every emitted frame
    Play {
        /// Media source (overrides the config file)
        #[arg(short, long)]
        src: Option<String>,
        /// Starting backend: waveform or timeline
        #[arg(short, long)]
        display: Option<DisplayMode>,
        /// Print frames as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Render the showcase layouts
    Variants {
        /// Preview position as a percentage of the track
        #[arg(short, long, default_value_t = 30.0)]
        position: f64,
        /// Print variant configurations as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing (stderr keeps stdout clean for frames)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tuneline_demo=info,tuneline_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config =
        DemoConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Play { src, display, json } => {
            if let Some(src) = src {
                config.src = src;
            }
            if let Some(display) = display {
                config.player.display = display;
            }
            play(config, json)?;
        }
        Commands::Variants { position, json } => {
            show_variants(config.session.duration_secs, position, json)?;
        }
    }

    Ok(())
}

fn play(config: DemoConfig, json: bool) -> anyhow::Result<()> {
    let frames = Session::new(config).run().context("Playback session failed")?;

    for frame in &frames {
        if json {
            println!("{}", serde_json::to_string(frame)?);
        } else {
            println!("[{}]", frame.step);
            println!("{}", render::render(&frame.view, &frame.state));
        }
    }

    Ok(())
}

fn show_variants(duration_secs: f64, position: f64, json: bool) -> anyhow::Result<()> {
    let state = variants::preview_state(duration_secs, position);

    for variant in variants::variants() {
        if json {
            println!("{}", serde_json::to_string(&variant)?);
            continue;
        }
        let view = PlayerView::render(&variant.config, &state);
        println!("{} ({}, {})", variant.name, variant.config.display, view.width);
        println!("{}", render::render(&view, &state));
        println!();
    }

    Ok(())
}
