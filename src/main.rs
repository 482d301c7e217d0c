use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use stagekit::replay::Replay;
use stagekit::{init_logging, ViewerConfig, BUILD_DATE, VERSION};

#[derive(Parser, Debug)]
#[command(name = "stagekit", version, about = "Stage viewport tools")]
struct Cli {
    /// Viewer config (TOML or JSON); defaults to the user config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON-lines session script headlessly
    Replay {
        /// Script to read; stdin when omitted
        script: Option<PathBuf>,

        /// Write the final viewport as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ViewerConfig> {
    let config = match path {
        Some(path) => ViewerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ViewerConfig::load_or_default()?,
    };
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    init_logging(config.logging.level, cli.json_logs || config.logging.json)?;
    tracing::debug!("stagekit {} built {}", VERSION, BUILD_DATE);

    match cli.command {
        Command::Replay { script, svg } => {
            let mut replay = Replay::new(config)?;
            match script {
                Some(path) => {
                    let file = File::open(&path)
                        .with_context(|| format!("Failed to open {}", path.display()))?;
                    replay.run(BufReader::new(file))?;
                }
                None => replay.run(io::stdin().lock())?,
            }

            let summary = replay.summary();
            for call in &summary.calls {
                println!("{}", serde_json::json!({"call": call.name, "args": call.args}));
            }
            tracing::info!(
                "Replayed {} steps: {} intents, {} calls",
                summary.steps,
                summary.intents.len(),
                summary.calls.len()
            );

            if let Some(path) = svg {
                std::fs::write(&path, replay.render_svg())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
