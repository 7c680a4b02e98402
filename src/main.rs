use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use setvision_cv::detection::{summarize, PipelineConfig};
use std::path::PathBuf;

mod solver;

#[derive(Parser)]
#[command(name = "setvision", about = "Find every valid SET on a board")]
struct Cli {
    /// Log per-stage details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a JSON list of cards
    Solve {
        /// JSON array of {count, color, fill, shape, box}
        cards: PathBuf,
        /// Board photo the card boxes refer to
        #[arg(long)]
        image: Option<PathBuf>,
        /// Where to write the annotated photo
        #[arg(long, requires = "image")]
        output: Option<PathBuf>,
        /// Pipeline configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,
        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the default pipeline configuration as JSON
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Solve {
            cards,
            image,
            output,
            config,
            json,
        } => {
            let config = match config {
                Some(path) => PipelineConfig::from_json_file(path)?,
                None => PipelineConfig::default(),
            };

            let solved = solver::solve_cards(&cards)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&solved.report())?);
            } else {
                println!("{}", summarize(&solved.search.sets));
            }

            match (image, output) {
                (Some(image), Some(output)) => solver::annotate(&solved, &image, &output, &config)?,
                (Some(_), None) => bail!("--image needs --output to know where to save the annotated board"),
                _ => {}
            }
        }
        Command::Config => {
            println!("{}", PipelineConfig::default().to_json()?);
        }
    }

    Ok(())
}
