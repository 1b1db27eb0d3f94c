use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use runoff_core::init_logging;
use runoff_lib::model::persistence::SaveFormat;
use runoff_lib::{report, App};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Override the world seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Resume from a saved snapshot
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a snapshot when the run ends
    #[arg(long)]
    save: Option<PathBuf>,

    /// Snapshot format (defaults to the --save extension)
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// Print a density map of the final state
    #[arg(long)]
    map: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Format {
    Json,
    JsonGz,
    Rkyv,
}

impl From<Format> for SaveFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => SaveFormat::Json,
            Format::JsonGz => SaveFormat::JsonGz,
            Format::Rkyv => SaveFormat::Rkyv,
        }
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = App::load_config(&args.config);
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    let mut app = App::new(config, args.load.as_deref())?;
    let summary = app.run(args.ticks);

    if args.map {
        print!("{}", report::density_map(app.sim.grid(), app.sim.counts()));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "tick {} | total {} | moved {} | decayed {} | clipped {} | injected {} | sinks {}",
            summary.final_tick,
            summary.total_phosphorus,
            summary.moved,
            summary.decayed,
            summary.saturated,
            summary.injected,
            summary.sinks
        );
        println!("state hash {}", summary.state_hash);
    }

    if let Some(path) = &args.save {
        app.save(path, args.format.map(SaveFormat::from))?;
    }

    Ok(())
}
