use clap::Parser;
use runoff_lib::model::config::SimConfig;
use runoff_lib::model::persistence::load_snapshot;
use runoff_lib::model::sim::PhosphorusSim;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "save.json")]
    input: String,

    /// Also replay this many ticks twice and compare the results
    #[arg(long, default_value_t = 0)]
    replay: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Verifying runoff snapshot {}...", args.input);

    let snapshot = load_snapshot(&args.input)?;
    println!(
        "{}x{} tiles, tick {}, {} units of phosphorus",
        snapshot.width,
        snapshot.height,
        snapshot.tick,
        snapshot.total_phosphorus()
    );

    let mut config = SimConfig::default();
    config.world.deterministic = true;
    config.log_interval = 0;

    let sim = PhosphorusSim::from_snapshot(&snapshot, config.clone())?;
    let current_hash = sim.deterministic_hash();
    println!("Recomputed Hash: {}", current_hash);

    if current_hash != snapshot.state_hash {
        println!("\n❌ VERIFICATION FAILED!");
        println!("Stored hash {} does not match the snapshot contents.", snapshot.state_hash);
        anyhow::bail!("snapshot hash mismatch");
    }
    println!("\n✅ Stored hash matches.");

    if args.replay > 0 {
        let mut first = PhosphorusSim::from_snapshot(&snapshot, config.clone())?;
        let mut second = PhosphorusSim::from_snapshot(&snapshot, config)?;
        first.run(args.replay);
        second.run(args.replay);
        let (a, b) = (first.deterministic_hash(), second.deterministic_hash());
        if a != b {
            println!("❌ Replay diverged after {} ticks: {} vs {}", args.replay, a, b);
            anyhow::bail!("replay is not deterministic");
        }
        println!("✅ Replay of {} ticks is reproducible ({}).", args.replay, a);
    }

    Ok(())
}
