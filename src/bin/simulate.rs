//! Run a predictor over a text trace and write the result counts.
use anyhow::Context;
use bpsim::*;
use bpsim::preset::{ build_predictor, PRESETS };
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to trace file
    trace_path: PathBuf,

    /// Predictor name
    #[arg(short, long, default_value = "alpha21264")]
    predictor: String,

    /// Path to the results file
    #[arg(short, long, default_value = "result.out")]
    output_path: PathBuf,

    /// List this many of the worst-predicted branches
    #[arg(short, long)]
    list: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    let predictor = build_predictor(&args.predictor)
        .with_context(|| format!("available predictors: {}", PRESETS.join(", ")))?;
    let records = read_trace(&args.trace_path)
        .with_context(|| format!("reading {}", args.trace_path.display()))?;
    println!("[*] Loaded {} records from {}",
        records.len(), args.trace_path.display());

    let storage_bits = predictor.storage_bits();
    println!("[*] {} storage bits: {}b, {:.2}KiB",
        predictor.name(), storage_bits, storage_bits as f64 / 1024.0 / 8.0);

    let mut sim = Simulator::new(predictor);
    sim.run(records.iter());

    let stats = sim.stats();
    println!("[*] Global hit rate: {}/{} ({:.2}% correct) ({} misses)",
        stats.hits(), stats.total(), stats.hit_rate() * 100.0, stats.misses());
    println!("[*] Unique branches: {}",
        sim.branch_stats().num_unique_branches());

    let file = File::create(&args.output_path)
        .with_context(|| format!("creating {}", args.output_path.display()))?;
    write_results(BufWriter::new(file), stats)?;

    if let Some(n) = args.list {
        println!("[*] Low hit rate branches:");
        for (pc, s) in sim.branch_stats().get_low_rate_branches(n) {
            println!("    {:016x}: {:6}/{:6} ({:.4}) {:b}",
                pc, s.hits, s.occ, s.hit_rate(), s.pat);
        }
    }
    Ok(())
}
