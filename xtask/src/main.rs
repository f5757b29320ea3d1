use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use treebucket::{MapConfig, TreeHashMap};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "treebucket workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the criterion benchmarks and summarize them
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
    /// Drive a map through a long random workload, checking it against `BTreeMap`
    Soak {
        /// Number of operations to perform
        #[arg(long, default_value_t = 100_000)]
        ops: u64,

        /// Keys are drawn from `0..key_space`
        #[arg(long, default_value_t = 4_096)]
        key_space: u64,

        /// Seed for the operation stream
        #[arg(long, default_value_t = 0x5eed)]
        seed: u64,

        /// Resize policy as JSON (missing fields use the defaults)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

const BENCHES: &[&str] = &["tree_benchmark", "hash_map_benchmark"];

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
        Commands::Soak {
            ops,
            key_space,
            seed,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => MapConfig::default(),
            };
            let report = soak(ops, key_space.max(1), seed, config)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    for bench in BENCHES {
        println!("\n>>> Running {bench}");
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.arg("bench").arg("--bench").arg(bench);

        // Args for the test runner (Criterion) go after --
        cmd.arg("--");
        if quick {
            cmd.arg("--measurement-time").arg("0.1");
            cmd.arg("--noplot");
            cmd.arg("--sample-size").arg("10");
        }

        let status = cmd.status().with_context(|| format!("Failed to run {bench}"))?;
        if status.success() {
            println!("Finished {bench} in {:.2?}", start.elapsed());
        } else {
            eprintln!("Warning: {bench} failed");
        }
    }

    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let mut results: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    collect_results(criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    use std::io::Write;
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Benchmark Report")?;
    for (group, functions) in &results {
        writeln!(file, "\n## {group}\n")?;
        writeln!(file, "| Function | Ops/s |")?;
        writeln!(file, "|---|---|")?;
        for (function, ops) in functions {
            writeln!(file, "| {function} | {} |", format_ops(*ops))?;
        }
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Walks `target/criterion/<group>/<function>/new/estimates.json`.
fn collect_results(dir: &Path, results: &mut BTreeMap<String, BTreeMap<String, f64>>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results);
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        let Some(baseline_dir) = path.parent() else {
            continue;
        };
        if dir_name(baseline_dir) != Some("new") {
            continue;
        }
        let Some(function_dir) = baseline_dir.parent() else {
            continue;
        };
        let (Some(function), Some(group)) = (
            dir_name(function_dir),
            function_dir.parent().and_then(dir_name),
        ) else {
            continue;
        };
        if function == "report" || group == "report" {
            continue;
        }

        // Throughput is recorded per benchmark, when it was configured.
        let elements = read_json(&baseline_dir.join("benchmark.json"))
            .and_then(|json| json.get("throughput")?.get("Elements")?.as_f64());
        let time_ns = read_json(&path)
            .and_then(|json| json.get("mean")?.get("point_estimate")?.as_f64())
            .unwrap_or(0.0);

        if time_ns > 0.0 {
            let metric = elements.unwrap_or(1.0) * 1e9 / time_ns;
            results
                .entry(group.to_string())
                .or_default()
                .insert(function.to_string(), metric);
        }
    }
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|s| s.to_str())
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

fn load_config(path: &Path) -> Result<MapConfig> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config: MapConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

#[derive(Debug, Default, Serialize)]
struct SoakReport {
    ops: u64,
    seed: u64,
    config: Option<MapConfig>,
    inserts: u64,
    duplicate_inserts: u64,
    deletes: u64,
    missing_deletes: u64,
    finds: u64,
    final_len: usize,
    final_capacity: usize,
    peak_capacity: usize,
    capacity_changes: u64,
    max_bucket_len: usize,
    elapsed_ms: u128,
}

fn soak(ops: u64, key_space: u64, seed: u64, config: MapConfig) -> Result<SoakReport> {
    let mut map = TreeHashMap::with_config(config)?;
    let mut model = HashMap::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = SoakReport {
        ops,
        seed,
        config: Some(config),
        peak_capacity: map.capacity(),
        ..SoakReport::default()
    };

    let start = Instant::now();
    for step in 0..ops {
        let key = rng.gen_range(0..key_space);
        let before = map.capacity();

        match rng.gen_range(0..10u8) {
            0..=4 => {
                report.inserts += 1;
                let value: u64 = rng.gen();
                if model.contains_key(&key) {
                    report.duplicate_inserts += 1;
                    anyhow::ensure!(map.insert(key, value).is_err(), "step {step}: duplicate {key} accepted");
                } else {
                    model.insert(key, value);
                    map.insert(key, value)
                        .with_context(|| format!("step {step}: insert {key}"))?;
                }
            }
            5..=8 => {
                report.deletes += 1;
                match model.remove(&key) {
                    Some(expected) => {
                        let got = map.delete(&key).with_context(|| format!("step {step}: delete {key}"))?;
                        anyhow::ensure!(got == expected, "step {step}: delete {key} returned {got}");
                    }
                    None => {
                        report.missing_deletes += 1;
                        anyhow::ensure!(map.delete(&key).is_err(), "step {step}: phantom {key} deleted");
                    }
                }
            }
            _ => {
                report.finds += 1;
                anyhow::ensure!(
                    map.find(&key).ok() == model.get(&key),
                    "step {step}: find {key} disagrees"
                );
            }
        }

        if map.capacity() != before {
            report.capacity_changes += 1;
            report.peak_capacity = report.peak_capacity.max(map.capacity());
        }
    }
    report.elapsed_ms = start.elapsed().as_millis();

    anyhow::ensure!(map.is_consistent(), "map failed its consistency check");
    anyhow::ensure!(map.len() == model.len(), "length drifted from the model");

    report.final_len = map.len();
    report.final_capacity = map.capacity();
    report.max_bucket_len = map.bucket_lens().into_iter().max().unwrap_or(0);
    Ok(report)
}
