// Operator and benchmark tool for proofx.
// 3 sub-commands
// - build-tree: generate --count addresses, build the tree, write the proof bundle
// - verify-bundle: re-check a bundle's root and every proof in it
// - simulate-registry: publish/prove/edit/remove against an in-memory registry
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context};
use bench_proofx::common::{cli, scenario, utils};
use chrono::Utc;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use proofx::merkletree::helpers::address_list;
use proofx::{verify, TreeBundle};
use proofx_registry::RegistryConfig;
use revm::primitives::Address;
use serde_json::json;

#[cfg(target_os = "linux")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn build_tree(args: &cli::BenchmarkCli, bundle_out: &str) -> anyhow::Result<serde_json::Value> {
    let addresses = address_list(args.count, args.seed);
    info!("Generated {} addresses (seed {})", addresses.len(), args.seed);

    let start = Instant::now();
    let bundle = TreeBundle::build(&addresses)?;
    let duration = start.elapsed();
    info!(
        "Built tree and {} proofs in {:.1?}: root {}",
        bundle.proofs.len(),
        duration,
        bundle.merkle_root
    );
    metrics::gauge!("bench-proofx.build.duration_s").set(duration.as_secs_f64());
    metrics::gauge!("bench-proofx.build.leaf_count").set(addresses.len() as f64);

    bundle
        .write_to(Path::new(bundle_out))
        .with_context(|| format!("writing {}", bundle_out))?;
    info!("Wrote bundle to {}", bundle_out);
    Ok(json!({ "merkle_root": bundle.merkle_root, "bundle": bundle_out }))
}

fn verify_bundle(bundle_path: &str) -> anyhow::Result<serde_json::Value> {
    let bundle = TreeBundle::read_from(Path::new(bundle_path))
        .with_context(|| format!("reading {}", bundle_path))?;
    bundle.check_root()?;
    info!(
        "Bundle root {} matches its {} addresses",
        bundle.merkle_root,
        bundle.addresses.len()
    );

    let pb = ProgressBar::new(bundle.proofs.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} proofs ({eta})")?.progress_chars("=> "),
    );
    let start = Instant::now();
    let mut failed = Vec::new();
    for p in &bundle.proofs {
        let t = Instant::now();
        if !verify(&bundle.merkle_root, &p.proof, &p.address)? {
            warn!("Proof for {} does not verify", p.address);
            failed.push(p.address.clone());
        }
        metrics::histogram!("bench-proofx.verify.latency_us")
            .record(t.elapsed().as_micros() as f64);
        pb.inc(1);
    }
    pb.finish_and_clear();
    let duration = start.elapsed();
    info!("Verified {} proofs in {:.1?}", bundle.proofs.len(), duration);
    metrics::gauge!("bench-proofx.verify.duration_s").set(duration.as_secs_f64());
    metrics::counter!("bench-proofx.verify.failed").increment(failed.len() as u64);

    if !failed.is_empty() {
        bail!("{} of {} proofs failed", failed.len(), bundle.proofs.len());
    }
    Ok(json!({ "merkle_root": bundle.merkle_root, "verified": bundle.proofs.len() }))
}

fn simulate_registry(args: &cli::BenchmarkCli) -> anyhow::Result<serde_json::Value> {
    let owner = Address::repeat_byte(0x01);
    let config = RegistryConfig::from_env(owner)?;
    info!(
        "Registry owner {} treasury {} platform fee {} wei",
        config.owner, config.treasury, config.platform_fee
    );
    let addresses = address_list(args.count, args.seed);
    let report = scenario::run_registry_scenario(&addresses, args.seed, &config)?;
    info!("Scenario finished at ledger height {}", report.ledger_height);
    Ok(serde_json::to_value(&report)?)
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    utils::init_logging("info");
    let run_start_ts = Utc::now();
    let metrics_recorder = utils::MetricsRecorder::install()?;
    let args = cli::BenchmarkCli::parse();

    let Some(command) = args.command.clone() else {
        bail!("No command provided: valid commands are build-tree, verify-bundle, simulate-registry. Use --help to see all options.");
    };
    let result = match &command {
        cli::Command::BuildTree { bundle_out } => build_tree(&args, bundle_out)?,
        cli::Command::VerifyBundle { bundle } => verify_bundle(bundle)?,
        cli::Command::SimulateRegistry => simulate_registry(&args)?,
    };

    let cmd = command.name();
    let metrics_filename = args.metrics_filename(cmd);
    let run_end_ts = Utc::now();
    let duration_secs = (run_end_ts - run_start_ts).num_milliseconds() as f64 / 1000.0;

    let output_json = json!({
        "cli": &args,
        "command": std::env::args().collect::<Vec<_>>().join(" "),
        "timestamps": {
            "start": run_start_ts.to_rfc3339(),
            "end": run_end_ts.to_rfc3339(),
            "duration_seconds": duration_secs
        },
        "result": result,
        "metrics": metrics_recorder.snapshot_metrics()
    });

    info!("Dumping metrics to {}", metrics_filename);
    utils::write_json(&metrics_filename, &output_json)?;
    Ok(())
}
