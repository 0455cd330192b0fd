use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Subcommand, Debug, Serialize, Clone)]
pub enum Command {
    /// Generate an address list, build its tree and write the proof bundle
    BuildTree {
        #[arg(long, default_value = "proofx-bundle.json")]
        bundle_out: String,
    },
    /// Check the root and every proof of a bundle
    VerifyBundle {
        #[arg(long, default_value = "proofx-bundle.json")]
        bundle: String,
    },
    /// Drive an in-memory registry through publish, prove, edit and remove
    SimulateRegistry,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::BuildTree { .. } => "build-tree",
            Command::VerifyBundle { .. } => "verify-bundle",
            Command::SimulateRegistry => "simulate-registry",
        }
    }
}

#[derive(Parser, Debug, Serialize, Clone)]
pub struct BenchmarkCli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Number of generated addresses
    #[arg(long, default_value_t = 1024)]
    pub count: usize,

    /// Seed of the address generator
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Output filename for metrics
    #[arg(long, default_value = "")]
    pub output: String,
}

impl BenchmarkCli {
    pub fn metrics_filename(&self, cmd: &str) -> String {
        if self.output.is_empty() {
            format!("proofx-metrics/{}.json", cmd)
        } else {
            self.output.clone()
        }
    }
}
