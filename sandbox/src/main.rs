// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Result;
use clap::Parser;
use ferrum_sdk::prelude::*;
use ferrum_sdk::{export_transitions, load_config};
use std::path::PathBuf;

/// Runs the steel-plant control loop and reports holder behaviour.
#[derive(Debug, Parser)]
#[command(name = "sandbox", version, about)]
struct Args {
    /// Number of one-minute ticks to simulate.
    #[arg(long, default_value_t = 100)]
    steps: usize,

    /// TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the recorded transitions to this JSON file.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Override the seed of the simplified furnace dynamics.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.orchestrator.seed = seed;
    }

    let output = run_simulation(&config, args.steps)?;

    let history = &output.history;
    if let (Some(min), Some(max)) = (
        history.soc_bfg.iter().copied().reduce(f64::min),
        history.soc_bfg.iter().copied().reduce(f64::max),
    ) {
        log::info!("BFG SOC range over the run: {:.3} .. {:.3}", min, max);
    }
    for line in output.transitions.summary().lines() {
        log::info!("{}", line);
    }

    if let Some(path) = args.export {
        export_transitions(&output.transitions, &path)?;
    }
    Ok(())
}
