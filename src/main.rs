use anyhow::{Context, Result};
use caro_core::engine::config::EngineConfig;
use caro_core::engine::search::AlphaBetaEngine;
use caro_core::protocol::{handle_request, BudgetKind, MoveRequest};
use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "caro")]
#[command(about = "Picks a Caro move for a JSON request and prints the JSON response")]
struct Args {
    /// Request file; read from stdin when omitted
    request: Option<PathBuf>,

    /// Search to this depth, overriding the request budget
    #[arg(short, long, conflicts_with = "time")]
    depth: Option<u8>,

    /// Time budget in milliseconds, overriding the request budget
    #[arg(short, long)]
    time: Option<u64>,

    /// Engine config JSON (pattern weights are multipliers of the defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Indent the response JSON
    #[arg(long)]
    pretty: bool,
}

fn read_text(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read request from stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut request: MoveRequest =
        serde_json::from_str(&read_text(args.request.as_deref())?).context("malformed request JSON")?;

    if let Some(depth) = args.depth {
        request.budget = u64::from(depth);
        request.budget_kind = BudgetKind::Depth;
    }
    if let Some(ms) = args.time {
        request.budget = ms;
        request.budget_kind = BudgetKind::Time;
    }
    if let Some(path) = args.config.as_deref() {
        let text = read_text(Some(path))?;
        let config = EngineConfig::load_from_json(&text)
            .with_context(|| format!("invalid engine config in {}", path.display()))?;
        request.config = Some(config);
    }

    let mut engine = AlphaBetaEngine::new(Arc::new(EngineConfig::default()));
    let response = handle_request(&mut engine, &request).context("request rejected")?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");
    Ok(())
}
