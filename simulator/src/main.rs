use anyhow::Context;
use chrono::{Local, Utc};
use clap::Parser;
use feed_bridge::bridge::{fixture_bind_address, FeedBridge};
use feed_bridge::model::FixtureModel;
use generator::catalog::generate_catalog;
use quakecore::encoding::EventDetail;
use quakecore::feed::USGS_QUERY_ENDPOINT;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{Runner, WorkflowResult};

mod feed_bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless driver and fixture feed for the earthquake visualizer")]
struct Args {
    /// Run a single fetch against the feed and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value = USGS_QUERY_ENDPOINT)]
    feed_url: String,
    #[arg(long, default_value_t = 4.5)]
    min_magnitude: f64,
    /// Lookback window in days (1, 7 or 30)
    #[arg(long, default_value_t = 7)]
    days: u32,
    /// Serve a synthetic catalog on the FDSN query path until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    #[arg(long, default_value_t = 200)]
    count: usize,
    /// Make the fixture feed answer every query with this HTTP status
    #[arg(long)]
    fail_status: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        let mut config =
            WorkflowConfig::from_args(args.feed_url.clone(), args.min_magnitude, args.days)?;
        config.fixture.seed = args.seed;
        config.fixture.count = args.count;
        config
    };

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;
    runtime.block_on(run(&args, workflow_config))
}

async fn run(args: &Args, workflow_config: WorkflowConfig) -> anyhow::Result<()> {
    let bridge = if args.serve {
        let catalog = generate_catalog(&workflow_config.fixture, Utc::now())?;
        let bridge =
            FeedBridge::bind(FixtureModel::new(catalog), fixture_bind_address(args.port)).await?;
        bridge.set_fail_status(args.fail_status)?;
        bridge.publish_status(&format!("serving {} (Ctrl+C to stop)", bridge.query_url()));
        Some(bridge)
    } else {
        None
    };

    if args.offline {
        let result = Runner::new(workflow_config.clone()).execute().await?;
        print_summary(&result);
        append_report(&result)?;
    }

    if bridge.is_some() {
        signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
    } else if !args.offline {
        log::info!("nothing to do; pass --offline and/or --serve");
    }

    Ok(())
}

fn print_summary(result: &WorkflowResult) {
    println!(
        "Offline run ({}) -> {} earthquakes, {} tsunami-flagged",
        result.filters, result.record_count, result.tsunami_flagged
    );
    for (tier, count) in &result.tier_counts {
        println!("  {:<18} {}", tier.label(), count);
    }
    if let Some(record) = &result.strongest {
        let detail = EventDetail::new(record, &Local);
        println!(
            "Strongest: {} at {} ({}, depth {})",
            detail.headline, detail.time, detail.coordinates, detail.depth
        );
    }
    if let Some(view) = &result.viewport {
        println!(
            "Viewport: lat {:.1}..{:.1}, lon {:.1}..{:.1}",
            view.south, view.north, view.west, view.east
        );
    }
}

fn append_report(result: &WorkflowResult) -> anyhow::Result<()> {
    let tiers: Vec<String> = result
        .tier_counts
        .iter()
        .map(|(tier, count)| format!("{tier:?}={count}"))
        .collect();
    let report = format!(
        "at={} filters=\"{}\" records={} tsunami={} tiers=[{}] metrics={:?}\n",
        Utc::now().to_rfc3339(),
        result.filters,
        result.record_count,
        result.tsunami_flagged,
        tiers.join(","),
        result.metrics
    );
    let report_path = PathBuf::from("tools/data/offline_quakes.log");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&report_path)
        .with_context(|| format!("opening {}", report_path.display()))?;
    file.write_all(report.as_bytes())?;
    Ok(())
}
