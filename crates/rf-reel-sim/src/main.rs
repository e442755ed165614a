//! Headless reel simulator
//!
//! Usage:
//!   rf-reel-sim --spins 1000 --seed 42
//!   rf-reel-sim --config game.yaml --timing turbo --sessions 8 --auto-recharge
//!   rf-reel-sim --spins 5 --seed 1 --trace trace.json

mod session;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use rf_reel_lab::{SlotConfig, SpinTiming, TimingProfile};

use session::{SessionOptions, SessionReport, merge_stats, run_batch};

#[derive(Parser)]
#[command(name = "rf-reel-sim", about = "Run reel sessions on a fixed 60 Hz clock")]
struct Cli {
    /// Spins per session
    #[arg(short = 'n', long, default_value_t = 100)]
    spins: u64,

    /// Independent sessions, run in parallel
    #[arg(long, default_value_t = 1)]
    sessions: usize,

    /// RNG seed (session i uses seed + i)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Game config (.json, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Timing preset, overrides the config file
    #[arg(short, long, value_enum)]
    timing: Option<TimingArg>,

    /// Multiply every timing duration
    #[arg(long)]
    time_scale: Option<f64>,

    /// Recharge when credit runs out instead of ending the session
    #[arg(long)]
    auto_recharge: bool,

    /// Write per-spin stage traces (JSON) to this file
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TimingArg {
    Normal,
    Turbo,
    Studio,
}

impl From<TimingArg> for TimingProfile {
    fn from(arg: TimingArg) -> Self {
        match arg {
            TimingArg::Normal => TimingProfile::Normal,
            TimingArg::Turbo => TimingProfile::Turbo,
            TimingArg::Studio => TimingProfile::Studio,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.sessions == 0 {
        bail!("--sessions must be at least 1");
    }

    let config = build_config(&cli)?;
    let options = SessionOptions {
        spins: cli.spins,
        auto_recharge: cli.auto_recharge,
        record_traces: cli.trace.is_some(),
    };

    log::info!(
        "Running {} session(s) x {} spins of '{}'",
        cli.sessions,
        cli.spins,
        config.game_id
    );
    let reports = run_batch(&config, cli.sessions, &options)?;

    if let Some(path) = &cli.trace {
        write_traces(path, &reports)?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&strip_traces(reports))
            .context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print_summary(&reports);
    }

    Ok(())
}

fn build_config(cli: &Cli) -> Result<SlotConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SlotConfig::default(),
    };

    if let Some(timing) = cli.timing {
        config.timing = SpinTiming::from_profile(timing.into());
    }
    if let Some(factor) = cli.time_scale {
        config.timing = config.timing.scaled(factor);
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_config(path: &Path) -> Result<SlotConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let config = if is_yaml {
        SlotConfig::from_yaml(&text)
    } else {
        SlotConfig::from_json(&text)
    };
    config.with_context(|| format!("Failed to load config {}", path.display()))
}

fn write_traces(path: &Path, reports: &[SessionReport]) -> Result<()> {
    let traces: Vec<_> = reports.iter().flat_map(|r| r.traces.iter()).collect();
    let json = serde_json::to_string_pretty(&traces).context("Failed to serialize traces")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {} trace(s) to {}", traces.len(), path.display());
    Ok(())
}

fn strip_traces(mut reports: Vec<SessionReport>) -> Vec<SessionReport> {
    for report in &mut reports {
        report.traces.clear();
    }
    reports
}

fn print_summary(reports: &[SessionReport]) {
    for report in reports {
        println!(
            "Session {:>3}  spins {:>6}  balance {:>6}  hit {:>5.1}%  rtp {:>6.1}%{}",
            report.session_index,
            report.spins_completed,
            report.final_balance,
            report.stats.hit_rate(),
            report.stats.rtp(),
            if report.stopped_early { "  (out of credit)" } else { "" }
        );
    }

    let total = merge_stats(reports.iter().map(|r| &r.stats));
    let sim_seconds: f64 = reports.iter().map(|r| r.elapsed_ms).sum::<f64>() / 1000.0;
    println!();
    println!("Total spins:   {}", total.total_spins);
    println!("Wins:          {} ({} big)", total.wins, total.big_wins);
    println!("Losses:        {}", total.losses);
    println!("Staked / paid: {} / {}", total.total_staked, total.total_paid);
    println!("Hit rate:      {:.2}%", total.hit_rate());
    println!("RTP:           {:.2}%", total.rtp());
    println!("Max payout:    {}", total.max_payout);
    println!("Rejected:      {}  recharges: {}", total.rejected, total.recharges);
    println!("Simulated:     {:.1}s of play", sim_seconds);
}
