use std::path::PathBuf;

use anyhow::Context as _;
use brawlnet_training::{
    session::{Mode, Session},
    stats::FitnessStats,
};

use crate::util;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Champion model to evaluate
    #[arg(long)]
    model: PathBuf,
    /// Session config file (JSON); defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of rounds to play
    #[arg(long, default_value_t = 10)]
    rounds: usize,
    /// Session seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        model,
        config,
        rounds,
        seed,
    } = arg;

    let config = util::read_config_file(config.as_deref())?;
    let round_time_limit = config.scheduler.round_time_limit;
    let seed = util::session_seed(*seed);
    let champion = util::read_champion_file(model)?;
    let mut session = Session::new(config, Mode::Evaluation, seed)
        .context("Failed to set up the evaluation session")?;
    session
        .restore_champion(champion.network, champion.fitness, champion.generation)
        .with_context(|| format!("Champion model does not fit: {}", model.display()))?;

    eprintln!(
        "Evaluating {} (generation {}, fitness {:.3}) over {rounds} rounds (seed {seed})",
        champion.name, champion.generation, champion.fitness
    );

    let mut reports = vec![];
    while reports.len() < *rounds {
        reports.extend(session.run_ticks(round_time_limit.max(1)));
    }
    reports.truncate(*rounds);

    for report in &reports {
        let Some(stats) = &report.fitness else {
            continue;
        };
        eprintln!(
            "Round #{:<3} {} after {} ticks: min {:.3} / mean {:.3} / max {:.3}",
            report.round, report.end.reason, report.end.elapsed, stats.min, stats.mean, stats.max
        );
    }

    let means = FitnessStats::new(reports.iter().filter_map(|r| r.fitness.map(|s| s.mean)));
    let maxima = FitnessStats::new(reports.iter().filter_map(|r| r.fitness.map(|s| s.max)));
    let durations = FitnessStats::new(reports.iter().map(|r| {
        #[expect(clippy::cast_precision_loss)]
        let elapsed = r.end.elapsed as f32;
        elapsed
    }));

    eprintln!();
    eprintln!("Summary:");
    if let Some(stats) = means {
        eprintln!(
            "  Mean fitness:  {:.3} (std dev {:.3}, median {:.3})",
            stats.mean, stats.std_dev, stats.median
        );
    }
    if let Some(stats) = maxima {
        eprintln!(
            "  Best fitness:  {:.3} (worst round {:.3})",
            stats.max, stats.min
        );
    }
    if let Some(stats) = durations {
        eprintln!(
            "  Round length:  {:.1} ticks (min {:.0} / max {:.0})",
            stats.mean, stats.min, stats.max
        );
    }

    Ok(())
}
