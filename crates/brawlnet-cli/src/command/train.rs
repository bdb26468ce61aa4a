use std::path::PathBuf;

use anyhow::Context as _;
use brawlnet_training::session::{Mode, RoundOutcome, RoundReport, Session};
use chrono::Utc;

use crate::{schema::champion::ChampionModel, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Session config file (JSON); defaults are used for missing fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of generations to evolve
    #[arg(long, default_value_t = 50)]
    generations: u32,
    /// Session seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Ticks simulated between progress reports
    #[arg(long, default_value_t = 600)]
    ticks_per_callback: u32,
    /// Champion model to continue training from
    #[arg(long)]
    resume: Option<PathBuf>,
    /// Number of earlier champions to keep
    #[arg(long)]
    history: Option<usize>,
    /// Name stored in the champion model
    #[arg(long, default_value = "champion")]
    name: String,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        config,
        generations,
        seed,
        ticks_per_callback,
        resume,
        history,
        name,
        output,
    } = arg;

    let config = util::read_config_file(config.as_deref())?;
    let seed = util::session_seed(*seed);
    let mut session = Session::new(config, Mode::Training, seed)
        .context("Failed to set up the training session")?;
    if let Some(path) = resume {
        let model = util::read_champion_file(path)?;
        match session.restore_champion(model.network, model.fitness, model.generation) {
            Ok(()) => eprintln!(
                "Resuming from {} (generation {}, fitness {:.3})",
                path.display(),
                model.generation,
                model.fitness
            ),
            Err(error) => {
                tracing::warn!(%error, path = %path.display(), "ignoring unusable champion model");
            }
        }
    }
    if let Some(entries) = history {
        session.retain_history(*entries);
    }

    let target = session.generation().saturating_add(*generations);
    eprintln!(
        "Training generations {}..{target} (seed {seed}, topology {})",
        session.generation(),
        session.evolution().topology()
    );
    'training: while session.generation() < target {
        for _ in 0..(*ticks_per_callback).max(1) {
            if let Some(report) = session.tick(None) {
                print_report(&report);
                if session.generation() >= target {
                    break 'training;
                }
            }
        }
        tracing::debug!(
            generation = session.generation(),
            elapsed = session.elapsed_ticks(),
            alive_ai = session.alive_ai(),
            "progress"
        );
    }

    let champion = session
        .evolution()
        .champion()
        .context("Training finished without a champion")?;
    let model = ChampionModel::from_champion(name, Utc::now(), champion);
    util::save_champion_file(&model, output.as_deref())?;

    eprintln!();
    eprintln!("Model saved successfully");
    if let Some(path) = &output {
        eprintln!("  Path: {}", path.display());
    }
    eprintln!("  Name: {}", model.name);
    eprintln!("  Trained at: {}", model.trained_at);
    eprintln!("  Generation: {}", model.generation);
    eprintln!("  Fitness: {:.3}", model.fitness);
    eprintln!("  Topology: {}", model.network.topology);

    Ok(())
}

fn print_report(report: &RoundReport) {
    let RoundOutcome::Generation(generation) = &report.outcome else {
        return;
    };
    eprintln!(
        "Generation #{} ({} after {} ticks):",
        generation.generation, report.end.reason, report.end.elapsed
    );
    match generation.champion_fitness {
        Some(fitness) => eprintln!("  Champion: {fitness:.3}"),
        None => eprintln!("  Champion: none (no contenders)"),
    }
    if let Some(best) = generation.best_fitness {
        eprintln!("  Best:     {best:.3}");
    }
    if let Some(stats) = &generation.fitness {
        eprintln!(
            "  Fitness:  min {:.3} / mean {:.3} / max {:.3}",
            stats.min, stats.mean, stats.max
        );
    }
}
