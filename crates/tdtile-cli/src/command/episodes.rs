use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use tdtile_engine::IllegalActionError;
use tdtile_training::{agent::Agent, session};

use crate::{schema::run_summary::RunSummary, util::Output};

/// Defaults put in front of `--play`.
pub(crate) const PLAYER_DEFAULTS: &str = "name=player";
/// Defaults put in front of `--evil`.
pub(crate) const ENVIRONMENT_DEFAULTS: &str = "name=rndenv";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EpisodesArg {
    /// Number of episodes to play
    #[arg(long, default_value_t = 1000)]
    total: usize,
    /// Number of episodes summarized per log block
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    block: u64,
    /// Player configuration, e.g. "alpha=0.001 load=w.bin save=w.bin"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    play: String,
    /// Environment configuration, e.g. "seed=42"
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    evil: String,
    /// Summary output file path (stdout if omitted)
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub(crate) fn run(arg: &EpisodesArg, learning: bool) -> anyhow::Result<()> {
    let EpisodesArg {
        total,
        block,
        play,
        evil,
        summary,
    } = arg;
    let block = usize::try_from(*block).context("Block size does not fit in memory")?;

    let mut player = Agent::from_args(PLAYER_DEFAULTS, play)
        .with_context(|| format!("Failed to set up player from `{play}`"))?;
    let mut environment = Agent::from_args(ENVIRONMENT_DEFAULTS, evil)
        .with_context(|| format!("Failed to set up environment from `{evil}`"))?;
    if let Some(player) = player.as_player_mut() {
        player.set_learning(learning);
    }

    let started_at = Utc::now();
    tracing::info!(total, block, learning, "starting episodes");
    let played = session::play_episodes(&mut player, &mut environment, *total, block);
    let finished_at = Utc::now();
    let blocks = finish(played, player, environment)?;

    let report = RunSummary {
        mode: if learning { "train" } else { "evaluate" }.to_owned(),
        started_at,
        finished_at,
        total: *total,
        block,
        play: play.clone(),
        evil: evil.clone(),
        blocks,
    };
    Output::save_json(&report, summary.clone())?;
    if let Some(path) = summary {
        tracing::info!(path = %path.display(), "summary saved");
    }

    Ok(())
}

/// Finalizes both agents, then returns the outcome of the episodes.
///
/// The agents are finalized even if an episode failed, so a configured weight file is written
/// on every exit path.
fn finish<T>(
    played: Result<T, IllegalActionError>,
    player: Agent,
    environment: Agent,
) -> anyhow::Result<T> {
    let player_finalized = player.finalize().context("Failed to finalize player");
    let environment_finalized = environment
        .finalize()
        .context("Failed to finalize environment");
    let value = played.context("Episode aborted by an illegal action")?;
    player_finalized?;
    environment_finalized?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tdtile_engine::CellOccupiedError;

    use super::*;

    fn arg(total: usize, play: &str, summary: PathBuf) -> EpisodesArg {
        EpisodesArg {
            total,
            block: 2,
            play: play.to_owned(),
            evil: "seed=9".to_owned(),
            summary: Some(summary),
        }
    }

    fn read_summary(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_train_writes_summary_and_weights() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.json");
        let weights = dir.path().join("weights.bin");
        let play = format!("ranks=3 alpha=0.01 save={}", weights.display());

        run(&arg(3, &play, summary.clone()), true).unwrap();

        let json = read_summary(&summary);
        assert_eq!(json["mode"], "train");
        assert_eq!(json["total"], 3);
        assert_eq!(json["blocks"].as_array().unwrap().len(), 2);
        assert_eq!(json["blocks"][1]["last_episode"], 3);
        assert!(json["started_at"].is_string());
        assert!(weights.exists());
    }

    #[test]
    fn test_evaluate_does_not_learn() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("summary.json");
        let weights = dir.path().join("weights.bin");
        let play = format!("ranks=3 alpha=0.5 save={}", weights.display());

        run(&arg(2, &play, summary.clone()), false).unwrap();

        assert_eq!(read_summary(&summary)["mode"], "evaluate");
        let loaded = Agent::from_args(PLAYER_DEFAULTS, &format!("load={}", weights.display()))
            .unwrap();
        let network = loaded.as_player().unwrap().network();
        assert!(network.weights().tables().flatten().all(|w| *w == 0.0));
    }

    #[test]
    fn test_bad_player_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&arg(1, "alpha", dir.path().join("s.json")), true).unwrap_err();
        assert!(err.to_string().contains("Failed to set up player"), "{err:#}");
    }

    #[test]
    fn test_failed_episode_still_saves_weights() {
        let dir = tempfile::tempdir().unwrap();
        let weights = dir.path().join("weights.bin");
        let play = format!("ranks=3 save={}", weights.display());
        let player = Agent::from_args(PLAYER_DEFAULTS, &play).unwrap();
        let environment = Agent::from_args(ENVIRONMENT_DEFAULTS, "seed=1").unwrap();

        let played: Result<(), _> =
            Err(IllegalActionError::from(CellOccupiedError { position: 5 }));
        let err = finish(played, player, environment).unwrap_err();

        assert!(err.to_string().contains("Episode aborted"), "{err:#}");
        assert!(format!("{err:#}").contains("cell 5 is already occupied"), "{err:#}");
        let loaded = Agent::from_args(PLAYER_DEFAULTS, &format!("load={}", weights.display()))
            .unwrap();
        assert_eq!(loaded.as_player().unwrap().network().rank_cap(), 3);
    }

    #[test]
    fn test_finish_returns_episode_outcome() {
        let player = Agent::from_args(PLAYER_DEFAULTS, "ranks=2").unwrap();
        let environment = Agent::from_args(ENVIRONMENT_DEFAULTS, "").unwrap();
        assert_eq!(finish(Ok(7), player, environment).unwrap(), 7);
    }
}
