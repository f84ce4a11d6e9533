//! Bot-only Avalon match simulator.
//!
//! Plays many all-bot matches concurrently and reports how often each side
//! wins and how the matches ended.

mod config;

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Error;
use avalon::{
    GameSettings, Match, MatchError, Phase, Team,
    bot::BotManager,
    constants::{MAX_REJECTIONS, MISSIONS_TO_WIN},
    entities::MissionOutcome,
    registry::BotDifficulty,
};
use config::SimConfig;
use ctrlc::set_handler;
use log::{info, warn};
use pico_args::Arguments;
use serde::Serialize;
use tokio::{sync::Semaphore, task::JoinSet};

const HELP: &str = "\
Play all-bot Avalon matches and report win rates

USAGE:
  av_bots [OPTIONS]

OPTIONS:
  --players    N           Participants per match (5-10)  [default: env AV_BOTS_PLAYERS or 7]
  --matches    N           Matches to play                [default: env AV_BOTS_MATCHES or 100]
  --difficulty LEVEL       easy | standard                [default: env AV_BOTS_DIFFICULTY or standard]
  --parallel   N           Matches in flight at once      [default: 8]

FLAGS:
  --json                   Print the summary as JSON
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter (e.g., debug)
";

/// How a finished match was decided.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Ending {
    Sabotage,
    Rejections,
    MerlinAssassinated,
    MerlinSurvived,
}

#[derive(Debug, Serialize)]
struct MatchReport {
    winner: Team,
    ending: Ending,
    rounds: usize,
    bot_operations: usize,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    players: usize,
    difficulty: String,
    played: usize,
    good_wins: usize,
    evil_wins: usize,
    by_sabotage: usize,
    by_rejections: usize,
    merlin_assassinated: usize,
    merlin_survived: usize,
    average_rounds: f64,
}

impl Summary {
    fn new(config: &SimConfig, reports: &[MatchReport]) -> Self {
        let mut summary = Self {
            players: config.players,
            difficulty: config.difficulty.to_string(),
            played: reports.len(),
            ..Default::default()
        };
        let mut rounds = 0;
        for report in reports {
            match report.winner {
                Team::Good => summary.good_wins += 1,
                Team::Evil => summary.evil_wins += 1,
            }
            match report.ending {
                Ending::Sabotage => summary.by_sabotage += 1,
                Ending::Rejections => summary.by_rejections += 1,
                Ending::MerlinAssassinated => summary.merlin_assassinated += 1,
                Ending::MerlinSurvived => summary.merlin_survived += 1,
            }
            rounds += report.rounds;
        }
        if !reports.is_empty() {
            summary.average_rounds = rounds as f64 / reports.len() as f64;
        }
        summary
    }

    fn rate(&self, count: usize) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.played as f64
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} matches, {} players, {} bots",
            self.played, self.players, self.difficulty
        )?;
        writeln!(
            f,
            "  good wins: {:>5} ({:.1}%)",
            self.good_wins,
            self.rate(self.good_wins)
        )?;
        writeln!(f, "    merlin survived:     {}", self.merlin_survived)?;
        writeln!(
            f,
            "  evil wins: {:>5} ({:.1}%)",
            self.evil_wins,
            self.rate(self.evil_wins)
        )?;
        writeln!(f, "    by sabotage:         {}", self.by_sabotage)?;
        writeln!(f, "    by rejections:       {}", self.by_rejections)?;
        writeln!(f, "    merlin assassinated: {}", self.merlin_assassinated)?;
        write!(f, "  average rounds: {:.2}", self.average_rounds)
    }
}

/// Plays one all-bot match to the end.
fn play_match(players: usize, difficulty: BotDifficulty) -> Result<MatchReport, MatchError> {
    let mut game = Match::from(GameSettings::new(players));
    let mut bots = BotManager::new(difficulty);
    bots.adjust_bot_count(&mut game, players)?;
    game.assign_roles()?;
    let bot_operations = bots.act(&mut game)?;

    if game.phase() != Phase::Finished {
        return Err(MatchError::WrongPhase(game.phase()));
    }
    let winner = game.winner().ok_or(MatchError::WrongPhase(game.phase()))?;

    let fails = game
        .missions()
        .iter()
        .filter(|&&m| m == MissionOutcome::Failed)
        .count();
    let ending = match game.assassination_target() {
        _ if fails >= MISSIONS_TO_WIN => Ending::Sabotage,
        _ if game.rejection_streak() >= MAX_REJECTIONS => Ending::Rejections,
        Some(target) if game.is_assassination_successful(target) => Ending::MerlinAssassinated,
        _ => Ending::MerlinSurvived,
    };

    Ok(MatchReport {
        winner,
        ending,
        rounds: game.round(),
        bot_operations,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let json = pargs.contains("--json");
    let config = SimConfig::load(
        pargs.opt_value_from_str("--players")?,
        pargs.opt_value_from_str("--matches")?,
        pargs.opt_value_from_str("--difficulty")?,
        pargs.opt_value_from_str("--parallel")?,
        json,
    )?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    // Stop scheduling new matches on Ctrl-C, finish the ones in flight.
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        set_handler(move || stop.store(true, Ordering::SeqCst))?;
    }

    info!(
        "Playing {} matches with {} {} bots ({} at a time)",
        config.matches, config.players, config.difficulty, config.parallel
    );

    let permits = Arc::new(Semaphore::new(config.parallel));
    let mut tasks = JoinSet::new();
    for _ in 0..config.matches {
        let permit = permits.clone().acquire_owned().await?;
        if stop.load(Ordering::SeqCst) {
            warn!("Interrupted, waiting for matches in flight");
            break;
        }
        let (players, difficulty) = (config.players, config.difficulty);
        tasks.spawn_blocking(move || {
            let report = play_match(players, difficulty);
            drop(permit);
            report
        });
    }

    let mut reports = Vec::with_capacity(config.matches);
    while let Some(joined) = tasks.join_next().await {
        match joined? {
            Ok(report) => reports.push(report),
            Err(e) => warn!("Match aborted: {}", e),
        }
    }

    let total_operations: usize = reports.iter().map(|r| r.bot_operations).sum();
    info!(
        "Finished {} matches, {} bot operations",
        reports.len(),
        total_operations
    );

    let summary = Summary::new(&config, &reports);
    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_match_finishes() {
        for players in 5..=10 {
            let report = play_match(players, BotDifficulty::Standard).unwrap();
            assert!((1..=5).contains(&report.rounds));
            assert!(report.bot_operations > 0);
        }
    }

    #[test]
    fn test_endings_agree_with_winner() {
        for _ in 0..50 {
            let report = play_match(6, BotDifficulty::Easy).unwrap();
            let expected = match report.ending {
                Ending::MerlinSurvived => Team::Good,
                _ => Team::Evil,
            };
            assert_eq!(report.winner, expected);
        }
    }

    #[test]
    fn test_summary_counts() {
        let reports = vec![
            MatchReport {
                winner: Team::Good,
                ending: Ending::MerlinSurvived,
                rounds: 3,
                bot_operations: 40,
            },
            MatchReport {
                winner: Team::Evil,
                ending: Ending::Sabotage,
                rounds: 5,
                bot_operations: 60,
            },
        ];
        let summary = Summary::new(&SimConfig::default(), &reports);
        assert_eq!(summary.played, 2);
        assert_eq!(summary.good_wins, 1);
        assert_eq!(summary.by_sabotage, 1);
        assert_eq!(summary.average_rounds, 4.0);
        assert_eq!(summary.rate(summary.evil_wins), 50.0);
        let text = summary.to_string();
        assert!(text.contains("2 matches"));
        let lines: Vec<&str> = text.lines().collect();
        let good = lines.iter().position(|l| l.contains("good wins")).unwrap();
        assert!(lines[good + 1].trim_start().starts_with("merlin survived"));
    }
}
