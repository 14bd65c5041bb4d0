use std::fmt;
use std::str::FromStr;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::card::{Card, CardId, SYMBOL_POOL, Symbol};
use super::difficulty::Difficulty;
use super::schedule::{RoundId, ScheduledTask, TaskKind};
use crate::config::Settings;
use crate::error::Error;

pub const MATCH_POINTS: u32 = 3;

/// What a tick at zero seconds does to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeoutPolicy {
    /// Reshuffle with the same difficulty, dropping score and turns.
    #[default]
    Restart,
    /// Stop the round as a loss until the player starts a new one.
    Defeat,
}

impl fmt::Display for TimeoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutPolicy::Restart => f.write_str("restart"),
            TimeoutPolicy::Defeat => f.write_str("defeat"),
        }
    }
}

impl FromStr for TimeoutPolicy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "restart" => Ok(TimeoutPolicy::Restart),
            "defeat" => Ok(TimeoutPolicy::Defeat),
            _ => Err(Error::InvalidTimeoutPolicy(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Playing,
    Won,
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    OneSelected,
    Resolving,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
    Locked,
    RoundOver,
    UnknownCard,
    AlreadyMatched,
    SameCard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Ignored(Ignored),
    FirstChoice,
    /// The pair was solved. `victory` is set when it was the last one.
    Matched {
        symbol: Symbol,
        victory: Option<ScheduledTask>,
    },
    /// Selection stays locked until `clear` runs.
    Mismatched { clear: ScheduledTask },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Counted { remaining: u32 },
    Restarted,
    Expired,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    Stale,
    TurnCleared,
    Restarted,
}

#[derive(Debug)]
pub struct GameController {
    rng: StdRng,
    difficulty: Difficulty,
    timeout_policy: TimeoutPolicy,
    round: RoundId,
    next_card_id: u64,
    board: Vec<Card>,
    turns: u32,
    score: u32,
    time_left: u32,
    choice_one: Option<CardId>,
    choice_two: Option<CardId>,
    locked: bool,
    status: RoundStatus,
}

impl GameController {
    /// Builds a controller and deals the first round.
    pub fn new(difficulty: Difficulty, timeout_policy: TimeoutPolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut controller = GameController {
            rng,
            difficulty,
            timeout_policy,
            round: RoundId::default(),
            next_card_id: 0,
            board: Vec::new(),
            turns: 0,
            score: 0,
            time_left: 0,
            choice_one: None,
            choice_two: None,
            locked: false,
            status: RoundStatus::Playing,
        };
        controller.start(difficulty);
        controller
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.difficulty, settings.on_timeout, settings.seed)
    }

    pub fn start(&mut self, difficulty: Difficulty) -> RoundId {
        self.difficulty = difficulty;
        self.round = self.round.next();

        let pairs = &SYMBOL_POOL[..difficulty.pair_count()];
        let mut symbols: Vec<Symbol> = pairs.iter().chain(pairs.iter()).copied().collect();
        symbols.shuffle(&mut self.rng);

        let first_id = self.next_card_id;
        let board: Vec<Card> = symbols
            .into_iter()
            .enumerate()
            .map(|(offset, symbol)| Card {
                id: CardId(first_id + offset as u64),
                symbol,
                matched: false,
            })
            .collect();
        self.next_card_id = first_id + board.len() as u64;
        self.board = board;

        self.turns = 0;
        self.score = 0;
        self.time_left = difficulty.preset().time_limit_secs;
        self.choice_one = None;
        self.choice_two = None;
        self.locked = false;
        self.status = RoundStatus::Playing;

        info!(
            round = self.round.0,
            %difficulty,
            cards = self.board.len(),
            "round started"
        );
        self.round
    }

    pub fn new_game(&mut self) -> RoundId {
        self.start(self.difficulty)
    }

    pub fn change_difficulty(&mut self, level: Difficulty) -> RoundId {
        self.start(level)
    }

    pub fn select_card(&mut self, id: CardId) -> Selection {
        if self.locked {
            return Selection::Ignored(Ignored::Locked);
        }
        if self.status != RoundStatus::Playing {
            return Selection::Ignored(Ignored::RoundOver);
        }
        let Some(card) = self.card(id) else {
            return Selection::Ignored(Ignored::UnknownCard);
        };
        if card.matched {
            return Selection::Ignored(Ignored::AlreadyMatched);
        }

        match self.choice_one {
            None => {
                self.choice_one = Some(id);
                Selection::FirstChoice
            }
            Some(first) if first == id => Selection::Ignored(Ignored::SameCard),
            Some(first) => {
                self.choice_two = Some(id);
                self.resolve(first, id)
            }
        }
    }

    fn resolve(&mut self, first: CardId, second: CardId) -> Selection {
        self.locked = true;
        let (Some(first_symbol), Some(second_symbol)) = (self.symbol_of(first), self.symbol_of(second))
        else {
            self.finish_turn();
            return Selection::Ignored(Ignored::UnknownCard);
        };

        if first_symbol != second_symbol {
            debug!(round = self.round.0, ?first_symbol, ?second_symbol, "mismatch");
            return Selection::Mismatched {
                clear: ScheduledTask::clear_choices(self.round),
            };
        }

        for card in self.board.iter_mut().filter(|card| card.symbol == first_symbol) {
            card.matched = true;
        }
        self.score += MATCH_POINTS;
        self.finish_turn();
        debug!(round = self.round.0, symbol = ?first_symbol, score = self.score, "pair matched");

        Selection::Matched {
            symbol: first_symbol,
            victory: self.check_victory(),
        }
    }

    fn finish_turn(&mut self) {
        self.choice_one = None;
        self.choice_two = None;
        self.turns += 1;
        self.locked = false;
    }

    /// Returns the auto-restart task the first time the board is found solved.
    pub fn check_victory(&mut self) -> Option<ScheduledTask> {
        if self.status != RoundStatus::Playing || self.board.is_empty() {
            return None;
        }
        if !self.board.iter().all(|card| card.matched) {
            return None;
        }
        self.status = RoundStatus::Won;
        info!(
            round = self.round.0,
            turns = self.turns,
            score = self.score,
            "round won"
        );
        Some(ScheduledTask::auto_restart(self.round))
    }

    pub fn tick(&mut self) -> Tick {
        if self.status != RoundStatus::Playing {
            return Tick::Idle;
        }
        if self.time_left > 0 {
            self.time_left -= 1;
            return Tick::Counted {
                remaining: self.time_left,
            };
        }

        match self.timeout_policy {
            TimeoutPolicy::Restart => {
                info!(round = self.round.0, score = self.score, "time expired, reshuffling");
                self.start(self.difficulty);
                Tick::Restarted
            }
            TimeoutPolicy::Defeat => {
                info!(round = self.round.0, score = self.score, "time expired, round lost");
                self.status = RoundStatus::TimedOut;
                self.choice_one = None;
                self.choice_two = None;
                self.locked = true;
                Tick::Expired
            }
        }
    }

    pub fn run_task(&mut self, task: ScheduledTask) -> TaskOutcome {
        if task.round != self.round {
            debug!(task_round = task.round.0, round = self.round.0, kind = ?task.kind, "dropping stale task");
            return TaskOutcome::Stale;
        }

        match task.kind {
            TaskKind::ClearChoices => {
                if self.status != RoundStatus::Playing || self.choice_two.is_none() {
                    return TaskOutcome::Stale;
                }
                self.finish_turn();
                TaskOutcome::TurnCleared
            }
            TaskKind::AutoRestart => {
                if self.status != RoundStatus::Won {
                    return TaskOutcome::Stale;
                }
                self.start(self.difficulty);
                TaskOutcome::Restarted
            }
        }
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.board.iter().find(|card| card.id == id)
    }

    fn symbol_of(&self, id: CardId) -> Option<Symbol> {
        self.card(id).map(|card| card.symbol)
    }

    /// Face-up for the view: either pending choice, or already solved.
    pub fn is_flipped(&self, card: &Card) -> bool {
        card.matched || self.choice_one == Some(card.id) || self.choice_two == Some(card.id)
    }

    pub fn choices(&self) -> (Option<CardId>, Option<CardId>) {
        (self.choice_one, self.choice_two)
    }

    pub fn phase(&self) -> TurnPhase {
        match (self.choice_one, self.choice_two) {
            (None, _) => TurnPhase::Idle,
            (Some(_), None) => TurnPhase::OneSelected,
            (Some(_), Some(_)) => TurnPhase::Resolving,
        }
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout_policy
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn is_victory(&self) -> bool {
        self.status == RoundStatus::Won
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::schedule::{MISMATCH_DELAY, VICTORY_RESTART_DELAY};
    use std::collections::{HashMap, HashSet};

    fn controller(difficulty: Difficulty) -> GameController {
        GameController::new(difficulty, TimeoutPolicy::Restart, Some(42))
    }

    fn pair_of(ctl: &GameController, symbol: Symbol) -> (CardId, CardId) {
        let ids: Vec<CardId> = ctl
            .board()
            .iter()
            .filter(|card| card.symbol == symbol)
            .map(|card| card.id)
            .collect();
        assert_eq!(ids.len(), 2, "{symbol:?} should appear twice");
        (ids[0], ids[1])
    }

    fn any_of(ctl: &GameController, symbol: Symbol) -> CardId {
        pair_of(ctl, symbol).0
    }

    #[test]
    fn start_deals_two_of_each_symbol_with_unique_ids() {
        for difficulty in Difficulty::ALL {
            let ctl = controller(difficulty);
            let board = ctl.board();
            assert_eq!(board.len(), difficulty.preset().card_count);

            let mut counts: HashMap<Symbol, usize> = HashMap::new();
            for card in board {
                *counts.entry(card.symbol).or_default() += 1;
                assert!(!card.matched);
            }
            assert_eq!(counts.len(), difficulty.pair_count());
            assert!(counts.values().all(|&count| count == 2));
            for symbol in &SYMBOL_POOL[..difficulty.pair_count()] {
                assert!(counts.contains_key(symbol));
            }

            let ids: HashSet<CardId> = board.iter().map(|card| card.id).collect();
            assert_eq!(ids.len(), board.len());
        }
    }

    #[test]
    fn start_resets_round_state() {
        let mut ctl = controller(Difficulty::Easy);
        let (a, b) = pair_of(&ctl, Symbol::Ring);
        ctl.select_card(a);
        ctl.select_card(b);
        ctl.tick();
        let previous = ctl.round();

        let round = ctl.start(Difficulty::Medium);
        assert_ne!(round, previous);
        assert_eq!(ctl.turns(), 0);
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.time_left(), 35);
        assert_eq!(ctl.choices(), (None, None));
        assert!(!ctl.is_locked());
        assert!(!ctl.is_victory());
        assert_eq!(ctl.board().len(), 12);
    }

    #[test]
    fn card_ids_are_never_reused_across_rounds() {
        let mut ctl = controller(Difficulty::Easy);
        let old: HashSet<CardId> = ctl.board().iter().map(|card| card.id).collect();
        ctl.new_game();
        assert!(ctl.board().iter().all(|card| !old.contains(&card.id)));
    }

    #[test]
    fn matching_pair_scores_and_finishes_turn() {
        let mut ctl = controller(Difficulty::Easy);
        let (a, b) = pair_of(&ctl, Symbol::Ring);

        assert_eq!(ctl.select_card(a), Selection::FirstChoice);
        assert_eq!(ctl.phase(), TurnPhase::OneSelected);
        let outcome = ctl.select_card(b);
        assert_eq!(
            outcome,
            Selection::Matched {
                symbol: Symbol::Ring,
                victory: None
            }
        );
        assert!(ctl.card(a).unwrap().matched);
        assert!(ctl.card(b).unwrap().matched);
        assert_eq!(ctl.score(), 3);
        assert_eq!(ctl.turns(), 1);
        assert_eq!(ctl.phase(), TurnPhase::Idle);
        assert!(!ctl.is_locked());
    }

    #[test]
    fn mismatch_locks_until_the_clear_task_runs() {
        let mut ctl = controller(Difficulty::Medium);
        let sword = any_of(&ctl, Symbol::Sword);
        let potion = any_of(&ctl, Symbol::Potion);

        ctl.select_card(sword);
        let Selection::Mismatched { clear } = ctl.select_card(potion) else {
            panic!("expected a mismatch");
        };
        assert_eq!(clear.delay, MISMATCH_DELAY);
        assert_eq!(clear.kind, TaskKind::ClearChoices);
        assert!(ctl.is_locked());
        assert_eq!(ctl.phase(), TurnPhase::Resolving);
        assert_eq!(ctl.turns(), 0);
        assert!(ctl.is_flipped(ctl.card(sword).unwrap()));
        assert!(ctl.is_flipped(ctl.card(potion).unwrap()));

        assert_eq!(ctl.run_task(clear), TaskOutcome::TurnCleared);
        assert_eq!(ctl.turns(), 1);
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.choices(), (None, None));
        assert!(!ctl.is_locked());
        assert!(ctl.board().iter().all(|card| !card.matched));
        assert!(!ctl.is_flipped(ctl.card(sword).unwrap()));

        assert_eq!(ctl.run_task(clear), TaskOutcome::Stale);
        assert_eq!(ctl.turns(), 1);
    }

    #[test]
    fn selection_is_ignored_while_locked() {
        let mut ctl = controller(Difficulty::Easy);
        let helmet = any_of(&ctl, Symbol::Helmet);
        let potion = any_of(&ctl, Symbol::Potion);
        let (ring, _) = pair_of(&ctl, Symbol::Ring);

        ctl.select_card(helmet);
        ctl.select_card(potion);
        assert_eq!(ctl.select_card(ring), Selection::Ignored(Ignored::Locked));
        assert_eq!(ctl.choices(), (Some(helmet), Some(potion)));
    }

    #[test]
    fn matched_and_repeated_cards_are_ignored() {
        let mut ctl = controller(Difficulty::Easy);
        let (a, b) = pair_of(&ctl, Symbol::Scroll);
        ctl.select_card(a);
        ctl.select_card(b);

        assert_eq!(ctl.select_card(a), Selection::Ignored(Ignored::AlreadyMatched));
        assert_eq!(ctl.phase(), TurnPhase::Idle);

        let helmet = any_of(&ctl, Symbol::Helmet);
        ctl.select_card(helmet);
        assert_eq!(ctl.select_card(helmet), Selection::Ignored(Ignored::SameCard));
        assert_eq!(ctl.choices(), (Some(helmet), None));
        assert!(!ctl.is_locked());
    }

    #[test]
    fn unknown_card_is_ignored() {
        let mut ctl = controller(Difficulty::Easy);
        let stale = ctl.board()[0].id;
        ctl.new_game();
        assert_eq!(ctl.select_card(stale), Selection::Ignored(Ignored::UnknownCard));
    }

    #[test]
    fn tick_counts_down_then_restarts() {
        let mut ctl = controller(Difficulty::Easy);
        let (a, b) = pair_of(&ctl, Symbol::Helmet);
        ctl.select_card(a);
        ctl.select_card(b);

        assert_eq!(ctl.tick(), Tick::Counted { remaining: 24 });
        for _ in 0..24 {
            ctl.tick();
        }
        assert_eq!(ctl.time_left(), 0);
        assert_eq!(ctl.score(), 3);

        let before = ctl.round();
        assert_eq!(ctl.tick(), Tick::Restarted);
        assert_ne!(ctl.round(), before);
        assert_eq!(ctl.time_left(), 25);
        assert_eq!(ctl.turns(), 0);
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn defeat_policy_ends_the_round() {
        let mut ctl = GameController::new(Difficulty::Easy, TimeoutPolicy::Defeat, Some(3));
        let helmet = any_of(&ctl, Symbol::Helmet);
        for _ in 0..25 {
            ctl.tick();
        }
        ctl.select_card(helmet);
        assert_eq!(ctl.tick(), Tick::Expired);
        assert_eq!(ctl.status(), RoundStatus::TimedOut);
        assert_eq!(ctl.choices(), (None, None));
        assert_eq!(ctl.select_card(helmet), Selection::Ignored(Ignored::Locked));
        assert_eq!(ctl.tick(), Tick::Idle);

        ctl.new_game();
        assert_eq!(ctl.status(), RoundStatus::Playing);
        assert_eq!(ctl.time_left(), 25);
    }

    #[test]
    fn victory_fires_once_and_schedules_restart() {
        let mut ctl = controller(Difficulty::Easy);
        let mut restart = None;
        for symbol in &SYMBOL_POOL[..Difficulty::Easy.pair_count()] {
            let (a, b) = pair_of(&ctl, *symbol);
            ctl.select_card(a);
            if let Selection::Matched { victory, .. } = ctl.select_card(b) {
                restart = restart.or(victory);
            }
        }
        let restart = restart.expect("last pair should win");
        assert_eq!(restart.delay, VICTORY_RESTART_DELAY);
        assert!(ctl.is_victory());
        assert_eq!(ctl.score(), 12);
        assert_eq!(ctl.check_victory(), None);

        let time_left = ctl.time_left();
        assert_eq!(ctl.tick(), Tick::Idle);
        assert_eq!(ctl.time_left(), time_left);

        assert_eq!(ctl.run_task(restart), TaskOutcome::Restarted);
        assert!(!ctl.is_victory());
        assert_eq!(ctl.score(), 0);
        assert_eq!(ctl.turns(), 0);
        assert_eq!(ctl.run_task(restart), TaskOutcome::Stale);
    }

    #[test]
    fn new_round_invalidates_pending_tasks() {
        let mut ctl = controller(Difficulty::Medium);
        let sword = any_of(&ctl, Symbol::Sword);
        let shield = any_of(&ctl, Symbol::Shield);
        ctl.select_card(sword);
        let Selection::Mismatched { clear } = ctl.select_card(shield) else {
            panic!("expected a mismatch");
        };

        ctl.change_difficulty(Difficulty::Hard);
        let first = ctl.board()[0].id;
        ctl.select_card(first);

        assert_eq!(ctl.run_task(clear), TaskOutcome::Stale);
        assert_eq!(ctl.turns(), 0);
        assert_eq!(ctl.choices(), (Some(first), None));
        assert_eq!(ctl.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn same_seed_deals_same_board() {
        let left = controller(Difficulty::Hard);
        let right = controller(Difficulty::Hard);
        let symbols = |ctl: &GameController| ctl.board().iter().map(|c| c.symbol).collect::<Vec<_>>();
        assert_eq!(symbols(&left), symbols(&right));
    }

    #[test]
    fn timeout_policy_parses() {
        assert_eq!("Defeat".parse::<TimeoutPolicy>().unwrap(), TimeoutPolicy::Defeat);
        assert_eq!(TimeoutPolicy::Restart.to_string(), "restart");
        assert!("forever".parse::<TimeoutPolicy>().is_err());
    }
}
