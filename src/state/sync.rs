use std::rc::Rc;

use crate::api::ApiError;
use crate::model::GameSnapshot;
use crate::util::{cerror, clog, cwarn};

#[derive(Clone, Debug, PartialEq)]
pub enum PollOutcome {
    Updated,
    /// First snapshot of this game with `game_over` set. Reported once.
    GameOver { victory: bool },
    /// Server has no game for us yet; cache untouched, nothing surfaced.
    NotStarted,
    /// Transient failure; logged, last good snapshot kept.
    Failed(ApiError),
    /// Reply belongs to a paused, ended or torn-down game and was not applied.
    Discarded,
}

/// Cache of the latest authoritative snapshot plus one-shot game-over detection.
#[derive(Debug, Default)]
pub struct StateSync {
    snapshot: Option<Rc<GameSnapshot>>,
    game_over_fired: bool,
}

impl StateSync {
    pub fn snapshot(&self) -> Option<Rc<GameSnapshot>> {
        self.snapshot.clone()
    }

    pub fn apply(&mut self, result: Result<GameSnapshot, ApiError>) -> PollOutcome {
        match result {
            Ok(snapshot) => {
                let over = snapshot.game_over;
                let victory = snapshot.victory;
                self.snapshot = Some(Rc::new(snapshot));
                if over && !self.game_over_fired {
                    self.game_over_fired = true;
                    PollOutcome::GameOver { victory }
                } else {
                    PollOutcome::Updated
                }
            }
            Err(ApiError::NotStarted) => {
                clog("game not started yet");
                PollOutcome::NotStarted
            }
            Err(e) if e.is_transient() => {
                cwarn(&format!("failed to load game state: {e}"));
                PollOutcome::Failed(e)
            }
            Err(e) => {
                cerror(&format!("unreadable game state: {e}"));
                PollOutcome::Failed(e)
            }
        }
    }

    pub fn reset(&mut self) {
        self.snapshot = None;
        self.game_over_fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(game_over: bool) -> GameSnapshot {
        GameSnapshot {
            game_over,
            ..Default::default()
        }
    }

    #[test]
    fn not_started_leaves_cache_empty() {
        let mut sync = StateSync::default();
        assert_eq!(sync.apply(Err(ApiError::NotStarted)), PollOutcome::NotStarted);
        assert!(sync.snapshot().is_none());
    }

    #[test]
    fn game_over_fires_only_on_first_transition() {
        let mut sync = StateSync::default();
        let outcomes: Vec<_> = [false, true, true]
            .into_iter()
            .map(|over| sync.apply(Ok(snap(over))))
            .collect();
        assert_eq!(
            outcomes,
            vec![
                PollOutcome::Updated,
                PollOutcome::GameOver { victory: false },
                PollOutcome::Updated
            ]
        );
    }

    #[test]
    fn failure_keeps_last_good_snapshot() {
        let mut sync = StateSync::default();
        let mut first = snap(false);
        first.wave = 3;
        sync.apply(Ok(first));
        let out = sync.apply(Err(ApiError::Network("offline".into())));
        assert!(matches!(out, PollOutcome::Failed(_)));
        assert_eq!(sync.snapshot().map(|s| s.wave), Some(3));
    }

    #[test]
    fn decode_failure_is_reported_but_keeps_cache() {
        let mut sync = StateSync::default();
        sync.apply(Ok(snap(false)));
        let err = ApiError::Decode("expected u64".into());
        assert!(!err.is_transient());
        assert_eq!(sync.apply(Err(err.clone())), PollOutcome::Failed(err));
        assert!(sync.snapshot().is_some());
    }

    #[test]
    fn reset_rearms_game_over() {
        let mut sync = StateSync::default();
        sync.apply(Ok(snap(true)));
        sync.reset();
        assert!(sync.snapshot().is_none());
        assert_eq!(
            sync.apply(Ok(snap(true))),
            PollOutcome::GameOver { victory: false }
        );
    }
}
