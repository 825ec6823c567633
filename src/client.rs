//! Battle-screen runtime: ties the snapshot cache, the placement gesture and the
//! lifecycle together and talks to the remote boundary.
//!
//! Every async method captures the lifecycle epoch before its first await and
//! re-checks it afterwards; replies for a torn-down or restarted game are dropped.
//! No `RefCell` borrow is ever held across an await.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::api::{ApiError, GameAction, GameApi};
use crate::config::ClientConfig;
use crate::model::{GameOutcome, GameSnapshot, GameSummary};
use crate::notify::{Notice, Notifier};
use crate::state::{
    CanvasViewport, Epoch, FieldBand, Intent, Lifecycle, Phase, PlaceCard, PlacementMachine, Point,
    PollOutcome, StateSync,
};
use crate::util::{clog, cwarn};

const SURRENDER_PROMPT: &str =
    "Are you sure you want to surrender? You will earn coins based on your progress.";

/// Browser-runtime services the client drives but does not own.
pub trait Host {
    fn start_frames(&self);
    fn stop_frames(&self);
    fn start_polling(&self);
    fn stop_polling(&self);
    /// One extra poll after `delay_ms` (0 = as soon as possible).
    fn poll_after(&self, delay_ms: u32);
    fn confirm(&self, message: &str) -> bool;
    fn navigate(&self, path: &str, delay_ms: u32);
    /// HUD, hand or overlay needs a re-render.
    fn view_changed(&self);
}

/// Built once per mount and handed to the client.
#[derive(Clone)]
pub struct GameContext {
    pub config: ClientConfig,
    pub api: Rc<dyn GameApi>,
    pub notifier: Rc<dyn Notifier>,
    pub host: Rc<dyn Host>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    Accepted,
    Rejected(String),
    Failed(ApiError),
    /// Reply arrived after the game was paused, ended or torn down.
    Discarded,
}

pub struct ClientState {
    pub viewport: CanvasViewport,
    pub placement: PlacementMachine,
    pub sync: StateSync,
    pub lifecycle: Lifecycle,
    pub outcome: Option<GameOutcome>,
}

pub struct GameClient {
    ctx: GameContext,
    state: RefCell<ClientState>,
}

impl GameClient {
    pub fn new(ctx: GameContext) -> Rc<Self> {
        let band = FieldBand::from(&ctx.config);
        Rc::new(Self {
            state: RefCell::new(ClientState {
                viewport: CanvasViewport::default(),
                placement: PlacementMachine::new(band),
                sync: StateSync::default(),
                lifecycle: Lifecycle::default(),
                outcome: None,
            }),
            ctx,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.ctx.config
    }

    pub fn state(&self) -> Ref<'_, ClientState> {
        self.state.borrow()
    }

    pub fn snapshot(&self) -> Option<Rc<GameSnapshot>> {
        self.state.borrow().sync.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().lifecycle.phase()
    }

    pub fn selected_card(&self) -> Option<u64> {
        self.state.borrow().placement.selected_card()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.state.borrow().outcome.clone()
    }

    fn notify(&self, notice: Notice) {
        self.ctx.notifier.notify(notice);
    }

    fn dispatch(&self, intents: Vec<Intent>) {
        let mut highlight_changed = false;
        for intent in intents {
            match intent {
                Intent::Notify(notice) => self.notify(notice),
                Intent::Highlight(_) => highlight_changed = true,
                Intent::Commit(_) => {}
            }
        }
        if highlight_changed {
            self.ctx.host.view_changed();
        }
    }

    /// Start the frame loop and the poll timer, plus an immediate and a delayed first poll.
    pub fn mount(&self) {
        let host = &self.ctx.host;
        host.start_frames();
        host.start_polling();
        host.poll_after(0);
        host.poll_after(self.ctx.config.post_mount_poll_delay_ms);
    }

    pub fn unmount(&self) {
        self.state.borrow_mut().lifecycle.teardown();
        self.ctx.host.stop_frames();
        self.ctx.host.stop_polling();
    }

    pub fn resize(&self, container_width: f64, container_height: f64) {
        self.state
            .borrow_mut()
            .viewport
            .configure(container_width, container_height);
    }

    pub async fn poll(&self) -> PollOutcome {
        let epoch = {
            let st = self.state.borrow();
            let epoch = st.lifecycle.epoch();
            // Paused, ended, quitting or torn down: no remote call at all.
            if !st.lifecycle.accepts_updates(epoch) {
                return PollOutcome::Discarded;
            }
            epoch
        };
        let result = self.ctx.api.fetch_state().await;
        let (outcome, intents) = {
            let mut st = self.state.borrow_mut();
            if !st.lifecycle.accepts_updates(epoch) {
                return PollOutcome::Discarded;
            }
            let outcome = st.sync.apply(result);
            let intents = match (&outcome, st.sync.snapshot()) {
                (PollOutcome::Updated | PollOutcome::GameOver { .. }, Some(snap)) => {
                    st.placement.prune(&snap.hand)
                }
                _ => Vec::new(),
            };
            (outcome, intents)
        };
        self.dispatch(intents);
        match outcome {
            PollOutcome::Updated => self.ctx.host.view_changed(),
            PollOutcome::GameOver { victory } => {
                self.ctx.host.view_changed();
                self.on_game_over(victory).await;
            }
            _ => {}
        }
        outcome
    }

    pub fn select_card(&self, card_id: u64) {
        let intents = {
            let mut st = self.state.borrow_mut();
            if st.lifecycle.phase() == Phase::Ended || st.lifecycle.is_quitting() {
                return;
            }
            let name = st
                .sync
                .snapshot()
                .and_then(|s| s.card(card_id).map(|c| c.name.clone()))
                .unwrap_or_else(|| "card".to_string());
            st.placement.select(card_id, &name)
        };
        self.dispatch(intents);
    }

    pub fn cancel_selection(&self) {
        let intents = self.state.borrow_mut().placement.cancel();
        self.dispatch(intents);
    }

    /// Canvas click at a container-relative point. Resolves after the commit reply, if any.
    pub async fn click(&self, screen: Point) -> Option<ActionOutcome> {
        let (intents, epoch) = {
            let mut st = self.state.borrow_mut();
            let phase = st.lifecycle.phase();
            if phase == Phase::Paused {
                drop(st);
                self.notify(Notice::info("Game is paused"));
                return None;
            }
            if phase != Phase::Running || st.lifecycle.is_quitting() {
                return None;
            }
            let viewport = st.viewport.clone();
            let epoch = st.lifecycle.epoch();
            (st.placement.click(screen, &viewport), epoch)
        };
        let command = intents.iter().find_map(|i| match i {
            Intent::Commit(cmd) => Some(*cmd),
            _ => None,
        });
        self.dispatch(intents);
        match command {
            Some(cmd) => Some(self.commit(cmd, epoch).await),
            None => None,
        }
    }

    async fn commit(&self, cmd: PlaceCard, epoch: Epoch) -> ActionOutcome {
        let result = self.ctx.api.send_action(GameAction::PlaceCard(cmd)).await;
        if !self.state.borrow().lifecycle.accepts_updates(epoch) {
            clog("dropping placement reply for a stale game");
            return ActionOutcome::Discarded;
        }
        match result {
            Ok(reply) => match reply.rejection() {
                None => {
                    self.notify(Notice::success("✅ Pokemon placed on field!"));
                    self.poll().await;
                    ActionOutcome::Accepted
                }
                Some(reason) => {
                    let reason = non_empty_or(reason, "Cannot place here");
                    let intents = self.state.borrow_mut().placement.reset();
                    self.dispatch(intents);
                    self.notify(Notice::error(reason.clone()));
                    ActionOutcome::Rejected(reason)
                }
            },
            Err(e) => {
                cwarn(&format!("failed to play card: {e}"));
                let intents = self.state.borrow_mut().placement.reset();
                self.dispatch(intents);
                self.notify(Notice::error("Failed to place pokemon"));
                ActionOutcome::Failed(e)
            }
        }
    }

    /// Open one token (pokeball) for a new card.
    pub async fn open_token(&self) -> Option<ActionOutcome> {
        let epoch = {
            let st = self.state.borrow();
            if !st.lifecycle.is_running() || st.lifecycle.is_quitting() {
                return None;
            }
            let tokens = st.sync.snapshot().map(|s| s.pokeballs).unwrap_or(0);
            if tokens == 0 {
                drop(st);
                self.notify(Notice::error("No pokeballs left!"));
                return None;
            }
            st.lifecycle.epoch()
        };
        let result = self.ctx.api.send_action(GameAction::OpenToken).await;
        if !self.state.borrow().lifecycle.accepts_updates(epoch) {
            return Some(ActionOutcome::Discarded);
        }
        let outcome = match result {
            Ok(reply) => match reply.rejection() {
                None => {
                    let name = reply
                        .pokemon
                        .as_ref()
                        .map(|c| c.name.as_str())
                        .unwrap_or("a new card");
                    self.notify(Notice::success(format!("🎉 Got {name}!")));
                    self.poll().await;
                    ActionOutcome::Accepted
                }
                Some(reason) => {
                    let reason = non_empty_or(reason, "Failed to open pokeball");
                    self.notify(Notice::error(reason.clone()));
                    ActionOutcome::Rejected(reason)
                }
            },
            Err(e) => {
                cwarn(&format!("failed to open pokeball: {e}"));
                self.notify(Notice::error("Failed to open pokeball"));
                ActionOutcome::Failed(e)
            }
        };
        Some(outcome)
    }

    /// Running to Paused: frames and polling both stop.
    pub fn pause(&self) -> bool {
        if !self.state.borrow_mut().lifecycle.pause() {
            return false;
        }
        self.ctx.host.stop_frames();
        self.ctx.host.stop_polling();
        self.ctx.host.view_changed();
        true
    }

    /// Paused to Running. No fetch: the next frame draws the cached snapshot.
    pub fn resume(&self) -> bool {
        if !self.state.borrow_mut().lifecycle.resume() {
            return false;
        }
        self.ctx.host.start_frames();
        self.ctx.host.start_polling();
        self.ctx.host.view_changed();
        true
    }

    pub fn toggle_pause(&self) {
        if !self.pause() {
            self.resume();
        }
    }

    /// Surrender after confirmation: end the game server-side, then leave for the lobby.
    pub async fn quit(&self) -> bool {
        {
            let st = self.state.borrow();
            if st.lifecycle.phase() == Phase::Ended || st.lifecycle.is_quitting() {
                return false;
            }
        }
        if !self.ctx.host.confirm(SURRENDER_PROMPT) {
            return false;
        }
        let epoch = {
            let mut st = self.state.borrow_mut();
            if !st.lifecycle.begin_quit() {
                return false;
            }
            st.lifecycle.epoch()
        };
        self.ctx.host.stop_polling();
        let result = self.ctx.api.end_game().await;
        if !self.state.borrow().lifecycle.is_current(epoch) {
            return false;
        }
        match result {
            Ok(summary) => {
                let intents = {
                    let mut st = self.state.borrow_mut();
                    st.lifecycle.end();
                    st.placement.reset()
                };
                self.dispatch(intents);
                self.ctx.host.stop_frames();
                if summary.coins_earned > 0 {
                    self.notify(Notice::info(format!(
                        "🏳️ Game ended! Earned {} coins.",
                        summary.coins_earned
                    )));
                }
                self.ctx.host.view_changed();
                self.ctx
                    .host
                    .navigate(&self.ctx.config.lobby_path, self.ctx.config.quit_redirect_delay_ms);
                true
            }
            Err(e) => {
                cwarn(&format!("failed to quit game: {e}"));
                let resume_polling = {
                    let mut st = self.state.borrow_mut();
                    st.lifecycle.abort_quit();
                    st.lifecycle.is_running()
                };
                if resume_polling {
                    self.ctx.host.start_polling();
                }
                self.notify(Notice::error("Failed to quit game"));
                false
            }
        }
    }

    /// Running/Paused to Ended, once per game. Fetches the summary, falling back to
    /// figures derived from the last snapshot, then the post-game coin balance.
    pub async fn on_game_over(&self, victory: bool) -> bool {
        let (epoch, snapshot, intents) = {
            let mut st = self.state.borrow_mut();
            if !st.lifecycle.end() {
                return false;
            }
            let intents = st.placement.reset();
            (st.lifecycle.epoch(), st.sync.snapshot(), intents)
        };
        self.dispatch(intents);
        self.ctx.host.stop_frames();
        self.ctx.host.stop_polling();

        let fetched = self.ctx.api.end_game().await;
        if !self.state.borrow().lifecycle.is_current(epoch) {
            return false;
        }
        let cached_coins = snapshot.as_ref().map(|s| s.poke_coins).unwrap_or(0);
        let (summary, estimated, total_coins) = match fetched {
            Ok(summary) => {
                let total = match self.ctx.api.fetch_coins().await {
                    Ok(coins) => coins,
                    Err(e) => {
                        cwarn(&format!("could not refresh coin balance: {e}"));
                        cached_coins + summary.coins_earned
                    }
                };
                (summary, false, total)
            }
            Err(e) => {
                cwarn(&format!("error ending game: {e}"));
                (GameSummary::estimate(snapshot.as_deref()), true, cached_coins)
            }
        };
        if !self.state.borrow().lifecycle.is_current(epoch) {
            return false;
        }

        let notice = if estimated {
            Notice::warning("Game ended with some issues")
        } else if victory {
            Notice::success(format!(
                "🎉 Victory! Earned {} coins!",
                summary.coins_earned
            ))
        } else {
            Notice::info(format!("Game Over. Earned {} coins.", summary.coins_earned))
        };
        self.state.borrow_mut().outcome = Some(GameOutcome {
            victory,
            summary,
            total_coins: Some(total_coins),
            estimated,
        });
        self.notify(notice);
        self.ctx.host.view_changed();
        true
    }

    /// Fresh game: server reset, then new epoch, cleared gesture and cache, Running.
    pub async fn start(&self) -> bool {
        let epoch = self.state.borrow().lifecycle.epoch();
        let result = self.ctx.api.start_game().await;
        if !self.state.borrow().lifecycle.is_current(epoch) {
            return false;
        }
        if let Err(e) = result {
            cwarn(&format!("failed to restart game: {e}"));
            self.notify(Notice::error("Failed to restart game"));
            return false;
        }
        let intents = {
            let mut st = self.state.borrow_mut();
            st.lifecycle.restart();
            st.sync.reset();
            st.outcome = None;
            st.placement.reset()
        };
        self.dispatch(intents);
        self.ctx.host.start_frames();
        self.ctx.host.start_polling();
        self.notify(Notice::success("New game started!"));
        self.ctx.host.view_changed();
        self.poll().await;
        true
    }

    pub fn return_to_lobby(&self) {
        self.ctx.host.stop_polling();
        self.ctx.host.stop_frames();
        self.ctx.host.navigate(&self.ctx.config.lobby_path, 0);
    }
}

fn non_empty_or(reason: &str, fallback: &str) -> String {
    if reason.trim().is_empty() {
        fallback.to_string()
    } else {
        reason.to_string()
    }
}
