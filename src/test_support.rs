// In-memory stand-ins for the browser and the server, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;

use crate::api::{ActionReply, ApiError, GameAction, GameApi};
use crate::assets::AssetSource;
use crate::client::Host;
use crate::model::{GameSnapshot, GameSummary};
use crate::notify::{Notice, Notifier};
use crate::render::Painter;
use crate::state::FrameLoop;
use crate::state::frame_loop::FrameScheduler;

/// Frame source driven by hand: `tick` runs every callback queued so far.
#[derive(Clone, Default)]
pub struct ManualFrames {
    queue: Rc<RefCell<Vec<Box<dyn FnOnce(f64)>>>>,
}

impl ManualFrames {
    pub fn tick(&self, timestamp: f64) {
        let due = std::mem::take(&mut *self.queue.borrow_mut());
        for callback in due {
            callback(timestamp);
        }
    }

    pub fn queued(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl FrameScheduler for ManualFrames {
    type Handle = ();

    fn request(&self, callback: Box<dyn FnOnce(f64)>) {
        self.queue.borrow_mut().push(callback);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    FillRect { w: f64, color: String },
    StrokeRect,
    Gradient,
    FillCircle(String),
    StrokeCircle { color: String },
    Line(String),
    Triangle(String),
    Text(String),
    Alpha,
    Sprite(String),
}

#[derive(Default)]
pub struct RecordingPainter {
    ops: RefCell<Vec<Op>>,
}

impl RecordingPainter {
    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    fn push(&self, op: Op) {
        self.ops.borrow_mut().push(op);
    }
}

impl Painter for RecordingPainter {
    fn clear(&self) {
        self.push(Op::Clear);
    }

    fn fill_rect(&self, _x: f64, _y: f64, w: f64, _h: f64, color: &str) {
        self.push(Op::FillRect {
            w,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&self, _x: f64, _y: f64, _w: f64, _h: f64, _color: &str, _width: f64) {
        self.push(Op::StrokeRect);
    }

    fn vertical_gradient(&self, _top: &str, _bottom: &str) {
        self.push(Op::Gradient);
    }

    fn fill_circle(&self, _x: f64, _y: f64, _r: f64, color: &str) {
        self.push(Op::FillCircle(color.to_string()));
    }

    fn stroke_circle(&self, _x: f64, _y: f64, _r: f64, color: &str, _width: f64, _dash: &[f64]) {
        self.push(Op::StrokeCircle {
            color: color.to_string(),
        });
    }

    fn line(&self, _from: (f64, f64), _to: (f64, f64), color: &str, _width: f64, _dash: &[f64]) {
        self.push(Op::Line(color.to_string()));
    }

    fn triangle(&self, _a: (f64, f64), _b: (f64, f64), _c: (f64, f64), color: &str) {
        self.push(Op::Triangle(color.to_string()));
    }

    fn text(&self, _x: f64, _y: f64, text: &str, _font: &str, _color: &str, _shadow: bool) {
        self.push(Op::Text(text.to_string()));
    }

    fn set_alpha(&self, _alpha: f64) {
        self.push(Op::Alpha);
    }

    fn sprite(&self, key: &str, _x: f64, _y: f64, _w: f64, _h: f64) {
        self.push(Op::Sprite(key.to_string()));
    }
}

pub struct FixedAssets {
    ready: HashSet<String>,
}

impl FixedAssets {
    pub fn none() -> Self {
        Self::with(&[])
    }

    pub fn with(keys: &[&str]) -> Self {
        Self {
            ready: keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl AssetSource for FixedAssets {
    fn is_ready(&self, key: &str) -> bool {
        self.ready.contains(key)
    }
}

/// Server double: each endpoint pops the next scripted reply.
#[derive(Default)]
pub struct ScriptedApi {
    states: RefCell<VecDeque<Result<GameSnapshot, ApiError>>>,
    actions: RefCell<VecDeque<Result<ActionReply, ApiError>>>,
    ends: RefCell<VecDeque<Result<GameSummary, ApiError>>>,
    coins: RefCell<VecDeque<Result<u64, ApiError>>>,
    sent: RefCell<Vec<GameAction>>,
    state_calls: Cell<usize>,
    start_calls: Cell<usize>,
    end_calls: Cell<usize>,
    on_action: RefCell<Option<Box<dyn Fn()>>>,
    on_fetch: RefCell<Option<Box<dyn Fn()>>>,
}

impl ScriptedApi {
    pub fn push_state(&self, reply: Result<GameSnapshot, ApiError>) {
        self.states.borrow_mut().push_back(reply);
    }

    pub fn push_action(&self, reply: Result<ActionReply, ApiError>) {
        self.actions.borrow_mut().push_back(reply);
    }

    pub fn push_end(&self, reply: Result<GameSummary, ApiError>) {
        self.ends.borrow_mut().push_back(reply);
    }

    pub fn push_coins(&self, reply: Result<u64, ApiError>) {
        self.coins.borrow_mut().push_back(reply);
    }

    /// Runs while an action request is "in flight", before its reply is returned.
    pub fn on_action(&self, hook: impl Fn() + 'static) {
        *self.on_action.borrow_mut() = Some(Box::new(hook));
    }

    /// Same as `on_action`, for state fetches.
    pub fn on_fetch(&self, hook: impl Fn() + 'static) {
        *self.on_fetch.borrow_mut() = Some(Box::new(hook));
    }

    pub fn actions(&self) -> Vec<GameAction> {
        self.sent.borrow().clone()
    }

    pub fn state_calls(&self) -> usize {
        self.state_calls.get()
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.get()
    }

    pub fn end_calls(&self) -> usize {
        self.end_calls.get()
    }
}

fn offline<T>() -> Result<T, ApiError> {
    Err(ApiError::Network("no scripted reply".into()))
}

#[async_trait(?Send)]
impl GameApi for ScriptedApi {
    async fn fetch_state(&self) -> Result<GameSnapshot, ApiError> {
        self.state_calls.set(self.state_calls.get() + 1);
        if let Some(hook) = self.on_fetch.borrow().as_ref() {
            hook();
        }
        self.states
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(ApiError::NotStarted))
    }

    async fn send_action(&self, action: GameAction) -> Result<ActionReply, ApiError> {
        self.sent.borrow_mut().push(action);
        if let Some(hook) = self.on_action.borrow().as_ref() {
            hook();
        }
        self.actions.borrow_mut().pop_front().unwrap_or_else(offline)
    }

    async fn start_game(&self) -> Result<(), ApiError> {
        self.start_calls.set(self.start_calls.get() + 1);
        Ok(())
    }

    async fn end_game(&self) -> Result<GameSummary, ApiError> {
        self.end_calls.set(self.end_calls.get() + 1);
        self.ends.borrow_mut().pop_front().unwrap_or_else(offline)
    }

    async fn fetch_coins(&self) -> Result<u64, ApiError> {
        self.coins.borrow_mut().pop_front().unwrap_or_else(offline)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    StartFrames,
    StopFrames,
    StartPolling,
    StopPolling,
    PollAfter(u32),
    Navigate(String, u32),
    ViewChanged,
}

/// Records host calls; `confirm` answers with whatever was last set.
/// With `drive_frames`, start/stop also gate a real frame loop.
#[derive(Default)]
pub struct RecordingHost {
    calls: RefCell<Vec<HostCall>>,
    confirm_answer: Cell<bool>,
    frames: RefCell<Option<Rc<FrameLoop<ManualFrames>>>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn drive_frames(&self, frames: Rc<FrameLoop<ManualFrames>>) {
        *self.frames.borrow_mut() = Some(frames);
    }

    pub fn set_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    fn record(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Host for RecordingHost {
    fn start_frames(&self) {
        self.record(HostCall::StartFrames);
        let frames = self.frames.borrow().clone();
        if let Some(frames) = frames {
            frames.start();
        }
    }

    fn stop_frames(&self) {
        self.record(HostCall::StopFrames);
        let frames = self.frames.borrow().clone();
        if let Some(frames) = frames {
            frames.stop();
        }
    }

    fn start_polling(&self) {
        self.record(HostCall::StartPolling);
    }

    fn stop_polling(&self) {
        self.record(HostCall::StopPolling);
    }

    fn poll_after(&self, delay_ms: u32) {
        self.record(HostCall::PollAfter(delay_ms));
    }

    fn confirm(&self, _message: &str) -> bool {
        self.confirm_answer.get()
    }

    fn navigate(&self, path: &str, delay_ms: u32) {
        self.record(HostCall::Navigate(path.to_string(), delay_ms));
    }

    fn view_changed(&self) {
        self.record(HostCall::ViewChanged);
    }
}
