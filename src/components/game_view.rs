use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::{Interval, Timeout};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent};
use yew::prelude::*;

use super::{
    controls_panel::ControlsPanel, game_over_overlay::GameOverOverlay, hand_panel::HandPanel,
    stats_panel::StatsPanel,
};
use crate::api::HttpApi;
use crate::assets::ImageCache;
use crate::auth;
use crate::client::{GameClient, GameContext, Host};
use crate::config::ClientConfig;
use crate::notify::Notice;
use crate::render::{CanvasPainter, Frame, render_frame};
use crate::state::{BrowserFrames, FrameLoop, LOGICAL_HEIGHT, LOGICAL_WIDTH, Phase, Point};
use crate::util::{cerror, clog};

/// `Host` over gloo timers, the RAF loop and the component's force-update handle.
struct BrowserHost {
    client: RefCell<Weak<GameClient>>,
    frames: RefCell<Option<Rc<FrameLoop<BrowserFrames>>>>,
    poll_timer: RefCell<Option<Interval>>,
    /// One-shot polls; cancelled together with the interval.
    poll_timeouts: RefCell<Vec<Timeout>>,
    redirect: RefCell<Option<Timeout>>,
    poll_interval_ms: u32,
    refresh: UseForceUpdateHandle,
}

fn spawn_poll(client: &Weak<GameClient>) {
    if let Some(client) = client.upgrade() {
        spawn_local(async move {
            client.poll().await;
        });
    }
}

impl BrowserHost {
    fn new(poll_interval_ms: u32, refresh: UseForceUpdateHandle) -> Self {
        Self {
            client: RefCell::new(Weak::new()),
            frames: RefCell::new(None),
            poll_timer: RefCell::new(None),
            poll_timeouts: RefCell::new(Vec::new()),
            redirect: RefCell::new(None),
            poll_interval_ms,
            refresh,
        }
    }

    fn frames(&self) -> Option<Rc<FrameLoop<BrowserFrames>>> {
        self.frames.borrow().clone()
    }

    /// Drops every timer and the frame loop; pending callbacks never fire.
    fn release(&self) {
        self.stop_polling();
        self.redirect.borrow_mut().take();
        if let Some(frames) = self.frames.borrow_mut().take() {
            frames.stop();
        }
    }
}

impl Host for BrowserHost {
    fn start_frames(&self) {
        if let Some(frames) = self.frames() {
            frames.start();
        }
    }

    fn stop_frames(&self) {
        if let Some(frames) = self.frames() {
            frames.stop();
        }
    }

    fn start_polling(&self) {
        if self.poll_timer.borrow().is_some() {
            return;
        }
        let client = self.client.borrow().clone();
        let timer = Interval::new(self.poll_interval_ms, move || spawn_poll(&client));
        *self.poll_timer.borrow_mut() = Some(timer);
    }

    fn stop_polling(&self) {
        self.poll_timer.borrow_mut().take();
        self.poll_timeouts.borrow_mut().clear();
    }

    fn poll_after(&self, delay_ms: u32) {
        let client = self.client.borrow().clone();
        let timeout = Timeout::new(delay_ms, move || spawn_poll(&client));
        self.poll_timeouts.borrow_mut().push(timeout);
    }

    fn confirm(&self, message: &str) -> bool {
        gloo::dialogs::confirm(message)
    }

    fn navigate(&self, path: &str, delay_ms: u32) {
        if delay_ms == 0 {
            auth::redirect(path);
            return;
        }
        let path = path.to_string();
        let timeout = Timeout::new(delay_ms, move || auth::redirect(&path));
        *self.redirect.borrow_mut() = Some(timeout);
    }

    fn view_changed(&self) {
        self.refresh.force_update();
    }
}

struct Runtime {
    client: Rc<GameClient>,
    host: Rc<BrowserHost>,
}

impl Runtime {
    fn new(config: ClientConfig, notifier: Callback<Notice>, refresh: UseForceUpdateHandle) -> Self {
        let host = Rc::new(BrowserHost::new(config.poll_interval_ms, refresh));
        let api = Rc::new(HttpApi::new(config.api_base.clone(), config.login_path.clone()));
        let client = GameClient::new(GameContext {
            config,
            api,
            notifier: Rc::new(notifier),
            host: host.clone(),
        });
        *host.client.borrow_mut() = Rc::downgrade(&client);
        Self { client, host }
    }
}

/// Wires the canvas, its frame loop and the window listeners. Returns the listeners
/// so the caller can drop them on unmount. Without a canvas the battle still polls;
/// only drawing is skipped.
fn attach_canvas(
    runtime: &Runtime,
    canvas_ref: &NodeRef,
    container_ref: &NodeRef,
) -> Vec<EventListener> {
    let (Some(canvas), Some(container)) = (
        canvas_ref.cast::<HtmlCanvasElement>(),
        container_ref.cast::<HtmlElement>(),
    ) else {
        cerror("battle canvas missing, rendering disabled");
        return Vec::new();
    };
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        cerror("2d context unavailable, rendering disabled");
        return Vec::new();
    };
    let Some(window) = web_sys::window() else {
        return Vec::new();
    };
    // Backing store stays at the logical size; only the CSS box scales.
    canvas.set_width(LOGICAL_WIDTH as u32);
    canvas.set_height(LOGICAL_HEIGHT as u32);

    let images = Rc::new(ImageCache::preload());
    let draw = {
        let client = Rc::downgrade(&runtime.client);
        move |now_ms: f64| {
            let Some(client) = client.upgrade() else {
                return;
            };
            let (snapshot, pending_x) = {
                let st = client.state();
                (st.sync.snapshot(), st.placement.pending_x())
            };
            let frame = Frame {
                snapshot: snapshot.as_deref(),
                pending_x,
                preview_y: client.config().preview_y,
                now_ms,
            };
            let painter = CanvasPainter {
                ctx: &ctx,
                images: &images,
            };
            render_frame(&painter, images.as_ref(), &frame);
        }
    };
    let frames = FrameLoop::new(BrowserFrames, draw);
    *runtime.host.frames.borrow_mut() = Some(frames.clone());

    let layout = {
        let client = Rc::downgrade(&runtime.client);
        move || {
            let Some(client) = client.upgrade() else {
                return;
            };
            let rect = container.get_bounding_client_rect();
            client.resize(rect.width(), rect.height());
            let vp = client.state().viewport.clone();
            let style = canvas.style();
            let _ = style.set_property("width", &format!("{}px", vp.display_width));
            let _ = style.set_property("height", &format!("{}px", vp.display_height));
            let _ = style.set_property("left", &format!("{}px", vp.offset_x));
            let _ = style.set_property("top", &format!("{}px", vp.offset_y));
        }
    };
    layout();
    frames.draw_now(0.0);

    let resize = EventListener::new(&window, "resize", move |_| layout());
    let keydown = {
        let client = Rc::downgrade(&runtime.client);
        EventListener::new(&window, "keydown", move |event| {
            let (Some(client), Some(event)) = (client.upgrade(), event.dyn_ref::<KeyboardEvent>())
            else {
                return;
            };
            match event.key().as_str() {
                "Escape" => client.cancel_selection(),
                " " | "Spacebar" => {
                    event.prevent_default();
                    client.toggle_pause();
                }
                _ => {}
            }
        })
    };
    vec![resize, keydown]
}

#[derive(Properties, PartialEq, Clone)]
pub struct GameViewProps {
    pub config: ClientConfig,
    pub notifier: Callback<Notice>,
}

#[function_component]
pub fn GameView(props: &GameViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let container_ref = use_node_ref();
    let refresh = use_force_update();
    let runtime = {
        let config = props.config.clone();
        let notifier = props.notifier.clone();
        use_memo((), move |_| Runtime::new(config, notifier, refresh))
    };

    {
        let runtime = runtime.clone();
        let canvas_ref = canvas_ref.clone();
        let container_ref = container_ref.clone();
        use_effect_with((), move |_| {
            let listeners = attach_canvas(&runtime, &canvas_ref, &container_ref);
            runtime.client.mount();
            clog("battle view mounted");
            move || {
                runtime.client.unmount();
                runtime.host.release();
                drop(listeners);
            }
        });
    }

    let on_canvas_click = {
        let runtime = runtime.clone();
        let container_ref = container_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let Some(container) = container_ref.cast::<HtmlElement>() else {
                return;
            };
            let rect = container.get_bounding_client_rect();
            let point = Point::new(
                e.client_x() as f64 - rect.left(),
                e.client_y() as f64 - rect.top(),
            );
            let client = runtime.client.clone();
            spawn_local(async move {
                let _ = client.click(point).await;
            });
        })
    };
    let toggle_pause_cb: Callback<()> = {
        let client = runtime.client.clone();
        Callback::from(move |()| client.toggle_pause())
    };
    let open_token_cb: Callback<()> = {
        let client = runtime.client.clone();
        Callback::from(move |()| {
            let client = client.clone();
            spawn_local(async move {
                let _ = client.open_token().await;
            });
        })
    };
    let surrender_cb: Callback<()> = {
        let client = runtime.client.clone();
        Callback::from(move |()| {
            let client = client.clone();
            spawn_local(async move {
                client.quit().await;
            });
        })
    };
    let play_again_cb: Callback<()> = {
        let client = runtime.client.clone();
        Callback::from(move |()| {
            let client = client.clone();
            spawn_local(async move {
                client.start().await;
            });
        })
    };
    let to_lobby_cb: Callback<()> = {
        let client = runtime.client.clone();
        Callback::from(move |()| client.return_to_lobby())
    };
    let select_cb: Callback<u64> = {
        let client = runtime.client.clone();
        Callback::from(move |id| client.select_card(id))
    };

    let client = &runtime.client;
    let snapshot = client.snapshot();
    let phase = client.phase();
    let hand = snapshot
        .as_ref()
        .map(|s| s.hand.clone())
        .unwrap_or_default();
    let pokeballs = snapshot.as_ref().map(|s| s.pokeballs).unwrap_or(0);

    html! {<div ref={container_ref} style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#0d1117;">
        <canvas ref={canvas_ref} id="game-canvas" onclick={on_canvas_click} style="position:absolute; display:block; cursor:crosshair;"></canvas>
        <StatsPanel snapshot={snapshot} />
        <ControlsPanel paused={phase == Phase::Paused} ended={phase == Phase::Ended} pokeballs={pokeballs}
            on_toggle_pause={toggle_pause_cb} on_open_token={open_token_cb} on_surrender={surrender_cb} />
        <HandPanel cards={hand} selected={client.selected_card()} disabled={phase != Phase::Running} on_select={select_cb} />
        <GameOverOverlay outcome={client.outcome()} play_again={play_again_cb} to_lobby={to_lobby_cb} />
    </div> }
}
