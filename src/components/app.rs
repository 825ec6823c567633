use super::{
    game_view::GameView,
    notifications::{Notifications, TOAST_LIFETIME_MS, Toast, ToastAction, ToastStack},
};
use crate::auth;
use crate::config::ClientConfig;
use crate::notify::Notice;
use gloo::timers::callback::Timeout;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    let config = use_memo((), |_| ClientConfig::load());
    // No token: redirect and never build the battle client.
    let has_session = {
        let login_path = config.login_path.clone();
        use_memo((), move |_| auth::require_session(&login_path).is_some())
    };
    let toasts = use_reducer(ToastStack::default);
    let next_toast_id = use_mut_ref(|| 0u64);

    let notifier = {
        let dispatcher = toasts.dispatcher();
        let next_toast_id = next_toast_id.clone();
        Callback::from(move |notice: Notice| {
            let id = {
                let mut next = next_toast_id.borrow_mut();
                *next += 1;
                *next
            };
            dispatcher.dispatch(ToastAction::Push(Toast { id, notice }));
            let dispatcher = dispatcher.clone();
            Timeout::new(TOAST_LIFETIME_MS, move || {
                dispatcher.dispatch(ToastAction::Dismiss(id))
            })
            .forget();
        })
    };
    let dismiss = {
        let dispatcher = toasts.dispatcher();
        Callback::from(move |id: u64| dispatcher.dispatch(ToastAction::Dismiss(id)))
    };

    let content = if *has_session {
        html! { <GameView config={(*config).clone()} notifier={notifier} /> }
    } else {
        html! { <div style="padding:24px; opacity:0.7;">{"Redirecting to login..."}</div> }
    };

    html! {<>
        { content }
        <Notifications toasts={toasts.toasts.clone()} on_dismiss={dismiss} />
    </>}
}
