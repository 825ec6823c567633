use std::rc::Rc;

use crate::notify::{Notice, Severity};
use yew::prelude::*;

pub const TOAST_LIFETIME_MS: u32 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Visible toasts, oldest first. Ids are handed out by the caller so it can
/// schedule the matching dismissal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ToastStack {
    pub toasts: Vec<Toast>,
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(u64),
}

impl Reducible for ToastStack {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            ToastAction::Push(toast) => next.toasts.push(toast),
            ToastAction::Dismiss(id) => next.toasts.retain(|t| t.id != id),
        }
        Rc::new(next)
    }
}

fn accent(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "#58a6ff",
        Severity::Success => "#3fb950",
        Severity::Warning => "#d29922",
        Severity::Error => "#f85149",
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct NotificationsProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

#[function_component]
pub fn Notifications(props: &NotificationsProps) -> Html {
    let items = props.toasts.iter().map(|toast| {
        let id = toast.id;
        let dismiss = {
            let cb = props.on_dismiss.clone();
            Callback::from(move |_| cb.emit(id))
        };
        let color = accent(toast.notice.severity);
        html! {
            <div key={id}
                class={classes!("notification", toast.notice.severity.css_name())}
                onclick={dismiss}
                style={format!("cursor:pointer; background:rgba(22,27,34,0.95); border-left:4px solid {color}; border-radius:6px; padding:8px 12px; font-size:13px; box-shadow:0 2px 8px rgba(0,0,0,0.4);")}>
                { toast.notice.message.clone() }
            </div>
        }
    });
    html! {
        <div style="position:fixed; top:12px; left:50%; transform:translateX(-50%); display:flex; flex-direction:column; gap:6px; z-index:1000; pointer-events:auto;">
            { for items }
        </div>
    }
}
