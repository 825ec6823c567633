use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub paused: bool,
    pub ended: bool,
    pub pokeballs: u32,
    pub on_toggle_pause: Callback<()>,
    pub on_open_token: Callback<()>,
    pub on_surrender: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let pause_cb = {
        let cb = props.on_toggle_pause.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let token_cb = {
        let cb = props.on_open_token.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let surrender_cb = {
        let cb = props.on_surrender.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let pause_label = if props.paused { "Resume" } else { "Pause" };
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        <button onclick={pause_cb} disabled={props.ended}>{ pause_label }</button>
        <button onclick={token_cb} disabled={props.ended || props.paused || props.pokeballs == 0}>
            { format!("Open Pokeball ({})", props.pokeballs) }
        </button>
        <button onclick={surrender_cb} disabled={props.ended}>{"Surrender"}</button>
        <div style="font-size:11px; opacity:0.7;">{"Space: pause/resume · Esc: cancel selection"}</div>
        { if props.paused { html!{ <div style="font-size:11px; line-height:1.2; background:#1c2128; border:1px solid #30363d; padding:4px 6px; border-radius:6px;">{"Paused"}</div> } } else { html!{} } }
    </div>}
}
