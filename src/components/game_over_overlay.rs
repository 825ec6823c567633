use crate::model::GameOutcome;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GameOverOverlayProps {
    pub outcome: Option<GameOutcome>,
    pub play_again: Callback<()>,
    pub to_lobby: Callback<()>,
}

#[function_component]
pub fn GameOverOverlay(props: &GameOverOverlayProps) -> Html {
    let Some(outcome) = &props.outcome else {
        return html! {};
    };
    let again_cb = props.play_again.clone();
    let again_btn = Callback::from(move |_| again_cb.emit(()));
    let lobby_btn = {
        let cb = props.to_lobby.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let (title, accent) = if outcome.victory {
        ("🎉 Victory!", "#3fb950")
    } else {
        ("Game Over", "#f85149")
    };
    let summary = &outcome.summary;
    html! {
        <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.6);">
            <div style={format!("background:rgba(0,0,0,0.85); border:2px solid {accent}; padding:24px 32px; border-radius:12px; text-align:center; min-width:320px;")}>
                <h2 style={format!("margin:0 0 12px 0; color:{accent};")}>{ title }</h2>
                <p style="margin:4px 0;">{ format!("Coins Earned: {}", summary.coins_earned) }</p>
                <p style="margin:4px 0;">{ format!("Waves Completed: {}", summary.waves_completed) }</p>
                <p style="margin:4px 0;">{ format!("Enemies Defeated: {}", summary.enemies_defeated) }</p>
                { match outcome.total_coins {
                    Some(total) => html!{ <p style="margin:4px 0; color:#d4af37;">{ format!("Total Coins: {total}") }</p> },
                    None => html!{},
                } }
                { if outcome.estimated {
                    html!{ <p style="margin:8px 0 0 0; font-size:12px; opacity:0.7;">{"Results estimated from the last known game state."}</p> }
                } else { html!{} } }
                <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                    <button onclick={again_btn}>{"Play Again"}</button>
                    <button onclick={lobby_btn}>{"Return to Lobby"}</button>
                </div>
            </div>
        </div>
    }
}
