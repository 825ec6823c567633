use crate::model::{Card, Rarity};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct HandPanelProps {
    pub cards: Vec<Card>,
    pub selected: Option<u64>,
    pub disabled: bool,
    pub on_select: Callback<u64>,
}

fn rarity_color(rarity: Rarity) -> &'static str {
    match rarity {
        Rarity::Common => "#8b949e",
        Rarity::Uncommon => "#3fb950",
        Rarity::Rare => "#58a6ff",
        Rarity::Epic => "#a371f7",
        Rarity::Legendary => "#d4af37",
    }
}

#[function_component]
pub fn HandPanel(props: &HandPanelProps) -> Html {
    let panel_style = "position:absolute; bottom:12px; left:50%; transform:translateX(-50%); background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:8px; max-width:90vw; overflow-x:auto;";
    if props.cards.is_empty() {
        return html! {
            <div style={panel_style}>
                <div style="font-size:12px; opacity:0.7; padding:8px 12px;">{"No Pokemon in hand. Open a pokeball to get one!"}</div>
            </div>
        };
    }
    let cards = props.cards.iter().map(|card| {
        let id = card.id;
        let selected = props.selected == Some(id);
        let onclick = {
            let cb = props.on_select.clone();
            let disabled = props.disabled;
            Callback::from(move |_| {
                if !disabled {
                    cb.emit(id)
                }
            })
        };
        let border = if selected { "#ffd700" } else { rarity_color(card.rarity) };
        let glyphs: Html = card
            .typings()
            .into_iter()
            .map(|el| html! { <span title={el.css_name()} style={format!("color:{};", el.color())}>{ el.glyph() }</span> })
            .collect();
        html! {
            <div key={id}
                class={classes!("card", card.rarity.css_name(), card.primary_element().css_name(), selected.then_some("selected"))}
                onclick={onclick}
                style={format!("cursor:pointer; min-width:96px; padding:6px 8px; border:2px solid {border}; border-radius:6px; background:#1c2128; display:flex; flex-direction:column; gap:2px; font-size:12px;{}", if selected { " box-shadow:0 0 8px #ffd700;" } else { "" })}>
                <div style="display:flex; justify-content:space-between; gap:6px;">
                    <span style="font-weight:600;">{ card.name.clone() }</span>
                    <span>{ glyphs }</span>
                </div>
                <div style="opacity:0.8;">{ format!("Lv. {}", card.level()) }</div>
                <div style="font-variant-numeric:tabular-nums;">{ format!("⚔ {:.0}  🛡 {:.0}", card.attack, card.defense_or_health()) }</div>
                <div style={format!("font-size:10px; text-transform:uppercase; color:{};", rarity_color(card.rarity))}>{ card.rarity.css_name() }</div>
            </div>
        }
    });
    html! {
        <div style={panel_style}>
            { for cards }
        </div>
    }
}
