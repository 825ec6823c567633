use std::rc::Rc;

use crate::model::GameSnapshot;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub snapshot: Option<Rc<GameSnapshot>>,
}

fn health_color(fraction: f64) -> &'static str {
    if fraction < 0.3 {
        "#f85149"
    } else if fraction < 0.6 {
        "#d29922"
    } else {
        "#3fb950"
    }
}

fn bar(fraction: f64, color: &str) -> Html {
    let pct = (fraction.clamp(0.0, 1.0) * 100.0).round();
    html! {
        <div style="height:8px; background:#30363d; border-radius:4px; overflow:hidden;">
            <div style={format!("height:100%; width:{pct}%; background:{color}; transition:width 0.3s;")}></div>
        </div>
    }
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // icon | label | value
    let icon_style = "width:20px; text-align:center; flex-shrink:0;";
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:70px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let default_snapshot = GameSnapshot::default();
    let snap = props.snapshot.as_deref().unwrap_or(&default_snapshot);
    let health = snap.health_fraction();
    let health_col = health_color(health);
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:8px; font-size:14px;">
            <div style={row_style}>
                <span style={format!("{icon_style} color:{health_col};")}>{"❤"}</span>
                <span style={format!("{label_style} color:{health_col};")}>{"Health"}</span>
                <span style={format!("{value_style} color:{health_col};")}>{ snap.player_health.max(0) }</span>
            </div>
            { bar(health, health_col) }
            <div style={row_style}>
                <span style={format!("{icon_style} color:#a371f7;")}>{"⭐"}</span>
                <span style={format!("{label_style} color:#a371f7;")}>{ format!("Level {}", snap.player_level) }</span>
                <span style={format!("{value_style} color:#a371f7;")}>{ format!("{}/{}", snap.player_exp, snap.player_max_exp) }</span>
            </div>
            { bar(snap.exp_fraction(), "#a371f7") }
            <div style={row_style}>
                <span style={format!("{icon_style} color:#58a6ff;")}>{"🌊"}</span>
                <span style={format!("{label_style} color:#58a6ff;")}>{"Wave"}</span>
                <span style={format!("{value_style} color:#58a6ff;")}>{ snap.wave }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{icon_style} color:#d4af37;")}>{"🪙"}</span>
                <span style={format!("{label_style} color:#d4af37;")}>{"Coins"}</span>
                <span style={format!("{value_style} color:#d4af37;")}>{ snap.poke_coins }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{icon_style} color:#f0883e;")}>{"⚪"}</span>
                <span style={format!("{label_style} color:#f0883e;")}>{"Pokeballs"}</span>
                <span style={format!("{value_style} color:#f0883e;")}>{ snap.pokeballs }</span>
            </div>
            <div style={row_style}>
                <span style={icon_style}>{"🏆"}</span>
                <span style={label_style}>{"Score"}</span>
                <span style={value_style}>{ snap.score }</span>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_colour_thresholds() {
        assert_eq!(health_color(0.29), "#f85149");
        assert_eq!(health_color(0.3), "#d29922");
        assert_eq!(health_color(0.59), "#d29922");
        assert_eq!(health_color(0.6), "#3fb950");
    }
}
