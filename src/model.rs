//! Data models for the battle screen.
//! Everything in here arrives from the game server and is treated as read-only:
//! a snapshot is replaced wholesale by the next successful poll, never patched.

use serde::{Deserialize, Serialize};

/// Elemental typing shared by cards, field units and the fallback glyph table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Grass,
    Electric,
    #[default]
    Normal,
    Poison,
    Flying,
    Rock,
    Psychic,
    Fighting,
    /// Any typing this client has no colour for.
    #[serde(other)]
    Unknown,
}

impl Element {
    pub fn color(self) -> &'static str {
        match self {
            Element::Fire => "#FF4500",
            Element::Water => "#1E90FF",
            Element::Grass => "#32CD32",
            Element::Electric => "#FFD700",
            Element::Normal => "#A9A9A9",
            Element::Poison => "#9400D3",
            Element::Flying => "#87CEEB",
            Element::Rock => "#A0522D",
            Element::Psychic => "#FF69B4",
            Element::Fighting => "#B22222",
            Element::Unknown => "#808080",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Element::Fire => "🔥",
            Element::Water => "💧",
            Element::Grass => "🌿",
            Element::Electric => "⚡",
            Element::Normal => "⚪",
            Element::Poison => "☠️",
            Element::Flying => "🕊️",
            Element::Rock => "🪨",
            Element::Psychic => "🔮",
            Element::Fighting => "🥊",
            Element::Unknown => "⚫",
        }
    }

    pub fn css_name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Grass => "grass",
            Element::Electric => "electric",
            Element::Normal => "normal",
            Element::Poison => "poison",
            Element::Flying => "flying",
            Element::Rock => "rock",
            Element::Psychic => "psychic",
            Element::Fighting => "fighting",
            Element::Unknown => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Uncommon,
    Rare,
    Epic,
    Legendary,
    /// Also what any unrecognised rarity decodes to.
    #[default]
    #[serde(other)]
    Common,
}

impl Rarity {
    pub fn css_name(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// A card in the player's hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    /// Single typing, older payloads.
    #[serde(default)]
    pub element: Option<Element>,
    /// One or two typings, newer payloads. Takes precedence over `element`.
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub attack: f64,
    #[serde(default)]
    pub defense: Option<f64>,
    #[serde(default)]
    pub health: f64,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub rarity: Rarity,
}

impl Card {
    /// At most two typings, never empty.
    pub fn typings(&self) -> Vec<Element> {
        if !self.elements.is_empty() {
            return self.elements.iter().copied().take(2).collect();
        }
        vec![self.element.unwrap_or_default()]
    }

    pub fn primary_element(&self) -> Element {
        self.typings()[0]
    }

    pub fn defense_or_health(&self) -> f64 {
        self.defense.unwrap_or(self.health)
    }

    pub fn level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }
}

/// A creature the player has placed on the field.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unit {
    pub id: u64,
    pub name: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub current_health: Option<f64>,
    pub max_health: Option<f64>,
    /// Card health; doubles as max health on payloads without `max_health`.
    pub health: Option<f64>,
    pub element: Element,
    pub is_moving: bool,
    pub reached_enemy_base: bool,
    pub target: Option<u64>,
}

pub const UNIT_FALLBACK_POS: (f64, f64) = (100.0, 450.0);
pub const ENEMY_FALLBACK_POS: (f64, f64) = (400.0, 100.0);

impl Unit {
    pub fn position(&self) -> (f64, f64) {
        (
            self.x.unwrap_or(UNIT_FALLBACK_POS.0),
            self.y.unwrap_or(UNIT_FALLBACK_POS.1),
        )
    }

    pub fn current(&self) -> f64 {
        self.current_health.or(self.health).unwrap_or(0.0)
    }

    pub fn max(&self) -> f64 {
        self.max_health.or(self.health).unwrap_or_else(|| self.current())
    }

    pub fn health_fraction(&self) -> f64 {
        health_fraction(self.current(), self.max())
    }

    /// Walking towards the enemy line and not yet there.
    pub fn is_advancing(&self) -> bool {
        self.is_moving && !self.reached_enemy_base
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Enemy {
    pub id: u64,
    pub name: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub current_health: Option<f64>,
    /// Spawn health, used as the maximum.
    pub health: Option<f64>,
}

impl Enemy {
    pub fn position(&self) -> (f64, f64) {
        (
            self.x.unwrap_or(ENEMY_FALLBACK_POS.0),
            self.y.unwrap_or(ENEMY_FALLBACK_POS.1),
        )
    }

    pub fn current(&self) -> f64 {
        self.current_health.or(self.health).unwrap_or(0.0)
    }

    pub fn max(&self) -> f64 {
        self.health.unwrap_or_else(|| self.current())
    }

    pub fn health_fraction(&self) -> f64 {
        health_fraction(self.current(), self.max())
    }
}

fn health_fraction(current: f64, max: f64) -> f64 {
    if !(max > 0.0) {
        return 0.0;
    }
    (current.max(0.0) / max).clamp(0.0, 1.0)
}

/// Authoritative game state as last served by `GET /game/state`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSnapshot {
    pub player_health: i64,
    pub player_level: u32,
    pub player_exp: u64,
    pub player_max_exp: u64,
    pub wave: u32,
    pub poke_coins: u64,
    /// Unopened tokens left.
    pub pokeballs: u32,
    pub score: u64,
    pub hand: Vec<Card>,
    pub field: Vec<Unit>,
    pub enemies: Vec<Enemy>,
    pub game_over: bool,
    pub victory: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            player_health: 100,
            player_level: 1,
            player_exp: 0,
            player_max_exp: 100,
            wave: 1,
            poke_coins: 0,
            pokeballs: 0,
            score: 0,
            hand: Vec::new(),
            field: Vec::new(),
            enemies: Vec::new(),
            game_over: false,
            victory: false,
        }
    }
}

pub const PLAYER_MAX_HEALTH: f64 = 100.0;

impl GameSnapshot {
    pub fn health_fraction(&self) -> f64 {
        health_fraction(self.player_health as f64, PLAYER_MAX_HEALTH)
    }

    pub fn exp_fraction(&self) -> f64 {
        health_fraction(self.player_exp as f64, self.player_max_exp.max(1) as f64)
    }

    pub fn card(&self, id: u64) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == id)
    }

    pub fn enemy(&self, id: u64) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}

/// End-of-game figures shown in the overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSummary {
    #[serde(alias = "poke_coins_earned")]
    pub coins_earned: u64,
    pub waves_completed: u32,
    pub enemies_defeated: u64,
}

impl GameSummary {
    /// Rough figures derived from the last snapshot when `POST /game/end` fails.
    pub fn estimate(snapshot: Option<&GameSnapshot>) -> Self {
        match snapshot {
            Some(s) => Self {
                coins_earned: s.poke_coins,
                waves_completed: s.wave.saturating_sub(1),
                enemies_defeated: s.score / 10,
            },
            None => Self::default(),
        }
    }
}

/// What the end-of-game overlay displays.
#[derive(Clone, Debug, PartialEq)]
pub struct GameOutcome {
    pub victory: bool,
    pub summary: GameSummary,
    /// Account balance after the game, when known.
    pub total_coins: Option<u64>,
    /// True when `summary` was estimated locally.
    pub estimated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_snapshot_gets_sensible_defaults() {
        let snap: GameSnapshot = serde_json::from_str(
            r#"{"player_health": 80, "field": [{"name": "Pikachu", "current_health": 30}],
                "enemies": [{"id": 4, "name": "Zubat", "current_health": 12}]}"#,
        )
        .unwrap();
        assert_eq!(snap.player_level, 1);
        assert_eq!(snap.wave, 1);
        assert_eq!(snap.player_max_exp, 100);
        assert!(!snap.game_over);
        let unit = &snap.field[0];
        assert_eq!(unit.max(), 30.0);
        assert_eq!(unit.health_fraction(), 1.0);
        assert_eq!(unit.position(), UNIT_FALLBACK_POS);
        assert_eq!(snap.enemies[0].max(), 12.0);
    }

    #[test]
    fn unit_max_health_prefers_explicit_then_card_health() {
        let u = Unit {
            current_health: Some(25.0),
            health: Some(50.0),
            ..Default::default()
        };
        assert_eq!(u.max(), 50.0);
        assert_eq!(u.health_fraction(), 0.5);
        let u = Unit {
            current_health: Some(25.0),
            max_health: Some(100.0),
            health: Some(50.0),
            ..Default::default()
        };
        assert_eq!(u.max(), 100.0);
    }

    #[test]
    fn health_fraction_is_clipped() {
        let over = Enemy {
            current_health: Some(150.0),
            health: Some(100.0),
            ..Default::default()
        };
        assert_eq!(over.health_fraction(), 1.0);
        let dead = Enemy {
            current_health: Some(-5.0),
            health: Some(100.0),
            ..Default::default()
        };
        assert_eq!(dead.health_fraction(), 0.0);
        let empty = Enemy::default();
        assert_eq!(empty.health_fraction(), 0.0);
    }

    #[test]
    fn card_typings_accept_both_shapes() {
        let single: Card =
            serde_json::from_str(r#"{"id": 1, "name": "Charmander", "element": "fire"}"#).unwrap();
        assert_eq!(single.typings(), vec![Element::Fire]);
        assert_eq!(single.level(), 1);
        let dual: Card = serde_json::from_str(
            r#"{"id": 2, "name": "Zubat", "elements": ["poison", "flying", "dark"], "rarity": "rare"}"#,
        )
        .unwrap();
        assert_eq!(dual.typings(), vec![Element::Poison, Element::Flying]);
        assert_eq!(dual.rarity, Rarity::Rare);
        let odd: Card =
            serde_json::from_str(r#"{"id": 3, "element": "ice", "rarity": "mythic"}"#).unwrap();
        assert_eq!(odd.primary_element(), Element::Unknown);
        assert_eq!(odd.rarity, Rarity::Common);
    }

    #[test]
    fn rarity_decodes_known_names_and_falls_back_to_common() {
        let decode = |raw: &str| serde_json::from_str::<Rarity>(raw).unwrap();
        assert_eq!(decode(r#""common""#), Rarity::Common);
        assert_eq!(decode(r#""uncommon""#), Rarity::Uncommon);
        assert_eq!(decode(r#""legendary""#), Rarity::Legendary);
        assert_eq!(decode(r#""shiny""#), Rarity::Common);
        let missing: Card = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert_eq!(missing.rarity, Rarity::Common);
    }

    #[test]
    fn summary_accepts_server_field_names_and_estimates() {
        let s: GameSummary = serde_json::from_str(
            r#"{"poke_coins_earned": 42, "waves_completed": 3, "enemies_defeated": 17, "score": 255}"#,
        )
        .unwrap();
        assert_eq!(s.coins_earned, 42);
        assert_eq!(s.enemies_defeated, 17);

        let snap = GameSnapshot {
            poke_coins: 9,
            wave: 4,
            score: 125,
            ..Default::default()
        };
        let est = GameSummary::estimate(Some(&snap));
        assert_eq!(est.coins_earned, 9);
        assert_eq!(est.waves_completed, 3);
        assert_eq!(est.enemies_defeated, 12);
        assert_eq!(GameSummary::estimate(None), GameSummary::default());
    }
}
