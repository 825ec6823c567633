use crate::config::ClientConfig;
use crate::model::Card;
use crate::notify::Notice;
use crate::state::viewport::{CanvasViewport, Point};

/// Local two-step placement gesture. Never persisted, never sent except as the final commit.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Placement {
    #[default]
    Idle,
    CardSelected {
        card_id: u64,
    },
    PendingPlacement {
        card_id: u64,
        pending_x: f64,
    },
}

/// The single remote command a finished gesture produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaceCard {
    pub card_id: u64,
    pub x: f64,
}

/// What the caller should do after a transition. The machine itself does no I/O.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Notify(Notice),
    /// Card to highlight in the hand, `None` clears every highlight.
    Highlight(Option<u64>),
    Commit(PlaceCard),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldBand {
    pub min_x: f64,
    pub max_x: f64,
    pub tolerance: f64,
}

impl Default for FieldBand {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for FieldBand {
    fn from(cfg: &ClientConfig) -> Self {
        Self {
            min_x: cfg.field_min_x,
            max_x: cfg.field_max_x,
            tolerance: cfg.confirm_tolerance,
        }
    }
}

impl FieldBand {
    pub fn contains(&self, x: f64) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlacementMachine {
    state: Placement,
    band: FieldBand,
}

impl PlacementMachine {
    pub fn new(band: FieldBand) -> Self {
        Self {
            state: Placement::Idle,
            band,
        }
    }

    pub fn state(&self) -> &Placement {
        &self.state
    }

    pub fn selected_card(&self) -> Option<u64> {
        match self.state {
            Placement::Idle => None,
            Placement::CardSelected { card_id } | Placement::PendingPlacement { card_id, .. } => {
                Some(card_id)
            }
        }
    }

    pub fn pending_x(&self) -> Option<f64> {
        match self.state {
            Placement::PendingPlacement { pending_x, .. } => Some(pending_x),
            _ => None,
        }
    }

    /// Selecting from any state starts a fresh gesture; a pending placement is dropped silently.
    pub fn select(&mut self, card_id: u64, name: &str) -> Vec<Intent> {
        self.state = Placement::CardSelected { card_id };
        vec![
            Intent::Highlight(Some(card_id)),
            Intent::Notify(Notice::info(format!(
                "Selected {name}. Click on the field to place it."
            ))),
        ]
    }

    pub fn click(&mut self, screen: Point, viewport: &CanvasViewport) -> Vec<Intent> {
        let x = viewport.to_logical(screen).x.round();
        match self.state.clone() {
            Placement::Idle => vec![Intent::Notify(Notice::info(
                "Select a card first by clicking on it",
            ))],
            Placement::CardSelected { card_id } => {
                if !self.band.contains(x) {
                    return vec![reject_edge()];
                }
                self.anchor(card_id, x)
            }
            Placement::PendingPlacement { card_id, pending_x } => {
                if (x - pending_x).abs() < self.band.tolerance {
                    self.state = Placement::Idle;
                    return vec![
                        Intent::Commit(PlaceCard {
                            card_id,
                            x: pending_x,
                        }),
                        Intent::Highlight(None),
                    ];
                }
                if !self.band.contains(x) {
                    return vec![reject_edge()];
                }
                self.anchor(card_id, x)
            }
        }
    }

    fn anchor(&mut self, card_id: u64, x: f64) -> Vec<Intent> {
        self.state = Placement::PendingPlacement {
            card_id,
            pending_x: x,
        };
        vec![Intent::Notify(Notice::info(format!(
            "Click again to place at position {x}"
        )))]
    }

    pub fn cancel(&mut self) -> Vec<Intent> {
        if self.state == Placement::Idle {
            return Vec::new();
        }
        self.state = Placement::Idle;
        vec![
            Intent::Highlight(None),
            Intent::Notify(Notice::info("Card selection cancelled")),
        ]
    }

    /// Silent reset: after a rejected commit or a fresh start.
    pub fn reset(&mut self) -> Vec<Intent> {
        if self.state == Placement::Idle {
            return Vec::new();
        }
        self.state = Placement::Idle;
        vec![Intent::Highlight(None)]
    }

    /// Drop a selection whose card left the hand in the latest snapshot.
    pub fn prune(&mut self, hand: &[Card]) -> Vec<Intent> {
        match self.selected_card() {
            Some(id) if !hand.iter().any(|c| c.id == id) => self.reset(),
            _ => Vec::new(),
        }
    }
}

fn reject_edge() -> Intent {
    Intent::Notify(Notice::error(
        "Please click closer to the center of the field",
    ))
}
