use serde::{Deserialize, Serialize};

use crate::util::cwarn;

pub const CONFIG_STORAGE_KEY: &str = "ptd_client_config";

/// Tunables for the battle screen. Compiled-in defaults, optionally overridden from local storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub poll_interval_ms: u32,
    /// Extra poll shortly after mount to absorb first-paint races.
    pub post_mount_poll_delay_ms: u32,
    pub quit_redirect_delay_ms: u32,
    pub lobby_path: String,
    pub login_path: String,
    /// Placements are accepted for logical x in `[field_min_x, field_max_x]`.
    pub field_min_x: f64,
    pub field_max_x: f64,
    /// A second click closer than this to the pending x confirms the placement.
    pub confirm_tolerance: f64,
    /// Logical y at which the placement preview is drawn.
    pub preview_y: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "/api/v1".to_string(),
            poll_interval_ms: 1000,
            post_mount_poll_delay_ms: 500,
            quit_redirect_delay_ms: 2000,
            lobby_path: "/lobby".to_string(),
            login_path: "/login".to_string(),
            field_min_x: 50.0,
            field_max_x: 750.0,
            confirm_tolerance: 20.0,
            preview_y: 450.0,
        }
    }
}

impl ClientConfig {
    /// Defaults merged with a JSON override; a malformed override is ignored.
    pub fn from_override(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str::<ClientConfig>(raw) {
            Ok(cfg) if cfg.field_min_x < cfg.field_max_x && cfg.poll_interval_ms > 0 => cfg,
            Ok(_) => {
                cwarn("client config override rejected: inconsistent values");
                Self::default()
            }
            Err(e) => {
                cwarn(&format!("client config override ignored: {e}"));
                Self::default()
            }
        }
    }

    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|win| win.local_storage().ok().flatten())
            .and_then(|store| store.get_item(CONFIG_STORAGE_KEY).ok().flatten());
        Self::from_override(raw.as_deref())
    }
}
