pub mod app;
pub mod controls_panel;
pub mod game_over_overlay;
pub mod game_view;
pub mod hand_panel;
pub mod notifications;
pub mod stats_panel;
