mod api;
mod assets;
mod auth;
mod client;
mod components;
mod config;
mod model;
mod notify;
mod render;
mod state;
#[cfg(test)]
mod test_support;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
