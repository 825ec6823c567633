// Best-effort sprite cache keyed by lowercase entity name.

use std::collections::HashMap;

use web_sys::HtmlImageElement;

use crate::util::cwarn;

pub const BACKGROUND_KEY: &str = "battlefield";

const UNIT_SPRITES: [&str; 10] = [
    "charmander",
    "squirtle",
    "bulbasaur",
    "pikachu",
    "jigglypuff",
    "meowth",
    "psyduck",
    "growlithe",
    "abra",
    "machop",
];
const ENEMY_SPRITES: [&str; 4] = ["rattata", "spearow", "zubat", "geodude"];

/// Readiness query the renderer consults before drawing any image.
pub trait AssetSource {
    fn is_ready(&self, key: &str) -> bool;
}

pub fn sprite_key(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, HtmlImageElement>,
}

impl ImageCache {
    pub fn preload() -> Self {
        let mut cache = Self::default();
        cache.load(BACKGROUND_KEY, "/static/images/backgrounds/battlefield.jpg");
        for name in UNIT_SPRITES {
            cache.load(name, &format!("/static/images/pokemons/{name}.png"));
        }
        for name in ENEMY_SPRITES {
            cache.load(name, &format!("/static/images/enemies/{name}.png"));
        }
        cache
    }

    fn load(&mut self, key: &str, src: &str) {
        match HtmlImageElement::new() {
            Ok(img) => {
                img.set_src(src);
                self.images.insert(key.to_string(), img);
            }
            Err(_) => cwarn(&format!("could not create image element for {key}")),
        }
    }

    /// The image, only once it has fully decoded.
    pub fn ready(&self, key: &str) -> Option<&HtmlImageElement> {
        self.images
            .get(key)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

impl AssetSource for ImageCache {
    fn is_ready(&self, key: &str) -> bool {
        self.ready(key).is_some()
    }
}
