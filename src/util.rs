// Console logging helpers. Off-wasm (native tests) these go to stderr so no JS import is touched.

#[cfg(target_arch = "wasm32")]
pub fn clog(msg: &str) {
    gloo::console::log!(msg);
}

#[cfg(target_arch = "wasm32")]
pub fn cwarn(msg: &str) {
    gloo::console::warn!(msg);
}

#[cfg(target_arch = "wasm32")]
pub fn cerror(msg: &str) {
    gloo::console::error!(msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clog(msg: &str) {
    eprintln!("[log] {msg}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cwarn(msg: &str) {
    eprintln!("[warn] {msg}");
}

#[cfg(not(target_arch = "wasm32"))]
pub fn cerror(msg: &str) {
    eprintln!("[error] {msg}");
}

/// First `max` characters of a name, for canvas labels.
pub fn short_label(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}
