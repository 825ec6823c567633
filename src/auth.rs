// Session guard. The battle screen is only ever built after `require_session` passes.

use crate::util::clog;

pub const TOKEN_STORAGE_KEY: &str = "token";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|win| win.local_storage().ok().flatten())
}

pub fn stored_token() -> Option<String> {
    storage()
        .and_then(|store| store.get_item(TOKEN_STORAGE_KEY).ok().flatten())
        .filter(|t| !t.is_empty())
}

pub fn clear_token() {
    if let Some(store) = storage() {
        let _ = store.remove_item(TOKEN_STORAGE_KEY);
    }
}

pub fn redirect(path: &str) {
    if let Some(win) = web_sys::window() {
        let _ = win.location().set_href(path);
    }
}

/// Returns the bearer token, or redirects to the login page and returns `None`.
pub fn require_session(login_path: &str) -> Option<String> {
    let token = stored_token();
    if token.is_none() {
        clog("no session token, redirecting to login");
        redirect(login_path);
    }
    token
}
