//! Session persistence
//!
//! The session lives in `localStorage` under the same key supabase-js uses,
//! so pages served by either client see each other's sign-in.

use chrono::Utc;

use crate::auth::Session;
use crate::config::{DASHBOARD_PAGE, SUPABASE_URL};

/// `sb-<project-ref>-auth-token`, the project ref being the URL's first host label
pub fn storage_key(project_url: &str) -> String {
    let host = project_url
        .split("://")
        .nth(1)
        .unwrap_or(project_url)
        .split(['/', ':'])
        .next()
        .unwrap_or_default();
    let project_ref = host.split('.').next().unwrap_or(host);
    format!("sb-{project_ref}-auth-token")
}

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the stored session, dropping it if it can't be parsed or has expired
pub fn load() -> Option<Session> {
    let storage = local_storage()?;
    let key = storage_key(SUPABASE_URL);
    let raw = storage.get_item(&key).ok().flatten()?;

    match serde_json::from_str::<Session>(&raw) {
        Ok(session) if !session.is_expired(Utc::now().timestamp()) => Some(session),
        _ => {
            let _ = storage.remove_item(&key);
            None
        }
    }
}

pub fn save(session: &Session) {
    if let (Some(storage), Ok(raw)) = (local_storage(), serde_json::to_string(session)) {
        let _ = storage.set_item(&storage_key(SUPABASE_URL), &raw);
    }
}

pub fn clear() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(&storage_key(SUPABASE_URL));
    }
}

/// Navigate the browser to `href`
pub fn redirect(href: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(href);
    }
}

/// Send an already signed-in visitor straight to the dashboard
///
/// Returns whether a redirect was issued.
pub fn bootstrap() -> bool {
    if load().is_some() {
        redirect(DASHBOARD_PAGE);
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_uses_project_ref() {
        assert_eq!(storage_key("https://abcdefgh.supabase.co"), "sb-abcdefgh-auth-token");
        assert_eq!(storage_key("https://abcdefgh.supabase.co/"), "sb-abcdefgh-auth-token");
        assert_eq!(storage_key("http://localhost:54321"), "sb-localhost-auth-token");
    }
}
