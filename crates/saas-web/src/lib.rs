//! saas-starter Web Frontend
//!
//! Leptos-based WASM frontend: login/sign-up against Supabase Auth and the
//! subscription dashboard that drives Stripe checkout.

mod api;
mod app;
mod auth;
mod components;
mod config;
mod form;
mod pages;
mod session;

pub use app::App;
pub use auth::{AuthClient, AuthError, Session, SignUpOutcome, User};
pub use form::{AuthIntent, Credentials};

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
