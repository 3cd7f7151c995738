//! Server Configuration
//!
//! Read once at startup. Missing credentials become empty strings; the
//! upstream service rejects the first request that needs them.

use std::path::PathBuf;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Stripe secret API key
    pub stripe_secret_key: String,

    /// Supabase project URL
    pub supabase_url: String,

    /// Supabase service-role key, used for subscription writes
    pub service_role_key: String,

    /// Listen address
    pub bind_addr: String,

    /// Directory holding the built frontend
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            stripe_secret_key: String::new(),
            supabase_url: String::new(),
            service_role_key: String::new(),
            bind_addr: "0.0.0.0:3000".into(),
            static_dir: PathBuf::from("static"),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            stripe_secret_key: lookup("STRIPE_SECRET_KEY").unwrap_or_default(),
            supabase_url: lookup("SUPABASE_URL").unwrap_or_default(),
            service_role_key: lookup("SERVICE_ROLE_KEY").unwrap_or_default(),
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            static_dir: lookup("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
        }
    }
}
