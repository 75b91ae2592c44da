//! Base-URL resolution: local development endpoint when running against a
//! loopback origin, the deployed backend otherwise.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Local Flask development server.
pub const LOCAL_BASE: &str = "http://localhost:5000";
/// Deployed production backend.
pub const PRODUCTION_BASE: &str =
    "https://car-price-predictor-production-c712.up.railway.app";

const ENV_API_BASE: &str = "PRICELENS_API_BASE";
const ENV_ORIGIN: &str = "PRICELENS_ORIGIN";

/// Picks the base URL for a given origin. Loopback hostnames get the local
/// endpoint, everything else the production one. Never fails: an origin that
/// does not parse as a URL is treated as a bare hostname, and an empty origin
/// falls through to production.
pub fn resolve_base(origin: &str) -> String {
    let host = match Url::parse(origin) {
        Ok(url) => url.host_str().map(|h| h.to_string()),
        Err(_) => Some(origin.trim().to_string()),
    };

    let base = match host.as_deref() {
        Some("localhost") | Some("127.0.0.1") => LOCAL_BASE,
        _ => PRODUCTION_BASE,
    };

    debug!(origin = origin, base = base, "Resolved API base");
    base.to_string()
}

/// Joins a base URL and a path without doubling slashes.
pub fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Process-wide configuration, resolved once at startup and injected into
/// the client rather than read from a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base: String,
}

impl Config {
    /// Resolution order: explicit base override, then the resolver applied
    /// to the configured origin, then the resolver's production default.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let api_base = std::env::var(ENV_API_BASE)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                let origin = std::env::var(ENV_ORIGIN).unwrap_or_default();
                resolve_base(&origin)
            });

        Self { api_base }
    }

    pub fn with_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}
