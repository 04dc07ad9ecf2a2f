//! Backend URL resolution
//!
//! Precedence: explicit `--backend-url` flag, then the environment, then the
//! hardcoded production fallback. The URL is not otherwise validated.

pub const BACKEND_URL_ENV: &str = "REALESTATE_BACKEND_URL";
pub const DEFAULT_BACKEND_URL: &str = "https://real-state-1-80ov.onrender.com/api";

pub fn resolve_backend_url(flag: Option<&str>) -> String {
    flag.map(str::to_string)
        .or_else(|| {
            std::env::var(BACKEND_URL_ENV)
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}
