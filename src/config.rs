use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the PostgREST instance everything is forwarded to.
    pub postgrest_url: String,
    /// Port this service listens on.
    pub port: u16,
    /// Directory uploaded product images are written to and served from.
    pub images_dir: String,
    /// Inactivity period after which a session is logged out.
    pub idle_timeout: Duration,
    /// How long before logout the warning fires.
    pub idle_warning: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let postgrest_url = env::var("POSTGREST_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let images_dir = env::var("IMAGES_DIR").unwrap_or_else(|_| "images".to_string());
        let idle_timeout = env::var("IDLE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(900));
        let idle_warning = env::var("IDLE_WARNING_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(60));

        Self {
            postgrest_url,
            port,
            images_dir,
            idle_timeout,
            idle_warning,
        }
    }
}
