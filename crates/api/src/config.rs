use std::path::PathBuf;

use crate::auth::session::SessionConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// `APP_ENV=production` turns on `Secure` cookies and refuses the
    /// placeholder session secret.
    pub production: bool,
    /// Session and CSRF cookie settings.
    pub session: SessionConfig,
    /// Directory uploads are written to and served from.
    pub upload_dir: PathBuf,
    /// Largest accepted upload, in bytes.
    pub max_upload_bytes: usize,
    /// Login attempts allowed per client IP within one window.
    pub login_rate_limit_max: u32,
    /// Length of the login rate-limit window in seconds.
    pub login_rate_limit_window_secs: u64,
    /// Admin account created at start-up when no user has its email yet.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

/// Credentials for the opt-in start-up admin account.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `HOST`                         | `0.0.0.0`               |
    /// | `PORT`                         | `4000`                  |
    /// | `CORS_ORIGINS`                 | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                    |
    /// | `APP_ENV`                      | `development`           |
    /// | `UPLOAD_DIR`                   | `uploads`               |
    /// | `MAX_UPLOAD_MB`                | `5`                     |
    /// | `LOGIN_RATE_LIMIT_MAX`         | `20`                    |
    /// | `LOGIN_RATE_LIMIT_WINDOW_SECS` | `600`                   |
    ///
    /// Session settings are read by [`SessionConfig::from_env`]. The admin
    /// bootstrap is enabled only when both `ADMIN_EMAIL` and `ADMIN_PASSWORD`
    /// are set.
    ///
    /// # Panics
    ///
    /// Panics on malformed numeric values so misconfiguration fails fast.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let production = std::env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let session = SessionConfig::from_env(production);

        let upload_dir =
            PathBuf::from(std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()));

        let max_upload_mb: usize = std::env::var("MAX_UPLOAD_MB")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("MAX_UPLOAD_MB must be a valid usize");

        let login_rate_limit_max: u32 = std::env::var("LOGIN_RATE_LIMIT_MAX")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .expect("LOGIN_RATE_LIMIT_MAX must be a valid u32");

        let login_rate_limit_window_secs: u64 = std::env::var("LOGIN_RATE_LIMIT_WINDOW_SECS")
            .unwrap_or_else(|_| "600".into())
            .parse()
            .expect("LOGIN_RATE_LIMIT_WINDOW_SECS must be a valid u64");

        let admin_bootstrap = match (
            std::env::var("ADMIN_EMAIL").ok().filter(|v| !v.is_empty()),
            std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty()),
        ) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                email,
                password,
                name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into()),
            }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            production,
            session,
            upload_dir,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            login_rate_limit_max,
            login_rate_limit_window_secs,
            admin_bootstrap,
        }
    }
}
