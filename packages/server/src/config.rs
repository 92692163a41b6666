use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of the session cookie and the JWT inside it.
    pub session_ttl_days: i64,
    /// Mark session cookies `Secure`. Disable only for plain-HTTP development.
    pub secure_cookies: bool,
}

/// GitHub OAuth application settings.
#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub authorize_url: String,
    pub token_url: String,
    pub api_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub github: GithubConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.session_ttl_days", 7)?
            .set_default("auth.secure_cookies", true)?
            .set_default("github.authorize_url", "https://github.com/login/oauth/authorize")?
            .set_default("github.token_url", "https://github.com/login/oauth/access_token")?
            .set_default("github.api_url", "https://api.github.com")?
            .set_default(
                "github.redirect_url",
                "http://127.0.0.1:3000/auth/github/callback",
            )?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., HUB__GITHUB__CLIENT_SECRET)
            .add_source(Environment::with_prefix("HUB").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
