use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub access_token_ttl_minutes: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                port: std::env::var("APP_PORT")
                    .unwrap_or_else(|_| "8000".to_string())
                    .parse()
                    .context("APP_PORT must be a valid port number")?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be an integer")?,
            },
            auth: AuthConfig {
                secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
                access_token_ttl_minutes: std::env::var("ACCESS_TOKEN_TTL_MINUTES")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .context("ACCESS_TOKEN_TTL_MINUTES must be an integer")?,
            },
        })
    }
}
