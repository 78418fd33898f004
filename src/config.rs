use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    /// Secret used to sign session tokens (HS256)
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub token_ttl_secs: u64,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
    pub resend_api_key: Option<String>,
    pub email_from: String,
    /// POST notification payloads here instead of sending email
    pub email_webhook_url: Option<String>,
    /// Enable/disable outbound notifications entirely
    pub email_enabled: bool,
    pub dev_mode: bool,
}

const DEV_JWT_SECRET: &str = "tableside-dev-secret-do-not-use-in-production";

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("TABLESIDE_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8091);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, falling back to the development signing key");
            DEV_JWT_SECRET.to_string()
        });

        let token_ttl_secs: u64 = env::var("TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(86400);

        let bcrypt_cost: u32 = env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(bcrypt::DEFAULT_COST);

        let email_enabled = env::var("EMAIL_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "tableside.db".to_string()),
            jwt_secret,
            token_ttl_secs,
            bcrypt_cost,
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@tableside.local".to_string()),
            email_webhook_url: env::var("EMAIL_WEBHOOK_URL").ok(),
            email_enabled,
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
