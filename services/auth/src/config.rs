/// Auth service configuration, loaded from environment variables exactly
/// once at startup and handed to components from there. Business logic
/// never reads the process environment itself.
#[derive(Debug)]
pub struct AuthConfig {
    /// SQLite connection URL (e.g. "sqlite://data/gatehouse.db?mode=rwc").
    pub database_url: String,
    /// TCP port to listen on (default 8080). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Public base URL verification links are built against
    /// (e.g. "https://id.example.com"). Env var: `PUBLIC_BASE_URL`.
    pub public_base_url: String,
    /// Path under the base URL the verification page lives at.
    /// Env var: `VERIFY_PATH`, default "/app/verify.html".
    pub verify_path: String,
    /// HMAC secret for signing bearer credentials.
    pub jwt_secret: String,
    /// `iss` claim stamped into every bearer credential.
    pub jwt_issuer: String,
    /// SMTP transport URL (e.g. "smtp://mail.example.com:587").
    pub smtp_url: String,
    /// From-address on challenge mails. Env var: `MAIL_SENDER`.
    pub mail_sender: String,
    /// Directory the static auth pages are served from under `/app`.
    /// Env var: `WEB_DIR`, default "web".
    pub web_dir: String,
    /// Minimum seconds between challenge issuances for one user.
    /// Env var: `CHALLENGE_DEBOUNCE_SECS`, default 180.
    pub challenge_debounce_secs: i64,
    /// Maximum age in seconds at which a challenge still verifies.
    /// Env var: `CHALLENGE_EXPIRY_SECS`, default 900.
    pub challenge_expiry_secs: i64,
}

const DEFAULT_DEBOUNCE_SECS: i64 = 180;
const DEFAULT_EXPIRY_SECS: i64 = 900;

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AuthConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            auth_port: std::env::var("AUTH_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_owned()),
            verify_path: std::env::var("VERIFY_PATH")
                .unwrap_or_else(|_| "/app/verify.html".to_owned()),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            jwt_issuer: std::env::var("JWT_ISSUER").expect("JWT_ISSUER"),
            smtp_url: std::env::var("SMTP_URL").expect("SMTP_URL"),
            mail_sender: std::env::var("MAIL_SENDER")
                .unwrap_or_else(|_| "noreply@localhost".to_owned()),
            web_dir: std::env::var("WEB_DIR").unwrap_or_else(|_| "web".to_owned()),
            challenge_debounce_secs: env_i64("CHALLENGE_DEBOUNCE_SECS", DEFAULT_DEBOUNCE_SECS),
            challenge_expiry_secs: env_i64("CHALLENGE_EXPIRY_SECS", DEFAULT_EXPIRY_SECS),
        }
    }
}
