use crate::auth::jwt::JwtConfig;

/// Default lifetime of a review invitation.
const DEFAULT_REVIEW_TTL_HOURS: i64 = ecoride_core::review_token::DEFAULT_TTL_HOURS;

/// Upper bound on the invitation lifetime (one year).
const MAX_REVIEW_TTL_HOURS: i64 = 24 * 366;

/// Default link prefix used in review invitation emails.
const DEFAULT_REVIEW_BASE_URL: &str = "http://localhost:5173/reviews/new";

/// Server configuration loaded from environment variables.
///
/// All optional fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Review invitation signing and links.
    pub review: ReviewConfig,
}

/// Settings for review invitation tokens.
#[derive(Debug, Clone)]
pub struct ReviewConfig {
    /// HMAC key for invitation tokens.
    pub token_secret: String,
    pub token_ttl_hours: i64,
    /// Link prefix; the token is appended as `?token=`.
    pub base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                             |
    /// |--------------------------|-------------------------------------|
    /// | `HOST`                   | `0.0.0.0`                           |
    /// | `PORT`                   | `3000`                              |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`             |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                                |
    /// | `JWT_SECRET`             | required                            |
    /// | `JWT_ACCESS_EXPIRY_MINS` | `60`                                |
    /// | `REVIEW_TOKEN_SECRET`    | required                            |
    /// | `REVIEW_TOKEN_TTL_HOURS` | `168`                               |
    /// | `REVIEW_BASE_URL`        | `http://localhost:5173/reviews/new` |
    ///
    /// # Panics
    ///
    /// Panics on malformed numbers or a missing secret. Misconfiguration
    /// fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
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

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            review: ReviewConfig::from_env(),
        }
    }
}

impl ReviewConfig {
    pub fn from_env() -> Self {
        let token_secret = std::env::var("REVIEW_TOKEN_SECRET")
            .expect("REVIEW_TOKEN_SECRET must be set in the environment");
        assert!(!token_secret.is_empty(), "REVIEW_TOKEN_SECRET must not be empty");

        let token_ttl_hours = parse_ttl_hours(
            &std::env::var("REVIEW_TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| DEFAULT_REVIEW_TTL_HOURS.to_string()),
        )
        .expect("REVIEW_TOKEN_TTL_HOURS must be an integer number of hours");

        let base_url =
            std::env::var("REVIEW_BASE_URL").unwrap_or_else(|_| DEFAULT_REVIEW_BASE_URL.into());

        Self {
            token_secret,
            token_ttl_hours,
            base_url,
        }
    }
}

/// Parse an invitation lifetime, accepting `1..=MAX_REVIEW_TTL_HOURS`.
fn parse_ttl_hours(raw: &str) -> Result<i64, String> {
    let hours: i64 = raw
        .trim()
        .parse()
        .map_err(|e| format!("'{raw}' is not an integer: {e}"))?;
    if !(1..=MAX_REVIEW_TTL_HOURS).contains(&hours) {
        return Err(format!("{hours} is outside 1..={MAX_REVIEW_TTL_HOURS} hours"));
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_accepts_the_default_and_the_bounds() {
        assert_eq!(
            parse_ttl_hours(&DEFAULT_REVIEW_TTL_HOURS.to_string()),
            Ok(DEFAULT_REVIEW_TTL_HOURS)
        );
        assert_eq!(parse_ttl_hours("1"), Ok(1));
        assert_eq!(parse_ttl_hours(" 48 "), Ok(48));
        assert_eq!(
            parse_ttl_hours(&MAX_REVIEW_TTL_HOURS.to_string()),
            Ok(MAX_REVIEW_TTL_HOURS)
        );
    }

    #[test]
    fn ttl_rejects_values_that_would_overflow_or_never_live() {
        for raw in ["0", "-5", "9223372036854775807", "8785", "a week"] {
            assert!(parse_ttl_hours(raw).is_err(), "{raw} should be rejected");
        }
    }
}
