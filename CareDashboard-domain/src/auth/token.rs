use thiserror::Error;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::env;
use tracing::{debug, error, info};
use chrono::{Duration, Utc};
use crate::auth::Claims;

/// Default issuer for tokens minted by this service
pub const DEFAULT_ISSUER: &str = "care-dashboard-api";

/// Security errors for authentication and token operations
#[derive(Debug, Error)]
pub enum SecurityError {
    /// JWT validation error
    #[error("Token validation error: {0}")]
    TokenValidation(String),

    /// Expired token
    #[error("Token has expired")]
    TokenExpired,

    /// Invalid token structure
    #[error("Invalid token format")]
    InvalidToken,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Invalid audience
    #[error("Invalid token audience")]
    InvalidAudience,

    /// Configuration error
    #[error("Security configuration error: {0}")]
    ConfigError(String),
}

fn jwt_secret() -> Result<String, SecurityError> {
    env::var("JWT_SECRET").map_err(|e| {
        error!("JWT_SECRET environment variable not found: {}", e);
        SecurityError::ConfigError("JWT_SECRET environment variable not found".to_string())
    })
}

fn jwt_issuer() -> String {
    env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string())
}

/// Lifetime of access tokens (`ACCESS_TOKEN_EXPIRATION_MINUTES`, default 15)
pub fn access_token_lifetime() -> Duration {
    let minutes = env::var("ACCESS_TOKEN_EXPIRATION_MINUTES")
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .unwrap_or(15);

    Duration::minutes(minutes)
}

/// Generate a signed access token for a user
pub fn generate_access_token(
    user_id: &str,
    roles: &[String],
    email: Option<&str>,
) -> Result<String, SecurityError> {
    let jwt_secret = jwt_secret()?;

    let now = Utc::now();
    let expiration = now + access_token_lifetime();

    let claims = Claims {
        sub: user_id.to_string(),
        iss: jwt_issuer(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
        email: email.map(String::from),
        roles: roles.to_vec(),
        app_metadata: None,
        user_metadata: None,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    ).map_err(|e| {
        error!("Failed to encode JWT token: {}", e);
        SecurityError::TokenValidation(e.to_string())
    })?;

    // Never log the token itself
    info!("Generated access token for user {}", user_id);
    debug!("Token expiration: {}", expiration);

    Ok(token)
}

/// Validate a JWT token and return the decoded claims
///
/// The audience is only checked when `JWT_AUDIENCE` is set (Supabase tokens
/// carry `aud = "authenticated"`).
pub fn validate_token(token: &str) -> Result<Claims, SecurityError> {
    let jwt_secret = jwt_secret()?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_issuer(&[jwt_issuer()]);

    match env::var("JWT_AUDIENCE") {
        Ok(audience) => validation.set_audience(&[audience]),
        Err(_) => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &validation,
    ).map_err(|e| {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
            ErrorKind::InvalidToken => SecurityError::InvalidToken,
            ErrorKind::InvalidIssuer => SecurityError::InvalidIssuer,
            ErrorKind::InvalidAudience => SecurityError::InvalidAudience,
            ErrorKind::InvalidSignature => SecurityError::TokenValidation("Invalid signature".to_string()),
            _ => SecurityError::TokenValidation(e.to_string()),
        }
    })?;

    Ok(token_data.claims)
}
