use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    application::interfaces::security::{TokenKind, TokenService},
    config::config_model::{TokenLifetime, UserSecret},
};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub token_type: String,
    pub iat: usize,
    pub exp: usize,
}

fn token_type(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Access => "access",
        TokenKind::Refresh => "refresh",
    }
}

/// HS256 access/refresh pair, each kind signed with its own secret.
pub struct JwtTokenService {
    user_secret: UserSecret,
    token_lifetime: TokenLifetime,
}

impl JwtTokenService {
    pub fn new(user_secret: UserSecret, token_lifetime: TokenLifetime) -> Self {
        Self {
            user_secret,
            token_lifetime,
        }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.user_secret.secret.as_bytes(),
            TokenKind::Refresh => self.user_secret.refresh_secret.as_bytes(),
        }
    }

    fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => Duration::seconds(self.token_lifetime.access),
            TokenKind::Refresh => Duration::seconds(self.token_lifetime.refresh),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: i64, kind: TokenKind) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            token_type: token_type(kind).to_string(),
            iat: now.timestamp().max(0) as usize,
            exp: (now + self.lifetime(kind)).timestamp().max(0) as usize,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )?;

        Ok(token)
    }

    fn verify(&self, token: &str, kind: TokenKind) -> Result<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(self.secret(kind)), &validation)
            .map_err(|e| anyhow!("JWT validation failed: {}", e))?
            .claims;

        if claims.token_type != token_type(kind) {
            return Err(anyhow!("Expected {} token, got {}", token_type(kind), claims.token_type));
        }

        claims
            .sub
            .parse::<i64>()
            .map_err(|_| anyhow!("Invalid user id in token"))
    }
}
