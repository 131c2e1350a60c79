use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::claims::Claims;
use crate::{config::JwtConfig, state::AppState};

/// Signing and verification keys for session tokens (HS256).
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.keys.clone()
    }
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            ttl: Duration::hours(cfg.ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i32) -> anyhow::Result<String> {
        self.issue_at(user_id, OffsetDateTime::now_utc())
    }

    /// Signs a token as if it had been issued at `issued_at`.
    pub fn issue_at(&self, user_id: i32, issued_at: OffsetDateTime) -> anyhow::Result<String> {
        let exp = issued_at + self.ttl;
        let claims = Claims {
            user_id,
            iat: issued_at.unix_timestamp().max(0) as usize,
            exp: exp.unix_timestamp().max(0) as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        debug!(user_id = data.claims.user_id, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_hours: 24,
        })
    }

    #[test]
    fn sign_and_verify_token() {
        let keys = make_keys("dev-secret");
        let token = keys.issue(7).expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn claim_set_uses_user_id_key() {
        let keys = make_keys("dev-secret");
        let token = keys.issue(3).expect("sign");
        let data = decode::<serde_json::Value>(&token, &keys.decoding, &Validation::default())
            .expect("decode raw claims");
        assert_eq!(data.claims["userId"], 3);
        assert!(data.claims.get("exp").is_some());
    }

    #[test]
    fn token_still_valid_one_hour_after_issue() {
        let keys = make_keys("dev-secret");
        let issued = OffsetDateTime::now_utc() - Duration::hours(1);
        let token = keys.issue_at(11, issued).expect("sign");
        assert_eq!(keys.verify(&token).expect("verify").user_id, 11);
    }

    #[test]
    fn token_rejected_twenty_five_hours_after_issue() {
        let keys = make_keys("dev-secret");
        let issued = OffsetDateTime::now_utc() - Duration::hours(25);
        let token = keys.issue_at(11, issued).expect("sign");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let good = make_keys("secret-a");
        let bad = make_keys("secret-b");
        let token = good.issue(1).expect("sign");
        assert!(bad.verify(&token).is_err());
        assert!(good.verify("not.a.token").is_err());
    }
}
