use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use common::Role;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("password hash error")]
    Hash,
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// HS256 key pair derived from the shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    enc: EncodingKey,
    dec: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret.as_bytes()),
            dec: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Access-token payload. `role` is a closed enum so a decoded token always
/// names a known principal kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub fn sign_access(
    keys: &JwtKeys,
    sub: Uuid,
    email: Option<&str>,
    role: Role,
    ttl_seconds: i64,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub,
        email: email.map(str::to_owned),
        role,
        iat: now,
        exp: now + ttl_seconds,
        jti: new_jti(),
    };
    Ok(encode(&Header::default(), &claims, &keys.enc)?)
}

pub fn verify(keys: &JwtKeys, token: &str) -> Result<Claims, AuthError> {
    let data = decode::<Claims>(token, &keys.dec, &Validation::default())?;
    Ok(data.claims)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AuthError::Hash)?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn new_jti() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::from_secret("test-secret")
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn user_token_round_trips_claims() {
        let keys = keys();
        let id = Uuid::new_v4();
        let token = sign_access(&keys, id, Some("a@b.com"), Role::User, 3600).unwrap();
        let claims = verify(&keys, &token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn admin_token_carries_admin_role_without_email() {
        let keys = keys();
        let token = sign_access(&keys, Uuid::new_v4(), None, Role::Admin, 3600).unwrap();
        let claims = verify(&keys, &token).unwrap();
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.email.is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        // Past the default validation leeway.
        let token = sign_access(&keys, Uuid::new_v4(), None, Role::User, -120).unwrap();
        assert!(verify(&keys, &token).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = sign_access(
            &JwtKeys::from_secret("other"),
            Uuid::new_v4(),
            None,
            Role::User,
            3600,
        )
        .unwrap();
        assert!(verify(&keys(), &token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = keys();
        let token = sign_access(&keys, Uuid::new_v4(), None, Role::User, 3600).unwrap();
        let mut tampered = token.into_bytes();
        let last = *tampered.last().unwrap();
        *tampered.last_mut().unwrap() = if last == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(verify(&keys, &tampered).is_err());
    }

    #[test]
    fn jtis_are_unique() {
        assert_ne!(new_jti(), new_jti());
    }
}
