use crate::{
    model::{
        Id,
        user::{Password, Role, User, UserMarker},
    },
    util::PositiveDuration,
};
use argon2::{
    Argon2, PasswordHash as ArgonPasswordHash,
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString},
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use thiserror::Error;
use time::{Duration, UtcDateTime};

pub const PASSWORD_SALT_LEN: usize = 16;
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::hours(1);

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("Hashing password failed: {0}")]
pub struct PasswordHashError(password_hash::Error);

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token inválido: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("A validade do token ultrapassa o intervalo de datas suportado: {0}")]
    ExpiryOutOfRange(Duration),
}

/// Argon2 hash of a password in PHC string format.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn generate(password: &Password) -> Result<Self, PasswordHashError> {
        let salt: [u8; PASSWORD_SALT_LEN] = rand::random();
        let salt = SaltString::encode_b64(&salt).map_err(PasswordHashError)?;

        let hash = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(PasswordHashError)?;

        Ok(Self(hash.to_string()))
    }

    pub fn verify(&self, password: &Password) -> Result<bool, PasswordHashError> {
        let parsed = ArgonPasswordHash::new(&self.0).map_err(PasswordHashError)?;

        match Argon2::default().verify_password(password.expose().as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError(err)),
        }
    }
}

impl Debug for PasswordHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[redacted]").finish()
    }
}

/// A stored user together with the hash their password is checked against.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Id<UserMarker>,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// A signed bearer token together with the moment it stops being accepted.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: UtcDateTime,
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Signs and verifies bearer tokens with a shared secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: PositiveDuration,
}

impl TokenKeys {
    #[must_use]
    pub fn new(secret: &[u8], lifetime: PositiveDuration) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    pub fn issue(&self, user_id: Id<UserMarker>, role: Role) -> Result<AuthToken, TokenError> {
        self.issue_at(user_id, role, UtcDateTime::now())
    }

    pub fn issue_at(
        &self,
        user_id: Id<UserMarker>,
        role: Role,
        issued_at: UtcDateTime,
    ) -> Result<AuthToken, TokenError> {
        let lifetime = self.lifetime.get();
        let expires_at = issued_at
            .checked_add(lifetime)
            .ok_or(TokenError::ExpiryOutOfRange(lifetime))?;
        let claims = Claims {
            sub: user_id,
            role,
            iat: issued_at.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding)?;

        Ok(AuthToken { token, expires_at })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;

        Ok(data.claims)
    }
}

impl Debug for TokenKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("keys", &"[redacted]")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
