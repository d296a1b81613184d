use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{config::AppConfig, error::AppError};

/// Claims
///
/// Payload expected inside a bearer JWT. Tokens are issued by the external
/// identity service that shares `JWT_SECRET` with this API; we only validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's user id. Accepts the `user_id` claim name and
    /// numeric ids as well.
    #[serde(alias = "user_id", deserialize_with = "subject")]
    pub sub: String,
    /// Expiration time (seconds since epoch). Always validated.
    pub exp: usize,
    /// Issued at.
    pub iat: usize,
    /// Administrator flag. Absent means an ordinary user.
    #[serde(default)]
    pub is_staff: bool,
}

fn subject<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSubject {
        Text(String),
        Number(i64),
    }

    Ok(match RawSubject::deserialize(deserializer)? {
        RawSubject::Text(text) => text,
        RawSubject::Number(number) => number.to_string(),
    })
}

/// AuthUser
///
/// Resolved identity of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    /// Grants write access to every content resource.
    pub is_staff: bool,
}

/// decode_bearer
///
/// Validates an HS256 token against `secret`. Expired, tampered and malformed
/// tokens are all rejected as unauthenticated.
pub fn decode_bearer(token: &str, secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::Unauthorized("Token has expired.".into()),
            _ => AppError::Unauthorized("Given token not valid.".into()),
        })
}

/// AuthUser Extractor
///
/// Pulls the `Authorization: Bearer <jwt>` header, validates it with the
/// configured secret and yields the caller's identity. Any failure rejects
/// the request with 401 before the handler runs.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized("Authentication credentials were not provided.".into())
            })?;

        let claims = decode_bearer(token.trim(), &config.jwt_secret)?;

        Ok(AuthUser {
            id: claims.sub,
            is_staff: claims.is_staff,
        })
    }
}

/// AdminUser
///
/// Requires an authenticated caller carrying the staff flag. Unauthenticated
/// callers get 401 (from [`AuthUser`]), authenticated non-staff callers 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            tracing::warn!(user_id = %user.id, "write rejected: caller is not staff");
            return Err(AppError::Forbidden(
                "You do not have permission to perform this action.".into(),
            ));
        }
        Ok(AdminUser(user))
    }
}
