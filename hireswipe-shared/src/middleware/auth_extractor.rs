use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AuthUser, Claims, UserRole};

/// Router state that knows the HS256 secret used to validate access tokens.
pub trait JwtSecret {
    fn jwt_secret(&self) -> &str;
}

impl<T: JwtSecret> JwtSecret for Arc<T> {
    fn jwt_secret(&self) -> &str {
        (**self).jwt_secret()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: JwtSecret + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = validate_jwt(&token, state.jwt_secret())?;

        if claims.is_expired() {
            return Err(AppError::new(ErrorCode::TokenExpired, "token has expired"));
        }

        Ok(AuthUser::from(claims))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::unauthorized("missing authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("invalid authorization header"))?;

    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(AppError::unauthorized("authorization header must use Bearer scheme")),
    }
}

pub fn validate_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::new(ErrorCode::TokenExpired, "token has expired")
        }
        _ => AppError::new(ErrorCode::TokenInvalid, format!("invalid token: {e}")),
    })?;

    Ok(token_data.claims)
}

/// Require an employer account
pub struct EmployerUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for EmployerUser
where
    S: JwtSecret + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Employer {
            return Err(AppError::new(ErrorCode::NotAnEmployer, "must be an employer"));
        }
        Ok(Self(user))
    }
}

/// Require an applicant account
pub struct ApplicantUser(pub AuthUser);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ApplicantUser
where
    S: JwtSecret + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Applicant {
            return Err(AppError::new(ErrorCode::NotAnApplicant, "must be an applicant"));
        }
        Ok(Self(user))
    }
}
