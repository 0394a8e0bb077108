// app/src/services/session.rs

//! Resolves the caller of a request from the auth provider's signed token.

use crate::errors::{AppError, Result};
use actix_web::http::header;
use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const SESSION_COOKIE: &str = "mealsaver_session";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
  pub user_id: String,
  pub name: Option<String>,
  pub email: Option<String>,
}

/// Identity of the request's caller. Actions take it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
  Authenticated(SessionUser),
  Anonymous,
}

impl Session {
  pub fn user(&self) -> Option<&SessionUser> {
    match self {
      Session::Authenticated(user) => Some(user),
      Session::Anonymous => None,
    }
  }

  pub fn require_user(&self) -> Result<&SessionUser> {
    self.user().ok_or(AppError::Unauthenticated)
  }
}

/// Claims carried by the provider's HS256 tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
  pub sub: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  pub exp: u64,
}

pub struct SessionResolver {
  decoding_key: DecodingKey,
  validation: Validation,
}

impl SessionResolver {
  pub fn new(secret: &str) -> Self {
    Self {
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation: Validation::new(Algorithm::HS256),
    }
  }

  /// Never fails: absent or invalid credentials resolve to
  /// [`Session::Anonymous`].
  pub fn current_user(&self, req: &HttpRequest) -> Session {
    match credentials_from(req) {
      Some(token) => self.resolve_token(&token),
      None => Session::Anonymous,
    }
  }

  pub fn resolve_token(&self, token: &str) -> Session {
    match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
      Ok(data) if !data.claims.sub.trim().is_empty() => {
        debug!(user_id = %data.claims.sub, "Session resolved.");
        Session::Authenticated(SessionUser {
          user_id: data.claims.sub,
          name: data.claims.name,
          email: data.claims.email,
        })
      }
      Ok(_) => {
        warn!("Session token has an empty subject.");
        Session::Anonymous
      }
      Err(e) => {
        warn!(error = %e, "Rejected session token.");
        Session::Anonymous
      }
    }
  }
}

/// Bearer header first, then the session cookie.
fn credentials_from(req: &HttpRequest) -> Option<String> {
  let bearer = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(|token| token.trim().to_string())
    .filter(|token| !token.is_empty());

  bearer.or_else(|| {
    req
      .cookie(SESSION_COOKIE)
      .map(|c| c.value().to_string())
      .filter(|token| !token.is_empty())
  })
}
