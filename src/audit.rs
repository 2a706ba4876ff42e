//! Acting-user extraction and the audit stamp applied on every write of an
//! auditable entity (leagues, teams, players).

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Utc};

/// Header carrying the acting user's name.
pub const ACTOR_HEADER: &str = "X-User-Name";

/// Actor recorded when the header is absent.
pub const UNKNOWN_ACTOR: &str = "unknown";

/// Actor recorded on rows written by the seeder.
pub const SEED_ACTOR: &str = "seed";

/// The user a mutation is attributed to, from `X-User-Name`.
#[derive(Clone, Debug)]
pub struct Actor(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_ACTOR.to_string());
        Ok(Actor(value))
    }
}

/// Audit values bound alongside a write: created columns on insert, updated
/// columns on both insert and update.
#[derive(Clone, Debug)]
pub struct Stamp {
    pub at: DateTime<Utc>,
    pub by: String,
}

impl Stamp {
    pub fn new(by: &str) -> Self {
        Self {
            at: Utc::now(),
            by: by.to_string(),
        }
    }
}

impl From<&Actor> for Stamp {
    fn from(actor: &Actor) -> Self {
        Stamp::new(&actor.0)
    }
}
