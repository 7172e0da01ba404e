//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use mostrador_shared::{AppError, types::ActorId};

use crate::error::ApiError;

/// Header carrying the acting user's id, set by the authenticating proxy.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// The user performing a mutation, recorded on every ledger and register row.
///
/// ```ignore
/// async fn handler(actor: Actor) -> impl IntoResponse {
///     let id = actor.id();
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor(pub ActorId);

impl Actor {
    /// Returns the actor id.
    #[must_use]
    pub const fn id(self) -> ActorId {
        self.0
    }
}

fn parse_actor(value: Option<&str>) -> Result<ActorId, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Unauthorized(format!("falta el encabezado {ACTOR_HEADER}")))?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(ActorId(id)),
        _ => Err(AppError::Unauthorized(format!(
            "{ACTOR_HEADER} inválido: {raw}"
        ))),
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|h| h.to_str().ok());
        Ok(Self(parse_actor(value)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("7"), Some(7))]
    #[case(Some(" 42 "), Some(42))]
    #[case(Some("0"), None)]
    #[case(Some("-3"), None)]
    #[case(Some("cajero"), None)]
    #[case(Some(""), None)]
    #[case(None, None)]
    fn test_parse_actor(#[case] header: Option<&str>, #[case] expected: Option<i64>) {
        assert_eq!(parse_actor(header).ok().map(|a| a.0), expected);
    }
}
