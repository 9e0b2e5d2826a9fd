//! Query string extractor where the first value of a repeated key wins.

use crate::server::AppState;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use std::convert::Infallible;

/// Raw query string pairs in request order.
///
/// Never rejects: an unreadable query string yields no parameters, so the
/// handlers report missing or invalid values in their own error format.
#[derive(Debug, Clone, Default)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// First value given for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl FromIterator<(String, String)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromRequestParts<AppState> for QueryParams {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Query::<Vec<(String, String)>>::try_from_uri(&parts.uri) {
            Ok(Query(pairs)) => Ok(Self(pairs)),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unreadable query string");
                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn first_value_wins() {
        let p = params(&[("filter", "author"), ("query", "x"), ("filter", "title")]);
        assert_eq!(p.get("filter"), Some("author"));
        assert_eq!(p.get("query"), Some("x"));
        assert_eq!(p.get("page"), None);
    }

    #[test]
    fn empty_value_is_present() {
        let p = params(&[("id", "")]);
        assert_eq!(p.get("id"), Some(""));
    }
}
