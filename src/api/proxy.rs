use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::errors::AppError;
use crate::polymarket::{QueryPairs, UpstreamError};

/// Live prices and books.
pub const LIVE_TTL: u32 = 10;
/// Markets, events, positions, trades, leaderboard.
pub const DEFAULT_TTL: u32 = 60;
pub const PROFILE_TTL: u32 = 300;
pub const TAGS_TTL: u32 = 3600;

/// How one proxied resource is labelled and cached.
#[derive(Debug, Clone, Copy)]
pub struct ProxyRoute {
    /// Metric label.
    pub name: &'static str,
    /// Used in `Failed to fetch <resource>`.
    pub resource: &'static str,
    /// Used in `<service> API error: <status>`.
    pub service: &'static str,
    pub ttl: u32,
}

impl ProxyRoute {
    /// Turn an upstream result into the proxy response.
    pub fn respond(&self, result: Result<Value, UpstreamError>) -> Result<Response, AppError> {
        metrics::counter!("proxy_requests_total", "resource" => self.name).increment(1);
        match result {
            Ok(body) => Ok(cached_json(body, self.ttl)),
            Err(e) => {
                metrics::counter!("upstream_errors_total", "resource" => self.name).increment(1);
                Err(AppError::from_upstream(self.service, self.resource, e))
            }
        }
    }
}

/// `public, s-maxage=<ttl>, stale-while-revalidate=<2*ttl>`
pub fn cache_control(ttl: u32) -> String {
    format!("public, s-maxage={ttl}, stale-while-revalidate={}", ttl * 2)
}

/// JSON body with the CDN caching hint attached.
pub fn cached_json<T: serde::Serialize>(body: T, ttl: u32) -> Response {
    let mut resp = Json(body).into_response();
    if let Ok(value) = HeaderValue::from_str(&cache_control(ttl)) {
        resp.headers_mut().insert(CACHE_CONTROL, value);
    }
    resp
}

/// Incoming query string in arrival order.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(transparent)]
pub struct ProxyQuery(pub Vec<(String, String)>);

impl ProxyQuery {
    /// First non-empty value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    pub fn require(&self, key: &str) -> Result<String, AppError> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest(format!("Missing {key} parameter")))
    }

    /// Forward only `keys`, in the order given, skipping absent ones.
    pub fn pick(&self, keys: &[&str]) -> QueryPairs {
        keys.iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v.to_string())))
            .collect()
    }

    /// `keys` with a fallback value each; explicit values win.
    pub fn pick_or(&self, keys: &[(&str, &str)]) -> QueryPairs {
        keys.iter()
            .map(|(k, default)| (k.to_string(), self.get(k).unwrap_or(*default).to_string()))
            .collect()
    }

    /// Forward everything except `skip`, then append `defaults` not already present.
    pub fn forward_all(&self, skip: &[&str], defaults: &[(&str, &str)]) -> QueryPairs {
        let mut pairs: QueryPairs = self
            .0
            .iter()
            .filter(|(k, _)| !skip.contains(&k.as_str()))
            .cloned()
            .collect();
        for (key, value) in defaults {
            if !pairs.iter().any(|(k, _)| k == key) {
                pairs.push((key.to_string(), value.to_string()));
            }
        }
        pairs
    }
}

/// Path ids are interpolated into upstream URLs; allow only plain id characters.
pub fn validate_path_id(id: &str) -> Result<&str, AppError> {
    let ok = !id.is_empty()
        && id.len() <= 128
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && id != "."
        && id != "..";
    if ok {
        Ok(id)
    } else {
        Err(AppError::BadRequest(format!("Invalid id: {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ProxyQuery {
        ProxyQuery(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn test_cache_control_doubles_ttl() {
        assert_eq!(cache_control(10), "public, s-maxage=10, stale-while-revalidate=20");
        assert_eq!(cache_control(3600), "public, s-maxage=3600, stale-while-revalidate=7200");
    }

    #[test]
    fn test_require_names_missing_param() {
        let q = query(&[("token_id", "")]);
        let err = q.require("token_id").unwrap_err();
        assert_eq!(err.to_string(), "Missing token_id parameter");
    }

    #[test]
    fn test_forward_all_appends_only_absent_defaults() {
        let q = query(&[("endpoint", "events"), ("limit", "5"), ("order", "liquidity")]);
        let pairs = q.forward_all(&["endpoint"], &[("order", "volume"), ("active", "true")]);
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("order".to_string(), "liquidity".to_string()),
                ("active".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_pick_or_prefers_explicit_values() {
        let q = query(&[("limit", "10")]);
        let pairs = q.pick_or(&[("limit", "100"), ("offset", "0")]);
        assert_eq!(pairs[0], ("limit".to_string(), "10".to_string()));
        assert_eq!(pairs[1], ("offset".to_string(), "0".to_string()));
    }

    #[test]
    fn test_validate_path_id() {
        assert!(validate_path_id("12345").is_ok());
        assert!(validate_path_id("will-btc-hit-100k").is_ok());
        assert!(validate_path_id("..").is_err());
        assert!(validate_path_id("a/b").is_err());
        assert!(validate_path_id("").is_err());
    }
}
