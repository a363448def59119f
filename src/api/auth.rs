use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::AppState;

/// Authenticated caller, inserted into request extensions by [`require_user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Bearer-token authentication middleware for `/api/me`.
///
/// With `AUTH_JWT_SECRET` set, the token must be an HS256 JWT issued by the
/// auth provider and its `sub` is the user id. Without it (dev mode) the
/// token itself must be a UUID and is taken as the user id.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user_id = resolve_user(header, state.config.auth_jwt_secret.as_deref())?;
    req.extensions_mut().insert(AuthUser(user_id));

    Ok(next.run(req).await)
}

/// Map an `Authorization` header value to a user id.
pub fn resolve_user(header: Option<&str>, jwt_secret: Option<&str>) -> Result<Uuid, AppError> {
    let token = header
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let subject = match jwt_secret {
        Some(secret) => {
            let mut validation = Validation::new(Algorithm::HS256);
            validation.validate_aud = false;
            let data = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
                .map_err(|e| {
                    tracing::debug!(error = %e, "Rejected bearer token");
                    AppError::Unauthorized
                })?;
            data.claims.sub
        }
        None => token.to_string(),
    };

    Uuid::parse_str(&subject).map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    const SECRET: &str = "test-secret";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        exp: u64,
        aud: &'a str,
    }

    fn token(sub: &str, secret: &str, exp: u64) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &TestClaims { sub, exp, aud: "authenticated" },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> u64 {
        (chrono::Utc::now().timestamp() + 3_600) as u64
    }

    #[test]
    fn test_dev_mode_accepts_uuid_bearer() {
        let id = Uuid::new_v4();
        let header = format!("Bearer {id}");
        assert_eq!(resolve_user(Some(&header), None).unwrap(), id);
    }

    #[test]
    fn test_missing_or_malformed_header_rejected() {
        assert!(matches!(resolve_user(None, None), Err(AppError::Unauthorized)));
        assert!(matches!(resolve_user(Some("Basic abc"), None), Err(AppError::Unauthorized)));
        assert!(matches!(resolve_user(Some("Bearer not-a-uuid"), None), Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_jwt_subject_becomes_user_id() {
        let id = Uuid::new_v4();
        let header = format!("Bearer {}", token(&id.to_string(), SECRET, far_future()));
        assert_eq!(resolve_user(Some(&header), Some(SECRET)).unwrap(), id);
    }

    #[test]
    fn test_jwt_wrong_secret_or_expired_rejected() {
        let id = Uuid::new_v4().to_string();
        let forged = format!("Bearer {}", token(&id, "other", far_future()));
        assert!(resolve_user(Some(&forged), Some(SECRET)).is_err());

        let expired = format!("Bearer {}", token(&id, SECRET, 1_000));
        assert!(resolve_user(Some(&expired), Some(SECRET)).is_err());
    }

    #[test]
    fn test_raw_uuid_rejected_when_jwt_configured() {
        let header = format!("Bearer {}", Uuid::new_v4());
        assert!(resolve_user(Some(&header), Some(SECRET)).is_err());
    }
}
