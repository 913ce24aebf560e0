/// Authorization guard for the ripple server
///
/// Converts a request's credential into an identity before any handler runs.
/// Two extractor variants cover the two route classes:
///
/// - [`AuthUser`]: mandatory authentication. No credential at all is a 401
///   ("no token provided"); a credential that fails verification is a 401
///   with the specific reason.
/// - [`MaybeUser`]: optional authentication. No credential proceeds as
///   anonymous, but a credential that is present and fails verification is
///   still a 401. Publicly readable endpoints that personalize output need
///   to distinguish "nobody claimed to be logged in" from "somebody claimed
///   to be and failed".
///
/// The credential is read from the `Authorization: Bearer` header, falling
/// back to the `token` cookie set for server-rendered navigation. The header
/// wins when both are present.
pub mod permissions;

pub use permissions::*;

use crate::error::AppError;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use auth_core::{Identity, TokenCodec};
use std::future::{ready, Ready};
use std::ops::Deref;

/// Cookie mirroring the bearer token for server-rendered navigation.
pub const TOKEN_COOKIE: &str = "token";

/// Identity of an authenticated caller; extraction rejects with 401 when no
/// valid token is presented.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl Deref for AuthUser {
    type Target = Identity;

    fn deref(&self) -> &Identity {
        &self.0
    }
}

/// Identity of a caller on an optionally-authenticated route; `None` means
/// no credential was presented at all.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Identity>);

/// Pull the raw token out of the request, if one was presented.
///
/// A header that does not use the Bearer scheme counts as absent, matching
/// the mandatory guard's "no token provided" contract.
fn presented_token(req: &HttpRequest) -> Option<String> {
    let header_token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    header_token.or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AppError> {
    let codec = req
        .app_data::<web::Data<TokenCodec>>()
        .ok_or_else(|| AppError::Internal("token codec not configured".to_string()))?;

    let token = presented_token(req).ok_or(AppError::NoToken)?;

    codec.verify(&token).map_err(AppError::from)
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(AuthUser))
    }
}

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match presented_token(req) {
            None => Ok(MaybeUser(None)),
            Some(_) => authenticate(req).map(|identity| MaybeUser(Some(identity))),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App, HttpResponse};
    use auth_core::jwt::DEFAULT_TOKEN_TTL_DAYS;
    use uuid::Uuid;

    const TEST_SECRET: &str = "test-secret";

    fn test_codec(ttl_days: i64) -> TokenCodec {
        TokenCodec::new(TEST_SECRET, ttl_days)
    }

    fn issue_token(codec: &TokenCodec) -> String {
        codec
            .issue(&Identity {
                id: Uuid::new_v4(),
                email: "test@example.com".to_string(),
                username: "testuser".to_string(),
            })
            .expect("issue should succeed")
    }

    async fn whoami(user: AuthUser) -> HttpResponse {
        HttpResponse::Ok().body(user.username.clone())
    }

    async fn feed(user: MaybeUser) -> HttpResponse {
        match user.0 {
            Some(identity) => HttpResponse::Ok().body(identity.username),
            None => HttpResponse::Ok().body("anonymous"),
        }
    }

    macro_rules! init_app {
        ($codec:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($codec))
                    .route("/me", web::get().to(whoami))
                    .route("/feed", web::get().to(feed)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_mandatory_guard_accepts_valid_bearer_token() {
        let codec = test_codec(DEFAULT_TOKEN_TTL_DAYS);
        let token = issue_token(&codec);
        let app = init_app!(codec);

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        assert_eq!(body, "testuser");
    }

    #[actix_web::test]
    async fn test_mandatory_guard_rejects_missing_token() {
        let app = init_app!(test_codec(DEFAULT_TOKEN_TTL_DAYS));

        let req = test::TestRequest::get().uri("/me").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "no token provided");
    }

    #[actix_web::test]
    async fn test_mandatory_guard_treats_non_bearer_scheme_as_missing() {
        let app = init_app!(test_codec(DEFAULT_TOKEN_TTL_DAYS));

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, "Basic dXNlcjpwYXNz"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "no token provided");
    }

    #[actix_web::test]
    async fn test_mandatory_guard_rejects_expired_token() {
        let expired_codec = test_codec(-1);
        let token = issue_token(&expired_codec);
        let app = init_app!(test_codec(DEFAULT_TOKEN_TTL_DAYS));

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "token expired");
    }

    #[actix_web::test]
    async fn test_mandatory_guard_rejects_tampered_token() {
        let codec = test_codec(DEFAULT_TOKEN_TTL_DAYS);
        let token = issue_token(&codec).replace('a', "b");
        let app = init_app!(codec);

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid token");
    }

    #[actix_web::test]
    async fn test_mandatory_guard_accepts_cookie_mirror() {
        let codec = test_codec(DEFAULT_TOKEN_TTL_DAYS);
        let token = issue_token(&codec);
        let app = init_app!(codec);

        let req = test::TestRequest::get()
            .uri("/me")
            .cookie(actix_web::cookie::Cookie::new(TOKEN_COOKIE, token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_optional_guard_is_anonymous_without_credential() {
        let app = init_app!(test_codec(DEFAULT_TOKEN_TTL_DAYS));

        let req = test::TestRequest::get().uri("/feed").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        assert_eq!(body, "anonymous");
    }

    #[actix_web::test]
    async fn test_optional_guard_attaches_identity_with_valid_token() {
        let codec = test_codec(DEFAULT_TOKEN_TTL_DAYS);
        let token = issue_token(&codec);
        let app = init_app!(codec);

        let req = test::TestRequest::get()
            .uri("/feed")
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 200);
        let body = test::read_body(resp).await;
        assert_eq!(body, "testuser");
    }

    #[actix_web::test]
    async fn test_optional_guard_still_rejects_bad_token() {
        // Presence of a bad credential is always an error; absence is not.
        let app = init_app!(test_codec(DEFAULT_TOKEN_TTL_DAYS));

        let req = test::TestRequest::get()
            .uri("/feed")
            .insert_header((AUTHORIZATION, "Bearer not.a.token"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "invalid token");
    }
}
