use axum::response::{IntoResponse, Redirect, Response};

use super::cookies::{clearing_cookie, session_cookie, CookieJar, SESSION_COOKIE_NAME};
use crate::crypto::token::TokenCodec;
use crate::error::Result;
use crate::models::session::{Identity, SessionClaims};

/// Where unauthenticated page requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// The per-request view the session accessor works on.
pub struct RequestContext<'a> {
    cookies: &'a dyn CookieJar,
}

impl<'a> RequestContext<'a> {
    pub fn new(cookies: &'a dyn CookieJar) -> Self {
        Self { cookies }
    }

    pub fn cookies(&self) -> &dyn CookieJar {
        self.cookies
    }
}

/// Returned by [`SessionAccessor::require_identity`] when there is no valid session.
///
/// The caller decides how to transfer control; as a response it is a `303 See Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRedirect {
    pub target: &'static str,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(self.target).into_response()
    }
}

/// Derives the session of a request from its cookie alone.
///
/// There is no server-side session table: every request re-verifies the token.
#[derive(Clone)]
pub struct SessionAccessor {
    codec: TokenCodec,
    secure_cookies: bool,
}

impl SessionAccessor {
    pub fn new(codec: TokenCodec, secure_cookies: bool) -> Self {
        Self {
            codec,
            secure_cookies,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Reads and verifies the session cookie.
    ///
    /// # Returns
    ///
    /// The verified claim, or `None` when the cookie is missing, malformed,
    /// forged, or expired.
    pub fn current_identity(&self, ctx: &RequestContext<'_>) -> Option<SessionClaims> {
        let token = ctx.cookies().get(SESSION_COOKIE_NAME);
        self.codec.verify(token.as_deref())
    }

    /// The gate every protected page goes through.
    pub fn require_identity(
        &self,
        ctx: &RequestContext<'_>,
    ) -> std::result::Result<SessionClaims, LoginRedirect> {
        self.current_identity(ctx).ok_or(LoginRedirect { target: LOGIN_PATH })
    }

    /// Signs a token for `identity` and sets it as the session cookie.
    pub fn start_session(&self, ctx: &RequestContext<'_>, identity: &Identity) -> Result<()> {
        let token = self.codec.sign(identity)?;
        ctx.cookies().add(session_cookie(token, self.secure_cookies));
        tracing::debug!("Session cookie set for user: {}", identity.user_id);
        Ok(())
    }

    /// Overwrites the session cookie with an empty, already-expired one.
    pub fn end_session(&self, ctx: &RequestContext<'_>) {
        ctx.cookies().add(clearing_cookie(self.secure_cookies));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthSecret;
    use crate::session::cookies::MemoryCookieJar;
    use axum::http::{header, StatusCode};
    use chrono::{Duration, Utc};

    fn accessor() -> SessionAccessor {
        SessionAccessor::new(TokenCodec::new(&AuthSecret::new("accessor-secret")), false)
    }

    fn bob() -> Identity {
        Identity {
            user_id: 7,
            email: "bob@example.com".to_string(),
            name: None,
        }
    }

    #[test]
    fn no_cookie_means_no_identity() {
        let jar = MemoryCookieJar::default();
        let ctx = RequestContext::new(&jar);
        assert_eq!(accessor().current_identity(&ctx), None);
    }

    #[test]
    fn started_session_is_visible_immediately() {
        let sessions = accessor();
        let jar = MemoryCookieJar::default();
        let ctx = RequestContext::new(&jar);

        sessions.start_session(&ctx, &bob()).unwrap();

        let claims = sessions.current_identity(&ctx).unwrap();
        assert_eq!(claims.identity(), bob());
        assert_eq!(sessions.require_identity(&ctx), Ok(claims));
    }

    #[test]
    fn require_identity_redirects_without_session() {
        let jar = MemoryCookieJar::default();
        let ctx = RequestContext::new(&jar);
        assert_eq!(
            accessor().require_identity(&ctx),
            Err(LoginRedirect { target: "/login" })
        );
    }

    #[test]
    fn garbage_cookie_redirects() {
        let jar = MemoryCookieJar::with(SESSION_COOKIE_NAME, "not-a-token");
        let ctx = RequestContext::new(&jar);
        assert!(accessor().require_identity(&ctx).is_err());
    }

    #[test]
    fn expired_cookie_redirects() {
        let sessions = accessor();
        let token = sessions
            .codec()
            .issue(&bob(), Utc::now() - Duration::days(30))
            .unwrap();
        let jar = MemoryCookieJar::with(SESSION_COOKIE_NAME, &token);
        let ctx = RequestContext::new(&jar);
        assert_eq!(sessions.current_identity(&ctx), None);
        assert!(sessions.require_identity(&ctx).is_err());
    }

    #[test]
    fn cookie_under_another_name_is_ignored() {
        let sessions = accessor();
        let token = sessions.codec().sign(&bob()).unwrap();
        let jar = MemoryCookieJar::with("session_id", &token);
        let ctx = RequestContext::new(&jar);
        assert_eq!(sessions.current_identity(&ctx), None);
    }

    #[test]
    fn ended_session_has_no_identity() {
        let sessions = accessor();
        let jar = MemoryCookieJar::default();
        let ctx = RequestContext::new(&jar);

        sessions.start_session(&ctx, &bob()).unwrap();
        sessions.end_session(&ctx);

        assert_eq!(sessions.current_identity(&ctx), None);
        let cookie = jar.cookie(SESSION_COOKIE_NAME).unwrap();
        assert_eq!(cookie.value(), "");
    }

    #[test]
    fn secure_flag_follows_configuration() {
        let sessions =
            SessionAccessor::new(TokenCodec::new(&AuthSecret::new("accessor-secret")), true);
        let jar = MemoryCookieJar::default();
        let ctx = RequestContext::new(&jar);

        sessions.start_session(&ctx, &bob()).unwrap();
        assert_eq!(jar.cookie(SESSION_COOKIE_NAME).unwrap().secure(), Some(true));
    }

    #[test]
    fn login_redirect_response() {
        let response = LoginRedirect { target: LOGIN_PATH }.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
    }
}
