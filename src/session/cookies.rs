use tower_cookies::{
    cookie::{time::Duration, SameSite},
    Cookie, Cookies,
};

use crate::crypto::token::SESSION_TTL_SECS;

/// The name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "bookshelf_session";

/// Read/write access to the cookies of the current request.
pub trait CookieJar: Send + Sync {
    /// Returns the value of the cookie named `name`, if present.
    fn get(&self, name: &str) -> Option<String>;

    /// Queues `cookie` to be set on the response.
    fn add(&self, cookie: Cookie<'static>);
}

impl CookieJar for Cookies {
    fn get(&self, name: &str) -> Option<String> {
        Cookies::get(self, name).map(|cookie| cookie.value().to_string())
    }

    fn add(&self, cookie: Cookie<'static>) {
        Cookies::add(self, cookie)
    }
}

fn base_cookie(value: String, secure: bool, max_age_secs: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE_NAME, value);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    if secure {
        cookie.set_secure(true);
    }
    cookie.set_max_age(Duration::seconds(max_age_secs));
    cookie
}

/// Builds the cookie that carries a freshly signed session token.
pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    base_cookie(token, secure, SESSION_TTL_SECS)
}

/// Builds the cookie that clears the session on the client.
pub fn clearing_cookie(secure: bool) -> Cookie<'static> {
    base_cookie(String::new(), secure, 0)
}

/// A jar backed by a plain map, for exercising the accessor without HTTP.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryCookieJar {
    cookies: std::sync::Mutex<std::collections::HashMap<String, Cookie<'static>>>,
}

#[cfg(test)]
impl MemoryCookieJar {
    pub fn with(name: &str, value: &str) -> Self {
        let jar = Self::default();
        jar.add(Cookie::new(name.to_string(), value.to_string()));
        jar
    }

    pub fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.cookies.lock().unwrap().get(name).cloned()
    }
}

#[cfg(test)]
impl CookieJar for MemoryCookieJar {
    fn get(&self, name: &str) -> Option<String> {
        self.cookie(name).map(|c| c.value().to_string())
    }

    fn add(&self, cookie: Cookie<'static>) {
        self.cookies
            .lock()
            .unwrap()
            .insert(cookie.name().to_string(), cookie);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("tok".to_string(), false);
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), None);
        assert_eq!(cookie.max_age(), Some(Duration::seconds(604_800)));
    }

    #[test]
    fn production_cookie_is_secure() {
        assert_eq!(session_cookie("tok".to_string(), true).secure(), Some(true));
        assert_eq!(clearing_cookie(true).secure(), Some(true));
    }

    #[test]
    fn clearing_cookie_is_empty_and_expired() {
        let cookie = clearing_cookie(false);
        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
