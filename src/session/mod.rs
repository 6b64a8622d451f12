//! Cookie-carried, stateless sessions.

pub mod accessor;
pub mod cookies;

pub use accessor::{LoginRedirect, RequestContext, SessionAccessor, LOGIN_PATH};
pub use cookies::{CookieJar, SESSION_COOKIE_NAME};
