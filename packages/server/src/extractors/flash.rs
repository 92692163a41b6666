use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const FLASH_COOKIE: &str = "flash";

/// One-shot messages shown on the next page view.
///
/// Only the key travels in the cookie; the text is resolved server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    DuplicateLink,
    LoginFailed,
}

impl Flash {
    fn key(self) -> &'static str {
        match self {
            Flash::DuplicateLink => "duplicate_link",
            Flash::LoginFailed => "login_failed",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "duplicate_link" => Some(Flash::DuplicateLink),
            "login_failed" => Some(Flash::LoginFailed),
            _ => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Flash::DuplicateLink => "Duplicate Link",
            Flash::LoginFailed => "Github log in failed",
        }
    }
}

pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.key()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Read and clear the pending flash. Unknown keys are dropped silently.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<&'static str>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let flash = Flash::from_key(cookie.value()).map(Flash::message);
    let jar = jar.remove(Cookie::build(FLASH_COOKIE).path("/"));
    (jar, flash)
}
