use crate::application_impl::SESSION_TTL;

pub const SESSION_COOKIE_NAME: &str = "jwt_token";

/// Builds `Set-Cookie` values for the session token.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    pub secure: bool,
}

impl SessionCookie {
    pub fn new(secure: bool) -> Self {
        SessionCookie { secure }
    }

    pub fn set(&self, token: &str) -> String {
        let max_age = SESSION_TTL.num_seconds();
        self.with_flags(format!(
            "{SESSION_COOKIE_NAME}={token}; Max-Age={max_age}; Path=/; HttpOnly"
        ))
    }

    pub fn clear(&self) -> String {
        self.with_flags(format!("{SESSION_COOKIE_NAME}=; Max-Age=0; Path=/; HttpOnly"))
    }

    fn with_flags(&self, mut cookie: String) -> String {
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cookie_is_http_only_for_a_day() {
        let c = SessionCookie::new(false).set("abc");
        assert_eq!(c, "jwt_token=abc; Max-Age=86400; Path=/; HttpOnly");
    }

    #[test]
    fn secure_flag_is_opt_in() {
        assert!(SessionCookie::new(true).set("abc").ends_with("; Secure"));
        assert!(SessionCookie::new(true).clear().contains("Max-Age=0"));
    }
}
