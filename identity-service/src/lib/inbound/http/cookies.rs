use auth::TokenPair;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Moves session tokens between responses and requests as cookies.
///
/// Both cookies are `HttpOnly` and `SameSite=Strict`. The refresh cookie is
/// scoped to `refresh_path` so the browser only sends it to the auth routes.
#[derive(Debug, Clone)]
pub struct SessionTransport {
    secure: bool,
    refresh_path: String,
    access_ttl: time::Duration,
    refresh_ttl: time::Duration,
}

/// Tokens found on an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookies {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl SessionTransport {
    pub fn new(
        secure: bool,
        refresh_path: impl Into<String>,
        access_ttl: chrono::Duration,
        refresh_ttl: chrono::Duration,
    ) -> Self {
        Self {
            secure,
            refresh_path: refresh_path.into(),
            access_ttl: time::Duration::seconds(access_ttl.num_seconds()),
            refresh_ttl: time::Duration::seconds(refresh_ttl.num_seconds()),
        }
    }

    pub fn attach(&self, jar: CookieJar, tokens: &TokenPair) -> CookieJar {
        let mut access = self.cookie(ACCESS_TOKEN_COOKIE, tokens.access_token.clone(), "/");
        access.set_max_age(self.access_ttl);

        let mut refresh = self.cookie(
            REFRESH_TOKEN_COOKIE,
            tokens.refresh_token.clone(),
            self.refresh_path.clone(),
        );
        refresh.set_max_age(self.refresh_ttl);

        jar.add(access).add(refresh)
    }

    pub fn read(&self, jar: &CookieJar) -> SessionCookies {
        let value = |name: &str| {
            jar.get(name)
                .map(|cookie| cookie.value().to_string())
                .filter(|value| !value.is_empty())
        };

        SessionCookies {
            access_token: value(ACCESS_TOKEN_COOKIE),
            refresh_token: value(REFRESH_TOKEN_COOKIE),
        }
    }

    /// Emit removal cookies for both tokens, whether or not the request carried them.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        let mut access = self.cookie(ACCESS_TOKEN_COOKIE, "", "/");
        access.make_removal();

        let mut refresh = self.cookie(REFRESH_TOKEN_COOKIE, "", self.refresh_path.clone());
        refresh.make_removal();

        jar.add(access).add(refresh)
    }

    fn cookie(
        &self,
        name: &'static str,
        value: impl Into<String>,
        path: impl Into<String>,
    ) -> Cookie<'static> {
        Cookie::build((name, value.into()))
            .path(path.into())
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header;
    use axum::http::HeaderMap;
    use axum::http::HeaderValue;
    use chrono::Utc;

    use super::*;

    fn transport(secure: bool) -> SessionTransport {
        SessionTransport::new(
            secure,
            "/api/v1/auth",
            chrono::Duration::minutes(15),
            chrono::Duration::days(7),
        )
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access.jwt.value".to_string(),
            refresh_token: "refresh.jwt.value".to_string(),
            access_expires_at: Utc::now(),
            refresh_expires_at: Utc::now(),
        }
    }

    #[test]
    fn test_attach_sets_hardened_cookies() {
        let jar = transport(true).attach(CookieJar::new(), &tokens());

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "access.jwt.value");
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Strict));
        assert_eq!(access.max_age(), Some(time::Duration::minutes(15)));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(refresh.value(), "refresh.jwt.value");
        assert_eq!(refresh.path(), Some("/api/v1/auth"));
        assert_eq!(refresh.http_only(), Some(true));
        assert_eq!(refresh.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn test_attach_insecure_for_local_runs() {
        let jar = transport(false).attach(CookieJar::new(), &tokens());

        assert_eq!(jar.get(ACCESS_TOKEN_COOKIE).unwrap().secure(), Some(false));
    }

    #[test]
    fn test_read_from_request_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("accessToken=abc; refreshToken=def; theme=dark"),
        );

        let cookies = transport(true).read(&CookieJar::from_headers(&headers));

        assert_eq!(cookies.access_token.as_deref(), Some("abc"));
        assert_eq!(cookies.refresh_token.as_deref(), Some("def"));
    }

    #[test]
    fn test_read_ignores_missing_and_empty_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("accessToken="));

        let cookies = transport(true).read(&CookieJar::from_headers(&headers));

        assert_eq!(cookies, SessionCookies::default());
    }

    #[test]
    fn test_clear_emits_removals_on_same_paths() {
        let jar = transport(true).clear(CookieJar::new());

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "");
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.max_age(), Some(time::Duration::ZERO));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(refresh.path(), Some("/api/v1/auth"));
        assert_eq!(refresh.max_age(), Some(time::Duration::ZERO));
    }
}
