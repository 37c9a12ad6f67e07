use actix_web::{cookie::Cookie, http::header, HttpResponse};

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a redirect response (302 Found)
    #[must_use]
    pub fn redirect(location: &str) -> HttpResponse {
        Self::redirect_with_cookies(location, Vec::new())
    }

    /// Create a redirect response with a single cookie
    #[must_use]
    pub fn redirect_with_cookie(location: &str, cookie: Cookie<'static>) -> HttpResponse {
        Self::redirect_with_cookies(location, vec![cookie])
    }

    /// Create a redirect response with multiple cookies
    #[must_use]
    pub fn redirect_with_cookies(location: &str, cookies: Vec<Cookie<'static>>) -> HttpResponse {
        let mut builder = HttpResponse::Found();

        for cookie in cookies {
            builder.cookie(cookie);
        }

        builder
            .append_header((header::LOCATION, location.to_string()))
            .finish()
    }

    /// Create an error redirect response
    #[must_use]
    pub fn error_redirect(location: &str, error_param: &str) -> HttpResponse {
        let separator = if location.contains('?') { '&' } else { '?' };
        let redirect_url = format!(
            "{location}{separator}error={}",
            urlencoding::encode(error_param)
        );

        Self::redirect(&redirect_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_redirect() {
        let response = ResponseBuilder::redirect("/home");

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/home");
    }

    #[test]
    fn test_redirect_with_cookie() {
        let response = ResponseBuilder::redirect_with_cookie("/", Cookie::new("a", "b"));

        let cookies: Vec<_> = response.cookies().collect();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name(), "a");
    }

    #[test]
    fn test_error_redirect() {
        let response = ResponseBuilder::error_redirect("/signIn", "auth failed");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/signIn?error=auth%20failed"
        );

        let response = ResponseBuilder::error_redirect("/signIn?next=/", "x");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/signIn?next=/&error=x"
        );
    }
}
