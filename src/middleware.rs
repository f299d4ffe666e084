use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use actix_web::http::Method;
use actix_web::{Error, HttpResponse};
use futures::future::LocalBoxFuture;
use std::env;
use std::future::{ready, Ready};
use std::rc::Rc;

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: String,
    pub allowed_headers: String,
    pub exposed_headers: String,
    pub max_age: u32,
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allowed_methods: "GET, POST, PUT, DELETE, OPTIONS".to_string(),
            allowed_headers: "Content-Type, Authorization".to_string(),
            exposed_headers: "Content-Length".to_string(),
            max_age: 86400,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Defaults with the allow-list overridable via `ALLOWED_ORIGINS`
    /// (comma-separated).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(origins) = env::var("ALLOWED_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !origins.is_empty() {
                config.allowed_origins = origins;
            }
        }
        config
    }

    /// Exact string match; a single `*` entry allow-lists every origin.
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.iter().any(|o| o == "*" || o == origin)
    }

    fn preflight_response(&self, origin: Option<&str>) -> HttpResponse {
        let origin = match origin.filter(|o| self.is_allowed(o)) {
            Some(origin) => origin,
            None => return HttpResponse::Forbidden().finish(),
        };

        let mut builder = HttpResponse::Ok();
        builder
            .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin))
            .insert_header((
                header::ACCESS_CONTROL_ALLOW_METHODS,
                self.allowed_methods.as_str(),
            ))
            .insert_header((
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                self.allowed_headers.as_str(),
            ))
            .insert_header((
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                self.exposed_headers.as_str(),
            ))
            .insert_header((header::ACCESS_CONTROL_MAX_AGE, self.max_age.to_string()));
        if self.allow_credentials {
            builder.insert_header((header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"));
        }
        builder.finish()
    }
}

/// CORS stage. OPTIONS requests short-circuit without reaching the inner
/// service: 403 when the origin is absent or not allow-listed, otherwise
/// 200 with the negotiated headers. All other requests always reach the
/// handler; response headers are attached only for allow-listed origins
/// (advisory CORS, not an access gate).
pub struct Cors {
    config: Rc<CorsConfig>,
}

impl Cors {
    pub fn new(config: CorsConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

pub struct CorsMiddleware<S> {
    service: S,
    config: Rc<CorsConfig>,
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = Rc::clone(&self.config);
        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if req.method() == Method::OPTIONS {
            let response = config.preflight_response(origin.as_deref());
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            if let Some(origin) = origin.filter(|o| config.is_allowed(o)) {
                let headers = res.headers_mut();
                set_header(headers, header::ACCESS_CONTROL_ALLOW_ORIGIN, &origin);
                if config.allow_credentials {
                    set_header(headers, header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
                }
                if !config.exposed_headers.is_empty() {
                    set_header(
                        headers,
                        header::ACCESS_CONTROL_EXPOSE_HEADERS,
                        &config.exposed_headers,
                    );
                }
            }
            Ok(res.map_into_left_body())
        })
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub content_security_policy: String,
    pub frame_options: String,
    pub content_type_options: String,
    pub xss_protection: String,
    pub referrer_policy: String,
    pub permissions_policy: String,
    pub strict_transport_security: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            content_security_policy: "default-src 'self'; script-src 'self'; \
                 style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'"
                .to_string(),
            frame_options: "DENY".to_string(),
            content_type_options: "nosniff".to_string(),
            xss_protection: "1; mode=block".to_string(),
            referrer_policy: "strict-origin-when-cross-origin".to_string(),
            permissions_policy: "camera=(), microphone=(), geolocation=()".to_string(),
            strict_transport_security: "max-age=31536000; includeSubDomains; preload".to_string(),
        }
    }
}

impl SecurityConfig {
    fn apply(&self, headers: &mut HeaderMap) {
        set_header(
            headers,
            header::CONTENT_SECURITY_POLICY,
            &self.content_security_policy,
        );
        set_header(headers, header::X_FRAME_OPTIONS, &self.frame_options);
        set_header(
            headers,
            header::X_CONTENT_TYPE_OPTIONS,
            &self.content_type_options,
        );
        set_header(headers, header::X_XSS_PROTECTION, &self.xss_protection);
        set_header(headers, header::REFERRER_POLICY, &self.referrer_policy);
        set_header(
            headers,
            HeaderName::from_static("permissions-policy"),
            &self.permissions_policy,
        );
        set_header(
            headers,
            header::STRICT_TRANSPORT_SECURITY,
            &self.strict_transport_security,
        );
    }
}

/// Security stage. Always invokes the inner service, then attaches the
/// fixed header set. Registered outside the CORS stage so even preflight
/// short-circuit responses carry these headers.
pub struct SecurityHeaders {
    config: Rc<SecurityConfig>,
}

impl SecurityHeaders {
    pub fn new(config: SecurityConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SecurityHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddleware {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

pub struct SecurityHeadersMiddleware<S> {
    service: S,
    config: Rc<SecurityConfig>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = Rc::clone(&self.config);
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            config.apply(res.headers_mut());
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_list_has_localhost() {
        let config = CorsConfig::default();
        assert!(config.is_allowed("http://localhost:3000"));
        assert!(!config.is_allowed("http://evil.example"));
    }

    #[test]
    fn test_wildcard_allows_every_origin() {
        let config = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            ..CorsConfig::default()
        };
        assert!(config.is_allowed("http://anything.example"));
        assert!(config.is_allowed("https://other.example:8443"));
    }

    #[test]
    fn test_origin_match_is_exact() {
        let config = CorsConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            ..CorsConfig::default()
        };
        assert!(!config.is_allowed("http://localhost:3000/"));
        assert!(!config.is_allowed("http://localhost:3001"));
        assert!(!config.is_allowed("https://localhost:3000"));
    }

    #[test]
    fn test_preflight_response_for_allowed_origin() {
        let config = CorsConfig::default();
        let response = config.preflight_response(Some("http://localhost:3000"));
        assert_eq!(response.status(), 200);
        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).is_some());
        assert!(headers.get(header::ACCESS_CONTROL_MAX_AGE).is_some());
        assert_eq!(
            headers
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );
    }

    #[test]
    fn test_preflight_response_for_disallowed_origin() {
        let config = CorsConfig::default();
        assert_eq!(
            config
                .preflight_response(Some("http://evil.example"))
                .status(),
            403
        );
        assert_eq!(config.preflight_response(None).status(), 403);
    }

    #[test]
    fn test_security_defaults() {
        let config = SecurityConfig::default();
        assert_eq!(config.frame_options, "DENY");
        assert_eq!(config.content_type_options, "nosniff");
        assert!(config.strict_transport_security.contains("max-age=31536000"));
        assert!(config.strict_transport_security.contains("preload"));
    }

    #[test]
    fn test_security_apply_sets_all_headers() {
        let config = SecurityConfig::default();
        let mut headers = HeaderMap::new();
        config.apply(&mut headers);
        assert_eq!(headers.len(), 7);
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert!(headers
            .get(HeaderName::from_static("permissions-policy"))
            .is_some());
    }
}
