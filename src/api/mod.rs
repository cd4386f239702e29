// API module entry
// Route table for /api/users and mapping of failures onto HTTP statuses

mod handlers;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Response, StatusCode};

use crate::config::AppState;
use crate::domain::AppError;
use crate::http::{self, BodyError, Fields};
use crate::logger;

/// A recognised API path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRoute {
    /// `/api/users`
    Users,
    /// `/api/users/:id/exercises`
    Exercises(String),
    /// `/api/users/:id/logs`
    Logs(String),
}

impl ApiRoute {
    /// Match a request path; trailing slashes are ignored and `:id` is
    /// percent-decoded
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix("/api/users")?.trim_end_matches('/');
        if rest.is_empty() {
            return Some(Self::Users);
        }

        let (id, action) = rest.strip_prefix('/')?.split_once('/')?;
        if id.is_empty() || action.contains('/') {
            return None;
        }
        let id = urlencoding::decode(id).ok()?.into_owned();

        match action {
            "exercises" => Some(Self::Exercises(id)),
            "logs" => Some(Self::Logs(id)),
            _ => None,
        }
    }

    const fn allowed_methods(&self) -> &'static str {
        match self {
            Self::Users => "GET, POST, OPTIONS",
            Self::Exercises(_) => "POST, OPTIONS",
            Self::Logs(_) => "GET, OPTIONS",
        }
    }
}

/// API route handler
///
/// Dispatches to handler functions based on the matched route and method
pub async fn handle_api_request<B>(
    req: Request<B>,
    route: ApiRoute,
    state: &AppState,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    let result = match (method, route) {
        (Method::GET, ApiRoute::Users) => handlers::list_users(state).await,
        (Method::POST, ApiRoute::Users) => match read_fields(req, state).await {
            Ok(fields) => handlers::create_user(&fields, state).await,
            Err(resp) => return resp,
        },
        (Method::POST, ApiRoute::Exercises(user_id)) => match read_fields(req, state).await {
            Ok(fields) => handlers::create_exercise(user_id, &fields, state).await,
            Err(resp) => return resp,
        },
        (Method::GET, ApiRoute::Logs(user_id)) => {
            let query = Fields::from_query(req.uri().query());
            handlers::get_logs(&user_id, &query, state).await
        }
        (method, route) => {
            logger::log_debug(&format!("Method {method} not allowed for {route:?}"));
            return http::build_405_response(route.allowed_methods());
        }
    };

    result.unwrap_or_else(|err| error_response(&err))
}

/// Read and decode the request body, answering 413/400 directly on failure
async fn read_fields<B>(req: Request<B>, state: &AppState) -> Result<Fields, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let result = match http::read_body(req.into_body(), state.config.http.max_body_size).await {
        Ok(bytes) => Fields::parse(content_type.as_deref(), &bytes),
        Err(e) => Err(e),
    };

    result.map_err(|err| match err {
        BodyError::TooLarge(_) => {
            logger::log_warning(&err.to_string());
            http::build_413_response()
        }
        BodyError::Read(_) => {
            logger::log_error(&err.to_string());
            http::build_500_response()
        }
        BodyError::Json(_) | BodyError::NotAnObject => {
            http::build_text_response(StatusCode::BAD_REQUEST, &err.to_string())
        }
    })
}

/// Map a failure to its status; store details stay in the server log
fn error_response(err: &AppError) -> Response<Full<Bytes>> {
    match err {
        AppError::Validation(message) => {
            logger::log_debug(&format!("Rejected request: {message}"));
            http::build_text_response(StatusCode::BAD_REQUEST, message)
        }
        AppError::NotFound(message) => http::build_text_response(StatusCode::NOT_FOUND, message),
        AppError::Persistence(source) => {
            logger::log_error(&format!("Request failed: {source}"));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(ApiRoute::parse("/api/users"), Some(ApiRoute::Users));
        assert_eq!(ApiRoute::parse("/api/users/"), Some(ApiRoute::Users));
        assert_eq!(
            ApiRoute::parse("/api/users/abc123/exercises"),
            Some(ApiRoute::Exercises("abc123".to_string()))
        );
        assert_eq!(
            ApiRoute::parse("/api/users/abc123/logs/"),
            Some(ApiRoute::Logs("abc123".to_string()))
        );
    }

    #[test]
    fn test_parse_decodes_id() {
        assert_eq!(
            ApiRoute::parse("/api/users/a%20b/logs"),
            Some(ApiRoute::Logs("a b".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_other_paths() {
        for path in [
            "/",
            "/api",
            "/api/usersx",
            "/api/users/abc",
            "/api/users//logs",
            "/api/users/abc/log",
            "/api/users/abc/logs/extra",
        ] {
            assert_eq!(ApiRoute::parse(path), None, "{path}");
        }
    }
}
