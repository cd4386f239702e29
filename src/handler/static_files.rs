//! Static file serving module
//!
//! Serves the landing page and assets from the public directory.

use crate::config::StaticFilesConfig;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve the landing page, falling back to the built-in page when the
/// configured file is missing
pub async fn serve_index(config: &StaticFilesConfig, is_head: bool) -> Response<Full<Bytes>> {
    let html = match fs::read(&config.index_file).await {
        Ok(content) => Bytes::from(content),
        Err(e) => {
            logger::log_debug(&format!(
                "Landing page '{}' unavailable ({e}), using built-in page",
                config.index_file
            ));
            Bytes::from_static(DEFAULT_HOMEPAGE.as_bytes())
        }
    };
    http::build_content_response(html, "text/html; charset=utf-8", is_head)
}

/// Serve a file from the public directory, or 404
pub async fn serve_public(public_dir: &str, path: &str, is_head: bool) -> Response<Full<Bytes>> {
    match load_from_directory(public_dir, path).await {
        Some((content, content_type)) => {
            http::build_content_response(Bytes::from(content), content_type, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Load a file below `public_dir`, refusing anything that resolves outside it
pub async fn load_from_directory(public_dir: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    let decoded = urlencoding::decode(path).ok()?;
    let relative_path = decoded.trim_start_matches('/');
    if relative_path.is_empty() {
        return None;
    }

    let file_path = Path::new(public_dir).join(relative_path);

    let Ok(dir_canonical) = Path::new(public_dir).canonicalize() else {
        logger::log_debug(&format!("Public directory '{public_dir}' not found"));
        return None;
    };

    // File not found is common (404), no need to log at warning level
    let file_canonical = file_path.canonicalize().ok()?;
    if !file_canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_canonical.display()
        ));
        return None;
    }
    if !file_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_canonical.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

const DEFAULT_HOMEPAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Exercise Tracker</title>
</head>
<body>
    <h1>Exercise tracker</h1>
    <form action="/api/users" method="post">
        <h2>Create a New User</h2>
        <input name="username" type="text" placeholder="username">
        <input type="submit" value="Submit">
    </form>
    <p>
        <code>POST /api/users/:_id/exercises</code> with <code>description</code>,
        <code>duration</code> and an optional <code>date</code> (yyyy-mm-dd).
    </p>
    <p>
        <code>GET /api/users/:_id/logs?[from][&amp;to][&amp;limit]</code>
    </p>
</body>
</html>
"#;
