//! Request body and query string decoding
//!
//! JSON objects and URL-encoded forms both decode into a flat `Fields` map,
//! so the API layer validates one shape regardless of how the client posted.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(u64),
    #[error("failed to read request body: {0}")]
    Read(String),
    #[error("malformed JSON body: {0}")]
    Json(#[source] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotAnObject,
}

/// Collect a request body, refusing to buffer more than `max_size` bytes
pub async fn read_body<B>(body: B, max_size: u64) -> Result<Bytes, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            Err(BodyError::TooLarge(max_size))
        }
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}

/// Named input fields from a body or query string
#[derive(Debug, Default, Clone)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Decode a body according to its Content-Type
    ///
    /// Without a recognised Content-Type the body is sniffed: a leading `{`
    /// means JSON, anything else is read as a form.
    pub fn parse(content_type: Option<&str>, body: &[u8]) -> Result<Self, BodyError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match mime.as_deref() {
            Some("application/x-www-form-urlencoded") => Ok(Self::from_form(body)),
            Some(m) if m == "application/json" || m.ends_with("+json") => Self::from_json(body),
            _ if body.trim_ascii_start().starts_with(b"{") => Self::from_json(body),
            _ => Ok(Self::from_form(body)),
        }
    }

    /// Decode a raw query string (without the leading `?`)
    pub fn from_query(query: Option<&str>) -> Self {
        query.map_or_else(Self::default, |q| Self::from_form(q.as_bytes()))
    }

    fn from_json(body: &[u8]) -> Result<Self, BodyError> {
        match serde_json::from_slice(body).map_err(BodyError::Json)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(BodyError::NotAnObject),
        }
    }

    /// Repeated keys keep their first value
    fn from_form(body: &[u8]) -> Self {
        let mut map = Map::new();
        for (key, value) in url::form_urlencoded::parse(body) {
            map.entry(key.into_owned())
                .or_insert_with(|| Value::String(value.into_owned()));
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
