//! HTTP protocol layer module
//!
//! Response builders, MIME detection and request body decoding, kept apart
//! from the routing and business logic.

pub mod body;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use body::{read_body, BodyError, Fields};
pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_content_response, build_json_response, build_options_response, build_text_response,
};
