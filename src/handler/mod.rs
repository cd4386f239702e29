//! Request handler module
//!
//! Responsible for request routing dispatch: the exercise API, the landing
//! page and public static assets.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
