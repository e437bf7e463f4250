//! Comment generation backend
//!
//! The service that writes the actual comment text is a black box reached
//! through the [`CommentBackend`] trait; this crate only owns the request it
//! sends and the reply it expects.

mod backend;
mod http;

pub use backend::{CommentBackend, CommentRequest, CommentResponse};
pub use http::{create_backend, HttpCommentBackend};
