//! Extractors that turn rejections into [`AppError`](crate::AppError) bodies.
//!
//! Axum's stock extractors answer with plain-text rejections; these wrap them
//! so every client-facing failure has the same JSON shape.

pub mod api;
pub mod validated;

pub use api::{ApiJson, ApiPath, ApiQuery};
pub use validated::ValidatedJson;
