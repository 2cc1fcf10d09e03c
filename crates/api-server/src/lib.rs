#![warn(clippy::unwrap_used)]

pub mod rest;
pub mod segment_rest;
pub mod server;
pub mod swagger;
pub mod user_rest;

pub use rest::AppState;
pub use server::{router, ApiServer};
pub use swagger::ApiDoc;
