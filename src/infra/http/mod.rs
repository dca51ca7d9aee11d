//! HTTP adapter for the post backend.

mod client;

pub use client::HttpPostsGateway;
