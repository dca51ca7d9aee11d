//! postdesk: admin dashboard client for a blog post REST backend.
//!
//! Layers follow the usual split: `domain` holds validation and filter types,
//! `application` the request executor, gateway contract, presenter and the
//! dashboard orchestrator, `infra` the HTTP gateway and telemetry, and
//! `presentation` the text templates.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
