//! Application layer: request execution, dashboard orchestration and the
//! pure derivations the views are built from.

pub mod dashboard;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod pagination;
pub mod presenter;
