//! `ecocrop-api` — HTTP surface for the EcoCrop advisory backend.

pub mod app;
pub mod context;
pub mod middleware;
