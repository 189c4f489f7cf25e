//! schema-miner-ui: the three-stage Schema Miner demo served over HTTP.
//!
//! The page is rendered server-side from `schema_miner_core::TabbedInterface`; the controls post
//! to per-stage endpoints backed by a `SchemaSession` (unwired in this demo).

pub mod render;
pub mod routes;

pub use routes::{build_router, AppState};
