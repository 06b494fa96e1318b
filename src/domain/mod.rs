//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs`: Rich domain types (validated, chart- or view-ready)
//! - `wire.rs`: Raw serde structs matching CoinCap responses
//! - `convert.rs` / `resample.rs`: Conversions from wire types
//! - `view.rs`: Pure derivations for display
//! - `client.rs`: Sub-client with HTTP methods and caching

pub mod asset;
pub mod price_history;
