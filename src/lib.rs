//! Marquee - Multi-provider catalog aggregation engine
//!
//! This library crate exposes the provider-agnostic core consumed by the
//! marquee client apps: capability contracts, the provider registry, the
//! catalog aggregation and pagination engines, and the enrichment
//! coordinator.

pub mod catalog;
pub mod context;
pub mod engine;
pub mod enrichment;
pub mod prefs;
pub mod provider;

#[cfg(test)]
pub(crate) mod test_support;
