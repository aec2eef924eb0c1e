//! Infrastructure layer: stores, peer existence checks, coordinators, config.

pub mod config;
pub mod coordinator;
pub mod db;
pub mod entity_store;
pub mod error;
pub mod existence;
pub mod relationship_store;

pub use error::StoreError;

#[cfg(test)]
mod integration_tests;
