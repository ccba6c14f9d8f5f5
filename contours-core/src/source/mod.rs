//! Fetch building records around a query point.
//!
//! The `BuildingSource` trait abstracts the retrieval of every object tagged
//! as a building within a radius of a [`QueryPoint`](crate::QueryPoint).
//! Implementations perform a single request/response cycle and report
//! failures through [`FetchError`]; there is no retry or pagination.

mod error;
mod provider;

pub use error::FetchError;
pub use provider::BuildingSource;
