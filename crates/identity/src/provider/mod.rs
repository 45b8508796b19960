//! Implementations of the lookup seams.
//!
//! - [`HttpProfileApi`]: the profile API over HTTP (reqwest)
//! - [`InMemoryProfileStore`]: process-local store for tests and offline fixtures

pub mod http;
mod memory;

pub use http::HttpProfileApi;
pub use memory::InMemoryProfileStore;
