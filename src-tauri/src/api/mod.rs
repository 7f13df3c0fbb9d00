//! HTTP access to the platform API and to served variants.

pub mod client;
pub mod types;

pub use client::ApiClient;
