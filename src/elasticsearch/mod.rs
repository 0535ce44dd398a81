//! Elasticsearch client and POI queries.

mod client;
mod queries;

pub use client::EsClient;
