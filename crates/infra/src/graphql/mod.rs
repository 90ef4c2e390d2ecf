//! GraphQL transport pipeline

pub mod client;
pub mod multipart;

pub use client::GraphqlClient;
pub use multipart::Upload;
