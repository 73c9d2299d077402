//! Twitter/X API integration: the search client, response models, and the
//! flattening of responses into records.
pub mod client;
pub mod extract;
pub mod types;

pub use client::TwitterApi;
