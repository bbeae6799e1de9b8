//! WordPress sites: saved connections, the REST client, and the publish flow.

pub mod client;
pub mod connections;
pub mod handlers;
pub mod models;

pub use client::{WordPressClient, WordPressError};
pub use connections::ConnectionRepository;
