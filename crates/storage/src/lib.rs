//! HTTP client for the durable object store.
//!
//! Uploads inline-encoded image payloads into a bucket and derives the
//! stable public URL the rest of the system treats as the durable
//! reference for a generated image.

pub mod api;

pub use api::{StorageApi, StorageApiError, StoredObject};
