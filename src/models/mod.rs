//! Data models for the bucket inventory service.
//!
//! `ObjectRecord` is what the storage listing yields; everything else is
//! derived from it per request and serialized as JSON via `serde`.

pub mod object;
pub mod summary;
