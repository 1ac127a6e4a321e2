//! Transcript persistence
//!
//! The blob store is an opaque external collaborator: a single
//! `put(key, bytes, content_type)` operation. The archiver layers the
//! key scheme, the empty-transcript no-op, and the bounded write on top.

mod archiver;
mod blob;

pub use archiver::Archiver;
pub use blob::{BlobStore, HttpBlobStore};
