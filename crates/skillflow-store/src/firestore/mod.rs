//! Firestore REST (v1) access.
//!
//! Only what the repositories need: point reads, merge-upserts through
//! `documents:commit` with server timestamps, deletes, and single-collection
//! structured queries with an optional equality filter.

mod client;
mod value;


pub use client::{FieldFilter, FirestoreClient, FirestoreConfig};
pub use value::{decode_fields, decode_value, encode_fields, encode_value, Document};
