//! Catalog provider endpoint descriptors.
//!
//! `descriptor` exposes validated, immutable endpoint metadata
//! ([`CatalogDescriptor`]) covering the API base URL and the three OAuth 1.0
//! endpoints (request token, access token, authorize), plus a builder seeded
//! with the upstream catalog's fixed deployment values.

pub mod descriptor;

pub use descriptor::*;
