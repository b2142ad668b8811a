//! Listing helpers shared by the repository adapter: manifest reading with
//! per-repository fan-out, and grouping by organization.

pub mod grouping;
pub mod manifest;

pub use grouping::group_by_organization;
pub use manifest::{ManifestReader, decode_manifest};
