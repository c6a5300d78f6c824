//! Catalog aggregation engine
//!
//! Pulls the upstream entity index in bounded batches, joins each entry with
//! its detail, species and evolution chain, merges the results into a
//! deduplicated in-memory catalog and serves filtered, paginated views over it.
//!
//! [`CatalogSession`] is the single entry point; the other modules are public
//! so the individual stages can be driven and tested on their own.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod builder;
pub mod catalog;
pub mod detail;
pub mod evolution;
pub mod joiner;
pub mod session;
pub mod view;

pub use builder::{BatchOutcome, CatalogBuilder};
pub use catalog::{Catalog, CatalogSnapshot, CatalogStatus};
pub use detail::DetailResolver;
pub use joiner::DetailJoiner;
pub use session::CatalogSession;
pub use view::{clamp_page, view, CatalogPage};
