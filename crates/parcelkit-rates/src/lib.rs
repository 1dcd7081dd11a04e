//! # parcelkit-rates: Static Rate Resolution
//!
//! Prices shipments for carriers that publish fixed box tariffs instead of
//! a rating API. The pipeline for one service code is:
//!
//! 1. [`zone::ZoneTable::classify`] maps the destination country to a
//!    [`Zone`], and the zone to a sub-catalog prefix.
//! 2. [`CatalogRegistry`] finds the catalog registered under
//!    `(prefix, service)`.
//! 3. [`RateCatalog::candidates`] keeps the boxes priced for the zone and
//!    converts their prices from minor to major units.
//! 4. [`resolver::resolve`] picks the cheapest box(es) that hold the
//!    packages under a [`PackingPolicy`].
//!
//! [`RateTable`] runs all four steps. Every miss is `None`; only building
//! or loading a catalog can fail ([`CatalogError`]).
//!
//! Built-in carrier data lives in [`tables`].

pub mod catalog;
pub mod error;
pub mod resolver;
pub mod selector;
pub mod tables;
pub mod zone;

pub use catalog::{CatalogEntry, CatalogKey, CatalogRegistry, PricedBox, RateBox, RateCatalog};
pub use error::CatalogError;
pub use resolver::{BoxMatch, PackingPolicy, Resolution};
pub use selector::{RateTable, StaticQuote};
pub use zone::{Zone, ZoneTable};
