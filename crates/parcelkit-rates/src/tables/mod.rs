//! Built-in zone schemes and catalogs for static-table carriers.

pub mod colissimo;

use crate::catalog::{RateBox, RateCatalog};
use crate::zone::Zone;

/// One row of a catalog where every box shares the same dimensions:
/// `(box id, max weight, prices by zone)`.
type Row<'a> = (&'a str, u32, &'a [(Zone, u64)]);

/// Build a catalog whose boxes differ only by weight tier.
pub(crate) fn tiered(name: &str, dims: [u32; 3], rows: &[Row<'_>]) -> RateCatalog {
    RateCatalog::new(
        name,
        rows.iter()
            .map(|(id, weight, prices)| boxed(id, dims, *weight, prices))
            .collect(),
    )
}

/// Build one box with its prices.
pub(crate) fn boxed(id: &str, dims: [u32; 3], weight: u32, prices: &[(Zone, u64)]) -> RateBox {
    prices
        .iter()
        .fold(RateBox::new(id, dims, weight), |b, (zone, minor)| {
            b.price(*zone, *minor)
        })
}
