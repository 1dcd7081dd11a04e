//! Catalog definition errors.
//!
//! These only arise while building or loading catalogs. Resolution itself
//! never fails: a missing catalog or a box that does not fit is a
//! no-quote, not an error.

use thiserror::Error;

use crate::catalog::CatalogKey;

/// A catalog could not be built or registered.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The YAML document could not be parsed.
    #[error("failed to parse catalog document: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Two boxes in one catalog share an id.
    #[error("catalog {catalog} defines box {box_id:?} more than once")]
    DuplicateBox {
        /// Catalog name.
        catalog: String,
        /// The repeated box id.
        box_id: String,
    },

    /// A box has a zero capacity on some axis or for weight.
    #[error("box {box_id:?} in catalog {catalog} has zero {field}")]
    ZeroCapacity {
        /// Catalog name.
        catalog: String,
        /// Box id.
        box_id: String,
        /// Which capacity is zero.
        field: &'static str,
    },

    /// A catalog is already registered under this key.
    #[error("a catalog is already registered under {0}")]
    DuplicateKey(CatalogKey),
}
