//! # Rate Catalogs
//!
//! A [`RateBox`] is one packaging option with fixed capacities and a price
//! per zone in minor currency units. A [`RateCatalog`] is the ordered list
//! of boxes a carrier offers for one (prefix, service) pair, and a
//! [`CatalogRegistry`] maps typed [`CatalogKey`]s to catalogs.
//!
//! ## Minor to major units
//!
//! Catalogs store integer cents. [`RateCatalog::candidates`] is the single
//! place where they become major-unit decimals, and only for boxes that
//! carry a non-zero price for the requested zone. Boxes without that
//! column are dropped before conversion and never surface as free quotes.
//!
//! ## Loading
//!
//! Catalogs are plain serde data. [`CatalogRegistry::from_yaml`] reads a
//! document of the form:
//!
//! ```yaml
//! catalogs:
//!   - prefix: fr
//!     service: france
//!     name: Colissimo France
//!     boxes:
//!       - id: pack-250
//!         max_length: 1000
//!         max_width: 990
//!         max_height: 990
//!         max_weight: 250
//!         price_by_zone: { domestic: 495 }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::error::CatalogError;
use crate::zone::Zone;

// -- Boxes --------------------------------------------------------------------

/// A fixed-capacity packaging option.
///
/// Dimensions are the box's internal measurements and are not assumed to
/// be sorted; matching treats them as an unordered triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBox {
    /// Identifier, unique within its catalog (e.g. `pack-250`).
    pub id: String,
    /// Internal length in millimetres.
    pub max_length: u32,
    /// Internal width in millimetres.
    pub max_width: u32,
    /// Internal height in millimetres.
    pub max_height: u32,
    /// Weight limit in grams, inclusive.
    pub max_weight: u32,
    /// Price in minor currency units. A missing zone means the box is not
    /// offered there.
    #[serde(default)]
    pub price_by_zone: BTreeMap<Zone, u64>,
}

impl RateBox {
    /// A box with no prices yet.
    pub fn new(id: &str, [length, width, height]: [u32; 3], max_weight: u32) -> Self {
        Self {
            id: id.to_string(),
            max_length: length,
            max_width: width,
            max_height: height,
            max_weight,
            price_by_zone: BTreeMap::new(),
        }
    }

    /// Builder-style price setter.
    pub fn price(mut self, zone: Zone, minor_units: u64) -> Self {
        self.price_by_zone.insert(zone, minor_units);
        self
    }

    /// Usable price for a zone. Zero counts as absent.
    pub fn price_for(&self, zone: Zone) -> Option<u64> {
        self.price_by_zone.get(&zone).copied().filter(|p| *p > 0)
    }

    /// `[length, width, height]`.
    pub fn dimensions(&self) -> [u32; 3] {
        [self.max_length, self.max_width, self.max_height]
    }

    /// Internal volume.
    pub fn volume(&self) -> f64 {
        self.dimensions().iter().map(|d| f64::from(*d)).product()
    }
}

/// A box that is offered in the requested zone, with its price already
/// converted to major units.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedBox<'a> {
    /// The catalog entry.
    pub rate_box: &'a RateBox,
    /// Position in the catalog, used as the last tie-breaker.
    pub position: usize,
    /// Zone price in minor units, never zero.
    pub price_minor: u64,
    /// `price_minor` in major units.
    pub price: Decimal,
}

// -- Catalogs -----------------------------------------------------------------

/// Ordered boxes for one carrier + service + geography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCatalog {
    /// Human-readable name used in logs and errors.
    pub name: String,
    /// Boxes in catalog order.
    pub boxes: Vec<RateBox>,
}

impl RateCatalog {
    pub fn new(name: &str, boxes: Vec<RateBox>) -> Self {
        Self {
            name: name.to_string(),
            boxes,
        }
    }

    /// Check box ids are unique and every capacity is non-zero.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for b in &self.boxes {
            if !ids.insert(b.id.as_str()) {
                return Err(CatalogError::DuplicateBox {
                    catalog: self.name.clone(),
                    box_id: b.id.clone(),
                });
            }
            let capacities = [
                ("max_length", b.max_length),
                ("max_width", b.max_width),
                ("max_height", b.max_height),
                ("max_weight", b.max_weight),
            ];
            if let Some((field, _)) = capacities.iter().find(|(_, v)| *v == 0) {
                return Err(CatalogError::ZeroCapacity {
                    catalog: self.name.clone(),
                    box_id: b.id.clone(),
                    field: *field,
                });
            }
        }
        Ok(())
    }

    /// Boxes offered in `zone`, in catalog order, priced in major units.
    pub fn candidates(&self, zone: Zone) -> Vec<PricedBox<'_>> {
        self.boxes
            .iter()
            .enumerate()
            .filter_map(|(position, rate_box)| {
                if rate_box.price_by_zone.is_empty() {
                    tracing::warn!(
                        catalog = %self.name,
                        box_id = %rate_box.id,
                        "rate box has no prices for any zone, skipping"
                    );
                    return None;
                }
                let price_minor = rate_box.price_for(zone)?;
                Some(PricedBox {
                    rate_box,
                    position,
                    price_minor,
                    price: minor_to_major(price_minor),
                })
            })
            .collect()
    }
}

/// Convert integer cents to a two-decimal major-unit amount.
fn minor_to_major(minor: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(minor), 2)
}

// -- Keys ---------------------------------------------------------------------

/// Typed registry key: destination prefix plus service code, both
/// case-normalized into lower-case word tokens.
///
/// `"EmballageFrance"`, `"emballage_france"` and `"EMBALLAGE-FRANCE"` all
/// normalize to the same key. `Display` renders the historical method-style
/// name, e.g. `FrEmballageFranceRates`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogKey {
    prefix: String,
    service: String,
}

impl CatalogKey {
    pub fn new(prefix: &str, service: &str) -> Self {
        Self {
            prefix: words(prefix).join("_"),
            service: words(service).join("_"),
        }
    }

    /// Normalized prefix, e.g. `"fr"` or `""`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Normalized service code, e.g. `"emballage_france"`.
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.prefix.split('_').chain(self.service.split('_')) {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
            }
        }
        f.write_str("Rates")
    }
}

/// Split an identifier into lower-case words on separators and on
/// lower-to-upper case transitions.
fn words(raw: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in raw.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_ascii_uppercase() && prev_lower && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c.to_ascii_lowercase());
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

// -- Registry -----------------------------------------------------------------

/// One entry in a catalog document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub prefix: String,
    pub service: String,
    #[serde(flatten)]
    pub catalog: RateCatalog,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    catalogs: Vec<CatalogEntry>,
}

/// Catalogs keyed by (prefix, service). Built once, then read-only.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: HashMap<CatalogKey, RateCatalog>,
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog, rejecting invalid catalogs and duplicate keys.
    pub fn register(&mut self, key: CatalogKey, catalog: RateCatalog) -> Result<(), CatalogError> {
        catalog.validate()?;
        if self.catalogs.contains_key(&key) {
            return Err(CatalogError::DuplicateKey(key));
        }
        self.catalogs.insert(key, catalog);
        Ok(())
    }

    /// Insert without validation, replacing any catalog already under
    /// `key`. Used for built-in tables whose validity is covered by tests.
    pub fn insert(&mut self, key: CatalogKey, catalog: RateCatalog) -> Option<RateCatalog> {
        self.catalogs.insert(key, catalog)
    }

    /// Register the catalog produced by `build` under `(prefix, service)`.
    pub fn register_with(
        &mut self,
        prefix: &str,
        service: &str,
        build: fn() -> RateCatalog,
    ) -> Result<(), CatalogError> {
        self.register(CatalogKey::new(prefix, service), build())
    }

    /// Parse a YAML catalog document into a new registry.
    pub fn from_yaml(document: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_yaml::from_str(document)?;
        let mut registry = Self::new();
        for entry in doc.catalogs {
            registry.register(CatalogKey::new(&entry.prefix, &entry.service), entry.catalog)?;
        }
        Ok(registry)
    }

    pub fn get(&self, key: &CatalogKey) -> Option<&RateCatalog> {
        self.catalogs.get(key)
    }

    /// Look up by raw prefix and service code.
    pub fn lookup(&self, prefix: &str, service: &str) -> Option<&RateCatalog> {
        self.get(&CatalogKey::new(prefix, service))
    }

    pub fn len(&self) -> usize {
        self.catalogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&CatalogKey> {
        let mut keys: Vec<_> = self.catalogs.keys().collect();
        keys.sort();
        keys
    }
}
