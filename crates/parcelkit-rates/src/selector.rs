//! # Static Rate Selection
//!
//! Ties the pieces together for one service code: classify the
//! destination, pick the catalog registered under (prefix, service),
//! filter its boxes to the zone, and run the resolver.
//!
//! Every miss along the way (no catalog for the key, no box priced for the
//! zone, nothing fits) is the same outcome: `None`, logged at debug level.

use serde::Serialize;

use parcelkit_core::{CountryCode, Package};

use crate::catalog::{CatalogKey, CatalogRegistry};
use crate::resolver::{self, PackingPolicy, Resolution};
use crate::zone::{Zone, ZoneTable};

/// A resolved static quote with enough context to explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticQuote {
    pub key: CatalogKey,
    pub catalog: String,
    pub zone: Zone,
    pub resolution: Resolution,
}

/// A zone scheme paired with the catalogs priced against it.
#[derive(Debug, Clone, Copy)]
pub struct RateTable<'a> {
    zones: &'a ZoneTable,
    catalogs: &'a CatalogRegistry,
}

impl<'a> RateTable<'a> {
    pub fn new(zones: &'a ZoneTable, catalogs: &'a CatalogRegistry) -> Self {
        Self { zones, catalogs }
    }

    pub fn zones(&self) -> &'a ZoneTable {
        self.zones
    }

    pub fn catalogs(&self) -> &'a CatalogRegistry {
        self.catalogs
    }

    /// Quote one service code for packages bound to `destination`.
    pub fn quote(
        &self,
        destination: &CountryCode,
        service_code: &str,
        packages: &[Package],
        policy: PackingPolicy,
    ) -> Option<StaticQuote> {
        let zone = self.zones.classify(destination);
        let key = CatalogKey::new(self.zones.prefix_for(zone), service_code);

        let Some(catalog) = self.catalogs.get(&key) else {
            tracing::debug!(%destination, %zone, catalog = %key, "no catalog registered");
            return None;
        };

        let candidates = catalog.candidates(zone);
        if candidates.is_empty() {
            tracing::debug!(%destination, %zone, catalog = %key, "no box priced for zone");
            return None;
        }

        let Some(resolution) = resolver::resolve(packages, &candidates, policy) else {
            tracing::debug!(%destination, %zone, catalog = %key, %policy, "no fitting box");
            return None;
        };

        Some(StaticQuote {
            catalog: catalog.name.clone(),
            key,
            zone,
            resolution,
        })
    }
}
