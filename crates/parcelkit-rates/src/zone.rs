//! # Zone Classification
//!
//! Maps a destination country to a pricing [`Zone`] and to the short
//! prefix used to pick a sub-catalog (`"fr"`, `"dom"`, `"tom"`, or empty).
//!
//! A [`ZoneTable`] lists five mutually exclusive country sets checked in a
//! fixed order: home, overseas departments, overseas territories,
//! international A, international B. Anything else is international C.
//! The fallback is the broadest tier on purpose: an unknown code still
//! gets a price, it never fails.
//!
//! The prefix is derived from the zone, so `classify` and `prefix` cannot
//! disagree about which group a country belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

use parcelkit_core::CountryCode;

/// A priced geographic tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// The carrier's home country and associated micro-states.
    Domestic,
    /// First dependent-territory group.
    OverseasDepartment,
    /// Second dependent-territory group.
    OverseasTerritory,
    InternationalA,
    InternationalB,
    /// Everything not listed elsewhere.
    InternationalC,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domestic => write!(f, "domestic"),
            Self::OverseasDepartment => write!(f, "overseas_department"),
            Self::OverseasTerritory => write!(f, "overseas_territory"),
            Self::InternationalA => write!(f, "international_a"),
            Self::InternationalB => write!(f, "international_b"),
            Self::InternationalC => write!(f, "international_c"),
        }
    }
}

/// Prefix for overseas-department sub-catalogs.
pub const PREFIX_OVERSEAS_DEPARTMENT: &str = "dom";
/// Prefix for overseas-territory sub-catalogs.
pub const PREFIX_OVERSEAS_TERRITORY: &str = "tom";

/// Country sets for one carrier's zone scheme.
///
/// Sets are small (at most a few dozen entries), so membership is a linear
/// scan. Tables are `const`-constructible and meant to live in statics.
#[derive(Debug, Clone, Copy)]
pub struct ZoneTable {
    /// Prefix for home-zone sub-catalogs, e.g. `"fr"`.
    pub home_prefix: &'static str,
    pub home: &'static [&'static str],
    pub overseas_departments: &'static [&'static str],
    pub overseas_territories: &'static [&'static str],
    pub international_a: &'static [&'static str],
    pub international_b: &'static [&'static str],
}

impl ZoneTable {
    /// Resolve the pricing zone for a destination country. Total: unknown
    /// codes land in [`Zone::InternationalC`].
    pub fn classify(&self, country: &CountryCode) -> Zone {
        let code = country.as_str();
        let groups = [
            (self.home, Zone::Domestic),
            (self.overseas_departments, Zone::OverseasDepartment),
            (self.overseas_territories, Zone::OverseasTerritory),
            (self.international_a, Zone::InternationalA),
            (self.international_b, Zone::InternationalB),
        ];
        groups
            .iter()
            .find(|(set, _)| set.contains(&code))
            .map(|(_, zone)| *zone)
            .unwrap_or(Zone::InternationalC)
    }

    /// Sub-catalog prefix for a destination country.
    pub fn prefix(&self, country: &CountryCode) -> &'static str {
        self.prefix_for(self.classify(country))
    }

    /// Sub-catalog prefix for a zone. International tiers share the empty
    /// prefix; their catalogs differ by price column, not by name.
    pub fn prefix_for(&self, zone: Zone) -> &'static str {
        match zone {
            Zone::Domestic => self.home_prefix,
            Zone::OverseasDepartment => PREFIX_OVERSEAS_DEPARTMENT,
            Zone::OverseasTerritory => PREFIX_OVERSEAS_TERRITORY,
            Zone::InternationalA | Zone::InternationalB | Zone::InternationalC => "",
        }
    }

    /// Country codes listed in more than one set. Empty for a well-formed
    /// table.
    pub fn overlapping_codes(&self) -> Vec<&'static str> {
        let sets = [
            self.home,
            self.overseas_departments,
            self.overseas_territories,
            self.international_a,
            self.international_b,
        ];
        let mut seen: Vec<&'static str> = Vec::new();
        let mut repeated = Vec::new();
        for code in sets.iter().flat_map(|s| s.iter().copied()) {
            if seen.contains(&code) {
                repeated.push(code);
            } else {
                seen.push(code);
            }
        }
        repeated
    }
}
