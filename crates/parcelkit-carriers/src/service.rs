//! # Service-Code Directory
//!
//! Maps carrier service codes to display names, partitioned by origin
//! region (`"US"`, `"UK"`, `"FR"`, ...) with an `"international"` bucket
//! used when the origin region has no entry for a code.
//!
//! Directories are `const`-constructible and live in statics next to the
//! carrier that owns them.

/// Key of the fallback region.
pub const INTERNATIONAL: &str = "international";

/// One service a carrier offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub code: &'static str,
    pub name: &'static str,
}

/// Services offered from one origin region.
#[derive(Debug, Clone, Copy)]
pub struct ServiceRegion {
    pub key: &'static str,
    pub services: &'static [Service],
}

impl ServiceRegion {
    pub fn name_of(&self, code: &str) -> Option<&'static str> {
        self.services.iter().find(|s| s.code == code).map(|s| s.name)
    }
}

/// A carrier's full code → name directory.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDirectory {
    regions: &'static [ServiceRegion],
}

impl ServiceDirectory {
    pub const fn new(regions: &'static [ServiceRegion]) -> Self {
        Self { regions }
    }

    pub fn regions(&self) -> &'static [ServiceRegion] {
        self.regions
    }

    pub fn region(&self, key: &str) -> Option<&'static ServiceRegion> {
        self.regions.iter().find(|r| r.key == key)
    }

    /// Services for an origin region, or the international bucket when
    /// the region is not listed.
    pub fn services_for(&self, region: &str) -> &'static [Service] {
        self.region(region)
            .or_else(|| self.region(INTERNATIONAL))
            .map(|r| r.services)
            .unwrap_or(&[])
    }

    /// Display name for `code` shipped from `region`. Looks in the region
    /// first, then in the international bucket.
    pub fn name(&self, region: &str, code: &str) -> Option<&'static str> {
        self.region(region)
            .and_then(|r| r.name_of(code))
            .or_else(|| self.region(INTERNATIONAL).and_then(|r| r.name_of(code)))
    }

    /// True if any region lists `code`.
    pub fn contains(&self, code: &str) -> bool {
        self.regions.iter().any(|r| r.name_of(code).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DIRECTORY: ServiceDirectory = ServiceDirectory::new(&[
        ServiceRegion {
            key: "US",
            services: &[Service {
                code: "GROUND",
                name: "Ground",
            }],
        },
        ServiceRegion {
            key: INTERNATIONAL,
            services: &[
                Service {
                    code: "ECONOMY",
                    name: "International Economy",
                },
                Service {
                    code: "PRIORITY",
                    name: "International Priority",
                },
            ],
        },
    ]);

    #[test]
    fn region_lookup_then_international() {
        assert_eq!(DIRECTORY.name("US", "GROUND"), Some("Ground"));
        assert_eq!(
            DIRECTORY.name("US", "PRIORITY"),
            Some("International Priority")
        );
        assert_eq!(DIRECTORY.name("DE", "ECONOMY"), Some("International Economy"));
        assert_eq!(DIRECTORY.name("DE", "GROUND"), None);
    }

    #[test]
    fn unknown_region_lists_international_services() {
        let codes: Vec<_> = DIRECTORY.services_for("JP").iter().map(|s| s.code).collect();
        assert_eq!(codes, vec!["ECONOMY", "PRIORITY"]);
        assert_eq!(DIRECTORY.services_for("US").len(), 1);
    }

    #[test]
    fn contains_searches_every_region() {
        assert!(DIRECTORY.contains("GROUND"));
        assert!(DIRECTORY.contains("ECONOMY"));
        assert!(!DIRECTORY.contains("SAME_DAY"));
    }
}
