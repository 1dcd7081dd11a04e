//! Colissimo (La Poste) zone scheme and published box tariffs.
//!
//! Prices are in euro cents. Weights are in grams and dimensions in
//! millimetres.
//!
//! Catalogs, by prefix and service:
//!
//! | Prefix | Service | Zone column |
//! |--------|---------|-------------|
//! | `fr`   | `france` | domestic |
//! | `fr`   | `emballage_france` | domestic |
//! | `dom`  | `economique_outremer`, `outremer` | overseas department |
//! | `tom`  | `economique_outremer`, `outremer` | overseas territory |
//! | (none) | `europe` | international A |
//! | (none) | `international`, `emballage_international` | international B, C |

use std::sync::OnceLock;

use super::{boxed, tiered};
use crate::catalog::{CatalogKey, CatalogRegistry, RateCatalog};
use crate::selector::RateTable;
use crate::zone::{Zone, ZoneTable};

use Zone::{
    Domestic as FR, InternationalA as A, InternationalB as B, InternationalC as C,
    OverseasDepartment as DOM, OverseasTerritory as TOM,
};

pub const SERVICE_FRANCE: &str = "france";
pub const SERVICE_EMBALLAGE_FRANCE: &str = "emballage_france";
pub const SERVICE_ECONOMIQUE_OUTREMER: &str = "economique_outremer";
pub const SERVICE_OUTREMER: &str = "outremer";
pub const SERVICE_EUROPE: &str = "europe";
pub const SERVICE_INTERNATIONAL: &str = "international";
pub const SERVICE_EMBALLAGE_INTERNATIONAL: &str = "emballage_international";

/// France with Andorra and Monaco; DOM; TOM; EU + Switzerland; wider
/// Europe and the Maghreb.
pub static ZONES: ZoneTable = ZoneTable {
    home_prefix: "fr",
    home: &["FR", "AD", "MC"],
    overseas_departments: &["GP", "MQ", "GY", "RE", "YT"],
    overseas_territories: &["PM", "BL", "MF", "WF", "PF", "TF", "NC"],
    international_a: &[
        "AT", "BE", "BG", "CY", "HR", "DK", "ES", "EE", "FI", "GR", "HU", "IE", "IT", "LV", "LT",
        "LU", "MT", "NL", "PL", "PT", "CZ", "RO", "GB", "SK", "SI", "SE", "CH", "VA",
    ],
    international_b: &[
        "AL", "AM", "AZ", "BY", "BA", "GE", "IS", "LI", "MK", "MD", "ME", "RS", "TR", "UA", "NO",
        "DZ", "LY", "MO", "MR", "TN",
    ],
};

const PARCEL: [u32; 3] = [1000, 990, 990];
const OVERSEAS_PARCEL: [u32; 3] = [1000, 500, 500];
const INTERNATIONAL_PACK: [u32; 3] = [500, 250, 250];

pub fn france_rates() -> RateCatalog {
    tiered(
        "Colissimo France",
        PARCEL,
        &[
            ("pack-250", 250, &[(FR, 495)]),
            ("pack-500", 500, &[(FR, 615)]),
            ("pack-750", 750, &[(FR, 700)]),
            ("pack-1000", 1000, &[(FR, 765)]),
            ("pack-2000", 2000, &[(FR, 865)]),
            ("pack-5000", 5000, &[(FR, 1315)]),
            ("pack-10000", 10000, &[(FR, 1920)]),
            ("pack-30000", 30000, &[(FR, 2730)]),
        ],
    )
}

/// Prepaid Colissimo packaging sold for domestic use.
pub fn emballage_france_rates() -> RateCatalog {
    RateCatalog::new(
        "Colissimo Emballage France",
        vec![
            boxed("bubble-bag-XS", [180, 230, 20], 1000, &[(FR, 1000)]),
            boxed("bubble-bag-S", [290, 330, 20], 3000, &[(FR, 1000)]),
            boxed("cardboard-sleeve-XS", [220, 140, 50], 1000, &[(FR, 1000)]),
            boxed("cardboard-sleeve-S", [335, 215, 60], 3000, &[(FR, 1000)]),
            boxed("box-S", [280, 210, 20], 1000, &[(FR, 895)]),
            boxed("box-M", [230, 130, 100], 3000, &[(FR, 800)]),
            boxed("box-L", [315, 210, 157], 5000, &[(FR, 1200)]),
            boxed("CD", [217, 140, 60], 1000, &[(FR, 790)]),
            boxed("1-Bottle", [390, 168, 104], 2000, &[(FR, 1110)]),
            boxed("2-Bottles", [390, 297, 106], 5000, &[(FR, 1360)]),
            boxed("3-Bottles", [390, 425, 106], 7000, &[(FR, 1460)]),
        ],
    )
}

pub fn dom_economique_outremer_rates() -> RateCatalog {
    tiered(
        "Colissimo Economique Outre-Mer (DOM)",
        OVERSEAS_PARCEL,
        &[
            ("pack-500", 500, &[(DOM, 880)]),
            ("pack-1000", 1000, &[(DOM, 1150)]),
            ("pack-2000", 2000, &[(DOM, 1400)]),
            ("pack-5000", 5000, &[(DOM, 2500)]),
            ("pack-10000", 10000, &[(DOM, 3500)]),
            ("pack-20000", 30000, &[(DOM, 6500)]),
            ("pack-30000", 30000, &[(DOM, 9000)]),
        ],
    )
}

pub fn dom_outremer_rates() -> RateCatalog {
    tiered(
        "Colissimo Outre-Mer (DOM)",
        OVERSEAS_PARCEL,
        &[
            ("pack-500", 500, &[(DOM, 930)]),
            ("pack-1000", 1000, &[(DOM, 1410)]),
            ("pack-2000", 2000, &[(DOM, 1920)]),
            ("pack-5000", 5000, &[(DOM, 2890)]),
            ("pack-10000", 10000, &[(DOM, 4640)]),
            ("pack-30000", 30000, &[(DOM, 10360)]),
        ],
    )
}

pub fn tom_economique_outremer_rates() -> RateCatalog {
    tiered(
        "Colissimo Economique Outre-Mer (TOM)",
        OVERSEAS_PARCEL,
        &[
            ("pack-500", 500, &[(TOM, 1080)]),
            ("pack-1000", 1000, &[(TOM, 1630)]),
            ("pack-2000", 2000, &[(TOM, 2900)]),
            ("pack-5000", 5000, &[(TOM, 4800)]),
            ("pack-10000", 10000, &[(TOM, 9450)]),
            ("pack-30000", 30000, &[(TOM, 24800)]),
        ],
    )
}

pub fn tom_outremer_rates() -> RateCatalog {
    tiered(
        "Colissimo Outre-Mer (TOM)",
        PARCEL,
        &[
            ("pack-500", 500, &[(TOM, 1120)]),
            ("pack-1000", 1000, &[(TOM, 1680)]),
            ("pack-2000", 2000, &[(TOM, 2960)]),
            ("pack-5000", 5000, &[(TOM, 4960)]),
            ("pack-10000", 10000, &[(TOM, 9660)]),
            ("pack-30000", 30000, &[(TOM, 25000)]),
        ],
    )
}

pub fn europe_rates() -> RateCatalog {
    tiered(
        "Colissimo Europe",
        PARCEL,
        &[
            ("pack-500", 500, &[(A, 1230)]),
            ("pack-1000", 1000, &[(A, 1505)]),
            ("pack-2000", 2000, &[(A, 1680)]),
            ("pack-5000", 5000, &[(A, 2150)]),
            ("pack-10000", 10000, &[(A, 3550)]),
            ("pack-30000", 30000, &[(A, 5900)]),
        ],
    )
}

pub fn international_rates() -> RateCatalog {
    tiered(
        "Colissimo International",
        PARCEL,
        &[
            ("pack-500", 500, &[(B, 1640), (C, 2400)]),
            ("pack-1000", 1000, &[(B, 1960), (C, 2670)]),
            ("pack-2000", 2000, &[(B, 2140), (C, 3670)]),
            ("pack-5000", 5000, &[(B, 2750), (C, 5370)]),
            ("pack-10000", 10000, &[(B, 4550), (C, 10150)]),
            ("pack-20000", 10000, &[(B, 7100), (C, 16200)]),
        ],
    )
}

pub fn emballage_international_rates() -> RateCatalog {
    tiered(
        "Colissimo Emballage International",
        INTERNATIONAL_PACK,
        &[
            ("pack-500", 500, &[(B, 1620), (C, 2370)]),
            ("pack-1000", 1000, &[(B, 1935), (C, 2630)]),
            ("pack-2000", 2000, &[(B, 2105), (C, 3610)]),
            ("pack-5000", 5000, &[(B, 2700), (C, 5300)]),
            ("pack-10000", 10000, &[(B, 4500), (C, 10000)]),
            ("pack-20000", 10000, &[(B, 7000), (C, 16000)]),
        ],
    )
}

/// Every built-in catalog with the key it is registered under.
pub fn entries() -> Vec<(CatalogKey, RateCatalog)> {
    let builders: [(&str, &str, fn() -> RateCatalog); 9] = [
        ("fr", SERVICE_FRANCE, france_rates),
        ("fr", SERVICE_EMBALLAGE_FRANCE, emballage_france_rates),
        ("dom", SERVICE_ECONOMIQUE_OUTREMER, dom_economique_outremer_rates),
        ("dom", SERVICE_OUTREMER, dom_outremer_rates),
        ("tom", SERVICE_ECONOMIQUE_OUTREMER, tom_economique_outremer_rates),
        ("tom", SERVICE_OUTREMER, tom_outremer_rates),
        ("", SERVICE_EUROPE, europe_rates),
        ("", SERVICE_INTERNATIONAL, international_rates),
        ("", SERVICE_EMBALLAGE_INTERNATIONAL, emballage_international_rates),
    ];
    builders
        .into_iter()
        .map(|(prefix, service, build)| (CatalogKey::new(prefix, service), build()))
        .collect()
}

/// The process-wide Colissimo registry, built on first use.
pub fn registry() -> &'static CatalogRegistry {
    static REGISTRY: OnceLock<CatalogRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = CatalogRegistry::new();
        for (key, catalog) in entries() {
            registry.insert(key, catalog);
        }
        registry
    })
}

/// Colissimo zones paired with the built-in registry.
pub fn rate_table() -> RateTable<'static> {
    RateTable::new(&ZONES, registry())
}
