//! # Bin-Selection Resolver
//!
//! Chooses the cheapest box(es) that physically hold a shipment's packages.
//!
//! ## Fitting
//!
//! A package fits a box when its weight is at most the box's weight
//! capacity and its three dimensions, in some rotation, are each at most
//! the matching box dimension. Sorting both triples in descending order
//! and comparing pairwise decides this for axis-aligned rotations. Unset
//! (zero) package measurements are unconstrained and always satisfied.
//!
//! ## Selection
//!
//! Among fitting boxes the lowest zone price wins, then the smallest
//! weight capacity (tightest box), then catalog order.
//!
//! ## Packing policies
//!
//! - [`PackingPolicy::Separate`]: each package gets its own box and the
//!   prices are summed. If any package fits nothing, the whole shipment
//!   has no rate.
//! - [`PackingPolicy::Consolidate`]: one box must hold every package: each
//!   package fits individually, the summed weight is within capacity, and
//!   the summed package volume is within the box volume. There is no
//!   multi-box fallback; if no single box qualifies there is no rate.
//!
//! Resolution is pure. It reads the packages and candidates and returns a
//! fresh [`Resolution`], so it is safe to run concurrently against shared
//! catalogs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use parcelkit_core::Package;

use crate::catalog::{PricedBox, RateBox};

/// How a multi-package shipment is matched against a catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackingPolicy {
    /// One box per package, prices summed.
    #[default]
    Separate,
    /// All packages in a single box.
    Consolidate,
}

impl fmt::Display for PackingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separate => write!(f, "separate"),
            Self::Consolidate => write!(f, "consolidate"),
        }
    }
}

/// A box chosen for one or more packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxMatch {
    /// Id of the chosen [`RateBox`](crate::catalog::RateBox).
    pub box_id: String,
    /// Indices into the shipment's package list.
    pub packages: Vec<usize>,
    /// Box price in minor units.
    pub price_minor: u64,
    /// Box price in major units.
    pub price: Decimal,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub policy: PackingPolicy,
    pub matches: Vec<BoxMatch>,
    /// Sum of the matched box prices, major units.
    pub total: Decimal,
}

impl Resolution {
    /// Matched box ids in package order.
    pub fn box_ids(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.box_id.clone()).collect()
    }
}

/// Whether `package` fits in `rate_box`, allowing rotation.
pub fn fits(package: &Package, rate_box: &RateBox) -> bool {
    if package.weight_or_zero() > f64::from(rate_box.max_weight) {
        return false;
    }
    let mut inner = package.dimensions();
    let mut outer = rate_box.dimensions().map(f64::from);
    sort_descending(&mut inner);
    sort_descending(&mut outer);
    inner.iter().zip(outer.iter()).all(|(p, b)| p <= b)
}

fn sort_descending(dims: &mut [f64; 3]) {
    dims.sort_by(|a, b| b.total_cmp(a));
}

/// Ordering key: price, then weight capacity, then catalog position.
fn selection_key(candidate: &PricedBox<'_>) -> (u64, u32, usize) {
    (
        candidate.price_minor,
        candidate.rate_box.max_weight,
        candidate.position,
    )
}

/// The cheapest candidate that fits `package`.
pub fn select_box<'c, 'a>(
    package: &Package,
    candidates: &'c [PricedBox<'a>],
) -> Option<&'c PricedBox<'a>> {
    candidates
        .iter()
        .filter(|c| fits(package, c.rate_box))
        .min_by_key(|c| selection_key(c))
}

/// Match `packages` against zone-filtered `candidates` under `policy`.
///
/// Returns `None` when there is nothing to quote: no packages, no
/// candidates, or some package (or the consolidated set) fits no box.
pub fn resolve(
    packages: &[Package],
    candidates: &[PricedBox<'_>],
    policy: PackingPolicy,
) -> Option<Resolution> {
    if packages.is_empty() || candidates.is_empty() {
        return None;
    }
    let matches = match policy {
        PackingPolicy::Separate => separate(packages, candidates)?,
        PackingPolicy::Consolidate => vec![consolidate(packages, candidates)?],
    };
    let total = matches.iter().map(|m| m.price).sum();
    Some(Resolution {
        policy,
        matches,
        total,
    })
}

fn separate(packages: &[Package], candidates: &[PricedBox<'_>]) -> Option<Vec<BoxMatch>> {
    packages
        .iter()
        .enumerate()
        .map(|(index, package)| match select_box(package, candidates) {
            Some(chosen) => Some(box_match(chosen, vec![index])),
            None => {
                tracing::debug!(package = index, "no box fits package");
                None
            }
        })
        .collect()
}

fn consolidate(packages: &[Package], candidates: &[PricedBox<'_>]) -> Option<BoxMatch> {
    let total_weight: f64 = packages.iter().map(Package::weight_or_zero).sum();
    let total_volume: f64 = packages.iter().map(Package::volume).sum();

    let chosen = candidates
        .iter()
        .filter(|c| f64::from(c.rate_box.max_weight) >= total_weight)
        .filter(|c| c.rate_box.volume() >= total_volume)
        .filter(|c| packages.iter().all(|p| fits(p, c.rate_box)))
        .min_by_key(|c| selection_key(c));

    match chosen {
        Some(chosen) => Some(box_match(chosen, (0..packages.len()).collect())),
        None => {
            tracing::debug!(
                packages = packages.len(),
                total_weight,
                "no single box holds all packages"
            );
            None
        }
    }
}

fn box_match(chosen: &PricedBox<'_>, packages: Vec<usize>) -> BoxMatch {
    BoxMatch {
        box_id: chosen.rate_box.id.clone(),
        packages,
        price_minor: chosen.price_minor,
        price: chosen.price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RateCatalog;
    use crate::zone::Zone;

    fn catalog() -> RateCatalog {
        RateCatalog::new(
            "test",
            vec![
                RateBox::new("small", [30, 20, 10], 500).price(Zone::Domestic, 400),
                RateBox::new("medium", [40, 30, 20], 1000).price(Zone::Domestic, 600),
                RateBox::new("large", [60, 40, 40], 5000).price(Zone::Domestic, 900),
                RateBox::new("intl-only", [100, 100, 100], 10000)
                    .price(Zone::InternationalC, 100),
            ],
        )
    }

    fn ids(res: &Option<Resolution>) -> Vec<String> {
        res.as_ref().map(Resolution::box_ids).unwrap_or_default()
    }

    #[test]
    fn rotated_package_fits() {
        let b = RateBox::new("b", [30, 20, 10], 500);
        assert!(fits(&Package::new(400.0, 10.0, 20.0, 30.0), &b));
        assert!(fits(&Package::new(400.0, 20.0, 30.0, 10.0), &b));
        assert!(!fits(&Package::new(400.0, 31.0, 20.0, 10.0), &b));
    }

    #[test]
    fn weight_boundary_is_inclusive() {
        let b = RateBox::new("b", [30, 20, 10], 500);
        assert!(fits(&Package::new(500.0, 1.0, 1.0, 1.0), &b));
        assert!(!fits(&Package::new(500.5, 1.0, 1.0, 1.0), &b));
    }

    #[test]
    fn zero_dimensions_match_on_weight_alone() {
        let b = RateBox::new("b", [1, 1, 1], 500);
        let p = Package {
            weight: Some(250.0),
            ..Package::default()
        };
        assert!(fits(&p, &b));
        assert!(fits(&Package::default(), &b));
    }

    #[test]
    fn partially_unset_dimensions_are_unconstrained() {
        let b = RateBox::new("b", [10, 10, 40], 500);
        let p = Package {
            length: Some(35.0),
            ..Package::default()
        };
        assert!(fits(&p, &b));
    }

    #[test]
    fn cheapest_fitting_box_wins() {
        let cat = catalog();
        let c = cat.candidates(Zone::Domestic);
        let res = resolve(&[Package::new(800.0, 35.0, 25.0, 15.0)], &c, PackingPolicy::Separate);
        assert_eq!(ids(&res), vec!["medium"]);
        assert_eq!(res.unwrap().total, Decimal::new(600, 2));
    }

    #[test]
    fn overweight_package_has_no_rate() {
        let cat = catalog();
        let c = cat.candidates(Zone::Domestic);
        assert!(resolve(&[Package::new(6000.0, 1.0, 1.0, 1.0)], &c, PackingPolicy::Separate).is_none());
    }

    #[test]
    fn tie_prefers_smaller_weight_capacity_then_order() {
        let cat = RateCatalog::new(
            "ties",
            vec![
                RateBox::new("heavy", [10, 10, 10], 2000).price(Zone::Domestic, 500),
                RateBox::new("light-a", [10, 10, 10], 1000).price(Zone::Domestic, 500),
                RateBox::new("light-b", [10, 10, 10], 1000).price(Zone::Domestic, 500),
            ],
        );
        let c = cat.candidates(Zone::Domestic);
        let res = resolve(&[Package::new(10.0, 1.0, 1.0, 1.0)], &c, PackingPolicy::Separate);
        assert_eq!(ids(&res), vec!["light-a"]);
    }

    #[test]
    fn separate_sums_each_package() {
        let cat = catalog();
        let c = cat.candidates(Zone::Domestic);
        let res = resolve(
            &[
                Package::new(100.0, 10.0, 10.0, 10.0),
                Package::new(3000.0, 50.0, 30.0, 30.0),
            ],
            &c,
            PackingPolicy::Separate,
        )
        .unwrap();
        assert_eq!(res.box_ids(), vec!["small", "large"]);
        assert_eq!(res.matches[1].packages, vec![1]);
        assert_eq!(res.total, Decimal::new(1300, 2));
    }

    #[test]
    fn separate_fails_whole_shipment_when_one_package_misfits() {
        let cat = catalog();
        let c = cat.candidates(Zone::Domestic);
        let res = resolve(
            &[
                Package::new(100.0, 10.0, 10.0, 10.0),
                Package::new(100.0, 70.0, 10.0, 10.0),
            ],
            &c,
            PackingPolicy::Separate,
        );
        assert!(res.is_none());
    }

    #[test]
    fn consolidate_uses_one_box_for_all() {
        let cat = catalog();
        let c = cat.candidates(Zone::Domestic);
        let res = resolve(
            &[
                Package::new(300.0, 20.0, 20.0, 10.0),
                Package::new(300.0, 20.0, 20.0, 10.0),
            ],
            &c,
            PackingPolicy::Consolidate,
        )
        .unwrap();
        assert_eq!(res.box_ids(), vec!["medium"]);
        assert_eq!(res.matches[0].packages, vec![0, 1]);
        assert_eq!(res.total, Decimal::new(600, 2));
    }

    #[test]
    fn consolidate_fails_closed_without_single_box() {
        let cat = catalog();
        let c = cat.candidates(Zone::Domestic);
        let res = resolve(
            &[
                Package::new(3000.0, 10.0, 10.0, 10.0),
                Package::new(3000.0, 10.0, 10.0, 10.0),
            ],
            &c,
            PackingPolicy::Consolidate,
        );
        assert!(res.is_none());
    }

    #[test]
    fn empty_inputs_have_no_rate() {
        let cat = catalog();
        let c = cat.candidates(Zone::Domestic);
        assert!(resolve(&[], &c, PackingPolicy::Separate).is_none());
        assert!(resolve(&[Package::default()], &[], PackingPolicy::Separate).is_none());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn dims() -> impl Strategy<Value = (f64, f64, f64)> {
            (0.0f64..70.0, 0.0f64..70.0, 0.0f64..70.0)
        }

        proptest! {
            /// Any permutation of a package's dimensions resolves identically.
            #[test]
            fn resolution_is_rotation_invariant(w in 0.0f64..6000.0, (l, wd, h) in dims()) {
                let cat = catalog();
                let c = cat.candidates(Zone::Domestic);
                let base = resolve(&[Package::new(w, l, wd, h)], &c, PackingPolicy::Separate);
                for (a, b, d) in [(l, h, wd), (wd, l, h), (wd, h, l), (h, l, wd), (h, wd, l)] {
                    let rotated = resolve(&[Package::new(w, a, b, d)], &c, PackingPolicy::Separate);
                    prop_assert_eq!(&rotated, &base);
                }
            }

            /// Resolving twice gives the same answer.
            #[test]
            fn resolution_is_idempotent(w in 0.0f64..6000.0, (l, wd, h) in dims()) {
                let cat = catalog();
                let c = cat.candidates(Zone::Domestic);
                let packages = [Package::new(w, l, wd, h), Package::new(w / 2.0, h, l, wd)];
                let first = resolve(&packages, &c, PackingPolicy::Separate);
                let second = resolve(&packages, &c, PackingPolicy::Separate);
                prop_assert_eq!(first, second);
            }

            /// Raising the price of a box that was not chosen never changes the choice.
            #[test]
            fn raising_unchosen_price_keeps_selection(
                w in 0.0f64..6000.0,
                (l, wd, h) in dims(),
                bump in 1u64..10_000,
            ) {
                let cat = catalog();
                let c = cat.candidates(Zone::Domestic);
                let package = [Package::new(w, l, wd, h)];
                if let Some(res) = resolve(&package, &c, PackingPolicy::Separate) {
                    let chosen = res.matches[0].box_id.clone();
                    let mut raised = cat.clone();
                    for b in raised.boxes.iter_mut().filter(|b| b.id != chosen) {
                        if let Some(p) = b.price_by_zone.get_mut(&Zone::Domestic) {
                            *p += bump;
                        }
                    }
                    let rc = raised.candidates(Zone::Domestic);
                    let again = resolve(&package, &rc, PackingPolicy::Separate).unwrap();
                    prop_assert_eq!(&again.matches[0].box_id, &chosen);
                }
            }
        }
    }
}
