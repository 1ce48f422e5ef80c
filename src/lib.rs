//! # `region_algebra`
//!
//! The geometry kernel behind a transport-deck builder: boolean regions over
//! signed surfaces, the geometric facts needed to simplify them, and two small
//! notations for writing down numbers tersely.
//!
//! ## Quick Start
//!
//! ```rust
//! use region_algebra::{Plane, RegionRule, SurfaceMap};
//! use region_algebra::math::DVec3;
//!
//! let mut surfaces = SurfaceMap::default();
//! surfaces.insert(1, Plane::new(DVec3::X, 0.0).into());
//! surfaces.insert(2, Plane::new(DVec3::X, 1.0).into());
//! surfaces.insert(3, Plane::new(DVec3::Y, 0.0).into());
//!
//! // x > 0, x > 1 and y > 0: the first half-space adds nothing
//! let cell: RegionRule = "1 2 3".parse().unwrap();
//! let simple = cell.simplify(&surfaces).unwrap();
//! assert_eq!(simple.serialize(), "2 3");
//! assert_eq!(simple.evaluate(DVec3::new(2.0, 1.0, 0.0), &surfaces), Ok(true));
//! ```
//!
//! ## Components
//!
//! - [`IntervalSet`]: a sorted, minimal set of disjoint closed integer ranges,
//!   used to track which identifiers are taken.
//! - [`CompactList`]: the `R`/`I`/`LOG`/`J` shorthand for numeric lists
//!   (`"1 3R 2I 10"`), parsed, expanded and re-serialized faithfully.
//! - [`ImplicationTester`]: decides `A^sA ⊆ B^sB` for plane and cylinder
//!   pairs, with an explicit tolerance.
//! - [`RegionRule`]: intersection, union and complement of signed half-spaces,
//!   with evaluation, serialization and implication-driven simplification.
//!
//! Everything is plain owned data. Surface primitives are never stored inside
//! a rule; they are supplied per call through a [`SurfaceLookup`].

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod compact_list;
mod error;
mod implication;
mod interval_set;
mod region;
mod region_parse;
mod simplify;
mod surface;

pub use compact_list::{CompactList, Entry, Item, MAX_EXPANDED_LEN};
pub use error::{BindingError, Error, IndexError, OrderError, ParseError, Result};
pub use implication::{Implication, ImplicationTester};
pub use interval_set::{Interval, IntervalSet};
pub use region::{RegionRule, RuleKind, SurfaceId};
pub use surface::{
    Classification, Cone, Cylinder, EPSILON, Plane, Sense, Sphere, Surface, SurfaceLookup,
    SurfaceMap,
};

/// Re-export glam types for convenience
pub mod math {
    pub use glam::DVec3;
}
