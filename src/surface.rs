//! # Primitive Surfaces
//!
//! Every primitive splits space into two half-spaces through an implicit
//! function `f(x)`:
//!
//! - **Positive side**: `f(x) > 0` (outside a closed surface, above a plane)
//! - **Negative side**: `f(x) ≤ 0` (inside, below)
//!
//! A signed surface identifier `+n` / `-n` selects one of the two sides of
//! surface `n`. This module only knows geometry; numbering lives in whatever
//! [`SurfaceLookup`] the caller hands in.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use glam::DVec3;
use rustc_hash::FxHashMap;

use crate::error::BindingError;

/// Default tolerance for geometric comparisons.
pub const EPSILON: f64 = 1e-7;

/// Which side of a surface a point (or signed identifier) is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    Negative,
    Positive,
}

impl Sense {
    /// `-1` or `1`.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::Positive => 1,
        }
    }

    /// `Some` for `±1`, `None` otherwise.
    #[must_use]
    pub const fn from_sign(sign: i8) -> Option<Self> {
        match sign {
            -1 => Some(Self::Negative),
            1 => Some(Self::Positive),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }
}

/// Classification of a point relative to a surface, with tolerance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    /// Strictly on the negative side: `f(x) < -ε`
    Inside,

    /// On the surface within tolerance: `|f(x)| ≤ ε`
    On,

    /// Strictly on the positive side: `f(x) > ε`
    Outside,
}

/// A plane `n · x = d`; the positive side is where `n · x > d`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plane {
    /// Unit normal vector pointing toward the positive side.
    pub normal: DVec3,
    /// Signed distance from origin to the plane.
    pub offset: f64,
}

impl Plane {
    /// Create a plane, normalizing the input normal vector.
    ///
    /// # Panics
    /// Panics if the normal vector has zero length.
    #[must_use]
    pub fn new(normal: DVec3, offset: f64) -> Self {
        let len = normal.length();
        assert!(len > EPSILON, "Normal vector must be non-zero");
        Self {
            normal: normal / len,
            offset: offset / len,
        }
    }

    /// Try to create, returning None if normal is zero.
    #[must_use]
    pub fn try_new(normal: DVec3, offset: f64) -> Option<Self> {
        let len = normal.length();
        (len >= EPSILON).then(|| Self {
            normal: normal / len,
            offset: offset / len,
        })
    }

    /// Signed distance: negative below, zero on the plane, positive above.
    #[must_use]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.offset
    }
}

/// An infinite circular cylinder; the positive side is outside.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cylinder {
    /// Any point on the axis.
    pub centre: DVec3,
    /// Unit axis direction.
    pub axis: DVec3,
    pub radius: f64,
}

impl Cylinder {
    /// # Panics
    /// Panics if the axis has zero length or the radius is not positive.
    #[must_use]
    pub fn new(centre: DVec3, axis: DVec3, radius: f64) -> Self {
        let len = axis.length();
        assert!(len > EPSILON, "Axis vector must be non-zero");
        assert!(radius > 0.0, "Radius must be positive");
        Self {
            centre,
            axis: axis / len,
            radius,
        }
    }

    #[must_use]
    pub fn try_new(centre: DVec3, axis: DVec3, radius: f64) -> Option<Self> {
        let len = axis.length();
        (len >= EPSILON && radius > 0.0).then(|| Self {
            centre,
            axis: axis / len,
            radius,
        })
    }

    /// Component of `point - centre` perpendicular to the axis.
    #[must_use]
    pub fn radial(&self, point: DVec3) -> DVec3 {
        let d = point - self.centre;
        d - self.axis * d.dot(self.axis)
    }
}

/// A double-sheeted circular cone; the positive side is outside both sheets.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cone {
    pub apex: DVec3,
    /// Unit axis direction.
    pub axis: DVec3,
    /// Half opening angle in radians, in `(0, π/2)`.
    pub half_angle: f64,
}

impl Cone {
    /// # Panics
    /// Panics if the axis has zero length or the angle is outside `(0, π/2)`.
    #[must_use]
    pub fn new(apex: DVec3, axis: DVec3, half_angle: f64) -> Self {
        let len = axis.length();
        assert!(len > EPSILON, "Axis vector must be non-zero");
        assert!(
            half_angle > 0.0 && half_angle < std::f64::consts::FRAC_PI_2,
            "Half angle must lie in (0, π/2)"
        );
        Self {
            apex,
            axis: axis / len,
            half_angle,
        }
    }
}

/// A sphere; the positive side is outside.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub centre: DVec3,
    pub radius: f64,
}

impl Sphere {
    /// # Panics
    /// Panics if the radius is not positive.
    #[must_use]
    pub fn new(centre: DVec3, radius: f64) -> Self {
        assert!(radius > 0.0, "Radius must be positive");
        Self { centre, radius }
    }
}

/// Any half-space partitioning primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Surface {
    Plane(Plane),
    Cylinder(Cylinder),
    Cone(Cone),
    Sphere(Sphere),
}

impl Surface {
    /// Implicit function value, scaled to approximate distance near the
    /// surface: positive outside, negative inside.
    #[must_use]
    pub fn value(&self, point: DVec3) -> f64 {
        match self {
            Self::Plane(p) => p.signed_distance(point),
            Self::Cylinder(c) => c.radial(point).length() - c.radius,
            Self::Cone(c) => {
                let d = point - c.apex;
                let along = d.dot(c.axis);
                let perp = (d - c.axis * along).length();
                let (sin, cos) = c.half_angle.sin_cos();
                perp * cos - along.abs() * sin
            }
            Self::Sphere(s) => (point - s.centre).length() - s.radius,
        }
    }

    /// Which half-space holds `point`. Points on the surface count as negative.
    #[must_use]
    pub fn sense(&self, point: DVec3) -> Sense {
        if self.value(point) > 0.0 {
            Sense::Positive
        } else {
            Sense::Negative
        }
    }

    /// Classify a point: Inside, On (within `epsilon`), or Outside.
    #[must_use]
    pub fn classify(&self, point: DVec3, epsilon: f64) -> Classification {
        let d = self.value(point);
        if d < -epsilon {
            Classification::Inside
        } else if d > epsilon {
            Classification::Outside
        } else {
            Classification::On
        }
    }

    /// Short name of the primitive kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Plane(_) => "plane",
            Self::Cylinder(_) => "cylinder",
            Self::Cone(_) => "cone",
            Self::Sphere(_) => "sphere",
        }
    }
}

impl From<Plane> for Surface {
    fn from(p: Plane) -> Self {
        Self::Plane(p)
    }
}

impl From<Cylinder> for Surface {
    fn from(c: Cylinder) -> Self {
        Self::Cylinder(c)
    }
}

impl From<Cone> for Surface {
    fn from(c: Cone) -> Self {
        Self::Cone(c)
    }
}

impl From<Sphere> for Surface {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}

/// Read-only map from surface number to primitive, supplied by the caller.
pub trait SurfaceLookup {
    fn surface(&self, number: u32) -> Option<&Surface>;

    /// Like [`surface`](Self::surface), but a missing entry is an error.
    fn bound(&self, number: u32) -> Result<&Surface, BindingError> {
        self.surface(number)
            .ok_or(BindingError { surface: number })
    }
}

/// The usual lookup: surface number to primitive.
pub type SurfaceMap = FxHashMap<u32, Surface>;

impl<S: BuildHasher> SurfaceLookup for HashMap<u32, Surface, S> {
    fn surface(&self, number: u32) -> Option<&Surface> {
        self.get(&number)
    }
}

impl SurfaceLookup for BTreeMap<u32, Surface> {
    fn surface(&self, number: u32) -> Option<&Surface> {
        self.get(&number)
    }
}

impl<L: SurfaceLookup + ?Sized> SurfaceLookup for &L {
    fn surface(&self, number: u32) -> Option<&Surface> {
        (**self).surface(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_classification() {
        let plane = Surface::from(Plane::new(DVec3::new(1.0, 0.0, 0.0), 1.0));

        assert_eq!(
            plane.classify(DVec3::new(0.0, 0.0, 0.0), EPSILON),
            Classification::Inside
        );
        assert_eq!(
            plane.classify(DVec3::new(1.0, 0.0, 0.0), EPSILON),
            Classification::On
        );
        assert_eq!(
            plane.classify(DVec3::new(2.0, 0.0, 0.0), EPSILON),
            Classification::Outside
        );
    }

    #[test]
    fn test_plane_normalizes() {
        let p = Plane::new(DVec3::new(0.0, 0.0, 2.0), 4.0);
        assert!((p.normal - DVec3::Z).length() < EPSILON);
        assert!((p.offset - 2.0).abs() < EPSILON);
        assert!(Plane::try_new(DVec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_cylinder_sense() {
        let c = Surface::from(Cylinder::new(DVec3::ZERO, DVec3::Z, 2.0));
        assert_eq!(c.sense(DVec3::new(1.0, 1.0, 50.0)), Sense::Negative);
        assert_eq!(c.sense(DVec3::new(3.0, 0.0, -9.0)), Sense::Positive);
        assert!((c.value(DVec3::new(5.0, 0.0, 0.0)) - 3.0).abs() < EPSILON);
        assert!(Cylinder::try_new(DVec3::ZERO, DVec3::Z, 0.0).is_none());
    }

    #[test]
    fn test_cone_and_sphere_sense() {
        let cone = Surface::from(Cone::new(DVec3::ZERO, DVec3::Z, std::f64::consts::FRAC_PI_4));
        assert_eq!(cone.sense(DVec3::new(0.5, 0.0, 1.0)), Sense::Negative);
        assert_eq!(cone.sense(DVec3::new(0.5, 0.0, -1.0)), Sense::Negative);
        assert_eq!(cone.sense(DVec3::new(2.0, 0.0, 1.0)), Sense::Positive);

        let sphere = Surface::from(Sphere::new(DVec3::ONE, 1.0));
        assert_eq!(sphere.sense(DVec3::ONE), Sense::Negative);
        assert_eq!(sphere.sense(DVec3::ZERO), Sense::Positive);
        assert_eq!(sphere.kind(), "sphere");
    }

    #[test]
    fn test_sense_signs() {
        assert_eq!(Sense::from_sign(-1), Some(Sense::Negative));
        assert_eq!(Sense::from_sign(0), None);
        assert_eq!(Sense::Positive.flip().sign(), -1);
    }

    #[test]
    fn test_lookup_binding() {
        let mut map = SurfaceMap::default();
        map.insert(3, Sphere::new(DVec3::ZERO, 1.0).into());
        assert!(map.bound(3).is_ok());
        assert_eq!(map.bound(4), Err(BindingError { surface: 4 }));

        let tree: BTreeMap<u32, Surface> = map.clone().into_iter().collect();
        assert!((&tree).surface(3).is_some());
    }
}
