//! # Half-Space Implication
//!
//! Decides whether being on one side of surface `A` guarantees being on a
//! given side of surface `B`, for every point in space. The answer is a sign
//! pair `(sA, sB)`: `A^sA ⊆ B^sB`, or `(0, 0)` when nothing can be proven.
//!
//! Only four pairings have geometric rules:
//!
//! | A        | B        | Provable when                                    |
//! |----------|----------|--------------------------------------------------|
//! | plane    | plane    | normals equal, or opposite with disjoint `+` sides |
//! | plane    | cylinder | normal ⟂ axis and the cylinder misses the plane  |
//! | cylinder | plane    | mirror of the above                              |
//! | cylinder | cylinder | axes parallel and one cross-section nests in the other |
//!
//! Every other pairing returns `(0, 0)`. A `(0, 0)` answer never means "the
//! half-spaces overlap", only that no rule applies.

use crate::surface::{Cylinder, EPSILON, Plane, Sense, Surface};

/// Sign pair `(a, b)`: side `a` of the first surface lies inside side `b` of
/// the second. `(0, 0)` means no implication.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Implication {
    pub a: i8,
    pub b: i8,
}

impl Implication {
    pub const NONE: Self = Self { a: 0, b: 0 };

    #[must_use]
    pub const fn new(a: Sense, b: Sense) -> Self {
        Self {
            a: a.sign(),
            b: b.sign(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.a == 0 && self.b == 0
    }

    #[inline]
    #[must_use]
    pub const fn signs(self) -> (i8, i8) {
        (self.a, self.b)
    }

    /// The same fact stated for the reversed pair: `A^a ⊆ B^b` is
    /// `B^-b ⊆ A^-a`.
    #[must_use]
    pub const fn contrapositive(self) -> Self {
        Self {
            a: -self.b,
            b: -self.a,
        }
    }

    /// Both signs as senses, or `None` for [`NONE`](Self::NONE).
    #[must_use]
    pub const fn senses(self) -> Option<(Sense, Sense)> {
        match (Sense::from_sign(self.a), Sense::from_sign(self.b)) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        }
    }
}

/// Pairwise implication tests with a fixed numerical tolerance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImplicationTester {
    epsilon: f64,
}

impl Default for ImplicationTester {
    fn default() -> Self {
        Self::new()
    }
}

impl ImplicationTester {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_epsilon(EPSILON)
    }

    /// Create with custom numerical tolerance.
    #[must_use]
    pub const fn with_epsilon(epsilon: f64) -> Self {
        Self { epsilon }
    }

    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// The implication this pair of surfaces supports, in the order given.
    #[must_use]
    pub fn implication(&self, a: &Surface, b: &Surface) -> Implication {
        match (a, b) {
            (Surface::Plane(pa), Surface::Plane(pb)) => self.plane_plane(pa, pb),
            (Surface::Plane(p), Surface::Cylinder(c)) => self.plane_cylinder(p, c),
            (Surface::Cylinder(c), Surface::Plane(p)) => {
                self.plane_cylinder(p, c).contrapositive()
            }
            (Surface::Cylinder(ca), Surface::Cylinder(cb)) => self.cylinder_cylinder(ca, cb),
            (Surface::Cone(_) | Surface::Sphere(_), _)
            | (_, Surface::Cone(_) | Surface::Sphere(_)) => Implication::NONE,
        }
    }

    /// Is `a^sense_a ⊆ b^sense_b` provable? Returns the queried signs if so,
    /// `(0, 0)` otherwise. Checks both the direct pair and the contrapositive
    /// of the reversed pair.
    #[must_use]
    pub fn query(&self, a: &Surface, sense_a: Sense, b: &Surface, sense_b: Sense) -> Implication {
        let wanted = Implication::new(sense_a, sense_b);
        if self.implication(a, b) == wanted || self.implication(b, a).contrapositive() == wanted {
            wanted
        } else {
            Implication::NONE
        }
    }

    #[must_use]
    pub fn implies(&self, a: &Surface, sense_a: Sense, b: &Surface, sense_b: Sense) -> bool {
        !self.query(a, sense_a, b, sense_b).is_none()
    }

    /// Planes whose offsets differ by at most `epsilon` count as coincident,
    /// so each side implies the matching side of the other in both
    /// directions. Points inside that band may change membership when
    /// [`RegionRule::simplify`](crate::RegionRule::simplify) drops one of them.
    fn plane_plane(&self, a: &Plane, b: &Plane) -> Implication {
        let eps = self.epsilon;
        if (a.normal - b.normal).length() < eps {
            // Parallel, same orientation: the higher plane's + side sits
            // inside the lower one's, and the lower one's - side inside the
            // higher one's.
            if a.offset >= b.offset - eps {
                Implication { a: 1, b: 1 }
            } else {
                Implication { a: -1, b: -1 }
            }
        } else if (a.normal + b.normal).length() < eps {
            // b+ is n·x < -b.offset
            if a.offset + b.offset > -eps {
                Implication { a: 1, b: -1 }
            } else {
                Implication::NONE
            }
        } else {
            Implication::NONE
        }
    }

    fn plane_cylinder(&self, p: &Plane, c: &Cylinder) -> Implication {
        if p.normal.dot(c.axis).abs() > self.epsilon {
            return Implication::NONE;
        }
        let d = p.signed_distance(c.centre);
        if d.abs() - c.radius <= self.epsilon {
            return Implication::NONE;
        }
        if d < 0.0 {
            // whole cylinder below the plane
            Implication { a: 1, b: 1 }
        } else {
            Implication { a: -1, b: 1 }
        }
    }

    fn cylinder_cylinder(&self, a: &Cylinder, b: &Cylinder) -> Implication {
        // infinite cylinders: any tilt eventually breaks nesting
        if a.axis.cross(b.axis).length() > self.epsilon {
            return Implication::NONE;
        }
        let dist = a.radial(b.centre).length();
        if a.radius - dist - b.radius > self.epsilon {
            // b nested in a
            Implication { a: 1, b: 1 }
        } else if b.radius - dist - a.radius > self.epsilon {
            Implication { a: -1, b: -1 }
        } else {
            Implication::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::surface::{Cone, Sphere};

    fn plane(normal: DVec3, offset: f64) -> Surface {
        Plane::new(normal, offset).into()
    }

    fn cylinder(centre: DVec3, axis: DVec3, radius: f64) -> Surface {
        Cylinder::new(centre, axis, radius).into()
    }

    const POS: Sense = Sense::Positive;
    const NEG: Sense = Sense::Negative;

    #[test]
    fn test_parallel_planes() {
        let tester = ImplicationTester::new();
        let high = plane(DVec3::Z, 2.0);
        let low = plane(DVec3::Z, 1.0);

        assert_eq!(tester.implication(&high, &low).signs(), (1, 1));
        assert_eq!(tester.query(&high, POS, &low, POS).signs(), (1, 1));

        // Reversed offsets: + does not imply +, but - implies -
        assert_eq!(tester.query(&low, POS, &high, POS), Implication::NONE);
        assert_eq!(tester.implication(&low, &high).signs(), (-1, -1));
        assert!(tester.implies(&low, NEG, &high, NEG));
        assert!(!tester.implies(&high, NEG, &low, NEG));
    }

    #[test]
    fn test_opposite_planes() {
        let tester = ImplicationTester::new();
        // z > 2 and -z > -5 (i.e. z < 5): + sides overlap
        let a = plane(DVec3::Z, 2.0);
        let b = plane(-DVec3::Z, -5.0);
        assert_eq!(tester.implication(&a, &b), Implication::NONE);

        // z > 2 and z < 1: disjoint + sides
        let c = plane(-DVec3::Z, -1.0);
        assert_eq!(tester.implication(&a, &c).signs(), (1, -1));
        assert!(tester.implies(&c, POS, &a, NEG));
    }

    #[test]
    fn test_oblique_planes() {
        let tester = ImplicationTester::new();
        let a = plane(DVec3::X, 1.0);
        let b = plane(DVec3::new(1.0, 1.0, 0.0), 1.0);
        assert_eq!(tester.implication(&a, &b), Implication::NONE);
    }

    #[test]
    fn test_near_coincident_planes() {
        let tester = ImplicationTester::new();
        let a = plane(DVec3::Z, 1.0);
        let b = plane(DVec3::new(0.0, 1e-12, 1.0), 1.0 + 1e-12);
        assert!(tester.implies(&a, POS, &b, POS));
        assert!(tester.implies(&b, POS, &a, POS));
    }

    #[test]
    fn test_plane_cylinder() {
        let tester = ImplicationTester::new();
        let p = plane(DVec3::X, 10.0);
        let small = cylinder(DVec3::ZERO, DVec3::Z, 2.0);
        let large = cylinder(DVec3::ZERO, DVec3::Z, 20.0);

        // + side of the plane lies outside the small cylinder
        assert_eq!(tester.implication(&p, &small).signs(), (1, 1));
        assert_eq!(tester.implication(&p, &large), Implication::NONE);

        // mirror: inside the cylinder implies below the plane
        assert_eq!(tester.implication(&small, &p).signs(), (-1, -1));
        assert!(tester.implies(&small, NEG, &p, NEG));
        assert!(tester.implies(&p, POS, &small, POS));
    }

    #[test]
    fn test_plane_cylinder_other_side() {
        let tester = ImplicationTester::new();
        let p = plane(DVec3::X, -10.0);
        let c = cylinder(DVec3::ZERO, DVec3::Z, 2.0);
        assert_eq!(tester.implication(&p, &c).signs(), (-1, 1));
        assert!(tester.implies(&c, NEG, &p, POS));
    }

    #[test]
    fn test_plane_cylinder_not_perpendicular() {
        let tester = ImplicationTester::new();
        let p = plane(DVec3::Z, 10.0);
        let c = cylinder(DVec3::ZERO, DVec3::Z, 2.0);
        assert_eq!(tester.implication(&p, &c), Implication::NONE);
    }

    #[test]
    fn test_nested_cylinders() {
        let tester = ImplicationTester::new();
        let outer = cylinder(DVec3::ZERO, DVec3::Z, 10.0);
        let inner = cylinder(DVec3::new(2.0, 0.0, 100.0), -DVec3::Z, 3.0);

        assert_eq!(tester.implication(&inner, &outer).signs(), (-1, -1));
        assert_eq!(tester.implication(&outer, &inner).signs(), (1, 1));
        assert!(tester.implies(&inner, NEG, &outer, NEG));

        // touching cross-sections prove nothing
        let touching = cylinder(DVec3::new(7.0, 0.0, 0.0), DVec3::Z, 3.0);
        assert_eq!(tester.implication(&touching, &outer), Implication::NONE);

        let skew = cylinder(DVec3::ZERO, DVec3::X, 1.0);
        assert_eq!(tester.implication(&skew, &outer), Implication::NONE);
    }

    #[test]
    fn test_slightly_tilted_cylinders() {
        let tester = ImplicationTester::new();
        let outer = cylinder(DVec3::ZERO, DVec3::Z, 10.0);
        let angle: f64 = 3e-4;
        let tilted = cylinder(DVec3::ZERO, DVec3::new(angle.sin(), 0.0, angle.cos()), 3.0);

        // far enough along z the tilted one leaves the outer one
        assert_eq!(tester.implication(&outer, &tilted), Implication::NONE);
        assert_eq!(tester.implication(&tilted, &outer), Implication::NONE);
        assert!(!tester.implies(&tilted, NEG, &outer, NEG));

        let loose = ImplicationTester::with_epsilon(1e-3);
        assert_eq!(loose.implication(&outer, &tilted).signs(), (1, 1));
    }

    #[test]
    fn test_unsupported_pairs() {
        let tester = ImplicationTester::new();
        let s = Surface::from(Sphere::new(DVec3::ZERO, 1.0));
        let k = Surface::from(Cone::new(DVec3::ZERO, DVec3::Z, 0.3));
        let p = plane(DVec3::Z, 5.0);
        assert_eq!(tester.implication(&s, &p), Implication::NONE);
        assert_eq!(tester.implication(&p, &k), Implication::NONE);
        assert_eq!(tester.implication(&s, &k), Implication::NONE);
    }

    #[test]
    fn test_custom_epsilon() {
        let loose = ImplicationTester::with_epsilon(0.5);
        let a = plane(DVec3::Z, 1.0);
        let b = plane(DVec3::Z, 1.3);
        // Within the loose tolerance the planes count as coincident
        assert!(loose.implies(&a, POS, &b, POS));
        assert!(!ImplicationTester::new().implies(&a, POS, &b, POS));
    }

    #[test]
    fn test_implication_helpers() {
        let imp = Implication::new(POS, NEG);
        assert_eq!(imp.contrapositive().signs(), (1, -1));
        assert_eq!(Implication { a: -1, b: 1 }.contrapositive().signs(), (-1, 1));
        assert_eq!(imp.senses(), Some((POS, NEG)));
        assert!(Implication::NONE.is_none());
        assert_eq!(Implication::NONE.senses(), None);
    }
}
