//! # Region Rules
//!
//! A region is a boolean combination of signed half-spaces:
//!
//! ```text
//! 1 -2 (3 : -4)        surface 1 positive, 2 negative, and either 3+ or 4-
//! #(5 6)               outside the intersection of 5+ and 6+
//! ```
//!
//! Juxtaposition is intersection, `:` is union (binding looser than
//! intersection), parentheses group, and `#` complements the group after it.
//!
//! ## Normal Form
//!
//! The tree is kept in a canonical shape by construction:
//!
//! - **Complement-free**: `#` is applied eagerly through De Morgan, so only
//!   leaves carry negation (as the sign of their identifier).
//! - **Flat**: an `And` never has an `And` child and an `Or` never has an
//!   `Or` child; combining two intersections concatenates their children.
//! - **Non-empty**: `And`/`Or` nodes have at least two children. The
//!   unconstrained and empty regions are the explicit sentinels
//!   [`RegionRule::ALWAYS`] and [`RegionRule::NEVER`], which only ever appear
//!   as a whole rule, never inside a larger one.

use std::fmt;
use std::num::NonZeroI32;
use std::ops::{BitAnd, BitOr, Not};
use std::str::FromStr;

use glam::DVec3;
use itertools::Itertools;

use crate::error::{BindingError, ParseError};
use crate::surface::{Sense, SurfaceLookup};

/// A signed surface number: magnitude names the surface, sign picks the side.
///
/// Zero is not a valid identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "i32", into = "i32")
)]
pub struct SurfaceId(NonZeroI32);

impl SurfaceId {
    /// `None` for zero, and for `i32::MIN` which has no negation.
    #[must_use]
    pub const fn new(raw: i32) -> Option<Self> {
        if raw == i32::MIN {
            return None;
        }
        match NonZeroI32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0.get()
    }

    /// The unsigned surface number.
    #[inline]
    #[must_use]
    pub const fn surface(self) -> u32 {
        self.0.get().unsigned_abs()
    }

    #[inline]
    #[must_use]
    pub const fn sense(self) -> Sense {
        if self.0.get() > 0 {
            Sense::Positive
        } else {
            Sense::Negative
        }
    }

    /// The same surface, other side.
    #[must_use]
    pub const fn negate(self) -> Self {
        // i32::MIN is rejected by `new`, so this cannot overflow
        match NonZeroI32::new(-self.0.get()) {
            Some(n) => Self(n),
            None => self,
        }
    }
}

impl TryFrom<i32> for SurfaceId {
    type Error = ParseError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Err(ParseError::ZeroSurface),
            _ => Self::new(raw).ok_or_else(|| ParseError::InvalidToken {
                token: raw.to_string(),
                position: 0,
            }),
        }
    }
}

impl From<SurfaceId> for i32 {
    fn from(id: SurfaceId) -> Self {
        id.get()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape of a rule's root node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Leaf,
    And,
    Or,
    Always,
    Never,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Node {
    Leaf(SurfaceId),
    And(Vec<RegionRule>),
    Or(Vec<RegionRule>),
    Always,
    Never,
}

/// A boolean region over signed surface identifiers.
///
/// # Examples
///
/// ```rust
/// use region_algebra::RegionRule;
///
/// let slab: RegionRule = "1 -2".parse().unwrap();
/// let hole: RegionRule = "-3".parse().unwrap();
/// let cell = slab & !hole;
/// assert_eq!(cell.serialize(), "1 -2 3");
/// assert_eq!((!cell).serialize(), "-1 : 2 : -3");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct RegionRule {
    pub(crate) node: Node,
}

impl RegionRule {
    /// The unconstrained region: every point.
    pub const ALWAYS: Self = Self { node: Node::Always };

    /// The empty region: no point.
    pub const NEVER: Self = Self { node: Node::Never };

    pub(crate) const fn from_node(node: Node) -> Self {
        Self { node }
    }

    /// A single signed half-space. Fails for zero.
    pub fn from_leaf(raw: i32) -> Result<Self, ParseError> {
        SurfaceId::try_from(raw).map(Self::leaf)
    }

    #[must_use]
    pub const fn leaf(id: SurfaceId) -> Self {
        Self {
            node: Node::Leaf(id),
        }
    }

    /// Intersection of every rule, [`ALWAYS`](Self::ALWAYS) if none.
    pub fn all_of<I: IntoIterator<Item = Self>>(rules: I) -> Self {
        rules.into_iter().fold(Self::ALWAYS, Self::intersect)
    }

    /// Union of every rule, [`NEVER`](Self::NEVER) if none.
    pub fn any_of<I: IntoIterator<Item = Self>>(rules: I) -> Self {
        rules.into_iter().fold(Self::NEVER, Self::union_with)
    }

    #[must_use]
    pub const fn kind(&self) -> RuleKind {
        match self.node {
            Node::Leaf(_) => RuleKind::Leaf,
            Node::And(_) => RuleKind::And,
            Node::Or(_) => RuleKind::Or,
            Node::Always => RuleKind::Always,
            Node::Never => RuleKind::Never,
        }
    }

    /// The identifier of a leaf rule.
    #[must_use]
    pub const fn id(&self) -> Option<SurfaceId> {
        match self.node {
            Node::Leaf(id) => Some(id),
            _ => None,
        }
    }

    /// Children of an `And`/`Or`; empty for everything else.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.node {
            Node::And(children) | Node::Or(children) => children,
            Node::Leaf(_) | Node::Always | Node::Never => &[],
        }
    }

    /// True only for the unconstrained region, which has no terms at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.node, Node::Always)
    }

    #[must_use]
    pub const fn is_always(&self) -> bool {
        matches!(self.node, Node::Always)
    }

    #[must_use]
    pub const fn is_never(&self) -> bool {
        matches!(self.node, Node::Never)
    }

    /// Intersection. Two `And`s concatenate; an `And` absorbs a single
    /// operand; anything else becomes a new two-child `And`.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let node = match (self.node, other.node) {
            (Node::Always, n) | (n, Node::Always) => n,
            (Node::Never, _) | (_, Node::Never) => Node::Never,
            (Node::And(mut a), Node::And(b)) => {
                a.extend(b);
                Node::And(a)
            }
            (Node::And(mut a), n) => {
                a.push(Self::from_node(n));
                Node::And(a)
            }
            (n, Node::And(b)) => {
                let mut children = Vec::with_capacity(b.len() + 1);
                children.push(Self::from_node(n));
                children.extend(b);
                Node::And(children)
            }
            (a, b) => Node::And(vec![Self::from_node(a), Self::from_node(b)]),
        };
        Self { node }
    }

    /// Union; the mirror of [`intersect`](Self::intersect).
    #[must_use]
    pub fn union_with(self, other: Self) -> Self {
        let node = match (self.node, other.node) {
            (Node::Never, n) | (n, Node::Never) => n,
            (Node::Always, _) | (_, Node::Always) => Node::Always,
            (Node::Or(mut a), Node::Or(b)) => {
                a.extend(b);
                Node::Or(a)
            }
            (Node::Or(mut a), n) => {
                a.push(Self::from_node(n));
                Node::Or(a)
            }
            (n, Node::Or(b)) => {
                let mut children = Vec::with_capacity(b.len() + 1);
                children.push(Self::from_node(n));
                children.extend(b);
                Node::Or(children)
            }
            (a, b) => Node::Or(vec![Self::from_node(a), Self::from_node(b)]),
        };
        Self { node }
    }

    /// De Morgan complement: leaves flip sign, `And` and `Or` swap.
    #[must_use]
    pub fn complement(&self) -> Self {
        let node = match &self.node {
            Node::Leaf(id) => Node::Leaf(id.negate()),
            Node::And(children) => Node::Or(children.iter().map(Self::complement).collect()),
            Node::Or(children) => Node::And(children.iter().map(Self::complement).collect()),
            Node::Always => Node::Never,
            Node::Never => Node::Always,
        };
        Self { node }
    }

    /// Every leaf identifier, depth first.
    #[must_use]
    pub fn leaves(&self) -> Vec<SurfaceId> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<SurfaceId>) {
        match &self.node {
            Node::Leaf(id) => out.push(*id),
            Node::And(children) | Node::Or(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            Node::Always | Node::Never => {}
        }
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match &self.node {
            Node::Leaf(_) => 1,
            Node::And(children) | Node::Or(children) => children.iter().map(Self::leaf_count).sum(),
            Node::Always | Node::Never => 0,
        }
    }

    /// Sorted, de-duplicated surface numbers referenced by the rule.
    #[must_use]
    pub fn surfaces(&self) -> Vec<u32> {
        self.leaves()
            .into_iter()
            .map(SurfaceId::surface)
            .sorted_unstable()
            .dedup()
            .collect()
    }

    /// Nesting depth; a leaf or sentinel has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Fail with the first leaf whose surface `lookup` cannot supply.
    pub fn check_bindings<L: SurfaceLookup + ?Sized>(&self, lookup: &L) -> Result<(), BindingError> {
        for id in self.leaves() {
            lookup.bound(id.surface())?;
        }
        Ok(())
    }

    /// Is `point` inside the region?
    ///
    /// Every leaf must be bound, even those a short-circuit would skip.
    pub fn evaluate<L: SurfaceLookup + ?Sized>(
        &self,
        point: DVec3,
        lookup: &L,
    ) -> Result<bool, BindingError> {
        self.check_bindings(lookup)?;
        Ok(self.evaluate_bound(point, lookup))
    }

    fn evaluate_bound<L: SurfaceLookup + ?Sized>(&self, point: DVec3, lookup: &L) -> bool {
        match &self.node {
            Node::Leaf(id) => lookup
                .surface(id.surface())
                .is_some_and(|s| s.sense(point) == id.sense()),
            Node::And(children) => children.iter().all(|c| c.evaluate_bound(point, lookup)),
            Node::Or(children) => children.iter().any(|c| c.evaluate_bound(point, lookup)),
            Node::Always => true,
            Node::Never => false,
        }
    }

    /// The textual form, parenthesising only where an `Or` sits inside an
    /// `And` or the other way round.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    fn write_child(&self, f: &mut fmt::Formatter<'_>, parent: RuleKind) -> fmt::Result {
        match (parent, &self.node) {
            (RuleKind::And, Node::Or(_)) | (RuleKind::Or, Node::And(_)) => write!(f, "({self})"),
            (_, Node::Always) => f.write_str("()"),
            _ => write!(f, "{self}"),
        }
    }
}

impl fmt::Display for RegionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, separator, kind) = match &self.node {
            Node::Leaf(id) => return write!(f, "{id}"),
            Node::Always => return Ok(()),
            Node::Never => return f.write_str("#()"),
            Node::And(children) => (children, " ", RuleKind::And),
            Node::Or(children) => (children, " : ", RuleKind::Or),
        };
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                f.write_str(separator)?;
            }
            child.write_child(f, kind)?;
        }
        Ok(())
    }
}

impl From<SurfaceId> for RegionRule {
    fn from(id: SurfaceId) -> Self {
        Self::leaf(id)
    }
}

impl FromStr for RegionRule {
    type Err = ParseError;

    /// Parse with plain signed integers as leaves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_numeric(s)
    }
}

impl TryFrom<String> for RegionRule {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RegionRule> for String {
    fn from(rule: RegionRule) -> Self {
        rule.serialize()
    }
}

impl Not for RegionRule {
    type Output = Self;

    fn not(self) -> Self {
        self.complement()
    }
}

impl Not for &RegionRule {
    type Output = RegionRule;

    fn not(self) -> RegionRule {
        self.complement()
    }
}

impl BitAnd for RegionRule {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersect(rhs)
    }
}

impl BitOr for RegionRule {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union_with(rhs)
    }
}
