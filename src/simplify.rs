//! # Simplification
//!
//! Rewrites a rule into a smaller one that selects exactly the same points,
//! using [`ImplicationTester`] to compare sibling leaves.
//!
//! Working bottom-up, each `And`/`Or` node:
//!
//! 1. simplifies its children and splices in any child of the same kind;
//! 2. drops identity sentinels (`ALWAYS` under `And`, `NEVER` under `Or`) and
//!    collapses to the absorbing one if a child became it;
//! 3. drops structurally duplicate children;
//! 4. collapses to `NEVER` if two leaves of an `And` are disjoint, or to
//!    `ALWAYS` if two leaves of an `Or` cover everything;
//! 5. drops each leaf implied by a surviving sibling.
//!
//! In an `And` containing `A`, leaf `B` is redundant when `A ⇒ B`. In an `Or`
//! the direction flips: `B` is redundant when `B ⇒ A`. Both cases are handled
//! by testing an `Or` through the complements of its leaves, where it behaves
//! exactly like an `And`.
//!
//! The result is a fixed point: simplifying it again changes nothing.

use crate::error::BindingError;
use crate::implication::ImplicationTester;
use crate::region::{Node, RegionRule, RuleKind, SurfaceId};
use crate::surface::SurfaceLookup;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Junction {
    And,
    Or,
}

impl Junction {
    /// The sentinel that leaves this junction unchanged.
    const fn identity(self) -> RegionRule {
        match self {
            Self::And => RegionRule::ALWAYS,
            Self::Or => RegionRule::NEVER,
        }
    }

    /// The sentinel that swallows this junction.
    const fn absorbing(self) -> RegionRule {
        match self {
            Self::And => RegionRule::NEVER,
            Self::Or => RegionRule::ALWAYS,
        }
    }

    const fn kind(self) -> RuleKind {
        match self {
            Self::And => RuleKind::And,
            Self::Or => RuleKind::Or,
        }
    }

    /// Leaf as seen by the `And`-shaped tests.
    const fn view(self, id: SurfaceId) -> SurfaceId {
        match self {
            Self::And => id,
            Self::Or => id.negate(),
        }
    }

    fn build(self, children: Vec<RegionRule>) -> RegionRule {
        RegionRule::from_node(match self {
            Self::And => Node::And(children),
            Self::Or => Node::Or(children),
        })
    }
}

struct Simplifier<'a, L: ?Sized> {
    lookup: &'a L,
    tester: &'a ImplicationTester,
}

impl<L: SurfaceLookup + ?Sized> Simplifier<'_, L> {
    fn rule(&self, rule: &RegionRule) -> RegionRule {
        match &rule.node {
            Node::And(children) => self.junction(Junction::And, children),
            Node::Or(children) => self.junction(Junction::Or, children),
            Node::Leaf(_) | Node::Always | Node::Never => rule.clone(),
        }
    }

    fn junction(&self, op: Junction, children: &[RegionRule]) -> RegionRule {
        let mut terms: Vec<RegionRule> = Vec::with_capacity(children.len());
        for child in children {
            let child = self.rule(child);
            if child == op.identity() {
                continue;
            }
            if child == op.absorbing() {
                log::debug!("{op:?} absorbed by sentinel child");
                return op.absorbing();
            }
            let same_kind = child.kind() == op.kind();
            match child.node {
                Node::And(grand) | Node::Or(grand) if same_kind => {
                    for g in grand {
                        push_unique(&mut terms, g);
                    }
                }
                node => push_unique(&mut terms, RegionRule::from_node(node)),
            }
        }

        let leaves: Vec<(usize, SurfaceId)> = terms
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.id().map(|id| (i, op.view(id))))
            .collect();

        for (n, &(_, x)) in leaves.iter().enumerate() {
            for &(_, y) in &leaves[n + 1..] {
                if self.disjoint(x, y) {
                    log::debug!("{op:?} collapses: {x} and {y} cannot hold together");
                    return op.absorbing();
                }
            }
        }

        let mut dropped = vec![false; terms.len()];
        for &(j, y) in &leaves {
            let redundant = leaves
                .iter()
                .any(|&(i, x)| i != j && !dropped[i] && self.implies(x, y));
            if redundant {
                log::trace!("dropping redundant {} from {op:?}", terms[j]);
                dropped[j] = true;
            }
        }
        let mut keep = dropped.iter().map(|d| !d);
        terms.retain(|_| keep.next().unwrap_or(true));

        match terms.len() {
            0 => {
                log::debug!("{op:?} left empty");
                op.identity()
            }
            1 => terms.pop().unwrap_or_else(|| op.identity()),
            _ => op.build(terms),
        }
    }

    /// `x` and `y` share no point.
    fn disjoint(&self, x: SurfaceId, y: SurfaceId) -> bool {
        x == y.negate() || self.implies(x, y.negate())
    }

    /// Every point on side `x` is on side `y`.
    fn implies(&self, x: SurfaceId, y: SurfaceId) -> bool {
        if x.surface() == y.surface() {
            return x == y;
        }
        match (
            self.lookup.surface(x.surface()),
            self.lookup.surface(y.surface()),
        ) {
            (Some(a), Some(b)) => self.tester.implies(a, x.sense(), b, y.sense()),
            _ => false,
        }
    }
}

fn push_unique(terms: &mut Vec<RegionRule>, term: RegionRule) {
    if terms.contains(&term) {
        log::trace!("dropping duplicate {term}");
    } else {
        terms.push(term);
    }
}

impl RegionRule {
    /// Simplify with the default tolerance.
    ///
    /// Fails if any leaf names a surface `lookup` does not supply.
    pub fn simplify<L: SurfaceLookup + ?Sized>(&self, lookup: &L) -> Result<Self, BindingError> {
        self.simplify_with(lookup, &ImplicationTester::new())
    }

    /// Simplify using `tester` for the geometric comparisons.
    pub fn simplify_with<L: SurfaceLookup + ?Sized>(
        &self,
        lookup: &L,
        tester: &ImplicationTester,
    ) -> Result<Self, BindingError> {
        self.check_bindings(lookup)?;
        Ok(Simplifier { lookup, tester }.rule(self))
    }
}
