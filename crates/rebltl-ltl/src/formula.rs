//! LTL formula trees produced by conversion.

use std::collections::BTreeSet;

use serde::Serialize;

/// A formula over atomic propositions referenced by index.
///
/// Indices point into the proposition list of the enclosing
/// [`LabelledFormula`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    Atom(usize),
    And(Box<Formula>, Box<Formula>),
    Or(Box<Formula>, Box<Formula>),
    Next(Box<Formula>),
    Globally(Box<Formula>),
    Eventually(Box<Formula>),
    Until(Box<Formula>, Box<Formula>),
    Release(Box<Formula>, Box<Formula>),
    WeakUntil(Box<Formula>, Box<Formula>),
    StrongRelease(Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn atom(index: usize) -> Self {
        Formula::Atom(index)
    }

    pub fn and(left: Formula, right: Formula) -> Self {
        Formula::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Formula, right: Formula) -> Self {
        Formula::Or(Box::new(left), Box::new(right))
    }

    pub fn next(operand: Formula) -> Self {
        Formula::Next(Box::new(operand))
    }

    pub fn globally(operand: Formula) -> Self {
        Formula::Globally(Box::new(operand))
    }

    pub fn eventually(operand: Formula) -> Self {
        Formula::Eventually(Box::new(operand))
    }

    pub fn until(left: Formula, right: Formula) -> Self {
        Formula::Until(Box::new(left), Box::new(right))
    }

    pub fn release(left: Formula, right: Formula) -> Self {
        Formula::Release(Box::new(left), Box::new(right))
    }

    pub fn weak_until(left: Formula, right: Formula) -> Self {
        Formula::WeakUntil(Box::new(left), Box::new(right))
    }

    pub fn strong_release(left: Formula, right: Formula) -> Self {
        Formula::StrongRelease(Box::new(left), Box::new(right))
    }

    /// Direct subformulas, left to right.
    pub fn children(&self) -> Vec<&Formula> {
        match self {
            Formula::Atom(_) => Vec::new(),
            Formula::Next(f) | Formula::Globally(f) | Formula::Eventually(f) => vec![&**f],
            Formula::And(l, r)
            | Formula::Or(l, r)
            | Formula::Until(l, r)
            | Formula::Release(l, r)
            | Formula::WeakUntil(l, r)
            | Formula::StrongRelease(l, r) => vec![&**l, &**r],
        }
    }

    /// Distinct proposition indices, ascending.
    pub fn atoms(&self) -> Vec<usize> {
        let mut seen = BTreeSet::new();
        self.collect_atoms(&mut seen);
        seen.into_iter().collect()
    }

    fn collect_atoms(&self, seen: &mut BTreeSet<usize>) {
        match self {
            Formula::Atom(i) => {
                seen.insert(*i);
            }
            _ => {
                for child in self.children() {
                    child.collect_atoms(seen);
                }
            }
        }
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(|c| c.size()).sum::<usize>()
    }

    /// Length of the longest root-to-leaf path; an atom has height 1.
    pub fn height(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|c| c.height())
            .max()
            .unwrap_or(0)
    }

    pub fn is_temporal(&self) -> bool {
        !matches!(self, Formula::Atom(_) | Formula::And(..) | Formula::Or(..))
    }
}

/// A formula together with the names of the propositions it references.
///
/// `atomic_propositions[i]` is the name of `Formula::Atom(i)`. Names are
/// distinct and listed in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelledFormula {
    pub formula: Formula,
    pub atomic_propositions: Vec<String>,
}

impl LabelledFormula {
    pub fn new(formula: Formula, atomic_propositions: Vec<String>) -> Self {
        Self {
            formula,
            atomic_propositions,
        }
    }

    /// Name of the proposition at `index`, if the list has one.
    pub fn proposition(&self, index: usize) -> Option<&str> {
        self.atomic_propositions.get(index).map(String::as_str)
    }
}

/// A converted definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedFormula {
    pub name: String,
    pub formula: LabelledFormula,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Formula {
        // G (p0 U (p1 & p0))
        Formula::globally(Formula::until(
            Formula::atom(0),
            Formula::and(Formula::atom(1), Formula::atom(0)),
        ))
    }

    #[test]
    fn atoms_are_sorted_and_distinct() {
        assert_eq!(sample().atoms(), vec![0, 1]);
        assert_eq!(Formula::atom(3).atoms(), vec![3]);
    }

    #[test]
    fn size_and_height() {
        let f = sample();
        assert_eq!(f.size(), 6);
        assert_eq!(f.height(), 4);
        assert_eq!(Formula::atom(0).size(), 1);
        assert_eq!(Formula::atom(0).height(), 1);
    }

    #[test]
    fn temporal_classification() {
        assert!(sample().is_temporal());
        assert!(!Formula::or(Formula::atom(0), Formula::atom(1)).is_temporal());
        assert!(Formula::strong_release(Formula::atom(0), Formula::atom(1)).is_temporal());
    }

    #[test]
    fn proposition_lookup() {
        let lf = LabelledFormula::new(sample(), vec!["ready".into(), "done".into()]);
        assert_eq!(lf.proposition(1), Some("done"));
        assert_eq!(lf.proposition(2), None);
    }

    #[test]
    fn serializes_to_json() {
        let named = NamedFormula {
            name: "live".into(),
            formula: LabelledFormula::new(
                Formula::eventually(Formula::atom(0)),
                vec!["done".into()],
            ),
        };
        let json = serde_json::to_value(&named).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "live",
                "formula": {
                    "formula": { "eventually": { "atom": 0 } },
                    "atomic_propositions": ["done"]
                }
            })
        );
    }
}
