//! Textual rendering of formulas in the usual LTL surface syntax.
//!
//! Parentheses are only emitted where precedence or associativity requires
//! them. Binary temporal operators associate to the right, so `a U b U c`
//! reads as `a U (b U c)`.

use std::fmt;

use crate::formula::{Formula, LabelledFormula};

fn precedence(f: &Formula) -> usize {
    use Formula::*;

    match f {
        Or(..) => 10,
        And(..) => 20,
        Until(..) | Release(..) | WeakUntil(..) | StrongRelease(..) => 30,
        Next(_) | Globally(_) | Eventually(_) => 40,
        Atom(_) => 1000,
    }
}

fn parens(add_parens: bool, s: String) -> String {
    if add_parens {
        format!("({s})")
    } else {
        s
    }
}

fn right_associative(f: &Formula) -> bool {
    use Formula::*;

    matches!(f, Until(..) | Release(..) | WeakUntil(..) | StrongRelease(..))
}

fn render(f: &Formula, atom: &dyn Fn(usize) -> String) -> String {
    let child = |arg: &Formula, add_parens: bool| parens(add_parens, render(arg, atom));
    let unary = |op: &str, arg: &Formula| {
        let arg = child(arg, precedence(f) > precedence(arg));
        format!("{op} {arg}")
    };
    let binary = |op: &str, l: &Formula, r: &Formula| {
        let use_left_paren = precedence(f) > precedence(l)
            || (precedence(f) == precedence(l) && right_associative(f));
        let use_right_paren = precedence(f) > precedence(r)
            || (precedence(f) == precedence(r) && right_associative(f) && !same_operator(f, r));
        let left = child(l, use_left_paren);
        let right = child(r, use_right_paren);
        format!("{left} {op} {right}")
    };

    match f {
        Formula::Atom(i) => atom(*i),
        Formula::Next(arg) => unary("X", arg),
        Formula::Globally(arg) => unary("G", arg),
        Formula::Eventually(arg) => unary("F", arg),
        Formula::And(l, r) => binary("&", l, r),
        Formula::Or(l, r) => binary("|", l, r),
        Formula::Until(l, r) => binary("U", l, r),
        Formula::Release(l, r) => binary("R", l, r),
        Formula::WeakUntil(l, r) => binary("W", l, r),
        Formula::StrongRelease(l, r) => binary("M", l, r),
    }
}

/// Words with a meaning of their own in the surface syntax.
const RESERVED: [&str; 9] = ["true", "false", "G", "F", "X", "U", "R", "W", "M"];

/// A proposition name as it appears in text: bare when it is a plain
/// identifier, otherwise double-quoted with `\` and `"` escaped.
pub fn proposition(name: &str) -> String {
    let mut chars = name.chars();
    let plain = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&name);
    if plain {
        return name.to_string();
    }
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Whether both formulas have the same top-level operator.
fn same_operator(a: &Formula, b: &Formula) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

/// Render with `p0`, `p1`, ... standing in for propositions.
pub fn formula(f: &Formula) -> String {
    render(f, &|i| format!("p{i}"))
}

/// Render with proposition names. Indices outside the list fall back to `p<i>`.
pub fn labelled(lf: &LabelledFormula) -> String {
    render(&lf.formula, &|i| match lf.proposition(i) {
        Some(name) => proposition(name),
        None => format!("p{i}"),
    })
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", formula(self))
    }
}

impl fmt::Display for LabelledFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", labelled(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: usize) -> Formula {
        Formula::atom(i)
    }

    #[test]
    fn atoms_and_unary() {
        assert_eq!(p(0).to_string(), "p0");
        assert_eq!(Formula::globally(p(0)).to_string(), "G p0");
        assert_eq!(
            Formula::globally(Formula::eventually(p(1))).to_string(),
            "G F p1"
        );
        assert_eq!(Formula::next(Formula::next(p(0))).to_string(), "X X p0");
    }

    #[test]
    fn boolean_precedence() {
        let f = Formula::or(Formula::and(p(0), p(1)), p(2));
        assert_eq!(f.to_string(), "p0 & p1 | p2");
        let f = Formula::and(Formula::or(p(0), p(1)), p(2));
        assert_eq!(f.to_string(), "(p0 | p1) & p2");
        let f = Formula::and(Formula::and(p(0), p(1)), Formula::and(p(2), p(3)));
        assert_eq!(f.to_string(), "p0 & p1 & p2 & p3");
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        let f = Formula::and(Formula::globally(p(0)), Formula::globally(p(1)));
        assert_eq!(f.to_string(), "G p0 & G p1");
        let f = Formula::globally(Formula::and(p(0), p(1)));
        assert_eq!(f.to_string(), "G (p0 & p1)");
        let f = Formula::until(Formula::eventually(p(0)), Formula::next(p(1)));
        assert_eq!(f.to_string(), "F p0 U X p1");
    }

    #[test]
    fn temporal_binaries_associate_right() {
        let f = Formula::until(p(0), Formula::until(p(1), p(2)));
        assert_eq!(f.to_string(), "p0 U p1 U p2");
        let f = Formula::until(Formula::until(p(0), p(1)), p(2));
        assert_eq!(f.to_string(), "(p0 U p1) U p2");
        let f = Formula::release(p(0), Formula::weak_until(p(1), p(2)));
        assert_eq!(f.to_string(), "p0 R (p1 W p2)");
    }

    #[test]
    fn temporal_binaries_bind_tighter_than_boolean() {
        let f = Formula::or(Formula::until(p(0), p(1)), Formula::strong_release(p(2), p(3)));
        assert_eq!(f.to_string(), "p0 U p1 | p2 M p3");
        let f = Formula::until(Formula::and(p(0), p(1)), p(2));
        assert_eq!(f.to_string(), "(p0 & p1) U p2");
    }

    #[test]
    fn labelled_rendering() {
        let lf = LabelledFormula::new(
            Formula::globally(Formula::until(p(0), p(1))),
            vec!["waiting".into(), "served".into()],
        );
        assert_eq!(lf.to_string(), "G (waiting U served)");

        let short = LabelledFormula::new(Formula::and(p(0), p(1)), vec!["a".into()]);
        assert_eq!(short.to_string(), "a & p1");
    }

    fn named(formula: Formula, names: &[&str]) -> String {
        LabelledFormula::new(formula, names.iter().map(|n| n.to_string()).collect()).to_string()
    }

    #[test]
    fn plain_names_stay_bare() {
        assert_eq!(proposition("ready"), "ready");
        assert_eq!(proposition("_tmp1"), "_tmp1");
        assert_eq!(proposition("inCritical"), "inCritical");
    }

    #[test]
    fn operator_like_names_are_quoted() {
        assert_eq!(named(Formula::globally(p(0)), &["F"]), "G \"F\"");
        assert_eq!(
            named(Formula::until(p(0), p(1)), &["true", "x y"]),
            "\"true\" U \"x y\""
        );
        assert_eq!(
            named(Formula::and(p(0), p(1)), &["a | b", "c"]),
            "\"a | b\" & c"
        );
    }

    #[test]
    fn quoting_escapes_and_capitals() {
        assert_eq!(proposition("Door"), "\"Door\"");
        assert_eq!(proposition("3rd"), "\"3rd\"");
        assert_eq!(proposition(""), "\"\"");
        assert_eq!(proposition("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(proposition("a\\b"), "\"a\\\\b\"");
    }
}
