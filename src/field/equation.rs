//! Random vector field equations
//!
//! Each axis of the field is one template from a fixed vocabulary with its
//! `?` placeholders filled by small random integers.

use std::fmt;
use std::sync::LazyLock;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::expr::{Expr, ParseError};
use crate::consts::{PLACEHOLDER_MAX, PLACEHOLDER_MIN};

/// Template vocabulary shared by both axes
pub const TEMPLATE_SOURCES: [&str; 10] = [
    "?x^?",
    "?y^?",
    "?x^? + ?y^?",
    "?x^? - ?y^?",
    "cos(?x)^?",
    "sin(?y)^?",
    "?x^? + ?",
    "?y^? + ?",
    "cos(?x)^? + ?",
    "sin(?y)^? + ?",
];

/// A parsed template with numbered placeholder slots
#[derive(Debug, Clone)]
pub struct Template {
    pub source: &'static str,
    expr: Expr,
    slots: usize,
}

impl Template {
    pub fn parse(source: &'static str) -> Result<Self, ParseError> {
        let (expr, slots) = Expr::parse_template(source)?;
        Ok(Self {
            source,
            expr,
            slots,
        })
    }

    /// Number of `?` placeholders
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Fill placeholders left to right with the given values.
    /// The text and tree agree slot for slot.
    pub fn fill(&self, values: &[i32]) -> Component {
        let mut text = String::with_capacity(self.source.len() + values.len());
        let mut values_iter = values.iter().peekable();
        for ch in self.source.chars() {
            match (ch, values_iter.next_if(|_| ch == '?')) {
                (_, Some(v)) => text.push_str(&v.to_string()),
                (c, None) => text.push(c),
            }
        }

        let numbers: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        Component {
            text,
            expr: self.expr.fill_slots(&numbers),
        }
    }

    /// Fill every placeholder with an independent draw from [1, 5]
    pub fn instantiate<R: Rng + ?Sized>(&self, rng: &mut R) -> Component {
        let values: Vec<i32> = (0..self.slots)
            .map(|_| rng.random_range(PLACEHOLDER_MIN..=PLACEHOLDER_MAX))
            .collect();
        self.fill(&values)
    }
}

/// Built-in templates, parsed once
pub static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    TEMPLATE_SOURCES
        .iter()
        .map(|&src| Template::parse(src).expect("built-in field template must parse"))
        .collect()
});

/// One axis of the field: display text plus its evaluable tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub text: String,
    pub expr: Expr,
}

impl Component {
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self {
            text: text.trim().to_string(),
            expr: Expr::parse(text)?,
        })
    }

    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.expr.eval(x, y)
    }
}

/// A 2D vector field `F(x, y) = <i(x, y), j(x, y)>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equation {
    pub i: Component,
    pub j: Component,
}

impl Equation {
    /// Build an equation from two hand-written component expressions
    pub fn parse(i: &str, j: &str) -> Result<Self, ParseError> {
        Ok(Self {
            i: Component::parse(i)?,
            j: Component::parse(j)?,
        })
    }

    /// Evaluate both components at a plane point
    #[inline]
    pub fn eval(&self, x: f64, y: f64) -> (f64, f64) {
        (self.i.eval(x, y), self.j.eval(x, y))
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F = \u{2329}{}, {}\u{232A}", self.i.text, self.j.text)
    }
}

/// Generate a random field: one template per axis, chosen independently
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Equation {
    let templates = &*TEMPLATES;
    let i = &templates[rng.random_range(0..templates.len())];
    let j = &templates[rng.random_range(0..templates.len())];
    let equation = Equation {
        i: i.instantiate(rng),
        j: j.instantiate(rng),
    };
    log::debug!("Generated equation {} from [{}], [{}]", equation, i.source, j.source);
    equation
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_all_templates_parse() {
        assert_eq!(TEMPLATES.len(), TEMPLATE_SOURCES.len());
        for template in TEMPLATES.iter() {
            assert_eq!(template.slots(), template.source.matches('?').count());
        }
    }

    #[test]
    fn test_fill_matches_text() {
        let template = Template::parse("?x^? - ?y^?").unwrap();
        let component = template.fill(&[3, 2, 1, 4]);
        assert_eq!(component.text, "3x^2 - 1y^4");
        assert_eq!(component.expr, Expr::parse("3x^2 - 1y^4").unwrap());
        assert_eq!(component.eval(2.0, 1.0), 11.0);
    }

    #[test]
    fn test_cosine_template() {
        let template = Template::parse("cos(?x)^? + ?").unwrap();
        let component = template.fill(&[2, 3, 5]);
        assert_eq!(component.text, "cos(2x)^3 + 5");
        assert!((component.eval(0.0, 0.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let a = generate(&mut Pcg32::seed_from_u64(7));
        let b = generate(&mut Pcg32::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_components_are_complete() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..200 {
            let eq = generate(&mut rng);
            for component in [&eq.i, &eq.j] {
                assert!(!component.text.is_empty());
                assert!(!component.text.contains('?'));
                assert_eq!(component.expr.slot_count(), 0);
            }
        }
    }

    #[test]
    fn test_override_equation() {
        let eq = Equation::parse("sin(x)", "-x").unwrap();
        assert_eq!(eq.eval(0.0, 3.0), (0.0, -0.0));
        assert_eq!(eq.to_string(), "F = \u{2329}sin(x), -x\u{232A}");
        assert!(Equation::parse("sin(x", "x").is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn placeholders_are_filled_in_range(seed in any::<u64>()) {
                let eq = generate(&mut Pcg32::seed_from_u64(seed));
                for component in [&eq.i, &eq.j] {
                    prop_assert!(!component.text.contains('?'));
                    prop_assert!(component.text.contains('x') || component.text.contains('y'));
                    for digit in component.text.chars().filter(|c| c.is_ascii_digit()) {
                        prop_assert!(('1'..='5').contains(&digit));
                    }
                    // Text and tree agree
                    prop_assert_eq!(&Expr::parse(&component.text).unwrap(), &component.expr);
                }
            }
        }
    }
}
