//! Shipped rule set.

pub mod tired;

use crate::rule::Rule;

/// The rules every standard registry holds, in evaluation order.
pub fn standard_rules() -> Vec<Rule> {
    vec![tired::rule()]
}
