//! # Cost Projection
//!
//! Derived, non-persisted cost of a recipe.
//!
//! ```text
//! cost(recipe) = Σ  ingredient.current_price × composition.units
//! ```
//!
//! The projection always reads the ingredient's current price. It is not the
//! price that was in effect when the recipe was created or last sold, so a
//! recipe's displayed cost moves with every stock addition at a new price.

/// Sums `price × units` over the given composition lines.
///
/// ## Example
/// ```rust
/// use costly_core::cost::project_cost;
///
/// assert_eq!(project_cost([(1.0, 2)]), 2.0);
/// assert_eq!(project_cost(std::iter::empty()), 0.0);
/// ```
pub fn project_cost<I>(lines: I) -> f64
where
    I: IntoIterator<Item = (f64, i64)>,
{
    lines
        .into_iter()
        .map(|(price, units)| price * units as f64)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_composition_costs_nothing() {
        assert_eq!(project_cost(Vec::new()), 0.0);
    }

    #[test]
    fn test_sums_every_line() {
        let cost = project_cost([(1.0, 2), (2.5, 4), (0.1, 10)]);
        assert!((cost - 13.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_deterministic() {
        let lines = [(0.3, 7), (1.7, 3)];
        assert_eq!(project_cost(lines), project_cost(lines));
    }
}
