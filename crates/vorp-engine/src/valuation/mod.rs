// Valuation engine: replacement levels, VORP scoring (pre-draft and against
// the live board), scarcity and market (ADP) comparison, league-size
// scenarios.

pub mod dynamic;
pub mod market;
pub mod replacement;
pub mod scarcity;
pub mod scenario;
pub mod tiers;
pub mod vorp;

/// Indices of `items` ordered by `key` descending. The sort is stable, so
/// equal keys keep input order; NaN compares equal to everything.
pub(crate) fn order_desc<T>(items: &[T], key: impl Fn(&T) -> f64) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| {
        key(&items[b])
            .partial_cmp(&key(&items[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_desc_is_stable() {
        let values = [3.0, 5.0, 3.0, 9.0, 5.0];
        assert_eq!(order_desc(&values, |v| *v), vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn order_desc_empty() {
        let values: [f64; 0] = [];
        assert!(order_desc(&values, |v| *v).is_empty());
    }
}
