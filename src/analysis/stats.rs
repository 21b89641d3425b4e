//! Five-number summaries for the per-continent box plots.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

/// Quantile of already sorted data with linear interpolation between the two
/// closest ranks.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

impl BoxSummary {
    /// Summary of the non-NaN values, or `None` when nothing is left.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        Some(BoxSummary {
            min: sorted[0],
            q1: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            q3: quantile_sorted(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
            count: sorted.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn summary_of_small_sample() {
        let s = BoxSummary::from_values([4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(s.count, 5);
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.q1, 2.0);
        assert_relative_eq!(s.median, 3.0);
        assert_relative_eq!(s.q3, 4.0);
        assert_relative_eq!(s.max, 5.0);
    }

    #[test]
    fn interpolates_between_ranks() {
        let s = BoxSummary::from_values([1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(s.median, 2.5);
        assert_relative_eq!(s.q1, 1.75);
        assert_relative_eq!(s.q3, 3.25);
    }

    #[test]
    fn empty_and_nan_only_give_none() {
        assert!(BoxSummary::from_values(Vec::new()).is_none());
        assert!(BoxSummary::from_values([f64::NAN]).is_none());
        let single = BoxSummary::from_values([7.0]).unwrap();
        assert_relative_eq!(single.q1, 7.0);
        assert_relative_eq!(single.q3, 7.0);
    }
}
