//! Scale a country's indicators into [0, 1] against dataset-wide maxima.

use crate::data::model::HappinessDataset;

/// Largest non-missing, non-NaN value, if any.
pub fn column_max<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .reduce(f64::max)
}

/// `raw / max`, with a missing raw value read as 0 and a missing or zero
/// maximum giving 0. Negative inputs are not clamped.
pub fn normalize_value(raw: Option<f64>, max: Option<f64>) -> f64 {
    let v = raw.filter(|v| !v.is_nan()).unwrap_or(0.0);
    match max {
        Some(m) if m != 0.0 && !m.is_nan() => v / m,
        _ => 0.0,
    }
}

/// Element-wise [`normalize_value`]; output is aligned with `raw`.
pub fn normalize_indicators(raw: &[Option<f64>], maxima: &[Option<f64>]) -> Vec<f64> {
    raw.iter()
        .enumerate()
        .map(|(i, v)| normalize_value(*v, maxima.get(i).copied().flatten()))
        .collect()
}

// ---------------------------------------------------------------------------
// RadarProfile – normalized indicator profile of one country
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RadarProfile {
    pub country: String,
    /// Latest year the country has data for; `None` if it has no rows.
    pub year: Option<i32>,
    /// Logical indicator names of the matched radar columns.
    pub axes: Vec<String>,
    pub values: Vec<f64>,
}

impl RadarProfile {
    /// Profile of `country` in its latest year. The first row of that year is
    /// used. A country without rows yields all zeros.
    pub fn for_country(dataset: &HappinessDataset, country: &str) -> Self {
        let matched: Vec<(&str, &str)> = dataset.radar_columns.matched().collect();
        let axes: Vec<String> = matched.iter().map(|(logical, _)| logical.to_string()).collect();

        let latest = dataset
            .records
            .iter()
            .filter(|r| r.country == country)
            .map(|r| r.year)
            .max();

        let latest_row = latest.and_then(|year| {
            dataset
                .records
                .iter()
                .find(|r| r.country == country && r.year == year)
        });

        let values = match latest_row {
            Some(row) => {
                let raw: Vec<Option<f64>> = matched
                    .iter()
                    .map(|(_, col)| dataset.value(row, col))
                    .collect();
                let maxima: Vec<Option<f64>> = matched
                    .iter()
                    .map(|(_, col)| dataset.column_max(col))
                    .collect();
                normalize_indicators(&raw, &maxima)
            }
            None => vec![0.0; axes.len()],
        };

        RadarProfile {
            country: country.to_string(),
            year: latest,
            axes,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn ratio_against_maximum() {
        assert_relative_eq!(normalize_value(Some(5.0), Some(10.0)), 0.5);
        assert_relative_eq!(normalize_value(Some(10.0), Some(10.0)), 1.0);
    }

    #[test]
    fn zero_or_missing_maximum_gives_zero() {
        assert_eq!(normalize_value(Some(5.0), Some(0.0)), 0.0);
        assert_eq!(normalize_value(Some(5.0), None), 0.0);
        assert_eq!(normalize_value(Some(5.0), Some(f64::NAN)), 0.0);
    }

    #[test]
    fn missing_raw_value_reads_as_zero() {
        assert_eq!(normalize_value(None, Some(10.0)), 0.0);
        assert_eq!(normalize_value(Some(f64::NAN), Some(10.0)), 0.0);
    }

    #[test]
    fn negative_values_are_not_clamped() {
        assert_relative_eq!(normalize_value(Some(-2.0), Some(4.0)), -0.5);
    }

    #[test]
    fn indicators_stay_aligned() {
        let raw = [Some(1.0), None, Some(3.0)];
        let maxima = [Some(2.0), Some(5.0), Some(0.0)];
        assert_eq!(normalize_indicators(&raw, &maxima), vec![0.5, 0.0, 0.0]);
        // Short maxima are treated as missing.
        assert_eq!(normalize_indicators(&raw, &maxima[..1]), vec![0.5, 0.0, 0.0]);
    }

    #[test]
    fn column_max_skips_missing_and_nan() {
        assert_eq!(column_max([Some(1.0), None, Some(f64::NAN), Some(4.0)]), Some(4.0));
        assert_eq!(column_max([None, None]), None);
        assert_eq!(column_max(Vec::new()), None);
    }
}
