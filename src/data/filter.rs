use std::fmt;

use super::model::HappinessDataset;
use crate::geo::Continent;

// ---------------------------------------------------------------------------
// Continent filter
// ---------------------------------------------------------------------------

/// Continent selection from the side panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContinentFilter {
    #[default]
    All,
    Only(Continent),
}

impl ContinentFilter {
    pub fn accepts(&self, continent: Option<Continent>) -> bool {
        match (self, continent) {
            (_, None) => false,
            (ContinentFilter::All, Some(_)) => true,
            (ContinentFilter::Only(wanted), Some(c)) => *wanted == c,
        }
    }
}

impl fmt::Display for ContinentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContinentFilter::All => f.write_str("All"),
            ContinentFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

/// Indices of records that pass the continent filter.
///
/// Records without a continent never pass, whatever the filter.
pub fn filtered_indices(dataset: &HappinessDataset, filter: ContinentFilter) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| filter.accepts(r.continent))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_never_passes() {
        assert!(!ContinentFilter::All.accepts(None));
        assert!(!ContinentFilter::Only(Continent::Asia).accepts(None));
    }

    #[test]
    fn only_matches_its_continent() {
        let f = ContinentFilter::Only(Continent::Europe);
        assert!(f.accepts(Some(Continent::Europe)));
        assert!(!f.accepts(Some(Continent::Asia)));
        assert!(ContinentFilter::All.accepts(Some(Continent::Asia)));
        assert_eq!(f.to_string(), "Europe");
    }
}
