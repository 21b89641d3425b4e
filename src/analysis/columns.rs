//! Logical indicator names → actual dataset column names.

/// Radar-chart indicators, in axis order.
pub const RADAR_INDICATORS: &[&str] = &[
    "GDP_per_Capita",
    "Social_Support",
    "Healthy_Life_Expectancy",
    "Freedom",
    "Generosity",
    "Corruption_Perception",
];

pub const COUNTRY_CANDIDATES: &[&str] = &["Country", "Country name", "Country or region"];
pub const YEAR_CANDIDATES: &[&str] = &["Year"];
pub const SCORE_CANDIDATES: &[&str] = &["Happiness_Score", "Life Ladder", "Ladder score", "Score"];
pub const RANK_CANDIDATES: &[&str] = &["Rank", "Happiness_Rank", "Overall rank"];

/// Strip spaces and underscores and lowercase.
pub fn normalize_column_name(name: &str) -> String {
    name.chars()
        .filter(|c| *c != ' ' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find the actual column for one logical name: exact first, then normalized.
pub fn match_column<'a, T: AsRef<str>>(logical: &str, actual: &'a [T]) -> Option<&'a str> {
    if let Some(exact) = actual.iter().find(|col| col.as_ref() == logical) {
        return Some(exact.as_ref());
    }
    let wanted = normalize_column_name(logical);
    actual
        .iter()
        .map(AsRef::as_ref)
        .find(|col| normalize_column_name(col) == wanted)
}

/// First candidate that matches any actual column.
pub fn pick_column<T: AsRef<str>>(candidates: &[&str], actual: &[T]) -> Option<String> {
    candidates
        .iter()
        .find_map(|candidate| match_column(candidate, actual))
        .map(str::to_string)
}

/// Ordered logical name → optional actual column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorColumnMap {
    entries: Vec<(String, Option<String>)>,
}

impl IndicatorColumnMap {
    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }

    pub fn get(&self, logical: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == logical)
            .and_then(|(_, col)| col.as_deref())
    }

    /// Matched pairs only, in input order: (logical, actual).
    pub fn matched(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .filter_map(|(name, col)| col.as_deref().map(|c| (name.as_str(), c)))
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|(_, col)| col.is_none())
            .map(|(name, _)| name.as_str())
    }
}

/// Resolve every logical name against the actual columns, preserving order.
pub fn match_columns<S, T>(logical: &[S], actual: &[T]) -> IndicatorColumnMap
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let entries = logical
        .iter()
        .map(|name| {
            let name = name.as_ref();
            (name.to_string(), match_column(name, actual).map(str::to_string))
        })
        .collect();
    IndicatorColumnMap { entries }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalized_match_ignores_case_spaces_and_underscores() {
        let map = match_columns(&["GDP_per_Capita"], &["gdp per capita"]);
        assert_eq!(map.get("GDP_per_Capita"), Some("gdp per capita"));
    }

    #[test]
    fn exact_match_wins_over_normalized() {
        let actual = ["freedom", "Freedom"];
        assert_eq!(match_column("Freedom", &actual), Some("Freedom"));
        // Without an exact hit the first normalized match is taken.
        assert_eq!(match_column("FREEDOM", &actual), Some("freedom"));
    }

    #[test]
    fn unmatched_names_are_absent_and_order_is_kept() {
        let actual = ["Country", "Year", "Social support", "Generosity"];
        let map = match_columns(RADAR_INDICATORS, &actual);
        assert_eq!(
            map.entries().iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            RADAR_INDICATORS.to_vec()
        );
        assert_eq!(
            map.matched().collect::<Vec<_>>(),
            vec![("Social_Support", "Social support"), ("Generosity", "Generosity")]
        );
        assert_eq!(map.get("Freedom"), None);
        assert_eq!(map.unmatched().count(), 4);
    }

    #[test]
    fn pick_column_walks_candidates_in_order() {
        let actual = ["Country name", "year", "Life Ladder"];
        assert_eq!(pick_column(COUNTRY_CANDIDATES, &actual).as_deref(), Some("Country name"));
        assert_eq!(pick_column(YEAR_CANDIDATES, &actual).as_deref(), Some("year"));
        assert_eq!(pick_column(SCORE_CANDIDATES, &actual).as_deref(), Some("Life Ladder"));
        assert_eq!(pick_column(RANK_CANDIDATES, &actual), None);
    }
}
