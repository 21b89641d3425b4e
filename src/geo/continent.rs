use std::collections::HashMap;
use std::fmt;

use super::countries::{alpha2_to_continent_code, name_to_alpha2};
use super::names::correct_country_name;

// ---------------------------------------------------------------------------
// Continent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Continent {
    Africa,
    Antarctica,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl Continent {
    pub const ALL: [Continent; 7] = [
        Continent::Africa,
        Continent::Antarctica,
        Continent::Asia,
        Continent::Europe,
        Continent::NorthAmerica,
        Continent::Oceania,
        Continent::SouthAmerica,
    ];

    /// Two-letter continent code → continent. Unknown codes give `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AF" => Some(Continent::Africa),
            "AN" => Some(Continent::Antarctica),
            "AS" => Some(Continent::Asia),
            "EU" => Some(Continent::Europe),
            "NA" => Some(Continent::NorthAmerica),
            "OC" => Some(Continent::Oceania),
            "SA" => Some(Continent::SouthAmerica),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Continent::Africa => "Africa",
            Continent::Antarctica => "Antarctica",
            Continent::Asia => "Asia",
            Continent::Europe => "Europe",
            Continent::NorthAmerica => "North America",
            Continent::Oceania => "Oceania",
            Continent::SouthAmerica => "South America",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve a country display name to its continent.
///
/// Chain: name correction → alpha-2 code → continent code → continent.
/// Any failed step yields `None`; this never errors.
pub fn resolve_continent(country: &str) -> Option<Continent> {
    let name = correct_country_name(country.trim());
    let alpha2 = name_to_alpha2(name)?;
    let code = alpha2_to_continent_code(alpha2)?;
    Continent::from_code(code)
}

/// Session-scoped memoizing wrapper around [`resolve_continent`].
#[derive(Debug, Default)]
pub struct ContinentResolver {
    cache: HashMap<String, Option<Continent>>,
    hits: usize,
    misses: usize,
}

impl ContinentResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, country: &str) -> Option<Continent> {
        if let Some(cached) = self.cache.get(country) {
            self.hits += 1;
            return *cached;
        }
        self.misses += 1;
        let resolved = resolve_continent(country);
        if resolved.is_none() {
            log::debug!("no continent for country {country:?}");
        }
        self.cache.insert(country.to_string(), resolved);
        resolved
    }

    /// (cache hits, cache misses) since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
