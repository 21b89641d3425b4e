/// Country → continent resolution.
///
/// ```text
///  "South Korea"
///        │  names::correct_country_name
///        ▼
///  "Korea, Republic of"
///        │  countries::name_to_alpha2
///        ▼
///      "KR"
///        │  countries::alpha2_to_continent_code
///        ▼
///      "AS"
///        │  Continent::from_code
///        ▼
///   Continent::Asia
/// ```

pub mod continent;
pub mod countries;
pub mod names;

pub use continent::{resolve_continent, Continent, ContinentResolver};
pub use names::correct_country_name;
