//! Country-name corrections: common usage → ISO 3166 reference name.

/// Common country names paired with the name the ISO reference table uses.
/// Keys are unique.
pub const NAME_CORRECTIONS: &[(&str, &str)] = &[
    ("United States", "United States of America"),
    ("Russia", "Russian Federation"),
    ("South Korea", "Korea, Republic of"),
    ("North Korea", "Korea, Democratic People's Republic of"),
    ("Czechia", "Czech Republic"),
    ("Vietnam", "Viet Nam"),
    ("Iran", "Iran, Islamic Republic of"),
    ("Syria", "Syrian Arab Republic"),
    ("Laos", "Lao People's Democratic Republic"),
    ("Moldova", "Moldova, Republic of"),
    ("Tanzania", "Tanzania, United Republic of"),
    ("Venezuela", "Venezuela, Bolivarian Republic of"),
    ("Bolivia", "Bolivia, Plurinational State of"),
    ("Brunei", "Brunei Darussalam"),
    ("Palestine", "Palestine, State of"),
    ("Congo (Brazzaville)", "Congo"),
    ("Congo (Kinshasa)", "Congo, The Democratic Republic of the"),
    ("Ivory Coast", "Côte d'Ivoire"),
];

/// Map a display name to its reference spelling, or return it unchanged.
pub fn correct_country_name(name: &str) -> &str {
    NAME_CORRECTIONS
        .iter()
        .find(|(common, _)| *common == name)
        .map(|(_, standard)| *standard)
        .unwrap_or(name)
}
