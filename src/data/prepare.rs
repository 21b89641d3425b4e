//! RawTable → HappinessDataset: schema detection, continent assignment,
//! rank derivation and indicator maxima.

use std::collections::BTreeSet;

use regex::Regex;

use super::model::{CellValue, DatasetSchema, HappinessDataset, RawTable, Record};
use crate::analysis::columns::{
    match_columns, pick_column, COUNTRY_CANDIDATES, RANK_CANDIDATES, SCORE_CANDIDATES,
    YEAR_CANDIDATES,
};
use crate::analysis::normalize::column_max;
use crate::analysis::rank::rank_by_year;
use crate::error::SchemaError;
use crate::geo::ContinentResolver;

/// Work out which column plays which role.
pub fn detect_schema(table: &RawTable) -> Result<DatasetSchema, SchemaError> {
    let headers = &table.headers;

    let country_column =
        pick_column(COUNTRY_CANDIDATES, headers).ok_or(SchemaError::MissingColumn {
            role: "country",
            candidates: COUNTRY_CANDIDATES,
        })?;
    let year_column = pick_column(YEAR_CANDIDATES, headers).ok_or(SchemaError::MissingColumn {
        role: "year",
        candidates: YEAR_CANDIDATES,
    })?;
    let score_column = pick_column(SCORE_CANDIDATES, headers);
    let rank_column = pick_column(RANK_CANDIDATES, headers);

    let indicator_columns = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| {
            **h != country_column
                && **h != year_column
                && Some(h.as_str()) != rank_column.as_deref()
        })
        .filter(|(i, _)| table.is_numeric_column(*i))
        .map(|(_, h)| h.clone())
        .collect();

    Ok(DatasetSchema {
        country_column,
        year_column,
        score_column,
        rank_column,
        indicator_columns,
    })
}

/// Read a year as the first four-digit group of the cell's text form, so
/// `2019`, `2019.0`, `20190101` and `"Year 2019"` all give 2019. Without a
/// pattern, numeric cells are taken as they are.
pub fn parse_year(cell: &CellValue, pattern: Option<&Regex>) -> Option<i32> {
    let text = match cell {
        CellValue::Integer(i) => i.to_string(),
        CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 => (*f as i64).to_string(),
        CellValue::String(s) => s.clone(),
        _ => return None,
    };
    match pattern {
        Some(re) => re.find(&text)?.as_str().parse().ok(),
        None => text.trim().parse().ok(),
    }
}

/// Read a supplied rank verbatim. Integral floats are accepted.
fn parse_rank(cell: &CellValue) -> Option<u32> {
    match cell {
        CellValue::Integer(i) => u32::try_from(*i).ok(),
        CellValue::Float(f) if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 => Some(*f as u32),
        CellValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn country_name(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Null => None,
        CellValue::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        other => Some(other.to_string()),
    }
}

/// Build the session dataset from a loaded table.
///
/// Ranks come from the table's rank column when it has one, otherwise they
/// are derived per year from the score over every loaded row. Continents are
/// resolved through `resolver`; rows that fail stay in `records` with
/// `continent: None` and are hidden by every view.
pub fn build_dataset<S: AsRef<str>>(
    table: RawTable,
    radar_indicators: &[S],
    resolver: &mut ContinentResolver,
) -> Result<HappinessDataset, SchemaError> {
    if table.is_empty() {
        return Err(SchemaError::Empty);
    }
    let schema = detect_schema(&table)?;
    log::debug!("detected schema {schema:?}");

    let year_pattern = Regex::new(r"\d{4}").ok();
    let index_of = |name: &str| table.column_index(name);
    let country_idx = index_of(schema.country_column.as_str());
    let year_idx = index_of(schema.year_column.as_str());
    let rank_idx = schema.rank_column.as_deref().and_then(index_of);
    let indicator_idx: Vec<Option<usize>> = schema
        .indicator_columns
        .iter()
        .map(|c| index_of(c.as_str()))
        .collect();

    let cell = |row: &[CellValue], idx: Option<usize>| -> CellValue {
        idx.and_then(|i| row.get(i)).cloned().unwrap_or(CellValue::Null)
    };

    let mut records = Vec::with_capacity(table.len());
    let mut skipped = 0usize;
    for row in &table.rows {
        let row = row.as_slice();
        let country = country_name(&cell(row, country_idx));
        let year = parse_year(&cell(row, year_idx), year_pattern.as_ref());
        let (Some(country), Some(year)) = (country, year) else {
            skipped += 1;
            continue;
        };
        let values = indicator_idx
            .iter()
            .map(|&idx| cell(row, idx).as_f64())
            .collect();
        let rank = rank_idx.and_then(|i| row.get(i)).and_then(parse_rank);
        let continent = resolver.resolve(&country);
        records.push(Record {
            country,
            year,
            values,
            continent,
            rank,
        });
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} rows without a readable country or year");
    }
    if records.is_empty() {
        return Err(SchemaError::Empty);
    }

    let mut ranks_derived = false;
    if schema.rank_column.is_none() {
        if let Some(score_idx) = schema
            .score_column
            .as_deref()
            .and_then(|c| schema.indicator_columns.iter().position(|i| i == c))
        {
            let ranks = rank_by_year(
                records
                    .iter()
                    .map(|r| (r.year, r.values.get(score_idx).copied().flatten())),
            );
            for (record, rank) in records.iter_mut().zip(ranks) {
                record.rank = rank;
            }
            ranks_derived = true;
        } else {
            log::warn!("no score column, ranks are unavailable");
        }
    }

    let maxima = (0..schema.indicator_columns.len())
        .map(|i| column_max(records.iter().map(|r| r.values.get(i).copied().flatten())))
        .collect();

    let unresolved_countries: Vec<String> = records
        .iter()
        .filter(|r| r.continent.is_none())
        .map(|r| r.country.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !unresolved_countries.is_empty() {
        log::warn!(
            "{} countries have no continent and are hidden: {:?}",
            unresolved_countries.len(),
            unresolved_countries
        );
    }

    let radar_columns = match_columns(radar_indicators, &schema.indicator_columns);
    let unmatched: Vec<&str> = radar_columns.unmatched().collect();
    if !unmatched.is_empty() {
        log::info!("radar indicators without a column: {unmatched:?}");
    }

    let (hits, misses) = resolver.stats();
    log::info!(
        "prepared {} records ({} countries unresolved, continent cache {hits} hits / {misses} misses)",
        records.len(),
        unresolved_countries.len()
    );

    Ok(HappinessDataset {
        records,
        schema,
        radar_columns,
        maxima,
        unresolved_countries,
        ranks_derived,
    })
}
