use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use happiness_atlas::analysis::columns::match_column;
use happiness_atlas::analysis::{BoxSummary, RadarProfile};
use happiness_atlas::config::Config;
use happiness_atlas::data::filter::{filtered_indices, ContinentFilter};
use happiness_atlas::data::model::HappinessDataset;
use happiness_atlas::data::source::{DataSource, DatasetCache, LoadOutcome, SourceKey, UploadSource};
use happiness_atlas::error::LoadError;
use happiness_atlas::geo::Continent;

use crate::color::ContinentColors;

// ---------------------------------------------------------------------------
// Derived chart data
// ---------------------------------------------------------------------------

/// Latest value of the selected indicator for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryValue {
    pub country: String,
    pub continent: Continent,
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub country: String,
    pub continent: Continent,
    pub xy: [f64; 2],
}

/// One continent's box in the distribution chart, with the values it
/// summarizes.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinentBox {
    pub continent: Continent,
    pub summary: BoxSummary,
    pub values: Vec<f64>,
}

/// Everything the central panel draws, recomputed only when a selection
/// changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub values: Vec<CountryValue>,
    pub boxes: Vec<ContinentBox>,
    /// x column and points; `None` when there is no x column or it is the
    /// selected indicator.
    pub scatter: Option<(String, Vec<ScatterPoint>)>,
    pub radar: Option<RadarProfile>,
    pub score_over_time: Vec<[f64; 2]>,
    pub rank_over_time: Vec<(i32, u32)>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Memoized datasets per source.
    pub cache: DatasetCache,

    /// Loaded dataset (None until a source loads).
    pub dataset: Option<Arc<HappinessDataset>>,

    /// Where the dataset came from.
    pub source: Option<SourceKey>,

    pub continent_filter: ContinentFilter,

    /// Indicator column for the value grid, box plot and scatter.
    pub indicator: Option<String>,

    /// Country for the radar, line and rank charts.
    pub country: Option<String>,

    /// Indices of records passing the continent filter (cached).
    pub visible_indices: Vec<usize>,

    pub view: DashboardView,

    pub colors: ContinentColors,

    /// Failures of earlier sources when a later one succeeded.
    pub warnings: Vec<String>,

    /// Error shown instead of the dashboard.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let cache = DatasetCache::new(config.dashboard.radar_indicators.clone());
        Self {
            config,
            cache,
            dataset: None,
            source: None,
            continent_filter: ContinentFilter::All,
            indicator: None,
            country: None,
            visible_indices: Vec::new(),
            view: DashboardView::default(),
            colors: ContinentColors::default(),
            warnings: Vec::new(),
            status_message: None,
        }
    }

    /// Walk the configured remote → local chain.
    pub fn load_startup(&mut self) {
        let sources = self.config.startup_sources();
        self.load_from(&sources);
    }

    /// Last step of the chain: a file the user picked.
    pub fn load_upload(&mut self, path: Option<PathBuf>) {
        let sources: Vec<Box<dyn DataSource>> = vec![Box::new(UploadSource::new(path))];
        self.load_from(&sources);
    }

    fn load_from(&mut self, sources: &[Box<dyn DataSource>]) {
        match self.cache.load_first(sources) {
            Ok(outcome) => self.set_dataset(outcome),
            Err(err) => {
                log::error!("{err}");
                self.status_message = Some(match &err {
                    LoadError::AllSourcesFailed(_) | LoadError::NoSources if self.dataset.is_none() => {
                        format!("{err}\n\nUse File → Open… to upload a dataset.")
                    }
                    _ => err.to_string(),
                });
            }
        }
    }

    /// Ingest a newly loaded dataset, reset selections and rebuild views.
    pub fn set_dataset(&mut self, outcome: LoadOutcome) {
        let dataset = outcome.dataset;
        let indicators = &dataset.schema.indicator_columns;

        self.indicator = match_column(&self.config.dashboard.default_indicator, indicators)
            .map(str::to_string)
            .or_else(|| indicators.first().cloned());
        self.country = dataset.countries().into_iter().next();
        self.continent_filter = ContinentFilter::All;
        self.warnings = outcome.warnings;
        self.source = Some(outcome.key);
        self.status_message = None;
        self.dataset = Some(dataset);
        self.refilter();
    }

    pub fn set_continent_filter(&mut self, filter: ContinentFilter) {
        if self.continent_filter != filter {
            self.continent_filter = filter;
            self.refilter();
        }
    }

    pub fn set_indicator(&mut self, indicator: String) {
        if self.indicator.as_deref() != Some(indicator.as_str()) {
            self.indicator = Some(indicator);
            self.rebuild_view();
        }
    }

    pub fn set_country(&mut self, country: String) {
        if self.country.as_deref() != Some(country.as_str()) {
            self.country = Some(country);
            self.rebuild_view();
        }
    }

    /// Recompute `visible_indices` and the view after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, self.continent_filter);
        }
        self.rebuild_view();
    }

    fn rebuild_view(&mut self) {
        self.view = match &self.dataset {
            Some(ds) => build_view(
                ds,
                &self.visible_indices,
                self.indicator.as_deref(),
                self.country.as_deref(),
                &self.config.dashboard.scatter_x,
            ),
            None => DashboardView::default(),
        };
    }
}

// ---------------------------------------------------------------------------
// View construction
// ---------------------------------------------------------------------------

fn build_view(
    ds: &HappinessDataset,
    visible: &[usize],
    indicator: Option<&str>,
    country: Option<&str>,
    scatter_x: &str,
) -> DashboardView {
    let rows = || visible.iter().filter_map(|&i| ds.records.get(i));
    let mut view = DashboardView::default();

    if let Some(indicator) = indicator {
        // Latest year per country.
        let mut latest: BTreeMap<&str, CountryValue> = BTreeMap::new();
        for r in rows() {
            let (Some(continent), Some(value)) = (r.continent, ds.value(r, indicator)) else {
                continue;
            };
            let newer = latest
                .get(r.country.as_str())
                .map_or(true, |cv| r.year > cv.year);
            if newer {
                latest.insert(
                    &r.country,
                    CountryValue {
                        country: r.country.clone(),
                        continent,
                        year: r.year,
                        value,
                    },
                );
            }
        }
        view.values = latest.into_values().collect();
        view.values.sort_by(|a, b| b.value.total_cmp(&a.value));

        let mut per_continent: BTreeMap<Continent, Vec<f64>> = BTreeMap::new();
        for r in rows() {
            if let (Some(c), Some(v)) = (r.continent, ds.value(r, indicator)) {
                per_continent.entry(c).or_default().push(v);
            }
        }
        view.boxes = per_continent
            .into_iter()
            .filter_map(|(continent, values)| {
                let summary = BoxSummary::from_values(values.iter().copied())?;
                Some(ContinentBox {
                    continent,
                    summary,
                    values,
                })
            })
            .collect();

        let x_col = match_column(scatter_x, &ds.schema.indicator_columns);
        view.scatter = x_col.filter(|x| *x != indicator).map(|x| {
            let points = rows()
                .filter_map(|r| {
                    Some(ScatterPoint {
                        country: r.country.clone(),
                        continent: r.continent?,
                        xy: [ds.value(r, x)?, ds.value(r, indicator)?],
                    })
                })
                .collect();
            (x.to_string(), points)
        });
    }

    if let Some(country) = country {
        let history = ds.country_records(country);
        if !history.is_empty() {
            view.radar = Some(RadarProfile::for_country(ds, country));
        }
        view.score_over_time = history
            .iter()
            .filter_map(|r| ds.score(r).map(|s| [r.year as f64, s]))
            .collect();
        view.rank_over_time = history
            .iter()
            .filter_map(|r| r.rank.map(|rank| (r.year, rank)))
            .collect();
    }

    view
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    const CSV: &str = "\
Country,Year,Happiness_Score,GDP_per_Capita,Freedom
Finland,2019,7.7,1.3,0.6
Finland,2020,7.8,1.4,0.7
Denmark,2020,7.6,1.5,0.65
Chad,2020,4.2,0.3,0.4
Atlantis,2020,9.9,2.0,0.9
";

    fn loaded_state() -> (AppState, tempfile::NamedTempFile) {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{CSV}").unwrap();
        let mut state = AppState::new(Config::default());
        state.load_upload(Some(file.path().to_path_buf()));
        (state, file)
    }

    #[test]
    fn defaults_after_load() {
        let (state, _file) = loaded_state();
        assert!(state.status_message.is_none());
        assert_eq!(state.indicator.as_deref(), Some("Happiness_Score"));
        assert_eq!(state.country.as_deref(), Some("Chad"));
        // Atlantis is hidden.
        assert_eq!(state.visible_indices.len(), 4);
        assert!(state.view.values.iter().all(|v| v.country != "Atlantis"));
    }

    #[test]
    fn value_grid_uses_latest_year() {
        let (state, _file) = loaded_state();
        let finland = state
            .view
            .values
            .iter()
            .find(|v| v.country == "Finland")
            .unwrap();
        assert_eq!(finland.year, 2020);
        assert_eq!(finland.value, 7.8);
        assert_eq!(state.view.values[0].country, "Finland");
    }

    #[test]
    fn continent_filter_narrows_views() {
        let (mut state, _file) = loaded_state();
        state.set_continent_filter(ContinentFilter::Only(Continent::Europe));
        assert_eq!(state.visible_indices.len(), 3);
        let continents: Vec<_> = state.view.boxes.iter().map(|b| b.continent).collect();
        assert_eq!(continents, vec![Continent::Europe]);
        let europe = &state.view.boxes[0];
        assert_eq!(europe.values.len(), 3);
        assert_eq!(europe.summary.count, 3);
        let (x, points) = state.view.scatter.clone().unwrap();
        assert_eq!(x, "GDP_per_Capita");
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn scatter_is_skipped_when_indicator_is_the_x_axis() {
        let (mut state, _file) = loaded_state();
        state.set_indicator("GDP_per_Capita".into());
        assert!(state.view.scatter.is_none());
    }

    #[test]
    fn country_views_follow_selection() {
        let (mut state, _file) = loaded_state();
        state.set_country("Finland".into());
        assert_eq!(state.view.score_over_time, vec![[2019.0, 7.7], [2020.0, 7.8]]);
        // Atlantis (9.9) still outranks Finland in 2020.
        assert_eq!(state.view.rank_over_time, vec![(2019, 1), (2020, 2)]);
        let radar = state.view.radar.clone().unwrap();
        assert_eq!(radar.year, Some(2020));
        assert_eq!(radar.axes, vec!["GDP_per_Capita", "Freedom"]);
    }

    #[test]
    fn failed_upload_keeps_an_error_and_no_dashboard() {
        let mut state = AppState::new(Config::default());
        state.load_upload(None);
        assert!(state.dataset.is_none());
        let msg = state.status_message.unwrap();
        assert!(msg.contains("no file selected"));
        assert!(msg.contains("File → Open"));
    }
}
