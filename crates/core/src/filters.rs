//! Filter state and the reducer that merges updates into it
//!
//! `FilterState` holds everything the site list can be narrowed by: the text
//! search fields, pagination, and one range-or-exact constraint per numeric
//! column. Every operation here takes the current state by reference and
//! returns a new one; nothing is mutated in place.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Text-filterable site columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    SiteName,
    Region,
    LandType,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [
        SearchField::SiteName,
        SearchField::Region,
        SearchField::LandType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::SiteName => "site_name",
            SearchField::Region => "region",
            SearchField::LandType => "land_type",
        }
    }
}

/// Numeric site columns that accept range or exact constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Latitude,
    Longitude,
    AreaScore,
    SolarIrradianceScore,
    GridDistanceKm,
    InfrastructureScore,
    TotalSuitabilityScore,
    SlopeScore,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 8] = [
        NumericColumn::Latitude,
        NumericColumn::Longitude,
        NumericColumn::AreaScore,
        NumericColumn::SolarIrradianceScore,
        NumericColumn::GridDistanceKm,
        NumericColumn::InfrastructureScore,
        NumericColumn::TotalSuitabilityScore,
        NumericColumn::SlopeScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NumericColumn::Latitude => "latitude",
            NumericColumn::Longitude => "longitude",
            NumericColumn::AreaScore => "area_score",
            NumericColumn::SolarIrradianceScore => "solar_irradiance_score",
            NumericColumn::GridDistanceKm => "grid_distance_km",
            NumericColumn::InfrastructureScore => "infrastructure_score",
            NumericColumn::TotalSuitabilityScore => "total_suitability_score",
            NumericColumn::SlopeScore => "slope_score",
        }
    }

    /// Short label used by compact displays
    pub fn label(&self) -> &'static str {
        match self {
            NumericColumn::Latitude => "Latitude",
            NumericColumn::Longitude => "Longitude",
            NumericColumn::AreaScore => "Area",
            NumericColumn::SolarIrradianceScore => "Solar",
            NumericColumn::GridDistanceKm => "Grid",
            NumericColumn::InfrastructureScore => "Road",
            NumericColumn::TotalSuitabilityScore => "Suitability",
            NumericColumn::SlopeScore => "Slope",
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NumericColumn {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NumericColumn::ALL
            .iter()
            .copied()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| FilterParseError::UnknownColumn(s.to_string()))
    }
}

/// Which input widget produced a range/exact entry. Display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    Exact,
    Range,
}

/// Payload of a numeric constraint: a single value or a (half-open) range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFilter {
    Exact(f64),
    Range {
        min_score: Option<f64>,
        max_score: Option<f64>,
    },
}

impl ScoreFilter {
    pub fn score(&self) -> Option<f64> {
        match self {
            ScoreFilter::Exact(score) => Some(*score),
            ScoreFilter::Range { .. } => None,
        }
    }

    pub fn min_score(&self) -> Option<f64> {
        match self {
            ScoreFilter::Exact(_) => None,
            ScoreFilter::Range { min_score, .. } => *min_score,
        }
    }

    pub fn max_score(&self) -> Option<f64> {
        match self {
            ScoreFilter::Exact(_) => None,
            ScoreFilter::Range { max_score, .. } => *max_score,
        }
    }
}

/// One numeric column's constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeExactEntry {
    pub column: NumericColumn,
    pub filter: ScoreFilter,
    pub mode: Option<FilterMode>,
}

/// Text search values, `None` meaning inactive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFields {
    pub site_name: Option<String>,
    pub region: Option<String>,
    pub land_type: Option<String>,
}

impl SearchFields {
    pub fn get(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::SiteName => self.site_name.as_deref(),
            SearchField::Region => self.region.as_deref(),
            SearchField::LandType => self.land_type.as_deref(),
        }
    }

    fn slot(&mut self, field: SearchField) -> &mut Option<String> {
        match field {
            SearchField::SiteName => &mut self.site_name,
            SearchField::Region => &mut self.region,
            SearchField::LandType => &mut self.land_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Current filter, search and pagination criteria for the site collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub search: SearchFields,
    pub pagination: Pagination,
    pub range_exact: Vec<RangeExactEntry>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Stored constraint for `column`, if any
    pub fn range_filter(&self, column: NumericColumn) -> Option<&RangeExactEntry> {
        self.range_exact.iter().find(|entry| entry.column == column)
    }
}

/// Incoming numeric constraint, possibly partial on its bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeExactUpdate {
    pub column: NumericColumn,
    pub score: Option<f64>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub mode: Option<FilterMode>,
}

impl RangeExactUpdate {
    pub fn exact(column: NumericColumn, score: f64) -> Self {
        Self {
            column,
            score: Some(score),
            min_score: None,
            max_score: None,
            mode: Some(FilterMode::Exact),
        }
    }

    pub fn range(column: NumericColumn, min_score: Option<f64>, max_score: Option<f64>) -> Self {
        Self {
            column,
            score: None,
            min_score,
            max_score,
            mode: Some(FilterMode::Range),
        }
    }
}

/// A targeted change to one part of the filter state
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    Search(SearchField, Option<String>),
    Limit(Option<u64>),
    Offset(Option<u64>),
    RangeExact(RangeExactUpdate),
}

/// Subsets of the state cleared together when a panel is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCategory {
    RangeExact,
    Search,
    Pagination,
}

/// Merge one update into `state`, returning the new state
///
/// Scalar keys replace their value outright (an empty string counts as
/// cleared). Range/exact updates follow these rules:
/// - an update carrying `score` replaces the column's entry with an exact
///   match and drops any stored bounds
/// - otherwise each bound falls back to the stored one when the update
///   omits it, so `min_score` can change without touching `max_score`
/// - when neither bound survives the merge the column is removed
///
/// An existing entry keeps its position; new columns are appended.
pub fn apply_filter_update(state: &FilterState, update: FilterUpdate) -> FilterState {
    let mut next = state.clone();

    match update {
        FilterUpdate::Search(field, value) => {
            *next.search.slot(field) = value.filter(|v| !v.is_empty());
        }
        FilterUpdate::Limit(limit) => next.pagination.limit = limit,
        FilterUpdate::Offset(offset) => next.pagination.offset = offset,
        FilterUpdate::RangeExact(incoming) => {
            let index = next
                .range_exact
                .iter()
                .position(|entry| entry.column == incoming.column);
            let existing = index.map(|i| next.range_exact[i].filter);

            let filter = match incoming.score {
                Some(score) => Some(ScoreFilter::Exact(score)),
                None => {
                    let min_score = incoming
                        .min_score
                        .or_else(|| existing.and_then(|f| f.min_score()));
                    let max_score = incoming
                        .max_score
                        .or_else(|| existing.and_then(|f| f.max_score()));

                    if min_score.is_none() && max_score.is_none() {
                        None
                    } else {
                        Some(ScoreFilter::Range {
                            min_score,
                            max_score,
                        })
                    }
                }
            };

            match (index, filter) {
                (Some(i), Some(filter)) => {
                    next.range_exact[i] = RangeExactEntry {
                        column: incoming.column,
                        filter,
                        mode: incoming.mode,
                    };
                }
                (None, Some(filter)) => next.range_exact.push(RangeExactEntry {
                    column: incoming.column,
                    filter,
                    mode: incoming.mode,
                }),
                (Some(i), None) => {
                    next.range_exact.remove(i);
                }
                (None, None) => {}
            }
        }
    }

    next
}

/// Drop the constraint for `column`; no-op when none is stored
pub fn remove_range_filter(state: &FilterState, column: NumericColumn) -> FilterState {
    let mut next = state.clone();
    next.range_exact.retain(|entry| entry.column != column);
    next
}

/// Reset one category of fields, leaving the others untouched
pub fn clear_category(state: &FilterState, category: FilterCategory) -> FilterState {
    let mut next = state.clone();
    match category {
        FilterCategory::RangeExact => next.range_exact.clear(),
        FilterCategory::Search => next.search = SearchFields::default(),
        FilterCategory::Pagination => next.pagination = Pagination::default(),
    }
    next
}

/// Error type for filter expression parsing
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterParseError {
    #[error("Unknown column: {0}. Valid columns: latitude, longitude, area_score, solar_irradiance_score, grid_distance_km, infrastructure_score, total_suitability_score, slope_score")]
    UnknownColumn(String),

    #[error("Invalid filter expression: {0}. Expected <column>=<value> or <column>=<min>..<max>")]
    InvalidExpression(String),

    #[error("Invalid number in filter: {0}")]
    InvalidNumber(String),

    #[error("Range filter needs at least one bound: {0}")]
    EmptyRange(String),
}

/// Parse a command-line filter expression into a range/exact update
///
/// Accepted forms:
/// - `slope_score=15` exact match
/// - `area_score=100..200` both bounds
/// - `area_score=100..` lower bound only
/// - `area_score=..200` upper bound only
pub fn parse_filter_expr(expr: &str) -> Result<RangeExactUpdate, FilterParseError> {
    let (column, value) = expr
        .split_once('=')
        .ok_or_else(|| FilterParseError::InvalidExpression(expr.to_string()))?;

    let column: NumericColumn = column.trim().parse()?;
    let value = value.trim();

    if value.is_empty() {
        return Err(FilterParseError::InvalidExpression(expr.to_string()));
    }

    match value.split_once("..") {
        None => Ok(RangeExactUpdate::exact(column, parse_number(value)?)),
        Some((min, max)) => {
            let min_score = parse_bound(min)?;
            let max_score = parse_bound(max)?;
            if min_score.is_none() && max_score.is_none() {
                return Err(FilterParseError::EmptyRange(expr.to_string()));
            }
            Ok(RangeExactUpdate::range(column, min_score, max_score))
        }
    }
}

fn parse_bound(bound: &str) -> Result<Option<f64>, FilterParseError> {
    let bound = bound.trim();
    if bound.is_empty() {
        Ok(None)
    } else {
        parse_number(bound).map(Some)
    }
}

fn parse_number(value: &str) -> Result<f64, FilterParseError> {
    value
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FilterParseError::InvalidNumber(value.to_string()))
}
