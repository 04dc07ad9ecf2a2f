//! Projected result model
//!
//! The immutable value object the webserver stores per query. Built once by
//! the projector from a validated [`AnalysisResponse`](crate::AnalysisResponse)
//! and replaced wholesale on the next query, never patched.

use serde::{Deserialize, Serialize};

use crate::payload::ResponseMeta;

/// One normalized table row
///
/// Absent source fields become `None` rather than a decode fault, so the
/// mapping from raw rows stays total.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MappedRow {
    pub year: Option<i64>,
    pub area: Option<String>,
    pub avg_price: Option<f64>,
    pub total_units: Option<f64>,
    pub res_sold: Option<f64>,
    pub office_sold: Option<f64>,
    pub shop_sold: Option<f64>,
}

/// One chart sample; a missing price or demand renders as a gap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub year: i64,
    pub price: Option<f64>,
    pub demand: Option<f64>,
}

/// Per-area chart/table pair used in compare mode. Rows are sorted ascending
/// by year, `None` years first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaGroup {
    pub name: String,
    pub chart: Vec<ChartPoint>,
    pub rows: Vec<MappedRow>,
}

/// Presentation mode of a query result
///
/// The enum carries the mutual-exclusion rule in the type: a result is either
/// one flat chart/table pair or a set of per-area groups, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ResultView {
    Single {
        chart: Vec<ChartPoint>,
        rows: Vec<MappedRow>,
    },
    Compare {
        areas: Vec<AreaGroup>,
    },
}

impl ResultView {
    pub fn is_compare(&self) -> bool {
        matches!(self, ResultView::Compare { .. })
    }

    /// Flat chart points when in single mode
    pub fn single_chart(&self) -> Option<&[ChartPoint]> {
        match self {
            ResultView::Single { chart, .. } => Some(chart),
            ResultView::Compare { .. } => None,
        }
    }

    /// Flat table rows when in single mode
    pub fn single_rows(&self) -> Option<&[MappedRow]> {
        match self {
            ResultView::Single { rows, .. } => Some(rows),
            ResultView::Compare { .. } => None,
        }
    }

    /// Per-area groups when in compare mode
    pub fn compare_areas(&self) -> Option<&[AreaGroup]> {
        match self {
            ResultView::Single { .. } => None,
            ResultView::Compare { areas } => Some(areas),
        }
    }
}

/// The result-state value object: one per accepted query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    pub meta: ResponseMeta,
    pub view: ResultView,
}

impl AnalysisResult {
    pub fn is_compare(&self) -> bool {
        self.view.is_compare()
    }

    pub fn area_names(&self) -> &[String] {
        &self.meta.areas
    }

    /// Total mapped rows across the whole result
    pub fn row_count(&self) -> usize {
        match &self.view {
            ResultView::Single { rows, .. } => rows.len(),
            ResultView::Compare { areas } => areas.iter().map(|a| a.rows.len()).sum(),
        }
    }
}
