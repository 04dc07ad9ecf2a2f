//! View-model types for the browser page
//!
//! Serde DTOs mirroring [`shared::AnalysisResult`] with the camelCase field
//! names the page renders directly. The DTO keeps the single/compare
//! exclusivity visible on the wire: `chart`/`rows` are populated in single
//! mode, `areas` in compare mode, never both.

use serde::{Deserialize, Serialize};

use shared::{AnalysisResult, AreaGroup, ChartPoint, MappedRow, ResponseMeta, ResultView};

/// Body of `POST /api/analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeBody {
    pub query: String,
}

/// Query string of `GET /api/chart.svg`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChartQuery {
    pub area: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowDto {
    pub year: Option<i64>,
    pub area: Option<String>,
    pub avg_price: Option<f64>,
    pub total_units: Option<f64>,
    pub res_sold: Option<f64>,
    pub office_sold: Option<f64>,
    pub shop_sold: Option<f64>,
}

impl From<&MappedRow> for RowDto {
    fn from(row: &MappedRow) -> Self {
        Self {
            year: row.year,
            area: row.area.clone(),
            avg_price: row.avg_price,
            total_units: row.total_units,
            res_sold: row.res_sold,
            office_sold: row.office_sold,
            shop_sold: row.shop_sold,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPointDto {
    pub year: i64,
    pub price: Option<f64>,
    pub demand: Option<f64>,
}

impl From<&ChartPoint> for ChartPointDto {
    fn from(point: &ChartPoint) -> Self {
        Self {
            year: point.year,
            price: point.price,
            demand: point.demand,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaGroupDto {
    pub name: String,
    pub chart_data: Vec<ChartPointDto>,
    pub rows: Vec<RowDto>,
}

impl From<&AreaGroup> for AreaGroupDto {
    fn from(group: &AreaGroup) -> Self {
        Self {
            name: group.name.clone(),
            chart_data: group.chart.iter().map(ChartPointDto::from).collect(),
            rows: group.rows.iter().map(RowDto::from).collect(),
        }
    }
}

/// Full result view-model returned by `/api/analyze` and `/api/result`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultDto {
    pub summary: String,
    pub meta: ResponseMeta,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<Vec<ChartPointDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<RowDto>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub areas: Option<Vec<AreaGroupDto>>,
}

impl From<&AnalysisResult> for ResultDto {
    fn from(result: &AnalysisResult) -> Self {
        match &result.view {
            ResultView::Single { chart, rows } => Self {
                summary: result.summary.clone(),
                meta: result.meta.clone(),
                mode: "single".to_string(),
                chart: Some(chart.iter().map(ChartPointDto::from).collect()),
                rows: Some(rows.iter().map(RowDto::from).collect()),
                areas: None,
            },
            ResultView::Compare { areas } => Self {
                summary: result.summary.clone(),
                meta: result.meta.clone(),
                mode: "compare".to_string(),
                chart: None,
                rows: None,
                areas: Some(areas.iter().map(AreaGroupDto::from).collect()),
            },
        }
    }
}
