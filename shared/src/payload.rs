//! Wire schema for the remote analysis backend
//!
//! The backend answers `POST {base_url}/analyze/` with a JSON document of
//! summary text, parallel chart series, raw table rows keyed by the backend's
//! human-readable column names, and response metadata. Everything here is a
//! passive value type: decoding and validation only, no projection logic.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::PayloadError;

/// Request body for the analysis endpoint. `query` is the exact and only field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    pub query: String,
}

/// Parallel chart series for single-area rendering
///
/// `price` and `demand` entries may be `null` on the wire (the backend
/// serializes NaN that way), so they decode to `Option<f64>`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ChartSeries {
    #[serde(default)]
    pub years: Vec<i64>,
    #[serde(default)]
    pub price: Vec<Option<f64>>,
    #[serde(default)]
    pub demand: Vec<Option<f64>>,
}

/// Metadata the backend attaches to every response
///
/// `areas` is the ordered, de-duplicated list of localities the analysis
/// covers, as decided by the backend. It is never re-derived from the rows.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ResponseMeta {
    #[serde(default)]
    pub areas: Vec<String>,
    #[serde(default)]
    pub rows_returned: u64,
}

/// One backend table row, keyed by human-readable column names
///
/// Field presence varies per row and the same quantity can arrive under
/// alternative key names, so lookups take an ordered slice of accepted keys
/// and return the first present, non-null value.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(transparent)]
pub struct RawRow(pub Map<String, Value>);

impl RawRow {
    fn first(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// First present value under `keys` as a float. Integer JSON numbers are
    /// accepted; `null` counts as absent.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        self.first(keys).and_then(Value::as_f64)
    }

    /// First present value under `keys` as an integer, truncating a float
    /// representation if the backend sent one.
    pub fn integer(&self, keys: &[&str]) -> Option<i64> {
        let value = self.first(keys)?;
        value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
    }

    /// First present value under `keys` as text.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.first(keys)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Column-name fallback lists for [`RawRow`] lookups
///
/// Each constant is the ordered list of source keys accepted for one mapped
/// field; adding another backend alias is a data change here, not a code
/// change in the projector.
pub mod columns {
    pub const YEAR: &[&str] = &["year"];
    pub const AREA: &[&str] = &["final location"];
    pub const AVG_PRICE: &[&str] = &["flat - weighted average rate"];
    pub const TOTAL_UNITS: &[&str] = &["total units"];
    pub const RES_SOLD: &[&str] = &["residential_sold - igr", "flat_sold - igr"];
    pub const OFFICE_SOLD: &[&str] = &["office_sold - igr"];
    pub const SHOP_SOLD: &[&str] = &["shop_sold - igr"];
}

/// Full analysis payload, immutable after receipt
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub chart: ChartSeries,
    #[serde(default)]
    pub table: Vec<RawRow>,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl AnalysisResponse {
    /// Reject payloads whose chart series lengths disagree.
    ///
    /// A `rows_returned` count that disagrees with the actual table length is
    /// tolerated but logged, since nothing downstream depends on it.
    pub fn validate(&self) -> Result<(), PayloadError> {
        let years = self.chart.years.len();
        let price = self.chart.price.len();
        let demand = self.chart.demand.len();

        if price != years || demand != years {
            return Err(PayloadError::ChartLengthMismatch { years, price, demand });
        }

        if self.meta.rows_returned as usize != self.table.len() {
            tracing::warn!(
                "rows_returned={} disagrees with table length {}",
                self.meta.rows_returned,
                self.table.len()
            );
        }

        Ok(())
    }
}
