//! Result projection
//!
//! Maps a validated backend payload into the stored result model: renames the
//! backend's human-readable columns, then picks single or compare mode from
//! `meta.areas`. Pure functions, no I/O.

use shared::payload::{AnalysisResponse, RawRow, columns};
use shared::{AnalysisResult, AreaGroup, ChartPoint, MappedRow, ResultView};

/// Rename one raw row into the normalized shape.
///
/// Total: every input row yields exactly one mapped row, with absent source
/// fields carried as `None`. `res_sold` takes the first present of the
/// accepted residential-sold key names.
pub fn map_row(row: &RawRow) -> MappedRow {
    MappedRow {
        year: row.integer(columns::YEAR),
        area: row.text(columns::AREA),
        avg_price: row.number(columns::AVG_PRICE),
        total_units: row.number(columns::TOTAL_UNITS),
        res_sold: row.number(columns::RES_SOLD),
        office_sold: row.number(columns::OFFICE_SOLD),
        shop_sold: row.number(columns::SHOP_SOLD),
    }
}

/// Project a validated payload into the result-state value object.
///
/// `meta.areas` is authoritative for both the mode decision and the compare
/// group order; row order inside the table is only authoritative in single
/// mode, where it is preserved untouched.
pub fn project(response: AnalysisResponse) -> AnalysisResult {
    let mapped: Vec<MappedRow> = response.table.iter().map(map_row).collect();

    let view = if response.meta.areas.len() > 1 {
        ResultView::Compare {
            areas: response
                .meta
                .areas
                .iter()
                .map(|name| area_group(name, &mapped))
                .collect(),
        }
    } else {
        ResultView::Single {
            chart: single_chart(&response),
            rows: mapped,
        }
    };

    AnalysisResult {
        summary: response.summary,
        meta: response.meta,
        view,
    }
}

/// Zip the top-level chart series index-wise. Lengths were checked by
/// `AnalysisResponse::validate`, so a plain index lookup is safe.
fn single_chart(response: &AnalysisResponse) -> Vec<ChartPoint> {
    response
        .chart
        .years
        .iter()
        .enumerate()
        .map(|(index, &year)| ChartPoint {
            year,
            price: response.chart.price.get(index).copied().flatten(),
            demand: response.chart.demand.get(index).copied().flatten(),
        })
        .collect()
}

/// Build one compare-mode group: filter on exact area match, sort by year,
/// and derive the chart from the sorted rows (price = avg_price, demand =
/// total_units). The top-level chart series is not consulted here.
fn area_group(name: &str, mapped: &[MappedRow]) -> AreaGroup {
    let mut rows: Vec<MappedRow> = mapped
        .iter()
        .filter(|row| row.area.as_deref() == Some(name))
        .cloned()
        .collect();
    rows.sort_by_key(|row| row.year);

    // Rows without a year stay in the table but cannot place a chart point
    let chart = rows
        .iter()
        .filter_map(|row| {
            row.year.map(|year| ChartPoint {
                year,
                price: row.avg_price,
                demand: row.total_units,
            })
        })
        .collect();

    AreaGroup {
        name: name.to_string(),
        chart,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> AnalysisResponse {
        let response: AnalysisResponse = serde_json::from_value(value).unwrap();
        response.validate().unwrap();
        response
    }

    fn wakad_row(year: i64) -> serde_json::Value {
        json!({
            "year": year,
            "final location": "Wakad",
            "flat - weighted average rate": 5000,
            "total units": 100,
            "flat_sold - igr": 80,
            "office_sold - igr": 5,
            "shop_sold - igr": 2
        })
    }

    #[test]
    fn maps_single_row_with_fallback_res_sold() {
        let response = response(json!({
            "summary": "steady growth",
            "chart": {"years": [2020], "price": [5000.0], "demand": [100.0]},
            "table": [wakad_row(2020)],
            "meta": {"areas": ["Wakad"], "rows_returned": 1}
        }));

        let result = project(response);
        assert!(!result.is_compare());

        let rows = result.view.single_rows().unwrap();
        assert_eq!(
            rows[0],
            MappedRow {
                year: Some(2020),
                area: Some("Wakad".to_string()),
                avg_price: Some(5000.0),
                total_units: Some(100.0),
                res_sold: Some(80.0),
                office_sold: Some(5.0),
                shop_sold: Some(2.0),
            }
        );

        let chart = result.view.single_chart().unwrap();
        assert_eq!(chart.len(), 1);
        assert_eq!(chart[0].price, Some(5000.0));
        assert_eq!(chart[0].demand, Some(100.0));
    }

    #[test]
    fn res_sold_prefers_residential_key_over_flat() {
        let row: RawRow = serde_json::from_value(json!({
            "residential_sold - igr": 90,
            "flat_sold - igr": 80
        }))
        .unwrap();

        assert_eq!(map_row(&row).res_sold, Some(90.0));
    }

    #[test]
    fn mapping_is_total_for_sparse_rows() {
        let row: RawRow = serde_json::from_value(json!({"year": 2022})).unwrap();
        let mapped = map_row(&row);

        assert_eq!(mapped.year, Some(2022));
        assert_eq!(mapped.area, None);
        assert_eq!(mapped.avg_price, None);
        assert_eq!(mapped.res_sold, None);
    }

    #[test]
    fn empty_or_missing_areas_selects_single_mode() {
        let result = project(response(json!({
            "chart": {"years": [], "price": [], "demand": []},
            "table": [wakad_row(2020)],
            "meta": {"areas": [], "rows_returned": 1}
        })));

        assert!(!result.is_compare());
        assert_eq!(result.view.single_rows().unwrap().len(), 1);
    }

    #[test]
    fn single_mode_preserves_source_row_order() {
        let result = project(response(json!({
            "chart": {"years": [], "price": [], "demand": []},
            "table": [wakad_row(2022), wakad_row(2020), wakad_row(2021)],
            "meta": {"areas": ["Wakad"], "rows_returned": 3}
        })));

        let years: Vec<_> = result
            .view
            .single_rows()
            .unwrap()
            .iter()
            .map(|r| r.year.unwrap())
            .collect();
        assert_eq!(years, [2022, 2020, 2021]);
    }

    #[test]
    fn compare_mode_groups_follow_meta_order() {
        let mut aundh = wakad_row(2020);
        aundh["final location"] = json!("Aundh");

        let result = project(response(json!({
            "chart": {"years": [2020], "price": [5000.0], "demand": [100.0]},
            "table": [wakad_row(2020), aundh],
            "meta": {"areas": ["Wakad", "Aundh"], "rows_returned": 2}
        })));

        assert!(result.is_compare());
        let areas = result.view.compare_areas().unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].name, "Wakad");
        assert_eq!(areas[1].name, "Aundh");
        assert_eq!(areas[0].rows.len(), 1);
        assert_eq!(areas[1].rows.len(), 1);
        assert_eq!(areas[0].rows[0].area.as_deref(), Some("Wakad"));
        assert_eq!(areas[1].rows[0].area.as_deref(), Some("Aundh"));
    }

    #[test]
    fn compare_rows_sort_ascending_by_year() {
        let result = project(response(json!({
            "chart": {"years": [], "price": [], "demand": []},
            "table": [wakad_row(2022), wakad_row(2020), wakad_row(2021)],
            "meta": {"areas": ["Wakad", "Aundh"], "rows_returned": 3}
        })));

        let areas = result.view.compare_areas().unwrap();
        let years: Vec<_> = areas[0].rows.iter().map(|r| r.year.unwrap()).collect();
        assert_eq!(years, [2020, 2021, 2022]);

        // Aundh has no matching rows but still gets its group
        assert_eq!(areas[1].name, "Aundh");
        assert!(areas[1].rows.is_empty());
        assert!(areas[1].chart.is_empty());
    }

    #[test]
    fn compare_chart_derives_from_rows_not_top_level_series() {
        let mut aundh = wakad_row(2021);
        aundh["final location"] = json!("Aundh");
        aundh["flat - weighted average rate"] = json!(7000);
        aundh["total units"] = json!(50);

        let result = project(response(json!({
            // Deliberately different top-level series; compare mode must ignore it
            "chart": {"years": [1999], "price": [1.0], "demand": [1.0]},
            "table": [wakad_row(2020), aundh],
            "meta": {"areas": ["Wakad", "Aundh"], "rows_returned": 2}
        })));

        let areas = result.view.compare_areas().unwrap();
        assert_eq!(areas[0].chart[0].year, 2020);
        assert_eq!(areas[0].chart[0].price, Some(5000.0));
        assert_eq!(areas[0].chart[0].demand, Some(100.0));
        assert_eq!(areas[1].chart[0].year, 2021);
        assert_eq!(areas[1].chart[0].price, Some(7000.0));
        assert_eq!(areas[1].chart[0].demand, Some(50.0));
    }

    #[test]
    fn rows_without_area_are_dropped_in_compare_mode() {
        let result = project(response(json!({
            "chart": {"years": [], "price": [], "demand": []},
            "table": [wakad_row(2020), {"year": 2020}],
            "meta": {"areas": ["Wakad", "Aundh"], "rows_returned": 2}
        })));

        let areas = result.view.compare_areas().unwrap();
        assert_eq!(areas[0].rows.len(), 1);
        assert!(areas[1].rows.is_empty());
    }

    #[test]
    fn yearless_rows_sort_first_and_skip_chart() {
        let result = project(response(json!({
            "chart": {"years": [], "price": [], "demand": []},
            "table": [
                wakad_row(2021),
                {"final location": "Wakad", "flat - weighted average rate": 4000}
            ],
            "meta": {"areas": ["Wakad", "Aundh"], "rows_returned": 2}
        })));

        let group = &result.view.compare_areas().unwrap()[0];
        assert_eq!(group.rows.len(), 2);
        assert_eq!(group.rows[0].year, None);
        assert_eq!(group.rows[1].year, Some(2021));
        assert_eq!(group.chart.len(), 1);
        assert_eq!(group.chart[0].year, 2021);
    }
}
