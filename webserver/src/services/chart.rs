//! Chart SVG rendering
//!
//! Draws the "Price vs Demand Trends" line chart from an ordered point
//! sequence: year on x, price on the left axis, demand on a secondary right
//! axis. Points missing a value are skipped in that series, leaving a gap
//! exactly like the page's old client-side renderer did.

use plotters::prelude::*;

use crate::error::{WebServerError, WebServerResult};
use shared::ChartPoint;

const WIDTH: u32 = 860;
const HEIGHT: u32 = 300;

fn chart_err<E: std::fmt::Display>(e: E) -> WebServerError {
    WebServerError::chart(e.to_string())
}

/// Widened min/max of a value sequence, usable as an axis range
fn axis_range(values: impl Iterator<Item = f64>) -> Option<std::ops::Range<f64>> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min > max {
        return None;
    }

    let pad = ((max - min) * 0.05).max(1.0);
    Some((min - pad)..(max + pad))
}

/// Render the chart to an SVG string, or `None` when no point carries a value
pub fn render_price_demand_svg(points: &[ChartPoint]) -> WebServerResult<Option<String>> {
    let price_series: Vec<(i64, f64)> = points
        .iter()
        .filter_map(|p| p.price.map(|v| (p.year, v)))
        .collect();
    let demand_series: Vec<(i64, f64)> = points
        .iter()
        .filter_map(|p| p.demand.map(|v| (p.year, v)))
        .collect();

    if price_series.is_empty() && demand_series.is_empty() {
        return Ok(None);
    }

    let mut x_min = i64::MAX;
    let mut x_max = i64::MIN;
    for (year, _) in price_series.iter().chain(demand_series.iter()) {
        x_min = x_min.min(*year);
        x_max = x_max.max(*year);
    }
    if x_min == x_max {
        // A one-year result still needs a non-degenerate axis
        x_min -= 1;
        x_max += 1;
    }

    let price_range = axis_range(price_series.iter().map(|(_, v)| *v)).unwrap_or(0.0..1.0);
    let demand_range = axis_range(demand_series.iter().map(|(_, v)| *v)).unwrap_or(0.0..1.0);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Price vs Demand Trends", ("sans-serif", 18))
            .margin(12)
            .x_label_area_size(28)
            .y_label_area_size(64)
            .right_y_label_area_size(56)
            .build_cartesian_2d(x_min..x_max, price_range)
            .map_err(chart_err)?
            .set_secondary_coord(x_min..x_max, demand_range);

        chart
            .configure_mesh()
            .disable_x_mesh()
            .light_line_style(&RGBColor(214, 214, 214))
            .y_desc("Price")
            .y_label_formatter(&|v| format!("₹{v:.0}"))
            .draw()
            .map_err(chart_err)?;

        chart
            .configure_secondary_axes()
            .y_desc("Demand")
            .draw()
            .map_err(chart_err)?;

        if !price_series.is_empty() {
            chart
                .draw_series(LineSeries::new(price_series.iter().copied(), &BLUE))
                .map_err(chart_err)?;
        }
        if !demand_series.is_empty() {
            chart
                .draw_secondary_series(LineSeries::new(demand_series.iter().copied(), &GREEN))
                .map_err(chart_err)?;
        }

        root.present().map_err(chart_err)?;
    }

    Ok(Some(svg))
}
