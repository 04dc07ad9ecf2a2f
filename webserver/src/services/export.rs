//! Spreadsheet and document export
//!
//! Both targets read a stored result and produce file bytes synchronously on
//! demand, sharing the fixed six-column schema: Year, Area, Avg Price, Total
//! Units, Res Sold, Office Sold. An empty result set produces nothing
//! (`Ok(None)`) rather than an error.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use crate::error::{WebServerError, WebServerResult};
use shared::{AnalysisResult, MappedRow, ResultView};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A generated export, ready to be sent as a download
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

const HEADERS: [&str; 6] = ["Year", "Area", "Avg Price", "Total Units", "Res Sold", "Office Sold"];
const COLUMN_WIDTHS: [f64; 6] = [10.0, 20.0, 15.0, 15.0, 15.0, 15.0];

fn xlsx_err(e: XlsxError) -> WebServerError {
    WebServerError::export(e.to_string())
}

/// Spreadsheet sheet names are capped at 31 characters by the format
fn sheet_name(name: &str) -> String {
    name.chars().take(31).collect()
}

fn strip_whitespace(name: &str) -> String {
    name.split_whitespace().collect()
}

fn single_filename(areas: &[String], extension: &str) -> String {
    if areas.is_empty() {
        format!("realestate_data.{extension}")
    } else {
        format!("realestate_{}.{extension}", areas.join("_"))
    }
}

fn compare_filename<'a>(names: impl Iterator<Item = &'a str>, extension: &str) -> String {
    let joined: Vec<String> = names.map(strip_whitespace).collect();
    format!("realestate_compare_{}.{extension}", joined.join("_"))
}

// --- Spreadsheet -----------------------------------------------------------

fn build_sheet(name: &str, rows: &[MappedRow]) -> Result<Worksheet, XlsxError> {
    let mut ws = Worksheet::new();
    let title = sheet_name(name);
    ws.set_name(title.as_str())?;

    let bold = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *header, &bold)?;
        ws.set_column_width(col as u16, COLUMN_WIDTHS[col])?;
    }

    for (index, row) in rows.iter().enumerate() {
        let r = (index + 1) as u32;
        if let Some(year) = row.year {
            ws.write_number(r, 0, year as f64)?;
        }
        if let Some(area) = &row.area {
            ws.write_string(r, 1, area.as_str())?;
        }
        for (col, value) in [
            (2u16, row.avg_price),
            (3u16, row.total_units),
            (4u16, row.res_sold),
            (5u16, row.office_sold),
        ] {
            if let Some(v) = value {
                ws.write_number(r, col, v)?;
            }
        }
    }

    Ok(ws)
}

/// Produce the spreadsheet export for the stored result, or `None` when the
/// relevant view has no content
pub fn spreadsheet(result: &AnalysisResult) -> WebServerResult<Option<ExportFile>> {
    match &result.view {
        ResultView::Single { rows, .. } => {
            if rows.is_empty() {
                return Ok(None);
            }

            let mut workbook = Workbook::new();
            let name = result
                .meta
                .areas
                .first()
                .map(String::as_str)
                .unwrap_or("Data");
            workbook.push_worksheet(build_sheet(name, rows).map_err(xlsx_err)?);

            let bytes = workbook.save_to_buffer().map_err(xlsx_err)?;
            Ok(Some(ExportFile {
                filename: single_filename(&result.meta.areas, "xlsx"),
                content_type: XLSX_CONTENT_TYPE.to_string(),
                bytes,
            }))
        }
        ResultView::Compare { areas } => {
            if areas.is_empty() {
                return Ok(None);
            }

            let mut workbook = Workbook::new();
            for group in areas {
                workbook.push_worksheet(build_sheet(&group.name, &group.rows).map_err(xlsx_err)?);
            }

            let bytes = workbook.save_to_buffer().map_err(xlsx_err)?;
            Ok(Some(ExportFile {
                filename: compare_filename(areas.iter().map(|a| a.name.as_str()), "xlsx"),
                content_type: XLSX_CONTENT_TYPE.to_string(),
                bytes,
            }))
        }
    }
}

// --- Document --------------------------------------------------------------

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const TEXT_WRAP_CHARS: usize = 95;
const TABLE_BOTTOM_MM: f64 = 280.0;
const TABLE_COLUMN_X: [f64; 6] = [14.0, 34.0, 70.0, 102.0, 134.0, 166.0];
// The document header abbreviates the last column
const TABLE_HEADERS: [&str; 6] = ["Year", "Area", "Avg Price", "Total Units", "Res Sold", "Office"];

fn pdf_err<E: std::fmt::Display>(e: E) -> WebServerError {
    WebServerError::export(e.to_string())
}

/// The page uses a top-left coordinate convention like the original renderer;
/// convert to the PDF's bottom-left origin at the last moment.
fn from_top(y: f64) -> Mm {
    Mm((PAGE_HEIGHT_MM - y) as f32)
}

/// Greedy word wrap to a character budget per line. Words longer than the
/// budget get a line of their own.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn number_cell(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
    }
}

fn row_cells(row: &MappedRow) -> [String; 6] {
    [
        row.year.map(|y| y.to_string()).unwrap_or_default(),
        row.area.clone().unwrap_or_default(),
        number_cell(row.avg_price),
        number_cell(row.total_units),
        number_cell(row.res_sold),
        number_cell(row.office_sold),
    ]
}

fn draw_table_header(layer: &PdfLayerReference, y: f64, bold: &IndirectFontRef) {
    for (x, header) in TABLE_COLUMN_X.iter().zip(TABLE_HEADERS.iter()) {
        layer.use_text(*header, 9.0, Mm(*x as f32), from_top(y), bold);
    }
}

/// Draw the six-column table starting at `start_y`, flowing onto continuation
/// pages when the bottom margin is reached. Returns the layer of the last
/// page written.
fn draw_table(
    doc: &PdfDocumentReference,
    mut layer: PdfLayerReference,
    rows: &[MappedRow],
    start_y: f64,
    font: &IndirectFontRef,
    bold: &IndirectFontRef,
) -> PdfLayerReference {
    let mut y = start_y;
    draw_table_header(&layer, y, bold);
    y += 8.0;

    for row in rows {
        if y > TABLE_BOTTOM_MM {
            let (page, page_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
            layer = doc.get_page(page).get_layer(page_layer);
            y = 20.0;
            draw_table_header(&layer, y, bold);
            y += 8.0;
        }

        for (x, cell) in TABLE_COLUMN_X.iter().zip(row_cells(row).iter()) {
            if !cell.is_empty() {
                layer.use_text(cell.as_str(), 9.0, Mm(*x as f32), from_top(y), font);
            }
        }
        y += 7.0;
    }

    layer
}

fn draw_summary(
    layer: &PdfLayerReference,
    heading: &str,
    heading_size: f64,
    heading_y: f64,
    body_y: f64,
    summary: &str,
    font: &IndirectFontRef,
) {
    layer.use_text(heading, heading_size as f32, Mm(14.0), from_top(heading_y), font);
    for (index, line) in wrap_text(summary, TEXT_WRAP_CHARS).iter().enumerate() {
        layer.use_text(line.as_str(), 10.0, Mm(14.0), from_top(body_y + index as f64 * 5.0), font);
    }
}

/// Produce the document export for the stored result, or `None` when the
/// relevant view has no content
pub fn document(result: &AnalysisResult) -> WebServerResult<Option<ExportFile>> {
    match &result.view {
        ResultView::Single { rows, .. } => {
            if rows.is_empty() {
                return Ok(None);
            }

            let (doc, page, page_layer) = PdfDocument::new(
                "Real Estate Analysis",
                Mm(PAGE_WIDTH_MM as f32),
                Mm(PAGE_HEIGHT_MM as f32),
                "Layer 1",
            );
            let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
            let bold = doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(pdf_err)?;
            let layer = doc.get_page(page).get_layer(page_layer);

            layer.use_text("Real Estate Analysis", 16.0, Mm(14.0), from_top(18.0), &bold);
            if !result.meta.areas.is_empty() {
                let line = format!("Area: {}", result.meta.areas.join(", "));
                layer.use_text(line, 11.0, Mm(14.0), from_top(26.0), &font);
            }

            let table_start = if result.summary.is_empty() {
                40.0
            } else {
                draw_summary(&layer, "AI Summary:", 12.0, 36.0, 44.0, &result.summary, &font);
                60.0
            };

            draw_table(&doc, layer, rows, table_start, &font, &bold);

            let bytes = doc.save_to_bytes().map_err(pdf_err)?;
            Ok(Some(ExportFile {
                filename: single_filename(&result.meta.areas, "pdf"),
                content_type: PDF_CONTENT_TYPE.to_string(),
                bytes,
            }))
        }
        ResultView::Compare { areas } => {
            if areas.is_empty() {
                return Ok(None);
            }

            let (doc, first_page, first_layer) = PdfDocument::new(
                "Real Estate Comparison",
                Mm(PAGE_WIDTH_MM as f32),
                Mm(PAGE_HEIGHT_MM as f32),
                "Layer 1",
            );
            let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
            let bold = doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(pdf_err)?;

            for (index, group) in areas.iter().enumerate() {
                let layer = if index == 0 {
                    doc.get_page(first_page).get_layer(first_layer)
                } else {
                    let (page, page_layer) =
                        doc.add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
                    doc.get_page(page).get_layer(page_layer)
                };

                layer.use_text("Real Estate Comparison", 16.0, Mm(14.0), from_top(18.0), &bold);
                layer.use_text(
                    format!("Area: {}", group.name),
                    12.0,
                    Mm(14.0),
                    from_top(28.0),
                    &font,
                );

                // The same global summary repeats on every page
                let table_start = if result.summary.is_empty() {
                    40.0
                } else {
                    draw_summary(&layer, "Global AI Summary:", 11.0, 38.0, 46.0, &result.summary, &font);
                    60.0
                };

                draw_table(&doc, layer, &group.rows, table_start, &font, &bold);
            }

            let bytes = doc.save_to_bytes().map_err(pdf_err)?;
            Ok(Some(ExportFile {
                filename: compare_filename(areas.iter().map(|a| a.name.as_str()), "pdf"),
                content_type: PDF_CONTENT_TYPE.to_string(),
                bytes,
            }))
        }
    }
}
