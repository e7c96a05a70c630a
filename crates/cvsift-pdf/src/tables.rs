//! Gap-based table row detection over the interpreted span stream.
//!
//! A row whose spans form three or more cells separated by wide horizontal
//! gaps, appearing in a run of at least two rows with the same cell count,
//! is treated as tabular data and re-emitted as a pipe-delimited line.

use crate::content::RawSpan;

/// Minimum horizontal gap (points) between spans to count as a column break.
const MIN_COLUMN_GAP: f32 = 12.0;
/// Minimum cells per row for a row to look tabular.
const MIN_CELLS: usize = 3;
/// Minimum consecutive rows with a consistent cell count.
const MIN_ROWS: usize = 2;
/// Rows are keyed by y rounded to one decimal.
const ROW_KEY_SCALE: f32 = 10.0;

fn row_cells(spans: &[&RawSpan]) -> Vec<String> {
    let mut sorted: Vec<&RawSpan> = spans.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let mut cells: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut last_end: Option<f32> = None;

    for span in sorted {
        let gap = last_end.map(|end| span.x - end).unwrap_or(0.0);
        if last_end.is_some() && gap >= MIN_COLUMN_GAP && !current.trim().is_empty() {
            cells.push(current.trim().to_string());
            current = String::new();
        }
        if !current.is_empty() && !current.ends_with(' ') {
            current.push(' ');
        }
        current.push_str(span.text.trim());
        last_end = Some(span.x + span.width);
    }
    if !current.trim().is_empty() {
        cells.push(current.trim().to_string());
    }
    cells
}

/// Detect tabular rows and render them as ` | `-delimited lines, in reading
/// order. Non-tabular pages produce an empty vec.
pub(crate) fn detect_table_rows(spans: &[RawSpan]) -> Vec<String> {
    let mut rows: Vec<(i64, Vec<&RawSpan>)> = Vec::new();
    for span in spans {
        if span.text.trim().is_empty() {
            continue;
        }
        let key = (span.y * ROW_KEY_SCALE).round() as i64;
        match rows.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(span),
            None => rows.push((key, vec![span])),
        }
    }
    rows.sort_by_key(|(key, _)| *key);

    let cell_rows: Vec<Vec<String>> = rows.iter().map(|(_, members)| row_cells(members)).collect();

    let mut out = Vec::new();
    let mut run_start = 0;
    let mut idx = 0;
    while idx <= cell_rows.len() {
        let extends_run = idx < cell_rows.len()
            && cell_rows[idx].len() >= MIN_CELLS
            && (idx == run_start || cell_rows[idx].len() == cell_rows[run_start].len());
        if extends_run {
            idx += 1;
            continue;
        }
        if idx - run_start >= MIN_ROWS {
            for row in &cell_rows[run_start..idx] {
                out.push(row.join(" | "));
            }
        }
        idx += 1;
        run_start = idx;
    }
    out
}
