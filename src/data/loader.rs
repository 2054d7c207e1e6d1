use std::io::Read;
use std::path::Path;

use super::column::ColumnData;
use super::frame::DataFrame;
use super::DataError;

/// Load a data frame from a CSV file with a header row.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<DataFrame, DataError> {
    let reader = csv::Reader::from_path(path)?;
    collect_frame(reader)
}

/// Load a data frame from any CSV source with a header row.
///
/// Column types are inferred from the full column:
/// * every cell an integer → `Integer`
/// * every cell a number or empty → `Float` (empty cells become NaN)
/// * every cell `true`/`false` (any case) → `Boolean`
/// * every cell empty → `Float` of NaN
/// * anything else → `Text`, which must have no empty cells
///
/// Rows are never dropped, so an empty cell in a text column is a
/// [`DataError::MissingValue`] instead of a category of its own.
pub fn read_csv<R: Read>(source: R) -> Result<DataFrame, DataError> {
    collect_frame(csv::Reader::from_reader(source))
}

fn collect_frame<R: Read>(mut reader: csv::Reader<R>) -> Result<DataFrame, DataError> {
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col_idx, column) in cells.iter_mut().enumerate() {
            column.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let mut df = DataFrame::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        let data = infer_column(&name, raw)?;
        log::debug!("csv column '{name}' inferred as {}", data.dtype_name());
        df.push_column(name, data)?;
    }
    Ok(df)
}

fn infer_column(name: &str, raw: Vec<String>) -> Result<ColumnData, DataError> {
    if raw.is_empty() {
        return Ok(ColumnData::Text(raw));
    }

    let non_empty = || raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty());

    let all_present = non_empty().count() == raw.len();

    if all_present {
        if let Some(ints) = raw.iter().map(|s| s.trim().parse::<i64>().ok()).collect::<Option<Vec<_>>>() {
            return Ok(ColumnData::Integer(ints));
        }
        if let Some(bools) = raw.iter().map(|s| parse_bool(s.trim())).collect::<Option<Vec<_>>>() {
            return Ok(ColumnData::Boolean(bools));
        }
    }

    if non_empty().all(|s| s.parse::<f64>().is_ok()) {
        let floats = raw
            .iter()
            .map(|s| s.trim().parse::<f64>().unwrap_or(f64::NAN))
            .collect();
        return Ok(ColumnData::Float(floats));
    }

    if let Some(row) = raw.iter().position(|s| s.trim().is_empty()) {
        return Err(DataError::MissingValue {
            column: name.to_string(),
            row,
        });
    }

    Ok(ColumnData::Text(raw))
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
