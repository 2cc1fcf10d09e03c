//! CSV import — header row plus comma-separated records, with double-quote
//! escaping for embedded commas, newlines and quotes.

use segment_core::{SegmentError, SegmentResult, User};
use tracing::{debug, warn};

use crate::schema::ImportSchema;

/// Split CSV text into records of raw (untrimmed) cells. Blank lines are
/// skipped.
pub fn parse_records(text: &str) -> SegmentResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut quote_line = 0;
    let mut line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    cell.push(c);
                }
                _ => cell.push(c),
            }
            continue;
        }
        match c {
            '"' if cell.trim().is_empty() => {
                cell.clear();
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut cell)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                record.push(std::mem::take(&mut cell));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => cell.push(c),
        }
    }

    if in_quotes {
        return Err(SegmentError::Import(format!(
            "unterminated quoted field starting on line {quote_line}"
        )));
    }
    if !cell.is_empty() || !record.is_empty() {
        record.push(cell);
        push_record(&mut records, record);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.len() == 1 && record[0].trim().is_empty();
    if !blank {
        records.push(record);
    }
}

/// Parse CSV text into users, typing cells through `schema`.
///
/// Fewer than two records (no header, or a header and no rows) yields an
/// empty list. Short rows are padded with empty cells.
pub fn parse_users(text: &str, schema: &ImportSchema) -> SegmentResult<Vec<User>> {
    let records = parse_records(text)?;
    let Some((header, rows)) = records.split_first() else {
        return Ok(Vec::new());
    };
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let header: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

    let mut users = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if row.len() > header.len() {
            warn!(
                row = index + 1,
                cells = row.len(),
                columns = header.len(),
                "Row has more cells than the header, extra cells dropped"
            );
        }
        let user: User = header
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let raw = row.get(i).map(|c| c.trim()).unwrap_or("");
                (key.clone(), schema.coerce_cell(key, raw))
            })
            .collect();
        users.push(user);
    }

    if let Some(first) = users.first() {
        let missing = first.missing_required_fields();
        if !missing.is_empty() {
            warn!(?missing, "Imported users lack expected fields");
        }
    }
    debug!(users = users.len(), columns = header.len(), "CSV parsed");
    Ok(users)
}
