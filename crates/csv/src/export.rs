//! CSV export of a user list, typically a segment's members.

use segment_core::User;

/// Serialize users to CSV. The header follows the first user's field order;
/// users lacking a column get an empty cell. Returns `None` for an empty list.
pub fn export_users(users: &[User]) -> Option<String> {
    let first = users.first()?;
    let headers: Vec<&str> = first.field_names().collect();

    let mut lines = Vec::with_capacity(users.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| escape_cell(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for user in users {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| {
                user.get(h)
                    .map(|v| escape_cell(&v.to_string()))
                    .unwrap_or_default()
            })
            .collect();
        lines.push(cells.join(","));
    }
    Some(lines.join("\n"))
}

/// Quote a cell containing a comma, double quote, or newline, doubling any
/// embedded quotes.
pub fn escape_cell(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Download name for a segment export: `Power Users` → `power_users_users.csv`.
pub fn export_file_name(segment_name: &str) -> String {
    let mut slug = String::with_capacity(segment_name.len());
    let mut in_space = false;
    for c in segment_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('_');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    format!("{slug}_users.csv")
}
