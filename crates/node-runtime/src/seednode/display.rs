//! Plain-text tables for the seednode status output.

/// Render `rows` under `header` in a boxed single-column table.
pub fn render_table(header: &str, rows: &[String]) -> String {
    let width = rows
        .iter()
        .map(|row| row.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width + 2));

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&format!("| {header:<width$} |\n"));
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        out.push_str(&format!("| {row:<width$} |\n"));
    }
    out.push_str(&border);
    out
}

/// Status block printed by the seednode loop.
pub fn render_status(addresses: &[String], connected: &[String]) -> String {
    format!(
        "{}\n{}",
        render_table("Seednode addresses:", addresses),
        render_table("Seednode is connected to:", connected)
    )
}
