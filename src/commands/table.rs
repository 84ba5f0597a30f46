//! Renders rows of strings as a markdown table.

/// Builds a markdown table with columns padded to their widest cell. Widths are counted in
/// characters so Cyrillic text lines up.
pub(crate) fn markdown(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Pipes would end the cell early.
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| cell.replace('|', "\\|")).collect())
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers.iter().copied(), &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, separator.iter().map(String::as_str), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(pad));
        out.push_str(" |");
    }
    out.push('\n');
}

#[test]
fn markdown_table_test() {
    let table = markdown(
        &["Name", "Sum"],
        &[
            vec!["Еда".to_string(), "2,500.00".to_string()],
            vec!["a|b".to_string(), "1".to_string()],
        ],
    );
    let expected = "\
| Name | Sum      |
| ---- | -------- |
| Еда  | 2,500.00 |
| a\\|b | 1        |
";
    assert_eq!(expected, table);
}
