use sales_pulse::table::{Align, Table};

#[test]
fn columns_are_left_aligned_by_default() {
    let mut table = Table::new(["id", "name"]);
    table.push_row(vec!["1".into(), "Alice".into()]);
    table.push_row(vec!["2".into(), "Bob".into()]);

    let rendered = table.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines, vec!["id  name", "--  -----", "1   Alice", "2   Bob"]);
}

#[test]
fn right_aligned_columns_pad_on_the_left() {
    let mut table =
        Table::new(["Service Type", "Revenue"]).with_align(&[Align::Left, Align::Right]);
    table.push_row(vec!["Bundled".into(), "$1,650.00".into()]);
    table.push_row(vec!["Basic".into(), "$60.00".into()]);

    let rendered = table.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "Service Type    Revenue");
    assert_eq!(lines[1], "------------  ---------");
    assert_eq!(lines[2], "Bundled       $1,650.00");
    assert_eq!(lines[3], "Basic            $60.00");
}

#[test]
fn control_characters_render_as_spaces() {
    let mut table = Table::new(["note"]);
    table.push_row(vec!["line1\nline2\tvalue".into()]);

    let rendered = table.render();
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "line1 line2 value");
}

#[test]
fn short_rows_render_blank_cells() {
    let mut table = Table::new(["Date", "Time of Day", "Revenue"]);
    table.push_row(vec!["2024-03-01".into()]);
    let rendered = table.render();
    assert_eq!(rendered.lines().nth(2), Some("2024-03-01"));
    assert!(!table.is_empty());
}
