use std::borrow::Cow;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// A titled block of text cells, rendered with space-padded columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Per-column alignment; columns past the end are left aligned.
    pub align: Vec<Align>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            align: Vec::new(),
        }
    }

    pub fn with_align(mut self, align: &[Align]) -> Self {
        self.align = align.to_vec();
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut widths = self
            .headers
            .iter()
            .map(|h| display_width(h))
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(display_width(cell));
            }
        }
        for width in &mut widths {
            *width = (*width).max(1);
        }

        let mut output = String::new();
        let _ = writeln!(output, "{}", self.format_row(&self.headers, &widths));
        let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", self.format_row(&separator, &widths));
        for row in &self.rows {
            let _ = writeln!(output, "{}", self.format_row(row, &widths));
        }
        output
    }

    fn format_row(&self, values: &[String], widths: &[usize]) -> String {
        let cells = widths
            .iter()
            .enumerate()
            .map(|(idx, width)| {
                let value = values.get(idx).map(String::as_str).unwrap_or("");
                let sanitized = sanitize_cell(value);
                let padding = " ".repeat(width.saturating_sub(display_width(&sanitized)));
                match self.align.get(idx).copied().unwrap_or_default() {
                    Align::Left => format!("{sanitized}{padding}"),
                    Align::Right => format!("{padding}{sanitized}"),
                }
            })
            .collect::<Vec<_>>();
        cells.join("  ").trim_end().to_string()
    }
}

pub fn print_table(table: &Table) {
    print!("{}", table.render());
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
