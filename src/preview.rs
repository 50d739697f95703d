use anyhow::Result;
use log::info;

use crate::{
    cli::PreviewArgs,
    derive::Dataset,
    pipeline,
    table::{self, Align, Table},
};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let outcome = crate::prepare_input(&args.input)?;
    let criteria = crate::resolve_criteria(&outcome, &args.filters)?;
    let filtered = match criteria {
        Some(criteria) => pipeline::filter(&outcome.dataset, &criteria),
        None => outcome.dataset,
    };
    let table = preview_table(&filtered, args.rows);
    table::print_table(&table);
    info!(
        "Displayed {} of {} filtered row(s) from {:?}",
        table.rows.len(),
        filtered.len(),
        args.input.input
    );
    Ok(())
}

/// The first `limit` records as text: the eight source columns, then the
/// derived ones.
pub fn preview_table(dataset: &Dataset, limit: usize) -> Table {
    let columns = Dataset::columns();
    let align = (0..columns.len())
        .map(|idx| match idx {
            5..=8 => Align::Right,
            _ => Align::Left,
        })
        .collect::<Vec<_>>();
    let mut table = Table::new(columns).with_align(&align);
    for record in dataset.iter().take(limit) {
        table.push_row(record.display_cells());
    }
    table
}
