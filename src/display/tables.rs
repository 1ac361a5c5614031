//! Tables for `clusterkit list` and `clusterkit run`.

use comfy_table::{
    Attribute, Cell, CellAlignment, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};

use crate::io::ClusterReport;

pub struct TableBuilder {
    table: Table,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.apply_modifier(UTF8_ROUND_CORNERS);
        Self { table }
    }

    pub fn set_headers(mut self, headers: Vec<&str>) -> Self {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
            .collect();
        self.table.set_header(header_cells);
        self
    }

    pub fn add_row(mut self, row: Vec<String>) -> Self {
        self.table.add_row(row);
        self
    }

    /// Right-align a numeric column.
    pub fn align_right(mut self, column: usize) -> Self {
        if let Some(col) = self.table.column_mut(column) {
            col.set_cell_alignment(CellAlignment::Right);
        }
        self
    }

    pub fn build(self) -> String {
        self.table.to_string()
    }
}

/// Registered names with a free-form note per name.
pub fn names_table(kind: &str, rows: &[(&str, String)]) -> String {
    rows.iter()
        .fold(TableBuilder::new().set_headers(vec![kind, "Notes"]), |t, (name, note)| {
            t.add_row(vec![name.to_string(), note.clone()])
        })
        .build()
}

/// One row per top-level cluster plus a row for unassigned vectors.
///
/// At most `sample` member names are listed per cluster.
pub fn cluster_summary_table(report: &ClusterReport, sample: usize) -> String {
    let mut builder = TableBuilder::new().set_headers(vec!["Cluster", "Size", "Members"]);
    for (i, cluster) in report.clusters.iter().enumerate() {
        let name = cluster
            .label
            .clone()
            .unwrap_or_else(|| format!("#{}", i + 1));
        builder = builder.add_row(vec![
            name,
            cluster.size.to_string(),
            member_sample(&cluster.all_members(), sample),
        ]);
    }
    if !report.unassigned.is_empty() {
        let names: Vec<&str> = report.unassigned.iter().map(String::as_str).collect();
        builder = builder.add_row(vec![
            "(unassigned)".to_string(),
            names.len().to_string(),
            member_sample(&names, sample),
        ]);
    }
    builder.align_right(1).build()
}

fn member_sample(names: &[&str], sample: usize) -> String {
    let mut shown: Vec<String> = names.iter().take(sample).map(|n| n.to_string()).collect();
    if names.len() > sample {
        shown.push(format!("… +{}", names.len() - sample));
    }
    shown.join(", ")
}
