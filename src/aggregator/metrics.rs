//! Per-category totals of grouped stacks.
//!
//! Totals are kept in first-seen order so that sorting by total is stable
//! for equal values.

use log::debug;
use std::collections::HashMap;

/// One output row: category and summed measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub category: String,
    pub total: f64,
}

impl ReportRow {
    /// `<category>;<total>` with two decimals
    pub fn to_line(&self) -> String {
        format!("{};{:.2}", self.category, self.total)
    }
}

/// Running sums keyed by category
#[derive(Debug, Clone, Default)]
pub struct CategoryTotals {
    index: HashMap<String, usize>,
    rows: Vec<ReportRow>,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a measurement to its category bucket
    pub fn add(&mut self, category: &str, measurement: f64) {
        match self.index.get(category) {
            Some(&i) => self.rows[i].total += measurement,
            None => {
                self.index.insert(category.to_string(), self.rows.len());
                self.rows.push(ReportRow {
                    category: category.to_string(),
                    total: measurement,
                });
            }
        }
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.index.get(category).map(|&i| self.rows[i].total)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum over every category
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().map(|r| r.total).sum()
    }

    /// Rows sorted by total, largest first
    pub fn sorted_rows(&self) -> Vec<ReportRow> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| b.total.total_cmp(&a.total));

        debug!("Sorted {} category rows", rows.len());
        rows
    }

    /// Rendered `name;total` lines, largest first
    pub fn to_lines(&self) -> Vec<String> {
        self.sorted_rows().iter().map(ReportRow::to_line).collect()
    }
}
