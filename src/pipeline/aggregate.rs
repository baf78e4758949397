//! Grouping and summing of filtered records
//!
//! All groupings preserve first-appearance order so that ties sort stably.
//! Year-keyed groupings skip records carrying the unknown-year sentinel.

use std::collections::HashMap;

use crate::constants::sentinel::UNKNOWN_YEAR;
use crate::data::{Dataset, Field, Record};

/// Separator between joined group fields, e.g. `NSW - Metropolitan`
pub const KEY_SEPARATOR: &str = " - ";

/// Join the values of several category fields into one group label
pub fn group_key(dataset: &Dataset, record: &Record, fields: &[Field]) -> Option<String> {
    let parts: Option<Vec<_>> = fields.iter().map(|f| dataset.value(record, f)).collect();
    parts.map(|p| p.join(KEY_SEPARATOR))
}

/// Sum the metric per key, keys in first-appearance order
pub fn sum_by<F>(records: &[&Record], mut key: F) -> Vec<(String, f64)>
where
    F: FnMut(&Record) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();
    for record in records {
        let Some(k) = key(record) else { continue };
        match index.get(&k) {
            Some(&i) => groups[i].1 += record.metric,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, record.metric));
            }
        }
    }
    groups
}

/// Sum per category field value
pub fn sum_by_field(dataset: &Dataset, records: &[&Record], field: &Field) -> Vec<(String, f64)> {
    sum_by(records, |r| dataset.value(r, field).map(|v| v.into_owned()))
}

/// Stable descending sort by value; equal values keep their order
pub fn sort_descending(groups: &mut [(String, f64)]) {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Sum, sort descending and keep the first `n` groups
pub fn top_n(
    dataset: &Dataset,
    records: &[&Record],
    fields: &[Field],
    n: usize,
) -> Vec<(String, f64)> {
    profiling::scope!("aggregate::top_n");
    let mut groups = sum_by(records, |r| group_key(dataset, r, fields));
    sort_descending(&mut groups);
    groups.truncate(n);
    groups
}

/// One line of the line chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// (year, value), ascending by year
    pub points: Vec<(i32, f64)>,
}

/// Split records into per-category series. Points are kept raw, not summed.
pub fn line_series(dataset: &Dataset, records: &[&Record], field: &Field) -> Vec<Series> {
    profiling::scope!("aggregate::line_series");
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut series: Vec<Series> = Vec::new();
    for record in records.iter().filter(|r| r.year != UNKNOWN_YEAR) {
        let Some(name) = dataset.value(record, field) else { continue };
        let i = match index.get(name.as_ref()) {
            Some(&i) => i,
            None => {
                index.insert(name.to_string(), series.len());
                series.push(Series {
                    name: name.into_owned(),
                    points: Vec::new(),
                });
                series.len() - 1
            }
        };
        series[i].points.push((record.year, record.metric));
    }
    for s in &mut series {
        s.points.sort_by_key(|&(year, _)| year);
    }
    series
}

/// Summed metric per year, ascending
pub fn per_year(records: &[&Record]) -> Vec<(i32, f64)> {
    let mut years: Vec<(i32, f64)> = Vec::new();
    for record in records.iter().filter(|r| r.year != UNKNOWN_YEAR) {
        match years.iter_mut().find(|(y, _)| *y == record.year) {
            Some(entry) => entry.1 += record.metric,
            None => years.push((record.year, record.metric)),
        }
    }
    years.sort_by_key(|&(y, _)| y);
    years
}

/// Year × category matrix for the grouped bar chart
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YearMatrix {
    /// Ascending
    pub years: Vec<i32>,
    /// First-appearance order
    pub categories: Vec<String>,
    /// `values[year][category]`, missing cells are zero
    pub values: Vec<Vec<f64>>,
}

impl YearMatrix {
    pub fn build(dataset: &Dataset, records: &[&Record], field: &Field) -> Self {
        profiling::scope!("aggregate::year_matrix");
        let mut years: Vec<i32> = records
            .iter()
            .map(|r| r.year)
            .filter(|&y| y != UNKNOWN_YEAR)
            .collect();
        years.sort_unstable();
        years.dedup();

        let categories: Vec<String> = sum_by_field(dataset, records, field)
            .into_iter()
            .map(|(k, _)| k)
            .collect();

        let mut values = vec![vec![0.0; categories.len()]; years.len()];
        for record in records {
            let Ok(yi) = years.binary_search(&record.year) else { continue };
            let Some(name) = dataset.value(record, field) else { continue };
            if let Some(ci) = categories.iter().position(|c| c == name.as_ref()) {
                values[yi][ci] += record.metric;
            }
        }

        Self {
            years,
            categories,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty() || self.categories.is_empty()
    }

    pub fn totals(&self) -> Vec<f64> {
        self.values.iter().map(|row| row.iter().sum()).collect()
    }

    /// Larger of the biggest single cell and the biggest yearly total
    pub fn y_max(&self) -> f64 {
        let cell = self
            .values
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max);
        let total = self.totals().into_iter().fold(0.0, f64::max);
        cell.max(total)
    }
}
