//! Record filtering

use std::collections::BTreeSet;

use crate::data::{Dataset, Field, Record};

/// Restriction one filter places on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// No restriction
    Any,
    /// Keep nothing
    Nothing,
    /// Field value must be one of the set
    OneOf(BTreeSet<String>),
    /// Year at or after
    YearFrom(i32),
    /// Year at or before
    YearUntil(i32),
}

impl Constraint {
    fn admits(&self, dataset: &Dataset, record: &Record, field: &Field) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Nothing => false,
            Constraint::OneOf(values) => dataset
                .value(record, field)
                .is_some_and(|v| values.contains(v.as_ref())),
            Constraint::YearFrom(start) => record.year >= *start,
            Constraint::YearUntil(end) => record.year <= *end,
        }
    }
}

/// Records of `dataset` that pass every constraint, in file order
pub fn apply<'d>(dataset: &'d Dataset, constraints: &[(Field, Constraint)]) -> Vec<&'d Record> {
    profiling::scope!("filter::apply");

    let active: Vec<&(Field, Constraint)> = constraints
        .iter()
        .filter(|(_, c)| *c != Constraint::Any)
        .collect();

    dataset
        .records()
        .iter()
        .filter(|r| active.iter().all(|(field, c)| c.admits(dataset, r, field)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CategoryColumn, Schema};

    fn detection() -> Dataset {
        let schema = Schema {
            year_column: Some("YEAR".into()),
            categories: vec![CategoryColumn {
                field: "method".into(),
                column: "DETECTION_METHOD".into(),
            }],
            metric: "COUNT".into(),
        };
        let rows = [
            (2018, "Camera", 40.0),
            (2019, "Radar", 100.0),
            (2020, "Radar", 150.0),
            (2019, "Camera", 50.0),
        ];
        let records = rows
            .iter()
            .map(|&(year, m, metric)| Record {
                year,
                categories: vec![m.to_string()],
                metric,
            })
            .collect();
        Dataset::new("detection", schema, records)
    }

    fn one_of(values: &[&str]) -> Constraint {
        Constraint::OneOf(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_no_constraints_keep_everything() {
        let ds = detection();
        assert_eq!(apply(&ds, &[]).len(), 4);
        assert_eq!(apply(&ds, &[(Field::Year, Constraint::Any)]).len(), 4);
    }

    #[test]
    fn test_single_value_keeps_exact_matches() {
        let ds = detection();
        let kept = apply(&ds, &[(Field::Year, one_of(&["2019"]))]);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.year == 2019));
    }

    #[test]
    fn test_constraints_intersect() {
        let ds = detection();
        let kept = apply(
            &ds,
            &[
                (Field::Year, one_of(&["2019", "2020"])),
                ("method".into(), one_of(&["Radar"])),
            ],
        );
        let years: Vec<i32> = kept.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2019, 2020]);
    }

    #[test]
    fn test_year_range() {
        let ds = detection();
        let kept = apply(
            &ds,
            &[(Field::Year, Constraint::YearFrom(2019)), (Field::Year, Constraint::YearUntil(2019))],
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_nothing_and_unknown_field() {
        let ds = detection();
        assert!(apply(&ds, &[(Field::Year, Constraint::Nothing)]).is_empty());
        assert!(apply(&ds, &[("location".into(), one_of(&["x"]))]).is_empty());
    }
}
