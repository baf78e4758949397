//! Typed rows and datasets

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::constants::sentinel::UNKNOWN_YEAR;

/// A column a filter or aggregation can address.
///
/// Serialized as a plain string: `"year"` is the year column, anything else
/// names a category column declared in the source schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Field {
    Year,
    Category(String),
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        if s.eq_ignore_ascii_case("year") {
            Field::Year
        } else {
            Field::Category(s)
        }
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::from(s.to_string())
    }
}

impl From<Field> for String {
    fn from(f: Field) -> Self {
        match f {
            Field::Year => "year".to_string(),
            Field::Category(name) => name,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Year => write!(f, "year"),
            Field::Category(name) => write!(f, "{}", name),
        }
    }
}

/// One category column: the field name used in configuration and the CSV header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryColumn {
    pub field: String,
    pub column: String,
}

/// Column layout of one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Header of the year column; sources without one get the unknown-year sentinel
    #[serde(default)]
    pub year_column: Option<String>,
    /// Category columns, in record order
    #[serde(default)]
    pub categories: Vec<CategoryColumn>,
    /// Header of the numeric metric column
    pub metric: String,
}

impl Schema {
    /// Position of a category field within [`Record::categories`]
    pub fn category_index(&self, field: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.field == field)
    }

    /// Whether records of this schema carry the given field
    pub fn has_field(&self, field: &Field) -> bool {
        match field {
            Field::Year => self.year_column.is_some(),
            Field::Category(name) => self.category_index(name).is_some(),
        }
    }
}

/// One parsed data row
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub year: i32,
    pub categories: Vec<String>,
    pub metric: f64,
}

/// Named, immutable collection of records sharing a schema
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    schema: Schema,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, schema: Schema, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            schema,
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Read a field of a record as text, the form filter selections are compared in
    pub fn value<'r>(&self, record: &'r Record, field: &Field) -> Option<Cow<'r, str>> {
        match field {
            Field::Year => Some(Cow::Owned(record.year.to_string())),
            Field::Category(name) => {
                let idx = self.schema.category_index(name)?;
                record.categories.get(idx).map(|s| Cow::Borrowed(s.as_str()))
            }
        }
    }

    /// Sorted distinct values of a field. Years sort numerically, categories lexically.
    /// Unparseable years are not offered.
    pub fn unique_values(&self, field: &Field) -> Vec<String> {
        match field {
            Field::Year => {
                let mut years: Vec<i32> = self
                    .records
                    .iter()
                    .map(|r| r.year)
                    .filter(|&y| y != UNKNOWN_YEAR)
                    .collect();
                years.sort_unstable();
                years.dedup();
                years.into_iter().map(|y| y.to_string()).collect()
            }
            Field::Category(_) => {
                let mut values: Vec<String> = self
                    .records
                    .iter()
                    .filter_map(|r| self.value(r, field).map(Cow::into_owned))
                    .collect();
                values.sort();
                values.dedup();
                values
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection() -> Dataset {
        let schema = Schema {
            year_column: Some("YEAR".into()),
            categories: vec![CategoryColumn {
                field: "method".into(),
                column: "DETECTION_METHOD".into(),
            }],
            metric: "COUNT".into(),
        };
        let rows = [(2020, "Radar", 150.0), (2019, "Radar", 100.0), (2019, "Camera", 50.0)];
        let records = rows
            .iter()
            .map(|&(year, method, metric)| Record {
                year,
                categories: vec![method.to_string()],
                metric,
            })
            .collect();
        Dataset::new("detection", schema, records)
    }

    #[test]
    fn test_field_from_string() {
        assert_eq!(Field::from("year"), Field::Year);
        assert_eq!(Field::from("YEAR"), Field::Year);
        assert_eq!(Field::from("method"), Field::Category("method".into()));
        assert_eq!(String::from(Field::Year), "year");
    }

    #[test]
    fn test_unique_values_sorted() {
        let ds = detection();
        assert_eq!(ds.unique_values(&Field::Year), vec!["2019", "2020"]);
        assert_eq!(ds.unique_values(&"method".into()), vec!["Camera", "Radar"]);
    }

    #[test]
    fn test_years_sort_numerically() {
        let schema = Schema {
            year_column: Some("YEAR".into()),
            categories: vec![],
            metric: "M".into(),
        };
        let records = [2010, 999, 1998]
            .iter()
            .map(|&year| Record { year, categories: vec![], metric: 1.0 })
            .collect();
        let ds = Dataset::new("x", schema, records);
        assert_eq!(ds.unique_values(&Field::Year), vec!["999", "1998", "2010"]);
    }

    #[test]
    fn test_unknown_year_not_offered() {
        let schema = Schema {
            year_column: Some("YEAR".into()),
            categories: vec![],
            metric: "M".into(),
        };
        let records = [UNKNOWN_YEAR, 2021, UNKNOWN_YEAR, 2019]
            .iter()
            .map(|&year| Record { year, categories: vec![], metric: 1.0 })
            .collect();
        let ds = Dataset::new("x", schema, records);
        assert_eq!(ds.unique_values(&Field::Year), vec!["2019", "2021"]);
    }

    #[test]
    fn test_unknown_field_has_no_value() {
        let ds = detection();
        let record = &ds.records()[0];
        assert!(ds.value(record, &"location".into()).is_none());
        assert_eq!(ds.value(record, &Field::Year).as_deref(), Some("2020"));
    }
}
