use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::record::{Dataset, Record, Schema};
use crate::constants::sentinel::UNKNOWN_YEAR;
use crate::error::{DashError, Result};

/// Where a dataset comes from and how its columns map onto [`Record`] fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Dataset name charts and filters refer to
    pub name: String,
    /// CSV file, relative paths resolve against the data directory
    pub file: PathBuf,
    #[serde(flatten)]
    pub schema: Schema,
}

impl SourceSpec {
    /// Absolute or data-directory-relative location of the file
    pub fn resolve(&self, base_dir: &Path) -> PathBuf {
        if self.file.is_absolute() {
            self.file.clone()
        } else {
            base_dir.join(&self.file)
        }
    }

    fn display_name(&self) -> String {
        self.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Load one CSV source into a typed dataset.
///
/// Every column is read as text first so a stray value never fails the whole
/// file; the year and metric columns are then coerced, with unparseable cells
/// replaced by sentinels (year `0`, metric `0.0`).
pub fn read_csv(spec: &SourceSpec, base_dir: &Path) -> Result<Dataset> {
    profiling::scope!("read_csv");

    let path = spec.resolve(base_dir);
    if !path.is_file() {
        return Err(DashError::FileIo(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let df = LazyCsvReader::new(&path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    let height = df.height();
    let source = spec.display_name();
    let mut zeroed = 0usize;

    let years: Vec<i32> = match &spec.schema.year_column {
        Some(column) => numeric_column(&df, column, &source)?
            .into_iter()
            .map(|v| {
                let year = coerce_year(v);
                if year == UNKNOWN_YEAR {
                    zeroed += 1;
                }
                year
            })
            .collect(),
        None => vec![UNKNOWN_YEAR; height],
    };

    let metrics: Vec<f64> = numeric_column(&df, &spec.schema.metric, &source)?
        .into_iter()
        .map(|v| {
            let metric = coerce_metric(v);
            if metric == 0.0 && v != 0.0 {
                zeroed += 1;
            }
            metric
        })
        .collect();

    let categories: Vec<Vec<String>> = spec
        .schema
        .categories
        .iter()
        .map(|c| text_column(&df, &c.column, &source))
        .collect::<Result<_>>()?;

    let records: Vec<Record> = (0..height)
        .map(|row| Record {
            year: years[row],
            categories: categories.iter().map(|col| col[row].clone()).collect(),
            metric: metrics[row],
        })
        .collect();

    if zeroed > 0 {
        tracing::warn!(
            source = %source,
            cells = zeroed,
            rows = height,
            "malformed numeric cells replaced with sentinels"
        );
    }
    tracing::debug!(dataset = %spec.name, rows = height, "parsed source");

    Ok(Dataset::new(spec.name.clone(), spec.schema.clone(), records))
}

/// Years must be 4-digit integers
pub fn coerce_year(value: f64) -> i32 {
    if value.is_finite() && value.fract() == 0.0 && (1000.0..=9999.0).contains(&value) {
        value as i32
    } else {
        UNKNOWN_YEAR
    }
}

/// Metrics are non-negative counts or amounts
pub fn coerce_metric(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}

fn column_series(df: &DataFrame, column: &str, source: &str) -> Result<Series> {
    df.column(column)
        .map(|c| c.as_materialized_series().clone())
        .map_err(|_| DashError::ColumnNotFound {
            source_name: source.to_string(),
            column: column.to_string(),
        })
}

/// Non-strict cast: cells polars cannot parse come back as null, mapped to NaN
fn numeric_column(df: &DataFrame, column: &str, source: &str) -> Result<Vec<f64>> {
    let series = column_series(df, column, source)?;
    let trimmed = match series.str() {
        Ok(ca) => ca
            .into_iter()
            .map(|opt| opt.map(str::trim))
            .collect::<StringChunked>()
            .into_series(),
        Err(_) => series,
    };
    let floats = trimmed.cast(&DataType::Float64)?;
    Ok(floats
        .f64()?
        .into_iter()
        .map(|opt| opt.unwrap_or(f64::NAN))
        .collect())
}

fn text_column(df: &DataFrame, column: &str, source: &str) -> Result<Vec<String>> {
    let series = column_series(df, column, source)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|opt| opt.unwrap_or("").trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::CategoryColumn;
    use std::io::Write;
    use tempfile::Builder;

    fn spec_for(path: &Path) -> SourceSpec {
        SourceSpec {
            name: "detection".into(),
            file: path.to_path_buf(),
            schema: Schema {
                year_column: Some("YEAR".into()),
                categories: vec![CategoryColumn {
                    field: "method".into(),
                    column: "DETECTION_METHOD".into(),
                }],
                metric: "Count*(OffenceNo)".into(),
            },
        }
    }

    #[test]
    fn test_csv_loading() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "YEAR,DETECTION_METHOD,Count*(OffenceNo)").unwrap();
        writeln!(file, "2019,Radar,100").unwrap();
        writeln!(file, "2020,Radar,150").unwrap();
        writeln!(file, "2019,Camera,50").unwrap();
        file.flush().unwrap();

        let ds = read_csv(&spec_for(file.path()), Path::new(".")).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[1].year, 2020);
        assert_eq!(ds.records()[1].categories, vec!["Radar"]);
        assert_eq!(ds.records()[2].metric, 50.0);
    }

    #[test]
    fn test_malformed_cells_become_sentinels() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "YEAR,DETECTION_METHOD,Count*(OffenceNo)").unwrap();
        writeln!(file, "abc,Radar,12").unwrap();
        writeln!(file, "2020,Camera,n/a").unwrap();
        writeln!(file, "2021,Police,-4").unwrap();
        writeln!(file, "2022,Mobile,").unwrap();
        file.flush().unwrap();

        let ds = read_csv(&spec_for(file.path()), Path::new(".")).unwrap();
        let years: Vec<i32> = ds.records().iter().map(|r| r.year).collect();
        let metrics: Vec<f64> = ds.records().iter().map(|r| r.metric).collect();

        assert_eq!(years, vec![0, 2020, 2021, 2022]);
        assert_eq!(metrics, vec![12.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "YEAR,METHOD,Count*(OffenceNo)").unwrap();
        writeln!(file, "2019,Radar,100").unwrap();
        file.flush().unwrap();

        let err = read_csv(&spec_for(file.path()), Path::new(".")).unwrap_err();
        assert!(matches!(err, DashError::ColumnNotFound { ref column, .. } if column == "DETECTION_METHOD"));
    }

    #[test]
    fn test_source_without_year_column() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "DETECTION_METHOD,Count*(OffenceNo)").unwrap();
        writeln!(file, "Radar,7").unwrap();
        file.flush().unwrap();

        let mut spec = spec_for(file.path());
        spec.schema.year_column = None;
        let ds = read_csv(&spec, Path::new(".")).unwrap();
        assert_eq!(ds.records()[0].year, UNKNOWN_YEAR);
        assert_eq!(ds.records()[0].metric, 7.0);
    }

    #[test]
    fn test_missing_file() {
        let spec = spec_for(Path::new("definitely_missing.csv"));
        let dir = tempfile::tempdir().unwrap();
        let err = read_csv(&spec, dir.path()).unwrap_err();
        assert!(matches!(err, DashError::FileIo(_)));
    }

    #[test]
    fn test_year_coercion() {
        assert_eq!(coerce_year(2019.0), 2019);
        assert_eq!(coerce_year(2019.5), UNKNOWN_YEAR);
        assert_eq!(coerce_year(19.0), UNKNOWN_YEAR);
        assert_eq!(coerce_year(f64::NAN), UNKNOWN_YEAR);
    }
}
