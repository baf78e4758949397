//! In-memory store of every parsed dataset

use std::collections::BTreeMap;
use std::path::Path;

use super::record::{Dataset, Field, Record};
use super::source::{read_csv, SourceSpec};
use crate::error::{DashError, Result};

/// Proof that the store finished loading.
///
/// Only [`DataStore::load`] can create one, and a store loads at most once,
/// so each store yields exactly one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataReady {
    pub datasets: usize,
    pub rows: usize,
    _sealed: (),
}

/// Owns every dataset; read-only once loaded
#[derive(Debug, Default)]
pub struct DataStore {
    datasets: BTreeMap<String, Dataset>,
    loaded: bool,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every source. Either all datasets become visible or none do.
    pub fn load(&mut self, sources: &[SourceSpec], base_dir: &Path) -> Result<DataReady> {
        profiling::scope!("DataStore::load");

        if self.loaded {
            return Err(DashError::AlreadyLoaded);
        }

        let mut parsed = BTreeMap::new();
        for spec in sources {
            let dataset = read_csv(spec, base_dir).inspect_err(|e| {
                tracing::error!(dataset = %spec.name, error = %e, "failed to load source");
            })?;
            parsed.insert(spec.name.clone(), dataset);
        }

        self.install(parsed)
    }

    fn install(&mut self, datasets: BTreeMap<String, Dataset>) -> Result<DataReady> {
        let rows = datasets.values().map(Dataset::len).sum();
        let ready = DataReady {
            datasets: datasets.len(),
            rows,
            _sealed: (),
        };
        self.datasets = datasets;
        self.loaded = true;
        tracing::info!(datasets = ready.datasets, rows = ready.rows, "data ready");
        Ok(ready)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn dataset(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Records of a dataset, in file order
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn records(&self, name: &str) -> Result<&[Record]> {
        self.dataset(name)
            .map(Dataset::records)
            .ok_or_else(|| DashError::UnknownDataset(name.to_string()))
    }

    /// Sorted distinct values of one field, for populating filter options
    pub fn unique_values(&self, name: &str, field: &Field) -> Result<Vec<String>> {
        self.dataset(name)
            .map(|ds| ds.unique_values(field))
            .ok_or_else(|| DashError::UnknownDataset(name.to_string()))
    }

    /// Build a loaded store from in-memory datasets
    #[cfg(test)]
    pub(crate) fn from_datasets(datasets: Vec<Dataset>) -> Self {
        Self::loaded_from(datasets).0
    }

    /// Like [`DataStore::from_datasets`], keeping the ready token
    #[cfg(test)]
    pub(crate) fn loaded_from(datasets: Vec<Dataset>) -> (Self, DataReady) {
        let mut store = Self::new();
        let map = datasets
            .into_iter()
            .map(|d| (d.name().to_string(), d))
            .collect();
        let ready = store.install(map).expect("fresh store");
        (store, ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::{CategoryColumn, Schema};
    use std::io::Write;

    fn write_csv(dir: &Path, name: &str, body: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(body.as_bytes()).unwrap();
    }

    fn sources() -> Vec<SourceSpec> {
        vec![
            SourceSpec {
                name: "age".into(),
                file: "age.csv".into(),
                schema: Schema {
                    year_column: Some("YEAR".into()),
                    categories: vec![CategoryColumn {
                        field: "age_group".into(),
                        column: "AGE_GROUP".into(),
                    }],
                    metric: "Sum(FINES)".into(),
                },
            },
            SourceSpec {
                name: "fines".into(),
                file: "fines.csv".into(),
                schema: Schema {
                    year_column: Some("YEAR".into()),
                    categories: vec![],
                    metric: "Mean(FINES)".into(),
                },
            },
        ]
    }

    #[test]
    fn test_load_all_sources() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "age.csv", "YEAR,AGE_GROUP,Sum(FINES)\n2021,17-25,300\n2020,26-39,200\n2020,17-25,100\n");
        write_csv(dir.path(), "fines.csv", "YEAR,Mean(FINES)\n2020,310.5\n");

        let mut store = DataStore::new();
        assert!(!store.is_loaded());

        let ready = store.load(&sources(), dir.path()).unwrap();
        assert!(store.is_loaded());
        assert_eq!(ready.datasets, 2);
        assert_eq!(ready.rows, 4);
        assert_eq!(store.records("age").unwrap().len(), 3);
        assert_eq!(
            store.unique_values("age", &"age_group".into()).unwrap(),
            vec!["17-25", "26-39"]
        );
        assert_eq!(store.unique_values("age", &Field::Year).unwrap(), vec!["2020", "2021"]);
    }

    #[test]
    fn test_failed_load_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "age.csv", "YEAR,AGE_GROUP,Sum(FINES)\n2021,17-25,300\n");
        // fines.csv is missing

        let mut store = DataStore::new();
        assert!(store.load(&sources(), dir.path()).is_err());
        assert!(!store.is_loaded());
        assert!(store.dataset("age").is_none());
    }

    #[test]
    fn test_data_ready_only_once() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "age.csv", "YEAR,AGE_GROUP,Sum(FINES)\n2021,17-25,300\n");
        write_csv(dir.path(), "fines.csv", "YEAR,Mean(FINES)\n2020,310.5\n");

        let mut store = DataStore::new();
        store.load(&sources(), dir.path()).unwrap();
        let again = store.load(&sources(), dir.path());
        assert!(matches!(again, Err(DashError::AlreadyLoaded)));
    }

    #[test]
    fn test_unknown_dataset() {
        let store = DataStore::from_datasets(vec![]);
        assert!(matches!(store.records("nope"), Err(DashError::UnknownDataset(_))));
    }
}
