//! In-memory datasets shared by unit tests, shaped like the built-in sources

use crate::config::DashboardConfig;
use crate::data::{DataReady, DataStore, Dataset, Record};

/// Category cells of a row are joined with `|`
fn dataset(name: &str, rows: &[(i32, &str, f64)]) -> Dataset {
    let config = DashboardConfig::builtin().unwrap();
    let schema = config.source(name).unwrap().schema.clone();
    let records = rows
        .iter()
        .map(|&(year, cats, metric)| Record {
            year,
            categories: cats
                .split('|')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            metric,
        })
        .collect();
    Dataset::new(name, schema, records)
}

pub fn detection() -> Dataset {
    dataset(
        "detection",
        &[
            (2020, "Radar", 150.0),
            (2019, "Radar", 100.0),
            (2019, "Camera", 50.0),
        ],
    )
}

/// Store holding only the detection dataset
pub fn store() -> DataStore {
    DataStore::from_datasets(vec![detection()])
}

/// Store holding every built-in dataset
pub fn full_store() -> DataStore {
    ready_store().0
}

/// [`full_store`] with its data-ready token
pub fn ready_store() -> (DataStore, DataReady) {
    DataStore::loaded_from(vec![
        detection(),
        dataset(
            "fines",
            &[
                (2018, "", 300.0),
                (2019, "", 310.0),
                (2020, "", 330.0),
                (2021, "", 350.0),
            ],
        ),
        dataset(
            "age",
            &[
                (2020, "17-25", 6_000_000.0),
                (2020, "26-39", 3_000_000.0),
                (2021, "17-25", 1_000_000.0),
                (2021, "65 and over", 200_000.0),
            ],
        ),
        dataset(
            "jurisdiction",
            &[
                (2020, "NSW|Metropolitan", 5.0),
                (2020, "VIC|Metropolitan", 10.0),
                (2021, "NSW|Metropolitan", 3.0),
                (2021, "QLD|Regional", 0.0),
            ],
        ),
        dataset(
            "methods",
            &[
                (0, "Camera", 500.0),
                (0, "Police", 300.0),
                (0, "Radar", 200.0),
            ],
        ),
    ])
}
