//! Named datasets.
//!
//! A [`DatasetRegistry`] is a plain value: callers build one (usually with
//! [`DatasetRegistry::builtin`]), optionally register their own data and
//! pass it by reference to whatever needs to resolve names.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::UnknownDatasetError;
use crate::sample::{Sample, SampleError};

/// Named column of observations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    /// Lookup key.
    pub name: String,
    /// One-line provenance.
    pub description: String,
    /// Observations in source order.
    pub values: Vec<f64>,
}

impl Dataset {
    /// Dataset from its parts.
    pub fn new(name: impl Into<String>, description: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), description: description.into(), values }
    }
}

/// Name → dataset map.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: BTreeMap<String, Dataset>,
}

impl DatasetRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the fatigue-life data of Birnbaum & Saunders
    /// (1969): `fatigue-life` and `fatigue-life-31000psi`.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Dataset::new(
            "fatigue-life",
            "Cycles to failure (thousands) of 101 aluminium coupons at 21,000 psi; Birnbaum & Saunders (1969)",
            FATIGUE_LIFE_21000_PSI.to_vec(),
        ));
        registry.register(Dataset::new(
            "fatigue-life-31000psi",
            "Cycles to failure (thousands) of 101 aluminium coupons at 31,000 psi; Birnbaum & Saunders (1969)",
            FATIGUE_LIFE_31000_PSI.to_vec(),
        ));
        registry
    }

    /// Add `dataset`, replacing any dataset of the same name.
    pub fn register(&mut self, dataset: Dataset) -> Option<Dataset> {
        log::debug!("registering dataset `{}` ({} values)", dataset.name, dataset.values.len());
        self.datasets.insert(dataset.name.clone(), dataset)
    }

    /// Register column `column` of the CSV file at `path` under `name`.
    ///
    /// # Errors
    /// Reading or parsing the file fails, or the column is missing,
    /// empty or not finite.
    pub fn register_csv<P: AsRef<Path>>(&mut self, name: &str, path: P, column: &str) -> Result<(), SampleError> {
        let path = path.as_ref();
        let values = Sample::<f64>::read_column(path, column)?.into_iter().collect();
        self.register(Dataset::new(name, format!("column `{column}` of {}", path.display()), values));
        Ok(())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    /// Registered datasets, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.values()
    }

    /// Dataset called `name`.
    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Observations of `name` as a [`Sample`].
    ///
    /// # Errors
    /// [`UnknownDatasetError`] when nothing is registered under `name`.
    pub fn load(&self, name: &str) -> Result<Sample<f64>, UnknownDatasetError> {
        self.get(name)
            .map(|dataset| Sample::new(dataset.values.clone()))
            .ok_or_else(|| UnknownDatasetError { name: name.to_owned() })
    }
}

#[rustfmt::skip]
const FATIGUE_LIFE_21000_PSI: [f64; 101] = [
    370.0, 706.0, 716.0, 746.0, 785.0, 797.0, 844.0, 855.0, 858.0, 886.0,
    886.0, 930.0, 960.0, 988.0, 990.0, 1000.0, 1010.0, 1016.0, 1018.0, 1020.0,
    1055.0, 1085.0, 1102.0, 1102.0, 1108.0, 1115.0, 1120.0, 1134.0, 1140.0, 1199.0,
    1200.0, 1200.0, 1203.0, 1222.0, 1235.0, 1238.0, 1252.0, 1258.0, 1262.0, 1269.0,
    1270.0, 1290.0, 1293.0, 1300.0, 1310.0, 1313.0, 1315.0, 1330.0, 1355.0, 1390.0,
    1416.0, 1419.0, 1420.0, 1420.0, 1450.0, 1452.0, 1475.0, 1478.0, 1481.0, 1485.0,
    1502.0, 1505.0, 1513.0, 1522.0, 1522.0, 1530.0, 1540.0, 1560.0, 1567.0, 1578.0,
    1594.0, 1602.0, 1604.0, 1608.0, 1630.0, 1642.0, 1674.0, 1730.0, 1750.0, 1750.0,
    1763.0, 1768.0, 1781.0, 1782.0, 1792.0, 1820.0, 1868.0, 1881.0, 1890.0, 1893.0,
    1895.0, 1910.0, 1923.0, 1940.0, 1945.0, 2023.0, 2100.0, 2130.0, 2215.0, 2268.0,
    2440.0,
];

#[rustfmt::skip]
const FATIGUE_LIFE_31000_PSI: [f64; 101] = [
    70.0, 90.0, 96.0, 97.0, 99.0, 100.0, 103.0, 104.0, 104.0, 105.0,
    107.0, 108.0, 108.0, 108.0, 109.0, 109.0, 112.0, 112.0, 113.0, 114.0,
    114.0, 114.0, 116.0, 119.0, 120.0, 120.0, 120.0, 121.0, 121.0, 123.0,
    124.0, 124.0, 124.0, 124.0, 124.0, 128.0, 128.0, 129.0, 129.0, 130.0,
    130.0, 130.0, 131.0, 131.0, 131.0, 131.0, 131.0, 132.0, 132.0, 132.0,
    133.0, 134.0, 134.0, 134.0, 134.0, 134.0, 136.0, 136.0, 137.0, 138.0,
    138.0, 138.0, 139.0, 139.0, 141.0, 141.0, 142.0, 142.0, 142.0, 142.0,
    142.0, 142.0, 144.0, 144.0, 145.0, 146.0, 148.0, 148.0, 149.0, 151.0,
    151.0, 152.0, 155.0, 156.0, 157.0, 157.0, 157.0, 157.0, 158.0, 159.0,
    162.0, 163.0, 163.0, 164.0, 166.0, 166.0, 168.0, 170.0, 174.0, 196.0,
    212.0,
];
