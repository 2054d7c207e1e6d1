//! Common test utilities and datasets.

#![allow(dead_code)]

use design_matrix::data::{ColumnData, DataFrame};

/// The three-row people dataset: numeric `age` and `income`, categorical `gender`.
pub fn people() -> DataFrame {
    DataFrame::from_columns([
        ("age", ColumnData::Integer(vec![25, 35, 45])),
        ("gender", ColumnData::categorical(&["male", "female", "female"])),
        ("income", ColumnData::Integer(vec![50000, 60000, 70000])),
    ])
    .expect("valid frame")
}

/// Mixed-type dataset with a three-level text column and unsupported dtypes.
pub fn mixed(n_samples: usize) -> DataFrame {
    let regions = ["north", "south", "east"];
    DataFrame::from_columns([
        (
            "x",
            ColumnData::Float((0..n_samples).map(|i| i as f64 * 0.5).collect()),
        ),
        (
            "count",
            ColumnData::Integer((0..n_samples).map(|i| (i % 4) as i64).collect()),
        ),
        (
            "region",
            ColumnData::Text(
                (0..n_samples)
                    .map(|i| regions[i % regions.len()].to_string())
                    .collect(),
            ),
        ),
        (
            "active",
            ColumnData::Boolean((0..n_samples).map(|i| i % 2 == 0).collect()),
        ),
        (
            "seen_at",
            ColumnData::Datetime((0..n_samples).map(|i| 1_700_000_000 + i as i64).collect()),
        ),
    ])
    .expect("valid frame")
}

/// Approximate equality check for floating point slices.
pub fn approx_eq_slice(a: &[f64], b: &[f64], epsilon: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < epsilon)
}
