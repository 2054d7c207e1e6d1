//! Design matrix builder tests.

mod common;

use approx::assert_relative_eq;
use common::{approx_eq_slice, mixed, people};
use design_matrix::core::{Contrast, TermKind};
use design_matrix::data::{read_csv, ColumnData, DataError, DataFrame};
use design_matrix::design::{design_matrix, DesignError, DesignMatrixBuilder};

// ============================================================================
// Numeric Terms
// ============================================================================

#[test]
fn test_numeric_only_with_intercept() {
    let df = people();
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["age", "income"])
        .expect("build should succeed");

    assert_eq!(dm.column_names, vec!["intercept", "age", "income"]);
    assert_eq!(dm.ncols(), 3);
    assert_eq!(dm.nrows(), 3);
    assert!(dm.has_intercept());

    assert_eq!(dm.column_values("intercept").unwrap(), vec![1.0, 1.0, 1.0]);
    assert_eq!(dm.column_values("age").unwrap(), vec![25.0, 35.0, 45.0]);
    assert_eq!(
        dm.column_values("income").unwrap(),
        vec![50000.0, 60000.0, 70000.0]
    );
}

#[test]
fn test_numeric_only_without_intercept() {
    let df = people();
    let dm = DesignMatrixBuilder::builder()
        .with_intercept(false)
        .build()
        .expect("options should be valid")
        .transform(&df, &["income", "age"])
        .expect("build should succeed");

    assert_eq!(dm.column_names, vec!["income", "age"]);
    assert!(!dm.has_intercept());
    assert!(dm.column_index("intercept").is_none());
}

#[test]
fn test_column_count_matches_terms() {
    let df = mixed(8);
    for terms in [vec!["x"], vec!["count", "x"], vec!["x", "count"]] {
        for intercept in [true, false] {
            let dm = DesignMatrixBuilder::builder()
                .with_intercept(intercept)
                .build()
                .expect("options should be valid")
                .transform(&df, &terms[..])
                .expect("build should succeed");
            assert_eq!(dm.ncols(), terms.len() + usize::from(intercept));
        }
    }
}

#[test]
fn test_repeated_term_kept_once() {
    let df = people();
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["age", "income", "age"])
        .expect("build should succeed");
    assert_eq!(dm.column_names, vec!["intercept", "age", "income"]);
}

// ============================================================================
// Categorical Terms
// ============================================================================

#[test]
fn test_categorical_drop_uses_smallest_level_as_reference() {
    let df = people();
    let dm = DesignMatrixBuilder::builder()
        .contrast(Contrast::Drop)
        .build()
        .expect("options should be valid")
        .transform(&df, &["gender"])
        .expect("build should succeed");

    // "female" < "male", so "female" is dropped even though row 0 is "male".
    assert_eq!(dm.column_names, vec!["intercept", "gender[male]"]);
    assert_eq!(dm.column_values("gender[male]").unwrap(), vec![1.0, 0.0, 0.0]);
    assert_eq!(
        dm.reference_levels.get("gender").map(String::as_str),
        Some("female")
    );
    assert_eq!(dm.formula, "1 + C(gender, Treatment('female'))");
}

#[test]
fn test_categorical_sum() {
    let df = people();
    let dm = DesignMatrixBuilder::builder()
        .contrast(Contrast::Sum)
        .build()
        .expect("options should be valid")
        .transform(&df, &["gender"])
        .expect("build should succeed");

    assert_eq!(dm.column_names, vec!["intercept", "gender[female]"]);
    assert_eq!(
        dm.column_values("gender[female]").unwrap(),
        vec![-1.0, 1.0, 1.0]
    );
    assert!(dm.reference_levels.is_empty());
    assert_eq!(dm.formula, "1 + C(gender, Sum)");
}

#[test]
fn test_text_column_drop_values() {
    let df = mixed(6);
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["region"])
        .expect("build should succeed");

    // levels: east, north, south; reference east
    assert_eq!(
        dm.column_names,
        vec!["intercept", "region[north]", "region[south]"]
    );
    assert!(approx_eq_slice(
        &dm.column_values("region[north]").unwrap(),
        &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        1e-12
    ));
    assert!(approx_eq_slice(
        &dm.column_values("region[south]").unwrap(),
        &[0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        1e-12
    ));
}

#[test]
fn test_text_column_sum_values() {
    let df = mixed(6);
    let dm = DesignMatrixBuilder::builder()
        .contrast(Contrast::Sum)
        .build()
        .expect("options should be valid")
        .transform(&df, &["region"])
        .expect("build should succeed");

    // levels: east, north, south; south omitted
    assert_eq!(
        dm.column_names,
        vec!["intercept", "region[east]", "region[north]"]
    );
    assert!(approx_eq_slice(
        &dm.column_values("region[east]").unwrap(),
        &[0.0, -1.0, 1.0, 0.0, -1.0, 1.0],
        1e-12
    ));
    assert!(approx_eq_slice(
        &dm.column_values("region[north]").unwrap(),
        &[1.0, -1.0, 0.0, 1.0, -1.0, 0.0],
        1e-12
    ));
}

#[test]
fn test_k_minus_one_columns_for_both_contrasts() {
    let labels = ["a", "b", "c", "d", "e", "f"];
    for k in 2..=labels.len() {
        let values: Vec<&str> = (0..20).map(|i| labels[i % k]).collect();
        let df = DataFrame::new()
            .with_column("g", ColumnData::text(&values[..]))
            .unwrap();

        for contrast in [Contrast::Drop, Contrast::Sum] {
            for intercept in [true, false] {
                let dm = DesignMatrixBuilder::builder()
                    .contrast(contrast)
                    .with_intercept(intercept)
                    .build()
                    .expect("options should be valid")
                    .transform(&df, &["g"])
                    .expect("build should succeed");

                let generated = dm.category_columns("g").unwrap();
                assert_eq!(generated.len(), k - 1, "k={k} contrast={contrast}");

                let mut unique: Vec<&String> = generated.iter().collect();
                unique.sort();
                unique.dedup();
                assert_eq!(unique.len(), k - 1);
                assert!(generated.iter().all(|c| c != "intercept"));
            }
        }
    }
}

#[test]
fn test_single_level_categorical_contributes_nothing() {
    let df = DataFrame::from_columns([
        ("g", ColumnData::text(&["only", "only"])),
        ("x", ColumnData::Float(vec![1.0, 2.0])),
    ])
    .unwrap();
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["g", "x"])
        .expect("build should succeed");
    assert_eq!(dm.column_names, vec!["intercept", "x"]);
    assert!(dm.category_columns("g").is_none());
}

#[test]
fn test_declared_level_order_drives_column_order() {
    let df = DataFrame::new()
        .with_column(
            "dose",
            ColumnData::categorical_with_levels(
                &["high", "low", "medium", "low"],
                &["low", "medium", "high"],
            )
            .unwrap(),
        )
        .unwrap();
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["dose"])
        .expect("build should succeed");

    // Reference is lexicographic ("high"); the rest follow declared order.
    assert_eq!(dm.reference_levels["dose"], "high");
    assert_eq!(
        dm.category_columns("dose").unwrap(),
        &["dose[low]".to_string(), "dose[medium]".to_string()]
    );
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_columns_follow_term_order() {
    let df = mixed(6);
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["region", "x", "count"])
        .expect("build should succeed");

    assert_eq!(
        dm.column_names,
        vec!["intercept", "region[north]", "region[south]", "x", "count"]
    );
    let kinds: Vec<TermKind> = dm.terms.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TermKind::Intercept,
            TermKind::Categorical,
            TermKind::Numeric,
            TermKind::Numeric
        ]
    );
    assert_eq!(dm.group_sizes(), vec![2, 1, 1]);
}

#[test]
fn test_categorical_block_is_contiguous_between_numerics() {
    let df = mixed(9);
    let dm = DesignMatrixBuilder::builder()
        .with_intercept(false)
        .contrast(Contrast::Sum)
        .build()
        .expect("options should be valid")
        .transform(&df, &["x", "region", "count"])
        .expect("build should succeed");

    assert_eq!(
        dm.column_names,
        vec!["x", "region[east]", "region[north]", "count"]
    );
    assert_eq!(dm.terms[1].columns, 1..3);
}

// ============================================================================
// Interactions
// ============================================================================

#[test]
fn test_interaction_appended_after_main_effects() {
    let df = people();
    let dm = DesignMatrixBuilder::builder()
        .interaction("age", "income")
        .build()
        .expect("options should be valid")
        .transform(&df, &["age", "income"])
        .expect("build should succeed");

    assert_eq!(dm.column_names, vec!["intercept", "age", "income", "age:income"]);
    let product = dm.column_values("age:income").unwrap();
    assert_relative_eq!(product[0], 1_250_000.0, epsilon = 1e-6);
    assert_relative_eq!(product[1], 2_100_000.0, epsilon = 1e-6);
    assert_relative_eq!(product[2], 3_150_000.0, epsilon = 1e-6);
}

#[test]
fn test_interactions_keep_request_order() {
    let df = mixed(5);
    let dm = DesignMatrixBuilder::builder()
        .interaction("count", "x")
        .interaction("x", "count")
        .build()
        .expect("options should be valid")
        .transform(&df, &["region", "x", "count"])
        .expect("build should succeed");

    // The reversed duplicate is collapsed into the first request.
    assert_eq!(dm.column_names.last().unwrap(), "count:x");
    assert_eq!(
        dm.column_names.iter().filter(|c| c.contains(':')).count(),
        1
    );
    let last = dm.terms.last().unwrap();
    assert_eq!(last.kind, TermKind::Interaction);
}

#[test]
fn test_interaction_with_term_not_requested() {
    let df = people();
    let dm = DesignMatrixBuilder::builder()
        .interaction("age", "income")
        .build()
        .expect("options should be valid")
        .transform(&df, &["age"])
        .expect("build should succeed");
    assert_eq!(dm.column_names, vec!["intercept", "age", "age:income"]);
}

// ============================================================================
// Unsupported Columns and Row Alignment
// ============================================================================

#[test]
fn test_unsupported_dtypes_are_skipped() {
    let df = mixed(4);
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["x", "active", "seen_at", "region"])
        .expect("build should succeed");

    assert_eq!(dm.skipped, vec!["active", "seen_at"]);
    assert_eq!(
        dm.column_names,
        vec!["intercept", "x", "region[north]", "region[south]"]
    );
}

#[test]
fn test_only_unsupported_terms_leaves_intercept() {
    let df = mixed(4);
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["active"])
        .expect("build should succeed");
    assert_eq!(dm.column_names, vec!["intercept"]);
    assert_eq!(dm.nrows(), 4);
}

#[test]
fn test_rows_are_never_dropped() {
    let df = DataFrame::from_columns([
        ("x", ColumnData::Float(vec![1.0, f64::NAN, 3.0])),
        ("g", ColumnData::text(&["a", "b", "a"])),
    ])
    .unwrap();
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["x", "g"])
        .expect("build should succeed");

    assert_eq!(dm.nrows(), 3);
    let x = dm.column_values("x").unwrap();
    assert!(x[1].is_nan());
    assert_eq!(dm.column_values("g[b]").unwrap(), vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_input_is_not_mutated() {
    let df = people();
    let before = df.clone();
    let _ = DesignMatrixBuilder::builder()
        .contrast(Contrast::Sum)
        .interaction("age", "income")
        .build()
        .expect("options should be valid")
        .transform(&df, &["gender", "age", "income"])
        .expect("build should succeed");
    assert_eq!(df, before);
}

#[test]
fn test_csv_blank_category_never_becomes_reference() {
    let result = read_csv("g,x\nb,1\n,2\nc,3\nb,4\n".as_bytes());
    assert!(matches!(
        result,
        Err(DataError::MissingValue { ref column, row: 1 }) if column == "g"
    ));

    let df = read_csv("g,x\nb,1\nd,2\nc,3\nb,4\n".as_bytes()).expect("csv should load");
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["g", "x"])
        .expect("build should succeed");
    assert_eq!(dm.reference_levels.get("g").map(String::as_str), Some("b"));
    assert_eq!(dm.column_names, vec!["intercept", "g[c]", "g[d]", "x"]);
}

#[test]
fn test_csv_blank_numeric_cell_keeps_row() {
    let df = read_csv("g,x\nb,1\nc,\nb,4\n".as_bytes()).expect("csv should load");
    let dm = DesignMatrixBuilder::default()
        .transform(&df, &["x", "g"])
        .expect("build should succeed");
    assert_eq!(dm.nrows(), 3);
    assert!(dm.column_values("x").unwrap()[1].is_nan());
}

#[test]
fn test_column_named_intercept_clashes_with_intercept() {
    let df = DataFrame::new()
        .with_column("intercept", ColumnData::Float(vec![2.0, 3.0]))
        .unwrap()
        .with_column("x", ColumnData::Float(vec![1.0, 4.0]))
        .unwrap();

    let result = DesignMatrixBuilder::default().transform(&df, &["intercept", "x"]);
    assert!(matches!(result, Err(DesignError::InterceptNameClash)));

    let dm = DesignMatrixBuilder::builder()
        .with_intercept(false)
        .build()
        .expect("options should be valid")
        .transform(&df, &["intercept", "x"])
        .expect("build should succeed");
    assert_eq!(dm.column_names, vec!["intercept", "x"]);
    assert_eq!(dm.column_values("intercept").unwrap(), vec![2.0, 3.0]);
}

// ============================================================================
// One-call Function
// ============================================================================

#[test]
fn test_design_matrix_function() {
    let df = people();
    let dm = design_matrix(&df, &["age", "gender"], false, Some(&[("age", "income")][..]), "sum")
        .expect("build should succeed");

    assert_eq!(dm.contrast, Contrast::Sum);
    assert_eq!(dm.column_names, vec!["age", "gender[female]", "age:income"]);
}

#[test]
fn test_design_matrix_function_defaults() {
    let df = people();
    let dm = design_matrix(&df, &["gender", "age"], true, None, "drop")
        .expect("build should succeed");
    assert_eq!(dm.column_names, vec!["intercept", "gender[male]", "age"]);
}
