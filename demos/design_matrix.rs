//! # Building Design Matrices
//!
//! Walks through numeric terms, both contrast schemes, interactions and CSV
//! input.
//!
//! Run with: `RUST_LOG=debug cargo run --example design_matrix`

use design_matrix::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Design Matrix Construction ===\n");

    let df = DataFrame::from_columns([
        ("age", ColumnData::Integer(vec![25, 35, 45, 55])),
        (
            "gender",
            ColumnData::categorical(&["male", "female", "female", "male"]),
        ),
        ("income", ColumnData::Integer(vec![50000, 60000, 70000, 65000])),
        ("member", ColumnData::Boolean(vec![true, false, true, true])),
    ])?;

    treatment_coding(&df)?;
    sum_coding(&df)?;
    csv_input()?;

    Ok(())
}

fn treatment_coding(df: &DataFrame) -> Result<(), DesignError> {
    println!("--- Treatment (drop) coding with an interaction ---\n");

    let builder = DesignMatrixBuilder::builder()
        .interaction("age", "income")
        .build()?;
    let dm = builder.transform(df, &["age", "gender", "income", "member"])?;

    print_matrix(&dm);
    println!("Reference levels: {:?}", dm.reference_levels);
    println!("Skipped terms: {:?}\n", dm.skipped);
    Ok(())
}

fn sum_coding(df: &DataFrame) -> Result<(), DesignError> {
    println!("--- Sum coding without intercept ---\n");

    let dm = design_matrix(df, &["gender", "age"], false, None, "sum")?;

    print_matrix(&dm);
    println!("Group sizes: {:?}\n", dm.group_sizes());
    Ok(())
}

fn csv_input() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- CSV input ---\n");

    let csv = "dose,response,site\nlow,1.2,a\nhigh,3.4,b\nmedium,2.2,c\nlow,0.9,a\n";
    let df = read_csv(csv.as_bytes())?;

    let builder = DesignMatrixBuilder::builder()
        .contrast(Contrast::Sum)
        .build()?;
    let dm = builder.transform(&df, &["response", "dose", "site"])?;

    print_matrix(&dm);
    Ok(())
}

fn print_matrix(dm: &DesignMatrix) {
    println!("Formula: {}", dm.formula);
    println!("{}", dm.column_names.join("\t"));
    for i in 0..dm.nrows() {
        let row: Vec<String> = (0..dm.ncols())
            .map(|j| format!("{:.1}", dm.matrix[(i, j)]))
            .collect();
        println!("{}", row.join("\t"));
    }
    println!();
}
