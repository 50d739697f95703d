mod common;

use sales_pulse::{
    error::{DataError, DataErrorKind, PipelineError},
    pipeline,
};

use common::{load_csv, sales_csv};

fn clean_error(rows: &[&str]) -> DataError {
    match pipeline::validate_and_clean(&load_csv(&sales_csv(rows))) {
        Err(PipelineError::Data(err)) => err,
        other => panic!("expected data error, got {other:?}"),
    }
}

#[test]
fn one_bad_date_rejects_the_whole_upload() {
    let err = clean_error(&[
        "2024-03-01,Morning,Basic,Search,New,10,1,20",
        "N/A,Evening,Bundled,Social,New,10,1,20",
        "2024-03-03,Night,Basic,Search,New,10,1,20",
    ]);
    assert_eq!(err.kind(), DataErrorKind::InvalidDate);
    assert_eq!(err.rows(), &[3]);
    assert!(err.to_string().contains("some rows have invalid Date values"));
}

#[test]
fn empty_date_cell_is_invalid() {
    let err = clean_error(&[",Morning,Basic,Search,New,10,1,20"]);
    assert_eq!(err.kind(), DataErrorKind::InvalidDate);
    assert_eq!(err.rows(), &[2]);
}

#[test]
fn numeric_failures_name_the_offending_columns() {
    let err = clean_error(&[
        "2024-03-01,Morning,Basic,Search,New,ten,1,20",
        "2024-03-02,Morning,Basic,Search,New,10,1.5,20",
        "2024-03-03,Morning,Basic,Search,New,10,1,20",
    ]);
    match &err {
        DataError::InvalidNumeric { rows, columns } => {
            assert_eq!(rows, &vec![2, 3]);
            assert_eq!(columns, &vec!["Ad Spend ($)", "Conversions"]);
        }
        other => panic!("expected numeric error, got {other:?}"),
    }
}

#[test]
fn date_check_runs_before_numeric_check() {
    let err = clean_error(&["yesterday,Morning,Basic,Search,New,lots,1,20"]);
    assert_eq!(err.kind(), DataErrorKind::InvalidDate);
}

#[test]
fn long_failure_lists_are_truncated() {
    let rows = (0..15)
        .map(|_| "bad,Morning,Basic,Search,New,10,1,20")
        .collect::<Vec<_>>();
    let err = clean_error(&rows);
    assert_eq!(err.rows().len(), 15);
    assert!(err.to_string().contains("and 5 more"));
}

#[test]
fn mixed_date_formats_and_padded_numbers_clean() {
    let outcome = pipeline::validate_and_clean(&load_csv(&sales_csv(&[
        "03/01/2024,Morning,Basic,Search,New, 10.5 ,2,40",
        "2024/03/02,Evening,Bundled,Social,Returning,0,0,15",
        "2024-03-03 08:30:00,Night,Premium,Email,New,5,1,7.25",
    ])))
    .unwrap();
    let dates = outcome
        .dataset
        .iter()
        .map(|record| record.date().to_string())
        .collect::<Vec<_>>();
    assert_eq!(dates, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
    assert_eq!(outcome.dataset.records()[0].sale.ad_spend, 10.5);
}

#[test]
fn rows_below_blank_rows_keep_their_spreadsheet_numbers() {
    let err = clean_error(&[
        "2024-03-01,Morning,Basic,Search,New,10,1,20",
        ",,,,,,,",
        "N/A,Morning,Basic,Search,New,10,1,20",
    ]);
    assert_eq!(err.kind(), DataErrorKind::InvalidDate);
    assert_eq!(err.rows(), &[4]);
}

#[test]
fn empty_lines_count_toward_numeric_failure_rows() {
    let err = clean_error(&[
        "2024-03-01,Morning,Basic,Search,New,10,1,20",
        "",
        "",
        "2024-03-02,Morning,Basic,Search,New,10,many,20",
    ]);
    match &err {
        DataError::InvalidNumeric { rows, columns } => {
            assert_eq!(rows, &vec![5]);
            assert_eq!(columns, &vec!["Conversions"]);
        }
        other => panic!("expected numeric error, got {other:?}"),
    }
}
