//! Library-level end-to-end tests over real files.

use std::fs;
use std::path::PathBuf;

use prepost::catalog::Factor;
use prepost::compare::CompareError;
use prepost::compare_files;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn worked_example_from_the_scoring_policy() {
    // Respondent A answers yes to items 1 and 2 initially, no to both
    // finally. Item 1 is regular (proactivity), item 2 reverse-coded
    // (failure anxiety).
    let dir = TempDir::new().unwrap();
    let pre = write(&dir, "pre.csv", ",A\n1,はい\n2,はい\n");
    let post = write(&dir, "post.csv", ",A\n1,いいえ\n2,いいえ\n");

    let report = compare_files(&pre, &post, Some("A")).unwrap();

    let items = report.item_comparison.as_ref().unwrap();
    assert_eq!((items[0].id, items[0].pre, items[0].post), (1, 1, 0));
    assert_eq!((items[1].id, items[1].pre, items[1].post), (2, 0, 1));

    let factors = report.factor_comparison.as_ref().unwrap();
    assert_eq!(factors[0].factor, Factor::Proactivity);
    assert_eq!((factors[0].pre, factors[0].post, factors[0].delta), (1, 0, -1));
    assert_eq!(factors[1].factor, Factor::FailureAnxiety);
    assert_eq!((factors[1].pre, factors[1].post, factors[1].delta), (0, 1, 1));
}

#[test]
fn full_instrument_factor_totals() {
    // Respondent answering yes to everything: regular items score 1,
    // reverse-coded items 0.
    let dir = TempDir::new().unwrap();
    let all_yes: String = std::iter::once(",101".to_string())
        .chain((1..=16).map(|q| format!("{},はい", q)))
        .collect::<Vec<_>>()
        .join("\n");
    let all_no: String = std::iter::once(",101".to_string())
        .chain((1..=16).map(|q| format!("{},いいえ", q)))
        .collect::<Vec<_>>()
        .join("\n");
    let pre = write(&dir, "pre.csv", &all_yes);
    let post = write(&dir, "post.csv", &all_no);

    let report = compare_files(&pre, &post, Some("101")).unwrap();
    let factors = report.factor_comparison.as_ref().unwrap();

    // Proactivity: items 1, 6, 10, 13 regular; 5, 8, 15 reverse.
    assert_eq!((factors[0].pre, factors[0].post), (4, 3));
    // Failure anxiety: all five items reverse-coded.
    assert_eq!((factors[1].pre, factors[1].post), (0, 5));
    // Social standing: all four items regular.
    assert_eq!((factors[2].pre, factors[2].post), (4, 0));

    // Totals mirror the factor sums.
    let total = report
        .total_trend
        .iter()
        .find(|row| row.respondent == "101")
        .unwrap();
    assert_eq!(total.pre, Some(8));
    assert_eq!(total.post, Some(8));
    assert_eq!(total.delta, Some(0));
}

#[test]
fn respondent_alignment_is_sorted_and_total_trend_spans_the_union() {
    let dir = TempDir::new().unwrap();
    let pre = write(&dir, "pre.csv", ",20,10,30\n1,はい,はい,はい\n");
    let post = write(&dir, "post.csv", ",30,10,40\n1,いいえ,はい,はい\n");

    let report = compare_files(&pre, &post, None).unwrap();
    assert_eq!(report.respondents, vec!["10", "30"]);

    let ids: Vec<&str> = report
        .total_trend
        .iter()
        .map(|row| row.respondent.as_str())
        .collect();
    assert_eq!(ids.len(), 4);
    assert!(ids.contains(&"20"));
    assert!(ids.contains(&"40"));
}

#[test]
fn rerunning_the_same_files_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let pre = write(&dir, "pre.csv", ",101,102\n1,はい,\n2,いいえ,はい\n");
    let post = write(&dir, "post.csv", ",101,102\n1,いいえ,はい\n2,,はい\n");

    let first = compare_files(&pre, &post, Some("101")).unwrap();
    let second = compare_files(&pre, &post, Some("101")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn non_integer_index_in_either_upload_is_fatal() {
    let dir = TempDir::new().unwrap();
    let good = write(&dir, "good.csv", ",101\n1,はい\n");
    let bad = write(&dir, "bad.csv", ",101\nQ1,はい\n");

    let err = compare_files(&bad, &good, None).unwrap_err();
    assert!(err.to_string().contains("integer"));
    let err = compare_files(&good, &bad, None).unwrap_err();
    assert!(err.to_string().contains("integer"));
}

#[test]
fn disjoint_cohorts_surface_no_common_respondents() {
    let dir = TempDir::new().unwrap();
    let pre = write(&dir, "pre.csv", ",101\n1,はい\n");
    let post = write(&dir, "post.csv", ",202\n1,はい\n");

    let err = compare_files(&pre, &post, None).unwrap_err();
    assert_eq!(
        err.downcast_ref::<CompareError>(),
        Some(&CompareError::NoCommonRespondents)
    );
}
