//! Tests for record linkage.

mod common;

use std::collections::HashSet;

use ed_ingest::SourceTables;
use ed_model::{AdmissionLink, CohortColumns};
use ed_transform::{TransformError, link_visits, validate_sources};
use polars::prelude::{NamedFrom, Series};

use common::{i64_column, scenario_sources, str_column};

#[test]
fn first_listed_keeps_one_row_per_stay() {
    let linked = link_visits(&scenario_sources(), AdmissionLink::FirstListed).unwrap();

    let stays: Vec<i64> = i64_column(&linked.frame, "stay_id")
        .into_iter()
        .flatten()
        .collect();
    let unique: HashSet<i64> = stays.iter().copied().collect();
    assert_eq!(stays.len(), unique.len());
    assert_eq!(stays, vec![10, 20, 21, 11, 12]);
}

#[test]
fn first_listed_report_counts_fan_out() {
    let report = link_visits(&scenario_sources(), AdmissionLink::FirstListed)
        .unwrap()
        .report;

    assert_eq!(report.ed_stays, 7);
    assert_eq!(report.after_triage, 7);
    // subject 2 has two admissions, subject 3 none
    assert_eq!(report.after_admissions, 8);
    assert_eq!(report.after_patients, 7);
    assert_eq!(report.duplicates_removed, 2);
    assert_eq!(report.visits, 5);
    assert!(report.fanned_out());
}

#[test]
fn first_listed_admission_wins_after_fan_out() {
    let linked = link_visits(&scenario_sources(), AdmissionLink::FirstListed).unwrap();
    let admission_types = str_column(&linked.frame, "admission_type");
    // rows 1 and 2 are stays 20 and 21
    assert_eq!(admission_types[1].as_deref(), Some("EU OBSERVATION"));
    assert_eq!(admission_types[2].as_deref(), Some("EU OBSERVATION"));
}

#[test]
fn ed_stay_hadm_id_is_authoritative() {
    let linked = link_visits(&scenario_sources(), AdmissionLink::FirstListed).unwrap();
    assert_eq!(
        i64_column(&linked.frame, "hadm_id"),
        vec![None, Some(600), Some(601), Some(500), None]
    );
    assert!(linked.frame.column("dod").is_err());
    assert!(linked.frame.column("_admission_ordinal").is_err());
}

#[test]
fn stay_admission_uses_matching_hadm_id() {
    let linked = link_visits(&scenario_sources(), AdmissionLink::StayAdmission).unwrap();

    assert_eq!(
        i64_column(&linked.frame, "stay_id"),
        vec![Some(10), Some(20), Some(21), Some(11), Some(12)]
    );
    assert_eq!(
        str_column(&linked.frame, "admission_type"),
        vec![
            None,
            Some("EU OBSERVATION".to_string()),
            Some("URGENT".to_string()),
            Some("EW EMER.".to_string()),
            None,
        ]
    );
    assert_eq!(linked.report.after_admissions, 6);
    assert_eq!(linked.report.duplicates_removed, 0);
    assert!(!linked.report.fanned_out());
}

#[test]
fn stay_admission_keeps_subject_attributes_on_every_stay() {
    let linked = link_visits(&scenario_sources(), AdmissionLink::StayAdmission).unwrap();

    // stays 10 and 12 were not admitted but still carry the subject's ethnicity
    assert_eq!(
        str_column(&linked.frame, "ethnicity"),
        vec![
            Some("WHITE".to_string()),
            Some("BLACK/AFRICAN AMERICAN".to_string()),
            Some("BLACK/AFRICAN AMERICAN".to_string()),
            Some("WHITE".to_string()),
            Some("WHITE".to_string()),
        ]
    );
    assert_eq!(
        str_column(&linked.frame, "admission_location"),
        vec![
            None,
            Some("EMERGENCY ROOM".to_string()),
            Some("PHYSICIAN REFERRAL".to_string()),
            Some("EMERGENCY ROOM".to_string()),
            None,
        ]
    );
}

fn with_repeated_triage_row(repeat_first: bool) -> SourceTables {
    let mut sources = scenario_sources();
    // stay 10 is the first triage row
    let mut repeat = sources.triage.head(Some(1));
    repeat
        .with_column(Series::new("chiefcomplaint".into(), ["Repeat"]))
        .unwrap();
    sources.triage = if repeat_first {
        repeat.vstack(&sources.triage).unwrap()
    } else {
        sources.triage.vstack(&repeat).unwrap()
    };
    sources
}

#[test]
fn repeated_triage_row_keeps_first_listed() {
    for (repeat_first, expected) in [(false, "Chest pain"), (true, "Repeat")] {
        let linked =
            link_visits(&with_repeated_triage_row(repeat_first), AdmissionLink::FirstListed)
                .unwrap();

        assert_eq!(linked.report.after_triage, 8);
        assert_eq!(linked.report.duplicates_removed, 3);
        assert_eq!(linked.report.visits, 5);
        // stay 10 is the earliest visit
        assert_eq!(
            str_column(&linked.frame, "chiefcomplaint")[0].as_deref(),
            Some(expected)
        );
        for name in ["_triage_ordinal", "_admission_ordinal", "_patient_ordinal"] {
            assert!(linked.frame.column(name).is_err());
        }
    }
}

#[test]
fn missing_required_column_fails_before_joining() {
    let mut sources = scenario_sources();
    sources.triage = sources.triage.drop("pain").unwrap();

    let err = validate_sources(&sources, &CohortColumns::default()).unwrap_err();
    match err {
        TransformError::MissingColumns { table, columns } => {
            assert_eq!(table, "triage");
            assert_eq!(columns, vec!["pain".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn projected_column_may_come_from_any_table() {
    let mut sources = scenario_sources();
    let complaints = sources.triage.column("chiefcomplaint").unwrap().clone();
    sources.triage = sources.triage.drop("chiefcomplaint").unwrap();
    assert!(validate_sources(&sources, &CohortColumns::default()).is_err());

    // seven ED rows line up with seven triage rows in this fixture
    sources.ed_stays.with_column(complaints).unwrap();
    validate_sources(&sources, &CohortColumns::default()).unwrap();

    sources.admissions = sources.admissions.drop("ethnicity").unwrap();
    let err = validate_sources(&sources, &CohortColumns::default()).unwrap_err();
    assert!(
        matches!(err, TransformError::UnsourcedColumns { columns } if columns == vec!["ethnicity".to_string()])
    );
}

#[test]
fn unparseable_intime_is_an_error() {
    let mut sources = scenario_sources();
    let intime = Series::new(
        "intime".into(),
        [
            "2181-02-01 09:00:00",
            "not a time",
            "2180-06-01 08:30:00",
            "2180-03-01 12:00:00",
            "2180-04-01 12:00:00",
            "2180-05-01 00:00:00",
            "2180-05-02 00:00:00",
        ],
    );
    sources.ed_stays.with_column(intime).unwrap();

    let err = link_visits(&sources, AdmissionLink::FirstListed).unwrap_err();
    assert!(matches!(
        err,
        TransformError::InvalidTimestamp { stay_id: 10, .. }
    ));
}

#[test]
fn no_matching_triage_yields_empty_link() {
    let mut sources = scenario_sources();
    sources.triage = sources.triage.head(Some(0));

    let linked = link_visits(&sources, AdmissionLink::FirstListed).unwrap();
    assert_eq!(linked.frame.height(), 0);
    assert_eq!(linked.report.after_triage, 0);
    assert_eq!(linked.report.visits, 0);
}
