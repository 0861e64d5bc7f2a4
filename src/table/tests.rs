use super::*;
use crate::qc_db::{Entity, QcStatus, Rating};

fn details(id: i64, row: &str, column: &str, rating: Option<&str>, status: QcStatus) -> EntityDetails {
    EntityDetails {
        entity: Entity {
            id,
            name: format!("{}_{}", row, column),
            component_id: 1,
            row_name: row.to_string(),
            column_name: column.to_string(),
            comment: String::new(),
            status,
            rating_id: rating.map(|_| id),
        },
        images: vec![],
        rating: rating.map(|name| Rating {
            id,
            name: name.to_string(),
            component_id: 1,
        }),
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn header_expands_every_column() {
    let table = render(&columns(&["anat", "func"]), &[], &TableFormat::default());
    assert_eq!(
        table,
        "row,anat_rating,anat_passfail,anat_comment,func_rating,func_passfail,func_comment"
    );
}

#[test]
fn missing_columns_render_empty_entries() {
    let row = RowEntities {
        name: "sub-01".to_string(),
        entities: vec![
            details(1, "sub-01", "A", Some("Good"), QcStatus::Pass),
            details(2, "sub-01", "C", None, QcStatus::Fail),
        ],
    };

    let table = render(&columns(&["A", "B", "C"]), &[row], &TableFormat::default());
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1], "sub-01,Good,Pass,,,,,,Fail,");
}

#[test]
fn entities_align_regardless_of_order() {
    let mut row = RowEntities {
        name: "sub-01".to_string(),
        entities: vec![
            details(2, "sub-01", "C", Some("Bad"), QcStatus::Fail),
            details(1, "sub-01", "A", Some("Good"), QcStatus::Pass),
        ],
    };
    row.entities[1].entity.comment = "fine".to_string();

    let table = render(&columns(&["A", "B", "C"]), &[row], &TableFormat::default());
    assert_eq!(table.lines().nth(1).unwrap(), "sub-01,Good,Pass,fine,,,,Bad,Fail,");
}

#[test]
fn duplicate_columns_keep_the_lowest_id() {
    let row = RowEntities {
        name: "sub-01".to_string(),
        entities: vec![
            details(7, "sub-01", "A", Some("Later"), QcStatus::Fail),
            details(3, "sub-01", "A", Some("First"), QcStatus::Pass),
        ],
    };

    let table = render(&columns(&["A"]), &[row], &TableFormat::default());
    assert_eq!(table.lines().nth(1).unwrap(), "sub-01,First,Pass,");
}

#[test]
fn empty_rows_are_kept() {
    let rows = vec![
        RowEntities {
            name: "sub-01".to_string(),
            entities: vec![details(1, "sub-01", "A", None, QcStatus::Unrated)],
        },
        RowEntities {
            name: "sub-02".to_string(),
            entities: vec![],
        },
    ];

    let table = render(&columns(&["A"]), &rows, &TableFormat::default());
    assert_eq!(table, "row,A_rating,A_passfail,A_comment\nsub-01,,,\nsub-02,,,");
}

#[test]
fn fields_are_quoted_when_needed() {
    let mut entity = details(1, "sub-01", "A", Some("Pass"), QcStatus::Pass);
    entity.entity.comment = "motion, \"severe\"".to_string();
    let row = RowEntities {
        name: "sub-01".to_string(),
        entities: vec![entity],
    };

    let table = render(&columns(&["A"]), &[row], &TableFormat::default());
    assert_eq!(
        table.lines().nth(1).unwrap(),
        "sub-01,Pass,Pass,\"motion, \"\"severe\"\"\""
    );

    let format = TableFormat {
        row_label: "subject".to_string(),
        delimiter: '\t',
    };
    let table = render(&columns(&["A"]), &[], &format);
    assert_eq!(table, "subject\tA_rating\tA_passfail\tA_comment");
}
