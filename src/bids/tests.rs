use super::*;
use std::fs;

fn create_file(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

#[test]
fn default_config_extracts_bids_entities() {
    let extractor = EntityConfig::default().compile().unwrap();
    let entities = extractor.extract("/sub-01/ses-A/anat/sub-01_ses-A_run-02_desc-T1_mask.nii.gz");

    assert_eq!(entities["subject"], "01");
    assert_eq!(entities["session"], "A");
    assert_eq!(entities["datatype"], "anat");
    assert_eq!(entities["run"], "2");
    assert_eq!(entities["desc"], "T1");
    assert_eq!(entities["suffix"], "mask");
    assert_eq!(entities["extension"], ".nii.gz");
    assert!(!entities.contains_key("task"));
}

#[test]
fn user_config_replaces_defaults() {
    let config = EntityConfig::from_json(
        r#"{"name": "user", "entities": [{"name": "subject", "pattern": "sub-([0-9]+)", "mandatory": false}]}"#,
    )
    .unwrap();
    assert_eq!(config.names(), vec!["subject"]);

    let entities = config.compile().unwrap().extract("/sub-07_desc-x.svg");
    assert_eq!(entities.len(), 1);
    assert_eq!(entities["subject"], "07");
}

#[test]
fn invalid_pattern_names_the_entity() {
    let config =
        EntityConfig::from_json(r#"{"entities": [{"name": "broken", "pattern": "(["}]}"#).unwrap();
    match config.compile() {
        Err(DiscoveryError::InvalidEntityPattern { name, .. }) => assert_eq!(name, "broken"),
        other => panic!("Must report invalid pattern, got {:?}", other),
    }
}

#[test]
fn discover_filters_by_extension() {
    let test_dir = tempfile::tempdir().unwrap();
    create_file(test_dir.path(), "sub-01/figures/sub-01_desc-T1.svg");
    create_file(test_dir.path(), "sub-01/figures/sub-01_desc-mask.svg");
    create_file(test_dir.path(), "sub-01/figures/sub-01_desc-T1.html");
    create_file(test_dir.path(), "sub-02/anat/sub-02_desc-T1_T1w.nii.gz");

    let files = discover(
        test_dir.path(),
        &[".svg".to_string(), "nii.gz".to_string()],
        &EntityConfig::default(),
    )
    .unwrap();
    assert_eq!(files.len(), 3);
    assert!(files.iter().all(|f| f.path.starts_with(test_dir.path())));

    let t1w = files
        .iter()
        .find(|f| f.entities.get("suffix").map(String::as_str) == Some("T1w"))
        .unwrap();
    assert_eq!(t1w.entities["subject"], "02");
    assert_eq!(t1w.entities["extension"], ".nii.gz");
}

#[test]
fn discover_reports_overlapping_extensions_once() {
    let test_dir = tempfile::tempdir().unwrap();
    create_file(test_dir.path(), "sub-01/sub-01_mask.nii.gz");

    let files = discover(
        test_dir.path(),
        &[".gz".to_string(), ".nii.gz".to_string()],
        &EntityConfig::default(),
    )
    .unwrap();
    assert_eq!(files.len(), 1);
}

#[test]
fn record_subset_matching() {
    let mut entities = BTreeMap::new();
    entities.insert("subject".to_string(), "01".to_string());
    entities.insert("desc".to_string(), "T1".to_string());
    let record = FileRecord::new("a.nii", entities);

    let mut pattern = BTreeMap::new();
    assert!(record.matches(&pattern));
    pattern.insert("desc".to_string(), "T1".to_string());
    assert!(record.matches(&pattern));
    pattern.insert("suffix".to_string(), "mask".to_string());
    assert!(!record.matches(&pattern));

    assert!(record.has_entities(&["subject".to_string()]));
    assert!(!record.has_entities(&["subject".to_string(), "session".to_string()]));
}
