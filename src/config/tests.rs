use super::*;

#[test]
fn parse_database_names() {
    let db = LogicalDb::parse("study01_fmriprep").unwrap();
    assert_eq!(db, LogicalDb::new("study01", "fmriprep"));
    assert_eq!(db.name(), "study01_fmriprep");

    // Only the first underscore separates study and pipeline.
    let db = LogicalDb::parse("abc_qsi_prep").unwrap();
    assert_eq!(db.study, "abc");
    assert_eq!(db.pipeline, "qsi_prep");

    for invalid in &["nounderscore", "_pipeline", "study_", ""] {
        match LogicalDb::parse(invalid) {
            Err(ConfigError::InvalidDatabaseName { .. }) => (),
            other => panic!("{} must be rejected, got {:?}", invalid, other),
        }
    }
}

#[test]
fn relative_paths_resolve_against_config_dir() {
    let config = Config::from_json(
        r#"{
            "databases": {
                "s1_fmriprep": {"qc_spec": "spec.json", "base_dir": "/data/s1"}
            }
        }"#,
        "/etc/qc",
    )
    .unwrap();

    assert_eq!(config.database_dir(), Path::new("/etc/qc"));
    assert_eq!(config.database_names(), vec!["s1_fmriprep"]);

    let settings = config.database("s1_fmriprep").unwrap();
    assert_eq!(
        settings.qc_spec("s1_fmriprep").unwrap(),
        Path::new("/etc/qc/spec.json")
    );
    assert_eq!(settings.base_dir("s1_fmriprep").unwrap(), Path::new("/data/s1"));
    assert_eq!(settings.bids_config(), None);

    let db = LogicalDb::new("s1", "fmriprep");
    assert_eq!(
        config.database_path(&db),
        PathBuf::from("/etc/qc/s1_fmriprep.sqlite3")
    );
}

#[test]
fn missing_settings_are_reported_per_database() {
    let config = Config::from_json(
        r#"{
            "database_dir": "/var/qc",
            "databases": {
                "good_one": {"qc_spec": "/a.json", "base_dir": "/a"},
                "bad_one": {"qc_spec": "/b.json"}
            }
        }"#,
        "/etc/qc",
    )
    .unwrap();

    assert_eq!(config.database_dir(), Path::new("/var/qc"));
    assert!(config.database("good_one").unwrap().base_dir("good_one").is_ok());
    match config.database("bad_one").unwrap().base_dir("bad_one") {
        Err(ConfigError::MissingSetting { database, setting }) => {
            assert_eq!(database, "bad_one");
            assert_eq!(setting, "base_dir");
        }
        other => panic!("Expected missing setting, got {:?}", other),
    }
    match config.logical_database(&LogicalDb::new("other", "db")) {
        Err(ConfigError::UnknownDatabase { name }) => assert_eq!(name, "other_db"),
        other => panic!("Expected unknown database, got {:?}", other),
    }
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("qc.json");
    fs::write(
        &config_path,
        r#"{"databases": {"s_p": {"qc_spec": "spec.json", "base_dir": "data"}}}"#,
    )
    .unwrap();

    let config = Config::locate(Some(config_path.as_path())).unwrap();
    let config_dir = fs::canonicalize(dir.path()).unwrap();
    assert_eq!(config.database_dir(), config_dir.as_path());
    assert_eq!(
        config.database("s_p").unwrap().base_dir("s_p").unwrap(),
        config_dir.join("data").as_path()
    );

    assert!(Config::from_json(r#"{"unknown": 1}"#, ".").is_err());
}

#[test]
fn config_dir_is_made_absolute() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(
        dir.path().join("qc.json"),
        r#"{"databases": {"s_p": {"qc_spec": "spec.json", "base_dir": "data"}}}"#,
    )
    .unwrap();

    let config = Config::load(dir.path().join("sub").join("..").join("qc.json")).unwrap();
    let config_dir = fs::canonicalize(dir.path()).unwrap();
    assert!(config.database_dir().is_absolute());
    assert_eq!(config.database_dir(), config_dir.as_path());
    assert_eq!(
        config.database("s_p").unwrap().qc_spec("s_p").unwrap(),
        config_dir.join("spec.json").as_path()
    );
}

#[test]
fn unknown_database_keys_are_ignored() {
    let config = Config::from_json(
        r#"{
            "databases": {
                "good_one": {"qc_spec": "/a.json", "base_dir": "/a"},
                "odd_one": {"qc_spec": "/b.json", "schema": "schema.yaml"}
            }
        }"#,
        "/etc/qc",
    )
    .unwrap();

    assert_eq!(config.database_names(), vec!["good_one", "odd_one"]);
    assert_eq!(
        config.database("good_one").unwrap().base_dir("good_one").unwrap(),
        Path::new("/a")
    );

    let odd = config.database("odd_one").unwrap();
    assert_eq!(odd.qc_spec("odd_one").unwrap(), Path::new("/b.json"));
    match odd.base_dir("odd_one") {
        Err(ConfigError::MissingSetting { database, setting }) => {
            assert_eq!(database, "odd_one");
            assert_eq!(setting, "base_dir");
        }
        other => panic!("Expected missing setting, got {:?}", other),
    }
}
