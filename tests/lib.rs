extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SPEC: &str = r#"{
        "ImageExtensions": [".svg"],
        "RowDescription": {"name": "sub-${subject}", "entities": ["subject"]},
        "Components": [{
            "entities": ["subject"],
            "name": "sub-${subject}_anat",
            "column": "anat",
            "images": [{"desc": "T1"}, {"desc": "mask"}],
            "ratings": ["Pass", "Fail", "Uncertain"]
        }]
    }"#;

    const CONFIG: &str = r#"{
        "database_dir": "db",
        "databases": {
            "study_pipe": {"qc_spec": "spec.json", "base_dir": "data"}
        }
    }"#;

    fn main_cmd(dir: &TempDir) -> Command {
        let mut cmd = Command::cargo_bin("qc_index").unwrap();
        cmd.env("QC_INDEX_CONF", dir.path().join("qc.json"));
        cmd
    }

    fn create_file(dir: &TempDir, path: &str, content: &str) {
        let path = dir.path().join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(path)
            .unwrap();

        file.write_all(content.as_bytes()).unwrap();
    }

    fn example_installation() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        create_file(&dir, "qc.json", CONFIG);
        create_file(&dir, "spec.json", SPEC);
        create_file(&dir, "data/sub-01/figures/sub-01_desc-T1.svg", "<svg/>");
        create_file(&dir, "data/sub-01/figures/sub-01_desc-mask.svg", "<svg/>");
        create_file(&dir, "data/sub-02/figures/sub-02_desc-T1.svg", "<svg/>");

        dir
    }

    fn cmd_success(dir: &TempDir, cmd: &str, args: Vec<&str>) {
        main_cmd(dir).arg(cmd).args(args).assert().success();
    }
    fn cmd_should_print(dir: &TempDir, cmd: &str, args: Vec<&str>, expected: &str) {
        main_cmd(dir)
            .arg(cmd)
            .args(args)
            .assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }
    fn cmd_should_fail(dir: &TempDir, cmd: &str, args: Vec<&str>, expected: &str) {
        main_cmd(dir)
            .arg(cmd)
            .args(args)
            .assert()
            .failure()
            .stderr(predicate::str::contains(expected));
    }

    #[test]
    fn init_and_summarize() {
        let dir = example_installation();
        cmd_should_print(&dir, "init", vec![], "study_pipe: 2 entities (3 images)");
        assert!(dir.path().join("db/study_pipe.sqlite3").exists());

        cmd_should_print(&dir, "summary", vec!["study", "pipe"], "\"numberOfUnrated\": 2");
        cmd_should_print(&dir, "summary", vec!["study", "pipe"], "\"numberOfRows\": 2");

        // A second init must be requested explicitly.
        cmd_should_fail(&dir, "init", vec!["study_pipe"], "already exists");
        cmd_success(&dir, "init", vec!["study_pipe", "--reset"]);
    }

    #[test]
    fn rate_and_export() {
        let dir = example_installation();
        cmd_success(&dir, "init", vec![]);

        cmd_should_print(&dir, "view", vec!["study", "pipe", "1"], "\"Uncertain\"");
        cmd_should_print(
            &dir,
            "rate",
            vec!["study", "pipe", "1", r#"{"rating": 2, "failed": true, "comment": "motion"}"#],
            "\"comment\": \"motion\"",
        );
        cmd_should_print(&dir, "entity", vec!["study", "pipe", "1"], "\"failed\": true");
        cmd_should_print(
            &dir,
            "spreadsheet",
            vec!["study", "pipe"],
            "sub-01/figures/sub-01_desc-mask.svg",
        );

        cmd_should_print(&dir, "export", vec!["study", "pipe"], "sub-01,Fail,Fail,motion");
        cmd_success(&dir, "export", vec!["study", "pipe", "--out", "qc.csv"]);
        let exported = std::fs::read_to_string(dir.path().join("qc.csv")).unwrap();
        assert!(exported.starts_with("row,anat_rating,anat_passfail,anat_comment\n"));
    }

    #[test]
    fn report_failures() {
        let dir = example_installation();
        cmd_should_fail(&dir, "summary", vec!["study", "pipe"], "404");

        cmd_success(&dir, "init", vec![]);
        cmd_should_fail(&dir, "entity", vec!["study", "pipe", "42"], "404");
        cmd_should_fail(&dir, "rate", vec!["study", "pipe", "1", "{\"rating\": 99}"], "400");
        cmd_should_fail(&dir, "entity", vec!["study", "pipe", "abc"], "integers");
        cmd_should_fail(&dir, "init", vec!["unknown_db"], "not configured");
    }

    #[test]
    fn explicit_config_file() {
        let dir = example_installation();
        Command::cargo_bin("qc_index")
            .unwrap()
            .env_remove("QC_INDEX_CONF")
            .arg("--config")
            .arg(dir.path().join("qc.json"))
            .arg("init")
            .assert()
            .success();

        Command::cargo_bin("qc_index")
            .unwrap()
            .env_remove("QC_INDEX_CONF")
            .arg("init")
            .assert()
            .failure();
    }
}
