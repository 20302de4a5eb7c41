//! Integration tests for repofile

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Temp config whitelisting `acme`, with the cache and audit log kept inside the temp dir
    struct Sandbox {
        dir: TempDir,
    }

    impl Sandbox {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let cache_root = dir.path().join("cache");
            let config = format!(
                r#"
[general]
audit_log = false

[security]
owners = ["acme"]

[github]
api_url = "http://127.0.0.1:9"
timeout_secs = 2

[cache]
root = "{}"
"#,
                cache_root.display()
            );
            fs::write(dir.path().join("config.toml"), config).unwrap();
            Self { dir }
        }

        fn config_path(&self) -> PathBuf {
            self.dir.path().join("config.toml")
        }

        fn clone_dir(&self) -> PathBuf {
            self.dir.path().join("cache").join("acme").join("widgets")
        }

        /// Lay out a valid clone of acme/widgets by hand
        fn seed_clone(&self, files: &[(&str, &str)]) -> PathBuf {
            let dir = self.clone_dir();
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(".repofile"), "1700000000").unwrap();
            for (name, content) in files {
                let file = dir.join(name);
                fs::create_dir_all(file.parent().unwrap()).unwrap();
                fs::write(file, content).unwrap();
            }
            dir
        }

        fn cmd(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("repofile");
            cmd.env("REPOFILE_CONFIG", self.config_path())
                .env("REPOFILE_TOKEN", "test-token")
                .env("CI", "1")
                .env_remove("RUST_LOG");
            cmd
        }
    }

    fn exists(path: &Path) -> bool {
        path.exists()
    }

    #[test]
    fn help_displays() {
        cargo_bin_cmd!("repofile")
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("whitelisted GitHub repositories"));
    }

    #[test]
    fn version_displays() {
        cargo_bin_cmd!("repofile")
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("repofile"));
    }

    #[test]
    fn config_path_honors_flag() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[security]").and(predicate::str::contains("acme")));
    }

    #[test]
    fn config_init_respects_existing_file() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));
    }

    #[test]
    fn fetch_rejects_unlisted_owner() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["fetch", "evil/widgets/scripts/run.rb"])
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("'evil' has not been whitelisted")
                    .and(predicate::str::contains("Hint:")),
            );
        assert!(!exists(&sandbox.dir.path().join("cache")));
    }

    #[test]
    fn clone_rejects_unlisted_owner() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["clone", "https://github.com/evil/widgets"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("has not been whitelisted"));
        assert!(!exists(&sandbox.dir.path().join("cache")));
    }

    #[test]
    fn fetch_rejects_malformed_identifier() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["fetch", "acme/widgets"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("is not a valid file identifier"));
    }

    #[test]
    fn fetch_reads_cached_clone() {
        let sandbox = Sandbox::new();
        sandbox.seed_clone(&[("scripts/run.rb", "puts 1")]);

        sandbox
            .cmd()
            .args(["fetch", "github.com/acme/widgets/scripts/run.rb"])
            .assert()
            .success()
            .stdout(predicate::eq("puts 1"));
    }

    #[test]
    fn fetch_missing_file_in_clone() {
        let sandbox = Sandbox::new();
        sandbox.seed_clone(&[]);

        sandbox
            .cmd()
            .args(["fetch", "acme/widgets/scripts/run.rb"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("File not found: "));
    }

    #[test]
    fn fetch_refuses_dot_segments_without_a_request() {
        let sandbox = Sandbox::new();

        // The configured API is unreachable, so reaching it would report a remote failure
        sandbox
            .cmd()
            .args(["fetch", "acme/widgets/../../evil/secret/contents/run.rb"])
            .assert()
            .failure()
            .stderr(
                predicate::str::contains("File not found: ")
                    .and(predicate::str::contains("remote API").not()),
            );
    }

    #[test]
    fn fetch_without_clone_reports_remote_failure() {
        let sandbox = Sandbox::new();

        sandbox
            .cmd()
            .args(["fetch", "acme/widgets/scripts/run.rb"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("from the remote API"));
        assert!(!exists(&sandbox.clone_dir()));
    }

    #[test]
    fn status_reports_cache_state() {
        let sandbox = Sandbox::new();
        sandbox
            .cmd()
            .args(["status", "acme/widgets"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cached: no"));

        sandbox.seed_clone(&[]);
        sandbox
            .cmd()
            .args(["status", "acme/widgets"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cached: yes").and(predicate::str::contains("2023-11-14")));
    }

    #[test]
    fn destroy_is_idempotent() {
        let sandbox = Sandbox::new();
        let dir = sandbox.seed_clone(&[("run.rb", "puts 1")]);

        sandbox
            .cmd()
            .args(["destroy", "acme/widgets"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed clone of acme/widgets"));
        assert!(!exists(&dir));

        sandbox
            .cmd()
            .args(["destroy", "acme/widgets"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No clone of acme/widgets"));
    }
}
