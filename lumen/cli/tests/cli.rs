use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    [env!("CARGO_MANIFEST_DIR"), "tests", "fixtures", name].iter().collect()
}

/// The lumen binary with config and cache isolated in a temp dir.
fn lumen(state: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lumen").unwrap();
    cmd.env("LUMEN_CONFIG_DIR", state.path().join("config"))
        .env("LUMEN_CACHE_DIR", state.path().join("cache"))
        .env_remove("COLORFGBG")
        .env_remove("NO_COLOR")
        .env_remove("THEME")
        .env_remove("CODE_THEME")
        .env_remove("RUST_LOG");
    cmd
}

mod rendering {
    use super::*;

    #[test]
    fn html_page_to_stdout() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .arg("--html")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
            .stdout(predicate::str::contains("<title>Sample Notes</title>"))
            .stdout(predicate::str::contains(r#"id="searchInput""#));
    }

    #[test]
    fn piped_stdout_defaults_to_html() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .assert()
            .success()
            .stdout(predicate::str::contains("<!DOCTYPE html>"));
    }

    #[test]
    fn search_marks_prose_only() {
        let state = TempDir::new().unwrap();
        let output = lumen(&state)
            .arg(fixture("sample.md"))
            .args(["--html", "--search", "closure"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let page = String::from_utf8(output.stdout).unwrap();
        assert_eq!(page.matches("<mark class=\"search-hit").count(), 3);
        assert_eq!(page.matches("search-hit active").count(), 1);
        assert!(page.contains("1 / 3"));
    }

    #[test]
    fn reads_stdin() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .args(["-", "--html"])
            .write_stdin("# From Stdin\n\nhello")
            .assert()
            .success()
            .stdout(predicate::str::contains("<title>From Stdin</title>"));
    }

    #[test]
    fn output_file() {
        let state = TempDir::new().unwrap();
        let out = state.path().join("page.html");
        lumen(&state)
            .arg(fixture("sample.md"))
            .arg("--output")
            .arg(&out)
            .assert()
            .success();
        let page = std::fs::read_to_string(&out).unwrap();
        assert!(page.contains("<title>Sample Notes</title>"));
    }

    #[test]
    fn theme_flags() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .args(["--html", "--theme", "github", "--color-mode", "light"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"<html lang="en" data-theme="light">"#));
    }

    #[test]
    fn no_mermaid_keeps_code_block() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .args(["-", "--html", "--no-mermaid"])
            .write_stdin("```mermaid\nflowchart LR\n    A --> B\n```\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("language-mermaid"))
            .stdout(predicate::str::contains("mermaid.esm.min.mjs").not());
    }
}

mod matches_mode {
    use super::*;

    #[test]
    fn lists_matches_with_context() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .args(["--search", "closure", "--matches"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[Closure]s capture closures lazily."))
            .stdout(predicate::str::contains("3 matches"));
    }

    #[test]
    fn json_report() {
        let state = TempDir::new().unwrap();
        let output = lumen(&state)
            .arg(fixture("sample.md"))
            .args(["--search", "closure", "--matches", "--json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report["count"], 3);
        assert_eq!(report["query"], "closure");
        assert_eq!(report["matches"][1]["start"], 17);
        assert_eq!(report["matches"][1]["context"]["matched"], "closure");
    }

    #[test]
    fn no_matches() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .args(["--search", "zebra", "--matches"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No matches for 'zebra'"));
    }

    #[test]
    fn requires_search() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .arg("--matches")
            .assert()
            .failure();
    }
}

mod interactive {
    use super::*;

    #[test]
    fn search_and_cycle() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .arg("--interactive")
            .write_stdin("/closure\nn\nn\nn\nq\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("1/3"))
            .stdout(predicate::str::contains("3/3"))
            .stdout(predicate::str::contains("A [closure] is just a value."));
    }

    #[test]
    fn toggle_is_persisted() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg(fixture("sample.md"))
            .arg("--interactive")
            .write_stdin("t\nq\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Theme: light"));

        let prefs = std::fs::read_to_string(state.path().join("config").join("preferences.json")).unwrap();
        assert!(prefs.contains("\"light\""));
    }
}

mod preferences {
    use super::*;

    #[test]
    fn toggle_theme_persists_and_applies() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg("--toggle-theme")
            .assert()
            .success()
            .stdout("Color mode: light\n");

        lumen(&state)
            .arg(fixture("sample.md"))
            .arg("--html")
            .assert()
            .success()
            .stdout(predicate::str::contains(r#"data-theme="light""#));

        lumen(&state)
            .arg("--toggle-theme")
            .assert()
            .success()
            .stdout("Color mode: dark\n");
    }

    #[test]
    fn invalid_theme_is_rejected() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .args(["--theme", "sepia"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid theme name"));
    }
}

mod misc {
    use super::*;

    #[test]
    fn list_themes() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg("--list-themes")
            .assert()
            .success()
            .stdout(predicate::str::contains("one-half"))
            .stdout(predicate::str::contains("dracula"));
    }

    #[test]
    fn completions() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .args(["--completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lumen"));
    }

    #[test]
    fn missing_file_fails() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .arg("/no/such/file.md")
            .arg("--html")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to load"));
    }

    #[test]
    fn conflicting_modes_fail() {
        let state = TempDir::new().unwrap();
        lumen(&state)
            .args(["--html", "--interactive"])
            .assert()
            .failure();
    }
}
