//! Integration test suite for `jsm` CLI
use assert_cmd::Command;

/// Filter selecting documents whose `age` is below 10.
const YOUNG: &str =
    r#"["not", ["greaterequal", ["field", "age"], ["value", 10]]]"#;

/// Filter selecting documents tagged `dev`.
const DEV: &str = r#"["anyin", 1, ["field", "tags"],
    ["equals", ["field", 1], ["value", "dev"]]]"#;

/// Helper function to run the `main` binary with the given arguments and
/// return a [`assert_cmd::assert::Assert`].
fn run_main(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd =
        Command::cargo_bin("jsm").expect("Failed to find main binary");
    cmd.args(args);
    cmd.assert()
}

/// Collect STDOUT of a successful run as lines.
fn stdout_lines(assert: assert_cmd::assert::Assert) -> Vec<String> {
    let output = assert.success().code(0).get_output().stdout.clone();
    String::from_utf8(output)
        .expect("Invalid UTF-8 output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn prints_matching_documents_verbatim() {
        let lines =
            stdout_lines(run_main(&[YOUNG, "-i", "tests/data/people.ndjson"]));
        assert_eq!(
            lines,
            [
                r#"{"name": "anna", "age": 5, "tags": []}"#,
                r#"{"name": "tom", "age": 8, "tags": ["ops"]}"#,
            ]
        );
    }

    #[test]
    fn count() {
        let lines = stdout_lines(run_main(&[
            YOUNG,
            "--count",
            "-i",
            "tests/data/people.ndjson",
        ]));
        assert_eq!(lines, ["2"]);
    }

    #[test]
    fn invert_skips_malformed_documents() {
        let lines = stdout_lines(run_main(&[
            YOUNG,
            "--invert",
            "-i",
            "tests/data/people.ndjson",
        ]));
        let names: Vec<String> = lines
            .iter()
            .map(|line| {
                let doc: Value = serde_json::from_str(line).expect("JSON line");
                doc["name"].as_str().expect("name").to_string()
            })
            .collect();
        // `kid` has a string age, so the comparison fails closed
        assert_eq!(names, ["mike", "zoe", "kid"]);
    }

    #[test]
    fn filters_from_file_are_aggregated() {
        let lines = stdout_lines(run_main(&[
            "--filter-file",
            "tests/data/filters.txt",
            "-i",
            "tests/data/people.ndjson",
        ]));
        assert_eq!(
            lines,
            [r#"{"name": "mike", "age": 15, "tags": ["admin", "dev"]}"#]
        );
    }

    #[test]
    fn reads_stdin() {
        let mut cmd =
            Command::cargo_bin("jsm").expect("Failed to find main binary");
        let output = cmd
            .args([r#"["equals", ["field", "id"], ["value", 2]]"#, "--count"])
            .write_stdin("{\"id\": 1}\n{\"id\": 2}\n{\"id\": 2.0}\n")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        assert_eq!(String::from_utf8(output).expect("UTF-8").trim(), "2");
    }

    #[test]
    fn depth_limit_fails_closed() {
        let lines = stdout_lines(run_main(&[
            YOUNG,
            "--max-depth",
            "1",
            "--count",
            "-i",
            "tests/data/people.ndjson",
        ]));
        assert_eq!(lines, ["0"]);
    }

    #[test]
    fn zero_time_budget_fails_quantifiers() {
        let lines = stdout_lines(run_main(&[
            DEV,
            "--time-budget-ms",
            "0",
            "--count",
            "-i",
            "tests/data/people.ndjson",
        ]));
        assert_eq!(lines, ["0"]);
    }

    #[test]
    fn invalid_filter() {
        let arity = r#"["equals", ["field", "a"]]"#;
        run_main(&[arity, "-i", "tests/data/simple.json"])
            .failure()
            .code(1);
        run_main(&["not json", "-i", "tests/data/simple.json"])
            .failure()
            .code(1);
    }

    #[test]
    fn missing_filter() {
        run_main(&["-i", "tests/data/simple.json"]).failure();
    }

    #[test]
    fn nonexistent_file() {
        run_main(&[YOUNG, "-i", "tests/data/does-not-exist.ndjson"]).failure();
    }

    #[test]
    fn tokens_plain() {
        let lines =
            stdout_lines(run_main(&["tokens", "tests/data/simple.json"]));
        assert_eq!(lines.len(), 17);
        assert!(lines[0].trim_start().starts_with("0 object-start"));
        assert!(lines[1].ends_with(r#"string "name""#));
    }

    #[test]
    fn tokens_json() {
        let output = run_main(&["tokens", "--json", "tests/data/simple.json"])
            .success()
            .get_output()
            .stdout
            .clone();
        let tokens: Value =
            serde_json::from_slice(&output).expect("JSON output");
        let tokens = tokens.as_array().expect("array");
        assert_eq!(tokens.len(), 17);
        assert_eq!(tokens[0]["kind"], "ObjectStart");
        assert_eq!(tokens[7]["kind"], "Integer");
        assert_eq!(tokens[7]["text"], "7");
    }

    #[test]
    fn generate_shell_completions() {
        let lines = stdout_lines(run_main(&["generate", "shell", "bash"]));
        assert!(lines.iter().any(|line| line.contains("jsm")));
    }

    #[test]
    fn generate_man_pages() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().to_str().expect("UTF-8 path");
        run_main(&["generate", "man", "--output-dir", out]).success();
        assert!(dir.path().join("jsm.1").exists());
        assert!(dir.path().join("jsm-tokens.1").exists());
    }
}
