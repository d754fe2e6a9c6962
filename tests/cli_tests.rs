// Integration tests driving the benchls binary end to end

use predicates::prelude::*;
use std::io::Write;

const SORT_FIXTURE: &str = "tests/fixtures/sort_bench.txt";
const MATRIX_FIXTURE: &str = "tests/fixtures/matrix_bench.txt";

fn benchls() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("benchls")
}

#[test]
fn test_default_fit_on_sort_benchmarks() {
    let output = benchls().arg(SORT_FIXTURE).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "heading plus one row per group:\n{}", stdout);

    assert!(lines[0].starts_with("group \\ Y ~"));
    assert!(lines[0].contains("N"));
    assert!(lines[0].contains("1.0"));
    assert!(lines[0].ends_with("R^2"));

    assert!(lines[1].starts_with("BenchmarkSort "));
    assert!(lines[1].contains("3.64e+02±6.9e+00"));
    assert!(lines[1].contains("-1e+07±2.6e+07"));

    assert!(lines[2].starts_with("BenchmarkStableSort "));
    assert!(lines[2].contains("1.44e+03±2.6e+01"));
    assert!(lines[2].contains("-5e+07±9.9e+07"));
}

#[test]
fn test_xtransform_appears_in_heading() {
    benchls()
        .arg("--xtransform")
        .arg("math.Log(N) * N, 1.0")
        .arg(SORT_FIXTURE)
        .assert()
        .success()
        .stdout(predicate::str::contains("math.Log(N) * N"))
        .stdout(predicate::str::contains("BenchmarkStableSort"));
}

#[test]
fn test_ytransform_shorthand() {
    benchls()
        .args(["--xt", "math.Log(N), 1.0", "--yt", "math.Log(Y)", SORT_FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("group \\ math.Log(Y) ~"));
}

#[test]
fn test_reads_stdin() {
    let input = std::fs::read_to_string(SORT_FIXTURE).unwrap();
    benchls()
        .arg("-")
        .write_stdin(input.clone())
        .assert()
        .success()
        .stdout(predicate::str::contains("BenchmarkSort"));

    benchls()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("BenchmarkStableSort"));
}

#[test]
fn test_html_output() {
    benchls()
        .arg("--html")
        .arg(SORT_FIXTURE)
        .assert()
        .success()
        .stdout(predicate::str::contains("<table class='benchls'>"))
        .stdout(predicate::str::contains("<th>group \\ Y ~</th>"))
        .stdout(predicate::str::contains("<td>BenchmarkSort</td>"))
        .stdout(predicate::str::contains("</table>"));
}

#[test]
fn test_csv_output() {
    let output = benchls()
        .args(["--format", "csv", SORT_FIXTURE])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "group,rows,N coef,N half_width,1.0 coef,1.0 half_width,r_squared"
    );
    assert!(lines[1].starts_with("BenchmarkSort,7,"));
    assert!(lines[2].starts_with("BenchmarkStableSort,7,"));
}

#[test]
fn test_json_output_with_two_parameters() {
    let output = benchls()
        .args([
            "--vars",
            r"/(?P<M>\d+)x(?P<N>\d+)-\d+$",
            "--xt",
            "M*N, 1.0",
            "--format",
            "json",
            MATRIX_FIXTURE,
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let groups: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["group"], "BenchmarkMul");
    assert_eq!(groups[0]["rows"], 6);

    let per_element = groups[0]["terms"][0]["coefficient"].as_f64().unwrap();
    assert!(
        (17.0..21.0).contains(&per_element),
        "ns per element {}",
        per_element
    );
}

#[test]
fn test_response_metric_selection() {
    benchls()
        .args([
            "--vars",
            r"/(?P<M>\d+)x(?P<N>\d+)-\d+$",
            "--xt",
            "M*N, 1.0",
            "--response",
            "AllocedBytesPerOp",
            MATRIX_FIXTURE,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("BenchmarkMul"));
}

#[test]
fn test_missing_metric_leaves_no_groups() {
    benchls()
        .args(["--response", "MBPerS", SORT_FIXTURE])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no observations collected"));
}

#[test]
fn test_too_few_points_shows_placeholders() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "BenchmarkA10-4 100 10 ns/op").unwrap();
    writeln!(file, "BenchmarkA20-4 100 20 ns/op").unwrap();
    writeln!(file, "BenchmarkB10-4 100 10 ns/op").unwrap();

    let output = benchls().arg(file.path()).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    // Exact fit through two points: coefficients without intervals
    assert!(lines[1].starts_with("BenchmarkA"));
    assert!(lines[1].contains("±~"));
    // One point for two terms: no model at all
    assert!(lines[2].starts_with("BenchmarkB"));
    assert_eq!(lines[2].split_whitespace().skip(1).collect::<Vec<_>>(), vec!["~", "~", "~"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("confidence intervals unavailable"));
    assert!(stderr.contains("no model could be estimated"));
}

#[test]
fn test_reserved_variable_rejected() {
    benchls()
        .args(["--vars", r"(?P<Y>\d+)-\d+$", SORT_FIXTURE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved"));
}

#[test]
fn test_unknown_function_rejected() {
    benchls()
        .args(["--xt", "math.Foo(N), 1.0", SORT_FIXTURE])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown math function math.Foo"));
}

#[test]
fn test_bad_formula_fails_before_reading_input() {
    benchls()
        .args(["--yt", "Y +", "/nonexistent/bench.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ytransform"))
        .stderr(predicate::str::contains("failed to open").not());
}

#[test]
fn test_missing_input_file() {
    benchls()
        .arg("/nonexistent/bench.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open"));
}

#[test]
fn test_invalid_response_rejected() {
    benchls()
        .args(["--response", "Seconds", SORT_FIXTURE])
        .assert()
        .failure();
}

#[test]
fn test_html_conflicts_with_format() {
    benchls()
        .args(["--html", "--format", "json", SORT_FIXTURE])
        .assert()
        .failure();
}

#[test]
fn test_config_file_with_cli_override() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "xtransform = \"math.Log(N) * N, 1.0\"").unwrap();
    writeln!(config, "format = \"csv\"").unwrap();

    benchls()
        .arg("--config")
        .arg(config.path())
        .arg("--format")
        .arg("text")
        .arg(SORT_FIXTURE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("group \\ Y ~"))
        .stdout(predicate::str::contains("math.Log(N) * N"));
}

#[test]
fn test_config_file_unknown_key_rejected() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "xtransfrom = \"N\"").unwrap();

    benchls()
        .arg("--config")
        .arg(config.path())
        .arg(SORT_FIXTURE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid benchls configuration"));
}

#[test]
fn test_debug_logs_compiled_programs() {
    benchls()
        .args(["--debug", SORT_FIXTURE])
        .assert()
        .success()
        .stderr(predicate::str::contains("explanatory term"));
}
