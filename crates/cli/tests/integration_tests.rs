/// End-to-end tests for the tsmerge shell.
/// Each test writes shard files, drives the binary over stdin and checks stdout.
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Helper to run shell commands and capture output
fn run_cli(shards: &[PathBuf], points: bool, commands: &str) -> String {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let shards: Vec<String> = shards.iter().map(|p| p.display().to_string()).collect();

    let mut child = Command::new(env!("CARGO_BIN_EXE_cli"))
        .env("TSMERGE_SHARDS", shards.join(","))
        .env("TSMERGE_POINTS", points.to_string())
        .env("TSMERGE_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    {
        let stdin = child.stdin.as_mut().expect("Failed to open stdin");
        stdin
            .write_all(commands.as_bytes())
            .expect("Failed to write to stdin");
        stdin.write_all(b"EXIT\n").expect("Failed to write EXIT");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn write_shard(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

/// Series names printed by `SERIES` with points off, in output order.
fn series_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|l| l.trim_start_matches("> "))
        .filter(|l| l.contains('=') && !l.starts_with(' '))
        .filter(|l| !l.starts_with("tsmerge") && !l.starts_with("ERR") && !l.starts_with("scanned_"))
        .map(str::to_string)
        .collect()
}

#[test]
fn test_banner_and_exit() {
    let output = run_cli(&[], true, "");

    assert!(output.contains("tsmerge started (shards=0, points=true)"));
    assert!(output.contains("bye"));
}

#[test]
fn test_merge_interleaves_shards() {
    let dir = tempdir().unwrap();
    let a = write_shard(dir.path(), "a.shard", "host=a 1=1\nhost=c 1=3\nhost=e 1=5\n");
    let b = write_shard(dir.path(), "b.shard", "host=b 1=2\nhost=d 1=4\n");

    let output = run_cli(&[a, b], false, "SERIES\n");

    assert_eq!(
        series_lines(&output),
        vec!["host=a", "host=b", "host=c", "host=d", "host=e"]
    );
    assert!(output.contains("(5 series)"));
}

#[test]
fn test_equal_series_from_each_shard() {
    let dir = tempdir().unwrap();
    let a = write_shard(dir.path(), "a.shard", "host=x 1=1\n");
    let b = write_shard(dir.path(), "b.shard", "host=x 2=2\n");

    let output = run_cli(&[a, b], true, "SERIES\n");

    assert_eq!(output.matches("host=x").count(), 2);
    assert!(output.contains("  1 1"));
    assert!(output.contains("  2 2"));
    assert!(output.contains("(2 series)"));
}

#[test]
fn test_many_shards_sorted() {
    let dir = tempdir().unwrap();
    let mut shards = Vec::new();
    for s in 0..6 {
        let mut body = String::new();
        for i in (s..60).step_by(6) {
            body.push_str(&format!("host=h{:03} 1={}i\n", i, i));
        }
        shards.push(write_shard(dir.path(), &format!("{}.shard", s), &body));
    }

    let output = run_cli(&shards, false, "SERIES\nSTATS\n");

    let got = series_lines(&output);
    let mut want = got.clone();
    want.sort();
    assert_eq!(got, want);
    assert_eq!(got.len(), 60);
    assert!(output.contains("(60 series)"));
    assert!(output.contains("scanned_values=60 scanned_bytes=960"));
}

#[test]
fn test_open_at_runtime() {
    let dir = tempdir().unwrap();
    let a = write_shard(dir.path(), "a.shard", "host=b 1=1\n");
    let b = write_shard(dir.path(), "b.shard", "host=a 1=1\n");

    let commands = format!(
        "SHARDS\nOPEN {} {}\nSHARDS\nSERIES\n",
        a.display(),
        b.display()
    );
    let output = run_cli(&[], false, &commands);

    assert!(output.contains("(empty)"));
    assert!(output.contains("OK (2 shards)"));
    assert!(output.contains("a.shard"));
    assert_eq!(series_lines(&output), vec!["host=a", "host=b"]);
}

#[test]
fn test_error_stops_merge() {
    let dir = tempdir().unwrap();
    let good = write_shard(dir.path(), "good.shard", "host=a 1=1\nhost=z 1=1\n");
    let bad = write_shard(dir.path(), "bad.shard", "host=b 1=1\nhost=c 1=oops\n");

    let output = run_cli(&[good, bad], false, "SERIES\n");

    assert_eq!(series_lines(&output), vec!["host=a", "host=b"]);
    assert!(output.contains("ERR merge failed"));
    assert!(output.contains("bad.shard:2"));
    assert!(!output.contains("host=z"));
}

#[test]
fn test_tag_values_dedup() {
    let dir = tempdir().unwrap();
    let a = write_shard(
        dir.path(),
        "a.shard",
        "host=a,region=west 1=1\nhost=b,region=east 1=1\n",
    );
    let b = write_shard(
        dir.path(),
        "b.shard",
        "host=c,region=east 1=1\nhost=d,region=north 1=1\n",
    );

    let output = run_cli(&[a, b], false, "TAGVALUES region\nTAGVALUES rack\n");

    let east = output.find("east").unwrap();
    let west = output.find("west").unwrap();
    let north = output.find("north").unwrap();
    assert!(east < west && west < north);
    assert_eq!(output.matches("east").count(), 1);
    assert!(output.contains("(3 values)"));
    assert!(output.contains("(empty)"));
}

#[test]
fn test_missing_shard() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.shard");

    let output = run_cli(&[missing], false, "SERIES\n");

    assert!(output.contains("ERR open failed"));
    assert!(output.contains("nope.shard"));
}

#[test]
fn test_unknown_command() {
    let output = run_cli(&[], false, "FROB\n");

    assert!(output.contains("unknown command: FROB"));
}

#[test]
fn test_commands_are_case_insensitive() {
    let dir = tempdir().unwrap();
    let a = write_shard(dir.path(), "a.shard", "host=a 1=1\n");

    let output = run_cli(&[a], false, "series\nstats\n");

    assert!(output.contains("(1 series)"));
    assert!(output.contains("scanned_values=1 scanned_bytes=16"));
}
