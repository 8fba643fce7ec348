//! Integration tests driving the tracehash binary

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn tracehash(workspace: &std::path::Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tracehash"));
    cmd.current_dir(workspace)
        .env("XDG_CONFIG_HOME", workspace.join("xdg-config"))
        .env("HOME", workspace.join("home"))
        .env_remove("TRACEHASH_LOG")
        .env_remove("TRACEHASH_ALGORITHM");
    cmd
}

#[test]
fn test_interactive_loop_reads_stdin_until_eof() {
    let temp_dir = TempDir::new().unwrap();
    let data = temp_dir.path().join("d");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a"), "A").unwrap();
    fs::write(data.join("b"), "B").unwrap();
    let missing = temp_dir.path().join("missing");

    let mut child = tracehash(temp_dir.path())
        .args(["--algorithm", "checksum"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let stdin = child.stdin.as_mut().unwrap();
        writeln!(stdin, "{}", missing.display()).unwrap();
        writeln!(stdin, "{}", data.display()).unwrap();
    }
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains(&format!("checksum(\"{}\"): 131", data.display())));
    assert!(stdout.contains("enter a file or directory (ctrl+d to quit): "));
    assert!(stderr.contains(&format!("The file \"{}\" does not exist.", missing.display())));
}

#[test]
fn test_path_arguments_and_span_export() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("f.txt");
    fs::write(&file, "abc").unwrap();
    let spans = temp_dir.path().join("spans.jsonl");

    let output = tracehash(temp_dir.path())
        .arg("--spans-out")
        .arg(&spans)
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!(
            "sha256(\"{}\"): ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\n",
            file.display()
        )
    );

    let lines: Vec<serde_json::Value> = fs::read_to_string(&spans)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["operation"], "sha256.file");
    assert_eq!(lines[1]["operation"], "sha256.request");
    assert_eq!(lines[0]["parent_id"], lines[1]["span_id"]);
}

#[test]
fn test_missing_path_argument_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let output = tracehash(temp_dir.path())
        .arg(temp_dir.path().join("nope"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_workspace_config_selects_algorithm() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".tracehash.toml"), "algorithm = \"checksum\"\n").unwrap();
    fs::write(temp_dir.path().join("x"), "A").unwrap();

    let output = tracehash(temp_dir.path())
        .arg("--print-config")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("algorithm = \"checksum\""));

    let output = tracehash(temp_dir.path()).arg("x").output().unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout), "checksum(\"x\"): 65\n");
}
