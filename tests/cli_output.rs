#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;
use tempfile::TempDir;

/// Writes serial = ranks, parallel1d = 1, parallel2d = 0.5 for the run, the way
/// `mpiexec -n <ranks> <exe> <input> <generations>` would hand over its arguments.
fn fake_life(dir: &TempDir) -> Result<String> {
    let out = dir.path().join("outputs");
    let script = format!(
        r#"echo "banner from the simulation"
ranks="$1"
name=$(basename "$3" .txt)
dir="{out}/$name"
mkdir -p "$dir"
echo "$ranks.000000" > "$dir/${{name}}_serial.txt"
echo "1.000000" > "$dir/${{name}}_parallel1d.txt"
echo "0.500000" > "$dir/${{name}}_parallel2d.txt"
"#,
        out = out.display(),
    );
    let path = dir.path().join("fake_life.sh");
    fs::write(&path, script)?;
    Ok(format!("sh {}", path.display()))
}

fn sweep(dir: &TempDir, config: &Path, extra: &[&str]) -> Result<Output> {
    let launcher = fake_life(dir)?;
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sweep"));
    for (key, _) in std::env::vars() {
        if key.starts_with("SWEEP_") {
            cmd.env_remove(key);
        }
    }
    cmd.arg("--config")
        .arg(config)
        .args(["--sizes", "10,15", "--workers", "4,8", "--no-plot"])
        .args(["--launcher", &launcher, "--executable", "life_mpi"])
        .arg("--input-dir")
        .arg(dir.path().join("inputs"))
        .arg("--output-dir")
        .arg(dir.path().join("outputs"))
        .args(extra);
    Ok(cmd.output()?)
}

#[test]
fn json_mode_keeps_stdout_machine_readable() -> Result<()> {
    let dir = TempDir::new()?;
    let rc = dir.path().join(".sweeprc");
    fs::write(&rc, "# empty\n")?;

    let output = sweep(&dir, &rc, &["--json"])?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value[0]["grid_size"], 10);
    assert_eq!(value[1]["grid_size"], 15);
    assert_eq!(value[0]["worker_counts"], serde_json::json!([4, 8]));
    assert_eq!(value[0]["speedup_1d"], serde_json::json!([5.0, 9.0]));

    // Progress lines and the simulation's own output still reach the user, on stderr.
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Finished size"));
    assert!(stderr.contains("banner from the simulation"));
    Ok(())
}

#[test]
fn unreadable_config_file_stops_before_sweeping() -> Result<()> {
    let dir = TempDir::new()?;
    let output = sweep(&dir, &dir.path().join("missing.sweeprc"), &["--json"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.sweeprc"));
    assert!(!dir.path().join("outputs").exists());
    Ok(())
}
