//! CLI Output Sanity gate: runs a bounded list of CLI probes against the
//! built `librarian` binary and checks exit codes, single-line errors for
//! unknown commands, and JSON parseability for `--json` variants.

use std::path::Path;
use std::process::Command;
use std::time::Instant;

use crate::gate::GateResult;

pub struct CliProbe<'a> {
    pub name: &'a str,
    pub args: &'a [&'a str],
    pub expect_exit_code: i32,
    pub expect_json: bool,
}

pub fn run(binary: &Path, workspace: &Path, probes: &[CliProbe<'_>], max_duration_ms: u64) -> anyhow::Result<GateResult> {
    let mut result = GateResult::new("cli_output_sanity");

    for probe in probes {
        let started = Instant::now();
        let output = Command::new(binary).args(probe.args).current_dir(workspace).output()?;

        let exit_code = output.status.code().unwrap_or(-1);
        if exit_code != probe.expect_exit_code {
            result.finding(
                probe.name,
                format!("exit code {exit_code}, expected {}", probe.expect_exit_code),
            );
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if exit_code != 0 && stderr.lines().count() > 1 {
            result.finding(probe.name, "expected a single-line error message on failure");
        }

        if probe.expect_json {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if serde_json::from_str::<serde_json::Value>(&stdout).is_err() {
                result.finding(probe.name, "stdout was not valid JSON for a --json invocation");
            }
        }

        result.record(probe.name, started.elapsed(), max_duration_ms);
    }

    Ok(result)
}
