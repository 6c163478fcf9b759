//! Incident attribution: parses stack-trace frames from a handful of
//! common formats and maps each to the function(s) in the store whose
//! line range straddles it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use librarian_core::EntityId;
use librarian_store::Store;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub raw: String,
    pub file: PathBuf,
    pub line: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameAttribution {
    pub frame: Frame,
    pub function_ids: Vec<EntityId>,
}

/// Frame counts surfaced alongside an [`IncidentReport`], per the session
/// surface's incident-attribution contract: how many frames a trace yielded
/// before and after de-duplication, and how many of those resolved to a
/// function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSummary {
    pub parsed_frame_count: usize,
    pub normalized_frame_count: usize,
    pub attributed_frame_count: usize,
    pub unattributed_frame_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    pub frames: Vec<FrameAttribution>,
    pub all_function_ids: Vec<EntityId>,
    pub summary: IncidentSummary,
}

/// Parses `path:line` (bare or with a trailing function), `File "<path>",
/// line N, in <sym>` (Python), and `at sym (path:line:col)` (dotted/JS
/// style) frames. Rejects URLs and `node:` internals.
///
/// A dotted frame's `path:line` also matches the bare pattern, so a line
/// like `at doThing (path:line:col)` yields two parsed frames (one per
/// pattern); `normalize_and_dedup` collapses them back down once paths are
/// workspace-relative. Python frames are exclusive with the other two
/// patterns since their path is quoted and wouldn't re-match bare.
pub fn parse_frames(trace: &str) -> Vec<Frame> {
    let python = Regex::new(r#"File "([^"]+)", line (\d+)"#).unwrap();
    let dotted = Regex::new(r"at\s+\S+\s+\(([A-Za-z0-9_./\\-]+):(\d+)(?::\d+)?\)").unwrap();
    let bare_path_line = Regex::new(r"([A-Za-z0-9_./\\-]+):(\d+)(?::\d+)?").unwrap();

    let mut frames = Vec::new();
    for line in trace.lines() {
        if line.contains("://") || line.contains("node:") {
            continue;
        }
        if let Some(cap) = python.captures(line) {
            frames.push(Frame { raw: line.to_string(), file: PathBuf::from(&cap[1]), line: cap[2].parse().unwrap_or(0) });
            continue;
        }
        if let Some(cap) = dotted.captures(line) {
            frames.push(Frame { raw: line.to_string(), file: PathBuf::from(&cap[1]), line: cap[2].parse().unwrap_or(0) });
        }
        if let Some(cap) = bare_path_line.captures(line) {
            frames.push(Frame { raw: line.to_string(), file: PathBuf::from(&cap[1]), line: cap[2].parse().unwrap_or(0) });
        }
    }
    frames
}

fn normalize_against_workspace(workspace: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.strip_prefix(workspace).map(PathBuf::from).unwrap_or_else(|_| file.to_path_buf())
    } else {
        file.to_path_buf()
    }
}

/// Normalizes every frame's path against `workspace` and drops duplicates
/// that land on the same `(file, line)`, keeping the first occurrence.
fn normalize_and_dedup(workspace: &Path, frames: Vec<Frame>) -> Vec<Frame> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for frame in frames {
        let normalized = normalize_against_workspace(workspace, &frame.file);
        if seen.insert((normalized.clone(), frame.line)) {
            out.push(Frame { file: normalized, ..frame });
        }
    }
    out
}

pub fn attribute(workspace: &Path, trace: &str, store: &Store) -> anyhow::Result<IncidentReport> {
    let parsed = parse_frames(trace);
    let parsed_frame_count = parsed.len();

    let normalized = normalize_and_dedup(workspace, parsed);
    let normalized_frame_count = normalized.len();

    let mut frame_attributions = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut all_ids = Vec::new();

    for frame in normalized {
        let functions = store.functions_in_file(&frame.file)?;
        let matches: Vec<EntityId> = functions
            .iter()
            .filter(|f| f.start_line <= frame.line && frame.line <= f.end_line)
            .map(|f| f.id)
            .collect();
        for id in &matches {
            if seen_ids.insert(*id) {
                all_ids.push(*id);
            }
        }
        frame_attributions.push(FrameAttribution { frame, function_ids: matches });
    }

    let attributed_frame_count = frame_attributions.iter().filter(|f| !f.function_ids.is_empty()).count();
    let unattributed_frame_count = normalized_frame_count - attributed_frame_count;

    Ok(IncidentReport {
        frames: frame_attributions,
        all_function_ids: all_ids,
        summary: IncidentSummary { parsed_frame_count, normalized_frame_count, attributed_frame_count, unattributed_frame_count },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_python_and_bare_frames() {
        let trace = "File \"src/main.py\", line 12, in run\nsrc/lib.rs:42:5";
        let frames = parse_frames(trace);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].line, 12);
        assert_eq!(frames[1].line, 42);
    }

    #[test]
    fn rejects_urls_and_node_internals() {
        let trace = "at https://example.com/app.js:1:1\nat node:internal/process:5:10";
        assert!(parse_frames(trace).is_empty());
    }

    #[test]
    fn dotted_frame_parses_twice_then_dedups() {
        let trace = "at doThing (/repo/src/a.ts:12:3)\n  File \"/repo/src/a.ts\", line 30, in h\nsrc/b.ts:5";
        let parsed = parse_frames(trace);
        assert_eq!(parsed.len(), 4);

        let normalized = normalize_and_dedup(Path::new("/repo"), parsed);
        assert_eq!(normalized.len(), 3);
    }
}
