//! In-memory history of the equations a run visited, and its Graphviz export.
//!
//! The solver only appends here; nothing it decides depends on the trace. Once `limit` entries are
//! stored further entries are counted and dropped.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::equation::Equation;

/// Default maximum number of stored trace entries.
pub const DEFAULT_TRACE_LIMIT: usize = 300;

const GRAPH_NAME: &str = "recompression";
const REJECTED_COLOR: &str = "red";

/// One visited equation and the step that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub equation: Equation,
    pub label: String,
    /// A tentative rewrite the solver discarded.
    pub rejected: bool,
}

#[derive(Debug, Clone)]
pub struct Trace {
    entries: Vec<TraceEntry>,
    limit: usize,
    dropped: usize,
    /// Index of the last accepted entry; rejected branches hang off it.
    last_accepted: Option<usize>,
}

impl Default for Trace {
    fn default() -> Self {
        Trace::new(DEFAULT_TRACE_LIMIT)
    }
}

impl Trace {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Trace { entries: Vec::new(), limit, dropped: 0, last_accepted: None }
    }

    /// Append an accepted step. A repeat of the last accepted equation is skipped.
    pub fn record(&mut self, equation: &Equation, label: impl Into<String>) {
        if self.is_repeat(equation) {
            return;
        }
        if self.push(equation, label.into(), false) {
            self.last_accepted = Some(self.entries.len() - 1);
        }
    }

    /// Append a discarded branch.
    pub fn record_rejected(&mut self, equation: &Equation, label: impl Into<String>) {
        if !self.is_repeat(equation) {
            self.push(equation, label.into(), true);
        }
    }

    fn is_repeat(&self, equation: &Equation) -> bool {
        self.last_accepted.is_some_and(|i| &self.entries[i].equation == equation)
    }

    fn push(&mut self, equation: &Equation, label: String, rejected: bool) -> bool {
        if self.entries.len() >= self.limit {
            self.dropped += 1;
            return false;
        }
        self.entries.push(TraceEntry { equation: equation.clone(), label, rejected });
        true
    }

    #[must_use]
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that did not fit under the limit.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Render as a Graphviz digraph.
    ///
    /// Nodes are equations, edges go from the last accepted equation to the next step, and rejected
    /// branches are drawn in red.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        // NB: writing to a String never fails
        let _ = writeln!(out, "digraph {GRAPH_NAME} {{");

        let mut previous: Option<usize> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            let color = if entry.rejected { format!(", color={REJECTED_COLOR}") } else { String::new() };
            let _ = writeln!(out, "    n{i} [label=\"{}\"{color}];", escape(&entry.equation.to_string()));
            if let Some(p) = previous {
                let _ = writeln!(out, "    n{p} -> n{i} [label=\"{}\"{color}];", escape(&entry.label));
            }
            if !entry.rejected {
                previous = Some(i);
            }
        }

        out.push_str("}\n");
        out
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write the trace to `<dir>/<millis>.dot`, creating `dir` if needed.
///
/// # Errors
/// Any I/O error from creating the directory or writing the file.
pub fn write_dot(trace: &Trace, dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or(0);
    let path = dir.join(format!("{millis}.dot"));
    fs::write(&path, trace.to_dot())?;
    Ok(path)
}

/// Rasterize a DOT file with the external `dot` tool.
///
/// # Errors
/// If `dot` cannot be spawned or exits unsuccessfully.
pub fn render_png(dot_path: &Path, png_path: &Path) -> io::Result<()> {
    let status = Command::new("dot").arg("-Tpng").arg(dot_path).arg("-o").arg(png_path).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::other(format!("dot exited with {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(s: &str) -> Equation {
        s.parse().unwrap()
    }

    #[test]
    fn test_record_skips_repeats() {
        let mut trace = Trace::new(10);
        trace.record(&eq("Ax = AB"), "start");
        trace.record(&eq("Ax = AB"), "shorten");
        trace.record(&eq("x = B"), "shorten");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.entries()[1].label, "shorten");
    }

    #[test]
    fn test_limit_drops_silently() {
        let mut trace = Trace::new(2);
        trace.record(&eq("A = x"), "a");
        trace.record(&eq("B = x"), "b");
        trace.record(&eq("C = x"), "c");
        trace.record_rejected(&eq("D = x"), "d");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.dropped(), 2);
    }

    #[test]
    fn test_zero_limit_disables() {
        let mut trace = Trace::new(0);
        trace.record(&eq("A = x"), "a");
        assert!(trace.is_empty());
    }

    #[test]
    fn test_dot_marks_rejected_branches() {
        let mut trace = Trace::new(10);
        trace.record(&eq("Ax = yB"), "start");
        trace.record_rejected(&eq("AAx = yB"), "pop");
        trace.record(&eq("AxB = yB"), "pop");

        let dot = trace.to_dot();
        assert!(dot.starts_with("digraph recompression {"));
        assert!(dot.contains("n1 [label=\"CONST(A) CONST(A) VAR(x) = VAR(y) CONST(B)\", color=red];"));
        assert!(dot.contains("n0 -> n1 [label=\"pop\", color=red];"));
        // the accepted step hangs off the start, not the rejected branch
        assert!(dot.contains("n0 -> n2 [label=\"pop\"];"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
