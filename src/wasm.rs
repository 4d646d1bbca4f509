use crate::log::init_logger;
use crate::solver::{solve_input, SolveOptions, SolverError};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

/// Structured error information for JavaScript consumers
#[derive(serde::Serialize)]
struct WasmError {
    /// Error code (e.g., "E009", "S004")
    code: String,
    /// Display message
    message: String,
    /// Short description of error type
    description: String,
    /// Detailed explanation
    details: String,
    /// Optional helpful suggestion
    #[serde(skip_serializing_if = "Option::is_none")]
    help: Option<String>,
}

impl From<SolverError> for WasmError {
    fn from(e: SolverError) -> Self {
        // For ParseFailure, surface the nested ParseError instead
        match &e {
            SolverError::ParseFailure(pe) => WasmError {
                code: pe.code().to_string(),
                message: pe.to_string(),
                description: pe.description().to_string(),
                details: pe.details().to_string(),
                help: pe.help().map(ToString::to_string),
            },
            _ => WasmError {
                code: e.code().to_string(),
                message: e.to_string(),
                description: e.description().to_string(),
                details: e.details().to_string(),
                help: e.help().map(ToString::to_string),
            },
        }
    }
}

impl From<WasmError> for JsValue {
    fn from(e: WasmError) -> Self {
        let mut msg = format!("Error {}: {}", e.code, e.message);

        if !e.details.is_empty() {
            msg.push_str(&format!("\n\n{}", e.details));
        }

        if let Some(help) = e.help {
            msg.push_str(&format!("\n\nSuggestion: {help}"));
        }

        js_sys::Error::new(&msg).into()
    }
}

/// Validate all internal regex patterns compile successfully.
///
/// Forces `LazyLock` initialization of all static regexes so any compilation
/// errors occur at startup rather than on first user query.
///
/// ## IMPORTANT: Adding a new regex?
/// If you add a new `LazyLock<Regex>` anywhere in the codebase, you MUST add it here.
fn validate_internal_regexes() {
    let _ = &*crate::parser::NAME_RE;
    log::debug!("Internal regex patterns validated successfully");
}

/// Initialize logging and validation with the specified debug setting.
///
/// This function must be called from JavaScript after the WASM module loads.
#[wasm_bindgen]
pub fn initialize(debug_enabled: bool) {
    // 1. Set up panic hook
    console_error_panic_hook::set_once();

    // 2. Validate internal regexes early
    validate_internal_regexes();

    // 3. Initialize logging with the provided debug setting
    init_logger(debug_enabled);

    log::info!("WASM module initialized");
}

#[derive(serde::Serialize)]
struct WasmSolveResult {
    solved: bool,
    status: String,
    assignment: BTreeMap<String, String>,
    rounds: usize,
    trace_dot: String,
}

/// JS entry: (letters: string, variables: string, equation: string, round_cap?: number)
/// returns `{ solved, status, assignment, rounds, trace_dot }`
#[wasm_bindgen]
pub fn solve_equation_wasm(
    letters: &str,
    variables: &str,
    equation: &str,
    round_cap: Option<usize>,
) -> Result<JsValue, JsValue> {
    let options = SolveOptions { round_cap, ..SolveOptions::default() };
    let result = solve_input(letters, variables, equation, &options).map_err(WasmError::from)?;

    let wasm_result = WasmSolveResult {
        solved: result.solved,
        status: result.status.to_string(),
        assignment: result.assignment_strings(),
        rounds: result.rounds,
        trace_dot: result.trace.to_dot(),
    };

    serde_wasm_bindgen::to_value(&wasm_result).map_err(|e| {
        WasmError {
            code: "WASM001".to_string(),
            message: format!("serialization failed: {e}"),
            description: "Failed to serialize result".to_string(),
            details: "The solver result could not be converted to JavaScript format.".to_string(),
            help: Some("This is an internal error. Please report this issue.".to_string()),
        }
        .into()
    })
}

/// Generate a debug report users can copy/paste when reporting issues.
#[wasm_bindgen]
pub fn get_debug_info(
    letters: &str,
    variables: &str,
    equation: &str,
    error_message: &str,
    round_cap: Option<usize>,
) -> String {
    use std::fmt::Write;
    let mut report = String::new();

    // NB: writing to a String never fails
    let _ = writeln!(&mut report, "=== WORDEQ DEBUG REPORT ===");
    let _ = writeln!(&mut report, "Version: {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_HASH_FULL"));
    let _ = writeln!(
        &mut report,
        "Generated: {}",
        js_sys::Date::new_0().to_iso_string().as_string().unwrap_or_else(|| "unknown".to_string())
    );
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Error");
    let _ = writeln!(&mut report, "{error_message}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Input");
    let _ = writeln!(&mut report, "Letters: {letters}");
    let _ = writeln!(&mut report, "Variables: {variables}");
    let _ = writeln!(&mut report, "Equation: {equation}");
    let cap = round_cap.map_or_else(|| "default".to_string(), |c| c.to_string());
    let _ = writeln!(&mut report, "Round Cap: {cap}");
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "## Environment");
    if let Some(window) = web_sys::window() {
        if let Ok(user_agent) = window.navigator().user_agent() {
            let _ = writeln!(&mut report, "User Agent: {user_agent}");
        }
        let _ = writeln!(
            &mut report,
            "Location: {}",
            window.location().href().unwrap_or_else(|_| "unknown".to_string())
        );
    }
    let _ = writeln!(&mut report);

    let _ = writeln!(&mut report, "=== END DEBUG REPORT ===");

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_debug_info_structure() {
        let report = get_debug_info("{A,B}", "{x,y}", "Ax = yB", "solver error", Some(8));
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "=== WORDEQ DEBUG REPORT ===");
        assert!(lines[1].starts_with(&format!("Version: {}", env!("CARGO_PKG_VERSION"))));
        assert!(lines[2].starts_with("Generated: "));
        assert_eq!(lines[4], "## Error");
        assert_eq!(lines[5], "solver error");

        let input_idx = lines.iter().position(|&l| l == "## Input").unwrap();
        assert_eq!(lines[input_idx + 1], "Letters: {A,B}");
        assert_eq!(lines[input_idx + 2], "Variables: {x,y}");
        assert_eq!(lines[input_idx + 3], "Equation: Ax = yB");
        assert_eq!(lines[input_idx + 4], "Round Cap: 8");
        assert_eq!(lines.last().copied(), Some("=== END DEBUG REPORT ==="));
    }

    #[test]
    fn test_get_debug_info_default_cap() {
        let report = get_debug_info("{}", "{}", " = ", "", None);
        assert!(report.contains("Round Cap: default"));
    }

    #[test]
    fn test_parse_failure_surfaces_inner_code() {
        let err = solve_input("{A", "{x}", "A = x", &SolveOptions::default()).unwrap_err();
        let wasm_err = WasmError::from(err);
        assert_eq!(wasm_err.code, "E004");
        assert!(wasm_err.help.is_some());
    }

    /// Ensure all `LazyLock<Regex>` statics are validated at startup. (fail fast)
    ///
    /// Current regexes: `crate::parser::NAME_RE`.
    #[test]
    fn test_all_regexes_validated() {
        validate_internal_regexes();
    }
}
