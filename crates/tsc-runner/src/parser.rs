//! tsc output parser.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A diagnostic from tsc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TscDiagnostic {
    /// The file path, `None` for global diagnostics.
    pub file: Option<Utf8PathBuf>,
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// The TypeScript error code.
    pub code: String,
    /// The error message, including continuation lines.
    pub message: String,
    /// The severity.
    pub severity: DiagnosticSeverity,
}

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
    Message,
}

impl DiagnosticSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Message => "MESSAGE",
        }
    }
}

/// Parses captured tsc stdout into diagnostics.
///
/// Understands the unformatted `--pretty false` shape,
/// `file.ts(line,col): error TS1234: message`, the colon shape tsgo prints,
/// `file.ts:line:col - error TS1234: message`, and location-less global
/// diagnostics. Indented follow-up lines belong to the previous diagnostic.
pub fn parse_tsc_output(output: &str) -> Vec<TscDiagnostic> {
    let mut diagnostics: Vec<TscDiagnostic> = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(diag) = parse_diagnostic_line(line) {
            diagnostics.push(diag);
        } else if let Some(last) = diagnostics.last_mut() {
            last.message.push('\n');
            last.message.push_str(line.trim_end());
        }
    }

    diagnostics
}

/// Parses a single diagnostic line.
fn parse_diagnostic_line(line: &str) -> Option<TscDiagnostic> {
    if let Some(diag) = parse_paren_location(line) {
        return Some(diag);
    }
    if let Some(diag) = parse_colon_location(line) {
        return Some(diag);
    }
    let (severity, code, message) = parse_severity_and_message(line)?;
    Some(TscDiagnostic {
        file: None,
        line: 0,
        column: 0,
        code,
        message,
        severity,
    })
}

/// Format: file.ts(line,col): error TS1234: message
fn parse_paren_location(line: &str) -> Option<TscDiagnostic> {
    let close = line.find("): ")?;
    let open = line[..close].rfind('(')?;
    let file = &line[..open];
    if file.is_empty() {
        return None;
    }

    let (line_num, column) = line[open + 1..close].split_once(',')?;
    let line_num: u32 = line_num.trim().parse().ok()?;
    let column: u32 = column.trim().parse().ok()?;

    let (severity, code, message) = parse_severity_and_message(&line[close + 3..])?;
    Some(TscDiagnostic {
        file: Some(Utf8PathBuf::from(file)),
        line: line_num,
        column,
        code,
        message,
        severity,
    })
}

/// Format: file.ts:line:column - error TS1234: message
fn parse_colon_location(line: &str) -> Option<TscDiagnostic> {
    let (location, message_part) = line.split_once(" - ")?;

    let loc_parts: Vec<&str> = location.rsplitn(3, ':').collect();
    if loc_parts.len() < 3 {
        return None;
    }

    let column: u32 = loc_parts[0].parse().ok()?;
    let line_num: u32 = loc_parts[1].parse().ok()?;
    let file = loc_parts[2];

    let (severity, code, message) = parse_severity_and_message(message_part)?;
    Some(TscDiagnostic {
        file: Some(Utf8PathBuf::from(file)),
        line: line_num,
        column,
        code,
        message,
        severity,
    })
}

/// Parses `error TS1234: message`.
fn parse_severity_and_message(part: &str) -> Option<(DiagnosticSeverity, String, String)> {
    let (severity, rest) = if let Some(rest) = part.strip_prefix("error ") {
        (DiagnosticSeverity::Error, rest)
    } else if let Some(rest) = part.strip_prefix("warning ") {
        (DiagnosticSeverity::Warning, rest)
    } else if let Some(rest) = part.strip_prefix("message ") {
        (DiagnosticSeverity::Message, rest)
    } else {
        return None;
    };

    let rest = rest.trim_start();
    if !rest.starts_with("TS") {
        return None;
    }
    let (code, message) = rest.split_once(':')?;
    Some((severity, code.trim().to_string(), message.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_unformatted_line() {
        let line = "src/app.ts(10,5): error TS2322: Type 'string' is not assignable to type 'number'.";
        let diag = parse_diagnostic_line(line).unwrap();
        assert_eq!(diag.file.as_deref().map(|p| p.as_str()), Some("src/app.ts"));
        assert_eq!(diag.line, 10);
        assert_eq!(diag.column, 5);
        assert_eq!(diag.code, "TS2322");
        assert_eq!(
            diag.message,
            "Type 'string' is not assignable to type 'number'."
        );
        assert_eq!(diag.severity, DiagnosticSeverity::Error);
    }

    #[test]
    fn test_parse_path_with_parens() {
        let line = "app/(site)/page.tsx(3,1): error TS2304: Cannot find name 'foo'.";
        let diag = parse_diagnostic_line(line).unwrap();
        assert_eq!(
            diag.file.as_deref().map(|p| p.as_str()),
            Some("app/(site)/page.tsx")
        );
        assert_eq!(diag.line, 3);
        assert_eq!(diag.column, 1);
    }

    #[test]
    fn test_parse_colon_line() {
        let line = "src/App.tsx:10:5 - error TS2322: Type 'string' is not assignable to type 'number'";
        let diag = parse_diagnostic_line(line).unwrap();
        assert_eq!(diag.file.as_deref().map(|p| p.as_str()), Some("src/App.tsx"));
        assert_eq!(diag.line, 10);
        assert_eq!(diag.column, 5);
        assert_eq!(diag.code, "TS2322");
    }

    #[test]
    fn test_parse_windows_drive_colon_line() {
        let line = r"C:\proj\src\a.ts:2:7 - error TS1005: ';' expected.";
        let diag = parse_diagnostic_line(line).unwrap();
        assert_eq!(
            diag.file.as_deref().map(|p| p.as_str()),
            Some(r"C:\proj\src\a.ts")
        );
        assert_eq!(diag.line, 2);
        assert_eq!(diag.column, 7);
    }

    #[test]
    fn test_parse_global_diagnostic() {
        let line = "error TS5083: Cannot read file '/proj/tsconfig.json'.";
        let diag = parse_diagnostic_line(line).unwrap();
        assert_eq!(diag.file, None);
        assert_eq!(diag.code, "TS5083");
        assert_eq!(diag.line, 0);
    }

    #[test]
    fn test_continuation_lines_join_previous() {
        let output = "src/a.ts(1,7): error TS2322: Type '{ a: number; }' is not assignable to type 'B'.\n  Property 'b' is missing in type '{ a: number; }' but required in type 'B'.\nsrc/b.ts(4,2): error TS2304: Cannot find name 'x'.\n";
        let diagnostics = parse_tsc_output(output);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "Type '{ a: number; }' is not assignable to type 'B'.\n  Property 'b' is missing in type '{ a: number; }' but required in type 'B'."
        );
        assert_eq!(diagnostics[1].code, "TS2304");
    }

    #[test]
    fn test_non_diagnostic_text_is_ignored() {
        let output = "npm warn exec The following package was not found\n\nFound 0 errors.\n";
        assert!(parse_tsc_output(output).is_empty());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_tsc_output("").is_empty());
    }
}
