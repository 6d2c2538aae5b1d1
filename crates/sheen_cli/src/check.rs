//! `sheen check`: parse a style sheet and report diagnostics

use anyhow::Result;
use sheen_style::{EngineConfig, ParseError, Severity, Stylesheet};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub rules: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckSummary {
    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}

/// One diagnostic per line, compiler style
pub fn write_diagnostic(out: &mut impl Write, name: &str, err: &ParseError) -> Result<()> {
    write!(
        out,
        "{}:{}:{}: {}: {}",
        name, err.line, err.column, err.severity, err.message
    )?;
    if !err.fragment.is_empty() && err.severity == Severity::Error {
        write!(out, " near `{}`", err.fragment.trim())?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn run(
    name: &str,
    css: &str,
    config: &EngineConfig,
    out: &mut impl Write,
) -> Result<CheckSummary> {
    let result = Stylesheet::parse_with_policy(css, config.unsupported_properties);
    result.log_diagnostics();

    for err in &result.errors {
        write_diagnostic(out, name, err)?;
    }

    let summary = CheckSummary {
        rules: result.stylesheet.len(),
        errors: result.errors_only().count(),
        warnings: result.warnings_only().count(),
    };
    writeln!(
        out,
        "{}: {} rule(s), {} error(s), {} warning(s)",
        name, summary.rules, summary.errors, summary.warnings
    )?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sheen_style::UnsupportedPropertyPolicy;

    fn check(css: &str, config: &EngineConfig) -> (CheckSummary, String) {
        let mut out = Vec::new();
        let summary = run("app.qss", css, config, &mut out).unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_clean_sheet() {
        let (summary, text) = check(
            "QPushButton { color: red; }\nQPushButton:hover { color: blue; }",
            &EngineConfig::default(),
        );
        assert!(summary.is_clean());
        assert_eq!(text, "app.qss: 2 rule(s), 0 error(s), 0 warning(s)\n");
    }

    #[test]
    fn test_reports_errors_and_warnings() {
        let (summary, text) = check(
            "QLabel { color: red; }\nButton{{bad}}\nQFrame { glow: 3px; }",
            &EngineConfig::default(),
        );
        assert!(!summary.is_clean());
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert!(text.contains("app.qss:2:"));
        assert!(text.contains(": error: "));
        assert!(text.contains(": warning: Unsupported property 'glow'"));
    }

    #[test]
    fn test_ignore_policy_silences_unknown_properties() {
        let config = EngineConfig {
            unsupported_properties: UnsupportedPropertyPolicy::Ignore,
            ..EngineConfig::default()
        };
        let (summary, _) = check("QLabel { glow: 3px; }", &config);
        assert_eq!(summary.warnings, 0);
        assert_eq!(summary.rules, 1);
    }
}
