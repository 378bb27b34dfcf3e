//! Human readable parse errors.

use std::fmt;

use ariadne::Config;
use ariadne::Label;
use ariadne::Report;
use ariadne::ReportKind;
use ariadne::Source;

use crate::lexer::ParseError;

/// Renders parse errors against their source, one report per error.
pub fn render_errors<'src, T: fmt::Display + 'src>(
    errors: impl IntoIterator<Item = ParseError<'src, T>>,
    filename: &str,
    source: &str,
) -> String {
    let mut reports = Vec::new();
    for error in errors {
        let mut bytes = Vec::new();
        let written = Report::build(ReportKind::Error, (filename, error.span().into_range()))
            .with_config(Config::default().with_color(false))
            .with_message(error.to_string())
            .with_label(
                Label::new((filename, error.span().into_range()))
                    .with_message(error.reason().to_string()),
            )
            .finish()
            .write((filename, Source::from(source)), &mut bytes);
        match written {
            Ok(()) => reports.push(String::from_utf8_lossy(&bytes).into_owned()),
            Err(_) => reports.push(format!("{filename}:{:?}: {error}", error.span())),
        }
    }
    reports.join("\n")
}
