//! Error rendering using ariadne
//!
//! Diagnostics carry byte spans only; the renderer needs the source text the
//! trees were parsed from to show snippets and labels.

use crate::{Diagnostic, Error};
use ariadne::{ColorGenerator, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<input>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use eml::{BinaryOp, Compiler, CompilerOptions, Expr, render_error};
///
/// let source = "1 + true";
/// let expr = Expr::binary(
///     BinaryOp::Add,
///     Expr::literal(1.0).with_span(0..1),
///     Expr::literal(true).with_span(4..8),
/// )
/// .with_span(0..8);
///
/// let mut compiler = Compiler::with_source(CompilerOptions::default(), source);
/// if let Err(e) = compiler.compile(&expr) {
///     render_error(&e, source);
/// }
/// ```
pub fn render_error(error: &Error, source: &str) {
    render_error_to_writer(error, source, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, source: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, source, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes
///
/// Same as `render_error_to_string`, but the output is easier to compare in
/// tests.
pub fn render_error_to_string_no_color(error: &Error, source: &str) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, source, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    source: &str,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Compilation { diagnostics } => {
            render_diagnostics(source, diagnostics, writer, use_color)
        }
        // Encoding limits have no meaningful source location.
        Error::Codegen(err) => writeln!(writer, "{}", err.to_diagnostic()),
    }
}

fn render_diagnostics(
    source: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next(); // Skip the first color.

        // Spans produced without source text may point past its end.
        let span = clamp(diag.span.0.clone(), source);

        // Spans are byte offsets, not char offsets.
        let config = ariadne::Config::default()
            .with_color(use_color)
            .with_index_type(IndexType::Byte);

        let mut report = Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
            .with_message(&diag.message)
            .with_config(config);

        if let Some(code) = &diag.code {
            report = report.with_code(code);
        }

        report = report.with_label(
            Label::new((SOURCE_ID, span))
                .with_message(&diag.message)
                .with_color(colors.next()),
        );

        if let Some(help) = &diag.help {
            report = report.with_note(help);
        }

        report
            .finish()
            .write((SOURCE_ID, Source::from(source)), &mut *writer)?;
    }

    Ok(())
}

/// Fit `span` inside `source`, widening it to char boundaries.
fn clamp(span: std::ops::Range<usize>, source: &str) -> std::ops::Range<usize> {
    let mut start = span.start.min(source.len());
    while !source.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = span.end.clamp(start, source.len());
    while !source.is_char_boundary(end) {
        end += 1;
    }
    start..end
}
