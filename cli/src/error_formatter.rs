use ariadne::{Color, Label, Report, ReportKind, Source};
use phonodrift::DriftError;

/// Format a DriftError with fancy terminal output using Ariadne
pub fn format_error(error: &DriftError) -> String {
    match error {
        DriftError::Parse(details) => {
            let mut output = Vec::new();

            let enhanced_message = format!(
                "Parse error: {} (in {} at column {})",
                details.message, details.source_id, details.span.col
            );

            let mut report =
                Report::build(ReportKind::Error, &details.source_id, details.span.start)
                    .with_message(enhanced_message)
                    .with_label(
                        Label::new((&details.source_id, details.span.start..details.span.end))
                            .with_message("")
                            .with_color(Color::Red),
                    );

            if let Some(suggestion) = &details.suggestion {
                report = report.with_help(suggestion);
            }

            match report.finish().write(
                (
                    &details.source_id,
                    Source::from(details.source_text.as_ref()),
                ),
                &mut output,
            ) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => format!("{}", error),
            }
        }
        DriftError::InvalidRule(msg) => format!("Invalid rule: {}", msg),
        DriftError::UnknownPhoneme { symbol, text } => format!(
            "Unknown phoneme '{}' in '{}'\n  Multi-character symbols are written |ts|",
            symbol, text
        ),
        DriftError::Form { word, reason } => {
            format!("Cannot build form of '{}': {}", word, reason)
        }
        DriftError::Engine(msg) => format!("Engine error: {}", msg),
    }
}
