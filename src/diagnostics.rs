/// How loud a configuration diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Severity {
    #[strum(serialize = "ERROR")]
    Error,
    #[strum(serialize = "WARN")]
    Warn,
}

/// Fixed catalog of configuration problems the resolver can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum MessageKey {
    NoSuchDifficulty,
    NoAssociatedSettings,
    UndefinedCursorSpeed,
    UndefinedSweetSpot,
}

impl MessageKey {
    pub fn severity(self) -> Severity {
        match self {
            MessageKey::NoSuchDifficulty | MessageKey::NoAssociatedSettings => Severity::Error,
            MessageKey::UndefinedCursorSpeed | MessageKey::UndefinedSweetSpot => Severity::Warn,
        }
    }

    pub fn lines(self) -> &'static [&'static str] {
        match self {
            MessageKey::NoSuchDifficulty => &[
                "Selected difficulty does not exist.",
                "    Default will be used. Check your event for errors.",
            ],
            MessageKey::NoAssociatedSettings => &[
                "Selected difficulty has no associated settings!",
                "    Default will be used. Check script configuration for errors.",
            ],
            MessageKey::UndefinedCursorSpeed => &[
                "Selected settings lack cursor speed. Was this intentional?",
                "    Default will be used. Check script configuration for errors.",
            ],
            MessageKey::UndefinedSweetSpot => &[
                "Selected settings lack sweet spot width. Was this intentional?",
                "    Default will be used. Check script configuration for errors.",
            ],
        }
    }
}

/// Receiver of human-readable configuration warnings and errors
pub trait DiagnosticsSink {
    fn emit(&mut self, severity: Severity, key: MessageKey, lines: &[&str]);
}

/// Report a catalog message with its fixed severity and text
pub fn report(sink: &mut dyn DiagnosticsSink, key: MessageKey) {
    sink.emit(key.severity(), key, key.lines());
}

/// Production sink forwarding to the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    enabled: bool,
}

impl LogSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DiagnosticsSink for LogSink {
    fn emit(&mut self, severity: Severity, key: MessageKey, lines: &[&str]) {
        if !self.enabled {
            return;
        }

        let text = format_message(severity, lines);
        match severity {
            Severity::Error => log::error!(target: "sweetspot::diagnostics", "[{key}] {text}"),
            Severity::Warn => log::warn!(target: "sweetspot::diagnostics", "[{key}] {text}"),
        }
    }
}

/// One recorded emission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub key: MessageKey,
    pub lines: Vec<String>,
}

impl DiagnosticsSink for Vec<Diagnostic> {
    fn emit(&mut self, severity: Severity, key: MessageKey, lines: &[&str]) {
        self.push(Diagnostic {
            severity,
            key,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        });
    }
}

/// `"ERROR: first line\n    second line"`
pub fn format_message(severity: Severity, lines: &[&str]) -> String {
    let body = if lines.is_empty() {
        String::from("message missing text.")
    } else {
        lines.join("\n")
    };
    format!("{severity}: {body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_severities() {
        assert_eq!(MessageKey::NoSuchDifficulty.severity(), Severity::Error);
        assert_eq!(MessageKey::NoAssociatedSettings.severity(), Severity::Error);
        assert_eq!(MessageKey::UndefinedCursorSpeed.severity(), Severity::Warn);
        assert_eq!(MessageKey::UndefinedSweetSpot.severity(), Severity::Warn);
    }

    #[test]
    fn keys_display_as_snake_case() {
        assert_eq!(MessageKey::NoSuchDifficulty.to_string(), "no_such_difficulty");
        assert_eq!(
            MessageKey::NoAssociatedSettings.to_string(),
            "no_associated_settings"
        );
        assert_eq!(
            MessageKey::UndefinedCursorSpeed.to_string(),
            "undefined_cursor_speed"
        );
        assert_eq!(MessageKey::UndefinedSweetSpot.to_string(), "undefined_sweet_spot");
    }

    #[test]
    fn every_message_has_two_lines() {
        for key in [
            MessageKey::NoSuchDifficulty,
            MessageKey::NoAssociatedSettings,
            MessageKey::UndefinedCursorSpeed,
            MessageKey::UndefinedSweetSpot,
        ] {
            assert_eq!(key.lines().len(), 2, "{key}");
        }
    }

    #[test]
    fn format_prefixes_severity() {
        let text = format_message(Severity::Warn, &["a", "    b"]);
        assert_eq!(text, "WARN: a\n    b");
        assert_eq!(format_message(Severity::Error, &[]), "ERROR: message missing text.");
    }

    #[test]
    fn report_records_catalog_text() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        report(&mut sink, MessageKey::UndefinedSweetSpot);

        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].severity, Severity::Warn);
        assert_eq!(sink[0].key, MessageKey::UndefinedSweetSpot);
        assert_eq!(
            sink[0].lines[0],
            "Selected settings lack sweet spot width. Was this intentional?"
        );
    }

    #[test]
    fn disabled_log_sink_is_silent_noop() {
        let mut sink = LogSink::new(false);
        assert!(!sink.is_enabled());
        report(&mut sink, MessageKey::NoSuchDifficulty);
    }
}
