//! Console tracer for `aura parse --trace`.
//!
//! Collects one line per parse step. Colors are applied with `owo-colors`
//! unless disabled, so the same tracer serves terminals and plain logs.

use aura_core::{AppliedOperation, ChordError, ChordResult, ModifierRule, ParseObserver};
use owo_colors::{OwoColorize, Style};

/// [`ParseObserver`] that renders each step as a human-readable line.
#[derive(Debug, Clone, Default)]
pub struct ConsoleTracer {
    color: bool,
    lines: Vec<String>,
}

impl ConsoleTracer {
    pub fn new(color: bool) -> Self {
        ConsoleTracer {
            color,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn push(&mut self, label: &str, style: Style, message: String) {
        let label = self.paint(&format!("{:<9}", label), style);
        self.lines.push(format!("{} {}", label, message));
    }
}

impl ParseObserver for ConsoleTracer {
    fn on_root(&mut self, root: &str, suffix: &str) {
        self.push("root", Style::new().cyan().bold(), format!("{} + '{}'", root, suffix));
    }

    fn on_modifier(&mut self, alias: &str, rule: &ModifierRule) {
        let detail = if alias == rule.symbol() {
            format!("{} ({})", alias, rule.category)
        } else {
            format!("{} ({}, alias of {})", alias, rule.category, rule.symbol())
        };
        self.push("modifier", Style::new().blue(), detail);
    }

    fn on_operation(&mut self, applied: &AppliedOperation) {
        let show = |value: Option<i32>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
        let mut message = format!(
            "{}: {}  [{} -> {}]",
            applied.modifier,
            applied.operation,
            show(applied.before),
            show(applied.after)
        );
        if !applied.backfilled.is_empty() {
            let roles: Vec<String> = applied.backfilled.iter().map(|r| r.to_string()).collect();
            message.push_str(&format!(" backfilled {}", roles.join(", ")));
        }
        self.push("op", Style::new().magenta(), message);
    }

    fn on_result(&mut self, result: &ChordResult) {
        let message = format!(
            "{}  ({})",
            result.formatted.display,
            result.formatted.names.join(" ")
        );
        self.push("result", Style::new().green().bold(), message);
    }

    fn on_error(&mut self, error: &ChordError) {
        self.push("error", Style::new().red().bold(), error.to_string());
    }
}
