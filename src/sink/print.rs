use crate::config;
use crate::core::{Record, Result, Sink};
use async_trait::async_trait;
use serde_json::Value;

/// Renders canonical records as an aligned table on stdout. Purely
/// presentational; rows are buffered and printed on flush.
pub struct PrintSink {
    columns: Vec<String>,
    max_col_width: usize,
    rows: Vec<Vec<String>>,
}

impl PrintSink {
    pub fn new() -> Self {
        Self {
            columns: config::CANONICAL_COLUMNS
                .iter()
                .map(|c| c.to_string())
                .collect(),
            max_col_width: 25,
            rows: Vec::new(),
        }
    }

    pub fn with_max_col_width(mut self, width: usize) -> Self {
        self.max_col_width = width;
        self
    }

    fn cell(value: Option<&Value>) -> String {
        value
            .map(|v| match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .unwrap_or_default()
    }

    fn clip(text: &str, width: usize) -> String {
        if text.chars().count() <= width {
            text.to_string()
        } else if width <= 3 {
            "...".chars().take(width).collect()
        } else {
            let kept: String = text.chars().take(width - 3).collect();
            format!("{kept}...")
        }
    }

    fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let cell_max = self
                    .rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .max()
                    .unwrap_or(0);
                header.chars().count().max(cell_max).min(self.max_col_width)
            })
            .collect();

        let mut out = String::new();
        let header_line: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", Self::clip(h, *w), w = *w))
            .collect();
        out.push_str(header_line.join("  ").trim_end());
        out.push('\n');

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<w$}", Self::clip(cell, *w), w = *w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

impl Default for PrintSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sink for PrintSink {
    async fn write(&mut self, record: Record) -> Result<()> {
        let row = self
            .columns
            .iter()
            .map(|c| Self::cell(record.get_field(c)))
            .collect();
        self.rows.push(row);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        if !self.rows.is_empty() {
            use std::io::Write;
            std::io::stdout().write_all(self.render().as_bytes())?;
            self.rows.clear();
        }
        Ok(())
    }
}
