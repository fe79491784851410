use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

use crate::model::{format_day, Entry};

fn dated_line_regex() -> &'static Regex {
    static DATED: OnceLock<Regex> = OnceLock::new();
    DATED.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}: (.*)$").unwrap())
}

pub struct Formatter;

impl Formatter {
    // block layout of the combined prompts file.
    pub fn to_block(data: &Entry) -> String {
        format!("[{}]\nPrompt: {}\nAnswer: {}\n",
            data.day(),
            data.prompt,
            data.answer
        )
    }

    // single dated line for the questions and answers logs.
    pub fn to_dated_line(date: NaiveDate, text: &str) -> String {
        format!("{}{}", Self::line_prefix(date), Self::single_line(text))
    }

    pub fn line_prefix(date: NaiveDate) -> String {
        format!("{}: ", format_day(date))
    }

    /// Text of a dated log line, `None` for lines without a `YYYY-MM-DD: ` prefix.
    pub fn strip_date_prefix(line: &str) -> Option<&str> {
        dated_line_regex()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Collapses a multi-line model reply so every logged record stays on one line.
    pub fn single_line(text: &str) -> String {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_block_layout() {
        let entry = Entry::new(date(), "Who?".to_string(), "Me.".to_string());
        assert_eq!(Formatter::to_block(&entry), "[2025-03-14]\nPrompt: Who?\nAnswer: Me.\n");
    }

    #[test]
    fn test_dated_line_flattens_newlines() {
        let line = Formatter::to_dated_line(date(), "The war ended in 1918.\n\n  It began in 1914.\n");
        assert_eq!(line, "2025-03-14: The war ended in 1918. It began in 1914.");
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_strip_date_prefix() {
        assert_eq!(Formatter::strip_date_prefix("2025-03-14: Who? Me: yes."), Some("Who? Me: yes."));
        assert_eq!(Formatter::strip_date_prefix("Note: undated line"), None);
        assert_eq!(Formatter::strip_date_prefix("[2025-03-14]"), None);
    }
}
