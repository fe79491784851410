use chrono::NaiveDate;

// one question/answer pair produced by a single run of the daily job.

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub date: NaiveDate,
    pub prompt: String,
    pub answer: String
}

impl Entry {
    pub fn new(date: NaiveDate, prompt: String, answer: String) -> Self {
        Entry {
            date,
            prompt,
            answer
        }
    }

    pub fn day(&self) -> String {
        format_day(self.date)
    }
}

pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_is_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let entry = Entry::new(date, "q".to_string(), "a".to_string());
        assert_eq!(entry.day(), "2025-01-09");
    }
}
