//! Presentation helpers shared by the CLI and the export.

use std::sync::LazyLock;

use chatscope_types::config::DateRange;
use chrono::{Days, Months, NaiveDate};
use regex::Regex;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>?").expect("markup pattern is valid"));

/// Render whole seconds as `"Nm Ss"`, or `"Ss"` under a minute.
pub fn format_duration(seconds: u64) -> String {
    let mins = seconds / 60;
    let secs = seconds % 60;
    if mins > 0 {
        format!("{mins}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Remove `<...>` tags from message content. An unterminated `<` at the
/// end of the text is dropped along with everything after it.
pub fn strip_markup(content: &str) -> String {
    MARKUP_TAG.replace_all(content, "").into_owned()
}

/// Inclusive reporting window ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    pub fn new(range: DateRange, today: NaiveDate) -> Self {
        let start = match range {
            DateRange::Last7Days => today.checked_sub_days(Days::new(7)),
            DateRange::Last30Days => today.checked_sub_days(Days::new(30)),
            DateRange::Last90Days => today.checked_sub_days(Days::new(90)),
            DateRange::LastYear => today.checked_sub_months(Months::new(12)),
        }
        .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    pub fn title(&self) -> String {
        format!(
            "Conversations From {} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    pub fn export_file_name(&self) -> String {
        format!(
            "completed-conversations-{}-to-{}.json",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(90), "1m 30s");
        assert_eq!(format_duration(3725), "62m 5s");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_markup("no tags"), "no tags");
        assert_eq!(strip_markup("a <br/> b"), "a  b");
        assert_eq!(strip_markup("trailing <open"), "trailing ");
    }

    #[test]
    fn test_report_window_ranges() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let w = ReportWindow::new(DateRange::Last7Days, today);
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2025, 6, 23).unwrap());
        let w = ReportWindow::new(DateRange::Last30Days, today);
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
        let w = ReportWindow::new(DateRange::Last90Days, today);
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        let w = ReportWindow::new(DateRange::LastYear, today);
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());
        assert_eq!(w.end, today);
    }

    #[test]
    fn test_last_year_from_leap_day_clamps() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let w = ReportWindow::new(DateRange::LastYear, today);
        assert_eq!(w.start, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_title_and_file_name() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        let w = ReportWindow::new(DateRange::Last7Days, today);
        assert_eq!(w.title(), "Conversations From 2025-01-01 to 2025-01-08");
        assert_eq!(
            w.export_file_name(),
            "completed-conversations-2025-01-01-to-2025-01-08.json"
        );
    }
}
