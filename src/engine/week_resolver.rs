// ==========================================
// 周课表排课引擎 - 周窗口解析
// ==========================================
// 任意参考日期 -> 所在周的周一至周日
// 周日属于以 6 天前的周一开始的那一周
// ==========================================

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime};

use crate::domain::week::WeekWindow;

/// 解析参考日期所在的周窗口
///
/// 同一周内的任意日期得到相同结果; 无副作用、不会失败
pub fn resolve_week(reference_date: NaiveDate) -> WeekWindow {
    let offset = reference_date.weekday().num_days_from_monday() as i64;
    WeekWindow::from_monday(reference_date - Duration::days(offset))
}

// ==========================================
// DateInput - 调用方提交的日期
// ==========================================
// 调用方可能提交带时区的时刻（经 UTC 转换后存在差一天的风险）,
// 入库/比较前必须归一化为日历日
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// 日历日 (YYYY-MM-DD)
    Day(NaiveDate),
    /// 带偏移的时刻 (RFC 3339)
    Instant(DateTime<FixedOffset>),
    /// 不带偏移的本地时刻, 视为日历偏移下的墙上时间
    Local(NaiveDateTime),
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Day(date)
    }
}

/// 归一化为日历日
///
/// # 参数
/// - input: 调用方提交的日期
/// - calendar_offset: 课表所在地的 UTC 偏移
pub fn normalize_calendar_day(input: DateInput, calendar_offset: FixedOffset) -> NaiveDate {
    match input {
        DateInput::Day(date) => date,
        DateInput::Instant(instant) => instant.with_timezone(&calendar_offset).date_naive(),
        DateInput::Local(local) => local.date(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_every_day_of_week_resolves_identically() {
        let expected = resolve_week(d(2025, 3, 10));
        assert_eq!(expected.start_date, d(2025, 3, 10));
        assert_eq!(expected.end_date, d(2025, 3, 16));

        for offset in 0..7 {
            let date = d(2025, 3, 10) + Duration::days(offset);
            assert_eq!(resolve_week(date), expected, "date={}", date);
        }
    }

    #[test]
    fn test_sunday_belongs_to_previous_monday() {
        let week = resolve_week(d(2025, 3, 16));
        assert_eq!(week.start_date, d(2025, 3, 10));
        assert_eq!(week.day_index(d(2025, 3, 16)), Some(6));
    }

    #[test]
    fn test_start_is_monday_end_is_sunday_across_year() {
        let mut date = d(2024, 12, 20);
        while date <= d(2025, 1, 20) {
            let week = resolve_week(date);
            assert_eq!(week.start_date.weekday(), Weekday::Mon);
            assert_eq!(week.end_date.weekday(), Weekday::Sun);
            assert!(week.contains(date));
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_normalize_instant_uses_calendar_offset() {
        let vn = FixedOffset::east_opt(7 * 3600).unwrap();
        // 越南时间 2025-03-10 00:00 在 UTC 下仍是 3 月 9 日
        let instant = DateTime::parse_from_rfc3339("2025-03-09T17:00:00Z").unwrap();
        assert_eq!(normalize_calendar_day(DateInput::Instant(instant), vn), d(2025, 3, 10));

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(normalize_calendar_day(DateInput::Instant(instant), utc), d(2025, 3, 9));
    }

    #[test]
    fn test_normalize_day_and_local() {
        let vn = FixedOffset::east_opt(7 * 3600).unwrap();
        assert_eq!(normalize_calendar_day(d(2025, 3, 16).into(), vn), d(2025, 3, 16));

        let local = d(2025, 3, 16).and_hms_opt(23, 30, 0).unwrap();
        assert_eq!(normalize_calendar_day(DateInput::Local(local), vn), d(2025, 3, 16));
    }
}
