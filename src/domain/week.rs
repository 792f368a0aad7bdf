// ==========================================
// 周课表排课引擎 - 周窗口
// ==========================================
// 周一至周日 7 个连续自然日, 只计算不存储
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::types::DAYS_PER_WEEK;

/// 周窗口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekWindow {
    pub start_date: NaiveDate, // 周一
    pub end_date: NaiveDate,   // 周日
}

impl WeekWindow {
    /// 由周一日期构造（调用方保证 monday 为周一）
    pub(crate) fn from_monday(monday: NaiveDate) -> Self {
        Self {
            start_date: monday,
            end_date: monday + Duration::days(DAYS_PER_WEEK as i64 - 1),
        }
    }

    /// 周内 7 天（周一在前）
    pub fn days(&self) -> [NaiveDate; DAYS_PER_WEEK] {
        let mut days = [self.start_date; DAYS_PER_WEEK];
        for (i, day) in days.iter_mut().enumerate() {
            *day = self.start_date + Duration::days(i as i64);
        }
        days
    }

    /// 日期在周内的下标（整数日差, 不依赖星期计算）
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start_date).num_days();
        if (0..DAYS_PER_WEEK as i64).contains(&offset) {
            Some(offset as usize)
        } else {
            None
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.day_index(date).is_some()
    }

    /// 上一周
    pub fn previous(&self) -> Self {
        Self::from_monday(self.start_date - Duration::days(DAYS_PER_WEEK as i64))
    }

    /// 下一周
    pub fn next(&self) -> Self {
        Self::from_monday(self.start_date + Duration::days(DAYS_PER_WEEK as i64))
    }
}
