// ==========================================
// 周课表排课引擎 - 线格式参数校验
// ==========================================
// 职责: 将调用方提交的字符串/数字解析为领域类型
// 失败统一返回 ApiError::InvalidInput（400）, 不访问存储
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::{ClassType, Period, ScheduleView, SLOTS_PER_PERIOD};
use crate::engine::week_resolver::DateInput;

/// 未指定操作人时的默认值
pub const DEFAULT_ACTOR: &str = "system";

/// 解析日期
///
/// 接受:
/// - `YYYY-MM-DD`
/// - RFC 3339 时刻（如 `2025-03-09T17:00:00Z`）, 之后按日历偏移归一化
/// - 不带偏移的 `YYYY-MM-DDTHH:MM:SS`
pub fn parse_date_input(raw: &str) -> ApiResult<DateInput> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::InvalidInput("日期不能为空".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(DateInput::Day(date));
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(DateInput::Instant(instant));
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(DateInput::Local(local));
    }

    Err(ApiError::InvalidInput(format!(
        "日期格式错误（应为YYYY-MM-DD或RFC 3339）: {}",
        raw
    )))
}

/// 解析课段（Morning/Afternoon/Evening, 兼容 Sáng/Chiều/Tối）
pub fn parse_period(raw: &str) -> ApiResult<Period> {
    Period::parse(raw).ok_or_else(|| ApiError::InvalidInput(format!("无效的课段: {}", raw)))
}

/// 校验槽位下标
pub fn validate_slot_index(slot_index: i64) -> ApiResult<i32> {
    if (0..SLOTS_PER_PERIOD as i64).contains(&slot_index) {
        Ok(slot_index as i32)
    } else {
        Err(ApiError::InvalidInput(format!(
            "slot_index 必须为 0 或 1, 实际为 {}",
            slot_index
        )))
    }
}

/// 解析课程类型
pub fn parse_class_type(raw: &str) -> ApiResult<ClassType> {
    ClassType::parse(raw).ok_or_else(|| ApiError::InvalidInput(format!("无效的课程类型: {}", raw)))
}

/// 解析可选课程类型（空白视为未提供）
pub fn parse_optional_class_type(raw: Option<&str>) -> ApiResult<Option<ClassType>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => parse_class_type(s).map(Some),
        None => Ok(None),
    }
}

/// 解析视图过滤（all / lessons / exams）
pub fn parse_view(raw: &str) -> ApiResult<ScheduleView> {
    ScheduleView::parse(raw).ok_or_else(|| ApiError::InvalidInput(format!("无效的视图: {}", raw)))
}

/// 校验 ID 为正数
pub fn validate_id(field: &str, id: i64) -> ApiResult<i64> {
    if id > 0 {
        Ok(id)
    } else {
        Err(ApiError::InvalidInput(format!("{}必须为正整数: {}", field, id)))
    }
}

/// 规范化操作人（空白时为 "system"）
pub fn normalize_actor(actor: Option<&str>) -> String {
    actor
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_ACTOR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_input_variants() {
        let day = parse_date_input("2025-03-10").unwrap();
        assert_eq!(day, DateInput::Day(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));

        assert!(matches!(
            parse_date_input("2025-03-09T17:00:00Z").unwrap(),
            DateInput::Instant(_)
        ));
        assert!(matches!(
            parse_date_input("2025-03-09T17:00:00+07:00").unwrap(),
            DateInput::Instant(_)
        ));
        assert!(matches!(
            parse_date_input("2025-03-09T17:00:00").unwrap(),
            DateInput::Local(_)
        ));

        assert!(matches!(parse_date_input(""), Err(ApiError::InvalidInput(_))));
        assert!(matches!(parse_date_input("10/03/2025"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(parse_date_input("2025-02-30"), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(parse_period("Morning").unwrap(), Period::Morning);
        assert_eq!(parse_period("Tối").unwrap(), Period::Evening);
        assert!(parse_period("Night").is_err());

        assert_eq!(parse_class_type("exam").unwrap(), ClassType::Exam);
        assert_eq!(parse_optional_class_type(Some("  ")).unwrap(), None);
        assert!(parse_optional_class_type(Some("lecture")).is_err());

        assert_eq!(parse_view("exams").unwrap(), ScheduleView::Exams);
    }

    #[test]
    fn test_slot_and_id_validation() {
        assert_eq!(validate_slot_index(0).unwrap(), 0);
        assert_eq!(validate_slot_index(1).unwrap(), 1);
        assert!(validate_slot_index(2).is_err());
        assert!(validate_slot_index(-1).is_err());

        assert!(validate_id("course_id", 0).is_err());
        assert_eq!(validate_id("course_id", 5).unwrap(), 5);
    }

    #[test]
    fn test_normalize_actor() {
        assert_eq!(normalize_actor(None), "system");
        assert_eq!(normalize_actor(Some("  ")), "system");
        assert_eq!(normalize_actor(Some(" admin ")), "admin");
    }
}
