// ==========================================
// 周课表排课引擎 - API 层
// ==========================================
// 职责: 线格式校验、调用引擎、记录操作日志、错误映射
// ==========================================

pub mod error;
pub mod schedule_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use schedule_api::{
    AssignRequest, DayHeader, LegendItem, ScheduleApi, UpdateRequest, WeekScheduleResponse,
};
