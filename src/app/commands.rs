// ==========================================
// 周课表排课引擎 - 命令层
// ==========================================
// 职责: 前端/CLI 的 JSON 字符串边界
// 约定: 成功返回 JSON 字符串, 失败返回 ErrorResponse 的 JSON 字符串
// ==========================================

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::{AssignRequest, UpdateRequest};
use crate::app::state::AppState;
use crate::domain::course::CourseInfo;

// ==========================================
// 公共工具：错误映射、序列化
// ==========================================

/// 错误响应（返回给前端）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// HTTP 语义状态码
    pub status: u16,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串
pub fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: err.code().to_string(),
        status: err.status_code(),
        message: err.to_string(),
        details: match &err {
            ApiError::Conflict {
                address,
                occupant_id,
            } => Some(serde_json::json!({
                "address": address,
                "occupant_id": occupant_id,
            })),
            _ => None,
        },
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}

fn parse_request<T: for<'de> Deserialize<'de>>(payload: &str) -> Result<T, String> {
    serde_json::from_str(payload).map_err(|e| {
        map_api_error(ApiError::InvalidInput(format!("请求体解析失败: {}", e)))
    })
}

// ==========================================
// 周视图相关命令
// ==========================================

/// 查询周网格
pub fn get_week(state: &AppState, date: &str) -> Result<String, String> {
    let result = state.schedule_api.get_week(date).map_err(map_api_error)?;
    to_json(&result)
}

/// 查询按类型过滤的周网格
pub fn get_week_filtered(state: &AppState, date: &str, view: &str) -> Result<String, String> {
    let result = state
        .schedule_api
        .get_week_filtered(date, view)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 查询教师周网格
pub fn get_teacher_week(state: &AppState, teacher_id: i64, date: &str) -> Result<String, String> {
    let result = state
        .schedule_api
        .get_teacher_week(teacher_id, date)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 导出周课表（返回 CSV 文本, 非 JSON）
pub fn export_week_csv(
    state: &AppState,
    date: &str,
    view: Option<&str>,
    locale: Option<&str>,
) -> Result<String, String> {
    state
        .schedule_api
        .export_week_csv(date, view, locale)
        .map_err(map_api_error)
}

// ==========================================
// 排课条目相关命令
// ==========================================

/// 查询单个条目
pub fn get_entry(state: &AppState, entry_id: i64) -> Result<String, String> {
    let result = state.schedule_api.get_entry(entry_id).map_err(map_api_error)?;
    to_json(&result)
}

/// 排课（请求体为 AssignRequest JSON）
pub fn assign_entry(state: &AppState, request_json: &str) -> Result<String, String> {
    let request: AssignRequest = parse_request(request_json)?;
    let result = state.schedule_api.assign(request).map_err(map_api_error)?;
    to_json(&result)
}

/// 修改条目（请求体为 UpdateRequest JSON）
pub fn update_entry(state: &AppState, entry_id: i64, request_json: &str) -> Result<String, String> {
    let request: UpdateRequest = parse_request(request_json)?;
    let result = state
        .schedule_api
        .update(entry_id, request)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 删除条目
pub fn remove_entry(state: &AppState, entry_id: i64, actor: Option<&str>) -> Result<String, String> {
    state
        .schedule_api
        .remove(entry_id, actor)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "removed": entry_id }))
}

// ==========================================
// 操作日志 / 目录同步命令
// ==========================================

/// 最近的操作日志
pub fn list_recent_actions(state: &AppState, limit: Option<usize>) -> Result<String, String> {
    let result = state
        .schedule_api
        .list_recent_actions(limit)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 某条目的操作日志（新在前）
pub fn list_entry_actions(state: &AppState, entry_id: i64) -> Result<String, String> {
    let result = state
        .schedule_api
        .list_entry_actions(entry_id)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 当前全局配置快照
pub fn get_config(state: &AppState) -> Result<String, String> {
    state.config_manager.get_config_snapshot().map_err(|e| {
        map_api_error(ApiError::DatabaseError(format!("读取配置失败: {}", e)))
    })
}

/// 同步教师到本地目录镜像
pub fn upsert_teacher(state: &AppState, teacher_id: i64, name: &str) -> Result<String, String> {
    if name.trim().is_empty() {
        return Err(map_api_error(ApiError::InvalidInput("教师姓名不能为空".to_string())));
    }
    state
        .course_directory_repo
        .upsert_teacher(teacher_id, name.trim())
        .map_err(|e| map_api_error(e.into()))?;
    to_json(&serde_json::json!({ "teacher_id": teacher_id, "name": name.trim() }))
}

/// 同步课程到本地目录镜像（请求体为 CourseInfo JSON）
pub fn upsert_course(state: &AppState, course_json: &str) -> Result<String, String> {
    let course: CourseInfo = parse_request(course_json)?;
    if course.title.trim().is_empty() {
        return Err(map_api_error(ApiError::InvalidInput("课程标题不能为空".to_string())));
    }
    state
        .course_directory_repo
        .upsert_course(&course)
        .map_err(|e| map_api_error(e.into()))?;
    to_json(&course)
}
