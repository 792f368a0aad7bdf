// ==========================================
// 周课表排课引擎 - 操作日志领域模型
// ==========================================
// 红线: 所有写入必须记录
// 对齐: action_log 表
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,        // 日志ID (uuid v4)
    pub action_type: String,      // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime, // 操作时间戳
    pub actor: String,            // 操作人

    // ===== 关联条目 =====
    pub entry_id: Option<i64>,         // 排课条目ID
    pub entry_date: Option<NaiveDate>, // 条目日期

    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,          // 详细描述
}

impl ActionLog {
    /// 以当前时间创建操作日志
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            entry_id: None,
            entry_date: None,
            payload_json: None,
            detail: None,
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Assign, // 排课
    Update, // 修改课时信息
    Remove, // 删除排课
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Assign => write!(f, "ASSIGN"),
            ActionType::Update => write!(f, "UPDATE"),
            ActionType::Remove => write!(f, "REMOVE"),
        }
    }
}
