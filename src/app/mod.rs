// ==========================================
// 周课表排课引擎 - 应用层
// ==========================================
// 职责: 组装共享状态, 提供 JSON 命令边界（前端/CLI 共用）
// ==========================================

pub mod commands;
pub mod state;

// 重导出
pub use commands::{map_api_error, ErrorResponse};
pub use state::{get_default_db_path, AppState};
