// ==========================================
// 周课表排课引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 职责: 课程到周网格 (课段 × 天 × 槽位) 的分配、冲突检测与周视图重建
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "vi");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态与命令边界
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ClassType, Period, ScheduleView};

// 领域实体
pub use domain::{
    ActionLog, ActionType, CourseInfo, Grid, GridCell, OccupiedCell, ScheduleEntry, SlotAddress,
    WeekWindow,
};

// 引擎
pub use engine::{
    resolve_week, ConflictCheckedAssigner, EntryMutator, GridMaterializer, ScheduleError,
    ScheduleRepositories,
};

// API
pub use api::{ApiError, ScheduleApi};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "周课表排课引擎";
