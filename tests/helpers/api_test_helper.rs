// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tempfile::NamedTempFile;

use weekly_schedule::api::{AssignRequest, ScheduleApi};
use weekly_schedule::config::ScheduleSettings;
use weekly_schedule::db::open_sqlite_connection;
use weekly_schedule::engine::ScheduleRepositories;
use weekly_schedule::repository::{
    ActionLogRepository, CourseDirectoryRepository, ScheduleEntryRepository,
};

use crate::test_helpers::create_seeded_test_db;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 包含 ScheduleApi 和准备/断言数据用的仓储
pub struct ApiTestEnv {
    pub db_path: String,
    pub schedule_api: Arc<ScheduleApi>,

    // Repository层（用于测试数据准备）
    pub entry_repo: Arc<ScheduleEntryRepository>,
    pub directory_repo: Arc<CourseDirectoryRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
    pub conn: Arc<Mutex<Connection>>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 使用默认配置创建测试环境（目录已写入种子数据）
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_settings(ScheduleSettings::default())
    }

    /// 使用指定配置创建测试环境
    pub fn with_settings(settings: ScheduleSettings) -> Result<Self, Box<dyn Error>> {
        let (temp_file, db_path) = create_seeded_test_db()?;
        let conn = Arc::new(Mutex::new(open_sqlite_connection(&db_path)?));

        let entry_repo = Arc::new(ScheduleEntryRepository::new(conn.clone()));
        let directory_repo = Arc::new(CourseDirectoryRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        let repos = ScheduleRepositories::new(entry_repo.clone(), directory_repo.clone());
        let schedule_api = Arc::new(ScheduleApi::new(repos, action_log_repo.clone(), settings));

        Ok(Self {
            db_path,
            schedule_api,
            entry_repo,
            directory_repo,
            action_log_repo,
            conn,
            _temp_file: temp_file,
        })
    }
}

/// 构造排课请求（其余字段为空）
pub fn assign_request(course_id: i64, date: &str, period: &str, slot_index: i64) -> AssignRequest {
    AssignRequest {
        course_id,
        date: date.to_string(),
        period: period.to_string(),
        slot_index,
        ..Default::default()
    }
}
