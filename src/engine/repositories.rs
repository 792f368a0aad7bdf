// ==========================================
// 周课表排课引擎 - 引擎层协作方聚合
// ==========================================
// 职责: 聚合排课引擎所需的存储与目录句柄
// 句柄在构造时注入, 便于测试替身与隔离的并发测试
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::repository::{
    CourseDirectory, CourseDirectoryRepository, ScheduleEntryRepository, ScheduleEntryStore,
};

/// 排课引擎协作方集合
///
/// # 包含
/// - `entry_store`: 排课条目存储
/// - `directory`: 课程/教师目录（只读）
#[derive(Clone)]
pub struct ScheduleRepositories {
    pub entry_store: Arc<dyn ScheduleEntryStore>,
    pub directory: Arc<dyn CourseDirectory>,
}

impl ScheduleRepositories {
    /// 创建新的协作方集合
    pub fn new(entry_store: Arc<dyn ScheduleEntryStore>, directory: Arc<dyn CourseDirectory>) -> Self {
        Self {
            entry_store,
            directory,
        }
    }

    /// 基于共享 SQLite 连接创建默认实现
    pub fn sqlite(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            entry_store: Arc::new(ScheduleEntryRepository::new(conn.clone())),
            directory: Arc::new(CourseDirectoryRepository::new(conn)),
        }
    }

    pub fn entry_store(&self) -> &Arc<dyn ScheduleEntryStore> {
        &self.entry_store
    }

    pub fn directory(&self) -> &Arc<dyn CourseDirectory> {
        &self.directory
    }
}
