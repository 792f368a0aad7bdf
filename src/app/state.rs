// ==========================================
// 周课表排课引擎 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::ScheduleApi;
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection, read_schema_version};
use crate::engine::ScheduleRepositories;
use crate::repository::{ActionLogRepository, CourseDirectoryRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "WEEKLY_SCHEDULE_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 排课API
    pub schedule_api: Arc<ScheduleApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 课程目录仓储（本地镜像同步用）
    pub course_directory_repo: Arc<CourseDirectoryRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并补齐表结构
    /// 2. 加载排课配置
    /// 3. 初始化所有Repository与API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        match read_schema_version(&conn) {
            Ok(version) => tracing::info!("数据库 schema_version={:?}", version),
            Err(e) => tracing::warn!("读取 schema_version 失败(将继续启动): {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化配置
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法初始化ConfigManager: {}", e))?,
        );
        let settings = config_manager
            .load_schedule_settings()
            .map_err(|e| format!("加载排课配置失败: {}", e))?;
        tracing::debug!(?settings, "排课配置已加载");

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let repos = ScheduleRepositories::sqlite(conn.clone());
        let course_directory_repo = Arc::new(CourseDirectoryRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let schedule_api = Arc::new(ScheduleApi::new(repos, action_log_repo, settings));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            schedule_api,
            config_manager,
            course_directory_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 `WEEKLY_SCHEDULE_DB_PATH` > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./weekly_schedule.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let dir = data_dir.join("weekly-schedule-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("weekly-schedule");

        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("weekly_schedule.db");
        }
    }

    path.to_string_lossy().to_string()
}
