// ==========================================
// 周课表排课引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::ClassType;
use chrono::{FixedOffset, Offset, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ScheduleSettings - 排课引擎运行参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    /// 课程未设置颜色时的单元格颜色
    pub default_color: String,
    /// 未指定类型时的课程类型
    pub default_class_type: ClassType,
    /// 课程未设置课时数时的默认课时
    pub default_lesson_count: i32,
    /// 将带时区时刻折算为日历日时使用的偏移（分钟）
    pub calendar_utc_offset_minutes: i32,
    /// 导出使用的语言
    pub locale: String,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            default_color: "#1890ff".to_string(),
            default_class_type: ClassType::Theory,
            default_lesson_count: 1,
            // Asia/Ho_Chi_Minh
            calendar_utc_offset_minutes: 420,
            locale: "vi".to_string(),
        }
    }
}

impl ScheduleSettings {
    /// 日历偏移; 超出 ±24h 时回退为 UTC
    pub fn calendar_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.calendar_utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取整数配置；值无法解析时记录警告并使用默认值
    fn get_i32_or_default(&self, key: &str, default: i32) -> Result<i32, Box<dyn Error>> {
        match self.get_config_value(key)? {
            Some(raw) => match raw.trim().parse::<i32>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!("配置值无法解析为整数，使用默认值: key={}, value={}", key, raw);
                    Ok(default)
                }
            },
            None => Ok(default),
        }
    }

    /// 加载排课引擎运行参数（缺省项使用默认值）
    pub fn load_schedule_settings(&self) -> Result<ScheduleSettings, Box<dyn Error>> {
        let defaults = ScheduleSettings::default();

        let default_color = self
            .get_config_value(config_keys::GRID_DEFAULT_COLOR)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.default_color);

        let default_class_type = match self.get_config_value(config_keys::DEFAULT_CLASS_TYPE)? {
            Some(raw) => ClassType::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("未知的默认课程类型，使用 theory: {}", raw);
                defaults.default_class_type
            }),
            None => defaults.default_class_type,
        };

        let default_lesson_count = self
            .get_i32_or_default(config_keys::DEFAULT_LESSON_COUNT, defaults.default_lesson_count)?
            .max(1);

        let calendar_utc_offset_minutes = self.get_i32_or_default(
            config_keys::CALENDAR_UTC_OFFSET_MINUTES,
            defaults.calendar_utc_offset_minutes,
        )?;

        let locale = self
            .get_config_value(config_keys::UI_LOCALE)?
            .map(|l| crate::i18n::normalize_locale(&l).to_string())
            .unwrap_or(defaults.locale);

        Ok(ScheduleSettings {
            default_color,
            default_class_type,
            default_lesson_count,
            calendar_utc_offset_minutes,
            locale,
        })
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 网格展示
    pub const GRID_DEFAULT_COLOR: &str = "grid_default_color";

    // 排课默认值
    pub const DEFAULT_CLASS_TYPE: &str = "default_class_type";
    pub const DEFAULT_LESSON_COUNT: &str = "default_lesson_count";

    // 日期归一化
    pub const CALENDAR_UTC_OFFSET_MINUTES: &str = "calendar_utc_offset_minutes";

    // 语言
    pub const UI_LOCALE: &str = "ui_locale";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_table_empty() {
        let manager = setup();
        let settings = manager.load_schedule_settings().unwrap();
        assert_eq!(settings, ScheduleSettings::default());
        assert_eq!(settings.calendar_offset().local_minus_utc(), 7 * 3600);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let manager = setup();
        manager.set_global_config_value(config_keys::GRID_DEFAULT_COLOR, "#000000").unwrap();
        manager.set_global_config_value(config_keys::DEFAULT_CLASS_TYPE, "online").unwrap();
        manager.set_global_config_value(config_keys::DEFAULT_LESSON_COUNT, "abc").unwrap();
        manager.set_global_config_value(config_keys::CALENDAR_UTC_OFFSET_MINUTES, "0").unwrap();
        manager.set_global_config_value(config_keys::UI_LOCALE, "en-US").unwrap();

        let settings = manager.load_schedule_settings().unwrap();
        assert_eq!(settings.default_color, "#000000");
        assert_eq!(settings.default_class_type, ClassType::Online);
        assert_eq!(settings.default_lesson_count, 1);
        assert_eq!(settings.calendar_utc_offset_minutes, 0);
        assert_eq!(settings.locale, "en");
    }

    #[test]
    fn test_set_overwrites_and_snapshot() {
        let manager = setup();
        manager.set_global_config_value("k", "1").unwrap();
        manager.set_global_config_value("k", "2").unwrap();
        assert_eq!(manager.get_global_config_value("k").unwrap(), Some("2".to_string()));

        let snapshot: HashMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.get("k").map(String::as_str), Some("2"));
    }
}
