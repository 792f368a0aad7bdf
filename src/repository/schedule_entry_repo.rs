// ==========================================
// 周课表排课引擎 - 排课条目数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 地址唯一性由 ux_schedule_entry_address 索引保证,
// 冲突以 UniqueConstraintViolation 返回
// ==========================================

use crate::domain::schedule::{EntryPatch, NewScheduleEntry, ScheduleEntry, SlotAddress};
use crate::domain::types::{ClassType, Period};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const DATE_FMT: &str = "%Y-%m-%d";
const TS_FMT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, course_id, teacher_id,
        entry_date, period, slot_index,
        lesson_label, resource_url, class_type,
        created_at, updated_at
    FROM schedule_entry
"#;

// ==========================================
// ScheduleEntryStore Trait
// ==========================================
// 用途: 排课引擎所依赖的条目存储
// 实现者: ScheduleEntryRepository（使用 rusqlite）, 测试中的内存实现
pub trait ScheduleEntryStore: Send + Sync {
    /// 插入条目
    ///
    /// # 返回
    /// - Ok(ScheduleEntry): 插入后的完整条目
    /// - Err(UniqueConstraintViolation): 地址已被占用
    fn insert(&self, entry: &NewScheduleEntry) -> RepositoryResult<ScheduleEntry>;

    /// 按ID查询
    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ScheduleEntry>>;

    /// 按地址查询
    fn find_by_address(&self, address: &SlotAddress) -> RepositoryResult<Option<ScheduleEntry>>;

    /// 查询日期区间 [start, end] 内的所有条目
    fn find_by_week(&self, start: NaiveDate, end: NaiveDate) -> RepositoryResult<Vec<ScheduleEntry>>;

    /// 部分更新非地址字段
    ///
    /// resource_url 为 Some("") 时清除为 NULL
    ///
    /// # 返回
    /// - Ok(Some(entry)): 更新后的条目
    /// - Ok(None): 条目不存在
    fn update_fields(&self, id: i64, patch: &EntryPatch) -> RepositoryResult<Option<ScheduleEntry>>;

    /// 删除条目
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 条目不存在
    fn delete_by_id(&self, id: i64) -> RepositoryResult<bool>;
}

// ==========================================
// ScheduleEntryRepository - SQLite 实现
// ==========================================
pub struct ScheduleEntryRepository {
    conn: Arc<Mutex<Connection>>,
}

/// 数据库行的原始形态（解析前）
struct RawEntryRow {
    id: i64,
    course_id: i64,
    teacher_id: i64,
    entry_date: String,
    period: String,
    slot_index: i32,
    lesson_label: String,
    resource_url: Option<String>,
    class_type: String,
    created_at: String,
    updated_at: String,
}

impl RawEntryRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            id: row.get(0)?,
            course_id: row.get(1)?,
            teacher_id: row.get(2)?,
            entry_date: row.get(3)?,
            period: row.get(4)?,
            slot_index: row.get(5)?,
            lesson_label: row.get(6)?,
            resource_url: row.get(7)?,
            class_type: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }

    fn into_entry(self) -> RepositoryResult<ScheduleEntry> {
        let field_err = |field: &str, value: &str| RepositoryError::FieldValueError {
            field: field.to_string(),
            message: format!("schedule_entry.id={} 无法解析: {}", self.id, value),
        };

        let date = NaiveDate::parse_from_str(&self.entry_date, DATE_FMT)
            .map_err(|_| field_err("entry_date", &self.entry_date))?;
        let period = Period::parse(&self.period).ok_or_else(|| field_err("period", &self.period))?;
        let class_type =
            ClassType::parse(&self.class_type).ok_or_else(|| field_err("class_type", &self.class_type))?;
        let created_at = NaiveDateTime::parse_from_str(&self.created_at, TS_FMT)
            .map_err(|_| field_err("created_at", &self.created_at))?;
        let updated_at = NaiveDateTime::parse_from_str(&self.updated_at, TS_FMT)
            .map_err(|_| field_err("updated_at", &self.updated_at))?;

        Ok(ScheduleEntry {
            id: self.id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            date,
            period,
            slot_index: self.slot_index,
            lesson_label: self.lesson_label,
            resource_url: self.resource_url,
            class_type,
            created_at,
            updated_at,
        })
    }
}

fn now_ts() -> NaiveDateTime {
    // 截断到秒, 与存储精度一致
    let now = chrono::Local::now().naive_local();
    NaiveDateTime::parse_from_str(&now.format(TS_FMT).to_string(), TS_FMT).unwrap_or(now)
}

fn find_by_id_with(conn: &Connection, id: i64) -> RepositoryResult<Option<ScheduleEntry>> {
    let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
    let raw = conn
        .query_row(&sql, params![id], RawEntryRow::from_row)
        .optional()?;
    raw.map(RawEntryRow::into_entry).transpose()
}

impl ScheduleEntryRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl ScheduleEntryStore for ScheduleEntryRepository {
    fn insert(&self, entry: &NewScheduleEntry) -> RepositoryResult<ScheduleEntry> {
        let conn = self.get_conn()?;
        let ts = now_ts();
        let ts_str = ts.format(TS_FMT).to_string();

        conn.execute(
            r#"
            INSERT INTO schedule_entry (
                course_id, teacher_id,
                entry_date, period, slot_index,
                lesson_label, resource_url, class_type,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                entry.course_id,
                entry.teacher_id,
                entry.address.date.format(DATE_FMT).to_string(),
                entry.address.period.to_db_str(),
                entry.address.slot_index as i32,
                entry.lesson_label,
                entry.resource_url,
                entry.class_type.to_db_str(),
                ts_str,
                ts_str,
            ],
        )?;

        Ok(ScheduleEntry {
            id: conn.last_insert_rowid(),
            course_id: entry.course_id,
            teacher_id: entry.teacher_id,
            date: entry.address.date,
            period: entry.address.period,
            slot_index: entry.address.slot_index as i32,
            lesson_label: entry.lesson_label.clone(),
            resource_url: entry.resource_url.clone(),
            class_type: entry.class_type,
            created_at: ts,
            updated_at: ts,
        })
    }

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ScheduleEntry>> {
        let conn = self.get_conn()?;
        find_by_id_with(&conn, id)
    }

    fn find_by_address(&self, address: &SlotAddress) -> RepositoryResult<Option<ScheduleEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE entry_date = ?1 AND period = ?2 AND slot_index = ?3 LIMIT 1",
            SELECT_COLUMNS
        );
        let raw = conn
            .query_row(
                &sql,
                params![
                    address.date.format(DATE_FMT).to_string(),
                    address.period.to_db_str(),
                    address.slot_index as i32,
                ],
                RawEntryRow::from_row,
            )
            .optional()?;
        raw.map(RawEntryRow::into_entry).transpose()
    }

    fn find_by_week(&self, start: NaiveDate, end: NaiveDate) -> RepositoryResult<Vec<ScheduleEntry>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE entry_date BETWEEN ?1 AND ?2 ORDER BY entry_date ASC, period ASC, slot_index ASC, id ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    start.format(DATE_FMT).to_string(),
                    end.format(DATE_FMT).to_string()
                ],
                RawEntryRow::from_row,
            )?
            .collect::<SqliteResult<Vec<_>>>()?;

        rows.into_iter().map(RawEntryRow::into_entry).collect()
    }

    fn update_fields(&self, id: i64, patch: &EntryPatch) -> RepositoryResult<Option<ScheduleEntry>> {
        let conn = self.get_conn()?;
        let updated = conn.execute(
            r#"
            UPDATE schedule_entry SET
                resource_url = CASE WHEN ?1 IS NULL THEN resource_url ELSE NULLIF(?1, '') END,
                lesson_label = COALESCE(?2, lesson_label),
                class_type = COALESCE(?3, class_type),
                updated_at = ?4
            WHERE id = ?5
            "#,
            params![
                patch.resource_url,
                patch.lesson_label,
                patch.class_type.map(|c| c.to_db_str()),
                now_ts().format(TS_FMT).to_string(),
                id,
            ],
        )?;

        if updated == 0 {
            return Ok(None);
        }
        find_by_id_with(&conn, id)
    }

    fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM schedule_entry WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
