// ==========================================
// 引擎层单元测试替身
// ==========================================

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::domain::course::CourseInfo;
use crate::domain::schedule::{EntryPatch, NewScheduleEntry, ScheduleEntry, SlotAddress};
use crate::engine::repositories::ScheduleRepositories;
use crate::repository::{
    CourseDirectory, CourseDirectoryRepository, RepositoryError, RepositoryResult,
    ScheduleEntryRepository, ScheduleEntryStore,
};

pub(crate) fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

/// 内存 SQLite + 两门课程:
/// - 课程 5 "Toán cao cấp", 教师 2 "Nguyễn Văn A", 无颜色/课时
/// - 课程 7 "Vật lý đại cương", 教师 3 "Trần Thị B", 3 课时, #52c41a
pub(crate) fn seeded_sqlite() -> (ScheduleRepositories, Arc<Mutex<Connection>>) {
    crate::logging::init_test();
    let conn = Connection::open_in_memory().unwrap();
    crate::db::ensure_schema(&conn).unwrap();
    let conn = Arc::new(Mutex::new(conn));

    let directory = CourseDirectoryRepository::new(conn.clone());
    directory.upsert_teacher(2, "Nguyễn Văn A").unwrap();
    directory.upsert_teacher(3, "Trần Thị B").unwrap();
    directory
        .upsert_course(&CourseInfo {
            id: 5,
            teacher_id: 2,
            title: "Toán cao cấp".to_string(),
            default_lesson_count: None,
            color: None,
        })
        .unwrap();
    directory
        .upsert_course(&CourseInfo {
            id: 7,
            teacher_id: 3,
            title: "Vật lý đại cương".to_string(),
            default_lesson_count: Some(3),
            color: Some("#52c41a".to_string()),
        })
        .unwrap();

    (ScheduleRepositories::sqlite(conn.clone()), conn)
}

/// 固定返回给定条目的只读存储（不做日期过滤, 用于模拟脏数据）
pub(crate) struct StaticStore {
    entries: Vec<ScheduleEntry>,
}

impl StaticStore {
    pub(crate) fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }
}

impl ScheduleEntryStore for StaticStore {
    fn insert(&self, _entry: &NewScheduleEntry) -> RepositoryResult<ScheduleEntry> {
        Err(RepositoryError::InternalError("read-only store".to_string()))
    }

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ScheduleEntry>> {
        Ok(self.entries.iter().find(|e| e.id == id).cloned())
    }

    fn find_by_address(&self, address: &SlotAddress) -> RepositoryResult<Option<ScheduleEntry>> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.address().as_ref() == Some(address))
            .cloned())
    }

    fn find_by_week(&self, _start: NaiveDate, _end: NaiveDate) -> RepositoryResult<Vec<ScheduleEntry>> {
        Ok(self.entries.clone())
    }

    fn update_fields(&self, _id: i64, _patch: &EntryPatch) -> RepositoryResult<Option<ScheduleEntry>> {
        Ok(None)
    }

    fn delete_by_id(&self, _id: i64) -> RepositoryResult<bool> {
        Ok(false)
    }
}

/// 地址检查永远看不到占用者的存储: 模拟检查与插入之间被并发写入抢先
pub(crate) struct RacingStore {
    inner: ScheduleEntryRepository,
}

impl RacingStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            inner: ScheduleEntryRepository::new(conn),
        }
    }
}

impl ScheduleEntryStore for RacingStore {
    fn insert(&self, entry: &NewScheduleEntry) -> RepositoryResult<ScheduleEntry> {
        self.inner.insert(entry)
    }

    fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ScheduleEntry>> {
        self.inner.find_by_id(id)
    }

    fn find_by_address(&self, _address: &SlotAddress) -> RepositoryResult<Option<ScheduleEntry>> {
        Ok(None)
    }

    fn find_by_week(&self, start: NaiveDate, end: NaiveDate) -> RepositoryResult<Vec<ScheduleEntry>> {
        self.inner.find_by_week(start, end)
    }

    fn update_fields(&self, id: i64, patch: &EntryPatch) -> RepositoryResult<Option<ScheduleEntry>> {
        self.inner.update_fields(id, patch)
    }

    fn delete_by_id(&self, id: i64) -> RepositoryResult<bool> {
        self.inner.delete_by_id(id)
    }
}

/// 所有调用都失败的目录
pub(crate) struct FailingDirectory;

impl CourseDirectory for FailingDirectory {
    fn get_course(&self, _course_id: i64) -> RepositoryResult<Option<CourseInfo>> {
        Err(RepositoryError::DatabaseConnectionError("directory offline".to_string()))
    }

    fn get_teacher_name(&self, _teacher_id: i64) -> RepositoryResult<Option<String>> {
        Err(RepositoryError::DatabaseConnectionError("directory offline".to_string()))
    }

    fn list_course_ids_by_teacher(&self, _teacher_id: i64) -> RepositoryResult<Vec<i64>> {
        Err(RepositoryError::DatabaseConnectionError("directory offline".to_string()))
    }
}
