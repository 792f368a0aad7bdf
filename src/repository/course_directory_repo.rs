// ==========================================
// 周课表排课引擎 - 课程目录仓储
// ==========================================
// 课程/教师由外部系统维护, 排课引擎只读
// courses / users 表是外部目录在本地的最小镜像
// ==========================================

use crate::domain::course::CourseInfo;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// CourseDirectory Trait
// ==========================================
// 实现者: CourseDirectoryRepository（使用 rusqlite）, 测试中的内存实现
pub trait CourseDirectory: Send + Sync {
    /// 查询课程
    fn get_course(&self, course_id: i64) -> RepositoryResult<Option<CourseInfo>>;

    /// 查询教师姓名
    fn get_teacher_name(&self, teacher_id: i64) -> RepositoryResult<Option<String>>;

    /// 查询教师名下的课程ID
    fn list_course_ids_by_teacher(&self, teacher_id: i64) -> RepositoryResult<Vec<i64>>;
}

// ==========================================
// CourseDirectoryRepository - SQLite 实现
// ==========================================
pub struct CourseDirectoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourseDirectoryRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入/覆盖教师（本地镜像同步用）
    pub fn upsert_teacher(&self, teacher_id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO users (id, name, role) VALUES (?1, ?2, 'teacher')
            ON CONFLICT(id) DO UPDATE SET name = excluded.name
            "#,
            params![teacher_id, name],
        )?;
        Ok(())
    }

    /// 写入/覆盖课程（本地镜像同步用）
    pub fn upsert_course(&self, course: &CourseInfo) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO courses (id, teacher_id, title, lessons, color)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                teacher_id = excluded.teacher_id,
                title = excluded.title,
                lessons = excluded.lessons,
                color = excluded.color
            "#,
            params![
                course.id,
                course.teacher_id,
                course.title,
                course.default_lesson_count,
                course.color,
            ],
        )?;
        Ok(())
    }
}

impl CourseDirectory for CourseDirectoryRepository {
    fn get_course(&self, course_id: i64) -> RepositoryResult<Option<CourseInfo>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                "SELECT id, teacher_id, title, lessons, color FROM courses WHERE id = ?1",
                params![course_id],
                |row| {
                    Ok(CourseInfo {
                        id: row.get(0)?,
                        teacher_id: row.get(1)?,
                        title: row.get(2)?,
                        default_lesson_count: row.get(3)?,
                        color: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(course)
    }

    fn get_teacher_name(&self, teacher_id: i64) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let name = conn
            .query_row(
                "SELECT name FROM users WHERE id = ?1",
                params![teacher_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(name.filter(|n| !n.trim().is_empty()))
    }

    fn list_course_ids_by_teacher(&self, teacher_id: i64) -> RepositoryResult<Vec<i64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id FROM courses WHERE teacher_id = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map(params![teacher_id], |row| row.get::<_, i64>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(ids)
    }
}
