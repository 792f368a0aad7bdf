// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、目录种子数据等功能
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

use weekly_schedule::db::{ensure_schema, open_sqlite_connection};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 创建临时测试数据库并写入课程目录种子数据
pub fn create_seeded_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let (temp_file, db_path) = create_test_db()?;
    let conn = open_sqlite_connection(&db_path)?;
    seed_directory(&conn)?;
    Ok((temp_file, db_path))
}

/// 课程目录种子数据
///
/// - 教师 2 "Nguyễn Văn A": 课程 5 "Toán cao cấp"（无颜色/课时）, 课程 9 "Giải tích"
/// - 教师 3 "Trần Thị B": 课程 7 "Vật lý đại cương"（3 课时, #52c41a）
pub fn seed_directory(conn: &Connection) -> Result<(), Box<dyn Error>> {
    conn.execute_batch(
        r#"
        INSERT INTO users (id, name, role) VALUES
            (2, 'Nguyễn Văn A', 'teacher'),
            (3, 'Trần Thị B', 'teacher');

        INSERT INTO courses (id, teacher_id, title, lessons, color) VALUES
            (5, 2, 'Toán cao cấp', NULL, NULL),
            (7, 3, 'Vật lý đại cương', 3, '#52c41a'),
            (9, 2, 'Giải tích', 2, '#fa8c16');
        "#,
    )?;
    Ok(())
}

/// 直接写入一条排课记录（绕过引擎, 用于构造脏数据）
pub fn insert_raw_entry(
    conn: &Connection,
    course_id: i64,
    teacher_id: i64,
    date: &str,
    period: &str,
    slot_index: i32,
) -> Result<i64, Box<dyn Error>> {
    conn.execute(
        r#"
        INSERT INTO schedule_entry (
            course_id, teacher_id, entry_date, period, slot_index,
            lesson_label, resource_url, class_type, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, '', NULL, 'theory', '2025-03-01 08:00:00', '2025-03-01 08:00:00')
        "#,
        rusqlite::params![course_id, teacher_id, date, period, slot_index],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}
