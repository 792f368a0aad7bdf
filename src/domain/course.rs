// ==========================================
// 周课表排课引擎 - 课程目录视图
// ==========================================
// 课程/教师由外部目录维护, 引擎只读
// ==========================================

use serde::{Deserialize, Serialize};

/// 课程信息（仅用于排课与单元格展示）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub default_lesson_count: Option<i32>,
    pub color: Option<String>,
}

impl CourseInfo {
    /// 默认课时标签: "Tiết {课时数}"
    pub fn default_lesson_label(&self, fallback_count: i32) -> String {
        let count = self
            .default_lesson_count
            .filter(|c| *c > 0)
            .unwrap_or(fallback_count);
        format!("Tiết {}", count)
    }
}

/// 教师名称兜底
pub fn fallback_teacher_name(teacher_id: i64) -> String {
    format!("Teacher #{}", teacher_id)
}

/// 课程已从目录中删除时的标题兜底
pub fn fallback_course_title(course_id: i64) -> String {
    format!("Course #{}", course_id)
}
