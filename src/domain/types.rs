// ==========================================
// 周课表排课引擎 - 领域类型定义
// ==========================================
// 课段 (Period) / 课程类型 (ClassType) / 视图筛选 (ScheduleView)
// 序列化格式与前端约定一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 每个课段的并行槽位数
pub const SLOTS_PER_PERIOD: usize = 2;

/// 一周天数
pub const DAYS_PER_WEEK: usize = 7;

// ==========================================
// 课段 (Period)
// ==========================================
// 每天三个教学时段, 顺序即网格行顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Period {
    Morning,   // 上午 (Sáng)
    Afternoon, // 下午 (Chiều)
    Evening,   // 晚上 (Tối)
}

impl Period {
    /// 网格行顺序
    pub const ALL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Evening];

    /// 行下标 (0..3)
    pub fn index(self) -> usize {
        match self {
            Period::Morning => 0,
            Period::Afternoon => 1,
            Period::Evening => 2,
        }
    }

    /// 数据库存储值
    pub fn to_db_str(self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Evening => "Evening",
        }
    }

    /// 解析课段
    ///
    /// 同时接受越南语界面标签（Sáng/Chiều/Tối），大小写不敏感
    pub fn parse(s: &str) -> Option<Period> {
        match s.trim().to_lowercase().as_str() {
            "morning" | "sáng" | "sang" => Some(Period::Morning),
            "afternoon" | "chiều" | "chieu" => Some(Period::Afternoon),
            "evening" | "tối" | "toi" => Some(Period::Evening),
            _ => None,
        }
    }

    /// i18n 标签键
    pub fn label_key(self) -> &'static str {
        match self {
            Period::Morning => "period.morning",
            Period::Afternoon => "period.afternoon",
            Period::Evening => "period.evening",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 课程类型 (Class Type)
// ==========================================
// 序列化格式: lowercase (与前端图例一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassType {
    Theory,   // 理论课
    Practice, // 实践课
    Online,   // 线上课
    Exam,     // 考试
    Paused,   // 暂停
}

impl ClassType {
    /// 图例顺序
    pub const ALL: [ClassType; 5] = [
        ClassType::Theory,
        ClassType::Practice,
        ClassType::Online,
        ClassType::Exam,
        ClassType::Paused,
    ];

    pub fn to_db_str(self) -> &'static str {
        match self {
            ClassType::Theory => "theory",
            ClassType::Practice => "practice",
            ClassType::Online => "online",
            ClassType::Exam => "exam",
            ClassType::Paused => "paused",
        }
    }

    /// 解析课程类型（旧前端使用 "pause"）
    pub fn parse(s: &str) -> Option<ClassType> {
        match s.trim().to_lowercase().as_str() {
            "theory" => Some(ClassType::Theory),
            "practice" => Some(ClassType::Practice),
            "online" => Some(ClassType::Online),
            "exam" => Some(ClassType::Exam),
            "paused" | "pause" => Some(ClassType::Paused),
            _ => None,
        }
    }

    /// 图例颜色
    pub fn legend_color(self) -> &'static str {
        match self {
            ClassType::Theory => "#9E9E9E",
            ClassType::Practice => "#4CAF50",
            ClassType::Online => "#2196F3",
            ClassType::Exam => "#FFEB3B",
            ClassType::Paused => "#FF9800",
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            ClassType::Theory => "class_type.theory",
            ClassType::Practice => "class_type.practice",
            ClassType::Online => "class_type.online",
            ClassType::Exam => "class_type.exam",
            ClassType::Paused => "class_type.paused",
        }
    }
}

impl Default for ClassType {
    fn default() -> Self {
        ClassType::Theory
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 视图筛选 (Schedule View)
// ==========================================
// 对应界面筛选按钮: 全部 / 课程 / 考试
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleView {
    All,
    Lessons,
    Exams,
}

impl ScheduleView {
    pub fn parse(s: &str) -> Option<ScheduleView> {
        match s.trim().to_lowercase().as_str() {
            "all" | "tất cả" => Some(ScheduleView::All),
            "lessons" | "lịch học" => Some(ScheduleView::Lessons),
            "exams" | "lịch thi" => Some(ScheduleView::Exams),
            _ => None,
        }
    }

    /// 该视图是否展示指定类型
    pub fn accepts(self, class_type: ClassType) -> bool {
        match self {
            ScheduleView::All => true,
            ScheduleView::Lessons => class_type != ClassType::Exam,
            ScheduleView::Exams => class_type == ClassType::Exam,
        }
    }
}
