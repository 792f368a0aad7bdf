// ==========================================
// 周课表排课引擎 - 排课条目领域模型
// ==========================================
// 地址 (Address) = (日期, 课段, 槽位)
// 红线: 同一地址至多一个条目
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::types::{ClassType, Period, SLOTS_PER_PERIOD};

// ==========================================
// ScheduleEntry - 排课条目
// ==========================================
// 对齐: schedule_entry 表
// slot_index 保留存储中的原始值, 越界值只在物化时被识别
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub date: NaiveDate,
    pub period: Period,
    pub slot_index: i32,
    pub lesson_label: String,
    pub resource_url: Option<String>,
    pub class_type: ClassType,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ScheduleEntry {
    /// 条目地址（槽位越界时返回 None）
    pub fn address(&self) -> Option<SlotAddress> {
        SlotAddress::new(self.date, self.period, self.slot_index)
    }
}

// ==========================================
// NewScheduleEntry - 待插入条目
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct NewScheduleEntry {
    pub course_id: i64,
    pub teacher_id: i64,
    pub address: SlotAddress,
    pub lesson_label: String,
    pub resource_url: Option<String>,
    pub class_type: ClassType,
}

// ==========================================
// SlotAddress - 网格地址
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAddress {
    pub date: NaiveDate,
    pub period: Period,
    pub slot_index: u8,
}

impl SlotAddress {
    /// 构造地址, slot_index 必须在 [0, SLOTS_PER_PERIOD) 内
    pub fn new(date: NaiveDate, period: Period, slot_index: i32) -> Option<Self> {
        if slot_index < 0 || slot_index as usize >= SLOTS_PER_PERIOD {
            return None;
        }
        Some(Self {
            date,
            period,
            slot_index: slot_index as u8,
        })
    }
}

impl fmt::Display for SlotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/slot{}",
            self.date.format("%Y-%m-%d"),
            self.period,
            self.slot_index
        )
    }
}

// ==========================================
// ClassFields - 排课时可选字段
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassFields {
    pub lesson: Option<String>,
    pub class_type: Option<ClassType>,
    pub resource_url: Option<String>,
}

// ==========================================
// EntryPatch - 非地址字段的部分更新
// ==========================================
// 地址字段 (date/period/slot/course) 不可通过更新修改
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    /// Some("") 表示清除资源链接
    pub resource_url: Option<String>,
    pub lesson_label: Option<String>,
    pub class_type: Option<ClassType>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.resource_url.is_none() && self.lesson_label.is_none() && self.class_type.is_none()
    }
}
