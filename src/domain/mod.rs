// ==========================================
// 周课表排课引擎 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、网格结构
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod course;
pub mod grid;
pub mod schedule;
pub mod types;
pub mod week;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use course::CourseInfo;
pub use grid::{AnomalyReason, Grid, GridAnomaly, GridCell, GridCells, OccupiedCell};
pub use schedule::{ClassFields, EntryPatch, NewScheduleEntry, ScheduleEntry, SlotAddress};
pub use types::{ClassType, Period, ScheduleView};
pub use week::WeekWindow;
