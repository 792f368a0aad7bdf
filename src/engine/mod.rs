// ==========================================
// 周课表排课引擎 - 引擎层
// ==========================================
// 职责: 周窗口解析、网格物化、冲突检查排课、条目修改/删除、导出
// 红线: Engine 不拼 SQL, 只通过注入的存储/目录句柄访问数据
// ==========================================

pub mod assigner;
pub mod error;
pub mod export;
pub mod grid_materializer;
pub mod mutator;
pub mod repositories;
pub mod week_resolver;

#[cfg(test)]
pub(crate) mod test_support;

// 重导出核心引擎
pub use assigner::{AssignCommand, ConflictCheckedAssigner};
pub use error::{ScheduleError, ScheduleResult};
pub use export::export_week_csv;
pub use grid_materializer::GridMaterializer;
pub use mutator::EntryMutator;
pub use repositories::ScheduleRepositories;
pub use week_resolver::{normalize_calendar_day, resolve_week, DateInput};
