// ==========================================
// 周课表排课引擎 - 引擎层错误类型
// ==========================================
// 分类:
// - Validation: 地址/字段非法, 在访问存储之前拒绝
// - NotFound: 课程/条目不存在
// - Conflict: 地址已被占用
// - Collaborator: 存储/目录调用失败（原样上抛, 是否重试由调用方决定）
// ==========================================

use crate::domain::schedule::SlotAddress;
use crate::repository::error::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("{entity}(id={id})不存在")]
    NotFound { entity: &'static str, id: i64 },

    #[error("地址已被占用: {address}")]
    Conflict {
        address: SlotAddress,
        occupant_id: Option<i64>,
    },

    #[error("协作方调用失败: {0}")]
    Collaborator(#[from] RepositoryError),

    #[error("导出失败: {0}")]
    Export(String),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
