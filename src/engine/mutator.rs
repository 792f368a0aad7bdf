// ==========================================
// 周课表排课引擎 - 条目修改/删除
// ==========================================
// 红线: 地址字段 (日期/课段/槽位/课程) 不可通过更新修改,
//       换地址必须走 删除 + 排课, 以保证冲突检查不被绕过
// ==========================================

use tracing::{info, instrument};

use crate::domain::schedule::{EntryPatch, ScheduleEntry};
use crate::engine::error::{ScheduleError, ScheduleResult};
use crate::engine::repositories::ScheduleRepositories;

pub struct EntryMutator {
    repos: ScheduleRepositories,
}

impl EntryMutator {
    pub fn new(repos: ScheduleRepositories) -> Self {
        Self { repos }
    }

    /// 部分更新非地址字段
    ///
    /// 空白 resource_url 清除链接, 与排课时的空白处理一致
    ///
    /// # 返回
    /// - Ok(entry): 更新后的条目
    /// - Err(Validation): 补丁为空或课时标签为空白
    /// - Err(NotFound): 条目不存在（不产生任何修改）
    #[instrument(skip(self, patch))]
    pub fn update(&self, entry_id: i64, patch: EntryPatch) -> ScheduleResult<ScheduleEntry> {
        let patch = normalize_patch(patch)?;

        let updated = self
            .repos
            .entry_store
            .update_fields(entry_id, &patch)?
            .ok_or(ScheduleError::NotFound {
                entity: "ScheduleEntry",
                id: entry_id,
            })?;

        info!(entry_id, "排课条目已更新");
        Ok(updated)
    }

    /// 删除条目, 释放其地址
    ///
    /// # 返回
    /// - Ok(entry): 被删除的条目
    /// - Err(NotFound): 条目不存在
    #[instrument(skip(self))]
    pub fn remove(&self, entry_id: i64) -> ScheduleResult<ScheduleEntry> {
        let not_found = || ScheduleError::NotFound {
            entity: "ScheduleEntry",
            id: entry_id,
        };

        let existing = self
            .repos
            .entry_store
            .find_by_id(entry_id)?
            .ok_or_else(not_found)?;

        // 查询与删除之间可能已被其他调用删除
        if !self.repos.entry_store.delete_by_id(entry_id)? {
            return Err(not_found());
        }

        info!(entry_id, date = %existing.date, period = %existing.period, "排课条目已删除");
        Ok(existing)
    }
}

fn normalize_patch(patch: EntryPatch) -> ScheduleResult<EntryPatch> {
    if patch.is_empty() {
        return Err(ScheduleError::Validation(
            "至少需要提供 resource_url / lesson_label / class_type 之一".to_string(),
        ));
    }

    let lesson_label = match patch.lesson_label {
        Some(label) if label.trim().is_empty() => {
            return Err(ScheduleError::Validation("lesson_label 不能为空白".to_string()));
        }
        Some(label) => Some(label.trim().to_string()),
        None => None,
    };

    // 空白链接规范化为 "", 由存储清除为 NULL
    Ok(EntryPatch {
        resource_url: patch.resource_url.map(|url| url.trim().to_string()),
        lesson_label,
        class_type: patch.class_type,
    })
}
