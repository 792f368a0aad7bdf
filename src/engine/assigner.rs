// ==========================================
// 周课表排课引擎 - 冲突检查排课引擎
// ==========================================
// 红线: 已占地址永不覆盖
// ==========================================
// 流程:
// 1. 日期归一化 + 槽位校验（不访问存储）
// 2. 查询课程, 不存在 → NotFound
// 3. 查询地址, 有占用者 → Conflict
// 4. 插入; 唯一约束冲突（并发落败）同样视为 Conflict
// 5. 按物化规则补全展示字段后返回
// ==========================================

use chrono::Datelike;
use tracing::{info, instrument, warn};

use crate::config::ScheduleSettings;
use crate::domain::grid::OccupiedCell;
use crate::domain::schedule::{ClassFields, NewScheduleEntry, SlotAddress};
use crate::domain::types::Period;
use crate::engine::error::{ScheduleError, ScheduleResult};
use crate::engine::grid_materializer::CellDecorator;
use crate::engine::repositories::ScheduleRepositories;
use crate::engine::week_resolver::{normalize_calendar_day, DateInput};

/// 排课请求
#[derive(Debug, Clone, PartialEq)]
pub struct AssignCommand {
    pub course_id: i64,
    pub date: DateInput,
    pub period: Period,
    pub slot_index: i32,
    pub fields: ClassFields,
}

// ==========================================
// ConflictCheckedAssigner
// ==========================================
pub struct ConflictCheckedAssigner {
    repos: ScheduleRepositories,
    settings: ScheduleSettings,
}

impl ConflictCheckedAssigner {
    pub fn new(repos: ScheduleRepositories, settings: ScheduleSettings) -> Self {
        Self { repos, settings }
    }

    /// 将课程排入指定地址
    ///
    /// # 返回
    /// - Ok(OccupiedCell): 新条目及其展示字段
    /// - Err(Validation): 槽位越界
    /// - Err(NotFound): 课程不存在
    /// - Err(Conflict): 地址已被占用（含并发落败）
    #[instrument(skip(self, command), fields(course_id = command.course_id, period = %command.period, slot = command.slot_index))]
    pub fn assign(&self, command: AssignCommand) -> ScheduleResult<OccupiedCell> {
        let date = normalize_calendar_day(command.date, self.settings.calendar_offset());
        let address = SlotAddress::new(date, command.period, command.slot_index).ok_or_else(|| {
            ScheduleError::Validation(format!(
                "slot_index 必须为 0 或 1, 实际为 {}",
                command.slot_index
            ))
        })?;

        let course = self
            .repos
            .directory
            .get_course(command.course_id)?
            .ok_or(ScheduleError::NotFound {
                entity: "Course",
                id: command.course_id,
            })?;

        if let Some(occupant) = self.repos.entry_store.find_by_address(&address)? {
            info!(%address, occupant_id = occupant.id, "地址已被占用, 拒绝排课");
            return Err(ScheduleError::Conflict {
                address,
                occupant_id: Some(occupant.id),
            });
        }

        let ClassFields {
            lesson,
            class_type,
            resource_url,
        } = command.fields;
        let new_entry = NewScheduleEntry {
            course_id: course.id,
            teacher_id: course.teacher_id,
            address,
            lesson_label: non_blank(lesson)
                .unwrap_or_else(|| course.default_lesson_label(self.settings.default_lesson_count)),
            resource_url: non_blank(resource_url),
            class_type: class_type.unwrap_or(self.settings.default_class_type),
        };

        let entry = match self.repos.entry_store.insert(&new_entry) {
            Ok(entry) => entry,
            Err(e) if e.is_unique_violation() => {
                // 检查与插入之间被其他写入抢先
                let occupant_id = self
                    .repos
                    .entry_store
                    .find_by_address(&address)
                    .ok()
                    .flatten()
                    .map(|occupant| occupant.id);
                warn!(%address, ?occupant_id, "并发排课落败: {}", e);
                return Err(ScheduleError::Conflict {
                    address,
                    occupant_id,
                });
            }
            Err(e) => return Err(e.into()),
        };

        info!(entry_id = entry.id, %address, "排课成功");

        let day_index = address.date.weekday().num_days_from_monday() as usize;
        let mut decorator = CellDecorator::new(self.repos.directory.as_ref(), &self.settings);
        decorator.remember_course(course);
        decorator.decorate(entry, day_index)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ClassType;
    use crate::engine::grid_materializer::GridMaterializer;
    use crate::engine::test_support::{d, seeded_sqlite, FailingDirectory, RacingStore};
    use crate::engine::week_resolver::resolve_week;
    use chrono::DateTime;
    use std::sync::Arc;

    fn command(course_id: i64, date: chrono::NaiveDate, period: Period, slot_index: i32) -> AssignCommand {
        AssignCommand {
            course_id,
            date: DateInput::Day(date),
            period,
            slot_index,
            fields: ClassFields::default(),
        }
    }

    #[test]
    fn test_assign_then_conflict() {
        let (repos, _) = seeded_sqlite();
        let assigner = ConflictCheckedAssigner::new(repos.clone(), ScheduleSettings::default());

        let cell = assigner
            .assign(command(5, d(2025, 3, 10), Period::Morning, 0))
            .unwrap();
        assert_eq!(cell.entry.course_id, 5);
        assert_eq!(cell.entry.teacher_id, 2);
        assert_eq!(cell.entry.lesson_label, "Tiết 1");
        assert_eq!(cell.entry.class_type, ClassType::Theory);
        assert_eq!(cell.day_index, 0);
        assert_eq!(cell.course_title, "Toán cao cấp");

        let err = assigner
            .assign(command(7, d(2025, 3, 10), Period::Morning, 0))
            .unwrap_err();
        match err {
            ScheduleError::Conflict { address, occupant_id } => {
                assert_eq!(address.to_string(), "2025-03-10/Morning/slot0");
                assert_eq!(occupant_id, Some(cell.entry.id));
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        let week = repos
            .entry_store
            .find_by_week(d(2025, 3, 10), d(2025, 3, 16))
            .unwrap();
        assert_eq!(week.len(), 1);
    }

    #[test]
    fn test_assign_matches_materialized_cell() {
        let (repos, _) = seeded_sqlite();
        let settings = ScheduleSettings::default();
        let assigner = ConflictCheckedAssigner::new(repos.clone(), settings.clone());

        let mut cmd = command(7, d(2025, 3, 16), Period::Evening, 1);
        cmd.fields = ClassFields {
            lesson: None,
            class_type: Some(ClassType::Exam),
            resource_url: Some("  https://meet.example/abc  ".to_string()),
        };
        let cell = assigner.assign(cmd).unwrap();
        assert_eq!(cell.day_index, 6);
        assert_eq!(cell.lesson_label, "Tiết 3");
        assert_eq!(cell.color, "#52c41a");
        assert_eq!(cell.entry.resource_url.as_deref(), Some("https://meet.example/abc"));

        let grid = GridMaterializer::new(repos, settings)
            .materialize(&resolve_week(d(2025, 3, 16)))
            .unwrap();
        let materialized = grid.cell(Period::Evening, 6, 1).unwrap().as_occupied().unwrap();
        assert_eq!(materialized, &cell);
    }

    #[test]
    fn test_invalid_slot_rejected_before_store() {
        let repos = ScheduleRepositories::new(
            seeded_sqlite().0.entry_store.clone(),
            Arc::new(FailingDirectory),
        );
        let assigner = ConflictCheckedAssigner::new(repos, ScheduleSettings::default());
        let err = assigner
            .assign(command(5, d(2025, 3, 10), Period::Morning, 2))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[test]
    fn test_unknown_course_not_found() {
        let (repos, _) = seeded_sqlite();
        let assigner = ConflictCheckedAssigner::new(repos, ScheduleSettings::default());
        let err = assigner
            .assign(command(999, d(2025, 3, 10), Period::Morning, 0))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::NotFound { entity: "Course", id: 999 }));
    }

    #[test]
    fn test_lost_race_reported_as_conflict() {
        let (repos, conn) = seeded_sqlite();
        let racing = ScheduleRepositories::new(
            Arc::new(RacingStore::new(conn)),
            repos.directory.clone(),
        );
        let assigner = ConflictCheckedAssigner::new(racing, ScheduleSettings::default());

        assigner
            .assign(command(5, d(2025, 3, 11), Period::Afternoon, 1))
            .unwrap();
        let err = assigner
            .assign(command(7, d(2025, 3, 11), Period::Afternoon, 1))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict { occupant_id: None, .. }));
    }

    #[test]
    fn test_instant_normalized_with_calendar_offset() {
        let (repos, _) = seeded_sqlite();
        let assigner = ConflictCheckedAssigner::new(repos, ScheduleSettings::default());

        let mut cmd = command(5, d(2000, 1, 1), Period::Morning, 0);
        // UTC 3 月 9 日 17:00 = 越南时间 3 月 10 日 00:00
        cmd.date = DateInput::Instant(DateTime::parse_from_rfc3339("2025-03-09T17:00:00Z").unwrap());
        let cell = assigner.assign(cmd).unwrap();
        assert_eq!(cell.entry.date, d(2025, 3, 10));
        assert_eq!(cell.day_index, 0);
    }

    #[test]
    fn test_blank_lesson_uses_default_label() {
        let (repos, _) = seeded_sqlite();
        let assigner = ConflictCheckedAssigner::new(repos, ScheduleSettings::default());
        let mut cmd = command(7, d(2025, 3, 12), Period::Morning, 1);
        cmd.fields.lesson = Some("   ".to_string());
        let cell = assigner.assign(cmd).unwrap();
        assert_eq!(cell.entry.lesson_label, "Tiết 3");
    }
}
