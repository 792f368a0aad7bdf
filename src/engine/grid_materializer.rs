// ==========================================
// 周课表排课引擎 - 网格物化引擎
// ==========================================
// 输入: 周窗口
// 输出: 3 × 7 × 2 稠密网格（每个单元格都有值）
// 红线: 只读; 唯一失败来源是协作方错误
// ==========================================
// 映射规则:
// - day_index = entry.date - week.start_date（整数日差）
// - 日期不在窗口内 / 槽位越界 / 地址重复 → 记为异常并跳过
// ==========================================

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::config::ScheduleSettings;
use crate::domain::course::{fallback_course_title, fallback_teacher_name, CourseInfo};
use crate::domain::grid::{AnomalyReason, Grid, GridAnomaly, GridCell, OccupiedCell};
use crate::domain::schedule::ScheduleEntry;
use crate::domain::week::WeekWindow;
use crate::engine::error::ScheduleResult;
use crate::engine::repositories::ScheduleRepositories;
use crate::repository::{CourseDirectory, RepositoryResult};

// ==========================================
// CellDecorator - 单元格展示字段补全
// ==========================================
// 物化与排课共用, 保证两条路径产生相同的展示数据
// 同一次调用内目录查询按 ID 缓存
pub(crate) struct CellDecorator<'a> {
    directory: &'a dyn CourseDirectory,
    settings: &'a ScheduleSettings,
    courses: HashMap<i64, Option<CourseInfo>>,
    teachers: HashMap<i64, Option<String>>,
}

impl<'a> CellDecorator<'a> {
    pub(crate) fn new(directory: &'a dyn CourseDirectory, settings: &'a ScheduleSettings) -> Self {
        Self {
            directory,
            settings,
            courses: HashMap::new(),
            teachers: HashMap::new(),
        }
    }

    /// 预置已查询到的课程, 避免重复查询
    pub(crate) fn remember_course(&mut self, course: CourseInfo) {
        self.courses.insert(course.id, Some(course));
    }

    fn course(&mut self, course_id: i64) -> RepositoryResult<Option<CourseInfo>> {
        if let Some(cached) = self.courses.get(&course_id) {
            return Ok(cached.clone());
        }
        let course = self.directory.get_course(course_id)?;
        self.courses.insert(course_id, course.clone());
        Ok(course)
    }

    fn teacher_name(&mut self, teacher_id: i64) -> RepositoryResult<Option<String>> {
        if let Some(cached) = self.teachers.get(&teacher_id) {
            return Ok(cached.clone());
        }
        let name = self.directory.get_teacher_name(teacher_id)?;
        self.teachers.insert(teacher_id, name.clone());
        Ok(name)
    }

    /// 为条目补全课程标题、教师、颜色与课时标签
    pub(crate) fn decorate(
        &mut self,
        entry: ScheduleEntry,
        day_index: usize,
    ) -> ScheduleResult<OccupiedCell> {
        let course = self.course(entry.course_id)?;
        let teacher_name = self
            .teacher_name(entry.teacher_id)?
            .unwrap_or_else(|| fallback_teacher_name(entry.teacher_id));

        let course_title = course
            .as_ref()
            .map(|c| c.title.clone())
            .unwrap_or_else(|| fallback_course_title(entry.course_id));

        let color = course
            .as_ref()
            .and_then(|c| c.color.clone())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| self.settings.default_color.clone());

        let lesson_label = if entry.lesson_label.trim().is_empty() {
            match &course {
                Some(c) => c.default_lesson_label(self.settings.default_lesson_count),
                None => format!("Tiết {}", self.settings.default_lesson_count),
            }
        } else {
            entry.lesson_label.clone()
        };

        Ok(OccupiedCell {
            entry,
            day_index,
            course_title,
            teacher_name,
            color,
            lesson_label,
        })
    }
}

// ==========================================
// GridMaterializer - 网格物化引擎
// ==========================================
pub struct GridMaterializer {
    repos: ScheduleRepositories,
    settings: ScheduleSettings,
}

impl GridMaterializer {
    pub fn new(repos: ScheduleRepositories, settings: ScheduleSettings) -> Self {
        Self { repos, settings }
    }

    /// 物化一周的网格
    ///
    /// # 返回
    /// - Ok(Grid): 42 个单元格全部有值; 被跳过的条目记录在 `anomalies`
    /// - Err(Collaborator): 存储或目录调用失败
    #[instrument(skip(self), fields(week_start = %week.start_date))]
    pub fn materialize(&self, week: &WeekWindow) -> ScheduleResult<Grid> {
        let entries = self
            .repos
            .entry_store
            .find_by_week(week.start_date, week.end_date)?;

        let mut grid = Grid::empty(*week);
        let mut decorator = CellDecorator::new(self.repos.directory.as_ref(), &self.settings);
        let fetched = entries.len();

        for entry in entries {
            let day_index = match week.day_index(entry.date) {
                Some(idx) => idx,
                None => {
                    record_anomaly(
                        &mut grid,
                        &entry,
                        AnomalyReason::OutsideWeek,
                        format!("date {} outside {}..{}", entry.date, week.start_date, week.end_date),
                    );
                    continue;
                }
            };

            let address = match entry.address() {
                Some(addr) => addr,
                None => {
                    record_anomaly(
                        &mut grid,
                        &entry,
                        AnomalyReason::SlotOutOfRange,
                        format!("slot_index {} not in [0, 1]", entry.slot_index),
                    );
                    continue;
                }
            };

            let slot = address.slot_index as usize;
            let occupied = grid
                .cell(address.period, day_index, slot)
                .map(|cell| !cell.is_empty())
                .unwrap_or(false);
            if occupied {
                record_anomaly(
                    &mut grid,
                    &entry,
                    AnomalyReason::DuplicateAddress,
                    format!("address {} already occupied", address),
                );
                continue;
            }

            let cell = decorator.decorate(entry, day_index)?;
            grid.set(address.period, day_index, slot, GridCell::Occupied(cell));
        }

        debug!(
            fetched,
            occupied = grid.occupied_count(),
            anomalies = grid.anomalies.len(),
            "周网格物化完成"
        );
        Ok(grid)
    }
}

fn record_anomaly(grid: &mut Grid, entry: &ScheduleEntry, reason: AnomalyReason, detail: String) {
    warn!(entry_id = entry.id, ?reason, %detail, "排课条目无法放入网格, 已跳过");
    grid.anomalies.push(GridAnomaly {
        entry_id: entry.id,
        reason,
        detail,
    });
}
