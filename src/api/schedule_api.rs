// ==========================================
// 周课表排课引擎 - 排课 API
// ==========================================
// 职责: 周视图查询、排课、修改、删除、导出、操作日志
// 入参为线格式（字符串日期/课段/类型）, 在此解析后交给引擎
// 所有写入成功后记录 ActionLog
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{
    normalize_actor, parse_date_input, parse_optional_class_type, parse_period, parse_view,
    validate_id, validate_slot_index,
};
use crate::config::ScheduleSettings;
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::grid::{Grid, GridAnomaly, GridCells, OccupiedCell};
use crate::domain::schedule::{ClassFields, EntryPatch, ScheduleEntry};
use crate::domain::types::{ClassType, ScheduleView};
use crate::domain::week::WeekWindow;
use crate::engine::{
    export_week_csv, normalize_calendar_day, resolve_week, AssignCommand,
    ConflictCheckedAssigner, EntryMutator, GridMaterializer, ScheduleRepositories,
};
use crate::i18n::t_in;
use crate::repository::action_log_repo::ActionLogRepository;

/// 最近操作日志的默认/最大条数
const DEFAULT_ACTION_LIMIT: usize = 50;
const MAX_ACTION_LIMIT: usize = 500;

// ==========================================
// ScheduleApi - 排课 API
// ==========================================
pub struct ScheduleApi {
    repos: ScheduleRepositories,
    materializer: GridMaterializer,
    assigner: ConflictCheckedAssigner,
    mutator: EntryMutator,
    action_log_repo: Arc<ActionLogRepository>,
    settings: ScheduleSettings,
}

impl ScheduleApi {
    /// 创建新的 ScheduleApi 实例
    pub fn new(
        repos: ScheduleRepositories,
        action_log_repo: Arc<ActionLogRepository>,
        settings: ScheduleSettings,
    ) -> Self {
        Self {
            materializer: GridMaterializer::new(repos.clone(), settings.clone()),
            assigner: ConflictCheckedAssigner::new(repos.clone(), settings.clone()),
            mutator: EntryMutator::new(repos.clone()),
            repos,
            action_log_repo,
            settings,
        }
    }

    pub fn settings(&self) -> &ScheduleSettings {
        &self.settings
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 查询参考日期所在周的完整网格
    ///
    /// # 参数
    /// - date: `YYYY-MM-DD` 或 RFC 3339 时刻
    pub fn get_week(&self, date: &str) -> ApiResult<WeekScheduleResponse> {
        let week = self.resolve_week_of(date)?;
        let grid = self.materializer.materialize(&week)?;
        Ok(self.build_week_response(grid, ScheduleView::All))
    }

    /// 按类型过滤的周网格（all / lessons / exams）
    pub fn get_week_filtered(&self, date: &str, view: &str) -> ApiResult<WeekScheduleResponse> {
        let view = parse_view(view)?;
        let week = self.resolve_week_of(date)?;
        let grid = self.materializer.materialize(&week)?.filter_view(view);
        Ok(self.build_week_response(grid, view))
    }

    /// 教师视图: 只保留该教师的课程
    pub fn get_teacher_week(&self, teacher_id: i64, date: &str) -> ApiResult<WeekScheduleResponse> {
        let teacher_id = validate_id("teacher_id", teacher_id)?;
        let week = self.resolve_week_of(date)?;
        let course_ids = self.repos.directory.list_course_ids_by_teacher(teacher_id)?;
        let grid = self
            .materializer
            .materialize(&week)?
            .for_teacher(teacher_id, &course_ids);

        debug!(teacher_id, courses = course_ids.len(), "教师周视图");
        Ok(self.build_week_response(grid, ScheduleView::All))
    }

    /// 查询单个条目
    pub fn get_entry(&self, entry_id: i64) -> ApiResult<ScheduleEntry> {
        let entry_id = validate_id("entry_id", entry_id)?;
        self.repos
            .entry_store
            .find_by_id(entry_id)?
            .ok_or_else(|| ApiError::NotFound(format!("ScheduleEntry(id={})不存在", entry_id)))
    }

    /// 导出周课表（CSV）
    ///
    /// # 参数
    /// - date: 参考日期
    /// - view: 可选视图过滤
    /// - locale: 可选语言, 默认使用配置 `ui_locale`
    pub fn export_week_csv(
        &self,
        date: &str,
        view: Option<&str>,
        locale: Option<&str>,
    ) -> ApiResult<String> {
        let view = match view {
            Some(v) => parse_view(v)?,
            None => ScheduleView::All,
        };
        let week = self.resolve_week_of(date)?;
        let grid = self.materializer.materialize(&week)?.filter_view(view);
        let locale = locale.unwrap_or(self.settings.locale.as_str());
        Ok(export_week_csv(&grid, locale)?)
    }

    /// 最近的操作日志
    pub fn list_recent_actions(&self, limit: Option<usize>) -> ApiResult<Vec<ActionLog>> {
        let limit = limit
            .unwrap_or(DEFAULT_ACTION_LIMIT)
            .clamp(1, MAX_ACTION_LIMIT);
        Ok(self.action_log_repo.find_recent(limit)?)
    }

    /// 某条目的操作日志（新在前）
    pub fn list_entry_actions(&self, entry_id: i64) -> ApiResult<Vec<ActionLog>> {
        let entry_id = validate_id("entry_id", entry_id)?;
        Ok(self.action_log_repo.find_by_entry_id(entry_id)?)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 排课
    ///
    /// # 返回
    /// - Ok(OccupiedCell): 新条目及展示字段（与周视图中的单元格一致）
    /// - Err(InvalidInput / ValidationError): 400
    /// - Err(NotFound): 课程不存在
    /// - Err(Conflict): 地址已被占用
    pub fn assign(&self, request: AssignRequest) -> ApiResult<OccupiedCell> {
        let command = AssignCommand {
            course_id: validate_id("course_id", request.course_id)?,
            date: parse_date_input(&request.date)?,
            period: parse_period(&request.period)?,
            slot_index: validate_slot_index(request.slot_index)?,
            fields: ClassFields {
                lesson: request.lesson.clone(),
                class_type: parse_optional_class_type(request.class_type.as_deref())?,
                resource_url: request.resource_url.clone(),
            },
        };

        let cell = self.assigner.assign(command)?;

        let mut log = ActionLog::new(ActionType::Assign, &normalize_actor(request.actor.as_deref()));
        log.entry_id = Some(cell.entry.id);
        log.entry_date = Some(cell.entry.date);
        log.payload_json = Some(serde_json::json!({
            "course_id": cell.entry.course_id,
            "date": cell.entry.date.to_string(),
            "period": cell.entry.period,
            "slot_index": cell.entry.slot_index,
            "lesson_label": cell.entry.lesson_label,
            "class_type": cell.entry.class_type,
        }));
        log.detail = Some(format!(
            "排课: {} → {}/{}/slot{}",
            cell.course_title, cell.entry.date, cell.entry.period, cell.entry.slot_index
        ));
        self.record_action(log);

        Ok(cell)
    }

    /// 修改条目的非地址字段
    pub fn update(&self, entry_id: i64, request: UpdateRequest) -> ApiResult<ScheduleEntry> {
        let entry_id = validate_id("entry_id", entry_id)?;
        let patch = EntryPatch {
            resource_url: request.resource_url.clone(),
            lesson_label: request.lesson_label.clone(),
            class_type: parse_optional_class_type(request.class_type.as_deref())?,
        };

        let updated = self.mutator.update(entry_id, patch.clone())?;

        // 日志记录实际写入的值（已规范化）, 只含本次提交的字段
        let mut payload = serde_json::Map::new();
        if patch.resource_url.is_some() {
            payload.insert("resource_url".to_string(), serde_json::json!(updated.resource_url));
        }
        if patch.lesson_label.is_some() {
            payload.insert("lesson_label".to_string(), serde_json::json!(updated.lesson_label));
        }
        if patch.class_type.is_some() {
            payload.insert("class_type".to_string(), serde_json::json!(updated.class_type));
        }

        let mut log = ActionLog::new(ActionType::Update, &normalize_actor(request.actor.as_deref()));
        log.entry_id = Some(updated.id);
        log.entry_date = Some(updated.date);
        log.payload_json = Some(serde_json::Value::Object(payload));
        log.detail = Some(format!("修改排课条目 {}", updated.id));
        self.record_action(log);

        Ok(updated)
    }

    /// 删除条目（释放地址）
    pub fn remove(&self, entry_id: i64, actor: Option<&str>) -> ApiResult<()> {
        let entry_id = validate_id("entry_id", entry_id)?;
        let removed = self.mutator.remove(entry_id)?;

        let mut log = ActionLog::new(ActionType::Remove, &normalize_actor(actor));
        log.entry_id = Some(removed.id);
        log.entry_date = Some(removed.date);
        log.payload_json = serde_json::to_value(&removed).ok();
        log.detail = Some(format!(
            "删除排课: {}/{}/slot{}",
            removed.date, removed.period, removed.slot_index
        ));
        self.record_action(log);

        Ok(())
    }

    // ==========================================
    // 内部工具
    // ==========================================

    fn resolve_week_of(&self, date: &str) -> ApiResult<WeekWindow> {
        let day = normalize_calendar_day(parse_date_input(date)?, self.settings.calendar_offset());
        Ok(resolve_week(day))
    }

    /// 写入操作日志; 失败只告警, 不回滚业务写入
    fn record_action(&self, log: ActionLog) {
        if let Err(e) = self.action_log_repo.insert(&log) {
            warn!(
                action_type = %log.action_type,
                entry_id = ?log.entry_id,
                "操作日志写入失败: {}",
                e
            );
        }
    }

    fn build_week_response(&self, grid: Grid, view: ScheduleView) -> WeekScheduleResponse {
        let locale = self.settings.locale.as_str();
        let days = grid
            .week
            .days()
            .iter()
            .enumerate()
            .map(|(day_index, date)| DayHeader {
                day_index,
                date: *date,
                label: t_in(&format!("weekday.{}", day_index), locale),
            })
            .collect();

        let legend = ClassType::ALL
            .iter()
            .map(|class_type| LegendItem {
                class_type: *class_type,
                label: t_in(class_type.label_key(), locale),
                color: class_type.legend_color().to_string(),
            })
            .collect();

        WeekScheduleResponse {
            week_start: grid.week.start_date,
            week_end: grid.week.end_date,
            previous_week_start: grid.week.previous().start_date,
            next_week_start: grid.week.next().start_date,
            view,
            days,
            occupied_count: grid.occupied_count(),
            legend,
            anomalies: grid.anomalies,
            cells: grid.cells,
        }
    }
}

// ==========================================
// DTO 类型定义
// ==========================================

/// 排课请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignRequest {
    pub course_id: i64,
    /// `YYYY-MM-DD` 或 RFC 3339 时刻
    pub date: String,
    /// Morning / Afternoon / Evening（兼容 Sáng / Chiều / Tối）
    pub period: String,
    pub slot_index: i64,
    #[serde(default)]
    pub lesson: Option<String>,
    #[serde(default)]
    pub class_type: Option<String>,
    #[serde(default)]
    pub resource_url: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// 修改请求（只含非地址字段）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateRequest {
    #[serde(default)]
    pub resource_url: Option<String>,
    #[serde(default)]
    pub lesson_label: Option<String>,
    #[serde(default)]
    pub class_type: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// 周视图响应
#[derive(Debug, Clone, Serialize)]
pub struct WeekScheduleResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub previous_week_start: NaiveDate,
    pub next_week_start: NaiveDate,
    pub view: ScheduleView,
    pub days: Vec<DayHeader>,
    /// period → day[7] → slot[2]
    pub cells: GridCells,
    pub occupied_count: usize,
    pub legend: Vec<LegendItem>,
    pub anomalies: Vec<GridAnomaly>,
}

/// 列头
#[derive(Debug, Clone, Serialize)]
pub struct DayHeader {
    pub day_index: usize,
    pub date: NaiveDate,
    pub label: String,
}

/// 图例
#[derive(Debug, Clone, Serialize)]
pub struct LegendItem {
    pub class_type: ClassType,
    pub label: String,
    pub color: String,
}
