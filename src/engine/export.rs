// ==========================================
// 周课表排课引擎 - 周课表导出 (CSV)
// ==========================================
// 格式:
//   表头: Buổi, Thứ 2 dd/mm/yyyy, ..., Chủ nhật dd/mm/yyyy
//   每个 (课段, 槽位) 一行, 共 6 行
//   单元格: "课程 | 课时 | 教师 | 类型" 或空
// ==========================================

use tracing::debug;

use crate::domain::grid::{Grid, GridCell};
use crate::domain::types::{Period, SLOTS_PER_PERIOD};
use crate::engine::error::{ScheduleError, ScheduleResult};
use crate::i18n::{normalize_locale, t_in, t_with_args};

/// 将已物化的周网格渲染为 CSV
///
/// # 参数
/// - grid: 已物化（可已过滤）的周网格
/// - locale: 表头/标签语言, 不支持时回退为越南语
pub fn export_week_csv(grid: &Grid, locale: &str) -> ScheduleResult<String> {
    let locale = normalize_locale(locale);
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = Vec::with_capacity(grid.week.days().len() + 1);
    header.push(t_in("export.period_header", locale));
    for (idx, day) in grid.week.days().iter().enumerate() {
        header.push(format!(
            "{} {}",
            t_in(&format!("weekday.{}", idx), locale),
            day.format("%d/%m/%Y")
        ));
    }
    writer.write_record(&header).map_err(csv_error)?;

    for period in Period::ALL {
        let period_label = t_in(period.label_key(), locale);
        for slot in 0..SLOTS_PER_PERIOD {
            let slot_no = (slot + 1).to_string();
            let mut record = vec![t_with_args(
                "export.slot",
                locale,
                &[("period", period_label.as_str()), ("slot", slot_no.as_str())],
            )];
            for day in 0..grid.week.days().len() {
                record.push(render_cell(grid.cell(period, day, slot), locale));
            }
            writer.write_record(&record).map_err(csv_error)?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScheduleError::Export(e.to_string()))?;
    let csv = String::from_utf8(bytes).map_err(|e| ScheduleError::Export(e.to_string()))?;

    debug!(
        week_start = %grid.week.start_date,
        occupied = grid.occupied_count(),
        locale,
        "周课表已导出"
    );
    Ok(csv)
}

fn render_cell(cell: Option<&GridCell>, locale: &str) -> String {
    match cell.and_then(GridCell::as_occupied) {
        Some(cell) => format!(
            "{} | {} | {} | {}",
            cell.course_title,
            cell.lesson_label,
            cell.teacher_name,
            t_in(cell.entry.class_type.label_key(), locale)
        ),
        None => String::new(),
    }
}

fn csv_error(err: csv::Error) -> ScheduleError {
    ScheduleError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleSettings;
    use crate::domain::schedule::ClassFields;
    use crate::domain::types::ClassType;
    use crate::engine::assigner::{AssignCommand, ConflictCheckedAssigner};
    use crate::engine::grid_materializer::GridMaterializer;
    use crate::engine::test_support::{d, seeded_sqlite};
    use crate::engine::week_resolver::{resolve_week, DateInput};

    #[test]
    fn test_export_layout() {
        let (repos, _) = seeded_sqlite();
        ConflictCheckedAssigner::new(repos.clone(), ScheduleSettings::default())
            .assign(AssignCommand {
                course_id: 7,
                date: DateInput::Day(d(2025, 3, 12)),
                period: Period::Afternoon,
                slot_index: 1,
                fields: ClassFields {
                    class_type: Some(ClassType::Exam),
                    ..Default::default()
                },
            })
            .unwrap();
        let grid = GridMaterializer::new(repos, ScheduleSettings::default())
            .materialize(&resolve_week(d(2025, 3, 12)))
            .unwrap();

        let csv = export_week_csv(&grid, "vi").unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());

        let header = reader.headers().unwrap().clone();
        assert_eq!(header.len(), 8);
        assert_eq!(&header[0], "Buổi");
        assert_eq!(&header[1], "Thứ 2 10/03/2025");
        assert_eq!(&header[7], "Chủ nhật 16/03/2025");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 6);
        assert_eq!(&rows[3][0], "Chiều - Slot 2");
        assert_eq!(
            &rows[3][3],
            "Vật lý đại cương | Tiết 3 | Trần Thị B | Lịch thi"
        );
        assert_eq!(&rows[0][1], "");
    }

    #[test]
    fn test_export_unknown_locale_falls_back() {
        let grid = Grid::empty(resolve_week(d(2025, 3, 12)));
        let csv = export_week_csv(&grid, "fr").unwrap();
        assert!(csv.starts_with("Buổi,Thứ 2 10/03/2025"));
        assert_eq!(csv.lines().count(), 7);
    }
}
