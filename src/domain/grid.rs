// ==========================================
// 周课表排课引擎 - 周网格
// ==========================================
// 结构: 课段(3) × 天(7) × 槽位(2) = 42 个单元格
// 线格式: period → day[7] → slot[2]
//   空单元格:   {"type":"empty"}
//   已占单元格: {"type":"occupied", entry, course_title, ...}
// ==========================================

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::schedule::ScheduleEntry;
use crate::domain::types::{Period, ScheduleView, DAYS_PER_WEEK, SLOTS_PER_PERIOD};
use crate::domain::week::WeekWindow;

// ==========================================
// GridCell - 单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GridCell {
    Empty,
    Occupied(OccupiedCell),
}

impl GridCell {
    pub fn is_empty(&self) -> bool {
        matches!(self, GridCell::Empty)
    }

    pub fn as_occupied(&self) -> Option<&OccupiedCell> {
        match self {
            GridCell::Occupied(cell) => Some(cell),
            GridCell::Empty => None,
        }
    }
}

/// 已占单元格（条目 + 展示字段）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupiedCell {
    pub entry: ScheduleEntry,
    pub day_index: usize,
    pub course_title: String,
    pub teacher_name: String,
    pub color: String,
    pub lesson_label: String,
}

// ==========================================
// GridAnomaly - 物化时跳过的条目
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyReason {
    SlotOutOfRange, // 槽位不在 {0,1}
    OutsideWeek,    // 日期不在周窗口内
    DuplicateAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridAnomaly {
    pub entry_id: i64,
    pub reason: AnomalyReason,
    pub detail: String,
}

type PeriodRow = [[GridCell; SLOTS_PER_PERIOD]; DAYS_PER_WEEK];

/// 三个课段的单元格, 序列化为以课段名为键的对象
#[derive(Debug, Clone, PartialEq)]
pub struct GridCells([PeriodRow; 3]);

impl Serialize for GridCells {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Period::ALL.len()))?;
        for period in Period::ALL {
            map.serialize_entry(&period, &self.0[period.index()])?;
        }
        map.end()
    }
}

fn empty_row() -> PeriodRow {
    std::array::from_fn(|_| std::array::from_fn(|_| GridCell::Empty))
}

// ==========================================
// Grid - 周网格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    pub week: WeekWindow,
    pub cells: GridCells,
    pub anomalies: Vec<GridAnomaly>,
}

impl Grid {
    /// 全空网格
    pub fn empty(week: WeekWindow) -> Self {
        Self {
            week,
            cells: GridCells([empty_row(), empty_row(), empty_row()]),
            anomalies: Vec::new(),
        }
    }

    /// 读取单元格; day/slot 越界返回 None
    pub fn cell(&self, period: Period, day_index: usize, slot_index: usize) -> Option<&GridCell> {
        self.cells.0[period.index()]
            .get(day_index)
            .and_then(|day| day.get(slot_index))
    }

    /// 写入单元格; day/slot 越界返回 false
    pub(crate) fn set(
        &mut self,
        period: Period,
        day_index: usize,
        slot_index: usize,
        cell: GridCell,
    ) -> bool {
        match self.cells.0[period.index()]
            .get_mut(day_index)
            .and_then(|day| day.get_mut(slot_index))
        {
            Some(target) => {
                *target = cell;
                true
            }
            None => false,
        }
    }

    /// 单元格总数（恒为 42）
    pub fn cell_count(&self) -> usize {
        self.cells
            .0
            .iter()
            .map(|row| row.iter().map(|day| day.len()).sum::<usize>())
            .sum()
    }

    /// 遍历所有已占单元格: (课段, 天, 槽位, 单元格)
    pub fn occupied(&self) -> impl Iterator<Item = (Period, usize, usize, &OccupiedCell)> + '_ {
        Period::ALL.into_iter().flat_map(move |period| {
            self.cells.0[period.index()]
                .iter()
                .enumerate()
                .flat_map(move |(day, slots)| {
                    slots.iter().enumerate().filter_map(move |(slot, cell)| {
                        cell.as_occupied().map(|c| (period, day, slot, c))
                    })
                })
        })
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// 按谓词保留已占单元格, 其余置空
    fn retain_occupied<F>(&self, keep: F) -> Grid
    where
        F: Fn(&OccupiedCell) -> bool,
    {
        let mut filtered = self.clone();
        for row in filtered.cells.0.iter_mut() {
            for day in row.iter_mut() {
                for cell in day.iter_mut() {
                    let clear = cell.as_occupied().map(|c| !keep(c)).unwrap_or(false);
                    if clear {
                        *cell = GridCell::Empty;
                    }
                }
            }
        }
        filtered
    }

    /// 教师视图: 课程属于该教师或条目教师为该教师时保留
    pub fn for_teacher(&self, teacher_id: i64, course_ids: &[i64]) -> Grid {
        self.retain_occupied(|cell| {
            cell.entry.teacher_id == teacher_id || course_ids.contains(&cell.entry.course_id)
        })
    }

    /// 类型视图: 全部 / 课程 / 考试
    pub fn filter_view(&self, view: ScheduleView) -> Grid {
        self.retain_occupied(|cell| view.accepts(cell.entry.class_type))
    }
}
