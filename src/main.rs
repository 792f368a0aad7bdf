// ==========================================
// 周课表排课引擎 - 命令行入口
// ==========================================
// 用法:
//   weekly-schedule week <date> [all|lessons|exams]
//   weekly-schedule teacher-week <teacher_id> <date>
//   weekly-schedule get <entry_id>
//   weekly-schedule assign '<AssignRequest JSON>'
//   weekly-schedule update <entry_id> '<UpdateRequest JSON>'
//   weekly-schedule remove <entry_id> [actor]
//   weekly-schedule export <date> [view] [locale]
//   weekly-schedule actions [limit]
//   weekly-schedule entry-actions <entry_id>
//   weekly-schedule config
//   weekly-schedule seed-teacher <teacher_id> <name>
//   weekly-schedule seed-course '<CourseInfo JSON>'
//
// 数据库路径: 环境变量 WEEKLY_SCHEDULE_DB_PATH 或用户数据目录
// ==========================================

use anyhow::{anyhow, Context};
use weekly_schedule::app::{commands, get_default_db_path, AppState};

const USAGE: &str = "usage: weekly-schedule <week|teacher-week|get|assign|update|remove|export|actions|entry-actions|config|seed-teacher|seed-course> [args...]";

fn main() -> anyhow::Result<()> {
    weekly_schedule::logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    };

    let db_path = get_default_db_path();
    tracing::info!("{} v{} 使用数据库: {}", weekly_schedule::APP_NAME, weekly_schedule::VERSION, db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;
    let locale = weekly_schedule::i18n::normalize_locale(&state.schedule_api.settings().locale);
    weekly_schedule::i18n::set_locale(locale);

    match run(&state, command, &args[1..])? {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(error_json) => {
            eprintln!("{}", error_json);
            std::process::exit(1);
        }
    }
}

/// 外层 Err 为命令行参数错误, 内层 Err 为命令返回的 ErrorResponse JSON
fn run(state: &AppState, command: &str, rest: &[String]) -> anyhow::Result<Result<String, String>> {
    let result = match command {
        "week" => match rest.get(1) {
            Some(view) => commands::get_week_filtered(state, arg(rest, 0, "date")?, view),
            None => commands::get_week(state, arg(rest, 0, "date")?),
        },
        "teacher-week" => {
            commands::get_teacher_week(state, id_arg(rest, 0, "teacher_id")?, arg(rest, 1, "date")?)
        }
        "get" => commands::get_entry(state, id_arg(rest, 0, "entry_id")?),
        "assign" => commands::assign_entry(state, arg(rest, 0, "request_json")?),
        "update" => commands::update_entry(
            state,
            id_arg(rest, 0, "entry_id")?,
            arg(rest, 1, "request_json")?,
        ),
        "remove" => commands::remove_entry(
            state,
            id_arg(rest, 0, "entry_id")?,
            rest.get(1).map(String::as_str),
        ),
        "export" => commands::export_week_csv(
            state,
            arg(rest, 0, "date")?,
            rest.get(1).map(String::as_str),
            rest.get(2).map(String::as_str),
        ),
        "actions" => {
            let limit = match rest.first() {
                Some(raw) => Some(raw.parse::<usize>().context("limit 必须为非负整数")?),
                None => None,
            };
            commands::list_recent_actions(state, limit)
        }
        "entry-actions" => commands::list_entry_actions(state, id_arg(rest, 0, "entry_id")?),
        "config" => commands::get_config(state),
        "seed-teacher" => {
            commands::upsert_teacher(state, id_arg(rest, 0, "teacher_id")?, arg(rest, 1, "name")?)
        }
        "seed-course" => commands::upsert_course(state, arg(rest, 0, "course_json")?),
        other => return Err(anyhow!("未知命令: {}\n{}", other, USAGE)),
    };
    Ok(result)
}

fn arg<'a>(rest: &'a [String], idx: usize, name: &str) -> anyhow::Result<&'a str> {
    rest.get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("缺少参数 <{}>\n{}", name, USAGE))
}

fn id_arg(rest: &[String], idx: usize, name: &str) -> anyhow::Result<i64> {
    arg(rest, idx, name)?
        .parse::<i64>()
        .with_context(|| format!("参数 <{}> 必须为整数", name))
}
