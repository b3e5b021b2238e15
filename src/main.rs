// ==========================================
// 班级排课看板 - 命令行主入口
// ==========================================
// 每个子命令对应一个用户操作，结果以 JSON 输出到 stdout
// 错误以 {code, message, details} JSON 输出到 stderr，退出码 1
// ==========================================

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use class_schedule_board::app::{commands, get_default_db_path, AppState, TerminalPrompt};
use class_schedule_board::logging;

#[derive(Parser, Debug)]
#[command(name = "class-schedule-board", version, about = "Veckoschema med lådor och restriktioner")]
struct Cli {
    /// 数据库路径（默认取 CLASS_SCHEDULE_BOARD_DB_PATH 或用户数据目录）
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 盒子管理
    #[command(subcommand, name = "box")]
    Boxes(BoxCommand),

    /// 放置盒子: place <box_id> <Måndag-8:30-9:30-0>
    Place { box_id: i64, slot: String },

    /// 从槽位移出
    Remove { slot: String },

    /// 限制规则管理
    #[command(subcommand)]
    Restriction(RestrictionCommand),

    /// 检查课表冲突
    Check,

    /// 按班级/教师统计
    Stats,

    /// 搜索盒子（';' 分隔条件，'+' 组合词）
    Search { text: String },

    /// 高亮过滤
    Filter {
        #[arg(long)]
        label1: Option<String>,
        #[arg(long)]
        label2: Option<String>,
        /// both | neither | x-not-y
        #[arg(long, default_value = "both")]
        condition: String,
    },

    /// 清空课表（放置回补到盒子）
    Clear,

    /// 重置全部数据
    Reset,

    /// 从 JSON 文件导入
    Import { path: String },

    /// 导出 JSON 文件
    Export { path: Option<String> },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum BoxCommand {
    /// 创建盒子
    Add {
        class_name: String,
        teacher: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// 列出盒子
    List,
    /// 调整数量
    Adjust {
        box_id: i64,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// 修改教师
    Teacher { box_id: i64, teacher: String },
    /// 删除盒子
    Delete { box_id: i64 },
}

#[derive(Subcommand, Debug)]
enum RestrictionCommand {
    /// 添加限制规则
    Add { pattern1: String, pattern2: String },
    /// 列出限制规则
    List,
    /// 删除限制规则
    Delete { restriction_id: i64 },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// 查看全部配置
    Get,
    /// 写入配置
    Set { key: String, value: String },
}

async fn dispatch(state: &AppState, command: Command) -> Result<String, String> {
    match command {
        Command::Boxes(cmd) => match cmd {
            BoxCommand::Add {
                class_name,
                teacher,
                quantity,
            } => commands::create_box(state, class_name, teacher, quantity).await,
            BoxCommand::List => commands::list_boxes(state).await,
            BoxCommand::Adjust { box_id, delta } => {
                commands::adjust_quantity(state, box_id, delta).await
            }
            BoxCommand::Teacher { box_id, teacher } => {
                commands::edit_teacher(state, box_id, teacher).await
            }
            BoxCommand::Delete { box_id } => commands::delete_box(state, box_id).await,
        },
        Command::Place { box_id, slot } => commands::place_box(state, box_id, slot).await,
        Command::Remove { slot } => commands::remove_from_slot(state, slot).await,
        Command::Restriction(cmd) => match cmd {
            RestrictionCommand::Add { pattern1, pattern2 } => {
                commands::add_restriction(state, pattern1, pattern2).await
            }
            RestrictionCommand::List => commands::list_restrictions(state).await,
            RestrictionCommand::Delete { restriction_id } => {
                commands::delete_restriction(state, restriction_id).await
            }
        },
        Command::Check => commands::check_conflicts(state).await,
        Command::Stats => commands::get_statistics(state).await,
        Command::Search { text } => commands::search(state, text).await,
        Command::Filter {
            label1,
            label2,
            condition,
        } => commands::filter_slots(state, label1, label2, condition).await,
        Command::Clear => commands::clear_schedule(state).await,
        Command::Reset => commands::reset_board(state).await,
        Command::Import { path } => commands::import_schedule(state, path).await,
        Command::Export { path } => commands::export_schedule(state, path).await,
        Command::Config(cmd) => match cmd {
            ConfigCommand::Get => commands::get_config(state).await,
            ConfigCommand::Set { key, value } => commands::set_config(state, key, value).await,
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(get_default_db_path);
    tracing::debug!("使用数据库: {}", db_path);

    let state = match AppState::new(db_path, Arc::new(TerminalPrompt)) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match dispatch(&state, cli.command).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
