// ==========================================
// 班级排课看板 - 应用层
// ==========================================
// 职责: 应用状态、命令层、终端交互
// ==========================================

pub mod commands;
pub mod prompt;
pub mod state;

// 重导出
pub use prompt::TerminalPrompt;
pub use state::{get_default_db_path, AppState};
