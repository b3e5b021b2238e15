// ==========================================
// 班级排课看板 - 命令层（按域拆分）
// ==========================================
// 职责: 每个用户操作一个命令，返回 JSON 字符串或映射后的错误 JSON
// ==========================================

mod board;
mod common;
mod config;
mod report;
mod restriction;
mod transfer;

pub use board::*;
pub use common::ErrorResponse;
pub use config::*;
pub use report::*;
pub use restriction::*;
pub use transfer::*;
