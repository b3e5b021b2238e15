use crate::app::state::AppState;

use super::common::{map_api_error, to_json};

// ==========================================
// 限制规则相关命令
// ==========================================

/// 添加限制规则
pub async fn add_restriction(
    state: &AppState,
    pattern1: String,
    pattern2: String,
) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let result = board
        .add_restriction(&pattern1, &pattern2)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 列出限制规则
pub async fn list_restrictions(state: &AppState) -> Result<String, String> {
    let board = state.board.lock().await;
    to_json(&board.restrictions())
}

/// 删除限制规则
pub async fn delete_restriction(state: &AppState, restriction_id: i64) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let removed = board
        .delete_restriction(restriction_id)
        .map_err(map_api_error)?;
    to_json(&removed)
}
