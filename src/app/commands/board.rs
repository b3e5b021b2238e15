use serde_json::json;

use crate::app::state::AppState;
use crate::i18n::t;

use super::common::{map_api_error, parse_slot, to_json};

// ==========================================
// 盒子与放置相关命令
// ==========================================

/// 创建盒子（同班级同教师时累加数量）
pub async fn create_box(
    state: &AppState,
    class_name: String,
    teacher: String,
    quantity: i64,
) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let result = board
        .create_box(&class_name, &teacher, quantity)
        .map_err(map_api_error)?;
    to_json(&result)
}

/// 列出所有盒子（附放置位置描述）
pub async fn list_boxes(state: &AppState) -> Result<String, String> {
    let board = state.board.lock().await;
    let items: Vec<_> = board
        .boxes()
        .iter()
        .map(|b| {
            json!({
                "box": b,
                "placements": crate::engine::box_placements(b.id, board.schedule()),
            })
        })
        .collect();
    to_json(&items)
}

/// 调整数量（正数增加、负数减少，下限 0）
pub async fn adjust_quantity(state: &AppState, box_id: i64, delta: i64) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let result = board.adjust_quantity(box_id, delta).map_err(map_api_error)?;
    to_json(&result)
}

/// 修改教师
pub async fn edit_teacher(state: &AppState, box_id: i64, teacher: String) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let result = board.edit_teacher(box_id, &teacher).map_err(map_api_error)?;
    to_json(&result)
}

/// 删除盒子（需确认）
pub async fn delete_box(state: &AppState, box_id: i64) -> Result<String, String> {
    if !state.ui.confirm(&t("board.delete_confirm")) {
        return to_json(&json!({ "cancelled": true }));
    }
    let mut board = state.board.lock().await;
    let removed = board.delete_box(box_id).map_err(map_api_error)?;
    to_json(&json!({ "cancelled": false, "removed": removed }))
}

/// 放置盒子
pub async fn place_box(state: &AppState, box_id: i64, slot: String) -> Result<String, String> {
    let key = parse_slot(&slot)?;
    let mut board = state.board.lock().await;
    let outcome = board.place_box(box_id, key).map_err(map_api_error)?;
    to_json(&outcome)
}

/// 从槽位移出
pub async fn remove_from_slot(state: &AppState, slot: String) -> Result<String, String> {
    let key = parse_slot(&slot)?;
    let mut board = state.board.lock().await;
    let removed = board.remove_from_slot(&key);
    to_json(&json!({ "slot": key, "removedBoxId": removed }))
}

/// 清空课表（需确认）
pub async fn clear_schedule(state: &AppState) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let cleared = board.clear_schedule();
    to_json(&json!({ "cancelled": cleared.is_none(), "returned": cleared.unwrap_or(0) }))
}

/// 重置看板（需确认）
pub async fn reset_board(state: &AppState) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let done = board.reset_board();
    to_json(&json!({ "cancelled": !done }))
}
