use serde_json::json;

use crate::app::state::AppState;
use crate::domain::types::FilterCondition;
use crate::engine::{
    class_statistics, highlighted_slots, parse_search_text, search_boxes, teacher_statistics,
    SlotFilter,
};

use super::common::{input_error, to_json};

// ==========================================
// 只读查询命令：冲突检查、统计、搜索、高亮
// ==========================================

/// 检查当前课表的所有冲突
pub async fn check_conflicts(state: &AppState) -> Result<String, String> {
    let board = state.board.lock().await;
    let violations = board.violations();
    to_json(&json!({
        "valid": violations.is_empty(),
        "violations": violations,
    }))
}

/// 按班级、教师统计放置
pub async fn get_statistics(state: &AppState) -> Result<String, String> {
    let board = state.board.lock().await;
    to_json(&json!({
        "classes": class_statistics(board.schedule(), board.boxes()),
        "teachers": teacher_statistics(board.schedule(), board.boxes()),
    }))
}

/// 搜索盒子（';' 分隔条件，'+' 组合词）
pub async fn search(state: &AppState, text: String) -> Result<String, String> {
    let board = state.board.lock().await;
    let criteria = parse_search_text(&text);
    let hits = search_boxes(board.boxes(), &criteria);
    to_json(&json!({ "criteria": criteria, "boxes": hits }))
}

/// 按过滤条件计算高亮槽位
pub async fn filter_slots(
    state: &AppState,
    label1: Option<String>,
    label2: Option<String>,
    condition: String,
) -> Result<String, String> {
    let condition: FilterCondition = condition.parse().map_err(input_error)?;
    let filter = SlotFilter::new(label1.as_deref(), label2.as_deref(), condition);

    let board = state.board.lock().await;
    let slots = highlighted_slots(board.schedule(), board.boxes(), &filter);
    to_json(&json!({ "filter": filter, "slots": slots }))
}
