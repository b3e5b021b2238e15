use crate::api::error::ApiError;
use crate::domain::types::SlotKey;
use serde::{Deserialize, Serialize};

// ==========================================
// 公共工具：错误映射、槽位解析、结果序列化
// ==========================================

/// 错误响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,

    /// 详细信息（可选）
    pub details: Option<serde_json::Value>,
}

/// 将ApiError转换为JSON字符串
pub(super) fn map_api_error(err: ApiError) -> String {
    let error_response = ErrorResponse {
        code: err.code().to_string(),
        message: err.to_string(),
        details: match &err {
            ApiError::SlotOccupied { slot, occupant } => Some(serde_json::json!({
                "slot": slot,
                "occupant": occupant,
            })),
            ApiError::QuantityExhausted(box_id) => Some(serde_json::json!({ "boxId": box_id })),
            ApiError::DuplicateRestriction { pattern1, pattern2 } => Some(serde_json::json!({
                "pattern1": pattern1,
                "pattern2": pattern2,
            })),
            _ => None,
        },
    };

    serde_json::to_string(&error_response).unwrap_or_else(|_| err.to_string())
}

/// 命令层输入错误（未进入 API 层）
pub(super) fn input_error(message: String) -> String {
    map_api_error(ApiError::InvalidInput(message))
}

/// 解析槽位键字符串: "<星期>-<节次>-<序号>"
pub(super) fn parse_slot(slot: &str) -> Result<SlotKey, String> {
    slot.trim()
        .parse::<SlotKey>()
        .map_err(|e| input_error(format!("槽位格式错误（应为 Måndag-8:30-9:30-0）: {}", e)))
}

pub(super) fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}
