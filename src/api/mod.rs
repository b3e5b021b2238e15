// ==========================================
// 班级排课看板 - API 层
// ==========================================
// 职责: 看板状态管理接口，供命令层调用
// ==========================================

pub mod board_api;
pub mod collaborator;
pub mod error;

// 重导出核心类型
pub use board_api::{BoardApi, ImportSummary, PlacementOutcome};
pub use collaborator::{AutoDecision, UiCollaborator};
pub use error::{ApiError, ApiResult};
