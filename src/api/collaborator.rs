// ==========================================
// 班级排课看板 - 外部交互协作方
// ==========================================
// 职责: 定义确认/提示 trait，由应用层（终端、测试）实现
// 说明: 状态管理器只依赖 trait，不依赖具体界面
// ==========================================

use tracing::info;

/// 用户交互协作方
pub trait UiCollaborator: Send + Sync {
    /// 请求用户确认；返回 true 表示接受
    fn confirm(&self, message: &str) -> bool;

    /// 向用户展示提示（校验失败等）
    fn notify(&self, message: &str);
}

// ==========================================
// AutoDecision - 无界面时的固定决策
// ==========================================
/// 所有确认请求给出固定答复，提示只写日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDecision {
    Accept,
    Decline,
}

impl UiCollaborator for AutoDecision {
    fn confirm(&self, message: &str) -> bool {
        let accepted = matches!(self, AutoDecision::Accept);
        info!(accepted, message, "自动确认");
        accepted
    }

    fn notify(&self, message: &str) {
        info!(message, "提示");
    }
}
