// ==========================================
// 班级排课看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户可理解的错误消息
// 红线: 冲突放置被用户拒绝属于正常结果（PlacementOutcome::Declined），不是错误
// ==========================================

use crate::domain::snapshot::SnapshotError;
use crate::domain::types::SlotKey;
use crate::export::ExportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("槽位已被占用: slot={slot}, box_id={occupant}")]
    SlotOccupied { slot: SlotKey, occupant: i64 },

    #[error("盒子已无剩余数量: box_id={0}")]
    QuantityExhausted(i64),

    #[error("限制规则已存在: {pattern1} / {pattern2}")]
    DuplicateRestriction { pattern1: String, pattern2: String },

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 存储与通用错误
    // ==========================================
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 稳定的错误码（命令层输出用）
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::SlotOccupied { .. } => "SLOT_OCCUPIED",
            ApiError::QuantityExhausted(_) => "QUANTITY_EXHAUSTED",
            ApiError::DuplicateRestriction { .. } => "DUPLICATE_RESTRICTION",
            ApiError::ImportError(_) => "IMPORT_ERROR",
            ApiError::ExportError(_) => "EXPORT_ERROR",
            ApiError::StorageError(_) => "STORAGE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Other(_) => "UNKNOWN_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::SnapshotEncodeError(msg) => ApiError::StorageError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::StorageError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::CorruptSnapshot { storage_key, message } => {
                ApiError::StorageError(format!("本地快照{}损坏: {}", storage_key, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<SnapshotError> for ApiError {
    fn from(err: SnapshotError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
