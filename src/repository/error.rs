// ==========================================
// 班级排课看板 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 覆盖: 连接/锁/SQL 失败，快照编码失败，已存快照损坏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    /// 快照写入前 JSON 编码失败
    #[error("快照编码失败: {0}")]
    SnapshotEncodeError(String),

    /// 已存储的快照无法通过文档校验
    #[error("本地快照已损坏 (key={storage_key}): {message}")]
    CorruptSnapshot { storage_key: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => RepositoryError::DatabaseQueryError(msg),
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::SnapshotEncodeError(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
