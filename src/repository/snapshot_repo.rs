// ==========================================
// 班级排课看板 - 看板快照仓储
// ==========================================
// 存储: board_state 表，单键 "scheduleState"，整份快照一条 JSON
// 红线: Repository 不含业务逻辑；快照整体写入，保证原子性
// ==========================================

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::db::open_sqlite_connection;
use crate::domain::snapshot::ScheduleSnapshot;
use crate::repository::error::{RepositoryError, RepositoryResult};

/// 本地存储键
pub const STORAGE_KEY: &str = "scheduleState";

// ==========================================
// SnapshotRepository - 看板快照仓储
// ==========================================
pub struct SnapshotRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SnapshotRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(format!("{}: {}", db_path, e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例（连接须已完成 init_schema）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存快照（INSERT OR REPLACE）
    pub fn save(&self, snapshot: &ScheduleSnapshot) -> RepositoryResult<()> {
        let payload = serde_json::to_string(&snapshot.normalized())?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO board_state (storage_key, payload, saved_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![STORAGE_KEY, payload, Utc::now().to_rfc3339()],
        )?;
        debug!(
            boxes = snapshot.boxes.len(),
            placements = snapshot.schedule.len(),
            restrictions = snapshot.restrictions.len(),
            "看板快照已保存"
        );
        Ok(())
    }

    /// 读取快照；从未保存过时返回 None
    ///
    /// 已存储的内容同样走导入文档校验，损坏的快照返回 CorruptSnapshot
    pub fn load(&self) -> RepositoryResult<Option<ScheduleSnapshot>> {
        let conn = self.get_conn()?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM board_state WHERE storage_key = ?1",
                params![STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(None),
            Some(raw) => ScheduleSnapshot::from_json_document(&raw)
                .map(Some)
                .map_err(|e| RepositoryError::CorruptSnapshot {
                    storage_key: STORAGE_KEY.to_string(),
                    message: e.to_string(),
                }),
        }
    }

    /// 删除已保存的快照
    pub fn clear(&self) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "DELETE FROM board_state WHERE storage_key = ?1",
            params![STORAGE_KEY],
        )?;
        Ok(())
    }
}
