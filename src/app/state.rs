// ==========================================
// 班级排课看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

use crate::api::{BoardApi, UiCollaborator};
use crate::config::config_manager::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::repository::SnapshotRepository;

/// 应用状态
///
/// 看板状态由异步锁保护：导入/导出跨 await 持有，保证与其他修改不重叠
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 看板状态管理API
    pub board: AsyncMutex<BoardApi>,

    /// 用户交互协作方（删除确认等命令层交互）
    pub ui: Arc<dyn UiCollaborator>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享数据库连接并建表
    /// 2. 读取配置并应用语言
    /// 3. 加载本地快照并创建看板API
    pub fn new(db_path: String, ui: Arc<dyn UiCollaborator>) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn: Connection =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        match config_manager.get_locale() {
            Ok(locale) => crate::i18n::set_locale(&locale),
            Err(e) => tracing::warn!("语言配置读取失败，使用默认语言: {}", e),
        }

        let snapshot_repo = Arc::new(SnapshotRepository::from_connection(conn));
        let mut board = BoardApi::with_repository(snapshot_repo, ui.clone());

        let policy = config_manager
            .get_override_policy()
            .map_err(|e| format!("无法读取覆盖策略: {}", e))?;
        board.set_override_policy(policy);

        let autosave = config_manager
            .get_autosave()
            .map_err(|e| format!("无法读取自动保存配置: {}", e))?;
        board.set_autosave(autosave);

        tracing::info!(
            override_policy = %policy,
            autosave,
            boxes = board.boxes().len(),
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            config_manager,
            board: AsyncMutex::new(board),
            ui,
        })
    }
}

/// 默认数据库路径
///
/// 顺序: 环境变量 CLASS_SCHEDULE_BOARD_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("CLASS_SCHEDULE_BOARD_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./class_schedule_board.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("class-schedule-board");
        match std::fs::create_dir_all(&dir) {
            Ok(()) => path = dir.join("class_schedule_board.db"),
            Err(e) => tracing::warn!("无法创建数据目录 {}: {}", dir.display(), e),
        }
    }

    path.to_string_lossy().to_string()
}
