use std::path::PathBuf;

use crate::app::state::AppState;
use crate::i18n::{t, t_with_args};

use super::common::{map_api_error, to_json};

// ==========================================
// 导入/导出命令
// ==========================================

/// 从 JSON 文件导入（原子替换当前看板）
pub async fn import_schedule(state: &AppState, path: String) -> Result<String, String> {
    let mut board = state.board.lock().await;
    let summary = board
        .import_file(&PathBuf::from(path))
        .await
        .map_err(map_api_error)?;
    state.ui.notify(&t("import.success"));
    to_json(&summary)
}

/// 导出 JSON 文件；未指定路径时使用配置的默认文件名
pub async fn export_schedule(state: &AppState, path: Option<String>) -> Result<String, String> {
    let path = match path {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(
            state
                .config_manager
                .get_json_file_name()
                .map_err(|e| format!("无法读取导出文件名: {}", e))?,
        ),
    };

    let board = state.board.lock().await;
    let document = board.export_json_file(&path).await.map_err(map_api_error)?;
    let shown = path.display().to_string();
    state
        .ui
        .notify(&t_with_args("export.success", &[("path", shown.as_str())]));
    to_json(&serde_json::json!({
        "path": path.display().to_string(),
        "exportDate": document.export_date,
        "boxes": document.snapshot.boxes.len(),
        "placements": document.snapshot.schedule.len(),
    }))
}
