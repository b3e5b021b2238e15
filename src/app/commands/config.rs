use crate::app::state::AppState;
use crate::config::{config_keys, OverridePolicy};

use super::common::input_error;

// ==========================================
// 配置相关命令
// ==========================================

/// 获取全部配置（含默认值）
pub async fn get_config(state: &AppState) -> Result<String, String> {
    state
        .config_manager
        .get_config_snapshot()
        .map_err(|e| format!("读取配置失败: {}", e))
}

/// 写入配置，并立即应用到当前会话
pub async fn set_config(state: &AppState, key: String, value: String) -> Result<String, String> {
    state
        .config_manager
        .set_global_config_value(&key, &value)
        .map_err(|e| input_error(e.to_string()))?;

    match key.as_str() {
        config_keys::UI_LOCALE => crate::i18n::set_locale(&value),
        config_keys::CONFLICT_OVERRIDE_POLICY => {
            let policy: OverridePolicy = value.parse().map_err(input_error)?;
            state.board.lock().await.set_override_policy(policy);
        }
        config_keys::STORAGE_AUTOSAVE => {
            let autosave = value.parse::<bool>().map_err(|e| input_error(e.to_string()))?;
            state.board.lock().await.set_autosave(autosave);
        }
        _ => {}
    }

    tracing::info!(key = %key, value = %value, "配置已更新");
    get_config(state).await
}
