// ==========================================
// 班级排课看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)，当前仅使用 global
// ==========================================

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::db::open_sqlite_connection;

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// OverridePolicy - 冲突放置的处理策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OverridePolicy {
    #[default]
    Ask,    // 每次询问用户
    Always, // 始终允许临时覆盖
    Never,  // 始终拒绝
}

impl fmt::Display for OverridePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverridePolicy::Ask => write!(f, "ASK"),
            OverridePolicy::Always => write!(f, "ALWAYS"),
            OverridePolicy::Never => write!(f, "NEVER"),
        }
    }
}

impl FromStr for OverridePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASK" => Ok(OverridePolicy::Ask),
            "ALWAYS" => Ok(OverridePolicy::Always),
            "NEVER" => Ok(OverridePolicy::Never),
            other => Err(format!("未知覆盖策略: {}", other)),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA 并确保表结构存在（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 读取 global scope 的配置值（公开方法，供命令层复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    ///
    /// 已知键会先校验取值，非法值直接拒绝
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        validate_value(key, value)?;

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
            params![GLOBAL_SCOPE, key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式，包含未写入键的默认值）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let mut config_map: BTreeMap<String, String> = config_keys::DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 界面 =====

    pub fn get_locale(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::UI_LOCALE, config_keys::DEFAULT_LOCALE)
    }

    // ===== 冲突处理 =====

    /// 冲突覆盖策略；存储值无法识别时回退为 ASK
    pub fn get_override_policy(&self) -> Result<OverridePolicy, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::CONFLICT_OVERRIDE_POLICY, "ASK")?;
        Ok(value.parse().unwrap_or_else(|e: String| {
            warn!(value = %value, error = %e, "覆盖策略配置无效，回退为 ASK");
            OverridePolicy::Ask
        }))
    }

    // ===== 存储 =====

    pub fn get_autosave(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::STORAGE_AUTOSAVE, "true")?;
        Ok(value.parse::<bool>().unwrap_or(true))
    }

    // ===== 导出 =====

    pub fn get_json_file_name(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::EXPORT_JSON_FILE_NAME, "schema-export.json")
    }

    pub fn get_pdf_file_name(&self) -> Result<String, Box<dyn Error>> {
        self.get_config_or_default(config_keys::EXPORT_PDF_FILE_NAME, "schema.pdf")
    }
}

fn validate_value(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    match key {
        config_keys::UI_LOCALE => {
            if !crate::i18n::is_supported_locale(value) {
                return Err(format!("不支持的语言: {}", value).into());
            }
        }
        config_keys::CONFLICT_OVERRIDE_POLICY => {
            value.parse::<OverridePolicy>()?;
        }
        config_keys::STORAGE_AUTOSAVE => {
            value
                .parse::<bool>()
                .map_err(|_| format!("{} 须为 true/false", key))?;
        }
        config_keys::EXPORT_JSON_FILE_NAME | config_keys::EXPORT_PDF_FILE_NAME => {
            if value.trim().is_empty() {
                return Err(format!("{} 不能为空", key).into());
            }
        }
        _ => {}
    }
    Ok(())
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 界面
    pub const UI_LOCALE: &str = "ui.locale";
    pub const DEFAULT_LOCALE: &str = crate::i18n::DEFAULT_LOCALE;

    // 冲突处理
    pub const CONFLICT_OVERRIDE_POLICY: &str = "conflict.override_policy";

    // 存储
    pub const STORAGE_AUTOSAVE: &str = "storage.autosave";

    // 导出
    pub const EXPORT_JSON_FILE_NAME: &str = "export.json_file_name";
    pub const EXPORT_PDF_FILE_NAME: &str = "export.pdf_file_name";

    pub const DEFAULTS: [(&str, &str); 5] = [
        (UI_LOCALE, DEFAULT_LOCALE),
        (CONFLICT_OVERRIDE_POLICY, "ASK"),
        (STORAGE_AUTOSAVE, "true"),
        (EXPORT_JSON_FILE_NAME, "schema-export.json"),
        (EXPORT_PDF_FILE_NAME, "schema.pdf"),
    ];
}
