// ==========================================
// 班级排课看板 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 课表编排看板（冲突提示，人工最终决定）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "sv");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 快照持久化
pub mod repository;

// 引擎层 - 颜色、匹配、冲突、统计
pub mod engine;

// 导入/导出层
pub mod export;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 看板状态管理
pub mod api;

// 应用层 - 命令与终端交互
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BoxId, Day, FilterCondition, RestrictionId, SlotKey, TimePeriod};

// 领域实体
pub use domain::{ClassBox, ExportDocument, Restriction, Schedule, ScheduleSnapshot};

// 引擎
pub use engine::{ColorRegistry, ConflictReport, RestrictionMatcher, SlotFilter};

// API
pub use api::{ApiError, ApiResult, AutoDecision, BoardApi, PlacementOutcome, UiCollaborator};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Schemaläggning";
