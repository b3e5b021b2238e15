// ==========================================
// 班级排课看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod class_box;
pub mod restriction;
pub mod schedule;
pub mod snapshot;
pub mod types;

// 重导出核心类型
pub use class_box::ClassBox;
pub use restriction::Restriction;
pub use schedule::Schedule;
pub use snapshot::{ExportDocument, ScheduleSnapshot, SnapshotError};
pub use types::{
    BoxId, Day, FilterCondition, RestrictionId, SlotKey, SlotKeyError, TimePeriod, SLOTS_PER_CELL,
};
