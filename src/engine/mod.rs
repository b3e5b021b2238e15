// ==========================================
// 班级排课看板 - 引擎层
// ==========================================
// 职责: 颜色分配、限制规则匹配、冲突检测、统计与过滤
// 红线: 引擎不做持久化，不与用户交互；除 ColorRegistry 外均为纯函数
// ==========================================

pub mod color;
pub mod conflict;
pub mod filter;
pub mod matcher;
pub mod statistics;

// 重导出核心引擎
pub use color::{ColorRegistry, Hsl, BASE_COLORS};
pub use conflict::{
    box_at, conflicts_for, find_violations, has_conflict, validate_schedule_state, ConflictReport,
};
pub use filter::{highlighted_slots, parse_search_text, search_boxes, SearchCriterion, SlotFilter};
pub use matcher::{matches_pattern, restriction_applies, RestrictionMatcher};
pub use statistics::{
    box_placements, class_statistics, teacher_statistics, ClassStatistics, DaySlots,
    TeacherStatistics,
};
