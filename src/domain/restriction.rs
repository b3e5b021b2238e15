// ==========================================
// 班级排课看板 - 限制规则领域模型
// ==========================================
// 语义: 两个通配符模式之间的对称禁止关系
// (p1, p2) 与 (p2, p1) 视为同一条规则
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::RestrictionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub id: RestrictionId,
    pub pattern1: String,
    pub pattern2: String,
}

impl Restriction {
    pub fn new(id: RestrictionId, pattern1: &str, pattern2: &str) -> Self {
        Self {
            id,
            pattern1: pattern1.to_string(),
            pattern2: pattern2.to_string(),
        }
    }

    /// 与给定模式对等价（任一方向）
    pub fn is_equivalent(&self, pattern1: &str, pattern2: &str) -> bool {
        (self.pattern1 == pattern1 && self.pattern2 == pattern2)
            || (self.pattern1 == pattern2 && self.pattern2 == pattern1)
    }
}
