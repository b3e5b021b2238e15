// ==========================================
// 班级排课看板 - 课程盒子领域模型
// ==========================================
// 红线: quantity 为剩余可放置数量，不得为负（无符号类型保证）
// 放置一次 quantity - 1，移出一次 quantity + 1
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::BoxId;

// ==========================================
// ClassBox - 课程盒子（班级 + 教师 + 数量）
// ==========================================
// 对齐: 持久化快照 / 导出 JSON 中的 boxes 元素（camelCase）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassBox {
    pub id: BoxId,              // 唯一ID
    pub class_name: String,     // 班级名（限制规则与颜色的关联键）
    pub teacher: String,        // 教师
    pub color: String,          // 显示颜色 (#rrggbb)
    pub quantity: u32,          // 剩余未放置数量
    #[serde(default)]
    pub usage_count: u32,       // 使用计数（仅展示）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_quantity: Option<u32>, // 总容量高水位（导入时用于还原）
}

impl ClassBox {
    pub fn new(id: BoxId, class_name: &str, teacher: &str, color: String, quantity: u32) -> Self {
        Self {
            id,
            class_name: class_name.to_string(),
            teacher: teacher.to_string(),
            color,
            quantity,
            usage_count: 0,
            initial_quantity: Some(quantity),
        }
    }

    /// 总容量: initial_quantity 缺失时退化为当前 quantity
    pub fn total_capacity(&self) -> u32 {
        self.initial_quantity.unwrap_or(self.quantity)
    }

    /// 是否还能放置
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// 同一 (班级, 教师) 组合
    pub fn matches_identity(&self, class_name: &str, teacher: &str) -> bool {
        self.class_name == class_name && self.teacher == teacher
    }

    /// 加载/导出时的规范化: initial_quantity 默认取 quantity
    pub fn normalize(&mut self) {
        if self.initial_quantity.is_none() {
            self.initial_quantity = Some(self.quantity);
        }
    }

    /// 提升高水位（数量增加后调用）
    pub fn raise_high_water_mark(&mut self) {
        let current = self.total_capacity();
        self.initial_quantity = Some(current.max(self.quantity));
    }
}
