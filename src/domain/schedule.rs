// ==========================================
// 班级排课看板 - 课表领域模型
// ==========================================
// 结构: SlotKey → BoxId 的有序映射
// 红线: 每个槽位最多一个盒子；同一盒子ID可出现在多个槽位
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::types::{BoxId, Day, SlotKey, TimePeriod};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    entries: BTreeMap<SlotKey, BoxId>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SlotKey) -> Option<BoxId> {
        self.entries.get(key).copied()
    }

    pub fn is_occupied(&self, key: &SlotKey) -> bool {
        self.entries.contains_key(key)
    }

    /// 占用槽位；槽位已被占用时拒绝并返回现有盒子ID
    pub fn assign(&mut self, key: SlotKey, box_id: BoxId) -> Result<(), BoxId> {
        if let Some(existing) = self.entries.get(&key) {
            return Err(*existing);
        }
        self.entries.insert(key, box_id);
        Ok(())
    }

    /// 释放槽位，返回原占用的盒子ID
    pub fn release(&mut self, key: &SlotKey) -> Option<BoxId> {
        self.entries.remove(key)
    }

    /// 同一 (星期, 节次) 单元格内的全部占用，按槽位序号排列
    pub fn cell_entries(&self, day: Day, period: TimePeriod) -> impl Iterator<Item = (SlotKey, BoxId)> + '_ {
        self.entries
            .iter()
            .filter(move |(k, _)| k.day == day && k.period == period)
            .map(|(k, id)| (*k, *id))
    }

    /// 某盒子的全部放置位置
    pub fn placements_of(&self, box_id: BoxId) -> Vec<SlotKey> {
        self.entries
            .iter()
            .filter(|(_, id)| **id == box_id)
            .map(|(k, _)| *k)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &BoxId)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
