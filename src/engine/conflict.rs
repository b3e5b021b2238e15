// ==========================================
// 班级排课看板 - 槽位寻址与冲突检测
// ==========================================
// 冲突定义: 同一 (星期, 节次) 单元格内，两个不同盒子的班级名
//           触发任一限制规则（双向匹配）
// 红线: 纯函数，不修改任何状态
// ==========================================

use serde::Serialize;
use tracing::instrument;

use crate::domain::class_box::ClassBox;
use crate::domain::restriction::Restriction;
use crate::domain::schedule::Schedule;
use crate::domain::types::{BoxId, Day, SlotKey, TimePeriod};
use crate::engine::matcher::RestrictionMatcher;

/// 槽位当前占用的盒子（悬空ID视为空）
pub fn box_at<'a>(key: &SlotKey, schedule: &Schedule, boxes: &'a [ClassBox]) -> Option<&'a ClassBox> {
    let id = schedule.get(key)?;
    boxes.iter().find(|b| b.id == id)
}

fn find_box(boxes: &[ClassBox], id: BoxId) -> Option<&ClassBox> {
    boxes.iter().find(|b| b.id == id)
}

/// 冲突扫描核心（调用方负责编译规则）
fn conflicts_with_matcher(
    box_id: BoxId,
    day: Day,
    period: TimePeriod,
    schedule: &Schedule,
    boxes: &[ClassBox],
    matcher: &RestrictionMatcher,
) -> Vec<BoxId> {
    let subject = match find_box(boxes, box_id) {
        Some(b) => b,
        None => return Vec::new(),
    };
    if matcher.is_empty() {
        return Vec::new();
    }

    let mut result: Vec<BoxId> = Vec::new();
    for (_, other_id) in schedule.cell_entries(day, period) {
        if other_id == box_id || result.contains(&other_id) {
            continue;
        }
        let other = match find_box(boxes, other_id) {
            Some(b) => b,
            None => continue,
        };
        if matcher.applies(&subject.class_name, &other.class_name) {
            result.push(other_id);
        }
    }
    result
}

/// 与 box_id 在同一单元格内冲突的其他盒子ID
///
/// - 结果按槽位序号排列并去重
/// - 盒子自身不参与比较
/// - box_id 不存在时返回空
pub fn conflicts_for(
    box_id: BoxId,
    day: Day,
    period: TimePeriod,
    schedule: &Schedule,
    boxes: &[ClassBox],
    restrictions: &[Restriction],
) -> Vec<BoxId> {
    let matcher = RestrictionMatcher::new(restrictions);
    conflicts_with_matcher(box_id, day, period, schedule, boxes, &matcher)
}

pub fn has_conflict(
    box_id: BoxId,
    day: Day,
    period: TimePeriod,
    schedule: &Schedule,
    boxes: &[ClassBox],
    restrictions: &[Restriction],
) -> bool {
    !conflicts_for(box_id, day, period, schedule, boxes, restrictions).is_empty()
}

// ==========================================
// ConflictReport - 单个违规放置的报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictReport {
    pub slot: SlotKey,
    pub box_id: BoxId,
    pub class_name: String,
    pub conflicting_ids: Vec<BoxId>,
}

/// 列出所有违规放置（每个涉事槽位一条）
#[instrument(skip_all, fields(placements = schedule.len(), restrictions = restrictions.len()))]
pub fn find_violations(
    schedule: &Schedule,
    boxes: &[ClassBox],
    restrictions: &[Restriction],
) -> Vec<ConflictReport> {
    let matcher = RestrictionMatcher::new(restrictions);
    if matcher.is_empty() {
        return Vec::new();
    }

    schedule
        .iter()
        .filter_map(|(key, id)| {
            let b = find_box(boxes, *id)?;
            let conflicting_ids =
                conflicts_with_matcher(*id, key.day, key.period, schedule, boxes, &matcher);
            if conflicting_ids.is_empty() {
                return None;
            }
            Some(ConflictReport {
                slot: *key,
                box_id: *id,
                class_name: b.class_name.clone(),
                conflicting_ids,
            })
        })
        .collect()
}

/// 整个课表是否无冲突
pub fn validate_schedule_state(
    schedule: &Schedule,
    boxes: &[ClassBox],
    restrictions: &[Restriction],
) -> bool {
    find_violations(schedule, boxes, restrictions).is_empty()
}
