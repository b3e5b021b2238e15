// ==========================================
// 班级排课看板 - 看板快照
// ==========================================
// 职责: (boxes, schedule, restrictions) 作为一个原子单元持久化/导入/导出
// 红线: 导入校验失败时不得产生任何部分状态
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use thiserror::Error;

use crate::domain::class_box::ClassBox;
use crate::domain::restriction::Restriction;
use crate::domain::schedule::Schedule;

/// 快照文档校验错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("JSON 解析失败: {0}")]
    InvalidJson(String),

    #[error("文档根节点必须是对象")]
    NotAnObject,

    #[error("字段 {0} 必须是列表")]
    ExpectedList(&'static str),

    #[error("字段 {0} 必须是键值对象")]
    ExpectedMap(&'static str),

    #[error("字段 {field} 内容无效: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("盒子ID重复: {0}")]
    DuplicateBoxId(i64),

    #[error("限制规则ID重复: {0}")]
    DuplicateRestrictionId(i64),
}

// ==========================================
// ScheduleSnapshot - 看板状态快照
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    pub boxes: Vec<ClassBox>,
    pub schedule: Schedule,
    pub restrictions: Vec<Restriction>,
}

impl ScheduleSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从 JSON 文档构造快照
    ///
    /// 校验顺序:
    /// 1. 根节点为对象
    /// 2. boxes 为列表、schedule 为对象、restrictions 为列表
    /// 3. 逐项类型化解码（数量不得为负、槽位键必须合法）
    /// 4. 盒子ID唯一
    ///
    /// 成功后对每个盒子做规范化（usageCount / initialQuantity 默认值）
    pub fn from_json_document(raw: &str) -> Result<Self, SnapshotError> {
        let doc: JsonValue =
            serde_json::from_str(raw).map_err(|e| SnapshotError::InvalidJson(e.to_string()))?;
        Self::from_json_value(doc)
    }

    pub fn from_json_value(doc: JsonValue) -> Result<Self, SnapshotError> {
        let mut obj = match doc {
            JsonValue::Object(map) => map,
            _ => return Err(SnapshotError::NotAnObject),
        };

        let boxes_raw = obj.remove("boxes").unwrap_or(JsonValue::Null);
        if !boxes_raw.is_array() {
            return Err(SnapshotError::ExpectedList("boxes"));
        }
        let schedule_raw = obj.remove("schedule").unwrap_or(JsonValue::Null);
        if !schedule_raw.is_object() {
            return Err(SnapshotError::ExpectedMap("schedule"));
        }
        let restrictions_raw = obj.remove("restrictions").unwrap_or(JsonValue::Null);
        if !restrictions_raw.is_array() {
            return Err(SnapshotError::ExpectedList("restrictions"));
        }

        let mut boxes: Vec<ClassBox> =
            serde_json::from_value(boxes_raw).map_err(|e| SnapshotError::InvalidField {
                field: "boxes",
                message: e.to_string(),
            })?;
        let schedule: Schedule =
            serde_json::from_value(schedule_raw).map_err(|e| SnapshotError::InvalidField {
                field: "schedule",
                message: e.to_string(),
            })?;
        let restrictions: Vec<Restriction> =
            serde_json::from_value(restrictions_raw).map_err(|e| SnapshotError::InvalidField {
                field: "restrictions",
                message: e.to_string(),
            })?;

        let mut seen = HashSet::new();
        for b in &boxes {
            if !seen.insert(b.id) {
                return Err(SnapshotError::DuplicateBoxId(b.id));
            }
        }

        let mut seen = HashSet::new();
        for r in &restrictions {
            if !seen.insert(r.id) {
                return Err(SnapshotError::DuplicateRestrictionId(r.id));
            }
        }

        boxes.iter_mut().for_each(ClassBox::normalize);

        Ok(Self {
            boxes,
            schedule,
            restrictions,
        })
    }

    pub fn find_box(&self, id: i64) -> Option<&ClassBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    /// 不满足手动添加规则的限制规则ID: 空模式、两端相同、与前面某条等价
    ///
    /// 导入时只告警，不拒绝
    pub fn irregular_restrictions(&self) -> Vec<i64> {
        self.restrictions
            .iter()
            .enumerate()
            .filter(|(i, r)| {
                let (p1, p2) = (r.pattern1.trim(), r.pattern2.trim());
                p1.is_empty()
                    || p2.is_empty()
                    || p1 == p2
                    || self.restrictions[..*i]
                        .iter()
                        .any(|earlier| earlier.is_equivalent(&r.pattern1, &r.pattern2))
            })
            .map(|(_, r)| r.id)
            .collect()
    }

    /// 规范化后的副本（持久化/导出前调用）
    pub fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.boxes.iter_mut().for_each(ClassBox::normalize);
        copy
    }
}

// ==========================================
// ExportDocument - 导出文档（快照 + 导出时间）
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    #[serde(flatten)]
    pub snapshot: ScheduleSnapshot,
    pub export_date: DateTime<Utc>,
}

impl ExportDocument {
    pub fn new(snapshot: &ScheduleSnapshot, export_date: DateTime<Utc>) -> Self {
        Self {
            snapshot: snapshot.normalized(),
            export_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_document() {
        let raw = r##"{
            "boxes": [{"id": 7, "className": "Tema 3", "teacher": "Tobias", "color": "#BAFFC9", "quantity": 2}],
            "schedule": {"Måndag-8:30-9:30-0": 7},
            "restrictions": [{"id": 1, "pattern1": "Tema *", "pattern2": "Engelska * A"}],
            "exportDate": "2024-01-01T00:00:00Z"
        }"##;
        let snap = ScheduleSnapshot::from_json_document(raw).unwrap();
        assert_eq!(snap.boxes.len(), 1);
        assert_eq!(snap.boxes[0].initial_quantity, Some(2));
        assert_eq!(snap.boxes[0].usage_count, 0);
        assert_eq!(snap.schedule.len(), 1);
        assert_eq!(snap.restrictions.len(), 1);
    }

    #[test]
    fn test_shape_errors() {
        assert_eq!(
            ScheduleSnapshot::from_json_document("[]"),
            Err(SnapshotError::NotAnObject)
        );
        assert_eq!(
            ScheduleSnapshot::from_json_document(r#"{"boxes": {}, "schedule": {}, "restrictions": []}"#),
            Err(SnapshotError::ExpectedList("boxes"))
        );
        assert_eq!(
            ScheduleSnapshot::from_json_document(r#"{"boxes": [], "schedule": [], "restrictions": []}"#),
            Err(SnapshotError::ExpectedMap("schedule"))
        );
        assert_eq!(
            ScheduleSnapshot::from_json_document(r#"{"boxes": [], "schedule": {}}"#),
            Err(SnapshotError::ExpectedList("restrictions"))
        );
        assert!(matches!(
            ScheduleSnapshot::from_json_document("{not json"),
            Err(SnapshotError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_bad_slot_key_rejected() {
        let raw = r#"{"boxes": [], "schedule": {"Söndag-8:30-9:30-0": 1}, "restrictions": []}"#;
        assert!(matches!(
            ScheduleSnapshot::from_json_document(raw),
            Err(SnapshotError::InvalidField { field: "schedule", .. })
        ));
    }

    #[test]
    fn test_duplicate_box_id_rejected() {
        let raw = r##"{
            "boxes": [
                {"id": 1, "className": "A", "teacher": "T", "color": "#000000", "quantity": 1},
                {"id": 1, "className": "B", "teacher": "T", "color": "#111111", "quantity": 1}
            ],
            "schedule": {},
            "restrictions": []
        }"##;
        assert_eq!(
            ScheduleSnapshot::from_json_document(raw),
            Err(SnapshotError::DuplicateBoxId(1))
        );
    }

    #[test]
    fn test_duplicate_restriction_id_rejected() {
        let raw = r#"{
            "boxes": [],
            "schedule": {},
            "restrictions": [
                {"id": 3, "pattern1": "A *", "pattern2": "B *"},
                {"id": 3, "pattern1": "C *", "pattern2": "D *"}
            ]
        }"#;
        assert_eq!(
            ScheduleSnapshot::from_json_document(raw),
            Err(SnapshotError::DuplicateRestrictionId(3))
        );
    }

    #[test]
    fn test_irregular_restrictions_listed() {
        let raw = r#"{
            "boxes": [],
            "schedule": {},
            "restrictions": [
                {"id": 1, "pattern1": "Tema *", "pattern2": "Engelska * A"},
                {"id": 2, "pattern1": "Engelska * A", "pattern2": "Tema *"},
                {"id": 3, "pattern1": "", "pattern2": "Tema *"},
                {"id": 4, "pattern1": "Bild", "pattern2": "Bild"},
                {"id": 5, "pattern1": "Matte *", "pattern2": "Svenska *"}
            ]
        }"#;
        let snap = ScheduleSnapshot::from_json_document(raw).unwrap();
        assert_eq!(snap.irregular_restrictions(), vec![2, 3, 4]);
    }

    #[test]
    fn test_export_document_has_timestamp() {
        let doc = ExportDocument::new(&ScheduleSnapshot::empty(), Utc::now());
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value["exportDate"].is_string());
        assert!(value["boxes"].is_array());
        assert!(value["schedule"].is_object());
    }
}
