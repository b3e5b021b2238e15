// ==========================================
// 班级排课看板 - 高亮过滤与搜索
// ==========================================
// 过滤: 两个标签 X/Y，按子串匹配班级名或教师名
// 搜索: ';' 分隔多个条件，'+' 组合多个词（须全部命中）
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::class_box::ClassBox;
use crate::domain::schedule::Schedule;
use crate::domain::types::{FilterCondition, SlotKey};
use crate::engine::conflict::box_at;

fn box_contains(b: &ClassBox, term: &str) -> bool {
    b.class_name.contains(term) || b.teacher.contains(term)
}

// ==========================================
// SlotFilter - 课表高亮过滤器
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotFilter {
    pub label1: Option<String>,
    pub label2: Option<String>,
    pub condition: FilterCondition,
}

impl SlotFilter {
    pub fn new(label1: Option<&str>, label2: Option<&str>, condition: FilterCondition) -> Self {
        let clean = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
        Self {
            label1: clean(label1),
            label2: clean(label2),
            condition,
        }
    }

    /// 没有任何标签时过滤器不生效
    pub fn is_active(&self) -> bool {
        self.label1.is_some() || self.label2.is_some()
    }

    pub fn matches(&self, b: &ClassBox) -> bool {
        if !self.is_active() {
            return false;
        }
        let has1 = self.label1.as_deref().is_some_and(|l| box_contains(b, l));
        let has2 = self.label2.as_deref().is_some_and(|l| box_contains(b, l));

        match self.condition {
            FilterCondition::Both => has1 && has2,
            FilterCondition::Neither => !has1 && !has2,
            FilterCondition::XNotY => has1 && !has2,
        }
    }
}

/// 需要高亮的槽位（空槽位、悬空ID不高亮）
pub fn highlighted_slots(schedule: &Schedule, boxes: &[ClassBox], filter: &SlotFilter) -> Vec<SlotKey> {
    if !filter.is_active() {
        return Vec::new();
    }
    schedule
        .iter()
        .filter(|(key, _)| box_at(key, schedule, boxes).is_some_and(|b| filter.matches(b)))
        .map(|(key, _)| *key)
        .collect()
}

// ==========================================
// SearchCriterion - 搜索条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "terms", rename_all = "lowercase")]
pub enum SearchCriterion {
    Single(String),
    Combination(Vec<String>),
}

impl SearchCriterion {
    pub fn terms(&self) -> Vec<&str> {
        match self {
            SearchCriterion::Single(t) => vec![t.as_str()],
            SearchCriterion::Combination(ts) => ts.iter().map(String::as_str).collect(),
        }
    }

    /// 所有词都命中班级名或教师名
    pub fn matches(&self, b: &ClassBox) -> bool {
        self.terms().into_iter().all(|t| box_contains(b, t))
    }
}

/// 解析搜索文本: "Matte; Anna + Svenska" → [Single(Matte), Combination([Anna, Svenska])]
pub fn parse_search_text(text: &str) -> Vec<SearchCriterion> {
    text.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter_map(|term| {
            if term.contains('+') {
                let parts: Vec<String> = term
                    .split('+')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(SearchCriterion::Combination(parts))
                }
            } else {
                Some(SearchCriterion::Single(term.to_string()))
            }
        })
        .collect()
}

/// 满足任一条件的盒子（无条件时返回全部）
pub fn search_boxes<'a>(boxes: &'a [ClassBox], criteria: &[SearchCriterion]) -> Vec<&'a ClassBox> {
    if criteria.is_empty() {
        return boxes.iter().collect();
    }
    boxes
        .iter()
        .filter(|b| criteria.iter().any(|c| c.matches(b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Day, TimePeriod};

    fn boxes() -> Vec<ClassBox> {
        vec![
            ClassBox::new(1, "Matte 1A", "Anna", "#FFB3BA".into(), 2),
            ClassBox::new(2, "Svenska 1A", "Anna", "#BAFFC9".into(), 2),
            ClassBox::new(3, "Matte 2B", "Bertil", "#BAE1FF".into(), 2),
        ]
    }

    #[test]
    fn test_filter_conditions() {
        let bx = boxes();
        let both = SlotFilter::new(Some("Matte"), Some("Anna"), FilterCondition::Both);
        assert!(both.matches(&bx[0]));
        assert!(!both.matches(&bx[1]));
        assert!(!both.matches(&bx[2]));

        let neither = SlotFilter::new(Some("Matte"), Some("Anna"), FilterCondition::Neither);
        assert!(!neither.matches(&bx[0]));
        assert!(!neither.matches(&bx[1]));
        assert!(!neither.matches(&bx[2]));

        let x_not_y = SlotFilter::new(Some("Matte"), Some("Anna"), FilterCondition::XNotY);
        assert!(!x_not_y.matches(&bx[0]));
        assert!(x_not_y.matches(&bx[2]));
    }

    #[test]
    fn test_filter_with_single_label() {
        let bx = boxes();
        let neither = SlotFilter::new(Some("Svenska"), None, FilterCondition::Neither);
        assert!(neither.matches(&bx[0]));
        assert!(!neither.matches(&bx[1]));

        let inactive = SlotFilter::new(Some("  "), None, FilterCondition::Neither);
        assert!(!inactive.is_active());
        assert!(!inactive.matches(&bx[0]));
    }

    #[test]
    fn test_highlighted_slots() {
        let bx = boxes();
        let mut s = Schedule::new();
        let k0 = SlotKey::new(Day::Monday, TimePeriod::First, 0).unwrap();
        let k1 = SlotKey::new(Day::Monday, TimePeriod::First, 1).unwrap();
        let k2 = SlotKey::new(Day::Monday, TimePeriod::First, 2).unwrap();
        s.assign(k0, 1).unwrap();
        s.assign(k1, 3).unwrap();
        s.assign(k2, 99).unwrap();

        let filter = SlotFilter::new(Some("Matte"), None, FilterCondition::XNotY);
        assert_eq!(highlighted_slots(&s, &bx, &filter), vec![k0, k1]);
        assert!(highlighted_slots(&s, &bx, &SlotFilter::default()).is_empty());
    }

    #[test]
    fn test_parse_search_text() {
        let criteria = parse_search_text(" Matte ; Anna + Svenska ;; + ");
        assert_eq!(
            criteria,
            vec![
                SearchCriterion::Single("Matte".into()),
                SearchCriterion::Combination(vec!["Anna".into(), "Svenska".into()]),
            ]
        );
        assert!(parse_search_text("").is_empty());
    }

    #[test]
    fn test_search_boxes() {
        let bx = boxes();
        let hits = search_boxes(&bx, &parse_search_text("Anna + Svenska; Bertil"));
        let ids: Vec<_> = hits.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(search_boxes(&bx, &[]).len(), 3);
    }
}
