// ==========================================
// 班级排课看板 - 领域类型定义
// ==========================================
// 职责: 星期、节次、槽位键、过滤条件等基础类型
// 红线: 课表内部使用复合键，字符串形式只在序列化边界出现
// ==========================================

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 盒子ID（创建时分配，单调递增）
pub type BoxId = i64;

/// 限制规则ID
pub type RestrictionId = i64;

/// 每个 (星期, 节次) 单元格可并列放置的盒子数
pub const SLOTS_PER_CELL: u8 = 5;

// ==========================================
// 星期 (Day)
// ==========================================
// 顺序: 周一 < 周二 < ... < 周五
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// 课表上显示的标签（与导出 JSON 的槽位键一致）
    pub fn label(&self) -> &'static str {
        match self {
            Day::Monday => "Måndag",
            Day::Tuesday => "Tisdag",
            Day::Wednesday => "Onsdag",
            Day::Thursday => "Torsdag",
            Day::Friday => "Fredag",
        }
    }

    pub fn from_label(label: &str) -> Option<Day> {
        Day::ALL.into_iter().find(|d| d.label() == label)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==========================================
// 节次 (Time Period)
// ==========================================
// 注意: 标签本身含连字符（时间范围），解析槽位键时需从右侧切分
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimePeriod {
    First,
    Second,
    Third,
    Fourth,
    Fifth,
}

impl TimePeriod {
    pub const ALL: [TimePeriod; 5] = [
        TimePeriod::First,
        TimePeriod::Second,
        TimePeriod::Third,
        TimePeriod::Fourth,
        TimePeriod::Fifth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimePeriod::First => "8:30-9:30",
            TimePeriod::Second => "9:40-10:40",
            TimePeriod::Third => "10:55-11:55",
            TimePeriod::Fourth => "12:45-13:45",
            TimePeriod::Fifth => "13:55-14:55",
        }
    }

    pub fn from_label(label: &str) -> Option<TimePeriod> {
        TimePeriod::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// 星期/节次按显示标签序列化（统计输出用作 JSON 键）
impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl Serialize for TimePeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ==========================================
// 槽位键 (Slot Key)
// ==========================================
// 全序: (day, period, slot_index)
// 序列化格式: "<day>-<period>-<slot_index>"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub day: Day,
    pub period: TimePeriod,
    pub slot_index: u8,
}

/// 槽位键解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotKeyError {
    #[error("槽位键格式错误: {0}")]
    Malformed(String),

    #[error("未知星期: {0}")]
    UnknownDay(String),

    #[error("未知节次: {0}")]
    UnknownPeriod(String),

    #[error("槽位序号越界: {index} (上限 {limit})")]
    IndexOutOfRange { index: String, limit: u8 },
}

impl SlotKey {
    /// 构造槽位键，序号必须在 [0, SLOTS_PER_CELL) 内
    pub fn new(day: Day, period: TimePeriod, slot_index: u8) -> Result<Self, SlotKeyError> {
        if slot_index >= SLOTS_PER_CELL {
            return Err(SlotKeyError::IndexOutOfRange {
                index: slot_index.to_string(),
                limit: SLOTS_PER_CELL,
            });
        }
        Ok(Self {
            day,
            period,
            slot_index,
        })
    }

    /// 同一单元格（忽略槽位序号）
    pub fn same_cell(&self, other: &SlotKey) -> bool {
        self.day == other.day && self.period == other.period
    }

    /// 遍历整张课表的所有槽位（按全序）
    pub fn all() -> impl Iterator<Item = SlotKey> {
        Day::ALL.into_iter().flat_map(|day| {
            TimePeriod::ALL.into_iter().flat_map(move |period| {
                (0..SLOTS_PER_CELL).map(move |slot_index| SlotKey {
                    day,
                    period,
                    slot_index,
                })
            })
        })
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.day.label(), self.period.label(), self.slot_index)
    }
}

impl FromStr for SlotKey {
    type Err = SlotKeyError;

    /// 解析顺序: 最后一个连字符右侧为序号，第一个连字符左侧为星期，中间为节次
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rest, index) = s
            .rsplit_once('-')
            .ok_or_else(|| SlotKeyError::Malformed(s.to_string()))?;
        let (day, period) = rest
            .split_once('-')
            .ok_or_else(|| SlotKeyError::Malformed(s.to_string()))?;

        let day = Day::from_label(day).ok_or_else(|| SlotKeyError::UnknownDay(day.to_string()))?;
        let period = TimePeriod::from_label(period)
            .ok_or_else(|| SlotKeyError::UnknownPeriod(period.to_string()))?;
        // 只接受规范十进制写法，保证解析后再格式化得到原文
        let canonical = !index.is_empty()
            && index.bytes().all(|b| b.is_ascii_digit())
            && (index.len() == 1 || !index.starts_with('0'));
        if !canonical {
            return Err(SlotKeyError::Malformed(s.to_string()));
        }
        let slot_index: u8 = index.parse().map_err(|_| SlotKeyError::IndexOutOfRange {
            index: index.to_string(),
            limit: SLOTS_PER_CELL,
        })?;

        SlotKey::new(day, period, slot_index)
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ==========================================
// 高亮过滤条件 (Filter Condition)
// ==========================================
// X/Y 为两个标签（匹配班级名或教师名）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterCondition {
    #[default]
    Both,    // 同时含 X 与 Y
    Neither, // 都不含
    XNotY,   // 含 X 不含 Y
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterCondition::Both => write!(f, "both"),
            FilterCondition::Neither => write!(f, "neither"),
            FilterCondition::XNotY => write!(f, "x-not-y"),
        }
    }
}

impl FromStr for FilterCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both" => Ok(FilterCondition::Both),
            "neither" => Ok(FilterCondition::Neither),
            "x-not-y" => Ok(FilterCondition::XNotY),
            other => Err(format!("未知过滤条件: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_key_round_trip_with_hyphenated_period() {
        let key = SlotKey::new(Day::Wednesday, TimePeriod::Third, 4).unwrap();
        let text = key.to_string();
        assert_eq!(text, "Onsdag-10:55-11:55-4");
        assert_eq!(text.parse::<SlotKey>().unwrap(), key);
    }

    #[test]
    fn test_slot_key_rejects_bad_input() {
        assert!(matches!(
            "Måndag-8:30-9:30-5".parse::<SlotKey>(),
            Err(SlotKeyError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            "Lördag-8:30-9:30-0".parse::<SlotKey>(),
            Err(SlotKeyError::UnknownDay(_))
        ));
        assert!(matches!(
            "Måndag-7:00-8:00-0".parse::<SlotKey>(),
            Err(SlotKeyError::UnknownPeriod(_))
        ));
        assert!(matches!("Måndag".parse::<SlotKey>(), Err(SlotKeyError::Malformed(_))));
    }

    #[test]
    fn test_slot_key_index_must_be_canonical() {
        for raw in ["Måndag-8:30-9:30-01", "Måndag-8:30-9:30-+1", "Måndag-8:30-9:30-", "Måndag-8:30-9:30- 1"] {
            assert!(
                matches!(raw.parse::<SlotKey>(), Err(SlotKeyError::Malformed(_))),
                "{} should be rejected",
                raw
            );
        }
        // 多位数字仍报告越界
        assert!(matches!(
            "Måndag-8:30-9:30-12".parse::<SlotKey>(),
            Err(SlotKeyError::IndexOutOfRange { .. })
        ));
        let key: SlotKey = "Måndag-8:30-9:30-0".parse().unwrap();
        assert_eq!(key.to_string(), "Måndag-8:30-9:30-0");
    }

    #[test]
    fn test_slot_key_order() {
        let a = SlotKey::new(Day::Monday, TimePeriod::Fifth, 4).unwrap();
        let b = SlotKey::new(Day::Tuesday, TimePeriod::First, 0).unwrap();
        let c = SlotKey::new(Day::Tuesday, TimePeriod::First, 1).unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(b.same_cell(&c));
        assert!(!a.same_cell(&b));
    }

    #[test]
    fn test_all_slots_count() {
        assert_eq!(SlotKey::all().count(), 5 * 5 * SLOTS_PER_CELL as usize);
    }

    #[test]
    fn test_filter_condition_serde() {
        let json = serde_json::to_string(&FilterCondition::XNotY).unwrap();
        assert_eq!(json, "\"x-not-y\"");
        assert_eq!("neither".parse::<FilterCondition>().unwrap(), FilterCondition::Neither);
    }
}
