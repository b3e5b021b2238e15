// ==========================================
// 班级排课看板 - 放置统计
// ==========================================
// 按班级: 放置次数 + 按星期分组的节次列表
// 按教师: 放置总数 + 各班级明细
// 悬空盒子ID不计入统计
// ==========================================

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::class_box::ClassBox;
use crate::domain::schedule::Schedule;
use crate::domain::types::{BoxId, Day, TimePeriod};

/// 按星期分组的节次（星期按周一到周五，节次按时间先后）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DaySlots(BTreeMap<Day, Vec<TimePeriod>>);

impl DaySlots {
    fn push(&mut self, day: Day, period: TimePeriod) {
        let periods = self.0.entry(day).or_default();
        periods.push(period);
        periods.sort();
    }

    pub fn periods_on(&self, day: Day) -> &[TimePeriod] {
        self.0.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Day, &Vec<TimePeriod>)> {
        self.0.iter()
    }

    /// 多行文本: "Måndag: 8:30-9:30, 12:45-13:45"
    pub fn describe(&self) -> String {
        self.0
            .iter()
            .map(|(day, periods)| {
                let times = periods.iter().map(|p| p.label()).collect::<Vec<_>>().join(", ");
                format!("{}: {}", day.label(), times)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStatistics {
    pub class_name: String,
    pub count: usize,
    pub slots: DaySlots,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherClassEntry {
    pub class_name: String,
    pub slots: DaySlots,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherStatistics {
    pub teacher: String,
    pub total_count: usize,
    pub classes: Vec<TeacherClassEntry>,
}

fn resolved_placements<'a>(
    schedule: &'a Schedule,
    boxes: &'a [ClassBox],
) -> impl Iterator<Item = (Day, TimePeriod, &'a ClassBox)> + 'a {
    schedule.iter().filter_map(move |(key, id)| {
        boxes
            .iter()
            .find(|b| b.id == *id)
            .map(|b| (key.day, key.period, b))
    })
}

/// 按班级统计（班级名字典序）
pub fn class_statistics(schedule: &Schedule, boxes: &[ClassBox]) -> Vec<ClassStatistics> {
    let mut grouped: BTreeMap<&str, (usize, DaySlots)> = BTreeMap::new();
    for (day, period, b) in resolved_placements(schedule, boxes) {
        let entry = grouped.entry(b.class_name.as_str()).or_default();
        entry.0 += 1;
        entry.1.push(day, period);
    }

    grouped
        .into_iter()
        .map(|(class_name, (count, slots))| ClassStatistics {
            class_name: class_name.to_string(),
            count,
            slots,
        })
        .collect()
}

/// 按教师统计（教师名字典序，其下班级名字典序）
pub fn teacher_statistics(schedule: &Schedule, boxes: &[ClassBox]) -> Vec<TeacherStatistics> {
    let mut grouped: BTreeMap<&str, BTreeMap<&str, (usize, DaySlots)>> = BTreeMap::new();
    for (day, period, b) in resolved_placements(schedule, boxes) {
        let entry = grouped
            .entry(b.teacher.as_str())
            .or_default()
            .entry(b.class_name.as_str())
            .or_default();
        entry.0 += 1;
        entry.1.push(day, period);
    }

    grouped
        .into_iter()
        .map(|(teacher, classes)| {
            let total_count = classes.values().map(|(n, _)| n).sum();
            TeacherStatistics {
                teacher: teacher.to_string(),
                total_count,
                classes: classes
                    .into_iter()
                    .map(|(class_name, (_, slots))| TeacherClassEntry {
                        class_name: class_name.to_string(),
                        slots,
                    })
                    .collect(),
            }
        })
        .collect()
}

/// 某盒子的放置位置描述: "Måndag 8:30-9:30, Tisdag 9:40-10:40"
pub fn box_placements(box_id: BoxId, schedule: &Schedule) -> String {
    schedule
        .placements_of(box_id)
        .iter()
        .map(|k| format!("{} {}", k.day.label(), k.period.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SlotKey;

    fn fixture() -> (Schedule, Vec<ClassBox>) {
        let boxes = vec![
            ClassBox::new(1, "Matte 1A", "Anna", "#FFB3BA".into(), 5),
            ClassBox::new(2, "Svenska 1A", "Anna", "#BAFFC9".into(), 5),
            ClassBox::new(3, "Matte 1A", "Bertil", "#BAE1FF".into(), 5),
        ];
        let mut s = Schedule::new();
        s.assign(SlotKey::new(Day::Tuesday, TimePeriod::Third, 0).unwrap(), 1).unwrap();
        s.assign(SlotKey::new(Day::Monday, TimePeriod::Fifth, 0).unwrap(), 1).unwrap();
        s.assign(SlotKey::new(Day::Monday, TimePeriod::First, 1).unwrap(), 1).unwrap();
        s.assign(SlotKey::new(Day::Monday, TimePeriod::First, 0).unwrap(), 2).unwrap();
        s.assign(SlotKey::new(Day::Friday, TimePeriod::First, 0).unwrap(), 3).unwrap();
        s.assign(SlotKey::new(Day::Friday, TimePeriod::Second, 0).unwrap(), 77).unwrap();
        (s, boxes)
    }

    #[test]
    fn test_class_statistics() {
        let (s, boxes) = fixture();
        let stats = class_statistics(&s, &boxes);
        assert_eq!(stats.len(), 2);

        let matte = &stats[0];
        assert_eq!(matte.class_name, "Matte 1A");
        assert_eq!(matte.count, 4);
        assert_eq!(
            matte.slots.periods_on(Day::Monday),
            &[TimePeriod::First, TimePeriod::Fifth]
        );
        assert_eq!(
            matte.slots.describe(),
            "Måndag: 8:30-9:30, 13:55-14:55\nTisdag: 10:55-11:55\nFredag: 8:30-9:30"
        );
    }

    #[test]
    fn test_teacher_statistics() {
        let (s, boxes) = fixture();
        let stats = teacher_statistics(&s, &boxes);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].teacher, "Anna");
        assert_eq!(stats[0].total_count, 4);
        assert_eq!(stats[0].classes.len(), 2);
        assert_eq!(stats[1].teacher, "Bertil");
        assert_eq!(stats[1].total_count, 1);
    }

    #[test]
    fn test_box_placements() {
        let (s, _) = fixture();
        assert_eq!(box_placements(3, &s), "Fredag 8:30-9:30");
        assert_eq!(box_placements(42, &s), "");
    }
}
