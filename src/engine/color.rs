// ==========================================
// 班级排课看板 - 颜色分配注册表
// ==========================================
// 职责: 为每个班级名分配稳定且可区分的显示颜色
// 策略: 基础色板优先 → 色板耗尽后按黄金角旋转色相生成变体
// 红线: 同一班级名在 release/import 之前始终返回同一颜色
// ==========================================

use std::collections::HashMap;
use tracing::debug;

/// 基础色板（柔和色 → 中等饱和度）
pub const BASE_COLORS: [&str; 20] = [
    // 柔和色
    "#FFB3BA", "#BAFFC9", "#BAE1FF", "#FFFFBA", "#E2BAFF",
    "#FFE4B5", "#98FB98", "#DDA0DD", "#87CEEB", "#F0E68C",
    // 低饱和
    "#E6B3B3", "#B3E6B3", "#B3B3E6", "#E6E6B3", "#E6B3E6",
    // 中等饱和
    "#FF9999", "#99FF99", "#9999FF", "#FFFF99", "#FF99FF",
];

/// 黄金角（度）
pub const GOLDEN_ANGLE: f64 = 137.5;

/// 生成变体时的最大尝试次数（最后一次候选无条件接受）
pub const MAX_VARIATION_ATTEMPTS: usize = 10;

// ==========================================
// Hsl - HSL 颜色
// ==========================================
// h ∈ [0, 360)，s/l ∈ [0, 100]（百分比）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// 解析 #rrggbb（大小写不敏感，# 可省略）
    pub fn from_hex(hex: &str) -> Option<Hsl> {
        let (r, g, b) = parse_hex(hex)?;
        let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let mut h = 0.0;
        let mut s = 0.0;

        if max != min {
            let d = max - min;
            s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };

            h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            h /= 6.0;
        }

        Some(Hsl {
            h: h * 360.0,
            s: s * 100.0,
            l: l * 100.0,
        })
    }

    /// 转换为小写 #rrggbb
    pub fn to_hex(&self) -> String {
        let h = self.h / 360.0;
        let s = self.s / 100.0;
        let l = self.l / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_rgb(p, q, h + 1.0 / 3.0),
                hue_to_rgb(p, q, h),
                hue_to_rgb(p, q, h - 1.0 / 3.0),
            )
        };

        format!("#{:02x}{:02x}{:02x}", to_channel(r), to_channel(g), to_channel(b))
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_channel(x: f64) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// 是否为合法的 #rrggbb
pub fn is_valid_hex_color(color: &str) -> bool {
    color.starts_with('#') && parse_hex(color).is_some()
}

/// 生成基础色的第 index 个变体
///
/// - 色相旋转 GOLDEN_ANGLE × (index + 1)
/// - 亮度按奇偶交替: +10（上限 90）/ -10（下限 40）
/// - 饱和度按 index mod 3 交替: +15（上限 90）/ -15（下限 30）/ 不变
pub fn generate_variation(base: Hsl, index: usize) -> String {
    let mut hsl = base;
    hsl.h = (hsl.h + GOLDEN_ANGLE * (index as f64 + 1.0)) % 360.0;

    if index % 2 == 0 {
        hsl.l = (hsl.l + 10.0).min(90.0);
    } else {
        hsl.l = (hsl.l - 10.0).max(40.0);
    }

    match index % 3 {
        0 => hsl.s = (hsl.s + 15.0).min(90.0),
        1 => hsl.s = (hsl.s - 15.0).max(30.0),
        _ => {}
    }

    hsl.to_hex()
}

// ==========================================
// ColorRegistry - 班级 → 颜色 注册表
// ==========================================
// 由看板状态持有（非全局），导入时整体重建，重置时清空
#[derive(Debug, Clone, Default)]
pub struct ColorRegistry {
    assignments: HashMap<String, String>,
}

impl ColorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清空全部分配（幂等）
    pub fn initialize(&mut self) {
        self.assignments.clear();
    }

    /// 为班级分配颜色
    ///
    /// 顺序（命中即返回）:
    /// 1) 已注册 → 原颜色
    /// 2) preferred 合法且未被其他班级占用 → preferred
    /// 3) 第一个未占用的基础色
    /// 4) 基础色变体（最多 MAX_VARIATION_ATTEMPTS 次避让）
    pub fn assign_color(&mut self, class_name: &str, preferred: Option<&str>) -> String {
        if let Some(existing) = self.assignments.get(class_name) {
            return existing.clone();
        }

        if let Some(color) = preferred {
            if is_valid_hex_color(color) && !self.is_in_use(color) {
                return self.register(class_name, color.to_string());
            }
        }

        if let Some(base) = BASE_COLORS.iter().find(|c| !self.is_in_use(c)) {
            return self.register(class_name, base.to_string());
        }

        let base_hex = BASE_COLORS[class_name.chars().count() % BASE_COLORS.len()];
        let base = Hsl::from_hex(base_hex).unwrap_or(Hsl { h: 0.0, s: 0.0, l: 80.0 });
        let start = self.assignments.len();

        let mut candidate = generate_variation(base, start);
        for attempt in 1..MAX_VARIATION_ATTEMPTS {
            if !self.is_in_use(&candidate) {
                break;
            }
            candidate = generate_variation(base, start + attempt);
        }

        debug!(class_name, color = %candidate, "色板耗尽，生成变体颜色");
        self.register(class_name, candidate)
    }

    /// 释放班级颜色
    pub fn release(&mut self, class_name: &str) {
        self.assignments.remove(class_name);
    }

    /// 导入分配（先清空，逐条原样写入，不做冲突检查）
    pub fn import_assignments<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.initialize();
        for (class_name, color) in entries {
            self.assignments.insert(class_name.to_string(), color.to_string());
        }
    }

    pub fn color_of(&self, class_name: &str) -> Option<&str> {
        self.assignments.get(class_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    fn is_in_use(&self, color: &str) -> bool {
        self.assignments.values().any(|c| c.eq_ignore_ascii_case(color))
    }

    fn register(&mut self, class_name: &str, color: String) -> String {
        self.assignments.insert(class_name.to_string(), color.clone());
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_hex_to_hsl_primaries() {
        let red = Hsl::from_hex("#FF0000").unwrap();
        assert_eq!(red, Hsl { h: 0.0, s: 100.0, l: 50.0 });

        let gray = Hsl::from_hex("808080").unwrap();
        assert_eq!(gray.s, 0.0);
        assert_eq!(gray.h, 0.0);

        assert!(Hsl::from_hex("#12345").is_none());
        assert!(Hsl::from_hex("#GG0000").is_none());
    }

    #[test]
    fn test_hex_round_trip_for_palette() {
        for c in BASE_COLORS {
            let back = Hsl::from_hex(c).unwrap().to_hex();
            assert_eq!(back, c.to_lowercase(), "round trip of {}", c);
        }
    }

    #[test]
    fn test_hue_range() {
        let hsl = Hsl::from_hex("#FF00FF").unwrap();
        assert!(hsl.h >= 0.0 && hsl.h < 360.0);
        assert!((hsl.h - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_stable_color() {
        let mut reg = ColorRegistry::new();
        let first = reg.assign_color("Matte 1", None);
        let second = reg.assign_color("Matte 1", None);
        assert_eq!(first, second);
        assert_eq!(first, BASE_COLORS[0]);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_preferred_color() {
        let mut reg = ColorRegistry::new();
        assert_eq!(reg.assign_color("A", Some("#123456")), "#123456");
        // 已被占用（大小写不敏感）→ 回退色板
        assert_eq!(reg.assign_color("B", Some("#123456")), BASE_COLORS[0]);
        assert_eq!(reg.assign_color("C", Some("#FFb3ba")), BASE_COLORS[1]);
        // 非法颜色被忽略
        assert_eq!(reg.assign_color("D", Some("red")), BASE_COLORS[2]);
    }

    #[test]
    fn test_release_frees_color() {
        let mut reg = ColorRegistry::new();
        let a = reg.assign_color("A", None);
        reg.assign_color("B", None);
        reg.release("A");
        assert!(reg.color_of("A").is_none());
        assert_eq!(reg.assign_color("C", None), a);
    }

    #[test]
    fn test_import_overrides_without_checks() {
        let mut reg = ColorRegistry::new();
        reg.assign_color("Old", None);
        reg.import_assignments(vec![("X", "#000000"), ("Y", "#000000")]);
        assert!(reg.color_of("Old").is_none());
        assert_eq!(reg.color_of("X"), Some("#000000"));
        assert_eq!(reg.color_of("Y"), Some("#000000"));
        assert_eq!(reg.assign_color("X", None), "#000000");
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut reg = ColorRegistry::new();
        reg.assign_color("A", None);
        reg.initialize();
        reg.initialize();
        assert!(reg.is_empty());
    }

    #[test]
    fn test_unique_colors_beyond_palette() {
        let mut reg = ColorRegistry::new();
        let n = 40;
        let colors: Vec<String> = (1..=n)
            .map(|i| reg.assign_color(&format!("Klass {}", i), None))
            .collect();

        let distinct: HashSet<String> = colors.iter().map(|c| c.to_lowercase()).collect();
        assert_eq!(distinct.len(), n);
        assert!(colors.iter().all(|c| is_valid_hex_color(c)));
    }

    #[test]
    fn test_variation_rotates_hue() {
        let base = Hsl::from_hex(BASE_COLORS[0]).unwrap();
        let v0 = generate_variation(base, 0);
        let v1 = generate_variation(base, 1);
        assert_ne!(v0, v1);
        let h0 = Hsl::from_hex(&v0).unwrap().h;
        let expected = (base.h + GOLDEN_ANGLE) % 360.0;
        assert!((h0 - expected).abs() < 2.0);
    }
}
