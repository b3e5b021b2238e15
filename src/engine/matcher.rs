// ==========================================
// 班级排课看板 - 限制规则匹配器
// ==========================================
// 通配符语义: '*' 匹配任意长度（含空），其余字符一律按字面匹配
// 匹配: 全串锚定 (^...$)，区分大小写
// 对称性: (p1→a, p2→b) 或 (p1→b, p2→a) 任一成立即命中
// ==========================================

use regex::Regex;
use tracing::warn;

use crate::domain::restriction::Restriction;

/// 通配符模式 → 锚定正则
///
/// 先按 '*' 切分，逐段转义字面量，再以 ".*" 拼接
fn glob_to_regex(pattern: &str) -> Option<Regex> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");

    match Regex::new(&format!("(?s)^(?:{})$", body)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern, error = %e, "通配符模式编译失败，视为不匹配");
            None
        }
    }
}

/// 班级名是否匹配通配符模式
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    glob_to_regex(pattern).is_some_and(|re| re.is_match(name))
}

/// 两个班级名之间是否存在任一限制规则（双向）
pub fn restriction_applies(name_a: &str, name_b: &str, restrictions: &[Restriction]) -> bool {
    RestrictionMatcher::new(restrictions).applies(name_a, name_b)
}

// ==========================================
// RestrictionMatcher - 预编译的限制规则集合
// ==========================================
// 冲突检测会对同一规则集合反复求值，模式只编译一次
pub struct RestrictionMatcher {
    compiled: Vec<CompiledRestriction>,
}

struct CompiledRestriction {
    pattern1: Option<Regex>,
    pattern2: Option<Regex>,
}

impl CompiledRestriction {
    fn matches(re: &Option<Regex>, name: &str) -> bool {
        re.as_ref().is_some_and(|re| re.is_match(name))
    }

    fn applies(&self, a: &str, b: &str) -> bool {
        let forward = Self::matches(&self.pattern1, a) && Self::matches(&self.pattern2, b);
        let reverse = Self::matches(&self.pattern1, b) && Self::matches(&self.pattern2, a);
        forward || reverse
    }
}

impl RestrictionMatcher {
    pub fn new(restrictions: &[Restriction]) -> Self {
        let compiled = restrictions
            .iter()
            .map(|r| CompiledRestriction {
                pattern1: glob_to_regex(&r.pattern1),
                pattern2: glob_to_regex(&r.pattern2),
            })
            .collect();
        Self { compiled }
    }

    /// 任一规则命中即为 true（结果与规则顺序无关）
    pub fn applies(&self, name_a: &str, name_b: &str) -> bool {
        self.compiled.iter().any(|r| r.applies(name_a, name_b))
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
