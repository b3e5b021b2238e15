// ==========================================
// 界面文案 (rust-i18n)
// ==========================================
// 文案文件: locales/sv.yml（默认）, locales/en.yml
// i18n! 宏在 lib.rs 中展开
// ==========================================

use tracing::warn;

pub const DEFAULT_LOCALE: &str = "sv";

pub const SUPPORTED_LOCALES: [&str; 2] = [DEFAULT_LOCALE, "en"];

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

pub fn is_supported_locale(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 切换界面语言；不支持的代码回退到瑞典语
pub fn set_locale(locale: &str) {
    let chosen = if is_supported_locale(locale) {
        locale
    } else {
        warn!(locale, fallback = DEFAULT_LOCALE, "不支持的语言");
        DEFAULT_LOCALE
    };
    rust_i18n::set_locale(chosen);
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 带占位符的文案，占位符写作 `%{name}`
///
/// ```no_run
/// use class_schedule_board::i18n::t_with_args;
/// let msg = t_with_args("board.slot_occupied", &[("slot", "Måndag-8:30-9:30-0")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(rust_i18n::t!(key).to_string(), |text, (name, value)| {
            text.replace(&format!("%{{{}}}", name), value)
        })
}
