// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持越南语（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["vi", "en"];

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"vi" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 规范化语言代码，不支持的语言回退到 "vi"
pub fn normalize_locale(locale: &str) -> &'static str {
    let lower = locale.trim().to_lowercase();
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|l| lower == *l || lower.starts_with(&format!("{}-", l)))
        .unwrap_or("vi")
}

/// 翻译消息（指定语言，不修改全局语言）
pub fn t_in(key: &str, locale: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use weekly_schedule::i18n::t_with_args;
/// let msg = t_with_args("export.slot", "vi", &[("period", "Sáng"), ("slot", "1")]);
/// ```
pub fn t_with_args(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let mut result = t_in(key, locale);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // rust-i18n 的 locale 为全局状态，且 Rust 测试默认并行执行；
    // 为避免测试互相干扰，这里对 i18n 相关测试串行化。
    static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_set_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        assert_eq!(&*rust_i18n::locale(), "en");
        assert_eq!(rust_i18n::t!("period.morning"), "Morning");

        set_locale("vi");
        assert_eq!(&*rust_i18n::locale(), "vi");
        assert_eq!(rust_i18n::t!("period.morning"), "Sáng");
    }

    #[test]
    fn test_translate_in_locale() {
        assert_eq!(t_in("class_type.exam", "vi"), "Lịch thi");
        assert_eq!(t_in("class_type.exam", "en"), "Exam");
        assert_eq!(t_in("weekday.6", "vi"), "Chủ nhật");
    }

    #[test]
    fn test_translate_with_args() {
        let msg = t_with_args("export.slot", "en", &[("period", "Morning"), ("slot", "2")]);
        assert_eq!(msg, "Morning - Slot 2");
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en"), "en");
        assert_eq!(normalize_locale("en-US"), "en");
        assert_eq!(normalize_locale("VI"), "vi");
        assert_eq!(normalize_locale("zh-CN"), "vi");
    }
}
