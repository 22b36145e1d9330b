//! Internationalization (i18n) module
//!
//! Provides language detection and localized strings for the CLI summary.
//! Supports English and Chinese Simplified.
//! Note: Log messages remain in English for consistency.

use std::sync::OnceLock;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    ChineseSimplified,
}

/// Global language instance
static LANGUAGE: OnceLock<Language> = OnceLock::new();

/// Initialize and get the current language based on system locale
pub fn get_language() -> Language {
    *LANGUAGE.get_or_init(detect_language)
}

/// Detect system language from environment variables
fn detect_language() -> Language {
    let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_default();
    language_for_locale(&locale)
}

/// Map a locale string such as `zh_CN.UTF-8` to a language
pub fn language_for_locale(locale: &str) -> Language {
    let locale = locale.to_lowercase();
    if locale.starts_with("zh") || locale.contains("hans") || locale.contains("chinese") {
        Language::ChineseSimplified
    } else {
        Language::English
    }
}

macro_rules! localized {
    ($($name:ident => $en:expr, $zh:expr;)*) => {
        impl Strings {
            $(
                pub fn $name() -> &'static str {
                    match get_language() {
                        Language::English => $en,
                        Language::ChineseSimplified => $zh,
                    }
                }
            )*
        }
    };
}

/// Localized strings for the CLI interface
pub struct Strings;

localized! {
    processing_complete => "Organization complete", "整理完成";
    stat_requested => "Requested", "请求";
    stat_copied => "Copied", "已复制";
    stat_planned => "Planned (dry run)", "计划（试运行）";
    stat_failed => "Failed", "失败";
    stat_warnings => "Not indexed", "未登记";
    detailed_results => "Detailed results:", "详细结果：";
    failed_files => "Photos that could not be organized:", "无法整理的照片：";
    warning_files => "Copied but not added to the media index:", "已复制但未登记到媒体索引：";
    dry_run_notice => "Dry run: no files were copied.", "试运行：未复制任何文件。";
    log_file => "Log file: ", "日志文件: ";
    no_input_dirs_error => "No input directories given. Use --input or a config file.", "未指定输入目录。请使用 --input 或配置文件。";
    no_birth_date_error => "No birth date given. Use --birth-date or set birth_date in the config file.", "未指定出生日期。请使用 --birth-date 或在配置文件中设置 birth_date。";
    input_dir_not_exist => "Input directory does not exist:", "输入目录不存在：";
    output_inside_input_error => "Output directory must not be inside an input directory:", "输出目录不能位于输入目录内：";
    sample_config_written => "Sample configuration written to", "示例配置已写入";
    no_photos_found => "No photos found in the input directories.", "输入目录中未找到照片。";
}
