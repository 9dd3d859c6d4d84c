//! 翻译请求构建与回答解析
//!
//! 请求是一段自然语言指令加上 JSON 编码的字符串列表；回答应当是
//! 等长的 JSON 字符串列表，可能被包在代码围栏里。

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::translation::error::{TranslationError, TranslationResult};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^```(?:json)?|```$").expect("code fence pattern is valid")
});

/// 构建翻译指令
///
/// 列表按原样序列化，非 ASCII 字符不转义。
pub fn build_prompt(texts: &[String], target_lang: &str) -> TranslationResult<String> {
    let input = serde_json::to_string(texts)
        .map_err(|e| TranslationError::InternalError(format!("无法序列化待翻译文本: {}", e)))?;

    Ok(format!(
        "You are a professional translator. Translate EACH item to {target_lang}.\n\
         Return ONLY a strict JSON array of translated strings, same order.\n\
         No explanations. Keep URLs, HTML entities, placeholders intact.\n\n\
         INPUT:\n{input}"
    ))
}

/// 去掉首尾的代码围栏标记
pub fn strip_code_fences(raw: &str) -> String {
    CODE_FENCE.replace_all(raw.trim(), "").trim().to_string()
}

/// 解析后端回答
///
/// # 参数
///
/// * `raw` - 后端返回的原始文本
/// * `expected` - 提交的条目数
///
/// # 返回值
///
/// 与输入等长的译文列表。每个元素都转换为字符串：`null` 变为空串，
/// 字符串原样保留，其他值使用紧凑 JSON 文本。
///
/// # 错误
///
/// - 文本无法解析为 JSON 时返回 [`TranslationError::ParseError`]
/// - 不是列表或长度不符时返回 [`TranslationError::ShapeMismatch`]
pub fn parse_translations(raw: &str, expected: usize) -> TranslationResult<Vec<String>> {
    let cleaned = strip_code_fences(raw);
    let value = parse_lenient(&cleaned)?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(TranslationError::ShapeMismatch {
                expected,
                found: describe(&other).to_string(),
            })
        }
    };

    if items.len() != expected {
        return Err(TranslationError::ShapeMismatch {
            expected,
            found: format!("{} 项的列表", items.len()),
        });
    }

    Ok(items.into_iter().map(coerce_to_string).collect())
}

/// 先按整体解析，失败后尝试第一个 `[` 到最后一个 `]` 之间的内容
fn parse_lenient(text: &str) -> TranslationResult<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(err) => {
            let slice = match (text.find('['), text.rfind(']')) {
                (Some(start), Some(end)) if start < end => &text[start..=end],
                _ => return Err(TranslationError::from(err)),
            };
            serde_json::from_str::<Value>(slice).map_err(|_| TranslationError::from(err))
        }
    }
}

fn coerce_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "布尔值",
        Value::Number(_) => "数字",
        Value::String(_) => "字符串",
        Value::Array(_) => "列表",
        Value::Object(_) => "对象",
    }
}
