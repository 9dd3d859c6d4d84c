//! 翻译后端
//!
//! 后端接收一段完整的指令文本，返回模型的原始回答文本。回答的解析和
//! 形状校验由引擎负责，后端只负责传输并把失败归类为 [`TranslationError`]。
//!
//! [`TranslationError`]: crate::translation::error::TranslationError

use async_trait::async_trait;

use crate::translation::error::TranslationResult;

pub mod gemini;

pub use gemini::{GeminiBackend, GeminiConfig};

/// 翻译后端接口
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// 发送指令并返回回答文本
    async fn generate(&self, prompt: &str) -> TranslationResult<String>;

    /// 后端名称，用于日志
    fn name(&self) -> &str;
}
