//! 外部AIアシスタント連携モジュール
//!
//! 検索語の補正と入力候補を外部AIに問い合わせる。
//! - CliAssistant: claude / codex / gemini CLI を子プロセスで実行
//! - GeminiAssistant: Gemini API を HTTP で呼び出す
//!
//! 失敗時の扱い（ローカル正規化への切り替え）は呼び出し側の責務。

mod cli_runner;
mod gemini;

pub use cli_runner::CliAssistant;
pub use gemini::GeminiAssistant;

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use intent_search_common::PhraseCatalog;
use regex::Regex;

/// 検索補助AIの共通インターフェース
#[async_trait]
pub trait SearchAssistant: Send + Sync {
    /// 検索語を補正する（補正なしは `Ok(None)`）
    async fn enhance(&self, query: &str) -> Result<Option<String>>;

    /// 入力途中の文字列から検索候補を返す
    async fn suggest(&self, partial: &str, limit: usize) -> Result<Vec<String>>;

    fn name(&self) -> &str;
}

/// プロバイダ指定からアシスタントを構築
///
/// `AiProvider::Local` の場合は `None`
pub fn build_assistant(
    provider: AiProvider,
    config: &Config,
    catalog: &PhraseCatalog,
) -> Result<Option<Box<dyn SearchAssistant>>> {
    let assistant: Box<dyn SearchAssistant> = match provider {
        AiProvider::Local => return Ok(None),
        AiProvider::GeminiApi => Box::new(GeminiAssistant::new(
            config.get_api_key()?,
            &config.model,
            config.timeout(),
            catalog.clone(),
        )?),
        AiProvider::Claude | AiProvider::Codex | AiProvider::Gemini => {
            Box::new(CliAssistant::new(provider, catalog.clone()))
        }
    };
    Ok(Some(assistant))
}

/// AIが返した検索語を整形
///
/// 囲み引用符・末尾の句点を除き、連続空白を1つにまとめる
pub fn sanitize_term(raw: &str) -> Option<String> {
    lazy_static::lazy_static! {
        static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
        static ref WRAPPING: Regex = Regex::new(r#"^["'`«\s]+|["'`»\s.]+$"#).unwrap();
    }

    let collapsed = WHITESPACE.replace_all(raw, " ");
    let cleaned = WRAPPING.replace_all(&collapsed, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_term() {
        assert_eq!(sanitize_term("  \"plomero\". "), Some("plomero".to_string()));
        assert_eq!(
            sanitize_term("técnico  en\nrefrigeración"),
            Some("técnico en refrigeración".to_string())
        );
        assert_eq!(sanitize_term(" '' "), None);
        assert_eq!(sanitize_term(""), None);
    }

    #[test]
    fn test_build_assistant_local() {
        let config = Config::default();
        let assistant = build_assistant(AiProvider::Local, &config, &PhraseCatalog::builtin()).unwrap();
        assert!(assistant.is_none());
    }

    #[test]
    fn test_build_assistant_cli() {
        let config = Config::default();
        let assistant = build_assistant(AiProvider::Codex, &config, &PhraseCatalog::builtin())
            .unwrap()
            .unwrap();
        assert_eq!(assistant.name(), "codex");
    }
}
