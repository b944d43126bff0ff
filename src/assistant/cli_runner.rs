//! AI CLI連携
//!
//! claude / codex / gemini のCLIへプロンプトを渡し、標準出力をパースする。

use super::{sanitize_term, SearchAssistant};
use crate::ai_provider::AiProvider;
use crate::error::{SearchError, Result};
use async_trait::async_trait;
use intent_search_common::{
    build_enhance_prompt, build_suggest_prompt, parse_enhance_response,
    parse_suggestions_response, PhraseCatalog,
};
use tokio::process::Command;

/// CLI経由のアシスタント
pub struct CliAssistant {
    provider: AiProvider,
    catalog: PhraseCatalog,
}

impl CliAssistant {
    pub fn new(provider: AiProvider, catalog: PhraseCatalog) -> Self {
        Self { provider, catalog }
    }

    fn command_name(&self) -> Result<&'static str> {
        self.provider.command_name().ok_or_else(|| {
            SearchError::Config(format!("{:?} はCLIプロバイダではありません", self.provider))
        })
    }

    async fn run(&self, prompt: &str) -> Result<String> {
        let command = self.command_name()?;
        let args = cli_args(self.provider, prompt);

        tracing::debug!(command, prompt_chars = prompt.chars().count(), "AI CLI呼び出し");

        // Windowsではcmd /c経由（改行・引用符はcmdが解釈するため置換）
        #[cfg(windows)]
        let output = {
            let args: Vec<String> = args
                .iter()
                .map(|a| a.replace('\n', " ").replace('"', "\\\""))
                .collect();
            Command::new("cmd")
                .arg("/c")
                .arg(command)
                .args(&args)
                .kill_on_drop(true)
                .output()
                .await
        };

        #[cfg(not(windows))]
        let output = Command::new(command)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await;

        let output = output
            .map_err(|e| SearchError::CliExecution(format!("{} 実行エラー: {}", command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SearchError::ApiCall(format!(
                "{} failed (code {:?}): {}",
                command,
                output.status.code(),
                stderr.trim()
            )));
        }

        let response = String::from_utf8_lossy(&output.stdout).to_string();
        let preview: String = response.chars().take(200).collect();
        tracing::debug!(command, response = %preview, "AI CLI応答");

        Ok(response)
    }
}

/// プロバイダごとの引数
fn cli_args(provider: AiProvider, prompt: &str) -> Vec<String> {
    match provider {
        AiProvider::Claude => vec![
            "-p".into(),
            prompt.into(),
            "--output-format".into(),
            "text".into(),
        ],
        AiProvider::Codex => vec!["exec".into(), prompt.into()],
        _ => vec!["-p".into(), prompt.into()],
    }
}

#[async_trait]
impl SearchAssistant for CliAssistant {
    async fn enhance(&self, query: &str) -> Result<Option<String>> {
        let prompt = build_enhance_prompt(query, &self.catalog);
        let response = self.run(&prompt).await?;
        let enhanced = parse_enhance_response(&response)
            .map_err(|e| SearchError::ApiParse(format!("補正レスポンス: {}", e)))?;
        Ok(enhanced.as_deref().and_then(sanitize_term))
    }

    async fn suggest(&self, partial: &str, limit: usize) -> Result<Vec<String>> {
        let prompt = build_suggest_prompt(partial, limit);
        let response = self.run(&prompt).await?;
        parse_suggestions_response(&response, limit)
            .map_err(|e| SearchError::ApiParse(format!("入力候補レスポンス: {}", e)))
    }

    fn name(&self) -> &str {
        self.provider.command_name().unwrap_or("cli")
    }
}
