use clap::ValueEnum;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AiProvider {
    Claude,
    Codex,
    Gemini,
    /// Gemini HTTP API（APIキー必須）
    GeminiApi,
    /// AIを使わずローカル正規化のみ
    Local,
}

impl AiProvider {
    /// CLI経由で呼び出す場合のコマンド名
    pub fn command_name(&self) -> Option<&'static str> {
        match self {
            AiProvider::Claude => Some("claude"),
            AiProvider::Codex => Some("codex"),
            AiProvider::Gemini => Some("gemini"),
            AiProvider::GeminiApi | AiProvider::Local => None,
        }
    }
}
