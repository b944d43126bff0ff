use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。`intent-search config --set-api-key YOUR_KEY` で設定してください")]
    MissingApiKey,

    #[error("API呼び出しエラー: {0}")]
    ApiCall(String),

    #[error("APIレスポンスのパースに失敗: {0}")]
    ApiParse(String),

    #[error("AI応答がタイムアウトしました（{0}秒）")]
    Timeout(u64),

    #[error("CLI実行エラー: {0}")]
    CliExecution(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] intent_search_common::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
