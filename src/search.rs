//! 検索語の決定
//!
//! 外部AIによる補正を試し、失敗・タイムアウト・補正なしの場合は
//! ローカルの正規化にフォールバックする。どの経路でも結果は必ず返る。

use crate::assistant::SearchAssistant;
use crate::config::Config;
use crate::error::{Result, SearchError};
use intent_search_common::{QueryNormalizer, Resolution, ResolutionSource};
use std::future::Future;
use std::time::Duration;

/// 検索語の出所
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermSource {
    /// AIによる補正
    Assistant { provider: String },
    /// カタログのフレーズに一致
    Catalog { phrase: String },
    /// 有効語の抽出
    Keywords,
    /// 入力をそのまま使用
    Passthrough,
}

impl std::fmt::Display for TermSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TermSource::Assistant { provider } => write!(f, "AI補正 ({})", provider),
            TermSource::Catalog { phrase } => write!(f, "カタログ一致「{}」", phrase),
            TermSource::Keywords => write!(f, "キーワード抽出"),
            TermSource::Passthrough => write!(f, "入力そのまま"),
        }
    }
}

impl From<ResolutionSource> for TermSource {
    fn from(source: ResolutionSource) -> Self {
        match source {
            ResolutionSource::Catalog { phrase } => TermSource::Catalog { phrase },
            ResolutionSource::Keywords => TermSource::Keywords,
            ResolutionSource::Passthrough => TermSource::Passthrough,
        }
    }
}

/// 検索語の決定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// 利用者の入力
    pub query: String,
    /// 検索に使う語
    pub term: String,
    pub source: TermSource,
}

impl SearchOutcome {
    fn from_resolution(query: &str, resolution: Resolution) -> Self {
        Self {
            query: query.to_string(),
            term: resolution.term,
            source: resolution.source.into(),
        }
    }
}

/// 検索オプション
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// AI呼び出しのタイムアウト
    pub timeout: Duration,
    /// AIへ送る最大文字数
    pub max_query_chars: usize,
    /// 入力候補を問い合わせる最小文字数
    pub min_suggest_chars: usize,
    pub suggestion_limit: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SearchOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: config.timeout(),
            max_query_chars: config.max_query_chars,
            min_suggest_chars: config.min_suggest_chars,
            suggestion_limit: config.suggestion_limit,
        }
    }
}

/// AI補正とローカル正規化の組み合わせ
pub struct SearchResolver<'a> {
    normalizer: &'a QueryNormalizer,
    assistant: Option<&'a dyn SearchAssistant>,
    options: SearchOptions,
}

impl<'a> SearchResolver<'a> {
    pub fn new(
        normalizer: &'a QueryNormalizer,
        assistant: Option<&'a dyn SearchAssistant>,
        options: SearchOptions,
    ) -> Self {
        Self {
            normalizer,
            assistant,
            options,
        }
    }

    /// ローカル正規化のみ
    pub fn local(normalizer: &'a QueryNormalizer) -> Self {
        Self::new(normalizer, None, SearchOptions::default())
    }

    /// 検索語を決定する
    pub async fn resolve(&self, query: &str) -> SearchOutcome {
        if let Some((provider, term)) = self.enhance(query).await {
            tracing::info!(query, term = %term, provider = %provider, "AI補正を採用");
            return SearchOutcome {
                query: query.to_string(),
                term,
                source: TermSource::Assistant { provider },
            };
        }

        let outcome = SearchOutcome::from_resolution(query, self.normalizer.resolve(query));
        tracing::info!(query, term = %outcome.term, source = %outcome.source, "ローカル正規化");
        outcome
    }

    /// AI補正（失敗はすべて「補正なし」として扱う）
    async fn enhance(&self, query: &str) -> Option<(String, String)> {
        let assistant = self.assistant?;
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        let limited = truncate_chars(trimmed, self.options.max_query_chars);

        match self.with_timeout(assistant.enhance(limited)).await {
            Ok(Some(term)) => {
                let term = term.trim();
                if term.is_empty() || term.to_lowercase() == limited.to_lowercase() {
                    tracing::debug!(provider = assistant.name(), "AI補正なし（入力と同一）");
                    None
                } else {
                    Some((assistant.name().to_string(), term.to_string()))
                }
            }
            Ok(None) => {
                tracing::debug!(provider = assistant.name(), "AI補正なし");
                None
            }
            Err(e) => {
                tracing::warn!(provider = assistant.name(), error = %e, "AI補正に失敗、ローカル正規化へ切り替え");
                None
            }
        }
    }

    /// タイムアウト付きでAIを呼び出す（超過は `SearchError::Timeout`）
    async fn with_timeout<T, F>(&self, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.options.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(self.options.timeout.as_secs())),
        }
    }

    /// 入力候補
    ///
    /// AIがあればAIに問い合わせ（失敗時は空）、なければカタログから引く
    pub async fn suggestions(&self, partial: &str) -> Vec<String> {
        let partial = partial.trim();
        if partial.chars().count() < self.options.min_suggest_chars {
            return Vec::new();
        }

        let limit = self.options.suggestion_limit;
        let Some(assistant) = self.assistant else {
            return self.local_suggestions(partial);
        };

        let limited = truncate_chars(partial, self.options.max_query_chars);
        match self.with_timeout(assistant.suggest(limited, limit)).await {
            Ok(mut list) => {
                list.truncate(limit);
                list
            }
            Err(e) => {
                tracing::warn!(provider = assistant.name(), error = %e, "入力候補の取得に失敗");
                Vec::new()
            }
        }
    }

    /// カタログのカテゴリ・フレーズに部分一致するカテゴリ（カタログ順・重複なし）
    fn local_suggestions(&self, partial: &str) -> Vec<String> {
        let lowered = partial.to_lowercase();
        let mut suggestions: Vec<String> = Vec::new();

        for entry in self.normalizer.catalog().entries() {
            if suggestions.len() >= self.options.suggestion_limit {
                break;
            }
            let hit = entry.category.to_lowercase().contains(&lowered)
                || entry.phrase.contains(&lowered);
            if hit && !suggestions.contains(&entry.category) {
                suggestions.push(entry.category.clone());
            }
        }

        suggestions
    }
}

/// 文字境界を守って先頭 `max_chars` 文字に切り詰める
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
