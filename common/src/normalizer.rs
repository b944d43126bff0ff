//! 検索クエリ正規化モジュール
//!
//! 自由入力（「mi aire acondicionado no enfría」）を正規カテゴリ
//! （「técnico en refrigeración」）へ変換する。
//!
//! ## 処理フロー
//! 1. 小文字化
//! 2. カタログの全フレーズについて部分一致を判定
//! 3. 最長一致を採用（同長ならカタログ順で先のもの）
//! 4. 一致なし → 有効語の先頭2語、それもなければ入力をそのまま返す
//!
//! 純粋関数のみ。I/Oや共有可変状態を持たないため、任意のスレッドから同時に呼べる。

use crate::catalog::PhraseCatalog;
use crate::types::{MatchCandidate, Resolution, ResolutionSource};

lazy_static::lazy_static! {
    /// 組み込みカタログによる既定の正規化器（初回アクセス時に一度だけ構築）
    static ref DEFAULT_NORMALIZER: QueryNormalizer = QueryNormalizer::new(PhraseCatalog::builtin());
}

/// フォールバック時に採用する語数
const FALLBACK_KEYWORDS: usize = 2;
/// この文字数以下の語はフォールバックで無視する
const MIN_KEYWORD_CHARS: usize = 3;

/// 組み込みカタログでクエリを正規化する
///
/// # Examples
/// ```
/// use intent_search_common::normalize;
///
/// assert_eq!(normalize("limpieza profunda de casa"), "limpieza");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(query: &str) -> String {
    DEFAULT_NORMALIZER.normalize(query)
}

/// 組み込みカタログの正規化器を取得
pub fn default_normalizer() -> &'static QueryNormalizer {
    &DEFAULT_NORMALIZER
}

/// クエリ正規化器
///
/// 構築後はカタログを変更しない。
#[derive(Debug, Clone)]
pub struct QueryNormalizer {
    catalog: PhraseCatalog,
}

impl QueryNormalizer {
    pub fn new(catalog: PhraseCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PhraseCatalog {
        &self.catalog
    }

    /// クエリを正規化して検索語を返す
    pub fn normalize(&self, query: &str) -> String {
        self.resolve(query).term
    }

    /// クエリを正規化し、根拠と候補も返す
    pub fn resolve(&self, query: &str) -> Resolution {
        let lowered = query.to_lowercase();
        let candidates = self.candidates(&lowered);

        if let Some(best) = select_longest(&candidates) {
            return Resolution {
                term: best.category.clone(),
                source: ResolutionSource::Catalog {
                    phrase: best.phrase.clone(),
                },
                candidates,
            };
        }

        let keywords = self.fallback_keywords(&lowered);
        if keywords.is_empty() {
            Resolution {
                term: query.to_string(),
                source: ResolutionSource::Passthrough,
                candidates,
            }
        } else {
            Resolution {
                term: keywords.join(" "),
                source: ResolutionSource::Keywords,
                candidates,
            }
        }
    }

    /// 小文字化済みクエリに含まれる全フレーズ（カタログ順）
    pub fn candidates(&self, lowered: &str) -> Vec<MatchCandidate> {
        self.catalog
            .entries()
            .iter()
            .filter(|entry| lowered.contains(entry.phrase.as_str()))
            .map(|entry| MatchCandidate {
                phrase: entry.phrase.clone(),
                category: entry.category.clone(),
                length: entry.phrase.chars().count(),
            })
            .collect()
    }

    /// 有効語を抽出（短い語・除外語を除いた先頭2語）
    fn fallback_keywords<'a>(&self, lowered: &'a str) -> Vec<&'a str> {
        let stop_words = self.catalog.stop_words();
        lowered
            .split_whitespace()
            .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
            .filter(|token| !stop_words.iter().any(|w| w == token))
            .take(FALLBACK_KEYWORDS)
            .collect()
    }
}

impl Default for QueryNormalizer {
    fn default() -> Self {
        Self::new(PhraseCatalog::builtin())
    }
}

/// 最長の候補を選ぶ（同長なら先に出現したもの）
fn select_longest(candidates: &[MatchCandidate]) -> Option<&MatchCandidate> {
    let mut best: Option<&MatchCandidate> = None;
    for candidate in candidates {
        if best.map_or(true, |b| candidate.length > b.length) {
            best = Some(candidate);
        }
    }
    best
}
