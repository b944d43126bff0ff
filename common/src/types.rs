//! 検索意図解決の型定義
//!
//! CLIと共通ライブラリで共有される型:
//! - PhraseEntry: カタログの1エントリ（フレーズ → カテゴリ）
//! - MatchCandidate: 1回の解決中だけ存在する一致候補
//! - Resolution: 解決結果（採用語・根拠・候補一覧）

use serde::{Deserialize, Serialize};

/// カタログエントリ: 利用者の言い回し → 正規カテゴリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseEntry {
    /// 小文字のリテラル部分文字列
    pub phrase: String,
    /// 正規カテゴリ（職種ラベル）
    pub category: String,
}

impl PhraseEntry {
    pub fn new(phrase: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            category: category.into(),
        }
    }
}

/// 一致候補
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchCandidate {
    pub phrase: String,
    pub category: String,
    /// フレーズの文字数（バイト数ではない）
    pub length: usize,
}

/// 解決結果の根拠
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ResolutionSource {
    /// カタログのフレーズに一致
    Catalog { phrase: String },
    /// 一致なし: 有効語の先頭2語
    Keywords,
    /// 一致なし・有効語なし: 入力をそのまま返却
    Passthrough,
}

/// 正規化の結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// 検索に使う語
    pub term: String,
    pub source: ResolutionSource,
    /// 一致した全候補（カタログ順）
    pub candidates: Vec<MatchCandidate>,
}
