//! 検索履歴モジュール
//!
//! 直近の検索（入力と採用語）をJSONファイルに保存する。
//! 壊れたファイルやバージョン違いは空の履歴として扱う。

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// 履歴ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHistory {
    /// バージョン（互換性チェック用）
    version: u32,
    /// 新しい順
    entries: Vec<HistoryEntry>,
}

/// 履歴エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 利用者の入力
    pub query: String,
    /// 採用した検索語
    pub term: String,
    pub searched_at: DateTime<Utc>,
}

impl SearchHistory {
    const CURRENT_VERSION: u32 = 1;

    /// 履歴ファイルを読み込み
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, SearchHistory>(reader) {
            Ok(history) => {
                // バージョンチェック
                if history.version != Self::CURRENT_VERSION {
                    tracing::warn!(
                        found = history.version,
                        expected = Self::CURRENT_VERSION,
                        "履歴バージョン不一致、再生成します"
                    );
                    return Self::default();
                }
                history
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "履歴ファイルが読めないため破棄します");
                Self::default()
            }
        }
    }

    /// 履歴ファイルを保存
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// 履歴ファイルを削除（存在した場合は true）
    pub fn clear(path: &Path) -> Result<bool> {
        if path.exists() {
            std::fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// ファイル上の履歴に1件追記して保存
    pub fn append(path: &Path, query: &str, term: &str, limit: usize) -> Result<()> {
        let mut history = Self::load(path);
        history.record(query, term, limit);
        history.save(path)
    }

    /// 検索を記録
    ///
    /// 同じ入力（前後空白・大文字小文字無視）は先頭へ移動し、`limit` 件に切り詰める
    pub fn record(&mut self, query: &str, term: &str, limit: usize) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let key = query.to_lowercase();
        self.entries.retain(|e| e.query.trim().to_lowercase() != key);
        self.entries.insert(
            0,
            HistoryEntry {
                query: query.to_string(),
                term: term.to_string(),
                searched_at: Utc::now(),
            },
        );
        self.entries.truncate(limit);
    }

    /// 新しい順の履歴
    pub fn recent(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: Vec::new(),
        }
    }
}
