//! Intent Search Common Library
//!
//! 自由入力の検索文を正規カテゴリへ変換する純粋ロジックと、
//! 外部AIサービス向けのプロンプト・パーサー

pub mod types;
pub mod catalog;
pub mod error;
pub mod normalizer;
pub mod parser;
pub mod prompts;

pub use types::{MatchCandidate, PhraseEntry, Resolution, ResolutionSource};
pub use catalog::PhraseCatalog;
pub use error::{Error, Result};
pub use normalizer::{default_normalizer, normalize, QueryNormalizer};
pub use parser::{extract_json, parse_enhance_response, parse_suggestions_response};
pub use prompts::{build_enhance_prompt, build_suggest_prompt};
