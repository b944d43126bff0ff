//! 対話式検索モジュール
//!
//! 1行ずつ依頼文を受け取り、検索語を表示する。

use crate::error::{SearchError, Result};
use crate::history::SearchHistory;
use crate::search::SearchResolver;
use dialoguer::Input;
use std::path::Path;

/// 対話アクション
#[derive(Debug, PartialEq, Eq)]
pub enum InteractiveAction {
    /// 検索語を決定
    Search(String),
    /// 入力候補を表示（`?` で始まる入力）
    Suggest(String),
    /// 履歴を表示
    History,
    /// 終了
    Quit,
}

/// 入力行をアクションに変換
pub fn parse_action(input: &str) -> InteractiveAction {
    let trimmed = input.trim();
    match trimmed {
        "" | "q" | "Q" | "salir" => InteractiveAction::Quit,
        "h" | "H" => InteractiveAction::History,
        _ => match trimmed.strip_prefix('?') {
            Some(partial) => InteractiveAction::Suggest(partial.trim().to_string()),
            None => InteractiveAction::Search(trimmed.to_string()),
        },
    }
}

/// 対話式で検索
///
/// # Arguments
/// * `resolver` - 検索語の決定
/// * `history_path` - 履歴ファイル（None なら記録しない）
/// * `history_limit` - 履歴の保持件数
pub async fn run_interactive(
    resolver: &SearchResolver<'_>,
    history_path: Option<&Path>,
    history_limit: usize,
) -> Result<()> {
    println!("🔎 intent-search - 対話式検索");
    println!("---");
    println!("操作: 依頼文を入力 [?文字列]入力候補 [h]履歴 [q/Enter]終了");
    println!("---\n");

    loop {
        let input: String = Input::new()
            .with_prompt("¿Qué necesitás?")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| SearchError::CliExecution(e.to_string()))?;

        match parse_action(&input) {
            InteractiveAction::Quit => {
                println!("終了します");
                break;
            }
            InteractiveAction::History => match history_path {
                Some(path) => print_history(&SearchHistory::load(path)),
                None => println!("  履歴は無効です\n"),
            },
            InteractiveAction::Suggest(partial) => {
                let suggestions = resolver.suggestions(&partial).await;
                if suggestions.is_empty() {
                    println!("  候補なし\n");
                } else {
                    for suggestion in &suggestions {
                        println!("  - {}", suggestion);
                    }
                    println!();
                }
            }
            InteractiveAction::Search(query) => {
                let outcome = resolver.resolve(&query).await;
                println!("  → {} [{}]\n", outcome.term, outcome.source);

                if let Some(path) = history_path {
                    if let Err(e) = SearchHistory::append(path, &outcome.query, &outcome.term, history_limit) {
                        tracing::warn!(error = %e, "履歴の保存に失敗");
                    }
                }
            }
        }
    }

    Ok(())
}

/// 履歴を表示
pub fn print_history(history: &SearchHistory) {
    if history.is_empty() {
        println!("  履歴はありません\n");
        return;
    }

    for (i, entry) in history.recent().iter().enumerate() {
        println!(
            "  {}. {} → {} ({})",
            i + 1,
            entry.query,
            entry.term,
            entry.searched_at.format("%Y-%m-%d %H:%M")
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_quit() {
        assert_eq!(parse_action(""), InteractiveAction::Quit);
        assert_eq!(parse_action("  q "), InteractiveAction::Quit);
        assert_eq!(parse_action("salir"), InteractiveAction::Quit);
    }

    #[test]
    fn test_parse_action_suggest() {
        assert_eq!(parse_action("? pint"), InteractiveAction::Suggest("pint".to_string()));
    }

    #[test]
    fn test_parse_action_search() {
        assert_eq!(
            parse_action(" canilla que gotea "),
            InteractiveAction::Search("canilla que gotea".to_string())
        );
        assert_eq!(parse_action("h"), InteractiveAction::History);
    }
}
