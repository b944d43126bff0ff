//! APIレスポンスパーサー
//!
//! AI CLIやGemini APIのレスポンスからJSONを抽出し、
//! 補正結果・入力候補をパースする

use crate::error::{Error, Result};
use serde::Deserialize;

/// 補正レスポンス
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct EnhanceResponse {
    enhanced_query: Option<String>,
}

/// APIレスポンスからJSON部分を抽出
///
/// 抽出優先順位:
/// 1. ```json ... ``` ブロック
/// 2. 生の [...] 配列 または {...} オブジェクト（先に現れた方）
/// 3. エラー
///
/// # Examples
/// ```
/// use intent_search_common::extract_json;
///
/// let response = "Resultado: {\"enhancedQuery\": \"plomero\"}";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<&str> {
    // ```json ... ``` ブロックを探す
    if let Some(start_marker) = response.find("```json") {
        let start = start_marker + 7; // "```json" の長さ
        if let Some(end_offset) = response[start..].find("```") {
            let end = start + end_offset;
            return Ok(response[start..end].trim());
        }
    }

    let array = enclosed(response, '[', ']');
    let object = enclosed(response, '{', '}');

    let found = match (array, object) {
        (Some(a), Some(o)) => Some(if a.0 < o.0 { a } else { o }),
        (a, o) => a.or(o),
    };

    found
        .map(|(start, end)| &response[start..=end])
        .ok_or_else(|| Error::Parse("JSONが見つかりません".into()))
}

/// 最初の開き括弧から最後の閉じ括弧までの範囲
fn enclosed(response: &str, open: char, close: char) -> Option<(usize, usize)> {
    let start = response.find(open)?;
    let end = response.rfind(close)?;
    (end >= start).then_some((start, end))
}

/// 補正レスポンスをパース
///
/// # Returns
/// * `Ok(Some(term))` - 補正された検索語
/// * `Ok(None)` - 補正なし（null・空文字・フィールドなし）
/// * `Err` - JSONが見つからないかパース失敗
///
/// 先頭の括弧が配列として読めない場合はオブジェクト部分を再度試す
pub fn parse_enhance_response(response: &str) -> Result<Option<String>> {
    let json_str = extract_json(response)?;
    let parsed: EnhanceResponse = match serde_json::from_str(json_str.trim()) {
        Ok(parsed) => parsed,
        Err(e) => {
            // 先に現れた [...] が注記などの場合は {...} で取り直す
            let object = enclosed(response, '{', '}')
                .map(|(start, end)| &response[start..=end])
                .filter(|object| *object != json_str);
            match object.and_then(|o| serde_json::from_str::<EnhanceResponse>(o).ok()) {
                Some(parsed) => parsed,
                None => {
                    return Err(Error::Parse(format!("補正レスポンス JSONパースエラー: {}", e)));
                }
            }
        }
    };

    Ok(parsed
        .enhanced_query
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty()))
}

/// 入力候補レスポンスをパース
///
/// 前後空白を除去し、空文字と重複（大文字小文字無視）を取り除いて `limit` 件に切り詰める
pub fn parse_suggestions_response(response: &str, limit: usize) -> Result<Vec<String>> {
    let json_str = extract_json(response)?;
    let raw: Vec<String> = serde_json::from_str(json_str.trim())
        .map_err(|e| Error::Parse(format!("入力候補 JSONパースエラー: {}", e)))?;

    let mut suggestions: Vec<String> = Vec::new();
    for item in raw {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let lowered = item.to_lowercase();
        if suggestions.iter().any(|s| s.to_lowercase() == lowered) {
            continue;
        }
        suggestions.push(item.to_string());
        if suggestions.len() >= limit {
            break;
        }
    }

    Ok(suggestions)
}
