//! 検索語決定テスト
//!
//! AI補正の成功・失敗・タイムアウト時の切り替えを、偽のアシスタントで検証

use async_trait::async_trait;
use intent_search::assistant::SearchAssistant;
use intent_search::error::{Result, SearchError};
use intent_search::search::{SearchOptions, SearchResolver, TermSource};
use intent_search_common::QueryNormalizer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 偽のアシスタントの振る舞い
enum Behavior {
    Enhance(Option<&'static str>),
    Fail,
    Hang,
}

struct FakeAssistant {
    behavior: Behavior,
    suggestions: Vec<&'static str>,
    calls: AtomicUsize,
    last_query: std::sync::Mutex<Option<String>>,
}

impl FakeAssistant {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            suggestions: Vec::new(),
            calls: AtomicUsize::new(0),
            last_query: std::sync::Mutex::new(None),
        }
    }

    fn with_suggestions(mut self, suggestions: Vec<&'static str>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

#[async_trait]
impl SearchAssistant for FakeAssistant {
    async fn enhance(&self, query: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.to_string());
        match &self.behavior {
            Behavior::Enhance(term) => Ok(term.map(|t| t.to_string())),
            Behavior::Fail => Err(SearchError::ApiCall("503".into())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(None)
            }
        }
    }

    async fn suggest(&self, _partial: &str, _limit: usize) -> Result<Vec<String>> {
        match &self.behavior {
            Behavior::Fail => Err(SearchError::ApiCall("503".into())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Vec::new())
            }
            Behavior::Enhance(_) => Ok(self.suggestions.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn options() -> SearchOptions {
    SearchOptions {
        timeout: Duration::from_millis(50),
        max_query_chars: 20,
        min_suggest_chars: 3,
        suggestion_limit: 2,
    }
}

/// AI補正が使える場合はそれを採用
#[tokio::test]
async fn test_assistant_enhancement_is_used() {
    let normalizer = QueryNormalizer::default();
    let assistant = FakeAssistant::new(Behavior::Enhance(Some("gasista")));
    let resolver = SearchResolver::new(&normalizer, Some(&assistant), options());

    let outcome = resolver.resolve("huele raro en la cocina").await;
    assert_eq!(outcome.term, "gasista");
    assert_eq!(outcome.source, TermSource::Assistant { provider: "fake".to_string() });
    assert_eq!(outcome.query, "huele raro en la cocina");
}

/// AIエラー時はローカル正規化
#[tokio::test]
async fn test_assistant_failure_falls_back() {
    let normalizer = QueryNormalizer::default();
    let assistant = FakeAssistant::new(Behavior::Fail);
    let resolver = SearchResolver::new(&normalizer, Some(&assistant), options());

    let outcome = resolver.resolve("canilla que gotea").await;
    assert_eq!(outcome.term, "plomero");
    assert_eq!(outcome.source, TermSource::Catalog { phrase: "canilla que gotea".to_string() });
}

/// タイムアウト時はローカル正規化
#[tokio::test]
async fn test_assistant_timeout_falls_back() {
    let normalizer = QueryNormalizer::default();
    let assistant = FakeAssistant::new(Behavior::Hang);
    let resolver = SearchResolver::new(&normalizer, Some(&assistant), options());

    let outcome = resolver.resolve("limpieza profunda de casa").await;
    assert_eq!(outcome.term, "limpieza");
}

/// 補正なし・入力と同じ補正はローカル正規化
#[tokio::test]
async fn test_no_improvement_falls_back() {
    let normalizer = QueryNormalizer::default();

    let none = FakeAssistant::new(Behavior::Enhance(None));
    let resolver = SearchResolver::new(&normalizer, Some(&none), options());
    assert_eq!(resolver.resolve("xyz123 foobar").await.source, TermSource::Keywords);

    let same = FakeAssistant::new(Behavior::Enhance(Some("XYZ123 Foobar")));
    let resolver = SearchResolver::new(&normalizer, Some(&same), options());
    let outcome = resolver.resolve("xyz123 foobar").await;
    assert_eq!(outcome.term, "xyz123 foobar");
    assert_eq!(outcome.source, TermSource::Keywords);

    let blank = FakeAssistant::new(Behavior::Enhance(Some("   ")));
    let resolver = SearchResolver::new(&normalizer, Some(&blank), options());
    assert_eq!(resolver.resolve("heladera").await.term, "técnico en refrigeración");
}

/// 空の入力はAIを呼ばない
#[tokio::test]
async fn test_empty_query_skips_assistant() {
    let normalizer = QueryNormalizer::default();
    let assistant = FakeAssistant::new(Behavior::Enhance(Some("plomero")));
    let resolver = SearchResolver::new(&normalizer, Some(&assistant), options());

    let outcome = resolver.resolve("   ").await;
    assert_eq!(outcome.term, "   ");
    assert_eq!(outcome.source, TermSource::Passthrough);
    assert_eq!(assistant.calls.load(Ordering::SeqCst), 0);
}

/// AIへ送る入力は文字数で切り詰める
#[tokio::test]
async fn test_query_truncated_before_assistant() {
    let normalizer = QueryNormalizer::default();
    let assistant = FakeAssistant::new(Behavior::Enhance(Some("plomero")));
    let resolver = SearchResolver::new(&normalizer, Some(&assistant), options());

    resolver.resolve("  la cañería del baño pierde agua todo el día  ").await;
    let sent = assistant.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(sent, "la cañería del baño ");
    assert_eq!(sent.chars().count(), 20);
}

/// AIの入力候補
#[tokio::test]
async fn test_suggestions_from_assistant() {
    let normalizer = QueryNormalizer::default();
    let assistant = FakeAssistant::new(Behavior::Enhance(None))
        .with_suggestions(vec!["pintor de casas", "pintura de rejas", "pintor de autos"]);
    let resolver = SearchResolver::new(&normalizer, Some(&assistant), options());

    assert_eq!(
        resolver.suggestions("pint").await,
        vec!["pintor de casas", "pintura de rejas"]
    );
    assert!(resolver.suggestions("pi").await.is_empty());
}

/// 入力候補の失敗・タイムアウトは空
#[tokio::test]
async fn test_suggestions_failure_is_empty() {
    let normalizer = QueryNormalizer::default();

    let failing = FakeAssistant::new(Behavior::Fail);
    let resolver = SearchResolver::new(&normalizer, Some(&failing), options());
    assert!(resolver.suggestions("plom").await.is_empty());

    let hanging = FakeAssistant::new(Behavior::Hang);
    let resolver = SearchResolver::new(&normalizer, Some(&hanging), options());
    assert!(resolver.suggestions("plom").await.is_empty());
}

/// AIなしの入力候補はカタログから
#[tokio::test]
async fn test_local_suggestions_from_catalog() {
    let normalizer = QueryNormalizer::default();
    let resolver = SearchResolver::new(&normalizer, None, options());

    // "técnico" を含むカテゴリがカタログ順で2件
    assert_eq!(
        resolver.suggestions("técnico").await,
        vec!["técnico en refrigeración", "técnico en electrodomésticos"]
    );
}
