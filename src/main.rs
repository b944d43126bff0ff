use clap::Parser;
use intent_search::{assistant, cli, config, error, history, interactive, logging, search};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use history::SearchHistory;
use indicatif::{ProgressBar, ProgressStyle};
use intent_search_common::{PhraseCatalog, QueryNormalizer};
use search::{SearchOptions, SearchResolver, TermSource};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Normalize { query, explain } => {
            let normalizer = build_normalizer(&Config::load_or_default(), cli.catalog.as_deref())?;
            let query = cli::join_words(&query);
            let resolution = normalizer.resolve(&query);
            println!("{}", resolution.term);

            if explain {
                println!("\n根拠: {}", TermSource::from(resolution.source.clone()));
                if resolution.candidates.is_empty() {
                    println!("一致候補: なし");
                } else {
                    println!("一致候補:");
                    for c in &resolution.candidates {
                        println!("  - 「{}」({}文字) → {}", c.phrase, c.length, c.category);
                    }
                }
            }
        }

        Commands::Search { query, no_history } => {
            let config = Config::load()?;
            let normalizer = build_normalizer(&config, cli.catalog.as_deref())?;
            let query = cli::join_words(&query);
            let assistant = assistant::build_assistant(cli.ai_provider, &config, normalizer.catalog())?;
            let resolver = SearchResolver::new(&normalizer, assistant.as_deref(), SearchOptions::from(&config));

            let spinner = assistant.as_ref().map(|a| start_spinner(format!("{} に問い合わせ中...", a.name())));
            let outcome = resolver.resolve(&query).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }

            println!("{}", outcome.term);
            if cli.verbose {
                println!("  根拠: {}", outcome.source);
            }

            if !no_history {
                let saved = resolve_history_path(cli.history).and_then(|path| {
                    SearchHistory::append(&path, &outcome.query, &outcome.term, config.history_limit)
                });
                if let Err(e) = saved {
                    tracing::warn!(error = %e, "履歴の保存に失敗");
                }
            }
        }

        Commands::Suggest { partial } => {
            let config = Config::load()?;
            let normalizer = build_normalizer(&config, cli.catalog.as_deref())?;
            let partial = cli::join_words(&partial);
            let assistant = assistant::build_assistant(cli.ai_provider, &config, normalizer.catalog())?;
            let resolver = SearchResolver::new(&normalizer, assistant.as_deref(), SearchOptions::from(&config));

            for suggestion in resolver.suggestions(&partial).await {
                println!("{}", suggestion);
            }
        }

        Commands::History { clear } => {
            let history_path = resolve_history_path(cli.history)?;
            if clear {
                match SearchHistory::clear(&history_path) {
                    Ok(true) => println!("✔ 履歴を削除しました: {}", history_path.display()),
                    Ok(false) => println!("履歴ファイルが存在しません"),
                    Err(e) => println!("履歴削除エラー: {}", e),
                }
            } else {
                println!("検索履歴 ({}):", history_path.display());
                interactive::print_history(&SearchHistory::load(&history_path));
            }
        }

        Commands::Catalog { category, stop_words } => {
            let normalizer = build_normalizer(&Config::load_or_default(), cli.catalog.as_deref())?;
            let catalog = normalizer.catalog();

            if stop_words {
                println!("除外語: {}", catalog.stop_words().join(", "));
            } else {
                let wanted = category.map(|c| c.to_lowercase());
                let mut shown = 0;
                for entry in catalog.entries() {
                    if wanted.as_ref().is_some_and(|w| entry.category.to_lowercase() != *w) {
                        continue;
                    }
                    println!("{}\t{}", entry.phrase, entry.category);
                    shown += 1;
                }
                println!("\n{}件 / カテゴリ {}種", shown, catalog.categories().len());
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = Config::load()?;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  入力候補: {}件 ({}文字以上)", config.suggestion_limit, config.min_suggest_chars);
                println!("  最大クエリ長: {}文字", config.max_query_chars);
                println!("  履歴件数: {}", config.history_limit);
                println!(
                    "  独自カタログ: {}",
                    config.catalog_path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "なし".into())
                );
                println!("  APIキー: {}", if config.api_key.is_some() { "設定済み" } else { "未設定" });
            }
        }

        Commands::Interactive => {
            let config = Config::load()?;
            let normalizer = build_normalizer(&config, cli.catalog.as_deref())?;
            let history_path = resolve_history_path(cli.history)?;
            let assistant = assistant::build_assistant(cli.ai_provider, &config, normalizer.catalog())?;
            let resolver = SearchResolver::new(&normalizer, assistant.as_deref(), SearchOptions::from(&config));
            interactive::run_interactive(&resolver, Some(history_path.as_path()), config.history_limit).await?;
        }
    }

    Ok(())
}

/// カタログ構築（組み込み → 設定ファイル → 引数の順に重ねる）
fn build_normalizer(config: &Config, extra_catalog: Option<&Path>) -> Result<QueryNormalizer> {
    let mut catalog = PhraseCatalog::builtin();
    for path in config.catalog_path.as_deref().into_iter().chain(extra_catalog) {
        let custom = PhraseCatalog::from_file(path)?;
        catalog.merge(&custom)?;
        tracing::info!(path = %path.display(), phrases = custom.len(), "独自カタログを適用");
    }
    Ok(QueryNormalizer::new(catalog))
}

fn resolve_history_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => Config::history_path(),
    }
}

fn start_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
