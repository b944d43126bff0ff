//! ログ初期化
//!
//! 進捗表示は println!、診断ログは tracing で stderr に出す。

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// tracing購読者を登録する
///
/// `RUST_LOG` が設定されていればそれを優先する。
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "intent_search=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // テスト等で二重登録された場合は無視
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .with(env_filter)
        .try_init();
}
