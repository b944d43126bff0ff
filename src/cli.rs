use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intent-search")]
#[command(about = "依頼文から専門職カテゴリを引く検索意図リゾルバ", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (claude/codex/gemini/gemini-api/local)
    #[arg(long, value_enum, default_value = "local", global = true)]
    pub ai_provider: AiProvider,

    /// 独自カタログJSON（組み込みカタログに重ねる）
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// 履歴ファイル（省略時は設定ディレクトリ）
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ローカルのカタログだけで正規化
    Normalize {
        /// 依頼文
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// 一致候補と根拠を表示
        #[arg(long)]
        explain: bool,
    },

    /// AI補正 → ローカル正規化の順で検索語を決定
    Search {
        /// 依頼文
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// 履歴に記録しない
        #[arg(long)]
        no_history: bool,
    },

    /// 入力候補を表示
    Suggest {
        /// 入力途中の文字列
        #[arg(required = true, num_args = 1..)]
        partial: Vec<String>,
    },

    /// 検索履歴を表示/削除
    History {
        /// 履歴を削除
        #[arg(long)]
        clear: bool,
    },

    /// カタログを表示
    Catalog {
        /// 指定カテゴリのフレーズのみ
        #[arg(short, long)]
        category: Option<String>,

        /// 除外語を表示
        #[arg(long)]
        stop_words: bool,
    },

    /// 設定を表示/編集
    Config {
        /// Gemini APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },

    /// 対話式で検索
    Interactive,
}

/// 複数引数を1つの依頼文に連結
pub fn join_words(words: &[String]) -> String {
    words.join(" ")
}
