//! Web 服务器主程序入口

#[cfg(feature = "web")]
use std::sync::Arc;

#[cfg(feature = "web")]
use clap::Parser;
#[cfg(feature = "web")]
use html_translator::{
    env::EnvConfig,
    network::{FetchConfig, HttpFetcher, HttpPool},
    translation::{
        DocumentTranslator, GeminiBackend, GeminiConfig, TranslationConfig, TranslationEngine,
    },
    web::{AppState, WebConfig, WebServer},
};
#[cfg(feature = "web")]
use tracing_subscriber::EnvFilter;

/// HTML 整页翻译服务
#[cfg(feature = "web")]
#[derive(Parser, Debug)]
#[command(name = "html-translator-web", version, about)]
struct Args {
    /// Bind address
    #[arg(short, long, env = "HOST")]
    bind: Option<String>,

    /// Port number
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[cfg(feature = "web")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 中的值不会覆盖已经存在的环境变量
    let _ = dotenv::dotenv();
    let args = Args::parse();

    let env_config = match EnvConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env_config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = env_config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    env_config.print_summary();

    let mut web_config = WebConfig::from_env_config(&env_config);
    if let Some(bind) = args.bind {
        web_config.bind_addr = bind;
    }
    if let Some(port) = args.port {
        web_config.port = port;
    }
    web_config.validate()?;

    let translation_config = TranslationConfig::from_env_config(&env_config);
    translation_config.validate()?;

    // 获取和翻译各用一个连接池
    let fetch_config = FetchConfig::default();
    let fetcher = HttpFetcher::new(HttpPool::new(&fetch_config)?);
    let backend = GeminiBackend::new(
        HttpPool::new(&fetch_config)?,
        GeminiConfig::from_env_config(&env_config)?,
    );

    let engine = TranslationEngine::new(Arc::new(backend), translation_config.retry);
    let translator = DocumentTranslator::new(Arc::new(fetcher), engine, translation_config);

    let server = WebServer::new(web_config, Arc::new(AppState::new(translator)));
    server.start().await?;

    Ok(())
}

#[cfg(not(feature = "web"))]
fn main() {
    eprintln!("Error: Web feature not enabled. Please compile with --features web");
    std::process::exit(1);
}
