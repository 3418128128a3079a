use log::info;
use prewarm::crawler::browser::ChromiumLauncher;
use prewarm::crawler::config::PrewarmConfig;
use prewarm::crawler::crawler::run_prewarm;
use prewarm::crawler::fetcher::SpiderFetcher;
use prewarm::crawler::logging::log_fatal;

#[tokio::main]
async fn main() {
    let config = PrewarmConfig::default();
    if let Err(e) = config.init_logging() {
        eprintln!("[config] failed to initialize logging: {}", e);
    }

    let fetcher = SpiderFetcher::new(&config.browser.user_agent);
    match run_prewarm(&config, fetcher, ChromiumLauncher::new()).await {
        Ok(summary) => info!("prewarm finished: {}/{} page(s) warmed", summary.success_count, summary.total),
        Err(e) => {
            log_fatal(&e);
            std::process::exit(1);
        }
    }
}
