use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use infra::config::AppConfigImpl;
use log::info;
use log4rs::{
    append::{console::ConsoleAppender, file::FileAppender},
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use server::middleware::other;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {m}{n}";

/// 配置日志同时输出到控制台和文件
fn init_logging(log_file: &str) -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build(
            "stdout",
            Box::new(
                ConsoleAppender::builder()
                    .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
                    .build(),
            ),
        ))
        .build(
            Root::builder()
                .appender("file")
                .appender("stdout")
                .build(log_level.parse().unwrap_or(log::LevelFilter::Info)),
        )?;

    log4rs::init_config(config)?;
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfigImpl::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    init_logging(cfg.log_file())?;

    let server_cfg = cfg.server();
    let app_state = server::AppState::new(cfg)?;
    let app_state = web::Data::new(app_state);

    info!("Gallery listening on {}:{}", server_cfg.host, server_cfg.port);
    let ui_cfg = server_cfg.clone();
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .configure(server::gallery_api::configure_service)
            .configure(|svc| server::resources::configure_ui_service(svc, &ui_cfg))
            .wrap(other::cors())
    })
    .bind((server_cfg.host.as_str(), server_cfg.port))?
    .run()
    .await?;
    Ok(())
}
