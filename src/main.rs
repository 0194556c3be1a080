use std::time::Instant;

use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, warn};

// 从 lib.rs 导入模块
use academy_workflow::config::AppConfig;
use academy_workflow::routes;
use academy_workflow::runtime::lifetime;
use academy_workflow::utils::{json_error_handler, query_error_handler};

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default().max_age(config.cors.max_age);

    cors = if config.cors.allowed_origins.is_empty()
        || config.cors.allowed_origins.iter().any(|o| o == "*")
    {
        cors.allow_any_origin()
    } else {
        config
            .cors
            .allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    };

    if config.cors.allowed_methods.is_empty() {
        cors = cors.allow_any_method();
    } else {
        cors = cors.allowed_methods(config.cors.allowed_methods.iter().map(String::as_str));
    }

    if config.cors.allowed_headers.is_empty() {
        cors.allow_any_header()
    } else {
        config
            .cors
            .allowed_headers
            .iter()
            .fold(cors, |cors, header| cors.allowed_header(header.as_str()))
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    let started = Instant::now();

    // 启动前预处理 //

    // 初始化配置
    setup_panic!();
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return Err(std::io::Error::other(e));
    }
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    warn!(
        "Starting pre-startup processing...
        Project: {}
        Version: {}
        Instance: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.app.system_name
    );

    let startup = match lifetime::startup::prepare_server_startup().await {
        Ok(startup) => startup,
        Err(e) => {
            error!("{}", e.format_simple());
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    let storage = startup.storage.clone();
    let cache = startup.cache.clone();

    debug!(
        "Pre-startup processing completed in {} ms",
        started.elapsed().as_millis()
    );

    // 预处理完成 //

    warn!("Using {} workers for the server", config.server.workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler)) // 设置查询参数错误处理器
            .app_data(web::JsonConfig::default().error_handler(json_error_handler)) // 设置JSON错误处理器
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::PayloadConfig::new(
                config.server.limits.max_payload_size,
            )) // 设置最大请求体大小
            .configure(routes::configure_groups_routes) // 群组、班级、成员与督导
            .configure(routes::configure_forms_routes) // 表单、题目与作答
            .configure(routes::configure_reports_routes) // 报告审阅流转
            .configure(routes::configure_templates_routes) // 概念模板
            .configure(routes::configure_notifications_routes) // 通知
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    )) // 启用长连接
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    )) // 客户端超时
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    )) // 断连超时
    .workers(config.server.workers);

    let server = {
        #[cfg(unix)]
        {
            if let Some(socket_path) = config.unix_socket_path() {
                warn!("Starting server on Unix socket: {}", socket_path);
                if std::path::Path::new(socket_path).exists() {
                    std::fs::remove_file(socket_path)?;
                }
                server.bind_uds(socket_path)?
            } else {
                let bind_address = config.server_bind_address();
                warn!("Starting server at http://{}", bind_address);
                server.bind(bind_address)?
            }
        }

        #[cfg(not(unix))]
        {
            let bind_address = config.server_bind_address();
            warn!("Starting server at http://{}", bind_address);
            server.bind(bind_address)?
        }
    }
    .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
