//! # 示例应用程序
//!
//! 演示如何注册组件、构建容器并分发请求

mod components;

use anyhow::Context;
use clap::Parser;
use infrastructure_composition::{
    ApplicationBuilder, ContainerSettings, DispatchRequest, DispatchResponse,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn IoC 示例应用")]
struct Args {
    /// 配置文件路径，文件不存在时只使用环境变量
    #[arg(short, long, default_value = "config/app.toml")]
    config: PathBuf,

    /// 日志级别，覆盖配置文件中的设置
    #[arg(long)]
    log_level: Option<String>,

    /// 要分发的请求，按 `VERB PATH` 成对给出
    #[arg(value_name = "VERB PATH")]
    requests: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args.config.exists().then_some(args.config.as_path());
    let mut settings = ContainerSettings::load(config_path).context("加载配置失败")?;
    if settings.container.root_namespace.is_empty() {
        settings.container.root_namespace = components::ROOT_NAMESPACE.to_string();
    }

    let mut logging = settings.logging.to_logging_config()?;
    if let Some(level) = &args.log_level {
        logging = logging.with_level(level.parse().context("无效的日志级别")?);
    }

    let application = ApplicationBuilder::new()
        .register_all(components::descriptors())?
        .with_settings(settings)
        .with_logging(logging)
        .build()?;
    let application = Arc::new(application);

    for entry in application.route_entries() {
        info!(
            "路由: {} {} -> {}.{}",
            entry.method.map_or("ANY", |method| method.as_str()),
            entry.path,
            entry.controller.type_info().short_name(),
            entry.handler.name
        );
    }

    let requests = parse_requests(&args.requests)?;
    let handles: Vec<_> = requests
        .into_iter()
        .map(|request| {
            let application = application.clone();
            tokio::spawn(async move {
                let response = application.dispatch(&request);
                (request, response)
            })
        })
        .collect();

    for handle in handles {
        let (request, response) = handle.await?;
        if !response.is_success() {
            warn!("请求 {} 失败: {} {}", request.path, response.status, response.reason);
        }
        print_response(&request, &response);
    }
    Ok(())
}

/// 把命令行参数解析为请求，没有参数时使用默认演示请求
fn parse_requests(raw: &[String]) -> anyhow::Result<Vec<DispatchRequest>> {
    if raw.is_empty() {
        return Ok(vec![
            DispatchRequest::new("GET", "/users"),
            DispatchRequest::new("POST", "/users"),
            DispatchRequest::new("GET", "/users/{id}"),
            DispatchRequest::any("/health"),
            DispatchRequest::new("DELETE", "/users"),
            DispatchRequest::new("GET", "/missing"),
        ]);
    }

    anyhow::ensure!(raw.len() % 2 == 0, "请求参数必须按 VERB PATH 成对给出");
    Ok(raw
        .chunks(2)
        .map(|pair| DispatchRequest::new(pair[0].as_str(), pair[1].as_str()))
        .collect())
}

fn print_response(request: &DispatchRequest, response: &DispatchResponse) {
    println!(
        "{} {} -> {} {} [{}]\n{}\n",
        request.verb.as_deref().unwrap_or("ANY"),
        request.path,
        response.status,
        response.reason,
        response.content_type,
        response.body
    );
}
