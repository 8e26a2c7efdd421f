// ==========================================
// 物流 NT 看板 - 命令行入口
// ==========================================
// 用法: logistica-dashboard [dashboard|calculations|cuts|raw|diagnostics|refresh] [仓库代码]
// 输出: 页面结果 JSON（stdout）, 日志写 stderr
// ==========================================

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use logistica_dashboard::app::{get_default_config_path, AppState};
use logistica_dashboard::config::ConfigManager;
use logistica_dashboard::domain::types::Screen;
use logistica_dashboard::{i18n, logging};

/// 刷新命令（不是页面）
const REFRESH_COMMAND: &str = "refresh";

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    info!("==================================================");
    info!("{} - v{}", logistica_dashboard::APP_NAME, logistica_dashboard::VERSION);
    info!("==================================================");

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "dashboard".to_string());
    let depot_arg = args.next();

    // 加载配置
    let config_path = get_default_config_path();
    let config = if config_path.exists() {
        info!(path = %config_path.display(), "加载配置文件");
        ConfigManager::from_file(&config_path)
            .with_context(|| format!("无法读取配置文件: {}", config_path.display()))?
    } else {
        info!(path = %config_path.display(), "配置文件不存在, 使用默认配置");
        ConfigManager::new()
    }
    .with_env_overrides();

    let settings = config.settings().context("配置无效")?;
    i18n::set_locale(&settings.locale);

    let state = AppState::new(settings);
    let api = state.dashboard_api.clone();

    if command == REFRESH_COMMAND {
        let summary = api.refresh_from_sap().await?;
        return print_json(&summary);
    }

    let screen =
        Screen::parse(&command).with_context(|| format!("未知页面: {}", command))?;
    api.reload().await?;

    // 未指定仓库时使用第一个配置的仓库
    let depot = match &depot_arg {
        Some(code) => code.clone(),
        None => state
            .settings
            .depots
            .first()
            .map(|d| d.code.clone())
            .context("未配置任何仓库")?,
    };

    match screen {
        Screen::Dashboard => print_json(&api.dashboard(&depot)?),
        Screen::Calculations => print_json(&api.calculations(&depot)?),
        Screen::Cuts => print_json(&api.cuts(depot_arg.as_deref())?),
        Screen::RawData => print_json(&api.raw_data(&depot)?),
        Screen::Diagnostics => print_json(&api.diagnostics()?),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("结果序列化失败")?;
    println!("{}", json);
    Ok(())
}
