// ==========================================
// 家禽生产分析系统 - 命令行入口
// ==========================================
// 用法: poultry-analytics <snapshot.json> [config.json]
// 输出: 全部在养批次的评估报告 (JSON, stdout)
// 环境变量: POULTRY_LOCALE (zh-CN / en), RUST_LOG, POULTRY_LOG_FORMAT
// ==========================================

use anyhow::{bail, Context, Result};
use poultry_analytics::{i18n, logging, EngineConfig, FarmApi};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let snapshot_path = match args.next() {
        Some(path) => path,
        None => bail!("用法: poultry-analytics <snapshot.json> [config.json]"),
    };
    let config = match args.next() {
        Some(path) => EngineConfig::from_json_file(&path)
            .with_context(|| format!("加载引擎配置失败: {}", path))?,
        None => EngineConfig::default(),
    };

    if let Ok(locale) = std::env::var("POULTRY_LOCALE") {
        i18n::set_locale(&locale);
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", poultry_analytics::APP_NAME, poultry_analytics::VERSION);
    tracing::info!("快照: {} / 语言: {}", snapshot_path, i18n::current_locale());
    tracing::info!("==================================================");

    let api = FarmApi::from_snapshot_file(&snapshot_path, &config)
        .with_context(|| format!("加载快照失败: {}", snapshot_path))?;

    let today = chrono::Local::now().date_naive();
    let reports = api.evaluate_farm(today).await?;

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
