use anyhow::Result;
use dragun_submission::utils::logging;
use dragun_submission::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（如果有）
    let _ = dotenvy::dotenv();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _summary = App::initialize(config).run().await?;

    Ok(())
}
