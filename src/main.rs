use ai_consultant_client::utils::logging;
use ai_consultant_client::{App, Config};
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);
    logging::log_startup(&config);

    // 初始化并运行应用
    let mut app = App::initialize(config).await?;
    app.run().await
}
