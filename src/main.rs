use anyhow::Result;
use clap::Parser;

use lc_maths_tutor::cli::Cli;
use lc_maths_tutor::utils::logging;
use lc_maths_tutor::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref())?;

    // 初始化日志
    logging::init(cli.verbose || config.verbose_logging);

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    app.run(cli.command).await?;

    Ok(())
}
