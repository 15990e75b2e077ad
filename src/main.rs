use std::io;

use engine::game::GameConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
#[cfg(feature = "gui")]
mod ui;

fn main() -> anyhow::Result<()> {
    // 日志写到 stderr，stdout 留给文本协议
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = config::load()?;
    info!(history_capacity = config.history_capacity, "starting");
    run(config)
}

#[cfg(feature = "gui")]
fn run(config: GameConfig) -> anyhow::Result<()> {
    ui::ui(engine::game::Game::new(config))
}

#[cfg(not(feature = "gui"))]
fn run(config: GameConfig) -> anyhow::Result<()> {
    use anyhow::Context;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    engine::engine::Referee::new(config)
        .start(stdin.lock(), &mut stdout)
        .context("text protocol session failed")
}
