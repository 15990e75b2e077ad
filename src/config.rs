// 运行配置：从环境变量读取，缺省时使用引擎默认值
use anyhow::Context;
use engine::game::GameConfig;

pub const HISTORY_CAPACITY_VAR: &str = "CHESS_HISTORY_CAPACITY";

pub fn load() -> anyhow::Result<GameConfig> {
    from_value(std::env::var(HISTORY_CAPACITY_VAR).ok())
}

fn from_value(history_capacity: Option<String>) -> anyhow::Result<GameConfig> {
    let mut config = GameConfig::default();
    if let Some(value) = history_capacity {
        config.history_capacity = value
            .trim()
            .parse()
            .with_context(|| format!("{HISTORY_CAPACITY_VAR} must be a non-negative integer, got {value:?}"))?;
    }
    Ok(config)
}
