use log::LevelFilter;

pub fn parse_level(level: &str) -> anyhow::Result<LevelFilter> {
    Ok(match level {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => anyhow::bail!("invalid log level: {level}"),
    })
}

pub fn init(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .filter_module("hyper_util", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .format_timestamp(None)
        .init();
}
