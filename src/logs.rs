use anyhow::Result;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// Logging bootstrap for embedders and demos. The library itself only emits
/// through the `log` macros, so calling this is optional.
pub fn init(level: LevelFilter) -> Result<()> {
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;
    Ok(())
}
