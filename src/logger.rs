use anyhow::Result;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// Maps the number of `-v` flags to a log level.
pub fn level(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Sends log records to stderr. Lines end in `\r\n` so they stay aligned
/// while the terminal is in raw mode.
pub fn setup(verbosity: u8) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .info(Color::Cyan)
        .debug(Color::BrightBlack)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level(verbosity))
        .chain(fern::Output::stderr("\r\n"))
        .apply()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level() {
        assert_eq!(level(0), LevelFilter::Warn);
        assert_eq!(level(1), LevelFilter::Info);
        assert_eq!(level(2), LevelFilter::Debug);
        assert_eq!(level(3), LevelFilter::Trace);
        assert_eq!(level(u8::MAX), LevelFilter::Trace);
    }
}
