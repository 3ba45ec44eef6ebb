//! # Logging
//!
//! `env_logger` setup shared by the `hide` and `reveal` binaries. The library
//! itself only logs through the `log` facade.

use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Initialize logging to stderr as `[YYYY-MM-DD HH:MM:SS] [LEVEL] message`.
pub fn init_logger(level: LevelFilter) {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .init();
}

/// Info by default, debug with `--verbose`.
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
