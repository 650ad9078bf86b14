use log::LevelFilter;

/// Maps `-v`/`-q` counts to a level filter. `quiet` wins over `verbose`.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Installs the stderr logger. `RUST_LOG`, when set, replaces the level
/// chosen on the command line.
pub fn init(verbose: u8, quiet: bool) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_for(verbose, quiet))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false);

    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A second init (e.g. from tests) keeps the first logger.
    let _ = builder.try_init();
}
