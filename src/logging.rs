use log::LevelFilter;

/// Stderr logger shared by the binaries. `RUST_LOG` picks the level, `info` when unset;
/// `verbose` forces `debug`.
pub fn logger(verbose: bool) -> env_logger::Builder {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr);
    builder
}

pub fn init_logging(verbose: bool) {
    logger(verbose).init();
}
