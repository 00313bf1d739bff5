use {
    tracing::Level,
    tracing_subscriber::{prelude::*, filter::filter_fn},
};

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .finish()
        .with(filter_fn(|metadata| {
            // only this workspace logs at debug, dependencies stay at info
            if metadata.target().starts_with("demographics") {
                true
            } else {
                metadata.level() <= &Level::INFO
            }
        }))
        .init();
}
