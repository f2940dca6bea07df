use gridpath::{app, config::Config};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log to a file so the terminal stays free for rendering.
/// The returned guard flushes pending lines when dropped.
fn init_tracing(config: &Config) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(&config.log_dir, "gridpath.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    let config = Config::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let _guard = init_tracing(&config);
    tracing::info!(?config, "starting gridpath");

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&mut stdout, &config);
    app::restore_terminal(&mut stdout)?;
    if let Err(err) = &result {
        tracing::error!(%err, "app exited with an error");
    }
    result
}
