use moonrelay_common::config;
use once_cell::sync::Lazy;
pub use slog::*;

fn wrap<D>(drain: D) -> Fuse<slog_async::Async>
where
    D: Drain<Err = Never, Ok = ()> + Send + 'static,
{
    slog_async::Async::new(slog_envlogger::new(drain))
        .chan_size(2 << 12)
        .thread_name("relay-log".into())
        .build()
        .fuse()
}

/// Root logger for a drain format: `json` writes one JSON object per line to
/// stdout, anything else goes to the terminal formatter.
fn root(format: &str) -> Logger {
    let drain = match format {
        "json" => wrap(slog_json::Json::default(std::io::stdout()).fuse()),
        _ => wrap(
            slog_term::FullFormat::new(slog_term::TermDecorator::new().build())
                .build()
                .fuse(),
        ),
    };

    Logger::root(
        drain,
        o!(
            "service" => env!("CARGO_PKG_NAME"),
            "version" => env!("CARGO_PKG_VERSION"),
        ),
    )
}

pub static DEFAULT: Lazy<Logger> = Lazy::new(|| {
    let format = config::get("RUST_LOG_FORMAT").unwrap_or_default();
    root(&format)
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_accepts_any_format() {
        for format in ["json", "term", ""] {
            let log = root(format).new(o!("function" => "test_root_accepts_any_format"));
            info!(log, "format check"; "format" => format);
        }
    }
}
