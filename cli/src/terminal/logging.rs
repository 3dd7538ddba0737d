use colored::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::FormatEvent;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::spinner::SpinnerWriter;

/// Events on this target are printed verbatim.
pub const PRINT_TARGET: &str = "authbench::print";
pub const SUCCESS_TARGET: &str = "authbench::success";

pub struct AuthbenchFormatter;

impl<S, N> FormatEvent<S, N> for AuthbenchFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() != PRINT_TARGET {
            let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) =
                if meta.target() == SUCCESS_TARGET {
                    ("[+]", |s| s.green().bold())
                } else {
                    match *meta.level() {
                        Level::TRACE => ("[ ]", |s| s.dimmed()),
                        Level::DEBUG => ("[?]", |s| s.blue()),
                        Level::INFO => ("[*]", |s| s.cyan()),
                        Level::WARN => ("[!]", |s| s.yellow().bold()),
                        Level::ERROR => ("[-]", |s| s.red().bold()),
                    }
                };
            write!(writer, "{} ", color_func(symbol.into()))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// `-v` and `-q` move the default level; `RUST_LOG` overrides both.
fn default_level(verbose: u8, quiet: u8) -> Level {
    match (verbose, quiet) {
        (0, 0) => Level::INFO,
        (1, _) => Level::DEBUG,
        (v, _) if v > 1 => Level::TRACE,
        (_, 1) => Level::WARN,
        _ => Level::ERROR,
    }
}

pub fn init_logging(verbose: u8, quiet: u8) {
    let level = default_level(verbose, quiet);
    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    // `-q` still reports results; `-qq` only reports errors.
    if quiet == 1 {
        if let Ok(directive) = format!("{SUCCESS_TARGET}=info").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(AuthbenchFormatter)
        .with_writer(|| SpinnerWriter)
        .init();
}
