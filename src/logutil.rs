//! Logging setup and sanitization.
//!
//! Log lines must stay single-line even when they quote user-supplied forum
//! names or search terms; [`escape_log`] escapes control characters and caps
//! very long strings. [`init`] wires `env_logger` to the configured file
//! target, mirroring output to the console when stdout is a TTY.

use crate::config::Config;

/// Initialize logging from the loaded config and CLI verbosity.
///
/// Verbosity overrides the config level: `-v` for debug, `-vv` for trace.
/// When a log file is configured, every line goes there; console output is
/// added only when stdout is a terminal.
pub fn init(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;

    let mut builder = env_logger::Builder::new();
    let level = match verbosity {
        0 => config
            .as_ref()
            .map(|c| c.logging.level.as_str())
            .unwrap_or("info")
            .parse()
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);

    let file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(ref path) = file {
        if let Ok(f) = std::fs::OpenOptions::new().create(true).append(true).open(path) {
            let writer = std::sync::Arc::new(std::sync::Mutex::new(f));
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = writer.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }

    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
    let _ = builder.try_init();
}

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
///   Truncates very long strings with an ellipsis to cap log noise.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 300;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
