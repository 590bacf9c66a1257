use std::io::Write;

use clap::error::ErrorKind;
use stepconf::cli;
use stepconf::{logging, Error};

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(e) => {
            // Usage errors exit 1 like every other failure.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(args.log_level()) {
        eprintln!("stepconf: warning: {e}");
    }

    // ── Read ──────────────────────────────────────────────────────────────────
    let src = std::fs::read_to_string(&args.input)
        .unwrap_or_else(|e| fail(format!("Error reading file: {e}")));
    log::info!("read {} bytes from {}", src.len(), args.input.display());

    // ── Convert ───────────────────────────────────────────────────────────────
    let rendered = match stepconf::convert(&src) {
        Ok(out) => out,
        Err(Error::Lex(e)) => fail(format!("Lexer error: {e}")),
        Err(Error::Parse(e)) => fail(format!("Parser error: {e}")),
    };

    // ── Write ─────────────────────────────────────────────────────────────────
    match &args.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &rendered) {
                fail(format!("Error writing file: {e}"));
            }
            log::info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(rendered.as_bytes()).and_then(|()| stdout.flush()) {
                fail(format!("Error writing output: {e}"));
            }
        }
    }
}
