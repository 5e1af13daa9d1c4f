mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use headarray_core::{ControllerConfig, SystemError};
use headarray_core::config::{DEFAULT_INPUT_PERIOD, DEFAULT_MAIN_PERIOD};
use headarray_core::delay::LEGACY_DELAY_FLOOR_MS;
use session::Session;

fn main() -> io::Result<()> {
    let legacy_floor = env::args().skip(1).any(|arg| arg == "--legacy-floor");
    let mut session = start_session(legacy_floor).unwrap_or_else(|err| {
        eprintln!("failed to start controller: {err}");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut line = String::new();

    writeln!(
        writer,
        "Head array controller emulator ready. Type `help` for commands or `exit` to quit."
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

/// `--legacy-floor` emulates the earlier board's 500 ms delay floor.
fn start_session(legacy_floor: bool) -> Result<Session, SystemError> {
    if !legacy_floor {
        return Session::new();
    }
    let config =
        ControllerConfig::new(DEFAULT_MAIN_PERIOD, DEFAULT_INPUT_PERIOD, LEGACY_DELAY_FLOOR_MS)?;
    Session::with_config(config)
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
