//! Terminal prompts
//!
//! The masked password read suppresses echo by taking the terminal into
//! raw mode and consuming key events directly, so the secret never appears
//! on screen. Yes/no matching follows the original installer's loose
//! prompt conventions: any answer starting with `y`/`n` counts.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Write};

/// Read a password with terminal echo suppressed.
///
/// Backspace edits, Enter submits, Ctrl+C aborts with an
/// `io::ErrorKind::Interrupted` error. Raw mode is always restored.
pub fn read_password(prompt: &str) -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    terminal::enable_raw_mode()?;
    let result = read_password_keys();
    terminal::disable_raw_mode()?;
    println!();
    result
}

fn read_password_keys() -> io::Result<String> {
    let mut password = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(password),
            KeyCode::Backspace => {
                password.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(
                    io::ErrorKind::Interrupted,
                    "password entry cancelled",
                ));
            }
            KeyCode::Char(c) => password.push(c),
            _ => {}
        }
    }
}

/// `y`, `yes`, `Y`, `YES`, ...
pub fn affirmative(answer: &str) -> bool {
    answer.trim().to_ascii_lowercase().starts_with('y')
}

/// `n`, `no`, `N`, `NO`, ...
pub fn negative(answer: &str) -> bool {
    answer.trim().to_ascii_lowercase().starts_with('n')
}
