use anyhow::Result;
use std::fmt::Display;
use std::io::{self, Write};

/// What the user chose after an action finished or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Repeat,
    Back,
}

/// Read a line of input from the terminal
pub fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    // Trim whitespace and newlines
    Ok(input.trim().to_string())
}

/// Read a password from the terminal. Kept as a plain read so the seam
/// exists for a no-echo implementation (e.g. rpassword) later.
pub fn read_password(prompt: &str) -> Result<String> {
    read_line(prompt)
}

/// Display a section header
pub fn print_header(title: &str) {
    println!("\n=== {} ===", title);
}

pub fn print_info(message: impl Display) {
    println!("{}", message);
}

pub fn print_success(message: impl Display) {
    println!("{}", message);
}

pub fn print_error(message: impl Display) {
    println!("{}", message);
}

/// Ask whether to repeat the same action or go back. When repetition is not
/// offered, Enter and 'b' both go back; anything else re-asks.
pub fn prompt_repeat_or_back(label: &str, allow_repeat: bool) -> Result<Flow> {
    loop {
        if allow_repeat {
            let choice =
                read_line(&format!("Press Enter to {} again or 'b' to go back: ", label))?
                    .to_lowercase();
            if choice.is_empty() {
                return Ok(Flow::Repeat);
            }
            if choice == "b" {
                return Ok(Flow::Back);
            }
        } else {
            let choice = read_line("Press 'b' then Enter to go back: ")?.to_lowercase();
            if choice == "b" || choice.is_empty() {
                return Ok(Flow::Back);
            }
        }
        println!("Invalid option.");
    }
}
