use std::io::{self, Write};

use base64::Engine;

/// Places text on the system clipboard through the terminal.
pub trait Clipboard: Send {
    fn copy(&mut self, text: &str) -> io::Result<()>;
}

/// OSC 52 escape sequence; supported by most modern terminals, including over SSH.
pub struct Osc52Clipboard<W: Write + Send> {
    out: W,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    #[cfg(test)]
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(osc52_sequence(text).as_bytes())?;
        self.out.flush()
    }
}

fn osc52_sequence(text: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x07")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_writes_base64_payload() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.copy("hi").unwrap();
        assert_eq!(clipboard.out, b"\x1b]52;c;aGk=\x07");
    }
}
