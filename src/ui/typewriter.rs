use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Writes text one character at a time with a fixed pause between them
#[derive(Debug, Clone, Copy)]
pub struct Typewriter {
    delay: Duration,
}

impl Typewriter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Type `text` without a trailing newline
    pub fn write(&self, out: &mut dyn Write, text: &str) -> io::Result<()> {
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            out.flush()?;
            if !self.delay.is_zero() {
                thread::sleep(self.delay);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_every_character() {
        let mut out = Vec::new();
        Typewriter::from_millis(0)
            .write(&mut out, "Saindo do programa...")
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Saindo do programa...");
    }

    #[test]
    fn test_multibyte_characters_intact() {
        let mut out = Vec::new();
        Typewriter::from_millis(0).write(&mut out, "Página • ção").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Página • ção");
    }
}
