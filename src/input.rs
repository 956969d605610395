use crate::debug_log;
use std::io::{self, BufRead, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Prompt input delivered line by line over a channel.
///
/// A reader thread owns the real input, so the countdown can wait for a
/// line with a timeout while the blocking prompts read through `BufRead`.
/// The channel closing means end of input.
pub struct InputChannel {
    lines: Receiver<String>,
    buf: Vec<u8>,
    pos: usize,
}

impl InputChannel {
    /// Starts a thread that forwards every line of `reader`, newline
    /// included, until end of input or a read error.
    pub fn spawn<R>(mut reader: R) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug_log!("Input reader stopped: {}", e);
                        break;
                    }
                }
            }
        });
        Self::from_receiver(rx)
    }

    /// Queues all of `text` up front. Used for scripted sessions.
    #[must_use]
    pub fn preloaded(text: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        for line in text.split_inclusive('\n') {
            // The receiver is still alive here.
            let _ = tx.send(line.to_string());
        }
        Self::from_receiver(rx)
    }

    const fn from_receiver(lines: Receiver<String>) -> Self {
        Self {
            lines,
            buf: Vec::new(),
            pos: 0,
        }
    }

    /// Waits up to `timeout` for the next line and returns it trimmed.
    pub fn line_within(&mut self, timeout: Duration) -> Result<String, RecvTimeoutError> {
        if self.pos < self.buf.len() {
            let rest = String::from_utf8_lossy(&self.buf[self.pos..]).trim().to_string();
            self.pos = self.buf.len();
            return Ok(rest);
        }
        self.lines
            .recv_timeout(timeout)
            .map(|line| line.trim().to_string())
    }
}

impl Read for InputChannel {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for InputChannel {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos >= self.buf.len() {
            // A closed channel leaves the buffer empty, which reads as EOF.
            self.buf = self.lines.recv().map(String::into_bytes).unwrap_or_default();
            self.pos = 0;
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.buf.len());
    }
}
