//! Line-oriented content source: one candidate reply per line.

use lizbot_core::{LizbotError, Result};
use rand::Rng;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A static text collection sampled by random byte offset.
///
/// A draw picks a byte offset, discards the (possibly partial) line it lands in and returns the
/// next complete line, wrapping to the first line when the offset falls in the last one. Blank
/// lines are skipped.
#[derive(Debug, Clone)]
pub struct LineSource {
    name: String,
    text: String,
}

impl LineSource {
    pub fn from_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Reads the whole file once; draws never touch the filesystem.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            LizbotError::content(format!("cannot read {}: {}", path.display(), e))
        })?;
        let source = Self::from_text(path.display().to_string(), text);
        info!(source = %source.name, lines = source.line_count(), "Loaded line source");
        Ok(source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of non-blank lines.
    pub fn line_count(&self) -> usize {
        self.text.lines().filter(|l| !l.trim().is_empty()).count()
    }

    pub fn random_line(&self) -> Result<String> {
        self.random_line_with(&mut rand::thread_rng())
    }

    pub fn random_line_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        if self.text.is_empty() {
            return Err(self.empty());
        }
        let offset = rng.gen_range(0..self.text.len());
        let line = self.line_at_offset(offset)?;
        debug!(source = %self.name, offset, "Drew random line");
        Ok(line.to_string())
    }

    /// The first complete, non-blank line that starts after `offset`, wrapping around.
    pub fn line_at_offset(&self, offset: usize) -> Result<&str> {
        let bytes = self.text.as_bytes();
        if self.line_count() == 0 {
            return Err(self.empty());
        }
        let offset = offset.min(bytes.len());

        let mut start = next_line_start(bytes, offset);
        // Every line is visited at most once before a non-blank one is found.
        for _ in 0..=bytes.iter().filter(|&&b| b == b'\n').count() {
            let end = bytes[start..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |p| start + p);
            let line = self.text[start..end].trim();
            if !line.is_empty() {
                return Ok(line);
            }
            start = if end + 1 < bytes.len() { end + 1 } else { 0 };
        }
        Err(self.empty())
    }

    fn empty(&self) -> LizbotError {
        LizbotError::content(format!("{} has no lines", self.name))
    }
}

/// Start of the line after the one containing `offset`, or 0 if that is past the end.
fn next_line_start(bytes: &[u8], offset: usize) -> usize {
    match bytes[offset..].iter().position(|&b| b == b'\n') {
        Some(pos) if offset + pos + 1 < bytes.len() => offset + pos + 1,
        _ => 0,
    }
}
