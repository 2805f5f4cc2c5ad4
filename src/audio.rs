//! Sound cues
//!
//! Audio is best-effort: callers log failures and carry on, so a missing or
//! broken sound device never stalls the game.

use anyhow::{Context, Result};
use std::io::Write;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Small or big fruit eaten
    FruitEaten,
    GameOver,
}

/// Fire-and-forget audio output
pub trait AudioSink {
    /// Play a one-shot cue
    fn play(&mut self, cue: AudioCue) -> Result<()>;

    /// Start the looping background track
    fn start_background(&mut self) -> Result<()>;
}

/// Plays nothing
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: AudioCue) -> Result<()> {
        Ok(())
    }

    fn start_background(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Rings the terminal bell for cues. Terminals have no music, so the
/// background track is a no-op.
pub struct TerminalBell<W: Write = std::io::Stdout> {
    out: W,
}

impl TerminalBell {
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }
}

impl Default for TerminalBell {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    fn rings(cue: AudioCue) -> usize {
        match cue {
            AudioCue::FruitEaten => 1,
            AudioCue::GameOver => 2,
        }
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: AudioCue) -> Result<()> {
        let bells = "\x07".repeat(Self::rings(cue));
        self.out
            .write_all(bells.as_bytes())
            .and_then(|_| self.out.flush())
            .context("Failed to ring terminal bell")
    }

    fn start_background(&mut self) -> Result<()> {
        log::debug!("Background track not supported by the terminal bell");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_writes_cues() {
        let mut bell = TerminalBell::with_writer(Vec::new());

        bell.play(AudioCue::FruitEaten).unwrap();
        bell.play(AudioCue::GameOver).unwrap();
        bell.start_background().unwrap();

        assert_eq!(bell.out, b"\x07\x07\x07".to_vec());
    }

    #[test]
    fn test_silent_never_fails() {
        let mut silent = Silent;
        assert!(silent.play(AudioCue::GameOver).is_ok());
        assert!(silent.start_background().is_ok());
    }
}
