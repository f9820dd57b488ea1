use std::io::{self, Write};

/// Plays the success/fail cue for a scored answer
pub trait AudioSink {
    fn play(&mut self, success: bool);
}

/// Rings the terminal bell on wrong answers
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, success: bool) {
        if success {
            return;
        }
        // a missing or closed terminal just means no sound
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}

/// No-op sink for muted or headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play(&mut self, _success: bool) {}
}

/// Hand every queued signal to the sink unless sound is off
pub fn play_all(sink: &mut dyn AudioSink, signals: &[bool], sound_enabled: bool) {
    if !sound_enabled {
        return;
    }
    for &success in signals {
        sink.play(success);
    }
}
