//! Top-level cadence: render, wait, advance, repeat.

use crate::engine::{Engine, Frame};
use crate::error::LifeResult;
use std::io::Write;
use std::thread;
use std::time::Duration;

/// What the sink wants after presenting a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Consumer of committed generations.
///
/// Called from the driver thread only, between generations, so a frame is
/// never presented while its buffer is being committed.
pub trait RenderSink {
    fn present(&mut self, frame: &Frame) -> LifeResult<Flow>;
}

/// Run until the sink asks to quit. Returns the last generation shown.
pub fn run<S: RenderSink>(engine: &Engine, sink: &mut S, delay: Duration) -> LifeResult<u64> {
    loop {
        let frame = engine.snapshot()?;
        if sink.present(&frame)? == Flow::Quit {
            tracing::info!(generation = frame.generation, "stopped by sink");
            return Ok(frame.generation);
        }
        thread::sleep(delay);
        engine.advance()?;
    }
}

/// Present generation 0 through `generations` with no delay in between.
pub fn run_for<S: RenderSink>(engine: &Engine, sink: &mut S, generations: u64) -> LifeResult<u64> {
    let mut frame = engine.snapshot()?;
    loop {
        if sink.present(&frame)? == Flow::Quit || frame.generation >= generations {
            return Ok(frame.generation);
        }
        engine.advance()?;
        frame = engine.snapshot()?;
    }
}

/// Writes each frame as '0'/'1' rows followed by a score line and a blank line.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for TextSink<W> {
    fn present(&mut self, frame: &Frame) -> LifeResult<Flow> {
        self.out.write_all(frame.grid.to_text().as_bytes())?;
        writeln!(self.out, "Score: {}", frame.live)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe;

    /// Quits after a fixed number of frames, remembering what it saw.
    struct CountingSink {
        limit: usize,
        seen: Vec<(u64, usize)>,
    }

    impl RenderSink for CountingSink {
        fn present(&mut self, frame: &Frame) -> LifeResult<Flow> {
            self.seen.push((frame.generation, frame.live));
            if self.seen.len() >= self.limit {
                Ok(Flow::Quit)
            } else {
                Ok(Flow::Continue)
            }
        }
    }

    #[test]
    fn loaded_seed_renders_unchanged_before_any_tick() {
        let text = "00100\n00100\n00100\n00000\n01010\n";
        let engine = Engine::start(universe::parse(text, 5, 5).unwrap(), 2).unwrap();
        let mut sink = TextSink::new(Vec::new());
        run_for(&engine, &mut sink, 0).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, format!("{text}Score: 5\n\n"));
    }

    #[test]
    fn run_presents_every_generation_in_order() {
        let glider = "0100000\n0010000\n1110000\n0000000\n0000000\n0000000\n";
        let engine = Engine::start(universe::parse(glider, 7, 6).unwrap(), 3).unwrap();
        let mut sink = CountingSink { limit: 6, seen: Vec::new() };

        let last = run(&engine, &mut sink, Duration::from_millis(1)).unwrap();
        assert_eq!(last, 5);
        // A glider keeps five cells in every phase.
        assert_eq!(sink.seen, (0..6).map(|g| (g, 5)).collect::<Vec<_>>());
    }

    #[test]
    fn run_for_stops_at_requested_generation() {
        let engine = Engine::start(universe::parse("000\n111\n000\n", 3, 3).unwrap(), 1).unwrap();
        let mut sink = TextSink::new(Vec::new());
        assert_eq!(run_for(&engine, &mut sink, 2).unwrap(), 2);
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "000\n111\n000\nScore: 3\n\n111\n111\n111\nScore: 9\n\n000\n000\n000\nScore: 0\n\n"
        );
    }
}
