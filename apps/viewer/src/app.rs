use std::thread;
use std::time::{Duration, Instant};

use abmviz_client::{ConnectionError, ConnectionState, RenderFeed};
use abmviz_core::{Colour, RenderState, ViewerConfig};
use abmviz_renderer::{Canvas, FrameClock, RenderFrame, RenderStyle};

use crate::error::ViewerError;
use crate::window::FrameSink;

/// Upper bound on how long the loop sleeps before polling the feed again.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The render loop and the state it owns.
///
/// Runs on one thread: feed pumps and render ticks alternate, so a tick
/// always sees a whole `render` payload.
pub struct Viewer<F: RenderFeed, S: FrameSink> {
    state: RenderState,
    feed: F,
    sink: S,
    canvas: Canvas,
    style: RenderStyle,
    clock: FrameClock,
    last_feed_state: ConnectionState,
}

impl<F: RenderFeed, S: FrameSink> Viewer<F, S> {
    pub fn new(config: &ViewerConfig, feed: F, sink: S, start: Instant) -> Self {
        let last_feed_state = feed.connection_state();
        Self {
            state: RenderState::new(config.initial_background),
            feed,
            sink,
            canvas: Canvas::new(config.canvas_width, config.canvas_height, Colour::SETUP),
            style: RenderStyle::from_config(config),
            clock: FrameClock::new(config.frame_rate, start),
            last_feed_state,
        }
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    #[cfg(test)]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Show the blank setup surface before the first tick.
    pub fn start(&mut self) -> Result<(), ViewerError> {
        self.sink.present(&self.canvas)
    }

    /// One loop iteration: drain the feed, then draw if a tick is due.
    /// Returns whether a frame was presented.
    pub fn step(&mut self, now: Instant) -> Result<bool, ViewerError> {
        self.feed.pump(&mut self.state);
        self.note_feed_state();

        if !self.clock.poll(now) {
            self.sink.idle()?;
            return Ok(false);
        }

        let frame = RenderFrame::from_state(&self.state, &self.style);
        self.canvas.render(&frame);
        self.sink.present(&self.canvas)?;
        log::trace!(
            "Frame {}: {} circles",
            self.clock.frames(),
            frame.circle_count()
        );
        Ok(true)
    }

    pub fn run(&mut self) -> Result<(), ViewerError> {
        self.start()?;
        while self.sink.is_open() {
            self.step(Instant::now())?;
            let wait = self.clock.until_next(Instant::now()).min(POLL_INTERVAL);
            if !wait.is_zero() {
                thread::sleep(wait);
            }
        }
        log::info!(
            "Viewport closed after {} frames, {} render payloads",
            self.clock.frames(),
            self.state().revision()
        );
        Ok(())
    }

    fn note_feed_state(&mut self) {
        let current = self.feed.connection_state();
        if current == self.last_feed_state {
            return;
        }
        if current.is_terminal() {
            log::warn!(
                "Connection is {:?}; showing the last received frame",
                current
            );
        }
        self.last_feed_state = current;
    }
}

/// Keep the process alive after the first handshake failed.
///
/// Nothing is drawn and no reconnect is attempted. `park` blocks for a while
/// and returns whether to keep waiting.
pub fn stay_offline(err: &ConnectionError, mut park: impl FnMut() -> bool) {
    log::error!("{}", err);
    log::warn!("No connection; staying up without a viewport");
    while park() {}
}
