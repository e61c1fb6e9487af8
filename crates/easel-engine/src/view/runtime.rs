use anyhow::{bail, Context, Result};

use crate::paint::Color;
use crate::platform::{Platform, ViewEvent, WindowSpec, WinitPlatform};
use crate::scene::DrawList;
use crate::time::{FrameClock, Pacer};

use super::{demo_shapes, ConfigError, ViewConfig, ViewState};

/// A window that repaints the fixed shape set at a capped frame rate until closed.
///
/// Lifecycle: construct (window open, `Stopped`), `start()` (`Running`, blocks in
/// the loop), close request or `stop()` (`Stopped`, window released).
pub struct View<P: Platform = WinitPlatform, C: Pacer = FrameClock> {
    width: u32,
    height: u32,
    title: String,
    target_fps: u32,
    background: Color,

    state: ViewState,
    shapes: DrawList,

    platform: Option<P>,
    clock: C,

    events: Vec<ViewEvent>,
    // Set while an iteration runs; `stop()` defers teardown until it ends.
    in_frame: bool,

    /// Sees the state right before each event poll.
    #[cfg(test)]
    poll_hook: Option<Box<dyn FnMut(ViewState)>>,
}

impl View {
    /// Opens a window on the host's display.
    ///
    /// The configuration is validated before the windowing system is touched;
    /// a rejected config surfaces as a [`ConfigError`] inside the returned error.
    pub fn open(config: ViewConfig) -> Result<Self> {
        config.validate()?;

        let spec = WindowSpec {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        };
        let platform = WinitPlatform::open(spec, config.gpu.clone())
            .with_context(|| format!("failed to open view \"{}\"", config.title))?;

        Ok(Self::from_parts(config, platform, FrameClock::new()))
    }
}

impl<P: Platform, C: Pacer> View<P, C> {
    /// Builds a view on an already opened platform.
    pub fn with_platform(config: ViewConfig, platform: P, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, platform, clock))
    }

    fn from_parts(config: ViewConfig, platform: P, clock: C) -> Self {
        Self {
            width: config.width,
            height: config.height,
            title: config.title,
            target_fps: config.target_fps,
            background: config.background,
            state: ViewState::Stopped,
            shapes: demo_shapes(),
            platform: Some(platform),
            clock,
            events: Vec::new(),
            in_frame: false,
            #[cfg(test)]
            poll_hook: None,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn state(&self) -> ViewState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// `true` until the window has been released.
    #[inline]
    pub fn has_window(&self) -> bool {
        self.platform.is_some()
    }

    /// Draw commands replayed every frame.
    #[inline]
    pub fn shapes(&self) -> &DrawList {
        &self.shapes
    }

    /// Enters `Running` and runs the loop until the window is closed or `stop()` is called.
    ///
    /// Fails if the window was already released by an earlier stop.
    pub fn start(&mut self) -> Result<()> {
        if self.platform.is_none() {
            bail!("view \"{}\" was stopped and its window released", self.title);
        }

        if self.state.start() {
            log::info!("view \"{}\" running at {} fps", self.title, self.target_fps);
        }

        self.run()
    }

    /// Runs frames while the view is `Running`; returns at once otherwise.
    ///
    /// A presentation error stops the view, releases the window and is returned.
    pub fn run(&mut self) -> Result<()> {
        while self.state.is_running() {
            self.step()?;
        }
        Ok(())
    }

    /// Leaves `Running` and releases the window.
    ///
    /// Inside a loop iteration the release happens once the iteration finishes.
    /// Calling it on a stopped view does nothing.
    pub fn stop(&mut self) {
        if !self.state.stop() {
            return;
        }
        log::info!("view \"{}\" stopping", self.title);

        if !self.in_frame {
            self.teardown();
        }
    }

    /// Records the fixed shape set onto the current frame, without filling or presenting.
    pub fn draw_shapes(&mut self) {
        let Some(platform) = self.platform.as_mut() else { return };
        for cmd in self.shapes.iter() {
            platform.draw(cmd);
        }
    }

    fn step(&mut self) -> Result<()> {
        self.in_frame = true;
        let result = self.frame();
        self.in_frame = false;

        if let Err(err) = &result {
            log::error!("view \"{}\" frame failed: {err:#}", self.title);
            self.state.stop();
        }
        if !self.state.is_running() {
            self.teardown();
        }

        result
    }

    fn frame(&mut self) -> Result<()> {
        #[cfg(test)]
        if let Some(hook) = self.poll_hook.as_mut() {
            hook(self.state);
        }

        let mut events = std::mem::take(&mut self.events);
        match self.platform.as_mut() {
            Some(platform) => platform.poll_events(&mut events),
            None => bail!("view \"{}\" has no window", self.title),
        }

        for event in events.drain(..) {
            match event {
                ViewEvent::CloseRequested => {
                    log::debug!("close requested");
                    self.stop();
                }
                other => log::debug!("window event: {other:?}"),
            }
        }
        self.events = events;

        if let Some(platform) = self.platform.as_mut() {
            platform.fill(self.background);
        }
        self.draw_shapes();
        if let Some(platform) = self.platform.as_mut() {
            platform.present().context("failed to present frame")?;
        }

        let ft = self.clock.tick(self.target_fps);
        log::trace!("frame {} dt={:.4}s", ft.frame_index, ft.dt);

        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(mut platform) = self.platform.take() {
            platform.shutdown();
            log::debug!("view \"{}\" released its window", self.title);
        }
    }
}

impl<P: Platform, C: Pacer> Drop for View<P, C> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::scene::DrawCmd;
    use crate::time::FrameTime;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Fill(Color),
        Draw(DrawCmd),
        Present,
        Shutdown,
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    /// Records every call; each poll hands out the next scripted batch of events.
    struct RecordingPlatform {
        log: Log,
        script: VecDeque<Vec<ViewEvent>>,
        fail_present: bool,
    }

    impl RecordingPlatform {
        fn new(script: Vec<Vec<ViewEvent>>) -> (Self, Log) {
            let log = Log::default();
            let platform = Self {
                log: log.clone(),
                script: script.into(),
                fail_present: false,
            };
            (platform, log)
        }

        /// Closes on the `n`th poll (1-based).
        fn close_after(n: usize) -> (Self, Log) {
            let mut script = vec![Vec::new(); n - 1];
            script.push(vec![ViewEvent::CloseRequested]);
            Self::new(script)
        }
    }

    impl Platform for RecordingPlatform {
        fn poll_events(&mut self, out: &mut Vec<ViewEvent>) {
            if let Some(batch) = self.script.pop_front() {
                out.extend(batch);
            }
        }

        fn fill(&mut self, color: Color) {
            self.log.borrow_mut().push(Call::Fill(color));
        }

        fn draw(&mut self, cmd: &DrawCmd) {
            self.log.borrow_mut().push(Call::Draw(cmd.clone()));
        }

        fn present(&mut self) -> Result<()> {
            self.log.borrow_mut().push(Call::Present);
            if self.fail_present {
                bail!("surface lost");
            }
            Ok(())
        }

        fn shutdown(&mut self) {
            self.log.borrow_mut().push(Call::Shutdown);
        }
    }

    /// Pacer that never sleeps and counts ticks.
    #[derive(Default)]
    struct ManualPacer {
        ticks: Rc<RefCell<Vec<u32>>>,
    }

    impl Pacer for ManualPacer {
        fn tick(&mut self, target_hz: u32) -> FrameTime {
            let mut ticks = self.ticks.borrow_mut();
            ticks.push(target_hz);
            FrameTime {
                dt: 0.0,
                now: Instant::now(),
                frame_index: ticks.len() as u64 - 1,
            }
        }
    }

    fn view(platform: RecordingPlatform) -> View<RecordingPlatform, ManualPacer> {
        View::with_platform(ViewConfig::default(), platform, ManualPacer::default()).unwrap()
    }

    fn count(log: &Log, call: &Call) -> usize {
        log.borrow().iter().filter(|c| *c == call).count()
    }

    fn one_frame() -> Vec<Call> {
        let mut calls = vec![Call::Fill(Color::white())];
        calls.extend(demo_shapes().iter().cloned().map(Call::Draw));
        calls.push(Call::Present);
        calls
    }

    #[test]
    fn new_view_is_stopped_with_a_window() {
        let (platform, log) = RecordingPlatform::new(Vec::new());
        let v = view(platform);

        assert!(!v.is_running());
        assert_eq!(v.state(), ViewState::Stopped);
        assert!(v.has_window());
        assert_eq!((v.width(), v.height()), (800, 600));
        assert_eq!(v.title(), "Pygame Window");
        assert_eq!(v.shapes().len(), 4);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn invalid_size_is_rejected_before_platform_use() {
        let (platform, log) = RecordingPlatform::new(Vec::new());
        let err = View::with_platform(
            ViewConfig::default().size(0, 600),
            platform,
            ManualPacer::default(),
        )
        .err();

        assert_eq!(err, Some(ConfigError::ZeroSize { width: 0, height: 600 }));
        // Rejected platform is dropped without a shutdown call.
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn open_rejects_invalid_size_with_typed_error() {
        let err = match View::open(ViewConfig::default().size(800, 0)) {
            Ok(_) => panic!("zero height must be rejected"),
            Err(err) => err,
        };
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::ZeroSize { width: 800, height: 0 })
        );

        let err = match View::open(ViewConfig::default().size(10_000, 600)) {
            Ok(_) => panic!("oversized width must be rejected"),
            Err(err) => err,
        };
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::TooLarge { width: 10_000, .. })
        ));
    }

    #[test]
    fn run_on_a_stopped_view_draws_nothing() {
        let (platform, log) = RecordingPlatform::close_after(1);
        let mut v = view(platform);

        v.run().unwrap();

        assert!(log.borrow().is_empty());
        assert!(v.has_window());
        assert!(v.clock.ticks.borrow().is_empty());
    }

    #[test]
    fn start_is_running_before_the_first_poll() {
        let (platform, _log) = RecordingPlatform::close_after(2);
        let mut v = view(platform);

        let seen = Rc::new(RefCell::new(Vec::<ViewState>::new()));
        let sink = seen.clone();
        v.poll_hook = Some(Box::new(move |state: ViewState| sink.borrow_mut().push(state)));

        v.run().unwrap();
        assert!(seen.borrow().is_empty());

        v.start().unwrap();
        assert_eq!(*seen.borrow(), [ViewState::Running, ViewState::Running]);
        assert_eq!(v.state(), ViewState::Stopped);
    }

    #[test]
    fn close_on_first_poll_draws_one_frame_then_releases() {
        let (platform, log) = RecordingPlatform::close_after(1);
        let mut v = view(platform);

        v.start().unwrap();

        let mut expected = one_frame();
        expected.push(Call::Shutdown);
        assert_eq!(*log.borrow(), expected);

        assert!(!v.is_running());
        assert!(!v.has_window());
        assert_eq!(*v.clock.ticks.borrow(), [60]);
    }

    #[test]
    fn every_frame_fills_white_then_draws_the_four_shapes() {
        let (platform, log) = RecordingPlatform::close_after(3);
        let mut v = view(platform);

        v.start().unwrap();

        let mut expected = Vec::new();
        for _ in 0..3 {
            expected.extend(one_frame());
        }
        expected.push(Call::Shutdown);
        assert_eq!(*log.borrow(), expected);
        assert_eq!(v.clock.ticks.borrow().len(), 3);
    }

    #[test]
    fn non_close_events_keep_the_loop_running() {
        let (platform, log) = RecordingPlatform::new(vec![
            vec![ViewEvent::Focused(true)],
            vec![ViewEvent::Resized { width: 800, height: 600 }, ViewEvent::Focused(false)],
            vec![ViewEvent::CloseRequested],
        ]);
        let mut v = view(platform);

        v.start().unwrap();

        assert_eq!(count(&log, &Call::Present), 3);
        assert_eq!(count(&log, &Call::Shutdown), 1);
    }

    #[test]
    fn duplicate_close_events_tear_down_once() {
        let (platform, log) =
            RecordingPlatform::new(vec![vec![ViewEvent::CloseRequested, ViewEvent::CloseRequested]]);
        let mut v = view(platform);

        v.start().unwrap();

        assert_eq!(count(&log, &Call::Present), 1);
        assert_eq!(count(&log, &Call::Shutdown), 1);
    }

    #[test]
    fn stop_twice_releases_once() {
        let (platform, log) = RecordingPlatform::close_after(1);
        let mut v = view(platform);
        v.start().unwrap();

        v.stop();
        v.stop();
        drop(v);

        assert_eq!(count(&log, &Call::Shutdown), 1);
    }

    #[test]
    fn stop_on_a_never_started_view_is_a_no_op() {
        let (platform, log) = RecordingPlatform::new(Vec::new());
        let mut v = view(platform);

        v.stop();

        assert!(v.has_window());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn start_after_release_fails() {
        let (platform, _log) = RecordingPlatform::close_after(1);
        let mut v = view(platform);
        v.start().unwrap();

        let err = v.start().unwrap_err();
        assert!(err.to_string().contains("released"));
        assert!(!v.is_running());
    }

    #[test]
    fn present_failure_stops_and_releases() {
        let (mut platform, log) = RecordingPlatform::new(Vec::new());
        platform.fail_present = true;
        let mut v = view(platform);

        let err = v.start().unwrap_err();

        assert!(format!("{err:#}").contains("surface lost"));
        assert!(!v.is_running());
        assert!(!v.has_window());
        assert_eq!(count(&log, &Call::Shutdown), 1);
        assert!(v.clock.ticks.borrow().is_empty());
    }

    #[test]
    fn drop_releases_the_window() {
        let (platform, log) = RecordingPlatform::new(Vec::new());
        let v = view(platform);

        drop(v);

        assert_eq!(*log.borrow(), [Call::Shutdown]);
    }

    #[test]
    fn draw_shapes_records_without_fill_or_present() {
        let (platform, log) = RecordingPlatform::new(Vec::new());
        let mut v = view(platform);

        v.draw_shapes();

        let expected: Vec<_> = demo_shapes().iter().cloned().map(Call::Draw).collect();
        assert_eq!(*log.borrow(), expected);
    }

    #[test]
    fn background_comes_from_config() {
        let (platform, log) = RecordingPlatform::close_after(1);
        let config = ViewConfig::default().background(Color::black());
        let mut v = View::with_platform(config, platform, ManualPacer::default()).unwrap();

        v.start().unwrap();

        assert_eq!(log.borrow()[0], Call::Fill(Color::black()));
    }

    #[test]
    fn real_clock_caps_the_frame_rate() {
        const FRAMES: usize = 6;

        let (platform, log) = RecordingPlatform::close_after(FRAMES);
        let mut v = View::with_platform(ViewConfig::default(), platform, FrameClock::new()).unwrap();

        let started = Instant::now();
        v.start().unwrap();
        let elapsed = started.elapsed();

        assert_eq!(count(&log, &Call::Present), FRAMES);
        assert!(elapsed >= Duration::from_secs(FRAMES as u64 - 1) / 60);
    }
}
