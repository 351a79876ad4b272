use crate::animation;
use crate::config::ScrollConfig;
use crate::viewport::{element_position, Point, ScrollError, Viewport};

use log::{debug, info, trace, warn};

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

/// Source of the delay between animation frames.
pub trait Clock {
    fn sleep(&mut self, d: Duration);
}

/// Sleeps the current thread using a spin-sleeper for accurate frame times.
#[derive(Debug, Default)]
pub struct SpinClock;

impl Clock for SpinClock {
    fn sleep(&mut self, d: Duration) {
        spin_sleep::sleep(d);
    }
}

/// Shared flag used to stop an animation that is in flight.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a call to [`Scroller::ease_scroll_to`] ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollOutcome {
    /// The viewport reached the target exactly.
    Arrived(Point),
    /// The animation was stopped early; holds the last applied position.
    Cancelled(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Done,
}

/// A single eased scroll from one point to another, advanced one frame at a
/// time with [`ScrollAnimation::tick`].
#[derive(Debug, Clone)]
pub struct ScrollAnimation {
    power: f64,
    start: Point,
    target: Point,
    duration: f64,
    elapsed: f64,
    frame_ms: f64,
    state: State,
}

impl ScrollAnimation {
    /// Captures the current scroll offset and the position of `id` and
    /// returns an animation ready for its first tick.
    ///
    /// The first tick is one frame into the animation, so `elapsed` starts
    /// at the frame time rather than zero.
    pub fn start<V: Viewport + ?Sized>(
        viewport: &V,
        id: &str,
        duration: Duration,
        power: f64,
        frame_time: Duration,
    ) -> Result<Self, ScrollError> {
        if !power.is_finite() || power <= 0. {
            return Err(ScrollError::InvalidPower(power));
        }
        if frame_time.is_zero() {
            return Err(ScrollError::InvalidFrameTime);
        }

        let start = viewport.scroll_offset();
        let target = element_position(viewport, id)?;
        let frame_ms = as_millis_f64(frame_time);

        Ok(Self {
            power,
            start,
            target,
            duration: as_millis_f64(duration),
            elapsed: frame_ms,
            frame_ms,
            state: State::Running,
        })
    }

    /// Applies one frame to `viewport` and returns the state afterwards.
    ///
    /// Once the duration has elapsed the viewport is placed exactly on the
    /// target and the animation is done; further ticks do nothing.
    pub fn tick<V: Viewport + ?Sized>(&mut self, viewport: &mut V) -> State {
        if self.state == State::Done {
            return State::Done;
        }

        if self.elapsed >= self.duration {
            viewport.scroll_to(self.target);
            self.state = State::Done;
            return State::Done;
        }

        let p = self.position_at(self.elapsed);
        trace!("frame at {:.0}ms: {p}", self.elapsed);
        viewport.scroll_to(p);
        self.elapsed += self.frame_ms;

        State::Running
    }

    /// Eased position at `elapsed` milliseconds, each axis mapped on its own.
    pub fn position_at(&self, elapsed: f64) -> Point {
        let x = animation::ease_in_out(
            self.power,
            self.start.x,
            self.target.x,
            self.duration,
            elapsed,
        );
        let y = animation::ease_in_out(
            self.power,
            self.start.y,
            self.target.y,
            self.duration,
            elapsed,
        );
        Point::new(x, y)
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed / 1000.)
    }

    #[inline]
    pub fn start_point(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn target(&self) -> Point {
        self.target
    }
}

fn as_millis_f64(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.
}

/// Runs scroll animations against a [`Viewport`].
pub struct Scroller<C: Clock = SpinClock> {
    clock: C,
    frame_time: Duration,
    cancel: Option<CancelToken>,
}

impl Scroller<SpinClock> {
    pub fn new() -> Self {
        Self::with_config(&ScrollConfig::default())
    }

    pub fn with_config(config: &ScrollConfig) -> Self {
        Self {
            clock: SpinClock,
            frame_time: config.frame_time,
            cancel: None,
        }
    }
}

impl Default for Scroller<SpinClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Scroller<C> {
    pub fn with_clock<T: Clock>(self, clock: T) -> Scroller<T> {
        Scroller {
            clock,
            frame_time: self.frame_time,
            cancel: self.cancel,
        }
    }

    pub fn with_frame_time(mut self, frame_time: Duration) -> Self {
        self.frame_time = frame_time;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[inline]
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Scrolls `id` into view immediately.
    ///
    /// Does nothing and returns `false` if the element doesn't exist or the
    /// viewport can't scroll elements into view.
    pub fn jump_to<V: Viewport + ?Sized>(&self, viewport: &mut V, id: &str) -> bool {
        let moved = viewport.scroll_into_view(id);
        if moved {
            info!("jumped to '{id}' at {}", viewport.scroll_offset());
        } else {
            warn!("could not jump to '{id}'");
        }
        moved
    }

    /// Animates the viewport to the position of `id` over `duration`.
    ///
    /// Returns once the animation finishes, or early if the attached
    /// [`CancelToken`] is cancelled between frames.
    pub fn ease_scroll_to<V: Viewport + ?Sized>(
        &mut self,
        viewport: &mut V,
        id: &str,
        duration: Duration,
        power: f64,
    ) -> Result<ScrollOutcome, ScrollError> {
        let mut anim = ScrollAnimation::start(&*viewport, id, duration, power, self.frame_time)?;
        info!(
            "scrolling from ({}) to '{id}' ({}) over {}ms, power {power}",
            anim.start_point(),
            anim.target(),
            duration.as_millis()
        );

        while anim.tick(viewport) == State::Running {
            self.clock.sleep(self.frame_time);
            if self.is_cancelled() {
                let p = viewport.scroll_offset();
                info!("scroll to '{id}' cancelled at {p}");
                return Ok(ScrollOutcome::Cancelled(p));
            }
        }

        debug!("scroll to '{id}' finished after {:?}", anim.elapsed());
        Ok(ScrollOutcome::Arrived(anim.target()))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, CancelToken::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Element, Page};

    /// Records requested sleeps instead of sleeping.
    #[derive(Default)]
    struct TestClock {
        sleeps: Vec<Duration>,
        cancel_after: Option<(usize, CancelToken)>,
    }

    impl Clock for TestClock {
        fn sleep(&mut self, d: Duration) {
            self.sleeps.push(d);
            if let Some((n, token)) = &self.cancel_after {
                if self.sleeps.len() >= *n {
                    token.cancel();
                }
            }
        }
    }

    fn page() -> Page {
        Page::new(vec![
            Element::at("target", 100., 200.),
            Element::at("top", 0., 0.),
        ])
    }

    fn scroller() -> Scroller<TestClock> {
        Scroller::new()
            .with_frame_time(Duration::from_millis(30))
            .with_clock(TestClock::default())
    }

    #[test]
    fn test_ease_scroll_end_to_end() {
        let mut page = page();
        let mut s = scroller();

        let outcome = s
            .ease_scroll_to(&mut page, "target", Duration::from_millis(300), 2.)
            .unwrap();
        assert_eq!(outcome, ScrollOutcome::Arrived(Point::new(100., 200.)));
        assert_eq!(page.scroll_offset(), Point::new(100., 200.));

        // frames at 30, 60, ..., 270ms, then the final snap at 300ms
        let frames = page.frames();
        assert_eq!(frames.len(), 10);
        assert_eq!(*frames.last().unwrap(), Point::new(100., 200.));

        let mut last = Point::default();
        for p in &frames[..frames.len() - 1] {
            assert!(p.x > last.x && p.y > last.y, "{p} after {last}");
            assert!((0. ..=100.).contains(&p.x));
            assert!((0. ..=200.).contains(&p.y));
            last = *p;
        }

        assert_eq!(s.clock.sleeps.len(), 9);
        assert!(s.clock.sleeps.iter().all(|d| *d == Duration::from_millis(30)));
    }

    #[test]
    fn test_first_frame_is_one_tick_in() {
        let mut page = page();
        let mut s = scroller();
        s.ease_scroll_to(&mut page, "target", Duration::from_millis(300), 1.)
            .unwrap();

        let first = page.frames()[0];
        assert!((first.x - 10.).abs() < 1e-9);
        assert!((first.y - 20.).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut page = page().with_scroll(Point::new(5., 5.));
        let mut s = scroller();

        let outcome = s
            .ease_scroll_to(&mut page, "target", Duration::ZERO, 2.)
            .unwrap();
        assert_eq!(outcome, ScrollOutcome::Arrived(Point::new(100., 200.)));
        assert_eq!(page.frames(), &[Point::new(100., 200.)]);
        assert!(s.clock.sleeps.is_empty());
    }

    #[test]
    fn test_axes_move_independently() {
        let mut page = Page::new(vec![Element::at("low-left", 0., 600.)])
            .with_scroll(Point::new(300., 0.));
        let mut s = scroller();

        s.ease_scroll_to(&mut page, "low-left", Duration::from_millis(300), 2.)
            .unwrap();
        assert_eq!(page.scroll_offset(), Point::new(0., 600.));

        let frames = page.frames();
        assert_eq!(frames.len(), 10);
        for w in frames.windows(2) {
            assert!(w[1].x < w[0].x, "x went from {} to {}", w[0], w[1]);
            assert!(w[1].y > w[0].y, "y went from {} to {}", w[0], w[1]);
        }
        for p in frames {
            assert!((0. ..=300.).contains(&p.x));
            assert!((0. ..=600.).contains(&p.y));
            // both axes share the same eased progress
            assert!(((300. - p.x) / 300. - p.y / 600.).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scroll_upwards() {
        let mut page = page().with_scroll(Point::new(100., 900.));
        let mut s = scroller();

        s.ease_scroll_to(&mut page, "top", Duration::from_millis(120), 3.)
            .unwrap();
        assert_eq!(page.scroll_offset(), Point::new(0., 0.));
        let ys = page.frames().iter().map(|p| p.y).collect::<Vec<f64>>();
        assert!(ys.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_missing_target() {
        let mut page = page();
        let mut s = scroller();

        let result = s.ease_scroll_to(&mut page, "missing", Duration::from_millis(300), 2.);
        assert_eq!(result, Err(ScrollError::TargetNotFound("missing".into())));
        assert!(page.frames().is_empty());
    }

    #[test]
    fn test_invalid_power() {
        let mut page = page();
        let mut s = scroller();

        for power in [0., -1., f64::NAN, f64::INFINITY] {
            let result = s.ease_scroll_to(&mut page, "target", Duration::from_millis(300), power);
            assert!(matches!(result, Err(ScrollError::InvalidPower(_))));
        }
        assert!(page.frames().is_empty());
    }

    #[test]
    fn test_zero_frame_time() {
        let page = page();
        let result = ScrollAnimation::start(
            &page,
            "target",
            Duration::from_millis(300),
            2.,
            Duration::ZERO,
        );
        assert!(matches!(result, Err(ScrollError::InvalidFrameTime)));
    }

    #[test]
    fn test_cancel_stops_early() {
        let mut page = page();
        let token = CancelToken::new();
        let clock = TestClock {
            sleeps: Vec::new(),
            cancel_after: Some((3, token.clone())),
        };
        let mut s = Scroller::new()
            .with_frame_time(Duration::from_millis(30))
            .with_cancel(token.clone())
            .with_clock(clock);

        let outcome = s
            .ease_scroll_to(&mut page, "target", Duration::from_millis(300), 2.)
            .unwrap();
        assert!(token.is_cancelled());
        assert_eq!(page.frames().len(), 3);
        assert_eq!(outcome, ScrollOutcome::Cancelled(page.frames()[2]));
        assert_ne!(page.scroll_offset(), Point::new(100., 200.));
    }

    #[test]
    fn test_tick_after_done_is_noop() {
        let mut page = page();
        let mut anim = ScrollAnimation::start(
            &page,
            "target",
            Duration::from_millis(60),
            2.,
            Duration::from_millis(30),
        )
        .unwrap();

        assert_eq!(anim.tick(&mut page), State::Running);
        assert_eq!(anim.tick(&mut page), State::Done);
        assert!(anim.is_done());
        assert_eq!(anim.tick(&mut page), State::Done);
        assert_eq!(page.frames().len(), 2);
    }

    #[test]
    fn test_jump_to() {
        let mut page = page();
        let s = scroller();

        assert!(!s.jump_to(&mut page, "missing"));
        assert!(page.frames().is_empty());
        assert_eq!(page.scroll_offset(), Point::default());

        assert!(s.jump_to(&mut page, "target"));
        assert_eq!(page.scroll_offset(), Point::new(100., 200.));

        let mut page = page.with_scroll_into_view(false);
        assert!(!s.jump_to(&mut page, "top"));
        assert_eq!(page.scroll_offset(), Point::new(100., 200.));
    }
}
