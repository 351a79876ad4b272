use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScrollError {
    #[error("no element with id '{0}'")]
    TargetNotFound(String),
    #[error("easing power must be a positive number (got {0})")]
    InvalidPower(f64),
    #[error("frame time must be greater than zero")]
    InvalidFrameTime,
}

/// A position in document pixels.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}, {:.1}", self.x, self.y)
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of an element, relative to the top-left of the viewport.
///
/// Only `left` and `top` take part in scrolling; the size is carried along
/// for viewports that want to report it.
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The environment a scroll animation runs against.
///
/// Everything the driver needs from the outside world goes through here, so
/// a browser window, a toolkit scroll area or a test double can all be
/// scrolled the same way.
pub trait Viewport {
    /// Current scroll offset. `(0, 0)` means the document is scrolled to
    /// its top-left corner.
    fn scroll_offset(&self) -> Point;

    fn scroll_to(&mut self, p: Point);

    /// Bounding box of the element with `id`, relative to the viewport, or
    /// `None` if no such element exists.
    fn bounding_rect(&self, id: &str) -> Option<Rect>;

    /// Shift of the root element relative to the viewport's origin.
    fn client_offset(&self) -> Point {
        Point::default()
    }

    /// Scrolls `id` into view without animating. Returns `false` if the
    /// element does not exist or the environment can't do this.
    fn scroll_into_view(&mut self, id: &str) -> bool;
}

/// Absolute document position of the top-left corner of `id`.
pub fn element_position<V: Viewport + ?Sized>(viewport: &V, id: &str) -> Result<Point, ScrollError> {
    let rect = viewport
        .bounding_rect(id)
        .ok_or_else(|| ScrollError::TargetNotFound(id.to_owned()))?;
    let scroll = viewport.scroll_offset();
    let shift = viewport.client_offset();

    Ok(Point::new(
        rect.left + scroll.x - shift.x,
        rect.top + scroll.y - shift.y,
    ))
}
