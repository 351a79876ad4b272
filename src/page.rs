use crate::viewport::{Point, Rect, Viewport};

use anyhow::{Context, Result};
use serde::Deserialize;

use std::{fs, path::Path};

/// An element placed at a fixed position in document coordinates.
///
/// `width` and `height` are page metadata reported through
/// [`Viewport::bounding_rect`]; scrolling only uses `x` and `y`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Element {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Element {
    pub fn at(id: &str, x: f64, y: f64) -> Self {
        Self {
            id: id.to_owned(),
            x,
            y,
            width: 0.,
            height: 0.,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
struct PointDef {
    x: f64,
    y: f64,
}

impl From<PointDef> for Point {
    fn from(value: PointDef) -> Self {
        Point::new(value.x, value.y)
    }
}

/// Layout of a page as read from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct PageFile {
    #[serde(default)]
    start: Option<PointDef>,
    #[serde(default)]
    client_offset: Option<PointDef>,
    #[serde(default)]
    supports_scroll_into_view: Option<bool>,
    #[serde(default, rename = "element")]
    elements: Vec<Element>,
}

impl PageFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read page file '{}'", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid page file '{}'", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn start(&self) -> Option<Point> {
        self.start.map(Point::from)
    }

    pub fn client_offset(&self) -> Option<Point> {
        self.client_offset.map(Point::from)
    }

    pub fn supports_scroll_into_view(&self) -> Option<bool> {
        self.supports_scroll_into_view
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

/// An in-memory document with a scrollable viewport.
///
/// Every call to [`Viewport::scroll_to`] is recorded, which makes it easy to
/// inspect the frames an animation produced.
#[derive(Debug, Clone)]
pub struct Page {
    elements: Vec<Element>,
    scroll: Point,
    client_offset: Point,
    scroll_into_view: bool,
    frames: Vec<Point>,
}

impl Page {
    pub fn new(elements: Vec<Element>) -> Self {
        let mut page = Self {
            elements: Vec::with_capacity(elements.len()),
            scroll: Point::default(),
            client_offset: Point::default(),
            scroll_into_view: true,
            frames: Vec::new(),
        };
        for e in elements {
            page.insert(e);
        }
        page
    }

    pub fn with_scroll(mut self, p: Point) -> Self {
        self.scroll = p;
        self
    }

    pub fn with_client_offset(mut self, p: Point) -> Self {
        self.client_offset = p;
        self
    }

    pub fn with_scroll_into_view(mut self, value: bool) -> Self {
        self.scroll_into_view = value;
        self
    }

    /// Adds an element, replacing any existing element with the same id.
    pub fn insert(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Every position the page has been scrolled to, in order.
    pub fn frames(&self) -> &[Point] {
        &self.frames
    }
}

impl Viewport for Page {
    fn scroll_offset(&self) -> Point {
        self.scroll
    }

    fn scroll_to(&mut self, p: Point) {
        self.scroll = p;
        self.frames.push(p);
    }

    fn bounding_rect(&self, id: &str) -> Option<Rect> {
        self.element(id).map(|e| Rect {
            left: e.x - self.scroll.x + self.client_offset.x,
            top: e.y - self.scroll.y + self.client_offset.y,
            width: e.width,
            height: e.height,
        })
    }

    fn client_offset(&self) -> Point {
        self.client_offset
    }

    fn scroll_into_view(&mut self, id: &str) -> bool {
        if !self.scroll_into_view {
            return false;
        }
        match self.element(id) {
            Some(e) => {
                let p = Point::new(e.x, e.y);
                self.scroll_to(p);
                true
            }
            None => false,
        }
    }
}
