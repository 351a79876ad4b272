use crate::page::Element;
use crate::viewport::Point;

use std::time::Duration;

pub const DEFAULT_FRAME_TIME: Duration = Duration::from_millis(30);

#[derive(Debug, Clone)]
pub struct ScrollConfig {
    pub frame_time: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            frame_time: DEFAULT_FRAME_TIME,
        }
    }
}

pub struct Config {
    pub target: String,
    pub duration: Duration,
    pub power: f64,
    pub scroll: ScrollConfig,
    pub start: Point,
    pub client_offset: Point,
    pub elements: Vec<Element>,
    pub scroll_into_view: bool,
    pub animate: bool,
    pub verbosity: u8,
}
