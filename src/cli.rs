use smoothscroll::config::{Config, ScrollConfig};
use smoothscroll::page::{Element, PageFile};
use smoothscroll::viewport::Point;

use anyhow::{anyhow, ensure, Context, Result};
use clap::builder::ValueParser;
use clap::{arg, command, value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;

const DURATION_LONG_HELP: &str = "Length of the whole scroll animation. If not \
specified, defaults to 600 milliseconds.

A number is parsed as MILLISECONDS. Numbers can be specified as integers \
(e.g., 250) or floating point numbers (e.g., 12.5). Zero is allowed and \
jumps straight to the target.";

const POWER_LONG_HELP: &str = "Steepness of the easing curve. If not specified, \
defaults to 2.

A power of 1 scrolls at a constant speed. Higher powers start and stop more \
gently and move faster in the middle; 2 or 3 is usually enough.";

const FRAME_TIME_LONG_HELP: &str = "Time between animation frames in \
milliseconds. If not specified, defaults to 30.

The animation advances by exactly one frame time per frame, so the number of \
frames drawn is roughly DURATION / FRAME_TIME.";

const ELEMENT_LONG_HELP: &str = "Declare an element on the page at the given \
document position, with an optional size. Can be repeated.

Elements given here are added after any elements from '--page' and replace \
elements with the same id.";

const PAGE_LONG_HELP: &str = "Load the page layout from a TOML file.

The file may set 'start', 'client_offset' and 'supports_scroll_into_view', \
and declares elements with '[[element]]' tables holding 'id', 'x', 'y' and \
optionally 'width' and 'height'.";

pub fn build() -> Command {
    command!()
        .disable_help_flag(true)
        .disable_version_flag(true)
        .after_help("Use '--help' for detailed information")
        .after_long_help("Use '-h' for brief information")
        .arg(arg!(<TARGET> "Id of the element to scroll to"))
        .next_help_heading("Animation Options")
        .arg(
            arg!(-d --duration <MS> "Duration of the scroll in milliseconds (default: 600)")
                .long_help(DURATION_LONG_HELP)
                .default_value("600")
                .hide_default_value(true)
                .value_parser(ValueParser::new(parse_millis))
                .conflicts_with("jump"),
        )
        .arg(
            arg!(-p --power <POWER> "Steepness of the easing curve (default: 2)")
                .long_help(POWER_LONG_HELP)
                .default_value("2")
                .hide_default_value(true)
                .value_parser(ValueParser::new(parse_power))
                .conflicts_with("jump"),
        )
        .arg(
            arg!(-f --"frame-time" <MS> "Time between frames in milliseconds (default: 30)")
                .long_help(FRAME_TIME_LONG_HELP)
                .default_value("30")
                .hide_default_value(true)
                .value_parser(ValueParser::new(parse_frame_time))
                .conflicts_with("jump"),
        )
        .arg(arg!(-j --jump "Jump to the target without animating"))
        .next_help_heading("Page Options")
        .arg(
            Arg::new("element")
                .short('e')
                .long("element")
                .help("Declare an element at a document position")
                .long_help(ELEMENT_LONG_HELP)
                .value_name("ID=X,Y[,W,H]")
                .action(ArgAction::Append)
                .allow_negative_numbers(true)
                .value_parser(ValueParser::new(parse_element)),
        )
        .arg(
            arg!(-s --start <POINT> "Initial scroll offset (default: 0,0)")
                .value_name("X,Y")
                .allow_negative_numbers(true)
                .value_parser(ValueParser::new(parse_point)),
        )
        .arg(
            arg!(-c --"client-offset" <POINT> "Shift of the root element (default: 0,0)")
                .value_name("X,Y")
                .allow_negative_numbers(true)
                .value_parser(ValueParser::new(parse_point)),
        )
        .arg(
            arg!(-P --page <FILE> "Load the page layout from a TOML file")
                .long_help(PAGE_LONG_HELP)
                .value_parser(value_parser!(PathBuf)),
        )
        .next_help_heading("Options")
        .arg(arg!(-v --verbose "Increase log verbosity").action(ArgAction::Count))
        .arg(arg!(-h --help "Print help information and quit").action(ArgAction::Help))
        .arg(arg!(-V --version "Print version information and quit").action(ArgAction::Version))
}

/// Assembles the run configuration from parsed arguments, loading the page
/// file if one was given.
pub fn config(matches: &ArgMatches) -> Result<Config> {
    let page = match matches.get_one::<PathBuf>("page") {
        Some(path) => PageFile::load(path)?,
        None => PageFile::default(),
    };

    let start = matches
        .get_one::<Point>("start")
        .copied()
        .or_else(|| page.start())
        .unwrap_or_default();
    let client_offset = matches
        .get_one::<Point>("client-offset")
        .copied()
        .or_else(|| page.client_offset())
        .unwrap_or_default();
    let scroll_into_view = page.supports_scroll_into_view().unwrap_or(true);

    let mut elements = page.into_elements();
    if let Some(extra) = matches.get_many::<Element>("element") {
        elements.extend(extra.cloned());
    }

    Ok(Config {
        target: matches
            .get_one::<String>("TARGET")
            .context("target should be required by clap")?
            .to_owned(),
        duration: matches
            .get_one::<Duration>("duration")
            .copied()
            .context("duration should have a default")?,
        power: matches
            .get_one::<f64>("power")
            .copied()
            .context("power should have a default")?,
        scroll: ScrollConfig {
            frame_time: matches
                .get_one::<Duration>("frame-time")
                .copied()
                .context("frame time should have a default")?,
        },
        start,
        client_offset,
        elements,
        scroll_into_view,
        animate: !matches.get_flag("jump"),
        verbosity: matches.get_count("verbose"),
    })
}

pub fn parse_millis(s: &str) -> Result<Duration> {
    if let Ok(value) = s.parse::<u64>() {
        return Ok(Duration::from_millis(value));
    }
    match s.parse::<f64>() {
        Ok(value) => {
            ensure!(
                value.is_finite() && value >= 0.,
                "duration must not be negative"
            );
            Duration::try_from_secs_f64(value / 1000.).map_err(|e| anyhow!(e))
        }
        Err(e) => Err(anyhow!(e)),
    }
}

fn parse_frame_time(s: &str) -> Result<Duration> {
    let d = parse_millis(s)?;
    ensure!(!d.is_zero(), "frame time must be greater than zero");
    Ok(d)
}

fn parse_power(s: &str) -> Result<f64> {
    match s.parse::<f64>() {
        Ok(value) => {
            ensure!(
                value.is_finite() && value > 0.,
                "power must be a positive number"
            );
            Ok(value)
        }
        Err(e) => Err(anyhow!(e)),
    }
}

fn parse_coords(s: &str) -> Result<Vec<f64>> {
    s.split(',')
        .map(|v| {
            let value = v
                .trim()
                .parse::<f64>()
                .map_err(|e| anyhow!("invalid coordinate '{v}': {e}"))?;
            ensure!(value.is_finite(), "coordinates must be finite numbers");
            Ok(value)
        })
        .collect()
}

pub fn parse_point(s: &str) -> Result<Point> {
    let coords = parse_coords(s)?;
    match coords[..] {
        [x, y] => Ok(Point::new(x, y)),
        _ => Err(anyhow!("expected a point formatted as X,Y")),
    }
}

pub fn parse_element(s: &str) -> Result<Element> {
    let (id, coords) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected an element formatted as ID=X,Y[,W,H]"))?;
    let id = id.trim();
    ensure!(!id.is_empty(), "element id must not be empty");

    let coords = parse_coords(coords)?;
    let element = match coords[..] {
        [x, y] => Element::at(id, x, y),
        [x, y, w, h] => {
            ensure!(w >= 0. && h >= 0., "element size must not be negative");
            Element {
                width: w,
                height: h,
                ..Element::at(id, x, y)
            }
        }
        _ => return Err(anyhow!("expected an element formatted as ID=X,Y[,W,H]")),
    };

    Ok(element)
}
