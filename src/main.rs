mod cli;
mod input;
mod logger;

use input::CancelWatcher;
use smoothscroll::config::Config;
use smoothscroll::page::Page;
use smoothscroll::scroll::{CancelToken, ScrollOutcome, Scroller};
use smoothscroll::viewport::{Point, Rect, Viewport};

use anyhow::Result;
use crossterm::cursor::MoveToColumn;
use crossterm::execute;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor, Stylize};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};
use log::{debug, error};
use std::io::{stdout, Stdout, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let matches = cli::build().get_matches();
    let config = match cli::config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::setup(config.verbosity) {
        eprintln!("error: failed to set up logging ({e})");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<()> {
    let mut page = Page::new(config.elements.clone())
        .with_scroll(config.start)
        .with_client_offset(config.client_offset)
        .with_scroll_into_view(config.scroll_into_view);
    debug!("page has {} elements", page.len());

    let mut screen = Screen::new(&mut page);
    screen.status(Color::DarkGrey, "starting at", config.start)?;

    if !config.animate {
        let scroller = Scroller::with_config(&config.scroll);
        if scroller.jump_to(&mut screen, &config.target) {
            screen.finish(Color::Green, "jumped to")?;
        } else {
            screen.finish(Color::Yellow, "nothing to jump to, staying at")?;
        }
        return Ok(());
    }

    let token = CancelToken::new();
    let mut scroller = Scroller::with_config(&config.scroll).with_cancel(token.clone());
    debug!("frame time is {:?}", scroller.frame_time());

    enable_raw_mode()?;
    let watcher = CancelWatcher::spawn(token);
    let result = scroller.ease_scroll_to(&mut screen, &config.target, config.duration, config.power);
    watcher.stop();
    disable_raw_mode()?;

    match result? {
        ScrollOutcome::Arrived(_) => screen.finish(Color::Green, "arrived at")?,
        ScrollOutcome::Cancelled(_) => screen.finish(Color::Yellow, "cancelled at")?,
    }

    Ok(())
}

/// Wraps a page and redraws a status line every time it scrolls.
struct Screen<'a> {
    page: &'a mut Page,
    out: Stdout,
}

impl<'a> Screen<'a> {
    fn new(page: &'a mut Page) -> Self {
        Self {
            page,
            out: stdout(),
        }
    }

    fn status(&mut self, color: Color, label: &str, p: Point) -> Result<()> {
        execute!(
            self.out,
            Clear(ClearType::CurrentLine),
            MoveToColumn(0),
            Print("Scroll:".bold()),
            SetForegroundColor(color),
            Print(format!(" {label} ")),
            Print(p),
            ResetColor,
            MoveToColumn(0),
        )?;
        Ok(())
    }

    fn finish(&mut self, color: Color, label: &str) -> Result<()> {
        let p = self.page.scroll_offset();
        self.status(color, label, p)?;
        writeln!(self.out)?;
        Ok(())
    }
}

impl Viewport for Screen<'_> {
    fn scroll_offset(&self) -> Point {
        self.page.scroll_offset()
    }

    fn scroll_to(&mut self, p: Point) {
        self.page.scroll_to(p);
        if let Err(e) = self.status(Color::Cyan, "at", p) {
            debug!("failed to draw status ({e})");
        }
    }

    fn bounding_rect(&self, id: &str) -> Option<Rect> {
        self.page.bounding_rect(id)
    }

    fn client_offset(&self) -> Point {
        self.page.client_offset()
    }

    fn scroll_into_view(&mut self, id: &str) -> bool {
        self.page.scroll_into_view(id)
    }
}
