use smoothscroll::scroll::CancelToken;

use anyhow::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use log::debug;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const POLL_TIME: Duration = Duration::from_millis(25);

#[derive(Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Cancel,
    None,
    Unknown,
}

impl KeyCommand {
    pub fn read(timeout: Duration) -> Result<Self> {
        if poll(timeout)? {
            return Ok(read()?.into());
        }
        Ok(Self::None)
    }
}

impl From<Event> for KeyCommand {
    fn from(value: Event) -> Self {
        match value {
            Event::Key(KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE,
                ..
            }) => Self::Cancel,
            Event::Key(KeyEvent {
                code: KeyCode::Esc, ..
            }) => Self::Cancel,
            Event::Key(KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }) => Self::Cancel,
            Event::Key(_) => Self::Unknown,
            _ => Self::None,
        }
    }
}

/// Background thread that cancels `token` when a quit key is pressed.
pub struct CancelWatcher {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl CancelWatcher {
    pub fn spawn(token: CancelToken) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::SeqCst) && !token.is_cancelled() {
                match KeyCommand::read(POLL_TIME) {
                    Ok(KeyCommand::Cancel) => {
                        debug!("cancel requested from keyboard");
                        token.cancel();
                    }
                    Ok(_) => (),
                    Err(e) => {
                        debug!("stopped watching keyboard: {e}");
                        break;
                    }
                }
            }
        });

        Self { stop, handle }
    }

    pub fn stop(self) {
        self.stop.store(true, Ordering::SeqCst);
        join(self.handle);
    }
}

/// Waits for `handle`, returning `false` if the thread panicked.
fn join(handle: JoinHandle<()>) -> bool {
    match handle.join() {
        Ok(()) => true,
        Err(_) => {
            debug!("keyboard watcher panicked");
            false
        }
    }
}
