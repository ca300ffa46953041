//! Display surfaces: `OpenCV` highgui windows or nothing at all.

use crate::Result;
use log::debug;
use opencv::{
    core::Mat,
    highgui::{self, WINDOW_AUTOSIZE},
};

/// Named image windows plus keyboard polling
pub trait DisplaySurface {
    /// Create a window once, before the first frame
    fn open(&mut self, name: &str) -> Result<()>;

    /// Replace the window's contents
    fn show(&mut self, name: &str, image: &Mat) -> Result<()>;

    /// Wait up to `delay_ms` for a key press
    fn poll_key(&mut self, delay_ms: i32) -> Result<Option<char>>;

    /// Destroy every window
    fn close_all(&mut self) -> Result<()>;
}

/// Window names for one per-eye debug slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EyeWindows {
    pub thresholded: String,
    pub detection: String,
}

impl EyeWindows {
    /// Names for slot `slot` (0-based)
    pub fn for_slot(slot: usize) -> Self {
        Self {
            thresholded: format!("Eye {} thresholded", slot + 1),
            detection: format!("Eye {} detection", slot + 1),
        }
    }
}

/// Map a raw `wait_key` code to a character, `None` when no key was pressed
pub fn decode_key(code: i32) -> Option<char> {
    if code < 0 {
        return None;
    }
    u8::try_from(code & 0xFF).ok().map(char::from)
}

/// `OpenCV` highgui windows
#[derive(Debug, Default)]
pub struct HighGuiDisplay {
    windows: Vec<String>,
}

impl HighGuiDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySurface for HighGuiDisplay {
    fn open(&mut self, name: &str) -> Result<()> {
        if !self.windows.iter().any(|window| window == name) {
            highgui::named_window(name, WINDOW_AUTOSIZE)?;
            self.windows.push(name.to_string());
        }
        Ok(())
    }

    fn show(&mut self, name: &str, image: &Mat) -> Result<()> {
        highgui::imshow(name, image)?;
        Ok(())
    }

    fn poll_key(&mut self, delay_ms: i32) -> Result<Option<char>> {
        Ok(decode_key(highgui::wait_key(delay_ms)?))
    }

    fn close_all(&mut self) -> Result<()> {
        debug!("Closing {} window(s)", self.windows.len());
        highgui::destroy_all_windows()?;
        self.windows.clear();
        Ok(())
    }
}

/// Shows nothing and never sees a key press
#[derive(Debug, Default)]
pub struct HeadlessDisplay;

impl DisplaySurface for HeadlessDisplay {
    fn open(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    fn show(&mut self, _name: &str, _image: &Mat) -> Result<()> {
        Ok(())
    }

    fn poll_key(&mut self, _delay_ms: i32) -> Result<Option<char>> {
        Ok(None)
    }

    fn close_all(&mut self) -> Result<()> {
        Ok(())
    }
}
