//! Window collaborator interface
//!
//! The engine does not own a platform window; it drives anything implementing
//! the [`Window`] trait. Backends translate their native event streams into
//! [`WindowEvent`]s and surface a cooperative close flag. The in-tree
//! [`HeadlessWindow`] backs tests and headless demos.

pub mod headless;

use thiserror::Error;

pub use headless::{CloseSignal, HeadlessWindow};

/// Pointer button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left / primary button
    Left,
    /// Middle button or wheel press
    Middle,
    /// Right / secondary button
    Right,
}

/// Key identifiers the engine cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Left arrow key
    ArrowLeft,
    /// Right arrow key
    ArrowRight,
    /// Up arrow key
    ArrowUp,
    /// Down arrow key
    ArrowDown,
    /// Escape key
    Escape,
}

/// Events a window backend reports to the loop
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// The user or an external signal asked the window to close
    CloseRequested,

    /// The drawable area changed size
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },

    /// Pointer moved to a new position
    PointerMoved {
        /// X coordinate in pixels
        x: f64,
        /// Y coordinate in pixels
        y: f64,
    },

    /// Pointer button state changed
    PointerButton {
        /// Which button
        button: PointerButton,
        /// Pressed (true) or released (false)
        pressed: bool,
    },

    /// Scroll wheel movement
    Scroll {
        /// Horizontal scroll delta
        delta_x: f64,
        /// Vertical scroll delta
        delta_y: f64,
    },

    /// Key state changed
    Key {
        /// Which key
        key: KeyCode,
        /// Pressed (true) or released (false)
        pressed: bool,
    },
}

/// Window errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The window could not be created; fatal before the loop starts
    #[error("window creation failed: {0}")]
    CreationFailed(String),

    /// The window is already closed and cannot present frames
    #[error("window has been closed")]
    Closed,
}

/// Abstraction over the OS window and its event queue
///
/// Implementations must keep [`Window::poll_events`] non-blocking so the frame
/// cadence is preserved, and must make [`Window::close`] idempotent. Event
/// queue drain and surface teardown happen in `close` and on drop, whichever
/// comes first.
pub trait Window {
    /// Current drawable size in pixels
    fn size(&self) -> (u32, u32);

    /// Drain pending events into `out` without blocking
    fn poll_events(&mut self, out: &mut Vec<WindowEvent>);

    /// Present the current frame
    fn swap_buffers(&mut self) -> Result<(), WindowError>;

    /// Whether a close has been requested or performed
    fn should_close(&self) -> bool;

    /// Close the window, releasing its resources; safe to call repeatedly
    fn close(&mut self);
}
