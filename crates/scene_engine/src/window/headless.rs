//! Headless window backend
//!
//! A [`Window`] implementation with no OS surface: events are injected by the
//! host (or a test), and frame presentation is a no-op. It also hands out the
//! [`CloseSignal`] used by the one permitted auxiliary thread to request
//! shutdown without touching the scene.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::WindowConfig;
use crate::window::{Window, WindowError, WindowEvent};

/// Thread-safe close request flag
///
/// Clones share the flag. An auxiliary thread calls
/// [`CloseSignal::request_close`]; the loop observes it as a
/// [`WindowEvent::CloseRequested`] at the top of its next iteration.
#[derive(Debug, Clone)]
pub struct CloseSignal(Arc<AtomicBool>);

impl CloseSignal {
    /// Ask the window to close at the next iteration boundary
    pub fn request_close(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a close has been requested through this signal
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Event-injectable window without an OS surface
pub struct HeadlessWindow {
    size: (u32, u32),
    pending: VecDeque<WindowEvent>,
    close_signal: Arc<AtomicBool>,
    close_signal_observed: bool,
    closed: bool,
}

impl HeadlessWindow {
    /// Create a headless window from a window configuration
    pub fn create(config: &WindowConfig) -> Result<Self, WindowError> {
        if config.width == 0 || config.height == 0 {
            return Err(WindowError::CreationFailed(format!(
                "window size must be non-zero, got {}x{}",
                config.width, config.height
            )));
        }
        log::info!(
            "created headless window '{}' ({}x{})",
            config.title,
            config.width,
            config.height
        );
        Ok(Self {
            size: (config.width, config.height),
            pending: VecDeque::new(),
            close_signal: Arc::new(AtomicBool::new(false)),
            close_signal_observed: false,
            closed: false,
        })
    }

    /// Get a shareable close-request flag for an auxiliary thread
    pub fn close_signal(&self) -> CloseSignal {
        CloseSignal(Arc::clone(&self.close_signal))
    }

    /// Queue an event for the next [`Window::poll_events`] call
    pub fn push_event(&mut self, event: WindowEvent) {
        if let WindowEvent::Resized { width, height } = event {
            self.size = (width, height);
        }
        self.pending.push_back(event);
    }
}

impl Window for HeadlessWindow {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn poll_events(&mut self, out: &mut Vec<WindowEvent>) {
        // Surface the external close request exactly once, ahead of the
        // injected events, so it is observed at the iteration boundary.
        if !self.close_signal_observed && self.close_signal.load(Ordering::Acquire) {
            self.close_signal_observed = true;
            out.push(WindowEvent::CloseRequested);
        }
        out.extend(self.pending.drain(..));
    }

    fn swap_buffers(&mut self) -> Result<(), WindowError> {
        if self.closed {
            return Err(WindowError::Closed);
        }
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.closed
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.pending.clear();
            log::info!("headless window closed");
        }
    }
}

impl Drop for HeadlessWindow {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> HeadlessWindow {
        HeadlessWindow::create(&WindowConfig::default()).unwrap()
    }

    #[test]
    fn test_zero_size_rejected() {
        let config = WindowConfig {
            width: 0,
            ..WindowConfig::default()
        };
        assert!(matches!(
            HeadlessWindow::create(&config),
            Err(WindowError::CreationFailed(_))
        ));
    }

    #[test]
    fn test_events_drain_in_order() {
        let mut window = window();
        window.push_event(WindowEvent::PointerMoved { x: 1.0, y: 2.0 });
        window.push_event(WindowEvent::Scroll {
            delta_x: 0.0,
            delta_y: 1.0,
        });

        let mut out = Vec::new();
        window.poll_events(&mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], WindowEvent::PointerMoved { x: 1.0, y: 2.0 });

        out.clear();
        window.poll_events(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_close_signal_surfaces_once_as_event() {
        let mut window = window();
        let signal = window.close_signal();

        let aux = std::thread::spawn(move || signal.request_close());
        aux.join().unwrap();

        let mut out = Vec::new();
        window.poll_events(&mut out);
        assert_eq!(out, vec![WindowEvent::CloseRequested]);

        out.clear();
        window.poll_events(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_resize_event_updates_size() {
        let mut window = window();
        window.push_event(WindowEvent::Resized {
            width: 1024,
            height: 768,
        });
        assert_eq!(window.size(), (1024, 768));
    }

    #[test]
    fn test_swap_buffers_fails_after_close() {
        let mut window = window();
        assert!(window.swap_buffers().is_ok());
        window.close();
        assert!(window.should_close());
        assert!(matches!(window.swap_buffers(), Err(WindowError::Closed)));
        // close is idempotent
        window.close();
    }
}
