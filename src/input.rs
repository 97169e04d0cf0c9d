//! Pointer input for the backdrop.
//!
//! Mouse and touch both drive a single [`PointerState`]. Each source has an
//! adapter that turns its raw events into a [`PointerUpdate`], so the tracker
//! only ever sees one kind of message:
//!
//! ```ignore
//! let mut tracker = PointerTracker::new(150.0);
//! if let Some(update) = MouseAdapter.translate(&MouseInput::Moved(pos)) {
//!     tracker.apply(update);
//! }
//! ```

use glam::Vec2;

/// Last known pointer position and its influence radius.
///
/// The position is either fully present or fully absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    pub position: Option<Vec2>,
    pub radius: f32,
}

impl PointerState {
    pub fn absent(radius: f32) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    pub fn at(position: Vec2, radius: f32) -> Self {
        Self {
            position: Some(position),
            radius,
        }
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }
}

/// A source-independent pointer message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerUpdate {
    /// The pointer is now at this canvas coordinate.
    Moved(Vec2),
    /// The pointer left the canvas or the touch ended.
    Left,
}

/// Converts one input source's events into [`PointerUpdate`]s.
pub trait PointerAdapter {
    type Event;

    /// Returns `None` for events that do not affect the pointer.
    fn translate(&self, event: &Self::Event) -> Option<PointerUpdate>;
}

/// Raw mouse events, already in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouseInput {
    Moved(Vec2),
    Left,
}

/// Raw touch events.
#[derive(Debug, Clone, PartialEq)]
pub enum TouchInput {
    Moved {
        /// Active touch points in client (viewport) coordinates.
        touches: Vec<Vec2>,
        /// Top-left of the canvas in client coordinates.
        canvas_origin: Vec2,
        /// Current page scroll offset.
        scroll: Vec2,
    },
    Ended,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseAdapter;

impl PointerAdapter for MouseAdapter {
    type Event = MouseInput;

    fn translate(&self, event: &MouseInput) -> Option<PointerUpdate> {
        match *event {
            MouseInput::Moved(position) => Some(PointerUpdate::Moved(position)),
            MouseInput::Left => Some(PointerUpdate::Left),
        }
    }
}

/// Follows the first touch point, mapped into canvas coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct TouchAdapter;

impl PointerAdapter for TouchAdapter {
    type Event = TouchInput;

    fn translate(&self, event: &TouchInput) -> Option<PointerUpdate> {
        match event {
            TouchInput::Moved {
                touches,
                canvas_origin,
                scroll,
            } => touches
                .first()
                .map(|touch| PointerUpdate::Moved(*touch - *canvas_origin + *scroll)),
            TouchInput::Ended => Some(PointerUpdate::Left),
        }
    }
}

/// Single writer of the pointer state.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    pub fn new(radius: f32) -> Self {
        Self {
            state: PointerState::absent(radius),
        }
    }

    pub fn apply(&mut self, update: PointerUpdate) {
        self.state.position = match update {
            PointerUpdate::Moved(position) => Some(position),
            PointerUpdate::Left => None,
        };
    }

    /// Translate an event with `adapter` and apply it.
    ///
    /// Returns whether the event affected the pointer.
    pub fn feed<A: PointerAdapter>(&mut self, adapter: &A, event: &A::Event) -> bool {
        match adapter.translate(event) {
            Some(update) => {
                self.apply(update);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> &PointerState {
        &self.state
    }
}

// ========== winit translation ==========

/// Events the native host forwards to the widget.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) enum NativePointerEvent {
    Mouse(MouseInput),
    Touch(TouchInput),
}

/// Map a winit window event onto one of the two pointer sources.
///
/// Positions are converted to logical pixels so they share the canvas'
/// coordinate space.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn native_pointer_event(
    event: &winit::event::WindowEvent,
    scale_factor: f64,
) -> Option<NativePointerEvent> {
    use winit::event::{TouchPhase, WindowEvent};

    match event {
        WindowEvent::CursorMoved { position, .. } => {
            let logical = position.to_logical::<f32>(scale_factor);
            Some(NativePointerEvent::Mouse(MouseInput::Moved(Vec2::new(
                logical.x, logical.y,
            ))))
        }
        WindowEvent::CursorLeft { .. } => Some(NativePointerEvent::Mouse(MouseInput::Left)),
        WindowEvent::Touch(touch) => match touch.phase {
            TouchPhase::Started | TouchPhase::Moved => {
                let logical = touch.location.to_logical::<f32>(scale_factor);
                Some(NativePointerEvent::Touch(TouchInput::Moved {
                    touches: vec![Vec2::new(logical.x, logical.y)],
                    canvas_origin: Vec2::ZERO,
                    scroll: Vec2::ZERO,
                }))
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                Some(NativePointerEvent::Touch(TouchInput::Ended))
            }
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_move_and_leave() {
        let mut tracker = PointerTracker::new(150.0);
        assert!(!tracker.state().is_present());

        tracker.feed(&MouseAdapter, &MouseInput::Moved(Vec2::new(10.0, 20.0)));
        assert_eq!(tracker.state().position, Some(Vec2::new(10.0, 20.0)));

        tracker.feed(&MouseAdapter, &MouseInput::Left);
        assert_eq!(tracker.state().position, None);
        assert_eq!(tracker.state().radius, 150.0);
    }

    #[test]
    fn test_touch_maps_into_canvas_space() {
        let mut tracker = PointerTracker::new(150.0);
        let event = TouchInput::Moved {
            touches: vec![Vec2::new(100.0, 80.0), Vec2::new(5.0, 5.0)],
            canvas_origin: Vec2::new(20.0, 30.0),
            scroll: Vec2::new(0.0, 400.0),
        };
        assert!(tracker.feed(&TouchAdapter, &event));
        assert_eq!(tracker.state().position, Some(Vec2::new(80.0, 450.0)));

        tracker.feed(&TouchAdapter, &TouchInput::Ended);
        assert!(!tracker.state().is_present());
    }

    #[test]
    fn test_touch_without_points_is_ignored() {
        let mut tracker = PointerTracker::new(150.0);
        tracker.apply(PointerUpdate::Moved(Vec2::ONE));

        let event = TouchInput::Moved {
            touches: Vec::new(),
            canvas_origin: Vec2::ZERO,
            scroll: Vec2::ZERO,
        };
        assert!(!tracker.feed(&TouchAdapter, &event));
        assert_eq!(tracker.state().position, Some(Vec2::ONE));
    }
}
