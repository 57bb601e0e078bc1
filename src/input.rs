// Pointer and touch input, normalized to surface-local coordinates.
// Visual expectation: wherever the cursor (or first finger) is over the
// surface, that is exactly where the stroke appears.
use crate::types::Point;

/// The surface's on-screen bounding box in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub client_x: f32,
    pub client_y: f32,
}

/// Where an event happened, as the platform reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Mouse { client_x: f32, client_y: f32 },
    /// Active touch points; only the first one is used.
    Touch { touches: Vec<TouchPoint> },
}

/// The input events the surface reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown(PointerEvent),
    MouseMove(PointerEvent),
    MouseUp,
    MouseLeave,
    TouchStart(PointerEvent),
    TouchMove(PointerEvent),
    TouchEnd,
}

/// Map an event to surface-local coordinates by subtracting the surface's
/// offset. None when no coordinate can be derived (e.g. a touch event with no
/// active touch point).
pub fn surface_point(event: &PointerEvent, rect: &ClientRect) -> Option<Point> {
    let (cx, cy) = match event {
        PointerEvent::Mouse { client_x, client_y } => (*client_x, *client_y),
        PointerEvent::Touch { touches } => {
            let first = touches.first()?;
            (first.client_x, first.client_y)
        }
    };
    if !cx.is_finite() || !cy.is_finite() {
        return None;
    }
    Some(Point::new(cx - rect.left, cy - rect.top))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: ClientRect = ClientRect { left: 100.0, top: 40.0, width: 400.0, height: 300.0 };

    #[test]
    fn mouse_is_offset_by_surface_origin() {
        let e = PointerEvent::Mouse { client_x: 110.0, client_y: 50.0 };
        assert_eq!(surface_point(&e, &RECT), Some(Point::new(10.0, 10.0)));
    }

    #[test]
    fn touch_uses_first_point_only() {
        let e = PointerEvent::Touch {
            touches: vec![
                TouchPoint { client_x: 150.0, client_y: 90.0 },
                TouchPoint { client_x: 0.0, client_y: 0.0 },
            ],
        };
        assert_eq!(surface_point(&e, &RECT), Some(Point::new(50.0, 50.0)));
    }

    #[test]
    fn touch_without_points_is_ignored() {
        let e = PointerEvent::Touch { touches: Vec::new() };
        assert_eq!(surface_point(&e, &RECT), None);
    }

    #[test]
    fn nan_coordinates_are_ignored() {
        let e = PointerEvent::Mouse { client_x: f32::NAN, client_y: 1.0 };
        assert_eq!(surface_point(&e, &RECT), None);
    }
}
