use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::state::clip::Edges;
use crate::Message;

/// Canvas drawn on top of the previewed texture.
///
/// Shades everything outside the clip rectangle and lets the user drag
/// out a new rectangle, reported in normalized coordinates.
pub struct ClipOverlay {
    /// Clip rectangle in coordinate space
    pub coord: Edges,
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    /// Where the drag started, normalized to the canvas bounds
    pub anchor: Option<(f64, f64)>,
}

impl Program<Message> for ClipOverlay {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let (w, h) = (bounds.width, bounds.height);

        let left = self.coord.left as f32 * w;
        let right = self.coord.right as f32 * w;
        let top = self.coord.top as f32 * h;
        let bottom = self.coord.bottom as f32 * h;

        // Dim the four bands around the clip rectangle
        let shade = Color::from_rgba(0.0, 0.0, 0.0, 0.55);
        frame.fill_rectangle(Point::ORIGIN, Size::new(w, top), shade);
        frame.fill_rectangle(Point::new(0.0, bottom), Size::new(w, (h - bottom).max(0.0)), shade);
        frame.fill_rectangle(Point::new(0.0, top), Size::new(left, (bottom - top).max(0.0)), shade);
        frame.fill_rectangle(
            Point::new(right, top),
            Size::new((w - right).max(0.0), (bottom - top).max(0.0)),
            shade,
        );

        let outline = Path::rectangle(
            Point::new(left, top),
            Size::new((right - left).max(0.0), (bottom - top).max(0.0)),
        );
        frame.stroke(
            &outline,
            Stroke::default()
                .with_color(Color::from_rgb(1.0, 0.8, 0.0))
                .with_width(1.0),
        );

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let normalized = |p: Point| {
            (
                f64::from(p.x / bounds.width.max(1.0)),
                f64::from(p.y / bounds.height.max(1.0)),
            )
        };

        match event {
            // Mouse button press - start a new rectangle
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position_in(bounds) {
                    state.anchor = Some(normalized(pos));
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - finish dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if state.anchor.take().is_some() {
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse move - stretch the rectangle while dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let (Some(anchor), Some(pos)) = (state.anchor, cursor.position()) {
                    // Positions outside the canvas are clamped by from_corners
                    let local = Point::new(pos.x - bounds.x, pos.y - bounds.y);
                    let coord = Edges::from_corners(anchor, normalized(local));
                    return (canvas::event::Status::Captured, Some(Message::ClipDragged(coord)));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
