use egui::{Context, Pos2, Rect};

/// Pointer input in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button pressed on the canvas
    PointerDown(Pos2),
    /// Pointer moved while the primary button is held
    PointerMove(Pos2),
    /// Primary button released
    PointerUp(Pos2),
    /// The gesture was interrupted (pointer left the window, tool changed)
    Cancel,
}

/// Handles converting raw egui pointer state into [`InputEvent`]s
#[derive(Debug)]
pub struct InputHandler {
    canvas_rect: Rect,
    /// A press started on the canvas and has not been released yet
    tracking: bool,
    last_pos: Option<Pos2>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Rect::NOTHING)
    }
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            tracking: false,
            last_pos: None,
        }
    }

    /// Update the canvas rectangle (e.g. when the panel scrolls or resizes)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Screen position → surface pixel coordinates
    pub fn to_surface(&self, screen: Pos2) -> Pos2 {
        (screen - self.canvas_rect.min).to_pos2()
    }

    /// Surface pixel coordinates → screen position
    pub fn to_screen(&self, surface: Pos2) -> Pos2 {
        self.canvas_rect.min + surface.to_vec2()
    }

    /// Process this frame's pointer state.
    ///
    /// `hovered` must be false when something (a window, a popup) covers the
    /// canvas, so presses meant for that widget do not start a gesture.
    pub fn process_input(&mut self, ctx: &Context, hovered: bool) -> Vec<InputEvent> {
        let (pos, pressed, released) = ctx.input(|input| {
            (
                input.pointer.latest_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
            )
        });
        self.process_pointer(pos, pressed, released, hovered)
    }

    /// Frame-independent core of [`Self::process_input`]
    pub fn process_pointer(
        &mut self,
        pos: Option<Pos2>,
        pressed: bool,
        released: bool,
        hovered: bool,
    ) -> Vec<InputEvent> {
        let mut events = Vec::new();

        let Some(pos) = pos else {
            if self.tracking {
                log::debug!("Pointer left the window mid-gesture");
                events.push(InputEvent::Cancel);
                self.tracking = false;
            }
            self.last_pos = None;
            return events;
        };

        if pressed && !self.tracking && hovered && self.canvas_rect.contains(pos) {
            self.tracking = true;
            events.push(InputEvent::PointerDown(self.to_surface(pos)));
        } else if self.tracking && Some(pos) != self.last_pos {
            events.push(InputEvent::PointerMove(self.to_surface(pos)));
        }

        if released && self.tracking {
            self.tracking = false;
            events.push(InputEvent::PointerUp(self.to_surface(pos)));
        }

        self.last_pos = Some(pos);
        events
    }

    /// Abandon the current gesture without a pointer-up
    pub fn cancel(&mut self) -> Option<InputEvent> {
        if self.tracking {
            self.tracking = false;
            Some(InputEvent::Cancel)
        } else {
            None
        }
    }
}
