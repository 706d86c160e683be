/// A point in CSS pixels relative to the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointer-drag state for the overlay window.
#[derive(Debug, Default)]
pub struct DragController {
    /// Pointer offset from the element's top-left corner while dragging.
    grab_offset: Option<Point>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging. `element_origin` is the element's current top-left.
    pub fn pointer_down(&mut self, pointer: Point, element_origin: Point) {
        self.grab_offset = Some(Point::new(
            pointer.x - element_origin.x,
            pointer.y - element_origin.y,
        ));
    }

    /// New top-left for the element, or `None` when not dragging.
    pub fn pointer_move(&self, pointer: Point) -> Option<Point> {
        self.grab_offset
            .map(|off| Point::new(pointer.x - off.x, pointer.y - off.y))
    }

    pub fn pointer_up(&mut self) {
        self.grab_offset = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.grab_offset.is_some()
    }

    pub fn cursor(&self) -> &'static str {
        if self.is_dragging() { "grabbing" } else { "grab" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_grab_offset_while_moving() {
        let mut drag = DragController::new();
        assert_eq!(drag.cursor(), "grab");
        drag.pointer_down(Point::new(110.0, 60.0), Point::new(100.0, 50.0));
        assert_eq!(drag.cursor(), "grabbing");
        assert_eq!(
            drag.pointer_move(Point::new(300.0, 200.0)),
            Some(Point::new(290.0, 190.0))
        );
    }

    #[test]
    fn move_without_press_does_nothing() {
        let mut drag = DragController::new();
        assert_eq!(drag.pointer_move(Point::new(5.0, 5.0)), None);
        drag.pointer_down(Point::new(1.0, 1.0), Point::default());
        drag.pointer_up();
        assert_eq!(drag.pointer_move(Point::new(5.0, 5.0)), None);
        assert_eq!(drag.cursor(), "grab");
    }
}
