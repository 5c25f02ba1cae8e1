use serde::{Deserialize, Serialize};

/// Height of the panel in logical pixels
pub const PANEL_HEIGHT: i32 = 25;

/// A point in the global (virtual desktop) coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in the global coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// Rightmost column still inside the rectangle
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Bottom row still inside the rectangle
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Smallest rectangle covering both; empty rectangles are ignored
    pub fn united(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let bottom = (self.y + self.height).max(other.y + other.height);

        Rect::new(x, y, right - x, bottom - y)
    }

    /// As a D-Bus friendly tuple
    pub fn to_tuple(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }
}

/// Geometry of the display the panel is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayInfo {
    /// Geometry of the display itself
    pub geometry: Rect,
    /// Union of all displays
    pub virtual_geometry: Rect,
}

impl DisplayInfo {
    pub fn new(geometry: Rect, virtual_geometry: Rect) -> Self {
        Self { geometry, virtual_geometry }
    }

    /// Vertical offset of the display from the virtual desktop origin
    pub fn top_offset(&self) -> i32 {
        self.geometry.top() - self.virtual_geometry.top()
    }
}

/// Panel rectangle for a display: its top-left corner, full width, fixed height
pub fn panel_rect(display: Rect) -> Rect {
    Rect::new(display.x, display.y, display.width, PANEL_HEIGHT)
}

/// Extended strut as understood by EWMH window managers (`_NET_WM_STRUT_PARTIAL`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtendedStrut {
    pub left_width: i32,
    pub left_start: i32,
    pub left_end: i32,
    pub right_width: i32,
    pub right_start: i32,
    pub right_end: i32,
    pub top_width: i32,
    pub top_start: i32,
    pub top_end: i32,
    pub bottom_width: i32,
    pub bottom_start: i32,
    pub bottom_end: i32,
}

impl ExtendedStrut {
    /// Strut reserving the top edge for a panel
    pub fn top(panel: Rect, top_offset: i32) -> Self {
        Self {
            top_width: panel.height + top_offset - 1,
            top_start: panel.left(),
            top_end: panel.right(),
            ..Default::default()
        }
    }

    /// Field order of `_NET_WM_STRUT_PARTIAL`, negative values clamped to zero
    pub fn to_cardinals(&self) -> [u32; 12] {
        [
            self.left_width,
            self.right_width,
            self.top_width,
            self.bottom_width,
            self.left_start,
            self.left_end,
            self.right_start,
            self.right_end,
            self.top_start,
            self.top_end,
            self.bottom_start,
            self.bottom_end,
        ]
        .map(|v| v.max(0) as u32)
    }

    /// Field order of the older four-field `_NET_WM_STRUT`
    pub fn to_legacy_cardinals(&self) -> [u32; 4] {
        [self.left_width, self.right_width, self.top_width, self.bottom_width]
            .map(|v| v.max(0) as u32)
    }
}
