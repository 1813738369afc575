use serde::{Deserialize, Serialize};

/// Viewport-relative bounding box of an element
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Document-relative position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub left: f64,
    pub top: f64,
}

/// The element that triggered an action, as seen by the host at event time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub rect: Rect,
    #[serde(default)]
    pub scroll: ScrollOffset,
}

impl Anchor {
    pub fn new(rect: Rect, scroll: ScrollOffset) -> Self {
        Self { rect, scroll }
    }

    /// Place a box of `size` centred above the anchor, `gap` pixels away,
    /// clamped to the document origin.
    pub fn place_above(&self, size: Size, gap: f64) -> Position {
        let top = self.rect.top + self.scroll.y - size.height - gap;
        let left = self.rect.center_x() + self.scroll.x - size.width / 2.0;

        Position {
            top: top.max(0.0),
            left: left.max(0.0),
        }
    }
}
