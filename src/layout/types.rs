use serde::{Deserialize, Serialize};

use crate::ir::{PersonData, Zygosity};

/// Horizontal bucket of a spouse subtree relative to its anchor individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Left,
    Center,
    Right,
}

impl Placement {
    /// Left blocks grow away from the anchor towards negative offsets.
    pub fn grows_left(self) -> bool {
        matches!(self, Placement::Left)
    }
}

/// How multiple spouses of an individual are distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Proband,
    Sibling,
    HalfSibling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub left: f32,
    pub top: f32,
}

impl Point {
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }
}

/// A node of the width-annotated tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedNode {
    pub left: f32,
    pub top: f32,
    /// Footprint of the node and its right-growing descendants, in slots.
    pub max_width: u32,
    pub data: PersonData,
    pub spouses: Vec<PreparedSpouse>,
}

impl PreparedNode {
    pub fn leaf(data: PersonData) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            max_width: 1,
            data,
            spouses: Vec::new(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.left, self.top)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSpouse {
    pub data: PersonData,
    pub placement: Placement,
    pub children: Vec<PreparedNode>,
    /// Footprint in slots: the children's `max_width` sum, or 1 (2 for a
    /// first spouse) when childless.
    pub width: u32,
    /// First slot of this spouse's block relative to the anchor's origin.
    pub offset: f32,
    /// Set once the proband renderer has placed the partner.
    pub position: Option<Point>,
    pub display: bool,
}

impl PreparedSpouse {
    pub fn center_slot(&self) -> f32 {
        self.offset + self.width as f32 / 2.0
    }
}

/// An entity ready for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedElement {
    pub left: f32,
    pub top: f32,
    pub data: PersonData,
    /// False for partner entities that only anchor line geometry.
    pub display: bool,
}

impl PositionedElement {
    pub fn new(at: Point, data: PersonData) -> Self {
        Self {
            left: at.left,
            top: at.top,
            data,
            display: true,
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.top += dy;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
    Twins,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineData {
    pub orientation: Orientation,
    pub len: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identical: Option<Zygosity>,
}

/// A connector stroke. Horizontal runs to `left + len`, vertical to
/// `top + len`; a twins bracket hangs from its apex at `(left, top)` down to
/// `left ± len` one vertical spacing lower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSegment {
    pub left: f32,
    pub top: f32,
    pub data: LineData,
}

impl LineSegment {
    pub fn horizontal(left: f32, top: f32, len: f32) -> Self {
        Self {
            left,
            top,
            data: LineData {
                orientation: Orientation::Horizontal,
                len,
                identical: None,
            },
        }
    }

    pub fn vertical(left: f32, top: f32, len: f32) -> Self {
        Self {
            left,
            top,
            data: LineData {
                orientation: Orientation::Vertical,
                len,
                identical: None,
            },
        }
    }

    pub fn twins(left: f32, top: f32, len: f32, identical: Zygosity) -> Self {
        Self {
            left,
            top,
            data: LineData {
                orientation: Orientation::Twins,
                len,
                identical: Some(identical),
            },
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.data.orientation
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.top += dy;
    }
}

/// Entities and lines produced by one layout component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub elements: Vec<PositionedElement>,
    pub lines: Vec<LineSegment>,
}

impl Block {
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for element in &mut self.elements {
            element.translate(dx, dy);
        }
        for line in &mut self.lines {
            line.translate(dx, dy);
        }
    }

    pub fn append(&mut self, mut other: Block) {
        self.elements.append(&mut other.elements);
        self.lines.append(&mut other.lines);
    }
}

/// Final output handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PedigreeLayout {
    pub data: Vec<PositionedElement>,
    pub lines: Vec<LineSegment>,
    pub width: f32,
    pub height: f32,
    /// The chart exceeds the configured paper; renderers should fit it.
    pub overflow: bool,
}
