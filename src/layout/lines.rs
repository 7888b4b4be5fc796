//! Connector synthesis for prepared subtrees.

use super::types::{LineSegment, Placement, PreparedNode, PreparedSpouse};
use super::walk::preorder;
use crate::config::PedigreeConfig;
use crate::ir::{Gender, PersonData, Zygosity};

/// Connection geometry of one sibship row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub lines: Vec<LineSegment>,
    /// Where each member meets the row: its center, or its twin bracket apex.
    pub points: Vec<f32>,
}

impl Row {
    pub fn first_point(&self) -> Option<f32> {
        self.points.first().copied()
    }

    pub fn last_point(&self) -> Option<f32> {
        self.points.last().copied()
    }

    /// Midpoint of the row span, where a drop from the parents lands.
    pub fn midpoint(&self) -> Option<f32> {
        match (self.first_point(), self.last_point()) {
            (Some(first), Some(last)) => Some((first + last) / 2.0),
            _ => None,
        }
    }
}

/// Builds the line row shared by a set of same-generation relatives.
///
/// `members` are `(left, data)` pairs in drawing order and `top` is the row
/// height (one vertical spacing above the members). Maximal runs of
/// consecutive twins share one bracket; every other member gets a tick,
/// except the first when `skip_first_tick` is set (its drop belongs to
/// another component). A horizontal span joins the first and last
/// connection points.
pub fn sibship_row(
    members: &[(f32, &PersonData)],
    top: f32,
    skip_first_tick: bool,
    config: &PedigreeConfig,
) -> Row {
    let half = config.obj_width / 2.0;
    let mut row = Row {
        lines: Vec::new(),
        points: vec![0.0; members.len()],
    };

    let mut start = 0;
    while start < members.len() {
        let mut end = start + 1;
        if members[start].1.twin {
            while end < members.len() && members[end].1.twin {
                end += 1;
            }
        }
        if end - start >= 2 {
            let first = members[start].0 + half;
            let last = members[end - 1].0 + half;
            let apex = (first + last) / 2.0;
            let identical = members[start..end]
                .iter()
                .map(|(_, data)| data.identical)
                .find(|zygosity| !zygosity.is_unspecified())
                .unwrap_or(Zygosity::Unspecified);
            row.lines
                .push(LineSegment::twins(apex, top, (last - first).abs() / 2.0, identical));
            for point in &mut row.points[start..end] {
                *point = apex;
            }
        } else {
            let center = members[start].0 + half;
            if !(skip_first_tick && start == 0) {
                row.lines.push(LineSegment::vertical(center, top, config.y_spacing));
            }
            row.points[start] = center;
        }
        start = end;
    }

    if let (Some(first), Some(last)) = (row.first_point(), row.last_point()) {
        if first != last {
            row.lines
                .push(LineSegment::horizontal(first.min(last), top, (last - first).abs()));
        }
    }
    row
}

/// Row for the children of one couple.
pub fn children_row(spouse: &PreparedSpouse, config: &PedigreeConfig) -> Row {
    let Some(top) = spouse.children.first().map(|child| child.top - config.y_spacing) else {
        return Row::default();
    };
    let members: Vec<(f32, &PersonData)> = spouse
        .children
        .iter()
        .map(|child| (child.left, &child.data))
        .collect();
    sibship_row(&members, top, false, config)
}

/// Lines for every node of a centered subtree, in pre-order.
pub fn subtree_lines(root: &PreparedNode, config: &PedigreeConfig) -> Vec<LineSegment> {
    let mut lines = Vec::new();
    for node in preorder(root) {
        lines.extend(couple_lines(node, config));
    }
    lines
}

/// Lines attaching one individual to its partners and their children.
pub fn couple_lines(node: &PreparedNode, config: &PedigreeConfig) -> Vec<LineSegment> {
    let width = config.obj_width;
    let height = config.obj_height;
    let spacing = config.x_spacing;
    let vspace = config.y_spacing;
    let mut lines = Vec::new();

    for (index, spouse) in node.spouses.iter().enumerate() {
        let has_children = !spouse.children.is_empty();
        match (index, spouse.position) {
            (0, Some(at)) => {
                let male = spouse.data.gender == Gender::Male;
                let marriage = if male { at.left + width } else { at.left - spacing };
                lines.push(LineSegment::horizontal(marriage, at.top + height / 2.0, spacing));
                if spouse.data.consanguinity {
                    lines.push(LineSegment::horizontal(
                        marriage,
                        at.top + height / 2.0 - 5.0,
                        spacing + 2.0,
                    ));
                }
                if has_children {
                    let drop = if male {
                        node.left - spacing / 2.0
                    } else {
                        node.left + width + spacing / 2.0
                    };
                    lines.push(LineSegment::vertical(
                        drop,
                        node.top + height / 2.0,
                        height / 2.0 + vspace,
                    ));
                }
            }
            (0, None) if has_children => {
                lines.push(LineSegment::vertical(
                    node.left + width / 2.0,
                    node.top + height / 2.0,
                    height / 2.0 + vspace,
                ));
            }
            (_, Some(at)) if has_children => {
                lines.extend(elbow(node, spouse.placement, at.left, config));
            }
            _ => {}
        }
        if has_children {
            lines.extend(children_row(spouse, config).lines);
        }
    }
    lines
}

/// Connects a further partner's children block back to the couple row.
fn elbow(
    node: &PreparedNode,
    placement: Placement,
    spouse_left: f32,
    config: &PedigreeConfig,
) -> [LineSegment; 3] {
    let half = config.obj_width / 2.0;
    let slot = config.slot();
    let base = node.top + config.obj_height;
    let step = config.y_spacing / 2.0;
    let female = node.data.gender == Gender::Female;

    let (offset, len) = match (placement, female) {
        (Placement::Right, true) => (node.left + half, spouse_left - node.left),
        (Placement::Right, false) => (node.left + slot + half, spouse_left - node.left - slot),
        (_, true) => (node.left - slot + half, spouse_left - node.left + slot),
        (_, false) => (node.left + half, spouse_left - node.left),
    };
    [
        LineSegment::vertical(spouse_left + half, base + step, step),
        LineSegment::vertical(offset, base, step),
        LineSegment::horizontal(offset, base + step, len),
    ]
}
