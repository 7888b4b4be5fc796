use tracing::debug;

use super::lines::{children_row, subtree_lines};
use super::prepare::prepare;
use super::types::{Block, Direction, LineSegment, PositionedElement, Relation};
use super::walk::{CenterOnFootprint, preorder, walk};
use crate::config::PedigreeConfig;
use crate::ir::RelationNode;

#[derive(Debug, Clone, PartialEq)]
pub struct HalfSiblingRun {
    pub block: Block,
    pub space: f32,
}

/// Places the children of a parent's other relationships beyond the
/// siblings already on that side.
///
/// `anchor` is the proband's left, `space` the extent already used on this
/// side of it and `parent_left` the parent's own box one generation up.
/// The parent and its other partners are not emitted; only drops from the
/// parent's row reach the children.
pub fn half_siblings(
    parent: &RelationNode,
    anchor: f32,
    space: f32,
    parent_left: f32,
    direction: Direction,
    config: &PedigreeConfig,
) -> HalfSiblingRun {
    let slot = config.slot();
    let width = config.obj_width;
    let height = config.obj_height;
    let vspace = config.y_spacing;
    let prepared = walk(
        prepare(parent, Relation::HalfSibling, config),
        &mut CenterOnFootprint { slot },
    );

    let mut block = Block::default();
    let mut drops = Vec::new();
    for spouse in &prepared.spouses {
        let row = children_row(spouse, config);
        let (Some(drop), Some(first)) = (row.midpoint(), spouse.children.first()) else {
            continue;
        };
        let row_top = first.top - vspace;
        block.lines.extend(row.lines);
        block.lines.push(LineSegment::vertical(
            drop,
            row_top - vspace - height / 2.0,
            vspace + height / 2.0,
        ));
        drops.push(drop);
        for child in &spouse.children {
            block.lines.extend(subtree_lines(child, config));
            block.elements.extend(
                preorder(child)
                    .into_iter()
                    .map(|node| PositionedElement::new(node.position(), node.data.clone())),
            );
        }
    }

    let lefts = block.elements.iter().map(|e| e.left);
    let (Some(lo), Some(hi)) = (
        lefts.clone().reduce(f32::min),
        lefts.reduce(f32::max),
    ) else {
        return HalfSiblingRun { block, space };
    };

    let dx = match direction {
        Direction::Left => anchor - space - slot / 2.0 - hi,
        Direction::Right => anchor + space + slot / 2.0 - width - lo,
    };
    let generation = config.generation();
    block.translate(dx, -generation);

    let outermost = match direction {
        Direction::Left => drops.iter().copied().reduce(f32::min),
        Direction::Right => drops.iter().copied().reduce(f32::max),
    };
    if let Some(outermost) = outermost.map(|x| x + dx) {
        let edge = match direction {
            Direction::Left => parent_left,
            Direction::Right => parent_left + width,
        };
        block.lines.push(LineSegment::horizontal(
            outermost.min(edge),
            -generation + height / 2.0,
            (edge - outermost).abs(),
        ));
    }

    let space = space + (hi - lo) + slot;
    debug!(
        parent = parent.data.display_name(),
        ?direction,
        count = block.elements.len(),
        space,
        "half-siblings placed"
    );
    HalfSiblingRun { block, space }
}
