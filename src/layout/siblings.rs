use tracing::debug;

use super::lines::{sibship_row, subtree_lines};
use super::prepare::prepare;
use super::types::{Block, Direction, PositionedElement, Relation};
use super::walk::{CenterOnFootprint, Translate, preorder, walk};
use crate::config::PedigreeConfig;
use crate::ir::{PersonData, RelationNode};

/// The member of a row that siblings are laid out from.
#[derive(Debug, Clone, Copy)]
pub struct Reference<'a> {
    pub left: f32,
    pub data: &'a PersonData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiblingRun {
    pub block: Block,
    /// Extent used on this side so far, measured from the reference.
    pub space: f32,
    /// Left of the outermost sibling, if any was placed.
    pub last_sib: Option<f32>,
}

/// Places full siblings outward from `reference`, one after another, each
/// with its own descendants, starting `space` away from the reference.
pub fn siblings(
    members: &[RelationNode],
    reference: Reference<'_>,
    top: f32,
    mut space: f32,
    direction: Direction,
    config: &PedigreeConfig,
) -> SiblingRun {
    let slot = config.slot();
    let mut block = Block::default();
    let mut roots = Vec::with_capacity(members.len());

    for member in members {
        let prepared = walk(
            prepare(member, Relation::Sibling, config),
            &mut CenterOnFootprint { slot },
        );
        let half = slot * prepared.max_width as f32 / 2.0;
        let new_left = match direction {
            Direction::Right => reference.left + space + half - config.obj_width,
            Direction::Left => reference.left - space - half,
        };
        let dx = new_left - prepared.left;
        let placed = walk(prepared, &mut Translate { dx, dy: top });
        block.lines.extend(subtree_lines(&placed, config));
        block.elements.extend(
            preorder(&placed)
                .into_iter()
                .map(|node| PositionedElement::new(node.position(), node.data.clone())),
        );
        roots.push(new_left);
        space += slot * placed.max_width as f32;
    }

    let mut row_members: Vec<(f32, &PersonData)> = vec![(reference.left, reference.data)];
    row_members.extend(roots.iter().copied().zip(members.iter().map(|m| &m.data)));
    if row_members.len() > 1 {
        block
            .lines
            .extend(sibship_row(&row_members, top - config.y_spacing, true, config).lines);
    }

    debug!(
        count = members.len(),
        ?direction,
        space,
        "siblings placed"
    );
    SiblingRun {
        block,
        space,
        last_sib: roots.last().copied(),
    }
}
