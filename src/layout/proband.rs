use tracing::debug;

use super::lines::subtree_lines;
use super::prepare::prepare;
use super::types::{Block, Placement, Point, PositionedElement, PreparedNode, Relation};
use super::walk::{CenterOnFootprint, preorder, walk};
use crate::config::PedigreeConfig;
use crate::ir::{Gender, RelationNode};

/// Whether the relatives on each side of the proband (full siblings, or the
/// parent's other children) reach below the proband's row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CohortDepth {
    pub left_nested: bool,
    pub right_nested: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbandLayout {
    pub block: Block,
    /// Room already used left of the proband's own box.
    pub left_offset: f32,
    /// Room already used right of the proband's left edge.
    pub right_offset: f32,
}

/// Slot totals of the spouse blocks around one individual.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SpouseWidths {
    left: f32,
    center: f32,
    right: f32,
}

impl SpouseWidths {
    fn of(node: &PreparedNode) -> Self {
        let mut widths = SpouseWidths::default();
        for spouse in &node.spouses {
            let width = spouse.width as f32;
            match spouse.placement {
                Placement::Left => widths.left += width,
                Placement::Center => widths.center += width,
                Placement::Right => widths.right += width,
            }
        }
        if node.spouses.len() == 1 {
            widths.center = widths.center.max(2.0);
        }
        widths
    }
}

/// Lays out the proband with partners and descendants, proband at `(0, 0)`.
pub fn render(
    proband: &RelationNode,
    cohorts: CohortDepth,
    config: &PedigreeConfig,
) -> ProbandLayout {
    let slot = config.slot();
    let prepared = prepare(proband, Relation::Proband, config);
    let centered = walk(prepared, &mut CenterOnFootprint { slot });
    let placed = walk(centered, &mut |node: &mut PreparedNode| place_spouses(node, config));

    let mut block = Block {
        elements: Vec::new(),
        lines: subtree_lines(&placed, config),
    };
    let nodes = preorder(&placed);
    block.elements.extend(
        nodes
            .iter()
            .map(|node| PositionedElement::new(node.position(), node.data.clone())),
    );
    for node in &nodes {
        for spouse in &node.spouses {
            if let Some(at) = spouse.position {
                block.elements.push(PositionedElement {
                    display: spouse.display,
                    ..PositionedElement::new(at, spouse.data.clone())
                });
            }
        }
    }
    block.translate(-placed.left, -placed.top);

    let has_spouses = !placed.spouses.is_empty();
    let male = proband.data.gender == Gender::Male;
    let widths = SpouseWidths::of(&placed);
    let (mut left_offset, mut right_offset) = match (has_spouses, male) {
        (true, true) => (
            (widths.left + widths.center / 2.0) * slot - slot,
            (widths.right + widths.center / 2.0) * slot + config.obj_width,
        ),
        (true, false) => (
            (widths.left + widths.center / 2.0) * slot,
            (widths.right + widths.center / 2.0) * slot - config.x_spacing,
        ),
        (false, _) => (0.0, config.obj_width),
    };
    if !cohorts.left_nested {
        left_offset = if has_spouses && proband.data.gender == Gender::Female {
            slot
        } else {
            0.0
        };
    }
    if !cohorts.right_nested {
        right_offset = if has_spouses && male {
            2.0 * config.obj_width + config.x_spacing
        } else {
            config.obj_width
        };
    }

    debug!(
        elements = block.elements.len(),
        lines = block.lines.len(),
        left_offset,
        right_offset,
        "proband family placed"
    );
    ProbandLayout {
        block,
        left_offset,
        right_offset,
    }
}

/// Positions every partner of a centered node and moves the node next to
/// its first partner.
fn place_spouses(node: &mut PreparedNode, config: &PedigreeConfig) {
    if node.spouses.is_empty() {
        return;
    }
    let slot = config.slot();
    let origin = node.left - slot * node.max_width as f32 / 2.0;
    for spouse in &mut node.spouses {
        spouse.position = Some(Point::new(origin + slot * spouse.center_slot(), node.top));
        spouse.display = spouse.placement == Placement::Center;
    }
    let first = &mut node.spouses[0];
    if let Some(at) = first.position.as_mut() {
        if first.data.gender == Gender::Male {
            at.left -= slot / 2.0;
            node.left = at.left + slot;
        } else {
            at.left += slot / 2.0;
            node.left = at.left - slot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{PersonData, Spouse};

    fn person(name: &str, gender: Gender) -> RelationNode {
        RelationNode::new(PersonData::new(name, gender))
    }

    fn find<'a>(block: &'a Block, name: &str) -> &'a PositionedElement {
        block
            .elements
            .iter()
            .find(|e| e.data.display_name() == name)
            .unwrap()
    }

    #[test]
    fn lone_proband_reserves_its_own_box() {
        let config = PedigreeConfig::default();
        let layout = render(&person("Me", Gender::Male), CohortDepth::default(), &config);
        assert_eq!(layout.block.elements.len(), 1);
        assert!(layout.block.lines.is_empty());
        assert_eq!(layout.left_offset, 0.0);
        assert_eq!(layout.right_offset, 60.0);
    }

    #[test]
    fn couple_with_two_children() {
        let config = PedigreeConfig::default();
        let node = person("Me", Gender::Male).with_spouse(
            Spouse::new(PersonData::new("Wife", Gender::Female))
                .with_child(person("A", Gender::Male))
                .with_child(person("B", Gender::Female)),
        );
        let layout = render(&node, CohortDepth::default(), &config);
        let block = &layout.block;
        assert_eq!(block.elements.len(), 4);
        assert_eq!(find(block, "Me").left, 0.0);
        assert_eq!(find(block, "Wife").left, 110.0);
        assert_eq!(find(block, "A").left, 0.0);
        assert_eq!(find(block, "B").left, 110.0);
        assert_eq!(find(block, "A").top, 120.0);
        assert!(block.elements.iter().all(|e| e.display));
        assert_eq!(layout.right_offset, 170.0);
        // marriage, drop, two ticks, span
        assert_eq!(block.lines.len(), 5);
        let drop = block.lines[1];
        assert_eq!(drop.left, 85.0);
        assert_eq!(block.lines[4].left + block.lines[4].data.len / 2.0, 85.0);
    }

    #[test]
    fn female_proband_sits_right_of_her_husband() {
        let config = PedigreeConfig::default();
        let node = person("Me", Gender::Female)
            .with_spouse(Spouse::new(PersonData::new("Husband", Gender::Male)));
        let layout = render(&node, CohortDepth::default(), &config);
        assert_eq!(find(&layout.block, "Husband").left, -110.0);
        assert_eq!(layout.left_offset, 110.0);
        assert_eq!(layout.right_offset, 60.0);
    }

    #[test]
    fn former_partners_are_hidden_anchors() {
        let config = PedigreeConfig::default();
        let mut current = Spouse::new(PersonData::new("Wife", Gender::Female))
            .with_child(person("A", Gender::Male));
        current.current = true;
        let node = person("Me", Gender::Male)
            .with_spouse(
                Spouse::new(PersonData::new("Ex", Gender::Female))
                    .with_child(person("B", Gender::Male)),
            )
            .with_spouse(current);
        let layout = render(&node, CohortDepth::default(), &config);
        let ex = find(&layout.block, "Ex");
        assert!(!ex.display);
        assert!(find(&layout.block, "Wife").display);
        assert!(find(&layout.block, "B").left < find(&layout.block, "A").left);
    }

    #[test]
    fn nested_cohorts_use_the_spouse_footprint() {
        let config = PedigreeConfig::default();
        let node = person("Me", Gender::Male).with_spouse(
            Spouse::new(PersonData::new("Wife", Gender::Female))
                .with_child(person("A", Gender::Male))
                .with_child(person("B", Gender::Female))
                .with_child(person("C", Gender::Female)),
        );
        let cohorts = CohortDepth {
            left_nested: true,
            right_nested: true,
        };
        let layout = render(&node, cohorts, &config);
        assert_eq!(layout.left_offset, 0.5 * 110.0);
        assert_eq!(layout.right_offset, 1.5 * 110.0 + 60.0);
    }
}
