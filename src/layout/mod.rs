mod ancestors;
mod error;
mod half_siblings;
mod lines;
mod prepare;
mod proband;
mod siblings;
pub(crate) mod types;
mod validate;
mod walk;

pub use error::LayoutError;
pub use prepare::prepare;
pub use types::*;
pub use validate::validate;
pub use walk::{CenterOnFootprint, Translate, Visitor, preorder, walk};

use ancestors::*;
use half_siblings::*;
use proband::*;
use siblings::*;

use crate::config::PedigreeConfig;
use crate::ir::{Family, Gender, PersonData, RelationNode, parse_family};
use tracing::debug;

/// Lays out a whole family: the proband's household, full and half
/// siblings on both sides, the parents' sibling cohorts and the ancestors.
///
/// The input is validated first; an invalid family yields no layout at all.
pub fn compute_layout(
    family: &Family,
    config: &PedigreeConfig,
) -> Result<PedigreeLayout, LayoutError> {
    validate(family, config.depth)?;
    let depth = config.depth as usize;
    let slot = config.slot();
    let generation = config.generation();
    let proband = &family.pedigree;
    debug!(
        depth,
        siblings1 = family.siblings1.len(),
        siblings2 = family.siblings2.len(),
        "computing pedigree layout"
    );

    let cohorts = CohortDepth {
        left_nested: family.siblings1.iter().any(RelationNode::has_descendants)
            || half_siblings_nested(family.father()),
        right_nested: family.siblings2.iter().any(RelationNode::has_descendants)
            || half_siblings_nested(family.mother()),
    };
    let household = render(proband, cohorts, config);

    // Shift the proband so its row sits centered below the parents.
    let left_count = cohort_len(&family.siblings1, proband, Gender::Female);
    let right_count = cohort_len(&family.siblings2, proband, Gender::Male);
    let left = slot / 2.0 + left_count / 2.0 * slot - right_count / 2.0 * slot;

    let mut block = household.block;
    block.translate(left, 0.0);
    if !proband.data.twin && family.has_parents() {
        block.lines.push(LineSegment::vertical(
            left + config.obj_width / 2.0,
            -config.y_spacing,
            config.y_spacing,
        ));
    }

    let (father_left, mother_left) = parent_anchors(family, depth, config);
    let reference = Reference {
        left,
        data: &proband.data,
    };
    let unknown = PersonData::default();

    // Left side: siblings1, father's other children, father's siblings.
    let mut right_space = household.left_offset + slot / 2.0;
    if !family.siblings1.is_empty() {
        let run = siblings(&family.siblings1, reference, 0.0, right_space, Direction::Left, config);
        right_space = run.space;
        block.append(run.block);
    }
    let mut father_half = false;
    if let Some(father) = family.father().filter(|f| f.has_spouses()) {
        let run = half_siblings(father, left, right_space, father_left, Direction::Left, config);
        right_space = run.space;
        father_half = !run.block.elements.is_empty();
        block.append(run.block);
    }
    let mut father_offset = None;
    if !family.father_siblings.is_empty() {
        let nested = family.father_siblings.iter().any(RelationNode::has_descendants);
        let space = if father_half || nested {
            (right_space + father_left - left).max(slot / 2.0)
        } else {
            slot / 2.0
        };
        let father_ref = Reference {
            left: father_left,
            data: family.father().map_or(&unknown, |f| &f.data),
        };
        let run = siblings(
            &family.father_siblings,
            father_ref,
            -generation,
            space,
            Direction::Left,
            config,
        );
        father_offset = run
            .last_sib
            .map(|last| father_left + (last - father_left) / 2.0 - slot / 2.0);
        block.append(run.block);
    }

    // Right side mirrors the left.
    let mut left_space = household.right_offset + slot / 2.0;
    if !family.siblings2.is_empty() {
        let run = siblings(&family.siblings2, reference, 0.0, left_space, Direction::Right, config);
        left_space = run.space;
        block.append(run.block);
    }
    let mut mother_half = false;
    if let Some(mother) = family.mother().filter(|m| m.has_spouses()) {
        let run = half_siblings(mother, left, left_space, mother_left, Direction::Right, config);
        left_space = run.space;
        mother_half = !run.block.elements.is_empty();
        block.append(run.block);
    }
    let mut mother_offset = None;
    if !family.mother_siblings.is_empty() {
        let first = config.obj_width + slot / 2.0;
        let nested = family.mother_siblings.iter().any(RelationNode::has_descendants);
        let space = if mother_half || nested {
            (left_space + left - mother_left).max(first)
        } else {
            first
        };
        let mother_ref = Reference {
            left: mother_left,
            data: family.mother().map_or(&unknown, |m| &m.data),
        };
        let run = siblings(
            &family.mother_siblings,
            mother_ref,
            -generation,
            space,
            Direction::Right,
            config,
        );
        mother_offset = run
            .last_sib
            .map(|last| mother_left + (last - mother_left) / 2.0 - slot / 2.0);
        block.append(run.block);
    }

    let anchors = AncestorAnchors {
        father_left,
        mother_left,
        father_offset,
        mother_offset,
    };
    let run = ancestors(family, left, &anchors, depth, config);
    block.append(run.block);

    Ok(normalize(block.elements, block.lines, config))
}

/// Decodes a JSON or JSON5 family and lays it out.
pub fn layout_from_str(
    input: &str,
    config: &PedigreeConfig,
) -> Result<PedigreeLayout, LayoutError> {
    let family = parse_family(input)?;
    compute_layout(&family, config)
}

/// True when a child of the parent's other relationships has children of
/// its own, so the half-sibling block reaches the proband's children row.
fn half_siblings_nested(parent: Option<&RelationNode>) -> bool {
    parent.is_some_and(|parent| {
        parent
            .spouses()
            .iter()
            .flat_map(|spouse| spouse.children())
            .any(RelationNode::has_descendants)
    })
}

/// Number of slots a sibling cohort adds on one side of the proband,
/// counting the partner drawn on that side.
fn cohort_len(cohort: &[RelationNode], proband: &RelationNode, partner_side: Gender) -> f32 {
    if cohort.is_empty() {
        return 0.0;
    }
    let partner = proband.has_spouses() && proband.data.gender == partner_side;
    (cohort.len() + usize::from(partner)) as f32
}

/// Moves the chart so its top-left element sits on the margins and measures
/// its bounding box.
pub fn normalize(
    mut elements: Vec<PositionedElement>,
    mut lines: Vec<LineSegment>,
    config: &PedigreeConfig,
) -> PedigreeLayout {
    let min_left = elements.iter().map(|e| e.left).reduce(f32::min);
    let min_top = elements.iter().map(|e| e.top).reduce(f32::min);
    let (Some(min_left), Some(min_top)) = (min_left, min_top) else {
        return PedigreeLayout {
            data: elements,
            lines,
            width: 0.0,
            height: 0.0,
            overflow: false,
        };
    };

    let dx = config.left_margin - min_left;
    let dy = config.top_margin - min_top;
    for element in &mut elements {
        element.translate(dx, dy);
    }
    for line in &mut lines {
        line.translate(dx, dy);
    }

    let width = elements.iter().map(|e| e.left).fold(f32::MIN, f32::max) + config.obj_width;
    let height = elements.iter().map(|e| e.top).fold(f32::MIN, f32::max) + config.obj_height;
    let overflow = width > config.paper_width || height > config.paper_height;
    debug!(width, height, overflow, "layout normalized");
    PedigreeLayout {
        data: elements,
        lines,
        width,
        height,
        overflow,
    }
}
