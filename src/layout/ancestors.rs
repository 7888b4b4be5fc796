//! Parents, grandparents and further generations above the proband.
//!
//! Generation 1 sits on fixed anchors shared with the sibling placers.
//! Generation 2 is centered over the parents' sibling cohorts. From
//! generation 3 on, every couple is centered above its child and couples of
//! one generation are pushed apart so that no two share a slot.

use tracing::debug;

use super::types::{Block, LineSegment, Point, PositionedElement};
use crate::config::PedigreeConfig;
use crate::ir::{Family, PersonData, RelationNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lineage {
    Paternal,
    Maternal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Father,
    Mother,
}

struct Member<'a> {
    node: &'a RelationNode,
    lineage: Lineage,
    role: Role,
    /// Index of the child in the generation below; generation 1 hangs off
    /// the proband.
    child: usize,
    left: f32,
}

/// Horizontal anchors computed before the sibling cohorts are placed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AncestorAnchors {
    pub father_left: f32,
    pub mother_left: f32,
    /// Left of the paternal grandparents when centered over father's siblings.
    pub father_offset: Option<f32>,
    /// Left of the maternal grandparents when centered over mother's siblings.
    pub mother_offset: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AncestorRun {
    pub block: Block,
    pub generations: usize,
}

fn parents_of(node: &RelationNode) -> impl Iterator<Item = (Role, &RelationNode)> {
    node.father
        .as_deref()
        .map(|father| (Role::Father, father))
        .into_iter()
        .chain(node.mother.as_deref().map(|mother| (Role::Mother, mother)))
}

fn first_generation(family: &Family) -> Vec<Member<'_>> {
    let father = family.father().map(|node| Member {
        node,
        lineage: Lineage::Paternal,
        role: Role::Father,
        child: 0,
        left: 0.0,
    });
    let mother = family.mother().map(|node| Member {
        node,
        lineage: Lineage::Maternal,
        role: Role::Mother,
        child: 0,
        left: 0.0,
    });
    father.into_iter().chain(mother).collect()
}

fn next_generation<'a>(below: &[Member<'a>]) -> Vec<Member<'a>> {
    below
        .iter()
        .enumerate()
        .flat_map(|(child, member)| {
            parents_of(member.node).map(move |(role, node)| Member {
                node,
                lineage: member.lineage,
                role,
                child,
                left: 0.0,
            })
        })
        .collect()
}

fn build_generations(family: &Family, depth: usize) -> Vec<Vec<Member<'_>>> {
    let mut generations = Vec::new();
    let mut current = first_generation(family);
    while !current.is_empty() && generations.len() < depth {
        let next = next_generation(&current);
        generations.push(current);
        current = next;
    }
    generations
}

/// Number of ancestor generations that will actually be drawn.
pub fn generation_count(family: &Family, depth: usize) -> usize {
    build_generations(family, depth).len()
}

/// Box lefts of the proband's father and mother.
///
/// The parents spread apart when a grandparent generation is drawn and at
/// least one of them has no sibling cohort to center the grandparents over.
pub fn parent_anchors(family: &Family, depth: usize, config: &PedigreeConfig) -> (f32, f32) {
    let slot = config.slot();
    let spread = generation_count(family, depth) > 1
        && (family.father_siblings.is_empty() || family.mother_siblings.is_empty());
    if spread {
        (-slot / 2.0, 1.5 * slot)
    } else {
        (0.0, slot)
    }
}

/// Couple lefts of one generation: consecutive members sharing a child.
fn couples(generation: &[Member<'_>]) -> Vec<(usize, std::ops::Range<usize>)> {
    let mut out: Vec<(usize, std::ops::Range<usize>)> = Vec::new();
    for (index, member) in generation.iter().enumerate() {
        let same_child = out.last().is_some_and(|(child, _)| *child == member.child);
        if let (true, Some((_, range))) = (same_child, out.last_mut()) {
            range.end = index + 1;
        } else {
            out.push((member.child, index..index + 1));
        }
    }
    out
}

/// Pushes couples of one generation apart, two slots per couple.
fn sweep(lefts: &mut [f32], lineages: &[Lineage], slot: f32) {
    let split = lineages
        .iter()
        .position(|lineage| *lineage == Lineage::Maternal)
        .unwrap_or(lineages.len());
    let (paternal, maternal) = lefts.split_at_mut(split);
    for i in (0..paternal.len().saturating_sub(1)).rev() {
        paternal[i] = paternal[i].min(paternal[i + 1] - 2.0 * slot);
    }
    for i in 1..maternal.len() {
        maternal[i] = maternal[i].max(maternal[i - 1] + 2.0 * slot);
    }
    if let (Some(last), Some(first)) = (paternal.last().copied(), maternal.first().copied()) {
        let overlap = last + 2.0 * slot - first;
        if overlap > 0.0 {
            for left in paternal.iter_mut() {
                *left -= overlap;
            }
        }
    }
}

/// The relative one generation below a couple.
struct Child<'a> {
    at: Point,
    data: &'a PersonData,
    /// A sibship row already passes above this child.
    has_cohort: bool,
}

/// Stacks up to `depth` generations of ancestors above the proband.
pub fn ancestors(
    family: &Family,
    proband_left: f32,
    anchors: &AncestorAnchors,
    depth: usize,
    config: &PedigreeConfig,
) -> AncestorRun {
    let slot = config.slot();
    let generation = config.generation();
    let mut generations = build_generations(family, depth);

    for level in 0..generations.len() {
        let (below, rest) = generations.split_at_mut(level);
        let current = &mut rest[0];
        if level == 0 {
            for member in current.iter_mut() {
                member.left = match member.role {
                    Role::Father => anchors.father_left,
                    Role::Mother => anchors.mother_left,
                };
            }
            continue;
        }
        let children = &below[level - 1];
        let groups = couples(current);
        let mut lefts: Vec<f32> = groups
            .iter()
            .map(|(child, _)| {
                let child = &children[*child];
                let centered = child.left - slot / 2.0;
                match (level, child.lineage) {
                    (1, Lineage::Paternal) => anchors.father_offset.unwrap_or(centered),
                    (1, Lineage::Maternal) => anchors.mother_offset.unwrap_or(centered),
                    _ => centered,
                }
            })
            .collect();
        let lineages: Vec<Lineage> = groups
            .iter()
            .map(|(child, _)| children[*child].lineage)
            .collect();
        sweep(&mut lefts, &lineages, slot);
        for ((_, range), couple_left) in groups.into_iter().zip(lefts) {
            for member in &mut current[range] {
                member.left = match member.role {
                    Role::Father => couple_left,
                    Role::Mother => couple_left + slot,
                };
            }
        }
    }

    let mut block = Block::default();
    for (level, current) in generations.iter().enumerate() {
        let top = -((level + 1) as f32) * generation;
        block.elements.extend(current.iter().map(|member| {
            PositionedElement::new(Point::new(member.left, top), member.node.data.clone())
        }));
        for (child, range) in couples(current) {
            let child = if level == 0 {
                Child {
                    at: Point::new(proband_left, 0.0),
                    data: &family.pedigree.data,
                    has_cohort: !family.siblings1.is_empty() || !family.siblings2.is_empty(),
                }
            } else {
                let member = &generations[level - 1][child];
                Child {
                    at: Point::new(member.left, top + generation),
                    data: &member.node.data,
                    has_cohort: level == 1
                        && match member.role {
                            Role::Father => !family.father_siblings.is_empty(),
                            Role::Mother => !family.mother_siblings.is_empty(),
                        },
                }
            };
            couple_lines(&current[range], top, &child, level, &mut block.lines, config);
        }
    }

    debug!(
        generations = generations.len(),
        elements = block.elements.len(),
        "ancestors stacked"
    );
    AncestorRun {
        block,
        generations: generations.len(),
    }
}

fn couple_lines(
    couple: &[Member<'_>],
    top: f32,
    child: &Child<'_>,
    level: usize,
    lines: &mut Vec<LineSegment>,
    config: &PedigreeConfig,
) {
    let width = config.obj_width;
    let height = config.obj_height;
    let vspace = config.y_spacing;
    let father = couple.iter().find(|m| m.role == Role::Father);
    let mother = couple.iter().find(|m| m.role == Role::Mother);

    let drop = match (father, mother) {
        (Some(father), Some(mother)) => {
            let start = father.left + width;
            let len = mother.left - father.left - width;
            lines.push(LineSegment::horizontal(start, top + height / 2.0, len));
            if father.node.data.consanguinity || mother.node.data.consanguinity {
                lines.push(LineSegment::horizontal(start, top + height / 2.0 - 5.0, len + 2.0));
            }
            (father.left + mother.left) / 2.0 + width / 2.0
        }
        (Some(single), None) | (None, Some(single)) => single.left + width / 2.0,
        (None, None) => return,
    };
    lines.push(LineSegment::vertical(drop, top + height / 2.0, vspace + height / 2.0));

    // The proband's tick belongs to the orchestrator; a twin parent hangs
    // from its cohort bracket.
    if level > 0 && !(level == 1 && child.data.twin) {
        lines.push(LineSegment::vertical(
            child.at.left + width / 2.0,
            child.at.top - vspace,
            vspace + height / 2.0,
        ));
    }

    let center = child.at.left + width / 2.0;
    if !child.has_cohort && drop != center {
        lines.push(LineSegment::horizontal(
            drop.min(center),
            child.at.top - vspace,
            (center - drop).abs(),
        ));
    }
}
