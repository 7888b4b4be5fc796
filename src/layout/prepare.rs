use tracing::trace;

use super::types::{Placement, PreparedNode, PreparedSpouse, Relation};
use super::walk::{Translate, walk};
use crate::config::PedigreeConfig;
use crate::ir::{Gender, PersonData, RelationNode};

/// A spouse retained for layout, before its children are prepared.
struct Retained<'a> {
    data: &'a PersonData,
    children: &'a [RelationNode],
    placement: Placement,
}

/// Slot accumulators for one node: right-growing blocks (`Center`/`Right`)
/// and left-growing blocks (`Left`) are counted separately.
#[derive(Debug, Default, Clone, Copy)]
struct Extent {
    right: u32,
    left: u32,
}

impl Extent {
    /// Reserves `width` slots for a block and returns its first slot.
    fn reserve(self, placement: Placement, width: u32) -> (Self, f32) {
        if placement.grows_left() {
            let left = self.left + width;
            (Self { left, ..self }, -(left as f32))
        } else {
            (
                Self {
                    right: self.right + width,
                    ..self
                },
                self.right as f32,
            )
        }
    }
}

/// Converts a relation subtree into a width-annotated tree.
///
/// Coordinates in the result are relative to the root at `(0, 0)`: every
/// node sits at the left edge of its footprint, children one generation
/// below their parent.
pub fn prepare(node: &RelationNode, relation: Relation, config: &PedigreeConfig) -> PreparedNode {
    let retained = retain_spouses(node, relation);
    if retained.is_empty() {
        return PreparedNode::leaf(node.data.clone());
    }

    let mut extent = Extent::default();
    let mut spouses = Vec::with_capacity(retained.len());
    for (index, entry) in retained.into_iter().enumerate() {
        let children: Vec<PreparedNode> = entry
            .children
            .iter()
            .map(|child| prepare(child, Relation::Sibling, config))
            .collect();
        let width: u32 = if children.is_empty() {
            if index == 0 { 2 } else { 1 }
        } else {
            children.iter().map(|child| child.max_width).sum()
        };
        let (next, offset) = extent.reserve(entry.placement, width);
        extent = next;
        spouses.push(PreparedSpouse {
            data: entry.data.clone(),
            placement: entry.placement,
            children: place_block(children, offset, config),
            width,
            offset,
            position: None,
            display: entry.placement == Placement::Center,
        });
    }

    // A couple needs two slots even with a single child below it.
    if extent.right < 2 {
        let pad = (2 - extent.right) as f32 / 2.0;
        for spouse in spouses.iter_mut().filter(|s| !s.placement.grows_left()) {
            spouse.offset += pad;
            let children = std::mem::take(&mut spouse.children);
            spouse.children = children
                .into_iter()
                .map(|child| {
                    walk(
                        child,
                        &mut Translate {
                            dx: config.slot() * pad,
                            dy: 0.0,
                        },
                    )
                })
                .collect();
        }
    }

    let max_width = extent.right.max(2);
    trace!(
        name = node.data.display_name(),
        ?relation,
        max_width,
        left_slots = extent.left,
        "prepared node"
    );
    PreparedNode {
        left: 0.0,
        top: 0.0,
        max_width,
        data: node.data.clone(),
        spouses,
    }
}

/// Lays prepared children side by side starting at slot `offset`, one
/// generation down.
fn place_block(
    children: Vec<PreparedNode>,
    offset: f32,
    config: &PedigreeConfig,
) -> Vec<PreparedNode> {
    let mut running = 0u32;
    children
        .into_iter()
        .map(|child| {
            let width = child.max_width;
            let placed = walk(
                child,
                &mut Translate {
                    dx: config.slot() * (offset + running as f32),
                    dy: config.generation(),
                },
            );
            running += width;
            placed
        })
        .collect()
}

fn retain_spouses(node: &RelationNode, relation: Relation) -> Vec<Retained<'_>> {
    let spouses = node.spouses();
    let mut retained = Vec::with_capacity(spouses.len());
    match relation {
        Relation::Proband => {
            let current = spouses.iter().position(|s| s.current).unwrap_or(0);
            let Some(partner) = spouses.get(current) else {
                return retained;
            };
            retained.push(Retained {
                data: &partner.data,
                children: partner.children(),
                placement: Placement::Center,
            });
            let step_side = if partner.data.gender == Gender::Male {
                Placement::Left
            } else {
                Placement::Right
            };
            for step in partner.spouses() {
                retained.push(Retained {
                    data: &step.data,
                    children: step.children(),
                    placement: step_side,
                });
            }
            for (index, spouse) in spouses.iter().enumerate() {
                if index == current {
                    continue;
                }
                let placement = if spouse.children().is_empty() {
                    Placement::Center
                } else if spouse.data.gender == Gender::Female {
                    Placement::Left
                } else {
                    Placement::Right
                };
                retained.push(Retained {
                    data: &spouse.data,
                    children: spouse.children(),
                    placement,
                });
            }
        }
        Relation::HalfSibling => {
            let side = if node.data.gender == Gender::Male {
                Placement::Left
            } else {
                Placement::Right
            };
            for (index, spouse) in spouses.iter().enumerate() {
                let placement = if index == 0 || spouse.children().is_empty() {
                    Placement::Center
                } else {
                    side
                };
                retained.push(Retained {
                    data: &spouse.data,
                    children: spouse.children(),
                    placement,
                });
            }
        }
        Relation::Sibling => {
            for (index, spouse) in spouses.iter().enumerate() {
                if index > 0 && !spouse.children().is_empty() {
                    continue;
                }
                retained.push(Retained {
                    data: &spouse.data,
                    children: spouse.children(),
                    placement: Placement::Center,
                });
            }
        }
    }
    retained
}
