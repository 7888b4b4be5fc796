//! Pre-order traversal over prepared trees.
//!
//! Every individual is visited before its descendants, partners in order,
//! children in order within a partner. Partners are not visited as nodes;
//! they travel with the node they belong to.

use super::types::PreparedNode;

pub trait Visitor {
    fn visit(&mut self, node: &mut PreparedNode);
}

impl<F> Visitor for F
where
    F: FnMut(&mut PreparedNode),
{
    fn visit(&mut self, node: &mut PreparedNode) {
        self(node)
    }
}

/// Consumes `node`, applies `visitor` to every node in pre-order and returns
/// the transformed tree.
pub fn walk<V: Visitor + ?Sized>(mut node: PreparedNode, visitor: &mut V) -> PreparedNode {
    visitor.visit(&mut node);
    for spouse in &mut node.spouses {
        let children = std::mem::take(&mut spouse.children);
        spouse.children = children
            .into_iter()
            .map(|child| walk(child, visitor))
            .collect();
    }
    node
}

/// Borrowing pre-order listing, same order as [`walk`].
pub fn preorder(node: &PreparedNode) -> Vec<&PreparedNode> {
    let mut out = Vec::new();
    collect(node, &mut out);
    out
}

fn collect<'a>(node: &'a PreparedNode, out: &mut Vec<&'a PreparedNode>) {
    out.push(node);
    for spouse in &node.spouses {
        for child in &spouse.children {
            collect(child, out);
        }
    }
}

/// Shifts every node by a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct Translate {
    pub dx: f32,
    pub dy: f32,
}

impl Visitor for Translate {
    fn visit(&mut self, node: &mut PreparedNode) {
        node.left += self.dx;
        node.top += self.dy;
    }
}

/// Moves every node from the left edge of its footprint to its middle.
#[derive(Debug, Clone, Copy)]
pub struct CenterOnFootprint {
    pub slot: f32,
}

impl Visitor for CenterOnFootprint {
    fn visit(&mut self, node: &mut PreparedNode) {
        node.left += self.slot * node.max_width as f32 / 2.0;
    }
}
