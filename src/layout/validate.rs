use std::collections::HashSet;

use super::error::LayoutError;
use crate::ir::{Family, PersonData, RelationNode, Spouse};

/// Rejects inputs that cannot be laid out. Nothing is positioned until this
/// passes.
pub fn validate(family: &Family, depth: i32) -> Result<(), LayoutError> {
    if depth < 1 {
        return Err(LayoutError::NegativeDepth { depth });
    }

    check_node(&family.pedigree, "$.pedigree")?;
    for (key, row) in [
        ("siblings1", &family.siblings1),
        ("siblings2", &family.siblings2),
        ("fatherSiblings", &family.father_siblings),
        ("motherSiblings", &family.mother_siblings),
    ] {
        for (index, node) in row.iter().enumerate() {
            check_node(node, &format!("$.{key}[{index}]"))?;
        }
    }
    let (father, father_path) = parent_with_path(
        family.father.as_deref(),
        family.pedigree.father.as_deref(),
        "father",
    );
    let (mother, mother_path) = parent_with_path(
        family.mother.as_deref(),
        family.pedigree.mother.as_deref(),
        "mother",
    );
    for (parent, path) in [(father, &father_path), (mother, &mother_path)] {
        if let Some(parent) = parent {
            check_node(parent, path)?;
        }
    }

    check_ancestry(
        family,
        depth as usize,
        (father, father_path.as_str()),
        (mother, mother_path.as_str()),
    )?;
    check_cohort_twins(family, &father_path, &mother_path)
}

fn parent_with_path<'a>(
    top_level: Option<&'a RelationNode>,
    nested: Option<&'a RelationNode>,
    key: &str,
) -> (Option<&'a RelationNode>, String) {
    match (top_level, nested) {
        (Some(node), _) => (Some(node), format!("$.{key}")),
        (None, Some(node)) => (Some(node), format!("$.pedigree.{key}")),
        (None, None) => (None, format!("$.{key}")),
    }
}

fn invalid(path: String, reason: &str) -> LayoutError {
    LayoutError::InvalidRelationShape {
        path,
        reason: reason.to_string(),
    }
}

/// Structural checks over a node, its descendants and its ancestors.
fn check_node(node: &RelationNode, path: &str) -> Result<(), LayoutError> {
    if let Some(spouses) = &node.spouses {
        check_spouses(spouses, &format!("{path}.spouses"))?;
    }
    if let Some(father) = &node.father {
        check_node(father, &format!("{path}.father"))?;
    }
    if let Some(mother) = &node.mother {
        check_node(mother, &format!("{path}.mother"))?;
    }
    Ok(())
}

fn check_spouses(spouses: &[Spouse], path: &str) -> Result<(), LayoutError> {
    if spouses.is_empty() {
        return Err(invalid(path.to_string(), "spouses must not be an empty list"));
    }
    for (index, spouse) in spouses.iter().enumerate() {
        let spouse_path = format!("{path}[{index}]");
        if let Some(children) = &spouse.children {
            let children_path = format!("{spouse_path}.children");
            if children.is_empty() {
                return Err(invalid(children_path, "children must not be an empty list"));
            }
            let row: Vec<&PersonData> = children.iter().map(|child| &child.data).collect();
            if let Some(lonely) = lonely_twins(&row).first() {
                return Err(LayoutError::InconsistentTwinPair {
                    path: format!("{children_path}[{lonely}]"),
                });
            }
            for (child_index, child) in children.iter().enumerate() {
                check_node(child, &format!("{children_path}[{child_index}]"))?;
            }
        }
        if let Some(others) = &spouse.spouses {
            check_spouses(others, &format!("{spouse_path}.spouses"))?;
        }
    }
    Ok(())
}

/// Indices of twin-flagged members with no twin right next to them.
fn lonely_twins(row: &[&PersonData]) -> Vec<usize> {
    (0..row.len())
        .filter(|&i| row[i].twin)
        .filter(|&i| {
            let before = i > 0 && row[i - 1].twin;
            let after = i + 1 < row.len() && row[i + 1].twin;
            !before && !after
        })
        .collect()
}

fn check_cohort_twins(
    family: &Family,
    father_path: &str,
    mother_path: &str,
) -> Result<(), LayoutError> {
    let proband = &family.pedigree.data;
    let mut proband_paired = !proband.twin;
    for (key, siblings) in [("siblings1", &family.siblings1), ("siblings2", &family.siblings2)] {
        let row: Vec<&PersonData> = std::iter::once(proband)
            .chain(siblings.iter().map(|s| &s.data))
            .collect();
        let lonely = lonely_twins(&row);
        if let Some(index) = lonely.iter().find(|&&i| i > 0) {
            return Err(LayoutError::InconsistentTwinPair {
                path: format!("$.{key}[{}]", index - 1),
            });
        }
        proband_paired |= !lonely.contains(&0);
    }
    if !proband_paired {
        return Err(LayoutError::InconsistentTwinPair {
            path: "$.pedigree".to_string(),
        });
    }

    for (parent, path, key, siblings) in [
        (family.father(), father_path, "fatherSiblings", &family.father_siblings),
        (family.mother(), mother_path, "motherSiblings", &family.mother_siblings),
    ] {
        let mut row: Vec<&PersonData> = Vec::with_capacity(siblings.len() + 1);
        row.extend(parent.map(|p| &p.data));
        let offset = row.len();
        row.extend(siblings.iter().map(|s| &s.data));
        if let Some(&index) = lonely_twins(&row).first() {
            let path = if index < offset {
                path.to_string()
            } else {
                format!("$.{key}[{}]", index - offset)
            };
            return Err(LayoutError::InconsistentTwinPair { path });
        }
    }
    Ok(())
}

/// An `id` may not reappear among its own ancestors within `depth`
/// generations.
fn check_ancestry(
    family: &Family,
    depth: usize,
    father: (Option<&RelationNode>, &str),
    mother: (Option<&RelationNode>, &str),
) -> Result<(), LayoutError> {
    let mut lineage = HashSet::new();
    if let Some(id) = family.pedigree.data.id.as_deref() {
        lineage.insert(id);
    }
    for (parent, path) in [father, mother] {
        if let Some(parent) = parent {
            walk_ancestry(parent, path.to_string(), 1, depth, &mut lineage)?;
        }
    }
    Ok(())
}

fn walk_ancestry<'a>(
    node: &'a RelationNode,
    path: String,
    generation: usize,
    depth: usize,
    lineage: &mut HashSet<&'a str>,
) -> Result<(), LayoutError> {
    if generation > depth {
        return Ok(());
    }
    let id = node.data.id.as_deref();
    if let Some(id) = id {
        if !lineage.insert(id) {
            return Err(LayoutError::CyclicAncestry {
                path,
                id: id.to_string(),
            });
        }
    }
    if let Some(father) = node.father.as_deref() {
        walk_ancestry(father, format!("{path}.father"), generation + 1, depth, lineage)?;
    }
    if let Some(mother) = node.mother.as_deref() {
        walk_ancestry(mother, format!("{path}.mother"), generation + 1, depth, lineage)?;
    }
    if let Some(id) = id {
        lineage.remove(id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Gender;

    fn person(name: &str, gender: Gender) -> RelationNode {
        RelationNode::new(PersonData::new(name, gender))
    }

    fn with_id(name: &str, id: &str) -> RelationNode {
        let mut node = person(name, Gender::Male);
        node.data.id = Some(id.to_string());
        node
    }

    fn twin(name: &str) -> RelationNode {
        let mut node = person(name, Gender::Female);
        node.data.twin = true;
        node
    }

    #[test]
    fn rejects_depth_below_one() {
        let family = Family::new(person("Me", Gender::Male));
        assert_eq!(validate(&family, 0), Err(LayoutError::NegativeDepth { depth: 0 }));
        assert!(validate(&family, 1).is_ok());
    }

    #[test]
    fn rejects_empty_children_list() {
        let mut spouse = Spouse::new(PersonData::new("Wife", Gender::Female));
        spouse.children = Some(Vec::new());
        let family = Family::new(person("Me", Gender::Male).with_spouse(spouse));
        let err = validate(&family, 3).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidRelationShape {
                path: "$.pedigree.spouses[0].children".to_string(),
                reason: "children must not be an empty list".to_string(),
            }
        );
    }

    #[test]
    fn rejects_empty_spouses_list_on_a_sibling() {
        let mut brother = person("Brother", Gender::Male);
        brother.spouses = Some(Vec::new());
        let mut family = Family::new(person("Me", Gender::Male));
        family.siblings2.push(brother);
        let err = validate(&family, 3).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidRelationShape { path, .. } if path == "$.siblings2[0].spouses"
        ));
    }

    #[test]
    fn detects_an_id_among_its_own_ancestors() {
        let grandfather = with_id("Grandfather", "me");
        let father = with_id("Father", "f").with_parents(Some(grandfather), None);
        let family = Family::new(with_id("Me", "me").with_parents(Some(father), None));
        let err = validate(&family, 3).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CyclicAncestry {
                path: "$.pedigree.father.father".to_string(),
                id: "me".to_string(),
            }
        );
        // beyond the requested depth the repeat is never visited
        assert!(validate(&family, 1).is_ok());
    }

    #[test]
    fn shared_ancestors_on_both_sides_are_not_cycles() {
        let father = with_id("Father", "f").with_parents(Some(with_id("Grandfather", "g")), None);
        let mother = with_id("Mother", "m").with_parents(Some(with_id("Grandfather", "g")), None);
        let family = Family::new(with_id("Me", "me").with_parents(Some(father), Some(mother)));
        assert!(validate(&family, 3).is_ok());
    }

    #[test]
    fn lone_twin_child_is_rejected() {
        let spouse = Spouse::new(PersonData::new("Wife", Gender::Female))
            .with_child(twin("A"))
            .with_child(person("B", Gender::Male));
        let family = Family::new(person("Me", Gender::Male).with_spouse(spouse));
        let err = validate(&family, 3).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InconsistentTwinPair {
                path: "$.pedigree.spouses[0].children[0]".to_string(),
            }
        );
    }

    #[test]
    fn proband_may_pair_with_either_cohort() {
        let mut family = Family::new(twin("Me"));
        family.siblings1.push(person("Older", Gender::Male));
        family.siblings2.push(twin("Twin"));
        assert!(validate(&family, 3).is_ok());

        family.siblings2[0].data.twin = false;
        let err = validate(&family, 3).unwrap_err();
        assert_eq!(err, LayoutError::InconsistentTwinPair { path: "$.pedigree".to_string() });
    }

    #[test]
    fn twin_parent_needs_a_twin_sibling() {
        let mut family = Family::new(person("Me", Gender::Male));
        family.father = Some(Box::new(twin("Father")));
        family.father_siblings.push(person("Uncle", Gender::Male));
        let err = validate(&family, 3).unwrap_err();
        assert_eq!(err, LayoutError::InconsistentTwinPair { path: "$.father".to_string() });

        family.father_siblings.insert(0, twin("Twin uncle"));
        assert!(validate(&family, 3).is_ok());
    }
}
