//! Input model: the relation tree handed over by the data layer.
//!
//! Flags are resolved to booleans once, while decoding. Data files in the
//! wild carry `"true"` strings, numbers and real booleans interchangeably.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::layout::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Zygosity of a twin pair, carried on the `twins` bracket for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zygosity {
    #[default]
    Unspecified,
    /// Drawn with a crossbar.
    Monozygotic,
    /// Drawn with a question mark.
    Unknown,
}

impl Zygosity {
    pub fn code(self) -> u8 {
        match self {
            Zygosity::Unspecified => 0,
            Zygosity::Monozygotic => 1,
            Zygosity::Unknown => 2,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Zygosity::Monozygotic,
            2 => Zygosity::Unknown,
            _ => Zygosity::Unspecified,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        *self == Zygosity::Unspecified
    }
}

impl Serialize for Zygosity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Zygosity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Number(f64),
            Text(String),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bool(true) => Zygosity::Monozygotic,
            Repr::Bool(false) => Zygosity::Unspecified,
            Repr::Number(n) if n.fract() == 0.0 && (0.0..=2.0).contains(&n) => {
                Zygosity::from_code(n as u8)
            }
            Repr::Number(_) => Zygosity::Unspecified,
            Repr::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "identical" | "monozygotic" => Zygosity::Monozygotic,
                "2" | "unknown" | "?" => Zygosity::Unknown,
                _ => Zygosity::Unspecified,
            },
        })
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Bool(bool),
        Number(f64),
        Text(String),
        Null(()),
    }
    Ok(match Repr::deserialize(deserializer)? {
        Repr::Bool(value) => value,
        Repr::Number(n) => n != 0.0,
        Repr::Text(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes"
        ),
        Repr::Null(()) => false,
    })
}

fn person_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Integer(i64),
    }
    Ok(Option::<Repr>::deserialize(deserializer)?.map(|id| match id {
        Repr::Text(text) => text,
        Repr::Integer(n) => n.to_string(),
    }))
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Descriptive record of one person.
///
/// Only `gender`, `twin`, `identical`, `consanguinity` and `id` influence
/// the geometry. Everything else is payload for the renderer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonData {
    #[serde(default, deserialize_with = "person_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub twin: bool,
    #[serde(default, skip_serializing_if = "Zygosity::is_unspecified")]
    pub identical: Zygosity,
    /// Marks the person the chart is drawn for.
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub current: bool,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub consanguinity: bool,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub deceased: bool,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub adopted: bool,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub divorced: bool,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub separated: bool,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub abortion: bool,
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub unborn: bool,
    /// Family history unknown.
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub fhxunknown: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PersonData {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: Some(name.into()),
            gender,
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("?")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationNode {
    pub data: PersonData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouses: Option<Vec<Spouse>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<Box<RelationNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<Box<RelationNode>>,
}

impl RelationNode {
    pub fn new(data: PersonData) -> Self {
        Self {
            data,
            spouses: None,
            father: None,
            mother: None,
        }
    }

    pub fn with_spouse(mut self, spouse: Spouse) -> Self {
        self.spouses.get_or_insert_with(Vec::new).push(spouse);
        self
    }

    pub fn with_parents(
        mut self,
        father: Option<RelationNode>,
        mother: Option<RelationNode>,
    ) -> Self {
        self.father = father.map(Box::new);
        self.mother = mother.map(Box::new);
        self
    }

    pub fn spouses(&self) -> &[Spouse] {
        self.spouses.as_deref().unwrap_or_default()
    }

    pub fn has_spouses(&self) -> bool {
        !self.spouses().is_empty()
    }

    pub fn has_parents(&self) -> bool {
        self.father.is_some() || self.mother.is_some()
    }

    /// True when any spouse of this node has children.
    pub fn has_descendants(&self) -> bool {
        self.spouses().iter().any(|spouse| !spouse.children().is_empty())
    }
}

/// A partner of an individual together with the children of that couple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spouse {
    pub data: PersonData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RelationNode>>,
    /// Marks the current relationship among several.
    #[serde(default, deserialize_with = "flag", skip_serializing_if = "is_false")]
    pub current: bool,
    /// Other relationships of this partner (step-family of the proband).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouses: Option<Vec<Spouse>>,
}

impl Spouse {
    pub fn new(data: PersonData) -> Self {
        Self {
            data,
            children: None,
            current: false,
            spouses: None,
        }
    }

    pub fn with_child(mut self, child: RelationNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn children(&self) -> &[RelationNode] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn spouses(&self) -> &[Spouse] {
        self.spouses.as_deref().unwrap_or_default()
    }
}

/// Top-level input: the proband plus the relatives laid out around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub pedigree: RelationNode,
    /// Full siblings drawn left of the proband.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub siblings1: Vec<RelationNode>,
    /// Full siblings drawn right of the proband.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub siblings2: Vec<RelationNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub father_siblings: Vec<RelationNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mother_siblings: Vec<RelationNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<Box<RelationNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<Box<RelationNode>>,
}

impl Family {
    pub fn new(pedigree: RelationNode) -> Self {
        Self {
            pedigree,
            siblings1: Vec::new(),
            siblings2: Vec::new(),
            father_siblings: Vec::new(),
            mother_siblings: Vec::new(),
            father: None,
            mother: None,
        }
    }

    pub fn father(&self) -> Option<&RelationNode> {
        self.father.as_deref().or(self.pedigree.father.as_deref())
    }

    pub fn mother(&self) -> Option<&RelationNode> {
        self.mother.as_deref().or(self.pedigree.mother.as_deref())
    }

    pub fn has_parents(&self) -> bool {
        self.father().is_some() || self.mother().is_some()
    }
}

/// Decodes a family from JSON, falling back to JSON5 for object-literal
/// style inputs (unquoted keys, trailing commas, comments).
pub fn parse_family(input: &str) -> Result<Family, LayoutError> {
    match serde_json::from_str::<Family>(input) {
        Ok(family) => Ok(family),
        Err(json_err) if json_err.is_syntax() || json_err.is_eof() => {
            json5::from_str::<Family>(input).map_err(|err| LayoutError::InvalidRelationShape {
                path: "$".to_string(),
                reason: err.to_string(),
            })
        }
        Err(json_err) => Err(LayoutError::InvalidRelationShape {
            path: "$".to_string(),
            reason: json_err.to_string(),
        }),
    }
}
