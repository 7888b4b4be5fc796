#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{PedigreeConfig, load_config, parse_config};
pub use ir::{Family, Gender, PersonData, RelationNode, Spouse, Zygosity, parse_family};
pub use layout::{
    LayoutError, LineSegment, Orientation, PedigreeLayout, PositionedElement, compute_layout,
    layout_from_str, normalize,
};
pub use layout_dump::{LayoutDump, write_layout_dump};
