use crate::config::PedigreeConfig;
use crate::layout::{LineSegment, PedigreeLayout, PositionedElement};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Serialized form of a layout: the renderer contract plus the geometry
/// it was computed with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump<'a> {
    pub width: f32,
    pub height: f32,
    pub overflow: bool,
    pub geometry: GeometryDump,
    pub data: &'a [PositionedElement],
    pub lines: &'a [LineSegment],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryDump {
    pub obj_width: f32,
    pub obj_height: f32,
    pub obj_radius: f32,
    pub x_spacing: f32,
    pub y_spacing: f32,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a PedigreeLayout, config: &PedigreeConfig) -> Self {
        LayoutDump {
            width: layout.width,
            height: layout.height,
            overflow: layout.overflow,
            geometry: GeometryDump {
                obj_width: config.obj_width,
                obj_height: config.obj_height,
                obj_radius: config.obj_radius,
                x_spacing: config.x_spacing,
                y_spacing: config.y_spacing,
            },
            data: &layout.data,
            lines: &layout.lines,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &PedigreeLayout,
    config: &PedigreeConfig,
    pretty: bool,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, config);
    if pretty {
        serde_json::to_writer_pretty(writer, &dump)?;
    } else {
        serde_json::to_writer(writer, &dump)?;
    }
    Ok(())
}
