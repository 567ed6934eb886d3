use crate::config::{GaugeConfig, offset_table_entries};
use crate::drag::GaugeState;
use crate::layout::{GaugeLayout, Primitive};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump<'a> {
    pub bound: f64,
    pub quantization_step: f64,
    pub group_tolerance: f64,
    pub state: &'a GaugeState,
    pub label_offsets: BTreeMap<String, f64>,
    pub paint_order: Vec<&'static str>,
    pub layout: &'a GaugeLayout,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a GaugeLayout, state: &'a GaugeState, config: &GaugeConfig) -> Self {
        let paint_order = layout
            .primitives()
            .iter()
            .map(|p| match p {
                Primitive::Arc(_) => "arc",
                Primitive::Tick(_) => "tick",
                Primitive::Marker(_) => "marker",
                Primitive::Label(_) => "label",
                Primitive::Needle(_) => "needle",
                Primitive::Readout(_) => "readout",
            })
            .collect();
        Self {
            bound: config.bound,
            quantization_step: config.quantization_step,
            group_tolerance: config.group_tolerance(),
            state,
            label_offsets: offset_table_entries(&config.labels.offsets),
            paint_order,
            layout,
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn write_layout_dump(path: &Path, dump: &LayoutDump<'_>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}
