//! Compiled per-patch classification tables.
//!
//! The descriptor is immutable per patch type, so all filtering and
//! classification happens exactly once. The result is an explicit value that
//! node instances share by reference instead of hidden per-type statics.

use crate::classify::{
    is_bool_param, is_float_param, is_input_param, is_int_param, is_output_param,
};
use crate::descriptor::{ParameterDesc, PatchDescriptor};
use crate::error::{Result, SchemaError};
use crate::tag::MessageTag;
use crate::{DataRefIndex, ParameterIndex};

use std::collections::HashSet;

/// Value category of a numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
}

/// One classified numeric parameter.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub index: ParameterIndex,
    pub name: String,
    pub display_name: String,
    /// Stable parameter id, surfaced as the tooltip.
    pub tooltip: String,
    pub initial_value: f32,
    pub kind: ParamKind,
}

/// One message port, keyed by its tag handle.
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub tag: MessageTag,
    pub name: String,
    pub display_name: String,
    pub tooltip: String,
}

/// One signal inlet or outlet.
#[derive(Debug, Clone)]
pub struct SignalInfo {
    pub name: String,
    pub display_name: String,
    pub tooltip: String,
}

/// One supported external data reference, in engine slot order.
#[derive(Debug, Clone)]
pub struct ExternalDataDesc {
    pub slot: DataRefIndex,
    pub id: String,
    pub display_name: String,
}

/// All tables the bridge consumes, computed once per patch type.
#[derive(Debug, Clone)]
pub struct CompiledPatch {
    class_name: String,
    display_name: String,

    input_floats: Vec<ParamInfo>,
    input_ints: Vec<ParamInfo>,
    input_bools: Vec<ParamInfo>,
    output_floats: Vec<ParamInfo>,
    output_ints: Vec<ParamInfo>,
    output_bools: Vec<ParamInfo>,

    inports: Vec<PortInfo>,
    outports: Vec<PortInfo>,

    audio_inputs: Vec<SignalInfo>,
    audio_outputs: Vec<SignalInfo>,

    external_data: Vec<ExternalDataDesc>,

    midi_in: bool,
    midi_out: bool,
    transport: bool,
}

impl CompiledPatch {
    /// Classify every declared parameter and port of `desc`.
    pub fn compile(desc: &PatchDescriptor) -> Result<Self> {
        let mut seen_indices = HashSet::new();

        let mut input_floats = Vec::new();
        let mut input_ints = Vec::new();
        let mut input_bools = Vec::new();
        let mut output_floats = Vec::new();
        let mut output_ints = Vec::new();
        let mut output_bools = Vec::new();

        for p in numeric_visible(desc) {
            if !seen_indices.insert(p.index) {
                return Err(SchemaError::DuplicateParameterIndex(p.index));
            }
            let kind = if is_bool_param(p) {
                ParamKind::Bool
            } else if is_int_param(p) {
                ParamKind::Int
            } else {
                ParamKind::Float
            };
            let info = ParamInfo {
                index: p.index,
                name: p.name.clone(),
                display_name: p.effective_display_name().to_string(),
                tooltip: p.param_id.clone(),
                initial_value: p.initial_value,
                kind,
            };
            if is_input_param(p) {
                match kind {
                    ParamKind::Bool => input_bools.push(info.clone()),
                    ParamKind::Int => input_ints.push(info.clone()),
                    ParamKind::Float => input_floats.push(info.clone()),
                }
            }
            if is_output_param(p) {
                match kind {
                    ParamKind::Bool => output_bools.push(info),
                    ParamKind::Int => output_ints.push(info),
                    ParamKind::Float => output_floats.push(info),
                }
            }
        }

        let inports = compile_ports(&desc.inports)?;
        let outports = compile_ports(&desc.outports)?;

        let signals = |entries: &[crate::descriptor::SignalDesc]| -> Vec<SignalInfo> {
            entries
                .iter()
                .filter(|s| s.is_signal())
                .map(|s| SignalInfo {
                    name: s.tag.clone(),
                    display_name: s.effective_display_name().to_string(),
                    tooltip: s.effective_tooltip().to_string(),
                })
                .collect()
        };
        let audio_inputs = signals(&desc.inlets);
        let audio_outputs = signals(&desc.outlets);

        // Slot indices count every declared ref, supported or not, so they
        // stay aligned with the engine's own numbering.
        let external_data = desc
            .external_data_refs
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_buffer())
            .map(|(slot, r)| ExternalDataDesc {
                slot,
                id: r.id.clone(),
                display_name: r.id.clone(),
            })
            .collect();

        let display_name = {
            let name = desc.meta.name.as_str();
            if name.is_empty() || name == "untitled" {
                desc.meta.objname.clone()
            } else {
                name.to_string()
            }
        };

        Ok(Self {
            class_name: desc.meta.objname.clone(),
            display_name,
            input_floats,
            input_ints,
            input_bools,
            output_floats,
            output_ints,
            output_bools,
            inports,
            outports,
            audio_inputs,
            audio_outputs,
            external_data,
            midi_in: desc.num_midi_input_ports > 0,
            midi_out: desc.num_midi_output_ports > 0,
            transport: desc.transport_used.unwrap_or(true),
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn input_floats(&self) -> &[ParamInfo] {
        &self.input_floats
    }

    pub fn input_ints(&self) -> &[ParamInfo] {
        &self.input_ints
    }

    pub fn input_bools(&self) -> &[ParamInfo] {
        &self.input_bools
    }

    pub fn output_floats(&self) -> &[ParamInfo] {
        &self.output_floats
    }

    pub fn output_ints(&self) -> &[ParamInfo] {
        &self.output_ints
    }

    pub fn output_bools(&self) -> &[ParamInfo] {
        &self.output_bools
    }

    pub fn inports(&self) -> &[PortInfo] {
        &self.inports
    }

    pub fn outports(&self) -> &[PortInfo] {
        &self.outports
    }

    pub fn audio_inputs(&self) -> &[SignalInfo] {
        &self.audio_inputs
    }

    pub fn audio_outputs(&self) -> &[SignalInfo] {
        &self.audio_outputs
    }

    pub fn external_data(&self) -> &[ExternalDataDesc] {
        &self.external_data
    }

    pub fn has_midi_in(&self) -> bool {
        self.midi_in
    }

    pub fn has_midi_out(&self) -> bool {
        self.midi_out
    }

    pub fn has_transport(&self) -> bool {
        self.transport
    }
}

/// Tags must be unique within a port list (they key the dispatch tables).
fn compile_ports(entries: &[crate::descriptor::PortDesc]) -> Result<Vec<PortInfo>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(entries.len());
    for p in entries {
        if !seen.insert(p.tag.as_str()) {
            return Err(SchemaError::DuplicatePortTag(p.tag.clone()));
        }
        out.push(PortInfo {
            tag: MessageTag::from_str(&p.tag),
            name: p.tag.clone(),
            display_name: p.tag.clone(),
            tooltip: p.tag.clone(),
        });
    }
    Ok(out)
}

fn numeric_visible(desc: &PatchDescriptor) -> impl Iterator<Item = &ParameterDesc> {
    desc.parameters
        .iter()
        .filter(|p| p.is_numeric() && p.is_visible())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> PatchDescriptor {
        PatchDescriptor::from_json(
            r#"{
            "meta": {"objname": "synthpatch", "name": "untitled"},
            "parameters": [
                {"type": "ParameterTypeNumber", "index": 0, "name": "cutoff",
                 "paramId": "p-cutoff", "initialValue": 1000.0},
                {"type": "ParameterTypeNumber", "index": 1, "name": "mode",
                 "steps": 3, "isEnum": true,
                 "enumValues": [0.0, 1.0, 2.0]},
                {"type": "ParameterTypeNumber", "index": 2, "name": "bypass",
                 "steps": 2, "isEnum": true, "enumValues": [0.0, 1.0]},
                {"type": "ParameterTypeNumber", "index": 3, "name": "env",
                 "meta": {"in": false, "out": true}},
                {"type": "ParameterTypeNumber", "index": 4, "name": "hidden",
                 "visible": false},
                {"type": "ParameterTypeBang", "index": 5, "name": "not-numeric"}
            ],
            "inlets": [
                {"type": "signal", "tag": "in1"},
                {"type": "event", "tag": "ctl"}
            ],
            "outlets": [{"type": "signal", "tag": "out1"}],
            "inports": [{"tag": "go"}],
            "outports": [{"tag": "done"}],
            "externalDataRefs": [
                {"id": "sample", "tag": "buffer~"},
                {"id": "lookup", "tag": "table~"}
            ],
            "numMidiInputPorts": 1,
            "numMidiOutputPorts": 0
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn tables_are_filtered_and_classified() {
        let patch = CompiledPatch::compile(&descriptor()).unwrap();

        assert_eq!(patch.input_floats().len(), 1);
        assert_eq!(patch.input_floats()[0].name, "cutoff");
        assert_eq!(patch.input_ints().len(), 1);
        assert_eq!(patch.input_bools().len(), 1);
        assert_eq!(patch.output_floats().len(), 1);
        assert_eq!(patch.output_floats()[0].name, "env");
        assert!(patch.output_ints().is_empty());

        // hidden + non-numeric parameters appear nowhere
        let all: Vec<_> = patch
            .input_floats()
            .iter()
            .chain(patch.input_ints())
            .chain(patch.input_bools())
            .chain(patch.output_floats())
            .map(|p| p.name.as_str())
            .collect();
        assert!(!all.contains(&"hidden"));
        assert!(!all.contains(&"not-numeric"));
    }

    #[test]
    fn output_param_is_not_an_input() {
        let patch = CompiledPatch::compile(&descriptor()).unwrap();
        assert!(patch.input_floats().iter().all(|p| p.name != "env"));
    }

    #[test]
    fn non_signal_inlets_are_skipped() {
        let patch = CompiledPatch::compile(&descriptor()).unwrap();
        assert_eq!(patch.audio_inputs().len(), 1);
        assert_eq!(patch.audio_outputs().len(), 1);
    }

    #[test]
    fn only_buffer_refs_are_kept_with_engine_slots() {
        let patch = CompiledPatch::compile(&descriptor()).unwrap();
        assert_eq!(patch.external_data().len(), 1);
        assert_eq!(patch.external_data()[0].id, "sample");
        assert_eq!(patch.external_data()[0].slot, 0);
    }

    #[test]
    fn capability_flags() {
        let patch = CompiledPatch::compile(&descriptor()).unwrap();
        assert!(patch.has_midi_in());
        assert!(!patch.has_midi_out());
        assert!(patch.has_transport());
    }

    #[test]
    fn untitled_display_name_falls_back_to_class_name() {
        let patch = CompiledPatch::compile(&descriptor()).unwrap();
        assert_eq!(patch.display_name(), "synthpatch");
    }

    #[test]
    fn duplicate_indices_are_rejected() {
        let desc = PatchDescriptor::from_json(
            r#"{"parameters": [
                {"type": "ParameterTypeNumber", "index": 0, "name": "a"},
                {"type": "ParameterTypeNumber", "index": 0, "name": "b"}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(
            CompiledPatch::compile(&desc),
            Err(SchemaError::DuplicateParameterIndex(0))
        ));
    }

    #[test]
    fn explicit_transport_false_disables_transport() {
        let desc = PatchDescriptor::from_json(r#"{"transportUsed": false}"#).unwrap();
        let patch = CompiledPatch::compile(&desc).unwrap();
        assert!(!patch.has_transport());
    }
}
