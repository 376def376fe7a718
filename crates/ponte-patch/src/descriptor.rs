//! Serde model of the patch description document.
//!
//! The description is generated alongside the patch and is immutable for the
//! lifetime of the patch type. Only the fields introspection needs are
//! modeled; unknown fields are ignored so newer descriptor revisions keep
//! parsing.

use serde::Deserialize;
use serde_json::Value;

/// Top-level patch description.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PatchDescriptor {
    pub meta: PatchMeta,
    pub parameters: Vec<ParameterDesc>,
    pub inlets: Vec<SignalDesc>,
    pub outlets: Vec<SignalDesc>,
    pub inports: Vec<PortDesc>,
    pub outports: Vec<PortDesc>,
    pub external_data_refs: Vec<ExternalDataRefDesc>,
    pub num_midi_input_ports: u32,
    pub num_midi_output_ports: u32,
    /// Absent means the patch may use transport; only an explicit `false`
    /// drops the transport input.
    pub transport_used: Option<bool>,
}

impl PatchDescriptor {
    /// Parse a descriptor from its JSON source.
    pub fn from_json(source: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Patch-level metadata.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PatchMeta {
    /// Stable class name of the patch.
    pub objname: String,
    /// Human-facing name; may be empty or a placeholder.
    pub name: String,
}

/// One declared numeric parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDesc {
    #[serde(rename = "type")]
    pub kind: String,
    pub index: usize,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub param_id: String,
    #[serde(default)]
    pub initial_value: f32,
    #[serde(default)]
    pub steps: u32,
    /// Enumerated values when the parameter is step-shaped. Entries may be
    /// numbers or display strings, so they stay untyped here.
    #[serde(default)]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default)]
    pub is_enum: bool,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub meta: Option<ParamMeta>,
}

impl ParameterDesc {
    /// Numeric parameters are the only kind the bridge exposes.
    pub fn is_numeric(&self) -> bool {
        self.kind == "ParameterTypeNumber"
    }

    /// Parameters default to visible; only an explicit `false` hides them.
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    /// Display name, falling back to the parameter name when empty.
    pub fn effective_display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Free-form parameter metadata; only direction flags are interpreted.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ParamMeta {
    #[serde(rename = "in")]
    pub input: Option<bool>,
    #[serde(rename = "out")]
    pub output: Option<bool>,
}

/// One signal inlet or outlet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDesc {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub tag: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub meta: Option<SignalMeta>,
}

impl SignalDesc {
    pub fn is_signal(&self) -> bool {
        self.kind == "signal"
    }

    /// Display name precedence: `meta.displayname`, then `comment`, then tag.
    pub fn effective_display_name(&self) -> &str {
        if let Some(meta) = &self.meta {
            if let Some(name) = &meta.displayname {
                return name;
            }
        }
        self.comment.as_deref().unwrap_or(&self.tag)
    }

    pub fn effective_tooltip(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m.tooltip.as_deref())
            .unwrap_or(&self.tag)
    }
}

/// Display metadata on signal ports.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SignalMeta {
    pub displayname: Option<String>,
    pub tooltip: Option<String>,
}

/// One message port (inport or outport).
#[derive(Debug, Clone, Deserialize)]
pub struct PortDesc {
    pub tag: String,
    #[serde(default)]
    pub meta: Option<Value>,
}

/// One declared external data reference.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalDataRefDesc {
    pub id: String,
    /// Object kind backing the reference; only sample buffers are supported.
    #[serde(default)]
    pub tag: Option<String>,
}

impl ExternalDataRefDesc {
    /// Only buffer-typed references get a loader; everything else is skipped.
    pub fn is_buffer(&self) -> bool {
        match &self.tag {
            Some(tag) => tag == "buffer~",
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_descriptor() {
        let desc = PatchDescriptor::from_json(r#"{"meta": {"objname": "gain"}}"#).unwrap();
        assert_eq!(desc.meta.objname, "gain");
        assert!(desc.parameters.is_empty());
        assert_eq!(desc.num_midi_input_ports, 0);
        assert_eq!(desc.transport_used, None);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{
            "meta": {"objname": "fx", "name": "FX", "extra": 1},
            "parameters": [{
                "type": "ParameterTypeNumber",
                "index": 0,
                "name": "drive",
                "displayName": "",
                "paramId": "p-0",
                "initialValue": 0.5,
                "steps": 0,
                "isEnum": false,
                "somethingNew": true
            }],
            "futureSection": {}
        }"#;
        let desc = PatchDescriptor::from_json(json).unwrap();
        assert_eq!(desc.parameters.len(), 1);
        assert_eq!(desc.parameters[0].effective_display_name(), "drive");
    }

    #[test]
    fn signal_display_name_precedence() {
        let json = r#"{
            "inlets": [
                {"type": "signal", "tag": "in1", "comment": "Left In"},
                {"type": "signal", "tag": "in2",
                 "comment": "ignored",
                 "meta": {"displayname": "Right In", "tooltip": "right channel"}}
            ]
        }"#;
        let desc = PatchDescriptor::from_json(json).unwrap();
        assert_eq!(desc.inlets[0].effective_display_name(), "Left In");
        assert_eq!(desc.inlets[1].effective_display_name(), "Right In");
        assert_eq!(desc.inlets[1].effective_tooltip(), "right channel");
    }

    #[test]
    fn non_buffer_data_refs_are_flagged() {
        let json = r#"{
            "externalDataRefs": [
                {"id": "samples", "tag": "buffer~"},
                {"id": "table", "tag": "table~"},
                {"id": "untagged"}
            ]
        }"#;
        let desc = PatchDescriptor::from_json(json).unwrap();
        assert!(desc.external_data_refs[0].is_buffer());
        assert!(!desc.external_data_refs[1].is_buffer());
        assert!(desc.external_data_refs[2].is_buffer());
    }
}
