use serde::{Deserialize, Deserializer, Serialize};

/// JSON has no encoding for non-finite floats and `serde_json` writes them as
/// `null`. Reading `null` back as NaN keeps such a value from making the whole
/// catalog unreadable.
fn null_as_nan<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    #[serde(deserialize_with = "null_as_nan")]
    pub x: f32,
    #[serde(deserialize_with = "null_as_nan")]
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Screen-space placement of a control on its module panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WidgetBox {
    pub pos: Vec2,
    pub size: Vec2,
}

impl WidgetBox {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }
}

/// One parameter as exported to the catalog.
///
/// The display fields describe `displayed = base^raw * multiplier + offset`
/// (or the linear form when `display_base` is zero). They are stored as the
/// host reports them and never evaluated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamRecord {
    pub param_id: usize,
    pub name: String,
    pub description: String,
    pub unit: String,
    #[serde(deserialize_with = "null_as_nan")]
    pub min_value: f32,
    #[serde(deserialize_with = "null_as_nan")]
    pub max_value: f32,
    #[serde(deserialize_with = "null_as_nan")]
    pub default_value: f32,
    #[serde(deserialize_with = "null_as_nan")]
    pub display_base: f32,
    #[serde(deserialize_with = "null_as_nan")]
    pub display_multiplier: f32,
    #[serde(deserialize_with = "null_as_nan")]
    pub display_offset: f32,
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<WidgetBox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRecord {
    pub port_id: usize,
    pub name: String,
    pub description: String,
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<WidgetBox>,
}

/// The exported shape of a single module: its identity plus its parameters
/// and ports in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamRecord>,
    #[serde(default)]
    pub inputs: Vec<PortRecord>,
    #[serde(default)]
    pub outputs: Vec<PortRecord>,
}

impl ModuleRecord {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            params: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }
}
