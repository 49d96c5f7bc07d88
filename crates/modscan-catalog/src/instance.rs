//! The host seam: what a running module looks like to the catalog builder.
//!
//! Hosts implement [`ModuleInstance`] over their own widgets, or build a
//! [`ModuleSnapshot`] when they already have the data in hand.

use std::sync::Arc;

use crate::entry::PluginMetadata;
use crate::record::WidgetBox;

/// Static description of a module model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub slug: String,
    pub name: String,
    pub plugin: Option<Arc<PluginMetadata>>,
}

impl ModelDescriptor {
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        plugin: Arc<PluginMetadata>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            plugin: Some(plugin),
        }
    }
}

/// The live value object bound to a parameter control.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamQuantity {
    pub param_id: usize,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub min_value: f32,
    pub max_value: f32,
    pub default_value: f32,
    pub display_base: f32,
    pub display_multiplier: f32,
    pub display_offset: f32,
}

impl ParamQuantity {
    /// A linear quantity over `min..=max` with no unit or description.
    pub fn new(param_id: usize, name: impl Into<String>, min: f32, max: f32, default: f32) -> Self {
        Self {
            param_id,
            name: name.into(),
            description: String::new(),
            unit: String::new(),
            min_value: min,
            max_value: max,
            default_value: default,
            display_base: 0.0,
            display_multiplier: 1.0,
            display_offset: 0.0,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_display(mut self, base: f32, multiplier: f32, offset: f32) -> Self {
        self.display_base = base;
        self.display_multiplier = multiplier;
        self.display_offset = offset;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortInfo {
    pub port_id: usize,
    pub name: String,
    pub description: String,
}

impl PortInfo {
    pub fn new(port_id: usize, name: impl Into<String>) -> Self {
        Self {
            port_id,
            name: name.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

pub trait ParamHandle {
    /// `None` while the control is not yet bound to a value.
    fn quantity(&self) -> Option<&ParamQuantity>;

    fn placement(&self) -> Option<WidgetBox> {
        None
    }
}

pub trait PortHandle {
    fn info(&self) -> &PortInfo;

    fn placement(&self) -> Option<WidgetBox> {
        None
    }
}

pub trait ModuleInstance {
    /// `None` while the module is still initializing.
    fn model(&self) -> Option<&ModelDescriptor>;

    /// Parameter handles in declaration order.
    fn params(&self) -> Vec<&dyn ParamHandle>;

    fn inputs(&self) -> Vec<&dyn PortHandle>;

    fn outputs(&self) -> Vec<&dyn PortHandle>;
}

impl<T: ModuleInstance + ?Sized> ModuleInstance for &T {
    fn model(&self) -> Option<&ModelDescriptor> {
        (**self).model()
    }

    fn params(&self) -> Vec<&dyn ParamHandle> {
        (**self).params()
    }

    fn inputs(&self) -> Vec<&dyn PortHandle> {
        (**self).inputs()
    }

    fn outputs(&self) -> Vec<&dyn PortHandle> {
        (**self).outputs()
    }
}

impl<T: ModuleInstance + ?Sized> ModuleInstance for Box<T> {
    fn model(&self) -> Option<&ModelDescriptor> {
        (**self).model()
    }

    fn params(&self) -> Vec<&dyn ParamHandle> {
        (**self).params()
    }

    fn inputs(&self) -> Vec<&dyn PortHandle> {
        (**self).inputs()
    }

    fn outputs(&self) -> Vec<&dyn PortHandle> {
        (**self).outputs()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSlot {
    pub quantity: Option<ParamQuantity>,
    pub placement: Option<WidgetBox>,
}

impl ParamSlot {
    pub fn bound(quantity: ParamQuantity) -> Self {
        Self {
            quantity: Some(quantity),
            placement: None,
        }
    }

    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn at(mut self, placement: WidgetBox) -> Self {
        self.placement = Some(placement);
        self
    }
}

impl ParamHandle for ParamSlot {
    fn quantity(&self) -> Option<&ParamQuantity> {
        self.quantity.as_ref()
    }

    fn placement(&self) -> Option<WidgetBox> {
        self.placement
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortSlot {
    pub info: PortInfo,
    pub placement: Option<WidgetBox>,
}

impl PortSlot {
    pub fn new(info: PortInfo) -> Self {
        Self {
            info,
            placement: None,
        }
    }

    pub fn at(mut self, placement: WidgetBox) -> Self {
        self.placement = Some(placement);
        self
    }
}

impl PortHandle for PortSlot {
    fn info(&self) -> &PortInfo {
        &self.info
    }

    fn placement(&self) -> Option<WidgetBox> {
        self.placement
    }
}

/// An owned copy of everything the serializer reads from a module.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleSnapshot {
    pub model: Option<ModelDescriptor>,
    pub params: Vec<ParamSlot>,
    pub inputs: Vec<PortSlot>,
    pub outputs: Vec<PortSlot>,
}

impl ModuleSnapshot {
    pub fn new(model: ModelDescriptor) -> Self {
        Self {
            model: Some(model),
            ..Self::default()
        }
    }

    /// A module whose model is not available yet.
    pub fn initializing() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, param: ParamSlot) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_input(mut self, port: PortSlot) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn with_output(mut self, port: PortSlot) -> Self {
        self.outputs.push(port);
        self
    }
}

impl ModuleInstance for ModuleSnapshot {
    fn model(&self) -> Option<&ModelDescriptor> {
        self.model.as_ref()
    }

    fn params(&self) -> Vec<&dyn ParamHandle> {
        self.params
            .iter()
            .map(|param| param as &dyn ParamHandle)
            .collect()
    }

    fn inputs(&self) -> Vec<&dyn PortHandle> {
        self.inputs.iter().map(|port| port as &dyn PortHandle).collect()
    }

    fn outputs(&self) -> Vec<&dyn PortHandle> {
        self.outputs.iter().map(|port| port as &dyn PortHandle).collect()
    }
}
