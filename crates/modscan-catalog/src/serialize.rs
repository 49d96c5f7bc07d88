use crate::entry::PluginMetadata;
use crate::instance::{ModuleInstance, ParamHandle, PortHandle};
use crate::record::{ModuleRecord, ParamRecord, PortRecord};

#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Emit the `box` placement of params and ports when the host knows it.
    pub include_geometry: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            include_geometry: true,
        }
    }
}

/// Owning plugin of `instance`, if the instance is far enough along to have
/// one.
pub fn plugin_identity<M: ModuleInstance + ?Sized>(instance: &M) -> Option<&PluginMetadata> {
    let plugin = instance.model()?.plugin.as_deref()?;
    (!plugin.slug.is_empty()).then_some(plugin)
}

/// Builds the catalog record for one module.
///
/// Returns `None` when the module has no model, no owning plugin, or an empty
/// slug. Parameters that are not yet bound to a quantity are left out and the
/// rest of the record is still produced.
pub fn serialize_module<M: ModuleInstance + ?Sized>(
    instance: &M,
    options: &SerializeOptions,
) -> Option<ModuleRecord> {
    let model = instance.model()?;
    plugin_identity(instance)?;
    if model.slug.is_empty() {
        return None;
    }

    let params = instance
        .params()
        .into_iter()
        .filter_map(|param| serialize_param(param, options))
        .collect();
    let inputs = serialize_ports(instance.inputs(), options);
    let outputs = serialize_ports(instance.outputs(), options);

    Some(ModuleRecord {
        slug: model.slug.clone(),
        name: model.name.clone(),
        params,
        inputs,
        outputs,
    })
}

fn serialize_param(param: &dyn ParamHandle, options: &SerializeOptions) -> Option<ParamRecord> {
    let qty = param.quantity()?;
    Some(ParamRecord {
        param_id: qty.param_id,
        name: qty.name.clone(),
        description: qty.description.clone(),
        unit: qty.unit.clone(),
        min_value: qty.min_value,
        max_value: qty.max_value,
        default_value: qty.default_value,
        display_base: qty.display_base,
        display_multiplier: qty.display_multiplier,
        display_offset: qty.display_offset,
        placement: param.placement().filter(|_| options.include_geometry),
    })
}

fn serialize_ports(ports: Vec<&dyn PortHandle>, options: &SerializeOptions) -> Vec<PortRecord> {
    ports
        .into_iter()
        .map(|port| {
            let info = port.info();
            PortRecord {
                port_id: info.port_id,
                name: info.name.clone(),
                description: info.description.clone(),
                placement: port.placement().filter(|_| options.include_geometry),
            }
        })
        .collect()
}
