//! Model mutability classification.
//!
//! Input DTOs are recognised purely by name suffix; how a model is used by
//! operations is never consulted.

use crate::descriptor::ModelDescriptor;

/// Name suffixes marking a model as a write payload.
pub const INPUT_DTO_SUFFIXES: [&str; 4] = ["Create", "Update", "Request", "Input"];

/// Whether `name` ends with one of [`INPUT_DTO_SUFFIXES`].
pub fn is_input_dto(name: &str) -> bool {
    INPUT_DTO_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Mark the model and each property with the readonly decision.
///
/// `readonly` applies only when `readonly_output_models` is on and the
/// model is not an input DTO.
pub fn annotate_model(model: &mut ModelDescriptor, readonly_output_models: bool) {
    let is_input_dto = is_input_dto(&model.name);
    let use_readonly = readonly_output_models && !is_input_dto;

    model.annotations.is_input_dto = is_input_dto;
    model.annotations.use_readonly_modifier = use_readonly;
    for property in &mut model.properties {
        property.use_readonly_modifier = use_readonly;
    }
}
