//! Operation classification and decoration.

use tracing::warn;

use crate::descriptor::{OperationDescriptor, OperationKind, ParameterDescriptor};
use crate::error::{Error, Result};
use crate::naming::{to_identifier_camel, to_identifier_pascal};
use crate::options::GeneratorOptions;
use crate::path_template::{PathDialect, build_path_template};

/// Suffix of the generated query-parameter interface.
pub const QUERY_PARAMS_SUFFIX: &str = "Params";

/// Numeric parameters can be interpolated without encoding.
///
/// True for explicit integer/number flags or a `number`/`integer` type name.
pub fn is_numeric_param(param: &ParameterDescriptor) -> bool {
    param.is_integer
        || param.is_number
        || param.data_type == "number"
        || matches!(param.base_type.as_deref(), Some("number" | "integer"))
}

/// Interface name for an operation's query parameters (`listOrders` -> `ListOrdersParams`).
pub fn query_params_interface_name(operation_id: &str) -> String {
    format!("{}{QUERY_PARAMS_SUFFIX}", to_identifier_pascal(operation_id))
}

/// Decorate one operation in place.
///
/// Classifies the verb, names path and query parameters, and attaches both
/// path templates. Unresolved placeholders are kept in the output and
/// logged, unless `strict_path_parameters` is set.
pub fn annotate_operation(op: &mut OperationDescriptor, options: &GeneratorOptions) -> Result<()> {
    let annotations = &mut op.annotations;

    let is_retrieval = op.method.kind() == OperationKind::Retrieval;
    annotations.is_retrieval = is_retrieval;
    annotations.is_mutation = !is_retrieval;
    annotations.uses_resource_pattern = is_retrieval && options.use_reactive_resource;
    annotations.uses_injected_dependency = options.use_injected_dependency;

    for param in &mut op.path_params {
        param.identifier = to_identifier_camel(&param.raw_name);
        param.is_numeric = is_numeric_param(param);
    }

    annotations.has_query_params = !op.query_params.is_empty();
    annotations.query_params_interface_name = annotations
        .has_query_params
        .then(|| query_params_interface_name(&op.operation_id));
    for param in &mut op.query_params {
        param.identifier = to_identifier_camel(&param.raw_name);
    }

    let plain = build_path_template(&op.raw_path, &op.path_params, PathDialect::Plain);
    let value = build_path_template(&op.raw_path, &op.path_params, PathDialect::Value);

    if let Some(placeholder) = plain.unresolved.first() {
        if options.strict_path_parameters {
            return Err(Error::StructuralInconsistency {
                operation_id: op.operation_id.clone(),
                placeholder: placeholder.clone(),
            });
        }
        warn!(
            operation_id = %op.operation_id,
            path = %op.raw_path,
            unresolved = ?plain.unresolved,
            "Path placeholder has no matching path parameter; copying its name."
        );
    }

    if !plain.template.is_empty() {
        op.path.clone_from(&plain.template);
    }
    annotations.unresolved_placeholders = plain.unresolved;
    annotations.plain_path_template = plain.template;
    annotations.value_path_template = value.template;

    Ok(())
}

/// Split operations into retrieval and mutation buckets, keeping relative order.
pub fn partition_operations<'a, I>(
    operations: I,
) -> (Vec<&'a OperationDescriptor>, Vec<&'a OperationDescriptor>)
where
    I: IntoIterator<Item = &'a OperationDescriptor>,
{
    operations
        .into_iter()
        .partition(|op| op.kind() == OperationKind::Retrieval)
}
