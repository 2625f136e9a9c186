//! Lowering from the OpenAPI document to descriptors.
//!
//! This module handles the OpenAPI-specific reading:
//! - Path-level and operation-level parameter merging
//! - Tag defaulting and sanitization
//! - Schema to TypeScript type names
//!
//! Nothing here classifies or decorates; descriptors come out with their
//! annotation fields at defaults.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::descriptor::{
    ApiGraph, BodyDescriptor, HttpMethod, ModelAnnotations, ModelDescriptor, OperationAnnotations,
    OperationDescriptor, ParamLocation, ParameterDescriptor, PropertyDescriptor,
};
use crate::host::GeneratorHooks;
use crate::spec::{
    AdditionalProperties, OpenApiSpec, Operation, Parameter, PathItem, Schema, ref_to_type_name,
};

/// Tag given to operations that declare none.
pub const SENTINEL_TAG: &str = "default";

/// Lower every operation (path order, then verb order) and every component schema.
pub fn lower_spec<H>(spec: &OpenApiSpec, hooks: &H) -> ApiGraph
where
    H: GeneratorHooks + ?Sized,
{
    let mut operations = Vec::new();
    for (path, item) in &spec.paths {
        for (method, op) in path_operations(item) {
            let path_level = item.parameters.as_deref();
            operations.push(lower_operation(spec, path, method, op, path_level, hooks));
        }
    }

    let models = spec
        .schemas()
        .map(|(name, schema)| lower_model(spec, name, schema, hooks))
        .collect::<Vec<_>>();

    debug!(
        operations = operations.len(),
        models = models.len(),
        "Lowered OpenAPI document."
    );

    ApiGraph { operations, models }
}

/// Operations of a path item in scan order.
fn path_operations(item: &PathItem) -> impl Iterator<Item = (HttpMethod, &Operation)> {
    HttpMethod::ALL.into_iter().filter_map(move |method| {
        let op = match method {
            HttpMethod::Get => item.get.as_ref(),
            HttpMethod::Post => item.post.as_ref(),
            HttpMethod::Put => item.put.as_ref(),
            HttpMethod::Delete => item.delete.as_ref(),
            HttpMethod::Patch => item.patch.as_ref(),
            HttpMethod::Head => item.head.as_ref(),
            HttpMethod::Options => item.options.as_ref(),
            HttpMethod::Trace => item.trace.as_ref(),
        };
        op.map(|op| (method, op))
    })
}

fn lower_operation<H>(
    spec: &OpenApiSpec,
    path: &str,
    method: HttpMethod,
    op: &Operation,
    path_level: Option<&[Parameter]>,
    hooks: &H,
) -> OperationDescriptor
where
    H: GeneratorHooks + ?Sized,
{
    let operation_id = hooks.operation_id(op.operation_id.as_deref(), method, path);
    let tags = lower_tags(op.tags.as_deref(), hooks);

    let mut path_params = Vec::new();
    let mut query_params = Vec::new();
    let mut header_params = Vec::new();
    let mut cookie_params = Vec::new();
    for param in merge_params(spec, path_level, op.parameters.as_deref()) {
        match param.location {
            ParamLocation::Path => path_params.push(param),
            ParamLocation::Query => query_params.push(param),
            ParamLocation::Header => header_params.push(param),
            ParamLocation::Cookie => cookie_params.push(param),
        }
    }

    OperationDescriptor {
        operation_id,
        method,
        tags,
        raw_path: path.to_string(),
        path: path.to_string(),
        summary: op.summary.clone(),
        deprecated: op.deprecated,
        path_params,
        query_params,
        header_params,
        cookie_params,
        body: lower_body(op),
        response_type: lower_response(op),
        annotations: OperationAnnotations::default(),
    }
}

/// Sanitized tags, deduplicated, defaulting to the sentinel.
fn lower_tags<H>(tags: Option<&[String]>, hooks: &H) -> Vec<String>
where
    H: GeneratorHooks + ?Sized,
{
    let declared = tags.filter(|t| !t.is_empty());
    let raw: Vec<&str> = match declared {
        Some(tags) => tags.iter().map(String::as_str).collect(),
        None => vec![SENTINEL_TAG],
    };

    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|tag| hooks.sanitize_tag(tag))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Path-level parameters first; an operation-level parameter with the same
/// name and location replaces its path-level counterpart.
fn merge_params(
    spec: &OpenApiSpec,
    path_level: Option<&[Parameter]>,
    op_level: Option<&[Parameter]>,
) -> Vec<ParameterDescriptor> {
    let mut merged: Vec<ParameterDescriptor> = Vec::new();
    for p in path_level.into_iter().flatten() {
        merged.push(lower_param(spec, p));
    }
    for p in op_level.into_iter().flatten() {
        let param = lower_param(spec, p);
        merged.retain(|existing| {
            existing.raw_name != param.raw_name || existing.location != param.location
        });
        merged.push(param);
    }
    merged
}

/// Lower a single parameter; identifiers are assigned later by the annotator.
///
/// `baseType` comes from the schema behind any component alias, so an
/// `ItemId` alias of `integer` still counts as numeric. `dataType` keeps
/// the alias name.
fn lower_param(spec: &OpenApiSpec, p: &Parameter) -> ParameterDescriptor {
    let base_type = p
        .schema
        .as_ref()
        .and_then(|schema| spec.resolve(schema))
        .and_then(Schema::primary_type)
        .map(str::to_string);
    let data_type = p
        .schema
        .as_ref()
        .map_or_else(|| "string".to_string(), schema_type_name);

    ParameterDescriptor {
        raw_name: p.name.clone(),
        location: ParamLocation::parse(&p.location),
        required: p.required,
        is_integer: base_type.as_deref() == Some("integer"),
        is_number: base_type.as_deref() == Some("number"),
        base_type,
        data_type,
        identifier: p.name.clone(),
        is_numeric: false,
    }
}

/// First declared request body content, if any.
fn lower_body(op: &Operation) -> Option<BodyDescriptor> {
    let body = op.request_body.as_ref()?;
    let (content_type, media) = body.content.as_ref()?.first()?;
    let data_type = media
        .schema
        .as_ref()
        .map_or_else(|| "unknown".to_string(), schema_type_name);

    Some(BodyDescriptor {
        data_type,
        content_type: content_type.clone(),
        required: body.required,
    })
}

/// Type of the first 2xx response with content; `void` otherwise.
fn lower_response(op: &Operation) -> String {
    op.responses
        .iter()
        .filter(|(status, _)| status.starts_with('2'))
        .find_map(|(_, response)| {
            let (_, media) = response.content.as_ref()?.first()?;
            media.schema.as_ref().map(schema_type_name)
        })
        .unwrap_or_else(|| "void".to_string())
}

fn lower_model<H>(spec: &OpenApiSpec, name: &str, schema: &Schema, hooks: &H) -> ModelDescriptor
where
    H: GeneratorHooks + ?Sized,
{
    let mut merged = MergedObject::default();
    merge_all_of(spec, schema, &mut merged, 0);

    let properties = merged
        .properties
        .iter()
        .map(|(prop_name, prop)| PropertyDescriptor {
            name: (*prop_name).to_string(),
            data_type: schema_type_name(prop),
            optional: !merged.required.contains(prop_name),
            nullable: prop.is_nullable(),
            use_readonly_modifier: false,
        })
        .collect::<Vec<_>>();

    let enum_values = schema
        .enum_values
        .iter()
        .flatten()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect::<Vec<_>>();

    let parents = schema
        .all_of
        .iter()
        .flatten()
        .filter_map(|member| member.ref_path.as_deref().map(ref_to_type_name))
        .filter(|parent| *parent != name)
        .map(str::to_string)
        .collect::<Vec<_>>();

    let is_composed = schema.properties.is_some() || schema.all_of.is_some();
    let alias_of = (!is_composed && enum_values.is_empty()).then(|| schema_type_name(schema));

    let mut imports = parents.clone();
    for prop in merged.properties.values() {
        collect_refs(prop, &mut imports);
    }
    collect_refs(schema, &mut imports);
    imports.retain(|import| import != name);

    ModelDescriptor {
        name: name.to_string(),
        file_name: hooks.model_file_name(name),
        properties,
        parents,
        enum_values,
        alias_of,
        imports,
        annotations: ModelAnnotations::default(),
    }
}

/// Deepest `allOf` nesting merged before a cycle is assumed.
const MAX_ALL_OF_DEPTH: usize = 16;

/// Object shape with every `allOf` member folded in.
#[derive(Default)]
struct MergedObject<'a> {
    properties: IndexMap<&'a str, &'a Schema>,
    required: HashSet<&'a str>,
}

/// Fold `allOf` members (following `$ref`s) and then the schema's own
/// properties into `out`. A later declaration of a property name replaces
/// the earlier schema but keeps its position.
fn merge_all_of<'a>(
    spec: &'a OpenApiSpec,
    schema: &'a Schema,
    out: &mut MergedObject<'a>,
    depth: usize,
) {
    if depth < MAX_ALL_OF_DEPTH {
        for member in schema.all_of.iter().flatten() {
            if let Some(member) = spec.resolve(member) {
                merge_all_of(spec, member, out, depth + 1);
            }
        }
    }
    for (prop_name, prop) in schema.properties.iter().flatten() {
        out.properties.insert(prop_name.as_str(), prop);
    }
    out.required
        .extend(schema.required.iter().flatten().map(String::as_str));
}

/// Referenced component names, in first-seen order.
fn collect_refs(schema: &Schema, out: &mut Vec<String>) {
    if let Some(name) = schema.ref_path.as_deref().map(ref_to_type_name)
        && !out.iter().any(|seen| seen == name)
    {
        out.push(name.to_string());
    }
    for nested in schema.properties.iter().flat_map(|p| p.values()) {
        collect_refs(nested, out);
    }
    let members = schema.all_of.iter().chain(&schema.any_of).chain(&schema.one_of);
    for nested in members.flatten() {
        collect_refs(nested, out);
    }
    if let Some(items) = &schema.items {
        collect_refs(items, out);
    }
    if let Some(AdditionalProperties::Schema(extra)) = &schema.additional_properties {
        collect_refs(extra, out);
    }
}

/// TypeScript type name for a schema.
pub fn schema_type_name(schema: &Schema) -> String {
    if let Some(name) = schema.ref_path.as_deref() {
        return ref_to_type_name(name).to_string();
    }

    match schema.primary_type() {
        Some("integer" | "number") => "number".to_string(),
        Some("boolean") => "boolean".to_string(),
        Some("string") if schema.format.as_deref() == Some("binary") => "Blob".to_string(),
        Some("string") => "string".to_string(),
        Some("array") => {
            let item = schema
                .items
                .as_deref()
                .map_or_else(|| "unknown".to_string(), schema_type_name);
            format!("Array<{item}>")
        }
        Some("object") => match &schema.additional_properties {
            Some(AdditionalProperties::Schema(value)) => {
                format!("Record<string, {}>", schema_type_name(value))
            }
            _ => "Record<string, unknown>".to_string(),
        },
        _ => schema
            .ref_name()
            .map_or_else(|| "unknown".to_string(), str::to_string),
    }
}
