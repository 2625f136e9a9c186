//! Drives a [`GeneratorHooks`] implementation through one generation run.
//!
//! The pipeline is:
//! 1. Lower: OpenApiSpec -> ApiGraph (descriptors, no annotations)
//! 2. Analyze: ApiGraph -> TagUsage -> ArtifactSkipSet
//! 3. Decorate: every model, then every operation, through the hooks
//! 4. Group: operations bucketed per tag into ApiArtifacts
//!
//! The resulting [`GenerationPlan`] is everything a renderer needs.

use std::collections::HashSet;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::descriptor::{ModelDescriptor, OperationDescriptor};
use crate::error::Result;
use crate::host::{AngularClient, GeneratorHooks};
use crate::lower::lower_spec;
use crate::operation::{partition_operations, query_params_interface_name};
use crate::options::GeneratorOptions;
use crate::routing::{ArtifactKind, ArtifactSkipSet, tag_artifact_kinds};
use crate::spec::OpenApiSpec;
use crate::tag_usage::TagUsage;

#[allow(clippy::expect_used)]
static TYPE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("static regex is valid"));

/// Operations of one tag, bucketed for the service and resource templates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArtifact {
    /// Sanitized tag
    pub tag: String,
    /// Service class name (e.g. `OrdersApi`)
    pub class_name: String,
    /// File stem shared by the service and resource files
    pub file_name: String,
    /// Every operation of the tag, in document order
    pub operations: Vec<OperationDescriptor>,
    /// Retrieval operations, rendered as resources
    pub get_operations: Vec<OperationDescriptor>,
    /// Mutation operations, rendered as service methods
    pub mutation_operations: Vec<OperationDescriptor>,
    /// `get_operations` is non-empty
    pub has_get_operations: bool,
    /// `mutation_operations` is non-empty
    pub has_mutation_operations: bool,
    /// Models referenced by parameters, bodies or responses
    pub imports: Vec<String>,
}

impl ApiArtifact {
    fn new<H>(
        tag: &str,
        operations: Vec<OperationDescriptor>,
        hooks: &H,
        model_names: &HashSet<&str>,
    ) -> Self
    where
        H: GeneratorHooks + ?Sized,
    {
        let (gets, mutations) = partition_operations(&operations);
        let get_operations: Vec<_> = gets.into_iter().cloned().collect();
        let mutation_operations: Vec<_> = mutations.into_iter().cloned().collect();
        let imports = referenced_models(&operations, model_names);

        Self {
            tag: tag.to_string(),
            class_name: hooks.api_class_name(tag),
            file_name: hooks.api_file_name(tag),
            has_get_operations: !get_operations.is_empty(),
            has_mutation_operations: !mutation_operations.is_empty(),
            operations,
            get_operations,
            mutation_operations,
            imports,
        }
    }
}

/// A file the renderer should write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedFile {
    /// Relative output path (e.g. `api/orders-api.ts`)
    pub path: String,
    /// What the file holds
    pub kind: ArtifactKind,
    /// Index into `models` or `apis`, depending on `kind`
    pub index: usize,
}

/// The decorated graph handed to the renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationPlan {
    /// Name of the hooks that produced the plan
    pub generator: &'static str,
    /// Options the plan was made with
    pub options: GeneratorOptions,
    /// Decorated models, in component order
    pub models: Vec<ModelDescriptor>,
    /// One artifact per tag, in first-seen order
    pub apis: Vec<ApiArtifact>,
    /// Retrieval/mutation usage per tag
    pub tag_usage: TagUsage,
    /// Output paths that are not written
    pub skip_set: ArtifactSkipSet,
}

impl GenerationPlan {
    /// Every artifact that is generated and not skipped, models first.
    pub fn planned_files(&self) -> Vec<PlannedFile> {
        let models = self.models.iter().enumerate().map(|(index, model)| PlannedFile {
            path: ArtifactKind::Model.path_for(&model.file_name),
            kind: ArtifactKind::Model,
            index,
        });

        let kinds = tag_artifact_kinds(&self.options);
        let apis = self.apis.iter().enumerate().flat_map(|(index, api)| {
            kinds.iter().map(move |kind| PlannedFile {
                path: kind.path_for(&api.file_name),
                kind: *kind,
                index,
            })
        });

        models
            .chain(apis)
            .filter(|file| !self.skip_set.contains(&file.path))
            .collect()
    }

    /// Artifact of a sanitized tag.
    pub fn api(&self, tag: &str) -> Option<&ApiArtifact> {
        self.apis.iter().find(|api| api.tag == tag)
    }

    /// Model by component name.
    pub fn model(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|model| model.name == name)
    }
}

/// Runs the hooks over a document in the host's call order.
#[derive(Debug, Clone)]
pub struct Generator<H> {
    hooks: H,
}

impl<H: GeneratorHooks> Generator<H> {
    /// Driver over `hooks`.
    pub fn new(hooks: H) -> Self {
        Self { hooks }
    }

    /// The hooks this driver calls.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Lower, analyze and decorate `spec` into a plan.
    pub fn run(&self, spec: &OpenApiSpec) -> Result<GenerationPlan> {
        let hooks = &self.hooks;
        hooks.options().log_summary(hooks.name());

        let mut graph = lower_spec(spec, hooks);

        let tag_usage = TagUsage::analyze(&graph.operations);
        let skip_set = hooks.skip_set(&tag_usage);

        for model in &mut graph.models {
            hooks.decorate_model(model);
        }
        for op in &mut graph.operations {
            hooks.classify_operation(op)?;
        }

        let model_names: HashSet<&str> = graph.models.iter().map(|m| m.name.as_str()).collect();
        let apis = group_by_tag(&graph.operations)
            .into_iter()
            .map(|(tag, ops)| ApiArtifact::new(&tag, ops, hooks, &model_names))
            .collect::<Vec<_>>();

        info!(
            models = graph.models.len(),
            apis = apis.len(),
            skipped = skip_set.len(),
            "Generation plan ready."
        );

        Ok(GenerationPlan {
            generator: hooks.name(),
            options: hooks.options().clone(),
            models: graph.models,
            apis,
            tag_usage,
            skip_set,
        })
    }
}

/// Parse `source` (JSON or YAML) and plan it with the Angular client hooks.
pub fn generate(source: &str, options: GeneratorOptions) -> Result<GenerationPlan> {
    let spec = OpenApiSpec::parse(source)?;
    Generator::new(AngularClient::new(options)).run(&spec)
}

/// Bucket operations by tag; an operation with several tags lands in each.
///
/// An id already taken inside the tag is renamed `<id>_<n>`, with `n` the
/// first free counter from 0, so each method name in an artifact is unique.
fn group_by_tag(
    operations: &[OperationDescriptor],
) -> IndexMap<String, Vec<OperationDescriptor>> {
    let mut groups: IndexMap<String, Vec<OperationDescriptor>> = IndexMap::new();
    for op in operations {
        for tag in &op.tags {
            let group = groups.entry(tag.clone()).or_default();
            let mut member = op.clone();
            if is_taken(group, &member.operation_id) {
                let renamed = free_operation_id(group, &op.operation_id);
                warn!(
                    tag = %tag,
                    operation_id = %op.operation_id,
                    renamed = %renamed,
                    "Duplicate operationId in tag, renaming."
                );
                rename_operation(&mut member, renamed);
            }
            group.push(member);
        }
    }
    debug!(tags = groups.len(), "Grouped operations by tag.");
    groups
}

fn is_taken(group: &[OperationDescriptor], operation_id: &str) -> bool {
    group.iter().any(|existing| existing.operation_id == operation_id)
}

fn free_operation_id(group: &[OperationDescriptor], operation_id: &str) -> String {
    let mut counter = 0;
    loop {
        let candidate = format!("{operation_id}_{counter}");
        if !is_taken(group, &candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Give an annotated operation a new id, keeping its derived names in step.
fn rename_operation(op: &mut OperationDescriptor, operation_id: String) {
    if op.annotations.query_params_interface_name.is_some() {
        op.annotations.query_params_interface_name =
            Some(query_params_interface_name(&operation_id));
    }
    op.operation_id = operation_id;
}

/// Model names mentioned in parameter, body or response types, first-seen order.
fn referenced_models(
    operations: &[OperationDescriptor],
    model_names: &HashSet<&str>,
) -> Vec<String> {
    let mut imports: Vec<String> = Vec::new();
    let type_names = operations.iter().flat_map(|op| {
        op.path_params
            .iter()
            .chain(&op.query_params)
            .chain(&op.header_params)
            .map(|p| p.data_type.as_str())
            .chain(op.body.iter().map(|b| b.data_type.as_str()))
            .chain(std::iter::once(op.response_type.as_str()))
    });
    for type_name in type_names {
        for ident in TYPE_IDENT.find_iter(type_name) {
            let ident = ident.as_str();
            if model_names.contains(ident) && !imports.iter().any(|seen| seen == ident) {
                imports.push(ident.to_string());
            }
        }
    }
    imports
}
