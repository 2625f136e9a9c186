//! Artifact kinds, output paths and the skip-set policy.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::options::GeneratorOptions;
use crate::tag_usage::TagUsage;

/// Folder for per-tag service and resource files.
pub const API_FOLDER: &str = "api";
/// Folder for model files.
pub const MODEL_FOLDER: &str = "models";

/// One kind of generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// One interface/enum per component schema
    Model,
    /// Injectable service with the mutation calls of a tag
    Mutation,
    /// `httpResource` factories for the GET operations of a tag
    Resource,
}

impl ArtifactKind {
    /// Output folder of this kind.
    pub fn folder(self) -> &'static str {
        match self {
            ArtifactKind::Model => MODEL_FOLDER,
            ArtifactKind::Mutation | ArtifactKind::Resource => API_FOLDER,
        }
    }

    /// File name suffix appended to the stem.
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Model => ".ts",
            ArtifactKind::Mutation => "-api.ts",
            ArtifactKind::Resource => "-resources.ts",
        }
    }

    /// Template the renderer uses for this kind.
    pub fn template_name(self) -> &'static str {
        match self {
            ArtifactKind::Model => "model.ts.tera",
            ArtifactKind::Mutation => "api-service.ts.tera",
            ArtifactKind::Resource => "api-resource.ts.tera",
        }
    }

    /// Relative output path for a file stem (`orders` -> `api/orders-api.ts`).
    pub fn path_for(self, file_stem: &str) -> String {
        format!("{}/{file_stem}{}", self.folder(), self.suffix())
    }
}

/// Per-tag artifact kinds produced under `options`.
pub fn tag_artifact_kinds(options: &GeneratorOptions) -> Vec<ArtifactKind> {
    let mut kinds = vec![ArtifactKind::Mutation];
    if options.resource_artifacts_enabled() {
        kinds.push(ArtifactKind::Resource);
    }
    kinds
}

/// Relative paths of artifacts that must not be emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtifactSkipSet {
    paths: BTreeSet<String>,
}

impl ArtifactSkipSet {
    /// Add a path; false when it was already present.
    pub fn insert(&mut self, path: String) -> bool {
        self.paths.insert(path)
    }

    /// Whether `path` is skipped.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Skipped paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Number of skipped paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when nothing is skipped.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Decide which per-tag artifacts to skip.
///
/// A tag without mutations loses its service file. A tag without GET
/// operations loses its resource file, but only when resource files are
/// generated at all. `file_stem` maps a tag to its file stem.
pub fn compute_skip_set<F>(
    usage: &TagUsage,
    options: &GeneratorOptions,
    file_stem: F,
) -> ArtifactSkipSet
where
    F: Fn(&str) -> String,
{
    let mut skip = ArtifactSkipSet::default();
    for (tag, record) in usage.iter() {
        if !record.has_retrieval && !record.has_mutation {
            continue;
        }
        let stem = file_stem(tag);
        if !record.has_mutation {
            skip.insert(ArtifactKind::Mutation.path_for(&stem));
        }
        if options.resource_artifacts_enabled() && !record.has_retrieval {
            skip.insert(ArtifactKind::Resource.path_for(&stem));
        }
    }
    debug!(skipped = skip.len(), "Computed artifact skip set.");
    skip
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::descriptor::OperationKind;
    use crate::naming::to_file_slug;

    fn usage(entries: &[(&str, OperationKind)]) -> TagUsage {
        let mut usage = TagUsage::default();
        for (tag, kind) in entries {
            usage.record(tag, *kind);
        }
        usage
    }

    #[test]
    fn test_artifact_paths() {
        assert_eq!(ArtifactKind::Mutation.path_for("orders"), "api/orders-api.ts");
        assert_eq!(
            ArtifactKind::Resource.path_for("course-management"),
            "api/course-management-resources.ts"
        );
        assert_eq!(ArtifactKind::Model.path_for("course-create"), "models/course-create.ts");
    }

    #[test]
    fn test_mutation_only_tag_skips_resource_file() {
        let usage = usage(&[("Uploads", OperationKind::Mutation)]);
        let skip = compute_skip_set(&usage, &GeneratorOptions::default(), to_file_slug);
        assert!(!skip.contains("api/uploads-api.ts"));
        assert!(skip.contains("api/uploads-resources.ts"));
        assert_eq!(skip.len(), 1);
    }

    #[test]
    fn test_mutation_only_tag_without_split_files() {
        let usage = usage(&[("Uploads", OperationKind::Mutation)]);
        let options = GeneratorOptions {
            split_resource_artifacts: false,
            ..GeneratorOptions::default()
        };
        let skip = compute_skip_set(&usage, &options, to_file_slug);
        assert!(skip.is_empty());
    }

    #[test]
    fn test_retrieval_only_tag_skips_service_file() {
        let usage = usage(&[("HTTPStatus", OperationKind::Retrieval)]);
        let skip = compute_skip_set(&usage, &GeneratorOptions::default(), to_file_slug);
        let paths: Vec<_> = skip.iter().collect();
        assert_eq!(paths, ["api/http-status-api.ts"]);
    }

    #[test]
    fn test_mixed_tag_is_never_skipped() {
        let usage = usage(&[
            ("Orders", OperationKind::Retrieval),
            ("Orders", OperationKind::Mutation),
        ]);
        let skip = compute_skip_set(&usage, &GeneratorOptions::default(), to_file_slug);
        assert!(skip.is_empty());
    }

    #[test]
    fn test_tag_artifact_kinds() {
        assert_eq!(
            tag_artifact_kinds(&GeneratorOptions::default()),
            vec![ArtifactKind::Mutation, ArtifactKind::Resource]
        );
        let options = GeneratorOptions {
            use_reactive_resource: false,
            ..GeneratorOptions::default()
        };
        assert_eq!(tag_artifact_kinds(&options), vec![ArtifactKind::Mutation]);
    }
}
