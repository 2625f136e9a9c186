//! Extension points the generation pass calls into.
//!
//! [`GeneratorHooks`] is the contract between the driver in
//! [`crate::generator`] and a concrete client flavour: how names and files
//! are derived, how operations are classified, and how models are
//! decorated. Naming hooks have defaults built on [`crate::naming`];
//! classification and decoration must be supplied.

use crate::descriptor::{HttpMethod, ModelDescriptor, OperationDescriptor};
use crate::error::Result;
use crate::model::annotate_model;
use crate::naming::{self, to_file_slug};
use crate::operation::annotate_operation;
use crate::options::GeneratorOptions;
use crate::routing::{ArtifactSkipSet, compute_skip_set};
use crate::tag_usage::TagUsage;

/// Extension points of one generator flavour.
pub trait GeneratorHooks {
    /// Generator name reported in logs and the plan.
    fn name(&self) -> &'static str;

    /// Options the pass runs with.
    fn options(&self) -> &GeneratorOptions;

    /// Method name for an operation, from its declared id or its verb and path.
    fn operation_id(&self, declared: Option<&str>, method: HttpMethod, path: &str) -> String {
        match declared {
            Some(id) => naming::normalize_operation_id(id),
            None => naming::synthesize_operation_id(method.as_str(), path),
        }
    }

    /// Tag name as used for grouping and class names.
    fn sanitize_tag(&self, tag: &str) -> String {
        naming::sanitize_tag(tag)
    }

    /// File stem for a model (`CourseCreate` -> `course-create`).
    fn model_file_name(&self, name: &str) -> String {
        to_file_slug(name)
    }

    /// File stem shared by a tag's service and resource files.
    fn api_file_name(&self, tag: &str) -> String {
        to_file_slug(tag)
    }

    /// Service class name for a tag (`Courses` -> `CoursesApi`).
    fn api_class_name(&self, tag: &str) -> String {
        naming::api_class_name(tag)
    }

    /// Files to omit, given the tag usage of the whole document.
    fn skip_set(&self, usage: &TagUsage) -> ArtifactSkipSet;

    /// Classify and decorate one operation in place.
    fn classify_operation(&self, op: &mut OperationDescriptor) -> Result<()>;

    /// Decorate one model in place.
    fn decorate_model(&self, model: &mut ModelDescriptor);
}

/// Angular client: `httpResource` for GET operations, `inject()`-based
/// services for mutations, readonly response models.
#[derive(Debug, Clone, Default)]
pub struct AngularClient {
    options: GeneratorOptions,
}

impl AngularClient {
    /// Generator name reported in logs and the plan.
    pub const NAME: &'static str = "angular";

    /// Hooks running with `options`.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }
}

impl GeneratorHooks for AngularClient {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    fn skip_set(&self, usage: &TagUsage) -> ArtifactSkipSet {
        compute_skip_set(usage, &self.options, |tag| self.api_file_name(tag))
    }

    fn classify_operation(&self, op: &mut OperationDescriptor) -> Result<()> {
        annotate_operation(op, &self.options)
    }

    fn decorate_model(&self, model: &mut ModelDescriptor) {
        annotate_model(model, self.options.readonly_output_models);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_naming_hooks() {
        let hooks = AngularClient::default();
        assert_eq!(hooks.name(), "angular");
        assert_eq!(hooks.model_file_name("CourseCreate"), "course-create");
        assert_eq!(hooks.api_file_name("PetStore"), "pet-store");
        assert_eq!(hooks.api_class_name("PetStore"), "PetStoreApi");
        assert_eq!(hooks.sanitize_tag("pet store"), "PetStore");
    }

    #[test]
    fn test_operation_id_hook() {
        let hooks = AngularClient::default();
        assert_eq!(
            hooks.operation_id(Some("_listOrders2"), HttpMethod::Get, "/orders"),
            "listOrders"
        );
        assert_eq!(
            hooks.operation_id(None, HttpMethod::Delete, "/orders/{orderId}"),
            "deleteOrders"
        );
    }
}
