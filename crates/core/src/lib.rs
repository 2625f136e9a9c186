//! Lowering and annotation pass for Angular OpenAPI clients.
//!
//! An OpenAPI document is lowered into operation and model descriptors,
//! which are then classified (retrieval vs mutation), given path templates
//! for both call-site dialects, and grouped per tag. The result is a
//! [`GenerationPlan`] that a template renderer can consume as-is.

pub mod descriptor;
pub mod error;
pub mod generator;
pub mod host;
pub mod lower;
pub mod model;
pub mod naming;
pub mod operation;
pub mod options;
pub mod path_template;
pub mod routing;
pub mod spec;
pub mod tag_usage;

pub use descriptor::{
    ApiGraph, HttpMethod, ModelDescriptor, OperationDescriptor, OperationKind,
    ParameterDescriptor,
};
pub use error::{Error, Result};
pub use generator::{ApiArtifact, GenerationPlan, Generator, PlannedFile, generate};
pub use host::{AngularClient, GeneratorHooks};
pub use options::GeneratorOptions;
pub use routing::{ArtifactKind, ArtifactSkipSet};
pub use spec::OpenApiSpec;
pub use tag_usage::{TagUsage, TagUsageRecord};
