//! Descriptors for lowered operations and models.
//!
//! Descriptors are created once per document entry by the lowering step,
//! decorated in place by the annotators, and serialized as-is for the
//! renderer. Field names serialize in camelCase so templates read the same
//! names the annotators document (`isRetrieval`, `plainPathTemplate`, ...).

use serde::Serialize;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
}

impl HttpMethod {
    /// Every method in the order path items are scanned.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
    ];

    /// Upper-case verb as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// GET is the only retrieval verb; everything else mutates.
    pub fn kind(self) -> OperationKind {
        match self {
            HttpMethod::Get => OperationKind::Retrieval,
            _ => OperationKind::Mutation,
        }
    }
}

/// Operation kind (retrieval vs mutation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// GET requests, emitted as reactive resources
    Retrieval,
    /// POST, PUT, DELETE, PATCH, HEAD, OPTIONS, TRACE, emitted as imperative calls
    Mutation,
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    /// Substituted into the URL path
    Path,
    /// Appended to the query string
    Query,
    /// Sent as a request header
    Header,
    /// Sent in the `Cookie` header
    Cookie,
}

impl ParamLocation {
    /// Parse the `in` field of a parameter; unknown values are treated as query.
    pub fn parse(location: &str) -> Self {
        match location {
            "path" => ParamLocation::Path,
            "header" => ParamLocation::Header,
            "cookie" => ParamLocation::Cookie,
            _ => ParamLocation::Query,
        }
    }
}

/// Single parameter definition
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Name as declared in the document (used for URL placeholders)
    pub raw_name: String,
    /// Where the parameter appears
    pub location: ParamLocation,
    /// Whether the parameter is required
    pub required: bool,
    /// Generated TypeScript type
    pub data_type: String,
    /// Schema type as declared (`integer`, `string`, ...)
    pub base_type: Option<String>,
    /// Declared as `type: integer`
    pub is_integer: bool,
    /// Declared as `type: number`
    pub is_number: bool,

    /// Generated camelCase identifier (`x-ts-name`)
    pub identifier: String,
    /// Whether the path template may interpolate the value directly
    pub is_numeric: bool,
}

/// Request body reference
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyDescriptor {
    /// Generated TypeScript type
    pub data_type: String,
    /// First declared media type
    pub content_type: String,
    /// Whether the body must be supplied
    pub required: bool,
}

/// Metadata attached by the operation annotator.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationAnnotations {
    /// GET operation
    pub is_retrieval: bool,
    /// Any other verb
    pub is_mutation: bool,
    /// Emit as a signal-based resource instead of an imperative call
    pub uses_resource_pattern: bool,
    /// Resolve `HttpClient` through `inject()` instead of the constructor
    pub uses_injected_dependency: bool,
    /// At least one query parameter is declared
    pub has_query_params: bool,
    /// Name of the generated query params interface (`ListCoursesParams`)
    pub query_params_interface_name: Option<String>,
    /// Template for imperative call sites (`/courses/${courseId}`)
    pub plain_path_template: String,
    /// Template for resource bodies (`/courses/${courseIdValue}`)
    pub value_path_template: String,
    /// Placeholders copied through without a matching path parameter
    pub unresolved_placeholders: Vec<String>,
}

/// Normalized API operation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationDescriptor {
    /// Normalized camelCase method name (e.g., "listItems")
    pub operation_id: String,
    /// HTTP verb
    pub method: HttpMethod,
    /// Sanitized tags; never empty
    pub tags: Vec<String>,
    /// URL path as declared (e.g., "/items/{itemId}")
    pub raw_path: String,
    /// Canonical path for downstream consumers; the plain template once annotated
    pub path: String,
    /// One-line summary
    pub summary: Option<String>,
    /// Marked deprecated in the document
    pub deprecated: bool,

    /// Path parameters, in declaration order
    pub path_params: Vec<ParameterDescriptor>,
    /// Query parameters, in declaration order
    pub query_params: Vec<ParameterDescriptor>,
    /// Header parameters, in declaration order
    pub header_params: Vec<ParameterDescriptor>,
    /// Cookie parameters; lowered but never rendered
    pub cookie_params: Vec<ParameterDescriptor>,
    /// Request body, if declared
    pub body: Option<BodyDescriptor>,
    /// Response type, `void` when no content is declared
    pub response_type: String,

    /// Annotator output
    #[serde(flatten)]
    pub annotations: OperationAnnotations,
}

impl OperationDescriptor {
    /// Retrieval or mutation, from the HTTP method.
    pub fn kind(&self) -> OperationKind {
        self.method.kind()
    }
}

/// Metadata attached by the model annotator to a model and each of its properties.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAnnotations {
    /// Name ends in one of the input DTO suffixes
    pub is_input_dto: bool,
    /// Emit `readonly` on this model's properties
    pub use_readonly_modifier: bool,
}

/// A single model property.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Property name as declared
    pub name: String,
    /// Generated TypeScript type
    pub data_type: String,
    /// Not listed in `required`
    pub optional: bool,
    /// Accepts `null`
    pub nullable: bool,
    /// Copied from the owning model by the annotator
    pub use_readonly_modifier: bool,
}

/// A component schema lowered to a model.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    /// Component name
    pub name: String,
    /// Output file stem (kebab-case)
    pub file_name: String,
    /// Own properties, plus those merged from inline `allOf` members
    pub properties: Vec<PropertyDescriptor>,
    /// Models named by `$ref` members of `allOf`, rendered as `extends`
    pub parents: Vec<String>,
    /// String enum members, when the schema is an enum
    pub enum_values: Vec<String>,
    /// Aliased type when the schema is neither an object, an enum nor a composition
    pub alias_of: Option<String>,
    /// Other models this one references (for import lines)
    pub imports: Vec<String>,

    /// Annotator output
    #[serde(flatten)]
    pub annotations: ModelAnnotations,
}

/// Every operation and model in one document, in declaration order.
#[derive(Debug, Default)]
pub struct ApiGraph {
    /// Operations in path then verb order
    pub operations: Vec<OperationDescriptor>,
    /// Models in component declaration order
    pub models: Vec<ModelDescriptor>,
}
