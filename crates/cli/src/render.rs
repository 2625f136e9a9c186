//! Tera rendering of a [`GenerationPlan`].
//!
//! Each planned file is rendered from the template of its [`ArtifactKind`].
//! Built-in templates are compiled into the binary; a directory passed with
//! `--templates` may replace any of them by file name.

use std::collections::BTreeMap;
use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};

use ngen_core::{ArtifactKind, GenerationPlan, PlannedFile};
use tera::{Context, Tera};
use tracing::{debug, info};

use crate::error::{CliError, Result};

const BUILTIN_TEMPLATES: [(ArtifactKind, &str); 3] = [
    (
        ArtifactKind::Model,
        include_str!("../templates/model.ts.tera"),
    ),
    (
        ArtifactKind::Mutation,
        include_str!("../templates/api-service.ts.tera"),
    ),
    (
        ArtifactKind::Resource,
        include_str!("../templates/api-resource.ts.tera"),
    ),
];

/// Template set used to turn plans into TypeScript sources.
#[derive(Debug)]
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Built-in templates, with any file of the same name in `overrides` taking precedence.
    pub fn new(overrides: Option<&Path>) -> Result<Self> {
        let mut tera = Tera::default();
        for (kind, builtin) in BUILTIN_TEMPLATES {
            let name = kind.template_name();
            let custom = overrides.map(|dir| dir.join(name)).filter(|path| path.is_file());
            let added = match custom {
                Some(path) => {
                    debug!(template = name, path = %path.display(), "Using template override.");
                    let source = fs::read_to_string(&path)
                        .map_err(|source| CliError::Read { path, source })?;
                    tera.add_raw_template(name, &source)
                }
                None => tera.add_raw_template(name, builtin),
            };
            added.map_err(|err| template_error(name, &err))?;
        }
        Ok(Self { tera })
    }

    /// Render one planned file.
    pub fn render(&self, plan: &GenerationPlan, file: &PlannedFile) -> Result<String> {
        let mut context = Context::new();
        context.insert("generator", plan.generator);
        context.insert("options", &plan.options);
        context.insert("split_resources", &plan.options.resource_artifacts_enabled());
        context.insert("model_files", &model_files(plan));
        match file.kind {
            ArtifactKind::Model => {
                if let Some(model) = plan.models.get(file.index) {
                    context.insert("model", model);
                }
            }
            ArtifactKind::Mutation | ArtifactKind::Resource => {
                if let Some(api) = plan.apis.get(file.index) {
                    context.insert("api", api);
                }
            }
        }

        let name = file.kind.template_name();
        self.tera
            .render(name, &context)
            .map_err(|err| template_error(name, &err))
    }

    /// Render every planned file under `output_dir`, returning the written paths.
    ///
    /// Skipped artifacts are never written; existing files at their paths are left alone.
    pub fn write_all(&self, plan: &GenerationPlan, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for file in plan.planned_files() {
            let contents = self.render(plan, &file)?;
            let path = output_dir.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|source| CliError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&path, contents).map_err(|source| CliError::Write {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), kind = ?file.kind, "Wrote artifact.");
            written.push(path);
        }
        info!(
            written = written.len(),
            skipped = plan.skip_set.len(),
            output = %output_dir.display(),
            "Rendered generation plan."
        );
        Ok(written)
    }
}

/// Model name -> file stem, for import lines.
fn model_files(plan: &GenerationPlan) -> BTreeMap<&str, &str> {
    plan.models
        .iter()
        .map(|model| (model.name.as_str(), model.file_name.as_str()))
        .collect()
}

fn template_error(template: &str, err: &tera::Error) -> CliError {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    CliError::Template {
        template: template.to_string(),
        message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use ngen_core::{GeneratorOptions, generate};

    const SPEC: &str = r##"{
  "paths": {
    "/courses/{courseId}": {
      "get": { "operationId": "getCourse", "tags": ["Courses"], "summary": "Fetch one course",
        "parameters": [
          { "name": "courseId", "in": "path", "required": true, "schema": { "type": "integer" } },
          { "name": "expand", "in": "query", "schema": { "type": "string" } }
        ],
        "responses": { "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Course" } } } } } },
      "put": { "operationId": "updateCourse", "tags": ["Courses"],
        "parameters": [{ "name": "courseId", "in": "path", "required": true, "schema": { "type": "integer" } }],
        "requestBody": { "required": true, "content": { "application/json": { "schema": { "$ref": "#/components/schemas/CourseUpdate" } } } },
        "responses": { "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Course" } } } } } }
    }
  },
  "components": { "schemas": {
    "Course": { "type": "object", "required": ["id"], "properties": { "id": { "type": "integer" }, "title": { "type": "string" } } },
    "CourseUpdate": { "type": "object", "properties": { "title": { "type": "string" } } }
  } }
}"##;

    fn rendered(plan: &GenerationPlan, path: &str) -> String {
        let renderer = Renderer::new(None).unwrap();
        let file = plan
            .planned_files()
            .into_iter()
            .find(|f| f.path == path)
            .unwrap();
        renderer.render(plan, &file).unwrap()
    }

    #[test]
    fn test_model_uses_readonly_for_output_models() {
        let plan = generate(SPEC, GeneratorOptions::default()).unwrap();

        let course = rendered(&plan, "models/course.ts");
        assert!(course.contains("export interface Course {"));
        assert!(course.contains("readonly id: number;"));
        assert!(course.contains("readonly title?: string;"));

        let update = rendered(&plan, "models/course-update.ts");
        assert!(update.contains("  title?: string;"));
        assert!(!update.contains("readonly"));
    }

    #[test]
    fn test_composed_model_extends_its_parents() {
        let spec = r##"{ "paths": {}, "components": { "schemas": {
            "Entity": { "type": "object", "required": ["id"], "properties": { "id": { "type": "integer" } } },
            "Lesson": { "allOf": [
                { "$ref": "#/components/schemas/Entity" },
                { "type": "object", "properties": { "topic": { "type": "string" } } }
            ] }
        } } }"##;
        let plan = generate(spec, GeneratorOptions::default()).unwrap();

        let lesson = rendered(&plan, "models/lesson.ts");
        assert!(lesson.contains("import { Entity } from './entity';"));
        assert!(lesson.contains("export interface Lesson extends Entity {"));
        assert!(lesson.contains("readonly id: number;"));
        assert!(lesson.contains("readonly topic?: string;"));
    }

    #[test]
    fn test_service_holds_mutations_only() {
        let plan = generate(SPEC, GeneratorOptions::default()).unwrap();
        let service = rendered(&plan, "api/courses-api.ts");

        assert!(service.contains("export class CoursesApi {"));
        assert!(service.contains("private readonly http = inject(HttpClient);"));
        assert!(service.contains("updateCourse(courseId: number, body: CourseUpdate, "));
        assert!(service.contains("`/courses/${courseId}`"));
        assert!(service.contains("import { Course } from '../models/course';"));
        assert!(!service.contains("getCourse"));
    }

    #[test]
    fn test_resource_file_uses_value_dialect() {
        let plan = generate(SPEC, GeneratorOptions::default()).unwrap();
        let resources = rendered(&plan, "api/courses-resources.ts");

        assert!(resources.contains("/** Fetch one course */"));
        assert!(resources.contains("export function getCourseResource("));
        assert!(resources.contains("const courseIdValue = courseId();"));
        assert!(resources.contains("url: `/courses/${courseIdValue}`,"));
        assert!(resources.contains("export interface GetCourseParams {"));
    }

    #[test]
    fn test_constructor_injection_option() {
        let options = GeneratorOptions {
            use_injected_dependency: false,
            ..GeneratorOptions::default()
        };
        let plan = generate(SPEC, options).unwrap();
        let service = rendered(&plan, "api/courses-api.ts");
        assert!(service.contains("constructor(private readonly http: HttpClient) {}"));
        assert!(!service.contains("inject("));
    }

    #[test]
    fn test_template_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("model.ts.tera"),
            "// {{ model.name }} from {{ generator }}\n",
        )
        .unwrap();

        let plan = generate(SPEC, GeneratorOptions::default()).unwrap();
        let renderer = Renderer::new(Some(dir.path())).unwrap();
        let file = &plan.planned_files()[0];
        assert_eq!(renderer.render(&plan, file).unwrap().trim_end(), "// Course from angular");
    }

    #[test]
    fn test_broken_override_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("api-resource.ts.tera"), "{% if %}").unwrap();

        let err = Renderer::new(Some(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            CliError::Template { ref template, .. } if template == "api-resource.ts.tera"
        ));
    }
}
