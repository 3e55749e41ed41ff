//! Workflow domain entity

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::WorkflowError;
use super::executor::Step;

/// Maximum length for workflow IDs
pub const MAX_ID_LENGTH: usize = 50;

/// Regex pattern for valid workflow and step IDs: alphanumeric and hyphens
static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]*[a-zA-Z0-9]$|^[a-zA-Z0-9]$").unwrap());

/// Validated workflow identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WorkflowId(String);

impl WorkflowId {
    /// Create a new validated workflow ID
    pub fn new(id: impl Into<String>) -> Result<Self, WorkflowError> {
        let id = id.into();
        validate_workflow_id(&id)?;
        Ok(Self(id))
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WorkflowId {
    type Error = WorkflowError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WorkflowId> for String {
    fn from(id: WorkflowId) -> Self {
        id.0
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for WorkflowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a workflow or step ID string
pub fn validate_workflow_id(id: &str) -> Result<(), WorkflowError> {
    if id.is_empty() {
        return Err(WorkflowError::validation("ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(WorkflowError::validation(format!(
            "ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(WorkflowError::validation(format!(
            "Invalid ID '{}': must be alphanumeric with hyphens, start and end with alphanumeric",
            id
        )));
    }

    Ok(())
}

/// JSON type expected for a trigger field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldType {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        };
        write!(f, "{}", name)
    }
}

/// A single field of the trigger schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerField {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
}

/// Shape of the data a workflow is started with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerSchema {
    fields: Vec<TriggerField>,
}

impl TriggerSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(TriggerField {
            name: name.into(),
            field_type,
            required: true,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(TriggerField {
            name: name.into(),
            field_type,
            required: false,
        });
        self
    }

    pub fn fields(&self) -> &[TriggerField] {
        &self.fields
    }

    /// Check trigger data against the schema
    pub fn validate(&self, trigger: &Value) -> Result<(), WorkflowError> {
        let object = trigger
            .as_object()
            .ok_or_else(|| WorkflowError::invalid_trigger("trigger data must be a JSON object"))?;

        for field in &self.fields {
            match object.get(&field.name) {
                None | Some(Value::Null) if field.required => {
                    return Err(WorkflowError::invalid_trigger(format!(
                        "missing required field '{}'",
                        field.name
                    )));
                }
                None | Some(Value::Null) => {}
                Some(value) if !field.field_type.matches(value) => {
                    return Err(WorkflowError::invalid_trigger(format!(
                        "field '{}' must be of type {}",
                        field.name, field.field_type
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

/// A workflow definition: an ordered list of steps whose declared order is a topological order
#[derive(Debug, Clone)]
pub struct Workflow {
    id: WorkflowId,
    description: Option<String>,
    trigger_schema: TriggerSchema,
    steps: Vec<Arc<dyn Step>>,
}

impl Workflow {
    /// Create a workflow, checking step ids and dependency ordering
    pub fn new(
        id: WorkflowId,
        trigger_schema: TriggerSchema,
        steps: Vec<Arc<dyn Step>>,
    ) -> Result<Self, WorkflowError> {
        if steps.is_empty() {
            return Err(WorkflowError::empty_workflow(id.as_str()));
        }

        let mut declared: HashSet<&str> = HashSet::new();

        for step in &steps {
            validate_workflow_id(step.id())?;

            for dependency in step.depends_on() {
                if !declared.contains(dependency) {
                    return Err(WorkflowError::unknown_dependency(step.id(), *dependency));
                }
            }

            if !declared.insert(step.id()) {
                return Err(WorkflowError::duplicate_step_id(step.id()));
            }
        }

        Ok(Self {
            id,
            description: None,
            trigger_schema,
            steps,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn trigger_schema(&self) -> &TriggerSchema {
        &self.trigger_schema
    }

    pub fn steps(&self) -> &[Arc<dyn Step>] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Get the index of a step by id
    pub fn get_step_index(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::executor::mock::StaticStep;
    use serde_json::json;

    #[test]
    fn test_valid_workflow_ids() {
        assert!(WorkflowId::new("faq").is_ok());
        assert!(WorkflowId::new("faq-images").is_ok());
        assert!(WorkflowId::new("a").is_ok());
    }

    #[test]
    fn test_invalid_workflow_ids() {
        assert!(WorkflowId::new("").is_err());
        assert!(WorkflowId::new("-faq").is_err());
        assert!(WorkflowId::new("faq_images").is_err());
        assert!(WorkflowId::new("a".repeat(51)).is_err());
    }

    #[test]
    fn test_trigger_schema_accepts_valid_data() {
        let schema = TriggerSchema::new()
            .required("prdContent", FieldType::String)
            .optional("topK", FieldType::Number);

        assert!(schema.validate(&json!({"prdContent": "PRD"})).is_ok());
        assert!(schema.validate(&json!({"prdContent": "PRD", "topK": 3})).is_ok());
    }

    #[test]
    fn test_trigger_schema_rejects_missing_field() {
        let schema = TriggerSchema::new().required("prdContent", FieldType::String);

        let err = schema.validate(&json!({})).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTrigger(ref m) if m.contains("prdContent")));

        let err = schema.validate(&json!({"prdContent": null})).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTrigger(_)));
    }

    #[test]
    fn test_trigger_schema_rejects_wrong_type_and_non_object() {
        let schema = TriggerSchema::new().required("question", FieldType::String);

        let err = schema.validate(&json!({"question": 42})).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTrigger(ref m) if m.contains("string")));

        let err = schema.validate(&json!("question")).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTrigger(_)));
    }

    #[test]
    fn test_workflow_construction() {
        let workflow = Workflow::new(
            WorkflowId::new("faq").unwrap(),
            TriggerSchema::new(),
            vec![
                Arc::new(StaticStep::new("generate-faq", json!({}))),
                Arc::new(StaticStep::new("improve-faq", json!({})).with_dependencies(&["generate-faq"])),
            ],
        )
        .unwrap()
        .with_description("FAQ generation");

        assert_eq!(workflow.step_count(), 2);
        assert_eq!(workflow.get_step_index("improve-faq"), Some(1));
        assert_eq!(workflow.description(), Some("FAQ generation"));
    }

    #[test]
    fn test_workflow_rejects_duplicate_step_ids() {
        let result = Workflow::new(
            WorkflowId::new("faq").unwrap(),
            TriggerSchema::new(),
            vec![
                Arc::new(StaticStep::new("generate-faq", json!({}))),
                Arc::new(StaticStep::new("generate-faq", json!({}))),
            ],
        );

        assert!(matches!(result, Err(WorkflowError::DuplicateStepId(ref id)) if id == "generate-faq"));
    }

    #[test]
    fn test_workflow_rejects_forward_dependency() {
        let result = Workflow::new(
            WorkflowId::new("question").unwrap(),
            TriggerSchema::new(),
            vec![
                Arc::new(StaticStep::new("generate-answer", json!({})).with_dependencies(&["route-question"])),
                Arc::new(StaticStep::new("route-question", json!({}))),
            ],
        );

        assert!(matches!(
            result,
            Err(WorkflowError::UnknownDependency { ref step, ref dependency })
                if step == "generate-answer" && dependency == "route-question"
        ));
    }

    #[test]
    fn test_workflow_rejects_self_dependency_and_empty() {
        let result = Workflow::new(
            WorkflowId::new("loop").unwrap(),
            TriggerSchema::new(),
            vec![Arc::new(StaticStep::new("a", json!({})).with_dependencies(&["a"]))],
        );
        assert!(matches!(result, Err(WorkflowError::UnknownDependency { .. })));

        let result = Workflow::new(WorkflowId::new("empty").unwrap(), TriggerSchema::new(), vec![]);
        assert!(matches!(result, Err(WorkflowError::EmptyWorkflow(_))));
    }
}
