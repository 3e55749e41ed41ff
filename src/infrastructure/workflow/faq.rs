//! FAQ workflows: PRD to FAQ, editorial review, and illustrative images

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use validator::Validate;

use crate::domain::agent::{Agent, AgentError};
use crate::domain::artifact::artifact_timestamp;
use crate::domain::image::ImageGenerator;
use crate::domain::llm::{LlmJsonSchema, LlmProvider};
use crate::domain::workflow::{
    step_output, FieldType, Step, StepError, StepInput, TriggerSchema, Workflow, WorkflowError, WorkflowId,
};

pub const FAQ_WORKFLOW_ID: &str = "faq";
pub const FAQ_IMAGES_WORKFLOW_ID: &str = "faq-images";

pub const GENERATE_FAQ_STEP: &str = "generate-faq";
pub const IMPROVE_FAQ_STEP: &str = "improve-faq";
pub const GENERATE_FAQ_IMAGES_STEP: &str = "generate-faq-images";

/// Trigger field holding the PRD text
pub const PRD_CONTENT_FIELD: &str = "prdContent";

/// Images produced per FAQ
pub const FAQ_IMAGE_COUNT: usize = 2;

/// Longest prompt accepted by the default image model
pub const MAX_IMAGE_PROMPT_CHARS: usize = 1000;

const FAQ_AGENT_NAME: &str = "FAQ Agent";
const FAQ_AGENT_INSTRUCTIONS: &str = "You are a Product Manager and editor. Your task is to analyze PRD \
(Product Requirements Document) content and write clear, comprehensive FAQ content for new features.";

const FAQ_EDITOR_NAME: &str = "FAQ Editor Agent";
const FAQ_EDITOR_INSTRUCTIONS: &str = "You are a quality assurance expert specializing in reviewing FAQ content. \
You analyze FAQ documents for accuracy, clarity, organization and grammar, and rewrite them so they \
answer user questions clearly and accurately.";

const FAQ_IMAGE_AGENT_NAME: &str = "FAQ Image Agent";

pub fn faq_agent(provider: Arc<dyn LlmProvider>, model: &str) -> Agent {
    Agent::new(FAQ_AGENT_NAME, FAQ_AGENT_INSTRUCTIONS, model, provider)
}

pub fn faq_editor_agent(provider: Arc<dyn LlmProvider>, model: &str) -> Agent {
    Agent::new(FAQ_EDITOR_NAME, FAQ_EDITOR_INSTRUCTIONS, model, provider)
}

fn faq_trigger_schema() -> TriggerSchema {
    TriggerSchema::new().required(PRD_CONTENT_FIELD, FieldType::String)
}

/// PRD to FAQ, then editorial review of the FAQ
pub fn faq_workflow(provider: Arc<dyn LlmProvider>, model: &str) -> Result<Workflow, WorkflowError> {
    let steps: Vec<Arc<dyn Step>> = vec![
        Arc::new(GenerateFaqStep::new(faq_agent(provider.clone(), model))),
        Arc::new(ImproveFaqStep::new(faq_editor_agent(provider, model))),
    ];

    Ok(Workflow::new(WorkflowId::new(FAQ_WORKFLOW_ID)?, faq_trigger_schema(), steps)?
        .with_description("Generate an FAQ from a PRD and improve it"))
}

/// PRD to FAQ, then images illustrating the FAQ
pub fn faq_images_workflow(
    provider: Arc<dyn LlmProvider>,
    model: &str,
    images: Arc<dyn ImageGenerator>,
) -> Result<Workflow, WorkflowError> {
    let steps: Vec<Arc<dyn Step>> = vec![
        Arc::new(GenerateFaqStep::new(faq_agent(provider, model))),
        Arc::new(GenerateFaqImagesStep::new(images)),
    ];

    Ok(Workflow::new(WorkflowId::new(FAQ_IMAGES_WORKFLOW_ID)?, faq_trigger_schema(), steps)?
        .with_description("Generate an FAQ from a PRD and illustrate it"))
}


#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct FaqDraft {
    #[validate(length(min = 1))]
    faq_content: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct FaqRevision {
    #[validate(length(min = 1))]
    improved_faq_content: String,
    changes_explanation: String,
}

/// Result of `generate-faq`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqResult {
    pub faq_content: String,
    pub saved_file_path: String,
}

/// Result of `improve-faq`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovedFaqResult {
    pub original_faq_content: String,
    pub improved_faq_content: String,
    pub changes_explanation: String,
    pub saved_file_path: String,
}

/// Result of `generate-faq-images`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqImagesResult {
    pub image_descriptions: Vec<String>,
    pub saved_image_paths: Vec<String>,
}

/// Writes an FAQ from the PRD in the trigger data
#[derive(Debug)]
pub struct GenerateFaqStep {
    agent: Agent,
}

impl GenerateFaqStep {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    fn prompt(prd: &str) -> String {
        format!(
            "Based on the following Product Requirements Document (PRD) content, generate a comprehensive FAQ section.\n\
             Include questions that potential users or stakeholders might ask about this product, each with a clear, \
             concise answer based on the PRD. Order them from basic to specific and cover features, use cases, \
             limitations and technical requirements.\n\n\
             PRD CONTENT:\n{}",
            prd
        )
    }

    fn schema() -> LlmJsonSchema {
        LlmJsonSchema::new(
            "faq",
            json!({
                "type": "object",
                "properties": {
                    "faqContent": {
                        "type": "string",
                        "description": "A well-formatted FAQ section with questions and answers based on the PRD"
                    }
                },
                "required": ["faqContent"],
                "additionalProperties": false
            }),
        )
    }
}

#[async_trait]
impl Step for GenerateFaqStep {
    fn id(&self) -> &str {
        GENERATE_FAQ_STEP
    }

    async fn execute(&self, input: StepInput<'_>) -> Result<Value, StepError> {
        let prd = input.trigger_str(PRD_CONTENT_FIELD)?;
        if prd.trim().is_empty() {
            return Err(StepError::missing_input("prdContent is empty"));
        }

        let draft: FaqDraft = self
            .agent
            .generate_structured(&Self::prompt(prd), Self::schema())
            .await?;

        let name = format!("faq_{}.md", artifact_timestamp());
        let saved = input.services.artifacts.save_text(&name, &draft.faq_content).await?;

        info!(path = %saved, "FAQ content saved");

        step_output(&FaqResult {
            faq_content: draft.faq_content,
            saved_file_path: saved.to_string(),
        })
    }
}

/// Reviews and rewrites the generated FAQ
#[derive(Debug)]
pub struct ImproveFaqStep {
    agent: Agent,
}

impl ImproveFaqStep {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    fn prompt(faq: &str) -> String {
        format!(
            "Review and improve the following FAQ content:\n\n{}\n\n\
             Improve clarity and conciseness, add missing important questions, keep answers comprehensive \
             and user-friendly, order questions from basic to advanced, format for readability and fix \
             inconsistencies or inaccuracies.\n\n\
             Return the complete improved FAQ content.",
            faq
        )
    }

    fn schema() -> LlmJsonSchema {
        LlmJsonSchema::new(
            "improved_faq",
            json!({
                "type": "object",
                "properties": {
                    "improvedFaqContent": {
                        "type": "string",
                        "description": "The improved FAQ content"
                    },
                    "changesExplanation": {
                        "type": "string",
                        "description": "Brief explanation of the improvements made to the original FAQ"
                    }
                },
                "required": ["improvedFaqContent", "changesExplanation"],
                "additionalProperties": false
            }),
        )
    }
}

#[async_trait]
impl Step for ImproveFaqStep {
    fn id(&self) -> &str {
        IMPROVE_FAQ_STEP
    }

    fn depends_on(&self) -> &[&'static str] {
        &[GENERATE_FAQ_STEP]
    }

    async fn execute(&self, input: StepInput<'_>) -> Result<Value, StepError> {
        let faq: FaqResult = input.dependency_as(GENERATE_FAQ_STEP)?;

        let revision: FaqRevision = self
            .agent
            .generate_structured(&Self::prompt(&faq.faq_content), Self::schema())
            .await?;

        let name = format!("improved_faq_{}.md", artifact_timestamp());
        let saved = input
            .services
            .artifacts
            .save_text(&name, &revision.improved_faq_content)
            .await?;

        info!(path = %saved, changes = %revision.changes_explanation, "Improved FAQ content saved");

        step_output(&ImprovedFaqResult {
            original_faq_content: faq.faq_content,
            improved_faq_content: revision.improved_faq_content,
            changes_explanation: revision.changes_explanation,
            saved_file_path: saved.to_string(),
        })
    }
}

/// Generates exactly two images illustrating the FAQ
#[derive(Debug)]
pub struct GenerateFaqImagesStep {
    generator: Arc<dyn ImageGenerator>,
}

impl GenerateFaqImagesStep {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }

    fn prompt(faq: &str) -> String {
        let head = "Informative, visually appealing illustration of the main topics of this FAQ. \
                    First image: high-level summary of key concepts. Second image: the most important feature.\n\n";
        let budget = MAX_IMAGE_PROMPT_CHARS.saturating_sub(head.chars().count());
        let excerpt: String = faq.chars().take(budget).collect();
        format!("{}{}", head, excerpt)
    }
}

#[async_trait]
impl Step for GenerateFaqImagesStep {
    fn id(&self) -> &str {
        GENERATE_FAQ_IMAGES_STEP
    }

    fn depends_on(&self) -> &[&'static str] {
        &[GENERATE_FAQ_STEP]
    }

    async fn execute(&self, input: StepInput<'_>) -> Result<Value, StepError> {
        let faq: FaqResult = input.dependency_as(GENERATE_FAQ_STEP)?;

        let images = self
            .generator
            .generate_images(&Self::prompt(&faq.faq_content), FAQ_IMAGE_COUNT)
            .await?;

        if images.len() != FAQ_IMAGE_COUNT {
            return Err(AgentError::schema_violation(
                FAQ_IMAGE_AGENT_NAME,
                format!("expected exactly {} images, got {}", FAQ_IMAGE_COUNT, images.len()),
            )
            .into());
        }

        // Decode everything before writing so a bad payload leaves no partial output
        let decoded = images
            .iter()
            .map(|image| image.decode())
            .collect::<Result<Vec<_>, _>>()?;

        let timestamp = artifact_timestamp();
        let mut saved_image_paths = Vec::with_capacity(decoded.len());

        for (i, bytes) in decoded.iter().enumerate() {
            let name = format!("faq_image_{}_{}.png", timestamp, i + 1);
            let saved = input.services.artifacts.save_binary(&name, bytes).await?;
            info!(path = %saved, "FAQ image saved");
            saved_image_paths.push(saved.to_string());
        }

        let image_descriptions = images
            .into_iter()
            .map(|image| image.description.unwrap_or_default())
            .collect();

        step_output(&FaqImagesResult {
            image_descriptions,
            saved_image_paths,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::{ArtifactRef, MockArtifactStore};
    use crate::domain::image::mock::MockImageGenerator;
    use crate::domain::image::GeneratedImage;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::workflow::{StepServices, WorkflowExecutor};
    use crate::infrastructure::workflow::StepGraphExecutor;

    const PNG_B64: &str = "iVBORw0KGgo=";

    fn executor(store: MockArtifactStore) -> StepGraphExecutor {
        StepGraphExecutor::new(StepServices::new(Arc::new(store)))
    }

    fn recording_store() -> MockArtifactStore {
        let mut store = MockArtifactStore::new();
        store
            .expect_save_text()
            .returning(|name, _| Ok(ArtifactRef::new(format!("output/faqs/{}", name))));
        store
            .expect_save_binary()
            .returning(|name, _| Ok(ArtifactRef::new(format!("output/faq-images/{}", name))));
        store
    }

    #[tokio::test]
    async fn test_faq_workflow_generates_and_improves() {
        let provider = Arc::new(
            MockLlmProvider::new("mock")
                .with_content(r#"{"faqContent": "Q: What is it? A: A search feature."}"#)
                .with_content(
                    r#"{"improvedFaqContent": "Q: What is it?\nA: A fast search feature.", "changesExplanation": "Tightened wording"}"#,
                ),
        );
        let workflow = faq_workflow(provider.clone(), "gpt-4o").unwrap();

        let outcome = executor(recording_store())
            .run(&workflow, json!({"prdContent": "Search across all documents."}))
            .await
            .unwrap();

        assert_eq!(outcome.step_id, IMPROVE_FAQ_STEP);
        let result: ImprovedFaqResult = serde_json::from_value(outcome.result).unwrap();
        assert_eq!(result.original_faq_content, "Q: What is it? A: A search feature.");
        assert_eq!(result.changes_explanation, "Tightened wording");
        assert!(result.saved_file_path.starts_with("output/faqs/improved_faq_"));
        assert!(result.saved_file_path.ends_with(".md"));

        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].messages.last().unwrap().content_text().contains("Search across all documents."));
        assert!(requests[1].messages.last().unwrap().content_text().contains("A: A search feature."));
    }

    #[tokio::test]
    async fn test_missing_prd_content_makes_no_calls() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"faqContent": "x"}"#));
        let workflow = faq_workflow(provider.clone(), "gpt-4o").unwrap();

        // no expectations: any save would panic
        let result = executor(MockArtifactStore::new())
            .run(&workflow, json!({"prd": "wrong key"}))
            .await;

        assert!(matches!(result, Err(WorkflowError::InvalidTrigger(_))));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_faq_is_schema_violation() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"faqContent": ""}"#));
        let workflow = faq_workflow(provider.clone(), "gpt-4o").unwrap();

        let err = executor(MockArtifactStore::new())
            .run(&workflow, json!({"prdContent": "PRD"}))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(GENERATE_FAQ_STEP));
        assert!(matches!(
            err,
            WorkflowError::StepFailed {
                source: StepError::Agent(AgentError::SchemaViolation { .. }),
                ..
            }
        ));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_faq_images_workflow_saves_two_images() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"faqContent": "Q: A"}"#));
        let images = Arc::new(MockImageGenerator::new(vec![
            GeneratedImage::new(PNG_B64).with_description("Overview"),
            GeneratedImage::new(PNG_B64).with_description("Key feature"),
        ]));
        let workflow = faq_images_workflow(provider, "gpt-4o", images.clone()).unwrap();

        let mut store = MockArtifactStore::new();
        store
            .expect_save_text()
            .times(1)
            .returning(|name, _| Ok(ArtifactRef::new(name.to_string())));
        store
            .expect_save_binary()
            .withf(|name, content| name.starts_with("faq_image_") && name.ends_with(".png") && content.len() == 8)
            .times(2)
            .returning(|name, _| Ok(ArtifactRef::new(name.to_string())));

        let outcome = executor(store)
            .run(&workflow, json!({"prdContent": "PRD"}))
            .await
            .unwrap();

        assert_eq!(outcome.step_id, GENERATE_FAQ_IMAGES_STEP);
        let result: FaqImagesResult = serde_json::from_value(outcome.result).unwrap();
        assert_eq!(result.image_descriptions, vec!["Overview", "Key feature"]);
        assert_eq!(result.saved_image_paths.len(), 2);
        assert!(result.saved_image_paths[0].ends_with("_1.png"));
        assert!(result.saved_image_paths[1].ends_with("_2.png"));
        assert_eq!(images.call_count(), 1);
    }

    #[tokio::test]
    async fn test_wrong_image_count_is_schema_violation() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content(r#"{"faqContent": "Q: A"}"#));
        let images = Arc::new(MockImageGenerator::new(vec![GeneratedImage::new(PNG_B64); 3]));
        let workflow = faq_images_workflow(provider, "gpt-4o", images).unwrap();

        let mut store = MockArtifactStore::new();
        store
            .expect_save_text()
            .returning(|name, _| Ok(ArtifactRef::new(name.to_string())));
        store.expect_save_binary().never();

        let err = executor(store)
            .run(&workflow, json!({"prdContent": "PRD"}))
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(GENERATE_FAQ_IMAGES_STEP));
        assert!(matches!(
            err,
            WorkflowError::StepFailed {
                source: StepError::Agent(AgentError::SchemaViolation { .. }),
                ..
            }
        ));
    }

    #[test]
    fn test_image_prompt_fits_model_limit() {
        let long_faq = "Q: question? A: answer. ".repeat(200);

        let prompt = GenerateFaqImagesStep::prompt(&long_faq);

        assert_eq!(prompt.chars().count(), MAX_IMAGE_PROMPT_CHARS);
        assert!(prompt.contains("Q: question?"));
    }

    #[test]
    fn test_workflow_shapes() {
        let provider: Arc<dyn LlmProvider> = Arc::new(MockLlmProvider::new("mock"));
        let images = Arc::new(MockImageGenerator::new(vec![]));

        let faq = faq_workflow(provider.clone(), "gpt-4o").unwrap();
        let ids: Vec<_> = faq.steps().iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids, vec![GENERATE_FAQ_STEP, IMPROVE_FAQ_STEP]);

        let with_images = faq_images_workflow(provider, "gpt-4o", images).unwrap();
        assert_eq!(with_images.id().as_str(), FAQ_IMAGES_WORKFLOW_ID);
        assert_eq!(with_images.get_step_index(GENERATE_FAQ_IMAGES_STEP), Some(1));
    }
}
