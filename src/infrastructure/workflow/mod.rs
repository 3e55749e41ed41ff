//! Workflow execution and the built-in workflow definitions

mod executor_impl;
pub mod faq;
pub mod question;

pub use executor_impl::StepGraphExecutor;
pub use faq::{faq_images_workflow, faq_workflow};
pub use question::question_workflow;
