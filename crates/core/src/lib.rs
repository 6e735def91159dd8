pub mod activity;
pub mod catalog;
pub mod diagram;
pub mod document;
pub mod llm_client;
pub mod orchestrator;
pub mod partial_json;
pub mod planner;
pub mod prompts;
pub mod request;
pub mod snapshot;
pub mod validator;

pub use activity::{Activity, ActivityConfig};
pub use catalog::{ActivityTypeCatalog, ActivityTypeDescriptor};
pub use diagram::DiagramRepairService;
pub use llm_client::{GenerationClient, OpenAICompatibleClient};
pub use orchestrator::{ActivityGenerator, ActivityStream};
pub use planner::{ConceptPlanner, LLMConceptPlanner, StaticConceptPlanner};
pub use prompts::Prompts;
pub use request::GenerationRequest;
