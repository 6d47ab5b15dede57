use std::sync::Arc;

use onyx_ext_core::{NewProject, Project, UserIdentity};
use onyx_ext_llm::{LessonPlanRequest, LlmClient};
use onyx_ext_storage::traits::{FolderStore, ProjectStore};

use crate::validation::{check_tier, required_name};
use crate::ServiceError;

const LESSON_PLAN_PRODUCT_TYPE: &str = "lesson_plan";

/// Generates lesson plans with the LLM and stores each one as a project.
#[derive(Clone)]
pub struct LessonPlanService {
    llm: Option<Arc<LlmClient>>,
    projects: Arc<dyn ProjectStore>,
    folders: Arc<dyn FolderStore>,
}

impl LessonPlanService {
    #[must_use]
    pub fn new(
        llm: Option<Arc<LlmClient>>,
        projects: Arc<dyn ProjectStore>,
        folders: Arc<dyn FolderStore>,
    ) -> Self {
        Self { llm, projects, folders }
    }

    pub async fn generate(
        &self,
        user: &UserIdentity,
        mut request: LessonPlanRequest,
    ) -> Result<Project, ServiceError> {
        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("LLM_API_URL / LLM_API_KEY are not set".to_owned()))?;
        request.topic = required_name("topic", &request.topic)?;
        check_tier(request.quality_tier.as_deref())?;
        if let Some(folder_id) = request.folder_id {
            match self.folders.get_folder(folder_id).await? {
                Some(f) if f.onyx_user_id == user.id => {},
                _ => {
                    return Err(ServiceError::InvalidInput(format!("folder {folder_id} does not exist")));
                },
            }
        }

        let plan = llm.generate_lesson_plan(&request).await?;
        let completion_time = i32::try_from(plan.total_minutes()).unwrap_or(i32::MAX);
        let input = NewProject {
            project_name: plan.title.clone(),
            product_type: LESSON_PLAN_PRODUCT_TYPE.to_owned(),
            microproduct_name: Some(request.topic.clone()),
            microproduct_content: serde_json::to_value(&plan)?,
            quality_tier: request.quality_tier.clone(),
            folder_id: request.folder_id,
            completion_time: Some(completion_time),
        };
        let project = self.projects.create_project(&user.id, &input).await?;
        tracing::info!(project_id = project.id, user = %user.id, minutes = completion_time, "lesson plan stored");
        Ok(project)
    }
}
