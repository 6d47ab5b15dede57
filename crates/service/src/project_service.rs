use std::sync::Arc;

use onyx_ext_core::{
    effective_folder_tiers, rollup_project, HoursTotals, NewProject, Project, ProjectUpdate,
    QualityTier, TrashedProject, UserIdentity,
};
use onyx_ext_render::{render_project_html, PdfRenderer};
use onyx_ext_storage::traits::{FolderStore, ProjectStore, TrashStore};
use serde::Serialize;

use crate::validation::{check_completion_time, check_tier, required_name};
use crate::{AccessService, ServiceError};

/// A project with its rolled-up hours, as listed to the owner.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub default_tier: QualityTier,
    pub totals: HoursTotals,
}

#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    trash: Arc<dyn TrashStore>,
    folders: Arc<dyn FolderStore>,
    access: AccessService,
    pdf: Arc<dyn PdfRenderer>,
}

impl ProjectService {
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        trash: Arc<dyn TrashStore>,
        folders: Arc<dyn FolderStore>,
        access: AccessService,
        pdf: Arc<dyn PdfRenderer>,
    ) -> Self {
        Self { projects, trash, folders, access, pdf }
    }

    async fn owned(&self, user: &UserIdentity, id: i64) -> Result<Project, ServiceError> {
        match self.projects.get_project(id).await? {
            Some(p) if p.onyx_user_id == user.id => Ok(p),
            _ => Err(ServiceError::not_found("project", id)),
        }
    }

    async fn check_folder(&self, user: &UserIdentity, folder_id: Option<i64>) -> Result<(), ServiceError> {
        let Some(folder_id) = folder_id else {
            return Ok(());
        };
        match self.folders.get_folder(folder_id).await? {
            Some(f) if f.onyx_user_id == user.id => Ok(()),
            _ => Err(ServiceError::InvalidInput(format!("folder {folder_id} does not exist"))),
        }
    }

    pub async fn list(
        &self,
        user: &UserIdentity,
        folder_id: Option<i64>,
    ) -> Result<Vec<ProjectSummary>, ServiceError> {
        let projects = self.projects.list_projects(&user.id, folder_id).await?;
        let folders = self.folders.list_folders(&user.id).await?;
        let folder_tiers = effective_folder_tiers(&folders);
        Ok(projects
            .into_iter()
            .map(|project| {
                let folder_tier =
                    project.folder_id.and_then(|f| folder_tiers.get(&f)).and_then(|t| t.as_deref());
                let rollup = rollup_project(&project, folder_tier);
                ProjectSummary { project, default_tier: rollup.default_tier, totals: rollup.totals }
            })
            .collect())
    }

    /// Fetch a project the user owns or has been granted access to.
    pub async fn get(&self, user: &UserIdentity, id: i64) -> Result<Project, ServiceError> {
        let project = self
            .projects
            .get_project(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("project", id))?;
        if self.access.can_view_project(user, &project).await? {
            Ok(project)
        } else {
            Err(ServiceError::not_found("project", id))
        }
    }

    pub async fn create(&self, user: &UserIdentity, mut input: NewProject) -> Result<Project, ServiceError> {
        input.project_name = required_name("project_name", &input.project_name)?;
        check_tier(input.quality_tier.as_deref())?;
        check_completion_time(input.completion_time)?;
        self.check_folder(user, input.folder_id).await?;
        if input.microproduct_content.is_null() {
            input.microproduct_content = serde_json::json!({});
        }
        let project = self.projects.create_project(&user.id, &input).await?;
        tracing::info!(project_id = project.id, user = %user.id, "project created");
        Ok(project)
    }

    pub async fn update(
        &self,
        user: &UserIdentity,
        id: i64,
        mut update: ProjectUpdate,
    ) -> Result<Project, ServiceError> {
        let current = self.owned(user, id).await?;
        if update.is_empty() {
            return Ok(current);
        }
        if let Some(name) = update.project_name.as_deref() {
            update.project_name = Some(required_name("project_name", name)?);
        }
        check_tier(update.quality_tier.as_deref())?;
        check_completion_time(update.completion_time)?;
        Ok(self.projects.update_project(id, &update).await?)
    }

    pub async fn move_to_folder(
        &self,
        user: &UserIdentity,
        id: i64,
        folder_id: Option<i64>,
    ) -> Result<Project, ServiceError> {
        self.owned(user, id).await?;
        self.check_folder(user, folder_id).await?;
        Ok(self.projects.move_project(id, folder_id).await?)
    }

    pub async fn trash(&self, user: &UserIdentity, id: i64) -> Result<TrashedProject, ServiceError> {
        self.owned(user, id).await?;
        Ok(self.trash.trash_project(id).await?)
    }

    pub async fn list_trash(&self, user: &UserIdentity) -> Result<Vec<TrashedProject>, ServiceError> {
        Ok(self.trash.list_trash(&user.id).await?)
    }

    async fn owned_trashed(&self, user: &UserIdentity, id: i64) -> Result<(), ServiceError> {
        match self.trash.get_trashed(id).await? {
            Some(t) if t.project.onyx_user_id == user.id => Ok(()),
            _ => Err(ServiceError::not_found("trashed project", id)),
        }
    }

    pub async fn restore(&self, user: &UserIdentity, id: i64) -> Result<Project, ServiceError> {
        self.owned_trashed(user, id).await?;
        let project = self.trash.restore_project(id).await?;
        tracing::info!(project_id = id, "project restored from trash");
        Ok(project)
    }

    pub async fn purge(&self, user: &UserIdentity, id: i64) -> Result<(), ServiceError> {
        self.owned_trashed(user, id).await?;
        self.trash.purge_project(id).await?;
        tracing::info!(project_id = id, "project purged");
        Ok(())
    }

    /// Export a viewable project as PDF. Returns the file name and bytes.
    pub async fn export_pdf(
        &self,
        user: &UserIdentity,
        id: i64,
    ) -> Result<(String, Vec<u8>), ServiceError> {
        let project = self.get(user, id).await?;
        let folders = self.folders.list_folders(&project.onyx_user_id).await?;
        let folder_tier = project
            .folder_id
            .and_then(|f| effective_folder_tiers(&folders).remove(&f))
            .flatten();
        let html = render_project_html(&project, folder_tier.as_deref());
        let pdf = self.pdf.render_pdf(&html).await?;
        Ok((pdf_file_name(project.display_name()), pdf))
    }
}

/// ASCII-only file name safe for `Content-Disposition`.
pub(crate) fn pdf_file_name(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() { "document.pdf".to_owned() } else { format!("{stem}.pdf") }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use onyx_ext_core::{NewFolder, QualityTier};
    use onyx_ext_render::RenderError;
    use onyx_ext_storage::traits::FolderStore;
    use serde_json::json;

    use super::*;
    use crate::test_support::{store, user, MemoryStore};

    struct EchoPdf;

    #[async_trait]
    impl PdfRenderer for EchoPdf {
        async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
            Ok(html.as_bytes().to_vec())
        }
    }

    fn service(store: &Arc<MemoryStore>) -> ProjectService {
        let access = AccessService::new(store.clone(), store.clone(), store.clone());
        ProjectService::new(store.clone(), store.clone(), store.clone(), access, Arc::new(EchoPdf))
    }

    fn new_project(name: &str) -> NewProject {
        serde_json::from_value(json!({
            "project_name": name,
            "microproduct_content": {"sections": [{"lessons": [{"title": "L", "completionTime": "1h"}]}]}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let store = store();
        let svc = service(&store);
        let alice = user("alice");

        assert!(matches!(svc.create(&alice, new_project("  ")).await, Err(ServiceError::InvalidInput(_))));
        let mut bad_tier = new_project("P");
        bad_tier.quality_tier = Some("platinum".to_owned());
        assert!(svc.create(&alice, bad_tier).await.is_err());
        let mut foreign_folder = new_project("P");
        let folder = store
            .create_folder("bob", &NewFolder { name: "F".to_owned(), parent_id: None, quality_tier: None })
            .await
            .unwrap();
        foreign_folder.folder_id = Some(folder.id);
        assert!(matches!(svc.create(&alice, foreign_folder).await, Err(ServiceError::InvalidInput(_))));

        let created = svc.create(&alice, new_project(" Course ")).await.unwrap();
        assert_eq!(created.project_name, "Course");
    }

    #[tokio::test]
    async fn test_list_carries_totals_with_folder_tier() {
        let store = store();
        let svc = service(&store);
        let alice = user("alice");
        let folder = store
            .create_folder(
                "alice",
                &NewFolder { name: "F".to_owned(), parent_id: None, quality_tier: Some("advanced".to_owned()) },
            )
            .await
            .unwrap();
        let mut input = new_project("P");
        input.folder_id = Some(folder.id);
        svc.create(&alice, input).await.unwrap();

        let listed = svc.list(&alice, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].default_tier, QualityTier::Advanced);
        assert_eq!(listed[0].totals.creation_rate_minutes, 60 * 300);
        assert!(svc.list(&user("bob"), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_users_cannot_touch_project() {
        let store = store();
        let svc = service(&store);
        let p = svc.create(&user("alice"), new_project("P")).await.unwrap();
        let bob = user("bob");

        assert!(svc.get(&bob, p.id).await.unwrap_err().is_not_found());
        assert!(svc.update(&bob, p.id, ProjectUpdate::default()).await.unwrap_err().is_not_found());
        assert!(svc.trash(&bob, p.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_trash_restore_purge_cycle() {
        let store = store();
        let svc = service(&store);
        let alice = user("alice");
        let p = svc.create(&alice, new_project("P")).await.unwrap();

        svc.trash(&alice, p.id).await.unwrap();
        assert!(svc.list(&alice, None).await.unwrap().is_empty());
        assert_eq!(svc.list_trash(&alice).await.unwrap().len(), 1);
        assert!(svc.restore(&user("bob"), p.id).await.is_err());

        svc.restore(&alice, p.id).await.unwrap();
        assert_eq!(svc.list(&alice, None).await.unwrap().len(), 1);

        svc.trash(&alice, p.id).await.unwrap();
        svc.purge(&alice, p.id).await.unwrap();
        assert!(svc.list_trash(&alice).await.unwrap().is_empty());
        assert!(svc.purge(&alice, p.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_export_pdf_renders_content() {
        let store = store();
        let svc = service(&store);
        let alice = user("alice");
        let p = svc.create(&alice, new_project("Intro: Rust!")).await.unwrap();

        let (name, bytes) = svc.export_pdf(&alice, p.id).await.unwrap();
        assert_eq!(name, "Intro__Rust.pdf");
        let html = String::from_utf8(bytes).unwrap();
        assert!(html.contains("<h1>Intro: Rust!</h1>"));
    }

    #[test]
    fn test_pdf_file_name_fallback() {
        assert_eq!(pdf_file_name("!!!"), "document.pdf");
        assert_eq!(pdf_file_name("Week 1"), "Week_1.pdf");
    }
}
