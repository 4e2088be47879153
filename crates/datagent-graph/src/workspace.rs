use datagent_config::ProjectExport;
use tracing::info;

use crate::error::ImportError;
use crate::project::Project;

/// All projects of one editing session plus the one currently open.
#[derive(Debug, Default)]
pub struct Workspace {
  projects: Vec<Project>,
  active: Option<String>,
}

impl Workspace {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create an empty project. It becomes active if nothing else is.
  pub fn create_project(
    &mut self,
    name: impl Into<String>,
    description: impl Into<String>,
  ) -> &mut Project {
    let project = Project::new(name, description);
    info!(project_id = %project.id, name = %project.name, "project created");
    self.insert(project)
  }

  /// Add an exported project. Fails if a project with the same id is open.
  pub fn import(&mut self, export: ProjectExport) -> Result<&mut Project, ImportError> {
    if self.project(&export.project.id).is_some() {
      return Err(ImportError::DuplicateProject(export.project.id));
    }
    let project = Project::from_export(export)?;
    Ok(self.insert(project))
  }

  fn insert(&mut self, project: Project) -> &mut Project {
    if self.active.is_none() {
      self.active = Some(project.id.clone());
    }
    self.projects.push(project);
    let last = self.projects.len() - 1;
    &mut self.projects[last]
  }

  /// Delete a project and its graph. Clears the active selection if it
  /// pointed at the deleted project.
  pub fn delete_project(&mut self, id: &str) -> Option<Project> {
    let index = self.projects.iter().position(|p| p.id == id)?;
    if self.active.as_deref() == Some(id) {
      self.active = None;
    }
    let project = self.projects.remove(index);
    info!(project_id = %project.id, "project deleted");
    Some(project)
  }

  pub fn project(&self, id: &str) -> Option<&Project> {
    self.projects.iter().find(|p| p.id == id)
  }

  pub fn project_mut(&mut self, id: &str) -> Option<&mut Project> {
    self.projects.iter_mut().find(|p| p.id == id)
  }

  pub fn projects(&self) -> &[Project] {
    &self.projects
  }

  /// Select the open project. Returns `false` for unknown ids.
  pub fn set_active(&mut self, id: &str) -> bool {
    if self.project(id).is_none() {
      return false;
    }
    self.active = Some(id.to_string());
    true
  }

  pub fn active(&self) -> Option<&Project> {
    self.project(self.active.as_deref()?)
  }

  pub fn active_mut(&mut self) -> Option<&mut Project> {
    let id = self.active.clone()?;
    self.project_mut(&id)
  }
}
