//! Page files on disk and the editor session wired around them.

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::Utc;
use pagebuilder_common::{ComponentTree, FileStore};
use pagebuilder_editor::{EditorError, EditorResult, EditorSession, MapTranslator, Page, PageForm, PagePublisher};
use pagebuilder_linter::Linter;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a page JSON file
pub fn read_page(path: &Path) -> Result<Page> {
    let content = fs::read_to_string(path).with_context(|| format!("Cannot read page file {}", path.display()))?;
    let page = serde_json::from_str(&content).with_context(|| format!("Invalid page file {}", path.display()))?;
    Ok(page)
}

pub fn write_page(path: &Path, page: &Page) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(page)?;
    fs::write(path, json)
}

/// Backend that writes saved pages back to the page file and published
/// pages to the publish directory
#[derive(Debug, Clone)]
pub struct FilePublisher {
    page_path: PathBuf,
    publish_dir: PathBuf,
}

impl FilePublisher {
    pub fn new(page_path: impl Into<PathBuf>, publish_dir: impl Into<PathBuf>) -> Self {
        Self {
            page_path: page_path.into(),
            publish_dir: publish_dir.into(),
        }
    }

    fn page_from_form(form: &PageForm, status: &str) -> EditorResult<Page> {
        let components: ComponentTree = serde_json::from_str(&form.components)?;
        let history = serde_json::from_str(&form.history)?;
        Ok(Page {
            id: form.id.clone(),
            slug: form.slug.clone(),
            status: status.to_string(),
            updated_at: Utc::now(),
            components,
            history: Some(history),
        })
    }

    fn write(path: &Path, page: &Page) -> EditorResult<()> {
        write_page(path, page)
            .map_err(|err| EditorError::Collaborator(format!("cannot write {}: {}", path.display(), err)))
    }

    /// Where a published page lands: `<publishDir>/<slug or id>.json`
    pub fn published_path(&self, form: &PageForm) -> PathBuf {
        let name = if form.slug.is_empty() { &form.id } else { &form.slug };
        self.publish_dir.join(format!("{}.json", name))
    }
}

impl PagePublisher for FilePublisher {
    fn save(&mut self, form: &PageForm) -> EditorResult<()> {
        let page = Self::page_from_form(form, &form.status)?;
        Self::write(&self.page_path, &page)?;
        tracing::debug!("saved page '{}' to {}", form.id, self.page_path.display());
        Ok(())
    }

    fn publish(&mut self, form: &PageForm) -> EditorResult<()> {
        let page = Self::page_from_form(form, "published")?;
        let published = self.published_path(form);
        Self::write(&published, &Page { history: None, ..page.clone() })?;
        Self::write(&self.page_path, &page)?;
        tracing::debug!("published page '{}' to {}", form.id, published.display());
        Ok(())
    }
}

/// Resolve the page file (flag, then config) against the working directory
pub fn page_path(cwd: &str, config: &Config, page: Option<&Path>) -> PathBuf {
    let relative = page.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(&config.page));
    PathBuf::from(cwd).join(relative)
}

/// Open an editor session over a page file with the file-backed history store
pub fn open_session(cwd: &str, page: Option<&Path>) -> Result<EditorSession> {
    let config = Config::load(cwd)?;
    let path = page_path(cwd, &config, page);
    let page = read_page(&path)?;

    let store = FileStore::open(config.get_storage_dir(cwd))?;
    let publisher = FilePublisher::new(&path, config.get_publish_dir(cwd));

    Ok(EditorSession::open(page, Box::new(store), config.editor.clone())
        .with_publisher(Box::new(publisher))
        .with_translator(Box::new(MapTranslator::english()))
        .with_validator(Box::new(Linter::default().errors_only())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagebuilder_common::ComponentNode;

    fn form(slug: &str) -> PageForm {
        PageForm {
            id: "home".to_string(),
            updated_at: Utc::now().to_rfc3339(),
            slug: slug.to_string(),
            status: "draft".to_string(),
            components: serde_json::to_string(&ComponentTree::from_nodes(vec![ComponentNode::new("t", "Text")]))
                .unwrap(),
            history: r#"{"past":[],"present":[],"future":[]}"#.to_string(),
        }
    }

    #[test]
    fn test_save_writes_page_file() {
        let dir = tempfile::tempdir().unwrap();
        let page_file = dir.path().join("pages/home.json");
        let mut publisher = FilePublisher::new(&page_file, dir.path().join("dist"));

        publisher.save(&form("")).unwrap();

        let page = read_page(&page_file).unwrap();
        assert_eq!(page.status, "draft");
        assert_eq!(page.components.root_ids(), vec!["t"]);
        assert!(page.history.is_some());
    }

    #[test]
    fn test_publish_uses_slug() {
        let dir = tempfile::tempdir().unwrap();
        let page_file = dir.path().join("page.json");
        let mut publisher = FilePublisher::new(&page_file, dir.path().join("dist"));

        publisher.publish(&form("landing")).unwrap();

        let published = read_page(&dir.path().join("dist/landing.json")).unwrap();
        assert_eq!(published.status, "published");
        assert!(published.history.is_none());
        assert_eq!(read_page(&page_file).unwrap().status, "published");
    }

    #[test]
    fn test_bad_form_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut publisher = FilePublisher::new(dir.path().join("page.json"), dir.path().join("dist"));
        let mut bad = form("");
        bad.components = "not json".to_string();

        assert!(matches!(publisher.save(&bad), Err(EditorError::Serialization(_))));
    }
}
