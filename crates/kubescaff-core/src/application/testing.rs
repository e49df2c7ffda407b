//! In-memory fakes shared by the application-layer unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use super::ApplicationError;
use super::plugin::{CommandContext, FlagSet, Invocation, Plugin, Subcommand};
use super::ports::{CommandRunner, FileEntry, Filesystem, Ports, Prompter, TemplateRenderer};
use crate::error::KsResult;

#[derive(Default)]
pub struct MemFs {
    pub files: Mutex<BTreeMap<PathBuf, (Vec<u8>, u32)>>,
}

impl MemFs {
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), (content.as_bytes().to_vec(), 0o644));
        self
    }

    pub fn text(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(Path::new(path))
            .map(|(b, _)| String::from_utf8(b.clone()).unwrap())
    }

    pub fn mode(&self, path: &str) -> Option<u32> {
        self.files.lock().unwrap().get(Path::new(path)).map(|(_, m)| *m)
    }
}

impl Filesystem for MemFs {
    fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path) || files.keys().any(|p| p.starts_with(path))
    }

    fn read(&self, path: &Path) -> KsResult<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|(b, _)| b.clone())
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                }
                .into()
            })
    }

    fn write(&self, path: &Path, content: &[u8], mode: u32) -> KsResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), (content.to_vec(), mode));
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> KsResult<()> {
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> KsResult<()> {
        self.files.lock().unwrap().remove(path);
        Ok(())
    }

    fn walk_files(&self) -> KsResult<Vec<FileEntry>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .iter()
            .map(|(p, (_, m))| FileEntry {
                path: p.clone(),
                mode: *m,
            })
            .collect())
    }
}

/// Replaces `{{ dotted.path }}` with the matching context value.
pub struct PathRenderer;

impl TemplateRenderer for PathRenderer {
    fn render(&self, name: &str, template: &str, context: &Value) -> KsResult<String> {
        let mut out = String::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| ApplicationError::RenderingFailed {
                template: name.into(),
                reason: "unclosed tag".into(),
            })?;
            let path = after[..end].trim();
            let value = path
                .split('.')
                .try_fold(context, |v, k| v.get(k))
                .ok_or_else(|| ApplicationError::RenderingFailed {
                    template: name.into(),
                    reason: format!("undefined value {path}"),
                })?;
            match value {
                Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

pub struct Yes;

impl Prompter for Yes {
    fn confirm(&self, _question: &str, _default: bool) -> KsResult<bool> {
        Ok(true)
    }
}

#[derive(Default)]
pub struct RecordingRunner {
    pub calls: Mutex<Vec<String>>,
}

impl CommandRunner for RecordingRunner {
    fn run(&self, _description: &str, program: &str, args: &[&str]) -> KsResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{program} {}", args.join(" ")));
        Ok(())
    }

    fn output(&self, description: &str, program: &str, args: &[&str]) -> KsResult<String> {
        self.run(description, program, args)?;
        Ok("go version go1.13.4 linux/amd64\n".into())
    }
}

pub fn ports(fs: Arc<MemFs>) -> Ports {
    Ports {
        filesystem: fs,
        renderer: Arc::new(PathRenderer),
        prompter: Arc::new(Yes),
        runner: Arc::new(RecordingRunner::default()),
        working_dir: PathBuf::from("/work"),
    }
}

/// Records the order hooks are called in.
pub type Trace = Arc<Mutex<Vec<String>>>;

/// A configurable plugin whose subcommands record their hook calls.
#[derive(Clone)]
pub struct FakePlugin {
    pub name: String,
    pub version: String,
    pub project_versions: Vec<&'static str>,
    pub capabilities: Vec<&'static str>,
    pub deprecated: Option<String>,
    pub fail_run: Option<String>,
    pub trace: Trace,
}

impl FakePlugin {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            project_versions: vec!["2"],
            capabilities: vec!["init", "create api", "create webhook", "edit"],
            deprecated: None,
            fail_run: None,
            trace: Trace::default(),
        }
    }

    pub fn for_versions(mut self, versions: &[&'static str]) -> Self {
        self.project_versions = versions.to_vec();
        self
    }

    pub fn only(mut self, capabilities: &[&'static str]) -> Self {
        self.capabilities = capabilities.to_vec();
        self
    }

    pub fn deprecated(mut self, notice: &str) -> Self {
        self.deprecated = Some(notice.into());
        self
    }

    pub fn failing(mut self, reason: &str) -> Self {
        self.fail_run = Some(reason.into());
        self
    }

    pub fn arc(self) -> Arc<dyn Plugin> {
        Arc::new(self)
    }

    fn sub(&self, cap: &'static str) -> Option<Box<dyn Subcommand>> {
        self.capabilities.contains(&cap).then(|| {
            Box::new(FakeSubcommand {
                plugin: self.name.clone(),
                capability: cap,
                fail_run: self.fail_run.clone(),
                trace: self.trace.clone(),
            }) as Box<dyn Subcommand>
        })
    }
}

impl Plugin for FakePlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn supported_project_versions(&self) -> &[&str] {
        &self.project_versions
    }

    fn init(&self) -> Option<Box<dyn Subcommand>> {
        self.sub("init")
    }

    fn create_api(&self) -> Option<Box<dyn Subcommand>> {
        self.sub("create api")
    }

    fn create_webhook(&self) -> Option<Box<dyn Subcommand>> {
        self.sub("create webhook")
    }

    fn edit(&self) -> Option<Box<dyn Subcommand>> {
        self.sub("edit")
    }

    fn deprecation_warning(&self) -> Option<&str> {
        self.deprecated.as_deref()
    }
}

struct FakeSubcommand {
    plugin: String,
    capability: &'static str,
    fail_run: Option<String>,
    trace: Trace,
}

impl Subcommand for FakeSubcommand {
    fn bind_flags(&self, flags: &mut FlagSet) {
        self.trace.lock().unwrap().push("bind_flags".into());
        flags.bool("dry", false, "dry run");
    }

    fn update_context(&self, ctx: &mut CommandContext) {
        self.trace.lock().unwrap().push("update_context".into());
        ctx.description = format!("{} via {}", self.capability, self.plugin);
    }

    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        self.trace.lock().unwrap().push("run".into());
        if let Some(reason) = &self.fail_run {
            return Err(ApplicationError::ValidationFailed(reason.clone()).into());
        }
        if self.capability == "init" {
            inv.config.domain = "example.com".into();
        }
        Ok(())
    }

    fn post_scaffold(&mut self, inv: &Invocation<'_>) -> KsResult<()> {
        let saved = inv.ports.filesystem.exists(Path::new("PROJECT"));
        self.trace
            .lock()
            .unwrap()
            .push(format!("post_scaffold(saved={saved})"));
        Ok(())
    }
}
