//! Scaffold executor - realizes file builders on disk.
//!
//! For each builder, in order:
//! 1. Render the target path against the universe context
//! 2. Apply the existence policy, or insert fragments below markers
//! 3. Write the result and record it in the universe
//!
//! Transform plugins then run once each over the universe. Their result is
//! committed through a [`ProjectState`] snapshot: added or changed files are
//! written, files they dropped from the universe are removed. A failure
//! stops the pass; files already written stay on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::project_state::{ProjectState, TrackedFile};
use crate::application::{
    ApplicationError, TransformPlugin,
    ports::{Filesystem, Ports, TemplateRenderer},
};
use crate::domain::{
    BuilderBody, DEFAULT_FILE_MODE, DomainError, FileBuilder, IfExistsAction, MarkerInsert,
    ScaffoldFile, Universe, marker,
};
use crate::error::KsResult;

/// Executes builders against a filesystem.
pub struct Scaffold {
    filesystem: Arc<dyn Filesystem>,
    renderer: Arc<dyn TemplateRenderer>,
    transforms: Vec<Box<dyn TransformPlugin>>,
}

impl Scaffold {
    pub fn new(filesystem: Arc<dyn Filesystem>, renderer: Arc<dyn TemplateRenderer>) -> Self {
        Self {
            filesystem,
            renderer,
            transforms: Vec::new(),
        }
    }

    pub fn from_ports(ports: &Ports) -> Self {
        Self::new(Arc::clone(&ports.filesystem), Arc::clone(&ports.renderer))
    }

    /// Queue a transform; transforms run in the order they were added.
    #[must_use]
    pub fn with_transform(mut self, transform: Box<dyn TransformPlugin>) -> Self {
        self.transforms.push(transform);
        self
    }

    #[instrument(skip_all, fields(builders = builders.len(), transforms = self.transforms.len()))]
    pub fn execute(&self, universe: &mut Universe, builders: &[FileBuilder]) -> KsResult<()> {
        let base = universe.template_context();

        for builder in builders {
            let context = merge(&base, builder);
            let rendered = self.renderer.render(&builder.path, &builder.path, &context)?;
            if rendered.trim().is_empty() {
                return Err(DomainError::EmptyFilePath.into());
            }
            let path = PathBuf::from(&rendered);

            let contents = match &builder.body {
                BuilderBody::Template(template) => {
                    if !self.should_write(&path, builder.if_exists)? {
                        continue;
                    }
                    self.renderer.render(&rendered, template, &context)?
                }
                BuilderBody::Inserts(inserts) => self.insert(&path, inserts, &context)?,
            };

            self.filesystem.write_all(&path, contents.as_bytes(), builder.mode)?;
            debug!(path = %rendered, "Wrote file");
            record(universe, ScaffoldFile::new(rendered, contents))?;
        }

        if !self.transforms.is_empty() {
            self.run_transforms(universe)?;
        }

        info!(files = universe.files.len(), "Scaffold pass completed");
        Ok(())
    }

    fn should_write(&self, path: &Path, policy: IfExistsAction) -> KsResult<bool> {
        if !self.filesystem.exists(path) {
            return Ok(true);
        }
        match policy {
            IfExistsAction::Overwrite => Ok(true),
            IfExistsAction::Skip => {
                debug!(path = %path.display(), "File exists, skipping");
                Ok(false)
            }
            IfExistsAction::Error => Err(ApplicationError::FileExists {
                path: path.to_path_buf(),
            }
            .into()),
        }
    }

    fn insert(&self, path: &Path, inserts: &[MarkerInsert], context: &Value) -> KsResult<String> {
        if !self.filesystem.exists(path) {
            return Err(ApplicationError::InsertTargetMissing {
                path: path.to_path_buf(),
            }
            .into());
        }

        let name = path.display().to_string();
        let mut content = self.filesystem.read_to_string(path)?;
        for insert in inserts {
            let fragments = insert
                .fragments
                .iter()
                .map(|f| self.renderer.render(&name, f, context))
                .collect::<KsResult<Vec<_>>>()?;
            content = marker::insert_all_below_marker(&content, &insert.marker, &fragments)
                .ok_or_else(|| ApplicationError::MarkerNotFound {
                    path: path.to_path_buf(),
                    marker: insert.marker.clone(),
                })?;
        }
        Ok(content)
    }

    fn run_transforms(&self, universe: &mut Universe) -> KsResult<()> {
        let before: BTreeMap<String, String> = universe
            .files
            .iter()
            .map(|f| (f.path.clone(), f.contents.clone()))
            .collect();

        for transform in &self.transforms {
            debug!(transform = transform.name(), "Running transform");
            transform.transform(universe, self.renderer.as_ref())?;
        }

        let mut state = ProjectState::load(Arc::clone(&self.filesystem))?;
        for file in &universe.files {
            if before.get(&file.path) == Some(&file.contents) {
                continue;
            }
            let mode = state.get(&file.path).map_or(DEFAULT_FILE_MODE, |f| f.mode);
            state.add(&file.path, TrackedFile::new(file.contents.as_bytes()).with_mode(mode))?;
            debug!(path = %file.path, "Wrote transformed file");
        }
        for path in before.keys() {
            if universe.file(path).is_none() {
                state.delete(path);
                debug!(path = %path, "Transform dropped file");
            }
        }
        state.flush()
    }
}

fn merge(base: &Value, builder: &FileBuilder) -> Value {
    let mut context = base.clone();
    if let Value::Object(map) = &mut context {
        for (k, v) in &builder.data {
            map.insert(k.clone(), v.clone());
        }
    }
    context
}

fn record(universe: &mut Universe, file: ScaffoldFile) -> KsResult<()> {
    if !universe.replace_file_if_exists(file.clone()) {
        universe.add_file(file)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::FileEntry;
    use crate::application::testing::{MemFs, PathRenderer};
    use crate::domain::{ProjectConfig, ResourceOptions};
    use crate::error::KubescaffError;
    use mockall::mock;

    mock! {
        pub Fs {}
        impl Filesystem for Fs {
            fn exists(&self, path: &Path) -> bool;
            fn read(&self, path: &Path) -> KsResult<Vec<u8>>;
            fn write(&self, path: &Path, content: &[u8], mode: u32) -> KsResult<()>;
            fn create_dir_all(&self, path: &Path) -> KsResult<()>;
            fn remove_file(&self, path: &Path) -> KsResult<()>;
            fn walk_files(&self) -> KsResult<Vec<FileEntry>>;
        }
    }

    fn universe() -> Universe {
        let mut config = ProjectConfig::new("2");
        config.domain = "example.com".into();
        let resource = ResourceOptions::new("ship", "v1beta1", "Frigate").into_resource(&config, true);
        Universe::new(config).with_resource(resource)
    }

    fn scaffold(fs: &Arc<MemFs>) -> Scaffold {
        Scaffold::new(fs.clone(), Arc::new(PathRenderer))
    }

    #[test]
    fn renders_path_and_body_from_context() {
        let fs = Arc::new(MemFs::default());
        let mut u = universe();
        let builders = [FileBuilder::template(
            "api/{{ resource.version }}/{{ resource.plural }}.go",
            "kind {{ resource.kind }} in {{ domain }} by {{ owner }}",
        )
        .with_data("owner", "crew")];

        scaffold(&fs).execute(&mut u, &builders).unwrap();

        assert_eq!(
            fs.text("api/v1beta1/frigates.go").unwrap(),
            "kind Frigate in example.com by crew"
        );
        assert_eq!(fs.mode("api/v1beta1/frigates.go"), Some(DEFAULT_FILE_MODE));
        assert_eq!(u.files.len(), 1);
    }

    #[test]
    fn existence_policies() {
        let fs = Arc::new(
            MemFs::default()
                .with_file("skip.txt", "old")
                .with_file("over.txt", "old")
                .with_file("err.txt", "old"),
        );
        let mut u = universe();
        scaffold(&fs)
            .execute(
                &mut u,
                &[
                    FileBuilder::template("skip.txt", "new").if_exists(IfExistsAction::Skip),
                    FileBuilder::template("over.txt", "new").if_exists(IfExistsAction::Overwrite),
                ],
            )
            .unwrap();
        assert_eq!(fs.text("skip.txt").unwrap(), "old");
        assert_eq!(fs.text("over.txt").unwrap(), "new");
        assert!(u.file("skip.txt").is_none());

        let err = scaffold(&fs)
            .execute(&mut u, &[FileBuilder::template("err.txt", "new")])
            .unwrap_err();
        assert!(matches!(
            err,
            KubescaffError::Application(ApplicationError::FileExists { .. })
        ));
        assert_eq!(fs.text("err.txt").unwrap(), "old");
    }

    #[test]
    fn later_builders_see_earlier_files() {
        let fs = Arc::new(MemFs::default());
        let mut u = universe();
        let builders = [
            FileBuilder::template("main.go", "package main\n// +kubebuilder:scaffold:imports\n"),
            FileBuilder::inserter("main.go")
                .marker("// +kubebuilder:scaffold:imports", "import {{ resource.import_alias }}"),
        ];
        scaffold(&fs).execute(&mut u, &builders).unwrap();
        assert_eq!(
            fs.text("main.go").unwrap(),
            "package main\n// +kubebuilder:scaffold:imports\nimport shipv1beta1\n"
        );
        assert_eq!(u.files.len(), 1);
    }

    #[test]
    fn repeated_insertion_is_idempotent() {
        let fs = Arc::new(MemFs::default().with_file("main.go", "// +kubebuilder:scaffold:builder\n"));
        let builder = FileBuilder::inserter("main.go")
            .marker("// +kubebuilder:scaffold:builder", "setup({{ resource.kind }})");
        for _ in 0..2 {
            scaffold(&fs)
                .execute(&mut universe(), std::slice::from_ref(&builder))
                .unwrap();
        }
        assert_eq!(
            fs.text("main.go").unwrap(),
            "// +kubebuilder:scaffold:builder\nsetup(Frigate)\n"
        );
    }

    #[test]
    fn inserter_failures() {
        let fs = Arc::new(MemFs::default().with_file("main.go", "package main\n"));
        let missing = scaffold(&fs)
            .execute(&mut universe(), &[FileBuilder::inserter("gone.go").marker("// m", "x")])
            .unwrap_err();
        assert!(matches!(
            missing,
            KubescaffError::Application(ApplicationError::InsertTargetMissing { .. })
        ));

        let no_marker = scaffold(&fs)
            .execute(&mut universe(), &[FileBuilder::inserter("main.go").marker("// m", "x")])
            .unwrap_err();
        assert_eq!(no_marker.to_string(), "marker \"// m\" not found in main.go");
    }

    #[test]
    fn failure_stops_the_pass_without_rollback() {
        let fs = Arc::new(MemFs::default().with_file("b.txt", "old"));
        let err = scaffold(&fs).execute(
            &mut universe(),
            &[
                FileBuilder::template("a.txt", "a"),
                FileBuilder::template("b.txt", "b"),
                FileBuilder::template("c.txt", "c"),
            ],
        );
        assert!(err.is_err());
        assert_eq!(fs.text("a.txt").unwrap(), "a");
        assert!(fs.text("c.txt").is_none());
    }

    struct Stamp;

    impl TransformPlugin for Stamp {
        fn name(&self) -> &str {
            "stamp"
        }

        fn transform(&self, u: &mut Universe, r: &dyn TemplateRenderer) -> KsResult<()> {
            let body = r.render("extra", "for {{ resource.kind }}", &u.template_context())?;
            u.add_file(ScaffoldFile::new("extra.txt", body))?;
            u.replace_file(ScaffoldFile::new("a.txt", "stamped"))?;
            Ok(())
        }
    }

    struct RequireMissing;

    impl TransformPlugin for RequireMissing {
        fn name(&self) -> &str {
            "require"
        }

        fn transform(&self, u: &mut Universe, _: &dyn TemplateRenderer) -> KsResult<()> {
            u.replace_file(ScaffoldFile::new("nope.txt", ""))?;
            Ok(())
        }
    }

    #[test]
    fn transforms_write_back_changed_files() {
        let fs = Arc::new(MemFs::default());
        let mut u = universe();
        scaffold(&fs)
            .with_transform(Box::new(Stamp))
            .execute(&mut u, &[FileBuilder::template("a.txt", "a")])
            .unwrap();
        assert_eq!(fs.text("a.txt").unwrap(), "stamped");
        assert_eq!(fs.text("extra.txt").unwrap(), "for Frigate");
    }

    struct Prune;

    impl TransformPlugin for Prune {
        fn name(&self) -> &str {
            "prune"
        }

        fn transform(&self, u: &mut Universe, _: &dyn TemplateRenderer) -> KsResult<()> {
            u.files.retain(|f| f.path != "b.txt");
            Ok(())
        }
    }

    #[test]
    fn files_dropped_by_a_transform_are_removed() {
        let fs = Arc::new(MemFs::default().with_file("keep.md", "notes"));
        let mut u = universe();
        scaffold(&fs)
            .with_transform(Box::new(Prune))
            .execute(
                &mut u,
                &[FileBuilder::template("a.txt", "a"), FileBuilder::template("b.txt", "b")],
            )
            .unwrap();
        assert_eq!(fs.text("a.txt").unwrap(), "a");
        assert!(fs.text("b.txt").is_none());
        assert_eq!(fs.text("keep.md").unwrap(), "notes");
        assert_eq!(fs.mode("keep.md"), Some(0o644));
    }

    #[test]
    fn required_replace_of_absent_file_is_an_error() {
        let fs = Arc::new(MemFs::default());
        let err = scaffold(&fs)
            .with_transform(Box::new(RequireMissing))
            .execute(&mut universe(), &[])
            .unwrap_err();
        assert_eq!(err.to_string(), "file not found \"nope.txt\"");
    }

    #[test]
    fn write_errors_carry_the_path() {
        let mut fs = MockFs::new();
        fs.expect_exists().return_const(false);
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write().returning(|path, _, _| {
            Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "read-only file system".into(),
            }
            .into())
        });

        let scaffold = Scaffold::new(Arc::new(fs), Arc::new(PathRenderer));
        let err = scaffold
            .execute(&mut universe(), &[FileBuilder::template("config/x.yaml", "x")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "filesystem error at config/x.yaml: read-only file system"
        );
    }
}
