//! Registry → binder → scaffold flow through the public API.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use kubescaff_core::application::ports::FileEntry;
use kubescaff_core::application::{ApplicationError, FlagValue, resolve_plugins_by_key};
use kubescaff_core::domain::plugin_key;
use kubescaff_core::prelude::*;
use mockall::mock;
use serde_json::Value;

#[derive(Default)]
struct TreeFs(Mutex<BTreeMap<PathBuf, Vec<u8>>>);

impl Filesystem for TreeFs {
    fn exists(&self, path: &Path) -> bool {
        self.0.lock().unwrap().contains_key(path)
    }
    fn read(&self, path: &Path) -> KsResult<Vec<u8>> {
        self.0.lock().unwrap().get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.into(),
                reason: "missing".into(),
            }
            .into()
        })
    }
    fn write(&self, path: &Path, content: &[u8], _mode: u32) -> KsResult<()> {
        self.0.lock().unwrap().insert(path.into(), content.to_vec());
        Ok(())
    }
    fn create_dir_all(&self, _path: &Path) -> KsResult<()> {
        Ok(())
    }
    fn remove_file(&self, path: &Path) -> KsResult<()> {
        self.0.lock().unwrap().remove(path);
        Ok(())
    }
    fn walk_files(&self) -> KsResult<Vec<FileEntry>> {
        Ok(Vec::new())
    }
}

/// Substitutes `{kind}` only.
struct KindRenderer;

impl TemplateRenderer for KindRenderer {
    fn render(&self, _name: &str, template: &str, context: &Value) -> KsResult<String> {
        let kind = context["resource"]["kind"].as_str().unwrap_or_default();
        Ok(template.replace("{kind}", kind))
    }
}

#[derive(Default)]
struct Runner(Mutex<Vec<String>>);

impl CommandRunner for Runner {
    fn run(&self, _description: &str, program: &str, args: &[&str]) -> KsResult<()> {
        self.0.lock().unwrap().push(format!("{program} {}", args.join(" ")));
        Ok(())
    }

    fn output(&self, description: &str, program: &str, args: &[&str]) -> KsResult<String> {
        self.run(description, program, args)?;
        Ok(String::new())
    }
}

mock! {
    Ask {}
    impl Prompter for Ask {
        fn confirm(&self, question: &str, default: bool) -> KsResult<bool>;
    }
}

struct Sample;

impl Plugin for Sample {
    fn name(&self) -> &str {
        "sample.example.com"
    }
    fn version(&self) -> &str {
        "1.0"
    }
    fn supported_project_versions(&self) -> &[&str] {
        &["2"]
    }
    fn init(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(SampleInit))
    }
    fn create_api(&self) -> Option<Box<dyn Subcommand>> {
        Some(Box::new(SampleApi))
    }
}

struct SampleInit;

impl Subcommand for SampleInit {
    fn bind_flags(&self, flags: &mut FlagSet) {
        flags.string("domain", Some("my.domain"), "domain for groups");
    }
    fn update_context(&self, ctx: &mut CommandContext) {
        ctx.description = "Initialize a new project".into();
    }
    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        inv.config.domain = inv.flags.string_or_empty("domain");
        Scaffold::from_ports(inv.ports).execute(
            &mut Universe::new(inv.config.clone()),
            &[FileBuilder::template("main.go", "package main\n// +kubebuilder:scaffold:scheme\n")],
        )
    }
}

struct SampleApi;

impl Subcommand for SampleApi {
    fn bind_flags(&self, flags: &mut FlagSet) {
        flags
            .string("group", None, "")
            .string("version", None, "")
            .string("kind", None, "")
            .bool("make", true, "");
    }
    fn update_context(&self, _ctx: &mut CommandContext) {}
    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        let options = ResourceOptions::new(
            inv.flags.string_or_empty("group"),
            inv.flags.string_or_empty("version"),
            inv.flags.string_or_empty("kind"),
        );
        options.validate()?;
        if !inv.ports.prompter.confirm("Create Resource [y/n]", true)? {
            return Ok(());
        }
        let resource = options.into_resource(inv.config, true);
        inv.config.add_resource(resource.gvk());
        Scaffold::from_ports(inv.ports).execute(
            &mut Universe::new(inv.config.clone()).with_resource(resource),
            &[FileBuilder::inserter("main.go")
                .marker("// +kubebuilder:scaffold:scheme", "add({kind})")],
        )?;
        if inv.flags.bool("make") {
            inv.ports.runner.run("make", "make", &[])?;
        }
        Ok(())
    }
}

fn registry() -> PluginRegistry {
    PluginRegistry::builder()
        .command_name("kubescaff")
        .default_project_version("2")
        .plugin(Arc::new(Sample))
        .build()
        .unwrap()
}

fn ports(fs: Arc<TreeFs>, runner: Arc<Runner>) -> Ports {
    let mut ask = MockAsk::new();
    ask.expect_confirm().returning(|_, default| Ok(default));
    Ports {
        filesystem: fs,
        renderer: Arc::new(KindRenderer),
        prompter: Arc::new(ask),
        runner,
        working_dir: PathBuf::from("/tmp/project"),
    }
}

#[test]
fn init_then_create_api_records_the_resource() {
    let registry = registry();
    let fs = Arc::new(TreeFs::default());
    let store = ConfigStore::new(fs.clone());

    let runner = Arc::new(Runner::default());
    let ports = ports(fs.clone(), runner.clone());

    let binder = Binder::new(&registry, "2", &[], store.exists()).unwrap();
    let init = binder.bind(Capability::Init).unwrap();
    let values = init
        .flags()
        .defaults()
        .with("domain", FlagValue::String("example.com".into()));
    init.execute(&values, &ports, &store).unwrap();

    let api = binder.bind(Capability::CreateApi).unwrap();
    let values = api
        .flags()
        .defaults()
        .with("group", FlagValue::String("ship".into()))
        .with("version", FlagValue::String("v1beta1".into()))
        .with("kind", FlagValue::String("Frigate".into()));
    let config = api.execute(&values, &ports, &store).unwrap();

    assert_eq!(config.domain, "example.com");
    assert_eq!(config.resources, vec![Gvk::new("ship", "v1beta1", "Frigate")]);
    assert!(!config.multigroup);
    assert_eq!(store.load_initialized().unwrap(), config);
    assert_eq!(*runner.0.lock().unwrap(), vec!["make ".to_string()]);

    let main = String::from_utf8(fs.read(Path::new("main.go")).unwrap()).unwrap();
    assert_eq!(main, "package main\n// +kubebuilder:scaffold:scheme\nadd(Frigate)\n");
}

#[test]
fn invalid_resource_is_wrapped_with_command_and_version() {
    let registry = registry();
    let fs = Arc::new(TreeFs::default());
    let store = ConfigStore::new(fs.clone());
    store.save(&ProjectConfig::new("2")).unwrap();
    let ports = ports(fs, Arc::default());

    let api = Binder::new(&registry, "2", &[], true)
        .unwrap()
        .bind(Capability::CreateApi)
        .unwrap();
    let values = api
        .flags()
        .defaults()
        .with("group", FlagValue::String("ship".into()))
        .with("version", FlagValue::String("1".into()))
        .with("kind", FlagValue::String("Frigate".into()));
    let err = api.execute(&values, &ports, &store).unwrap_err();
    assert!(
        err.to_string()
            .starts_with("failed to create api for project with version \"2\": ")
    );
}

#[test]
fn exact_key_resolves_to_one_plugin() {
    let registry = registry();
    let matches = resolve_plugins_by_key(registry.plugins_for("2"), "sample.example.com/v1.0").unwrap();
    assert_eq!(matches.len(), 1);
    assert!(plugin_key::names_equal("go", "go.kubebuilder.io"));
    assert!(!plugin_key::names_equal("go.kubebuilder.io", "go.other.domain"));
    assert!(!plugin_key::names_equal("go", "helm"));
}
