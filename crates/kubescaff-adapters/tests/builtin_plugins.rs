//! End-to-end runs of the built-in plugins over real adapters.

use std::path::Path;
use std::sync::{Arc, Mutex};

use kubescaff_adapters::{LocalFilesystem, MemoryFilesystem, MinijinjaRenderer, builtin_registry};
use kubescaff_core::application::{
    Binder, Capability, CommandRunner, ConfigStore, FlagValue, FlagValues, Filesystem, Ports,
    Prompter,
};
use kubescaff_core::domain::Gvk;
use kubescaff_core::error::KsResult;
use mockall::mock;

mock! {
    pub Ask {}
    impl Prompter for Ask {
        fn confirm(&self, question: &str, default: bool) -> KsResult<bool>;
    }
}

#[derive(Default)]
struct Runner {
    calls: Mutex<Vec<String>>,
}

impl CommandRunner for Runner {
    fn run(&self, _description: &str, program: &str, args: &[&str]) -> KsResult<()> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line);
        Ok(())
    }

    fn output(&self, description: &str, program: &str, args: &[&str]) -> KsResult<String> {
        self.run(description, program, args)?;
        Ok("go version go1.14.2 linux/amd64\n".into())
    }
}

struct Project {
    fs: MemoryFilesystem,
    ports: Ports,
    store: ConfigStore,
    runner: Arc<Runner>,
}

fn project(prompter: impl Prompter + 'static) -> Project {
    let fs = MemoryFilesystem::new();
    let runner = Arc::new(Runner::default());
    let ports = Ports {
        filesystem: Arc::new(fs.clone()),
        renderer: Arc::new(MinijinjaRenderer::new()),
        prompter: Arc::new(prompter),
        runner: runner.clone(),
        working_dir: "/work/guestbook".into(),
    };
    let store = ConfigStore::new(ports.filesystem.clone());
    Project {
        fs,
        ports,
        store,
        runner,
    }
}

fn never_asked() -> MockAsk {
    let mut ask = MockAsk::new();
    ask.expect_confirm().never();
    ask
}

fn string(value: &str) -> FlagValue {
    FlagValue::String(value.to_string())
}

fn run(p: &Project, version: &str, capability: Capability, overrides: &[(&str, FlagValue)]) -> KsResult<()> {
    let registry = builtin_registry("kubescaff")?;
    let binder = Binder::new(&registry, version, &[], p.store.exists())?;
    let bound = binder.bind(capability)?;
    let mut values: FlagValues = bound.flags().defaults();
    for (name, value) in overrides {
        values.set(name, value.clone(), true);
    }
    bound.execute(&values, &p.ports, &p.store).map(|_| ())
}

fn init(p: &Project) {
    run(
        p,
        "2",
        Capability::Init,
        &[
            ("skip-go-version-check", FlagValue::Bool(true)),
            ("fetch-deps", FlagValue::Bool(false)),
            ("repo", string("github.com/example/guestbook")),
            ("domain", string("example.com")),
            ("owner", string("The Guestbook Authors")),
        ],
    )
    .unwrap();
}

fn frigate(extra: &[(&'static str, FlagValue)]) -> Vec<(&'static str, FlagValue)> {
    let mut flags = vec![
        ("group", string("ship")),
        ("version", string("v1beta1")),
        ("kind", string("Frigate")),
        ("make", FlagValue::Bool(false)),
    ];
    flags.extend_from_slice(extra);
    flags
}

fn create_api(p: &Project, extra: &[(&'static str, FlagValue)]) -> KsResult<()> {
    let flags = frigate(extra);
    run(p, "2", Capability::CreateApi, &flags)
}

fn both() -> [(&'static str, FlagValue); 2] {
    [
        ("resource", FlagValue::Bool(true)),
        ("controller", FlagValue::Bool(true)),
    ]
}

#[test]
fn init_writes_project_layout() {
    let p = project(never_asked());
    init(&p);

    for path in [
        "PROJECT",
        "go.mod",
        "Makefile",
        "main.go",
        "hack/boilerplate.go.txt",
        "config/default/kustomization.yaml",
        "config/rbac/role_binding.yaml",
    ] {
        assert!(p.fs.read_file(path).is_some(), "missing {path}");
    }

    let main = p.fs.read_file("main.go").unwrap();
    assert!(main.contains("The Guestbook Authors."));
    assert!(main.contains(r#"LeaderElectionID:   "guestbook.example.com""#));
    assert!(p.fs.read_file("go.mod").unwrap().starts_with("module github.com/example/guestbook"));

    let config = p.store.load_initialized().unwrap();
    assert_eq!(config.version, "2");
    assert_eq!(config.domain, "example.com");
    assert!(p.runner.calls.lock().unwrap().is_empty());
}

#[test]
fn init_checks_go_and_fetches_dependencies() {
    let p = project(never_asked());
    run(
        &p,
        "2",
        Capability::Init,
        &[("repo", string("github.com/example/guestbook"))],
    )
    .unwrap();

    assert_eq!(
        *p.runner.calls.lock().unwrap(),
        vec!["go version".to_string(), "go mod tidy".to_string()]
    );
}

#[test]
fn second_init_is_rejected() {
    let p = project(never_asked());
    init(&p);
    let err = run(&p, "2", Capability::Init, &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to initialize project because project is already initialized"
    );
}

#[test]
fn create_api_records_resource_and_wires_main() {
    let p = project(never_asked());
    init(&p);
    create_api(&p, &both()).unwrap();

    let config = p.store.load_initialized().unwrap();
    assert_eq!(config.resources, vec![Gvk::new("ship", "v1beta1", "Frigate")]);
    assert!(!config.multigroup);

    assert!(p.fs.read_file("api/v1beta1/frigate_types.go").is_some());
    assert!(p.fs.read_file("controllers/frigate_controller.go").is_some());
    assert!(p.fs.read_file("config/samples/ship_v1beta1_frigate.yaml").is_some());

    let main = p.fs.read_file("main.go").unwrap();
    assert!(main.contains(r#"shipv1beta1 "github.com/example/guestbook/api/v1beta1""#));
    assert!(main.contains("_ = shipv1beta1.AddToScheme(scheme)"));
    assert!(main.contains("(&controllers.FrigateReconciler{"));

    let crds = p.fs.read_file("config/crd/kustomization.yaml").unwrap();
    assert!(crds.contains("- bases/ship.example.com_frigates.yaml"));
    assert!(crds.contains("#- patches/webhook_in_frigates.yaml"));
}

#[test]
fn create_api_twice_needs_force() {
    let p = project(never_asked());
    init(&p);
    create_api(&p, &both()).unwrap();

    let err = create_api(&p, &both()).unwrap_err();
    assert!(err.to_string().contains("API resource already exists"), "{err}");

    let sample = Path::new("config/samples/ship_v1beta1_frigate.yaml");
    p.fs.write(sample, b"# tuned by hand\n", 0o600).unwrap();
    p.fs
        .write(Path::new("api/v1beta1/frigate_types.go"), b"stale", 0o600)
        .unwrap();

    let mut forced = both().to_vec();
    forced.push(("force", FlagValue::Bool(true)));
    create_api(&p, &forced).unwrap();

    assert_eq!(p.fs.read_file(sample).unwrap(), "# tuned by hand\n");
    assert!(p.fs.read_file("config/rbac/frigate_editor_role.yaml").is_some());
    let types = p.fs.read_file("api/v1beta1/frigate_types.go").unwrap();
    assert!(types.contains("type FrigateSpec struct"));

    let main = p.fs.read_file("main.go").unwrap();
    assert_eq!(main.matches("shipv1beta1.AddToScheme(scheme)").count(), 1);
    assert_eq!(p.store.load_initialized().unwrap().resources.len(), 1);
}

#[test]
fn second_group_needs_multigroup() {
    let p = project(never_asked());
    init(&p);
    create_api(&p, &both()).unwrap();

    let err = run(
        &p,
        "2",
        Capability::CreateApi,
        &[
            ("group", string("crew")),
            ("version", string("v1")),
            ("kind", string("Captain")),
            ("make", FlagValue::Bool(false)),
            ("resource", FlagValue::Bool(true)),
            ("controller", FlagValue::Bool(false)),
        ],
    )
    .unwrap_err();
    assert!(err.to_string().contains("multiple groups are not allowed"), "{err}");
}

#[test]
fn prompts_when_resource_and_controller_are_not_given() {
    let mut ask = MockAsk::new();
    ask.expect_confirm()
        .withf(|q, _| q.contains("Resource"))
        .times(1)
        .returning(|_, _| Ok(true));
    ask.expect_confirm()
        .withf(|q, _| q.contains("Controller"))
        .times(1)
        .returning(|_, _| Ok(false));

    let p = project(ask);
    init(&p);
    create_api(&p, &[]).unwrap();

    assert!(p.fs.read_file("api/v1beta1/frigate_types.go").is_some());
    assert!(p.fs.read_file("controllers/frigate_controller.go").is_none());
}

#[test]
fn create_api_runs_make_when_asked() {
    let p = project(never_asked());
    init(&p);
    let mut flags = frigate(&both());
    flags.retain(|(name, _)| *name != "make");
    run(&p, "2", Capability::CreateApi, &flags).unwrap();
    assert_eq!(*p.runner.calls.lock().unwrap(), vec!["make".to_string()]);
}

#[test]
fn unknown_pattern_is_wrapped() {
    let p = project(never_asked());
    init(&p);
    let mut flags = both().to_vec();
    flags.push(("pattern", string("helm")));
    let err = create_api(&p, &flags).unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"failed to create api for project with version "2": unknown pattern "helm""#
    );
}

#[test]
fn addon_pattern_rewrites_controller() {
    let p = project(never_asked());
    init(&p);
    let mut flags = both().to_vec();
    flags.push(("pattern", string("addon")));
    create_api(&p, &flags).unwrap();

    assert!(p.fs.read_file("channels/stable").is_some());
    assert!(p.fs.read_file("channels/packages/frigate/0.0.1/manifest.yaml").is_some());
    let controller = p.fs.read_file("controllers/frigate_controller.go").unwrap();
    assert!(controller.contains("declarative.Reconciler"));
}

#[test]
fn webhook_requires_a_kind_of_webhook() {
    let p = project(never_asked());
    init(&p);
    create_api(&p, &both()).unwrap();

    let resource = [
        ("group", string("ship")),
        ("version", string("v1beta1")),
        ("kind", string("Frigate")),
    ];
    let err = run(&p, "2", Capability::CreateWebhook, &resource).unwrap_err();
    assert!(err.to_string().contains("requires at least one of --defaulting"), "{err}");

    let mut flags = resource.to_vec();
    flags.push(("defaulting", FlagValue::Bool(true)));
    run(&p, "2", Capability::CreateWebhook, &flags).unwrap();

    let webhook = p.fs.read_file("api/v1beta1/frigate_webhook.go").unwrap();
    assert!(webhook.contains("webhook.Defaulter"));
    assert!(!webhook.contains("webhook.Validator"));
    assert!(p.fs.read_file("main.go").unwrap().contains("SetupWebhookWithManager(mgr)"));
}

#[test]
fn edit_toggles_multigroup_layout() {
    let p = project(never_asked());
    init(&p);
    run(&p, "2", Capability::Edit, &[("multigroup", FlagValue::Bool(true))]).unwrap();
    assert!(p.store.load_initialized().unwrap().multigroup);

    create_api(&p, &both()).unwrap();
    assert!(p.fs.read_file("apis/ship/v1beta1/frigate_types.go").is_some());
    assert!(p.fs.read_file("controllers/ship/frigate_controller.go").is_some());
    let main = p.fs.read_file("main.go").unwrap();
    assert!(main.contains(r#"shipcontroller "github.com/example/guestbook/controllers/ship""#));
}

#[test]
fn commands_other_than_init_need_a_project() {
    let p = project(never_asked());
    let err = run(&p, "2", Capability::Edit, &[]).unwrap_err();
    assert_eq!(err.to_string(), "edit requires an existing project");
}

#[test]
fn v1_project_does_not_track_resources() {
    let p = project(never_asked());
    p.fs.write_all(Path::new("PROJECT"), b"version: \"1\"\ndomain: example.com\nrepo: example.com/legacy\n", 0o600)
        .unwrap();
    run(&p, "1", Capability::CreateApi, &frigate(&both())).unwrap();

    assert!(p.fs.read_file("pkg/apis/ship/v1beta1/frigate_types.go").is_some());
    assert!(p.fs.read_file("pkg/controller/frigate/frigate_controller.go").is_some());
    assert!(p.store.load_initialized().unwrap().resources.is_empty());
}

#[test]
fn init_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("guestbook");
    std::fs::create_dir(&root).unwrap();

    let fs = Arc::new(LocalFilesystem::new(&root));
    let ports = Ports {
        filesystem: fs.clone(),
        renderer: Arc::new(MinijinjaRenderer::new()),
        prompter: Arc::new(never_asked()),
        runner: Arc::new(Runner::default()),
        working_dir: root.clone(),
    };
    let store = ConfigStore::new(fs);
    let registry = builtin_registry("kubescaff").unwrap();
    let binder = Binder::new(&registry, "2", &[], false).unwrap();
    let bound = binder.bind(Capability::Init).unwrap();
    let values = bound
        .flags()
        .defaults()
        .with("skip-go-version-check", FlagValue::Bool(true))
        .with("fetch-deps", FlagValue::Bool(false))
        .with("repo", string("github.com/example/guestbook"));
    bound.execute(&values, &ports, &store).unwrap();

    assert!(root.join("main.go").is_file());
    assert!(root.join("config/manager/manager.yaml").is_file());
    let project = std::fs::read_to_string(root.join("PROJECT")).unwrap();
    assert!(project.contains("domain: my.domain"));
}
