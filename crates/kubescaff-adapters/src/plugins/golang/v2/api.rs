//! `create api` for go/v2 projects.

use kubescaff_core::{
    application::{
        ApplicationError, CommandContext, FlagSet, Invocation, Scaffold, Subcommand,
        TransformPlugin,
    },
    domain::{FileBuilder, Gvk, IfExistsAction, ProjectConfig, Resource, ResourceOptions, Universe},
    error::KsResult,
};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::templates as t;
use crate::plugins::{addon::AddonTransform, common};

pub(super) struct CreateApiSubcommand;

impl Subcommand for CreateApiSubcommand {
    fn bind_flags(&self, flags: &mut FlagSet) {
        flags
            .bool("make", true, "if true, run make after generating files")
            .bool("resource", true, "if set, generate the resource without prompting the user")
            .bool("controller", true, "if set, generate the controller without prompting the user")
            .string("pattern", None, "generates an API following an extension pattern (addon)")
            .bool("force", false, "attempt to create resource even if it already exists");
        common::bind_resource_flags(flags);
        flags.bool("namespaced", true, "resource is namespaced");
    }

    fn update_context(&self, ctx: &mut CommandContext) {
        ctx.description = "Scaffold a Kubernetes API by creating a Resource definition and / or a Controller.

create resource will prompt the user for if it should scaffold the Resource and / or Controller. To only
scaffold a Controller for an existing Resource, select \"n\" for Resource. To only define
the schema for a Resource without writing a Controller, select \"n\" for Controller.

After the scaffold is written, api will run make on the project.
"
        .into();
        ctx.examples = format!(
            "  # Create a frigates API with Group: ship, Version: v1beta1 and Kind: Frigate
  {0} create api --group ship --version v1beta1 --kind Frigate

  # Edit the API Scheme
  nano api/v1beta1/frigate_types.go

  # Edit the Controller
  nano controllers/frigate_controller.go

  # Install CRDs into the Kubernetes cluster using kubectl apply
  make install

  # Regenerate code and run against the Kubernetes cluster configured by ~/.kube/config
  make run
",
            ctx.command_name
        );
    }

    fn run(&mut self, inv: &mut Invocation<'_>) -> KsResult<()> {
        let ports = inv.ports;
        let flags = inv.flags;

        let options = common::resource_options(flags);
        options.validate()?;

        let do_resource = common::confirm_flag(inv, "resource", "Create Resource [y/n]")?;
        let do_controller = common::confirm_flag(inv, "controller", "Create Controller [y/n]")?;

        if do_resource {
            check_new_resource(inv.config, &options, flags.bool("force"))?;
        }

        let transform = pattern_transform(flags.string("pattern").unwrap_or_default())?;

        let resource = options.into_resource(inv.config, do_resource);
        if do_resource && inv.config.add_resource(resource.gvk()) {
            debug!(gvk = %resource.gvk(), "Recorded resource");
        }

        let on_existing = if flags.bool("force") {
            IfExistsAction::Overwrite
        } else {
            IfExistsAction::Error
        };
        let builders = builders(inv.config, &resource, do_resource, do_controller, on_existing);
        let boilerplate = common::load_boilerplate(ports.filesystem.as_ref())?;
        let mut universe = Universe::new(inv.config.clone())
            .with_resource(resource)
            .with_boilerplate(boilerplate);

        let mut scaffold = Scaffold::from_ports(ports);
        if let Some(transform) = transform {
            scaffold = scaffold.with_transform(transform);
        }
        scaffold.execute(&mut universe, &builders)?;
        info!(files = universe.files.len(), "API scaffolded");
        Ok(())
    }

    fn post_scaffold(&mut self, inv: &Invocation<'_>) -> KsResult<()> {
        if inv.flags.bool("make") {
            inv.ports.runner.run("Running make", "make", &[])?;
        }
        Ok(())
    }
}

fn check_new_resource(config: &ProjectConfig, options: &ResourceOptions, force: bool) -> KsResult<()> {
    let gvk = Gvk::new(&options.group, &options.version, &options.kind);
    if !force && config.has_resource(&gvk) {
        return Err(ApplicationError::ValidationFailed("API resource already exists".into()).into());
    }

    if !config.multigroup
        && config
            .resource_groups()
            .iter()
            .any(|existing| !existing.eq_ignore_ascii_case(&options.group))
    {
        return Err(ApplicationError::ValidationFailed(
            "multiple groups are not allowed by default, to enable multi-group visit \
             kubebuilder.io/migration/multi-group.html"
                .into(),
        )
        .into());
    }
    Ok(())
}

fn pattern_transform(pattern: &str) -> KsResult<Option<Box<dyn TransformPlugin>>> {
    match pattern.to_lowercase().as_str() {
        "" => Ok(None),
        "addon" => Ok(Some(Box::new(AddonTransform))),
        _ => Err(ApplicationError::UnknownPattern {
            pattern: pattern.to_string(),
        }
        .into()),
    }
}

/// Template data shared by every builder of a `create api` pass.
pub(crate) fn resource_data(config: &ProjectConfig, resource: &Resource) -> Map<String, Value> {
    let mut data = Map::new();
    let import_path = if config.multigroup {
        format!("{}/apis/{}/{}", config.repo, resource.group, resource.version)
    } else {
        format!("{}/api/{}", config.repo, resource.version)
    };
    data.insert("resource_import_path".into(), import_path.into());

    let (package, qualifier, crd_path) = if config.multigroup {
        (
            resource.group_package_name.clone(),
            format!("{}controller.", resource.group_package_name),
            r#""..", "..", "config", "crd", "bases""#,
        )
    } else {
        (
            "controllers".to_string(),
            "controllers.".to_string(),
            r#""..", "config", "crd", "bases""#,
        )
    };
    data.insert("controller_package".into(), package.into());
    data.insert("controller_qualifier".into(), qualifier.into());
    data.insert("crd_path_parts".into(), crd_path.into());
    data
}

fn builders(
    config: &ProjectConfig,
    resource: &Resource,
    do_resource: bool,
    do_controller: bool,
    on_existing: IfExistsAction,
) -> Vec<FileBuilder> {
    let api_dir = common::api_dir(config.multigroup);
    let controllers_dir = common::controllers_dir(config.multigroup);
    let mut out = Vec::new();

    if do_resource {
        out.extend([
            FileBuilder::template(format!("{api_dir}/{{{{ resource.kind | lower }}}}_types.go"), t::TYPES_GO)
                .if_exists(on_existing),
            FileBuilder::template(format!("{api_dir}/groupversion_info.go"), t::GROUP_GO)
                .if_exists(IfExistsAction::Skip),
            FileBuilder::template(
                "config/samples/{{ resource.group_package_name }}_{{ resource.version }}_{{ resource.kind | lower }}.yaml",
                t::CRD_SAMPLE,
            )
            .if_exists(IfExistsAction::Skip),
            FileBuilder::template("config/rbac/{{ resource.kind | lower }}_editor_role.yaml", t::EDITOR_ROLE)
                .if_exists(IfExistsAction::Skip),
            FileBuilder::template("config/rbac/{{ resource.kind | lower }}_viewer_role.yaml", t::VIEWER_ROLE)
                .if_exists(IfExistsAction::Skip),
            FileBuilder::template("config/crd/patches/webhook_in_{{ resource.plural }}.yaml", t::WEBHOOK_PATCH)
                .if_exists(IfExistsAction::Skip),
            FileBuilder::template("config/crd/patches/cainjection_in_{{ resource.plural }}.yaml", t::CAINJECTION_PATCH)
                .if_exists(IfExistsAction::Skip),
            FileBuilder::template("config/crd/kustomization.yaml", t::CRD_KUSTOMIZATION)
                .if_exists(IfExistsAction::Skip),
            FileBuilder::template("config/crd/kustomizeconfig.yaml", t::CRD_KUSTOMIZE_CONFIG)
                .if_exists(IfExistsAction::Skip),
            FileBuilder::inserter("config/crd/kustomization.yaml")
                .marker(t::CRD_KUSTOMIZE_RESOURCE_MARKER, t::CRD_RESOURCE_ENTRY)
                .marker(t::CRD_KUSTOMIZE_WEBHOOK_PATCH_MARKER, t::CRD_WEBHOOK_PATCH_ENTRY)
                .marker(t::CRD_KUSTOMIZE_CAINJECTION_PATCH_MARKER, t::CRD_CAINJECTION_PATCH_ENTRY),
        ]);
    }

    if do_controller {
        out.push(
            FileBuilder::template(format!("{controllers_dir}/suite_test.go"), t::SUITE_TEST_GO)
                .if_exists(IfExistsAction::Skip),
        );
        if do_resource {
            out.push(
                FileBuilder::inserter(format!("{controllers_dir}/suite_test.go"))
                    .marker(t::MAIN_IMPORTS_MARKER, t::SUITE_API_IMPORT)
                    .marker(t::MAIN_SCHEME_MARKER, t::SUITE_ADD_SCHEME),
            );
        }
        out.push(
            FileBuilder::template(
                format!("{controllers_dir}/{{{{ resource.kind | lower }}}}_controller.go"),
                t::CONTROLLER_GO,
            )
            .if_exists(on_existing),
        );
    }

    let mut main = FileBuilder::inserter("main.go");
    if do_resource {
        main = main
            .marker(t::MAIN_IMPORTS_MARKER, t::MAIN_API_IMPORT)
            .marker(t::MAIN_SCHEME_MARKER, t::MAIN_ADD_SCHEME);
    }
    if do_controller {
        let import = if config.multigroup {
            t::MAIN_CONTROLLER_IMPORT
        } else {
            t::MAIN_CONTROLLERS_IMPORT
        };
        main = main.marker(t::MAIN_IMPORTS_MARKER, import);
        main = main.marker(t::MAIN_BUILDER_MARKER, t::MAIN_SETUP_CONTROLLER);
    }
    if do_resource || do_controller {
        out.push(main);
    }

    let data = resource_data(config, resource);
    out.into_iter()
        .map(|mut b| {
            b.data.extend(data.clone());
            b
        })
        .collect()
}
