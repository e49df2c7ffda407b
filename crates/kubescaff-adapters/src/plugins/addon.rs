//! The `addon` pattern: declarative manifests delivered through channels.
//!
//! Runs after the go/v2 `create api` builders. It adds an example manifest
//! and the `stable` channel, then swaps the generated controller and types
//! for their declarative variants.

use kubescaff_core::{
    application::{ApplicationError, TemplateRenderer, TransformPlugin},
    domain::{ScaffoldFile, Universe},
    error::KsResult,
};
use tracing::debug;

use crate::plugins::golang::v2::resource_data;

pub const TRANSFORM_NAME: &str = "addon";

const MANIFEST: &str = r#"# Placeholder manifest - replace with the manifest for your addon
"#;

const CHANNEL: &str = r#"# Versions for the stable channel
manifests:
- version: 0.0.1
"#;

const CONTROLLER: &str = r#"{{ boilerplate }}

package {{ controller_package }}

import (
	"github.com/go-logr/logr"
	"k8s.io/apimachinery/pkg/runtime"
	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/controller"
	"sigs.k8s.io/controller-runtime/pkg/handler"
	"sigs.k8s.io/controller-runtime/pkg/reconcile"
	"sigs.k8s.io/controller-runtime/pkg/source"
	"sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/addon"
	"sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/addon/pkg/status"
	"sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/declarative"

	api "{{ resource_import_path }}"
)

var _ reconcile.Reconciler = &{{ resource.kind }}Reconciler{}

// {{ resource.kind }}Reconciler reconciles a {{ resource.kind }} object
type {{ resource.kind }}Reconciler struct {
	client.Client
	Log    logr.Logger
	Scheme *runtime.Scheme

	declarative.Reconciler
}

// +kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }},verbs=get;list;watch;create;update;patch;delete
// +kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }}/status,verbs=get;update;patch

func (r *{{ resource.kind }}Reconciler) SetupWithManager(mgr ctrl.Manager) error {
	addon.Init()

	labels := map[string]string{
		"k8s-app": "{{ resource.kind | lower }}",
	}

	watchLabels := declarative.SourceLabel(mgr.GetScheme())

	if err := r.Reconciler.Init(mgr, &api.{{ resource.kind }}{},
		declarative.WithObjectTransform(declarative.AddLabels(labels)),
		declarative.WithOwner(declarative.SourceAsOwner),
		declarative.WithLabels(watchLabels),
		declarative.WithStatus(status.NewBasic(mgr.GetClient())),
		declarative.WithObjectTransform(addon.ApplyPatches),
	); err != nil {
		return err
	}

	c, err := controller.New("{{ resource.kind | lower }}-controller", mgr, controller.Options{Reconciler: r})
	if err != nil {
		return err
	}

	err = c.Watch(&source.Kind{Type: &api.{{ resource.kind }}{}}, &handler.EnqueueRequestForObject{})
	if err != nil {
		return err
	}

	return declarative.WatchAll(mgr.GetConfig(), c, r, watchLabels)
}
"#;

const TYPES: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
	addonv1alpha1 "sigs.k8s.io/kubebuilder-declarative-pattern/pkg/patterns/addon/pkg/apis/v1alpha1"
)

// {{ resource.kind }}Spec defines the desired state of {{ resource.kind }}
type {{ resource.kind }}Spec struct {
	addonv1alpha1.CommonSpec `json:",inline"`
	addonv1alpha1.PatchSpec  `json:",inline"`
}

// {{ resource.kind }}Status defines the observed state of {{ resource.kind }}
type {{ resource.kind }}Status struct {
	addonv1alpha1.CommonStatus `json:",inline"`
}

// +kubebuilder:object:root=true
// +kubebuilder:subresource:status
{%- if not resource.namespaced %}
// +kubebuilder:resource:scope=Cluster
{%- endif %}

// {{ resource.kind }} is the Schema for the {{ resource.plural }} API
type {{ resource.kind }} struct {
	metav1.TypeMeta   `json:",inline"`
	metav1.ObjectMeta `json:"metadata,omitempty"`

	Spec   {{ resource.kind }}Spec   `json:"spec,omitempty"`
	Status {{ resource.kind }}Status `json:"status,omitempty"`
}

var _ addonv1alpha1.CommonObject = &{{ resource.kind }}{}

func (o *{{ resource.kind }}) ComponentName() string {
	return "{{ resource.kind | lower }}"
}

func (o *{{ resource.kind }}) CommonSpec() addonv1alpha1.CommonSpec {
	return o.Spec.CommonSpec
}

func (o *{{ resource.kind }}) PatchSpec() addonv1alpha1.PatchSpec {
	return o.Spec.PatchSpec
}

func (o *{{ resource.kind }}) GetCommonStatus() addonv1alpha1.CommonStatus {
	return o.Status.CommonStatus
}

func (o *{{ resource.kind }}) SetCommonStatus(s addonv1alpha1.CommonStatus) {
	o.Status.CommonStatus = s
}

// +kubebuilder:object:root=true

// {{ resource.kind }}List contains a list of {{ resource.kind }}
type {{ resource.kind }}List struct {
	metav1.TypeMeta `json:",inline"`
	metav1.ListMeta `json:"metadata,omitempty"`
	Items           []{{ resource.kind }} `json:"items"`
}

func init() {
	SchemeBuilder.Register(&{{ resource.kind }}{}, &{{ resource.kind }}List{})
}
"#;

/// Rewrites a `create api` universe into the declarative addon layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddonTransform;

impl TransformPlugin for AddonTransform {
    fn name(&self) -> &str {
        TRANSFORM_NAME
    }

    fn transform(&self, universe: &mut Universe, renderer: &dyn TemplateRenderer) -> KsResult<()> {
        let Some(resource) = universe.resource.as_ref() else {
            return Err(ApplicationError::ValidationFailed(
                "the addon pattern requires a resource".into(),
            )
            .into());
        };
        let kind = resource.kind.to_lowercase();
        let data = resource_data(&universe.config, resource);
        let mut context = universe.template_context();
        if let Some(map) = context.as_object_mut() {
            map.extend(data);
        }

        let manifest = format!("channels/packages/{kind}/0.0.1/manifest.yaml");
        if universe.add_file(ScaffoldFile::new(&manifest, MANIFEST))? {
            debug!(path = %manifest, "Added example manifest");
        }
        universe.add_file(ScaffoldFile::new("channels/stable", CHANNEL))?;

        for (suffix, template) in [
            (format!("/{kind}_controller.go"), CONTROLLER),
            (format!("/{kind}_types.go"), TYPES),
        ] {
            let Some(path) = universe
                .files
                .iter()
                .find(|f| f.path.ends_with(&suffix))
                .map(|f| f.path.clone())
            else {
                continue;
            };
            let contents = renderer.render(&path, template, &context)?;
            if universe.replace_file_if_exists(ScaffoldFile::new(&path, contents)) {
                debug!(path = %path, "Replaced with addon variant");
            }
        }
        Ok(())
    }
}
