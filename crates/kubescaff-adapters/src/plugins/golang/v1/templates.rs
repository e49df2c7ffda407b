//! Template payloads for go/v1 projects (`cmd/manager` + `pkg/` layout).

// ── init ────────────────────────────────────────────────────────────────────

pub const GO_MOD: &str = r#"module {{ repo }}

go 1.13

require (
	k8s.io/apimachinery v0.17.2
	k8s.io/client-go v0.17.2
	sigs.k8s.io/controller-runtime v0.4.0
)
"#;

pub const MAKEFILE: &str = r#"
# Image URL to use all building/pushing image targets
IMG ?= controller:latest

all: test manager

# Run tests
test: generate fmt vet manifests
	go test ./pkg/... ./cmd/... -coverprofile cover.out

# Build manager binary
manager: generate fmt vet
	go build -o bin/manager {{ repo }}/cmd/manager

# Run against the configured Kubernetes cluster in ~/.kube/config
run: generate fmt vet
	go run ./cmd/manager/main.go

# Install CRDs into a cluster
install: manifests
	kubectl apply -f config/crds

# Deploy controller in the configured Kubernetes cluster in ~/.kube/config
deploy: manifests
	kubectl apply -f config/crds
	kustomize build config/default | kubectl apply -f -

# Generate manifests e.g. CRD, RBAC etc.
manifests:
	go run vendor/sigs.k8s.io/controller-tools/cmd/controller-gen/main.go all

# Run go fmt against code
fmt:
	go fmt ./pkg/... ./cmd/...

# Run go vet against code
vet:
	go vet ./pkg/... ./cmd/...

# Generate code
generate:
	go generate ./pkg/... ./cmd/...

# Build the docker image
docker-build: test
	docker build . -t ${IMG}

# Push the docker image
docker-push:
	docker push ${IMG}
"#;

pub const DOCKERFILE: &str = r#"# Build the manager binary
FROM golang:1.13 as builder

# Copy in the go src
WORKDIR /go/src/{{ repo }}
COPY pkg/    pkg/
COPY cmd/    cmd/
COPY vendor/ vendor/

# Build
RUN CGO_ENABLED=0 GOOS=linux GOARCH=amd64 go build -a -o manager {{ repo }}/cmd/manager

# Copy the controller-manager into a thin image
FROM ubuntu:latest
WORKDIR /
COPY --from=builder /go/src/{{ repo }}/manager .
ENTRYPOINT ["/manager"]
"#;

pub const MAIN_GO: &str = r#"{{ boilerplate }}

package main

import (
	"flag"
	"os"

	"{{ repo }}/pkg/apis"
	"{{ repo }}/pkg/controller"
	_ "k8s.io/client-go/plugin/pkg/client/auth/gcp"
	"sigs.k8s.io/controller-runtime/pkg/client/config"
	"sigs.k8s.io/controller-runtime/pkg/manager"
	logf "sigs.k8s.io/controller-runtime/pkg/runtime/log"
	"sigs.k8s.io/controller-runtime/pkg/runtime/signals"
)

func main() {
	var metricsAddr string
	flag.StringVar(&metricsAddr, "metrics-addr", ":8080", "The address the metric endpoint binds to.")
	flag.Parse()
	logf.SetLogger(logf.ZapLogger(false))
	log := logf.Log.WithName("entrypoint")

	cfg, err := config.GetConfig()
	if err != nil {
		log.Error(err, "unable to set up client config")
		os.Exit(1)
	}

	mgr, err := manager.New(cfg, manager.Options{MetricsBindAddress: metricsAddr})
	if err != nil {
		log.Error(err, "unable to set up overall controller manager")
		os.Exit(1)
	}

	if err := apis.AddToScheme(mgr.GetScheme()); err != nil {
		log.Error(err, "unable add APIs to scheme")
		os.Exit(1)
	}

	if err := controller.AddToManager(mgr); err != nil {
		log.Error(err, "unable to register controllers to the manager")
		os.Exit(1)
	}

	log.Info("Starting the Cmd.")
	if err := mgr.Start(signals.SetupSignalHandler()); err != nil {
		log.Error(err, "unable to run the manager")
		os.Exit(1)
	}
}
"#;

pub const APIS_GO: &str = r#"{{ boilerplate }}

// Package apis contains Kubernetes API groups.
package apis

import (
	"k8s.io/apimachinery/pkg/runtime"
)

// AddToSchemes may be used to add all resources defined in the project to a Scheme
var AddToSchemes runtime.SchemeBuilder

// AddToScheme adds all Resources to the Scheme
func AddToScheme(s *runtime.Scheme) error {
	return AddToSchemes.AddToScheme(s)
}
"#;

pub const CONTROLLER_GO: &str = r#"{{ boilerplate }}

package controller

import (
	"sigs.k8s.io/controller-runtime/pkg/manager"
)

// AddToManagerFuncs is a list of functions to add all Controllers to the Manager
var AddToManagerFuncs []func(manager.Manager) error

// AddToManager adds all Controllers to the Manager
func AddToManager(m manager.Manager) error {
	for _, f := range AddToManagerFuncs {
		if err := f(m); err != nil {
			return err
		}
	}
	return nil
}
"#;

pub const DEFAULT_KUSTOMIZATION: &str = r#"namespace: {{ project_name }}-system
namePrefix: {{ project_name }}-

resources:
- ../rbac/rbac_role.yaml
- ../rbac/rbac_role_binding.yaml
- ../manager/manager.yaml
"#;

// ── create api ──────────────────────────────────────────────────────────────

pub const ADD_TO_SCHEME_GO: &str = r#"{{ boilerplate }}

package apis

import (
	"{{ repo }}/pkg/apis/{{ resource.group }}/{{ resource.version }}"
)

func init() {
	// Register the types with the Scheme so the components can map objects to GroupVersionKinds and back
	AddToSchemes = append(AddToSchemes, {{ resource.version }}.SchemeBuilder.AddToScheme)
}
"#;

pub const REGISTER_GO: &str = r#"{{ boilerplate }}

// Package {{ resource.version }} contains API Schema definitions for the {{ resource.group }} {{ resource.version }} API group
// +k8s:openapi-gen=true
// +k8s:deepcopy-gen=package,register
// +groupName={{ resource.qualified_group }}
package {{ resource.version }}

import (
	"k8s.io/apimachinery/pkg/runtime/schema"
	"sigs.k8s.io/controller-runtime/pkg/runtime/scheme"
)

var (
	// SchemeGroupVersion is group version used to register these objects
	SchemeGroupVersion = schema.GroupVersion{Group: "{{ resource.qualified_group }}", Version: "{{ resource.version }}"}

	// SchemeBuilder is used to add go types to the GroupVersionKind scheme
	SchemeBuilder = &scheme.Builder{GroupVersion: SchemeGroupVersion}

	// AddToScheme is required by pkg/client/...
	AddToScheme = SchemeBuilder.AddToScheme
)
"#;

pub const TYPES_GO: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
)

// {{ resource.kind }}Spec defines the desired state of {{ resource.kind }}
type {{ resource.kind }}Spec struct {
	// INSERT ADDITIONAL SPEC FIELDS - desired state of cluster
}

// {{ resource.kind }}Status defines the observed state of {{ resource.kind }}
type {{ resource.kind }}Status struct {
	// INSERT ADDITIONAL STATUS FIELD - define observed state of cluster
}

// +genclient
{%- if not resource.namespaced %}
// +genclient:nonNamespaced
{%- endif %}
// +k8s:deepcopy-gen:interfaces=k8s.io/apimachinery/pkg/runtime.Object

// {{ resource.kind }} is the Schema for the {{ resource.plural }} API
// +k8s:openapi-gen=true
type {{ resource.kind }} struct {
	metav1.TypeMeta   `json:",inline"`
	metav1.ObjectMeta `json:"metadata,omitempty"`

	Spec   {{ resource.kind }}Spec   `json:"spec,omitempty"`
	Status {{ resource.kind }}Status `json:"status,omitempty"`
}

// +k8s:deepcopy-gen:interfaces=k8s.io/apimachinery/pkg/runtime.Object

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

pub const ADD_CONTROLLER_GO: &str = r#"{{ boilerplate }}

package controller

import (
	"{{ repo }}/pkg/controller/{{ resource.kind | lower }}"
)

func init() {
	// AddToManagerFuncs is a list of functions to create controllers and add them to a manager.
	AddToManagerFuncs = append(AddToManagerFuncs, {{ resource.kind | lower }}.Add)
}
"#;

pub const KIND_CONTROLLER_GO: &str = r#"{{ boilerplate }}

package {{ resource.kind | lower }}

import (
	"context"

	{{ resource.import_alias }} "{{ repo }}/pkg/apis/{{ resource.group }}/{{ resource.version }}"
	"k8s.io/apimachinery/pkg/api/errors"
	"k8s.io/apimachinery/pkg/runtime"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/controller"
	"sigs.k8s.io/controller-runtime/pkg/handler"
	"sigs.k8s.io/controller-runtime/pkg/manager"
	"sigs.k8s.io/controller-runtime/pkg/reconcile"
	"sigs.k8s.io/controller-runtime/pkg/source"
)

// Add creates a new {{ resource.kind }} Controller and adds it to the Manager.
func Add(mgr manager.Manager) error {
	return add(mgr, newReconciler(mgr))
}

func newReconciler(mgr manager.Manager) reconcile.Reconciler {
	return &Reconcile{{ resource.kind }}{Client: mgr.GetClient(), scheme: mgr.GetScheme()}
}

func add(mgr manager.Manager, r reconcile.Reconciler) error {
	c, err := controller.New("{{ resource.kind | lower }}-controller", mgr, controller.Options{Reconciler: r})
	if err != nil {
		return err
	}
	return c.Watch(&source.Kind{Type: &{{ resource.import_alias }}.{{ resource.kind }}{}}, &handler.EnqueueRequestForObject{})
}

var _ reconcile.Reconciler = &Reconcile{{ resource.kind }}{}

// Reconcile{{ resource.kind }} reconciles a {{ resource.kind }} object
type Reconcile{{ resource.kind }} struct {
	client.Client
	scheme *runtime.Scheme
}

// +kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }},verbs=get;list;watch;create;update;patch;delete
func (r *Reconcile{{ resource.kind }}) Reconcile(request reconcile.Request) (reconcile.Result, error) {
	instance := &{{ resource.import_alias }}.{{ resource.kind }}{}
	err := r.Get(context.TODO(), request.NamespacedName, instance)
	if err != nil {
		if errors.IsNotFound(err) {
			return reconcile.Result{}, nil
		}
		return reconcile.Result{}, err
	}
	return reconcile.Result{}, nil
}
"#;

pub const CRD_SAMPLE: &str = r#"apiVersion: {{ resource.qualified_group }}/{{ resource.version }}
kind: {{ resource.kind }}
metadata:
  labels:
    controller-tools.k8s.io: "1.0"
  name: {{ resource.kind | lower }}-sample
spec:
  # Add fields here
  foo: bar
"#;
