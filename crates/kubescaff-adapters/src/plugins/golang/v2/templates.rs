//! Template payloads for `go.kubebuilder.io/v2`.
//!
//! Rendered with minijinja against the universe context. Marker lines are
//! the anchors later commands insert below.

pub const MAIN_IMPORTS_MARKER: &str = "// +kubebuilder:scaffold:imports";
pub const MAIN_SCHEME_MARKER: &str = "// +kubebuilder:scaffold:scheme";
pub const MAIN_BUILDER_MARKER: &str = "// +kubebuilder:scaffold:builder";
pub const CRD_KUSTOMIZE_RESOURCE_MARKER: &str = "# +kubebuilder:scaffold:crdkustomizeresource";
pub const CRD_KUSTOMIZE_WEBHOOK_PATCH_MARKER: &str = "# +kubebuilder:scaffold:crdkustomizewebhookpatch";
pub const CRD_KUSTOMIZE_CAINJECTION_PATCH_MARKER: &str =
    "# +kubebuilder:scaffold:crdkustomizecainjectionpatch";

// ── init ────────────────────────────────────────────────────────────────────

pub const GO_MOD: &str = r#"module {{ repo }}

go 1.13

require (
	github.com/go-logr/logr v0.1.0
	github.com/onsi/ginkgo v1.11.0
	github.com/onsi/gomega v1.8.1
	k8s.io/apimachinery v0.17.2
	k8s.io/client-go v0.17.2
	sigs.k8s.io/controller-runtime v0.5.0
)
"#;

pub const MAKEFILE: &str = r##"
# Image URL to use all building/pushing image targets
IMG ?= controller:latest
# Produce CRDs that work back to Kubernetes 1.11 (no version conversion)
CRD_OPTIONS ?= "crd:trivialVersions=true"

# Get the currently used golang install path (in GOPATH/bin, unless GOBIN is set)
ifeq (,$(shell go env GOBIN))
GOBIN=$(shell go env GOPATH)/bin
else
GOBIN=$(shell go env GOBIN)
endif

all: manager

# Run tests
test: generate fmt vet manifests
	go test ./... -coverprofile cover.out

# Build manager binary
manager: generate fmt vet
	go build -o bin/manager main.go

# Run against the configured Kubernetes cluster in ~/.kube/config
run: generate fmt vet manifests
	go run ./main.go

# Install CRDs into a cluster
install: manifests
	kustomize build config/crd | kubectl apply -f -

# Uninstall CRDs from a cluster
uninstall: manifests
	kustomize build config/crd | kubectl delete -f -

# Deploy controller in the configured Kubernetes cluster in ~/.kube/config
deploy: manifests
	cd config/manager && kustomize edit set image controller=${IMG}
	kustomize build config/default | kubectl apply -f -

# Generate manifests e.g. CRD, RBAC etc.
manifests: controller-gen
	$(CONTROLLER_GEN) $(CRD_OPTIONS) rbac:roleName=manager-role webhook paths="./..." output:crd:artifacts:config=config/crd/bases

# Run go fmt against code
fmt:
	go fmt ./...

# Run go vet against code
vet:
	go vet ./...

# Generate code
generate: controller-gen
	$(CONTROLLER_GEN) object:headerFile="hack/boilerplate.go.txt" paths="./..."

# Build the docker image
docker-build: test
	docker build . -t ${IMG}

# Push the docker image
docker-push:
	docker push ${IMG}

# find or download controller-gen
controller-gen:
ifeq (, $(shell which controller-gen))
	go get sigs.k8s.io/controller-tools/cmd/controller-gen@v0.2.5
CONTROLLER_GEN=$(GOBIN)/controller-gen
else
CONTROLLER_GEN=$(shell which controller-gen)
endif
"##;

pub const DOCKERFILE: &str = r#"# Build the manager binary
FROM golang:1.13 as builder

WORKDIR /workspace
COPY go.mod go.mod
COPY go.sum go.sum
RUN go mod download

COPY main.go main.go
COPY api/ api/
COPY controllers/ controllers/

RUN CGO_ENABLED=0 GOOS=linux GOARCH=amd64 GO111MODULE=on go build -a -o manager main.go

FROM gcr.io/distroless/static:nonroot
WORKDIR /
COPY --from=builder /workspace/manager .
USER nonroot:nonroot

ENTRYPOINT ["/manager"]
"#;

pub const GITIGNORE: &str = r#"
# Binaries for programs and plugins
*.exe
*.exe~
*.dll
*.so
*.dylib
bin

# Test binary, build with `go test -c`
*.test

# Output of the go coverage tool
*.out

# Editor files
.idea
.vscode
*.swp
*~
"#;

pub const MAIN_GO: &str = r#"{{ boilerplate }}

package main

import (
	"flag"
	"os"

	"k8s.io/apimachinery/pkg/runtime"
	clientgoscheme "k8s.io/client-go/kubernetes/scheme"
	_ "k8s.io/client-go/plugin/pkg/client/auth/gcp"
	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/log/zap"
	// +kubebuilder:scaffold:imports
)

var (
	scheme   = runtime.NewScheme()
	setupLog = ctrl.Log.WithName("setup")
)

func init() {
	_ = clientgoscheme.AddToScheme(scheme)

	// +kubebuilder:scaffold:scheme
}

func main() {
	var metricsAddr string
	var enableLeaderElection bool
	flag.StringVar(&metricsAddr, "metrics-addr", ":8080", "The address the metric endpoint binds to.")
	flag.BoolVar(&enableLeaderElection, "enable-leader-election", false,
		"Enable leader election for controller manager. "+
			"Enabling this will ensure there is only one active controller manager.")
	flag.Parse()

	ctrl.SetLogger(zap.New(zap.UseDevMode(true)))

	mgr, err := ctrl.NewManager(ctrl.GetConfigOrDie(), ctrl.Options{
		Scheme:             scheme,
		MetricsBindAddress: metricsAddr,
		Port:               9443,
		LeaderElection:     enableLeaderElection,
		LeaderElectionID:   "{{ project_name }}.{{ domain }}",
	})
	if err != nil {
		setupLog.Error(err, "unable to start manager")
		os.Exit(1)
	}

	// +kubebuilder:scaffold:builder

	setupLog.Info("starting manager")
	if err := mgr.Start(ctrl.SetupSignalHandler()); err != nil {
		setupLog.Error(err, "problem running manager")
		os.Exit(1)
	}
}
"#;

pub const DEFAULT_KUSTOMIZATION: &str = r#"# Adds namespace to all resources.
namespace: {{ project_name }}-system

# Value of this field is prepended to the
# names of all resources.
namePrefix: {{ project_name }}-

bases:
- ../crd
- ../rbac
- ../manager
"#;

pub const MANAGER_KUSTOMIZATION: &str = "resources:\n- manager.yaml\n";

pub const MANAGER_YAML: &str = r#"apiVersion: v1
kind: Namespace
metadata:
  labels:
    control-plane: controller-manager
  name: system
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: controller-manager
  namespace: system
  labels:
    control-plane: controller-manager
spec:
  selector:
    matchLabels:
      control-plane: controller-manager
  replicas: 1
  template:
    metadata:
      labels:
        control-plane: controller-manager
    spec:
      containers:
      - command:
        - /manager
        args:
        - --enable-leader-election
        image: controller:latest
        name: manager
      terminationGracePeriodSeconds: 10
"#;

pub const RBAC_KUSTOMIZATION: &str = r#"resources:
- role.yaml
- role_binding.yaml
- leader_election_role.yaml
"#;

pub const RBAC_ROLE_BINDING: &str = r#"apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRoleBinding
metadata:
  name: manager-rolebinding
roleRef:
  apiGroup: rbac.authorization.k8s.io
  kind: ClusterRole
  name: manager-role
subjects:
- kind: ServiceAccount
  name: default
  namespace: system
"#;

// ── create api ──────────────────────────────────────────────────────────────

pub const TYPES_GO: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
)

// {{ resource.kind }}Spec defines the desired state of {{ resource.kind }}
type {{ resource.kind }}Spec struct {
	// INSERT ADDITIONAL SPEC FIELDS - desired state of cluster
	// Important: Run "make" to regenerate code after modifying this file

	// Foo is an example field of {{ resource.kind }}. Edit {{ resource.kind | lower }}_types.go to remove/update
	Foo string `json:"foo,omitempty"`
}

// {{ resource.kind }}Status defines the observed state of {{ resource.kind }}
type {{ resource.kind }}Status struct {
	// INSERT ADDITIONAL STATUS FIELD - define observed state of cluster
	// Important: Run "make" to regenerate code after modifying this file
}

// +kubebuilder:object:root=true
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

pub const GROUP_GO: &str = r#"{{ boilerplate }}

// Package {{ resource.version }} contains API Schema definitions for the {{ resource.group }} {{ resource.version }} API group
// +kubebuilder:object:generate=true
// +groupName={{ resource.qualified_group }}
package {{ resource.version }}

import (
	"k8s.io/apimachinery/pkg/runtime/schema"
	"sigs.k8s.io/controller-runtime/pkg/scheme"
)

var (
	// GroupVersion is group version used to register these objects
	GroupVersion = schema.GroupVersion{Group: "{{ resource.qualified_group }}", Version: "{{ resource.version }}"}

	// SchemeBuilder is used to add go types to the GroupVersionKind scheme
	SchemeBuilder = &scheme.Builder{GroupVersion: GroupVersion}

	// AddToScheme adds the types in this group-version to the given scheme.
	AddToScheme = SchemeBuilder.AddToScheme
)
"#;

pub const CRD_SAMPLE: &str = r#"apiVersion: {{ resource.qualified_group }}/{{ resource.version }}
kind: {{ resource.kind }}
metadata:
  name: {{ resource.kind | lower }}-sample
spec:
  # Add fields here
  foo: bar
"#;

pub const EDITOR_ROLE: &str = r#"# permissions for end users to edit {{ resource.plural }}.
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: {{ resource.kind | lower }}-editor-role
rules:
- apiGroups:
  - {{ resource.qualified_group }}
  resources:
  - {{ resource.plural }}
  verbs:
  - create
  - delete
  - get
  - list
  - patch
  - update
  - watch
- apiGroups:
  - {{ resource.qualified_group }}
  resources:
  - {{ resource.plural }}/status
  verbs:
  - get
"#;

pub const VIEWER_ROLE: &str = r#"# permissions for end users to view {{ resource.plural }}.
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: {{ resource.kind | lower }}-viewer-role
rules:
- apiGroups:
  - {{ resource.qualified_group }}
  resources:
  - {{ resource.plural }}
  verbs:
  - get
  - list
  - watch
- apiGroups:
  - {{ resource.qualified_group }}
  resources:
  - {{ resource.plural }}/status
  verbs:
  - get
"#;

pub const CRD_KUSTOMIZATION: &str = r#"# This kustomization.yaml is not intended to be run by itself,
# since it depends on service name and namespace that are out of this kustomize package.
# It should be run by config/default
resources:
# +kubebuilder:scaffold:crdkustomizeresource

patchesStrategicMerge:
# [WEBHOOK] To enable webhook, uncomment all the sections with [WEBHOOK] prefix.
# patches here are for enabling the conversion webhook for each CRD
# +kubebuilder:scaffold:crdkustomizewebhookpatch

# [CERTMANAGER] To enable webhook, uncomment all the sections with [CERTMANAGER] prefix.
# patches here are for enabling the CA injection for each CRD
# +kubebuilder:scaffold:crdkustomizecainjectionpatch

# the following config is for teaching kustomize how to do kustomization for CRDs.
configurations:
- kustomizeconfig.yaml
"#;

pub const CRD_KUSTOMIZE_CONFIG: &str = r#"# This file is for teaching kustomize how to substitute name and namespace reference in CRD
nameReference:
- kind: Service
  version: v1
  fieldSpecs:
  - kind: CustomResourceDefinition
    group: apiextensions.k8s.io
    path: spec/conversion/webhookClientConfig/service/name

namespace:
- kind: CustomResourceDefinition
  group: apiextensions.k8s.io
  path: spec/conversion/webhookClientConfig/service/namespace
  create: false

varReference:
- path: metadata/annotations
"#;

pub const WEBHOOK_PATCH: &str = r#"# The following patch enables conversion webhook for CRD
# CRD conversion requires k8s 1.13 or later.
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  name: {{ resource.plural }}.{{ resource.qualified_group }}
spec:
  conversion:
    strategy: Webhook
    webhookClientConfig:
      caBundle: Cg==
      service:
        namespace: system
        name: webhook-service
        path: /convert
"#;

pub const CAINJECTION_PATCH: &str = r#"# The following patch adds a directive for certmanager to inject CA into the CRD
# CRD conversion requires k8s 1.13 or later.
apiVersion: apiextensions.k8s.io/v1beta1
kind: CustomResourceDefinition
metadata:
  annotations:
    cert-manager.io/inject-ca-from: $(CERTIFICATE_NAMESPACE)/$(CERTIFICATE_NAME)
  name: {{ resource.plural }}.{{ resource.qualified_group }}
"#;

pub const CONTROLLER_GO: &str = r#"{{ boilerplate }}

package {{ controller_package }}

import (
	"context"

	"github.com/go-logr/logr"
	"k8s.io/apimachinery/pkg/runtime"
	ctrl "sigs.k8s.io/controller-runtime"
	"sigs.k8s.io/controller-runtime/pkg/client"
{%- if resource.create_example_reconcile_body %}

	{{ resource.import_alias }} "{{ resource_import_path }}"
{%- endif %}
)

// {{ resource.kind }}Reconciler reconciles a {{ resource.kind }} object
type {{ resource.kind }}Reconciler struct {
	client.Client
	Log    logr.Logger
	Scheme *runtime.Scheme
}

// +kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }},verbs=get;list;watch;create;update;patch;delete
// +kubebuilder:rbac:groups={{ resource.qualified_group }},resources={{ resource.plural }}/status,verbs=get;update;patch

func (r *{{ resource.kind }}Reconciler) Reconcile(req ctrl.Request) (ctrl.Result, error) {
	_ = context.Background()
	_ = r.Log.WithValues("{{ resource.kind | lower }}", req.NamespacedName)

	// your logic here

	return ctrl.Result{}, nil
}

func (r *{{ resource.kind }}Reconciler) SetupWithManager(mgr ctrl.Manager) error {
	return ctrl.NewControllerManagedBy(mgr).
{%- if resource.create_example_reconcile_body %}
		For(&{{ resource.import_alias }}.{{ resource.kind }}{}).
{%- endif %}
		Complete(r)
}
"#;

pub const SUITE_TEST_GO: &str = r#"{{ boilerplate }}

package {{ controller_package }}

import (
	"path/filepath"
	"testing"

	. "github.com/onsi/ginkgo"
	. "github.com/onsi/gomega"
	"k8s.io/client-go/kubernetes/scheme"
	"k8s.io/client-go/rest"
	"sigs.k8s.io/controller-runtime/pkg/client"
	"sigs.k8s.io/controller-runtime/pkg/envtest"
	logf "sigs.k8s.io/controller-runtime/pkg/log"
	"sigs.k8s.io/controller-runtime/pkg/log/zap"
	// +kubebuilder:scaffold:imports
)

var cfg *rest.Config
var k8sClient client.Client
var testEnv *envtest.Environment

func TestAPIs(t *testing.T) {
	RegisterFailHandler(Fail)

	RunSpecsWithDefaultAndCustomReporters(t,
		"Controller Suite",
		[]Reporter{envtest.NewlineReporter{}})
}

var _ = BeforeSuite(func(done Done) {
	logf.SetLogger(zap.LoggerTo(GinkgoWriter, true))

	By("bootstrapping test environment")
	testEnv = &envtest.Environment{
		CRDDirectoryPaths: []string{filepath.Join({{ crd_path_parts }})},
	}

	var err error
	cfg, err = testEnv.Start()
	Expect(err).ToNot(HaveOccurred())
	Expect(cfg).ToNot(BeNil())

	// +kubebuilder:scaffold:scheme

	k8sClient, err = client.New(cfg, client.Options{Scheme: scheme.Scheme})
	Expect(err).ToNot(HaveOccurred())
	Expect(k8sClient).ToNot(BeNil())

	close(done)
}, 60)

var _ = AfterSuite(func() {
	By("tearing down the test environment")
	err := testEnv.Stop()
	Expect(err).ToNot(HaveOccurred())
})
"#;

/// Import line added to `main.go` for a new API package.
pub const MAIN_API_IMPORT: &str = r#"	{{ resource.import_alias }} "{{ resource_import_path }}""#;

pub const MAIN_CONTROLLERS_IMPORT: &str = r#"	"{{ repo }}/controllers""#;

/// Per-group controller import used by multi-group projects.
pub const MAIN_CONTROLLER_IMPORT: &str =
    r#"	{{ resource.group_package_name }}controller "{{ repo }}/controllers/{{ resource.group }}""#;

pub const MAIN_ADD_SCHEME: &str = "	_ = {{ resource.import_alias }}.AddToScheme(scheme)";

pub const MAIN_SETUP_CONTROLLER: &str = r#"	if err = (&{{ controller_qualifier }}{{ resource.kind }}Reconciler{
		Client: mgr.GetClient(),
		Log:    ctrl.Log.WithName("controllers").WithName("{{ resource.kind }}"),
		Scheme: mgr.GetScheme(),
	}).SetupWithManager(mgr); err != nil {
		setupLog.Error(err, "unable to create controller", "controller", "{{ resource.kind }}")
		os.Exit(1)
	}"#;

pub const SUITE_API_IMPORT: &str = MAIN_API_IMPORT;

pub const SUITE_ADD_SCHEME: &str = r#"	err = {{ resource.import_alias }}.AddToScheme(scheme.Scheme)
	Expect(err).NotTo(HaveOccurred())"#;

pub const CRD_RESOURCE_ENTRY: &str = "- bases/{{ resource.qualified_group }}_{{ resource.plural }}.yaml";
pub const CRD_WEBHOOK_PATCH_ENTRY: &str = "#- patches/webhook_in_{{ resource.plural }}.yaml";
pub const CRD_CAINJECTION_PATCH_ENTRY: &str = "#- patches/cainjection_in_{{ resource.plural }}.yaml";

// ── create webhook ──────────────────────────────────────────────────────────

pub const WEBHOOK_GO: &str = r#"{{ boilerplate }}

package {{ resource.version }}

import (
	ctrl "sigs.k8s.io/controller-runtime"
	logf "sigs.k8s.io/controller-runtime/pkg/log"
{%- if defaulting or validating %}
	"k8s.io/apimachinery/pkg/runtime"
	"sigs.k8s.io/controller-runtime/pkg/webhook"
{%- endif %}
)

// log is for logging in this package.
var {{ resource.kind | lower }}log = logf.Log.WithName("{{ resource.kind | lower }}-resource")

func (r *{{ resource.kind }}) SetupWebhookWithManager(mgr ctrl.Manager) error {
	return ctrl.NewWebhookManagedBy(mgr).
		For(r).
		Complete()
}
{%- if defaulting %}

// +kubebuilder:webhook:path=/mutate-{{ resource.qualified_group | replace(".", "-") }}-{{ resource.version }}-{{ resource.kind | lower }},mutating=true,failurePolicy=fail,groups={{ resource.qualified_group }},resources={{ resource.plural }},verbs=create;update,versions={{ resource.version }},name=m{{ resource.kind | lower }}.kb.io

var _ webhook.Defaulter = &{{ resource.kind }}{}

// Default implements webhook.Defaulter so a webhook will be registered for the type
func (r *{{ resource.kind }}) Default() {
	{{ resource.kind | lower }}log.Info("default", "name", r.Name)

	// TODO(user): fill in your defaulting logic.
}
{%- endif %}
{%- if validating %}

// +kubebuilder:webhook:verbs=create;update,path=/validate-{{ resource.qualified_group | replace(".", "-") }}-{{ resource.version }}-{{ resource.kind | lower }},mutating=false,failurePolicy=fail,groups={{ resource.qualified_group }},resources={{ resource.plural }},versions={{ resource.version }},name=v{{ resource.kind | lower }}.kb.io

var _ webhook.Validator = &{{ resource.kind }}{}

// ValidateCreate implements webhook.Validator so a webhook will be registered for the type
func (r *{{ resource.kind }}) ValidateCreate() error {
	{{ resource.kind | lower }}log.Info("validate create", "name", r.Name)

	// TODO(user): fill in your validation logic upon object creation.
	return nil
}

// ValidateUpdate implements webhook.Validator so a webhook will be registered for the type
func (r *{{ resource.kind }}) ValidateUpdate(old runtime.Object) error {
	{{ resource.kind | lower }}log.Info("validate update", "name", r.Name)

	// TODO(user): fill in your validation logic upon object update.
	return nil
}

// ValidateDelete implements webhook.Validator so a webhook will be registered for the type
func (r *{{ resource.kind }}) ValidateDelete() error {
	{{ resource.kind | lower }}log.Info("validate delete", "name", r.Name)

	// TODO(user): fill in your validation logic upon object deletion.
	return nil
}
{%- endif %}
"#;

pub const MAIN_SETUP_WEBHOOK: &str = r#"	if err = (&{{ resource.import_alias }}.{{ resource.kind }}{}).SetupWebhookWithManager(mgr); err != nil {
		setupLog.Error(err, "unable to create webhook", "webhook", "{{ resource.kind }}")
		os.Exit(1)
	}"#;
