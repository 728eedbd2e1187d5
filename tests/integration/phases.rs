use helmplan_cli::apps::{AppConfig, Phase};
use helmplan_cli::compiler::{
    CompileOptions, EMPTY_RELEASE_CHART, EMPTY_RELEASE_NAME, EMPTY_RELEASE_REPOSITORY, PlanCompiler,
    helmfile_path,
};
use helmplan_cli::config::{DEFAULT_CHART_REPOSITORY, Settings};
use helmplan_cli::core::HelmplanError;
use helmplan_cli::helmfile::HelmState;
use helmplan_cli::test_utils::{
    EnvFixture, StaticHelmRepos, StaticNamespaces, StaticVersionStream, init_test_logging,
};
use helmplan_cli::versionstream::AppDefaults;

use crate::compile_yaml;

const APPS_YAML: &str = r#"
defaultNamespace: jx
apps:
- name: stable/velero
  phase: system
- name: stable/cert-manager
  phase: system
- name: jenkins-x/lighthouse
  phase: apps
- name: jenkins-x/tekton
"#;

fn stream() -> StaticVersionStream {
    StaticVersionStream::new()
        .with_prefix("stable", &["https://stable.example.com"])
        .with_prefix("jenkins-x", &[DEFAULT_CHART_REPOSITORY])
}

/// Each phase is written to its own helmfile and references only its own releases
#[tokio::test]
async fn test_phase_isolation() {
    init_test_logging(None);
    let env = EnvFixture::new().unwrap().with_apps(APPS_YAML).unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let config = AppConfig::load(env.path()).unwrap();
    let settings = Settings::default();
    let helm = StaticHelmRepos::default();
    let kube = StaticNamespaces::new(["jx"], "jx");
    let stream = stream();

    let written = PlanCompiler::new(&settings, &stream, &helm, &kube, &options)
        .generate(&config)
        .await
        .unwrap();
    assert_eq!(
        written,
        vec![helmfile_path(env.path(), Phase::System), helmfile_path(env.path(), Phase::Apps)]
    );

    let read = |phase: Phase| -> HelmState {
        serde_yaml::from_str(&env.read(&format!("{phase}/helmfile.yaml")).unwrap()).unwrap()
    };
    let system = read(Phase::System);
    let apps = read(Phase::Apps);

    let names = |state: &HelmState| state.releases.iter().map(|r| r.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&system), vec!["velero", "cert-manager"]);
    assert_eq!(names(&apps), vec!["lighthouse", "tekton"]);

    assert_eq!(system.repositories.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["stable"]);
    assert_eq!(apps.repositories.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(), vec!["jenkins-x"]);
    assert_eq!(system.bases, vec!["../environments.yaml"]);
}

/// An empty phase still gets a release and the repository it needs
#[tokio::test]
async fn test_empty_phase_placeholder() {
    let env = EnvFixture::new().unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let kube = StaticNamespaces::new(["jx"], "jx");

    let plans = compile_yaml("defaultNamespace: jx\napps:\n- name: stable/velero\n", &stream(), &kube, &options)
        .await
        .unwrap();
    let system = &plans[&Phase::System];

    assert_eq!(system.releases.len(), 1);
    assert_eq!(system.releases[0].name, EMPTY_RELEASE_NAME);
    assert_eq!(system.releases[0].chart, EMPTY_RELEASE_CHART);
    assert_eq!(system.releases[0].namespace, "jx");
    assert_eq!(system.repositories.len(), 1);
    assert_eq!(system.repositories[0].name, EMPTY_RELEASE_REPOSITORY);
    assert_eq!(system.repositories[0].url, DEFAULT_CHART_REPOSITORY);
}

/// Version stream defaults move an app with no phase and no namespace
#[tokio::test]
async fn test_stream_defaults_fill_phase_and_namespace() {
    let env = EnvFixture::new().unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let kube = StaticNamespaces::new(["jx", "velero", "custom"], "jx");
    let stream = stream().with_defaults(
        "stable/velero",
        AppDefaults {
            namespace: Some("velero".to_string()),
            phase: Some(Phase::System),
        },
        &[],
    );
    let yaml = r#"
apps:
- name: stable/velero
- name: stable/velero
  namespace: custom
  phase: apps
"#;

    let plans = compile_yaml(yaml, &stream, &kube, &options).await.unwrap();

    let system = &plans[&Phase::System].releases[0];
    assert_eq!((system.name.as_str(), system.namespace.as_str()), ("velero", "velero"));

    let apps = &plans[&Phase::Apps].releases[0];
    assert_eq!((apps.name.as_str(), apps.namespace.as_str()), ("velero", "custom"));
}

/// An unknown phase is rejected when jx-apps.yml is loaded
#[test]
fn test_invalid_phase_rejected_at_load() {
    let env = EnvFixture::new()
        .unwrap()
        .with_apps("apps:\n- name: stable/velero\n  phase: bootstrap\n")
        .unwrap();

    let err = AppConfig::load(env.path()).unwrap_err();
    match err.downcast_ref::<HelmplanError>() {
        Some(HelmplanError::InvalidPhase {
            app,
            phase,
        }) => {
            assert_eq!(app, "stable/velero");
            assert_eq!(phase, "bootstrap");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Pinned versions are emitted, explicit versions win
#[tokio::test]
async fn test_versions_resolved() {
    let env = EnvFixture::new().unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let kube = StaticNamespaces::new(["jx"], "jx");
    let stream = stream().with_version("stable/velero", "2.7.4").with_version("stable/nginx", "1.0.0");
    let yaml = r#"
defaultNamespace: jx
apps:
- name: stable/velero
- name: stable/nginx
  version: 1.2.3
- name: stable/unpinned
"#;

    let plans = compile_yaml(yaml, &stream, &kube, &options).await.unwrap();
    let versions: Vec<_> =
        plans[&Phase::Apps].releases.iter().map(|r| r.version.as_deref()).collect();
    assert_eq!(versions, vec![Some("2.7.4"), Some("1.2.3"), None]);
}
