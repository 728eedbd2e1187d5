use helmplan_cli::apps::Phase;
use helmplan_cli::compiler::CompileOptions;
use helmplan_cli::test_utils::{EnvFixture, StaticNamespaces, StaticVersionStream};
use helmplan_cli::versionstream::AppDefaults;

use crate::compile_yaml;

/// Version stream defaults, then CLI values, then local overrides
#[tokio::test]
async fn test_values_precedence() {
    let env = EnvFixture::new().unwrap().with_local_values(Phase::Apps, "foo", "values.yaml").unwrap();
    let options = CompileOptions::new(env.path(), env.path()).with_values(vec!["b.yaml".to_string()]);
    let stream = StaticVersionStream::new().with_defaults("foo", AppDefaults::default(), &["a.yaml"]);
    let kube = StaticNamespaces::new(["jx"], "jx");

    let plans = compile_yaml("defaultNamespace: jx\napps:\n- name: foo\n", &stream, &kube, &options)
        .await
        .unwrap();

    assert_eq!(plans[&Phase::Apps].releases[0].values, vec!["a.yaml", "b.yaml", "foo/values.yaml"]);
}

/// Explicit valueFiles come before version stream files, and local
/// overrides are found under the phase the app was placed in
#[tokio::test]
async fn test_explicit_values_and_system_overrides() {
    let env = EnvFixture::new()
        .unwrap()
        .with_local_values(Phase::System, "velero", "values.yaml.gotmpl")
        .unwrap()
        .with_local_values(Phase::System, "velero", "values.yaml")
        .unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let stream = StaticVersionStream::new()
        .with_prefix("stable", &["https://stable.example.com"])
        .with_defaults("stable/velero", AppDefaults::default(), &["/versions/velero.yaml"]);
    let kube = StaticNamespaces::new(["velero"], "jx");
    let yaml = r#"
apps:
- name: stable/velero
  namespace: velero
  phase: system
  valueFiles:
  - mine.yaml
"#;

    let plans = compile_yaml(yaml, &stream, &kube, &options).await.unwrap();
    assert_eq!(
        plans[&Phase::System].releases[0].values,
        vec!["mine.yaml", "/versions/velero.yaml", "velero/values.yaml", "velero/values.yaml.gotmpl"]
    );
}

/// Local overrides that do not exist are not listed
#[tokio::test]
async fn test_missing_local_overrides_skipped() {
    let env = EnvFixture::new()
        .unwrap()
        .with_local_values(Phase::System, "foo", "values.yaml")
        .unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let kube = StaticNamespaces::new(["jx"], "jx");

    let plans = compile_yaml("defaultNamespace: jx\napps:\n- name: foo\n", &StaticVersionStream::new(), &kube, &options)
        .await
        .unwrap();
    assert!(plans[&Phase::Apps].releases[0].values.is_empty());
}
