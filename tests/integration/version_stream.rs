use helmplan_cli::apps::{AppConfig, Phase};
use helmplan_cli::compiler::{CompileOptions, PlanCompiler};
use helmplan_cli::config::Settings;
use helmplan_cli::core::HelmplanError;
use helmplan_cli::test_utils::{EnvFixture, StaticHelmRepos, StaticNamespaces, VersionStreamFixture};
use helmplan_cli::versionstream::VersionStreamDir;

const STABLE_URL: &str = "https://kubernetes-charts.storage.googleapis.com";

/// Compile against a checked-out version stream directory
#[tokio::test]
async fn test_compile_with_stream_directory() {
    let fixture = VersionStreamFixture::new()
        .unwrap()
        .with_prefix("stable", &[STABLE_URL])
        .unwrap()
        .with_prefix("jenkins-x", &["http://chartmuseum.jenkins-x.io"])
        .unwrap()
        .with_version("stable/velero", "2.7.4")
        .unwrap()
        .with_version("jenkins-x/lighthouse", "0.0.633")
        .unwrap()
        .with_defaults("stable/velero", "namespace: velero\nphase: system\n")
        .unwrap()
        .with_app_file("stable/velero", "values.yaml")
        .unwrap();
    let env = EnvFixture::new()
        .unwrap()
        .with_apps("defaultNamespace: jx\napps:\n- name: stable/velero\n- name: jenkins-x/lighthouse\n")
        .unwrap();

    let stream = Some(VersionStreamDir::new(fixture.path()));
    let config = AppConfig::load(env.path()).unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let settings = Settings::default();
    let helm = StaticHelmRepos::default();
    let kube = StaticNamespaces::new(["jx"], "jx");

    let plans = PlanCompiler::new(&settings, &stream, &helm, &kube, &options).compile(&config).await.unwrap();

    let system = &plans[&Phase::System];
    let velero = system.releases.iter().find(|r| r.name == "velero").unwrap();
    assert_eq!(velero.chart, "stable/velero");
    assert_eq!(velero.namespace, "velero");
    assert_eq!(velero.version.as_deref(), Some("2.7.4"));
    assert_eq!(
        velero.values,
        vec![fixture.path().join("apps/stable/velero/values.yaml").display().to_string()]
    );
    assert_eq!(velero.needs, vec!["jx/namespace-velero"]);
    assert!(system.releases.iter().any(|r| r.name == "namespace-velero"));

    let apps = &plans[&Phase::Apps];
    assert_eq!(apps.releases.len(), 1);
    assert_eq!(apps.releases[0].chart, "jenkins-x/lighthouse");
    assert_eq!(apps.releases[0].version.as_deref(), Some("0.0.633"));
}

/// Without a version stream nothing is pinned and no prefixes are known
#[tokio::test]
async fn test_compile_without_stream() {
    let env = EnvFixture::new()
        .unwrap()
        .with_apps("defaultNamespace: jx\napps:\n- name: velero\n  repository: https://vmware-tanzu.github.io/helm-charts\n")
        .unwrap();

    let stream: Option<VersionStreamDir> = None;
    let config = AppConfig::load(env.path()).unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let settings = Settings::default();
    let helm = StaticHelmRepos::default().with_repo("vmware-tanzu", "https://vmware-tanzu.github.io/helm-charts");
    let kube = StaticNamespaces::new(["jx"], "jx");

    let plans = PlanCompiler::new(&settings, &stream, &helm, &kube, &options).compile(&config).await.unwrap();
    let release = &plans[&Phase::Apps].releases[0];
    assert_eq!(release.chart, "vmware-tanzu/velero");
    assert_eq!(release.version, None);
}

/// A broken version file names the file in the error chain
#[tokio::test]
async fn test_malformed_version_file_fails() {
    let fixture = VersionStreamFixture::new()
        .unwrap()
        .with_prefix("stable", &[STABLE_URL])
        .unwrap()
        .with_version("stable/velero", "[unclosed")
        .unwrap();
    let env = EnvFixture::new()
        .unwrap()
        .with_apps("defaultNamespace: jx\napps:\n- name: stable/velero\n")
        .unwrap();

    let stream = Some(VersionStreamDir::new(fixture.path()));
    let config = AppConfig::load(env.path()).unwrap();
    let options = CompileOptions::new(env.path(), env.path());
    let settings = Settings::default();
    let helm = StaticHelmRepos::default();
    let kube = StaticNamespaces::new(["jx"], "jx");

    let err = PlanCompiler::new(&settings, &stream, &helm, &kube, &options).compile(&config).await.unwrap_err();
    assert!(format!("{err:#}").contains("velero.yml"));
    assert!(!env.path().join("apps/helmfile.yaml").exists());
}

/// A namespace default that is really a path is rejected before anything is written
#[tokio::test]
async fn test_path_like_stream_namespace_rejected() {
    let fixture = VersionStreamFixture::new()
        .unwrap()
        .with_prefix("stable", &[STABLE_URL])
        .unwrap()
        .with_defaults("stable/velero", "namespace: ../../../escaped\nphase: system\n")
        .unwrap();
    let env = EnvFixture::new().unwrap().with_apps("apps:\n- name: stable/velero\n").unwrap();
    let output_dir = env.path().join("out");

    let stream = Some(VersionStreamDir::new(fixture.path()));
    let config = AppConfig::load(env.path()).unwrap();
    let options = CompileOptions::new(env.path(), &output_dir);
    let settings = Settings::default();
    let helm = StaticHelmRepos::default();
    let kube = StaticNamespaces::new(["jx"], "jx");

    let err = PlanCompiler::new(&settings, &stream, &helm, &kube, &options).generate(&config).await.unwrap_err();
    assert!(
        err.chain().any(|e| matches!(
            e.downcast_ref::<HelmplanError>(),
            Some(HelmplanError::InvalidNamespace { .. })
        )),
        "{err:#}"
    );
    assert!(!output_dir.exists());
    assert!(!env.path().join("escaped").exists());
}
