//! Pipeline generation over on-disk fixture repositories

use autopipe::{
    Builder, ChrootFileSystem, ExecutionRuntime, RuleId, RuleSet, Schema, StepKind,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use yare::parameterized;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn build_fixture(name: &str, runtime: ExecutionRuntime) -> Schema {
    let fs = ChrootFileSystem::new(fixture_path(name)).expect("fixture should open");
    Builder::new().with_runtime(runtime).build(&fs)
}

fn step_names(schema: &Schema) -> Vec<String> {
    schema.pipeline.stages[0]
        .steps
        .iter()
        .map(|s| s.name().to_string())
        .collect()
}

#[parameterized(
    go_mod = { "go-mod", &["go_build", "go_test"] },
    go_library = { "go-library", &["go_build", "go_test"] },
    node_npm = { "node-npm", &["npm_install", "npm_test", "npm_lint", "npm_dist"] },
    node_yarn = { "node-yarn", &["yarn_install", "yarn_test"] },
    node_malformed = { "node-malformed", &["go_build", "go_test", "npm_install"] },
    python_pip = { "python-pip", &["pip_install", "pytest", "flake8"] },
    python_poetry = { "python-poetry", &["poetry_install", "pytest"] },
    rails = { "rails", &["bundle_install", "bundle_db_create", "bundle_db_migrate", "bundle_rspec"] },
    ruby_rake = { "ruby-rake", &["bundle_install", "rake_test"] },
    rust_cargo = { "rust-cargo", &["cargo_build", "cargo_test"] },
    rust_workspace = { "rust-workspace", &["cargo_build", "cargo_test", "cargo_clippy"] },
    swift_package = { "swift-package", &["swift_build", "swift_test"] },
    docker = { "docker", &["docker_build"] },
    docker_services = { "docker-services", &["docker_build"] },
    polyglot = { "polyglot", &["go_build", "go_test", "npm_install", "npm_test", "docker_build"] },
)]
fn test_fixture_steps(fixture: &str, expected: &[&str]) {
    let schema = build_fixture(fixture, ExecutionRuntime::Docker);
    assert_eq!(step_names(&schema), expected);
}

#[test]
fn test_go_main_package_commands() {
    let schema = build_fixture("go-mod", ExecutionRuntime::Docker);
    let steps = &schema.pipeline.stages[0].steps;

    assert_eq!(steps[0].commands(), ["go build".to_string()]);
    assert_eq!(steps[1].commands(), ["go test -v ./...".to_string()]);
    assert!(steps.iter().all(|s| s.image() == Some("golang:1")));
}

#[test]
fn test_go_library_installs_packages() {
    let schema = build_fixture("go-library", ExecutionRuntime::Docker);
    assert_eq!(
        schema.pipeline.stages[0].steps[0].commands(),
        ["go install ./...".to_string()]
    );
}

#[test]
fn test_rust_workspace_flag() {
    let schema = build_fixture("rust-workspace", ExecutionRuntime::Docker);
    let commands: Vec<&str> = schema.pipeline.stages[0]
        .steps
        .iter()
        .flat_map(|s| s.commands().iter().map(String::as_str))
        .collect();

    assert_eq!(
        commands,
        vec![
            "cargo build --workspace",
            "cargo test --workspace",
            "cargo clippy --workspace -- -D warnings"
        ]
    );
}

#[test]
fn test_poetry_wraps_tools() {
    let schema = build_fixture("python-poetry", ExecutionRuntime::Docker);
    let pytest = &schema.pipeline.stages[0].steps[1];
    assert_eq!(
        pytest.commands(),
        ["pip install poetry".to_string(), "poetry run pytest".to_string()]
    );
}

#[test]
fn test_host_runtime_drops_images() {
    let schema = build_fixture("polyglot", ExecutionRuntime::Host);
    for step in &schema.pipeline.stages[0].steps {
        assert_eq!(step.image(), None, "step {} should not carry an image", step.name());
    }
}

#[test]
fn test_docker_plugin_params() {
    let schema = build_fixture("docker", ExecutionRuntime::Docker);
    let step = &schema.pipeline.stages[0].steps[0];

    match step.kind() {
        StepKind::Plugin(plugin) => {
            assert_eq!(plugin.uses, "docker");
            assert_eq!(plugin.with["repo"], serde_yaml::Value::from("hello/world"));
            assert_eq!(plugin.with["tags"], serde_yaml::Value::from("latest"));
            assert_eq!(plugin.with["dry_run"], serde_yaml::Value::from(true));
        }
        StepKind::Run(_) => panic!("docker_build should be a plugin step"),
    }
}

#[test]
fn test_docker_service_directory() {
    let schema = build_fixture("docker-services", ExecutionRuntime::Docker);
    let step = &schema.pipeline.stages[0].steps[0];

    match step.kind() {
        StepKind::Plugin(plugin) => {
            assert_eq!(plugin.with["dockerfile"], serde_yaml::Value::from("api/Dockerfile"));
            assert_eq!(plugin.with["context"], serde_yaml::Value::from("api"));
        }
        StepKind::Run(_) => panic!("docker_build should be a plugin step"),
    }
}

#[test]
fn test_docker_repo_from_git_origin() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Dockerfile"), "FROM scratch\n").unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(
        dir.path().join(".git/config"),
        "[core]\n\tbare = false\n[remote \"origin\"]\n\turl = git@github.com:acme/widgets.git\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n",
    )
    .unwrap();

    let fs = ChrootFileSystem::new(dir.path()).unwrap();
    let yaml = Builder::new().generate(&fs).unwrap();
    assert!(yaml.contains("repo: acme/widgets"));
}

#[test]
fn test_empty_workspace_falls_back() {
    let dir = TempDir::new().unwrap();
    let fs = ChrootFileSystem::new(dir.path()).unwrap();

    let schema = Builder::new().build(&fs);
    let steps = &schema.pipeline.stages[0].steps;
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].name(), "echo");
    assert_eq!(steps[0].commands(), ["echo hello world".to_string()]);
    assert_eq!(steps[0].image(), Some("alpine:3"));
}

#[test]
fn test_output_is_deterministic() {
    let fs = ChrootFileSystem::new(fixture_path("polyglot")).unwrap();
    let builder = Builder::new();

    let first = builder.generate(&fs).unwrap();
    let second = builder.generate(&fs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_yaml_document_header() {
    let fs = ChrootFileSystem::new(fixture_path("go-mod")).unwrap();
    let yaml = Builder::new().generate(&fs).unwrap();

    assert!(yaml.starts_with("version: 1\nkind: pipeline\n"));
    assert!(yaml.contains("name: build"));
    assert!(yaml.contains("os: linux"));
    assert!(yaml.contains("arch: amd64"));

    let parsed = Schema::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.pipeline.stages[0].steps.len(), 2);
}

#[test]
fn test_rule_selection_limits_output() {
    let fs = ChrootFileSystem::new(fixture_path("polyglot")).unwrap();
    let rules = RuleSet::from_names(&["docker", "go"]).unwrap();
    let schema = Builder::new().with_rules(rules).build(&fs);

    assert_eq!(step_names(&schema), vec!["docker_build", "go_build", "go_test"]);
    assert_eq!(
        Builder::new().rules().ids(),
        RuleId::all_variants().to_vec()
    );
}

#[test]
fn test_missing_workspace_is_error() {
    assert!(ChrootFileSystem::new(fixture_path("does-not-exist")).is_err());
}
