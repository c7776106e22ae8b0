//! Container image builds

use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;
use regex::Regex;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

const DEFAULT_REPO: &str = "hello/world";
const DOCKERFILE: &str = "Dockerfile";
const SUBDIR_DOCKERFILE: &str = "*/Dockerfile";

fn remote_repo_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[:/]([^/:]+)/([^/]+?)(?:\.git)?/?$").unwrap())
}

/// `url` of the `origin` remote in a git config file.
fn origin_url(git_config: &str) -> Option<String> {
    let mut in_origin = false;
    for line in git_config.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_origin = line == r#"[remote "origin"]"#;
            continue;
        }
        if !in_origin {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            if key.trim() == "url" {
                return Some(value.trim().to_string());
            }
        }
    }
    None
}

/// `owner/name` from a remote URL.
fn repo_name(url: &str) -> Option<String> {
    let captures = remote_repo_pattern().captures(url)?;
    Some(format!("{}/{}", &captures[1], &captures[2]))
}

pub struct DockerRule;

impl DockerRule {
    fn repository(ctx: &RuleContext) -> String {
        ctx.read(".git/config")
            .and_then(|config| origin_url(&config))
            .and_then(|url| repo_name(&url))
            .unwrap_or_else(|| DEFAULT_REPO.to_string())
    }
}

impl Rule for DockerRule {
    fn id(&self) -> RuleId {
        RuleId::Docker
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        let mut with = BTreeMap::new();
        if !ctx.exists(DOCKERFILE) {
            // first service directory, in path order
            let Some(dockerfile) = ctx.glob(SUBDIR_DOCKERFILE).into_iter().next() else {
                return Ok(Flow::skip());
            };
            let context = dockerfile.parent().unwrap_or(Path::new("."));
            with.insert("context".to_string(), Value::from(context.to_string_lossy().as_ref()));
            with.insert(
                "dockerfile".to_string(),
                Value::from(dockerfile.to_string_lossy().as_ref()),
            );
        }

        with.insert("dry_run".to_string(), Value::from(true));
        with.insert("repo".to_string(), Value::from(Self::repository(ctx)));
        with.insert("tags".to_string(), Value::from("latest"));

        Ok(Flow::Continue(vec![Step::plugin("docker_build", "docker", with)]))
    }
}
