//! Node.js packages (npm, Yarn, pnpm)

use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;
use serde::Deserialize;
use std::collections::BTreeMap;

const IMAGE: &str = "node";

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default, rename = "packageManager")]
    package_manager: Option<String>,
    #[serde(default)]
    scripts: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// The `packageManager` field wins over lock files.
    fn detect(ctx: &RuleContext, manifest: Option<&PackageJson>) -> Self {
        let declared = manifest.and_then(|m| m.package_manager.as_deref());
        match declared {
            Some(pm) if pm.starts_with("pnpm") => return PackageManager::Pnpm,
            Some(pm) if pm.starts_with("yarn") => return PackageManager::Yarn,
            Some(pm) if pm.starts_with("npm") => return PackageManager::Npm,
            _ => {}
        }

        if ctx.exists("pnpm-lock.yaml") {
            PackageManager::Pnpm
        } else if ctx.exists("yarn.lock") {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "corepack pnpm",
        }
    }

    fn install(&self, ctx: &RuleContext) -> String {
        match self {
            PackageManager::Npm if ctx.exists("package-lock.json") => "npm ci".to_string(),
            PackageManager::Npm => "npm install".to_string(),
            PackageManager::Yarn if ctx.exists("yarn.lock") => {
                "yarn install --frozen-lockfile".to_string()
            }
            PackageManager::Pnpm if ctx.exists("pnpm-lock.yaml") => {
                "corepack pnpm install --frozen-lockfile".to_string()
            }
            _ => format!("{} install", self.program()),
        }
    }

    fn run_script(&self, script: &str) -> String {
        format!("{} run {}", self.program(), script)
    }
}

pub struct NodeRule;

impl Rule for NodeRule {
    fn id(&self) -> RuleId {
        RuleId::Node
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        if !ctx.exists("package.json") {
            return Ok(Flow::skip());
        }

        let image = ctx.image(IMAGE);
        let manifest: Option<PackageJson> = ctx.read_json("package.json");
        let manager = PackageManager::detect(ctx, manifest.as_ref());
        let prefix = manager.prefix();

        let mut steps = vec![Step::run(
            format!("{}_install", prefix),
            manager.install(ctx),
            image,
        )];

        // an unparseable manifest still gets dependencies installed
        let Some(manifest) = manifest else {
            return Ok(Flow::Continue(steps));
        };

        let mut script_step = |script: &str, suffix: &str| {
            if manifest.scripts.contains_key(script) {
                steps.push(Step::run(
                    format!("{}_{}", prefix, suffix),
                    manager.run_script(script),
                    image,
                ));
            }
        };

        script_step("test", "test");
        script_step("lint", "lint");
        script_step("e2e", "e2e");
        // dockerized e2e suites need a docker daemon, which only the host provides
        if !ctx.runtime().is_container() {
            script_step("e2e:docker", "e2e_docker");
        }
        script_step("dist", "dist");

        Ok(Flow::Continue(steps))
    }
}
