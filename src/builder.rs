use crate::config::AutopipeConfig;
use crate::error::GenerateError;
use crate::fs::FileSystem;
use crate::pipeline::{Pipeline, Schema, Step};
use crate::rules::{ExecutionRuntime, RuleContext, RuleSet};
use std::time::Instant;
use tracing::{debug, info, warn};

const FALLBACK_STEP_NAME: &str = "echo";
const FALLBACK_COMMAND: &str = "echo hello world";
const FALLBACK_IMAGE: &str = "alpine:3";

/// Runs an ordered rule chain over a workspace and assembles the pipeline.
#[derive(Debug, Clone)]
pub struct Builder {
    rules: RuleSet,
    runtime: ExecutionRuntime,
}

impl Builder {
    /// Default rule preset on the docker runtime.
    pub fn new() -> Self {
        Self {
            rules: RuleSet::with_defaults(),
            runtime: ExecutionRuntime::default(),
        }
    }

    pub fn from_config(config: &AutopipeConfig) -> Result<Self, GenerateError> {
        let rules = match &config.rules {
            Some(names) => RuleSet::from_names(names)?,
            None => RuleSet::with_defaults(),
        };
        Ok(Self {
            rules,
            runtime: config.runtime,
        })
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_runtime(mut self, runtime: ExecutionRuntime) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn runtime(&self) -> ExecutionRuntime {
        self.runtime
    }

    /// Builds the pipeline document. Never fails: a rule error is logged and
    /// the chain moves on, and an empty result gets the fallback step.
    pub fn build(&self, fs: &dyn FileSystem) -> Schema {
        let start = Instant::now();
        let mut pipeline = Pipeline::skeleton();

        for rule in self.rules.iter() {
            let id = rule.id();
            let result = {
                let ctx = RuleContext::new(fs, self.runtime, &pipeline.stages[0]);
                rule.apply(&ctx)
            };

            match result {
                Ok(flow) => {
                    let stop = flow.is_stop();
                    let steps = flow.into_steps();
                    debug!(rule = %id, steps = steps.len(), stop, "Rule applied");
                    pipeline.stages[0].steps.extend(steps);
                    if stop {
                        debug!(rule = %id, "Rule chain stopped");
                        break;
                    }
                }
                Err(e) => {
                    warn!(rule = %id, error = %e, "Rule failed, continuing");
                }
            }
        }

        let stage = &mut pipeline.stages[0];
        if stage.steps.is_empty() {
            info!("No ecosystem detected, using fallback step");
            stage.push(self.fallback_step());
        }

        info!(
            steps = stage.steps.len(),
            runtime = %self.runtime,
            duration_ms = start.elapsed().as_millis() as u64,
            "Pipeline assembled"
        );

        Schema::new(pipeline)
    }

    /// Builds the pipeline and serializes it to YAML.
    pub fn generate(&self, fs: &dyn FileSystem) -> Result<String, GenerateError> {
        Ok(self.build(fs).to_yaml()?)
    }

    fn fallback_step(&self) -> Step {
        let image = self.runtime.is_container().then_some(FALLBACK_IMAGE);
        Step::run(FALLBACK_STEP_NAME, FALLBACK_COMMAND, image)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper: default rules, given runtime.
pub fn generate(fs: &dyn FileSystem, runtime: ExecutionRuntime) -> Result<String, GenerateError> {
    Builder::new().with_runtime(runtime).generate(fs)
}
