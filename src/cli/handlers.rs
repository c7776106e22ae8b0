use super::commands::GenerateArgs;
use crate::builder::Builder;
use crate::cloner::{is_remote, CloneError, CloneParams, Cloner, GitCloner};
use crate::config::{parse_rule_list, AutopipeConfig};
use crate::error::GenerateError;
use crate::fs::ChrootFileSystem;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, error, info};

/// A directory to inspect. Cloned workspaces are removed on drop.
enum Workspace {
    Local(PathBuf),
    Cloned(TempDir),
}

impl Workspace {
    fn path(&self) -> &Path {
        match self {
            Workspace::Local(path) => path,
            Workspace::Cloned(dir) => dir.path(),
        }
    }
}

/// CLI flags layered over the environment configuration.
pub fn resolve_config(args: &GenerateArgs) -> AutopipeConfig {
    let mut config = AutopipeConfig::default();
    if let Some(runtime) = args.runtime {
        config = config.with_runtime(runtime.into());
    }
    if let Some(rules) = &args.rules {
        config = config.with_rules(parse_rule_list(rules));
    }
    if let Some(depth) = args.depth {
        config.clone_depth = depth;
    }
    config
}

pub async fn handle_generate(args: &GenerateArgs) -> i32 {
    let config = resolve_config(args);
    debug!("{}", config);

    let cloner = GitCloner::new(config.clone_depth);
    let yaml = match generate_pipeline(args, &config, &cloner).await {
        Ok(yaml) => yaml,
        Err(GenerateError::Config(e)) => {
            error!("Configuration error: {}", e);
            eprintln!("\nPlease check your environment variables and command-line arguments.");
            return 1;
        }
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    match &args.output {
        Some(path) => {
            if let Err(source) = std::fs::write(path, &yaml) {
                let e = GenerateError::Output {
                    path: path.clone(),
                    source,
                };
                error!("{}", e);
                return 1;
            }
            info!(path = %path.display(), "Pipeline written");
        }
        None => print!("{}", yaml),
    }

    0
}

/// Validates the configuration, resolves the workspace (cloning when the
/// source is remote), runs the configured rules and returns the YAML document.
pub async fn generate_pipeline<C: Cloner>(
    args: &GenerateArgs,
    config: &AutopipeConfig,
    cloner: &C,
) -> Result<String, GenerateError> {
    config.validate()?;
    let builder = Builder::from_config(config)?;
    let source = args.source.as_deref().unwrap_or(".");

    let workspace = open_workspace(source, args, cloner).await?;
    let fs = ChrootFileSystem::new(workspace.path())?;
    info!(
        workspace = %fs.base().display(),
        rules = builder.rules().len(),
        runtime = %builder.runtime(),
        "Generating pipeline"
    );

    builder.generate(&fs)
}

async fn open_workspace<C: Cloner>(
    source: &str,
    args: &GenerateArgs,
    cloner: &C,
) -> Result<Workspace, GenerateError> {
    if !is_remote(source) {
        return Ok(Workspace::Local(PathBuf::from(source)));
    }

    let dir = TempDir::new().map_err(CloneError::from)?;
    let mut params = CloneParams::new(source, dir.path())
        .with_credentials(args.username.clone(), args.password.clone());
    if let Some(reference) = &args.reference {
        params = params.with_reference(reference);
    }
    if let Some(sha) = &args.sha {
        params = params.with_sha(sha);
    }

    cloner.clone_repo(&params).await?;
    Ok(Workspace::Cloned(dir))
}
