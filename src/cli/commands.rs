use crate::rules::ExecutionRuntime;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rule-based CI pipeline generator
#[derive(Parser, Debug)]
#[command(
    name = "autopipe",
    about = "Generate a CI pipeline by inspecting a repository",
    version,
    long_about = "autopipe looks for conventional marker files (go.mod, package.json, \
                  Cargo.toml, Gemfile, Dockerfile, ...) and writes a pipeline with the \
                  build and test steps each detected ecosystem needs."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a pipeline for a repository",
        long_about = "Inspects a local directory or a remote git repository and prints the \
                      generated pipeline as YAML.\n\n\
                      Examples:\n  \
                      autopipe generate\n  \
                      autopipe generate /path/to/repo\n  \
                      autopipe generate https://github.com/acme/widgets.git --ref develop\n  \
                      autopipe generate --runtime host --rules go,docker -o .pipeline.yml"
    )]
    Generate(GenerateArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "PATH_OR_URL",
        help = "Local path or git URL (defaults to current directory)"
    )]
    pub source: Option<String>,

    #[arg(short = 'r', long, value_enum, help = "Where the steps will run")]
    pub runtime: Option<RuntimeArg>,

    #[arg(
        long,
        value_name = "IDS",
        help = "Comma-separated rule ids to run, in order (default: all)"
    )]
    pub rules: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(long = "ref", value_name = "REF", help = "Branch, tag or ref to clone")]
    pub reference: Option<String>,

    #[arg(long, value_name = "SHA", help = "Commit to check out after cloning")]
    pub sha: Option<String>,

    #[arg(long, value_name = "N", help = "Clone depth (default from AUTOPIPE_CLONE_DEPTH)")]
    pub depth: Option<u32>,

    #[arg(long, env = "AUTOPIPE_USERNAME", help = "Username for cloning over https")]
    pub username: Option<String>,

    #[arg(
        long,
        env = "AUTOPIPE_PASSWORD",
        hide_env_values = true,
        help = "Password or token for cloning over https"
    )]
    pub password: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeArg {
    Docker,
    Kubernetes,
    Host,
}

impl From<RuntimeArg> for ExecutionRuntime {
    fn from(arg: RuntimeArg) -> Self {
        match arg {
            RuntimeArg::Docker => ExecutionRuntime::Docker,
            RuntimeArg::Kubernetes => ExecutionRuntime::Kubernetes,
            RuntimeArg::Host => ExecutionRuntime::Host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_generate_args() {
        let args = CliArgs::parse_from(["autopipe", "generate"]);
        let Commands::Generate(generate) = args.command;
        assert!(generate.source.is_none());
        assert!(generate.runtime.is_none());
        assert!(generate.rules.is_none());
        assert!(generate.output.is_none());
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_generate_with_options() {
        let args = CliArgs::parse_from([
            "autopipe",
            "generate",
            "https://github.com/acme/widgets.git",
            "--runtime",
            "host",
            "--rules",
            "go,docker",
            "--ref",
            "develop",
            "-o",
            "out.yml",
            "-v",
        ]);
        let Commands::Generate(generate) = args.command;
        assert_eq!(
            generate.source.as_deref(),
            Some("https://github.com/acme/widgets.git")
        );
        assert_eq!(generate.runtime, Some(RuntimeArg::Host));
        assert_eq!(generate.rules.as_deref(), Some("go,docker"));
        assert_eq!(generate.reference.as_deref(), Some("develop"));
        assert_eq!(generate.output, Some(PathBuf::from("out.yml")));
        assert!(args.verbose);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = CliArgs::try_parse_from(["autopipe", "generate", "-q", "-v"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_runtime_rejected() {
        let result = CliArgs::try_parse_from(["autopipe", "generate", "--runtime", "vm"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_runtime_arg_conversion() {
        assert_eq!(ExecutionRuntime::from(RuntimeArg::Kubernetes), ExecutionRuntime::Kubernetes);
        assert_eq!(ExecutionRuntime::from(RuntimeArg::Host), ExecutionRuntime::Host);
    }
}
