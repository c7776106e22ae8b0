//! Python projects (pip, Poetry, Pipenv)

use super::{Flow, Rule, RuleContext, RuleId, RuleResult};
use crate::pipeline::Step;
use regex::Regex;
use std::sync::OnceLock;

const IMAGE: &str = "python:3";

const MARKERS: &[&str] = &["requirements.txt", "setup.py", "pyproject.toml", "Pipfile"];

/// Files whose text is scanned for tool names.
const DEPENDENCY_FILES: &[&str] = &[
    "requirements.txt",
    "requirements-dev.txt",
    "pyproject.toml",
    "Pipfile",
    "setup.cfg",
];

/// `pytest` itself; plugin packages such as `pytest-cov` do not count.
fn pytest_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)\bpytest(?:[^-\w]|$)").unwrap())
}

fn flake8_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bflake8\b").unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Installer {
    Pip,
    Poetry,
    Pipenv,
}

impl Installer {
    fn detect(ctx: &RuleContext) -> Self {
        let poetry = ctx
            .read_toml::<toml::Value>("pyproject.toml")
            .map(|doc| doc.get("tool").and_then(|t| t.get("poetry")).is_some())
            .unwrap_or(false);

        if poetry {
            Installer::Poetry
        } else if ctx.exists("Pipfile") {
            Installer::Pipenv
        } else {
            Installer::Pip
        }
    }

    /// Commands every step needs before the tool itself is usable.
    fn setup(&self) -> Option<&'static str> {
        match self {
            Installer::Pip => None,
            Installer::Poetry => Some("pip install poetry"),
            Installer::Pipenv => Some("pip install pipenv"),
        }
    }

    fn wrap(&self, command: &str) -> String {
        match self {
            Installer::Pip => command.to_string(),
            Installer::Poetry => format!("poetry run {}", command),
            Installer::Pipenv => format!("pipenv run {}", command),
        }
    }

    fn install_step(&self, ctx: &RuleContext, image: Option<&str>) -> Step {
        match self {
            Installer::Poetry => Step::run_all(
                "poetry_install",
                vec!["pip install poetry".to_string(), "poetry install".to_string()],
                image,
            ),
            Installer::Pipenv => Step::run_all(
                "pipenv_install",
                vec!["pip install pipenv".to_string(), "pipenv install --dev".to_string()],
                image,
            ),
            Installer::Pip => {
                let mut commands = Vec::new();
                if ctx.exists("requirements.txt") {
                    commands.push("pip install -r requirements.txt".to_string());
                } else {
                    commands.push("pip install .".to_string());
                }
                if ctx.exists("requirements-dev.txt") {
                    commands.push("pip install -r requirements-dev.txt".to_string());
                }
                Step::run_all("pip_install", commands, image)
            }
        }
    }

    fn tool_step(&self, name: &str, command: &str, image: Option<&str>) -> Step {
        let mut commands: Vec<String> = self.setup().map(str::to_string).into_iter().collect();
        commands.push(self.wrap(command));
        Step::run_all(name, commands, image)
    }
}

pub struct PythonRule;

impl Rule for PythonRule {
    fn id(&self) -> RuleId {
        RuleId::Python
    }

    fn apply(&self, ctx: &RuleContext) -> RuleResult {
        if !MARKERS.iter().any(|marker| ctx.exists(marker)) {
            return Ok(Flow::skip());
        }

        let image = ctx.image(IMAGE);
        let installer = Installer::detect(ctx);
        let dependencies: String = DEPENDENCY_FILES
            .iter()
            .filter_map(|file| ctx.read(file))
            .collect::<Vec<_>>()
            .join("\n");

        let mut steps = vec![installer.install_step(ctx, image)];

        let uses_pytest = ctx.exists("pytest.ini")
            || ctx.exists("conftest.py")
            || pytest_pattern().is_match(&dependencies);

        if uses_pytest {
            steps.push(installer.tool_step("pytest", "pytest", image));
        } else if ctx.is_dir("tests") {
            steps.push(installer.tool_step("python_test", "python -m unittest discover", image));
        }

        if ctx.exists(".flake8") || flake8_pattern().is_match(&dependencies) {
            steps.push(installer.tool_step("flake8", "flake8", image));
        }

        Ok(Flow::Continue(steps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use crate::rules::test_support::{apply, commands, names};
    use crate::rules::ExecutionRuntime;

    #[test]
    fn test_skips_without_markers() {
        let fs = MockFileSystem::new().with_file("main.py", "print('hi')");
        assert_eq!(apply(&PythonRule, &fs, ExecutionRuntime::Docker), Flow::skip());
    }

    #[test]
    fn test_requirements_with_pytest() {
        let fs = MockFileSystem::new()
            .with_file("requirements.txt", "flask==3.0\npytest>=7\n")
            .with_file("app.py", "");

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(names(&flow), vec!["pip_install", "pytest"]);
        assert_eq!(commands(&flow), vec!["pip install -r requirements.txt", "pytest"]);
        assert!(flow.steps().iter().all(|s| s.image() == Some("python:3")));
    }

    #[test]
    fn test_dev_requirements_and_flake8() {
        let fs = MockFileSystem::new()
            .with_file("requirements.txt", "requests\n")
            .with_file("requirements-dev.txt", "pytest==8.0\npytest-cov\nflake8\n");

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(names(&flow), vec!["pip_install", "pytest", "flake8"]);
        assert_eq!(
            flow.steps()[0].commands(),
            [
                "pip install -r requirements.txt".to_string(),
                "pip install -r requirements-dev.txt".to_string()
            ]
        );
    }

    #[test]
    fn test_pytest_plugin_alone_is_not_pytest() {
        let fs = MockFileSystem::new()
            .with_file("requirements.txt", "pytest-cov\npytest_mock\n")
            .with_file("tests/test_app.py", "");

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(names(&flow), vec!["pip_install", "python_test"]);
    }

    #[test]
    fn test_pytest_in_pyproject_section() {
        let fs = MockFileSystem::new().with_file(
            "pyproject.toml",
            "[project]\nname = \"app\"\n\n[tool.pytest.ini_options]\naddopts = \"-q\"\n",
        );

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert!(names(&flow).contains(&"pytest"));
    }

    #[test]
    fn test_unittest_fallback_needs_tests_dir() {
        let fs = MockFileSystem::new()
            .with_file("setup.py", "from setuptools import setup")
            .with_file("tests/test_app.py", "");

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(commands(&flow), vec!["pip install .", "python -m unittest discover"]);

        let fs = MockFileSystem::new().with_file("setup.py", "");
        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(names(&flow), vec!["pip_install"]);
    }

    #[test]
    fn test_poetry_project() {
        let fs = MockFileSystem::new().with_file(
            "pyproject.toml",
            "[tool.poetry]\nname = \"app\"\n\n[tool.poetry.group.dev.dependencies]\npytest = \"^8.0\"\n",
        );

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Host);
        assert_eq!(names(&flow), vec!["poetry_install", "pytest"]);
        assert_eq!(
            commands(&flow),
            vec!["pip install poetry", "poetry install", "pip install poetry", "poetry run pytest"]
        );
        assert!(flow.steps().iter().all(|s| s.image().is_none()));
    }

    #[test]
    fn test_pipfile_project() {
        let fs = MockFileSystem::new()
            .with_file("Pipfile", "[dev-packages]\npytest = \"*\"\n")
            .with_file("pytest.ini", "");

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(names(&flow), vec!["pipenv_install", "pytest"]);
        assert_eq!(flow.steps()[1].commands()[1], "pipenv run pytest");
    }

    #[test]
    fn test_malformed_pyproject_falls_back_to_pip() {
        let fs = MockFileSystem::new().with_file("pyproject.toml", "[tool.poetry\nname = ");

        let flow = apply(&PythonRule, &fs, ExecutionRuntime::Docker);
        assert_eq!(commands(&flow), vec!["pip install ."]);
    }
}
