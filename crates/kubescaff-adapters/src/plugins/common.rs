//! Helpers shared by the built-in Go plugins.

use std::path::Path;

use chrono::Datelike;
use kubescaff_core::{
    application::{
        ApplicationError, FlagSet, FlagValue, FlagValues, Invocation,
        ports::{CommandRunner, Filesystem},
    },
    domain::{ResourceOptions, validation},
    error::KsResult,
};

/// Where the boilerplate header is kept inside a project.
pub const BOILERPLATE_PATH: &str = "hack/boilerplate.go.txt";

const APACHE2_NOTICE: &str = r#"
Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
"#;

/// Go comment block carrying the copyright line and license notice.
pub fn boilerplate(license: &str, owner: &str) -> KsResult<String> {
    let notice = match license {
        "apache2" => APACHE2_NOTICE,
        "none" => "",
        other => {
            return Err(ApplicationError::ValidationFailed(format!(
                "unknown license {other:?}, may be one of 'apache2', 'none'"
            ))
            .into());
        }
    };

    let year = chrono::Local::now().year();
    let copyright = if owner.is_empty() {
        format!("Copyright {year}.")
    } else {
        format!("Copyright {year} {owner}.")
    };
    Ok(format!("/*\n{copyright}\n{notice}*/"))
}

/// The project's boilerplate header, or empty if none was written.
pub fn load_boilerplate(fs: &dyn Filesystem) -> KsResult<String> {
    let path = Path::new(BOILERPLATE_PATH);
    if !fs.exists(path) {
        return Ok(String::new());
    }
    Ok(fs.read_to_string(path)?.trim_end().to_string())
}

/// The `module` path declared in `go.mod`, if any.
pub fn find_go_module(fs: &dyn Filesystem) -> KsResult<Option<String>> {
    let path = Path::new("go.mod");
    if !fs.exists(path) {
        return Ok(None);
    }
    let content = fs.read_to_string(path)?;
    Ok(content
        .lines()
        .find_map(|line| line.trim().strip_prefix("module "))
        .map(|m| m.trim().trim_matches('"').to_string()))
}

/// Fails unless `go version` reports at least `minimum` (major, minor).
pub fn check_go_version(runner: &dyn CommandRunner, minimum: (u64, u64)) -> KsResult<()> {
    let out = runner.output("Checking Go version", "go", &["version"])?;
    let found = parse_go_version(&out).ok_or_else(|| {
        ApplicationError::ValidationFailed(format!(
            "unable to read the Go version from {:?}",
            out.trim()
        ))
    })?;
    if found < minimum {
        return Err(ApplicationError::ValidationFailed(format!(
            "go version go{}.{} is not supported, use go{}.{} or newer \
             (or pass --skip-go-version-check)",
            found.0, found.1, minimum.0, minimum.1
        ))
        .into());
    }
    Ok(())
}

/// Major and minor from `go version` output such as
/// `go version go1.13.4 linux/amd64`.
fn parse_go_version(output: &str) -> Option<(u64, u64)> {
    let token = output.split_whitespace().find_map(|word| {
        word.strip_prefix("go")
            .filter(|v| v.starts_with(|c: char| c.is_ascii_digit()))
    })?;
    let mut parts = token.split('.');
    let major = leading_digits(parts.next()?);
    let minor = parts.next().map_or("0", leading_digits);
    let version = format!("{major}.{minor}");
    validation::validate_version_strict(&version).ok()?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

fn leading_digits(s: &str) -> &str {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    &s[..end]
}

/// `--repo`, falling back to the module in `go.mod`.
pub fn resolve_repo(flags: &FlagValues, fs: &dyn Filesystem) -> KsResult<String> {
    if let Some(repo) = flags.string("repo").filter(|r| !r.is_empty()) {
        return Ok(repo.to_string());
    }
    find_go_module(fs)?.ok_or_else(|| {
        ApplicationError::ValidationFailed(
            "could not determine the Go module path, pass it with --repo \
             (e.g. github.com/user/repo)"
                .into(),
        )
        .into()
    })
}

/// `--project-name`, falling back to the working directory's name.
pub fn resolve_project_name(flags: &FlagValues, working_dir: &Path) -> KsResult<String> {
    let name = match flags.string("project-name").filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => working_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default(),
    };
    validation::validate_project_name(&name)?;
    Ok(name)
}

/// Declares `--group`, `--version`, `--kind` and `--plural`.
pub fn bind_resource_flags(flags: &mut FlagSet) {
    flags
        .string("group", None, "resource Group")
        .string("version", None, "resource Version")
        .string("kind", None, "resource Kind")
        .string("plural", None, "resource irregular plural form");
}

/// Resource options from the flags declared by [`bind_resource_flags`].
pub fn resource_options(flags: &FlagValues) -> ResourceOptions {
    let mut options = ResourceOptions::new(
        flags.string_or_empty("group"),
        flags.string_or_empty("version"),
        flags.string_or_empty("kind"),
    );
    options.plural = flags.string("plural").filter(|p| !p.is_empty()).map(str::to_string);
    options.namespaced = !matches!(flags.get("namespaced"), Some(FlagValue::Bool(false)));
    options
}

/// The flag's value when given on the command line, otherwise the user's answer.
pub fn confirm_flag(inv: &Invocation<'_>, flag: &str, question: &str) -> KsResult<bool> {
    if inv.flags.changed(flag) {
        return Ok(inv.flags.bool(flag));
    }
    inv.ports.prompter.confirm(question, true)
}

/// Directory holding the Go types for a resource's group.
pub fn api_dir(multigroup: bool) -> &'static str {
    if multigroup {
        "apis/{{ resource.group }}/{{ resource.version }}"
    } else {
        "api/{{ resource.version }}"
    }
}

/// Directory holding the controllers for a resource's group.
pub fn controllers_dir(multigroup: bool) -> &'static str {
    if multigroup {
        "controllers/{{ resource.group }}"
    } else {
        "controllers"
    }
}
