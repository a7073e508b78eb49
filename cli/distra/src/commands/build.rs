//! Default mode — generate the build script, then run or keep it.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use distra_core::{generate, Compiler, ResolvedSelection, Script, ScriptOptions};
use distra_toolchain::ScriptFile;

/// Settings for one build run, after flags and configuration are merged.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Directory the script file is written to and run from.
    pub work_dir: PathBuf,
    pub output: String,
    pub build_dir: String,
    pub zip: bool,
    /// Keep the script instead of running and deleting it.
    pub retain_script: bool,
    /// Local version marker, relative to `work_dir`.
    pub version_file: PathBuf,
    pub compiler: Compiler,
    pub shell: String,
}

/// What a build run did with its script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Nothing was selected; no script was written.
    NothingSelected,
    /// The script was kept at this path.
    Retained(PathBuf),
    /// The script ran and was deleted; its standard output.
    Executed(String),
}

/// Render the script for `selection` without touching the filesystem
/// beyond reading the version marker.
pub fn render(selection: &ResolvedSelection, settings: &BuildSettings) -> Script {
    let mut options = ScriptOptions::new(&settings.output, clean_build_dir(&settings.build_dir));
    options.zip = settings.zip;
    options.compiler = settings.compiler.clone();
    options.version = read_version_marker(&settings.work_dir.join(&settings.version_file));
    generate(selection, &options)
}

/// Generate the script for `selection` and either keep or execute it.
pub fn run(selection: &ResolvedSelection, settings: &BuildSettings) -> Result<BuildOutcome> {
    if selection.is_empty() {
        log::debug!("no targets selected");
        return Ok(BuildOutcome::NothingSelected);
    }

    let script = render(selection, settings);
    log::info!("generated builds for {} targets", script.targets().len());

    let file = ScriptFile::create(&settings.work_dir, &script.to_string())
        .context("writing build script")?;

    if settings.retain_script {
        let path = file.keep().context("keeping build script")?;
        log::info!("script kept at {}", path.display());
        return Ok(BuildOutcome::Retained(path));
    }

    let output = file
        .execute(&settings.shell)
        .context("running build script")?;
    Ok(BuildOutcome::Executed(output))
}

/// Trimmed contents of the version marker, if it exists and is non-blank.
fn read_version_marker(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    let version = text.trim();
    if version.is_empty() {
        return None;
    }
    log::debug!("using version {version} from {}", path.display());
    Some(version.to_string())
}

/// Lexically normalize a build directory: trim whitespace, collapse `.`
/// segments and repeated or trailing separators. Blank becomes `.`.
pub fn clean_build_dir(dir: &str) -> String {
    let trimmed = dir.trim();
    let mut cleaned = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::CurDir if cleaned.as_os_str().is_empty() => cleaned.push("."),
            Component::CurDir => {}
            other => cleaned.push(other.as_os_str()),
        }
    }
    if cleaned.as_os_str().is_empty() {
        return ".".to_string();
    }
    let text = cleaned.to_string_lossy().into_owned();
    match text.strip_prefix("./") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => text,
    }
}

/// Default output base: the name of `dir`.
pub fn default_output(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "main".to_string())
}
