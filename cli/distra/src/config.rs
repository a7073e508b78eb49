//! `distra.toml` configuration.
//!
//! Every key is optional. Command-line flags take precedence over values
//! found here, which take precedence over built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use distra_core::Compiler;
use distra_toolchain::source::DEFAULT_LIST_ARGS;
use distra_toolchain::PlatformSource;

/// Name of the configuration file.
pub const FILE_NAME: &str = "distra.toml";

/// Where the project's release version lives when not published remotely.
pub const DEFAULT_UPDATE_URL: &str =
    "https://raw.githubusercontent.com/voidwyrm-2/distra/refs/heads/main/version.txt";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DistraConfig {
    pub build: BuildConfig,
    pub toolchain: ToolchainConfig,
    pub update: UpdateConfig,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BuildConfig {
    /// Output base name.
    pub output: Option<String>,
    /// Source directory to build.
    pub dir: Option<String>,
    pub zip: bool,
    /// Local version marker, relative to the working directory.
    pub version_file: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: None,
            dir: None,
            zip: false,
            version_file: PathBuf::from("version.txt"),
        }
    }
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ToolchainConfig {
    pub program: String,
    /// Arguments printing the `os/arch` listing.
    pub list_args: Vec<String>,
    pub os_env: String,
    pub arch_env: String,
    /// Shell that runs the generated script.
    pub shell: String,
    /// Read the catalog from this file instead of running the toolchain.
    pub platforms_file: Option<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        let compiler = Compiler::default();
        Self {
            program: compiler.program,
            list_args: DEFAULT_LIST_ARGS.iter().map(|a| a.to_string()).collect(),
            os_env: compiler.os_env,
            arch_env: compiler.arch_env,
            shell: "sh".into(),
            platforms_file: None,
        }
    }
}

impl ToolchainConfig {
    pub fn compiler(&self) -> Compiler {
        Compiler {
            program: self.program.clone(),
            os_env: self.os_env.clone(),
            arch_env: self.arch_env.clone(),
        }
    }

    /// Catalog source; `platforms_override` replaces live discovery.
    pub fn platform_source(&self, platforms_override: Option<&Path>) -> PlatformSource {
        match platforms_override.or(self.platforms_file.as_deref()) {
            Some(path) => PlatformSource::File(path.to_path_buf()),
            None => PlatformSource::Toolchain {
                program: self.program.clone(),
                args: self.list_args.clone(),
            },
        }
    }
}

/// `[update]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UpdateConfig {
    pub check: bool,
    pub url: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check: true,
            url: DEFAULT_UPDATE_URL.into(),
        }
    }
}

impl DistraConfig {
    /// Search upward from `start_dir` for `distra.toml` and parse it.
    ///
    /// Relative paths in the file are resolved against its directory.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(FILE_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let mut config: DistraConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                config.anchor(&dir);
                log::debug!("loaded {}", candidate.display());
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load the nearest configuration, or defaults when there is none.
    pub fn load_or_default(start_dir: &Path) -> Result<Self> {
        Ok(Self::find_and_load(start_dir)?
            .map(|(config, _)| config)
            .unwrap_or_default())
    }

    fn anchor(&mut self, dir: &Path) {
        if let Some(file) = self.toolchain.platforms_file.as_mut() {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }
    }

    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing distra.toml")
    }
}
