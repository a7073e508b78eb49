//! Shell script generation for cross-compiling every resolved target.
//!
//! The script resets `<build-dir>/build`, then emits one compiler invocation
//! per (os, arch) pair. In zip mode each successful compile is followed by
//! archiving the binary into `<name>.zip` and removing the loose binary.
//!
//! # Output naming
//!
//! Each target is named `<base>_<os>-<arch><version-suffix>`. When a
//! `windows` target is reached and the base does not already end in `.exe`,
//! `.exe` is appended to the base itself. The change is carried over to
//! every later target, so names produced after the first Windows target all
//! contain `.exe` (e.g. `app.exe_windows-amd64`). [`OutputBase`] holds this
//! accumulated state.

use std::fmt;

use serde::Deserialize;

use crate::selection::ResolvedSelection;

const WINDOWS: &str = "windows";
const EXE: &str = ".exe";

/// How the toolchain's cross-compiler is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Compiler {
    /// Compiler executable.
    pub program: String,
    /// Environment variable selecting the target operating system.
    pub os_env: String,
    /// Environment variable selecting the target architecture.
    pub arch_env: String,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            program: "go".into(),
            os_env: "GOOS".into(),
            arch_env: "GOARCH".into(),
        }
    }
}

/// Parameters baked into a generated script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Base name the os/arch are appended to.
    pub output_base: String,
    /// Source directory; binaries land in `<build_dir>/build`.
    pub build_dir: String,
    /// Local release version, appended as `_v<version>`.
    pub version: Option<String>,
    /// Archive each binary into a zip file.
    pub zip: bool,
    pub compiler: Compiler,
}

impl ScriptOptions {
    pub fn new(output_base: impl Into<String>, build_dir: impl Into<String>) -> Self {
        Self {
            output_base: output_base.into(),
            build_dir: build_dir.into(),
            version: None,
            zip: false,
            compiler: Compiler::default(),
        }
    }

    fn version_suffix(&self) -> String {
        match self.version.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => format!("_v{v}"),
            _ => String::new(),
        }
    }
}

/// One resolved (os, arch) pair with its output names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub os: String,
    pub arch: String,
    /// `<base>_<os>-<arch><version-suffix>`; also the zip archive stem.
    pub name: String,
    /// Output base in effect for this target, `.exe` carry-over applied.
    pub base: String,
}

impl BuildTarget {
    /// File the compiler writes: the base in zip mode, the full name otherwise.
    pub fn binary(&self, zip: bool) -> &str {
        if zip {
            &self.base
        } else {
            &self.name
        }
    }

    pub fn archive(&self) -> String {
        format!("{}.zip", self.name)
    }
}

/// Output base threaded through target iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputBase {
    current: String,
}

impl OutputBase {
    pub fn new(base: &str) -> Self {
        Self {
            current: base.trim().to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.current
    }

    /// Name the next target, appending `.exe` to the base first if `os` is
    /// Windows. The suffix is kept for all later targets.
    pub fn next_target(&mut self, os: &str, arch: &str, version_suffix: &str) -> BuildTarget {
        if os == WINDOWS && !self.current.ends_with(EXE) {
            self.current.push_str(EXE);
        }
        let name = format!("{}_{os}-{arch}{version_suffix}", self.current)
            .trim()
            .to_string();
        BuildTarget {
            os: os.to_string(),
            arch: arch.to_string(),
            name,
            base: self.current.clone(),
        }
    }
}

/// Name every target of `selection` in iteration order.
pub fn plan(selection: &ResolvedSelection, options: &ScriptOptions) -> Vec<BuildTarget> {
    let suffix = options.version_suffix();
    let mut base = OutputBase::new(&options.output_base);
    selection
        .pairs()
        .map(|(os, arch)| base.next_target(os, arch, &suffix))
        .collect()
}

/// A generated POSIX shell script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
    targets: Vec<BuildTarget>,
}

impl Script {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Targets in the order the script builds them.
    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Render the build script for `selection`.
pub fn generate(selection: &ResolvedSelection, options: &ScriptOptions) -> Script {
    let out_dir = format!("{}/build", options.build_dir);
    let quoted_out = shell_quote(&out_dir);

    let mut lines = vec![
        format!("if [ -d {quoted_out} ] || [ -f {quoted_out} ]; then"),
        format!("rm -rf {quoted_out}"),
        "fi".to_string(),
        format!("mkdir {quoted_out}"),
    ];

    let targets = plan(selection, options);
    for target in &targets {
        log::debug!("generating build for {}/{}", target.os, target.arch);
        let pair = format!("{}/{}", target.os, target.arch);
        let binary = target.binary(options.zip);

        lines.push(format!("echo {}", shell_quote(&format!("building {pair}..."))));
        lines.push(format!(
            "{}={} {}={} {} build -o {} {}",
            options.compiler.os_env,
            shell_quote(&target.os),
            options.compiler.arch_env,
            shell_quote(&target.arch),
            options.compiler.program,
            shell_quote(&format!("{out_dir}/{binary}")),
            shell_quote(&options.build_dir),
        ));

        if options.zip {
            lines.extend([
                r#"if [ "$?" = "0" ]; then"#.to_string(),
                format!("echo {}", shell_quote(&format!("built {pair}"))),
                r#"recall="$(pwd)""#.to_string(),
                format!("cd {quoted_out}"),
                format!("echo {}", shell_quote(&format!("zipping {pair}..."))),
                format!(
                    "zip -r {} {}",
                    shell_quote(&target.archive()),
                    shell_quote(binary)
                ),
                format!("echo {}", shell_quote(&format!("zipped {pair}"))),
                format!("rm {}", shell_quote(binary)),
                r#"cd "$recall""#.to_string(),
                "fi".to_string(),
            ]);
        } else {
            lines.push(format!("echo {}", shell_quote(&format!("built {pair}"))));
        }
    }

    Script { lines, targets }
}

/// Single-quote `value` for POSIX `sh`.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::selection::{resolve, resolve_all, Selection};

    fn resolved(listing: &str) -> ResolvedSelection {
        resolve_all(&Catalog::parse(listing).unwrap())
    }

    fn compile_lines(script: &Script) -> Vec<&String> {
        script
            .lines()
            .iter()
            .filter(|l| l.contains(" go build "))
            .collect()
    }

    #[test]
    fn starts_with_workspace_reset() {
        let script = generate(&resolved("linux/amd64"), &ScriptOptions::new("app", "."));
        assert_eq!(
            &script.lines()[..4],
            &[
                "if [ -d './build' ] || [ -f './build' ]; then".to_string(),
                "rm -rf './build'".to_string(),
                "fi".to_string(),
                "mkdir './build'".to_string(),
            ]
        );
    }

    #[test]
    fn windows_suffix_carries_over() {
        let catalog = Catalog::parse("linux/amd64\nwindows/amd64").unwrap();
        let mut selection = Selection::new();
        selection.insert("linux", vec!["amd64".into()]);
        selection.insert("windows", vec!["amd64".into()]);
        let selection = resolve(&selection, &catalog).unwrap();

        let script = generate(&selection, &ScriptOptions::new("app", "."));
        let compiles = compile_lines(&script);
        assert_eq!(compiles.len(), 2);
        assert_eq!(
            compiles[0],
            "GOOS='linux' GOARCH='amd64' go build -o './build/app_linux-amd64' '.'"
        );
        assert_eq!(
            compiles[1],
            "GOOS='windows' GOARCH='amd64' go build -o './build/app.exe_windows-amd64' '.'"
        );
    }

    #[test]
    fn exe_not_doubled() {
        let mut base = OutputBase::new("tool.exe");
        let target = base.next_target("windows", "386", "");
        assert_eq!(target.name, "tool.exe_windows-386");
        assert_eq!(base.as_str(), "tool.exe");
    }

    #[test]
    fn carry_over_affects_later_targets() {
        let mut base = OutputBase::new(" app ");
        assert_eq!(base.next_target("plan9", "386", "").name, "app_plan9-386");
        assert_eq!(
            base.next_target("windows", "arm64", "").name,
            "app.exe_windows-arm64"
        );
        assert_eq!(
            base.next_target("zos", "s390x", "").name,
            "app.exe_zos-s390x"
        );
    }

    #[test]
    fn version_suffix_applied() {
        let mut options = ScriptOptions::new("app", ".");
        options.version = Some("1.4.0\n".into());
        let targets = plan(&resolved("linux/arm64"), &options);
        assert_eq!(targets[0].name, "app_linux-arm64_v1.4.0");

        options.version = Some("   ".into());
        let targets = plan(&resolved("linux/arm64"), &options);
        assert_eq!(targets[0].name, "app_linux-arm64");
    }

    #[test]
    fn zip_mode_archives_each_target() {
        let mut options = ScriptOptions::new("app", "cmd/app");
        options.zip = true;
        let script = generate(&resolved("darwin/arm64"), &options);
        let body = &script.lines()[4..];
        assert_eq!(
            body,
            &[
                "echo 'building darwin/arm64...'".to_string(),
                "GOOS='darwin' GOARCH='arm64' go build -o 'cmd/app/build/app' 'cmd/app'"
                    .to_string(),
                r#"if [ "$?" = "0" ]; then"#.to_string(),
                "echo 'built darwin/arm64'".to_string(),
                r#"recall="$(pwd)""#.to_string(),
                "cd 'cmd/app/build'".to_string(),
                "echo 'zipping darwin/arm64...'".to_string(),
                "zip -r 'app_darwin-arm64.zip' 'app'".to_string(),
                "echo 'zipped darwin/arm64'".to_string(),
                "rm 'app'".to_string(),
                r#"cd "$recall""#.to_string(),
                "fi".to_string(),
            ]
        );
    }

    #[test]
    fn zip_mode_carries_exe_into_later_binaries() {
        let mut options = ScriptOptions::new("app", ".");
        options.zip = true;
        let script = generate(&resolved("linux/amd64\nwindows/amd64\nzos/s390x"), &options);

        let blocks: Vec<&[String]> = script.lines()[4..].chunks(12).collect();
        assert_eq!(blocks.len(), 3);

        let expected = [
            ("linux/amd64", "app", "app_linux-amd64.zip"),
            ("windows/amd64", "app.exe", "app.exe_windows-amd64.zip"),
            ("zos/s390x", "app.exe", "app.exe_zos-s390x.zip"),
        ];
        for (block, (pair, binary, archive)) in blocks.iter().zip(expected) {
            let (os, arch) = pair.split_once('/').unwrap();
            assert_eq!(
                block[1],
                format!("GOOS='{os}' GOARCH='{arch}' go build -o './build/{binary}' '.'")
            );
            assert_eq!(block[7], format!("zip -r '{archive}' '{binary}'"));
            assert_eq!(block[9], format!("rm '{binary}'"));
        }

        let binaries: Vec<_> = script.targets().iter().map(|t| t.binary(true)).collect();
        assert_eq!(binaries, ["app", "app.exe", "app.exe"]);
    }

    #[test]
    fn plain_mode_has_no_guards() {
        let script = generate(
            &resolved("linux/amd64\nlinux/arm64"),
            &ScriptOptions::new("app", "."),
        );
        assert_eq!(script.lines().len(), 4 + 2 * 3);
        assert!(!script.to_string().contains("$?"));
        assert!(!script.to_string().contains("zip"));
    }

    #[test]
    fn custom_compiler() {
        let mut options = ScriptOptions::new("app", ".");
        options.compiler = Compiler {
            program: "tinygo".into(),
            os_env: "GOOS".into(),
            arch_env: "GOARCH".into(),
        };
        let script = generate(&resolved("wasip1/wasm"), &options);
        assert!(script
            .lines()
            .iter()
            .any(|l| l.starts_with("GOOS='wasip1' GOARCH='wasm' tinygo build -o")));
    }

    #[test]
    fn empty_selection_only_resets() {
        let script = generate(&ResolvedSelection::default(), &ScriptOptions::new("app", "."));
        assert_eq!(script.lines().len(), 4);
        assert!(script.targets().is_empty());
    }

    #[test]
    fn quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote("plain"), "'plain'");
    }
}
