//! Distra — cross-compile a Go program for many os/arch targets at once.

mod commands;
mod config;
mod update;

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

use distra_core::{manifest, resolve, resolve_all, Catalog, Selection};

use commands::build::{BuildOutcome, BuildSettings};
use config::DistraConfig;
use update::UpdateStatus;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Static flags. Each catalog operating system additionally gets a
/// `--<os> <ARCH>...` flag, added in [`command_for`].
#[derive(Parser, Debug)]
#[command(
    name = "distra",
    about = "A distribution builder for Go",
    disable_version_flag = true
)]
struct Cli {
    /// Shows the current Distra version
    #[arg(short = 'v', long = "version")]
    show_version: bool,
    /// Lists the available operating systems to build for
    #[arg(long)]
    listos: bool,
    /// Lists the available architectures for the given operating systems ("all" for every one)
    #[arg(long, value_name = "OS", num_args = 1.., value_delimiter = ',')]
    listarch: Vec<String>,
    /// Prints --listos/--listarch results as JSON
    #[arg(long)]
    json: bool,
    /// The output name to append the OS and arch onto in the format [name]_[os]-[arch]
    #[arg(short, long)]
    output: Option<String>,
    /// The Go folder to build instead of the current one
    #[arg(short = 'b', long = "build", value_name = "DIR")]
    build_dir: Option<String>,
    /// Builds all available operating systems and architectures
    #[arg(long)]
    build_all: bool,
    /// Creates zip files named with the format [name]_[os]-[arch] with an executable inside
    #[arg(short, long)]
    zip: bool,
    /// Stops the temporary compilation shellscript file from being run and deleted
    #[arg(short = 'e', long = "emit-sh")]
    emit_sh: bool,
    /// The path to a folder containing a Distrafile
    #[arg(short, long, value_name = "DIR")]
    file: Option<PathBuf>,
    /// Emits the given os/arch build flags to a Distrafile
    #[arg(long)]
    emit_distrafile: bool,
    /// Reads the os/arch listing from a file instead of the toolchain
    #[arg(long, value_name = "FILE")]
    platforms: Option<PathBuf>,
    /// Skips checking for a newer Distra release
    #[arg(long)]
    no_update_check: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| run(std::env::args_os().collect(), &cwd));
    if let Err(e) = result {
        if let Some(usage) = e.downcast_ref::<clap::Error>() {
            usage.exit();
        }
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: Vec<OsString>, cwd: &Path) -> Result<()> {
    let config = DistraConfig::load_or_default(cwd)?;

    let platforms = bootstrap_platforms(&args).map(|path| cwd.join(path));
    let catalog = config
        .toolchain
        .platform_source(platforms.as_deref())
        .load()?;

    let (command, os_flags) = command_for(&catalog);
    let matches = match command.try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            e.print()?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let cli = Cli::from_arg_matches(&matches)?;

    if config.update.check && !cli.no_update_check {
        match update::check(VERSION, &config.update.url)? {
            UpdateStatus::Available { local, remote } => {
                println!("{}", update::notice(&local, &remote))
            }
            UpdateStatus::UpToDate | UpdateStatus::Unknown => {}
        }
    }

    if cli.show_version {
        println!("{VERSION}");
        return Ok(());
    }

    if cli.listos {
        println!("{}", commands::list::operating_systems(&catalog, cli.json)?);
        return Ok(());
    }

    if !cli.listarch.is_empty() {
        println!(
            "{}",
            commands::list::architectures(&catalog, &cli.listarch, cli.json)?
        );
        return Ok(());
    }

    let file_dir = cli.file.as_deref().map(|dir| cwd.join(dir));
    let mut selection = selection_from_matches(&matches, &os_flags);
    if let Some(dir) = file_dir.as_deref() {
        if !cli.emit_distrafile && !cli.build_all {
            selection.merge(manifest::load(&manifest::path_in(dir))?);
        }
    }

    let resolved = if cli.build_all {
        resolve_all(&catalog)
    } else {
        resolve(&selection, &catalog)?
    };
    if resolved.is_empty() {
        return Ok(());
    }

    if cli.emit_distrafile {
        let dir = file_dir.as_deref().unwrap_or(cwd);
        commands::distrafile::emit(dir, &resolved)?;
        println!("file written");
        return Ok(());
    }

    let settings = BuildSettings {
        work_dir: cwd.to_path_buf(),
        output: cli
            .output
            .or(config.build.output)
            .unwrap_or_else(|| commands::build::default_output(cwd)),
        build_dir: cli
            .build_dir
            .or(config.build.dir)
            .unwrap_or_else(|| ".".to_string()),
        zip: cli.zip || config.build.zip,
        retain_script: cli.emit_sh,
        version_file: config.build.version_file.clone(),
        compiler: config.toolchain.compiler(),
        shell: config.toolchain.shell.clone(),
    };

    match commands::build::run(&resolved, &settings)? {
        BuildOutcome::NothingSelected => {}
        BuildOutcome::Retained(path) => println!("{}", path.display()),
        BuildOutcome::Executed(output) => print!("{output}"),
    }
    Ok(())
}

/// The full command for `catalog`, and the operating systems that received
/// a flag. Names clashing with a static flag are skipped.
fn command_for(catalog: &Catalog) -> (clap::Command, Vec<String>) {
    let mut command = Cli::command();
    let reserved: HashSet<String> = command
        .get_arguments()
        .flat_map(|arg| [Some(arg.get_id().to_string()), arg.get_long().map(str::to_string)])
        .flatten()
        .chain(["help".to_string()])
        .collect();

    let mut os_flags = Vec::new();
    for os in catalog.operating_systems() {
        if reserved.contains(os) {
            log::warn!("operating system '{os}' clashes with a built-in flag; no --{os} flag");
            continue;
        }
        command = command.arg(
            Arg::new(os.to_string())
                .long(os.to_string())
                .value_name("ARCH")
                .num_args(1..)
                .value_delimiter(',')
                .action(ArgAction::Append)
                .help(format!(
                    "Compiles the given architectures for {}",
                    display_name(os)
                )),
        );
        os_flags.push(os.to_string());
    }
    (command, os_flags)
}

/// Per-OS flag values as a selection.
fn selection_from_matches(matches: &ArgMatches, os_flags: &[String]) -> Selection {
    let mut selection = Selection::new();
    for os in os_flags {
        let archs: Vec<String> = matches
            .get_many::<String>(os)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if !archs.is_empty() {
            selection.insert(os.clone(), archs);
        }
    }
    selection
}

/// Human-facing operating system name for help text.
fn display_name(os: &str) -> String {
    match os {
        "ios" => return "iOS".to_string(),
        "js" => return "JS".to_string(),
        _ => {}
    }
    if let Some(prefix) = os.strip_suffix("bsd") {
        return format!("{}BSD", capitalize(prefix));
    }
    capitalize(os)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `--platforms` has to be known before the per-OS flags can be built, so it
/// is picked out of the raw arguments ahead of the real parse.
fn bootstrap_platforms(args: &[OsString]) -> Option<PathBuf> {
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let text = arg.to_string_lossy();
        if text == "--" {
            break;
        }
        if text == "--platforms" {
            return iter.next().map(PathBuf::from);
        }
        if let Some(value) = text.strip_prefix("--platforms=") {
            return Some(PathBuf::from(value));
        }
    }
    None
}
