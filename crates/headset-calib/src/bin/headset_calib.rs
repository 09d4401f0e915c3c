use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use headset_calib::core::level_from_verbosity;
#[cfg(not(feature = "tracing"))]
use headset_calib::core::init_with_level;
use headset_calib::env::{EnvironmentProfileCollection, EnvironmentProfileError};
use headset_calib::loader::{
    CalibrationLoadError, CalibrationLoaderParams, CalibrationParameterLoader,
    FileCalibrationSource, ParamsIoError,
};
use headset_calib::{CalibrationProfile, PoseLayout};
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("no calibration data in {0}")]
    NoCalibrationData(PathBuf),
    #[error(transparent)]
    Calibration(#[from] CalibrationLoadError),
    #[error("failed to read loader params: {0}")]
    Params(#[from] ParamsIoError),
    #[error(transparent)]
    Environment(#[from] EnvironmentProfileError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "headset-calib", version, about = "Headset calibration and environment profile tools")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Emit logs as JSON lines on stderr.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a calibration payload and print the parsed profiles as JSON.
    Calibration {
        file: PathBuf,
        /// Flat layout of `relative_pose`; overrides `--params`.
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
        /// Loader params JSON file.
        #[arg(long)]
        params: Option<PathBuf>,
    },
    /// Environment profile tools.
    #[command(subcommand)]
    Env(EnvCommand),
}

#[derive(Subcommand, Debug)]
enum EnvCommand {
    /// Validate an environment profile file against the strict schema.
    Check { file: PathBuf },
    /// Rewrite an environment profile file in canonical form.
    Fmt {
        input: PathBuf,
        /// Output path; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    #[value(name = "row-major-3x4")]
    RowMajor3x4,
    #[value(name = "column-major-4x3")]
    ColumnMajor4x3,
}

impl From<LayoutArg> for PoseLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::RowMajor3x4 => PoseLayout::RowMajor3x4,
            LayoutArg::ColumnMajor4x3 => PoseLayout::ColumnMajor4x3,
        }
    }
}

#[derive(Serialize)]
struct CalibrationReport<'a> {
    profiles: Vec<&'a CalibrationProfile>,
    rejected: usize,
    diagnostics: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    if let Err(err) = init_with_level(level_from_verbosity(cli.verbose)) {
        eprintln!("warning: logger already installed: {err}");
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    let level = level_from_verbosity(cli.verbose);
    if let Err(err) = headset_calib::core::init_tracing(level, cli.log_json) {
        eprintln!("warning: tracing subscriber not installed: {err}");
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Calibration {
            file,
            layout,
            params,
        } => run_calibration(&file, layout, params.as_deref()),
        Command::Env(EnvCommand::Check { file }) => {
            let profiles = EnvironmentProfileCollection::load_json(&file)?;
            println!("{}: {} environment profile(s)", file.display(), profiles.len());
            Ok(())
        }
        Command::Env(EnvCommand::Fmt { input, output }) => {
            let profiles = EnvironmentProfileCollection::load_json(&input)?;
            match output {
                Some(path) => profiles.write_json(path)?,
                None => println!("{}", profiles.to_json_string()?),
            }
            Ok(())
        }
    }
}

fn run_calibration(
    file: &Path,
    layout: Option<LayoutArg>,
    params_path: Option<&Path>,
) -> Result<(), CliError> {
    let mut params = match params_path {
        Some(path) => CalibrationLoaderParams::load_json(path)?,
        None => CalibrationLoaderParams::default(),
    };
    if let Some(layout) = layout {
        params.pose_layout = layout.into();
    }

    let loader = CalibrationParameterLoader::with_params(FileCalibrationSource::new(file), params);
    let load = match loader.try_load() {
        Ok(load) => load,
        Err(CalibrationLoadError::NoInteropData) => {
            return Err(CliError::NoCalibrationData(file.to_path_buf()))
        }
        Err(err) => return Err(err.into()),
    };

    let report = CalibrationReport {
        profiles: load.profiles.values().collect(),
        rejected: load.rejected_count(),
        diagnostics: load.diagnostics.iter().map(ToString::to_string).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
