use anyhow::Result;
use shader_program::{
    window::HiddenWindow, ProgramConfig, ProgramError, ShaderProgram, StageKind,
};
use std::{path::PathBuf, process};
use structopt::StructOpt;

/// Compiles and links a set of shader files, printing every diagnostic the driver reports.
#[derive(Clone, Debug, StructOpt)]
#[structopt(name = "shader-check")]
pub struct CheckOptions {
    #[structopt(long, parse(from_os_str))]
    pub vertex: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub fragment: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub tess_control: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub tess_eval: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub geometry: Option<PathBuf>,

    #[structopt(long, parse(from_os_str))]
    pub compute: Option<PathBuf>,

    /// RON file with a `ProgramConfig`
    #[structopt(long, short = "c", parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Stop at the first failure
    #[structopt(long)]
    pub fail_fast: bool,

    /// Validate the program after linking
    #[structopt(long)]
    pub validate: bool,
}

impl CheckOptions {
    fn stages(&self) -> impl Iterator<Item = (StageKind, &PathBuf)> + '_ {
        let paths = [
            &self.vertex,
            &self.fragment,
            &self.tess_control,
            &self.tess_eval,
            &self.geometry,
            &self.compute,
        ];
        StageKind::ALL
            .iter()
            .copied()
            .zip(paths)
            .filter_map(|(kind, path)| path.as_ref().map(|path| (kind, path)))
    }

    fn program_config(&self) -> Result<ProgramConfig> {
        let mut config = match &self.config {
            Some(path) => ProgramConfig::load(path)?,
            None => ProgramConfig::default(),
        };

        if self.fail_fast {
            config = ProgramConfig {
                validate: config.validate,
                ..ProgramConfig::fail_fast()
            };
        }
        config.validate |= self.validate;

        Ok(config)
    }
}

/// A check passes only when the program linked without a single diagnostic.
fn succeeded(diagnostics: &[ProgramError], linked: bool) -> bool {
    linked && diagnostics.is_empty()
}

fn check(options: &CheckOptions) -> Result<bool> {
    let config = options.program_config()?;

    let mut window = HiddenWindow::new(64, 64)?;
    let ctx = window.load_context();

    let mut program = ShaderProgram::with_config(&ctx, config)?;
    for (kind, path) in options.stages() {
        log::info!("adding {} stage from `{}`", kind, path.display());
        if program.add_stage(path, kind).is_err() && program.config().is_fail_fast() {
            break;
        }
    }

    if !program.config().is_fail_fast() || program.diagnostics().is_empty() {
        if let Err(err) = program.link() {
            log::debug!("link failed, reported below: {}", err);
        }
    }

    let diagnostics = program.take_diagnostics();
    for diagnostic in &diagnostics {
        println!("[{}] {}", diagnostic.label(), diagnostic);
    }

    let ok = succeeded(&diagnostics, program.is_linked());
    println!("{}", if ok { "program linked" } else { "program failed" });
    Ok(ok)
}

fn main() {
    env_logger::init();

    let options = CheckOptions::from_args();
    if options.stages().next().is_none() {
        eprintln!("no shader stages given");
        process::exit(1);
    }

    match check(&options) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("error: {:?}", err);
            process::exit(1);
        }
    }
}
