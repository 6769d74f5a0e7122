use std::{path::PathBuf, process::ExitCode};

use clap::{ArgAction, Parser, Subcommand};
use log::{debug, error, info, LevelFilter};

use hackc::{
    error::ClassFailure,
    fileio::{
        input::{self, SourceFile},
        output,
    },
    hack, jack, vm, Error,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Jack compiler, VM translator and Hack assembler")]
struct Args {
    /// Log more (`-v` debug, `-vv` trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a `.jack` file, or every `.jack` file in a directory, to `.vm`
    Compile { path: PathBuf },

    /// Translate a `.vm` file, or a directory of them, to a single `.asm`
    Translate {
        path: PathBuf,

        /// Do not emit the `SP = 256; call Sys.init` bootstrap
        #[arg(long)]
        no_bootstrap: bool,
    },

    /// Assemble an `.asm` file to `.hack`
    Assemble { path: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });

    let result = match args.command {
        Command::Compile { path } => compile(&path),
        Command::Translate { path, no_bootstrap } => translate(
            &path,
            vm::TranslatorOptions {
                bootstrap: !no_bootstrap,
            },
        ),
        Command::Assemble { path } => assemble(&path),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}

/// Every class is compiled, even after a failing one, so all diagnostics
/// are shown in one run. Only clean classes get a `.vm` file.
fn compile(path: &std::path::Path) -> Result<(), Error> {
    let mut program_context = jack::ProgramContext::new();
    let mut failures = vec![];

    for file in input::read_all(path, "jack")? {
        let compilation = jack::compile_lines(&file.lines, &mut program_context);
        let class_name = compilation.class_name.clone();

        match compilation.into_result() {
            Ok(block) => {
                let target = file.path.with_extension("vm");
                output::write_lines(&target, &block.lines())?;
                info!("{} -> {}", file.path.display(), target.display());
            }
            Err(diagnostics) => {
                error_report::display(&file, &diagnostics);
                failures.push(ClassFailure {
                    class: class_name,
                    diagnostics,
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Diagnostics { failures })
    }
}

fn translate(path: &std::path::Path, options: vm::TranslatorOptions) -> Result<(), Error> {
    let mut translator = vm::Translator::new(options);

    for file in input::read_all(path, "vm")? {
        debug!("translating {}", file.path.display());
        translator
            .translate_unit(&file.name, &file.lines)
            .inspect_err(|_| error!("in {}", file.path.display()))?;
    }

    let target = output::assembly_path(path)?;
    output::write_lines(&target, &vm::translator::to_lines(&translator.finish()))?;
    info!("{} -> {}", path.display(), target.display());

    Ok(())
}

fn assemble(path: &std::path::Path) -> Result<(), Error> {
    let file = SourceFile::read(path)?;
    let words = hack::assemble(&file.lines).inspect_err(|_| error!("in {}", file.path.display()))?;

    let target = path.with_extension("hack");
    output::write_lines(&target, &hack::to_lines(&words))?;
    info!("{} -> {} ({} words)", path.display(), target.display(), words.len());

    Ok(())
}

mod error_report {
    use ariadne::{Label, Report, ReportKind, Source};

    use hackc::{fileio::input::SourceFile, jack};

    pub fn display(file: &SourceFile, errors: &[jack::Error]) {
        let file_path = file.path.to_string_lossy();
        let file_path = file_path.as_ref();
        let content = file.text();

        for error in errors {
            let report = Report::build(ReportKind::Error, file_path, error.span().start)
                .with_message(error.kind())
                .with_label(Label::new((file_path, error.span())).with_message(error.to_string()))
                .finish()
                .eprint((file_path, Source::from(content.as_str())));

            if let Err(io_error) = report {
                log::error!("unable to render report: {io_error}");
            }
        }
    }
}

mod logger {
    use log::{LevelFilter, Log, Metadata, Record};

    struct StderrLogger;

    static LOGGER: StderrLogger = StderrLogger;

    impl Log for StderrLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                eprintln!("[{}] {}", record.level(), record.args());
            }
        }

        fn flush(&self) {}
    }

    pub fn init(level: LevelFilter) {
        // a logger installed before us wins
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}
