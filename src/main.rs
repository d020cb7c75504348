use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;
use std::sync::Once;
use tess::config::{Config, Options};
use tess::error::TessError;
use tess::interpreter::Interpreter;
use tess::runner;

const LOG_ENV: &str = "TESS_LOG";

static TRACING_INIT: Once = Once::new();

/// Installs a subscriber only when a filter is supplied, through `TESS_LOG`
/// or the config file's `log` key.
fn init_tracing(config_filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match env::var(LOG_ENV) {
            Ok(_) => EnvFilter::from_env(LOG_ENV),
            Err(_) => match config_filter {
                Some(directives) => EnvFilter::new(directives),
                None => return,
            },
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}

fn file_arg() -> Arg<'static, 'static> {
    Arg::with_name("file").required(true).help("Script to use")
}

fn cli() -> App<'static, 'static> {
    App::new("tess")
        .version(runner::VERSION)
        .about("The Tess scripting language")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("strict")
                .long("strict")
                .global(true)
                .help("Refuse to run programs with syntax errors"),
        )
        .arg(
            Arg::with_name("unsafe")
                .long("unsafe")
                .global(true)
                .help("Enable the mem builtins"),
        )
        .subcommand(
            SubCommand::with_name("run")
                .alias("r")
                .about("Run a script")
                .setting(AppSettings::TrailingVarArg)
                .arg(file_arg())
                .arg(
                    Arg::with_name("args")
                        .multiple(true)
                        .allow_hyphen_values(true)
                        .help("Arguments passed to the script as argv"),
                ),
        )
        .subcommand(
            SubCommand::with_name("build")
                .alias("b")
                .about("Build a script")
                .arg(file_arg()),
        )
        .subcommand(SubCommand::with_name("repl").about("Start an interactive session"))
        .subcommand(
            SubCommand::with_name("exec")
                .about("Run code given on the command line")
                .arg(Arg::with_name("code").required(true)),
        )
        .subcommand(
            SubCommand::with_name("check")
                .about("Check a script for syntax errors")
                .arg(file_arg())
                .arg(
                    Arg::with_name("ast")
                        .long("ast")
                        .help("Print the parsed program"),
                ),
        )
        .subcommand(
            SubCommand::with_name("lint")
                .about("Report likely mistakes in a script")
                .arg(file_arg()),
        )
        .subcommand(
            SubCommand::with_name("new")
                .about("Create a new project")
                .arg(Arg::with_name("name").required(true)),
        )
        .subcommand(SubCommand::with_name("info").about("Show installed packages"))
        .subcommand(SubCommand::with_name("version").about("Show the version"))
}

fn cli_options(matches: &ArgMatches) -> Options {
    Options {
        strict: matches.is_present("strict"),
        unsafe_memory: matches.is_present("unsafe"),
    }
}

/// The config beside `dir` (or in the cwd), used for the log filter and the
/// commands that have no script of their own.
fn local_config(dir: &Path, cli: Options) -> Result<Options, TessError> {
    let (options, config) = runner::resolve_options(dir, cli)?;
    init_tracing(config.as_ref().and_then(Config::log_filter));
    Ok(options)
}

fn script_dir(file: &str) -> &Path {
    Path::new(file)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn exit_status(ok: bool) -> i32 {
    if ok {
        0
    } else {
        1
    }
}

fn dispatch(matches: &ArgMatches) -> Result<i32, TessError> {
    let mut out = io::stdout();
    let (name, sub) = matches.subcommand();
    let sub = match sub {
        Some(sub) => sub,
        None => return Ok(1),
    };
    let mut cli = cli_options(matches);
    cli.strict |= sub.is_present("strict");
    cli.unsafe_memory |= sub.is_present("unsafe");
    let file = sub.value_of("file").unwrap_or("");

    match name {
        "run" => {
            local_config(script_dir(file), cli)?;
            let args: Vec<String> = sub
                .values_of("args")
                .map(|values| values.map(String::from).collect())
                .unwrap_or_default();
            runner::run_file(file, &args, cli)
        }
        "build" => {
            local_config(script_dir(file), cli)?;
            runner::build_file(file, cli, &mut out)
        }
        "repl" => {
            let options = local_config(Path::new("."), cli)?;
            let mut interpreter = Interpreter::new().with_options(options);
            let stdin = io::stdin();
            let mut input = stdin.lock();
            runner::repl(&mut input, &mut interpreter)
        }
        "exec" => {
            let options = local_config(Path::new("."), cli)?;
            runner::exec(sub.value_of("code").unwrap_or(""), options)
        }
        "check" => {
            local_config(script_dir(file), cli)?;
            runner::check(file, sub.is_present("ast"), &mut out).map(exit_status)
        }
        "lint" => {
            local_config(script_dir(file), cli)?;
            runner::lint(file, &mut out).map(exit_status)
        }
        "new" => {
            init_tracing(None);
            runner::new_project(sub.value_of("name").unwrap_or(""), &mut out)?;
            Ok(0)
        }
        "info" => {
            local_config(Path::new("."), cli)?;
            runner::info(Path::new("."), &mut out)?;
            Ok(0)
        }
        "version" => {
            writeln!(out, "Tess Language v{}", runner::VERSION)?;
            Ok(0)
        }
        _ => Ok(1),
    }
}

fn main() {
    let matches = cli().get_matches();
    let code = match dispatch(&matches) {
        Ok(code) => code,
        Err(TessError::Io { path, .. }) => {
            eprintln!("Error: Could not open file '{}'", path.display());
            1
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            1
        }
    };
    process::exit(code);
}
