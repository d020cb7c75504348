use crate::ast::{AstPrinter, Program, Statement};
use crate::config::{Config, Options};
use crate::diagnostic::Diagnostic;
use crate::error::{RuntimeError, TessError};
use crate::interpreter::{Flow, Interpreter};
use crate::module::{MODULE_EXT, PACKAGE_DIR};
use crate::parser;
use crate::resolver;
use crate::scanner;
use crate::shared_list::SharedList;
use crate::value::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELLO_WORLD: &str = "f! main {\n    print:: \"Hello, World!\"\n}\n\nstart >.<\n";

/// The path as given when it exists, otherwise the path with `.tess`
/// appended.
pub fn script_path(path: &str) -> PathBuf {
    let given = PathBuf::from(path);
    if given.exists() {
        return given;
    }
    let mut with_ext = given.clone().into_os_string();
    with_ext.push(".");
    with_ext.push(MODULE_EXT);
    let with_ext = PathBuf::from(with_ext);
    if with_ext.exists() {
        with_ext
    } else {
        given
    }
}

fn read_source(path: &Path) -> Result<String, TessError> {
    fs::read_to_string(path).map_err(|source| TessError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Command-line switches are added on top of the config file's.
pub fn resolve_options(
    script_dir: &Path,
    cli: Options,
) -> Result<(Options, Option<Config>), TessError> {
    let config = match Config::discover(script_dir) {
        Some(path) => Config::load(&path, cli.strict)?,
        None => None,
    };
    let from_file = config.as_ref().map(Config::options).unwrap_or_default();
    let options = Options {
        strict: cli.strict || from_file.strict,
        unsafe_memory: cli.unsafe_memory || from_file.unsafe_memory,
    };
    Ok((options, config))
}

fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
    let outcome = parser::parse(&scanner::scan_tokens(source));
    (outcome.program, outcome.diagnostics)
}

/// Parses and runs `source`, returning the process exit code. An uncaught
/// error is printed as `Error: <message>` and still exits 0; `sys.exit`
/// supplies its own code.
pub fn run_program(interpreter: &mut Interpreter, source: &str) -> Result<i32, TessError> {
    let started = Instant::now();
    let (program, diagnostics) = parse_source(source);
    interpreter.timings.compile_time = started.elapsed().as_secs_f64();
    debug!(
        statements = program.statements.len(),
        diagnostics = diagnostics.len(),
        "parsed"
    );
    if !diagnostics.is_empty() {
        if interpreter.options().strict {
            for diagnostic in &diagnostics {
                eprintln!("{}", diagnostic);
            }
            return Err(TessError::Strict {
                count: diagnostics.len(),
            });
        }
        for diagnostic in &diagnostics {
            debug!(%diagnostic, "skipped");
        }
    }

    let executing = Instant::now();
    let result = interpreter.interpret(&program);
    interpreter.timings.execute_time = executing.elapsed().as_secs_f64();
    interpreter.timings.total_time = started.elapsed().as_secs_f64();
    debug!(timings = ?interpreter.timings, "finished");
    Ok(exit_code(interpreter, result.map(|_| ())))
}

fn exit_code(interpreter: &mut Interpreter, result: Result<(), RuntimeError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(RuntimeError::Exit { code }) => code,
        Err(err) => {
            interpreter.write_line(&format!("Error: {}", err.message()));
            0
        }
    }
}

/// `tess run`: `argv` holds the arguments after the script name.
pub fn run_file(path: &str, args: &[String], cli: Options) -> Result<i32, TessError> {
    let script = script_path(path);
    let source = read_source(&script)?;
    let script_dir = script.parent().unwrap_or_else(|| Path::new("."));
    let (options, _) = resolve_options(script_dir, cli)?;
    debug!(script = %script.display(), ?options, "run");

    let mut interpreter = Interpreter::new().with_options(options);
    let argv: Vec<Value> = args.iter().map(|arg| Value::Str(arg.clone())).collect();
    interpreter
        .environment
        .set_variable("argv", Value::List(SharedList::from(argv)));
    run_program(&mut interpreter, &source)
}

/// `tess build`: there is no native backend, so the program is run instead.
pub fn build_file(path: &str, cli: Options, out: &mut dyn Write) -> Result<i32, TessError> {
    let script = script_path(path);
    writeln!(out, "Building '{}'...", script.display())?;
    writeln!(
        out,
        "Compiling to native executable '{}'...",
        script.with_extension("").display()
    )?;
    writeln!(
        out,
        "(Native compilation not yet implemented, running interpretation check instead)"
    )?;
    out.flush()?;
    run_file(path, &[], cli)
}

/// `tess exec`
pub fn exec(code: &str, options: Options) -> Result<i32, TessError> {
    let mut interpreter = Interpreter::new().with_options(options);
    run_program(&mut interpreter, code)
}

/// `tess check`: reports parse diagnostics; returns whether there were none.
pub fn check(path: &str, print_ast: bool, out: &mut dyn Write) -> Result<bool, TessError> {
    let script = script_path(path);
    let (program, diagnostics) = parse_source(&read_source(&script)?);
    for diagnostic in &diagnostics {
        writeln!(out, "{}", diagnostic)?;
    }
    if print_ast {
        let mut printer = AstPrinter {};
        for line in printer.print_program(&program) {
            writeln!(out, "{}", line)?;
        }
    }
    if diagnostics.is_empty() {
        writeln!(out, "Syntax check passed: {}", script.display())?;
    }
    Ok(diagnostics.is_empty())
}

/// `tess lint`: parse diagnostics followed by the resolver's findings.
pub fn lint(path: &str, out: &mut dyn Write) -> Result<bool, TessError> {
    let script = script_path(path);
    let (program, mut diagnostics) = parse_source(&read_source(&script)?);
    diagnostics.extend(resolver::lint(&program));
    for diagnostic in &diagnostics {
        writeln!(out, "{}: {}", script.display(), diagnostic)?;
    }
    if diagnostics.is_empty() {
        writeln!(out, "No problems found in {}", script.display())?;
    }
    Ok(diagnostics.is_empty())
}

/// `tess new`: a directory with a hello-world `main.tess` and an empty
/// package folder. An existing `main.tess` is left alone.
pub fn new_project(name: &str, out: &mut dyn Write) -> Result<(), TessError> {
    writeln!(out, "Creating new project '{}'...", name)?;
    let root = PathBuf::from(name);
    let packages = root.join(PACKAGE_DIR);
    fs::create_dir_all(&packages).map_err(|source| TessError::Io {
        path: packages.clone(),
        source,
    })?;
    let main = root.join(format!("main.{}", MODULE_EXT));
    let io_error = |source: io::Error| TessError::Io {
        path: main.clone(),
        source,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&main)
        .map_err(io_error)?;
    file.write_all(HELLO_WORLD.as_bytes()).map_err(io_error)?;
    writeln!(out, "Created {}", main.display())?;
    Ok(())
}

/// `tess info`: the version and the packages in `.tess_packages`.
pub fn info(root: &Path, out: &mut dyn Write) -> Result<(), TessError> {
    writeln!(out, "Tess Language v{}", VERSION)?;
    writeln!(out, "Installed packages:")?;
    let mut packages: Vec<String> = match fs::read_dir(root.join(PACKAGE_DIR)) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().map_or(false, |ext| ext == MODULE_EXT))
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .collect(),
        Err(err) => {
            debug!(%err, "no package directory");
            Vec::new()
        }
    };
    packages.sort();
    for package in packages {
        writeln!(out, "  {}", package)?;
    }
    Ok(())
}

/// `tess repl`: one line at a time against a single interpreter, echoing
/// string and number results of bare expressions. Ends on `exit`, end of input or `sys.exit`.
pub fn repl(input: &mut dyn BufRead, interpreter: &mut Interpreter) -> Result<i32, TessError> {
    interpreter.write_line(&format!("Tess REPL v{}", VERSION));
    interpreter.write_line("Type 'exit' to quit.");
    loop {
        interpreter.write_str(">> ");
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(0);
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        if line == "exit" {
            return Ok(0);
        }
        let (program, diagnostics) = parse_source(line);
        for diagnostic in &diagnostics {
            interpreter.write_line(&diagnostic.to_string());
        }
        for stmt in &program.statements {
            match (stmt, interpreter.execute(stmt)) {
                (Statement::Expression(_), Ok(Flow::Normal(value))) => match value {
                    Value::Number(_) | Value::Str(_) => interpreter.write_line(&value.to_string()),
                    _ => {}
                },
                (_, Ok(_)) => {}
                (_, Err(RuntimeError::Exit { code })) => return Ok(code),
                (_, Err(err)) => {
                    interpreter.write_line(&format!("Error: {}", err.message()));
                    break;
                }
            }
        }
    }
}
