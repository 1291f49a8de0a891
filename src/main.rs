use clap::{Arg, Command};
use otter::{repl, runner, AnnotationMode, DiagnosticStyle, Scope, SessionConfig};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::Path;

fn main() {
    let matches = Command::new("otter")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive interpreter for the OtterScript language")
        .arg(
            Arg::new("file")
                .help("A script to run line by line")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start the interactive session (after FILE, if given)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("prompt")
                .long("prompt")
                .value_name("TEXT")
                .help("Prompt shown before each line")
                .default_value(">> "),
        )
        .arg(
            Arg::new("annotation-mode")
                .long("annotation-mode")
                .value_name("MODE")
                .help("How ';' is read: as a type annotation marker or always as a terminator")
                .value_parser(["annotation", "terminator"])
                .default_value("annotation"),
        )
        .arg(
            Arg::new("tokens")
                .long("tokens")
                .help("Print the classified tokens of every line")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Do not echo declarations")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Show diagnostics as full reports with a source excerpt")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let mode = match matches.get_one::<String>("annotation-mode").map(String::as_str) {
        Some("terminator") => AnnotationMode::Terminator,
        _ => AnnotationMode::Annotation,
    };

    let diagnostics = if matches.get_flag("report") {
        DiagnosticStyle::Report {
            color: io::stderr().is_terminal(),
        }
    } else {
        DiagnosticStyle::Plain
    };

    let config = SessionConfig {
        prompt: matches
            .get_one::<String>("prompt")
            .cloned()
            .unwrap_or_else(|| ">> ".to_string()),
        mode,
        show_tokens: matches.get_flag("tokens"),
        echo_declarations: !matches.get_flag("quiet"),
        diagnostics,
        ..SessionConfig::default()
    };

    let mut scope = Scope::new();
    if let Some(file_path) = matches.get_one::<String>("file") {
        scope = run_file(file_path, config.clone());
        if !matches.get_flag("interactive") {
            return;
        }
    }

    if let Err(error) = repl::start(config, scope) {
        eprintln!("There was an error launching the session: {}", error);
        std::process::exit(1);
    }
}

fn run_file(path: &str, config: SessionConfig) -> Scope {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let config = SessionConfig {
        origin: Some(path.display().to_string()),
        ..config
    };
    match runner::run(&source, config, Scope::new(), io::stdout(), io::stderr()) {
        Ok(scope) => scope,
        Err(e) => {
            eprintln!("Error running '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}
