//! Command-line interface for tint
//! Tokenizes source files with a registered grammar and prints the scoped tokens.
//!
//! Usage:
//!   tint `<path>` [-l `<language>`] [-g `<grammar>`] [-f simple|json] [-c `<config>`]  - Tokenize a file
//!   tint --list-languages                                                     - List registered languages
//!   tint --check `<grammar>`                                                    - Validate a grammar file
//!   tint --nav                                                                - Print the site navigation

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tint::app::{AppError, Session};
use tint::tint_config::Loader;
use tint::tint_grammar::tint::formats::Format;

fn main() {
    env_logger::init();

    let matches = Command::new("tint")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Grammar-driven scope tokenizer for syntax highlighting")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the source file to tokenize")
                .required_unless_present_any(["list-languages", "check", "nav"])
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .short('l')
                .help("Language to tokenize as (default: from the file extension or config)"),
        )
        .arg(
            Arg::new("grammar")
                .long("grammar")
                .short('g')
                .help("Grammar file (.yaml, .yml or .json) to tokenize with")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: simple or json (default: from config)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("max-tokens")
                .long("max-tokens")
                .help("Stop after this many tokens (0 = unlimited)")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("list-languages")
                .long("list-languages")
                .help("List registered languages")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("check")
                .long("check")
                .help("Validate a grammar file and exit")
                .value_name("GRAMMAR")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("nav")
                .long("nav")
                .help("Print the configured site navigation")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), AppError> {
    if let Some(grammar) = matches.get_one::<PathBuf>("check") {
        println!("{}", Session::check_grammar(grammar)?);
        return Ok(());
    }

    let session = Session::new(load_config(matches)?)?;

    if matches.get_flag("list-languages") {
        handle_list_languages_command(&session);
        return Ok(());
    }
    if matches.get_flag("nav") {
        print!("{}", session.navigation());
        return Ok(());
    }

    let Some(path) = matches.get_one::<PathBuf>("path") else {
        return Ok(());
    };
    handle_tokenize_command(session, matches, path)
}

fn load_config(matches: &ArgMatches) -> Result<tint::tint_config::TintConfig, AppError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("highlight.format", format.as_str())?;
    }
    if let Some(max) = matches.get_one::<u32>("max-tokens") {
        loader = loader.set_override("highlight.max_tokens", i64::from(*max))?;
    }
    Ok(loader.build()?)
}

/// Handle the tokenize command
fn handle_tokenize_command(
    mut session: Session,
    matches: &ArgMatches,
    path: &Path,
) -> Result<(), AppError> {
    let mut language = matches.get_one::<String>("language").cloned();

    // A grammar given on the command line wins over the registry's languages
    if let Some(grammar) = matches.get_one::<PathBuf>("grammar") {
        let name = language.clone().unwrap_or_else(|| grammar_name(grammar));
        session.register_grammar_file(&name, grammar)?;
        language = Some(name);
    }

    let format: Format = session.default_format()?;
    let output = session.highlight_file(path, language.as_deref(), format)?;
    print!("{}", output);
    if format == Format::Json {
        println!();
    }
    Ok(())
}

/// Handle the list-languages command
fn handle_list_languages_command(session: &Session) {
    println!("Available languages:\n");
    for language in session.registry().list_languages() {
        println!("  {}", language);
    }
}

fn grammar_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("grammar")
        .to_string()
}
