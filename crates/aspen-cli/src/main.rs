use std::fs;
use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;

use aspen_lexer::Lexer;
use aspen_parser::Parser as AspenParser;
use aspen_syntax::error::Error;

/// Compile an Aspen source file to MIPS assembly.
#[derive(Parser, Debug)]
#[command(name = "aspen-cli", about = "Compile Aspen source to MIPS assembly")]
struct Cli {
    /// Aspen source file
    source: PathBuf,

    /// Output path for the MIPS assembly text
    output: PathBuf,
}

/// Front-end (lexer/parser) failure: the position is glued directly to
/// the stage prefix with no separator, and the offending source line is
/// shown with a caret under the column carrying the detail.
///
/// The headline is styled as one fragment so the `Lexer error at line
/// L, column C` text stays contiguous on stderr.
fn render_front_error(kind: &str, source: &str, err: &Error) {
    match (err.line, err.col) {
        (Some(line), Some(col)) => {
            let headline = format!("{} at line {}, column {}", kind, line, col);
            eprintln!("{}", headline.red().bold());
            if let Some(src_line) = source.lines().nth(line - 1) {
                eprintln!("  {}", src_line.bright_black());
                let mut marker = String::new();
                if col > 1 {
                    marker.push_str(&" ".repeat(col - 1));
                }
                marker.push('^');
                eprintln!("  {} {}", marker.red(), err.msg.red());
            } else {
                eprintln!("  {}", err.msg.red());
            }
        }
        _ => eprintln!("{} {}", kind.red().bold(), err.msg.red()),
    }
}

/// Later stages keep the conventional `kind: message` form; the prefix
/// and its colon are one styled fragment for the same reason.
fn render_stage_error(kind: &str, msg: &str) {
    eprintln!("{}{}", format!("{}: ", kind).red().bold(), msg.red());
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            // --help / --version are not failures
            let ok = matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
            let _ = e.print();
            if ok {
                return;
            }
            std::process::exit(1);
        }
    };

    let src = match fs::read_to_string(&cli.source) {
        Ok(s) => s,
        Err(e) => {
            render_stage_error(
                "error",
                &format!("Failed to read {}: {}", cli.source.display(), e),
            );
            std::process::exit(1);
        }
    };

    let mut lexer = Lexer::new(&src);
    let tokens = match lexer.tokenize() {
        Ok(t) => t,
        Err(e) => {
            render_front_error("Lexer error", &src, &e);
            std::process::exit(1);
        }
    };

    let mut parser = AspenParser::new(tokens);
    let mut program = match parser.parse_program() {
        Ok(p) => p,
        Err(e) => {
            render_front_error("Parser error", &src, &e);
            std::process::exit(1);
        }
    };

    if let Err(e) = aspen_sema::analyze(&mut program) {
        render_stage_error("Semantic error", &e.to_string());
        std::process::exit(1);
    }

    let asm = aspen_codegen::generate(&program);
    if let Err(e) = fs::write(&cli.output, asm) {
        render_stage_error(
            "Code generation error",
            &format!("Failed to write {}: {}", cli.output.display(), e),
        );
        std::process::exit(1);
    }
}
