//! CLI tool to inspect the tokens of LPD source files.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use lpd_lexer::{Scanner, TokenKind, format_token};

/// Program written by `lpdlex demo`.
const DEMO_PROGRAM: &str = "prg Exemplo_01;\nbegin\n write(\"Olá mundo!\");\nend\n";

const DEMO_PATH: &str = "teste.lpd";

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        usage();
        return ExitCode::from(2);
    }

    let command = args[1].as_str();
    let mut keep_going = false;
    let mut files = Vec::new();
    for arg in &args[2..] {
        match arg.as_str() {
            "--keep-going" | "-k" => keep_going = true,
            _ => files.push(arg.as_str()),
        }
    }

    match command {
        "demo" => {
            if files.len() > 1 {
                eprintln!("Error: demo takes at most one path");
                return ExitCode::from(2);
            }
            let path = files.first().copied().unwrap_or(DEMO_PATH);
            demo(path, keep_going)
        }
        "tokens" | "check" => {
            if files.is_empty() {
                eprintln!("Error: no files specified");
                return ExitCode::from(2);
            }
            let print = command == "tokens";
            let mut had_error = false;
            for path in files {
                had_error |= !scan_file(path, print, keep_going);
            }
            if had_error {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        _ => {
            eprintln!("Unknown command: {command}");
            ExitCode::from(2)
        }
    }
}

fn usage() {
    eprintln!("Usage: lpdlex <command> [--keep-going] [files...]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  tokens    Print the tokens of each file");
    eprintln!("  check     Report whether each file scans without errors");
    eprintln!("  demo      Write a sample program and print its tokens");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -k, --keep-going  Continue past lexical errors");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  lpdlex tokens program.lpd");
    eprintln!("  lpdlex check -k a.lpd b.lpd");
    eprintln!("  lpdlex demo {DEMO_PATH}");
}

/// Enable tracing output when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn demo(path: &str, keep_going: bool) -> ExitCode {
    if let Err(e) = fs::write(path, DEMO_PROGRAM) {
        eprintln!("{path}: cannot write demo program: {e}");
        return ExitCode::FAILURE;
    }
    if scan_file(path, true, keep_going) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Scan one file, printing tokens if asked. Returns `true` when the
/// file scanned without lexical errors.
fn scan_file(path: &str, print: bool, keep_going: bool) -> bool {
    let mut scanner = match Scanner::open(Path::new(path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return false;
        }
    };

    let mut errors = 0usize;
    let mut count = 0usize;
    loop {
        let token = scanner.next_token();
        count += 1;
        if print {
            println!("{}", format_token(&token));
        }
        match token.kind() {
            TokenKind::EndOfInput => break,
            TokenKind::LexicalError => {
                errors += 1;
                if !keep_going {
                    break;
                }
            }
            _ => {}
        }
    }
    scanner.close();

    for diagnostic in scanner.diagnostics() {
        let severity = if diagnostic.is_warning() {
            "warning"
        } else {
            "error"
        };
        eprintln!("{path}:{}: {severity}: {}", diagnostic.line, diagnostic.kind);
    }

    if errors == 0 {
        eprintln!("{path}: ok ({count} token(s))");
        true
    } else {
        eprintln!("{path}: {errors} lexical error(s)");
        false
    }
}
