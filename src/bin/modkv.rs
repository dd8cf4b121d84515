//! modkv Binary
//!
//! Runs commands against an in-process host, either from the command line or
//! line by line from stdin.

use std::io::{self, BufRead, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use modkv::protocol::{decode_request, encode_reply, format_reply, write_reply};
use modkv::{Config, Host, Reply};
use tracing_subscriber::{fmt, EnvFilter};

/// modkv
#[derive(Parser, Debug)]
#[command(name = "modkv")]
#[command(about = "In-process key-value host with counter and greeting modules")]
#[command(version)]
struct Args {
    /// Used-memory ceiling in bytes for deny-oom commands (0 = unlimited)
    #[arg(long, default_value = "0")]
    maxmemory: usize,

    /// Largest allocation a module may request, in bytes
    #[arg(long, default_value = "536870912")]
    max_alloc: usize,

    /// Longest key name, in bytes
    #[arg(long, default_value = "536870912")]
    max_key_len: usize,

    /// Do not load the counter module
    #[arg(long)]
    no_counter: bool,

    /// Do not load the greeting module
    #[arg(long)]
    no_greet: bool,

    /// Speak RESP on stdin/stdout instead of inline commands
    #[arg(long)]
    resp: bool,

    /// Inline command to run (repeatable); stdin is not read when given
    #[arg(short, long = "command")]
    command: Vec<String>,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only replies
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,modkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("modkv v{}", modkv::VERSION);

    let config = match Config::builder()
        .maxmemory(args.maxmemory)
        .max_alloc(args.max_alloc)
        .max_key_len(args.max_key_len)
        .load_counter(!args.no_counter)
        .load_greet(!args.no_greet)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let host = match Host::open(config) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Failed to start host: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = if !args.command.is_empty() {
        run_commands(&host, &args.command)
    } else if args.resp {
        run_resp(&host)
    } else {
        run_inline(&host)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Execute each `--command` and print its reply
fn run_commands(host: &Host, commands: &[String]) -> modkv::Result<()> {
    let mut stdout = io::stdout().lock();
    for line in commands {
        print_inline(host, line, &mut stdout)?;
    }
    Ok(())
}

/// Read inline commands from stdin until EOF or QUIT
fn run_inline(host: &Host) -> modkv::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().eq_ignore_ascii_case("quit") {
            break;
        }
        print_inline(host, &line, &mut stdout)?;
    }
    Ok(())
}

fn print_inline<W: Write>(host: &Host, line: &str, out: &mut W) -> modkv::Result<()> {
    let reply = match host.execute_inline(line) {
        Ok(Some(reply)) => reply,
        Ok(None) => return Ok(()),
        Err(e) => Reply::error(format!("ERR {}", e)),
    };
    writeln!(out, "{}", format_reply(&reply))?;
    Ok(())
}

/// Read multibulk requests from stdin and answer in RESP
fn run_resp(host: &Host) -> modkv::Result<()> {
    let mut input = Vec::new();
    io::stdin().lock().read_to_end(&mut input)?;

    let mut stdout = io::stdout().lock();
    let mut pos = 0;
    while pos < input.len() {
        match decode_request(&input[pos..]) {
            Ok(Some((argv, consumed))) => {
                pos += consumed;
                write_reply(&mut stdout, &host.execute(&argv))?;
            }
            Ok(None) => {
                tracing::warn!("Ignoring {} trailing bytes of incomplete request", input.len() - pos);
                break;
            }
            Err(e) => {
                let reply = Reply::error(format!("ERR {}", e));
                stdout.write_all(&encode_reply(&reply))?;
                return Err(e);
            }
        }
    }
    Ok(())
}
