extern crate clap;
extern crate dirs;
extern crate env_logger;
extern crate log;
extern crate rustyline;
extern crate semispace;

use std::fs::File;
use std::io;
use std::io::{BufReader, IsTerminal};
use std::process;

use clap::{App, Arg};

use rustyline::error::ReadlineError;
use rustyline::Editor;

use semispace::{HeapConfig, DEFAULT_HEAP_SIZE};

mod command;
mod error;
mod repl;

use crate::error::{err_usage, RuntimeError};
use crate::repl::Shell;

/// Parse and validate the heap size argument
fn heap_config(size: Option<&str>) -> Result<HeapConfig, RuntimeError> {
    let size = match size {
        Some(size) => size,
        None => return Ok(HeapConfig::default()),
    };

    size.parse::<usize>()
        .ok()
        .and_then(|size| HeapConfig::new(size).ok())
        .ok_or_else(|| err_usage("Heap size must be positive and even."))
}

/// Execute every line of a script file
fn read_file(config: HeapConfig, filename: &str) -> Result<(), RuntimeError> {
    let file = File::open(filename)?;

    let mut shell = Shell::new(config, io::stdout())?;
    shell.run_script(BufReader::new(file))
}

/// Execute commands piped in on stdin
fn read_stdin(config: HeapConfig) -> Result<(), RuntimeError> {
    let mut shell = Shell::new(config, io::stdout())?;
    shell.run_script(io::stdin().lock())
}

/// Read a line at a time and execute it
fn read_eval_loop(config: HeapConfig) -> Result<(), RuntimeError> {
    // establish a repl input history file path
    let history_file = dirs::home_dir().and_then(|mut path| {
        path.push(".gcrus_history");
        path.to_str().map(String::from)
    });

    // () means no completion support
    let mut reader = Editor::<()>::new();

    // Try to load the repl history file
    if let Some(ref path) = history_file {
        if let Err(err) = reader.load_history(&path) {
            log::debug!("could not read history: {}", err);
        }
    }

    let mut shell = Shell::new(config, io::stdout())?;

    loop {
        let readline = reader.readline("> ");

        match readline {
            // valid input
            Ok(line) => {
                reader.add_history_entry(&line);
                shell.run_line(&line)?;
            }

            // some kind of program termination condition
            Err(e) => {
                if let Some(ref path) = history_file {
                    reader.save_history(&path).unwrap_or_else(|err| {
                        eprintln!("could not save input history in {}: {}", path, err);
                    });
                }

                // EOF and ^C are fine
                return match e {
                    ReadlineError::Eof | ReadlineError::Interrupted => Ok(()),
                    _ => Err(RuntimeError::from(e)),
                };
            }
        }
    }
}

fn main() {
    env_logger::init();

    let default_size = DEFAULT_HEAP_SIZE.to_string();

    // parse command line arguments: an optional heap size and script file
    let matches = App::new("gcrus")
        .about("Drive a semispace garbage collected heap")
        .arg(
            Arg::with_name("size")
                .help("Heap size in bytes, positive and even")
                .default_value(&default_size)
                .index(1),
        )
        .arg(
            Arg::with_name("file")
                .short("f")
                .long("file")
                .takes_value(true)
                .help("Script of commands to run instead of reading input"),
        )
        .get_matches();

    let config = heap_config(matches.value_of("size")).unwrap_or_else(|err| {
        eprintln!("{}", err);
        eprintln!("{}", matches.usage());
        process::exit(1);
    });

    let result = if let Some(filename) = matches.value_of("file") {
        read_file(config, filename)
    } else if io::stdin().is_terminal() {
        read_eval_loop(config)
    } else {
        read_stdin(config)
    };

    result.unwrap_or_else(|err| {
        eprintln!("Terminated: {}", err);
        process::exit(1);
    });
}
