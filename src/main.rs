//! Memory Allocation Simulator - Main Entry Point
//!
//! Usage: mmu-sim [OPTIONS] <PAGE_SIZE>
//!
//! Reads commands from stdin, one per line, until `exit` or end of input.

use std::io::{self, BufRead, Write};
use std::process;

use anyhow::{anyhow, Context, Result};
use clap::{App, Arg};
use log::LevelFilter;

use mmu_sim::command::Command;
use mmu_sim::constants::DEFAULT_MEMORY_SIZE;
use mmu_sim::{Config, Simulator};

mod logger;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn parse_args() -> Result<Config> {
    let default_memory = DEFAULT_MEMORY_SIZE.to_string();
    let matches = App::new("mmu-sim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Memory allocation simulator with paged virtual address spaces")
        .arg(
            Arg::with_name("PAGE_SIZE")
                .help("Page size in bytes: a power of two between 2048 and 16384")
                .required(true),
        )
        .arg(
            Arg::with_name("memory-size")
                .long("memory-size")
                .value_name("BYTES")
                .takes_value(true)
                .default_value(&default_memory)
                .help("Size of simulated physical memory"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log allocations, merges and page mappings to stderr"),
        )
        .get_matches();

    let page_size = matches.value_of("PAGE_SIZE").context("missing page size")?;
    let page_size: u32 = page_size
        .parse()
        .with_context(|| format!("page size '{}' is not a number", page_size))?;
    let memory_size = matches.value_of("memory-size").context("missing memory size")?;
    let memory_size: u32 = memory_size
        .parse()
        .with_context(|| format!("memory size '{}' is not a number", memory_size))?;

    let mut config = Config::new(page_size).with_memory_size(memory_size);
    config.verbose = matches.is_present("verbose");
    Ok(config)
}

fn run() -> Result<()> {
    let config = parse_args()?;

    let level = if config.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    logger::init(level).map_err(|e| anyhow!("cannot install logger: {}", e))?;

    let mut simulator = Simulator::new(config).context("cannot start simulator")?;
    print_start_message(simulator.config().page_size);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt(&mut stdout)?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read command")?;
        match Command::parse(&line) {
            Ok(Some(Command::Exit)) => break,
            Ok(Some(command)) => match simulator.execute(&command) {
                Ok(output) if output.is_empty() => {}
                Ok(output) => println!("{}", output.trim_end()),
                Err(e) => println!("error: {}", e),
            },
            Ok(None) => {}
            Err(message) => println!("error: {}", message),
        }
        prompt(&mut stdout)?;
    }

    Ok(())
}

fn prompt(stdout: &mut io::Stdout) -> Result<()> {
    print!("> ");
    stdout.flush().context("failed to flush stdout")
}

const COMMANDS: &str = "\
Commands:
  create <text_size> <data_size>
      start a process and print its PID; a size of 0 skips that region
  allocate <PID> <var_name> <data_type> <count>
      allocate a variable and print its virtual address
  set <PID> <var_name> <offset> <value_0> ...
      store values starting at element <offset>
  free <PID> <var_name>
      release a variable
  terminate <PID>
      end a process and release its memory
  print mmu | page | processes | <PID>:<var_name>
      show a table or a variable's values
  exit
";

fn print_start_message(page_size: u32) {
    println!("Memory allocation simulator, page size {} bytes.", page_size);
    println!("{}", COMMANDS);
}
