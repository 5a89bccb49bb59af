//! Interactive command loop over a [`FileProcessor`]

use crate::config::Config;
use crate::encryption::{EncryptionType, generate_key};
use crate::exceptions::{FileprocError, Result};
use crate::logger::{Observer, field};
use crate::pipeline::Params;
use crate::processor::FileProcessor;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

pub const PROMPT: &str = "> ";

pub const HELP: &str = "\
Available commands:
  load <file_path>               Load a file to process
  apply <operation> [k=v ...]    Add a processing step to the pipeline
    compress type=<zip|gzip>
    decompress type=<zip|gzip>
    encrypt type=<aes|rsa> key_file=<path>
    decrypt type=<aes|rsa> key_file=<path>
    calculate type=<regex|parser|library>
  process <output_path>          Run the pipeline and save the result
  save-pipeline <file_path>      Save the current pipeline to a file
  load-pipeline <file_path>      Load a pipeline from a file
  gen-key <aes|rsa> <path>       Generate a new encryption key
  help                           Show this help message
  exit                           Exit the shell";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(PathBuf),
    Apply { operation: String, params: Params },
    Process(PathBuf),
    SavePipeline(PathBuf),
    LoadPipeline(PathBuf),
    GenKey { kind: EncryptionType, path: PathBuf },
    Help,
    Exit,
}

fn usage(msg: &str) -> FileprocError {
    FileprocError::Config(msg.to_string())
}

fn single_path(args: &[&str], msg: &str) -> Result<PathBuf> {
    match args {
        [path] => Ok(PathBuf::from(path)),
        _ => Err(usage(msg)),
    }
}

/// Parse `key=value` tokens. The value may itself contain `=`.
pub fn parse_params(tokens: &[&str]) -> Result<Params> {
    tokens
        .iter()
        .map(|token| match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(usage(&format!("invalid parameter format: {token}"))),
        })
        .collect()
}

/// Parse one input line; `Ok(None)` for a blank line
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((verb, args)) = parts.split_first() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "load" => Command::Load(single_path(args, "load command requires a file path")?),
        "process" => Command::Process(single_path(
            args,
            "process command requires an output file path",
        )?),
        "save-pipeline" => Command::SavePipeline(single_path(
            args,
            "save-pipeline command requires a file path",
        )?),
        "load-pipeline" => Command::LoadPipeline(single_path(
            args,
            "load-pipeline command requires a file path",
        )?),
        "apply" => {
            let Some((operation, rest)) = args.split_first() else {
                return Err(usage("apply command requires an operation type"));
            };
            Command::Apply {
                operation: operation.to_ascii_lowercase(),
                params: parse_params(rest)?,
            }
        }
        "gen-key" => match args {
            [kind, path] => Command::GenKey {
                kind: kind.parse()?,
                path: PathBuf::from(path),
            },
            _ => return Err(usage("gen-key command requires algorithm and path")),
        },
        "help" => Command::Help,
        "exit" | "quit" => Command::Exit,
        other => return Err(usage(&format!("unknown command: {other}"))),
    };
    Ok(Some(command))
}

/// Whether the loop keeps reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub struct Shell {
    processor: FileProcessor,
    config: Config,
    observer: Arc<dyn Observer>,
}

impl Shell {
    pub fn new(config: Config, observer: Arc<dyn Observer>) -> Self {
        Shell {
            processor: FileProcessor::new(Arc::clone(&observer)),
            config,
            observer,
        }
    }

    pub fn processor(&self) -> &FileProcessor {
        &self.processor
    }

    /// Run one command, writing any user-facing output to `out`
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Flow> {
        match command {
            Command::Load(path) => self.processor.load(&path)?,
            Command::Apply { operation, params } => self.processor.apply(&operation, params),
            Command::Process(path) => self.processor.process_file(&path)?,
            Command::SavePipeline(path) => self.processor.save_pipeline(&path)?,
            Command::LoadPipeline(path) => self.processor.load_pipeline(&path)?,
            Command::GenKey { kind, path } => {
                for written in generate_key(kind, &path, self.config.rsa_key_bits)? {
                    writeln!(out, "Key written to {}", written.display())?;
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands until `exit` or end of input. Command failures are
    /// reported and the session continues.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        self.observer.info("Shell started");
        writeln!(out, "File Processing shell. Type 'exit' to quit.")?;
        writeln!(
            out,
            "Commands: load, apply, process, save-pipeline, load-pipeline, gen-key, help, exit"
        )?;

        let mut lines = input.lines();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            let outcome = parse_command(&line).and_then(|command| match command {
                Some(command) => {
                    self.observer
                        .with_fields(&[field("command", line.trim())])
                        .debug("Executing command");
                    self.execute(command, &mut out)
                }
                None => Ok(Flow::Continue),
            });

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => {
                    self.observer
                        .with_fields(&[field("error", &e)])
                        .error("Command failed");
                    writeln!(out, "Error: {e}")?;
                }
            }
        }

        self.observer.info("Shell shutting down");
        writeln!(out, "Exiting.")?;
        Ok(())
    }
}
