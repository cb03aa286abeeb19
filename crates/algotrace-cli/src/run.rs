//! Run command - drain one algorithm and export its timeline
//!
//! Events stream to stdout as JSON lines while the run advances, so a
//! faulting run still leaves every event it emitted before the fault. A
//! one-line JSON summary goes to stderr at the end.
//!
//! Exit status: 0 on success, 2 when the input or a parameter is rejected, 1
//! when the run faults or breaks the event protocol.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use algotrace_engine::{
    Algorithm, Engine, EngineConfig, EngineError, Input, ParamValue, Params, RunHandle, RunState,
    Step,
};
use algotrace_protocol::{Event, Payload};
use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use serde::Serialize;

const REJECTED: u8 = 2;

/// Arguments for the run command
#[derive(Args)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["numbers", "text", "pair", "size"])
))]
pub struct RunArgs {
    /// Algorithm id (see `algotrace list`)
    pub id: String,

    /// Comma- or space-separated integers, e.g. `5,3,-2`
    #[arg(long, allow_hyphen_values = true)]
    pub numbers: Option<String>,

    /// A single string, e.g. `"(()[])"`
    #[arg(long)]
    pub text: Option<String>,

    /// Two strings: a text and a pattern
    #[arg(long, num_args = 2, value_names = ["TEXT", "PATTERN"])]
    pub pair: Option<Vec<String>>,

    /// A problem size (board width, disk count, n)
    #[arg(long)]
    pub size: Option<u32>,

    /// Parameter override, repeatable: `--param pivot=middle`
    #[arg(short, long = "param", value_parser = Params::parse_assignment)]
    pub params: Vec<(String, ParamValue)>,

    /// Fault the run after this many events
    #[arg(long)]
    pub limit: Option<u64>,

    /// Pretty-print each event
    #[arg(long)]
    pub pretty: bool,

    /// Print the replayed frame after this many events instead of the events
    #[arg(long)]
    pub frame: Option<usize>,
}

impl RunArgs {
    fn input(&self) -> Result<Input, String> {
        if let Some(raw) = &self.numbers {
            return Input::parse_numbers(raw);
        }
        if let Some(text) = &self.text {
            return Ok(Input::Text(text.clone()));
        }
        if let Some([text, pattern]) = self.pair.as_deref() {
            return Ok(Input::TextPair {
                text: text.clone(),
                pattern: pattern.clone(),
            });
        }
        match self.size {
            Some(n) => Ok(Input::Size(n)),
            None => Err("no input given".to_string()),
        }
    }
}

/// Written to stderr once the run stops.
#[derive(Serialize)]
struct RunSummary<'a> {
    algorithm: &'a str,
    events: usize,
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn state_name(state: &RunState) -> &'static str {
    match state {
        RunState::Running => "running",
        RunState::Finished => "finished",
        RunState::Cancelled => "cancelled",
        RunState::Faulted(_) => "faulted",
        RunState::Violated(_) => "violated",
    }
}

fn caption(events: &[Event]) -> Option<&str> {
    events.last().and_then(|e| match &e.payload {
        Payload::Result { caption, .. } => Some(caption.as_str()),
        _ => None,
    })
}

fn reject(message: impl std::fmt::Display) -> Result<ExitCode> {
    eprintln!("{message}");
    Ok(ExitCode::from(REJECTED))
}

/// Execute the run command
pub fn execute(args: RunArgs) -> Result<ExitCode> {
    let algorithm = algotrace_algorithms::registry()
        .get(&args.id)
        .with_context(|| format!("no algorithm registered as `{}`", args.id))?;
    let descriptor = algorithm.descriptor();

    let input = match args.input() {
        Ok(input) => input,
        Err(message) => return reject(message),
    };

    let params: Params = args.params.iter().cloned().collect();
    for spec in &descriptor.parameters {
        if let Some(value) = params.get(&spec.key) {
            if let Err(message) = spec.check(value) {
                return reject(message);
            }
        }
    }

    let config = args.limit.map_or_else(EngineConfig::default, EngineConfig::bounded);
    let mut handle = match Engine::new(config).start(algorithm.as_ref(), input, &params) {
        Ok(handle) => handle,
        Err(EngineError::Validation(message)) => return reject(message),
        Err(other) => return Err(other.into()),
    };

    let failure = match args.frame {
        Some(_) => handle.drain().err(),
        None => stream(&mut handle, args.pretty)?,
    };

    let summary = RunSummary {
        algorithm: handle.algorithm(),
        events: handle.events().len(),
        state: state_name(handle.state()),
        result: caption(handle.events()),
        error: failure.as_ref().map(ToString::to_string),
    };
    eprintln!("{}", serde_json::to_string(&summary)?);

    if let Some(position) = args.frame {
        let mut timeline = handle.into_timeline();
        timeline.seek(position);
        let frame = timeline.frame();
        let out = if args.pretty {
            serde_json::to_string_pretty(&frame)?
        } else {
            serde_json::to_string(&frame)?
        };
        println!("{out}");
    }

    Ok(match failure {
        None => ExitCode::SUCCESS,
        Some(_) => ExitCode::FAILURE,
    })
}

/// Print events as they are produced; returns the error that ended the run,
/// if any.
fn stream(handle: &mut RunHandle, pretty: bool) -> Result<Option<EngineError>> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let failure = loop {
        match handle.step() {
            Ok(Step::Event(event)) => {
                if pretty {
                    serde_json::to_writer_pretty(&mut out, &event)?;
                } else {
                    serde_json::to_writer(&mut out, &event)?;
                }
                writeln!(out)?;
            }
            Ok(Step::Done) => break None,
            Err(err) => break Some(err),
        }
    };
    out.flush().context("failed to flush stdout")?;
    Ok(failure)
}
