//! `liveid simulate` — replays a recorded event trace through the liveness
//! state machine and prints every transition and directive. Traces are a
//! JSON array of events:
//!
//! ```json
//! [
//!   {"event": "face", "left_eye": [[0.0,0.0], ...], "right_eye": [...], "yaw": 0.0},
//!   {"event": "no_face"},
//!   {"event": "tick"}
//! ]
//! ```

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;
use std::path::PathBuf;

use liveid_core::{
    DetectorConfig, FacialObservation, LivenessEvent, LivenessSession,
};
use liveid_flow::Config;

#[derive(Args)]
pub struct SimulateArgs {
    /// JSON trace file to replay
    #[arg(long)]
    trace: PathBuf,
}

#[derive(Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum TraceEvent {
    Face(FacialObservation),
    NoFace,
    Tick,
}

impl From<TraceEvent> for LivenessEvent {
    fn from(event: TraceEvent) -> Self {
        match event {
            TraceEvent::Face(observation) => LivenessEvent::Face(observation),
            TraceEvent::NoFace => LivenessEvent::NoFace,
            TraceEvent::Tick => LivenessEvent::Tick,
        }
    }
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.trace)
        .with_context(|| format!("failed to read {}", args.trace.display()))?;
    let events: Vec<TraceEvent> =
        serde_json::from_str(&raw).context("trace is not a valid JSON event array")?;

    let detector: DetectorConfig = {
        let config = Config::from_env();
        config.detector()
    };
    let mut session = LivenessSession::new(detector);

    println!("initial state: {:?}", session.state());

    for (i, event) in events.into_iter().enumerate() {
        let event: LivenessEvent = event.into();
        let label = match &event {
            LivenessEvent::Face(observation) => format!("face yaw={:.2}", observation.yaw),
            LivenessEvent::NoFace => "no_face".to_string(),
            LivenessEvent::Tick => "tick".to_string(),
        };
        let directives = session.handle(event);

        print!("[{i:>3}] {label:<16} -> {:?}", session.state());
        if let Some(remaining) = session.countdown_remaining() {
            print!(" (countdown {remaining})");
        }
        println!();
        for directive in &directives {
            println!("      {directive:?}");
        }
    }

    println!("final state: {:?}", session.state());
    Ok(())
}
