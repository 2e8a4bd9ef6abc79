#![forbid(unsafe_code)]

//! JSONL session traces.
//!
//! Every simulated input, delivered crossing and host effect is appended as
//! one record with a deterministic step stamp (`T000000`, `T000001`, ...),
//! so two runs of the same script produce byte-identical traces.

use serde::Serialize;

/// One trace record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    Mount {
        sections: usize,
        images: usize,
        slides: usize,
    },
    Scroll {
        y: f64,
    },
    Crossing {
        watcher: String,
        element: String,
        intersecting: bool,
        ratio: f64,
    },
    Click {
        element: String,
        prevent_default: bool,
    },
    Key {
        key: String,
    },
    Hover {
        element: String,
        enter: bool,
    },
    ScrollIntoView {
        element: String,
    },
    AwaitLoad {
        element: String,
    },
    Loaded {
        element: String,
    },
}

#[derive(Debug, Clone, Serialize)]
struct Record<'a> {
    run_id: &'a str,
    ts: String,
    #[serde(flatten)]
    event: &'a TraceEvent,
}

/// Ordered list of trace events for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionTrace {
    run_id: String,
    events: Vec<TraceEvent>,
}

impl SessionTrace {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    #[must_use]
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Render as JSON lines, one record per event.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        let mut out = String::new();
        for (step, event) in self.events.iter().enumerate() {
            let record = Record {
                run_id: &self.run_id,
                ts: format!("T{step:06}"),
                event,
            };
            out.push_str(&serde_json::to_string(&record)?);
            out.push('\n');
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn jsonl_records_are_stamped_in_order() {
        let mut trace = SessionTrace::new("landing_seed0");
        trace.push(TraceEvent::Key {
            key: "Escape".into(),
        });
        trace.push(TraceEvent::Scroll { y: 250.0 });

        let jsonl = trace.to_jsonl().unwrap();
        let lines: Vec<serde_json::Value> = jsonl
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["ts"], "T000000");
        assert_eq!(lines[0]["event"], "key");
        assert_eq!(lines[0]["key"], "Escape");
        assert_eq!(lines[1]["run_id"], "landing_seed0");
        assert_eq!(lines[1]["event"], "scroll");
        assert_eq!(lines[1]["y"], 250.0);
    }
}
