//! Playback controls over a materialized run.
//!
//! A [`Timeline`] never re-runs the algorithm: jumping to step N folds the
//! first N events into a [`Frame`].

use std::collections::{BTreeMap, BTreeSet};

use algotrace_protocol::{
    AuxSnapshot, Cursor, Event, MarkType, Outcome, Payload, Relation, Severity, Watch,
};
use serde::{Deserialize, Serialize};

/// Playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlaybackSpeed {
    /// Pause playback
    Paused,
    /// 0.25x speed
    QuarterSpeed,
    /// 0.5x speed
    HalfSpeed,
    /// Normal speed (1x)
    Normal,
    /// 2x speed
    Double,
    /// 4x speed
    Quadruple,
    /// As fast as possible
    Maximum,
}

impl PlaybackSpeed {
    /// Get the speed multiplier.
    pub fn multiplier(&self) -> f64 {
        match self {
            PlaybackSpeed::Paused => 0.0,
            PlaybackSpeed::QuarterSpeed => 0.25,
            PlaybackSpeed::HalfSpeed => 0.5,
            PlaybackSpeed::Normal => 1.0,
            PlaybackSpeed::Double => 2.0,
            PlaybackSpeed::Quadruple => 4.0,
            PlaybackSpeed::Maximum => f64::INFINITY,
        }
    }

    /// Milliseconds to hold an event at this speed.
    ///
    /// A message's `delay_hint` replaces `base_ms` for that event. Pacing is
    /// advisory; `None` means playback does not advance.
    pub fn ms_per_event(&self, base_ms: u64, delay_hint: Option<u32>) -> Option<u64> {
        let base = delay_hint.map_or(base_ms, u64::from);
        match self {
            PlaybackSpeed::Paused => None,
            PlaybackSpeed::Maximum => Some(0),
            speed => Some((base as f64 / speed.multiplier()) as u64),
        }
    }
}

/// Current state of playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Stopped at the beginning
    Stopped,
    /// Running forward
    Playing,
    /// Paused
    Paused,
    /// Reached the end
    Finished,
}

/// Scrubbable, replayable view of one run.
#[derive(Debug, Clone)]
pub struct Timeline {
    algorithm: &'static str,
    pseudocode: &'static [&'static str],
    initial: Vec<i64>,
    events: Vec<Event>,
    position: usize,
    state: PlaybackState,
    speed: PlaybackSpeed,
    loop_enabled: bool,
}

impl Timeline {
    /// `initial` is the array the run started from; empty for non-array
    /// inputs.
    pub fn new(
        algorithm: &'static str,
        pseudocode: &'static [&'static str],
        initial: Vec<i64>,
        events: Vec<Event>,
    ) -> Self {
        Self {
            algorithm,
            pseudocode,
            initial,
            events,
            position: 0,
            state: PlaybackState::Stopped,
            speed: PlaybackSpeed::Normal,
            loop_enabled: false,
        }
    }

    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }

    pub fn pseudocode(&self) -> &'static [&'static str] {
        self.pseudocode
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events applied so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Jump so that exactly `position` events are applied (clamped).
    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.events.len());
        if self.position == self.events.len() && !self.loop_enabled {
            self.state = PlaybackState::Finished;
        }
    }

    pub fn play(&mut self) {
        if self.position >= self.events.len() {
            self.position = 0;
        }
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Stop and rewind.
    pub fn stop(&mut self) {
        self.position = 0;
        self.state = PlaybackState::Stopped;
    }

    pub fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.speed = speed;
        if matches!(speed, PlaybackSpeed::Paused) {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    /// Apply the next event and return it.
    pub fn step_forward(&mut self) -> Option<&Event> {
        if self.position >= self.events.len() {
            return None;
        }
        let event = &self.events[self.position];
        self.position += 1;
        if self.position >= self.events.len() {
            if self.loop_enabled {
                self.position = 0;
            } else {
                self.state = PlaybackState::Finished;
            }
        }
        Some(event)
    }

    pub fn step_backward(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.state = PlaybackState::Paused;
        }
    }

    pub fn events_in_range(&self, start: usize, end: usize) -> &[Event] {
        let start = start.min(self.events.len());
        let end = end.clamp(start, self.events.len());
        &self.events[start..end]
    }

    /// The applied prefix.
    pub fn events_to_current(&self) -> &[Event] {
        &self.events[..self.position]
    }

    /// The event the next `step_forward` applies.
    pub fn current_event(&self) -> Option<&Event> {
        self.events.get(self.position)
    }

    /// Fraction of events applied, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        if self.events.is_empty() {
            0.0
        } else {
            self.position as f64 / self.events.len() as f64
        }
    }

    /// How long to wait before applying the next event.
    pub fn next_delay_ms(&self, base_ms: u64) -> Option<u64> {
        let hint = match self.current_event().map(|e| &e.payload) {
            Some(Payload::Message { delay_ms, .. }) => *delay_ms,
            _ => None,
        };
        self.speed.ms_per_event(base_ms, hint)
    }

    /// State after the applied prefix.
    pub fn frame(&self) -> Frame {
        Frame::replay(&self.initial, self.events_to_current())
    }

    /// Pseudocode text of the lines highlighted at the current position.
    pub fn highlighted_source(&self) -> Vec<&'static str> {
        self.frame()
            .lines
            .iter()
            .filter_map(|&line| self.pseudocode.get(line.checked_sub(1)?).copied())
            .collect()
    }
}

/// Playback status for sending to a front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackStatus {
    pub algorithm: String,
    pub position: usize,
    pub total_events: usize,
    pub state: PlaybackState,
    pub speed: PlaybackSpeed,
    pub progress: f64,
    pub loop_enabled: bool,
}

impl From<&Timeline> for PlaybackStatus {
    fn from(timeline: &Timeline) -> Self {
        Self {
            algorithm: timeline.algorithm.to_string(),
            position: timeline.position,
            total_events: timeline.len(),
            state: timeline.state,
            speed: timeline.speed,
            progress: timeline.progress(),
            loop_enabled: timeline.loop_enabled,
        }
    }
}

/// Everything a renderer needs to draw one step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    /// Sequence of the last applied event.
    pub sequence: Option<u64>,
    pub array: Vec<i64>,
    pub marks: BTreeMap<usize, BTreeSet<MarkType>>,
    pub comparing: Option<([usize; 2], Relation)>,
    pub pointers: Vec<Cursor>,
    pub values: Vec<Watch>,
    pub caption: Option<String>,
    pub lines: Vec<usize>,
    /// Latest snapshot per auxiliary `type`.
    pub auxiliary: BTreeMap<&'static str, AuxSnapshot>,
    pub message: Option<(String, Severity)>,
    pub result: Option<(Outcome, String)>,
}

impl Frame {
    /// Fold `events` over the starting array.
    pub fn replay(initial: &[i64], events: &[Event]) -> Self {
        let mut frame = Frame {
            array: initial.to_vec(),
            ..Frame::default()
        };
        for event in events {
            frame.apply(event);
        }
        frame
    }

    pub fn apply(&mut self, event: &Event) {
        self.sequence = Some(event.sequence);
        match &event.payload {
            Payload::Set { index, value } => {
                // Untracked runs can name positions past the array; drop those.
                if let Some(slot) = self.array.get_mut(*index) {
                    *slot = *value;
                }
            }
            Payload::Compare { indices, relation } => {
                self.comparing = Some((*indices, *relation));
            }
            Payload::Mark { indices, mark } => {
                for &i in indices {
                    self.marks.entry(i).or_default().insert(*mark);
                }
            }
            Payload::Unmark { indices } => {
                for i in indices {
                    self.marks.remove(i);
                }
            }
            Payload::Push { .. } | Payload::Pop { .. } => {}
            Payload::Pointer {
                pointers,
                values,
                caption,
            } => {
                self.pointers = pointers.clone();
                self.values = values.clone();
                self.caption = caption.clone();
            }
            Payload::Highlight { lines } => self.lines = lines.clone(),
            Payload::Message { text, severity, .. } => {
                self.message = Some((text.clone(), *severity));
            }
            Payload::Auxiliary { snapshot } => {
                self.auxiliary.insert(snapshot.type_name(), snapshot.clone());
            }
            Payload::Result { outcome, caption } => {
                self.result = Some((outcome.clone(), caption.clone()));
            }
        }
    }

    /// Positions carrying `mark`, ascending.
    pub fn marked(&self, mark: MarkType) -> Vec<usize> {
        self.marks
            .iter()
            .filter(|(_, tags)| tags.contains(&mark))
            .map(|(&i, _)| i)
            .collect()
    }
}
