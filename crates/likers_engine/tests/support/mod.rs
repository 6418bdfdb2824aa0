#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use likers_core::{InteractionRecord, SessionState};
use likers_engine::{
    Device, DeviceError, Direction, InteractionContext, InteractionOutcome, InteractionPolicy,
    Selector, LIKERS_FACEPILE, LIKES_COUNT,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(campaign_logging::initialize_for_tests);
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    OpenUrl(String),
    Swipe(Direction, f32),
    Fling(Direction),
    Wait(Selector),
    Click(Selector),
    Restart,
    StartRecording,
    StopRecording { keep: bool },
}

/// Scripted device. Every opened reactor list shows the same pages; each
/// swipe or fling moves to the next page and the last page repeats forever.
#[derive(Clone)]
pub struct FakeDevice {
    calls: Arc<Mutex<Vec<Call>>>,
    pages: Vec<Vec<String>>,
    page: usize,
    controls: Vec<Selector>,
    open_succeeds: bool,
    open_failures: Arc<Mutex<VecDeque<DeviceError>>>,
    always_fail: Option<DeviceError>,
    entry_reads: Arc<Mutex<usize>>,
    failing_read: Option<(usize, DeviceError)>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            pages: vec![Vec::new()],
            page: 0,
            controls: vec![LIKES_COUNT],
            open_succeeds: true,
            open_failures: Arc::new(Mutex::new(VecDeque::new())),
            always_fail: None,
            entry_reads: Arc::new(Mutex::new(0)),
            failing_read: None,
        }
    }

    pub fn with_pages(mut self, pages: &[&[&str]]) -> Self {
        self.pages = pages
            .iter()
            .map(|page| page.iter().map(|user| user.to_string()).collect())
            .collect();
        self
    }

    pub fn with_controls(mut self, controls: Vec<Selector>) -> Self {
        self.controls = controls;
        self
    }

    pub fn refusing_links(mut self) -> Self {
        self.open_succeeds = false;
        self
    }

    /// The next `errors.len()` link openings fail with these errors.
    pub fn failing_opens(self, errors: Vec<DeviceError>) -> Self {
        self.open_failures.lock().unwrap().extend(errors);
        self
    }

    /// The `nth` (1-based) read of the visible list entries fails with `error`.
    pub fn failing_entry_read(mut self, nth: usize, error: DeviceError) -> Self {
        self.failing_read = Some((nth, error));
        self
    }

    pub fn always_failing(mut self, error: DeviceError) -> Self {
        self.always_fail = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::OpenUrl(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Device for FakeDevice {
    fn open_url(&mut self, url: &str) -> Result<bool, DeviceError> {
        self.record(Call::OpenUrl(url.to_string()));
        if let Some(error) = &self.always_fail {
            return Err(error.clone());
        }
        if let Some(error) = self.open_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        self.page = 0;
        Ok(self.open_succeeds)
    }

    fn swipe(&mut self, direction: Direction, scale: f32) -> Result<(), DeviceError> {
        self.record(Call::Swipe(direction, scale));
        self.page += 1;
        Ok(())
    }

    fn fling(&mut self, direction: Direction) -> Result<(), DeviceError> {
        self.record(Call::Fling(direction));
        self.page += 1;
        Ok(())
    }

    fn wait_exists(&mut self, selector: &Selector, _timeout: Duration) -> Result<bool, DeviceError> {
        self.record(Call::Wait(*selector));
        Ok(self.controls.contains(selector))
    }

    fn click(&mut self, selector: &Selector) -> Result<(), DeviceError> {
        self.record(Call::Click(*selector));
        self.page = 0;
        Ok(())
    }

    fn visible_entries(&mut self) -> Result<Vec<String>, DeviceError> {
        let mut reads = self.entry_reads.lock().unwrap();
        *reads += 1;
        if let Some((nth, error)) = &self.failing_read {
            if *reads == *nth {
                return Err(error.clone());
            }
        }
        drop(reads);
        let last = self.pages.len().saturating_sub(1);
        Ok(self.pages.get(self.page.min(last)).cloned().unwrap_or_default())
    }

    fn restart_app(&mut self) -> Result<(), DeviceError> {
        self.record(Call::Restart);
        Ok(())
    }

    fn dump_hierarchy(&mut self) -> Result<String, DeviceError> {
        Ok("<hierarchy rotation=\"0\"/>".to_string())
    }

    fn start_recording(&mut self) -> Result<(), DeviceError> {
        self.record(Call::StartRecording);
        Ok(())
    }

    fn stop_recording(&mut self, keep: bool) -> Result<Option<String>, DeviceError> {
        self.record(Call::StopRecording { keep });
        Ok(keep.then(|| "/sdcard/screenrecord.mp4".to_string()))
    }
}

/// Swipes made inside a reactor list, as opposed to the reveal swipe on the post.
pub fn list_swipe(call: &Call) -> bool {
    matches!(call, Call::Swipe(Direction::Up, scale) if *scale < 0.7)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub username: String,
    pub source: String,
    pub can_follow: bool,
}

/// Policy acting on everyone except users whose name starts with `skip`.
/// Acting means a like, plus a follow when allowed.
#[derive(Clone, Default)]
pub struct FakePolicy {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakePolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn usernames(&self) -> Vec<String> {
        self.seen().into_iter().map(|seen| seen.username).collect()
    }
}

impl InteractionPolicy for FakePolicy {
    fn interact(
        &mut self,
        _device: &mut dyn Device,
        username: &str,
        ctx: &InteractionContext<'_>,
        session: &mut SessionState,
    ) -> Result<InteractionOutcome, DeviceError> {
        self.seen.lock().unwrap().push(Seen {
            username: username.to_string(),
            source: ctx.source.to_string(),
            can_follow: ctx.can_follow,
        });
        if username.starts_with("skip") {
            return Ok(InteractionOutcome::Skipped);
        }
        let record = InteractionRecord {
            succeeded: true,
            likes: 1,
            followed: ctx.can_follow,
            ..InteractionRecord::default()
        };
        session.record_interaction(ctx.source, record);
        Ok(InteractionOutcome::Acted(record))
    }
}
