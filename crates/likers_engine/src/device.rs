use std::time::Duration;

use serde::Serialize;

use crate::DeviceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Matches a UI element by resource-id regex and widget class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub resource_id_matches: &'static str,
    pub class_name: &'static str,
}

/// The likes counter under a post.
pub const LIKES_COUNT: Selector = Selector {
    resource_id_matches: ".*row_feed_textview_likes|.*likes_count",
    class_name: "android.widget.TextView",
};

/// The avatar strip of likers, shown instead of the counter on some posts.
pub const LIKERS_FACEPILE: Selector = Selector {
    resource_id_matches: ".*facepile|.*likers_facepile",
    class_name: "android.view.View",
};

/// UI driver of the device running the automated application.
///
/// Calls block until the device answers. Every error is considered
/// recoverable by restarting the application.
pub trait Device {
    /// Ask the application to open `url` as a deep link.
    fn open_url(&mut self, url: &str) -> Result<bool, DeviceError>;

    /// Swipe across `scale` (0..=1) of the screen height. `Up` scrolls a list forward.
    fn swipe(&mut self, direction: Direction, scale: f32) -> Result<(), DeviceError>;

    /// Fast, long swipe used to jump over already-seen list regions.
    fn fling(&mut self, direction: Direction) -> Result<(), DeviceError>;

    /// Wait up to `timeout` for an element matching `selector`.
    fn wait_exists(&mut self, selector: &Selector, timeout: Duration)
        -> Result<bool, DeviceError>;

    fn click(&mut self, selector: &Selector) -> Result<(), DeviceError>;

    /// Usernames of the list rows currently on screen, top to bottom.
    fn visible_entries(&mut self) -> Result<Vec<String>, DeviceError>;

    /// Close and relaunch the application.
    fn restart_app(&mut self) -> Result<(), DeviceError>;

    /// Current UI hierarchy as XML, for crash reports.
    fn dump_hierarchy(&mut self) -> Result<String, DeviceError>;

    fn start_recording(&mut self) -> Result<(), DeviceError>;

    /// Stop recording. With `keep` the recording is saved and its
    /// location returned; otherwise it is discarded.
    fn stop_recording(&mut self, keep: bool) -> Result<Option<String>, DeviceError>;
}
