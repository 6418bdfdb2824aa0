use campaign_logging::{campaign_error, campaign_info, campaign_warn};
use likers_core::SessionState;
use rand::rngs::StdRng;

use crate::crash::{CrashDetails, CrashReporter};
use crate::pace::{pause, DelayRange};
use crate::{Device, DeviceError};

/// How a failed attempt is cleaned up before the caller retries.
#[derive(Debug, Clone)]
pub struct RecoveryPolicy {
    /// Record the screen during each attempt, keeping the video only on failure.
    pub screen_record: bool,
    pub crash_reporter: Option<CrashReporter>,
    /// Settle time after the application was restarted.
    pub restart_delay: DelayRange,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            screen_record: false,
            crash_reporter: None,
            restart_delay: DelayRange::secs(3, 5),
        }
    }
}

/// Resources a job works with; lent to it for the duration of one attempt.
pub struct JobContext<'a> {
    pub device: &'a mut dyn Device,
    pub session: &'a mut SessionState,
    pub rng: &'a mut StdRng,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt<T> {
    Finished(T),
    /// The job failed; the application was restarted and the job may be run again.
    Recovered(DeviceError),
}

/// Run `job` once, recovering the device if it fails.
///
/// There is no retry loop here: the caller decides whether to run the job
/// again, and must check its stop conditions before every new attempt.
pub fn run_with_recovery<T, F>(
    ctx: &mut JobContext<'_>,
    recovery: &RecoveryPolicy,
    source: &str,
    job: F,
) -> Attempt<T>
where
    F: FnOnce(&mut JobContext<'_>) -> Result<T, DeviceError>,
{
    let recording = recovery.screen_record && start_recording(ctx.device);

    match job(&mut *ctx) {
        Ok(value) => {
            if recording {
                if let Err(err) = ctx.device.stop_recording(false) {
                    campaign_warn!("Failed to discard screen recording: {}", err);
                }
            }
            Attempt::Finished(value)
        }
        Err(error) => {
            campaign_error!("Job failed: {}", error);
            recover(ctx, recovery, source, recording, &error);
            Attempt::Recovered(error)
        }
    }
}

fn start_recording(device: &mut dyn Device) -> bool {
    match device.start_recording() {
        Ok(()) => true,
        Err(err) => {
            campaign_warn!("Screen recording unavailable: {}", err);
            false
        }
    }
}

fn recover(
    ctx: &mut JobContext<'_>,
    recovery: &RecoveryPolicy,
    source: &str,
    recording: bool,
    error: &DeviceError,
) {
    let recording_path = if recording {
        ctx.device.stop_recording(true).unwrap_or_else(|err| {
            campaign_warn!("Failed to save screen recording: {}", err);
            None
        })
    } else {
        None
    };

    if let Some(reporter) = &recovery.crash_reporter {
        let hierarchy = ctx.device.dump_hierarchy().ok();
        let details = CrashDetails {
            source,
            error,
            hierarchy: hierarchy.as_deref(),
            recording: recording_path.as_deref(),
        };
        match reporter.write(&details) {
            Ok(path) => campaign_info!("Crash report saved to {:?}", path),
            Err(err) => campaign_warn!("Failed to save crash report: {}", err),
        }
    }

    ctx.session.record_crash();

    campaign_info!("Restarting the application...");
    match ctx.device.restart_app() {
        Ok(()) => pause(ctx.rng, recovery.restart_delay),
        Err(err) => campaign_error!("Application restart failed: {}", err),
    }
}
