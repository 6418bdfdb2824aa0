use campaign_logging::{campaign_info, campaign_warn};
use rand::Rng;

use crate::device::{Direction, LIKERS_FACEPILE, LIKES_COUNT};
use crate::pace::{pause, Timings};
use crate::{Device, DeviceError};

/// Swipe used to force lazily rendered controls (reels) onto the screen.
const REVEAL_SCROLL_SCALE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The reactor list is on screen.
    ListOpened,
    /// The application refused the deep link.
    PostNotOpened,
    /// Neither the likes counter nor the facepile showed up.
    ListControlMissing,
}

/// Open the post at `url` and then its list of likers.
///
/// Navigation failures are returned as values; only device errors are `Err`.
pub fn open_reactor_list<R: Rng + ?Sized>(
    device: &mut dyn Device,
    rng: &mut R,
    url: &str,
    timings: &Timings,
) -> Result<Navigation, DeviceError> {
    campaign_info!("Navigating to post: {}", url);
    if !device.open_url(url)? {
        return Ok(Navigation::PostNotOpened);
    }
    pause(rng, timings.post_load);

    campaign_info!("Scrolling down once to ensure likers list is visible.");
    device.swipe(Direction::Up, REVEAL_SCROLL_SCALE)?;
    pause(rng, timings.after_reveal_scroll);

    campaign_info!("Opening likers list...");
    for selector in [LIKES_COUNT, LIKERS_FACEPILE] {
        if device.wait_exists(&selector, timings.element_timeout)? {
            device.click(&selector)?;
            pause(rng, timings.list_open);
            return Ok(Navigation::ListOpened);
        }
        campaign_warn!("No element matching {}", selector.resource_id_matches);
    }
    Ok(Navigation::ListControlMissing)
}
