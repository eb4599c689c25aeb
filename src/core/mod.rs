pub mod artwork;
pub mod download;
pub mod manifest;
pub mod matcher;
pub mod normalize;
pub mod previews;
pub mod report;

use std::time::Duration;

/// Politeness delay between items hitting the external services.
fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
