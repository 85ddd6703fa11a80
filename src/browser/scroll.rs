//! Incremental content loading for scroll-rendered listing pages.
//!
//! Listing sites append offers to the document as the viewport scrolls. The
//! loader below makes that lazy content present before extraction by driving
//! repeated scroll-and-wait cycles until the document height stops changing.

use crate::sources::SourceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A page surface that can be scrolled and measured.
///
/// The real implementation drives a WebDriver session; tests substitute a
/// scripted height sequence.
#[async_trait]
pub trait ScrollSurface: Send {
    /// Scroll the viewport to a vertical offset in pixels.
    async fn scroll_to(&mut self, offset: u64) -> Result<(), SourceError>;

    /// Current document height in pixels.
    async fn content_height(&mut self) -> Result<u64, SourceError>;
}

/// Tuning for the scroll-until-stable loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Hard cap on scroll steps.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pixels added to the scroll offset per step.
    #[serde(default = "default_step_px")]
    pub step_px: u64,

    /// Pause after each step, giving the page time to fetch and render.
    #[serde(default = "default_wait_ms")]
    pub wait_ms: u64,

    /// Consecutive unchanged height reads treated as "fully loaded".
    #[serde(default = "default_stable_threshold")]
    pub stable_threshold: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            step_px: default_step_px(),
            wait_ms: default_wait_ms(),
            stable_threshold: default_stable_threshold(),
        }
    }
}

fn default_max_attempts() -> u32 {
    30
}

fn default_step_px() -> u64 {
    600
}

fn default_wait_ms() -> u64 {
    1_000
}

fn default_stable_threshold() -> u32 {
    3
}

/// Scroll in fixed steps until the document height stops growing.
///
/// This is a polling convergence loop, not an event-driven wait: each step
/// scrolls `step_px` further, pauses `wait_ms`, and re-reads the height.
/// `stable_threshold` consecutive unchanged reads count as completion. A page
/// that never stabilizes still terminates after `max_attempts` steps with no
/// error; the caller extracts whatever is loaded at that point.
pub async fn load_all<S>(surface: &mut S, config: &ScrollConfig) -> Result<(), SourceError>
where
    S: ScrollSurface + ?Sized,
{
    let mut previous_height = surface.content_height().await?;
    let mut offset = config.step_px;
    let mut stable_count = 0u32;

    for attempt in 0..config.max_attempts {
        surface.scroll_to(offset).await?;
        offset += config.step_px;

        tokio::time::sleep(Duration::from_millis(config.wait_ms)).await;

        let new_height = surface.content_height().await?;
        stable_count = if new_height == previous_height {
            stable_count + 1
        } else {
            0
        };
        previous_height = new_height;

        if stable_count >= config.stable_threshold {
            tracing::trace!(attempt, height = new_height, "page height stabilized");
            break;
        }
    }

    Ok(())
}
