//! Loading splash progress.

use rand::Rng;

/// Interval between progress steps.
pub const TICK_MS: u32 = 200;
/// Time after start-up at which loading is declared complete.
pub const READY_AFTER_MS: u32 = 1500;
/// Delay between "Ready!" and hiding the splash.
pub const HIDE_AFTER_MS: u32 = 300;

/// Largest single step, exclusive.
const MAX_STEP: f32 = 30.0;
/// Progress never passes this before loading completes.
const CAP: f32 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    Loading,
    Ready,
    Hidden,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadingProgress {
    percent: f32,
    phase: LoadingPhase,
}

impl LoadingProgress {
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            phase: LoadingPhase::Loading,
        }
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    /// Advance by a random step in `[0, 30)`.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        let step = rng.gen_range(0.0..MAX_STEP);
        self.advance(step);
    }

    /// Advance by `step`, capped at 90 while still loading.
    pub fn advance(&mut self, step: f32) {
        if self.phase == LoadingPhase::Loading {
            self.percent = (self.percent + step.max(0.0)).min(CAP);
        }
    }

    pub fn complete(&mut self) {
        if self.phase == LoadingPhase::Loading {
            self.percent = 100.0;
            self.phase = LoadingPhase::Ready;
            tracing::debug!("loading complete");
        }
    }

    pub fn hide(&mut self) {
        if self.phase == LoadingPhase::Ready {
            self.phase = LoadingPhase::Hidden;
        }
    }

    pub fn status(&self) -> &'static str {
        match self.phase {
            LoadingPhase::Ready | LoadingPhase::Hidden => "Ready!",
            LoadingPhase::Loading if self.percent < 30.0 => "Loading resources...",
            LoadingPhase::Loading if self.percent < 60.0 => "Initializing animations...",
            LoadingPhase::Loading => "Almost ready...",
        }
    }

    /// CSS width of the progress bar, e.g. `42.5%`.
    pub fn css_width(&self) -> String {
        format!("{}%", self.percent)
    }
}

impl Default for LoadingProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_progress_caps_at_90() {
        let mut loading = LoadingProgress::new();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            loading.tick(&mut rng);
            assert!(loading.percent() <= 90.0);
        }
        assert_eq!(loading.percent(), 90.0);
        assert_eq!(loading.status(), "Almost ready...");
    }

    #[test]
    fn test_status_thresholds() {
        let mut loading = LoadingProgress::new();
        assert_eq!(loading.status(), "Loading resources...");
        loading.advance(30.0);
        assert_eq!(loading.status(), "Initializing animations...");
        loading.advance(30.0);
        assert_eq!(loading.status(), "Almost ready...");
    }

    #[test]
    fn test_complete_then_hide() {
        let mut loading = LoadingProgress::new();
        loading.hide();
        assert_eq!(loading.phase(), LoadingPhase::Loading);

        loading.complete();
        assert_eq!(loading.percent(), 100.0);
        assert_eq!(loading.status(), "Ready!");

        // Late ticks no longer move the bar.
        loading.advance(10.0);
        assert_eq!(loading.css_width(), "100%");

        loading.hide();
        assert_eq!(loading.phase(), LoadingPhase::Hidden);
    }
}
