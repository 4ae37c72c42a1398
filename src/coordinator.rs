use std::sync::Arc;

use crate::{
    clock::{SystemClock, TimeSource},
    config::StudioConfig,
    error::{CinegenError, Result},
    locator::LocatorTemplate,
    models::{GenerationRequest, GenerationState, GenerationStatus, ImageVariant},
    notify::{LogNotifier, Notifier},
};

pub const EMPTY_PROMPT_MESSAGE: &str = "Please enter a prompt to generate an image";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate images. Please try again.";

/// Owns the generation state and turns prompts into batches of locators.
///
/// The three transitions are `start_generation` (Idle/Ready → InFlight),
/// `complete_generation` (InFlight → Ready) and `reset` (any → Idle).
/// No network I/O happens here; the locators are fetched later by the
/// display or download collaborators.
pub struct BatchImageRequestCoordinator {
    template: LocatorTemplate,
    count: u32,
    width: u32,
    height: u32,
    clock: Arc<dyn TimeSource>,
    notifier: Arc<dyn Notifier>,
    pending: Option<GenerationRequest>,
    state: GenerationState,
}

impl BatchImageRequestCoordinator {
    pub fn new(config: &StudioConfig) -> Self {
        Self::with_collaborators(config, Arc::new(SystemClock), Arc::new(LogNotifier))
    }

    pub fn with_collaborators(
        config: &StudioConfig,
        clock: Arc<dyn TimeSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            template: LocatorTemplate::from_config(config),
            count: config.count,
            width: config.width,
            height: config.height,
            clock,
            notifier,
            pending: None,
            state: GenerationState::idle(),
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn status(&self) -> GenerationStatus {
        self.state.status
    }

    pub fn variants(&self) -> &[ImageVariant] {
        &self.state.variants
    }

    pub fn is_generating(&self) -> bool {
        self.state.status == GenerationStatus::InFlight
    }

    pub fn start_generation(&mut self, base_prompt: &str) -> Result<GenerationRequest> {
        let request = match GenerationRequest::new(
            base_prompt,
            self.count,
            self.width,
            self.height,
            self.clock.now_millis(),
        ) {
            Ok(request) => request,
            Err(CinegenError::EmptyPrompt) => {
                self.notifier.error(EMPTY_PROMPT_MESSAGE);
                return Err(CinegenError::EmptyPrompt);
            }
            Err(e) => {
                log::error!("Cannot start generation: {}", e);
                self.notifier.error(GENERATION_FAILED_MESSAGE);
                return Err(e);
            }
        };

        log::debug!(
            "Starting generation of {} images at seed base {}",
            request.count(),
            request.base_timestamp()
        );
        self.state.status = GenerationStatus::InFlight;
        self.pending = Some(request.clone());
        Ok(request)
    }

    /// Pure: the same request always yields the same variants.
    pub fn derive_variants(&self, request: &GenerationRequest) -> Vec<ImageVariant> {
        derive_variants(request, &self.template)
    }

    /// Accepts only the full set of variants of the request in flight;
    /// anything else is logged and leaves the state untouched.
    pub fn complete_generation(&mut self, mut variants: Vec<ImageVariant>) -> &GenerationState {
        let Some(request) = self
            .pending
            .as_ref()
            .filter(|_| self.state.status == GenerationStatus::InFlight)
        else {
            log::warn!(
                "Ignoring completion while {:?}; no generation is in flight",
                self.state.status
            );
            return &self.state;
        };

        variants.sort_by_key(|v| v.index);
        if !matches_request(request, &variants) {
            log::warn!(
                "Ignoring completion with {} variants; the request in flight expects {}",
                variants.len(),
                request.count()
            );
            return &self.state;
        }

        let count = variants.len();
        self.pending = None;
        self.state = GenerationState {
            status: GenerationStatus::Ready,
            variants,
        };
        self.notifier.success(&format!(
            "{} professional images generated successfully!",
            count
        ));
        &self.state
    }

    pub fn reset(&mut self) -> &GenerationState {
        self.pending = None;
        self.state = GenerationState::idle();
        &self.state
    }

    /// Runs start, derive and complete as one step.
    pub fn generate(&mut self, base_prompt: &str) -> Result<Vec<ImageVariant>> {
        let request = self.start_generation(base_prompt)?;
        let variants = self.derive_variants(&request);
        Ok(self.complete_generation(variants).variants.clone())
    }
}

/// Variants must be sorted by index.
fn matches_request(request: &GenerationRequest, variants: &[ImageVariant]) -> bool {
    variants.len() == request.count() as usize
        && variants
            .iter()
            .enumerate()
            .all(|(i, v)| v.index as usize == i && v.seed == request.seed_for(v.index))
}

pub fn derive_variants(
    request: &GenerationRequest,
    template: &LocatorTemplate,
) -> Vec<ImageVariant> {
    (0..request.count())
        .map(|index| {
            let seed = request.seed_for(index);
            ImageVariant {
                index,
                seed,
                locator: template.locator(
                    request.enhanced_prompt(),
                    request.width(),
                    request.height(),
                    seed,
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::enhance_prompt;
    use crate::notify::{MemoryNotifier, Notification, Severity};

    fn coordinator(at: i64) -> (BatchImageRequestCoordinator, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let coordinator = BatchImageRequestCoordinator::with_collaborators(
            &StudioConfig::default(),
            Arc::new(FixedClock(at)),
            notifier.clone(),
        );
        (coordinator, notifier)
    }

    #[test]
    fn test_red_car_seeds_and_locator() {
        let (mut coordinator, _) = coordinator(1_000_000);
        let request = coordinator.start_generation("red car").unwrap();
        assert_eq!(request.enhanced_prompt(), enhance_prompt("red car"));

        let variants = coordinator.derive_variants(&request);
        assert_eq!(variants.len(), 20);
        assert_eq!(variants[0].seed, 1_000_000);
        assert_eq!(variants[1].seed, 1_001_000);
        assert_eq!(variants[19].seed, 1_019_000);

        let encoded = urlencoding::encode(request.enhanced_prompt()).into_owned();
        assert!(variants[0]
            .locator
            .contains(&format!("/prompt/{}?", encoded)));
        assert!(variants[0]
            .locator
            .ends_with("width=1024&height=1024&model=flux&n=1&safe=true&seed=1000000"));
    }

    #[test]
    fn test_seeds_strictly_increase_by_step() {
        let (mut coordinator, _) = coordinator(1_700_000_000_123);
        for prompt in ["a", "luxury sports car", "  padded  ", "ünïcödé ✨"] {
            let request = coordinator.start_generation(prompt).unwrap();
            let variants = coordinator.derive_variants(&request);
            assert_eq!(variants.len(), 20);
            for (i, pair) in variants.windows(2).enumerate() {
                assert_eq!(pair[0].index, i as u32);
                assert_eq!(pair[1].seed - pair[0].seed, 1000);
            }
        }
    }

    #[test]
    fn test_derive_variants_is_idempotent() {
        let (mut coordinator, _) = coordinator(5);
        let request = coordinator.start_generation("red car").unwrap();
        assert_eq!(
            coordinator.derive_variants(&request),
            coordinator.derive_variants(&request)
        );
    }

    #[test]
    fn test_blank_prompt_leaves_state_and_warns_once() {
        let (mut coordinator, notifier) = coordinator(1);
        coordinator.generate("red car").unwrap();
        let before = coordinator.state().clone();

        let result = coordinator.generate("   \t");
        assert!(matches!(result, Err(CinegenError::EmptyPrompt)));
        assert_eq!(coordinator.state(), &before);

        let errors: Vec<Notification> = notifier
            .notifications()
            .into_iter()
            .filter(|n| n.severity == Severity::Error)
            .collect();
        assert_eq!(errors, vec![Notification::error(EMPTY_PROMPT_MESSAGE)]);
    }

    #[test]
    fn test_transitions_and_success_notification() {
        let (mut coordinator, notifier) = coordinator(1_000_000);
        assert_eq!(coordinator.status(), GenerationStatus::Idle);

        let request = coordinator.start_generation("red car").unwrap();
        assert!(coordinator.is_generating());
        assert!(notifier.notifications().is_empty());

        let mut variants = coordinator.derive_variants(&request);
        variants.reverse();
        let state = coordinator.complete_generation(variants);
        assert_eq!(state.status, GenerationStatus::Ready);
        assert_eq!(state.variants.len(), 20);
        assert!(state.variants.windows(2).all(|w| w[0].index < w[1].index));

        assert_eq!(
            notifier.notifications(),
            vec![Notification::success(
                "20 professional images generated successfully!"
            )]
        );
    }

    #[test]
    fn test_truncated_variants_do_not_complete() {
        let (mut coordinator, notifier) = coordinator(1_000_000);
        let request = coordinator.start_generation("red car").unwrap();
        let mut variants = coordinator.derive_variants(&request);
        variants.truncate(3);

        let state = coordinator.complete_generation(variants);
        assert_eq!(state.status, GenerationStatus::InFlight);
        assert!(state.variants.is_empty());
        assert!(notifier.notifications().is_empty());

        let state = coordinator.complete_generation(coordinator.derive_variants(&request));
        assert_eq!(state.status, GenerationStatus::Ready);
        assert_eq!(state.variants.len(), 20);
    }

    #[test]
    fn test_variants_from_another_request_do_not_complete() {
        let (mut coordinator, notifier) = coordinator(1_000_000);
        let stale = GenerationRequest::new("red car", 20, 1024, 1024, 5).unwrap();
        coordinator.start_generation("red car").unwrap();

        let state = coordinator.complete_generation(coordinator.derive_variants(&stale));
        assert_eq!(state.status, GenerationStatus::InFlight);
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_extreme_clock_fails_without_transition() {
        let notifier = Arc::new(MemoryNotifier::new());
        let mut coordinator = BatchImageRequestCoordinator::with_collaborators(
            &StudioConfig::default(),
            Arc::new(FixedClock(i64::MAX - 10)),
            notifier.clone(),
        );

        assert!(matches!(
            coordinator.start_generation("red car"),
            Err(CinegenError::ConfigError(_))
        ));
        assert_eq!(coordinator.state(), &GenerationState::idle());
        assert_eq!(
            notifier.notifications(),
            vec![Notification::error(GENERATION_FAILED_MESSAGE)]
        );
    }

    #[test]
    fn test_complete_without_start_is_ignored() {
        let (mut coordinator, notifier) = coordinator(0);
        let state = coordinator.complete_generation(Vec::new());
        assert_eq!(state, &GenerationState::idle());
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_reset_from_any_state() {
        let (mut coordinator, _) = coordinator(0);
        assert_eq!(coordinator.reset(), &GenerationState::idle());

        coordinator.start_generation("x").unwrap();
        assert_eq!(coordinator.reset(), &GenerationState::idle());

        coordinator.generate("x").unwrap();
        assert!(coordinator.state().is_ready());
        let state = coordinator.reset();
        assert_eq!(state.status, GenerationStatus::Idle);
        assert!(state.variants.is_empty());
    }

    #[test]
    fn test_configured_count_and_dimensions() {
        let config = StudioConfig::default().with_count(3).with_dimensions(640, 480);
        let mut coordinator = BatchImageRequestCoordinator::with_collaborators(
            &config,
            Arc::new(FixedClock(10)),
            Arc::new(MemoryNotifier::new()),
        );
        let variants = coordinator.generate("boat").unwrap();
        assert_eq!(variants.len(), 3);
        assert!(variants[2].locator.contains("width=640&height=480"));
        assert_eq!(variants[2].seed, 2010);
    }
}
