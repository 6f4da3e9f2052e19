use std::time::Duration;

use crate::configuration::RevealSettings;

use super::{ListingPage, Locator, PageElement};

const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";
const SCROLL_CONTAINER_SCRIPT: &str = "arguments[0].scrollTop = arguments[0].scrollHeight";
const SCROLL_INTO_VIEW_SCRIPT: &str =
    "arguments[0].scrollIntoView({behavior: 'smooth', block: 'center'});";
const SCRIPT_CLICK: &str = "arguments[0].click();";
const LABEL_PREVIEW_LEN: usize = 50;

fn scroll_by_script(px: u32) -> String {
    format!("window.scrollBy(0, {});", px)
}

fn lowercase_contains(target: &str, needle: &str) -> String {
    format!(
        "contains(translate({}, 'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz'), '{}')",
        target, needle
    )
}

/// "Load more" style controls, most specific first.
pub fn load_more_candidates() -> Vec<Locator> {
    vec![
        Locator::xpath(format!("//button[{}]", lowercase_contains("text()", "load"))),
        Locator::xpath(format!("//button[{}]", lowercase_contains("text()", "more"))),
        Locator::xpath(format!("//button[{}]", lowercase_contains("text()", "show"))),
        Locator::xpath(format!("//div[{}]", lowercase_contains("text()", "load"))),
        Locator::xpath(format!("//a[{}]", lowercase_contains("text()", "more"))),
        Locator::xpath("//*[contains(@class, 'load')]"),
        Locator::xpath("//*[contains(@class, 'more')]"),
        Locator::xpath("//*[contains(@class, 'pagination')]//button"),
        Locator::xpath("//*[contains(@class, 'next')]"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    Grew(usize),
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Converged,
    IterationCapReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Click,
    ScriptClick,
}

/// Counters for one reveal session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RevealState {
    pub iteration: u32,
    pub current_count: usize,
    pub previous_count: usize,
    pub no_growth: u32,
}

impl RevealState {
    /// Records the item counts seen around one iteration.
    pub fn observe(&mut self, before: usize, after: usize) -> Growth {
        self.previous_count = self.current_count;
        self.current_count = after;

        if after > before {
            self.no_growth = 0;
            Growth::Grew(after - before)
        } else {
            self.no_growth += 1;
            Growth::Unchanged
        }
    }

    pub fn termination(&self, settings: &RevealSettings) -> Option<Termination> {
        if self.no_growth >= settings.stability_threshold {
            Some(Termination::Converged)
        } else if self.iteration >= settings.max_iterations {
            Some(Termination::IterationCapReached)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSummary {
    pub iterations: u32,
    pub item_count: usize,
    pub interactions: u32,
    pub termination: Termination,
}

/// Scrolls and clicks a listing page until its item count stops growing.
pub struct RevealDriver<'a, P: ListingPage> {
    page: &'a P,
    item_locator: &'a Locator,
    settings: &'a RevealSettings,
}

impl<'a, P: ListingPage> RevealDriver<'a, P> {
    pub fn new(page: &'a P, item_locator: &'a Locator, settings: &'a RevealSettings) -> Self {
        RevealDriver {
            page,
            item_locator,
            settings,
        }
    }

    pub async fn run(&self) -> RevealSummary {
        let mut state = RevealState::default();
        let mut interactions = 0;

        if self.settings.max_iterations == 0 {
            log::warn!("Reveal skipped, max_iterations is 0");
            return self.summary(&state, interactions, Termination::IterationCapReached);
        }

        loop {
            state.iteration += 1;

            let before = self.count_items(state.current_count).await;
            state.current_count = before;
            log::info!("Iteration {}: Found {} items", state.iteration, before);

            self.apply_scroll_stimulus().await;

            if self.try_load_more().await.is_some() {
                interactions += 1;
            }
            sleep_ms(self.settings.post_interaction_delay_ms).await;

            let after = self.count_items(before).await;
            match state.observe(before, after) {
                Growth::Grew(added) => {
                    log::info!("  ✓ Loaded {} more items (Total: {})", added, after)
                }
                Growth::Unchanged => log::info!(
                    "  → No new items loaded (attempt {}/{})",
                    state.no_growth,
                    self.settings.stability_threshold
                ),
            }

            match state.termination(self.settings) {
                Some(Termination::Converged) => {
                    log::info!("{}", "=".repeat(60));
                    log::info!("No more items to load. This appears to be all available items.");
                    log::info!("{}", "=".repeat(60));
                    return self.summary(&state, interactions, Termination::Converged);
                }
                Some(Termination::IterationCapReached) => {
                    log::warn!(
                        "Stopped after {} iterations with {} items, count was still changing",
                        state.iteration,
                        state.current_count
                    );
                    return self.summary(&state, interactions, Termination::IterationCapReached);
                }
                None => {}
            }
        }
    }

    fn summary(
        &self,
        state: &RevealState,
        interactions: u32,
        termination: Termination,
    ) -> RevealSummary {
        RevealSummary {
            iterations: state.iteration,
            item_count: state.current_count,
            interactions,
            termination,
        }
    }

    /// Falls back to `last_known` when the page can't be queried.
    async fn count_items(&self, last_known: usize) -> usize {
        match self.page.query_elements(self.item_locator).await {
            Ok(items) => items.len(),
            Err(e) => {
                log::debug!("Item count query failed: {:?}", e);
                last_known
            }
        }
    }

    async fn run_script(&self, script: &str, args: &[&P::Element]) -> bool {
        match self.page.execute_script(script, args).await {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Script `{}` failed: {:?}", script, e);
                false
            }
        }
    }

    async fn apply_scroll_stimulus(&self) {
        let scroll_by = scroll_by_script(self.settings.scroll_step_px);
        for _ in 0..self.settings.scroll_steps {
            self.run_script(&scroll_by, &[]).await;
            sleep_ms(self.settings.scroll_step_delay_ms).await;
        }

        self.run_script(SCROLL_TO_BOTTOM_SCRIPT, &[]).await;
        sleep_ms(self.settings.bottom_delay_ms).await;

        let containers = Locator::css(self.settings.container_selector.as_str());
        match self.page.query_elements(&containers).await {
            Ok(containers) => {
                for container in containers.iter().take(self.settings.container_limit) {
                    self.run_script(SCROLL_CONTAINER_SCRIPT, &[container]).await;
                }
            }
            Err(e) => log::debug!("Container lookup failed: {:?}", e),
        }
        sleep_ms(self.settings.container_delay_ms).await;
    }

    async fn try_load_more(&self) -> Option<Interaction> {
        for locator in load_more_candidates() {
            let candidates = match self.page.query_elements(&locator).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    log::debug!("Lookup for {:?} failed: {:?}", locator, e);
                    continue;
                }
            };

            for candidate in candidates.iter() {
                if !is_clickable(candidate).await {
                    continue;
                }

                if let Some(interaction) = self.interact(candidate).await {
                    sleep_ms(self.settings.click_delay_ms).await;
                    return Some(interaction);
                }
            }
        }

        None
    }

    async fn interact(&self, candidate: &P::Element) -> Option<Interaction> {
        let label: String = candidate
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(LABEL_PREVIEW_LEN)
            .collect();

        self.run_script(SCROLL_INTO_VIEW_SCRIPT, &[candidate]).await;
        sleep_ms(self.settings.scroll_into_view_delay_ms).await;

        match candidate.click().await {
            Ok(()) => {
                log::info!("  → Clicked button: {}", label);
                Some(Interaction::Click)
            }
            Err(e) => {
                log::debug!("Direct click failed, trying script click: {:?}", e);
                if self.run_script(SCRIPT_CLICK, &[candidate]).await {
                    log::info!("  → JS-clicked button: {}", label);
                    Some(Interaction::ScriptClick)
                } else {
                    None
                }
            }
        }
    }
}

async fn is_clickable<E: PageElement>(element: &E) -> bool {
    matches!(element.is_displayed().await, Ok(true))
        && matches!(element.is_enabled().await, Ok(true))
}

async fn sleep_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
