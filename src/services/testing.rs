//! In-memory listing page used by the service tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::anyhow;
use async_trait::async_trait;

use super::{ListingPage, Locator, PageElement};

const SCROLL_TO_BOTTOM_MARKER: &str = "document.body.scrollHeight";
const SCRIPT_CLICK_MARKER: &str = "arguments[0].click()";

#[derive(Clone)]
pub struct FakeButton {
    locator: Locator,
    label: String,
    adds: usize,
    displayed: bool,
    occluded: bool,
    script_click_fails: bool,
}

impl FakeButton {
    pub fn new(locator: Locator, label: &str) -> Self {
        FakeButton {
            locator,
            label: label.to_string(),
            adds: 0,
            displayed: true,
            occluded: false,
            script_click_fails: false,
        }
    }

    pub fn adds(mut self, items: usize) -> Self {
        self.adds = items;
        self
    }

    /// Direct clicks fail, script clicks still work.
    pub fn occluded(mut self) -> Self {
        self.occluded = true;
        self
    }

    /// Neither direct nor script clicks go through.
    pub fn unclickable(mut self) -> Self {
        self.occluded = true;
        self.script_click_fails = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }
}

#[derive(Default)]
struct FakeState {
    items: Vec<Option<String>>,
    scroll_growth: VecDeque<usize>,
    endless_growth: Option<usize>,
    containers: usize,
    buttons: Vec<FakeButton>,
    failing_queries: bool,
    item_queries: usize,
    fail_navigation: bool,
    navigated: Vec<String>,
    scripts: Vec<String>,
    direct_clicks: usize,
    clicked: Vec<String>,
}

impl FakeState {
    fn grow(&mut self, count: usize) {
        for _ in 0..count {
            let n = self.items.len() + 1;
            self.items
                .push(Some(format!("2020 Hyundai Listing {}\n{}.5k km\nPetrol", n, n)));
        }
    }
}

pub struct FakePage {
    state: Arc<Mutex<FakeState>>,
}

impl FakePage {
    pub fn new(items: usize) -> Self {
        let mut state = FakeState::default();
        state.grow(items);

        FakePage {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_item_texts(texts: &[&str]) -> Self {
        let state = FakeState {
            items: texts.iter().map(|text| Some(text.to_string())).collect(),
            ..FakeState::default()
        };

        FakePage {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_unreadable_item(self) -> Self {
        self.lock().items.push(None);
        self
    }

    pub fn with_scroll_growth(self, growth: Vec<usize>) -> Self {
        self.lock().scroll_growth = growth.into();
        self
    }

    pub fn with_endless_growth(self, per_scroll: usize) -> Self {
        self.lock().endless_growth = Some(per_scroll);
        self
    }

    pub fn with_containers(self, containers: usize) -> Self {
        self.lock().containers = containers;
        self
    }

    pub fn with_button(self, button: FakeButton) -> Self {
        self.lock().buttons.push(button);
        self
    }

    /// Every other item count and all other lookups fail.
    pub fn failing_queries(self) -> Self {
        self.lock().failing_queries = true;
        self
    }

    pub fn failing_navigation(self) -> Self {
        self.lock().fail_navigation = true;
        self
    }

    pub fn scripts(&self) -> Vec<String> {
        self.lock().scripts.clone()
    }

    pub fn navigated(&self) -> Vec<String> {
        self.lock().navigated.clone()
    }

    /// Labels of buttons that were clicked, directly or by script.
    pub fn clicked(&self) -> Vec<String> {
        self.lock().clicked.clone()
    }

    pub fn direct_clicks(&self) -> usize {
        self.lock().direct_clicks
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }
}

pub enum FakeElement {
    Item(Option<String>),
    Container,
    Button {
        button: FakeButton,
        state: Arc<Mutex<FakeState>>,
    },
}

#[async_trait]
impl ListingPage for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.fail_navigation {
            return Err(anyhow!("net::ERR_NAME_NOT_RESOLVED"));
        }
        state.navigated.push(url.to_string());
        Ok(())
    }

    async fn query_elements(&self, locator: &Locator) -> anyhow::Result<Vec<FakeElement>> {
        let mut state = self.lock();

        match locator {
            Locator::ClassName(_) => {
                state.item_queries += 1;
                if state.failing_queries && state.item_queries % 2 == 1 {
                    return Err(anyhow!("stale element reference"));
                }
                Ok(state.items.iter().cloned().map(FakeElement::Item).collect())
            }
            _ if state.failing_queries => Err(anyhow!("no such window")),
            Locator::Css(_) => Ok((0..state.containers).map(|_| FakeElement::Container).collect()),
            Locator::XPath(_) => Ok(state
                .buttons
                .iter()
                .filter(|button| &button.locator == locator)
                .map(|button| FakeElement::Button {
                    button: button.clone(),
                    state: self.state.clone(),
                })
                .collect()),
        }
    }

    async fn execute_script(&self, script: &str, args: &[&FakeElement]) -> anyhow::Result<()> {
        let mut state = self.lock();
        state.scripts.push(script.to_string());

        if script.contains(SCRIPT_CLICK_MARKER) {
            if let Some(FakeElement::Button { button, .. }) = args.first() {
                if button.script_click_fails {
                    return Err(anyhow!("javascript error: element is not attached"));
                }
                state.clicked.push(button.label.clone());
                state.grow(button.adds);
            }
        }

        if script.contains(SCROLL_TO_BOTTOM_MARKER) {
            let added = match state.endless_growth {
                Some(per_scroll) => per_scroll,
                None => state.scroll_growth.pop_front().unwrap_or(0),
            };
            state.grow(added);
        }

        Ok(())
    }
}

#[async_trait]
impl PageElement for FakeElement {
    async fn text(&self) -> anyhow::Result<String> {
        match self {
            FakeElement::Item(Some(text)) => Ok(text.clone()),
            FakeElement::Item(None) => Err(anyhow!("stale element reference")),
            FakeElement::Container => Ok(String::new()),
            FakeElement::Button { button, .. } => Ok(button.label.clone()),
        }
    }

    async fn is_displayed(&self) -> anyhow::Result<bool> {
        match self {
            FakeElement::Button { button, .. } => Ok(button.displayed),
            _ => Ok(true),
        }
    }

    async fn is_enabled(&self) -> anyhow::Result<bool> {
        Ok(true)
    }

    async fn click(&self) -> anyhow::Result<()> {
        match self {
            FakeElement::Button { button, state } => {
                if button.occluded {
                    return Err(anyhow!("element click intercepted"));
                }
                let mut state = state.lock().unwrap();
                state.direct_clicks += 1;
                state.clicked.push(button.label.clone());
                state.grow(button.adds);
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
