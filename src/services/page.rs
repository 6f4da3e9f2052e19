use async_trait::async_trait;

/// How an element is looked up on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    ClassName(String),
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn class_name(name: impl Into<String>) -> Self {
        Locator::ClassName(name.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(path: impl Into<String>) -> Self {
        Locator::XPath(path.into())
    }
}

/// A rendered document that can be navigated, queried and scripted.
///
/// Element handles are only valid until the page re-renders. Callers query
/// again instead of holding on to handles across reveal iterations.
#[async_trait]
pub trait ListingPage: Send + Sync {
    type Element: PageElement;

    async fn navigate(&self, url: &str) -> anyhow::Result<()>;

    async fn query_elements(&self, locator: &Locator) -> anyhow::Result<Vec<Self::Element>>;

    /// Runs `script` with `args` bound to `arguments[0..]`.
    async fn execute_script(&self, script: &str, args: &[&Self::Element]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PageElement: Send + Sync {
    async fn text(&self) -> anyhow::Result<String>;

    async fn is_displayed(&self) -> anyhow::Result<bool>;

    async fn is_enabled(&self) -> anyhow::Result<bool>;

    async fn click(&self) -> anyhow::Result<()>;
}
