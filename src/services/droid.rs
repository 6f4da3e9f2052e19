use async_trait::async_trait;
use serde_json::Value;
use thirtyfour::{
    By, CapabilitiesHelper, ChromiumLikeCapabilities, DesiredCapabilities, Proxy, WebDriver,
    WebElement,
};

use crate::configuration::WebDriverSettings;

use super::{ListingPage, Locator, PageElement};

pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &WebDriverSettings) -> anyhow::Result<Self> {
        let mut caps = DesiredCapabilities::chrome();

        if settings.headless {
            caps.set_headless()?;
        }

        if let Some(proxy_url) = &settings.proxy {
            let proxy = Proxy::Manual {
                ftp_proxy: None,
                http_proxy: Some(proxy_url.clone()),
                ssl_proxy: Some(proxy_url.clone()),
                socks_proxy: None,
                socks_version: None,
                socks_username: None,
                socks_password: None,
                no_proxy: None,
            };
            caps.set_proxy(proxy)?;
        }

        let driver = WebDriver::new(settings.server_url.as_str(), caps).await?;
        if settings.maximize_window {
            driver.maximize_window().await?;
        }

        log::info!("Started webdriver session on {}", settings.server_url);

        Ok(Droid { driver })
    }

    pub async fn quit(self) -> anyhow::Result<()> {
        self.driver.quit().await?;
        log::info!("Browser closed.");
        Ok(())
    }
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::ClassName(name) => By::ClassName(name.as_str()),
        Locator::Css(selector) => By::Css(selector.as_str()),
        Locator::XPath(path) => By::XPath(path.as_str()),
    }
}

#[async_trait]
impl ListingPage for Droid {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> anyhow::Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn query_elements(&self, locator: &Locator) -> anyhow::Result<Vec<WebElement>> {
        Ok(self.driver.find_all(to_by(locator)).await?)
    }

    async fn execute_script(&self, script: &str, args: &[&WebElement]) -> anyhow::Result<()> {
        let args = args
            .iter()
            .map(|element| element.to_json())
            .collect::<Result<Vec<Value>, _>>()?;

        self.driver.execute(script, args).await?;
        Ok(())
    }
}

#[async_trait]
impl PageElement for WebElement {
    async fn text(&self) -> anyhow::Result<String> {
        Ok(WebElement::text(self).await?)
    }

    async fn is_displayed(&self) -> anyhow::Result<bool> {
        Ok(WebElement::is_displayed(self).await?)
    }

    async fn is_enabled(&self) -> anyhow::Result<bool> {
        Ok(WebElement::is_enabled(self).await?)
    }

    async fn click(&self) -> anyhow::Result<()> {
        WebElement::click(self).await?;
        Ok(())
    }
}
