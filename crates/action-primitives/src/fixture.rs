//! Scripted in-process document
//!
//! [`ScriptedDocument`] implements [`DocumentPort`] over a static site
//! description loaded from YAML or JSON. It backs dry runs from the CLI and
//! every scenario test: pages, elements with their accessible properties,
//! visibility, and the effects clicks, typing and Enter have on the page.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use stepwright_core_types::{CandidateDescriptor, LocatorStrategy, WaitKind};
use thiserror::Error;
use tracing::debug;

use crate::document::{DocumentPort, ElementHandle, SharedElement};
use crate::errors::ActionError;
use crate::pattern::normalize_whitespace;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const BLANK_URL: &str = "about:blank";

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Static description of a site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteFixture {
    #[serde(default)]
    pub pages: Vec<PageFixture>,

    /// Network never goes idle; only best-effort waits should tolerate it
    #[serde(default)]
    pub fail_network_idle: bool,

    /// Query values the driver errors on
    #[serde(default)]
    pub broken_queries: Vec<String>,
}

impl SiteFixture {
    pub fn single_page(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self::default().with_page(PageFixture::new(url, title))
    }

    pub fn with_page(mut self, page: PageFixture) -> Self {
        self.pages.push(page);
        self
    }

    /// Parse YAML (or JSON, which YAML accepts)
    pub fn from_yaml_str(raw: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    fn page_index(&self, url: &str) -> Option<usize> {
        let wanted = url.trim_end_matches('/');
        self.pages
            .iter()
            .position(|page| page.url.trim_end_matches('/') == wanted)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageFixture {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub elements: Vec<ElementFixture>,
}

impl PageFixture {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: ElementFixture) -> Self {
        self.elements.push(element);
        self
    }
}

/// Page changes triggered by an interaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Effect {
    #[serde(default)]
    pub navigate: Option<String>,
    #[serde(default)]
    pub reveal: Vec<String>,
    #[serde(default)]
    pub hide: Vec<String>,
}

impl Effect {
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            navigate: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn reveal(keys: &[&str]) -> Self {
        Self {
            reveal: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }
}

fn default_tag() -> String {
    "div".to_string()
}

fn default_visible() -> bool {
    true
}

/// One element on a page. `key` is unique within the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementFixture {
    pub key: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub role: Option<String>,
    /// Accessible name; falls back to aria label, text, then label
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub test_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub aria_label: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Selectors this element answers to beyond the simple forms
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub xpath: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub on_click: Option<Effect>,
    #[serde(default)]
    pub on_type: Option<Effect>,
    #[serde(default)]
    pub on_enter: Option<Effect>,
}

impl ElementFixture {
    pub fn new(key: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            tag: tag.into(),
            role: None,
            name: None,
            text: None,
            id: None,
            test_id: None,
            label: None,
            placeholder: None,
            aria_label: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            css: Vec::new(),
            xpath: Vec::new(),
            visible: true,
            frame: None,
            options: Vec::new(),
            on_click: None,
            on_type: None,
            on_enter: None,
        }
    }

    pub fn with_role(mut self, role: &str, name: Option<&str>) -> Self {
        self.role = Some(role.to_string());
        self.name = name.map(str::to_string);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_test_id(mut self, test_id: &str) -> Self {
        self.test_id = Some(test_id.to_string());
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_aria_label(mut self, aria_label: &str) -> Self {
        self.aria_label = Some(aria_label.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_css(mut self, selector: &str) -> Self {
        self.css.push(selector.to_string());
        self
    }

    pub fn with_xpath(mut self, xpath: &str) -> Self {
        self.xpath.push(xpath.to_string());
        self
    }

    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|o| o.to_string()).collect();
        self
    }

    pub fn in_frame(mut self, frame: &str) -> Self {
        self.frame = Some(frame.to_string());
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn on_click(mut self, effect: Effect) -> Self {
        self.on_click = Some(effect);
        self
    }

    pub fn on_type(mut self, effect: Effect) -> Self {
        self.on_type = Some(effect);
        self
    }

    pub fn on_enter(mut self, effect: Effect) -> Self {
        self.on_enter = Some(effect);
        self
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "data-testid" => self.test_id.as_deref(),
            "placeholder" => self.placeholder.as_deref(),
            "aria-label" => self.aria_label.as_deref(),
            "role" => self.role.as_deref(),
            other => self.attributes.get(other).map(String::as_str),
        }
    }

    fn accessible_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.aria_label.as_deref())
            .or(self.text.as_deref())
            .or(self.label.as_deref())
    }

    fn matches(&self, candidate: &CandidateDescriptor) -> bool {
        if self.frame != candidate.frame {
            return false;
        }
        let value = candidate.value_str();
        match candidate.strategy {
            LocatorStrategy::TestHook => self.attribute(candidate.name_str()) == Some(value),
            LocatorStrategy::Id => self.id.as_deref() == Some(value),
            LocatorStrategy::Name => self.attribute("name") == Some(value),
            LocatorStrategy::Class => {
                !value.trim().is_empty()
                    && value
                        .split_whitespace()
                        .all(|class| self.classes.iter().any(|c| c == class))
            }
            LocatorStrategy::Role => {
                let role_ok = self
                    .role
                    .as_deref()
                    .map(|r| r.eq_ignore_ascii_case(candidate.role_str()))
                    .unwrap_or(false);
                let name_ok = match candidate.name.as_deref() {
                    Some(wanted) => self
                        .accessible_name()
                        .map(|name| contains_ignore_case(name, wanted))
                        .unwrap_or(false),
                    None => true,
                };
                role_ok && name_ok
            }
            LocatorStrategy::Label => self
                .label
                .as_deref()
                .map(|label| contains_ignore_case(label, value))
                .unwrap_or(false),
            LocatorStrategy::DataTestId => self.test_id.as_deref() == Some(value),
            LocatorStrategy::Aria => self.aria_label.as_deref() == Some(value),
            LocatorStrategy::Text => self
                .text
                .as_deref()
                .map(|text| normalize_whitespace(text) == normalize_whitespace(value))
                .unwrap_or(false),
            LocatorStrategy::Placeholder => self.placeholder.as_deref() == Some(value),
            LocatorStrategy::Css => {
                self.css.iter().any(|s| s == value) || self.matches_simple_css(value)
            }
            LocatorStrategy::Xpath => {
                let xpath = value.strip_prefix("xpath=").unwrap_or(value);
                self.xpath.iter().any(|x| x == xpath)
            }
            LocatorStrategy::Relative => self
                .text
                .as_deref()
                .map(|text| contains_ignore_case(text, value))
                .unwrap_or(false),
        }
    }

    /// `#id`, `.class`, `[attr='value']` and bare tag selectors
    fn matches_simple_css(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            return self.id.as_deref() == Some(id);
        }
        if let Some(class) = selector.strip_prefix('.') {
            return self.classes.iter().any(|c| c == class);
        }
        if let Some(inner) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            return match inner.split_once('=') {
                Some((attr, raw)) => {
                    let wanted = raw.trim_matches(|c| c == '\'' || c == '"');
                    self.attribute(attr.trim()) == Some(wanted)
                }
                None => self.attribute(inner.trim()).is_some(),
            };
        }
        !selector.is_empty()
            && selector.chars().all(|c| c.is_ascii_alphanumeric())
            && self.tag.eq_ignore_ascii_case(selector)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Default)]
struct DocState {
    page: Option<usize>,
    url: String,
    /// Bumped on every page load; handles from older loads are detached
    epoch: u64,
    visibility: HashMap<String, bool>,
    values: HashMap<String, String>,
    checked: HashSet<String>,
    journal: Vec<String>,
}

struct Shared {
    site: SiteFixture,
    state: Mutex<DocState>,
}

impl Shared {
    fn load(&self, state: &mut DocState, url: &str) -> Result<(), ActionError> {
        let index = self
            .site
            .page_index(url)
            .ok_or_else(|| ActionError::NavigationFailed(format!("no page for {}", url)))?;
        state.page = Some(index);
        state.url = self.site.pages[index].url.clone();
        state.epoch += 1;
        state.visibility.clear();
        state.values.clear();
        state.checked.clear();
        Ok(())
    }

    fn apply(&self, state: &mut DocState, effect: &Effect) -> Result<(), ActionError> {
        for key in &effect.reveal {
            state.visibility.insert(key.clone(), true);
        }
        for key in &effect.hide {
            state.visibility.insert(key.clone(), false);
        }
        if let Some(url) = &effect.navigate {
            state.journal.push(format!("goto:{}", url));
            self.load(state, url)?;
        }
        Ok(())
    }

    fn element(&self, page: usize, key: &str) -> Option<&ElementFixture> {
        self.site
            .pages
            .get(page)
            .and_then(|p| p.elements.iter().find(|e| e.key == key))
    }
}

/// Deterministic [`DocumentPort`] over a [`SiteFixture`].
#[derive(Clone)]
pub struct ScriptedDocument {
    shared: Arc<Shared>,
}

impl ScriptedDocument {
    pub fn new(site: SiteFixture) -> Self {
        let state = DocState {
            url: BLANK_URL.to_string(),
            ..DocState::default()
        };
        Self {
            shared: Arc::new(Shared {
                site,
                state: Mutex::new(state),
            }),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        Ok(Self::new(SiteFixture::from_path(path)?))
    }

    /// Every interaction performed so far, oldest first
    pub fn journal(&self) -> Vec<String> {
        self.shared.state.lock().journal.clone()
    }

    /// Current typed or selected value of an element on the current page
    pub fn value_of(&self, key: &str) -> Option<String> {
        self.shared.state.lock().values.get(key).cloned()
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.shared.state.lock().checked.contains(key)
    }
}

impl fmt::Debug for ScriptedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("ScriptedDocument")
            .field("url", &state.url)
            .field("pages", &self.shared.site.pages.len())
            .finish()
    }
}

#[async_trait]
impl DocumentPort for ScriptedDocument {
    async fn navigate(
        &self,
        url: &str,
        wait: WaitKind,
        _timeout: Duration,
    ) -> Result<(), ActionError> {
        {
            let mut state = self.shared.state.lock();
            state.journal.push(format!("goto:{}", url));
            self.shared.load(&mut state, url)?;
        }
        if wait == WaitKind::NetworkIdle && self.shared.site.fail_network_idle {
            return Err(ActionError::NavTimeout(format!(
                "{} never reached networkIdle",
                url
            )));
        }
        Ok(())
    }

    async fn wait_for_load_state(
        &self,
        state: WaitKind,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        if state == WaitKind::NetworkIdle && self.shared.site.fail_network_idle {
            return Err(ActionError::WaitTimeout(format!(
                "networkIdle not reached within {}ms",
                timeout.as_millis()
            )));
        }
        Ok(())
    }

    async fn query(
        &self,
        candidate: &CandidateDescriptor,
    ) -> Result<Vec<SharedElement>, ActionError> {
        if self
            .shared
            .site
            .broken_queries
            .iter()
            .any(|broken| broken == candidate.value_str())
        {
            return Err(ActionError::Driver(format!(
                "query failed for {}",
                candidate
            )));
        }

        let state = self.shared.state.lock();
        let Some(page) = state.page else {
            return Ok(Vec::new());
        };
        let matches: Vec<SharedElement> = self.shared.site.pages[page]
            .elements
            .iter()
            .filter(|element| element.matches(candidate))
            .map(|element| {
                Arc::new(ScriptedElement {
                    shared: Arc::clone(&self.shared),
                    page,
                    key: element.key.clone(),
                    epoch: state.epoch,
                }) as SharedElement
            })
            .collect();
        debug!(candidate = %candidate, matches = matches.len(), "scripted query");
        Ok(matches)
    }

    async fn capture_structure(&self) -> Result<String, ActionError> {
        let state = self.shared.state.lock();
        let Some(page) = state.page.map(|p| &self.shared.site.pages[p]) else {
            return Ok("<html><head></head><body></body></html>".to_string());
        };
        let mut html = format!(
            "<html><head><title>{}</title></head><body>\n",
            escape(&page.title)
        );
        for element in &page.elements {
            let visible = state
                .visibility
                .get(&element.key)
                .copied()
                .unwrap_or(element.visible);
            html.push_str(&format!("<{} data-key=\"{}\"", element.tag, escape(&element.key)));
            let attrs = [
                ("id", element.id.as_deref()),
                ("data-testid", element.test_id.as_deref()),
                ("role", element.role.as_deref()),
                ("aria-label", element.aria_label.as_deref()),
                ("placeholder", element.placeholder.as_deref()),
            ];
            for (name, value) in attrs {
                if let Some(value) = value {
                    html.push_str(&format!(" {}=\"{}\"", name, escape(value)));
                }
            }
            for (name, value) in &element.attributes {
                html.push_str(&format!(" {}=\"{}\"", name, escape(value)));
            }
            if !element.classes.is_empty() {
                html.push_str(&format!(" class=\"{}\"", escape(&element.classes.join(" "))));
            }
            if let Some(value) = state.values.get(&element.key) {
                html.push_str(&format!(" value=\"{}\"", escape(value)));
            }
            if !visible {
                html.push_str(" hidden");
            }
            html.push('>');
            html.push_str(&escape(element.text.as_deref().unwrap_or_default()));
            html.push_str(&format!("</{}>\n", element.tag));
        }
        html.push_str("</body></html>\n");
        Ok(html)
    }

    async fn capture_visual(&self, full_page: bool) -> Result<Vec<u8>, ActionError> {
        let state = self.shared.state.lock();
        let mut visible: Vec<&str> = Vec::new();
        if let Some(page) = state.page {
            for element in &self.shared.site.pages[page].elements {
                if state
                    .visibility
                    .get(&element.key)
                    .copied()
                    .unwrap_or(element.visible)
                {
                    visible.push(&element.key);
                }
            }
        }
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(
            format!(
                "{}|{}|{}",
                state.url,
                if full_page { "full" } else { "viewport" },
                visible.join(",")
            )
            .as_bytes(),
        );
        Ok(bytes)
    }

    async fn current_url(&self) -> Result<String, ActionError> {
        Ok(self.shared.state.lock().url.clone())
    }

    async fn title(&self) -> Result<String, ActionError> {
        let state = self.shared.state.lock();
        Ok(state
            .page
            .map(|p| self.shared.site.pages[p].title.clone())
            .unwrap_or_default())
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Handle onto one fixture element, bound to the page load it came from.
struct ScriptedElement {
    shared: Arc<Shared>,
    page: usize,
    key: String,
    epoch: u64,
}

impl fmt::Debug for ScriptedElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedElement")
            .field("key", &self.key)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl ScriptedElement {
    fn fixture(&self) -> Result<&ElementFixture, ActionError> {
        self.shared
            .element(self.page, &self.key)
            .ok_or_else(|| ActionError::Internal(format!("unknown element {}", self.key)))
    }

    fn visible_in(&self, state: &DocState, fixture: &ElementFixture) -> bool {
        state.epoch == self.epoch
            && state
                .visibility
                .get(&self.key)
                .copied()
                .unwrap_or(fixture.visible)
    }

    /// Lock state and verify the element can take input
    fn interactable(&self) -> Result<parking_lot::MutexGuard<'_, DocState>, ActionError> {
        let fixture = self.fixture()?;
        let state = self.shared.state.lock();
        if state.epoch != self.epoch {
            return Err(ActionError::NotInteractable(format!(
                "{} is detached from the document",
                self.key
            )));
        }
        if !self.visible_in(&state, fixture) {
            return Err(ActionError::NotInteractable(format!(
                "{} is not visible",
                self.key
            )));
        }
        Ok(state)
    }
}

#[async_trait]
impl ElementHandle for ScriptedElement {
    fn describe(&self) -> String {
        self.key.clone()
    }

    async fn is_visible(&self) -> Result<bool, ActionError> {
        let fixture = self.fixture()?;
        let state = self.shared.state.lock();
        Ok(self.visible_in(&state, fixture))
    }

    async fn click(&self) -> Result<(), ActionError> {
        let fixture = self.fixture()?;
        let mut state = self.interactable()?;
        state.journal.push(format!("click:{}", self.key));
        if let Some(effect) = &fixture.on_click {
            self.shared.apply(&mut state, effect)?;
        }
        Ok(())
    }

    async fn press_sequentially(&self, text: &str, delay: Duration) -> Result<(), ActionError> {
        drop(self.interactable()?);
        for ch in text.chars() {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let mut state = self.interactable()?;
            state.values.entry(self.key.clone()).or_default().push(ch);
        }

        let fixture = self.fixture()?;
        let mut state = self.interactable()?;
        state.journal.push(format!("type:{}:{}", self.key, text));
        if let Some(effect) = &fixture.on_type {
            self.shared.apply(&mut state, effect)?;
        }
        Ok(())
    }

    async fn press(&self, key: &str) -> Result<(), ActionError> {
        let fixture = self.fixture()?;
        let mut state = self.interactable()?;
        state.journal.push(format!("press:{}:{}", self.key, key));
        if key == "Enter" {
            if let Some(effect) = &fixture.on_enter {
                self.shared.apply(&mut state, effect)?;
            }
        }
        Ok(())
    }

    async fn select_option(&self, value: &str) -> Result<(), ActionError> {
        let fixture = self.fixture()?;
        let mut state = self.interactable()?;
        if !fixture.options.iter().any(|option| option == value) {
            return Err(ActionError::OptionNotFound(format!(
                "'{}' not offered by {}",
                value, self.key
            )));
        }
        state.values.insert(self.key.clone(), value.to_string());
        state.journal.push(format!("select:{}:{}", self.key, value));
        Ok(())
    }

    async fn set_checked(&self, checked: bool) -> Result<(), ActionError> {
        let mut state = self.interactable()?;
        if checked {
            state.checked.insert(self.key.clone());
            state.journal.push(format!("check:{}", self.key));
        } else {
            state.checked.remove(&self.key);
            state.journal.push(format!("uncheck:{}", self.key));
        }
        Ok(())
    }

    async fn hover(&self) -> Result<(), ActionError> {
        let mut state = self.interactable()?;
        state.journal.push(format!("hover:{}", self.key));
        Ok(())
    }

    async fn scroll_into_view(&self) -> Result<(), ActionError> {
        let fixture = self.fixture()?;
        let mut state = self.shared.state.lock();
        if state.epoch != self.epoch {
            return Err(ActionError::NotInteractable(format!(
                "{} is detached from the document",
                fixture.key
            )));
        }
        state.journal.push(format!("scroll:{}", self.key));
        Ok(())
    }

    async fn text_content(&self) -> Result<String, ActionError> {
        let fixture = self.fixture()?;
        let state = self.shared.state.lock();
        Ok(state
            .values
            .get(&self.key)
            .cloned()
            .or_else(|| fixture.text.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "https://shop.test/";

    fn site() -> SiteFixture {
        SiteFixture::default()
            .with_page(
                PageFixture::new(HOME, "Shop")
                    .with_element(
                        ElementFixture::new("login", "button")
                            .with_role("button", Some("Log In"))
                            .with_id("login-btn")
                            .with_text("Log In")
                            .on_click(Effect::navigate("https://shop.test/login")),
                    )
                    .with_element(
                        ElementFixture::new("search", "input")
                            .with_placeholder("Search products")
                            .with_attribute("name", "q")
                            .on_type(Effect::reveal(&["suggestions"])),
                    )
                    .with_element(
                        ElementFixture::new("suggestions", "ul")
                            .with_role("listbox", None)
                            .hidden(),
                    ),
            )
            .with_page(PageFixture::new("https://shop.test/login", "Sign in"))
    }

    async fn loaded() -> ScriptedDocument {
        let document = ScriptedDocument::new(site());
        document
            .navigate(HOME, WaitKind::DomReady, Duration::from_secs(1))
            .await
            .unwrap();
        document
    }

    #[tokio::test]
    async fn test_query_by_strategy() {
        let document = loaded().await;
        let by_role = CandidateDescriptor::role("button", Some("log in"));
        assert_eq!(document.query(&by_role).await.unwrap().len(), 1);

        let by_css = CandidateDescriptor::value(LocatorStrategy::Css, "#login-btn");
        assert_eq!(document.query(&by_css).await.unwrap().len(), 1);

        let by_name = CandidateDescriptor::value(LocatorStrategy::Name, "q");
        assert_eq!(document.query(&by_name).await.unwrap().len(), 1);

        let framed = by_role.clone().with_frame("checkout");
        assert!(document.query(&framed).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_typing_reveals_autosuggest() {
        let document = loaded().await;
        let listbox = CandidateDescriptor::role("listbox", None);
        let hidden = document.query(&listbox).await.unwrap();
        assert!(!hidden[0].is_visible().await.unwrap());

        let search = CandidateDescriptor::value(LocatorStrategy::Placeholder, "Search products");
        let input = document.query(&search).await.unwrap().remove(0);
        input.click().await.unwrap();
        input.press_sequentially("shoes", Duration::ZERO).await.unwrap();

        assert!(hidden[0].is_visible().await.unwrap());
        assert_eq!(document.value_of("search").as_deref(), Some("shoes"));
        assert_eq!(input.text_content().await.unwrap(), "shoes");
    }

    #[tokio::test]
    async fn test_click_navigation_detaches_old_handles() {
        let document = loaded().await;
        let login = document
            .query(&CandidateDescriptor::value(LocatorStrategy::Id, "login-btn"))
            .await
            .unwrap()
            .remove(0);
        login.click().await.unwrap();

        assert_eq!(document.current_url().await.unwrap(), "https://shop.test/login");
        assert_eq!(document.title().await.unwrap(), "Sign in");
        assert!(!login.is_visible().await.unwrap());
        assert!(matches!(
            login.click().await,
            Err(ActionError::NotInteractable(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_page_and_broken_query() {
        let mut site = site();
        site.broken_queries.push("#boom".into());
        let document = ScriptedDocument::new(site);
        assert!(matches!(
            document
                .navigate("https://elsewhere.test", WaitKind::Load, Duration::from_secs(1))
                .await,
            Err(ActionError::NavigationFailed(_))
        ));
        assert_eq!(document.current_url().await.unwrap(), BLANK_URL);

        let broken = CandidateDescriptor::value(LocatorStrategy::Css, "#boom");
        assert!(matches!(
            document.query(&broken).await,
            Err(ActionError::Driver(_))
        ));
    }

    #[tokio::test]
    async fn test_structure_marks_hidden_elements() {
        let document = loaded().await;
        let html = document.capture_structure().await.unwrap();
        assert!(html.contains("<title>Shop</title>"));
        assert!(html.contains("data-key=\"suggestions\" role=\"listbox\" hidden"));

        let visual = document.capture_visual(true).await.unwrap();
        assert!(visual.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn test_fixture_from_yaml() {
        let raw = r#"
pages:
  - url: https://example.test/
    title: Example
    elements:
      - key: cta
        tag: a
        role: link
        name: Careers
        on_click:
          navigate: https://example.test/careers
"#;
        let site = SiteFixture::from_yaml_str(raw).unwrap();
        let element = &site.pages[0].elements[0];
        assert!(element.visible);
        assert_eq!(element.role.as_deref(), Some("link"));
        assert_eq!(
            element.on_click.as_ref().and_then(|e| e.navigate.as_deref()),
            Some("https://example.test/careers")
        );
    }
}
