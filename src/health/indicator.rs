//! Visual indicator for the endpoint's health.

use crate::config::IndicatorConfig;
use crate::health::state::HealthState;
use crate::page::{Selector, SharedDocument};

/// Something that can display a health state.
pub trait Indicator: Send + Sync {
    /// Show the state. Returns false if there was nothing to update.
    fn show(&self, state: HealthState) -> bool;
}

/// Class sets applied and removed for each state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorStyles {
    pub alive: Vec<String>,
    pub down: Vec<String>,
    /// Static-markup classes that neither state keeps.
    pub stale: Vec<String>,
}

impl IndicatorStyles {
    pub fn from_config(config: &IndicatorConfig) -> Self {
        Self {
            alive: config.alive_classes.clone(),
            down: config.down_classes.clone(),
            stale: config.stale_classes.clone(),
        }
    }

    /// Classes to add and remove for the given state.
    fn delta(&self, state: HealthState) -> (&[String], Vec<&str>) {
        let (add, other) = match state {
            HealthState::Alive => (&self.alive, &self.down),
            HealthState::Down => (&self.down, &self.alive),
        };
        let remove = other
            .iter()
            .chain(self.stale.iter())
            .map(String::as_str)
            .filter(|name| !add.iter().any(|a| a == name))
            .collect();
        (add.as_slice(), remove)
    }
}

impl Default for IndicatorStyles {
    fn default() -> Self {
        Self::from_config(&IndicatorConfig::default())
    }
}

/// Indicator backed by an element on the status page.
///
/// The element is looked up on every call, so it may appear or disappear
/// while the monitor runs.
#[derive(Debug, Clone)]
pub struct PageIndicator {
    document: SharedDocument,
    selector: Selector,
    styles: IndicatorStyles,
}

impl PageIndicator {
    pub fn new(document: SharedDocument, selector: Selector, styles: IndicatorStyles) -> Self {
        Self {
            document,
            selector,
            styles,
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

impl Indicator for PageIndicator {
    fn show(&self, state: HealthState) -> bool {
        let mut document = self.document.write();
        let Some(element) = document.query_selector_mut(&self.selector) else {
            return false;
        };

        let (add, remove) = self.styles.delta(state);
        let classes = element.classes_mut();
        classes.remove(&remove);
        classes.add(add);
        true
    }
}
