use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnginePolicyView {
    /// Assertions on an element also require it to be visible
    #[serde(default = "default_true")]
    pub assertion_also_check_visible: bool,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_max_alternates")]
    pub max_alternates: usize,
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_max_alternates() -> usize {
    3
}

fn default_typing_delay_ms() -> u64 {
    80
}

impl Default for EnginePolicyView {
    fn default() -> Self {
        Self {
            assertion_also_check_visible: true,
            settle_delay_ms: default_settle_delay_ms(),
            max_alternates: default_max_alternates(),
            typing_delay_ms: default_typing_delay_ms(),
        }
    }
}

impl EnginePolicyView {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}
