//! Board settings read from an optional JSON file.

use std::path::Path;
use std::time::Duration;

use lazyview_foundation::{ThrottlePolicy, VirtualListConfig, DEFAULT_OFFSET_BUFFER};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;
use crate::template;

pub const DEFAULT_ROW_TEMPLATE: &str = "{{title}} | {{description}} | {{date}} -> {{deadline}}";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulePolicy {
    #[default]
    Throttle,
    Debounce,
}

impl From<SchedulePolicy> for ThrottlePolicy {
    fn from(policy: SchedulePolicy) -> Self {
        match policy {
            SchedulePolicy::Throttle => ThrottlePolicy::Throttle,
            SchedulePolicy::Debounce => ThrottlePolicy::Debounce,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub item_height: f32,
    pub gap: f32,
    pub offset_buffer: usize,
    pub throttle_ms: u64,
    pub policy: SchedulePolicy,
    pub display_height: f32,
    pub row_template: String,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            // 59px rows with no gap, the height the board has always used.
            item_height: 59.0,
            gap: 0.0,
            offset_buffer: DEFAULT_OFFSET_BUFFER,
            throttle_ms: 50,
            policy: SchedulePolicy::Throttle,
            display_height: 600.0,
            row_template: DEFAULT_ROW_TEMPLATE.to_string(),
        }
    }
}

impl BoardSettings {
    /// Reads settings from `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let settings: Self = serde_json::from_str(&contents)?;
        settings.warn_unknown_placeholders();
        Ok(settings)
    }

    pub fn list_config(&self) -> VirtualListConfig {
        VirtualListConfig::new()
            .item_height(self.item_height)
            .gap(self.gap)
            .offset_buffer(self.offset_buffer)
            .throttle_interval(Duration::from_millis(self.throttle_ms))
            .throttle_policy(self.policy.into())
            .display_height(self.display_height)
    }

    fn warn_unknown_placeholders(&self) {
        const KNOWN: [&str; 5] = ["title", "description", "date", "deadline", "status"];
        for name in template::placeholders(&self.row_template) {
            if !KNOWN.contains(&name) {
                log::warn!("row template uses unknown placeholder {{{{{name}}}}}");
            }
        }
    }
}
