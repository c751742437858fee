//! Page tuning knobs, deserialized from an optional JS object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuideConfig {
    /// Height of the fixed header kept clear when jumping to a section
    pub header_offset: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub reveal_shift_px: f64,
    pub reveal_transition: String,
    pub toast_enter_delay_ms: u64,
    /// Time from creation until the toast starts sliding out
    pub toast_display_ms: u64,
    pub toast_transition_ms: u64,
    /// Upper bound on live toasts; `None` lets them pile up
    pub max_toasts: Option<usize>,
    pub scroll_button_threshold: f64,
    pub row_hover_color: String,
    pub accent_color: String,
}

impl Default for GuideConfig {
    fn default() -> Self {
        GuideConfig {
            header_offset: 80.0,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_shift_px: 30.0,
            reveal_transition: "opacity 0.6s ease, transform 0.6s ease".to_string(),
            toast_enter_delay_ms: 100,
            toast_display_ms: 3000,
            toast_transition_ms: 300,
            max_toasts: None,
            scroll_button_threshold: 300.0,
            row_hover_color: "#f8f9fa".to_string(),
            accent_color: "#667eea".to_string(),
        }
    }
}

impl GuideConfig {
    /// Parse a JSON document, filling absent fields with defaults
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: GuideConfig =
            serde_json::from_str(json).map_err(|e| format!("Invalid config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.reveal_threshold) {
            return Err(format!(
                "revealThreshold must be between 0 and 1, got {}",
                self.reveal_threshold
            ));
        }
        if self.toast_display_ms < self.toast_enter_delay_ms {
            return Err(format!(
                "toastDisplayMs ({}) must not be shorter than toastEnterDelayMs ({})",
                self.toast_display_ms, self.toast_enter_delay_ms
            ));
        }
        if self.max_toasts == Some(0) {
            return Err("maxToasts must be at least 1".to_string());
        }
        Ok(())
    }
}
