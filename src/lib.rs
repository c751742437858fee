//! PC Components Guide - page interactivity
//! Built with Rust + WASM

pub mod behaviors;
pub mod browser;
pub mod config;
pub mod controller;
pub mod guide;
pub mod notification;
pub mod scheduler;
pub mod surface;

#[cfg(test)]
mod testing;

pub use config::GuideConfig;
pub use controller::{Bindings, PageController};
pub use guide::{GuideRequest, PcGuide};
pub use notification::{ToastId, ToastPhase};

use std::cell::Cell;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

thread_local! {
    static STARTED: Cell<bool> = const { Cell::new(false) };
}

// Wire the guide page with the built-in settings
#[wasm_bindgen]
pub fn start_guide() -> Result<(), JsValue> {
    start_once(GuideConfig::default())
}

// Wire the guide page, overriding any subset of the settings
#[wasm_bindgen]
pub fn start_guide_with_config(config: JsValue) -> Result<(), JsValue> {
    let config = parse_config(config).map_err(|e| {
        log::warn!("{}", e);
        JsValue::from_str(&e)
    })?;
    start_once(config)
}

fn start_once(config: GuideConfig) -> Result<(), JsValue> {
    claim_start().map_err(|e| {
        log::warn!("{}", e);
        JsValue::from_str(&e)
    })?;
    browser::start(config).inspect_err(|_| release_start())
}

/// Second and later calls fail; the page is wired at most once
fn claim_start() -> Result<(), String> {
    if STARTED.with(|started| started.replace(true)) {
        Err("Guide page is already wired".to_string())
    } else {
        Ok(())
    }
}

fn release_start() {
    STARTED.with(|started| started.set(false));
}

fn parse_config(config: JsValue) -> Result<GuideConfig, String> {
    if config.is_undefined() || config.is_null() {
        return Ok(GuideConfig::default());
    }

    let config: GuideConfig = serde_wasm_bindgen::from_value(config)
        .map_err(|e| format!("Invalid config: {:?}", e))?;
    config.validate()?;
    Ok(config)
}
