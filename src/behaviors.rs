//! Page behaviors as pure functions from inputs to patches

use crate::config::GuideConfig;
use crate::notification::ToastPhase;
use crate::surface::Patch;

/// Markup hooks provided by the guide's HTML
pub mod selectors {
    pub const NAV_LINKS: &str = ".nav-links a";
    pub const COMPONENT_CARDS: &str = ".component-card";
    pub const GUIDE_CARDS: &str = ".guide-card";
    pub const GUIDE_BUTTONS: &str = ".guide-btn";
    pub const CARD_HEADING: &str = "h3";
    pub const FOOTER_LINE: &str = "footer p:first-child";
    pub const TABLE_ROWS: &str = ".comparison-table tr";
    pub const COMPONENT_ATTR: &str = "data-component";
    pub const TOAST_ID_ATTR: &str = "data-toast-id";
}

/// Intersection ratios are floats reported by the browser; allow a sliver
/// below the threshold the observer itself fired on.
const RATIO_TOLERANCE: f64 = 1e-3;

const SHADOW: &str = "0 5px 15px rgba(0,0,0,0.2)";
const OFFSCREEN: &str = "translateX(100%)";
const ONSCREEN: &str = "translateX(0)";

/// Element id a same-page link points at (`#cpu` → `cpu`)
pub fn fragment_id(href: &str) -> Option<&str> {
    href.trim()
        .strip_prefix('#')
        .filter(|id| !id.is_empty())
}

/// Scroll position that puts a section just below the fixed header
pub fn nav_scroll_top(offset_top: f64, header_offset: f64) -> f64 {
    (offset_top - header_offset).max(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// Slides up into place
    Component,
    /// Slides in from the left
    Guide,
}

impl CardKind {
    fn hidden_transform(self, shift_px: f64) -> String {
        match self {
            CardKind::Component => format!("translateY({}px)", shift_px),
            CardKind::Guide => format!("translateX(-{}px)", shift_px),
        }
    }
}

pub fn hide_card<E>(card: E, kind: CardKind, config: &GuideConfig) -> Vec<Patch<E>>
where
    E: Clone,
{
    vec![
        Patch::style(card.clone(), "opacity", "0"),
        Patch::style(card.clone(), "transform", kind.hidden_transform(config.reveal_shift_px)),
        Patch::style(card, "transition", config.reveal_transition.as_str()),
    ]
}

pub fn reveal_card<E: Clone>(card: E) -> Vec<Patch<E>> {
    vec![
        Patch::style(card.clone(), "opacity", "1"),
        Patch::style(card, "transform", "translateY(0)"),
    ]
}

pub fn crosses_threshold(ratio: f64, threshold: f64) -> bool {
    ratio > 0.0 && ratio + RATIO_TOLERANCE >= threshold
}

pub fn guide_dialog_text(title: &str) -> String {
    format!("Гайд \"{}\" находится в разработке! Скоро будет доступен.", title)
}

pub fn copyright_line(year: i32) -> String {
    format!("© {} PC Components Guide. Все права защищены.", year)
}

pub fn selection_line(name: &str, category: Option<&str>) -> String {
    format!("Выбрано: {} ({})", name, category.unwrap_or("null"))
}

pub fn toast_message(name: &str) -> String {
    format!("Подробная информация о {}", name)
}

/// Styling for a freshly created toast, parked off-screen to the right
pub fn toast_setup<E: Clone>(toast: E, message: &str, config: &GuideConfig) -> Vec<Patch<E>> {
    let transition = format!("transform {}s ease", seconds(config.toast_transition_ms));
    let mut patches: Vec<Patch<E>> = [
        ("position", "fixed"),
        ("top", "20px"),
        ("right", "20px"),
        ("background", config.accent_color.as_str()),
        ("color", "white"),
        ("padding", "1rem 1.5rem"),
        ("border-radius", "5px"),
        ("box-shadow", SHADOW),
        ("z-index", "1000"),
        ("transform", OFFSCREEN),
        ("transition", transition.as_str()),
    ]
    .into_iter()
    .map(|(property, value)| Patch::style(toast.clone(), property, value))
    .collect();

    patches.push(Patch::Text {
        target: toast.clone(),
        text: message.to_string(),
    });
    patches.push(Patch::Append(toast));
    patches
}

/// What the page does when a toast enters `phase`
pub fn toast_phase<E>(toast: E, phase: ToastPhase) -> Vec<Patch<E>> {
    match phase {
        // Attached by `toast_setup`
        ToastPhase::Created => Vec::new(),
        ToastPhase::Showing => vec![Patch::style(toast, "transform", ONSCREEN)],
        ToastPhase::Displayed => Vec::new(),
        ToastPhase::Hiding => vec![Patch::style(toast, "transform", OFFSCREEN)],
        ToastPhase::Removed => vec![Patch::Remove(toast)],
    }
}

pub fn scroll_button_setup<E: Clone>(button: E, config: &GuideConfig) -> Vec<Patch<E>> {
    let mut patches: Vec<Patch<E>> = [
        ("position", "fixed"),
        ("bottom", "30px"),
        ("right", "30px"),
        ("width", "50px"),
        ("height", "50px"),
        ("background", config.accent_color.as_str()),
        ("color", "white"),
        ("border", "none"),
        ("border-radius", "50%"),
        ("font-size", "1.5rem"),
        ("cursor", "pointer"),
        ("opacity", "0"),
        ("transition", "all 0.3s ease"),
        ("z-index", "999"),
        ("box-shadow", SHADOW),
    ]
    .into_iter()
    .map(|(property, value)| Patch::style(button.clone(), property, value))
    .collect();

    patches.push(Patch::Text {
        target: button.clone(),
        text: "↑".to_string(),
    });
    patches.push(Patch::Append(button));
    patches
}

pub fn scroll_button_opacity<E>(button: E, scroll_y: f64, threshold: f64) -> Patch<E> {
    let opacity = if scroll_y > threshold { "1" } else { "0" };
    Patch::style(button, "opacity", opacity)
}

pub fn row_hover<E>(row: E, entered: bool, color: &str) -> Patch<E> {
    if entered {
        Patch::style(row, "background-color", color)
    } else {
        Patch::ClearStyle {
            target: row,
            property: "background-color",
        }
    }
}

fn seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}
