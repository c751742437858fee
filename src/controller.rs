//! Page controller: owns the toast queue and the scroll-to-top button and
//! reacts to every page event routed to it.

use log::{debug, info};

use crate::behaviors::{self, CardKind, selectors};
use crate::config::GuideConfig;
use crate::notification::{NotificationCenter, ToastId, ToastTiming, Transition};
use crate::surface::{Patch, Surface, apply_all};

/// Elements found at init that need event listeners
#[derive(Debug, Clone, PartialEq)]
pub struct Bindings<E> {
    pub nav_links: Vec<E>,
    /// Component and guide cards waiting to be revealed
    pub cards: Vec<E>,
    pub component_cards: Vec<E>,
    pub guide_buttons: Vec<E>,
    pub table_rows: Vec<E>,
    pub scroll_button: Option<E>,
}

pub struct PageController<S: Surface> {
    surface: S,
    config: GuideConfig,
    toasts: NotificationCenter<S::Element>,
    scroll_button: Option<S::Element>,
    revealed: Vec<S::Element>,
}

impl<S: Surface> PageController<S> {
    pub fn new(surface: S, config: GuideConfig) -> Self {
        let toasts = NotificationCenter::new(ToastTiming::from_config(&config), config.max_toasts);
        PageController {
            surface,
            config,
            toasts,
            scroll_button: None,
            revealed: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn config(&self) -> &GuideConfig {
        &self.config
    }

    pub fn toasts(&self) -> &NotificationCenter<S::Element> {
        &self.toasts
    }

    /// Prepare the page and report what needs listeners
    pub fn init(&mut self, year: i32) -> Bindings<S::Element> {
        let component_cards = self.surface.query_all(selectors::COMPONENT_CARDS);
        let guide_cards = self.surface.query_all(selectors::GUIDE_CARDS);

        for card in &component_cards {
            self.patch(&behaviors::hide_card(card.clone(), CardKind::Component, &self.config));
        }
        for card in &guide_cards {
            self.patch(&behaviors::hide_card(card.clone(), CardKind::Guide, &self.config));
        }

        self.refresh_footer(year);
        self.scroll_button = self.create_scroll_button();

        let bindings = Bindings {
            nav_links: self.surface.query_all(selectors::NAV_LINKS),
            cards: component_cards.iter().chain(&guide_cards).cloned().collect(),
            component_cards,
            guide_buttons: self.surface.query_all(selectors::GUIDE_BUTTONS),
            table_rows: self.surface.query_all(selectors::TABLE_ROWS),
            scroll_button: self.scroll_button.clone(),
        };

        debug!(
            "Wired {} nav links, {} cards, {} guide buttons, {} table rows",
            bindings.nav_links.len(),
            bindings.cards.len(),
            bindings.guide_buttons.len(),
            bindings.table_rows.len()
        );

        bindings
    }

    /// Scroll to the section a nav link points at. Returns whether a
    /// target was found.
    pub fn on_nav_click(&mut self, link: &S::Element) -> bool {
        let Some(href) = self.surface.attribute(link, "href") else {
            return false;
        };
        let Some(target) = behaviors::fragment_id(&href).and_then(|id| self.surface.element_by_id(id))
        else {
            return false;
        };

        let top = behaviors::nav_scroll_top(self.surface.offset_top(&target), self.config.header_offset);
        self.patch(&[Patch::ScrollTo(top)]);
        true
    }

    /// Feed an intersection report for a card. Returns true once the card
    /// is revealed, after which it no longer needs watching.
    pub fn on_intersection(&mut self, card: &S::Element, ratio: f64) -> bool {
        if self.is_revealed(card) {
            return true;
        }
        if !behaviors::crosses_threshold(ratio, self.config.reveal_threshold) {
            return false;
        }

        self.patch(&behaviors::reveal_card(card.clone()));
        self.revealed.push(card.clone());
        true
    }

    pub fn is_revealed(&self, card: &S::Element) -> bool {
        self.revealed.contains(card)
    }

    /// Announce that the clicked button's guide is not written yet
    pub fn on_guide_button(&self, button: &S::Element) -> Option<String> {
        let card = self.surface.closest(button, selectors::GUIDE_CARDS)?;
        let heading = self.surface.find_within(&card, selectors::CARD_HEADING)?;
        let message = behaviors::guide_dialog_text(&self.surface.text(&heading));

        self.patch(&[Patch::Alert(message.clone())]);
        Some(message)
    }

    pub fn on_component_card(&mut self, card: &S::Element, now: u64) -> Option<ToastId> {
        let category = self.surface.attribute(card, selectors::COMPONENT_ATTR);
        let heading = self.surface.find_within(card, selectors::CARD_HEADING)?;
        let name = self.surface.text(&heading);

        info!("{}", behaviors::selection_line(&name, category.as_deref()));
        self.notify(&behaviors::toast_message(&name), now)
    }

    /// Show a toast with `message`
    pub fn notify(&mut self, message: &str, now: u64) -> Option<ToastId> {
        let element = self.surface.create_element("div")?;
        let (id, transitions) = self.toasts.spawn(now, element.clone(), message.to_string());

        self.surface
            .set_attribute(&element, selectors::TOAST_ID_ATTR, &id.to_string());
        self.patch(&behaviors::toast_setup(element, message, &self.config));
        self.render_toasts(transitions);

        Some(id)
    }

    pub fn on_scroll(&self) {
        if let Some(button) = &self.scroll_button {
            let patch = behaviors::scroll_button_opacity(
                button.clone(),
                self.surface.scroll_y(),
                self.config.scroll_button_threshold,
            );
            self.patch(&[patch]);
        }
    }

    pub fn on_scroll_top_click(&self) {
        self.patch(&[Patch::ScrollTo(0.0)]);
    }

    pub fn on_row_hover(&self, row: &S::Element, entered: bool) {
        let patch = behaviors::row_hover(row.clone(), entered, &self.config.row_hover_color);
        self.patch(&[patch]);
    }

    /// Run every toast step due at `now`
    pub fn tick(&mut self, now: u64) {
        let transitions = self.toasts.tick(now);
        self.render_toasts(transitions);
    }

    /// Milliseconds from `now` until the next toast step, if any
    pub fn next_wakeup(&self, now: u64) -> Option<u64> {
        self.toasts.next_due().map(|due| due.saturating_sub(now))
    }

    fn refresh_footer(&self, year: i32) {
        if let Some(line) = self.surface.query(selectors::FOOTER_LINE) {
            self.patch(&[Patch::Text {
                target: line,
                text: behaviors::copyright_line(year),
            }]);
        }
    }

    fn create_scroll_button(&self) -> Option<S::Element> {
        let button = self.surface.create_element("button")?;
        self.patch(&behaviors::scroll_button_setup(button.clone(), &self.config));
        Some(button)
    }

    fn render_toasts(&self, transitions: Vec<Transition<S::Element>>) {
        for transition in transitions {
            debug!("Toast {} -> {:?}", transition.id, transition.phase);
            self.patch(&behaviors::toast_phase(transition.element, transition.phase));
        }
    }

    fn patch(&self, patches: &[Patch<S::Element>]) {
        apply_all(&self.surface, patches);
    }
}
