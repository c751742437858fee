//! Toast notifications: phase machine and independent timer chains
//!
//! A toast walks `Created → Showing → Displayed → Hiding → Removed`. Each
//! step is a timer on the shared [`Timeline`]; toasts never wait on each
//! other, and nothing here touches the page. The caller turns every
//! reported [`Transition`] into page patches.

use std::fmt;

use uuid::Uuid;

use crate::config::GuideConfig;
use crate::scheduler::{TimerId, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    fn new() -> Self {
        ToastId(Uuid::new_v4())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Attached off-screen
    Created,
    /// Sliding in
    Showing,
    Displayed,
    /// Sliding out
    Hiding,
    /// Detached from the page
    Removed,
}

impl ToastPhase {
    pub fn is_live(self) -> bool {
        matches!(self, ToastPhase::Created | ToastPhase::Showing | ToastPhase::Displayed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    pub enter_delay_ms: u64,
    pub display_ms: u64,
    pub transition_ms: u64,
}

impl ToastTiming {
    pub fn from_config(config: &GuideConfig) -> Self {
        ToastTiming {
            enter_delay_ms: config.toast_enter_delay_ms,
            display_ms: config.toast_display_ms,
            transition_ms: config.toast_transition_ms,
        }
    }

    /// Offset from creation at which the toast starts sliding out. Never
    /// earlier than the end of the slide-in.
    fn hide_offset(&self) -> u64 {
        self.display_ms
            .max(self.enter_delay_ms.saturating_add(self.transition_ms))
    }

    /// Absolute deadline of the step that follows `toast`'s current phase.
    /// Deadlines hang off the creation time (or the moment a dismissal
    /// started the slide-out), never off when a timer actually fired.
    fn next_step<E>(&self, toast: &Toast<E>) -> Option<(u64, ToastPhase)> {
        let created = toast.created_at;
        let hiding_at = toast
            .hiding_at
            .unwrap_or_else(|| created.saturating_add(self.hide_offset()));

        match toast.phase {
            ToastPhase::Created => Some((
                created.saturating_add(self.enter_delay_ms),
                ToastPhase::Showing,
            )),
            ToastPhase::Showing => Some((
                created
                    .saturating_add(self.enter_delay_ms)
                    .saturating_add(self.transition_ms),
                ToastPhase::Displayed,
            )),
            ToastPhase::Displayed => Some((hiding_at, ToastPhase::Hiding)),
            ToastPhase::Hiding => Some((
                hiding_at.saturating_add(self.transition_ms),
                ToastPhase::Removed,
            )),
            ToastPhase::Removed => None,
        }
    }
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self::from_config(&GuideConfig::default())
    }
}

/// A phase change the page has to reflect
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<E> {
    pub id: ToastId,
    pub element: E,
    pub phase: ToastPhase,
}

#[derive(Debug)]
struct Toast<E> {
    id: ToastId,
    element: E,
    message: String,
    phase: ToastPhase,
    timer: Option<TimerId>,
    created_at: u64,
    /// Set when a dismissal starts the slide-out ahead of schedule
    hiding_at: Option<u64>,
}

#[derive(Debug)]
pub struct NotificationCenter<E> {
    timing: ToastTiming,
    max_live: Option<usize>,
    timeline: Timeline<(ToastId, ToastPhase)>,
    toasts: Vec<Toast<E>>,
}

impl<E: Clone> NotificationCenter<E> {
    pub fn new(timing: ToastTiming, max_live: Option<usize>) -> Self {
        NotificationCenter {
            timing,
            max_live,
            timeline: Timeline::new(),
            toasts: Vec::new(),
        }
    }

    /// Start a toast. The returned transitions begin with its `Created`
    /// step, followed by any older toast pushed out by the live limit.
    pub fn spawn(&mut self, now: u64, element: E, message: String) -> (ToastId, Vec<Transition<E>>) {
        let id = ToastId::new();
        let mut toast = Toast {
            id,
            element,
            message,
            phase: ToastPhase::Created,
            timer: None,
            created_at: now,
            hiding_at: None,
        };
        self.arm(&mut toast);

        let mut transitions = vec![Transition {
            id,
            element: toast.element.clone(),
            phase: ToastPhase::Created,
        }];
        self.toasts.push(toast);

        if let Some(max) = self.max_live {
            while self.live_count() > max {
                let Some(oldest) = self.toasts.iter().find(|t| t.phase.is_live()).map(|t| t.id)
                else {
                    break;
                };
                transitions.extend(self.dismiss(now, oldest));
            }
        }

        (id, transitions)
    }

    /// Advance every toast whose next step is due. A late tick runs all
    /// the steps it missed, in order.
    pub fn tick(&mut self, now: u64) -> Vec<Transition<E>> {
        let mut transitions = Vec::new();

        loop {
            let due = self.timeline.drain_due(now);
            if due.is_empty() {
                break;
            }

            for (_, (id, phase)) in due {
                let Some(index) = self.toasts.iter().position(|t| t.id == id) else {
                    continue;
                };

                let mut toast = self.toasts.remove(index);
                toast.phase = phase;
                toast.timer = None;
                transitions.push(Transition {
                    id,
                    element: toast.element.clone(),
                    phase,
                });

                if phase != ToastPhase::Removed {
                    self.arm(&mut toast);
                    self.toasts.insert(index, toast);
                }
            }
        }

        transitions
    }

    /// Skip straight to sliding out. Returns `None` if the toast is unknown
    /// or already on its way out.
    pub fn dismiss(&mut self, now: u64, id: ToastId) -> Option<Transition<E>> {
        let index = self.toasts.iter().position(|t| t.id == id)?;
        if !self.toasts[index].phase.is_live() {
            return None;
        }

        let mut toast = self.toasts.remove(index);
        if let Some(timer) = toast.timer.take() {
            self.timeline.cancel(timer);
        }
        toast.phase = ToastPhase::Hiding;
        toast.hiding_at = Some(now);
        self.arm(&mut toast);

        let transition = Transition {
            id,
            element: toast.element.clone(),
            phase: ToastPhase::Hiding,
        };
        self.toasts.insert(index, toast);
        Some(transition)
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timeline.next_due()
    }

    pub fn phase(&self, id: ToastId) -> Option<ToastPhase> {
        self.toasts.iter().find(|t| t.id == id).map(|t| t.phase)
    }

    pub fn message(&self, id: ToastId) -> Option<&str> {
        self.toasts.iter().find(|t| t.id == id).map(|t| t.message.as_str())
    }

    /// Toasts still attached to the page, in any phase
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.toasts.iter().filter(|t| t.phase.is_live()).count()
    }

    fn arm(&mut self, toast: &mut Toast<E>) {
        if let Some((due, next)) = self.timing.next_step(toast) {
            toast.timer = Some(self.timeline.schedule_at(due, (toast.id, next)));
        }
    }
}
