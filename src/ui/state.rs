// src/ui/state.rs - Application state management and context

use std::time::Duration;

use dioxus::prelude::*;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::form::{DraftCell, NoticeLevel, Notifier, ProductDraft};
use crate::ui::Notification;

/// Application state context that provides global state to all components
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppStateContext {
    pub is_loading: bool,
    pub notifications: Vec<Notification>,
}

/// Actions that can be performed on the application state
#[derive(Debug, Clone)]
pub enum AppAction {
    SetLoading(bool),
    AddNotification(Notification),
    RemoveNotification(Uuid),
    ClearNotifications,
}

/// State reducer function
pub fn app_state_reducer(state: &AppStateContext, action: AppAction) -> AppStateContext {
    let mut new_state = state.clone();

    match action {
        AppAction::SetLoading(loading) => {
            new_state.is_loading = loading;
        }
        AppAction::AddNotification(notification) => {
            new_state.notifications.push(notification);
        }
        AppAction::RemoveNotification(id) => {
            new_state.notifications.retain(|n| n.id != id);
        }
        AppAction::ClearNotifications => {
            new_state.notifications.clear();
        }
    }

    new_state
}

/// Application state provider component
#[component]
pub fn AppStateProvider(children: Element) -> Element {
    let config = use_context::<AppConfig>();
    let timeout_ms = config.ui.notification_timeout_ms;

    let mut state = use_signal(AppStateContext::default);

    let get_state = use_callback(move |_: ()| state());

    let dispatch = use_callback(move |action: AppAction| {
        let expiring = match &action {
            AppAction::AddNotification(notification) if timeout_ms > 0 => Some(notification.id),
            _ => None,
        };

        let next = app_state_reducer(&state.peek(), action);
        state.set(next);

        if let Some(id) = expiring {
            spawn(async move {
                crate::platform::sleep(Duration::from_millis(timeout_ms)).await;
                let next = app_state_reducer(&state.peek(), AppAction::RemoveNotification(id));
                state.set(next);
            });
        }
    });

    use_context_provider(|| get_state);
    use_context_provider(|| dispatch);

    rsx! {
        {children}
    }
}

/// Hook to access the current application state
pub fn use_app_state() -> AppStateContext {
    let get_state = use_context::<Callback<(), AppStateContext>>();
    get_state.call(())
}

/// Hook to dispatch actions to the application state
pub fn use_app_dispatch() -> Callback<AppAction> {
    use_context::<Callback<AppAction>>()
}

/// Hook for notification management
pub fn use_notifications() -> (Vec<Notification>, Callback<Uuid>) {
    let state = use_app_state();
    let dispatch = use_app_dispatch();

    let remove = use_callback(move |id: Uuid| dispatch.call(AppAction::RemoveNotification(id)));

    (state.notifications, remove)
}

/// The page keeps its draft in a signal; writes go through `with_mut` so
/// every subscriber re-renders.
impl DraftCell for Signal<ProductDraft> {
    fn snapshot(&self) -> ProductDraft {
        self.peek().clone()
    }

    fn inspect<R>(&self, f: impl FnOnce(&ProductDraft) -> R) -> R {
        f(&*self.peek())
    }

    fn apply<F>(&self, update: F)
    where
        F: FnOnce(&ProductDraft) -> ProductDraft,
    {
        let mut signal = *self;
        signal.with_mut(|state| {
            let next = update(state);
            *state = next;
        });
    }
}

/// Routes form notices into the toast stack
#[derive(Clone, Copy)]
pub struct UiNotifier {
    dispatch: Callback<AppAction>,
}

impl UiNotifier {
    pub fn new(dispatch: Callback<AppAction>) -> Self {
        Self { dispatch }
    }
}

impl Notifier for UiNotifier {
    fn notify(&self, level: NoticeLevel, title: &str, message: &str) {
        self.dispatch.call(AppAction::AddNotification(Notification::new(
            level.into(),
            title,
            message,
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::NotificationType;

    #[test]
    fn test_default_app_state() {
        let state = AppStateContext::default();
        assert!(!state.is_loading);
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn test_app_state_reducer() {
        let initial_state = AppStateContext::default();

        let new_state = app_state_reducer(&initial_state, AppAction::SetLoading(true));
        assert!(new_state.is_loading);
        assert!(!initial_state.is_loading);
    }

    #[test]
    fn test_notification_actions() {
        let initial_state = AppStateContext::default();
        let notification = Notification::new(
            NotificationType::Success,
            "Saved",
            "Product added successfully!",
        );

        let new_state = app_state_reducer(&initial_state, AppAction::AddNotification(notification.clone()));
        assert_eq!(new_state.notifications.len(), 1);

        let other = Notification::new(NotificationType::Warning, "Check", "Variant 2 has no images");
        let newer_state = app_state_reducer(&new_state, AppAction::AddNotification(other.clone()));
        assert_eq!(newer_state.notifications.len(), 2);

        let final_state = app_state_reducer(&newer_state, AppAction::RemoveNotification(notification.id));
        assert_eq!(final_state.notifications, vec![other.clone()]);

        let final_state = app_state_reducer(&final_state, AppAction::RemoveNotification(other.id));
        assert!(final_state.notifications.is_empty());
    }

    #[test]
    fn test_clear_notifications() {
        let mut state = AppStateContext::default();
        for level in [NoticeLevel::Success, NoticeLevel::Warning, NoticeLevel::Error] {
            state = app_state_reducer(
                &state,
                AppAction::AddNotification(Notification::new(level.into(), "t", "m")),
            );
        }
        assert_eq!(state.notifications[1].notification_type, NotificationType::Warning);

        let cleared = app_state_reducer(&state, AppAction::ClearNotifications);
        assert!(cleared.notifications.is_empty());
    }
}
