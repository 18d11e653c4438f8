//! Badge stylesheet and once-per-process style registration

use std::collections::HashSet;
use std::sync::Mutex;

use once_cell::sync::Lazy;

/// Handle under which the badge stylesheet is registered
pub const BADGE_STYLE_HANDLE: &str = "gbp-badge";

/// Stylesheet shared by every badge on a page
pub const BADGE_CSS: &str = concat!(
    ".gbp-badge{display:inline-flex;align-items:center;color:#1E2A3A;border-radius:9999px;padding:6px 12px;font-size:14px;line-height:1.2;font-weight:600;font-family:inherit;gap:10px;}",
    ".gbp-badge .gbp-badge-visual{display:inline-flex;align-items:center;gap:8px;}",
    ".gbp-badge .gbp-badge-icon-wrap{display:inline-flex;align-items:center;}",
    ".gbp-badge .gbp-badge-google-icon{width:22px;height:22px;flex-shrink:0;}",
    ".gbp-badge .gbp-badge-google-icon path{fill:currentColor;}",
    ".gbp-badge .gbp-badge-stars{display:inline-flex;gap:2px;}",
    ".gbp-badge .gbp-badge-star{width:16px;height:16px;display:block;}",
    ".gbp-badge .gbp-badge-star-bg{fill:#4d5d72;}",
    ".gbp-badge .gbp-badge-text{white-space:nowrap;}",
    ".gbp-badge .gbp-badge-text strong{font-weight:700;}",
);

static GLOBAL_REGISTRY: Lazy<StyleRegistry> = Lazy::new(StyleRegistry::new);

/// Set of style handles that have already been emitted
#[derive(Debug, Default)]
pub struct StyleRegistry {
    registered: Mutex<HashSet<String>>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by the whole process
    pub fn global() -> &'static StyleRegistry {
        &GLOBAL_REGISTRY
    }

    /// Marks `handle` as registered; returns true only the first time
    pub fn register(&self, handle: &str) -> bool {
        // A poisoned lock still holds a valid set
        let mut registered = self
            .registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        registered.insert(handle.to_string())
    }

    pub fn is_registered(&self, handle: &str) -> bool {
        self.registered
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(handle)
    }
}

/// Returns the badge stylesheet the first time it is requested in this process
pub fn enqueue_badge_style() -> Option<&'static str> {
    StyleRegistry::global()
        .register(BADGE_STYLE_HANDLE)
        .then_some(BADGE_CSS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_register_is_idempotent() {
        let registry = StyleRegistry::new();
        assert!(!registry.is_registered("badge"));
        assert!(registry.register("badge"));
        assert!(!registry.register("badge"));
        assert!(registry.is_registered("badge"));
        assert!(registry.register("other"));
    }

    #[test]
    fn test_concurrent_registration_succeeds_once() {
        let registry = Arc::new(StyleRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.register("shared"))
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_global_registry_is_shared() {
        let handle = "test-global-registry-handle";
        assert!(StyleRegistry::global().register(handle));
        assert!(StyleRegistry::global().is_registered(handle));
        assert!(!StyleRegistry::global().register(handle));
    }

    #[test]
    fn test_stylesheet_targets_badge_classes() {
        assert!(BADGE_CSS.contains(".gbp-badge{"));
        assert!(BADGE_CSS.contains(".gbp-badge-star-bg{fill:#4d5d72;}"));
    }
}
