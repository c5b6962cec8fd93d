//! Debounce between the raw key stream and the navigator.
//!
//! The click wheel and buttons can be set to need several consecutive
//! presses of the same key before one step is taken.  A threshold of 1
//! passes every press, so identical events stay independent transitions.

use crate::core::navigator::NavKey;

#[derive(Debug, Clone)]
pub struct KeyFilter {
    wheel: u8,
    button: u8,
    last: Option<NavKey>,
    count: u8,
}

impl KeyFilter {
    pub fn new(wheel: u8, button: u8) -> Self {
        Self {
            wheel: wheel.max(1),
            button: button.max(1),
            last: None,
            count: 0,
        }
    }

    pub fn set_thresholds(&mut self, wheel: u8, button: u8) {
        *self = Self::new(wheel, button);
    }

    /// Count `key` and report whether it should reach the navigator.
    pub fn admit(&mut self, key: NavKey) -> bool {
        if self.last != Some(key) {
            self.last = Some(key);
            self.count = 0;
        }
        self.count = self.count.saturating_add(1);

        let threshold = match key {
            NavKey::Up | NavKey::Down => self.wheel,
            NavKey::Activate | NavKey::Back => self.button,
        };
        if self.count >= threshold {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

impl Default for KeyFilter {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_one_passes_every_press() {
        let mut filter = KeyFilter::default();
        assert!((0..10).all(|_| filter.admit(NavKey::Down)));
    }

    #[test]
    fn wheel_threshold_applies_to_scroll_keys_only() {
        let mut filter = KeyFilter::new(3, 1);
        let passed: Vec<bool> = (0..6).map(|_| filter.admit(NavKey::Down)).collect();
        assert_eq!(passed, [false, false, true, false, false, true]);
        assert!(filter.admit(NavKey::Activate));
    }

    #[test]
    fn changing_key_restarts_the_count() {
        let mut filter = KeyFilter::new(2, 2);
        assert!(!filter.admit(NavKey::Up));
        assert!(!filter.admit(NavKey::Down));
        assert!(filter.admit(NavKey::Down));
        assert!(!filter.admit(NavKey::Back));
        assert!(filter.admit(NavKey::Back));
    }

    #[test]
    fn zero_thresholds_behave_like_one() {
        let mut filter = KeyFilter::new(0, 0);
        assert!(filter.admit(NavKey::Up));
        assert!(filter.admit(NavKey::Activate));
    }
}
