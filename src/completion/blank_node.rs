//! Synthetic blank node labels

/// Stem of generated labels
const AUTO_LABEL_STEM: &str = "autos";

/// Generates blank node labels that do not collide with labels already in use
///
/// Only labels following the synthetic `autosN` pattern can collide with
/// generated ones, so the allocator just remembers the next free suffix.
#[derive(Debug, Clone, Default)]
pub struct BlankNodeIdAllocator {
    next_suffix: u64,
}

impl BlankNodeIdAllocator {
    /// Create an allocator that starts at `autos0`
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a label seen in the document
    ///
    /// Accepts the label with or without the `_:` marker. Labels that do not
    /// follow the synthetic pattern are ignored.
    pub fn check_id(&mut self, label: &str) {
        let label = label.strip_prefix("_:").unwrap_or(label);
        let Some(digits) = label.strip_prefix(AUTO_LABEL_STEM) else {
            return;
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return;
        }
        if let Ok(suffix) = digits.parse::<u64>() {
            self.next_suffix = self.next_suffix.max(suffix.saturating_add(1));
        }
    }

    /// Hand out a fresh label (without the `_:` marker)
    pub fn next_id(&mut self) -> String {
        let id = format!("{AUTO_LABEL_STEM}{}", self.next_suffix);
        self.next_suffix += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_skips_checked_labels() {
        let mut allocator = BlankNodeIdAllocator::new();
        allocator.check_id("autos3");
        allocator.check_id("autos1");

        let id = allocator.next_id();
        let suffix: u64 = id.trim_start_matches("autos").parse().unwrap();
        assert!(suffix >= 4);
        assert_ne!(id, "autos3");
        assert_ne!(id, "autos1");
    }

    #[test]
    fn test_next_id_never_repeats() {
        let mut allocator = BlankNodeIdAllocator::new();
        let first = allocator.next_id();
        let second = allocator.next_id();
        allocator.check_id("autos0");
        let third = allocator.next_id();

        assert_eq!(first, "autos0");
        assert_eq!(second, "autos1");
        assert_eq!(third, "autos2");
    }

    #[test]
    fn test_check_id_accepts_marker() {
        let mut allocator = BlankNodeIdAllocator::new();
        allocator.check_id("_:autos7");
        assert_eq!(allocator.next_id(), "autos8");
    }

    #[test]
    fn test_check_id_ignores_other_labels() {
        let mut allocator = BlankNodeIdAllocator::new();
        allocator.check_id("b12");
        allocator.check_id("autos");
        allocator.check_id("autosX1");
        allocator.check_id("autos-1");
        assert_eq!(allocator.next_id(), "autos0");
    }
}
