//!
//! Catalog of supported logical display modes.
//!
//! A mode is a logical resolution plus the integer scale factor that maps it
//! onto a physical display mode. The catalog keeps modes ordered by logical
//! area ascending, larger scale first on equal area, and never holds the same
//! triple twice.
//!

use std::fmt;

use crate::graphics::host::DisplayMode;

/// Smallest logical width the game can lay out its screens in.
pub const MIN_LOGICAL_WIDTH: i32 = 320;
/// Smallest logical height the game can lay out its screens in.
pub const MIN_LOGICAL_HEIGHT: i32 = 240;

/// Scale factors tried against every host display mode.
pub const VALID_SCALE_FACTORS: [i32; 4] = [1, 2, 3, 4];

/// Modes present before the host display is queried.
pub const DEFAULT_MODES: [GraphicsMode; 4] = [
    GraphicsMode::new(320, 240, 1),
    GraphicsMode::new(400, 300, 1),
    GraphicsMode::new(640, 480, 1),
    GraphicsMode::new(320, 240, 2),
];

/// A logical resolution and its scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphicsMode {
    pub width: i32,
    pub height: i32,
    pub scale_factor: i32,
}

impl GraphicsMode {
    #[must_use]
    pub const fn new(width: i32, height: i32, scale_factor: i32) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Logical area in pixels.
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// True when `self` sorts after `other` in the catalog.
    fn sorts_after(&self, other: &GraphicsMode) -> bool {
        self.area() > other.area()
            || (self.area() == other.area() && self.scale_factor < other.scale_factor)
    }
}

impl fmt::Display for GraphicsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}x", self.width, self.height, self.scale_factor)
    }
}

/// Ordered, duplicate-free list of modes with a circular cursor.
#[derive(Debug, Clone, Default)]
pub struct ModeCatalog {
    modes: Vec<GraphicsMode>,
    index: usize,
}

impl ModeCatalog {
    /// Empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            modes: Vec::new(),
            index: 0,
        }
    }

    /// Catalog seeded with [`DEFAULT_MODES`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for mode in DEFAULT_MODES {
            catalog.add(mode.width, mode.height, mode.scale_factor);
        }
        catalog
    }

    /// Insert a mode at its sorted position. Returns `false` if the exact
    /// triple was already present.
    pub fn add(&mut self, width: i32, height: i32, scale_factor: i32) -> bool {
        if self.find(width, height, scale_factor).is_some() {
            return false;
        }

        let mode = GraphicsMode::new(width, height, scale_factor);
        let at = self
            .modes
            .iter()
            .position(|existing| existing.sorts_after(&mode))
            .unwrap_or(self.modes.len());
        self.modes.insert(at, mode);
        true
    }

    /// Index of the exact triple, if present.
    #[must_use]
    pub fn find(&self, width: i32, height: i32, scale_factor: i32) -> Option<usize> {
        self.modes
            .iter()
            .position(|m| m.width == width && m.height == height && m.scale_factor == scale_factor)
    }

    /// Derive logical modes from the host's physical modes.
    ///
    /// For each physical mode every scale in [`VALID_SCALE_FACTORS`] is tried
    /// in order. Scales that do not divide both dimensions are skipped, as is
    /// any physical width not divisible by 4 (1366x768 renders garbled).
    /// Once the logical size falls below 320x240 larger scales can only
    /// shrink it further, so the remaining scales are not tried.
    ///
    /// Returns the number of modes added.
    pub fn add_supported_modes(&mut self, display_modes: &[DisplayMode]) -> usize {
        let mut added = 0;
        for mode in display_modes {
            for scale in VALID_SCALE_FACTORS {
                if mode.width % scale != 0 || mode.height % scale != 0 {
                    continue;
                }
                if mode.width % 4 != 0 {
                    continue;
                }
                let w = mode.width / scale;
                let h = mode.height / scale;
                if w < MIN_LOGICAL_WIDTH || h < MIN_LOGICAL_HEIGHT {
                    break;
                }
                if self.add(w, h, scale) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Advance the cursor, wrapping to the first mode.
    pub fn next(&mut self) -> Option<GraphicsMode> {
        if self.modes.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.modes.len();
        self.current()
    }

    /// Step the cursor back, wrapping to the last mode.
    pub fn previous(&mut self) -> Option<GraphicsMode> {
        if self.modes.is_empty() {
            return None;
        }
        self.index = if self.index == 0 {
            self.modes.len() - 1
        } else {
            self.index - 1
        };
        self.current()
    }

    /// Mode under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<GraphicsMode> {
        self.modes.get(self.index).copied()
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor. Out-of-range indices are clamped to 0.
    pub fn set_index(&mut self, index: usize) {
        self.index = if index < self.modes.len() { index } else { 0 };
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GraphicsMode> {
        self.modes.iter()
    }

    /// Drop every mode and reset the cursor.
    pub fn clear(&mut self) {
        self.modes.clear();
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn triples(catalog: &ModeCatalog) -> Vec<(i32, i32, i32)> {
        catalog
            .iter()
            .map(|m| (m.width, m.height, m.scale_factor))
            .collect()
    }

    #[test]
    fn test_defaults_are_sorted() {
        let catalog = ModeCatalog::with_defaults();
        assert_eq!(
            triples(&catalog),
            vec![(320, 240, 2), (320, 240, 1), (400, 300, 1), (640, 480, 1)]
        );
        assert_eq!(catalog.index(), 0);
    }

    #[test]
    fn test_add_duplicate_is_noop() {
        let mut catalog = ModeCatalog::new();
        assert!(catalog.add(320, 240, 1));
        assert!(!catalog.add(320, 240, 1));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_same_area_larger_scale_first() {
        let mut catalog = ModeCatalog::new();
        catalog.add(640, 480, 1);
        catalog.add(640, 480, 3);
        catalog.add(640, 480, 2);
        assert_eq!(
            triples(&catalog),
            vec![(640, 480, 3), (640, 480, 2), (640, 480, 1)]
        );
    }

    #[test]
    fn test_find() {
        let catalog = ModeCatalog::with_defaults();
        assert_eq!(catalog.find(320, 240, 2), Some(0));
        assert_eq!(catalog.find(640, 480, 1), Some(3));
        assert_eq!(catalog.find(640, 480, 2), None);
    }

    #[test]
    fn test_populate_1280x960() {
        let mut catalog = ModeCatalog::new();
        let added = catalog.add_supported_modes(&[DisplayMode::new(1280, 960)]);
        assert_eq!(added, 3);
        assert!(catalog.find(1280, 960, 1).is_some());
        assert!(catalog.find(640, 480, 2).is_some());
        assert!(catalog.find(320, 240, 4).is_some());
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_populate_width_not_divisible_by_four() {
        let mut catalog = ModeCatalog::new();
        assert_eq!(catalog.add_supported_modes(&[DisplayMode::new(1366, 768)]), 0);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_populate_stops_below_minimum() {
        let mut catalog = ModeCatalog::new();
        // 800x600: 1x kept, 2x = 400x300 kept, 3x skipped (800 % 3), 4x = 200x150 stops.
        catalog.add_supported_modes(&[DisplayMode::new(800, 600)]);
        assert_eq!(triples(&catalog), vec![(400, 300, 2), (800, 600, 1)]);
    }

    #[test]
    fn test_populate_too_small_host_mode() {
        let mut catalog = ModeCatalog::new();
        catalog.add_supported_modes(&[DisplayMode::new(256, 192)]);
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_populate_merges_with_defaults() {
        let mut catalog = ModeCatalog::with_defaults();
        let added = catalog.add_supported_modes(&[
            DisplayMode::new(640, 480),
            DisplayMode::new(1280, 960),
        ]);
        // 640x480x1 and 320x240x2 already present from the seed.
        assert_eq!(added, 3);
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_next_wraps() {
        let mut catalog = ModeCatalog::with_defaults();
        catalog.set_index(3);
        assert_eq!(catalog.next(), Some(GraphicsMode::new(320, 240, 2)));
        assert_eq!(catalog.index(), 0);
    }

    #[test]
    fn test_previous_wraps() {
        let mut catalog = ModeCatalog::with_defaults();
        assert_eq!(catalog.previous(), Some(GraphicsMode::new(640, 480, 1)));
        assert_eq!(catalog.index(), 3);
    }

    #[test]
    fn test_cycle_empty_catalog() {
        let mut catalog = ModeCatalog::new();
        assert_eq!(catalog.next(), None);
        assert_eq!(catalog.previous(), None);
        assert_eq!(catalog.current(), None);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn test_next_then_previous_restores_index(#[case] start: usize) {
        let mut catalog = ModeCatalog::with_defaults();
        catalog.set_index(start);
        catalog.next();
        catalog.previous();
        assert_eq!(catalog.index(), start);
    }

    #[test]
    fn test_single_entry_cycles_to_itself() {
        let mut catalog = ModeCatalog::new();
        catalog.add(320, 240, 1);
        assert_eq!(catalog.next(), Some(GraphicsMode::new(320, 240, 1)));
        assert_eq!(catalog.previous(), Some(GraphicsMode::new(320, 240, 1)));
        assert_eq!(catalog.index(), 0);
    }

    #[test]
    fn test_set_index_out_of_range() {
        let mut catalog = ModeCatalog::with_defaults();
        catalog.set_index(2);
        catalog.set_index(17);
        assert_eq!(catalog.index(), 0);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(GraphicsMode::new(640, 480, 2).to_string(), "640x480 2x");
    }

    proptest! {
        #[test]
        fn prop_catalog_sorted_and_unique(
            adds in prop::collection::vec((1i32..2000, 1i32..2000, 1i32..5), 0..64)
        ) {
            let mut catalog = ModeCatalog::new();
            for (w, h, s) in adds {
                catalog.add(w, h, s);
            }
            let modes: Vec<_> = catalog.iter().copied().collect();
            for pair in modes.windows(2) {
                prop_assert!(!pair[0].sorts_after(&pair[1]));
                prop_assert!(pair[0] != pair[1]);
            }
            let mut unique = modes.clone();
            unique.sort_by_key(|m| (m.width, m.height, m.scale_factor));
            unique.dedup();
            prop_assert_eq!(unique.len(), modes.len());
        }
    }
}
