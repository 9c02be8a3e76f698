//! Linear lesson navigation over a fixed page map

use cybercj_types::LessonMap;

/// The embedded frame showing the current lesson
pub trait ContentFrame {
    /// Current `src` attribute, as written (not resolved)
    fn source(&self) -> Option<String>;
    fn set_source(&self, target: &str);
}

/// Tracks the current page and drives the content frame
///
/// Next and back wrap around at both ends of the map.
pub struct LessonNavigator<F> {
    map: LessonMap,
    current_index: usize,
    frame: F,
}

impl<F: ContentFrame> LessonNavigator<F> {
    pub fn new(map: LessonMap, frame: F) -> Self {
        Self {
            map,
            current_index: 0,
            frame,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn map(&self) -> &LessonMap {
        &self.map
    }

    pub fn frame(&self) -> &F {
        &self.frame
    }

    /// Advance one page, or first resync the frame if it drifted off the current entry
    pub fn next(&mut self) {
        let expected = self.target(self.current_index);
        if self.frame.source().as_deref() != Some(expected) {
            log::debug!("Frame out of sync, reloading page {}", self.current_index);
            self.load(self.current_index);
            return;
        }
        let next = if self.current_index >= self.map.last_index() {
            0
        } else {
            self.current_index + 1
        };
        self.load(next);
    }

    pub fn back(&mut self) {
        let previous = if self.current_index == 0 {
            self.map.last_index()
        } else {
            self.current_index - 1
        };
        self.load(previous);
    }

    /// Jump to a map index, or load an arbitrary URL
    ///
    /// An unmapped `key` is loaded as-is and the index only steps forward by
    /// one (wrapping past the last page), so it may no longer match the page
    /// on screen. Nothing happens when the frame already shows the requested
    /// target.
    pub fn navigate_to(&mut self, key: &str) {
        match self.lookup(key) {
            Some(index) => {
                if self.frame.source().as_deref() != Some(self.target(index)) {
                    self.frame.set_source(self.target(index));
                }
                self.current_index = index;
            }
            None => {
                if self.frame.source().as_deref() != Some(key) {
                    log::info!("Loading unmapped page {:?}", key);
                    self.frame.set_source(key);
                    self.current_index = (self.current_index + 1) % self.map.len();
                }
            }
        }
    }

    /// Map index named by `key`; only the plain decimal form counts (`"3"`, not `"03"`)
    fn lookup(&self, key: &str) -> Option<usize> {
        key.parse::<usize>()
            .ok()
            .filter(|index| *index < self.map.len() && index.to_string() == key)
    }

    fn load(&mut self, index: usize) {
        self.current_index = index;
        self.frame.set_source(self.target(index));
    }

    fn target(&self, index: usize) -> &str {
        // indices handed in are always within 0..len
        self.map.get(index).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeFrame {
        src: RefCell<Option<String>>,
        loads: RefCell<Vec<String>>,
    }

    impl ContentFrame for FakeFrame {
        fn source(&self) -> Option<String> {
            self.src.borrow().clone()
        }

        fn set_source(&self, target: &str) {
            *self.src.borrow_mut() = Some(target.to_string());
            self.loads.borrow_mut().push(target.to_string());
        }
    }

    fn navigator(pages: usize) -> LessonNavigator<FakeFrame> {
        let map = LessonMap::new((0..pages).map(|i| format!("p{}.html", i)).collect()).unwrap();
        let nav = LessonNavigator::new(map, FakeFrame::default());
        nav.frame.set_source("p0.html");
        nav.frame.loads.borrow_mut().clear();
        nav
    }

    #[test]
    fn test_back_wraps_to_last() {
        let mut nav = navigator(4);
        nav.back();
        assert_eq!(nav.current_index(), 3);
        assert_eq!(nav.frame().source().as_deref(), Some("p3.html"));
    }

    #[test]
    fn test_next_wraps_to_first() {
        let mut nav = navigator(3);
        nav.next();
        nav.next();
        assert_eq!(nav.current_index(), 2);
        nav.next();
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.frame().source().as_deref(), Some("p0.html"));
    }

    #[test]
    fn test_next_resyncs_before_advancing() {
        let mut nav = navigator(3);
        nav.frame().set_source("https://elsewhere.example/");
        nav.next();
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.frame().source().as_deref(), Some("p0.html"));
        nav.next();
        assert_eq!(nav.current_index(), 1);
    }

    #[test]
    fn test_navigate_to_mapped_key() {
        let mut nav = navigator(5);
        nav.navigate_to("3");
        assert_eq!(nav.current_index(), 3);
        assert_eq!(nav.frame().source().as_deref(), Some("p3.html"));
    }

    #[test]
    fn test_navigate_to_current_page_does_not_reload() {
        let mut nav = navigator(5);
        nav.navigate_to("0");
        assert_eq!(nav.current_index(), 0);
        assert!(nav.frame().loads.borrow().is_empty());
    }

    #[test]
    fn test_navigate_to_unmapped_url_increments() {
        let mut nav = navigator(5);
        nav.navigate_to("2");
        nav.navigate_to("https://cryptii.com/");
        assert_eq!(nav.current_index(), 3);
        assert_eq!(nav.frame().source().as_deref(), Some("https://cryptii.com/"));

        // out-of-range numbers are treated as URLs too
        nav.navigate_to("99");
        assert_eq!(nav.current_index(), 4);
        assert_eq!(nav.frame().source().as_deref(), Some("99"));

        nav.navigate_to("https://phishingquiz.withgoogle.com/");
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_non_canonical_index_is_a_url() {
        for key in ["03", " 3", "+3", "3 "] {
            let mut nav = navigator(5);
            nav.navigate_to(key);
            assert_eq!(nav.current_index(), 1, "{:?}", key);
            assert_eq!(nav.frame().source().as_deref(), Some(key));
        }
    }
}
