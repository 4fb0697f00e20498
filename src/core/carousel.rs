//! Image carousel — one current-slide pointer per carousel on the page.
//!
//! Carousels are numbered by position (1-based) among the `image_container`
//! elements, and their slides/dots are found through the numbered
//! `image_slides_<n>` / `image_dot_<n>` classes.  Navigation applies a single
//! wraparound correction: past the end goes to slide 1, before the start
//! goes to the last slide.

use super::document::{Display, Document, ElementId};
use super::widgets::WidgetError;

/// Class added to the dot of the visible slide.
pub const DOT_ACTIVE_CLASS: &str = "image_active";

/// One carousel instance.
#[derive(Debug, Clone)]
pub struct Carousel {
    /// 1-based position among the page's carousels.
    pub number: usize,
    pub container: ElementId,
    pub slides: Vec<ElementId>,
    pub dots: Vec<ElementId>,
    /// 1-based index of the visible slide.
    pub current: usize,
}

impl Carousel {
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Move the pointer to `target`, correcting once if it falls outside
    /// `1..=len`.  Overshoot by more than one lap is not folded further.
    fn set_wrapped(&mut self, target: i64) {
        let count = self.len() as i64;
        let corrected = if target > count {
            1
        } else if target < 1 {
            count
        } else {
            target
        };
        self.current = corrected as usize;
    }

    /// Hide every slide and clear every dot, then reveal `current`.
    fn render(&self, doc: &mut Document) {
        for &slide in &self.slides {
            doc.set_display(slide, Display::Hidden);
        }
        for &dot in &self.dots {
            doc.remove_class(dot, DOT_ACTIVE_CLASS);
        }
        let i = self.current - 1;
        doc.set_display(self.slides[i], Display::Block);
        // Pages may carry fewer dots than slides.
        if let Some(&dot) = self.dots.get(i) {
            doc.add_class(dot, DOT_ACTIVE_CLASS);
        }
    }
}

/// Owns the state of every carousel on a page.
#[derive(Debug, Clone, Default)]
pub struct CarouselManager {
    pub carousels: Vec<Carousel>,
}

impl CarouselManager {
    /// Find every carousel in `doc` and resolve its slides and dots.
    pub fn resolve(doc: &Document) -> Self {
        let carousels = doc
            .by_class("image_container")
            .into_iter()
            .enumerate()
            .map(|(i, container)| {
                let number = i + 1;
                Carousel {
                    number,
                    container,
                    slides: doc.by_class(&format!("image_slides_{number}")),
                    dots: doc.by_class(&format!("image_dot_{number}")),
                    current: 1,
                }
            })
            .collect();
        Self { carousels }
    }

    /// Page-load behaviour: show slide 1 of every carousel.  Carousels
    /// without slides are left alone.
    pub fn initialize(&mut self, doc: &mut Document) {
        for carousel in &mut self.carousels {
            carousel.current = 1;
            if carousel.is_empty() {
                tracing::warn!(carousel = carousel.number, "carousel has no slides");
                continue;
            }
            carousel.render(doc);
        }
    }

    /// Previous/next control: move by `delta` slides.
    pub fn step(&mut self, doc: &mut Document, number: usize, delta: i64) -> Result<usize, WidgetError> {
        let carousel = self.get_mut(number)?;
        let target = (carousel.current as i64).saturating_add(delta);
        carousel.set_wrapped(target);
        carousel.render(doc);
        tracing::debug!(carousel = number, delta, current = carousel.current, "step");
        Ok(carousel.current)
    }

    /// Dot control: jump to slide `slide` (1-based).
    pub fn select(&mut self, doc: &mut Document, number: usize, slide: i64) -> Result<usize, WidgetError> {
        let carousel = self.get_mut(number)?;
        carousel.set_wrapped(slide);
        carousel.render(doc);
        tracing::debug!(carousel = number, slide, current = carousel.current, "select");
        Ok(carousel.current)
    }

    /// Re-apply the current slide to the document.
    pub fn render(&self, doc: &mut Document, number: usize) -> Result<(), WidgetError> {
        let carousel = self.get(number)?;
        carousel.render(doc);
        Ok(())
    }

    pub fn current(&self, number: usize) -> Option<usize> {
        self.get(number).ok().map(|c| c.current)
    }

    pub fn get(&self, number: usize) -> Result<&Carousel, WidgetError> {
        let carousel = number
            .checked_sub(1)
            .and_then(|i| self.carousels.get(i))
            .ok_or(WidgetError::UnknownCarousel(number))?;
        if carousel.is_empty() {
            return Err(WidgetError::EmptyCarousel(number));
        }
        Ok(carousel)
    }

    fn get_mut(&mut self, number: usize) -> Result<&mut Carousel, WidgetError> {
        let carousel = number
            .checked_sub(1)
            .and_then(|i| self.carousels.get_mut(i))
            .ok_or(WidgetError::UnknownCarousel(number))?;
        if carousel.is_empty() {
            return Err(WidgetError::EmptyCarousel(number));
        }
        Ok(carousel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Append a carousel with `slides` slides and `dots` dots.
    fn carousel(doc: &mut Document, number: usize, slides: usize, dots: usize) {
        let container = doc.append(0, "div", &["image_container"]);
        let slide_class = format!("image_slides_{number}");
        for _ in 0..slides {
            let s = doc.append(container, "div", &[slide_class.as_str(), "image_slides"]);
            doc.get_mut(s).display = Display::Hidden;
        }
        let dot_class = format!("image_dot_{number}");
        for _ in 0..dots {
            doc.append(0, "span", &[dot_class.as_str(), "image_dot"]);
        }
    }

    fn page(sizes: &[usize]) -> (Document, CarouselManager) {
        let mut doc = Document::new();
        for (i, &n) in sizes.iter().enumerate() {
            carousel(&mut doc, i + 1, n, n);
        }
        let mut mgr = CarouselManager::resolve(&doc);
        mgr.initialize(&mut doc);
        (doc, mgr)
    }

    /// (visible slides, active dots) as 1-based positions.
    fn shown(doc: &Document, mgr: &CarouselManager, number: usize) -> (Vec<usize>, Vec<usize>) {
        let c = &mgr.carousels[number - 1];
        let slides = c
            .slides
            .iter()
            .enumerate()
            .filter(|(_, s)| doc.get(**s).is_visible())
            .map(|(i, _)| i + 1)
            .collect();
        let dots = c
            .dots
            .iter()
            .enumerate()
            .filter(|(_, d)| doc.get(**d).has_class(DOT_ACTIVE_CLASS))
            .map(|(i, _)| i + 1)
            .collect();
        (slides, dots)
    }

    #[test]
    fn three_slides_wrap_forward() {
        let (mut doc, mut mgr) = page(&[3]);
        assert_eq!(mgr.current(1), Some(1));
        assert_eq!(shown(&doc, &mgr, 1), (vec![1], vec![1]));

        assert_eq!(mgr.step(&mut doc, 1, 1).unwrap(), 2);
        assert_eq!(mgr.step(&mut doc, 1, 1).unwrap(), 3);
        assert_eq!(mgr.step(&mut doc, 1, 1).unwrap(), 1);
        assert_eq!(shown(&doc, &mgr, 1), (vec![1], vec![1]));
    }

    #[test]
    fn step_back_from_first_goes_to_last() {
        let (mut doc, mut mgr) = page(&[4]);
        assert_eq!(mgr.step(&mut doc, 1, -1).unwrap(), 4);
        assert_eq!(shown(&doc, &mgr, 1), (vec![4], vec![4]));
    }

    #[test]
    fn select_corrects_out_of_range_once() {
        let (mut doc, mut mgr) = page(&[5]);
        assert_eq!(mgr.select(&mut doc, 1, 3).unwrap(), 3);
        assert_eq!(mgr.select(&mut doc, 1, 0).unwrap(), 5);
        assert_eq!(mgr.select(&mut doc, 1, -7).unwrap(), 5);
        assert_eq!(mgr.select(&mut doc, 1, 42).unwrap(), 1);
        assert_eq!(mgr.step(&mut doc, 1, 10).unwrap(), 1);
        assert_eq!(mgr.step(&mut doc, 1, -10).unwrap(), 5);
    }

    #[test]
    fn extreme_deltas_correct_once_without_overflow() {
        let (mut doc, mut mgr) = page(&[3]);
        assert_eq!(mgr.step(&mut doc, 1, i64::MAX).unwrap(), 1);
        mgr.select(&mut doc, 1, 2).unwrap();
        assert_eq!(mgr.step(&mut doc, 1, i64::MIN).unwrap(), 3);
        assert_eq!(mgr.select(&mut doc, 1, i64::MAX).unwrap(), 1);
        assert_eq!(mgr.select(&mut doc, 1, i64::MIN).unwrap(), 3);
        assert_eq!(shown(&doc, &mgr, 1), (vec![3], vec![3]));
    }

    #[test]
    fn pointer_stays_in_bounds_for_any_sequence() {
        let (mut doc, mut mgr) = page(&[1, 2, 7]);
        let moves: [(usize, i64, bool); 12] = [
            (1, 1, true),
            (2, -1, true),
            (3, 9, false),
            (3, -3, true),
            (2, 0, false),
            (1, -5, false),
            (3, 6, true),
            (3, 1, true),
            (2, 3, false),
            (1, 1, false),
            (3, -100, false),
            (2, 2, true),
        ];
        for (number, value, is_step) in moves {
            let current = if is_step {
                mgr.step(&mut doc, number, value).unwrap()
            } else {
                mgr.select(&mut doc, number, value).unwrap()
            };
            let k = mgr.carousels[number - 1].len();
            assert!((1..=k).contains(&current));
            let (slides, dots) = shown(&doc, &mgr, number);
            assert_eq!(slides, vec![current]);
            assert_eq!(dots, vec![current]);
        }
    }

    #[test]
    fn instances_are_independent() {
        let (mut doc, mut mgr) = page(&[3, 3]);
        mgr.step(&mut doc, 2, 1).unwrap();
        assert_eq!(mgr.current(1), Some(1));
        assert_eq!(mgr.current(2), Some(2));
        assert_eq!(shown(&doc, &mgr, 1), (vec![1], vec![1]));
    }

    #[test]
    fn render_is_idempotent() {
        let (mut doc, mut mgr) = page(&[3]);
        mgr.step(&mut doc, 1, 1).unwrap();
        mgr.render(&mut doc, 1).unwrap();
        let once = shown(&doc, &mgr, 1);
        mgr.render(&mut doc, 1).unwrap();
        assert_eq!(shown(&doc, &mgr, 1), once);
    }

    #[test]
    fn missing_dots_are_tolerated() {
        let mut doc = Document::new();
        carousel(&mut doc, 1, 3, 1);
        let mut mgr = CarouselManager::resolve(&doc);
        mgr.initialize(&mut doc);
        mgr.select(&mut doc, 1, 3).unwrap();
        assert_eq!(shown(&doc, &mgr, 1), (vec![3], vec![]));
    }

    #[test]
    fn empty_and_unknown_carousels_are_errors() {
        let (mut doc, mut mgr) = page(&[0, 2]);
        assert!(matches!(
            mgr.step(&mut doc, 1, 1),
            Err(WidgetError::EmptyCarousel(1))
        ));
        assert!(matches!(
            mgr.select(&mut doc, 3, 1),
            Err(WidgetError::UnknownCarousel(3))
        ));
        assert!(matches!(
            mgr.render(&mut doc, 0),
            Err(WidgetError::UnknownCarousel(0))
        ));
        assert_eq!(mgr.step(&mut doc, 2, 1).unwrap(), 2);
    }
}
