//! Slideshow navigation.
//!
//! A `Presenter` steps through the deck one click at a time: each slide's
//! entrance animations are revealed in sequence before advancing to the
//! next slide. It only tracks positions; timing and rendering belong to the
//! host.

use deck_core::Slide;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presenter {
    /// Animation step count of each slide.
    steps: Vec<usize>,
    slide: usize,
    /// Animations revealed on the current slide.
    revealed: usize,
}

impl Presenter {
    /// Start presenting `slides` at `at` (clamped into range).
    pub fn start(slides: &[Slide], at: usize) -> Self {
        let steps: Vec<usize> = slides.iter().map(|s| s.animation_sequence().len()).collect();
        let slide = at.min(steps.len().saturating_sub(1));
        log::debug!("presenting from slide {} of {}", slide + 1, steps.len());
        Self {
            steps,
            slide,
            revealed: 0,
        }
    }

    pub fn current_slide(&self) -> usize {
        self.slide
    }

    pub fn slide_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of animations already shown on the current slide.
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    fn steps_here(&self) -> usize {
        self.steps.get(self.slide).copied().unwrap_or(0)
    }

    /// Whether the last step of the last slide is showing.
    pub fn at_end(&self) -> bool {
        self.slide + 1 >= self.steps.len() && self.revealed >= self.steps_here()
    }

    /// Reveal the next animation, or move to the next slide. Returns `false`
    /// at the end of the deck.
    pub fn next(&mut self) -> bool {
        if self.revealed < self.steps_here() {
            self.revealed += 1;
            true
        } else if self.slide + 1 < self.steps.len() {
            self.slide += 1;
            self.revealed = 0;
            true
        } else {
            false
        }
    }

    /// Hide the last revealed animation, or go back to the previous slide
    /// fully revealed. Returns `false` at the start of the deck.
    pub fn prev(&mut self) -> bool {
        if self.revealed > 0 {
            self.revealed -= 1;
            true
        } else if self.slide > 0 {
            self.slide -= 1;
            self.revealed = self.steps_here();
            true
        } else {
            false
        }
    }

    /// Jump to slide `n` with nothing revealed.
    pub fn goto(&mut self, n: usize) -> bool {
        if n >= self.steps.len() {
            return false;
        }
        self.slide = n;
        self.revealed = 0;
        true
    }

    /// Slideshow key handling. Returns `Some(false)` when the key ends the
    /// show, `Some(true)` when it moved, `None` when ignored.
    pub fn handle_key(&mut self, key: &str) -> Option<bool> {
        match key {
            "ArrowRight" | "ArrowDown" | "PageDown" | " " | "Enter" => self.next().then_some(true),
            "ArrowLeft" | "ArrowUp" | "PageUp" | "Backspace" => self.prev().then_some(true),
            "Home" => self.goto(0).then_some(true),
            "End" => self.goto(self.steps.len().saturating_sub(1)).then_some(true),
            "Escape" => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Animation, AnimationEffect, AnimationTarget, LayoutKind};
    use pretty_assertions::assert_eq;

    fn deck(animation_counts: &[usize]) -> Vec<Slide> {
        animation_counts
            .iter()
            .map(|&n| {
                let mut slide = Slide::new(LayoutKind::TitleContent);
                for order in 0..n {
                    slide.animations.push(Animation {
                        target: AnimationTarget::Content,
                        effect: AnimationEffect::FadeIn,
                        duration: 0.5,
                        delay: 0.0,
                        order: order as u32,
                    });
                }
                slide
            })
            .collect()
    }

    #[test]
    fn steps_through_animations_then_slides() {
        let slides = deck(&[2, 0, 1]);
        let mut p = Presenter::start(&slides, 0);
        let mut trail = vec![(p.current_slide(), p.revealed())];
        while p.next() {
            trail.push((p.current_slide(), p.revealed()));
        }
        assert_eq!(trail, vec![(0, 0), (0, 1), (0, 2), (1, 0), (2, 0), (2, 1)]);
        assert!(p.at_end());
    }

    #[test]
    fn prev_returns_to_fully_revealed_slide() {
        let slides = deck(&[2, 0]);
        let mut p = Presenter::start(&slides, 1);
        assert!(p.prev());
        assert_eq!((p.current_slide(), p.revealed()), (0, 2));
        assert!(p.prev());
        assert!(p.prev());
        assert!(!p.prev());
    }

    #[test]
    fn start_clamps_and_keys_navigate() {
        let slides = deck(&[0, 0, 0]);
        let mut p = Presenter::start(&slides, 99);
        assert_eq!(p.current_slide(), 2);
        assert_eq!(p.handle_key("Home"), Some(true));
        assert_eq!(p.current_slide(), 0);
        assert_eq!(p.handle_key("ArrowRight"), Some(true));
        assert_eq!(p.handle_key("End"), Some(true));
        assert_eq!(p.handle_key("ArrowRight"), None);
        assert_eq!(p.handle_key("q"), None);
        assert_eq!(p.handle_key("Escape"), Some(false));
        assert!(!p.goto(3));
    }
}
