//! Mapping cursor offsets back to slides.

use crate::types::Slide;

/// A read-only view over one segmentation that answers "which slide is the
/// cursor in?" in O(log n).
///
/// Holds nothing but the borrowed slides; build a new one whenever the slide
/// sequence is replaced.
#[derive(Debug, Clone, Copy)]
pub struct PositionIndex<'a> {
    slides: &'a [Slide],
}

impl<'a> PositionIndex<'a> {
    /// Index slides as produced by the segmenter (ordered, non-overlapping).
    pub fn new(slides: &'a [Slide]) -> Self {
        Self { slides }
    }

    pub fn slides(&self) -> &'a [Slide] {
        self.slides
    }

    /// Position of the slide whose span holds `offset`.
    ///
    /// When a cursor sits exactly where one slide ends and the next begins,
    /// the later slide wins.
    pub fn locate_index(&self, offset: usize) -> Option<usize> {
        let upto = self.slides.partition_point(|s| s.span.start <= offset);

        // At most two spans can hold a cursor: one ending at it and one
        // starting at it.
        (upto.saturating_sub(2)..upto)
            .rev()
            .find(|&i| self.slides[i].span.contains_cursor(offset))
    }

    /// The slide whose span holds `offset`, or `None` for a gap.
    pub fn locate(&self, offset: usize) -> Option<&'a Slide> {
        self.locate_index(offset).map(|i| &self.slides[i])
    }
}

/// Find the slide holding `offset`; see [`PositionIndex::locate`].
pub fn locate(slides: &[Slide], offset: usize) -> Option<&Slide> {
    PositionIndex::new(slides).locate(offset)
}
