//! Scroll progress over a virtual page.
//!
//! The page is a vertical stack of named sections whose heights are given in
//! viewports. Scroll progress is always a value in `[0, 1]`.

use crate::config::PageConfig;

/// Fraction of the document scrolled: `scroll_y / (scroll_height - viewport)`.
///
/// A document that fits in the viewport has progress 0.
pub fn document_progress(scroll_y: f32, scroll_height: f32, viewport_height: f32) -> f32 {
    let range = scroll_height - viewport_height;
    if !(range > 0.0) {
        return 0.0;
    }
    clamp_unit(scroll_y / range)
}

/// Progress of a section through the viewport.
///
/// `top` is the section's top edge relative to the viewport top. Progress is
/// 0 while the top edge sits at the viewport bottom and reaches 1 once the
/// bottom edge passes the viewport top.
pub fn section_progress(top: f32, height: f32, viewport_height: f32) -> f32 {
    let travel = viewport_height + height;
    if !(travel > 0.0) {
        return 0.0;
    }
    clamp_unit((viewport_height - top) / travel)
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// A laid-out section in document pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub top: f32,
    pub height: f32,
}

/// Scrollable stack of sections.
#[derive(Debug, Clone)]
pub struct Page {
    sections: Vec<Section>,
    /// Section heights in viewports, kept for relayout on resize.
    heights: Vec<f32>,
    viewport_height: f32,
    scroll_y: f32,
}

impl Page {
    pub fn new(config: &PageConfig, viewport_height: f32) -> Self {
        let mut page = Self {
            sections: config
                .sections
                .iter()
                .map(|s| Section {
                    name: s.name.clone(),
                    top: 0.0,
                    height: 0.0,
                })
                .collect(),
            heights: config.sections.iter().map(|s| s.height).collect(),
            viewport_height: 0.0,
            scroll_y: 0.0,
        };
        page.set_viewport_height(viewport_height);
        page
    }

    /// Relayout for a new viewport height, keeping document progress.
    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        let progress = self.document_progress();
        self.viewport_height = viewport_height.max(0.0);

        let mut top = 0.0;
        for (section, h) in self.sections.iter_mut().zip(&self.heights) {
            section.top = top;
            section.height = h * self.viewport_height;
            top += section.height;
        }
        self.scroll_to(progress * self.max_scroll());
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Total document height in pixels.
    pub fn scroll_height(&self) -> f32 {
        self.sections.last().map_or(0.0, |s| s.top + s.height)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.scroll_height() - self.viewport_height).max(0.0)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Scroll by `dy` pixels, clamped to the document.
    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.scroll_y + dy);
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = if y.is_finite() {
            y.clamp(0.0, self.max_scroll())
        } else {
            0.0
        };
    }

    pub fn document_progress(&self) -> f32 {
        document_progress(self.scroll_y, self.scroll_height(), self.viewport_height)
    }

    /// Progress of the named section, or `None` if there is no such section.
    pub fn progress_of(&self, name: &str) -> Option<f32> {
        self.section(name)
            .map(|s| section_progress(s.top - self.scroll_y, s.height, self.viewport_height))
    }

    /// Progress of `section`, falling back to the whole document.
    pub fn progress_or_document(&self, section: Option<&str>) -> f32 {
        section
            .and_then(|name| self.progress_of(name))
            .unwrap_or_else(|| self.document_progress())
    }

    /// Visible fraction of the named section, in `[0, 1]`.
    pub fn intersection_ratio(&self, name: &str) -> Option<f32> {
        let s = self.section(name)?;
        if s.height <= 0.0 {
            return Some(0.0);
        }
        let top = s.top.max(self.scroll_y);
        let bottom = (s.top + s.height).min(self.scroll_y + self.viewport_height);
        Some(clamp_unit((bottom - top) / s.height))
    }
}
