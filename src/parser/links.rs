//! Correlation of link annotations with the text runs they cover.
//!
//! Link annotations only carry a rectangle and a target. The text of a link
//! is recovered by collecting the runs whose origin falls inside the
//! rectangle and merging runs that are visually contiguous, so a link split
//! by the decoder (or covered by several overlapping rectangles) yields one
//! candidate.

use crate::model::{CandidateLink, LinkAnnotation, LinkPosition, Rect, TextRun};

use super::layout::{needs_space, reading_order};
use super::{ExtractOptions, Tolerances};

/// Locates candidate links on a page.
#[derive(Debug, Clone, Default)]
pub struct LinkLocator {
    tolerances: Tolerances,
    resolve_destinations: bool,
}

impl LinkLocator {
    /// Create a locator with explicit tolerances.
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            resolve_destinations: false,
        }
    }

    /// Create a locator from extraction options.
    pub fn from_options(options: &ExtractOptions) -> Self {
        Self {
            tolerances: options.tolerances,
            resolve_destinations: options.resolve_destinations,
        }
    }

    /// Also turn internal destinations into `#`-prefixed links.
    pub fn with_destinations(mut self, resolve: bool) -> Self {
        self.resolve_destinations = resolve;
        self
    }

    /// Find the candidate links of one page, in reading order.
    pub fn locate(
        &self,
        page: u32,
        runs: &[TextRun],
        annotations: &[LinkAnnotation],
    ) -> Vec<CandidateLink> {
        let targets: Vec<(String, Rect)> = annotations
            .iter()
            .filter(|a| a.is_link())
            .filter_map(|a| {
                a.target(self.resolve_destinations)
                    .map(|t| (t, a.rect.normalized()))
            })
            .collect();

        if targets.is_empty() {
            return Vec::new();
        }

        let mut ordered: Vec<&TextRun> = runs.iter().filter(|r| !r.text.trim().is_empty()).collect();
        ordered.sort_by(|a, b| reading_order(a, b));

        let mut candidates: Vec<CandidateLink> = Vec::new();
        for run in ordered {
            for (target, rect) in &targets {
                if rect.contains_point(run.x, run.y, self.tolerances.link_margin) {
                    self.absorb(&mut candidates, page, run, target);
                }
            }
        }

        self.consolidate(candidates)
    }

    /// Extend a matching candidate with `run`, or start a new one.
    fn absorb(&self, candidates: &mut Vec<CandidateLink>, page: u32, run: &TextRun, target: &str) {
        let bounds = run.bounds(self.tolerances.avg_char_width);

        for candidate in candidates.iter_mut().filter(|c| c.url == target) {
            if let Some(gap) = self.adjacent_gap(candidate, &bounds, run.y) {
                let threshold = self.tolerances.space_threshold;
                candidate.text = if bounds.x1 < candidate.bounds.x1 {
                    merge_link_text(&run.text, &candidate.text, gap, threshold)
                } else {
                    merge_link_text(&candidate.text, &run.text, gap, threshold)
                };
                candidate.bounds = candidate.bounds.union(&bounds);
                candidate.position.x = candidate.bounds.x1;
                return;
            }
        }

        candidates.push(CandidateLink {
            text: run.text.trim().to_string(),
            url: target.to_string(),
            position: LinkPosition {
                x: run.x,
                y: run.y,
                page,
            },
            bounds,
        });
    }

    /// Gap between a candidate span and a run, if they are on the same line
    /// and close enough to be one link.
    fn adjacent_gap(&self, candidate: &CandidateLink, bounds: &Rect, y: f32) -> Option<f32> {
        if (candidate.position.y - y).abs() >= self.tolerances.link_line_tolerance {
            return None;
        }
        let gap = candidate.bounds.horizontal_gap(bounds);
        let threshold = self.tolerances.adjacency_factor * self.char_width(candidate);
        (gap < threshold).then_some(gap)
    }

    /// Average character width of a candidate's text.
    fn char_width(&self, candidate: &CandidateLink) -> f32 {
        let chars = candidate.text.chars().count();
        let width = candidate.bounds.width();
        if chars > 0 && width > 0.0 {
            width / chars as f32
        } else {
            self.tolerances.avg_char_width
        }
    }

    /// Merge candidates that became adjacent through later runs, drop exact
    /// duplicates, and order the result for reading.
    fn consolidate(&self, mut candidates: Vec<CandidateLink>) -> Vec<CandidateLink> {
        'restart: loop {
            for i in 0..candidates.len() {
                for j in (i + 1)..candidates.len() {
                    if candidates[i].url != candidates[j].url {
                        continue;
                    }
                    let other_y = candidates[j].position.y;
                    let other_bounds = candidates[j].bounds;
                    if let Some(gap) = self.adjacent_gap(&candidates[i], &other_bounds, other_y) {
                        let right = candidates.remove(j);
                        let left = &mut candidates[i];
                        left.text = if right.bounds.x1 < left.bounds.x1 {
                            merge_link_text(&right.text, &left.text, gap, self.tolerances.space_threshold)
                        } else {
                            merge_link_text(&left.text, &right.text, gap, self.tolerances.space_threshold)
                        };
                        left.bounds = left.bounds.union(&right.bounds);
                        left.position.x = left.bounds.x1;
                        continue 'restart;
                    }
                }
            }
            break;
        }

        let mut unique: Vec<CandidateLink> = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let duplicate = unique.iter().any(|u| {
                u.url == candidate.url
                    && u.text == candidate.text
                    && (u.position.y - candidate.position.y).abs() < self.tolerances.link_line_tolerance
                    && (u.position.x - candidate.position.x).abs() < self.tolerances.avg_char_width
            });
            if !duplicate {
                unique.push(candidate);
            }
        }

        unique.sort_by(|a, b| {
            b.position
                .y
                .total_cmp(&a.position.y)
                .then(a.position.x.total_cmp(&b.position.x))
        });
        unique
    }
}

/// Find the candidate links of one page with the given options.
pub fn locate_links(
    page: u32,
    runs: &[TextRun],
    annotations: &[LinkAnnotation],
    options: &ExtractOptions,
) -> Vec<CandidateLink> {
    LinkLocator::from_options(options).locate(page, runs, annotations)
}

/// Merge the text of a run into the text of a link span.
///
/// Overlapping detections (`gap < 0`) produce repeated fragments ("Home"
/// twice, or "Home Page" followed by "Page"), which must not be duplicated.
/// Spans that only touch are always concatenated.
pub fn merge_link_text(existing: &str, addition: &str, gap: f32, space_threshold: f32) -> String {
    let existing = existing.trim();
    let addition = addition.trim();

    if addition.is_empty() {
        return existing.to_string();
    }
    if existing.is_empty() {
        return addition.to_string();
    }

    if gap < 0.0 {
        if existing.contains(addition) {
            return existing.to_string();
        }
        if addition.contains(existing) {
            return addition.to_string();
        }

        let last_word = existing.split_whitespace().last();
        let first_word = addition.split_whitespace().next();
        if last_word.is_some() && last_word == first_word {
            let rest = addition[first_word.map(str::len).unwrap_or(0)..].trim_start();
            return if rest.is_empty() {
                existing.to_string()
            } else {
                format!("{} {}", existing, rest)
            };
        }
    }

    if gap > space_threshold && needs_space(existing, addition) {
        format!("{} {}", existing, addition)
    } else {
        format!("{}{}", existing, addition)
    }
}
