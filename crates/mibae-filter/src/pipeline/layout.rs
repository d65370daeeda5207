//! Working and output resolution for a run.

use crate::api::FilterError;

/// Largest output the filter will allocate, in pixels.
pub const MAX_OUTPUT_PIXELS: usize = 1 << 28;

/// Sizes derived from the input, the container budget and the zoom factor.
///
/// The working grid is the natural size scaled by
/// `min(1, container_w / (w * zoom), container_h / (h * zoom))`, floored and
/// never below 1x1. The output is the working grid blown up by `zoom`.
///
/// ```
/// use mibae_filter::Layout;
///
/// let layout = Layout::compute(400, 300, Some((400, 400)), 2).unwrap();
/// assert_eq!(layout.working(), (200, 150));
/// assert_eq!(layout.output(), (400, 300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    natural: (usize, usize),
    working: (usize, usize),
    output: (usize, usize),
    zoom: usize,
    scale: f64,
}

impl Layout {
    /// Compute the layout. Without a container the natural size is the budget.
    ///
    /// # Errors
    ///
    /// - [`FilterError::InvalidOption`] for `zoom == 0`, an empty container,
    ///   or a zoom whose output would exceed [`MAX_OUTPUT_PIXELS`]
    /// - [`FilterError::BufferSize`] for an empty input
    pub fn compute(
        width: usize,
        height: usize,
        container: Option<(usize, usize)>,
        zoom: usize,
    ) -> Result<Self, FilterError> {
        if zoom == 0 {
            return Err(FilterError::InvalidOption {
                option: "zoom",
                reason: "must be at least 1".to_string(),
            });
        }
        if width == 0 || height == 0 {
            return Err(FilterError::BufferSize {
                width,
                height,
                actual: 0,
            });
        }
        let (cw, ch) = container.unwrap_or((width, height));
        if cw == 0 || ch == 0 {
            return Err(FilterError::InvalidOption {
                option: "container",
                reason: format!("{cw}x{ch} has no area"),
            });
        }

        let too_large = || FilterError::InvalidOption {
            option: "zoom",
            reason: format!("{zoom} makes a {width}x{height} input too large to render"),
        };
        let zoomed_w = width.checked_mul(zoom).ok_or_else(too_large)?;
        let zoomed_h = height.checked_mul(zoom).ok_or_else(too_large)?;

        let fit_w = cw as f64 / zoomed_w as f64;
        let fit_h = ch as f64 / zoomed_h as f64;
        let scale = fit_w.min(fit_h).min(1.0);

        let scaled = |v: usize| ((v as f64 * scale).floor() as usize).clamp(1, v);
        let working = (scaled(width), scaled(height));
        let output = working
            .0
            .checked_mul(zoom)
            .zip(working.1.checked_mul(zoom))
            .filter(|&(w, h)| w.checked_mul(h).is_some_and(|area| area <= MAX_OUTPUT_PIXELS))
            .ok_or_else(too_large)?;

        Ok(Self {
            natural: (width, height),
            working,
            output,
            zoom,
            scale,
        })
    }

    /// Input size `(width, height)`.
    #[inline]
    pub fn natural(&self) -> (usize, usize) {
        self.natural
    }

    /// Cell grid `(width, height)` the quantizer walks.
    #[inline]
    pub fn working(&self) -> (usize, usize) {
        self.working
    }

    /// Display resolution: working size times zoom.
    #[inline]
    pub fn output(&self) -> (usize, usize) {
        self.output
    }

    #[inline]
    pub fn zoom(&self) -> usize {
        self.zoom
    }

    /// Downscale factor applied to the natural size (at most 1).
    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_container_keeps_natural_size() {
        let layout = Layout::compute(16, 16, None, 3).unwrap();
        // Budget is 16x16 but zoom 3 would need 48x48.
        assert_eq!(layout.working(), (5, 5));
        assert_eq!(layout.output(), (15, 15));

        let layout = Layout::compute(16, 9, None, 1).unwrap();
        assert_eq!(layout.working(), (16, 9));
        assert_eq!(layout.scale(), 1.0);
    }

    #[test]
    fn test_never_upscales() {
        let layout = Layout::compute(10, 10, Some((1000, 1000)), 2).unwrap();
        assert_eq!(layout.working(), (10, 10));
        assert_eq!(layout.output(), (20, 20));
    }

    #[test]
    fn test_tighter_axis_wins() {
        let layout = Layout::compute(200, 100, Some((100, 100)), 1).unwrap();
        assert_eq!(layout.working(), (100, 50));
    }

    #[test]
    fn test_minimum_one_cell() {
        let layout = Layout::compute(1000, 1, Some((10, 10)), 1).unwrap();
        assert_eq!(layout.working(), (10, 1));
    }

    #[test]
    fn test_huge_zoom_is_rejected() {
        assert!(matches!(
            Layout::compute(3, 3, None, usize::MAX / 2),
            Err(FilterError::InvalidOption { option: "zoom", .. })
        ));
        // No overflow, but one cell would still cover far too many pixels.
        assert!(matches!(
            Layout::compute(3, 3, Some((usize::MAX, usize::MAX)), 1 << 20),
            Err(FilterError::InvalidOption { option: "zoom", .. })
        ));
        assert!(Layout::compute(3, 3, Some((usize::MAX, usize::MAX)), 1 << 10).is_ok());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            Layout::compute(4, 4, None, 0),
            Err(FilterError::InvalidOption { option: "zoom", .. })
        ));
        assert!(matches!(
            Layout::compute(0, 4, None, 1),
            Err(FilterError::BufferSize { .. })
        ));
        assert!(matches!(
            Layout::compute(4, 4, Some((0, 3)), 1),
            Err(FilterError::InvalidOption { option: "container", .. })
        ));
    }
}
