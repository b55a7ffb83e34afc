//! Filter dispatch.
//!
//! A [`FilterRequest`] names one filter from a closed set together with its
//! parameter. [`TransformPipeline`] checks the parameter range, routes the
//! request to the color remap or convolution operators and records the
//! outcome as a [`PipelineState`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::filters::color_adjust::{brightness_u8, contrast_u8, MAX_BRIGHTNESS_LEVEL};
use crate::filters::convolve::{convolve_3x3_with_threshold, DEFAULT_PARALLEL_THRESHOLD};
use crate::filters::grayscale::{grayscale_rgba_u8, ConversionMethod};
use crate::filters::kernel::{blur_kernel, edge_detect_kernel, sharpen_kernel, Kernel};
use crate::raster::RasterBuffer;

/// Largest absolute contrast level the pipeline accepts.
pub const MAX_CONTRAST_LEVEL: i32 = 100;

/// One filter and its parameter.
///
/// Serialized with an internal `filter` tag, e.g.
/// `{"filter": "sharpen", "intensity": 50}` or `{"filter": "grayscale", "method": "average"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterRequest {
    Grayscale {
        #[serde(default)]
        method: ConversionMethod,
    },
    /// Level in -100..=100
    Contrast { level: i32 },
    /// Level in -100..=100
    Brightness { level: i32 },
    /// Intensity in 1..=100
    Sharpen { intensity: u8 },
    /// Intensity in 1..=100
    Blur { intensity: u8 },
    /// Intensity in 1..=100
    EdgeDetect { intensity: u8 },
}

impl FilterRequest {
    pub fn name(&self) -> &'static str {
        match self {
            FilterRequest::Grayscale { .. } => "grayscale",
            FilterRequest::Contrast { .. } => "contrast",
            FilterRequest::Brightness { .. } => "brightness",
            FilterRequest::Sharpen { .. } => "sharpen",
            FilterRequest::Blur { .. } => "blur",
            FilterRequest::EdgeDetect { .. } => "edge_detect",
        }
    }

    /// Check the parameter against its documented range.
    pub fn validate(&self) -> Result<()> {
        match *self {
            FilterRequest::Grayscale { .. } => Ok(()),
            FilterRequest::Contrast { level } => check_level("contrast", level, MAX_CONTRAST_LEVEL),
            FilterRequest::Brightness { level } => {
                check_level("brightness", level, MAX_BRIGHTNESS_LEVEL)
            }
            // Intensity ranges are enforced by the kernel factories.
            FilterRequest::Sharpen { .. }
            | FilterRequest::Blur { .. }
            | FilterRequest::EdgeDetect { .. } => self.kernel().map(|_| ()),
        }
    }

    /// Kernel for the convolution variants, `None` for color remaps.
    pub fn kernel(&self) -> Result<Option<Kernel>> {
        match *self {
            FilterRequest::Sharpen { intensity } => sharpen_kernel(intensity).map(Some),
            FilterRequest::Blur { intensity } => blur_kernel(intensity).map(Some),
            FilterRequest::EdgeDetect { intensity } => edge_detect_kernel(intensity).map(Some),
            FilterRequest::Grayscale { .. }
            | FilterRequest::Contrast { .. }
            | FilterRequest::Brightness { .. } => Ok(None),
        }
    }
}

fn check_level(what: &str, level: i32, max: i32) -> Result<()> {
    if (-max..=max).contains(&level) {
        Ok(())
    } else {
        Err(CoreError::InvalidParameter(format!(
            "{} level {} outside -{}..={}",
            what, level, max, max
        )))
    }
}

/// Runtime settings for [`TransformPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Images with at least this many pixels are convolved row-parallel.
    /// `0` always parallelizes, `usize::MAX` never does.
    pub parallel_threshold: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl PipelineOptions {
    /// Options that keep all work on the calling thread.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

/// Progress of the most recent [`TransformPipeline::apply`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Processing,
    Done,
    Failed,
}

/// Validates requests and dispatches them to the operators.
#[derive(Debug, Clone, Default)]
pub struct TransformPipeline {
    options: PipelineOptions,
    state: PipelineState,
}

impl TransformPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            state: PipelineState::Idle,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Return to `Idle`.
    pub fn reset(&mut self) {
        self.state = PipelineState::Idle;
    }

    /// Apply `request` to `source`.
    ///
    /// # Arguments
    /// * `source` - Decoded input image, left untouched
    /// * `request` - Filter and parameter
    ///
    /// # Returns
    /// New image with the same dimensions as `source`
    pub fn apply(
        &mut self,
        source: &RasterBuffer,
        request: &FilterRequest,
    ) -> Result<RasterBuffer> {
        self.state = PipelineState::Processing;
        debug!(
            "applying {} to {}x{} image: {:?}",
            request.name(),
            source.width(),
            source.height(),
            request
        );

        let result = self.dispatch(source, request);
        self.state = match &result {
            Ok(output) => {
                debug_assert_eq!(output.dimensions(), source.dimensions());
                PipelineState::Done
            }
            Err(e) => {
                debug!("{} failed: {}", request.name(), e);
                PipelineState::Failed
            }
        };
        result
    }

    fn dispatch(&self, source: &RasterBuffer, request: &FilterRequest) -> Result<RasterBuffer> {
        match *request {
            FilterRequest::Grayscale { method } => Ok(grayscale_rgba_u8(source, method)),
            FilterRequest::Contrast { level } => {
                check_level("contrast", level, MAX_CONTRAST_LEVEL)?;
                contrast_u8(source, level)
            }
            // brightness_u8 enforces its own range.
            FilterRequest::Brightness { level } => brightness_u8(source, level),
            FilterRequest::Sharpen { intensity } => {
                let kernel = sharpen_kernel(intensity)?;
                self.convolve(source, &kernel)
            }
            FilterRequest::Blur { intensity } => {
                let kernel = blur_kernel(intensity)?;
                self.convolve(source, &kernel)
            }
            FilterRequest::EdgeDetect { intensity } => {
                let kernel = edge_detect_kernel(intensity)?;
                self.convolve(source, &kernel)
            }
        }
    }

    fn convolve(&self, source: &RasterBuffer, kernel: &Kernel) -> Result<RasterBuffer> {
        convolve_3x3_with_threshold(source, kernel, self.options.parallel_threshold)
    }
}

/// Apply `request` to `source` with default options.
pub fn apply(source: &RasterBuffer, request: &FilterRequest) -> Result<RasterBuffer> {
    TransformPipeline::default().apply(source, request)
}
