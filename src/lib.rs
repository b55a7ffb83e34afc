//! Pixel Transform Engine
//!
//! Deterministic per-pixel and 3x3 convolution filters over RGBA raster
//! buffers, with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are [`RasterBuffer`]s: `(height, width, 4)` RGBA bytes, row-major,
//! so channel `c` of pixel `(x, y)` is byte `(y * width + x) * 4 + c`.
//! Decoding, encoding and display scaling happen outside this crate.
//!
//! ## Filters
//! - **Grayscale**: luminance, average or lightness
//! - **Contrast** / **Brightness**: levels -100..=100
//! - **Sharpen** / **Blur** / **Edge detection**: intensity 1..=100,
//!   applied as 3x3 kernels with the 1-pixel border copied unchanged
//!
//! Every filter reads its input and returns a new buffer of the same size.
//!
//! ```
//! use pixel_transform::{apply, FilterRequest, RasterBuffer};
//!
//! let image = RasterBuffer::filled(3, 3, [128, 128, 128, 255])?;
//! let sharpened = apply(&image, &FilterRequest::Sharpen { intensity: 50 })?;
//! assert_eq!(sharpened, image);
//! # Ok::<(), pixel_transform::CoreError>(())
//! ```

pub mod error;
pub mod filters;
pub mod pipeline;
pub mod raster;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use crate::error::{CoreError, Result};
pub use crate::filters::grayscale::ConversionMethod;
pub use crate::filters::kernel::Kernel;
pub use crate::pipeline::{apply, FilterRequest, PipelineOptions, PipelineState, TransformPipeline};
pub use crate::raster::RasterBuffer;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::{ConversionMethod, CoreError, FilterRequest, RasterBuffer};

    impl From<CoreError> for PyErr {
        fn from(e: CoreError) -> Self {
            PyValueError::new_err(e.to_string())
        }
    }

    fn run<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        request: FilterRequest,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = RasterBuffer::from_array(image.as_array().to_owned())?;
        let result = py.allow_threads(|| crate::apply(&input, &request))?;
        Ok(result.into_array().into_pyarray(py))
    }

    // ========================================================================
    // Color Remap Filters
    // ========================================================================

    /// Convert an RGBA u8 image to grayscale.
    ///
    /// `method` is "luminance", "average" or "lightness"; anything else
    /// falls back to luminance.
    #[pyfunction]
    #[pyo3(signature = (image, method="luminance"))]
    pub fn grayscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        method: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let method = ConversionMethod::from_name(method);
        run(py, image, FilterRequest::Grayscale { method })
    }

    #[pyfunction]
    pub fn contrast<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        level: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, FilterRequest::Contrast { level })
    }

    #[pyfunction]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        level: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, FilterRequest::Brightness { level })
    }

    // ========================================================================
    // Convolution Filters
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, intensity=50))]
    pub fn sharpen<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        intensity: u8,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, FilterRequest::Sharpen { intensity })
    }

    #[pyfunction]
    #[pyo3(signature = (image, intensity=50))]
    pub fn blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        intensity: u8,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, FilterRequest::Blur { intensity })
    }

    #[pyfunction]
    #[pyo3(signature = (image, intensity=50))]
    pub fn edge_detect<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        intensity: u8,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        run(py, image, FilterRequest::EdgeDetect { intensity })
    }

    // ========================================================================
    // Generic Dispatch
    // ========================================================================

    /// Apply a filter described as JSON, e.g. `{"filter": "blur", "intensity": 30}`.
    #[pyfunction]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        request: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let request: FilterRequest = serde_json::from_str(request)
            .map_err(|e| PyValueError::new_err(format!("Invalid filter request: {}", e)))?;
        run(py, image, request)
    }

    #[pymodule]
    pub fn pixel_transform(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Color remap
        m.add_function(wrap_pyfunction!(grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(contrast, m)?)?;
        m.add_function(wrap_pyfunction!(brightness, m)?)?;

        // Convolution
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(blur, m)?)?;
        m.add_function(wrap_pyfunction!(edge_detect, m)?)?;

        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixel_transform;
