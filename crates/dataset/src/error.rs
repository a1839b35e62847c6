//! Error types for casegrid-dataset.

use std::path::PathBuf;

/// Error type for all fallible operations in the casegrid-dataset crate.
///
/// Covers file access, NetCDF library failures, and the structural checks
/// performed when datasets are built, concatenated, or subset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Returned when a dataset file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an error originating from the NetCDF library.
    #[error("netcdf error: {reason}")]
    Netcdf {
        /// Description of the underlying NetCDF failure.
        reason: String,
    },

    /// Returned when a named variable is not present in a dataset.
    #[error("variable '{name}' not found")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
    },

    /// Returned when a named dimension is not present in a dataset.
    #[error("dimension '{name}' not found")]
    MissingDimension {
        /// Name of the missing dimension.
        name: String,
    },

    /// Returned when a dimension has an unexpected size.
    #[error("dimension '{name}' mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the dimension.
        name: String,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Returned when a new dimension would shadow an existing one.
    #[error("dimension '{name}' already exists")]
    DimensionExists {
        /// Name of the clashing dimension.
        name: String,
    },

    /// Returned when array data cannot take the requested shape.
    #[error("shape error: {reason}")]
    Shape {
        /// Description of the shape failure.
        reason: String,
    },

    /// Returned when a label is not among a dimension's coordinate values.
    #[error("label '{label}' not found on dimension '{dim}'")]
    LabelNotFound {
        /// Dimension that was searched.
        dim: String,
        /// Label that was requested.
        label: String,
    },

    /// Returned when a dimension has no coordinate to select labels from.
    #[error("dimension '{dim}' has no coordinate")]
    MissingCoordinate {
        /// Dimension without a coordinate.
        dim: String,
    },

    /// Returned when concatenation is requested over zero datasets.
    #[error("cannot concatenate an empty sequence of datasets")]
    EmptyConcat,
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for DatasetError {
    fn from(e: netcdf::Error) -> Self {
        DatasetError::Netcdf {
            reason: e.to_string(),
        }
    }
}

impl From<ndarray::ShapeError> for DatasetError {
    fn from(e: ndarray::ShapeError) -> Self {
        DatasetError::Shape {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = DatasetError::FileNotFound {
            path: PathBuf::from("/tmp/missing.nc"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.nc");
    }

    #[test]
    fn display_dimension_mismatch() {
        let err = DatasetError::DimensionMismatch {
            name: "time".to_string(),
            expected: 10,
            got: 12,
        };
        assert_eq!(
            err.to_string(),
            "dimension 'time' mismatch: expected 10, got 12"
        );
    }

    #[test]
    fn display_label_not_found() {
        let err = DatasetError::LabelNotFound {
            dim: "emis".to_string(),
            label: "medium".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "label 'medium' not found on dimension 'emis'"
        );
    }

    #[test]
    fn from_shape_error() {
        let shape_err = ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape);
        let err: DatasetError = shape_err.into();
        assert!(matches!(err, DatasetError::Shape { .. }));
    }

    #[cfg(feature = "netcdf")]
    #[test]
    fn from_netcdf_error() {
        let nc_err = netcdf::Error::Str("test nc error".to_string());
        let err: DatasetError = nc_err.into();
        assert!(matches!(err, DatasetError::Netcdf { .. }));
        assert!(err.to_string().contains("test nc error"));
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<DatasetError>();
    }
}
