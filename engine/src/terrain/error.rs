//! Terrain Errors
//!
//! Every failure in the terrain core is a local computation error raised at
//! the point of the invalid call. Callers should treat the first three
//! variants as programming errors.

/// Errors that can occur while generating, sampling or persisting terrain.
#[derive(Debug)]
pub enum TerrainError {
    /// A count, resolution, size or direction failed validation.
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    /// Grid coordinate outside `[0, count_x) x [0, count_z)`.
    OutOfBounds {
        i: usize,
        j: usize,
        count_x: usize,
        count_z: usize,
    },
    /// Operation invoked before the layer it depends on was built.
    PrecedenceViolation(&'static str),
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
}

impl TerrainError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        TerrainError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for TerrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerrainError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            TerrainError::OutOfBounds {
                i,
                j,
                count_x,
                count_z,
            } => write!(
                f,
                "control node ({i}, {j}) outside grid of {count_x}x{count_z} nodes"
            ),
            TerrainError::PrecedenceViolation(what) => {
                write!(f, "{what} requires a generated control grid")
            }
            TerrainError::Io(e) => write!(f, "IO error: {e}"),
            TerrainError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerrainError::Io(e) => Some(e),
            TerrainError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TerrainError {
    fn from(e: std::io::Error) -> Self {
        TerrainError::Io(e)
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(e: serde_json::Error) -> Self {
        TerrainError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_out_of_bounds() {
        let err = TerrainError::OutOfBounds {
            i: 4,
            j: 1,
            count_x: 3,
            count_z: 3,
        };
        assert_eq!(
            err.to_string(),
            "control node (4, 1) outside grid of 3x3 nodes"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TerrainError = io.into();
        assert!(matches!(err, TerrainError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
