//! Point text parsing and the quadrilateral used by the area report.
//!
//! Coordinates are stored as canonical WKT point text (`POINT (x y)`). Form input
//! carries the bare pair (`x y`), so both shapes are parsed here.

use geo::{Contains, LineString, Point, Polygon};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("coordinate text is empty")]
    Empty,
    #[error("expected exactly two numbers, found {found}")]
    WrongArity { found: usize },
    #[error("`{0}` is not a number")]
    InvalidNumber(String),
    #[error("coordinates must be finite")]
    NonFinite,
    #[error("`{0}` is not a WKT point")]
    NotAPoint(String),
}

/// Parses a bare coordinate pair such as `"14.42 50.08"` or `"14.42,50.08"`.
pub fn parse_coordinate_pair(text: &str) -> Result<Point<f64>, CoordinateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Empty);
    }

    let tokens: Vec<&str> = if trimmed.contains(',') {
        trimmed.split(',').map(str::trim).collect()
    } else {
        trimmed.split_whitespace().collect()
    };
    if tokens.len() != 2 {
        return Err(CoordinateError::WrongArity {
            found: tokens.len(),
        });
    }

    let x = parse_number(tokens[0])?;
    let y = parse_number(tokens[1])?;
    Ok(Point::new(x, y))
}

/// Parses WKT point text (`POINT (x y)`, keyword case-insensitive).
pub fn parse_wkt_point(text: &str) -> Result<Point<f64>, CoordinateError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CoordinateError::Empty);
    }

    let not_a_point = || CoordinateError::NotAPoint(trimmed.to_string());
    let rest = match trimmed.get(..5) {
        Some(keyword) if keyword.eq_ignore_ascii_case("POINT") => trimmed[5..].trim_start(),
        _ => return Err(not_a_point()),
    };
    let inner = rest
        .strip_prefix('(')
        .and_then(|body| body.strip_suffix(')'))
        .ok_or_else(not_a_point)?;
    if inner.contains(',') {
        return Err(not_a_point());
    }

    parse_coordinate_pair(inner)
}

pub fn to_wkt(point: &Point<f64>) -> String {
    format!("POINT ({} {})", point.x(), point.y())
}

/// Re-serializes point text into its canonical form.
pub fn canonical_wkt(text: &str) -> Result<String, CoordinateError> {
    parse_wkt_point(text).map(|point| to_wkt(&point))
}

fn parse_number(token: &str) -> Result<f64, CoordinateError> {
    let value: f64 = token
        .parse()
        .map_err(|_| CoordinateError::InvalidNumber(token.to_string()))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CoordinateError::NonFinite)
    }
}

/// Four corners taken in the order given. Neither convexity nor winding is checked.
#[derive(Debug, Clone)]
pub struct Quadrilateral {
    polygon: Polygon<f64>,
}

impl Quadrilateral {
    pub fn from_corners(corners: [Point<f64>; 4]) -> Self {
        let exterior: LineString<f64> = corners.iter().map(|corner| corner.0).collect();
        Self {
            polygon: Polygon::new(exterior, Vec::new()),
        }
    }

    /// Interior points only: a point on an edge or a vertex is not contained.
    pub fn contains(&self, point: &Point<f64>) -> bool {
        self.polygon.contains(point)
    }
}
