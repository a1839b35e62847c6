//! Labeled in-memory datasets.
//!
//! A [`Dataset`] is an ordered set of named dimensions, 1-D coordinates that
//! label those dimensions, and `f64` data variables laid out over them. The
//! structure is deliberately small: it carries exactly what is needed to
//! stack per-case datasets into a master dataset and to slice it back apart.

use std::fmt;

use indexmap::IndexMap;
use ndarray::{ArrayD, ArrayViewD, Axis, IxDyn};

use crate::error::DatasetError;

/// Ordered attribute map attached to datasets, coordinates and variables.
pub type Attrs = IndexMap<String, AttrValue>;

// ---------------------------------------------------------------------------
// AttrValue
// ---------------------------------------------------------------------------

/// A single metadata attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Free text, e.g. `units` or `long_name`.
    Text(String),
    /// Floating-point scalar.
    Float(f64),
    /// Integer scalar.
    Int(i64),
}

impl AttrValue {
    /// Returns the value as `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::Text(_) => None,
        }
    }

    /// Returns the value as text when it is textual.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// Values of a 1-D coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValues {
    /// Numeric coordinate (time offsets, longitudes, levels, ...).
    Float(Vec<f64>),
    /// Text labels, as used for case dimensions.
    Text(Vec<String>),
}

impl CoordValues {
    /// Number of coordinate values.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Returns `true` when the coordinate holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of `label` along the coordinate.
    ///
    /// Text coordinates match exactly; numeric coordinates match when
    /// `label` parses to an equal `f64`.
    pub fn position(&self, label: &str) -> Option<usize> {
        match self {
            Self::Text(v) => v.iter().position(|s| s == label),
            Self::Float(v) => {
                let target: f64 = label.parse().ok()?;
                v.iter().position(|&x| x == target)
            }
        }
    }

    /// Values rendered as strings.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Float(v) => v.iter().map(|x| x.to_string()).collect(),
            Self::Text(v) => v.clone(),
        }
    }
}

/// A 1-D coordinate laid out along one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    dim: String,
    values: CoordValues,
    attrs: Attrs,
}

impl Coordinate {
    /// Create a coordinate along `dim`.
    pub fn new(dim: impl Into<String>, values: CoordValues) -> Self {
        Self {
            dim: dim.into(),
            values,
            attrs: Attrs::new(),
        }
    }

    /// Attach an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Dimension this coordinate labels.
    pub fn dim(&self) -> &str {
        &self.dim
    }

    /// Coordinate values.
    pub fn values(&self) -> &CoordValues {
        &self.values
    }

    /// Coordinate attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the coordinate holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Variable
// ---------------------------------------------------------------------------

/// An n-dimensional `f64` data variable with named dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    dims: Vec<String>,
    data: ArrayD<f64>,
    attrs: Attrs,
}

impl Variable {
    /// Create a variable from named dimensions and array data.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DimensionMismatch`] if the number of dimension
    /// names differs from the array rank.
    pub fn new(dims: Vec<String>, data: ArrayD<f64>) -> Result<Self, DatasetError> {
        if dims.len() != data.ndim() {
            return Err(DatasetError::DimensionMismatch {
                name: "rank".into(),
                expected: data.ndim(),
                got: dims.len(),
            });
        }
        Ok(Self {
            dims,
            data,
            attrs: Attrs::new(),
        })
    }

    /// Create a variable from a flat row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Shape`] if `values.len()` is not the product
    /// of `shape`, or [`DatasetError::DimensionMismatch`] if `dims` and
    /// `shape` differ in length.
    pub fn from_vec(
        dims: &[&str],
        shape: &[usize],
        values: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Self::new(dims.iter().map(|d| d.to_string()).collect(), data)
    }

    /// Attach an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Dimension names, outermost first.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Array data.
    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Variable attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }
}

// ---------------------------------------------------------------------------
// NewDim
// ---------------------------------------------------------------------------

/// Description of a dimension introduced by concatenation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDim {
    name: String,
    long_name: Option<String>,
    labels: Vec<String>,
}

impl NewDim {
    /// A new dimension `name` whose coordinate carries `labels`, one per
    /// concatenated dataset.
    pub fn new(name: impl Into<String>, labels: Vec<String>) -> Self {
        Self {
            name: name.into(),
            long_name: None,
            labels,
        }
    }

    /// Set the `long_name` attribute of the new coordinate.
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    /// Dimension name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Descriptive name, if any.
    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    /// Coordinate labels.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// A labeled collection of dimensions, coordinates and data variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    dims: IndexMap<String, usize>,
    coords: IndexMap<String, Coordinate>,
    variables: IndexMap<String, Variable>,
    attrs: Attrs,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    fn register_dim(&mut self, name: &str, len: usize) -> Result<(), DatasetError> {
        match self.dims.get(name) {
            Some(&existing) if existing != len => Err(DatasetError::DimensionMismatch {
                name: name.to_string(),
                expected: existing,
                got: len,
            }),
            Some(_) => Ok(()),
            None => {
                self.dims.insert(name.to_string(), len);
                Ok(())
            }
        }
    }

    /// Add (or replace) a coordinate, registering its dimension.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DimensionMismatch`] if the dimension already
    /// exists with a different length.
    pub fn add_coord(
        &mut self,
        name: impl Into<String>,
        coord: Coordinate,
    ) -> Result<(), DatasetError> {
        self.register_dim(&coord.dim, coord.len())?;
        self.coords.insert(name.into(), coord);
        Ok(())
    }

    /// Add (or replace) a data variable, registering its dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::DimensionMismatch`] if any dimension already
    /// exists with a different length.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        variable: Variable,
    ) -> Result<(), DatasetError> {
        for (dim, &len) in variable.dims.iter().zip(variable.data.shape()) {
            self.register_dim(dim, len)?;
        }
        self.variables.insert(name.into(), variable);
        Ok(())
    }

    /// Set a global attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Builder form of [`add_coord`](Self::add_coord).
    pub fn with_coord(
        mut self,
        name: impl Into<String>,
        coord: Coordinate,
    ) -> Result<Self, DatasetError> {
        self.add_coord(name, coord)?;
        Ok(self)
    }

    /// Builder form of [`add_variable`](Self::add_variable).
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        variable: Variable,
    ) -> Result<Self, DatasetError> {
        self.add_variable(name, variable)?;
        Ok(self)
    }

    /// Builder form of [`set_attr`](Self::set_attr).
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Dimensions in order of first appearance, with their lengths.
    pub fn dims(&self) -> &IndexMap<String, usize> {
        &self.dims
    }

    /// Length of dimension `name`.
    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.dims.get(name).copied()
    }

    /// Coordinate `name`.
    pub fn coord(&self, name: &str) -> Option<&Coordinate> {
        self.coords.get(name)
    }

    /// All coordinates.
    pub fn coords(&self) -> &IndexMap<String, Coordinate> {
        &self.coords
    }

    /// Data variable `name`.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// All data variables.
    pub fn variables(&self) -> &IndexMap<String, Variable> {
        &self.variables
    }

    /// Global attributes.
    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Stack `datasets` along a new leading dimension.
    ///
    /// Every data variable gains `new_dim` as its outermost dimension and the
    /// new coordinate carries `new_dim`'s labels in input order. All inputs
    /// must share dimensions (names and lengths) and variables (names and
    /// dimension order). Coordinates and attributes are taken from the first
    /// dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::EmptyConcat`] for an empty input,
    /// [`DatasetError::DimensionMismatch`] when the label count differs from
    /// the dataset count or shapes disagree, [`DatasetError::DimensionExists`]
    /// when the new dimension name is taken, and
    /// [`DatasetError::MissingVariable`] / [`DatasetError::MissingDimension`]
    /// when the inputs are not structurally identical.
    pub fn concat(datasets: Vec<Dataset>, new_dim: &NewDim) -> Result<Dataset, DatasetError> {
        let Some(proto) = datasets.first() else {
            return Err(DatasetError::EmptyConcat);
        };

        if new_dim.labels.len() != datasets.len() {
            return Err(DatasetError::DimensionMismatch {
                name: new_dim.name.clone(),
                expected: new_dim.labels.len(),
                got: datasets.len(),
            });
        }

        if proto.dims.contains_key(&new_dim.name)
            || proto.coords.contains_key(&new_dim.name)
            || proto.variables.contains_key(&new_dim.name)
        {
            return Err(DatasetError::DimensionExists {
                name: new_dim.name.clone(),
            });
        }

        for other in &datasets[1..] {
            check_compatible(proto, other)?;
        }

        let mut out = Dataset::new();
        out.dims.insert(new_dim.name.clone(), datasets.len());
        out.dims
            .extend(proto.dims.iter().map(|(k, &v)| (k.clone(), v)));

        let mut coord = Coordinate::new(
            new_dim.name.clone(),
            CoordValues::Text(new_dim.labels.clone()),
        );
        if let Some(long_name) = &new_dim.long_name {
            coord = coord.with_attr("long_name", long_name.as_str());
        }
        out.coords.insert(new_dim.name.clone(), coord);
        out.coords
            .extend(proto.coords.iter().map(|(k, c)| (k.clone(), c.clone())));

        for (name, var) in &proto.variables {
            let views = datasets
                .iter()
                .map(|ds| {
                    ds.variables
                        .get(name)
                        .map(|v| v.data.view())
                        .ok_or_else(|| DatasetError::MissingVariable { name: name.clone() })
                })
                .collect::<Result<Vec<ArrayViewD<'_, f64>>, _>>()?;
            let data = ndarray::stack(Axis(0), &views)?;

            let mut dims = Vec::with_capacity(var.dims.len() + 1);
            dims.push(new_dim.name.clone());
            dims.extend(var.dims.iter().cloned());

            out.variables.insert(
                name.clone(),
                Variable {
                    dims,
                    data,
                    attrs: var.attrs.clone(),
                },
            );
        }

        out.attrs = proto.attrs.clone();
        Ok(out)
    }

    /// Select the slice at `label` along `dim`, dropping the dimension.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingDimension`] if `dim` does not exist,
    /// [`DatasetError::MissingCoordinate`] if it has no coordinate to look
    /// labels up in, and [`DatasetError::LabelNotFound`] if `label` is not
    /// among its values.
    pub fn select(&self, dim: &str, label: &str) -> Result<Dataset, DatasetError> {
        if !self.dims.contains_key(dim) {
            return Err(DatasetError::MissingDimension {
                name: dim.to_string(),
            });
        }
        let coord = self
            .coords
            .values()
            .find(|c| c.dim == dim)
            .ok_or_else(|| DatasetError::MissingCoordinate {
                dim: dim.to_string(),
            })?;
        let index = coord
            .values
            .position(label)
            .ok_or_else(|| DatasetError::LabelNotFound {
                dim: dim.to_string(),
                label: label.to_string(),
            })?;
        self.isel(dim, index)
    }

    /// Select position `index` along `dim`, dropping the dimension.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingDimension`] if `dim` does not exist or
    /// [`DatasetError::Shape`] if `index` is out of bounds.
    pub fn isel(&self, dim: &str, index: usize) -> Result<Dataset, DatasetError> {
        let len = self
            .dim_len(dim)
            .ok_or_else(|| DatasetError::MissingDimension {
                name: dim.to_string(),
            })?;
        if index >= len {
            return Err(DatasetError::Shape {
                reason: format!("index {index} out of bounds for dimension '{dim}' of length {len}"),
            });
        }

        let mut out = Dataset::new();
        out.dims = self
            .dims
            .iter()
            .filter(|(k, _)| k.as_str() != dim)
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        out.coords = self
            .coords
            .iter()
            .filter(|(_, c)| c.dim != dim)
            .map(|(k, c)| (k.clone(), c.clone()))
            .collect();

        for (name, var) in &self.variables {
            let sliced = match var.dims.iter().position(|d| d == dim) {
                Some(axis) => Variable {
                    dims: var
                        .dims
                        .iter()
                        .filter(|d| d.as_str() != dim)
                        .cloned()
                        .collect(),
                    data: var.data.index_axis(Axis(axis), index).to_owned(),
                    attrs: var.attrs.clone(),
                },
                None => var.clone(),
            };
            out.variables.insert(name.clone(), sliced);
        }

        out.attrs = self.attrs.clone();
        Ok(out)
    }

    /// Keep only the named data variables, together with the dimensions and
    /// coordinates they use.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingVariable`] if any name is absent.
    pub fn retain_variables<S: AsRef<str>>(self, names: &[S]) -> Result<Dataset, DatasetError> {
        for name in names {
            if !self.variables.contains_key(name.as_ref()) {
                return Err(DatasetError::MissingVariable {
                    name: name.as_ref().to_string(),
                });
            }
        }

        let Dataset {
            dims,
            coords,
            variables,
            attrs,
        } = self;

        let variables: IndexMap<String, Variable> = variables
            .into_iter()
            .filter(|(k, _)| names.iter().any(|n| n.as_ref() == k))
            .collect();
        let used = |d: &str| variables.values().any(|v| v.dims.iter().any(|vd| vd == d));

        Ok(Dataset {
            dims: dims.into_iter().filter(|(k, _)| used(k.as_str())).collect(),
            coords: coords
                .into_iter()
                .filter(|(_, c)| used(c.dim.as_str()))
                .collect(),
            variables,
            attrs,
        })
    }
}

/// Check that `other` has the same dimensions and variables as `proto`.
fn check_compatible(proto: &Dataset, other: &Dataset) -> Result<(), DatasetError> {
    for (name, &len) in &proto.dims {
        match other.dims.get(name) {
            None => {
                return Err(DatasetError::MissingDimension { name: name.clone() });
            }
            Some(&got) if got != len => {
                return Err(DatasetError::DimensionMismatch {
                    name: name.clone(),
                    expected: len,
                    got,
                });
            }
            Some(_) => {}
        }
    }
    if let Some(extra) = other.dims.keys().find(|k| !proto.dims.contains_key(*k)) {
        return Err(DatasetError::MissingDimension {
            name: extra.clone(),
        });
    }

    for (name, var) in &proto.variables {
        let other_var = other
            .variables
            .get(name)
            .ok_or_else(|| DatasetError::MissingVariable { name: name.clone() })?;
        if other_var.dims != var.dims {
            return Err(DatasetError::DimensionMismatch {
                name: format!("{name} dimensions"),
                expected: var.dims.len(),
                got: other_var.dims.len(),
            });
        }
    }
    if let Some(extra) = other
        .variables
        .keys()
        .find(|k| !proto.variables.contains_key(*k))
    {
        return Err(DatasetError::MissingVariable {
            name: extra.clone(),
        });
    }

    Ok(())
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self
            .dims
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        writeln!(f, "Dimensions:  ({})", dims.join(", "))?;

        writeln!(f, "Coordinates:")?;
        for (name, coord) in &self.coords {
            let labels = coord.values.labels();
            let shown = if labels.len() > 6 {
                format!("{} ... {}", labels[..3].join(" "), labels[labels.len() - 1])
            } else {
                labels.join(" ")
            };
            writeln!(f, "  * {name:<12} ({}) {shown}", coord.dim)?;
        }

        writeln!(f, "Data variables:")?;
        for (name, var) in &self.variables {
            writeln!(f, "    {name:<12} ({})", var.dims.join(", "))?;
        }

        if !self.attrs.is_empty() {
            writeln!(f, "Attributes:")?;
            for (name, value) in &self.attrs {
                writeln!(f, "    {name}: {value}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: Vec<f64>) -> Dataset {
        let n = values.len();
        Dataset::new()
            .with_coord(
                "time",
                Coordinate::new("time", CoordValues::Float((0..n).map(|t| t as f64).collect()))
                    .with_attr("units", "days since 2000-01-01"),
            )
            .unwrap()
            .with_variable(
                "TS",
                Variable::from_vec(&["time"], &[n], values)
                    .unwrap()
                    .with_attr("units", "K"),
            )
            .unwrap()
            .with_attr("source", "test")
    }

    #[test]
    fn add_variable_registers_dims_in_order() {
        let ds = Dataset::new()
            .with_variable(
                "v",
                Variable::from_vec(&["y", "x"], &[2, 3], vec![0.0; 6]).unwrap(),
            )
            .unwrap();
        let dims: Vec<(&str, usize)> = ds.dims().iter().map(|(k, &v)| (k.as_str(), v)).collect();
        assert_eq!(dims, vec![("y", 2), ("x", 3)]);
    }

    #[test]
    fn add_variable_rejects_conflicting_dim_length() {
        let ds = series(vec![1.0, 2.0, 3.0]);
        let bad = Variable::from_vec(&["time"], &[2], vec![1.0, 2.0]).unwrap();
        let err = ds.with_variable("other", bad).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::DimensionMismatch {
                expected: 3,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn variable_rank_must_match_dims() {
        let data = ArrayD::<f64>::zeros(IxDyn(&[2, 2]));
        let err = Variable::new(vec!["x".into()], data).unwrap_err();
        assert!(matches!(err, DatasetError::DimensionMismatch { .. }));
    }

    #[test]
    fn concat_adds_leading_dimension() {
        let a = series(vec![1.0, 2.0]);
        let b = series(vec![3.0, 4.0]);
        let new_dim =
            NewDim::new("emis", vec!["low".into(), "high".into()]).with_long_name("Emissions");

        let out = Dataset::concat(vec![a, b], &new_dim).unwrap();

        assert_eq!(out.dims().keys().collect::<Vec<_>>(), vec!["emis", "time"]);
        assert_eq!(out.dim_len("emis"), Some(2));

        let coord = out.coord("emis").unwrap();
        assert_eq!(
            coord.values(),
            &CoordValues::Text(vec!["low".into(), "high".into()])
        );
        assert_eq!(
            coord.attrs().get("long_name"),
            Some(&AttrValue::Text("Emissions".into()))
        );

        let ts = out.variable("TS").unwrap();
        assert_eq!(ts.dims(), &["emis".to_string(), "time".to_string()]);
        assert_eq!(ts.shape(), &[2, 2]);
        assert_eq!(ts.data()[[1, 0]], 3.0);
        assert_eq!(ts.attrs().get("units"), Some(&AttrValue::Text("K".into())));
        assert_eq!(out.attrs().get("source"), Some(&AttrValue::Text("test".into())));
    }

    #[test]
    fn concat_rejects_label_count_mismatch() {
        let new_dim = NewDim::new("emis", vec!["low".into()]);
        let err = Dataset::concat(vec![series(vec![1.0]), series(vec![2.0])], &new_dim)
            .unwrap_err();
        assert!(matches!(err, DatasetError::DimensionMismatch { .. }));
    }

    #[test]
    fn concat_rejects_existing_dimension() {
        let new_dim = NewDim::new("time", vec!["a".into()]);
        let err = Dataset::concat(vec![series(vec![1.0])], &new_dim).unwrap_err();
        assert!(matches!(err, DatasetError::DimensionExists { .. }));
    }

    #[test]
    fn concat_rejects_empty_input() {
        let new_dim = NewDim::new("emis", vec![]);
        let err = Dataset::concat(vec![], &new_dim).unwrap_err();
        assert!(matches!(err, DatasetError::EmptyConcat));
    }

    #[test]
    fn concat_rejects_shape_mismatch() {
        let new_dim = NewDim::new("emis", vec!["a".into(), "b".into()]);
        let err = Dataset::concat(vec![series(vec![1.0, 2.0]), series(vec![1.0])], &new_dim)
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::DimensionMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn concat_rejects_missing_variable() {
        let a = series(vec![1.0]);
        let b = series(vec![2.0])
            .with_variable("PS", Variable::from_vec(&["time"], &[1], vec![0.0]).unwrap())
            .unwrap();
        let new_dim = NewDim::new("emis", vec!["a".into(), "b".into()]);
        let err = Dataset::concat(vec![a, b], &new_dim).unwrap_err();
        assert!(matches!(err, DatasetError::MissingVariable { name } if name == "PS"));
    }

    #[test]
    fn select_inverts_concat() {
        let a = series(vec![1.0, 2.0]);
        let b = series(vec![3.0, 4.0]);
        let new_dim = NewDim::new("emis", vec!["low".into(), "high".into()]);
        let master = Dataset::concat(vec![a, b.clone()], &new_dim).unwrap();

        let back = master.select("emis", "high").unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn select_unknown_label() {
        let master = Dataset::concat(
            vec![series(vec![1.0])],
            &NewDim::new("emis", vec!["low".into()]),
        )
        .unwrap();
        let err = master.select("emis", "mid").unwrap_err();
        assert!(matches!(err, DatasetError::LabelNotFound { .. }));
    }

    #[test]
    fn select_numeric_coordinate() {
        let ds = series(vec![5.0, 6.0, 7.0]);
        let at = ds.select("time", "2").unwrap();
        let ts = at.variable("TS").unwrap();
        assert!(ts.dims().is_empty());
        assert_eq!(ts.data().iter().copied().collect::<Vec<_>>(), vec![7.0]);
        assert!(at.coord("time").is_none());
    }

    #[test]
    fn isel_out_of_bounds() {
        let ds = series(vec![1.0]);
        assert!(matches!(ds.isel("time", 4), Err(DatasetError::Shape { .. })));
        assert!(matches!(
            ds.isel("lat", 0),
            Err(DatasetError::MissingDimension { .. })
        ));
    }

    #[test]
    fn retain_variables_prunes_unused_dims() {
        let ds = series(vec![1.0, 2.0])
            .with_coord("lev", Coordinate::new("lev", CoordValues::Float(vec![1000.0, 850.0, 500.0])))
            .unwrap()
            .with_variable(
                "T",
                Variable::from_vec(&["lev"], &[3], vec![280.0, 270.0, 250.0]).unwrap(),
            )
            .unwrap();

        let kept = ds.retain_variables(&["TS"]).unwrap();
        assert!(kept.variable("T").is_none());
        assert!(kept.coord("lev").is_none());
        assert_eq!(kept.dim_len("lev"), None);
        assert_eq!(kept.dim_len("time"), Some(2));
    }

    #[test]
    fn retain_variables_unknown_name() {
        let err = series(vec![1.0]).retain_variables(&["nope"]).unwrap_err();
        assert!(matches!(err, DatasetError::MissingVariable { .. }));
    }

    #[test]
    fn display_lists_structure() {
        let text = series(vec![1.0, 2.0]).to_string();
        assert!(text.contains("Dimensions:  (time: 2)"));
        assert!(text.contains("TS"));
        assert!(text.contains("source: test"));
    }
}
