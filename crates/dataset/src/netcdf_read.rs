//! Low-level NetCDF extraction helpers.

use std::collections::HashSet;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use netcdf::AttributeValue;
use tracing::debug;

use crate::dataset::{AttrValue, Attrs, CoordValues, Coordinate, Dataset, Variable};
use crate::error::DatasetError;

/// Attributes consumed by CF decoding.
const FILL_ATTRS: &[&str] = &["_FillValue", "missing_value"];

/// Open a NetCDF file at `path`, returning [`DatasetError::FileNotFound`] if
/// the path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Read the variables of `file` into a [`Dataset`].
///
/// 1-D variables named after their dimension, or listed in any variable's
/// CF `coordinates` attribute, become coordinates; everything else is read
/// as an `f64` data variable. Data variables not in `wanted` (when given)
/// are not read, and non-numeric data variables such as character
/// timestamps are skipped. With `decode_cf`, fill values become NaN and
/// `scale_factor`/`add_offset` are applied.
pub(crate) fn read_dataset(
    file: &netcdf::File,
    decode_cf: bool,
    wanted: Option<&[String]>,
) -> Result<Dataset, DatasetError> {
    let mut named_coords: HashSet<String> = HashSet::new();
    for var in file.variables() {
        if let Some(Ok(AttributeValue::Str(list))) = var.attribute_value("coordinates") {
            named_coords.extend(list.split_whitespace().map(str::to_string));
        }
    }

    let mut ds = Dataset::new();

    for var in file.variables() {
        let name = var.name();
        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let mut attrs = read_attrs(var.attributes());

        let is_coord = dims.len() == 1 && (dims[0] == name || named_coords.contains(&name));
        if is_coord {
            let values = read_coord_values(&var, shape[0])?;
            attrs.shift_remove("coordinates");
            let mut coord = Coordinate::new(dims[0].clone(), values);
            for (k, v) in attrs {
                coord = coord.with_attr(k, v);
            }
            ds.add_coord(name, coord)?;
            continue;
        }

        if wanted.is_some_and(|names| !names.contains(&name)) {
            continue;
        }
        let mut values = match var.get_values::<f64, _>(..) {
            Ok(values) => values,
            Err(e) => {
                debug!(variable = %name, error = %e, "skipping non-numeric variable");
                continue;
            }
        };
        attrs.shift_remove("coordinates");
        if decode_cf {
            decode(&mut values, &mut attrs);
        }
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values)?;
        let mut variable = Variable::new(dims, data)?;
        for (k, v) in attrs {
            variable = variable.with_attr(k, v);
        }
        debug!(variable = %name, shape = ?shape, "read variable");
        ds.add_variable(name, variable)?;
    }

    for (k, v) in read_attrs(file.attributes()) {
        ds.set_attr(k, v);
    }

    Ok(ds)
}

/// Read a 1-D coordinate, falling back to string values when the variable
/// is not numeric.
fn read_coord_values(var: &netcdf::Variable<'_>, len: usize) -> Result<CoordValues, DatasetError> {
    match var.get_values::<f64, _>(..) {
        Ok(values) => Ok(CoordValues::Float(values)),
        Err(numeric_err) => {
            let labels = (0..len)
                .map(|i| var.get_string([i]))
                .collect::<Result<Vec<String>, _>>()
                .map_err(|_| DatasetError::from(numeric_err))?;
            Ok(CoordValues::Text(labels))
        }
    }
}

fn read_attrs<'a>(attributes: impl Iterator<Item = netcdf::Attribute<'a>>) -> Attrs {
    let mut attrs = Attrs::new();
    for attr in attributes {
        match attr.value() {
            Ok(value) => {
                if let Some(converted) = convert_attr(value) {
                    attrs.insert(attr.name().to_string(), converted);
                }
            }
            Err(e) => debug!(attribute = attr.name(), error = %e, "skipping unreadable attribute"),
        }
    }
    attrs
}

/// Convert a scalar NetCDF attribute. Array-valued attributes are skipped.
fn convert_attr(value: AttributeValue) -> Option<AttrValue> {
    Some(match value {
        AttributeValue::Str(s) => AttrValue::Text(s),
        AttributeValue::Double(v) => AttrValue::Float(v),
        AttributeValue::Float(v) => AttrValue::Float(f64::from(v)),
        AttributeValue::Longlong(v) => AttrValue::Int(v),
        AttributeValue::Int(v) => AttrValue::Int(i64::from(v)),
        AttributeValue::Uint(v) => AttrValue::Int(i64::from(v)),
        AttributeValue::Short(v) => AttrValue::Int(i64::from(v)),
        AttributeValue::Ushort(v) => AttrValue::Int(i64::from(v)),
        AttributeValue::Schar(v) => AttrValue::Int(i64::from(v)),
        AttributeValue::Uchar(v) => AttrValue::Int(i64::from(v)),
        _ => return None,
    })
}

/// Apply CF packing conventions in place, consuming the attributes that
/// describe them.
pub(crate) fn decode(values: &mut [f64], attrs: &mut Attrs) {
    let fills: Vec<f64> = FILL_ATTRS
        .iter()
        .filter_map(|k| attrs.shift_remove(*k))
        .filter_map(|v| v.as_f64())
        .collect();
    let scale = attrs.shift_remove("scale_factor").and_then(|v| v.as_f64());
    let offset = attrs.shift_remove("add_offset").and_then(|v| v.as_f64());

    for v in values.iter_mut() {
        if fills.contains(v) {
            *v = f64::NAN;
            continue;
        }
        if let Some(s) = scale {
            *v *= s;
        }
        if let Some(o) = offset {
            *v += o;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn decode_masks_fill_values() {
        let mut values = vec![1.0, -9999.0, 3.0];
        let mut attrs = Attrs::new();
        attrs.insert("_FillValue".into(), AttrValue::Float(-9999.0));
        attrs.insert("units".into(), AttrValue::Text("K".into()));

        decode(&mut values, &mut attrs);

        assert_eq!(values[0], 1.0);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 3.0);
        assert!(!attrs.contains_key("_FillValue"));
        assert!(attrs.contains_key("units"));
    }

    #[test]
    fn decode_missing_value_and_packing() {
        let mut values = vec![10.0, 32767.0, 20.0];
        let mut attrs = Attrs::new();
        attrs.insert("missing_value".into(), AttrValue::Int(32767));
        attrs.insert("scale_factor".into(), AttrValue::Float(0.5));
        attrs.insert("add_offset".into(), AttrValue::Float(100.0));

        decode(&mut values, &mut attrs);

        assert_relative_eq!(values[0], 105.0, epsilon = 1e-12);
        assert!(values[1].is_nan());
        assert_relative_eq!(values[2], 110.0, epsilon = 1e-12);
        assert!(attrs.is_empty());
    }

    #[test]
    fn decode_without_attrs_is_identity() {
        let mut values = vec![1.0, 2.0];
        let mut attrs = Attrs::new();
        decode(&mut values, &mut attrs);
        assert_eq!(values, vec![1.0, 2.0]);
    }

    #[test]
    fn convert_attr_skips_arrays() {
        assert_eq!(
            convert_attr(AttributeValue::Str("K".into())),
            Some(AttrValue::Text("K".into()))
        );
        assert_eq!(
            convert_attr(AttributeValue::Short(3)),
            Some(AttrValue::Int(3))
        );
        assert_eq!(convert_attr(AttributeValue::Doubles(vec![1.0, 2.0])), None);
    }

    #[test]
    fn open_file_missing() {
        let err = open_file(Path::new("/tmp/casegrid_missing_file.nc")).unwrap_err();
        assert!(matches!(err, DatasetError::FileNotFound { .. }));
    }
}
