//! Low-level NetCDF persistence helpers.

use std::path::Path;

use netcdf::AttributeValue;

use crate::dataset::{AttrValue, Attrs, CoordValues, Dataset};
use crate::error::DatasetError;

fn to_netcdf_attr(value: &AttrValue) -> AttributeValue {
    match value {
        AttrValue::Text(s) => AttributeValue::Str(s.clone()),
        AttrValue::Float(v) => AttributeValue::Double(*v),
        AttrValue::Int(v) => AttributeValue::Longlong(*v),
    }
}

fn put_attrs(var: &mut netcdf::VariableMut<'_>, attrs: &Attrs) -> Result<(), DatasetError> {
    for (name, value) in attrs {
        var.put_attribute(name, to_netcdf_attr(value))?;
    }
    Ok(())
}

/// Write `ds` to a new NetCDF file at `path`, replacing any existing file.
///
/// Text coordinates are stored as NetCDF string variables. Coordinates that
/// are not named after their dimension are listed in the CF `coordinates`
/// attribute of every data variable sharing their dimension, so that
/// reading the file back restores them as coordinates.
pub(crate) fn write_dataset(ds: &Dataset, path: &Path) -> Result<(), DatasetError> {
    let mut file = netcdf::create(path)?;

    for (name, &len) in ds.dims() {
        file.add_dimension(name, len)?;
    }

    for (name, coord) in ds.coords() {
        match coord.values() {
            CoordValues::Float(values) => {
                let mut var = file.add_variable::<f64>(name, &[coord.dim()])?;
                var.put_values(values, ..)?;
                put_attrs(&mut var, coord.attrs())?;
            }
            CoordValues::Text(labels) => {
                let mut var = file.add_string_variable(name, &[coord.dim()])?;
                for (i, label) in labels.iter().enumerate() {
                    var.put_string(label, [i])?;
                }
                put_attrs(&mut var, coord.attrs())?;
            }
        }
    }

    for (name, variable) in ds.variables() {
        let dims: Vec<&str> = variable.dims().iter().map(String::as_str).collect();
        let flat: Vec<f64> = variable.data().iter().copied().collect();

        let mut var = file.add_variable::<f64>(name, &dims)?;
        var.put_values(&flat, ..)?;
        put_attrs(&mut var, variable.attrs())?;

        let aux: Vec<&str> = ds
            .coords()
            .iter()
            .filter(|(cname, c)| cname.as_str() != c.dim() && dims.contains(&c.dim()))
            .map(|(cname, _)| cname.as_str())
            .collect();
        if !aux.is_empty() {
            var.put_attribute("coordinates", aux.join(" "))?;
        }
    }

    for (name, value) in ds.attrs() {
        file.add_attribute(name, to_netcdf_attr(value))?;
    }

    Ok(())
}
