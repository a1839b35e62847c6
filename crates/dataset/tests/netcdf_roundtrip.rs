//! Integration tests: reading and writing NetCDF through `NetcdfEngine`.

#![cfg(feature = "netcdf")]

use std::path::{Path, PathBuf};

use approx::assert_relative_eq;
use casegrid_dataset::{
    AttrValue, CoordValues, Coordinate, Dataset, DatasetEngine, DatasetError, NetcdfEngine,
    NewDim, Variable,
};
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Write a small `time x lat` file with a `_FillValue` on `TS` and an extra
/// `PS` variable, using the netcdf crate directly.
fn write_raw_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("raw.nc");
    let mut file = netcdf::create(&path).expect("failed to create NetCDF file");

    file.add_dimension("time", 3).expect("add dim time");
    file.add_dimension("lat", 2).expect("add dim lat");

    {
        let mut var = file
            .add_variable::<f64>("time", &["time"])
            .expect("add var time");
        var.put_values(&[0.0, 1.0, 2.0], ..).expect("put time");
        var.put_attribute("units", "days since 2000-01-01")
            .expect("add time units");
    }
    {
        let mut var = file
            .add_variable::<f64>("lat", &["lat"])
            .expect("add var lat");
        var.put_values(&[-10.0, 10.0], ..).expect("put lat");
    }
    {
        let mut var = file
            .add_variable::<f64>("TS", &["time", "lat"])
            .expect("add var TS");
        var.put_attribute("_FillValue", -9999.0)
            .expect("add TS fill");
        var.put_attribute("units", "K").expect("add TS units");
        var.put_values(&[280.0, 281.0, -9999.0, 283.0, 284.0, 285.0], ..)
            .expect("put TS");
    }
    {
        let mut var = file
            .add_variable::<f64>("PS", &["time"])
            .expect("add var PS");
        var.put_values(&[1000.0, 1001.0, 1002.0], ..)
            .expect("put PS");
    }
    file.add_attribute("title", "fixture").expect("add title");

    path
}

fn member(offset: f64) -> Dataset {
    Dataset::new()
        .with_coord(
            "time",
            Coordinate::new("time", CoordValues::Float(vec![0.0, 1.0]))
                .with_attr("units", "days since 2000-01-01"),
        )
        .unwrap()
        .with_variable(
            "TS",
            Variable::from_vec(&["time"], &[2], vec![offset, offset + 1.0])
                .unwrap()
                .with_attr("units", "K"),
        )
        .unwrap()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn read_decodes_fill_values_and_coords() {
    let dir = tempdir().unwrap();
    let path = write_raw_fixture(dir.path());

    let ds = NetcdfEngine::default().open(&path).unwrap();

    assert_eq!(ds.dim_len("time"), Some(3));
    assert_eq!(ds.dim_len("lat"), Some(2));
    assert!(ds.coord("time").is_some());
    assert!(ds.coord("lat").is_some());
    assert_eq!(
        ds.coord("time").unwrap().attrs().get("units"),
        Some(&AttrValue::Text("days since 2000-01-01".into()))
    );

    let ts = ds.variable("TS").unwrap();
    assert_eq!(ts.shape(), &[3, 2]);
    assert!(ts.data()[[1, 0]].is_nan());
    assert_relative_eq!(ts.data()[[2, 1]], 285.0);
    assert!(!ts.attrs().contains_key("_FillValue"));
    assert_eq!(
        ds.attrs().get("title"),
        Some(&AttrValue::Text("fixture".into()))
    );
}

#[test]
fn read_without_decoding_keeps_raw_values() {
    let dir = tempdir().unwrap();
    let path = write_raw_fixture(dir.path());

    let ds = NetcdfEngine::default()
        .with_decode_cf(false)
        .open(&path)
        .unwrap();

    let ts = ds.variable("TS").unwrap();
    assert_relative_eq!(ts.data()[[1, 0]], -9999.0);
    assert!(ts.attrs().contains_key("_FillValue"));
}

#[test]
fn read_variable_subset_drops_unused_dims() {
    let dir = tempdir().unwrap();
    let path = write_raw_fixture(dir.path());

    let ds = NetcdfEngine::default()
        .with_variables(["PS"])
        .open(&path)
        .unwrap();

    assert!(ds.variable("TS").is_none());
    assert!(ds.variable("PS").is_some());
    assert_eq!(ds.dim_len("lat"), None);
    assert!(ds.coord("lat").is_none());
}

#[test]
fn read_skips_string_data_variables() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history.nc");
    {
        let mut file = netcdf::create(&path).expect("failed to create NetCDF file");
        file.add_dimension("time", 2).expect("add dim time");
        {
            let mut var = file
                .add_variable::<f64>("time", &["time"])
                .expect("add var time");
            var.put_values(&[0.0, 1.0], ..).expect("put time");
        }
        {
            let mut var = file
                .add_string_variable("time_written", &["time"])
                .expect("add var time_written");
            var.put_string("00:00:00", [0]).expect("put time_written");
            var.put_string("06:00:00", [1]).expect("put time_written");
        }
        {
            let mut var = file
                .add_variable::<f64>("TS", &["time"])
                .expect("add var TS");
            var.put_values(&[290.0, 291.0], ..).expect("put TS");
        }
    }

    let ds = NetcdfEngine::default().open(&path).unwrap();
    assert!(ds.variable("time_written").is_none());
    assert_relative_eq!(ds.variable("TS").unwrap().data()[[1]], 291.0);

    let subset = NetcdfEngine::default()
        .with_variables(["TS"])
        .open(&path)
        .unwrap();
    let names: Vec<&str> = subset.variables().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["TS"]);
}

#[test]
fn read_subset_unknown_variable() {
    let dir = tempdir().unwrap();
    let path = write_raw_fixture(dir.path());

    let err = NetcdfEngine::default()
        .with_variables(["PRECT"])
        .open(&path)
        .unwrap_err();
    assert!(matches!(err, DatasetError::MissingVariable { name } if name == "PRECT"));
}

#[test]
fn open_missing_file() {
    let dir = tempdir().unwrap();
    let err = NetcdfEngine::default()
        .open(&dir.path().join("absent.nc"))
        .unwrap_err();
    assert!(matches!(err, DatasetError::FileNotFound { .. }));
}

#[test]
fn open_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("garbage.nc");
    std::fs::write(&path, b"not a netcdf file").unwrap();

    let err = NetcdfEngine::default().open(&path).unwrap_err();
    assert!(matches!(err, DatasetError::Netcdf { .. }));
}

#[test]
fn master_survives_write_and_read() {
    let dir = tempdir().unwrap();
    let engine = NetcdfEngine::default();

    let new_dim =
        NewDim::new("emis", vec!["low".into(), "high".into()]).with_long_name("Emissions");
    let master = engine
        .concat(vec![member(1.0), member(10.0)], &new_dim)
        .unwrap();

    let path = dir.path().join("master.nc");
    engine.write(&master, &path).unwrap();
    let back = engine.open(&path).unwrap();

    assert_eq!(
        back.coord("emis").unwrap().values(),
        &CoordValues::Text(vec!["low".into(), "high".into()])
    );
    assert_eq!(
        back.coord("emis").unwrap().attrs().get("long_name"),
        Some(&AttrValue::Text("Emissions".into()))
    );

    let ts = back.variable("TS").unwrap();
    assert_eq!(ts.dims(), &["emis".to_string(), "time".to_string()]);
    assert_relative_eq!(ts.data()[[1, 1]], 11.0);

    let high = engine.select(&back, "emis", "high").unwrap();
    assert_relative_eq!(high.variable("TS").unwrap().data()[[0]], 10.0);
}

#[test]
fn auxiliary_coordinates_round_trip() {
    let dir = tempdir().unwrap();
    let engine = NetcdfEngine::default();

    let ds = member(0.0)
        .with_coord(
            "numbers",
            Coordinate::new("time", CoordValues::Float(vec![7.0, 8.0])),
        )
        .unwrap();
    let path = dir.path().join("aux.nc");
    engine.write(&ds, &path).unwrap();

    let back = engine.open(&path).unwrap();
    let numbers = back.coord("numbers").expect("numbers restored as coordinate");
    assert_eq!(numbers.dim(), "time");
    assert!(back.variable("numbers").is_none());
    assert!(!back.variable("TS").unwrap().attrs().contains_key("coordinates"));
}
