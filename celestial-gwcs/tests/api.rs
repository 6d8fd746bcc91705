use celestial_gwcs::transform::{
    Identity, Linear1D, LookupTable, Scale, Shift, Sip, Transform, TransformExt,
};
use celestial_gwcs::{
    BoundingBox, CallOutput, Coordinate, Frame, GwcsError, HighLevelObjects, HighLevelWcs,
    LowLevelWcs, Wcs,
};
use celestial_quantity::{
    Quantity, SkyCoord, SkyFrame, SpectralCoord, StokesCoord, Time, TimeScale, Unit,
};

const TOL: f64 = 1e-9;

fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < tol, "{:?} vs {:?}", actual, expected);
    }
}

fn detector(n: usize) -> Frame {
    Frame::detector("detector", n).build().unwrap()
}

fn icrs() -> Frame {
    Frame::celestial(SkyFrame::Icrs).name("icrs").build().unwrap()
}

fn reference_time() -> Time {
    Time::from_iso("2000-01-01T00:00:00", TimeScale::Utc).unwrap()
}

fn shift_scale_wcs() -> Wcs {
    let shift = Shift::new(1.0).and(Shift::new(2.0));
    let scale = Scale::new(5.0).and(Scale::new(10.0));
    Wcs::new(shift.then(scale).unwrap().shared(), detector(2), icrs()).unwrap()
}

fn shift_scale_quantity_wcs() -> Wcs {
    let shift = Shift::with_unit(1.0, Unit::PIX).and(Shift::with_unit(2.0, Unit::PIX));
    let scale = Scale::with_units(5.0, Unit::PIX, Unit::DEG)
        .and(Scale::with_units(10.0, Unit::PIX, Unit::DEG));
    Wcs::new(shift.then(scale).unwrap().shared(), detector(2), icrs()).unwrap()
}

fn spectral_cube_wcs() -> Wcs {
    let sky = Frame::celestial(SkyFrame::Icrs).build().unwrap();
    let spec = Frame::spectral(Unit::NM).axes_order([2]).build().unwrap();
    let world = Frame::composite("world", vec![sky, spec]).unwrap();
    Wcs::new(Identity::new(3).shared(), detector(3), world).unwrap()
}

fn four_d_wcs() -> Wcs {
    let sky = Frame::celestial(SkyFrame::Icrs).build().unwrap();
    let spec = Frame::spectral(Unit::NM).axes_order([2]).build().unwrap();
    let time = Frame::temporal(Some(reference_time()))
        .axes_order([3])
        .build()
        .unwrap();
    let world = Frame::composite("world", vec![sky, spec, time]).unwrap();
    Wcs::new(Identity::new(4).shared(), detector(4), world).unwrap()
}

fn stokes_wcs() -> Wcs {
    let table = LookupTable::new(vec![1.0, 2.0, 3.0, 4.0]);
    Wcs::new(
        table.shared(),
        detector(1),
        Frame::stokes().build().unwrap(),
    )
    .unwrap()
}

fn sip_wcs() -> Wcs {
    let sip = Sip::new([5.0, 5.0], 2, 2)
        .with_a(2, 0, 2e-3)
        .with_a(1, 1, 1e-3)
        .with_b(0, 2, -1e-3);
    let model = sip
        .then(Scale::new(0.1).and(Scale::new(0.1)))
        .unwrap()
        .shared();
    let mut wcs = Wcs::new(model, detector(2), Frame::frame_2d().name("focal").build().unwrap())
        .unwrap();
    wcs.set_bounding_box(Some(BoundingBox::new([(-0.5, 9.5), (-0.5, 9.5)]).unwrap()))
        .unwrap();
    wcs
}

fn sky_degrees(c: &Coordinate) -> (f64, f64) {
    let sky = c.as_sky().unwrap();
    (sky.lon().degrees(), sky.lat().degrees())
}

// --- Low-level values ---

#[test]
fn shift_scale_values_round_trip() {
    let wcs = shift_scale_wcs();
    assert_close(&wcs.pixel_to_world_values(&[1.0, 2.0]).unwrap(), &[10.0, 40.0], TOL);
    assert_close(&wcs.world_to_pixel_values(&[10.0, 40.0]).unwrap(), &[1.0, 2.0], TOL);
}

#[test]
fn array_index_is_reversed_pixel() {
    let wcs = shift_scale_wcs();
    assert_close(
        &wcs.array_index_to_world_values(&[2.0, 1.0]).unwrap(),
        &[10.0, 40.0],
        TOL,
    );
    assert_close(
        &wcs.world_to_array_index_values(&[10.0, 40.0]).unwrap(),
        &[2.0, 1.0],
        TOL,
    );
}

#[test]
fn batch_values() {
    let wcs = shift_scale_wcs();
    let world = wcs
        .pixel_to_world_values_many(&[vec![0.0, 0.0], vec![1.0, 2.0]])
        .unwrap();
    assert_eq!(world, vec![vec![5.0, 20.0], vec![10.0, 40.0]]);
    let pixel = wcs.world_to_pixel_values_many(&world).unwrap();
    assert_close(&pixel[1], &[1.0, 2.0], TOL);
}

#[test]
fn wrong_number_of_pixel_values() {
    let err = shift_scale_wcs().pixel_to_world_values(&[1.0]).unwrap_err();
    assert!(matches!(err, GwcsError::DimensionMismatch { expected: 2, got: 1, .. }));
}

#[test]
fn quantity_models_rescale_at_the_boundary() {
    let wcs = shift_scale_quantity_wcs();
    assert_close(&wcs.pixel_to_world_values(&[1.0, 2.0]).unwrap(), &[10.0, 40.0], TOL);
    assert_close(&wcs.world_to_pixel_values(&[10.0, 40.0]).unwrap(), &[1.0, 2.0], TOL);
}

// --- Axis metadata ---

#[test]
fn celestial_axis_metadata() {
    let wcs = shift_scale_wcs();
    assert_eq!(LowLevelWcs::pixel_n_dim(&wcs), 2);
    assert_eq!(LowLevelWcs::world_n_dim(&wcs), 2);
    assert_eq!(wcs.world_axis_physical_types(), vec!["pos.eq.ra", "pos.eq.dec"]);
    assert_eq!(wcs.world_axis_units(), vec![Unit::DEG, Unit::DEG]);
    assert_eq!(wcs.world_axis_names(), vec!["ra", "dec"]);
    assert_eq!(wcs.pixel_axis_names(), vec!["x", "y"]);
    assert!(!wcs.serialized_classes());
}

#[test]
fn four_d_axis_metadata() {
    let wcs = four_d_wcs();
    assert_eq!(
        wcs.world_axis_units(),
        vec![Unit::DEG, Unit::DEG, Unit::NM, Unit::S]
    );
    assert_eq!(
        wcs.world_axis_physical_types(),
        vec!["pos.eq.ra", "pos.eq.dec", "em.wl", "time"]
    );
    let keys: Vec<&str> = wcs.world_axis_object_classes().keys().collect();
    assert_eq!(keys, vec!["celestial", "spectral", "temporal"]);
    let components: Vec<(&str, usize)> = wcs
        .world_axis_object_components()
        .iter()
        .map(|c| (c.key.as_str(), c.index))
        .collect();
    assert_eq!(
        components,
        vec![("celestial", 0), ("celestial", 1), ("spectral", 0), ("temporal", 0)]
    );
}

#[test]
fn time_class_uses_offset_format() {
    let wcs = four_d_wcs();
    let class = wcs.world_axis_object_classes().get("temporal").unwrap();
    assert_eq!(class.type_name(), "Time");
    assert_eq!(class.time_format(), Some("isot"));
}

#[test]
fn correlation_matrix() {
    assert_eq!(
        shift_scale_wcs().axis_correlation_matrix(),
        vec![vec![true, false], vec![false, true]]
    );
    assert_eq!(
        sip_wcs().axis_correlation_matrix(),
        vec![vec![true, true], vec![true, true]]
    );
}

// --- Shapes and bounds ---

#[test]
fn array_shape_is_reversed_pixel_shape() {
    let mut wcs = shift_scale_wcs();
    assert!(LowLevelWcs::pixel_shape(&wcs).is_none());
    wcs.set_array_shape(Some(vec![2040, 1020])).unwrap();
    assert_eq!(LowLevelWcs::pixel_shape(&wcs), Some(vec![1020, 2040]));
    assert_eq!(LowLevelWcs::array_shape(&wcs), Some(vec![2040, 1020]));
    assert_eq!(
        LowLevelWcs::pixel_bounds(&wcs),
        Some(vec![(-0.5, 1019.5), (-0.5, 2039.5)])
    );
}

#[test]
fn explicit_bounding_box_wins_over_shape() {
    let mut wcs = shift_scale_wcs();
    wcs.set_pixel_shape(Some(vec![10, 10])).unwrap();
    wcs.set_bounding_box(Some(BoundingBox::new([(2.0, 3.0), (4.0, 5.0)]).unwrap()))
        .unwrap();
    assert_eq!(wcs.pixel_bounds(), Some(vec![(2.0, 3.0), (4.0, 5.0)]));
    assert_eq!(wcs.pixel_shape(), Some(vec![10, 10]));
}

#[test]
fn wrong_shape_dimensionality_is_rejected() {
    let mut wcs = shift_scale_wcs();
    assert!(wcs.set_pixel_shape(Some(vec![1, 2, 3])).unwrap_err().is_value_error());
    let bbox = BoundingBox::new([(0.0, 1.0)]).unwrap();
    assert!(wcs.set_bounding_box(Some(bbox)).unwrap_err().is_value_error());
}

#[test]
fn outside_bounding_box_is_nan() {
    let mut wcs = shift_scale_wcs();
    wcs.set_pixel_shape(Some(vec![5, 5])).unwrap();
    let world = wcs.pixel_to_world_values(&[7.0, 1.0]).unwrap();
    assert!(world.iter().all(|v| v.is_nan()));
    let inside = wcs.pixel_to_world_values(&[4.0, 1.0]).unwrap();
    assert_close(&inside, &[25.0, 30.0], TOL);
}

#[test]
fn footprint_corners() {
    let mut wcs = shift_scale_wcs();
    wcs.set_bounding_box(Some(BoundingBox::new([(0.0, 1.0), (0.0, 2.0)]).unwrap()))
        .unwrap();
    let fp = wcs.footprint(None, false).unwrap();
    assert_eq!(
        fp,
        vec![
            vec![5.0, 20.0],
            vec![5.0, 40.0],
            vec![10.0, 40.0],
            vec![10.0, 20.0]
        ]
    );

    let other = BoundingBox::new([(1.0, 2.0), (0.0, 0.0)]).unwrap();
    let fp = wcs.footprint(Some(&other), false).unwrap();
    assert_eq!(fp[0], vec![10.0, 20.0]);
    assert_eq!(fp[3], vec![15.0, 20.0]);
}

// --- High-level objects ---

#[test]
fn pixel_to_world_packs_sky_coordinates() {
    let wcs = shift_scale_wcs();
    let world = wcs
        .pixel_to_world(&[Coordinate::Value(1.0), Coordinate::Value(2.0)])
        .unwrap();
    let (lon, lat) = sky_degrees(world.single().unwrap());
    assert!((lon - 10.0).abs() < TOL);
    assert!((lat - 40.0).abs() < TOL);
    assert_eq!(world.single().and_then(Coordinate::as_sky).unwrap().frame(), &SkyFrame::Icrs);
}

#[test]
fn world_to_pixel_from_sky_coordinates() {
    let wcs = shift_scale_wcs();
    let sky = SkyCoord::from_degrees(10.0, 40.0, SkyFrame::Icrs).unwrap();
    assert_close(&wcs.world_to_pixel(&[sky.clone().into()]).unwrap(), &[1.0, 2.0], TOL);
    assert_close(&wcs.world_to_array_index(&[sky.into()]).unwrap(), &[2.0, 1.0], TOL);
}

#[test]
fn world_to_pixel_converts_sky_frames() {
    let wcs = shift_scale_wcs();
    let icrs = SkyCoord::from_degrees(10.0, 40.0, SkyFrame::Icrs).unwrap();
    let galactic = icrs.transform_to(&SkyFrame::Galactic).unwrap();
    assert_close(&wcs.world_to_pixel(&[galactic.into()]).unwrap(), &[1.0, 2.0], 1e-6);
}

#[test]
fn pixel_quantities_are_converted_to_frame_units() {
    let wcs = shift_scale_quantity_wcs();
    let world = wcs
        .pixel_to_world(&[
            Quantity::new(1.0, Unit::PIX).into(),
            Quantity::new(2.0, Unit::PIX).into(),
        ])
        .unwrap();
    let (lon, lat) = sky_degrees(world.single().unwrap());
    assert!((lon - 10.0).abs() < TOL);
    assert!((lat - 40.0).abs() < TOL);
}

#[test]
fn pixel_quantities_in_wrong_units_are_value_errors() {
    let wcs = shift_scale_quantity_wcs();
    let err = wcs
        .pixel_to_world(&[
            Quantity::new(1.0, Unit::JY).into(),
            Quantity::new(2.0, Unit::JY).into(),
        ])
        .unwrap_err();
    assert!(err.is_value_error());
}

#[test]
fn spectral_cube_round_trip() {
    let wcs = spectral_cube_wcs();
    let world = wcs.pixel_to_world(&[10.0.into(), 20.0.into(), 500.0.into()]).unwrap();
    let HighLevelObjects::Multiple(objects) = &world else {
        panic!("expected two objects, got {:?}", world);
    };
    assert_eq!(objects.len(), 2);
    let (lon, lat) = sky_degrees(&objects[0]);
    assert!((lon - 10.0).abs() < TOL);
    assert!((lat - 20.0).abs() < TOL);
    let spectral = objects[1].as_spectral().unwrap();
    assert!((spectral.to_value(&Unit::NM).unwrap() - 500.0).abs() < TOL);

    let pixel = wcs.world_to_pixel(objects).unwrap();
    assert_close(&pixel, &[10.0, 20.0, 500.0], TOL);
}

#[test]
fn spectral_coordinate_in_other_units() {
    let wcs = spectral_cube_wcs();
    let sky = SkyCoord::from_degrees(10.0, 20.0, SkyFrame::Icrs).unwrap();
    let spec = SpectralCoord::new(0.5, Unit::UM);
    let pixel = wcs.world_to_pixel(&[sky.into(), spec.into()]).unwrap();
    assert_close(&pixel, &[10.0, 20.0, 500.0], 1e-6);
}

#[test]
fn mismatched_types_name_both_lists() {
    let wcs = spectral_cube_wcs();
    let args = [
        Coordinate::Tuple(vec![
            Quantity::new(10.0, Unit::DEG).into(),
            Quantity::new(20.0, Unit::DEG).into(),
        ]),
        SpectralCoord::new(500.0, Unit::NM).into(),
    ];
    let err = wcs.world_to_pixel(&args).unwrap_err();
    assert!(err.is_type_error());
    assert_eq!(
        err.to_string(),
        "Invalid types were passed, got (tuple, SpectralCoord) expected (SkyCoord, SpectralCoord)"
    );
}

#[test]
fn missing_object_is_a_type_error() {
    let wcs = spectral_cube_wcs();
    let sky = SkyCoord::from_degrees(10.0, 20.0, SkyFrame::Icrs).unwrap();
    assert!(wcs.world_to_pixel(&[sky.into()]).unwrap_err().is_type_error());
}

#[test]
fn four_d_time_round_trip() {
    let wcs = four_d_wcs();
    let world = wcs
        .pixel_to_world(&[10.0.into(), 20.0.into(), 500.0.into(), 86400.0.into()])
        .unwrap()
        .into_vec();
    assert_eq!(world.len(), 3);
    let time = world[2].as_time().unwrap();
    let elapsed = time.seconds_since(&reference_time()).unwrap();
    assert!((elapsed - 86400.0).abs() < 1e-4);

    let pixel = wcs.world_to_pixel(&world).unwrap();
    assert_close(&pixel, &[10.0, 20.0, 500.0, 86400.0], 1e-4);
}

#[test]
fn stokes_lookup() {
    let wcs = stokes_wcs();
    let symbols: Vec<String> = [0.0, 1.0, 2.0, 3.0]
        .iter()
        .map(|&p| {
            let world = wcs.pixel_to_world(&[Coordinate::Value(p)]).unwrap();
            world.single().and_then(Coordinate::as_stokes).unwrap().symbol().to_string()
        })
        .collect();
    assert_eq!(symbols, vec!["I", "Q", "U", "V"]);
    assert_eq!(wcs.world_axis_physical_types(), vec!["phys.polarization.stokes"]);
}

#[test]
fn stokes_outside_table_is_undefined() {
    let wcs = stokes_wcs();
    for p in [-1.0, 4.0] {
        let world = wcs.pixel_to_world(&[Coordinate::Value(p)]).unwrap();
        let stokes = world.single().and_then(Coordinate::as_stokes).unwrap();
        assert!(stokes.value().is_nan());
        assert_eq!(stokes.symbol(), "?");
    }
}

#[test]
fn stokes_inverse() {
    let wcs = stokes_wcs();
    let pixel = wcs.world_to_pixel(&[StokesCoord::new(3.0).into()]).unwrap();
    assert_eq!(pixel, vec![2.0]);
}

#[test]
fn generic_spatial_axis() {
    let world = Frame::generic(1)
        .axes_type(["SPATIAL"])
        .unit([Unit::DEG])
        .build()
        .unwrap();
    let model = Linear1D::with_units(0.1, 0.0, Unit::PIX, Unit::DEG);
    let wcs = Wcs::new(model.shared(), detector(1), world).unwrap();

    let out = wcs.pixel_to_world(&[10.0.into()]).unwrap();
    let q = out.single().and_then(Coordinate::as_quantity).unwrap();
    assert!((q.to_value(&Unit::DEG).unwrap() - 1.0).abs() < TOL);

    let pixel = wcs
        .world_to_pixel(&[Quantity::new(3600.0, Unit::ARCSEC).into()])
        .unwrap();
    assert_close(&pixel, &[10.0], 1e-9);
    assert_eq!(wcs.world_axis_physical_types(), vec!["custom:SPATIAL"]);
}

// --- Direct evaluation ---

#[test]
fn call_without_units_returns_quantities() {
    let wcs = shift_scale_wcs();
    let out = wcs.call(&[1.0.into(), 2.0.into()], false).unwrap();
    assert_eq!(
        out.quantities().unwrap(),
        &[Quantity::new(10.0, Unit::DEG), Quantity::new(40.0, Unit::DEG)][..]
    );
}

#[test]
fn call_with_units_returns_objects() {
    let wcs = shift_scale_wcs();
    let out = wcs.call(&[1.0.into(), 2.0.into()], true).unwrap();
    let CallOutput::Objects(objects) = out else {
        panic!("expected objects");
    };
    let (lon, lat) = sky_degrees(objects.single().unwrap());
    assert!((lon - 10.0).abs() < TOL);
    assert!((lat - 40.0).abs() < TOL);
}

#[test]
fn invert_accepts_numbers_and_objects() {
    let wcs = shift_scale_wcs();
    let out = wcs.invert(&[10.0.into(), 40.0.into()], false).unwrap();
    let pixel: Vec<f64> = out.quantities().unwrap().iter().map(Quantity::value).collect();
    assert_close(&pixel, &[1.0, 2.0], TOL);
    assert_eq!(out.quantities().unwrap()[0].unit(), &Unit::PIX);

    let sky = SkyCoord::from_degrees(10.0, 40.0, SkyFrame::Icrs).unwrap();
    let out = wcs.invert(&[sky.into()], true).unwrap();
    let objects = out.objects().unwrap().as_slice();
    assert_eq!(objects.len(), 2);
    let x = objects[0].as_quantity().unwrap();
    assert!((x.value() - 1.0).abs() < TOL);
}

#[test]
fn invert_rejects_wrong_objects() {
    let wcs = shift_scale_wcs();
    let err = wcs
        .invert(&[SpectralCoord::new(1.0, Unit::NM).into()], false)
        .unwrap_err();
    assert!(err.is_type_error());
}

// --- Numerical inverse ---

#[test]
fn numeric_inverse_inside_bounding_box() {
    let wcs = sip_wcs();
    assert!(wcs.backward_transform().is_none());
    for pixel in [[1.0, 1.0], [4.5, 7.0], [9.0, 0.0]] {
        let world = wcs.pixel_to_world_values(&pixel).unwrap();
        let back = wcs.world_to_pixel_values(&world).unwrap();
        assert_close(&back, &pixel, 1e-6);
    }
}

#[test]
fn numeric_inverse_outside_bounding_box_is_nan() {
    let wcs = sip_wcs();
    let world = wcs.forward_transform().evaluate(&[20.0, 3.0]);
    let pixel = wcs.world_to_pixel_values(&world).unwrap();
    assert!(pixel.iter().all(|v| v.is_nan()));
}

/// Wavelength in metres along a detector row; no analytic inverse.
#[derive(Debug)]
struct Dispersion;

impl Transform for Dispersion {
    fn n_inputs(&self) -> usize {
        1
    }

    fn n_outputs(&self) -> usize {
        1
    }

    fn evaluate(&self, inputs: &[f64]) -> Vec<f64> {
        let x = inputs[0];
        vec![5e-7 + 1e-10 * x + 1e-15 * x * x]
    }

    fn name(&self) -> &str {
        "dispersion"
    }
}

#[test]
fn numeric_inverse_in_metres() {
    let spectral = Frame::spectral(Unit::M).build().unwrap();
    let mut wcs = Wcs::new(Dispersion.shared(), detector(1), spectral).unwrap();
    wcs.set_pixel_shape(Some(vec![1000])).unwrap();
    assert!(wcs.backward_transform().is_none());
    for pixel in [10.0, 550.0, 990.0] {
        let world = wcs.pixel_to_world_values(&[pixel]).unwrap();
        let back = wcs.world_to_pixel_values(&world).unwrap();
        assert_close(&back, &[pixel], 1e-5);
    }
}

#[test]
fn numeric_inverse_nan_input() {
    let wcs = sip_wcs();
    let pixel = wcs.world_to_pixel_values(&[f64::NAN, 0.1]).unwrap();
    assert!(pixel.iter().all(|v| v.is_nan()));
}

// --- Multi-stage pipelines ---

fn three_stage_wcs() -> Wcs {
    Wcs::from_steps(vec![
        (detector(2), Some(Shift::new(1.0).and(Shift::new(2.0)).shared())),
        (
            Frame::frame_2d().name("focal").build().unwrap(),
            Some(Scale::new(5.0).and(Scale::new(10.0)).shared()),
        ),
        (icrs(), None),
    ])
    .unwrap()
}

#[test]
fn available_frames_in_order() {
    assert_eq!(
        three_stage_wcs().available_frames(),
        vec!["detector", "focal", "icrs"]
    );
}

#[test]
fn transforms_between_intermediate_frames() {
    let wcs = three_stage_wcs();
    let forward = wcs.get_transform("detector", "icrs").unwrap().unwrap();
    assert_eq!(forward.evaluate(&[1.0, 2.0]), vec![10.0, 40.0]);
    let partial = wcs.get_transform("focal", "icrs").unwrap().unwrap();
    assert_eq!(partial.evaluate(&[2.0, 4.0]), vec![10.0, 40.0]);
    let backward = wcs.get_transform("icrs", "detector").unwrap().unwrap();
    assert_close(&backward.evaluate(&[10.0, 40.0]), &[1.0, 2.0], TOL);
    let same = wcs.get_transform("focal", "focal").unwrap().unwrap();
    assert_eq!(same.evaluate(&[3.0, 4.0]), vec![3.0, 4.0]);

    assert_close(&wcs.transform("icrs", "focal", &[10.0, 40.0]).unwrap(), &[2.0, 4.0], TOL);
}

#[test]
fn unknown_frame() {
    let wcs = three_stage_wcs();
    let err = wcs.get_transform("detector", "nowhere").unwrap_err();
    assert_eq!(err, GwcsError::unknown_frame("nowhere"));
}

#[test]
fn insert_transform_before_frame() {
    let mut wcs = three_stage_wcs();
    wcs.insert_transform("focal", Shift::new(1.0).and(Shift::new(1.0)).shared(), false)
        .unwrap();
    assert_close(&wcs.pixel_to_world_values(&[1.0, 2.0]).unwrap(), &[15.0, 50.0], TOL);
    assert_close(&wcs.world_to_pixel_values(&[15.0, 50.0]).unwrap(), &[1.0, 2.0], TOL);
}

#[test]
fn insert_transform_of_wrong_arity_is_rejected() {
    let mut wcs = three_stage_wcs();
    let err = wcs
        .insert_transform("focal", Shift::new(1.0).shared(), true)
        .unwrap_err();
    assert!(err.is_value_error());
    assert_close(&wcs.pixel_to_world_values(&[1.0, 2.0]).unwrap(), &[10.0, 40.0], TOL);
}

#[test]
fn pipeline_needs_matching_arity() {
    let err = Wcs::from_steps(vec![
        (detector(2), Some(Identity::new(3).shared())),
        (icrs(), None),
    ])
    .unwrap_err();
    assert!(err.is_value_error());
}
