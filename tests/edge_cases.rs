use proxima::compute::{DistanceFunction, EuclideanDistance, FnDistance, SquaredEuclideanDistance};
use proxima::medoids::Initialization;
use proxima::relation::VectorRelation;
use proxima::scan::linear_knn;
use proxima::{DbId, IdAllocator, IndexBuilder, IndexConfig, ProximaError, QueryMode};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};

fn temp_file(suffix: &str) -> NamedTempFile {
    Builder::new().suffix(suffix).tempfile().unwrap()
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_single_point_relation() {
    let relation = VectorRelation::from_points([[3.0, 4.0]]).unwrap();
    let index = IndexBuilder::new().num_references(8).build(&relation).unwrap();

    assert_eq!(index.reference_points().len(), 1);
    let result = index.knn(&[0.0, 0.0], 5).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.kth_distance(), Some(5.0));
    assert!(index.range(&[0.0, 0.0], 4.99).unwrap().is_empty());
    assert_eq!(index.range(&[0.0, 0.0], 5.0).unwrap().len(), 1);
}

#[test]
fn test_all_points_identical() {
    let relation = VectorRelation::from_points(vec![[1.0, 1.0]; 10]).unwrap();
    let index = IndexBuilder::new()
        .num_references(4)
        .initialization(Initialization::FirstK)
        .build(&relation)
        .unwrap();

    // Everything lands in the first list
    let stats = index.statistics();
    assert_eq!(stats.max_list_len, 10);
    assert_eq!(stats.empty_lists, 3);

    let result = index.knn(&[1.0, 1.0], 3).unwrap();
    assert_eq!(result.ids(), vec![DbId::new(0), DbId::new(1), DbId::new(2)]);
    assert_eq!(result.distances(), vec![0.0; 3]);
    assert_eq!(index.range(&[1.0, 1.0], 0.0).unwrap().len(), 10);
}

#[test]
fn test_ties_are_broken_by_id() {
    // Four points at distance 1 from the origin
    let relation =
        VectorRelation::from_points([[0.0, 1.0], [1.0, 0.0], [0.0, -1.0], [-1.0, 0.0], [9.0, 9.0]])
            .unwrap();
    let index = IndexBuilder::new().num_references(2).build(&relation).unwrap();
    let result = index.knn(&[0.0, 0.0], 2).unwrap();
    assert_eq!(result.ids(), vec![DbId::new(0), DbId::new(1)]);
}

#[test]
fn test_k_larger_than_relation() {
    let relation = VectorRelation::from_points((0..7).map(|i| [i as f64])).unwrap();
    let index = IndexBuilder::new().num_references(3).build(&relation).unwrap();
    let result = index.knn(&[2.2], 100).unwrap();
    assert_eq!(result.len(), 7);
    assert_eq!(result.ids()[0], DbId::new(2));
    assert_eq!(result.ids()[6], DbId::new(6));
}

#[test]
fn test_query_far_outside_the_data() {
    let relation = VectorRelation::from_points((0..50).map(|i| [i as f64, (i * i) as f64])).unwrap();
    let index = IndexBuilder::new().num_references(5).build(&relation).unwrap();
    let query = [1.0e6, -1.0e6];
    let expected = linear_knn(&relation, &EuclideanDistance, &query[..], 4).unwrap();
    assert_eq!(index.knn(&query, 4).unwrap().ids(), expected.ids());
}

#[test]
fn test_ids_from_a_shared_allocator() {
    let mut allocator = IdAllocator::starting_at(100);
    let relation =
        VectorRelation::from_points_with([[0.0], [10.0], [20.0]], &mut allocator).unwrap();
    let index = IndexBuilder::new().num_references(2).build(&relation).unwrap();

    assert_eq!(index.knn(&[11.0], 1).unwrap().ids(), vec![DbId::new(101)]);
    assert!(index.knn_for_id(DbId::new(102), 1).is_ok());
    assert!(matches!(
        index.knn_for_id(DbId::new(0), 1),
        Err(ProximaError::UnknownId(_))
    ));
}

#[test]
fn test_invalid_queries() {
    let relation = VectorRelation::from_points([[0.0, 0.0], [1.0, 1.0]]).unwrap();
    let index = IndexBuilder::new().build(&relation).unwrap();

    assert!(matches!(
        index.knn(&[0.0, 0.0], 0),
        Err(ProximaError::InvalidInput(_))
    ));
    assert!(matches!(
        index.knn(&[0.0, 0.0, 0.0], 1),
        Err(ProximaError::DimensionMismatch {
            expected: 2,
            found: 3
        })
    ));
    assert!(matches!(
        index.range(&[0.0, 0.0], -1.0),
        Err(ProximaError::InvalidInput(_))
    ));
}

#[test]
fn test_invalid_configuration_is_rejected_at_build() {
    let relation = VectorRelation::from_points([[0.0], [1.0]]).unwrap();
    assert!(matches!(
        IndexBuilder::new().num_references(0).build(&relation),
        Err(ProximaError::InvalidConfig(_))
    ));
    assert!(matches!(
        IndexBuilder::new().approximate_references(0).build(&relation),
        Err(ProximaError::InvalidConfig(_))
    ));
}

#[test]
fn test_nan_distances_fail_the_build() {
    let relation = VectorRelation::from_points([[0.0], [1.0], [2.0]]).unwrap();
    let broken = FnDistance::metric("broken", |_: &[f64], _: &[f64]| f64::NAN);
    assert!(matches!(
        IndexBuilder::new().distance(broken).build(&relation),
        Err(ProximaError::InvalidInput(_))
    ));
}

#[test]
fn test_non_metric_distance_logs_and_still_answers() {
    init_logging();
    let relation = VectorRelation::from_points((0..30).map(|i| [i as f64, 0.0])).unwrap();
    let index = IndexBuilder::new()
        .distance(SquaredEuclideanDistance)
        .num_references(3)
        .early_termination(true)
        .build(&relation)
        .unwrap();
    let result = index.knn(&[10.2, 0.0], 1).unwrap();
    assert_eq!(result.ids(), vec![DbId::new(10)]);
}

#[test]
fn test_custom_distance_function() {
    init_logging();
    let relation = VectorRelation::from_points((0..40).map(|i| [(i % 8) as f64, (i / 8) as f64]))
        .unwrap();
    let chebyshev = FnDistance::metric("chebyshev", |a: &[f64], b: &[f64]| {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    });
    let index = IndexBuilder::new()
        .distance(chebyshev)
        .num_references(4)
        .build(&relation)
        .unwrap();

    assert_eq!(index.distance().name(), "chebyshev");
    let found = index.range(&[3.0, 2.0], 1.0).unwrap();
    assert_eq!(found.len(), 9);
}

#[test]
fn test_config_from_files() {
    let relation = VectorRelation::from_points((0..20).map(|i| [i as f64])).unwrap();

    let mut toml_file = temp_file(".toml");
    writeln!(
        toml_file,
        "num_references = 4\nquery_mode = \"approximate\"\napproximate_references = 2"
    )
    .unwrap();
    let config = IndexConfig::load(toml_file.path()).unwrap();
    assert_eq!(config.query_mode, QueryMode::Approximate);

    let index = IndexBuilder::new().config(config).build(&relation).unwrap();
    assert_eq!(index.reference_points().len(), 4);
    assert!(index.knn(&[3.0], 3).unwrap().len() <= 3);

    let mut json_file = temp_file(".json");
    write!(json_file, r#"{{"num_references": 3, "early_termination": false}}"#).unwrap();
    let config = IndexConfig::load(json_file.path()).unwrap();
    assert_eq!(config.num_references, 3);
    assert!(!config.early_termination);

    let mut unknown = temp_file(".json");
    write!(unknown, r#"{{"num_refs": 3}}"#).unwrap();
    assert!(matches!(
        IndexConfig::load(unknown.path()),
        Err(ProximaError::Config(_))
    ));
}
