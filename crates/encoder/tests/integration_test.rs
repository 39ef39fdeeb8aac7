//! Integration tests for the encoder.
//!
//! These feed a catalog through the real loader and check the feature space
//! the encoder learns from it.

use data_loader::parser::parse_json_str;
use data_loader::Catalog;
use encoder::{CategoricalField, EncodeError, EncoderConfig, FeatureEncoder, FieldPolicy, ScalingMode};

const CATALOG_JSON: &str = r#"[
    {
        "title": "Avatar",
        "genres": "Action|Adventure|Fantasy|Science Fiction",
        "keywords": "culture clash|future|space war|space colony",
        "cast": "Sam Worthington|Zoe Saldana|Sigourney Weaver",
        "companies": "Ingenious Film Partners|Twentieth Century Fox",
        "popularity": 150.4,
        "runtime": "162",
        "vote_count": 11800,
        "vote_average": "7.2",
        "release_date": "2009-12-10"
    },
    {
        "title": "Aliens",
        "genres": "Horror|Action|Thriller|Science Fiction",
        "keywords": "android|space marine|space colony",
        "cast": "Sigourney Weaver|Michael Biehn|Paul Reiser",
        "companies": "Twentieth Century Fox|Brandywine Productions",
        "popularity": 67.7,
        "runtime": 137,
        "vote_count": 3220,
        "vote_average": 7.7,
        "release_date": "1986-07-18"
    },
    {
        "title": "Notting Hill",
        "genres": "Romance|Comedy|Drama",
        "keywords": "london|bookshop|movie star",
        "cast": "Julia Roberts|Hugh Grant",
        "companies": "PolyGram Filmed Entertainment|Working Title Films",
        "popularity": 30.2,
        "runtime": 124,
        "vote_count": 1760,
        "vote_average": 7.0,
        "release_date": "1999-05-13"
    },
    {
        "title": "Untitled Project",
        "genres": "",
        "popularity": "",
        "release_date": "someday"
    }
]"#;

fn catalog() -> Catalog {
    Catalog::from_raw(parse_json_str(CATALOG_JSON).unwrap())
}

fn cosine(matrix: &encoder::FeatureMatrix, a: usize, b: usize) -> f32 {
    let (a, b) = (matrix.row(a).unwrap(), matrix.row(b).unwrap());
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    a.dot(b) / (a.norm() * b.norm())
}

#[test]
fn test_layout_follows_vocabularies() {
    let catalog = catalog();
    let matrix = FeatureEncoder::default().encode(catalog.records()).unwrap();

    let genres = matrix.vocabulary(CategoricalField::Genres);
    assert_eq!(genres.len(), 9);
    assert_eq!(genres.documents(), 4);
    assert_eq!(genres.term(0), Some("action"));

    let layout = matrix.layout();
    let mut expected_offset = 0;
    for field in CategoricalField::ALL {
        let span = layout.span(field);
        assert_eq!(span.offset, expected_offset);
        assert_eq!(span.len, matrix.vocabulary(field).len());
        expected_offset += span.len;
    }
    assert_eq!(layout.numeric_span().offset, expected_offset);
    assert_eq!(matrix.dim(), expected_offset + layout.numeric_span().len);
}

#[test]
fn test_rows_are_unit_length_or_zero() {
    let catalog = catalog();
    let matrix = FeatureEncoder::default().encode(catalog.records()).unwrap();

    assert_eq!(matrix.len(), catalog.len());
    for row in matrix.iter() {
        assert!(row.is_zero() || (row.norm() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_metadata_drives_similarity() {
    let catalog = catalog();
    let matrix = FeatureEncoder::default().encode(catalog.records()).unwrap();

    assert!(cosine(&matrix, 0, 1) > cosine(&matrix, 0, 2));
    assert!(cosine(&matrix, 1, 0) > cosine(&matrix, 1, 2));
}

#[test]
fn test_shared_cast_member_is_one_dimension() {
    let catalog = catalog();
    let matrix = FeatureEncoder::default().encode(catalog.records()).unwrap();
    let cast = matrix.vocabulary(CategoricalField::Cast);

    let weaver = cast.index_of("sigourney weaver").unwrap() as usize;
    let dim = matrix.layout().span(CategoricalField::Cast).offset + weaver;
    assert!(matrix.row(0).unwrap().get(dim) > 0.0);
    assert!(matrix.row(1).unwrap().get(dim) > 0.0);
    assert_eq!(matrix.row(2).unwrap().get(dim), 0.0);
}

#[test]
fn test_config_variants_encode_same_shape() {
    let catalog = catalog();
    let mut config = EncoderConfig::default();
    config.numeric.scaling = ScalingMode::MinMax;
    config.keywords.weight = 2.0;
    config.genres.stop_words = vec!["drama".to_string()];

    let matrix = FeatureEncoder::new(config).encode(catalog.records()).unwrap();

    assert_eq!(matrix.len(), 4);
    assert_eq!(matrix.vocabulary(CategoricalField::Genres).index_of("drama"), None);
}

#[test]
fn test_strict_policy_rejects_malformed_field() {
    let mut records = catalog().records().to_vec();
    records[2].keywords = "london||bookshop".to_string();

    let strict = FeatureEncoder::new(EncoderConfig::default().with_policy(FieldPolicy::Fail));
    match strict.encode(&records) {
        Err(EncodeError::Encoding { index, field, .. }) => {
            assert_eq!(index, 2);
            assert_eq!(field, "keywords");
        }
        other => panic!("expected an encoding error, got {other:?}"),
    }

    assert!(FeatureEncoder::default().encode(&records).is_ok());
}
