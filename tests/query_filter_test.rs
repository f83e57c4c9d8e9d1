use football_league_backend::error::AppError;
use football_league_backend::utils::query::{
    compile, FieldKind, FilterField, FilterOperator, FilterValue, QueryParams, SortOrder, MAX_LIMIT,
};

const FIELDS: &[FilterField] = &[
    FilterField::new("id", "id", FieldKind::Integer),
    FilterField::new("name", "name", FieldKind::Text),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn defaults_apply_when_parameters_are_missing_or_invalid() {
    let params = QueryParams::from_pairs(pairs(&[("page", "zero"), ("limit", "-4"), ("order", "sideways")])).unwrap();

    assert_eq!(params.page, 1);
    assert_eq!(params.limit, 20);
    assert_eq!(params.sort, "id");
    assert_eq!(params.order, SortOrder::Asc);
    assert_eq!(params.offset(), 0);
}

#[test]
fn limit_is_capped_and_offset_follows_page() {
    let params = QueryParams::from_pairs(pairs(&[("page", "3"), ("limit", "500"), ("order", "desc")])).unwrap();

    assert_eq!(params.limit, MAX_LIMIT);
    assert_eq!(params.offset(), 2 * MAX_LIMIT);
    assert_eq!(params.order, SortOrder::Desc);
}

#[test]
fn page_beyond_addressable_offset_is_rejected() {
    let huge_page = i64::MAX.to_string();
    let result = QueryParams::from_pairs(pairs(&[("page", huge_page.as_str()), ("limit", "100")]));
    assert!(matches!(result, Err(AppError::Validation(_))));

    let last_page = (i64::MAX / MAX_LIMIT).to_string();
    let params = QueryParams::from_pairs(pairs(&[("page", last_page.as_str()), ("limit", "100")])).unwrap();
    assert_eq!(params.offset(), (i64::MAX / MAX_LIMIT - 1) * MAX_LIMIT);
}

#[test]
fn filters_are_typed_by_their_field() {
    let params = QueryParams::from_pairs(pairs(&[
        ("filter[name][like]", "bandung"),
        ("filter[id][in]", "1, 2,3"),
        ("filter[created_at][gte]", "2025-01-01"),
        ("sort", "name"),
    ]))
    .unwrap();
    let compiled = compile(&params, FIELDS).unwrap();

    assert_eq!(compiled.sort_column, "name");
    assert_eq!(compiled.predicates.len(), 3);
    assert_eq!(compiled.predicates[0].value, FilterValue::Text("%bandung%".into()));
    assert_eq!(compiled.predicates[1].operator, FilterOperator::In);
    assert_eq!(compiled.predicates[1].value, FilterValue::IntegerList(vec![1, 2, 3]));
    assert!(matches!(compiled.predicates[2].value, FilterValue::Timestamp(_)));
}

#[test]
fn unknown_fields_operators_and_bad_values_are_validation_errors() {
    let cases: &[&[(&str, &str)]] = &[
        &[("sort", "password_hash")],
        &[("filter[password_hash][eq]", "x")],
        &[("filter[id][between]", "1")],
        &[("filter[id][eq]", "seven")],
        &[("filter[id][like]", "1")],
        &[("filter[created_at][lt]", "yesterday")],
    ];
    for case in cases {
        let params = QueryParams::from_pairs(pairs(case)).unwrap();
        assert!(
            matches!(compile(&params, FIELDS), Err(AppError::Validation(_))),
            "{:?} should be rejected",
            case
        );
    }
}

#[test]
fn malformed_filter_keys_are_rejected() {
    for key in ["filter[name]", "filter[][eq]", "filter[name][eq][x]"] {
        assert!(matches!(
            QueryParams::from_pairs(pairs(&[(key, "x")])),
            Err(AppError::Validation(_))
        ));
    }
}
