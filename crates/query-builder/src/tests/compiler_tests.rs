use crate::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn single(request: Request) -> RequestDescriptor {
    match request {
        Request::Single(descriptor) => descriptor,
        Request::Batch(_) => panic!("Expected single request, found batch"),
    }
}

/// The `where` param is a JSON string; compare it structurally.
fn where_param(descriptor: &RequestDescriptor) -> Option<Value> {
    descriptor
        .param("where")
        .and_then(Value::as_str)
        .map(|raw| serde_json::from_str(raw).unwrap())
}

fn at(version: &str) -> QueryBuilder {
    QueryBuilder::new("GameScore").server_version(ServerVersion::parse(version).unwrap())
}

#[test]
fn test_get_all_params() {
    let query = at("5.0.0")
        .where_op("score", ">", 10)
        .order_by("score", Direction::Desc)
        .limit(10)
        .skip(20)
        .select(["score", "playerName"])
        .unwrap()
        .with(["player"]);

    let descriptor = single(query.compile(&Operation::GetAll).unwrap());

    assert_eq!(*descriptor.method(), Method::Get);
    assert_eq!(descriptor.path(), "/classes/GameScore");
    assert_eq!(descriptor.param("order"), Some(&json!("-score")));
    assert_eq!(descriptor.param("limit"), Some(&json!(10)));
    assert_eq!(descriptor.param("skip"), Some(&json!(20)));
    assert_eq!(descriptor.param("keys"), Some(&json!(["score", "playerName"])));
    assert_eq!(descriptor.param("include"), Some(&json!("player")));
    assert_eq!(where_param(&descriptor), Some(json!({ "score": { "$gt": 10 } })));
    assert!(descriptor.body().is_none());

    let names: Vec<&str> = descriptor
        .params()
        .as_ref()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, ["order", "limit", "skip", "keys", "where", "include"]);
}

#[test]
fn test_get_all_without_state_has_no_params() {
    let descriptor = single(at("5.0.0").compile(&Operation::GetAll).unwrap());
    assert!(descriptor.params().is_none());
}

#[test]
fn test_keys_encoding_depends_on_version() {
    let old = single(at("4.9.0").select(["a", "b"]).unwrap().compile(&Operation::GetAll).unwrap());
    assert_eq!(old.param("keys"), Some(&json!("a,b")));

    let new = single(at("5.0.0").select(["a", "b"]).unwrap().compile(&Operation::GetAll).unwrap());
    assert_eq!(new.param("keys"), Some(&json!(["a", "b"])));
}

#[test]
fn test_exclude_keys_encoding_depends_on_version() {
    let old = single(at("4.9.0").except(["secret"]).unwrap().compile(&Operation::GetAll).unwrap());
    assert_eq!(old.param("excludeKeys"), Some(&json!("secret")));
    assert!(old.param("keys").is_none());

    let new = single(at("10.2.0").except(["secret"]).unwrap().compile(&Operation::GetAll).unwrap());
    assert_eq!(new.param("excludeKeys"), Some(&json!(["secret"])));
}

#[test]
fn test_first_forces_newest_single_row() {
    let query = at("5.0.0")
        .order_by("score", Direction::Asc)
        .order_by_desc(["level"])
        .limit(50)
        .where_eq("playerName", "Sean Plott");

    let descriptor = single(query.compile(&Operation::First).unwrap());

    assert_eq!(descriptor.path(), "/classes/GameScore");
    assert_eq!(descriptor.param("order"), Some(&json!("-createdAt")));
    assert_eq!(descriptor.param("limit"), Some(&json!(1)));
    assert_eq!(where_param(&descriptor), Some(json!({ "playerName": "Sean Plott" })));

    // compiling `first` leaves the builder untouched
    assert_eq!(query.ordering(), Some("-level"));
    assert_eq!(query.limit_value(), Some(50));
}

#[test]
fn test_find_by_id() {
    let query = at("4.0.0").select(["score"]).unwrap().with(["player"]);
    let descriptor = single(query.compile(&Operation::Find("Ed1nuqPvcm".to_string())).unwrap());

    assert_eq!(*descriptor.method(), Method::Get);
    assert_eq!(descriptor.path(), "/classes/GameScore/Ed1nuqPvcm");
    assert_eq!(descriptor.param("keys"), Some(&json!("score")));
    assert_eq!(descriptor.param("include"), Some(&json!("player")));
    assert!(descriptor.param("where").is_none());
}

#[test]
fn test_count_forces_limit_zero() {
    let query = at("5.0.0").where_op("score", ">", 100).limit(10);
    let descriptor = single(query.compile(&Operation::Count).unwrap());

    assert_eq!(descriptor.path(), "/classes/GameScore");
    assert_eq!(descriptor.param("limit"), Some(&json!(0)));
    assert_eq!(descriptor.param("count"), Some(&json!(1)));
    assert_eq!(where_param(&descriptor), Some(json!({ "score": { "$gt": 100 } })));
}

#[test]
fn test_count_without_conditions_has_no_where() {
    let descriptor = single(at("5.0.0").compile(&Operation::Count).unwrap());
    assert!(descriptor.param("where").is_none());
}

#[test]
fn test_distinct_is_version_gated() {
    let operation = Operation::Distinct(vec!["x".to_string(), "y".to_string()]);

    let err = at("2.6.0").compile(&operation).unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedFeature { feature: "Distinct", .. }));

    let descriptor = single(at("2.7.0").where_eq("a", 1).compile(&operation).unwrap());
    assert_eq!(*descriptor.method(), Method::Get);
    assert_eq!(descriptor.path(), "/aggregate/GameScore");
    assert_eq!(descriptor.param("distinct"), Some(&json!("x,y")));
    assert_eq!(where_param(&descriptor), Some(json!({ "a": 1 })));
}

#[test]
fn test_aggregate_spreads_pipeline() {
    let pipeline = json!({
        "group": { "objectId": "$playerName", "total": { "$sum": "$score" } },
        "limit": 5,
    });

    let err = at("2.6.9").compile(&Operation::Aggregate(pipeline.clone())).unwrap_err();
    assert!(matches!(err, QueryError::UnsupportedFeature { feature: "Aggregate", .. }));

    let descriptor = single(at("10.0.0").compile(&Operation::Aggregate(pipeline)).unwrap());
    assert_eq!(descriptor.path(), "/aggregate/GameScore");
    assert_eq!(
        descriptor.param("group"),
        Some(&json!({ "objectId": "$playerName", "total": { "$sum": "$score" } }))
    );
    assert_eq!(descriptor.param("limit"), Some(&json!(5)));
}

#[test]
fn test_aggregate_rejects_non_object_pipeline() {
    let err = at("5.0.0")
        .compile(&Operation::Aggregate(json!([{ "group": {} }])))
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidArgument(_)));
}

#[test]
fn test_create_many_is_one_batch() {
    let request = at("5.0.0")
        .compile(&Operation::Create(vec![json!({ "a": 1 }), json!({ "b": 2 })]))
        .unwrap();

    assert!(request.is_batch());
    let descriptors = request.descriptors();
    assert_eq!(descriptors.len(), 2);
    for (descriptor, body) in descriptors.iter().zip([json!({ "a": 1 }), json!({ "b": 2 })]) {
        assert_eq!(*descriptor.method(), Method::Post);
        assert_eq!(descriptor.path(), "/classes/GameScore");
        assert_eq!(descriptor.body(), &Some(body));
    }
}

#[test]
fn test_create_nothing_is_rejected() {
    let err = at("5.0.0").compile(&Operation::Create(Vec::new())).unwrap_err();
    assert!(matches!(err, QueryError::InvalidArgument(_)));
}

#[test]
fn test_update_and_field_operations() {
    let query = at("5.0.0");
    let id = "Ed1nuqPvcm".to_string();

    let cases = [
        (
            Operation::Update { id: id.clone(), data: json!({ "score": 73453 }) },
            json!({ "score": 73453 }),
        ),
        (
            Operation::Increment { id: id.clone(), field: "score".to_string(), amount: 1 },
            json!({ "score": { "__op": "Increment", "amount": 1 } }),
        ),
        (
            Operation::Increment { id: id.clone(), field: "score".to_string(), amount: -5 },
            json!({ "score": { "__op": "Increment", "amount": -5 } }),
        ),
        (
            Operation::DeleteField { id: id.clone(), field: "opponents".to_string() },
            json!({ "opponents": { "__op": "Delete" } }),
        ),
        (
            Operation::ArrayUpdate {
                id: id.clone(),
                field: "skills".to_string(),
                operation: ArrayOperation::AddUnique,
                objects: vec![json!("flying"), json!("kungfu")],
            },
            json!({ "skills": { "__op": "AddUnique", "objects": ["flying", "kungfu"] } }),
        ),
        (
            Operation::ArrayUpdate {
                id: id.clone(),
                field: "skills".to_string(),
                operation: ArrayOperation::Remove,
                objects: vec![json!("flying")],
            },
            json!({ "skills": { "__op": "Remove", "objects": ["flying"] } }),
        ),
    ];

    for (operation, body) in cases {
        let descriptor = single(query.compile(&operation).unwrap());
        assert_eq!(*descriptor.method(), Method::Put, "{}", operation.name());
        assert_eq!(descriptor.path(), "/classes/GameScore/Ed1nuqPvcm");
        assert_eq!(descriptor.body(), &Some(body));
        assert!(descriptor.params().is_none());
    }
}

#[test]
fn test_delete_record() {
    let descriptor = single(
        at("5.0.0")
            .where_eq("ignored", true)
            .compile(&Operation::Delete("Ed1nuqPvcm".to_string()))
            .unwrap(),
    );

    assert_eq!(*descriptor.method(), Method::Delete);
    assert_eq!(descriptor.path(), "/classes/GameScore/Ed1nuqPvcm");
    assert!(descriptor.params().is_none());
    assert!(descriptor.body().is_none());
}

#[test]
fn test_descriptor_serializes_for_batch() {
    let request = at("5.0.0").compile(&Operation::Create(vec![json!({ "a": 1 })])).unwrap();
    let value = serde_json::to_value(&request.descriptors()[0]).unwrap();
    assert_eq!(
        value,
        json!({ "method": "POST", "path": "/classes/GameScore", "body": { "a": 1 } })
    );
}
