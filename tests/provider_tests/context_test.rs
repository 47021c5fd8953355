use std::sync::Arc;

use polyscript::{
    config::{self, DataConfig, RuntimeConfig},
    context::Context,
    data::{
        ClassificationError, CompositeProvider, ContextProvider, DataError, DataItem, Provider,
        RequestData, StaticProvider,
    },
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn request() -> http::Request<Vec<u8>> {
    http::Request::builder()
        .method("PUT")
        .uri("https://api.example.com/users/7?fields=name&fields=email")
        .header("Content-Type", "application/json")
        .header("X-Trace", "abc")
        .body(br#"{"name":"bob"}"#.to_vec())
        .unwrap()
}

fn response() -> http::Response<&'static str> {
    http::Response::builder()
        .status(201)
        .header("Location", "/users/7")
        .body("created")
        .unwrap()
}

#[test]
fn test_http_items_land_in_their_buckets() {
    let provider = ContextProvider::default();
    let request = request();
    let ctx = provider
        .add_data_to_context(
            &Context::background(),
            &[
                DataItem::from(&request),
                DataItem::from(&response()),
                DataItem::from(json!({"tenant": "acme"})),
            ],
        )
        .unwrap();

    let data = provider.get_data(&ctx).unwrap();
    assert_eq!(data["input_data"], json!({"tenant": "acme"}));

    let req = &data["request"];
    assert_eq!(req["Method"], json!("PUT"));
    assert_eq!(req["URL_Path"], json!("/users/7"));
    assert_eq!(req["URL_Host"], json!("api.example.com"));
    assert_eq!(req["QueryParams"]["fields"], json!(["name", "email"]));
    assert_eq!(req["Header"]["Content-Type"], json!(["application/json"]));
    assert_eq!(req["Body"], json!(r#"{"name":"bob"}"#));

    let resp = &data["response"];
    assert_eq!(resp["StatusCode"], json!(201));
    assert_eq!(resp["Status"], json!("201 Created"));
    assert_eq!(resp["Body"], json!("created"));
}

#[test]
fn test_successive_writes_deep_merge_buckets() {
    let provider = ContextProvider::default();
    let first = provider
        .add_data_to_context(
            &Context::background(),
            &[DataItem::from(json!({"user": {"id": 1, "roles": ["a"]}}))],
        )
        .unwrap();
    let second = provider
        .add_data_to_context(
            &first,
            &[DataItem::from(json!({"user": {"name": "ann", "roles": ["b"]}}))],
        )
        .unwrap();

    assert_eq!(
        provider.get_data(&second).unwrap()["input_data"],
        json!({"user": {"id": 1, "name": "ann", "roles": ["b"]}})
    );
    // earlier contexts keep their own view
    assert_eq!(
        provider.get_data(&first).unwrap()["input_data"],
        json!({"user": {"id": 1, "roles": ["a"]}})
    );
}

#[test]
fn test_mixed_items_commit_what_they_can() {
    let provider = ContextProvider::default();
    let invalid_body = http::Request::builder()
        .uri("http://localhost/")
        .body(vec![0xff, 0xfe])
        .unwrap();
    let items = [
        DataItem::from(json!({"ok": 1})),
        DataItem::from(json!("just a string")),
        DataItem::from(RequestData::from_request(&invalid_body)),
        DataItem::from(json!({"ok2": 2})),
    ];

    let err = provider
        .add_data_to_context(&Context::background(), &items)
        .unwrap_err();
    let DataError::PartialEnrichment { context, failures } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(failures.len(), 2);
    assert!(matches!(
        failures[0],
        ClassificationError::Unsupported { index: 1, .. }
    ));
    assert!(matches!(
        failures[1],
        ClassificationError::InvalidBody { index: 2, .. }
    ));

    let data = provider.get_data(context).unwrap();
    assert_eq!(data["input_data"], json!({"ok": 1, "ok2": 2}));
    assert!(data.get("request").is_none());
}

#[test]
fn test_custom_bucket_keys_from_config() {
    let runtime: RuntimeConfig = config::from_str(
        r#"
        {
            "data": {
                "context_key": "script_data",
                "input_key": "args"
            },
            "script_id": "handler"
        }
    "#,
    )
    .unwrap();
    assert_eq!(runtime.data.request_key, DataConfig::default().request_key);

    let provider = ContextProvider::from_config(&runtime.data);
    let ctx = provider
        .add_data_to_context(&Context::background(), &[DataItem::from(json!({"n": 1}))])
        .unwrap();
    assert_eq!(ctx.value("script_data"), Some(&json!({"args": {"n": 1}})));
    assert!(ctx.value("eval_data").is_none());
}

#[test]
fn test_providers_with_different_keys_are_isolated() {
    let composite = CompositeProvider::from_providers([
        Arc::new(StaticProvider::from_value(json!({"base": true})).unwrap()) as Arc<dyn Provider>,
        Arc::new(ContextProvider::new("first")) as Arc<dyn Provider>,
        Arc::new(ContextProvider::new("second")) as Arc<dyn Provider>,
    ]);
    let ctx = composite
        .add_data_to_context(&Context::background(), &[DataItem::from(json!({"x": 1}))])
        .unwrap();

    assert!(ctx.value("first").is_some());
    assert!(ctx.value("second").is_some());
    let data = composite.get_data(&ctx).unwrap();
    assert_eq!(data["base"], json!(true));
    assert_eq!(data["input_data"], json!({"x": 1}));
}

#[test]
fn test_empty_context_key_is_a_configuration_error() {
    let provider = ContextProvider::new("");
    assert!(matches!(
        provider.get_data(&Context::background()),
        Err(DataError::EmptyContextKey)
    ));
    assert!(matches!(
        provider.add_data_to_context(&Context::background(), &[]),
        Err(DataError::EmptyContextKey)
    ));
}
