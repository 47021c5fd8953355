use std::sync::Arc;

use polyscript::{
    context::Context,
    data::{CompositeProvider, ContextProvider, DataItem, DataMap, Provider, StaticProvider},
    evaluation::{EvalError, Evaluator, ResponseType},
    script::{content_id, CompileError, ExecutableUnit, StringLoader, UnitError},
    Error,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{path_unit, PathCompiler, PathEvaluator};

fn standard_provider() -> Arc<dyn Provider> {
    Arc::new(CompositeProvider::from_providers([
        Arc::new(
            StaticProvider::from_value(json!({"greeting": "hello", "limits": {"max": 10}}))
                .unwrap(),
        ) as Arc<dyn Provider>,
        Arc::new(ContextProvider::default()) as Arc<dyn Provider>,
    ]))
}

#[tokio::test]
async fn test_static_only_evaluation() {
    let evaluator = PathEvaluator::new(path_unit("limits.max", standard_provider()));
    let response = evaluator.eval(&Context::background()).await.unwrap();

    assert_eq!(response.interface(), json!(10));
    assert_eq!(response.response_type(), ResponseType::Int);
    assert_eq!(response.inspect(), "10");
    assert_eq!(response.script_exe_id(), content_id("limits.max"));
    assert!(response.exec_time().ends_with('s'));
}

#[tokio::test]
async fn test_request_data_flows_into_eval() {
    let evaluator = PathEvaluator::new(path_unit("request.QueryParams.name", standard_provider()));
    let request = http::Request::builder()
        .uri("http://localhost:8080/greet?name=ada")
        .body(Vec::<u8>::new())
        .unwrap();

    let ctx = evaluator
        .prepare_context(&Context::background(), &[DataItem::from(&request)])
        .unwrap();
    let response = evaluator.eval(&ctx).await.unwrap();
    assert_eq!(response.interface(), json!(["ada"]));
    assert_eq!(response.response_type(), ResponseType::List);
}

#[tokio::test]
async fn test_add_data_to_context_uses_input_bucket() {
    let evaluator = PathEvaluator::new(path_unit("input_data.user", standard_provider()));
    let mut data = DataMap::new();
    data.insert("user".into(), json!("grace"));

    let ctx = evaluator
        .add_data_to_context(&Context::background(), &[data])
        .unwrap();
    let response = evaluator.eval(&ctx).await.unwrap();
    assert_eq!(response.interface(), json!("grace"));
}

#[tokio::test]
async fn test_static_only_unit_rejects_enrichment() {
    let provider = Arc::new(StaticProvider::from_value(json!({"a": 1})).unwrap());
    let evaluator = PathEvaluator::new(path_unit("a", provider));
    let ctx = Context::background();

    let err = evaluator
        .prepare_context(&ctx, &[DataItem::from(json!({"b": 2}))])
        .unwrap_err();
    assert!(matches!(err, EvalError::ContextEnrichment(_)));
    assert!(Error::from(err).is_static_rejection());

    // evaluation still works on the untouched context
    let response = evaluator.eval(&ctx).await.unwrap();
    assert_eq!(response.interface(), json!(1));
}

#[tokio::test]
async fn test_partial_enrichment_is_recoverable() {
    let evaluator = PathEvaluator::new(path_unit("input_data.kept", standard_provider()));

    // the composite hides partial contexts, so talk to a bare context provider
    let direct = PathEvaluator::new(path_unit(
        "input_data.kept",
        Arc::new(ContextProvider::default()),
    ));
    let err = direct
        .prepare_context(
            &Context::background(),
            &[DataItem::from(json!({"kept": true})), DataItem::from(json!(null))],
        )
        .unwrap_err();
    let ctx = err.partial_context().cloned().expect("partial context");
    assert_eq!(direct.eval(&ctx).await.unwrap().interface(), json!(true));

    let err = evaluator
        .prepare_context(
            &Context::background(),
            &[DataItem::from(json!({"kept": true})), DataItem::from(json!(null))],
        )
        .unwrap_err();
    assert!(err.partial_context().is_none());
}

#[tokio::test]
async fn test_execution_errors_are_reported() {
    let evaluator = PathEvaluator::new(path_unit("greeting.length", standard_provider()));
    let err = evaluator.eval(&Context::background()).await.unwrap_err();
    assert!(matches!(err, EvalError::Execution(_)));
}

#[tokio::test]
async fn test_cancelled_context_stops_evaluation() {
    let evaluator = PathEvaluator::new(path_unit("greeting", standard_provider()));
    let (ctx, handle) = Context::background().with_cancel();
    let ctx = evaluator
        .prepare_context(&ctx, &[DataItem::from(json!({"x": 1}))])
        .unwrap();

    assert!(evaluator.eval(&ctx).await.is_ok());
    handle.cancel();
    assert!(matches!(
        evaluator.eval(&ctx).await,
        Err(EvalError::Cancelled)
    ));
}

#[test]
fn test_compile_errors_abort_unit_construction() {
    let result = ExecutableUnit::builder()
        .loader(Arc::new(StringLoader::new("a..b").unwrap()))
        .compiler(Arc::new(PathCompiler))
        .provider(standard_provider())
        .build();
    assert!(matches!(
        result,
        Err(UnitError::Compile(CompileError::Syntax(_)))
    ));
}

#[test]
fn test_caller_supplied_id() {
    let unit = ExecutableUnit::builder()
        .id("greeter")
        .loader(Arc::new(StringLoader::new("greeting").unwrap()))
        .compiler(Arc::new(PathCompiler))
        .provider(standard_provider())
        .build()
        .unwrap();
    assert_eq!(unit.id(), "greeter");
    assert_eq!(unit.content().source(), "greeting");
}
