use autobind::prelude::*;
use autobind::{FieldSpec, bound};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
}

pub trait Auditor: Send + Sync {}

#[derive(Bindable, Default)]
pub struct ShowPost {
    #[bind]
    pub post: Option<Post>,
    #[bind(column = "email")]
    pub author: Option<Arc<User>>,
    pub title: String,
    #[allow(dead_code)]
    secret: Option<String>,
}

#[derive(Bindable, Default)]
pub struct Plain {
    pub post: Option<Post>,
    pub title: String,
}

#[derive(Bindable, Default)]
pub struct ShowThread {
    #[bind]
    pub post: Option<Post>,
    #[bind(column = "email")]
    pub author: Option<User>,
    #[bind]
    pub comment: Option<Comment>,
}

#[derive(Bindable, Default)]
pub struct Guarded {
    #[bind]
    pub middleware: Option<Post>,
    #[bind]
    pub post: Option<Post>,
}

#[derive(Bindable, Default)]
pub struct Odd {
    #[bind]
    pub count: Option<i64>,
    #[bind]
    pub auditor: Option<Box<dyn Auditor>>,
    #[bind]
    pub comment: Option<Comment>,
}

fn lookup() -> Arc<MemoryLookup> {
    let lookup = MemoryLookup::new();
    lookup
        .insert(&User {
            id: 1,
            email: "a@example.com".into(),
        })
        .unwrap();
    lookup
        .insert(&User {
            id: 2,
            email: "b@example.com".into(),
        })
        .unwrap();
    lookup
        .insert(&Post {
            id: 1,
            title: "Hello".into(),
        })
        .unwrap();
    Arc::new(lookup)
}

fn binder() -> Binder {
    Binder::new(lookup())
}

fn context(pairs: &[(&str, &str)]) -> BindingContext {
    BindingContext::new(pairs.iter().copied().collect())
}

fn skipped(report: &BindReport, field: &str) -> Option<SkipReason> {
    match report.status(field) {
        Some(FieldStatus::Skipped(reason)) => Some(*reason),
        _ => None,
    }
}

#[test]
fn test_fields_are_public_and_in_declaration_order() {
    let fields = ShowPost::fields();
    let names: Vec<_> = fields.iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["post", "author", "title"]);

    assert_eq!(
        fields[0],
        FieldSpec::new("post", Some(std::any::type_name::<Post>()))
            .with_marker(BindableProperty::default())
    );
    assert_eq!(fields[1].marker, Some(BindableProperty::new("email")));
    assert_eq!(fields[2].marker, None);
}

#[tokio::test]
async fn test_unmarked_target_is_untouched() {
    let binder = binder();
    let mut ctx = context(&[("post", "1")]);
    let mut page = Plain::default();

    let report = binder.bind(&mut page, &mut ctx).await;

    assert!(report.is_ok());
    assert!(report.bound_fields().is_empty());
    assert_eq!(skipped(&report, "post"), Some(SkipReason::NoMarker));
    assert!(page.post.is_none());
    assert_eq!(ctx.route().get("post"), Some("1"));

    let seed: Map<String, Value> = json!({ "x": 1 }).as_object().cloned().unwrap();
    assert_eq!(binder.bound(&page, &ctx, seed.clone()), seed);
}

#[tokio::test]
async fn test_binds_by_custom_column_and_consumes_parameter() {
    let binder = binder();
    let mut ctx = context(&[("author", "a@example.com"), ("post", "1"), ("format", "json")]);
    let mut page = ShowPost::default();

    let report = binder.bind(&mut page, &mut ctx).await;

    assert!(report.is_ok());
    assert_eq!(report.bound_fields(), vec!["post", "author"]);
    assert_eq!(page.author.as_deref().map(|u| u.id), Some(1));
    assert_eq!(page.post.as_ref().map(|p| p.title.as_str()), Some("Hello"));

    assert!(!ctx.route().contains("author"));
    assert!(!ctx.route().contains("post"));
    assert_eq!(ctx.route().get("format"), Some("json"));

    let payload = bound(&page, &ctx, Map::new());
    assert_eq!(
        Value::Object(payload),
        json!({
            "post": { "id": 1, "title": "Hello" },
            "author": { "id": 1, "email": "a@example.com" },
        })
    );
}

#[tokio::test]
async fn test_missing_row_fails_and_keeps_earlier_fields() {
    let binder = binder();
    let mut ctx = context(&[
        ("post", "1"),
        ("author", "nobody@example.com"),
        ("comment", "9"),
    ]);
    let mut page = ShowThread::default();

    let report = binder.bind(&mut page, &mut ctx).await;

    assert!(!report.is_ok());
    assert!(matches!(report.status("post"), Some(FieldStatus::Bound)));
    assert!(matches!(report.status("author"), Some(FieldStatus::Failed(_))));
    // Not attempted after the failure.
    assert!(report.status("comment").is_none());

    assert!(page.post.is_some());
    assert!(page.author.is_none());
    assert!(!ctx.route().contains("post"));
    assert_eq!(ctx.route().get("author"), Some("nobody@example.com"));

    let payload = ctx.bound(&page, Map::new());
    assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["post"]);

    let err = report.into_result().unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        format!(
            "No {} found where email = nobody@example.com",
            std::any::type_name::<User>()
        )
    );
}

#[tokio::test]
async fn test_ignored_field_is_never_bound() {
    let binder = binder();
    let mut ctx = context(&[("middleware", "1"), ("post", "1")]);
    let mut page = Guarded::default();

    let report = binder.bind(&mut page, &mut ctx).await;

    assert_eq!(skipped(&report, "middleware"), Some(SkipReason::Ignored));
    assert!(page.middleware.is_none());
    assert_eq!(ctx.route().get("middleware"), Some("1"));

    let payload = ctx.bound(&page, Map::new());
    assert!(!payload.contains_key("middleware"));
    assert!(payload.contains_key("post"));
}

#[tokio::test]
async fn test_seed_entries_are_not_overwritten() {
    let binder = binder();
    let mut ctx = context(&[("post", "1"), ("author", "b@example.com")]);
    let mut page = ShowPost::default();
    binder.bind(&mut page, &mut ctx).await.into_result().unwrap();

    let mut seed = Map::new();
    seed.insert("post".into(), json!("preset"));
    let payload = binder.bound(&page, &ctx, seed);

    assert_eq!(payload["post"], json!("preset"));
    assert_eq!(payload["author"]["id"], json!(2));
}

#[tokio::test]
async fn test_second_bind_of_same_type_replaces_matches() {
    let binder = binder();
    let mut ctx = context(&[("post", "1")]);

    let mut first = ShowPost::default();
    binder.bind(&mut first, &mut ctx).await.into_result().unwrap();
    assert!(ctx.bound(&first, Map::new()).contains_key("post"));

    ctx.route_mut().insert("author", "a@example.com");
    let mut second = ShowPost::default();
    binder.bind(&mut second, &mut ctx).await.into_result().unwrap();

    assert_eq!(ctx.matched().get(ShowPost::type_name()), Some(&["author".to_string()][..]));
    // `first` still holds its post, but the registry only names `author` now.
    assert!(first.post.is_some());
    assert!(ctx.bound(&first, Map::new()).is_empty());
    assert!(ctx.bound(&second, Map::new()).contains_key("author"));
}

#[tokio::test]
async fn test_non_model_types_are_skipped() {
    let binder = binder();
    let mut ctx = context(&[("count", "5"), ("auditor", "1"), ("comment", "1")]);
    let mut page = Odd::default();

    let report = binder.bind(&mut page, &mut ctx).await;

    assert!(report.is_ok());
    assert_eq!(skipped(&report, "count"), Some(SkipReason::Unresolvable));
    assert_eq!(skipped(&report, "auditor"), Some(SkipReason::NoDeclaredType));
    // Comment is a model type, but the lookup service does not know it.
    assert_eq!(skipped(&report, "comment"), Some(SkipReason::Unresolvable));
    assert!(page.count.is_none());
    assert_eq!(ctx.route().len(), 3);
}

#[tokio::test]
async fn test_absent_route_value_is_silent() {
    let binder = binder();
    let mut ctx = context(&[("post", "1")]);
    let mut page = ShowPost::default();

    let report = binder.bind(&mut page, &mut ctx).await;

    assert!(report.is_ok());
    assert_eq!(skipped(&report, "author"), Some(SkipReason::NoRouteValue));
    assert!(page.author.is_none());
    assert!(page.post.is_some());
}

#[tokio::test]
async fn test_identity_strategy_ignores_marker_column() {
    let config = BinderConfig::default().strategy(LookupStrategy::Identity);
    let binder = Binder::with_config(lookup(), config);
    let mut ctx = context(&[("author", "2")]);
    let mut page = ShowPost::default();

    binder.bind(&mut page, &mut ctx).await.into_result().unwrap();

    assert_eq!(
        page.author.as_deref().map(|u| u.email.as_str()),
        Some("b@example.com")
    );
}

#[tokio::test]
async fn test_custom_ignore_list() {
    let config = BinderConfig::default().ignore("post");
    let binder = Binder::with_config(lookup(), config);
    let mut ctx = context(&[("post", "1"), ("author", "a@example.com")]);
    let mut page = ShowPost::default();

    let report = binder.bind(&mut page, &mut ctx).await;

    assert_eq!(skipped(&report, "post"), Some(SkipReason::Ignored));
    assert_eq!(report.bound_fields(), vec!["author"]);
}

#[test]
fn test_assign_rejects_wrong_model_type() {
    let mut page = ShowPost::default();
    let wrong: autobind::ModelInstance = Arc::new(Comment {
        id: 1,
        body: "x".into(),
    });

    let err = page.assign("post", wrong).unwrap_err();
    assert!(matches!(err, BindError::TypeMismatch { .. }));

    let err = page.assign("title", Arc::new(1_i64)).unwrap_err();
    assert!(matches!(err, BindError::UnknownField { .. }));
}
