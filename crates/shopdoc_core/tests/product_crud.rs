use rust_decimal::Decimal;
use shopdoc_core::db::open_db_in_memory;
use shopdoc_core::{
    DocumentFilter, DocumentStore, PageRequest, Product, ProductRepository, ProductService,
    RepoError, ServiceError, SqliteProductStore, ValidationError,
};

fn vw_beetle() -> Product {
    Product::new("VW", "Beetle", Decimal::new(10099999, 2))
}

fn mercedes_vito() -> Product {
    Product::new("Mercedes-Benz", "Vito", Decimal::new(4500000, 2)).with_description("van")
}

#[test]
fn create_assigns_id_and_version_zero() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let created = service.create(&vw_beetle()).unwrap();

    assert!(created.id.as_deref().is_some_and(|id| !id.is_empty()));
    assert_eq!(created.version, Some(0));
    assert!(!created.removed);
    assert_eq!(created.price, Decimal::new(10099999, 2));
}

#[test]
fn create_rejects_caller_supplied_id() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let mut product = vw_beetle();
    product.id = Some("mine".to_string());

    let err = service.create(&product).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ValidationFailure(ValidationError::IdOnCreate(id)) if id == "mine"
    ));
}

#[test]
fn create_rejects_invalid_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let nameless = Product::new("VW", "", Decimal::ONE);
    assert!(matches!(
        service.create(&nameless).unwrap_err(),
        ServiceError::ValidationFailure(ValidationError::BlankField("name"))
    ));

    let negative = Product::new("VW", "Beetle", Decimal::new(-5, 0));
    assert!(matches!(
        service.create(&negative).unwrap_err(),
        ServiceError::ValidationFailure(ValidationError::NegativePrice(_))
    ));
}

#[test]
fn update_then_stale_resubmit_conflicts() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let created = service.create(&vw_beetle()).unwrap();
    assert_eq!(created.version, Some(0));

    let mut repriced = created.clone();
    repriced.price = Decimal::new(999, 0);
    let updated = service.update(&repriced).unwrap();
    assert_eq!(updated.version, Some(1));
    assert_eq!(updated.price, Decimal::new(999, 0));
    assert_eq!(updated.id, created.id);

    let err = service.update(&repriced).unwrap_err();
    match err {
        ServiceError::VersionConflict { id, version } => {
            assert_eq!(Some(id), created.id);
            assert_eq!(version, 0);
        }
        other => panic!("unexpected error: {other}"),
    }

    let stored = service.get_by_id(created.id.as_deref().unwrap()).unwrap();
    assert_eq!(stored.version, Some(1));
    assert_eq!(stored.price, Decimal::new(999, 0));
}

#[test]
fn version_grows_by_one_per_successful_update() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let mut current = service.create(&vw_beetle()).unwrap();
    for round in 1..=10_u64 {
        let previous = current.version.unwrap();
        current.name = format!("Beetle mk{round}");
        current = service.update(&current).unwrap();
        assert_eq!(current.version, Some(previous + 1));
    }

    let stored = service.get_by_id(current.id.as_deref().unwrap()).unwrap();
    assert_eq!(stored.version, Some(10));
    assert_eq!(stored.name, "Beetle mk10");
}

#[test]
fn update_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let mut ghost = vw_beetle();
    ghost.id = Some("999".to_string());
    ghost.version = Some(999);

    let err = service.update(&ghost).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(id) if id == "999"));
}

#[test]
fn update_without_id_or_version_is_validation_failure() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let err = service.update(&vw_beetle()).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ValidationFailure(ValidationError::MissingId)
    ));

    let mut created = service.create(&vw_beetle()).unwrap();
    created.version = None;
    let err = service.update(&created).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ValidationFailure(ValidationError::MissingVersion)
    ));
}

#[test]
fn get_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    assert!(matches!(
        service.get_by_id("???").unwrap_err(),
        ServiceError::NotFound(id) if id == "???"
    ));
}

#[test]
fn soft_delete_hides_from_list_but_not_from_get() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let beetle = service.create(&vw_beetle()).unwrap();
    let vito = service.create(&mercedes_vito()).unwrap();
    let beetle_id = beetle.id.clone().unwrap();

    service.delete(&beetle_id).unwrap();

    let listed = service.list(Some(0), Some(100)).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, vito.id);

    let fetched = service.get_by_id(&beetle_id).unwrap();
    assert!(fetched.removed);
    assert_eq!(fetched.version, Some(0));
    assert_eq!(fetched.id, beetle.id);
}

#[test]
fn soft_delete_is_repeatable_and_ignores_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let beetle = service.create(&vw_beetle()).unwrap();
    let id = beetle.id.clone().unwrap();

    service.delete(&id).unwrap();
    service.delete(&id).unwrap();
    service.delete("never-existed").unwrap();

    assert!(service.get_by_id(&id).unwrap().removed);
}

#[test]
fn removed_product_can_still_be_updated() {
    let conn = open_db_in_memory().unwrap();
    let service = ProductService::new(SqliteProductStore::try_new(&conn).unwrap());

    let beetle = service.create(&vw_beetle()).unwrap();
    service.delete(beetle.id.as_deref().unwrap()).unwrap();

    let mut edit = beetle.clone();
    edit.description = Some("discontinued".to_string());
    let updated = service.update(&edit).unwrap();

    assert_eq!(updated.version, Some(1));
    assert_eq!(updated.description.as_deref(), Some("discontinued"));
    // Ordinary updates never write the flag back.
    assert!(updated.removed);
    assert!(service.list(Some(0), Some(10)).unwrap().is_empty());
}

#[test]
fn update_payload_cannot_clear_removed_flag() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProductStore::try_new(&conn).unwrap();
    let repo = ProductRepository::new(store);

    let beetle = repo.create(&vw_beetle()).unwrap();
    repo.delete(beetle.id.as_deref().unwrap()).unwrap();

    let mut resurrect = beetle.clone();
    resurrect.removed = false;
    let updated = repo.update(&resurrect).unwrap();
    assert!(updated.removed);
}

#[test]
fn repository_distinguishes_not_found_from_conflict() {
    let conn = open_db_in_memory().unwrap();
    let repo = ProductRepository::new(SqliteProductStore::try_new(&conn).unwrap());

    let created = repo.create(&vw_beetle()).unwrap();

    let mut stale = created.clone();
    stale.version = Some(7);
    assert!(matches!(
        repo.update(&stale).unwrap_err(),
        RepoError::VersionConflict { version: 7, .. }
    ));

    let mut missing = created.clone();
    missing.id = Some("missing".to_string());
    assert!(matches!(
        repo.update(&missing).unwrap_err(),
        RepoError::NotFound(id) if id == "missing"
    ));
}

#[test]
fn conditional_update_reports_no_match_without_reason() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProductStore::try_new(&conn).unwrap();

    let stored = store.insert(&vw_beetle()).unwrap();

    let mut unknown = stored.clone();
    unknown.id = Some("nope".to_string());
    assert!(store.conditional_update(&unknown).unwrap().is_none());

    let mut stale = stored.clone();
    stale.version = Some(5);
    assert!(store.conditional_update(&stale).unwrap().is_none());

    let applied = store.conditional_update(&stored).unwrap().unwrap();
    assert_eq!(applied.version, Some(1));
}

#[test]
fn store_insert_honours_preassigned_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteProductStore::try_new(&conn).unwrap();

    let mut product = vw_beetle();
    product.id = Some("import-1".to_string());
    product.version = Some(42);
    product.removed = true;

    let stored = store.insert(&product).unwrap();
    assert_eq!(stored.id.as_deref(), Some("import-1"));
    assert_eq!(stored.version, Some(0));
    assert!(!stored.removed);

    let page = PageRequest::new(0, 10).unwrap();
    let listed = store.find_page(&DocumentFilter::all(), &page).unwrap();
    assert_eq!(listed.len(), 1);
}
