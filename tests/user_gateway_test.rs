use anyhow::Result;
use art_gateway::users::{
    user_gateway_port, GatewayFactory, RecordTableUserGateway, User, UserGateway,
};
use art_gateway::{synthesize, RecordTable};
use std::sync::Arc;
use tempfile::TempDir;

const USERS: &str = r#"[
    {"id": 1, "full_name": "Luke Morton", "biography": "He/Him", "email": "luke@example.com"},
    {"id": 3, "full_name": "Grace Hopper", "email": "grace@example.com"},
    {"id": 4, "full_name": "Alan Turing", "biography": null, "email": "alan@example.com"}
]"#;

fn factory() -> Result<GatewayFactory> {
    Ok(GatewayFactory::new(RecordTable::from_json_str("users", USERS)?))
}

#[test]
fn test_find_by_id_wraps_record_into_user() -> Result<()> {
    let users = factory()?.record_table_user_gateway()?;

    let user = users.find_by_id(1)?.expect("user 1 exists");

    assert_eq!(user.full_name, "Luke Morton");
    assert_eq!(user.biography.as_deref(), Some("He/Him"));
    assert_eq!(user, User::new("Luke Morton", Some("He/Him")));
    Ok(())
}

#[test]
fn test_missing_user_is_none() -> Result<()> {
    let users = factory()?.record_table_user_gateway()?;

    assert_eq!(users.find_by_id(2)?, None);
    assert_eq!(users.find_by_email("nobody@example.com")?, None);
    Ok(())
}

#[test]
fn test_partial_record_leaves_field_default() -> Result<()> {
    let users = factory()?.record_table_user_gateway()?;

    let grace = users
        .find_by_email("grace@example.com")?
        .expect("grace exists");

    assert_eq!(grace.full_name, "Grace Hopper");
    assert_eq!(grace.biography, None);
    Ok(())
}

#[test]
fn test_null_column_wraps_into_user() -> Result<()> {
    let users = factory()?.record_table_user_gateway()?;

    let alan = users.find_by_id(4)?.expect("user 4 exists");

    assert_eq!(alan, User::new("Alan Turing", None));
    Ok(())
}

#[test]
fn test_factory_reuses_synthesized_adapter_type() -> Result<()> {
    let factory = factory()?;

    let first = factory.record_table_user_gateway()?;
    let second = factory.record_table_user_gateway()?;

    assert!(first
        .adapter()
        .adapter_type()
        .same_type(second.adapter().adapter_type()));
    assert_eq!(factory.adapters().len(), 1);
    assert_eq!(first.find_by_id(1)?, second.find_by_id(1)?);
    Ok(())
}

#[test]
fn test_independent_synthesis_gives_equal_results() -> Result<()> {
    let table = Arc::new(RecordTable::from_json_str("users", USERS)?);
    let port = user_gateway_port()?;

    let first = UserGateway::new(
        synthesize::<RecordTableUserGateway>(&port)?.instantiate(Arc::clone(&table)),
    );
    let second = UserGateway::new(
        synthesize::<RecordTableUserGateway>(&port)?.instantiate(Arc::clone(&table)),
    );

    for id in [1, 2, 3, 4] {
        assert_eq!(first.find_by_id(id)?, second.find_by_id(id)?);
    }
    Ok(())
}

#[test]
fn test_records_loaded_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("users.json");
    std::fs::write(&path, USERS)?;

    let factory = GatewayFactory::new(RecordTable::from_json_file("users", &path)?);
    let users = factory.record_table_user_gateway()?;

    assert_eq!(factory.users().len(), 3);
    assert_eq!(
        users.find_by_email("luke@example.com")?,
        Some(User::new("Luke Morton", Some("He/Him")))
    );
    Ok(())
}
