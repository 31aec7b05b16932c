//! Integration tests for the managers over SQLite.
//!
//! These run the same operations as the unit tests against a real SQL
//! backend, where uniqueness is also backed by expression indexes.
//!
//! This test requires the `sqlite` feature flag.

#![cfg(feature = "sqlite")]

use recorder_engine::Managers;
use recorder_repo::SqliteRepo;
use recorder_types::{
    CreateCurrencyRequest, CreateStatementRequest, CurrencyId, CurrencySortBy, MAX_NAME_LEN,
    ManagerError, Paging, Repository, RepositoryFactory, Sort, UpdateCurrencyRequest,
    UpdateStatementRequest, User, UserId,
};

/// Helper to create managers over in-memory SQLite with three users.
async fn create_managers() -> Managers<SqliteRepo> {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();

    let mut uow = repo.begin().await.unwrap();
    for (id, name) in [(1, "Finch"), (2, "Shaw"), (3, "Reese")] {
        uow.add_user(&User::new(UserId::new(id), name)).await.unwrap();
    }
    uow.commit().await.unwrap();

    Managers::new(repo)
}

fn currency(name: &str, symbol: &str) -> CreateCurrencyRequest {
    CreateCurrencyRequest {
        name: name.to_string(),
        symbol: symbol.to_string(),
        created_by: UserId::new(1),
    }
}

#[tokio::test]
async fn test_duplicate_name_rejected() {
    let managers = create_managers().await;

    managers
        .currencies
        .create_currency(currency("Euro", "EUR"))
        .await
        .unwrap();
    let result = managers
        .currencies
        .create_currency(currency("euro ", "XXX"))
        .await;

    assert!(matches!(result, Err(ManagerError::DuplicateName(_))));
    assert_eq!(managers.currencies.get_currency_count("").await.unwrap(), 1);
}

#[tokio::test]
async fn test_name_length_limit_matches_schema() {
    let managers = create_managers().await;
    let euro = managers
        .currencies
        .create_currency(currency(&"é".repeat(MAX_NAME_LEN), "EUR"))
        .await
        .unwrap();

    let currency_result = managers
        .currencies
        .create_currency(currency(&"x".repeat(MAX_NAME_LEN + 1), "XXX"))
        .await;
    let statement_result = managers
        .statements
        .create_statement(CreateStatementRequest {
            name: "s".repeat(MAX_NAME_LEN + 1),
            currency_id: euro,
            created_by: UserId::new(2),
        })
        .await;

    assert!(matches!(currency_result, Err(ManagerError::InvalidArgument(_))));
    assert!(matches!(statement_result, Err(ManagerError::InvalidArgument(_))));
    assert_eq!(managers.currencies.get_currency_count("").await.unwrap(), 1);
    assert_eq!(managers.statements.get_statement_count("").await.unwrap(), 0);
}

#[tokio::test]
async fn test_count_and_last_page() {
    let managers = create_managers().await;
    for i in 1..=35i64 {
        managers
            .currencies
            .create_currency(CreateCurrencyRequest {
                name: format!("Currency_{i:02}"),
                symbol: format!("SB_{i:02}"),
                created_by: UserId::new(i % 3 + 1),
            })
            .await
            .unwrap();
    }

    assert_eq!(
        managers
            .currencies
            .get_currency_count("Currency_0")
            .await
            .unwrap(),
        9
    );

    let page = managers
        .currencies
        .get_currencies(
            "",
            Some(Sort::asc(CurrencySortBy::Name)),
            Some(Paging::new(4, 10).unwrap()),
        )
        .await
        .unwrap();

    assert_eq!(page.len(), 5);
    assert_eq!(page[0].name, "Currency_31");
    assert_eq!(page[4].name, "Currency_35");
    assert!(page.iter().all(|c| c.created_by.is_some()));
}

#[tokio::test]
async fn test_update_currency_self_and_audit() {
    let managers = create_managers().await;
    let id = managers
        .currencies
        .create_currency(currency("Euro", "EUR"))
        .await
        .unwrap();
    let before = managers
        .currencies
        .get_currencies("", None, None)
        .await
        .unwrap()
        .remove(0);

    managers
        .currencies
        .update_currency(UpdateCurrencyRequest {
            id,
            name: "Euro".to_string(),
            symbol: "€".to_string(),
            updated_by: UserId::new(3),
        })
        .await
        .unwrap();

    let after = managers
        .currencies
        .get_currencies("", None, None)
        .await
        .unwrap()
        .remove(0);
    assert_eq!(after.symbol, "€");
    assert_eq!(after.created_on, before.created_on);
    assert_eq!(after.created_by.as_deref(), Some("Finch"));
    assert_eq!(after.updated_by.as_deref(), Some("Reese"));
}

#[tokio::test]
async fn test_statement_lifecycle() {
    let managers = create_managers().await;
    let euro = managers
        .currencies
        .create_currency(currency("Euro", "EUR"))
        .await
        .unwrap();
    let dollar = managers
        .currencies
        .create_currency(currency("Dollar", "USD"))
        .await
        .unwrap();

    let missing = managers
        .statements
        .create_statement(CreateStatementRequest {
            name: "Wallet".to_string(),
            currency_id: CurrencyId::new(),
            created_by: UserId::new(2),
        })
        .await;
    assert!(matches!(missing, Err(ManagerError::CurrencyNotFound(_))));

    let id = managers
        .statements
        .create_statement(CreateStatementRequest {
            name: "Wallet".to_string(),
            currency_id: euro,
            created_by: UserId::new(2),
        })
        .await
        .unwrap();

    managers
        .statements
        .update_statement(UpdateStatementRequest {
            id,
            name: "Wallet".to_string(),
            currency_id: dollar,
            updated_by: UserId::new(1),
        })
        .await
        .unwrap();

    let details = managers.statements.get_statement(id).await.unwrap();
    assert_eq!(details.currency.unwrap().symbol, "USD");

    managers.currencies.delete_currency(dollar).await.unwrap();
    let orphan = managers.statements.get_statement(id).await.unwrap();
    assert!(orphan.currency.is_none());

    managers.statements.delete_statement(id).await.unwrap();
    assert!(matches!(
        managers.statements.delete_statement(id).await,
        Err(ManagerError::StatementNotFound(_))
    ));
}
