//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use recorder_types::{
        Currency, CurrencyId, RepoError, Repository, RepositoryFactory, Statement, StatementId,
        UniqueField, User, UserId,
    };

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn currency(name: &str, symbol: &str) -> Currency {
        Currency::new(name.to_string(), symbol.to_string(), UserId::new(1)).unwrap()
    }

    #[tokio::test]
    async fn test_add_and_find_currency() {
        let repo = setup_repo().await;
        let euro = currency("Euro", "EUR");

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&euro).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        let fetched = uow.find_currency(euro.id).await.unwrap().unwrap();

        assert_eq!(fetched, euro);
    }

    #[tokio::test]
    async fn test_find_currency_not_found() {
        let repo = setup_repo().await;

        let mut uow = repo.begin().await.unwrap();
        let result = uow.find_currency(CurrencyId::new()).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_uncommitted_work_rolls_back() {
        let repo = setup_repo().await;
        let euro = currency("Euro", "EUR");

        {
            let mut uow = repo.begin().await.unwrap();
            uow.add_currency(&euro).await.unwrap();
            assert_eq!(uow.list_currencies().await.unwrap().len(), 1);
        }

        let mut uow = repo.begin().await.unwrap();
        assert!(uow.list_currencies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unique_index_on_trimmed_lowercase_name() {
        let repo = setup_repo().await;

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&currency("Euro", "EUR")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        let result = uow.add_currency(&currency("  EURO ", "EU2")).await;

        assert!(matches!(
            result,
            Err(RepoError::UniqueViolation(UniqueField::CurrencyName))
        ));
    }

    #[tokio::test]
    async fn test_unique_index_on_symbol() {
        let repo = setup_repo().await;

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&currency("Euro", "EUR")).await.unwrap();
        let result = uow.add_currency(&currency("Other", "eur")).await;

        assert!(matches!(
            result,
            Err(RepoError::UniqueViolation(UniqueField::CurrencySymbol))
        ));
    }

    #[tokio::test]
    async fn test_mark_modified_keeps_creation_audit() {
        let repo = setup_repo().await;
        let euro = currency("Euro", "EUR");

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&euro).await.unwrap();
        uow.commit().await.unwrap();

        let mut changed = euro.clone();
        changed.symbol = "€".to_string();
        changed.audit.touch(UserId::new(3));

        let mut uow = repo.begin().await.unwrap();
        uow.mark_currency_modified(&changed).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        let stored = uow.find_currency(euro.id).await.unwrap().unwrap();
        assert_eq!(stored.symbol, "€");
        assert_eq!(stored.audit.created_by, UserId::new(1));
        assert_eq!(stored.audit.created_on, euro.audit.created_on);
        assert_eq!(stored.audit.updated_by, UserId::new(3));
    }

    #[tokio::test]
    async fn test_mark_modified_missing_is_not_found() {
        let repo = setup_repo().await;

        let mut uow = repo.begin().await.unwrap();
        let result = uow.mark_currency_modified(&currency("Euro", "EUR")).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let repo = setup_repo().await;

        let mut uow = repo.begin().await.unwrap();

        assert!(matches!(
            uow.remove_statement(StatementId::new()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_statement_round_trip_and_orphaning() {
        let repo = setup_repo().await;
        let euro = currency("Euro", "EUR");
        let statement = Statement::new("Wallet".to_string(), euro.id, UserId::new(2)).unwrap();

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&euro).await.unwrap();
        uow.add_statement(&statement).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        uow.remove_currency(euro.id).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        let stored = uow.find_statement(statement.id).await.unwrap().unwrap();
        assert_eq!(stored, statement);
        assert_eq!(uow.list_statements().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_users() {
        let repo = setup_repo().await;

        let mut uow = repo.begin().await.unwrap();
        uow.add_user(&User::new(UserId::new(1), "Finch")).await.unwrap();
        uow.add_user(&User::new(UserId::new(2), "Shaw")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        let finch = uow.find_user(UserId::new(1)).await.unwrap().unwrap();
        assert_eq!(finch.name, "Finch");
        assert!(uow.find_user(UserId::new(9)).await.unwrap().is_none());
        assert_eq!(uow.list_users().await.unwrap().len(), 2);
    }
}
