//! In-memory repository tests.

#[cfg(test)]
mod tests {
    use recorder_types::{
        Currency, CurrencyId, RepoError, Repository, RepositoryFactory, Statement, UniqueField,
        User, UserId,
    };

    use crate::MemoryRepo;

    fn currency(name: &str, symbol: &str) -> Currency {
        Currency::new(name.to_string(), symbol.to_string(), UserId::new(1)).unwrap()
    }

    async fn seeded(currencies: &[Currency]) -> MemoryRepo {
        let repo = MemoryRepo::new();
        let mut uow = repo.begin().await.unwrap();
        for c in currencies {
            uow.add_currency(c).await.unwrap();
        }
        uow.commit().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_staged_add_invisible_until_commit() {
        let repo = MemoryRepo::new();
        let euro = currency("Euro", "EUR");

        let mut writer = repo.begin().await.unwrap();
        writer.add_currency(&euro).await.unwrap();

        let mut reader = repo.begin().await.unwrap();
        assert!(reader.find_currency(euro.id).await.unwrap().is_none());

        writer.commit().await.unwrap();
        assert_eq!(reader.find_currency(euro.id).await.unwrap(), Some(euro));
    }

    #[tokio::test]
    async fn test_reads_see_own_staged_writes() {
        let repo = seeded(&[currency("Euro", "EUR")]).await;
        let dollar = currency("Dollar", "USD");

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&dollar).await.unwrap();

        assert_eq!(uow.list_currencies().await.unwrap().len(), 2);
        assert!(uow.find_currency(dollar.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let euro = currency("Euro", "EUR");
        let repo = seeded(std::slice::from_ref(&euro)).await;

        {
            let mut uow = repo.begin().await.unwrap();
            uow.remove_currency(euro.id).await.unwrap();
            assert!(uow.find_currency(euro.id).await.unwrap().is_none());
        }

        let mut uow = repo.begin().await.unwrap();
        assert!(uow.find_currency(euro.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_mark_modified_replaces_fields() {
        let euro = currency("Euro", "EUR");
        let repo = seeded(std::slice::from_ref(&euro)).await;

        let mut changed = euro.clone();
        changed.name = "Euro Coin".to_string();
        changed.audit.touch(UserId::new(2));

        let mut uow = repo.begin().await.unwrap();
        uow.mark_currency_modified(&changed).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        let stored = uow.find_currency(euro.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Euro Coin");
        assert_eq!(stored.audit.created_on, euro.audit.created_on);
        assert_eq!(stored.audit.updated_by, UserId::new(2));
    }

    #[tokio::test]
    async fn test_mark_modified_missing_is_not_found() {
        let repo = MemoryRepo::new();
        let mut uow = repo.begin().await.unwrap();

        let result = uow.mark_currency_modified(&currency("Euro", "EUR")).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_remove_missing_is_not_found() {
        let repo = MemoryRepo::new();
        let mut uow = repo.begin().await.unwrap();

        assert!(matches!(
            uow.remove_currency(CurrencyId::new()).await,
            Err(RepoError::NotFound)
        ));
        assert!(matches!(
            uow.remove_statement(recorder_types::StatementId::new()).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected_at_commit() {
        let repo = seeded(&[currency("Euro", "EUR")]).await;

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&currency(" euro ", "EU2")).await.unwrap();
        let result = uow.commit().await;

        assert!(matches!(
            result,
            Err(RepoError::UniqueViolation(UniqueField::CurrencyName))
        ));

        let mut uow = repo.begin().await.unwrap();
        assert_eq!(uow.list_currencies().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_symbol_rejected_at_commit() {
        let repo = seeded(&[currency("Euro", "EUR")]).await;

        let mut uow = repo.begin().await.unwrap();
        uow.add_currency(&currency("Other", "eur")).await.unwrap();

        assert!(matches!(
            uow.commit().await,
            Err(RepoError::UniqueViolation(UniqueField::CurrencySymbol))
        ));
    }

    #[tokio::test]
    async fn test_statements_survive_currency_removal() {
        let euro = currency("Euro", "EUR");
        let repo = seeded(std::slice::from_ref(&euro)).await;
        let statement = Statement::new("Wallet".to_string(), euro.id, UserId::new(1)).unwrap();

        let mut uow = repo.begin().await.unwrap();
        uow.add_statement(&statement).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        uow.remove_currency(euro.id).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        let stored = uow.find_statement(statement.id).await.unwrap().unwrap();
        assert_eq!(stored.currency_id, euro.id);
    }

    #[tokio::test]
    async fn test_with_users_and_add_user() {
        let repo = MemoryRepo::with_users([User::new(UserId::new(1), "Finch")]).await;

        let mut uow = repo.begin().await.unwrap();
        assert_eq!(
            uow.find_user(UserId::new(1)).await.unwrap().unwrap().name,
            "Finch"
        );
        assert!(uow.add_user(&User::new(UserId::new(1), "Again")).await.is_err());

        uow.add_user(&User::new(UserId::new(2), "Shaw")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = repo.begin().await.unwrap();
        assert_eq!(uow.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_overlong_name_refused_like_sql_check() {
        let mut euro = currency("Euro", "EUR");
        let repo = seeded(std::slice::from_ref(&euro)).await;

        euro.name = "x".repeat(recorder_types::MAX_NAME_LEN + 1);
        let mut uow = repo.begin().await.unwrap();
        let result = uow.mark_currency_modified(&euro).await;
        assert!(matches!(result, Err(RepoError::Domain(_))));
        drop(uow);

        let mut uow = repo.begin().await.unwrap();
        let stored = uow.find_currency(euro.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Euro");
    }
}
