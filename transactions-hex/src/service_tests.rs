//! TransactionService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use transactions_types::{
        AppError, CreateTransactionRequest, CurrencyPair, ExchangeError, ExchangeRateProvider,
        ExchangeRateQuote, HealthStatus, NewTransaction, RepoError, Transaction, TransactionId,
        TransactionRepository,
    };

    use crate::TransactionService;
    use crate::service::{RATES_COMPONENT, STORE_COMPONENT};

    /// Simple in-memory repository for testing the service layer.
    #[derive(Default)]
    pub struct MockRepo {
        transactions: Mutex<HashMap<TransactionId, Transaction>>,
        pub fail: AtomicBool,
    }

    impl MockRepo {
        pub fn new() -> Self {
            Self::default()
        }

        fn check(&self) -> Result<(), RepoError> {
            if self.fail.load(Ordering::SeqCst) {
                Err(RepoError::Database("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl TransactionRepository for MockRepo {
        async fn create(&self, new: NewTransaction) -> Result<Transaction, RepoError> {
            self.check()?;
            let tx = new.into_transaction(TransactionId::new());
            self.transactions.lock().unwrap().insert(tx.id, tx.clone());
            Ok(tx)
        }

        async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, RepoError> {
            self.check()?;
            Ok(self.transactions.lock().unwrap().get(&id).cloned())
        }

        async fn ping(&self) -> Result<(), RepoError> {
            self.check()
        }
    }

    /// Rate provider with a fixed answer that counts its calls.
    pub struct MockRates {
        rate: Option<Decimal>,
        pub calls: AtomicUsize,
        pub last_date: Mutex<Option<NaiveDate>>,
    }

    impl MockRates {
        pub fn with_rate(rate: Decimal) -> Self {
            Self {
                rate: Some(rate),
                calls: AtomicUsize::new(0),
                last_date: Mutex::new(None),
            }
        }

        pub fn unavailable() -> Self {
            Self {
                rate: None,
                calls: AtomicUsize::new(0),
                last_date: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeRateProvider for MockRates {
        async fn get_rate(
            &self,
            currency: &CurrencyPair,
            date: NaiveDate,
        ) -> Result<ExchangeRateQuote, ExchangeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_date.lock().unwrap() = Some(date);
            match self.rate {
                Some(rate) => Ok(ExchangeRateQuote::new(currency.clone(), date, date, rate)),
                None => Err(ExchangeError::Upstream("Treasury API returned 404".into())),
            }
        }

        async fn health(&self) -> Result<(), ExchangeError> {
            match self.rate {
                Some(_) => Ok(()),
                None => Err(ExchangeError::Timeout),
            }
        }
    }

    fn service(rates: MockRates) -> TransactionService<MockRepo, MockRates> {
        TransactionService::new(MockRepo::new(), rates)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn request(amount: Decimal) -> CreateTransactionRequest {
        CreateTransactionRequest::new("New keyboard for home office", date("2024-08-20"), amount)
    }

    #[tokio::test]
    async fn test_store_transaction_rounds_amount() {
        let service = service(MockRates::with_rate(dec!(1)));

        let created = service.store_transaction(request(dec!(12.345))).await.unwrap();
        let stored = service.repo().get(created.id).await.unwrap().unwrap();

        assert_eq!(stored.purchase_amount, dec!(12.35));
        assert_eq!(stored.description, "New keyboard for home office");
    }

    #[tokio::test]
    async fn test_store_transaction_collects_all_errors() {
        let service = service(MockRates::with_rate(dec!(1)));
        let req = CreateTransactionRequest::new("x".repeat(51), date("2999-01-01"), dec!(-5));

        let Err(AppError::Validation(errors)) = service.store_transaction(req).await else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("description"), Some("size must be between 0 and 50"));
        assert_eq!(
            errors.get("transactionDate"),
            Some("must be a date in the past or in the present")
        );
        assert_eq!(errors.get("purchaseAmount"), Some("must be greater than 0"));
    }

    #[tokio::test]
    async fn test_retention_window_rejects_old_dates() {
        let service =
            TransactionService::new(MockRepo::new(), MockRates::with_rate(dec!(1)))
                .with_retention_days(Some(30));

        let Err(AppError::Validation(errors)) =
            service.store_transaction(request(dec!(10))).await
        else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("transactionDate"), Some("must be within the last 30 days"));
    }

    #[tokio::test]
    async fn test_store_transaction_repo_failure_is_internal() {
        let service = service(MockRates::with_rate(dec!(1)));
        service.repo().fail.store(true, Ordering::SeqCst);

        let result = service.store_transaction(request(dec!(10))).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_converted_amount_is_rounded_half_up() {
        let service = service(MockRates::with_rate(dec!(5.5)));
        let id = service.store_transaction(request(dec!(150.75))).await.unwrap().id;

        let view = service
            .get_converted_transaction(id, Some("Brazil-Real"))
            .await
            .unwrap();

        assert_eq!(view.id, id);
        assert_eq!(view.original_purchase_amount, dec!(150.75));
        assert_eq!(view.exchange_rate, dec!(5.5));
        assert_eq!(view.converted_amount, dec!(829.13));
        assert_eq!(*service.rates().last_date.lock().unwrap(), Some(date("2024-08-20")));
    }

    #[tokio::test]
    async fn test_missing_currency_uses_rate_one() {
        let service = service(MockRates::unavailable());
        let id = service.store_transaction(request(dec!(100))).await.unwrap().id;

        for currency in [None, Some(""), Some("   ")] {
            let view = service.get_converted_transaction(id, currency).await.unwrap();
            assert_eq!(view.exchange_rate, Decimal::ONE);
            assert_eq!(view.converted_amount, dec!(100));
        }
        assert_eq!(service.rates().calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_transaction_is_not_found() {
        let service = service(MockRates::with_rate(dec!(5.5)));
        let id = TransactionId::new();

        let Err(AppError::NotFound(msg)) = service
            .get_converted_transaction(id, Some("Brazil-Real"))
            .await
        else {
            panic!("expected not found");
        };
        assert_eq!(msg, format!("Transaction not found with id: {}", id));
        assert_eq!(service.rates().calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_currency_is_bad_request() {
        let service = service(MockRates::with_rate(dec!(5.5)));

        for currency in ["Brazil-</Real>", "BrazilReal", "-Real", "Brazil-"] {
            let result = service
                .get_converted_transaction(TransactionId::new(), Some(currency))
                .await;
            let Err(AppError::BadRequest(msg)) = result else {
                panic!("expected bad request for {:?}", currency);
            };
            assert_eq!(
                msg,
                "Currency format is invalid or contains prohibited characters."
            );
        }
        assert_eq!(service.rates().calls(), 0);
    }

    #[tokio::test]
    async fn test_unavailable_rate_is_business_error() {
        let service = service(MockRates::unavailable());
        let id = service.store_transaction(request(dec!(100))).await.unwrap().id;

        let err = service
            .get_converted_transaction(id, Some("Brazil-Real"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RateUnavailable { .. }));
        assert_eq!(err.to_string(), "Could not retrieve exchange rates for Brazil-Real");
    }

    #[tokio::test]
    async fn test_health_reports_each_component() {
        let healthy = service(MockRates::with_rate(dec!(1)));
        let report = healthy.health().await;
        assert_eq!(report.status, HealthStatus::Up);
        assert_eq!(report.components[STORE_COMPONENT], HealthStatus::Up);
        assert_eq!(report.components[RATES_COMPONENT], HealthStatus::Up);

        let degraded = service(MockRates::unavailable());
        let report = degraded.health().await;
        assert_eq!(report.status, HealthStatus::Down);
        assert_eq!(report.components[STORE_COMPONENT], HealthStatus::Up);
        assert_eq!(report.components[RATES_COMPONENT], HealthStatus::Down);
    }
}
