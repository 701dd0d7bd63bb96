//! Service tests against the in-memory port adapters

use core_kernel::{OperationMetadata, PortError, RetailerId, SkuId, StockHolder, StockMeasure};
use domain_allocation::{AllocationError, AllocationService, SessionStatus, VerificationSession, WorkflowConfig};
use domain_liquidation::{
    DistributorUpdate, LiquidationError, LiquidationService, PortfolioEdit, ScopeFilter,
};
use rust_decimal_macros::dec;
use std::sync::Arc;
use test_utils::*;

fn liquidation_service(port: Arc<InMemoryLiquidationPort>) -> LiquidationService {
    LiquidationService::new(port, EngineFixtures::calculator())
}

// ============================================================================
// Liquidation service
// ============================================================================

mod liquidation_service_tests {
    use super::*;

    #[tokio::test]
    async fn test_load_applies_scope_filter() {
        init_test_tracing();
        let port = Arc::new(InMemoryLiquidationPort::new(SeedFixtures::west_zone()));
        let service = liquidation_service(port);

        let portfolio = service
            .load_and_recompute(&ScopeFilter::all().territory("nashik"), None)
            .await
            .unwrap();

        assert_eq!(portfolio.len(), 2);
        assert_eq!(portfolio.portfolio().opening_stock().volume, dec!(300));
        assert_conserved(portfolio.portfolio());
    }

    #[tokio::test]
    async fn test_update_persists_new_revision() {
        init_test_tracing();
        let port = Arc::new(InMemoryLiquidationPort::new(SeedFixtures::west_zone()));
        let service = liquidation_service(port.clone());
        let mut portfolio = service.load_and_recompute(&ScopeFilter::all(), None).await.unwrap();
        let id = portfolio.distributors()[0].id();

        let outcome = service
            .update_and_persist(
                &mut portfolio,
                id,
                DistributorUpdate::default().liquidation(StockMeasure::new(dec!(60), dec!(30))),
                Some(OperationMetadata::with_correlation_id("req-1")),
            )
            .await
            .unwrap();

        let saved = port.saved(id).unwrap();
        assert_eq!(saved.revision, 2);
        assert_eq!(saved.tuple, *outcome.record.tuple());
        assert_eq!(saved.tuple.liquidation_percentage(), 50);
    }

    #[tokio::test]
    async fn test_stale_revision_is_rejected() {
        init_test_tracing();
        let port = Arc::new(InMemoryLiquidationPort::new(SeedFixtures::west_zone()));
        let service = liquidation_service(port.clone());

        let mut fresh = service.load_and_recompute(&ScopeFilter::all(), None).await.unwrap();
        let stale = service.load_and_recompute(&ScopeFilter::all(), None).await.unwrap();
        let id = fresh.distributors()[0].id();

        service
            .update_and_persist(
                &mut fresh,
                id,
                DistributorUpdate::default().liquidation(StockMeasure::new(dec!(40), dec!(20))),
                None,
            )
            .await
            .unwrap();

        let error = service.save_portfolio(&stale, None).await.unwrap_err();
        assert!(matches!(error, LiquidationError::Port(PortError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_cascade_persists_adjusted_distributors() {
        init_test_tracing();
        let port = Arc::new(InMemoryLiquidationPort::new(SeedFixtures::west_zone()));
        let service = liquidation_service(port.clone());
        let mut portfolio = service.load_and_recompute(&ScopeFilter::all(), None).await.unwrap();

        let report = service
            .cascade_and_persist(
                &mut portfolio,
                PortfolioEdit::default().period_sales(StockMeasure::new(dec!(300), dec!(150))),
                None,
            )
            .await
            .unwrap();

        assert_eq!(report.adjusted.len(), 3);
        assert_eq!(port.saved_count(), 3);
        for id in &report.adjusted {
            assert_eq!(port.saved(*id).unwrap().revision, 2);
        }
    }

    #[tokio::test]
    async fn test_transient_load_failure_surfaces() {
        let port = Arc::new(InMemoryLiquidationPort::new(SeedFixtures::west_zone()));
        port.fail_next_call();
        let service = liquidation_service(port);

        let error = service.load_and_recompute(&ScopeFilter::all(), None).await.unwrap_err();
        match error {
            LiquidationError::Port(e) => assert!(e.is_transient()),
            other => panic!("unexpected error: {other}"),
        }
    }
}

// ============================================================================
// Allocation service
// ============================================================================

mod allocation_service_tests {
    use super::*;

    fn session_with_sale() -> (VerificationSession, SkuId) {
        let mut session = VerificationSession::new(
            StockHolder::Retailer(RetailerId::new()),
            DirectoryFixtures::retailers(),
            WorkflowConfig::default(),
        );

        let observation = SkuObservationBuilder::new().with_prior(dec!(80)).decreased_by(dec!(50)).build();
        let sku = observation.sku_id;
        session.observe(observation).unwrap();
        session.set_farmer_amount(sku, dec!(30)).unwrap();
        session.add_retailer_allocation_by_name(sku, "RetailerX", dec!(20)).unwrap();
        (session, sku)
    }

    #[tokio::test]
    async fn test_submit_persists_and_closes_session() {
        init_test_tracing();
        let port = Arc::new(InMemoryTransferPort::new());
        let service = AllocationService::new(port.clone());
        let (mut session, sku) = session_with_sale();

        let submission = service.submit_and_persist(&mut session, None).await.unwrap();

        assert_eq!(session.status(), SessionStatus::Submitted);
        assert!(port.contains(session.id()));
        assert_submission_well_formed(&submission);
        assert_eq!(submission.liquidated_volume_for(sku), dec!(30));
        assert_eq!(submission.transferred_volume(), dec!(20));
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_session_open() {
        init_test_tracing();
        let port = Arc::new(InMemoryTransferPort::new());
        port.fail_next_call();
        let service = AllocationService::new(port.clone());
        let (mut session, _) = session_with_sale();

        let error = service.submit_and_persist(&mut session, None).await.unwrap_err();
        assert!(matches!(error, AllocationError::Port(ref e) if e.is_transient()));
        assert_eq!(session.status(), SessionStatus::Open);
        assert!(port.submissions().is_empty());

        service.submit_and_persist(&mut session, None).await.unwrap();
        assert_eq!(port.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_session_never_reaches_port() {
        let port = Arc::new(InMemoryTransferPort::new());
        let service = AllocationService::new(port.clone());
        let mut session = VerificationSession::new(
            StockHolder::Retailer(RetailerId::new()),
            DirectoryFixtures::retailers(),
            WorkflowConfig::default(),
        );
        session
            .observe(SkuObservationBuilder::new().decreased_by(dec!(10)).build())
            .unwrap();

        let error = service.submit_and_persist(&mut session, None).await.unwrap_err();
        assert!(matches!(error, AllocationError::IncompleteAllocation { .. }));
        assert!(port.submissions().is_empty());
    }
}
