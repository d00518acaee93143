//! Shared test utilities for tenet-db tests.

pub(crate) mod helpers {
    use crate::TenetDb;
    use crate::service::TenetService;

    /// Create an in-memory `TenetService`.
    pub async fn test_service() -> TenetService {
        let db = TenetDb::open_local(":memory:").await.unwrap();
        TenetService::from_db(db)
    }

    /// Seed a convention and a coding rule under it; returns (convention id,
    /// rule id). Most child-entity tests need this pair.
    pub async fn seed_rule(svc: &TenetService) -> (String, String) {
        let convention = svc
            .create_convention("Rust API guidelines", Some("House style for services"))
            .await
            .unwrap();
        let rule = svc
            .create_coding_rule(&tenet_core::commands::CodingRuleDraft {
                convention_id: convention.id.clone(),
                title: "Propagate errors with ?".to_string(),
                rationale: None,
            })
            .await
            .unwrap();
        (convention.id, rule.id)
    }
}
