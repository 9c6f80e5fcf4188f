//! Document-backed typed repositories.
//!
//! Each collection lives as one whole document per tenant ("templates",
//! "instances", "members", "transactions", "settings"). Every mutation is
//! a load, an in-memory edit of the typed records, and a save carrying the
//! loaded version - a stale save fails instead of clobbering a concurrent
//! write. Loosely-typed JSON turns into validated record types right here
//! at the boundary.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::foundation::{
    DomainError, ErrorCode, InstanceId, MemberId, TemplateId, TenantId, TenantSettings,
};
use crate::domain::instance::Instance;
use crate::domain::ledger::PointsTransaction;
use crate::domain::member::Member;
use crate::domain::template::Template;
use crate::ports::{
    DocumentStore, InstanceRepository, MemberRepository, SettingsRepository, TemplateRepository,
    TransactionLog,
};

const TEMPLATES_KEY: &str = "templates";
const INSTANCES_KEY: &str = "instances";
const MEMBERS_KEY: &str = "members";
const TRANSACTIONS_KEY: &str = "transactions";
const SETTINGS_KEY: &str = "settings";

/// Typed repositories over any whole-document store.
#[derive(Clone)]
pub struct DocumentRepositories {
    store: Arc<dyn DocumentStore>,
}

impl DocumentRepositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn load_collection<T: DeserializeOwned>(
        &self,
        tenant: &TenantId,
        key: &str,
    ) -> Result<(Vec<T>, Option<u64>), DomainError> {
        match self.store.load(tenant, key).await? {
            None => Ok((Vec::new(), None)),
            Some(doc) => {
                let items: Vec<T> = serde_json::from_value(doc.body).map_err(|e| {
                    DomainError::storage(format!("Corrupt '{}' collection: {}", key, e))
                })?;
                Ok((items, Some(doc.version)))
            }
        }
    }

    async fn save_collection<T: Serialize>(
        &self,
        tenant: &TenantId,
        key: &str,
        items: &[T],
        expected_version: Option<u64>,
    ) -> Result<(), DomainError> {
        let body = serde_json::to_value(items)
            .map_err(|e| DomainError::storage(format!("Failed to encode '{}': {}", key, e)))?;
        self.store.save(tenant, key, body, expected_version).await?;
        Ok(())
    }
}

#[async_trait]
impl TemplateRepository for DocumentRepositories {
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Template>, DomainError> {
        let (items, _) = self.load_collection(tenant, TEMPLATES_KEY).await?;
        Ok(items)
    }

    async fn find_by_id(
        &self,
        tenant: &TenantId,
        id: &TemplateId,
    ) -> Result<Option<Template>, DomainError> {
        let (items, _): (Vec<Template>, _) = self.load_collection(tenant, TEMPLATES_KEY).await?;
        Ok(items.into_iter().find(|t| t.id() == id))
    }

    async fn insert(&self, tenant: &TenantId, template: &Template) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Template>, _) =
            self.load_collection(tenant, TEMPLATES_KEY).await?;
        if items.iter().any(|t| t.id() == template.id()) {
            return Err(DomainError::conflict(format!(
                "Template {} already exists",
                template.id()
            )));
        }
        items.push(template.clone());
        self.save_collection(tenant, TEMPLATES_KEY, &items, version).await
    }

    async fn update(&self, tenant: &TenantId, template: &Template) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Template>, _) =
            self.load_collection(tenant, TEMPLATES_KEY).await?;
        match items.iter_mut().find(|t| t.id() == template.id()) {
            Some(slot) => *slot = template.clone(),
            None => {
                return Err(DomainError::new(
                    ErrorCode::TemplateNotFound,
                    format!("Template {} not found", template.id()),
                ))
            }
        }
        self.save_collection(tenant, TEMPLATES_KEY, &items, version).await
    }

    async fn delete(&self, tenant: &TenantId, id: &TemplateId) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Template>, _) =
            self.load_collection(tenant, TEMPLATES_KEY).await?;
        let before = items.len();
        items.retain(|t| t.id() != id);
        if items.len() == before {
            return Err(DomainError::new(
                ErrorCode::TemplateNotFound,
                format!("Template {} not found", id),
            ));
        }
        self.save_collection(tenant, TEMPLATES_KEY, &items, version).await
    }
}

#[async_trait]
impl InstanceRepository for DocumentRepositories {
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Instance>, DomainError> {
        let (items, _) = self.load_collection(tenant, INSTANCES_KEY).await?;
        Ok(items)
    }

    async fn list_by_template(
        &self,
        tenant: &TenantId,
        template_id: &TemplateId,
    ) -> Result<Vec<Instance>, DomainError> {
        let (items, _): (Vec<Instance>, _) = self.load_collection(tenant, INSTANCES_KEY).await?;
        Ok(items
            .into_iter()
            .filter(|i| i.template_id() == Some(template_id))
            .collect())
    }

    async fn find_by_id(
        &self,
        tenant: &TenantId,
        id: &InstanceId,
    ) -> Result<Option<Instance>, DomainError> {
        let (items, _): (Vec<Instance>, _) = self.load_collection(tenant, INSTANCES_KEY).await?;
        Ok(items.into_iter().find(|i| i.id() == id))
    }

    async fn insert(&self, tenant: &TenantId, instance: &Instance) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Instance>, _) =
            self.load_collection(tenant, INSTANCES_KEY).await?;
        if items.iter().any(|i| i.id() == instance.id()) {
            return Err(DomainError::conflict(format!(
                "Instance {} already exists",
                instance.id()
            )));
        }
        items.push(instance.clone());
        self.save_collection(tenant, INSTANCES_KEY, &items, version).await
    }

    async fn update(&self, tenant: &TenantId, instance: &Instance) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Instance>, _) =
            self.load_collection(tenant, INSTANCES_KEY).await?;
        match items.iter_mut().find(|i| i.id() == instance.id()) {
            Some(slot) => *slot = instance.clone(),
            None => {
                return Err(DomainError::new(
                    ErrorCode::InstanceNotFound,
                    format!("Instance {} not found", instance.id()),
                ))
            }
        }
        self.save_collection(tenant, INSTANCES_KEY, &items, version).await
    }

    async fn delete(&self, tenant: &TenantId, id: &InstanceId) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Instance>, _) =
            self.load_collection(tenant, INSTANCES_KEY).await?;
        let before = items.len();
        items.retain(|i| i.id() != id);
        if items.len() == before {
            return Err(DomainError::new(
                ErrorCode::InstanceNotFound,
                format!("Instance {} not found", id),
            ));
        }
        self.save_collection(tenant, INSTANCES_KEY, &items, version).await
    }

    async fn delete_by_template(
        &self,
        tenant: &TenantId,
        template_id: &TemplateId,
    ) -> Result<usize, DomainError> {
        let (mut items, version): (Vec<Instance>, _) =
            self.load_collection(tenant, INSTANCES_KEY).await?;
        let before = items.len();
        items.retain(|i| i.template_id() != Some(template_id));
        let removed = before - items.len();
        if removed > 0 {
            self.save_collection(tenant, INSTANCES_KEY, &items, version).await?;
        }
        Ok(removed)
    }
}

#[async_trait]
impl MemberRepository for DocumentRepositories {
    async fn list(&self, tenant: &TenantId) -> Result<Vec<Member>, DomainError> {
        let (items, _) = self.load_collection(tenant, MEMBERS_KEY).await?;
        Ok(items)
    }

    async fn find_by_id(
        &self,
        tenant: &TenantId,
        id: &MemberId,
    ) -> Result<Option<Member>, DomainError> {
        let (items, _): (Vec<Member>, _) = self.load_collection(tenant, MEMBERS_KEY).await?;
        Ok(items.into_iter().find(|m| m.id() == id))
    }

    async fn insert(&self, tenant: &TenantId, member: &Member) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Member>, _) =
            self.load_collection(tenant, MEMBERS_KEY).await?;
        if items.iter().any(|m| m.id() == member.id()) {
            return Err(DomainError::conflict(format!(
                "Member {} already exists",
                member.id()
            )));
        }
        items.push(member.clone());
        self.save_collection(tenant, MEMBERS_KEY, &items, version).await
    }

    async fn update(&self, tenant: &TenantId, member: &Member) -> Result<(), DomainError> {
        let (mut items, version): (Vec<Member>, _) =
            self.load_collection(tenant, MEMBERS_KEY).await?;
        match items.iter_mut().find(|m| m.id() == member.id()) {
            Some(slot) => *slot = member.clone(),
            None => {
                return Err(DomainError::new(
                    ErrorCode::MemberNotFound,
                    format!("Member {} not found", member.id()),
                ))
            }
        }
        self.save_collection(tenant, MEMBERS_KEY, &items, version).await
    }
}

#[async_trait]
impl TransactionLog for DocumentRepositories {
    async fn append(
        &self,
        tenant: &TenantId,
        transaction: &PointsTransaction,
    ) -> Result<(), DomainError> {
        let (mut items, version): (Vec<PointsTransaction>, _) =
            self.load_collection(tenant, TRANSACTIONS_KEY).await?;
        items.push(transaction.clone());
        self.save_collection(tenant, TRANSACTIONS_KEY, &items, version).await
    }

    async fn list(&self, tenant: &TenantId) -> Result<Vec<PointsTransaction>, DomainError> {
        let (items, _) = self.load_collection(tenant, TRANSACTIONS_KEY).await?;
        Ok(items)
    }

    async fn list_by_member(
        &self,
        tenant: &TenantId,
        member: &MemberId,
    ) -> Result<Vec<PointsTransaction>, DomainError> {
        let (items, _): (Vec<PointsTransaction>, _) =
            self.load_collection(tenant, TRANSACTIONS_KEY).await?;
        Ok(items
            .into_iter()
            .filter(|tx| tx.member_id() == member)
            .collect())
    }
}

#[async_trait]
impl SettingsRepository for DocumentRepositories {
    async fn get(&self, tenant: &TenantId) -> Result<TenantSettings, DomainError> {
        match self.store.load(tenant, SETTINGS_KEY).await? {
            None => Ok(TenantSettings::default()),
            Some(doc) => serde_json::from_value(doc.body)
                .map_err(|e| DomainError::storage(format!("Corrupt settings document: {}", e))),
        }
    }

    async fn save(&self, tenant: &TenantId, settings: &TenantSettings) -> Result<(), DomainError> {
        let version = self.store.load(tenant, SETTINGS_KEY).await?.map(|d| d.version);
        let body = serde_json::to_value(settings)
            .map_err(|e| DomainError::storage(format!("Failed to encode settings: {}", e)))?;
        self.store.save(tenant, SETTINGS_KEY, body, version).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::InMemoryDocumentStore;
    use crate::domain::foundation::{DueDate, Role};
    use crate::domain::schedule::{Cadence, Frequency};

    fn tenant() -> TenantId {
        TenantId::new("family-1").unwrap()
    }

    fn member_id(id: &str) -> MemberId {
        MemberId::new(id).unwrap()
    }

    fn repos() -> DocumentRepositories {
        DocumentRepositories::new(Arc::new(InMemoryDocumentStore::new()))
    }

    fn test_template() -> Template {
        Template::new(
            TemplateId::new(),
            "Dishes".to_string(),
            None,
            vec![member_id("kid-1")],
            member_id("parent-1"),
            10,
            Cadence::simple(Frequency::Daily),
            vec![],
            None,
        )
        .unwrap()
    }

    fn test_instance(template: &Template) -> Instance {
        use crate::domain::schedule::CycleId;
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        Instance::from_template(
            InstanceId::new(),
            template,
            CycleId::for_date(date, Frequency::Daily),
            DueDate::from_date(date),
        )
    }

    #[tokio::test]
    async fn template_insert_find_update_delete() {
        let repos = repos();
        let mut template = test_template();

        TemplateRepository::insert(&repos, &tenant(), &template).await.unwrap();
        let found = TemplateRepository::find_by_id(&repos, &tenant(), template.id())
            .await
            .unwrap();
        assert!(found.is_some());

        template.rename("Dry dishes".to_string()).unwrap();
        TemplateRepository::update(&repos, &tenant(), &template).await.unwrap();
        let found = TemplateRepository::find_by_id(&repos, &tenant(), template.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.title(), "Dry dishes");

        TemplateRepository::delete(&repos, &tenant(), template.id()).await.unwrap();
        assert!(TemplateRepository::list(&repos, &tenant()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_template_insert_conflicts() {
        let repos = repos();
        let template = test_template();
        TemplateRepository::insert(&repos, &tenant(), &template).await.unwrap();
        let result = TemplateRepository::insert(&repos, &tenant(), &template).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn update_missing_template_is_not_found() {
        let repos = repos();
        let template = test_template();
        let err = TemplateRepository::update(&repos, &tenant(), &template)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TemplateNotFound);
    }

    #[tokio::test]
    async fn instances_filter_by_template() {
        let repos = repos();
        let template_a = test_template();
        let template_b = test_template();

        InstanceRepository::insert(&repos, &tenant(), &test_instance(&template_a))
            .await
            .unwrap();
        InstanceRepository::insert(&repos, &tenant(), &test_instance(&template_a))
            .await
            .unwrap();
        InstanceRepository::insert(&repos, &tenant(), &test_instance(&template_b))
            .await
            .unwrap();

        let for_a = repos
            .list_by_template(&tenant(), template_a.id())
            .await
            .unwrap();
        assert_eq!(for_a.len(), 2);
    }

    #[tokio::test]
    async fn delete_by_template_removes_only_that_template() {
        let repos = repos();
        let template_a = test_template();
        let template_b = test_template();

        InstanceRepository::insert(&repos, &tenant(), &test_instance(&template_a))
            .await
            .unwrap();
        InstanceRepository::insert(&repos, &tenant(), &test_instance(&template_b))
            .await
            .unwrap();

        let removed = repos.delete_by_template(&tenant(), template_a.id()).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(
            InstanceRepository::list(&repos, &tenant()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn member_balance_updates_persist() {
        let repos = repos();
        let mut member =
            Member::new(member_id("kid-1"), "Sam".to_string(), Role::Child).unwrap();
        MemberRepository::insert(&repos, &tenant(), &member).await.unwrap();

        member.credit(10);
        MemberRepository::update(&repos, &tenant(), &member).await.unwrap();

        let found = MemberRepository::find_by_id(&repos, &tenant(), member.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.balance(), 10);
    }

    #[tokio::test]
    async fn transactions_append_and_filter_by_member() {
        use crate::domain::foundation::{Timestamp, TransactionId};
        use crate::domain::ledger::Direction;

        let repos = repos();
        for member in ["kid-1", "kid-1", "kid-2"] {
            let tx = PointsTransaction::new(
                TransactionId::new(),
                member_id(member),
                Direction::Earn,
                5,
                "Completed: Dishes".to_string(),
                None,
                Timestamp::now(),
            )
            .unwrap();
            repos.append(&tenant(), &tx).await.unwrap();
        }

        assert_eq!(TransactionLog::list(&repos, &tenant()).await.unwrap().len(), 3);
        assert_eq!(
            repos
                .list_by_member(&tenant(), &member_id("kid-1"))
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn settings_default_when_absent() {
        let repos = repos();
        let settings = SettingsRepository::get(&repos, &tenant()).await.unwrap();
        assert_eq!(settings, TenantSettings::default());
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let repos = repos();
        let settings = TenantSettings::new(true, 2.0).unwrap();
        SettingsRepository::save(&repos, &tenant(), &settings).await.unwrap();

        let loaded = SettingsRepository::get(&repos, &tenant()).await.unwrap();
        assert_eq!(loaded, settings);
    }
}
