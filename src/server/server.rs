use crate::application_impl::*;
use crate::application_port::*;
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::domain_model::*;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::server::{LogPushGateway, NotificationPump, notification_channel};
use crate::settings::Settings;
use sqlx::MySqlPool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Wired relationship subsystem: stores picked from settings, caches built
/// from the configured TTLs, notification pump running in the background.
pub struct Server {
    pub relationship_service: Arc<dyn RelationshipService>,
    pub family_service: Arc<dyn FamilyService>,
    memory_profiles: Option<Arc<MemoryProfileRepo>>,
    pump_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Server {
    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let mut memory_profiles = None;
        let (profiles, relationship_store, family_store, invite_store): (
            Arc<dyn ProfileRepo>,
            Arc<dyn RelationshipStore>,
            Arc<dyn FamilyStore>,
            Arc<dyn FamilyInviteStore>,
        ) = match settings.store.backend.as_str() {
            "memory" => {
                let directory = Arc::new(MemoryProfileRepo::new());
                memory_profiles = Some(directory.clone());
                (
                    directory,
                    Arc::new(MemoryRelationshipStore::new()),
                    Arc::new(MemoryFamilyStore::new()),
                    Arc::new(MemoryFamilyInviteStore::new()),
                )
            }
            "mysql" => {
                let dsn = settings
                    .store
                    .mysql_dsn
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("store.mysql_dsn is required for mysql"))?;
                let pool = MySqlPool::connect(dsn).await?;
                (
                    Arc::new(MySqlProfileRepo::new(
                        pool.clone(),
                        Duration::from_secs(settings.cache.profile_ttl_secs),
                        clock.clone(),
                    )),
                    Arc::new(MySqlRelationshipStore::new(pool.clone())),
                    Arc::new(MySqlFamilyStore::new(pool.clone())),
                    Arc::new(MySqlFamilyInviteStore::new(pool)),
                )
            }
            other => return Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        };

        let cancel = CancellationToken::new();
        let (sender, rx) = notification_channel(settings.notify.queue_depth);
        let notifier: Arc<dyn NotificationSender> = Arc::new(sender);
        let gateway: Arc<dyn PushGateway> = Arc::new(LogPushGateway);
        let pump = NotificationPump::new(rx, gateway, cancel.child_token());
        let pump_handle = tokio::spawn(pump.run());

        let roster = Arc::new(RosterCache::new(
            Duration::from_secs(settings.cache.roster_ttl_secs),
            clock.clone(),
        ));
        let members_cache: Arc<TtlCache<FamilyId, Vec<FamilyMember>>> = Arc::new(TtlCache::new(
            Duration::from_secs(settings.cache.members_ttl_secs),
            clock,
        ));

        let relationship_service: Arc<dyn RelationshipService> =
            Arc::new(RealRelationshipService::new(
                profiles.clone(),
                relationship_store,
                roster,
                notifier.clone(),
            ));
        let family_service: Arc<dyn FamilyService> = Arc::new(RealFamilyService::new(
            profiles,
            family_store,
            invite_store,
            members_cache,
            notifier,
        ));

        Ok(Server {
            relationship_service,
            family_service,
            memory_profiles,
            pump_handle: Mutex::new(Some(pump_handle)),
            cancel,
        })
    }

    /// Seedable profile directory, present only on the memory backend.
    pub fn memory_profiles(&self) -> Option<Arc<MemoryProfileRepo>> {
        self.memory_profiles.clone()
    }

    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self.pump_handle.lock().unwrap().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("notification pump join failed: {e}");
            }
        }
    }
}
