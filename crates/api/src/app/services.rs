//! Service wiring: stores, change bus, alert monitor, POS and assistant.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

use barstock_ai::{Assistant, LlmClient, UnconfiguredClient};
use barstock_auth::{Hs256JwtValidator, UserDirectory};
use barstock_events::{Event, InMemoryEventBus, InventoryChange};
use barstock_infra::seed::seed_if_empty;
use barstock_infra::{
    AlertMonitor, InMemoryInventoryStore, InMemoryPosConfigStore, InventoryService, InventoryStore, PosClient,
    PosConfigStore, PosService, SimulatedPosClient, StoreError,
};

use crate::config::ApiConfig;

pub type DynInventoryStore = Arc<dyn InventoryStore>;
pub type ChangeBus = Arc<InMemoryEventBus<InventoryChange>>;
pub type Inventory = InventoryService<DynInventoryStore, ChangeBus>;
pub type Pos = PosService<Arc<dyn PosClient>, Arc<dyn PosConfigStore>>;

/// Everything a service graph is built from. Tests swap individual parts.
pub struct ServiceDeps {
    pub store: DynInventoryStore,
    pub pos_store: Arc<dyn PosConfigStore>,
    pub pos_client: Arc<dyn PosClient>,
    pub llm: Arc<dyn LlmClient>,
    pub users: Arc<dyn UserDirectory>,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub seed_demo_data: bool,
}

impl ServiceDeps {
    /// In-memory stores and the simulated POS; the LLM client comes from
    /// `config` when an endpoint is set.
    pub fn in_memory(config: &ApiConfig) -> Result<Self, barstock_ai::AiError> {
        let llm: Arc<dyn LlmClient> = match &config.llm {
            Some(settings) => {
                let mut llm_config = barstock_infra::LlmConfig::new(settings.endpoint.clone());
                llm_config.api_key = settings.api_key.clone();
                if let Some(model) = &settings.model {
                    llm_config.model = model.clone();
                }
                llm_config.timeout = settings.timeout;
                Arc::new(barstock_infra::HttpLlmClient::new(llm_config)?)
            }
            None => {
                tracing::warn!("LLM_ENDPOINT not set; AI routes will fail");
                Arc::new(UnconfiguredClient)
            }
        };

        Ok(Self {
            store: Arc::new(InMemoryInventoryStore::new()),
            pos_store: Arc::new(InMemoryPosConfigStore::new()),
            pos_client: Arc::new(SimulatedPosClient::new(config.pos_sync_delay)),
            llm,
            users: Arc::new(config.users.clone()),
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: config.token_ttl,
            seed_demo_data: config.seed_demo_data,
        })
    }
}

pub struct AppServices {
    pub inventory: Inventory,
    pub alerts: Arc<AlertMonitor<DynInventoryStore>>,
    pub pos: Pos,
    pub assistant: Assistant<Arc<dyn LlmClient>>,
    pub users: Arc<dyn UserDirectory>,
    pub jwt: Arc<Hs256JwtValidator>,
    pub token_ttl: chrono::Duration,
}

impl AppServices {
    /// Seed (optionally), load the first alert snapshot and start the alert
    /// monitor. Must run inside a tokio runtime.
    pub async fn start(deps: ServiceDeps) -> Result<Arc<Self>, StoreError> {
        if deps.seed_demo_data {
            seed_if_empty(&*deps.store).await?;
        }

        let inventory: Inventory = InventoryService::new(deps.store.clone(), Arc::new(InMemoryEventBus::new()));
        let alerts = Arc::new(AlertMonitor::new(deps.store));
        // Subscribe before the first load so no change between the two is lost.
        let subscription = inventory.subscribe();
        alerts.refresh().await?;
        alerts.clone().spawn(subscription);

        Ok(Arc::new(Self {
            inventory,
            alerts,
            pos: PosService::new(deps.pos_client, deps.pos_store),
            assistant: Assistant::new(deps.llm),
            users: deps.users,
            jwt: Arc::new(Hs256JwtValidator::new(deps.jwt_secret.as_bytes())),
            token_ttl: deps.token_ttl,
        }))
    }
}

/// Inventory change notifications as SSE (used by `/api/inventory/stream`).
pub fn inventory_sse_stream(
    services: Arc<AppServices>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let rx = services.inventory.subscribe().into_inner();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(change) => {
            let data = serde_json::to_string(&change).unwrap_or_else(|_| "{}".to_string());
            Some(Ok(SseEvent::default().event(change.event_type()).data(data)))
        }
        // Lagged clients skip ahead; they refetch on the next change anyway.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
